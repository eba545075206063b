//! Storage collaborators: profiles, device registry, transaction history and
//! the risk audit log.

use crate::errors::GatewayResult;
use crate::models::{NewTransaction, RegisteredDevice, RiskEvent, TransactionRecord, UserProfile};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

#[async_trait]
pub trait BankingStore: Send + Sync {
    /// Short backend label for health output
    fn backend(&self) -> &'static str;

    async fn health_check(&self) -> GatewayResult<()>;

    async fn profile(&self, user_id: Uuid) -> GatewayResult<Option<UserProfile>>;

    async fn is_known_device(&self, user_id: Uuid, fingerprint: &str) -> GatewayResult<bool>;

    /// Newest first
    async fn recent_transactions(
        &self,
        user_id: Uuid,
        limit: usize,
    ) -> GatewayResult<Vec<TransactionRecord>>;

    /// Case-insensitive match on any earlier transaction's payee name
    async fn has_paid_payee(&self, user_id: Uuid, payee: &str) -> GatewayResult<bool>;

    async fn append_risk_event(&self, event: RiskEvent) -> GatewayResult<()>;

    async fn insert_transaction(&self, tx: NewTransaction) -> GatewayResult<TransactionRecord>;
}

/// Process-local store used for development and tests
#[derive(Default)]
pub struct MemoryStore {
    profiles: RwLock<HashMap<Uuid, UserProfile>>,
    devices: RwLock<Vec<RegisteredDevice>>,
    transactions: RwLock<Vec<TransactionRecord>>,
    risk_events: RwLock<Vec<RiskEvent>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert_profile(&self, profile: UserProfile) {
        self.profiles.write().insert(profile.user_id, profile);
    }

    pub fn register_device(&self, user_id: Uuid, fingerprint: &str) {
        self.devices.write().push(RegisteredDevice {
            user_id,
            device_fingerprint: fingerprint.to_string(),
        });
    }

    /// Insert a historical record directly, bypassing the decision path
    pub fn seed_transaction(&self, record: TransactionRecord) {
        self.transactions.write().push(record);
    }

    pub fn risk_events(&self, user_id: Uuid) -> Vec<RiskEvent> {
        self.risk_events
            .read()
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn transaction_count(&self, user_id: Uuid) -> usize {
        self.transactions
            .read()
            .iter()
            .filter(|t| t.user_id == user_id)
            .count()
    }
}

#[async_trait]
impl BankingStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn health_check(&self) -> GatewayResult<()> {
        Ok(())
    }

    async fn profile(&self, user_id: Uuid) -> GatewayResult<Option<UserProfile>> {
        Ok(self.profiles.read().get(&user_id).cloned())
    }

    async fn is_known_device(&self, user_id: Uuid, fingerprint: &str) -> GatewayResult<bool> {
        Ok(self
            .devices
            .read()
            .iter()
            .any(|d| d.user_id == user_id && d.device_fingerprint == fingerprint))
    }

    async fn recent_transactions(
        &self,
        user_id: Uuid,
        limit: usize,
    ) -> GatewayResult<Vec<TransactionRecord>> {
        let mut records: Vec<TransactionRecord> = self
            .transactions
            .read()
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records.truncate(limit);
        Ok(records)
    }

    async fn has_paid_payee(&self, user_id: Uuid, payee: &str) -> GatewayResult<bool> {
        let payee = payee.trim().to_lowercase();
        Ok(self.transactions.read().iter().any(|t| {
            t.user_id == user_id
                && t.payee_name
                    .as_deref()
                    .is_some_and(|name| name.trim().to_lowercase() == payee)
        }))
    }

    async fn append_risk_event(&self, event: RiskEvent) -> GatewayResult<()> {
        self.risk_events.write().push(event);
        Ok(())
    }

    async fn insert_transaction(&self, tx: NewTransaction) -> GatewayResult<TransactionRecord> {
        let record = TransactionRecord::from_new(Uuid::new_v4(), tx, Utc::now());
        self.transactions.write().push(record.clone());
        Ok(record)
    }
}

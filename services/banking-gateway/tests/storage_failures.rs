//! Storage failures surface as 500 with the underlying error text.
//!
//! Kept in its own test binary so the process-wide counters asserted here are
//! not moved by the happy-path tests.

use actix_web::{http::StatusCode, test, web, App};
use async_trait::async_trait;
use banking_gateway::{
    banking::MockBank,
    config::BankingConfig,
    errors::{GatewayError, GatewayResult},
    metrics,
    middleware::auth::issue_token,
    models::{NewTransaction, RiskEvent, TransactionRecord, UserProfile},
    store::BankingStore,
    AppState, MemoryStore,
};
use risk_engine::RiskScorer;
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

const SECRET: &str = "test-secret";

/// Delegates reads to a `MemoryStore` and fails every write
struct BrokenDisk {
    inner: MemoryStore,
}

impl BrokenDisk {
    fn new() -> Self {
        Self {
            inner: MemoryStore::new(),
        }
    }
}

#[async_trait]
impl BankingStore for BrokenDisk {
    fn backend(&self) -> &'static str {
        "broken"
    }

    async fn health_check(&self) -> GatewayResult<()> {
        Ok(())
    }

    async fn profile(&self, user_id: Uuid) -> GatewayResult<Option<UserProfile>> {
        self.inner.profile(user_id).await
    }

    async fn is_known_device(&self, user_id: Uuid, fingerprint: &str) -> GatewayResult<bool> {
        self.inner.is_known_device(user_id, fingerprint).await
    }

    async fn recent_transactions(
        &self,
        user_id: Uuid,
        limit: usize,
    ) -> GatewayResult<Vec<TransactionRecord>> {
        self.inner.recent_transactions(user_id, limit).await
    }

    async fn has_paid_payee(&self, user_id: Uuid, payee: &str) -> GatewayResult<bool> {
        self.inner.has_paid_payee(user_id, payee).await
    }

    async fn append_risk_event(&self, _event: RiskEvent) -> GatewayResult<()> {
        Err(GatewayError::Internal("disk full".to_string()))
    }

    async fn insert_transaction(&self, _tx: NewTransaction) -> GatewayResult<TransactionRecord> {
        Err(GatewayError::Internal("disk full".to_string()))
    }
}

async fn post(store: Arc<BrokenDisk>, path: &str, user: Uuid, body: Value) -> (StatusCode, Value) {
    let state = web::Data::new(AppState::new(
        store,
        RiskScorer::new(),
        MockBank::new(BankingConfig::default()),
    ));
    let app = test::init_service(
        App::new()
            .app_data(state)
            .configure(|cfg| banking_gateway::configure_routes(cfg, SECRET)),
    )
    .await;

    let token = issue_token(SECRET, user, 300).unwrap();
    let req = test::TestRequest::post()
        .uri(path)
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(body)
        .to_request();

    let resp = test::call_service(&app, req).await;
    let status = resp.status();
    let body: Value = test::read_body_json(resp).await;
    (status, body)
}

#[actix_web::test]
async fn failed_transaction_insert_is_500_without_side_effects() {
    let store = Arc::new(BrokenDisk::new());
    let user = Uuid::new_v4();
    store.inner.upsert_profile(UserProfile {
        user_id: user,
        is_elderly: true,
        guardian_contact: Some("+91-98000-00000".to_string()),
    });

    let guardian_before = metrics::GUARDIAN_NOTIFICATIONS.get();
    let pending_before = metrics::TRANSACTION_DECISIONS
        .with_label_values(&["pending"])
        .get();

    let (status, body) = post(
        store.clone(),
        "/functions/v1/transaction-execute",
        user,
        json!({ "amount": 90000, "payee_name": "Unknown", "risk_level": "HIGH" }),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "disk full" }));
    assert_eq!(metrics::GUARDIAN_NOTIFICATIONS.get(), guardian_before);
    assert_eq!(
        metrics::TRANSACTION_DECISIONS
            .with_label_values(&["pending"])
            .get(),
        pending_before
    );
    assert_eq!(store.inner.transaction_count(user), 0);
}

#[actix_web::test]
async fn failed_audit_write_is_500_and_not_counted() {
    let store = Arc::new(BrokenDisk::new());
    let user = Uuid::new_v4();

    let high_before = metrics::RISK_EVALUATIONS.with_label_values(&["HIGH"]).get();

    let (status, body) = post(
        store,
        "/functions/v1/risk-evaluate",
        user,
        json!({ "amount": 5000, "stressScore": 60, "deviceFingerprint": "new-phone" }),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "disk full" }));
    assert_eq!(
        metrics::RISK_EVALUATIONS.with_label_values(&["HIGH"]).get(),
        high_before
    );
}

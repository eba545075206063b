use crate::errors::{GatewayError, GatewayResult};
use crate::models::{NewTransaction, RiskEvent, TransactionRecord, UserProfile};
use crate::store::BankingStore;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, postgres::PgRow, Executor, PgPool, Row};
use std::time::Duration;
use uuid::Uuid;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS profiles (
    id UUID PRIMARY KEY,
    is_elderly BOOLEAN NOT NULL DEFAULT FALSE,
    guardian_contact TEXT
);
CREATE TABLE IF NOT EXISTS devices (
    user_id UUID NOT NULL,
    device_fingerprint TEXT NOT NULL,
    PRIMARY KEY (user_id, device_fingerprint)
);
CREATE TABLE IF NOT EXISTS transactions (
    id UUID PRIMARY KEY,
    user_id UUID NOT NULL,
    transaction_type TEXT NOT NULL,
    amount NUMERIC NOT NULL,
    payee_name TEXT,
    payee_account TEXT,
    status TEXT NOT NULL,
    risk_level TEXT NOT NULL,
    requires_otp BOOLEAN NOT NULL,
    otp_verified BOOLEAN NOT NULL,
    guardian_notified BOOLEAN NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
CREATE INDEX IF NOT EXISTS transactions_user_created ON transactions (user_id, created_at DESC);
CREATE TABLE IF NOT EXISTS risk_events (
    id UUID PRIMARY KEY,
    user_id UUID NOT NULL,
    event_type TEXT NOT NULL,
    severity TEXT NOT NULL,
    details JSONB NOT NULL,
    created_at TIMESTAMPTZ NOT NULL
);
"#;

pub async fn create_pool(database_url: &str, max_connections: u32) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await?;

    Ok(pool)
}

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn ensure_schema(&self) -> GatewayResult<()> {
        (&self.pool).execute(SCHEMA).await?;
        Ok(())
    }
}

fn corrupt(err: risk_engine::Error) -> GatewayError {
    GatewayError::Internal(format!("corrupt transaction row: {err}"))
}

fn transaction_from_row(row: &PgRow) -> GatewayResult<TransactionRecord> {
    let status: String = row.try_get("status")?;
    let risk_level: String = row.try_get("risk_level")?;

    Ok(TransactionRecord {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        transaction_type: row.try_get("transaction_type")?,
        amount: row.try_get("amount")?,
        payee_name: row.try_get("payee_name")?,
        payee_account: row.try_get("payee_account")?,
        status: status.parse().map_err(corrupt)?,
        risk_level: risk_level.parse().map_err(corrupt)?,
        requires_otp: row.try_get("requires_otp")?,
        otp_verified: row.try_get("otp_verified")?,
        guardian_notified: row.try_get("guardian_notified")?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl BankingStore for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn health_check(&self) -> GatewayResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn profile(&self, user_id: Uuid) -> GatewayResult<Option<UserProfile>> {
        let row = sqlx::query("SELECT id, is_elderly, guardian_contact FROM profiles WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| -> GatewayResult<UserProfile> {
            Ok(UserProfile {
                user_id: row.try_get("id")?,
                is_elderly: row.try_get("is_elderly")?,
                guardian_contact: row.try_get("guardian_contact")?,
            })
        })
        .transpose()
    }

    async fn is_known_device(&self, user_id: Uuid, fingerprint: &str) -> GatewayResult<bool> {
        let known: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM devices WHERE user_id = $1 AND device_fingerprint = $2)",
        )
        .bind(user_id)
        .bind(fingerprint)
        .fetch_one(&self.pool)
        .await?;

        Ok(known)
    }

    async fn recent_transactions(
        &self,
        user_id: Uuid,
        limit: usize,
    ) -> GatewayResult<Vec<TransactionRecord>> {
        let rows = sqlx::query(
            "SELECT * FROM transactions WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2",
        )
        .bind(user_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(transaction_from_row).collect()
    }

    async fn has_paid_payee(&self, user_id: Uuid, payee: &str) -> GatewayResult<bool> {
        let known: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM transactions
             WHERE user_id = $1 AND LOWER(TRIM(payee_name)) = LOWER(TRIM($2)))",
        )
        .bind(user_id)
        .bind(payee)
        .fetch_one(&self.pool)
        .await?;

        Ok(known)
    }

    async fn append_risk_event(&self, event: RiskEvent) -> GatewayResult<()> {
        sqlx::query(
            "INSERT INTO risk_events (id, user_id, event_type, severity, details, created_at)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(event.id)
        .bind(event.user_id)
        .bind(event.event_type.as_str())
        .bind(event.severity.as_str())
        .bind(&event.details)
        .bind(event.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn insert_transaction(&self, tx: NewTransaction) -> GatewayResult<TransactionRecord> {
        let row = sqlx::query(
            "INSERT INTO transactions
                (id, user_id, transaction_type, amount, payee_name, payee_account, status,
                 risk_level, requires_otp, otp_verified, guardian_notified)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(tx.user_id)
        .bind(TransactionRecord::TRANSFER)
        .bind(tx.amount)
        .bind(&tx.payee_name)
        .bind(&tx.payee_account)
        .bind(tx.status.as_str())
        .bind(tx.risk_level.as_str())
        .bind(tx.requires_otp)
        .bind(tx.otp_verified)
        .bind(tx.guardian_notified)
        .fetch_one(&self.pool)
        .await?;

        transaction_from_row(&row)
    }
}

use chrono::{DateTime, Utc};
use risk_engine::{RiskAssessment, RiskEventType, RiskLevel, TransactionStatus};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// ===== Stored Records =====
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct UserProfile {
    pub user_id: Uuid,
    pub is_elderly: bool,
    pub guardian_contact: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RegisteredDevice {
    pub user_id: Uuid,
    pub device_fingerprint: String,
}

/// Immutable audit entry written for every risk evaluation
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RiskEvent {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_type: RiskEventType,
    pub severity: RiskLevel,
    pub details: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NewTransaction {
    pub user_id: Uuid,
    pub amount: Decimal,
    pub payee_name: Option<String>,
    pub payee_account: Option<String>,
    pub status: TransactionStatus,
    pub risk_level: RiskLevel,
    pub requires_otp: bool,
    pub otp_verified: bool,
    pub guardian_notified: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TransactionRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub transaction_type: String,
    pub amount: Decimal,
    pub payee_name: Option<String>,
    pub payee_account: Option<String>,
    pub status: TransactionStatus,
    pub risk_level: RiskLevel,
    pub requires_otp: bool,
    pub otp_verified: bool,
    pub guardian_notified: bool,
    pub created_at: DateTime<Utc>,
}

impl TransactionRecord {
    pub const TRANSFER: &'static str = "transfer";

    pub fn from_new(id: Uuid, tx: NewTransaction, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id: tx.user_id,
            transaction_type: Self::TRANSFER.to_string(),
            amount: tx.amount,
            payee_name: tx.payee_name,
            payee_account: tx.payee_account,
            status: tx.status,
            risk_level: tx.risk_level,
            requires_otp: tx.requires_otp,
            otp_verified: tx.otp_verified,
            guardian_notified: tx.guardian_notified,
            created_at,
        }
    }
}

// ===== Risk Evaluate =====
#[derive(Debug, Deserialize, Clone, Default, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RiskEvaluateRequest {
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    #[validate(length(max = 120))]
    pub payee: Option<String>,
    #[serde(default)]
    #[validate(range(max = 100))]
    pub stress_score: Option<u8>,
    #[serde(default)]
    pub has_scam_indicators: Option<bool>,
    #[serde(default)]
    pub device_fingerprint: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskEvaluateResponse {
    pub score: u32,
    pub level: RiskLevel,
    pub reasons: Vec<String>,
    pub requires_guardian: bool,
    #[serde(rename = "requiresOTP")]
    pub requires_otp: bool,
    pub explanation: String,
}

impl From<RiskAssessment> for RiskEvaluateResponse {
    fn from(assessment: RiskAssessment) -> Self {
        RiskEvaluateResponse {
            score: assessment.score.value(),
            level: assessment.level,
            reasons: assessment.reasons,
            requires_guardian: assessment.requires_guardian,
            requires_otp: assessment.requires_otp,
            explanation: assessment.explanation,
        }
    }
}

// ===== Transaction Execute =====
#[derive(Debug, Deserialize, Clone, Validate)]
pub struct TransactionExecuteRequest {
    pub amount: Decimal,
    #[validate(length(min = 1, max = 120))]
    pub payee_name: String,
    #[serde(default)]
    #[validate(length(max = 64))]
    pub payee_account: Option<String>,
    pub risk_level: RiskLevel,
    #[serde(default)]
    pub otp_verified: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BankingConfirmation {
    pub transaction_id: Uuid,
    pub bank_reference: String,
    pub timestamp: DateTime<Utc>,
    #[serde(with = "rust_decimal::serde::float")]
    pub new_balance: Decimal,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionExecuteResponse {
    pub success: bool,
    pub transaction_id: Uuid,
    pub status: TransactionStatus,
    pub requires_otp: bool,
    pub requires_guardian: bool,
    pub blocked: bool,
    pub message: String,
    pub banking_response: Option<BankingConfirmation>,
}

// ===== Mock Banking =====
#[derive(Debug, Deserialize)]
pub struct MockBankingRequest {
    pub action: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BankingAction {
    GetBalance,
    GetTransactions,
    Transfer,
}

impl std::str::FromStr for BankingAction {
    type Err = crate::errors::GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "get_balance" => Ok(BankingAction::GetBalance),
            "get_transactions" => Ok(BankingAction::GetTransactions),
            "transfer" => Ok(BankingAction::Transfer),
            other => Err(crate::errors::GatewayError::UnknownAction(other.to_string())),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BalanceResponse {
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
    pub currency: String,
    pub account_number: String,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StatementEntry {
    pub id: String,
    pub date: DateTime<Utc>,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(with = "rust_decimal::serde::float_option", default)]
    pub balance: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub status: Option<TransactionStatus>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionsResponse {
    pub transactions: Vec<StatementEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TransferResponse {
    pub success: bool,
    pub transaction_id: String,
    pub reference: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

// ===== Conversation =====
#[derive(Debug, Deserialize)]
pub struct NluRequest {
    #[serde(default)]
    pub transcript: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VoiceTranscribeRequest {
    // Audio is accepted for API compatibility; only `text` is analysed.
    #[serde(default)]
    pub audio: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

// ===== Health Check =====
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub storage: String,
}

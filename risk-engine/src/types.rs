//! Core types for risk engine

use crate::{Error, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Additive risk score. Unbounded above; the default policy tops out at 130.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RiskScore(u32);

impl RiskScore {
    /// Create new risk score
    pub fn new(score: u32) -> Self {
        Self(score)
    }

    /// Get raw score
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Add a signal weight
    pub fn add(&mut self, weight: u32) {
        self.0 = self.0.saturating_add(weight);
    }
}

impl fmt::Display for RiskScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Risk level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    /// Low risk
    Low,
    /// Medium risk, step-up verification needed
    Medium,
    /// High risk
    High,
}

impl RiskLevel {
    /// Wire label ("LOW", "MEDIUM", "HIGH")
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }

    /// OTP is required for anything above LOW
    pub fn requires_otp(&self) -> bool {
        matches!(self, RiskLevel::Medium | RiskLevel::High)
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LOW" => Ok(RiskLevel::Low),
            "MEDIUM" => Ok(RiskLevel::Medium),
            "HIGH" => Ok(RiskLevel::High),
            _ => Err(Error::UnknownRiskLevel(s.to_string())),
        }
    }
}

/// Inputs to the scorer, already resolved from collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskSignals {
    /// Transfer amount (>= 0)
    pub amount: Decimal,

    /// Whether a payee was named at all
    pub has_payee: bool,

    /// Payee appears in the user's transaction history
    pub payee_known: bool,

    /// Voice stress score, 0-100
    pub stress_score: u8,

    /// Scam phrases were detected in the conversation
    pub has_scam_indicators: bool,

    /// Device fingerprint is not registered for the user
    pub is_new_device: bool,

    /// Mean of the user's recent transaction amounts
    pub recent_average_amount: Decimal,
}

impl Default for RiskSignals {
    fn default() -> Self {
        Self {
            amount: Decimal::ZERO,
            has_payee: false,
            payee_known: false,
            stress_score: 0,
            has_scam_indicators: false,
            is_new_device: false,
            recent_average_amount: Decimal::from(1000),
        }
    }
}

/// Risk assessment result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Additive score
    pub score: RiskScore,

    /// Discrete level derived from the score
    pub level: RiskLevel,

    /// Triggered reasons, in evaluation order
    pub reasons: Vec<String>,

    /// HIGH risk for an elderly user
    pub requires_guardian: bool,

    /// MEDIUM or HIGH risk
    pub requires_otp: bool,

    /// Customer-facing explanation
    pub explanation: String,
}

/// Category under which a risk evaluation is written to the audit log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskEventType {
    /// Scam phrase heard in the conversation
    ScamPhrase,
    /// Voice stress above threshold
    StressDetected,
    /// Everything else
    AmountAnomaly,
}

impl RiskEventType {
    /// Pick the event category for a set of signals
    pub fn classify(signals: &RiskSignals) -> Self {
        if signals.has_scam_indicators {
            RiskEventType::ScamPhrase
        } else if signals.stress_score > crate::scoring::STRESS_THRESHOLD {
            RiskEventType::StressDetected
        } else {
            RiskEventType::AmountAnomaly
        }
    }

    /// Storage label
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskEventType::ScamPhrase => "scam_phrase",
            RiskEventType::StressDetected => "stress_detected",
            RiskEventType::AmountAnomaly => "amount_anomaly",
        }
    }
}

/// Transaction outcome, fixed once decided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Executed against the bank
    Completed,
    /// Waiting on OTP or guardian approval
    Pending,
    /// Refused outright
    Blocked,
}

impl TransactionStatus {
    /// Storage label
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Completed => "completed",
            TransactionStatus::Pending => "pending",
            TransactionStatus::Blocked => "blocked",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "completed" => Ok(TransactionStatus::Completed),
            "pending" => Ok(TransactionStatus::Pending),
            "blocked" => Ok(TransactionStatus::Blocked),
            other => Err(Error::UnknownStatus(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_level_parsing() {
        assert_eq!("high".parse::<RiskLevel>().unwrap(), RiskLevel::High);
        assert_eq!(" MEDIUM ".parse::<RiskLevel>().unwrap(), RiskLevel::Medium);
        assert!("CRITICAL".parse::<RiskLevel>().is_err());
    }

    #[test]
    fn test_risk_level_wire_format() {
        let json = serde_json::to_string(&RiskLevel::Medium).unwrap();
        assert_eq!(json, "\"MEDIUM\"");
        let level: RiskLevel = serde_json::from_str("\"LOW\"").unwrap();
        assert_eq!(level, RiskLevel::Low);
    }

    #[test]
    fn test_unknown_status_label() {
        assert_eq!(
            "pending".parse::<TransactionStatus>().unwrap(),
            TransactionStatus::Pending
        );
        assert!(matches!(
            "settled".parse::<TransactionStatus>(),
            Err(Error::UnknownStatus(label)) if label == "settled"
        ));
    }

    #[test]
    fn test_event_type_priority() {
        let mut signals = RiskSignals {
            stress_score: 80,
            has_scam_indicators: true,
            ..Default::default()
        };
        assert_eq!(RiskEventType::classify(&signals), RiskEventType::ScamPhrase);

        signals.has_scam_indicators = false;
        assert_eq!(RiskEventType::classify(&signals), RiskEventType::StressDetected);

        signals.stress_score = 50;
        assert_eq!(RiskEventType::classify(&signals), RiskEventType::AmountAnomaly);
    }
}

//! Risk scoring engine

use crate::{Error, Result, RiskAssessment, RiskLevel, RiskScore, RiskSignals};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Stress scores strictly above this count as stressed
pub const STRESS_THRESHOLD: u8 = 50;

const REASON_AMOUNT: &str = "Transaction amount significantly higher than usual";
const REASON_DEVICE: &str = "Transaction from unrecognized device";
const REASON_STRESS: &str = "Voice stress indicators detected";
const REASON_SCAM: &str = "Potential scam phrase detected in conversation";
const REASON_PAYEE: &str = "Transfer to new payee";

/// Signal weights and level thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringPolicy {
    /// Amount more than `amount_multiplier` x recent average
    pub amount_anomaly_weight: u32,
    /// Multiplier applied to the recent average
    pub amount_multiplier: Decimal,
    /// Unregistered device
    pub new_device_weight: u32,
    /// Voice stress
    pub stress_weight: u32,
    /// Scam phrase
    pub scam_weight: u32,
    /// Unfamiliar payee
    pub new_payee_weight: u32,
    /// Score at or above which the level is MEDIUM
    pub medium_threshold: u32,
    /// Score at or above which the level is HIGH
    pub high_threshold: u32,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            amount_anomaly_weight: 25,
            amount_multiplier: Decimal::from(2),
            new_device_weight: 20,
            stress_weight: 30,
            scam_weight: 40,
            new_payee_weight: 15,
            medium_threshold: 30,
            high_threshold: 60,
        }
    }
}

impl ScoringPolicy {
    /// Default weights with custom thresholds
    pub fn with_thresholds(medium_threshold: u32, high_threshold: u32) -> Result<Self> {
        if medium_threshold == 0 || medium_threshold >= high_threshold {
            return Err(Error::InvalidConfig(format!(
                "thresholds must satisfy 0 < medium ({}) < high ({})",
                medium_threshold, high_threshold
            )));
        }

        Ok(Self {
            medium_threshold,
            high_threshold,
            ..Self::default()
        })
    }
}

/// Risk scorer
///
/// Pure: the same signals always produce the same assessment.
#[derive(Debug, Clone, Default)]
pub struct RiskScorer {
    policy: ScoringPolicy,
}

impl RiskScorer {
    /// Create new risk scorer with the default policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Create scorer with an explicit policy
    pub fn with_policy(policy: ScoringPolicy) -> Self {
        Self { policy }
    }

    /// Active policy
    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    /// Sum the weights of every triggered signal, collecting reasons in order
    pub fn score(&self, signals: &RiskSignals) -> (RiskScore, Vec<String>) {
        let p = &self.policy;
        let mut score = RiskScore::default();
        let mut reasons = Vec::new();

        // An average too large to multiply cannot be exceeded by any amount
        let anomalous = signals
            .recent_average_amount
            .checked_mul(p.amount_multiplier)
            .is_some_and(|limit| signals.amount > limit);
        if anomalous {
            score.add(p.amount_anomaly_weight);
            reasons.push(REASON_AMOUNT.to_string());
        }

        if signals.is_new_device {
            score.add(p.new_device_weight);
            reasons.push(REASON_DEVICE.to_string());
        }

        if signals.stress_score > STRESS_THRESHOLD {
            score.add(p.stress_weight);
            reasons.push(REASON_STRESS.to_string());
        }

        if signals.has_scam_indicators {
            score.add(p.scam_weight);
            reasons.push(REASON_SCAM.to_string());
        }

        if signals.has_payee && !signals.payee_known {
            score.add(p.new_payee_weight);
            reasons.push(REASON_PAYEE.to_string());
        }

        (score, reasons)
    }

    /// Map a score onto a level
    pub fn level_for(&self, score: RiskScore) -> RiskLevel {
        match score.value() {
            s if s >= self.policy.high_threshold => RiskLevel::High,
            s if s >= self.policy.medium_threshold => RiskLevel::Medium,
            _ => RiskLevel::Low,
        }
    }

    /// Full assessment for a user
    pub fn assess(&self, signals: &RiskSignals, is_elderly: bool) -> RiskAssessment {
        let (score, reasons) = self.score(signals);
        let level = self.level_for(score);
        let explanation = explain(level, &reasons);

        debug!(score = score.value(), %level, reasons = reasons.len(), "risk scored");

        RiskAssessment {
            score,
            level,
            requires_guardian: level == RiskLevel::High && is_elderly,
            requires_otp: level.requires_otp(),
            reasons,
            explanation,
        }
    }
}

/// Customer-facing explanation for a level
pub fn explain(level: RiskLevel, reasons: &[String]) -> String {
    match level {
        RiskLevel::High => format!(
            "⚠️ This transaction has been flagged as high-risk for your protection. {}. Please verify this is legitimate before proceeding.",
            reasons.join(". ")
        ),
        RiskLevel::Medium => format!(
            "⚠️ Additional verification is required. {}. We'll send you an OTP to confirm this transaction.",
            reasons.join(". ")
        ),
        RiskLevel::Low => "✓ This transaction appears safe. No unusual patterns detected.".to_string(),
    }
}

//! Transaction decision table

use crate::{RiskLevel, TransactionStatus};
use serde::{Deserialize, Serialize};

/// Outcome of running a transaction through the decision table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    /// Final status of the record
    pub status: TransactionStatus,
    /// Held until an OTP is confirmed
    pub requires_otp: bool,
    /// Held until the guardian approves; the guardian is notified
    pub requires_guardian: bool,
    /// Refused outright
    pub blocked: bool,
}

impl Decision {
    fn completed() -> Self {
        Self {
            status: TransactionStatus::Completed,
            requires_otp: false,
            requires_guardian: false,
            blocked: false,
        }
    }

    /// Whether the bank should be instructed
    pub fn is_completed(&self) -> bool {
        self.status == TransactionStatus::Completed
    }

    /// Customer-facing status message
    pub fn message(&self) -> &'static str {
        if self.blocked {
            "⛔ Transaction blocked for security reasons. This appears to be a high-risk transaction. Please contact customer support if you believe this is an error."
        } else if self.requires_guardian {
            "⏳ Transaction pending guardian approval. Your guardian has been notified and will need to approve this transaction before it proceeds."
        } else if self.is_completed() {
            "✓ Transaction completed successfully!"
        } else {
            "⏳ Transaction pending verification."
        }
    }
}

/// One-shot decision over risk level and verification state
pub struct TransactionDecider;

impl TransactionDecider {
    /// Only HIGH risk consults the elderly flag
    pub fn needs_elderly_flag(level: RiskLevel) -> bool {
        level == RiskLevel::High
    }

    /// Decide the outcome of a transaction
    pub fn decide(level: RiskLevel, otp_verified: bool, is_elderly: bool) -> Decision {
        match level {
            RiskLevel::Low => Decision::completed(),
            RiskLevel::Medium if otp_verified => Decision::completed(),
            RiskLevel::Medium => Decision {
                status: TransactionStatus::Pending,
                requires_otp: true,
                requires_guardian: false,
                blocked: false,
            },
            RiskLevel::High if is_elderly => Decision {
                status: TransactionStatus::Pending,
                requires_otp: false,
                requires_guardian: true,
                blocked: false,
            },
            RiskLevel::High => Decision {
                status: TransactionStatus::Blocked,
                requires_otp: false,
                requires_guardian: false,
                blocked: true,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_table_is_exhaustive() {
        use TransactionStatus::*;

        let cases = [
            (RiskLevel::Low, false, false, Completed, false, false, false),
            (RiskLevel::Low, true, true, Completed, false, false, false),
            (RiskLevel::Medium, false, false, Pending, true, false, false),
            (RiskLevel::Medium, false, true, Pending, true, false, false),
            (RiskLevel::Medium, true, false, Completed, false, false, false),
            (RiskLevel::Medium, true, true, Completed, false, false, false),
            (RiskLevel::High, false, true, Pending, false, true, false),
            (RiskLevel::High, true, true, Pending, false, true, false),
            (RiskLevel::High, false, false, Blocked, false, false, true),
            (RiskLevel::High, true, false, Blocked, false, false, true),
        ];

        for (level, otp, elderly, status, requires_otp, requires_guardian, blocked) in cases {
            let decision = TransactionDecider::decide(level, otp, elderly);
            assert_eq!(decision.status, status, "{level} otp={otp} elderly={elderly}");
            assert_eq!(decision.requires_otp, requires_otp);
            assert_eq!(decision.requires_guardian, requires_guardian);
            assert_eq!(decision.blocked, blocked);
        }
    }

    #[test]
    fn test_messages() {
        let blocked = TransactionDecider::decide(RiskLevel::High, false, false);
        assert!(blocked.message().starts_with("⛔"));

        let guardian = TransactionDecider::decide(RiskLevel::High, false, true);
        assert!(guardian.message().contains("guardian approval"));

        let done = TransactionDecider::decide(RiskLevel::Low, false, false);
        assert_eq!(done.message(), "✓ Transaction completed successfully!");

        let otp = TransactionDecider::decide(RiskLevel::Medium, false, false);
        assert_eq!(otp.message(), "⏳ Transaction pending verification.");
    }

    #[test]
    fn test_elderly_lookup_only_for_high() {
        assert!(!TransactionDecider::needs_elderly_flag(RiskLevel::Low));
        assert!(!TransactionDecider::needs_elderly_flag(RiskLevel::Medium));
        assert!(TransactionDecider::needs_elderly_flag(RiskLevel::High));
    }
}

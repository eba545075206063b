//! Property-based tests for scoring and decision invariants
//!
//! - Amount anomaly: amount > 2x average always contributes 25
//! - Monotonicity: raising any signal never lowers the score
//! - Level bands follow the 30 / 60 thresholds exactly
//! - OTP / guardian flags follow the level
//! - Decision table holds for every combination

use proptest::prelude::*;
use risk_engine::{
    RiskLevel, RiskScore, RiskScorer, RiskSignals, TransactionDecider, TransactionStatus,
};
use rust_decimal::Decimal;

/// Strategy for generating amounts (two decimal places)
fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (0u64..10_000_000u64).prop_map(|cents| Decimal::new(cents as i64, 2))
}

fn average_strategy() -> impl Strategy<Value = Decimal> {
    (1u64..5_000_000u64).prop_map(|cents| Decimal::new(cents as i64, 2))
}

fn level_strategy() -> impl Strategy<Value = RiskLevel> {
    prop_oneof![
        Just(RiskLevel::Low),
        Just(RiskLevel::Medium),
        Just(RiskLevel::High),
    ]
}

fn signals_strategy() -> impl Strategy<Value = RiskSignals> {
    (
        amount_strategy(),
        average_strategy(),
        any::<bool>(),
        any::<bool>(),
        0u8..=100u8,
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(
            |(amount, avg, has_payee, payee_known, stress, scam, new_device)| RiskSignals {
                amount,
                has_payee,
                payee_known,
                stress_score: stress,
                has_scam_indicators: scam,
                is_new_device: new_device,
                recent_average_amount: avg,
            },
        )
}

proptest! {
    #[test]
    fn amount_anomaly_adds_25(signals in signals_strategy()) {
        let scorer = RiskScorer::new();
        let (score, _) = scorer.score(&signals);

        let baseline = RiskSignals { amount: Decimal::ZERO, ..signals.clone() };
        let (base_score, _) = scorer.score(&baseline);

        if signals.amount > signals.recent_average_amount * Decimal::from(2) {
            prop_assert_eq!(score.value(), base_score.value() + 25);
        } else {
            prop_assert_eq!(score.value(), base_score.value());
        }
    }

    #[test]
    fn score_is_monotonic(signals in signals_strategy(), bump in 0u8..=100u8, extra in amount_strategy()) {
        let scorer = RiskScorer::new();
        let (score, _) = scorer.score(&signals);

        let raised = [
            RiskSignals { amount: signals.amount + extra, ..signals.clone() },
            RiskSignals { stress_score: signals.stress_score.max(bump), ..signals.clone() },
            RiskSignals { has_scam_indicators: true, ..signals.clone() },
            RiskSignals { is_new_device: true, ..signals.clone() },
        ];

        for higher in raised.iter() {
            prop_assert!(scorer.score(higher).0 >= score);
        }
    }

    #[test]
    fn level_bands(raw in 0u32..200u32) {
        let scorer = RiskScorer::new();
        let level = scorer.level_for(RiskScore::new(raw));

        prop_assert_eq!(level == RiskLevel::High, raw >= 60);
        prop_assert_eq!(level == RiskLevel::Medium, (30..60).contains(&raw));
        prop_assert_eq!(level == RiskLevel::Low, raw < 30);
    }

    #[test]
    fn assessment_flags_follow_level(signals in signals_strategy(), elderly in any::<bool>()) {
        let assessment = RiskScorer::new().assess(&signals, elderly);

        prop_assert_eq!(
            assessment.requires_otp,
            matches!(assessment.level, RiskLevel::Medium | RiskLevel::High)
        );
        prop_assert_eq!(
            assessment.requires_guardian,
            assessment.level == RiskLevel::High && elderly
        );
        prop_assert_eq!(assessment.reasons.is_empty(), assessment.score.value() == 0);
    }

    #[test]
    fn decision_table(level in level_strategy(), otp in any::<bool>(), elderly in any::<bool>()) {
        let decision = TransactionDecider::decide(level, otp, elderly);

        let expected = match (level, otp, elderly) {
            (RiskLevel::Low, _, _) => TransactionStatus::Completed,
            (RiskLevel::Medium, false, _) => TransactionStatus::Pending,
            (RiskLevel::Medium, true, _) => TransactionStatus::Completed,
            (RiskLevel::High, _, true) => TransactionStatus::Pending,
            (RiskLevel::High, _, false) => TransactionStatus::Blocked,
        };

        prop_assert_eq!(decision.status, expected);
        prop_assert_eq!(decision.blocked, expected == TransactionStatus::Blocked);
        prop_assert_eq!(decision.requires_otp, level == RiskLevel::Medium && !otp);
        prop_assert_eq!(decision.requires_guardian, level == RiskLevel::High && elderly);
    }
}

#[test]
fn reference_example_scores_75() {
    let signals = RiskSignals {
        amount: Decimal::from(5000),
        has_payee: false,
        payee_known: false,
        stress_score: 60,
        has_scam_indicators: false,
        is_new_device: true,
        recent_average_amount: Decimal::from(1000),
    };

    let assessment = RiskScorer::new().assess(&signals, false);
    assert_eq!(assessment.score.value(), 75);
    assert_eq!(assessment.level, RiskLevel::High);

    let decision = TransactionDecider::decide(assessment.level, false, false);
    assert_eq!(decision.status, TransactionStatus::Blocked);
    assert!(decision.blocked);
}

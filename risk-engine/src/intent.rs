//! Rule-based intent detection over transcripts

use crate::{Error, Result};
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

lazy_static! {
    static ref AMOUNT_RE: Regex =
        Regex::new(r"(\d+(?:,\d{3})*(?:\.\d{2})?)").expect("amount pattern is valid");
    static ref PAYEE_RE: Regex =
        Regex::new(r"(?i)to\s+([a-z\s]+?)(?:\s|$)").expect("payee pattern is valid");
}

const BALANCE_KEYWORDS: [&str; 3] = ["balance", "how much", "account"];
const TRANSFER_KEYWORDS: [&str; 3] = ["transfer", "send money", "pay"];
const HISTORY_KEYWORDS: [&str; 3] = ["history", "transactions", "statement"];

/// Detected intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    /// Balance enquiry
    Balance,
    /// Money transfer
    Transfer,
    /// Transaction history
    History,
    /// Anything else
    General,
}

/// Entities pulled from a transfer request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntentEntities {
    /// Amount, commas stripped
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub amount: Option<Decimal>,
    /// First word after "to"
    pub payee: Option<String>,
}

/// Classification result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentResult {
    /// Detected intent
    pub intent: Intent,
    /// Extracted entities
    pub entities: IntentEntities,
    /// Fixed confidence of the rule set
    pub confidence: f64,
    /// Transcript as received
    pub transcript: String,
}

/// Keyword classifier. First matching rule wins: balance, transfer, history.
pub struct IntentClassifier;

impl IntentClassifier {
    /// Classify a transcript
    pub fn classify(transcript: &str) -> Result<IntentResult> {
        if transcript.trim().is_empty() {
            return Err(Error::InvalidTranscript("transcript is empty".to_string()));
        }

        let lower = transcript.to_lowercase();
        let contains_any = |keywords: &[&str]| keywords.iter().any(|k| lower.contains(k));

        let mut entities = IntentEntities::default();
        let intent = if contains_any(&BALANCE_KEYWORDS) {
            Intent::Balance
        } else if contains_any(&TRANSFER_KEYWORDS) {
            entities.amount = extract_amount(&lower);
            entities.payee = extract_payee(&lower);
            Intent::Transfer
        } else if contains_any(&HISTORY_KEYWORDS) {
            Intent::History
        } else {
            Intent::General
        };

        Ok(IntentResult {
            intent,
            entities,
            confidence: 0.92,
            transcript: transcript.to_string(),
        })
    }
}

fn extract_amount(lower: &str) -> Option<Decimal> {
    let caps = AMOUNT_RE.captures(lower)?;
    Decimal::from_str(&caps[1].replace(',', "")).ok()
}

fn extract_payee(lower: &str) -> Option<String> {
    let caps = PAYEE_RE.captures(lower)?;
    let payee = caps[1].trim();
    (!payee.is_empty()).then(|| payee.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_balance_intent() {
        let result = IntentClassifier::classify("How much is in my account?").unwrap();
        assert_eq!(result.intent, Intent::Balance);
        assert_eq!(result.entities, IntentEntities::default());
    }

    #[test]
    fn test_transfer_with_entities() {
        let result = IntentClassifier::classify("Transfer 2,500.50 to ramesh please").unwrap();
        assert_eq!(result.intent, Intent::Transfer);
        assert_eq!(result.entities.amount, Some(dec!(2500.50)));
        assert_eq!(result.entities.payee.as_deref(), Some("ramesh"));
    }

    #[test]
    fn test_transfer_without_entities() {
        let result = IntentClassifier::classify("I want to pay someone").unwrap();
        assert_eq!(result.intent, Intent::Transfer);
        assert_eq!(result.entities.amount, None);
    }

    #[test]
    fn test_balance_wins_over_transfer() {
        let result = IntentClassifier::classify("transfer from my account").unwrap();
        assert_eq!(result.intent, Intent::Balance);
    }

    #[test]
    fn test_history_and_general() {
        assert_eq!(
            IntentClassifier::classify("show my statement").unwrap().intent,
            Intent::History
        );
        assert_eq!(
            IntentClassifier::classify("hello there").unwrap().intent,
            Intent::General
        );
    }

    #[test]
    fn test_empty_transcript_rejected() {
        assert!(IntentClassifier::classify("  ").is_err());
    }
}

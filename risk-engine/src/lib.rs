//! Risk Engine for the voice-banking assistant
//!
//! Pure, I/O-free building blocks: signal scoring, the transaction decision
//! table, transcript signal analysis and rule-based intent detection.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod decision;
pub mod error;
pub mod intent;
pub mod scoring;
pub mod signals;
pub mod types;

pub use decision::{Decision, TransactionDecider};
pub use error::{Error, Result};
pub use intent::{Intent, IntentClassifier, IntentEntities, IntentResult};
pub use scoring::{RiskScorer, ScoringPolicy};
pub use signals::{StressIndicators, TranscriptAnalysis, TranscriptAnalyzer};
pub use types::*;

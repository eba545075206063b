//! Conversation signals extracted from a transcript
//!
//! Stress is estimated from filler words, explicit pause markers ("...") and
//! immediately repeated words. Scam detection is a fixed phrase list.

use serde::{Deserialize, Serialize};

/// Transcript used when the caller supplies no text
pub const DEFAULT_TRANSCRIPT: &str = "Check my balance";

const FILLER_WORDS: [&str; 4] = ["umm", "uhh", "er", "ah"];
const PAUSE_MARKER: &str = "...";

const SCAM_PHRASES: [&str; 7] = [
    "account is blocked",
    "share otp",
    "kyc expired",
    "verification from bank",
    "urgent action required",
    "account suspended",
    "confirm your details",
];

const FILLER_WEIGHT: u32 = 15;
const PAUSE_WEIGHT: u32 = 20;
const REPEAT_WEIGHT: u32 = 25;

/// Raw stress counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StressIndicators {
    /// Distinct filler words present
    pub filler_words: u32,
    /// Pause markers present
    pub pause_count: u32,
    /// Words immediately repeated
    pub repeat_count: u32,
    /// Reserved for acoustic analysis; always 0 for text
    pub hesitation_score: u32,
}

impl StressIndicators {
    /// Weighted stress score, capped at 100
    pub fn stress_score(&self) -> u8 {
        let raw = self.filler_words * FILLER_WEIGHT
            + self.pause_count * PAUSE_WEIGHT
            + self.repeat_count * REPEAT_WEIGHT;
        raw.min(100) as u8
    }
}

/// Analysis of one transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptAnalysis {
    /// Transcript as analysed
    pub transcript: String,
    /// Stress counters
    pub stress_indicators: StressIndicators,
    /// 0-100
    pub stress_score: u8,
    /// Scam phrases found, in list order
    pub scam_phrases_detected: Vec<String>,
    /// At least one scam phrase found
    pub has_scam_indicators: bool,
    /// Fixed confidence of the text stub
    pub confidence: f64,
}

/// Text-only transcript analyser
pub struct TranscriptAnalyzer;

impl TranscriptAnalyzer {
    /// Analyse `text`, falling back to the default transcript when absent or blank
    pub fn analyze(text: Option<&str>) -> TranscriptAnalysis {
        let transcript = match text {
            Some(t) if !t.trim().is_empty() => t.to_string(),
            _ => DEFAULT_TRANSCRIPT.to_string(),
        };
        let lower = transcript.to_lowercase();

        let indicators = StressIndicators {
            filler_words: count_fillers(&lower),
            pause_count: lower.matches(PAUSE_MARKER).count() as u32,
            repeat_count: count_repeats(&lower),
            hesitation_score: 0,
        };

        let scam_phrases_detected: Vec<String> = SCAM_PHRASES
            .iter()
            .filter(|phrase| lower.contains(*phrase))
            .map(|phrase| phrase.to_string())
            .collect();

        TranscriptAnalysis {
            stress_score: indicators.stress_score(),
            stress_indicators: indicators,
            has_scam_indicators: !scam_phrases_detected.is_empty(),
            scam_phrases_detected,
            transcript,
            confidence: 0.95,
        }
    }
}

fn words(lower: &str) -> impl Iterator<Item = &str> {
    lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
}

// Substring match: "transfer" counts as "er".
fn count_fillers(lower: &str) -> u32 {
    FILLER_WORDS
        .iter()
        .filter(|filler| lower.contains(*filler))
        .count() as u32
}

fn count_repeats(lower: &str) -> u32 {
    let mut count = 0;
    let mut previous: Option<&str> = None;
    for word in words(lower) {
        if previous == Some(word) {
            count += 1;
        }
        previous = Some(word);
    }
    count
}

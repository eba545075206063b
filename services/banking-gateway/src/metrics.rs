use lazy_static::lazy_static;
use prometheus::{
    register_int_counter, register_int_counter_vec, Encoder, IntCounter, IntCounterVec,
    TextEncoder,
};

lazy_static! {
    pub static ref RISK_EVALUATIONS: IntCounterVec = register_int_counter_vec!(
        "risk_evaluations_total",
        "Risk evaluations by resulting level",
        &["level"]
    )
    .expect("metric can be created");

    pub static ref TRANSACTION_DECISIONS: IntCounterVec = register_int_counter_vec!(
        "transaction_decisions_total",
        "Transaction decisions by status",
        &["status"]
    )
    .expect("metric can be created");

    pub static ref GUARDIAN_NOTIFICATIONS: IntCounter = register_int_counter!(
        "guardian_notifications_total",
        "Guardian approval requests sent"
    )
    .expect("metric can be created");

    pub static ref SCAM_PHRASES_DETECTED: IntCounter = register_int_counter!(
        "scam_phrases_detected_total",
        "Transcripts containing at least one scam phrase"
    )
    .expect("metric can be created");
}

/// Generate metrics output in Prometheus text format
pub fn render() -> Result<String, Box<dyn std::error::Error>> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = vec![];
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

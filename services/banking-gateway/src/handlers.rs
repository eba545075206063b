use crate::errors::{GatewayError, GatewayResult};
use crate::metrics;
use crate::middleware::{AuthenticatedUser, JwtAuth};
use crate::models::*;
use crate::store::BankingStore;
use crate::AppState;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use risk_engine::{
    IntentClassifier, RiskEventType, RiskSignals, TransactionDecider, TranscriptAnalyzer,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

/// Transactions averaged for the amount-anomaly baseline
const HISTORY_WINDOW: usize = 10;
/// Lines returned by `get_transactions`
const STATEMENT_LENGTH: usize = 5;
const UNKNOWN_DEVICE: &str = "unknown";
/// Largest amount accepted by any function
const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

fn default_average() -> Decimal {
    Decimal::from(1000)
}

fn ensure_valid_amount(amount: Decimal) -> GatewayResult<()> {
    if amount < Decimal::ZERO {
        return Err(GatewayError::Validation("amount must not be negative".to_string()));
    }
    if amount > MAX_AMOUNT {
        return Err(GatewayError::Validation(format!(
            "amount must not exceed {MAX_AMOUNT}"
        )));
    }
    Ok(())
}

fn recent_average(records: &[TransactionRecord]) -> GatewayResult<Decimal> {
    if records.is_empty() {
        return Ok(default_average());
    }
    let total = records
        .iter()
        .try_fold(Decimal::ZERO, |acc, r| acc.checked_add(r.amount))
        .ok_or_else(|| {
            GatewayError::Validation("transaction history total out of range".to_string())
        })?;
    Ok(total / Decimal::from(records.len()))
}

async fn is_elderly(store: &dyn BankingStore, user_id: Uuid) -> GatewayResult<bool> {
    Ok(store
        .profile(user_id)
        .await?
        .map(|p| p.is_elderly)
        .unwrap_or(false))
}

// ===== Health Check =====
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let status = match state.store.health_check().await {
        Ok(()) => "healthy",
        Err(e) => {
            warn!(error = %e, "storage health check failed");
            "degraded"
        }
    };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        storage: state.store.backend().to_string(),
    })
}

pub async fn metrics_endpoint() -> GatewayResult<HttpResponse> {
    let body = metrics::render().map_err(|e| GatewayError::Internal(e.to_string()))?;
    Ok(HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(body))
}

// ===== Evaluate Risk =====
pub async fn risk_evaluate(
    user: AuthenticatedUser,
    req: web::Json<RiskEvaluateRequest>,
    state: web::Data<AppState>,
) -> GatewayResult<HttpResponse> {
    let request = req.into_inner();
    request.validate()?;

    let amount = request.amount.unwrap_or(Decimal::ZERO);
    ensure_valid_amount(amount)?;

    info!(user_id = %user.id, "evaluating risk");
    let store = state.store.as_ref();

    let elderly = is_elderly(store, user.id).await?;

    let fingerprint = request
        .device_fingerprint
        .as_deref()
        .filter(|f| !f.is_empty())
        .unwrap_or(UNKNOWN_DEVICE);
    let is_new_device = !store.is_known_device(user.id, fingerprint).await?;

    let history = store.recent_transactions(user.id, HISTORY_WINDOW).await?;

    let payee = request
        .payee
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty());
    let payee_known = match payee {
        Some(name) => store.has_paid_payee(user.id, name).await?,
        None => false,
    };

    let signals = RiskSignals {
        amount,
        has_payee: payee.is_some(),
        payee_known,
        stress_score: request.stress_score.unwrap_or(0),
        has_scam_indicators: request.has_scam_indicators.unwrap_or(false),
        is_new_device,
        recent_average_amount: recent_average(&history)?,
    };

    let assessment = state.scorer.assess(&signals, elderly);

    store
        .append_risk_event(RiskEvent {
            id: Uuid::new_v4(),
            user_id: user.id,
            event_type: RiskEventType::classify(&signals),
            severity: assessment.level,
            details: serde_json::json!({
                "riskScore": assessment.score.value(),
                "reasons": assessment.reasons,
                "amount": amount.to_f64(),
                "payee": payee,
                "stressScore": signals.stress_score,
            }),
            created_at: Utc::now(),
        })
        .await?;

    metrics::RISK_EVALUATIONS
        .with_label_values(&[assessment.level.as_str()])
        .inc();

    info!(
        user_id = %user.id,
        score = assessment.score.value(),
        level = %assessment.level,
        requires_guardian = assessment.requires_guardian,
        "risk evaluation complete"
    );

    Ok(HttpResponse::Ok().json(RiskEvaluateResponse::from(assessment)))
}

// ===== Execute Transaction =====
pub async fn transaction_execute(
    user: AuthenticatedUser,
    req: web::Json<TransactionExecuteRequest>,
    state: web::Data<AppState>,
) -> GatewayResult<HttpResponse> {
    let request = req.into_inner();
    request.validate()?;
    ensure_valid_amount(request.amount)?;

    info!(user_id = %user.id, level = %request.risk_level, "processing transaction");
    let store = state.store.as_ref();

    let elderly = if TransactionDecider::needs_elderly_flag(request.risk_level) {
        is_elderly(store, user.id).await?
    } else {
        false
    };

    let decision = TransactionDecider::decide(request.risk_level, request.otp_verified, elderly);

    let record = store
        .insert_transaction(NewTransaction {
            user_id: user.id,
            amount: request.amount,
            payee_name: Some(request.payee_name.trim().to_string()),
            payee_account: request.payee_account.clone(),
            status: decision.status,
            risk_level: request.risk_level,
            requires_otp: decision.requires_otp,
            otp_verified: request.otp_verified,
            guardian_notified: decision.requires_guardian,
        })
        .await?;

    if decision.requires_guardian {
        // Delivery is mocked; the notification is the log record.
        metrics::GUARDIAN_NOTIFICATIONS.inc();
        info!(
            user_id = %user.id,
            transaction_id = %record.id,
            amount = %record.amount,
            "guardian notification sent"
        );
    }

    let banking_response = decision
        .is_completed()
        .then(|| state.bank.confirm(record.id, record.amount));

    metrics::TRANSACTION_DECISIONS
        .with_label_values(&[decision.status.as_str()])
        .inc();

    info!(
        user_id = %user.id,
        transaction_id = %record.id,
        status = %decision.status,
        "transaction decided"
    );

    Ok(HttpResponse::Ok().json(TransactionExecuteResponse {
        success: decision.is_completed(),
        transaction_id: record.id,
        status: decision.status,
        requires_otp: decision.requires_otp,
        requires_guardian: decision.requires_guardian,
        blocked: decision.blocked,
        message: decision.message().to_string(),
        banking_response,
    }))
}

// ===== Mock Banking =====
pub async fn mock_banking(
    user: AuthenticatedUser,
    req: web::Json<MockBankingRequest>,
    state: web::Data<AppState>,
) -> GatewayResult<HttpResponse> {
    let action: BankingAction = req.action.parse()?;
    info!(user_id = %user.id, action = %req.action, "mock banking call");

    let response = match action {
        BankingAction::GetBalance => HttpResponse::Ok().json(state.bank.balance()),
        BankingAction::GetTransactions => {
            let records = state
                .store
                .recent_transactions(user.id, STATEMENT_LENGTH)
                .await?;
            HttpResponse::Ok().json(TransactionsResponse {
                transactions: state.bank.statement(&records),
            })
        }
        BankingAction::Transfer => HttpResponse::Ok().json(state.bank.transfer()),
    };

    Ok(response)
}

// ===== Conversation =====
pub async fn nlu_intent(req: web::Json<NluRequest>) -> GatewayResult<HttpResponse> {
    let transcript = req
        .transcript
        .as_deref()
        .ok_or_else(|| GatewayError::Validation("transcript is required".to_string()))?;

    let result = IntentClassifier::classify(transcript)?;
    info!(intent = ?result.intent, "intent detected");

    Ok(HttpResponse::Ok().json(result))
}

pub async fn voice_transcribe(req: web::Json<VoiceTranscribeRequest>) -> HttpResponse {
    let analysis = TranscriptAnalyzer::analyze(req.text.as_deref());

    if analysis.has_scam_indicators {
        metrics::SCAM_PHRASES_DETECTED.inc();
        warn!(phrases = ?analysis.scam_phrases_detected, "scam phrases in transcript");
    }
    info!(
        stress_score = analysis.stress_score,
        audio_supplied = req.audio.is_some(),
        "transcript analysed"
    );

    HttpResponse::Ok().json(analysis)
}

// ===== Configure Routes =====
pub fn configure_routes(cfg: &mut web::ServiceConfig, jwt_secret: &str) {
    let auth = || JwtAuth::new(jwt_secret.to_string());

    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        GatewayError::Validation(err.to_string()).into()
    }))
    .route("/health", web::get().to(health_check))
    .route("/metrics", web::get().to(metrics_endpoint))
    .service(
        web::scope("/functions/v1")
            .service(
                web::resource("/risk-evaluate")
                    .wrap(auth())
                    .route(web::post().to(risk_evaluate)),
            )
            .service(
                web::resource("/transaction-execute")
                    .wrap(auth())
                    .route(web::post().to(transaction_execute)),
            )
            .service(
                web::resource("/mock-banking")
                    .wrap(auth())
                    .route(web::post().to(mock_banking)),
            )
            .route("/nlu-intent", web::post().to(nlu_intent))
            .route("/voice-transcribe", web::post().to(voice_transcribe)),
    );
}

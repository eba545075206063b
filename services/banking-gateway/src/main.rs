use actix_web::{middleware, web, App, HttpServer};
use anyhow::Context;
use banking_gateway::{
    banking::MockBank,
    config::{Config, StorageBackend},
    cors, database,
    middleware::RateLimiter,
    store::BankingStore,
    AppState, MemoryStore,
};
use dotenv::dotenv;
use risk_engine::{RiskScorer, ScoringPolicy};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .json()
        .init();

    info!("Starting Banking Gateway...");

    let config = Config::from_env().context("Failed to load configuration")?;
    info!("Configuration loaded successfully");

    let store: Arc<dyn BankingStore> = match config.storage.backend {
        StorageBackend::Memory => {
            info!("Using in-memory storage");
            Arc::new(MemoryStore::new())
        }
        StorageBackend::Postgres => {
            info!("Connecting to database");
            let pool = database::create_pool(
                &config.storage.database_url,
                config.storage.max_connections,
            )
            .await
            .context("Database connection failed")?;

            let store = database::PgStore::new(pool);
            store
                .ensure_schema()
                .await
                .context("Database schema setup failed")?;
            info!("Database schema ready");
            Arc::new(store)
        }
    };

    store
        .health_check()
        .await
        .context("Storage not accessible")?;

    let policy = ScoringPolicy::with_thresholds(
        config.risk.medium_threshold,
        config.risk.high_threshold,
    )?;
    let state = web::Data::new(AppState::new(
        store,
        RiskScorer::with_policy(policy),
        MockBank::new(config.banking.clone()),
    ));
    let rate_limiter = RateLimiter::new(config.server.requests_per_minute);
    let jwt_secret = config.auth.jwt_secret.clone();

    info!(
        "Starting HTTP server on {}:{}",
        config.server.host, config.server.port
    );

    HttpServer::new(move || {
        let jwt_secret = jwt_secret.clone();
        App::new()
            .app_data(state.clone())
            .wrap(rate_limiter.clone())
            .wrap(cors())
            .wrap(middleware::Logger::default())
            .configure(move |cfg| banking_gateway::configure_routes(cfg, &jwt_secret))
    })
    .workers(config.server.workers)
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await?;

    Ok(())
}

use chrono::Utc;
use seattle_info_admin::{
    AppState,
    config::{AppConfig, Env},
    create_router,
    engine::{EngineState, InMemoryEngine},
    store::ModerationStore,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Loads configuration, initializes logging, builds the moderation engine and serves the API.
#[tokio::main]
async fn main() {
    // 1. Configuration (fail-fast on missing production settings).
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // 2. Logging. RUST_LOG wins over the defaults.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "seattle_info_admin=debug,tower_http=info,axum=trace".into());

    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            // JSON lines for the log aggregator.
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);

    // 3. In-memory store. Everything here is lost on restart.
    let store = if config.seed_mock_data {
        ModerationStore::seeded(Utc::now())
    } else {
        ModerationStore::new()
    };
    tracing::info!(
        users = store.users.len(),
        listings = store.listings.len(),
        categories = store.categories.len(),
        "moderation store initialized"
    );

    // 4. Engine and shared state.
    let engine = Arc::new(InMemoryEngine::new(store)) as EngineState;
    let bind_addr = config.bind_addr.clone();
    let app = create_router(AppState::new(engine, config));

    // 5. Server.
    let listener = TcpListener::bind(&bind_addr)
        .await
        .expect("FATAL: Failed to bind BIND_ADDR.");

    tracing::info!("Listening on {}", bind_addr);
    tracing::info!("API Documentation (Swagger UI) available at /swagger-ui");

    axum::serve(listener, app)
        .await
        .expect("FATAL: HTTP server terminated unexpectedly.");
}

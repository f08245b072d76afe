use cvp_studio_backend::controllers::{
    chat::ChatController, forge::ForgeController, weather::WeatherController,
};
use cvp_studio_backend::domain::{
    chat::ChatService,
    forge::ForgeService,
    quota::{UsageGate, FORGE_FEATURE_KEY},
    weather::{WeatherService, WeatherServiceApi},
};
use cvp_studio_backend::infrastructure::config::{Config, LogFormat, StoreBackend};
use cvp_studio_backend::infrastructure::db::{check_connection, create_pool, ensure_schema};
use cvp_studio_backend::infrastructure::http::{build_router, start_http_server};
use cvp_studio_backend::infrastructure::repositories::{
    GeminiRepository, GenerationRepository, InMemoryKeyValueStore, KeyValueStore, PgKeyValueStore,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting CVP Studio Backend on {}:{}",
        config.host,
        config.port
    );

    // Durable client store
    let store: Arc<dyn KeyValueStore> = match config.store_backend {
        StoreBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .ok_or("STORE_BACKEND=postgres requires DATABASE_URL")?;
            let pool = create_pool(database_url).await?;
            check_connection(&pool).await?;
            ensure_schema(&pool).await?;
            tracing::info!("PostgreSQL client store ready");
            Arc::new(PgKeyValueStore::new(Arc::new(pool)))
        }
        StoreBackend::Memory => {
            if !config.is_development() {
                tracing::warn!(
                    "Using in-memory client store outside development; quotas reset on restart"
                );
            }
            Arc::new(InMemoryKeyValueStore::new())
        }
    };

    let config = Arc::new(config);

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Instantiate repositories
    tracing::info!(
        text_model = %config.gemini_text_model,
        image_model = %config.gemini_image_model,
        "Instantiating Gemini repository..."
    );
    let generation_repo: Arc<dyn GenerationRepository> = Arc::new(GeminiRepository::new(
        config.gemini_base_url.clone(),
        config.gemini_api_key.clone(),
        config.gemini_text_model.clone(),
        config.gemini_image_model.clone(),
    ));

    // 2. Instantiate services
    tracing::info!(
        feature = FORGE_FEATURE_KEY,
        limit = config.forge_usage_limit,
        "Instantiating services..."
    );
    let forge_gate = Arc::new(UsageGate::new(
        FORGE_FEATURE_KEY,
        config.forge_usage_limit,
        store.clone(),
    ));
    let forge_service = Arc::new(ForgeService::new(forge_gate, generation_repo.clone()));
    let chat_service = Arc::new(ChatService::new(
        generation_repo.clone(),
        config.chat_session_idle,
    ));
    let weather_service = Arc::new(WeatherService::new(generation_repo));

    // Populate the weather board once at startup
    if config.weather_refresh_on_start {
        let weather_service = weather_service.clone();
        tokio::spawn(async move {
            match weather_service.refresh().await {
                Ok(outcome) => {
                    tracing::info!(updated = outcome.updated, "Initial weather refresh done")
                }
                Err(e) => tracing::warn!(error = %e, "Initial weather refresh skipped"),
            }
        });
    }

    // 3. Instantiate controllers
    tracing::info!("Instantiating controllers...");
    let forge_controller = Arc::new(ForgeController::new(forge_service));
    let chat_controller = Arc::new(ChatController::new(chat_service));
    let weather_controller = Arc::new(WeatherController::new(weather_service));

    let app = build_router(store, forge_controller, chat_controller, weather_controller);

    start_http_server(config, app).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cvp_studio_backend=debug,tower_http=debug".into());

    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}

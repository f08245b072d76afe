use axum::{http::HeaderName, middleware, routing::{get, post}, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::controllers::{
    chat::ChatController, forge::ForgeController, health, weather::WeatherController,
};
use crate::infrastructure::config::Config;
use crate::infrastructure::profile::request_id::X_REQUEST_ID;
use crate::infrastructure::profile::{profile_middleware, request_id_middleware, X_CLIENT_PROFILE};
use crate::infrastructure::repositories::KeyValueStore;

/// Assemble every route of the service
pub fn build_router(
    store: Arc<dyn KeyValueStore>,
    forge_controller: Arc<ForgeController>,
    chat_controller: Arc<ChatController>,
    weather_controller: Arc<WeatherController>,
) -> Router {
    // Forge routes (scoped by client profile)
    let forge_routes = Router::new()
        .route("/api/forge/quota", get(ForgeController::get_quota))
        .route("/api/forge/generate", post(ForgeController::generate))
        .with_state(forge_controller)
        .layer(middleware::from_fn(profile_middleware));

    // Chat routes (scoped by session id)
    let chat_routes = Router::new()
        .route("/api/chat/sessions", post(ChatController::create_session))
        .route(
            "/api/chat/sessions/:sessionId",
            get(ChatController::get_session),
        )
        .route(
            "/api/chat/sessions/:sessionId/messages",
            post(ChatController::send_message),
        )
        .with_state(chat_controller);

    // Weather routes (shared snapshot)
    let weather_routes = Router::new()
        .route("/api/weather", get(WeatherController::get_snapshot))
        .route("/api/weather/refresh", post(WeatherController::refresh))
        .with_state(weather_controller);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([
            HeaderName::from_static(X_CLIENT_PROFILE),
            HeaderName::from_static(X_REQUEST_ID),
        ]);

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(store)
        .merge(forge_routes)
        .merge(chat_routes)
        .merge(weather_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(middleware::from_fn(request_id_middleware)),
        )
}

/// Start the HTTP server with all routes configured
pub async fn start_http_server(
    config: Arc<Config>,
    app: Router,
) -> Result<(), Box<dyn std::error::Error>> {
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}

use anyhow::Result;
use axum::Router;
use cvp_studio_backend::{
    controllers::{chat::ChatController, forge::ForgeController, weather::WeatherController},
    domain::{
        chat::ChatService,
        forge::ForgeService,
        quota::{UsageGate, FORGE_FEATURE_KEY},
        weather::WeatherService,
    },
    infrastructure::{
        http::build_router,
        repositories::{GenerationRepository, InMemoryKeyValueStore, KeyValueStore},
    },
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

pub mod api_client;
pub mod fake_generation;

use api_client::TestClient;
use fake_generation::FakeGeneration;

pub const TEST_FORGE_LIMIT: u32 = 2;

pub struct TestContext {
    pub client: TestClient,
    pub store: Arc<dyn KeyValueStore>,
    pub generation: Arc<FakeGeneration>,
}

impl TestContext {
    pub async fn new() -> Result<Self> {
        Self::with_store(Arc::new(InMemoryKeyValueStore::new()))
            .await
    }

    pub async fn with_store(store: Arc<dyn KeyValueStore>) -> Result<Self> {
        let generation = Arc::new(FakeGeneration::default());
        let app = create_app(store.clone(), generation.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let base_url = format!("http://{}", addr);

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Ok(Self {
            client: TestClient::new(&base_url),
            store,
            generation,
        })
    }
}

fn create_app(store: Arc<dyn KeyValueStore>, generation: Arc<FakeGeneration>) -> Router {
    let generation_repo: Arc<dyn GenerationRepository> = generation;

    let gate = Arc::new(UsageGate::new(
        FORGE_FEATURE_KEY,
        TEST_FORGE_LIMIT,
        store.clone(),
    ));
    // No cosmetic timers in tests
    let forge_service = Arc::new(ForgeService::with_progress_schedule(
        gate,
        generation_repo.clone(),
        vec![],
    ));
    let chat_service = Arc::new(ChatService::new(
        generation_repo.clone(),
        Duration::from_secs(60),
    ));
    let weather_service = Arc::new(WeatherService::new(generation_repo));

    build_router(
        store,
        Arc::new(ForgeController::new(forge_service)),
        Arc::new(ChatController::new(chat_service)),
        Arc::new(WeatherController::new(weather_service)),
    )
}

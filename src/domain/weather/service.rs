use super::error::WeatherServiceError;
use super::model::WeatherSnapshot;
use super::parser::parse_readings;
use crate::infrastructure::repositories::GenerationRepository;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

const WEATHER_QUERY: &str = "Aja como um terminal meteorológico de alta precisão. \
Forneça a temperatura atual (número + °C) e a condição climática resumida para as principais \
capitais do Brasil (SP, RJ, MG, DF, BA, PR, RS, PE, CE, AM, SC, GO). \
Formate como uma lista CSV: Cidade,UF,Temperatura,Condição. \
Seja extremamente preciso com os dados de AGORA.";

#[derive(Debug, Clone)]
pub struct RefreshOutcome {
    pub snapshot: WeatherSnapshot,
    /// False when the call failed or nothing parsed and the previous
    /// snapshot was kept
    pub updated: bool,
}

pub struct WeatherService {
    generation_repo: Arc<dyn GenerationRepository>,
    snapshot: Arc<RwLock<WeatherSnapshot>>,
    refreshing: Arc<AtomicBool>,
}

struct RefreshGuard(Arc<AtomicBool>);

impl Drop for RefreshGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl WeatherService {
    pub fn new(generation_repo: Arc<dyn GenerationRepository>) -> Self {
        Self {
            generation_repo,
            snapshot: Arc::new(RwLock::new(WeatherSnapshot::default())),
            refreshing: Arc::new(AtomicBool::new(false)),
        }
    }

    fn begin_refresh(&self) -> Option<RefreshGuard> {
        self.refreshing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RefreshGuard(self.refreshing.clone()))
    }
}

#[async_trait]
pub trait WeatherServiceApi: Send + Sync {
    async fn current(&self) -> WeatherSnapshot;

    /// Query the model and replace the snapshot wholesale.
    ///
    /// If the call fails or no line parses, the previous snapshot (sources
    /// included) is kept untouched. Only one refresh runs at a time, and a
    /// started refresh always completes.
    async fn refresh(&self) -> Result<RefreshOutcome, WeatherServiceError>;
}

#[async_trait]
impl WeatherServiceApi for WeatherService {
    async fn current(&self) -> WeatherSnapshot {
        self.snapshot.read().await.clone()
    }

    async fn refresh(&self) -> Result<RefreshOutcome, WeatherServiceError> {
        let guard = self.begin_refresh().ok_or(WeatherServiceError::Busy)?;

        let generation_repo = self.generation_repo.clone();
        let snapshot = self.snapshot.clone();

        let task = tokio::spawn(async move {
            let _guard = guard;

            let generation = match generation_repo.grounded_query(WEATHER_QUERY).await {
                Ok(generation) => generation,
                Err(e) => {
                    let previous = snapshot.read().await.clone();
                    tracing::error!(
                        error = %e,
                        previous_empty = previous.is_empty(),
                        "Weather sync failed"
                    );
                    return RefreshOutcome {
                        snapshot: previous,
                        updated: false,
                    };
                }
            };

            let readings = generation
                .usable_text()
                .map(parse_readings)
                .unwrap_or_default();

            if readings.is_empty() {
                let previous = snapshot.read().await.clone();
                tracing::warn!(
                    has_text = generation.text.is_some(),
                    previous_empty = previous.is_empty(),
                    "Weather response had no parsable lines, keeping previous snapshot"
                );
                return RefreshOutcome {
                    snapshot: previous,
                    updated: false,
                };
            }

            let fresh = WeatherSnapshot {
                readings,
                sources: generation.sources,
                last_updated_at: Some(Utc::now()),
            };

            tracing::info!(
                city_count = fresh.readings.len(),
                source_count = fresh.sources.len(),
                "Weather snapshot replaced"
            );

            *snapshot.write().await = fresh.clone();

            RefreshOutcome {
                snapshot: fresh,
                updated: true,
            }
        });

        task.await.map_err(|e| {
            WeatherServiceError::Other(anyhow::anyhow!("weather refresh aborted: {}", e))
        })
    }
}

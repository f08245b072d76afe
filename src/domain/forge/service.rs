use super::error::ForgeServiceError;
use super::progress::{ProgressLog, ScheduledLines};
use crate::domain::generation::ImageRequest;
use crate::domain::quota::{Decision, QuotaState, UsageGate};
use crate::infrastructure::repositories::GenerationRepository;
use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

const PROMPT_PREAMBLE: &str = "High-end commercial photography, shot on RED camera, ultra-detailed, \
cinematic lighting, futuristic industrial aesthetic: ";
const IMAGE_MIME_TYPE: &str = "image/jpeg";
const IMAGE_ASPECT_RATIO: &str = "1:1";

const LOG_START: &str = "Iniciando síntese neural...";
const LOG_SUCCESS: &str = "Ativo gerado com sucesso.";
const LOG_EMPTY: &str = "ERRO: Falha na síntese de imagem.";
const LOG_FAILURE: &str = "FALHA CRÍTICA: Interrupção no kernel.";

/// Cosmetic progress lines shown while the image is rendered
pub const PROGRESS_SCHEDULE: [(Duration, &str); 2] = [
    (Duration::from_millis(1000), "Injetando parâmetros 8K..."),
    (Duration::from_millis(2500), "Renderizando texturas elite..."),
];

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ForgeOutcome {
    Generated {
        image_url: String,
        quota: QuotaState,
        logs: Vec<String>,
    },
    /// Quota exhausted; the model was not contacted
    Denied {
        quota: QuotaState,
        message: String,
        logs: Vec<String>,
    },
    /// The model failed or returned no image; nothing was charged
    GenerationFailed {
        quota: QuotaState,
        logs: Vec<String>,
    },
}

impl ForgeOutcome {
    pub fn quota(&self) -> &QuotaState {
        match self {
            ForgeOutcome::Generated { quota, .. }
            | ForgeOutcome::Denied { quota, .. }
            | ForgeOutcome::GenerationFailed { quota, .. } => quota,
        }
    }
}

/// Removes the profile from the in-flight set when the generation ends
struct InFlightGuard {
    in_flight: Arc<Mutex<HashSet<Uuid>>>,
    profile_id: Uuid,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.in_flight
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&self.profile_id);
    }
}

pub struct ForgeService {
    gate: Arc<UsageGate>,
    generation_repo: Arc<dyn GenerationRepository>,
    in_flight: Arc<Mutex<HashSet<Uuid>>>,
    progress_schedule: Vec<(Duration, &'static str)>,
}

impl ForgeService {
    pub fn new(gate: Arc<UsageGate>, generation_repo: Arc<dyn GenerationRepository>) -> Self {
        Self::with_progress_schedule(gate, generation_repo, PROGRESS_SCHEDULE.to_vec())
    }

    pub fn with_progress_schedule(
        gate: Arc<UsageGate>,
        generation_repo: Arc<dyn GenerationRepository>,
        progress_schedule: Vec<(Duration, &'static str)>,
    ) -> Self {
        Self {
            gate,
            generation_repo,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
            progress_schedule,
        }
    }

    fn acquire(&self, profile_id: Uuid) -> Option<InFlightGuard> {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        if !in_flight.insert(profile_id) {
            return None;
        }
        Some(InFlightGuard {
            in_flight: self.in_flight.clone(),
            profile_id,
        })
    }

    fn upsell_message(&self) -> String {
        format!(
            "Você atingiu o limite de demonstração de {} imagens. \
             Para uso ilimitado e alta resolução, fale com nosso engenheiro.",
            self.gate.limit()
        )
    }
}

#[async_trait]
pub trait ForgeServiceApi: Send + Sync {
    async fn quota(&self, profile_id: Uuid) -> QuotaState;

    /// Generate one image for a profile.
    ///
    /// This operation:
    /// - Rejects a second concurrent request from the same profile
    /// - Asks the usage gate first and never calls the model when denied
    /// - Charges the quota only when an image actually came back
    ///
    /// Once the model call starts it runs to completion even if the caller
    /// goes away; the cosmetic progress timers do not.
    async fn generate(
        &self,
        profile_id: Uuid,
        prompt: String,
    ) -> Result<ForgeOutcome, ForgeServiceError>;
}

#[async_trait]
impl ForgeServiceApi for ForgeService {
    async fn quota(&self, profile_id: Uuid) -> QuotaState {
        self.gate.initialize(profile_id).await
    }

    async fn generate(
        &self,
        profile_id: Uuid,
        prompt: String,
    ) -> Result<ForgeOutcome, ForgeServiceError> {
        let guard = self.acquire(profile_id).ok_or(ForgeServiceError::Busy)?;
        let log = ProgressLog::new();

        if self.gate.attempt(profile_id).await == Decision::Denied {
            let quota = self.gate.initialize(profile_id).await;
            log.push(&format!(
                "ERRO: Limite de cota atingido ({}/{}).",
                quota.used, quota.limit
            ));
            tracing::info!(
                profile_id = %profile_id,
                used = quota.used,
                limit = quota.limit,
                "Forge request denied, quota exhausted"
            );
            return Ok(ForgeOutcome::Denied {
                quota,
                message: self.upsell_message(),
                logs: log.lines(),
            });
        }

        let prompt = prompt.trim().to_string();
        if prompt.is_empty() {
            return Err(ForgeServiceError::Invalid(
                "Prompt cannot be empty".to_string(),
            ));
        }

        tracing::info!(
            profile_id = %profile_id,
            prompt_length = prompt.len(),
            "Forge generation started"
        );

        log.push(LOG_START);
        let scheduled = ScheduledLines::schedule(&log, &self.progress_schedule);

        let gate = self.gate.clone();
        let generation_repo = self.generation_repo.clone();
        let task_log = log.clone();
        let task_timers = scheduled.clone();

        let task = tokio::spawn(async move {
            let _guard = guard;
            let request = ImageRequest {
                prompt: format!("{}{}", PROMPT_PREAMBLE, prompt),
                mime_type: IMAGE_MIME_TYPE.to_string(),
                aspect_ratio: IMAGE_ASPECT_RATIO.to_string(),
            };

            let result = generation_repo.generate_image(request).await;
            task_timers.cancel();

            match result {
                Ok(Some(image)) => {
                    let recorded = gate.record_success(profile_id).await;
                    recorded.map(|quota| {
                        task_log.finish(LOG_SUCCESS);
                        (Some(image.data_url()), quota)
                    })
                }
                Ok(None) => {
                    tracing::warn!(profile_id = %profile_id, "Image generation returned no image");
                    task_log.finish(LOG_EMPTY);
                    Ok((None, gate.initialize(profile_id).await))
                }
                Err(e) => {
                    tracing::error!(
                        profile_id = %profile_id,
                        error = %e,
                        "Image generation failed"
                    );
                    task_log.finish(LOG_FAILURE);
                    Ok((None, gate.initialize(profile_id).await))
                }
            }
        });

        let joined = task.await;
        drop(scheduled);

        let (image_url, quota) = joined
            .map_err(|e| {
                ForgeServiceError::Other(anyhow::anyhow!("forge task aborted: {}", e))
            })?
            .map_err(ForgeServiceError::from)?;

        let outcome = match image_url {
            Some(image_url) => ForgeOutcome::Generated {
                image_url,
                quota,
                logs: log.lines(),
            },
            None => ForgeOutcome::GenerationFailed {
                quota,
                logs: log.lines(),
            },
        };

        tracing::info!(
            profile_id = %profile_id,
            used = outcome.quota().used,
            remaining = outcome.quota().remaining,
            generated = matches!(outcome, ForgeOutcome::Generated { .. }),
            "Forge generation finished"
        );

        Ok(outcome)
    }
}

use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    domain::{
        forge::{ForgeOutcome, ForgeService, ForgeServiceApi},
        quota::{QuotaState, UsagePhase},
    },
    error::{AppError, AppResult},
    infrastructure::profile::ClientProfile,
};

/// Request for POST /api/forge/generate
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
}

/// Response for GET /api/forge/quota
#[derive(Debug, Serialize, Deserialize)]
pub struct QuotaResponse {
    #[serde(flatten)]
    pub quota: QuotaState,
    pub phase: UsagePhase,
}

pub struct ForgeController {
    forge_service: Arc<ForgeService>,
}

impl ForgeController {
    pub fn new(forge_service: Arc<ForgeService>) -> Self {
        Self { forge_service }
    }

    /// GET /api/forge/quota - Current quota of the calling profile
    pub async fn get_quota(
        State(controller): State<Arc<ForgeController>>,
        Extension(profile): Extension<ClientProfile>,
    ) -> AppResult<Json<QuotaResponse>> {
        let quota = controller.forge_service.quota(profile.profile_id).await;
        Ok(Json(QuotaResponse {
            phase: quota.phase(),
            quota,
        }))
    }

    /// POST /api/forge/generate - Generate one image against the profile's quota
    ///
    /// 200 with the image, 402 when the quota is exhausted, 502 when the
    /// model produced nothing. All three carry the quota state.
    pub async fn generate(
        State(controller): State<Arc<ForgeController>>,
        Extension(profile): Extension<ClientProfile>,
        Json(request): Json<GenerateRequest>,
    ) -> AppResult<(StatusCode, Json<ForgeOutcome>)> {
        if request.prompt.chars().count() > 2000 {
            return Err(AppError::BadRequest(
                "Prompt must be 2,000 characters or less".to_string(),
            ));
        }

        let outcome = controller
            .forge_service
            .generate(profile.profile_id, request.prompt)
            .await
            .map_err(AppError::from)?;

        let status = match outcome {
            ForgeOutcome::Generated { .. } => StatusCode::OK,
            ForgeOutcome::Denied { .. } => StatusCode::PAYMENT_REQUIRED,
            ForgeOutcome::GenerationFailed { .. } => StatusCode::BAD_GATEWAY,
        };

        Ok((status, Json(outcome)))
    }
}

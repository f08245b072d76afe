use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    domain::weather::{WeatherService, WeatherServiceApi, WeatherSnapshot},
    error::{AppError, AppResult},
};

#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub updated: bool,
    pub snapshot: WeatherSnapshot,
}

pub struct WeatherController {
    weather_service: Arc<WeatherService>,
}

impl WeatherController {
    pub fn new(weather_service: Arc<WeatherService>) -> Self {
        Self { weather_service }
    }

    /// GET /api/weather - Latest snapshot
    pub async fn get_snapshot(
        State(controller): State<Arc<WeatherController>>,
    ) -> AppResult<Json<WeatherSnapshot>> {
        Ok(Json(controller.weather_service.current().await))
    }

    /// POST /api/weather/refresh - Re-query and replace the snapshot
    pub async fn refresh(
        State(controller): State<Arc<WeatherController>>,
    ) -> AppResult<Json<RefreshResponse>> {
        let outcome = controller
            .weather_service
            .refresh()
            .await
            .map_err(AppError::from)?;

        Ok(Json(RefreshResponse {
            updated: outcome.updated,
            snapshot: outcome.snapshot,
        }))
    }
}

use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum WeatherServiceError {
    #[error("a weather refresh is already running")]
    Busy,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<WeatherServiceError> for AppError {
    fn from(err: WeatherServiceError) -> Self {
        match err {
            WeatherServiceError::Busy => AppError::Conflict(err.to_string()),
            WeatherServiceError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}

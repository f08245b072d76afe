use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum ForgeServiceError {
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("an image is already being generated for this profile")]
    Busy,
    #[error("dependency error: {0}")]
    Dependency(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<AppError> for ForgeServiceError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::BadRequest(msg) => ForgeServiceError::Invalid(msg),
            _ => ForgeServiceError::Dependency(err.to_string()),
        }
    }
}

impl From<ForgeServiceError> for AppError {
    fn from(err: ForgeServiceError) -> Self {
        match err {
            ForgeServiceError::Invalid(msg) => AppError::BadRequest(msg),
            ForgeServiceError::Busy => AppError::Conflict(err.to_string()),
            ForgeServiceError::Dependency(msg) => AppError::Storage(msg),
            ForgeServiceError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}

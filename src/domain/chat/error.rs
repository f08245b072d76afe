use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum ChatServiceError {
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("chat session not found")]
    NotFound,
    #[error("a reply is already being generated for this session")]
    Busy,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<ChatServiceError> for AppError {
    fn from(err: ChatServiceError) -> Self {
        match err {
            ChatServiceError::Invalid(msg) => AppError::BadRequest(msg),
            ChatServiceError::NotFound => AppError::NotFound("Chat session".to_string()),
            ChatServiceError::Busy => AppError::Conflict(err.to_string()),
            ChatServiceError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}

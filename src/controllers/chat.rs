use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::chat::{ChatService, ChatServiceApi, Message},
    error::{AppError, AppResult},
};

/// Request for POST /api/chat/sessions/:sessionId/messages
#[derive(Debug, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub messages: Vec<Message>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TurnResponse {
    pub reply: Message,
    pub fallback: bool,
    pub messages: Vec<Message>,
}

pub struct ChatController {
    chat_service: Arc<ChatService>,
}

impl ChatController {
    pub fn new(chat_service: Arc<ChatService>) -> Self {
        Self { chat_service }
    }

    /// POST /api/chat/sessions - Open a conversation
    pub async fn create_session(
        State(controller): State<Arc<ChatController>>,
    ) -> AppResult<(StatusCode, Json<SessionResponse>)> {
        let (session_id, messages) = controller.chat_service.create_session().await;
        Ok((
            StatusCode::CREATED,
            Json(SessionResponse {
                session_id,
                messages,
            }),
        ))
    }

    /// GET /api/chat/sessions/:sessionId - Conversation history
    pub async fn get_session(
        State(controller): State<Arc<ChatController>>,
        Path(session_id): Path<Uuid>,
    ) -> AppResult<Json<SessionResponse>> {
        let messages = controller
            .chat_service
            .get_history(session_id)
            .await
            .map_err(AppError::from)?;

        Ok(Json(SessionResponse {
            session_id,
            messages,
        }))
    }

    /// POST /api/chat/sessions/:sessionId/messages - Run one turn
    pub async fn send_message(
        State(controller): State<Arc<ChatController>>,
        Path(session_id): Path<Uuid>,
        Json(request): Json<SendMessageRequest>,
    ) -> AppResult<Json<TurnResponse>> {
        if request.text.chars().count() > 4000 {
            return Err(AppError::BadRequest(
                "Message must be 4,000 characters or less".to_string(),
            ));
        }

        let result = controller
            .chat_service
            .send_message(session_id, request.text)
            .await
            .map_err(AppError::from)?;

        Ok(Json(TurnResponse {
            reply: result.reply,
            fallback: result.fallback,
            messages: result.messages,
        }))
    }
}

use super::conversation::{ConversationLog, Message};
use super::error::ChatServiceError;
use crate::domain::generation::ChatCompletionRequest;
use crate::infrastructure::repositories::GenerationRepository;
use async_trait::async_trait;
use moka::future::Cache;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use uuid::Uuid;

const SYSTEM_INSTRUCTION: &str = "Você é o estrategista digital exclusivo de Carlos Vitor Porto. \
Carlos é um Arquiteto de Soluções World Class em Engenharia de Software e Design de Sistemas. \
Suas respostas devem ser curtas, sofisticadas e profissionais. \
Foque em escalabilidade, design premium e performance. \
Ao final de consultas produtivas, sugira sempre falar no WhatsApp para agendar uma consultoria estratégica.";

const TEMPERATURE: f32 = 0.6;
const MAX_SESSIONS: u64 = 10_000;

#[derive(Debug, Clone)]
pub struct ChatTurnResult {
    pub reply: Message,
    /// True when the reply is the fallback text
    pub fallback: bool,
    pub messages: Vec<Message>,
}

struct ChatSession {
    log: Mutex<ConversationLog>,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag when the turn ends, however it ends
struct InFlightGuard(Arc<ChatSession>);

impl InFlightGuard {
    fn acquire(session: Arc<ChatSession>) -> Option<Self> {
        session
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(session))
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.in_flight.store(false, Ordering::Release);
    }
}

pub struct ChatService {
    generation_repo: Arc<dyn GenerationRepository>,
    sessions: Cache<Uuid, Arc<ChatSession>>,
}

impl ChatService {
    pub fn new(generation_repo: Arc<dyn GenerationRepository>, session_idle: Duration) -> Self {
        let sessions = Cache::builder()
            .max_capacity(MAX_SESSIONS)
            .time_to_idle(session_idle)
            .build();

        Self {
            generation_repo,
            sessions,
        }
    }

    async fn find_session(&self, session_id: Uuid) -> Result<Arc<ChatSession>, ChatServiceError> {
        self.sessions
            .get(&session_id)
            .await
            .ok_or(ChatServiceError::NotFound)
    }
}

#[async_trait]
pub trait ChatServiceApi: Send + Sync {
    /// Open a new conversation seeded with the introductory message
    async fn create_session(&self) -> (Uuid, Vec<Message>);

    /// Current history of a conversation
    async fn get_history(&self, session_id: Uuid) -> Result<Vec<Message>, ChatServiceError>;

    /// Run one turn:
    /// - Appends the user message right away
    /// - Sends the whole history to the model
    /// - Appends exactly one model message, the fallback text on failure
    ///
    /// Only one turn per session may be in flight. Once the user message is
    /// accepted the turn completes even if the caller goes away.
    async fn send_message(
        &self,
        session_id: Uuid,
        text: String,
    ) -> Result<ChatTurnResult, ChatServiceError>;
}

#[async_trait]
impl ChatServiceApi for ChatService {
    async fn create_session(&self) -> (Uuid, Vec<Message>) {
        let session_id = Uuid::new_v4();
        let log = ConversationLog::new();
        let messages = log.messages().to_vec();

        self.sessions
            .insert(
                session_id,
                Arc::new(ChatSession {
                    log: Mutex::new(log),
                    in_flight: AtomicBool::new(false),
                }),
            )
            .await;

        tracing::info!(session_id = %session_id, "Chat session created");

        (session_id, messages)
    }

    async fn get_history(&self, session_id: Uuid) -> Result<Vec<Message>, ChatServiceError> {
        let session = self.find_session(session_id).await?;
        let log = session.log.lock().await;
        Ok(log.messages().to_vec())
    }

    async fn send_message(
        &self,
        session_id: Uuid,
        text: String,
    ) -> Result<ChatTurnResult, ChatServiceError> {
        let session = self.find_session(session_id).await?;
        let guard = InFlightGuard::acquire(session.clone()).ok_or(ChatServiceError::Busy)?;

        let history = {
            let mut log = session.log.lock().await;
            if !log.append_user_turn(&text) {
                return Err(ChatServiceError::Invalid(
                    "Message cannot be empty".to_string(),
                ));
            }
            log.messages().to_vec()
        };

        tracing::info!(
            session_id = %session_id,
            history_length = history.len(),
            "Chat turn started"
        );

        let generation_repo = self.generation_repo.clone();
        let turn = tokio::spawn(async move {
            let _guard = guard;
            let request = ChatCompletionRequest {
                system_instruction: SYSTEM_INSTRUCTION.to_string(),
                temperature: TEMPERATURE,
                history,
            };

            let reply = match generation_repo.chat(request).await {
                Ok(generation) => generation.usable_text().map(str::to_string),
                Err(e) => {
                    tracing::warn!(
                        session_id = %session_id,
                        error = %e,
                        "Chat generation failed, using fallback reply"
                    );
                    None
                }
            };

            let mut log = session.log.lock().await;
            let fallback = reply.is_none();
            let reply = log.append_model_turn(reply.as_deref()).clone();

            ChatTurnResult {
                reply,
                fallback,
                messages: log.messages().to_vec(),
            }
        });

        let result = turn
            .await
            .map_err(|e| ChatServiceError::Other(anyhow::anyhow!("chat turn aborted: {}", e)))?;

        tracing::info!(
            session_id = %session_id,
            fallback = result.fallback,
            message_count = result.messages.len(),
            "Chat turn completed"
        );

        Ok(result)
    }
}

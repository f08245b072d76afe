use serde::{Deserialize, Serialize};

/// Fixed introduction every conversation starts with
pub const SEED_MESSAGE: &str = "Saudações. Sou o arquiteto cognitivo de Carlos Vitor Porto. \
Como posso auxiliar na evolução tecnológica e estratégica do seu negócio hoje?";

/// Reply used whenever the model fails or answers with nothing
pub const FALLBACK_REPLY: &str = "Estou otimizando meus sistemas de IA. \
Fale com Carlos diretamente pelo WhatsApp para agilidade máxima.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn model(content: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            content: content.into(),
        }
    }
}

/// Append-only message history of one chat session.
///
/// Starts with the seed message. Role alternation is not enforced here; the
/// service guarantees one model entry per accepted user entry.
#[derive(Debug, Clone)]
pub struct ConversationLog {
    messages: Vec<Message>,
}

impl Default for ConversationLog {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationLog {
    pub fn new() -> Self {
        Self {
            messages: vec![Message::model(SEED_MESSAGE)],
        }
    }

    /// Append a user message. Blank input is ignored and `false` returned.
    pub fn append_user_turn(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        self.messages.push(Message::user(text));
        true
    }

    /// Append exactly one model entry, substituting the fallback text when
    /// `reply` is absent or blank. Returns the appended message.
    pub fn append_model_turn(&mut self, reply: Option<&str>) -> &Message {
        let content = reply
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(FALLBACK_REPLY);
        self.messages.push(Message::model(content));
        &self.messages[self.messages.len() - 1]
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

//! Payload types exchanged with the external generation service.
//!
//! The service is opaque: any call may fail or come back without a usable
//! payload, and callers treat both cases the same way.

use crate::domain::chat::Message;
use serde::{Deserialize, Serialize};

/// A web citation attached to a grounded answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub uri: String,
    pub title: String,
}

/// Multi-turn chat request. The service is stateless, so the full history
/// is sent on every call.
#[derive(Debug, Clone)]
pub struct ChatCompletionRequest {
    pub system_instruction: String,
    pub temperature: f32,
    pub history: Vec<Message>,
}

/// Result of a text call. `text` is `None` when the service answered without
/// any text part.
#[derive(Debug, Clone, Default)]
pub struct TextGeneration {
    pub text: Option<String>,
    pub sources: Vec<Source>,
}

impl TextGeneration {
    /// Text that is present and not blank
    pub fn usable_text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.trim().is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct ImageRequest {
    pub prompt: String,
    pub mime_type: String,
    pub aspect_ratio: String,
}

/// One encoded image as returned by the service
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedImage {
    pub mime_type: String,
    pub base64_data: String,
}

impl GeneratedImage {
    /// Render as a `data:` URL usable directly in an `<img src>`
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64_data)
    }
}

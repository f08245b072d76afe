use crate::domain::generation::{
    ChatCompletionRequest, GeneratedImage, ImageRequest, TextGeneration,
};
use async_trait::async_trait;

/// Repository for calls to the hosted generative model.
/// Abstracts the underlying provider (Gemini today).
///
/// Implementations return `Err` when the call itself fails (transport,
/// HTTP status, undecodable body). A call that succeeds without a payload
/// is returned as `Ok` with an empty result; callers decide what counts as
/// usable.
#[async_trait]
pub trait GenerationRepository: Send + Sync {
    /// Multi-turn chat: ordered history in, single text reply out
    async fn chat(&self, request: ChatCompletionRequest) -> Result<TextGeneration, String>;

    /// Free-text query answered with search grounding; returns cited sources
    async fn grounded_query(&self, query: &str) -> Result<TextGeneration, String>;

    /// Image synthesis: prompt in, at most one encoded image out
    async fn generate_image(&self, request: ImageRequest) -> Result<Option<GeneratedImage>, String>;
}

use async_trait::async_trait;
use cvp_studio_backend::domain::generation::{
    ChatCompletionRequest, GeneratedImage, ImageRequest, Source, TextGeneration,
};
use cvp_studio_backend::infrastructure::repositories::GenerationRepository;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Scripted stand-in for the hosted model.
///
/// Each call shape pops its next outcome from its own queue; an empty queue
/// behaves like a call that succeeded without payload.
#[derive(Default)]
pub struct FakeGeneration {
    chat: Mutex<VecDeque<Result<Option<String>, String>>>,
    search: Mutex<VecDeque<Result<TextGeneration, String>>>,
    images: Mutex<VecDeque<Result<Option<GeneratedImage>, String>>>,
    delay: Mutex<Option<Duration>>,
    pub image_calls: AtomicUsize,
    pub chat_calls: AtomicUsize,
    pub search_calls: AtomicUsize,
}

impl FakeGeneration {
    pub fn push_chat(&self, outcome: Result<Option<String>, String>) {
        self.chat.lock().unwrap().push_back(outcome);
    }

    pub fn push_search_text(&self, text: &str, sources: &[(&str, &str)]) {
        self.search.lock().unwrap().push_back(Ok(TextGeneration {
            text: Some(text.to_string()),
            sources: sources
                .iter()
                .map(|(uri, title)| Source {
                    uri: uri.to_string(),
                    title: title.to_string(),
                })
                .collect(),
        }));
    }

    pub fn push_search_error(&self, error: &str) {
        self.search
            .lock()
            .unwrap()
            .push_back(Err(error.to_string()));
    }

    pub fn push_image(&self, base64_data: &str) {
        let image = GeneratedImage {
            mime_type: "image/jpeg".to_string(),
            base64_data: base64_data.to_string(),
        };
        self.images.lock().unwrap().push_back(Ok(Some(image)));
    }

    pub fn push_image_outcome(&self, outcome: Result<Option<GeneratedImage>, String>) {
        self.images.lock().unwrap().push_back(outcome);
    }

    /// Make every following call wait before answering
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    async fn wait(&self) {
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    pub fn image_calls(&self) -> usize {
        self.image_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerationRepository for FakeGeneration {
    async fn chat(&self, _request: ChatCompletionRequest) -> Result<TextGeneration, String> {
        self.chat_calls.fetch_add(1, Ordering::SeqCst);
        self.wait().await;
        let outcome = self.chat.lock().unwrap().pop_front().unwrap_or(Ok(None));
        outcome.map(|text| TextGeneration {
            text,
            sources: vec![],
        })
    }

    async fn grounded_query(&self, _query: &str) -> Result<TextGeneration, String> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.wait().await;
        self.search
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(TextGeneration::default()))
    }

    async fn generate_image(
        &self,
        _request: ImageRequest,
    ) -> Result<Option<GeneratedImage>, String> {
        self.image_calls.fetch_add(1, Ordering::SeqCst);
        self.wait().await;
        self.images.lock().unwrap().pop_front().unwrap_or(Ok(None))
    }
}

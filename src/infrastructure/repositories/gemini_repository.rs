use super::generation_repository::GenerationRepository;
use crate::domain::chat::{Message, Role};
use crate::domain::generation::{
    ChatCompletionRequest, GeneratedImage, ImageRequest, Source, TextGeneration,
};
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Gemini REST implementation of the generation repository
pub struct GeminiRepository {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    text_model: String,
    image_model: String,
}

impl GeminiRepository {
    pub fn new(base_url: String, api_key: String, text_model: String, image_model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            text_model,
            image_model,
        }
    }

    fn endpoint(&self, model: &str, method: &str) -> String {
        format!("{}/models/{}:{}", self.base_url, model, method)
    }

    async fn post_json<B: Serialize, R: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<R, String> {
        let start_time = std::time::Instant::now();

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, url = %url, "Gemini request failed");
                format!("Gemini request error: {}", e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let preview: String = error_text.chars().take(500).collect();
            tracing::error!(
                status = %status,
                url = %url,
                body = %preview,
                "Gemini returned error status"
            );
            return Err(format!("Gemini API error ({}): {}", status, error_text));
        }

        let parsed = response.json::<R>().await.map_err(|e| {
            tracing::error!(error = %e, url = %url, "Failed to decode Gemini response");
            format!("Gemini decode error: {}", e)
        })?;

        tracing::info!(
            provider = "gemini",
            url = %url,
            latency_ms = start_time.elapsed().as_millis(),
            "Gemini call completed"
        );

        Ok(parsed)
    }
}

// ---- wire types ----

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Tool>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct Tool {
    google_search: GoogleSearch,
}

#[derive(Debug, Serialize)]
struct GoogleSearch {}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct GroundingChunk {
    #[serde(default)]
    web: Option<WebChunk>,
}

#[derive(Debug, Deserialize)]
struct WebChunk {
    #[serde(default)]
    uri: String,
    #[serde(default)]
    title: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PredictRequest {
    instances: Vec<PredictInstance>,
    parameters: PredictParameters,
}

#[derive(Debug, Serialize)]
struct PredictInstance {
    prompt: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PredictParameters {
    sample_count: u32,
    aspect_ratio: String,
    output_options: OutputOptions,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OutputOptions {
    mime_type: String,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    #[serde(default)]
    bytes_base64_encoded: Option<String>,
    #[serde(default)]
    mime_type: Option<String>,
}

fn to_content(message: &Message) -> Content {
    let role = match message.role {
        Role::User => "user",
        Role::Model => "model",
    };
    Content {
        role: Some(role.to_string()),
        parts: vec![Part {
            text: Some(message.content.clone()),
        }],
    }
}

fn text_part(text: &str) -> Content {
    Content {
        role: None,
        parts: vec![Part {
            text: Some(text.to_string()),
        }],
    }
}

/// Concatenate the text parts of the first candidate and collect its web citations
fn into_text_generation(response: GenerateContentResponse) -> TextGeneration {
    let Some(candidate) = response.candidates.into_iter().next() else {
        return TextGeneration::default();
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    let sources = candidate
        .grounding_metadata
        .map(|m| {
            m.grounding_chunks
                .into_iter()
                .filter_map(|chunk| chunk.web)
                .map(|web| Source {
                    uri: web.uri,
                    title: web.title,
                })
                .collect()
        })
        .unwrap_or_default();

    TextGeneration {
        text: if text.is_empty() { None } else { Some(text) },
        sources,
    }
}

fn into_generated_image(response: PredictResponse, requested_mime: &str) -> Option<GeneratedImage> {
    response
        .predictions
        .into_iter()
        .find_map(|p| match p.bytes_base64_encoded {
            Some(data) if !data.is_empty() => Some(GeneratedImage {
                mime_type: p.mime_type.unwrap_or_else(|| requested_mime.to_string()),
                base64_data: data,
            }),
            _ => None,
        })
}

#[async_trait]
impl GenerationRepository for GeminiRepository {
    async fn chat(&self, request: ChatCompletionRequest) -> Result<TextGeneration, String> {
        tracing::info!(
            model = %self.text_model,
            history_length = request.history.len(),
            "Calling Gemini chat"
        );

        let body = GenerateContentRequest {
            contents: request.history.iter().map(to_content).collect(),
            system_instruction: Some(text_part(&request.system_instruction)),
            generation_config: Some(GenerationConfig {
                temperature: request.temperature,
            }),
            tools: vec![],
        };

        let url = self.endpoint(&self.text_model, "generateContent");
        let response: GenerateContentResponse = self.post_json(&url, &body).await?;
        Ok(into_text_generation(response))
    }

    async fn grounded_query(&self, query: &str) -> Result<TextGeneration, String> {
        tracing::info!(
            model = %self.text_model,
            query_length = query.len(),
            "Calling Gemini grounded query"
        );

        let body = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(query.to_string()),
                }],
            }],
            system_instruction: None,
            generation_config: None,
            tools: vec![Tool {
                google_search: GoogleSearch {},
            }],
        };

        let url = self.endpoint(&self.text_model, "generateContent");
        let response: GenerateContentResponse = self.post_json(&url, &body).await?;
        Ok(into_text_generation(response))
    }

    async fn generate_image(
        &self,
        request: ImageRequest,
    ) -> Result<Option<GeneratedImage>, String> {
        tracing::info!(
            model = %self.image_model,
            prompt_length = request.prompt.len(),
            "Calling Imagen"
        );

        let body = PredictRequest {
            instances: vec![PredictInstance {
                prompt: request.prompt.clone(),
            }],
            parameters: PredictParameters {
                sample_count: 1,
                aspect_ratio: request.aspect_ratio.clone(),
                output_options: OutputOptions {
                    mime_type: request.mime_type.clone(),
                },
            },
        };

        let url = self.endpoint(&self.image_model, "predict");
        let response: PredictResponse = self.post_json(&url, &body).await?;
        Ok(into_generated_image(response, &request.mime_type))
    }
}

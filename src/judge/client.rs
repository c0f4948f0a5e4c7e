use std::sync::Arc;

use async_openai::types::chat::CreateChatCompletionRequest;
use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose};
use genai::chat::{ChatMessage, ChatRequest, ContentPart};
use serde::Deserialize;
use tracing::debug;

use super::error::TransportError;
use crate::constants::{JUDGE_MAX_TOKENS, JUDGE_TEMPERATURE};

#[async_trait]
/// Transport to one external judge.
pub trait JudgeClient: Send + Sync {
    /// Sends `prompt` (and `image`, when given) and returns the judge's raw answer text.
    async fn ask(&self, prompt: &str, image: Option<&[u8]>) -> Result<String, TransportError>;
}

/// Where and how OpenRouter-style chat completion calls are made.
#[derive(Clone)]
pub struct JudgeEndpoint {
    pub base_url: String,
    pub api_key: String,
    pub site_url: String,
    pub site_name: String,
}

impl std::fmt::Debug for JudgeEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JudgeEndpoint")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("site_url", &self.site_url)
            .field("site_name", &self.site_name)
            .finish()
    }
}

impl JudgeEndpoint {
    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

/// Judge reached over an OpenAI-compatible HTTP JSON chat API (OpenRouter by default).
#[derive(Debug, Clone)]
pub struct OpenRouterJudgeClient {
    http: reqwest::Client,
    endpoint: Arc<JudgeEndpoint>,
    model: String,
}

impl OpenRouterJudgeClient {
    pub fn new(http: reqwest::Client, endpoint: Arc<JudgeEndpoint>, model: impl Into<String>) -> Self {
        Self {
            http,
            endpoint,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn build_request(
        &self,
        prompt: &str,
        image: Option<&[u8]>,
    ) -> Result<CreateChatCompletionRequest, TransportError> {
        let mut content = vec![serde_json::json!({ "type": "text", "text": prompt })];
        if let Some(bytes) = image {
            content.push(serde_json::json!({
                "type": "image_url",
                "image_url": { "url": image_data_url(bytes) },
            }));
        }

        let request_value = serde_json::json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": content }],
            "max_tokens": JUDGE_MAX_TOKENS,
            "temperature": JUDGE_TEMPERATURE,
        });

        serde_json::from_value(request_value).map_err(|e| TransportError::InvalidRequest {
            reason: e.to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct CompletionEnvelope {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl JudgeClient for OpenRouterJudgeClient {
    async fn ask(&self, prompt: &str, image: Option<&[u8]>) -> Result<String, TransportError> {
        let request = self.build_request(prompt, image)?;

        debug!(model = %self.model, with_image = image.is_some(), "Calling judge");

        let resp = self
            .http
            .post(self.endpoint.completions_url())
            .bearer_auth(&self.endpoint.api_key)
            .header("HTTP-Referer", &self.endpoint.site_url)
            .header("X-Title", &self.endpoint.site_name)
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: CompletionEnvelope = resp.json().await?;
        extract_content(envelope)
    }
}

fn extract_content(envelope: CompletionEnvelope) -> Result<String, TransportError> {
    if let Some(error) = envelope.error {
        return Err(TransportError::Provider {
            reason: error.to_string(),
        });
    }

    envelope
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| TransportError::InvalidBody {
            reason: "response has no message content".to_string(),
        })
}

/// Judge reached through the provider's native API (keys resolved by `genai` from the
/// environment). Images travel as base64 binary parts next to the prompt.
#[derive(Clone)]
pub struct GenaiJudgeClient {
    client: genai::Client,
    model: String,
}

impl std::fmt::Debug for GenaiJudgeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenaiJudgeClient")
            .field("model", &self.model)
            .finish()
    }
}

impl GenaiJudgeClient {
    pub fn new(client: genai::Client, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    pub fn build_request(&self, prompt: &str, image: Option<&[u8]>) -> ChatRequest {
        let mut parts = vec![ContentPart::from_text(prompt)];
        if let Some(bytes) = image {
            debug!(model = %self.model, bytes = bytes.len(), "Attaching image");
            parts.push(ContentPart::from_binary_base64(
                image_mime(bytes),
                general_purpose::STANDARD.encode(bytes),
                None,
            ));
        }
        ChatRequest::new(vec![ChatMessage::user(parts)])
    }
}

#[async_trait]
impl JudgeClient for GenaiJudgeClient {
    async fn ask(&self, prompt: &str, image: Option<&[u8]>) -> Result<String, TransportError> {
        let request = self.build_request(prompt, image);
        let response = self.client.exec_chat(&self.model, request, None).await?;

        response
            .first_text()
            .map(|text| text.to_string())
            .ok_or_else(|| TransportError::InvalidBody {
                reason: "response has no text content".to_string(),
            })
    }
}

/// Image MIME type sniffed from the content; `image/jpeg` when unrecognized.
pub fn image_mime(bytes: &[u8]) -> &'static str {
    infer::get(bytes)
        .map(|kind| kind.mime_type())
        .filter(|mime| mime.starts_with("image/"))
        .unwrap_or("image/jpeg")
}

/// Encodes image bytes as a `data:` URL.
pub fn image_data_url(bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        image_mime(bytes),
        general_purpose::STANDARD.encode(bytes)
    )
}

#[cfg(test)]
pub(crate) fn extract_content_from_json(body: &str) -> Result<String, TransportError> {
    let envelope: CompletionEnvelope =
        serde_json::from_str(body).map_err(|e| TransportError::InvalidBody {
            reason: e.to_string(),
        })?;
    extract_content(envelope)
}

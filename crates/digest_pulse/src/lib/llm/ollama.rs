use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine as _};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{ChatMessage, Completion, Role};

/// Local models served by Ollama, through `/api/chat`.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
}

#[derive(Debug, thiserror::Error)]
pub enum OllamaError {
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Ollama error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("Ollama returned an empty reply")]
    EmptyCompletion,
}

#[derive(Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: Vec<OllamaMessage<'a>>,
    stream: bool,
}

#[derive(Serialize)]
struct OllamaMessage<'a> {
    role: Role,
    content: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    images: Vec<String>,
}

#[derive(Deserialize)]
struct OllamaChatResponse {
    message: OllamaReply,
}

#[derive(Deserialize)]
struct OllamaReply {
    #[serde(default)]
    content: String,
}

impl OllamaClient {
    pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";
    pub const DEFAULT_MODEL: &str = "gemma3";

    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: Self::DEFAULT_BASE_URL.into(),
            model: Self::DEFAULT_MODEL.into(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

impl Default for OllamaClient {
    fn default() -> Self {
        Self::new()
    }
}

impl Completion for OllamaClient {
    type Error = OllamaError;

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, Self::Error> {
        let request = OllamaChatRequest {
            model: &self.model,
            messages: messages
                .iter()
                .map(|m| OllamaMessage {
                    role: m.role,
                    content: &m.content,
                    images: m.images.iter().map(|i| BASE64_STANDARD.encode(i)).collect(),
                })
                .collect(),
            stream: false,
        };

        let resp = self
            .client
            .post(format!("{}/api/chat", self.base_url.trim_end_matches('/')))
            .json(&request)
            .send()
            .await
            .inspect_err(|e| {
                tracing::error!(error = %e, model = %self.model, "Failed to reach Ollama");
            })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(OllamaError::Api { status, message });
        }

        let reply = resp.json::<OllamaChatResponse>().await?.message.content;
        if reply.trim().is_empty() {
            return Err(OllamaError::EmptyCompletion);
        }
        Ok(reply)
    }
}

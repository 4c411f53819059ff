use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine as _};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{ChatMessage, Completion};

#[derive(Debug, Clone)]
pub struct OpenAIClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

#[derive(Debug, thiserror::Error)]
pub enum OpenAIError {
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("No content in completion response")]
    EmptyCompletion,
}

impl OpenAIClient {
    pub const DEFAULT_MODEL: &str = "gpt-4o";

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: "https://api.openai.com/v1".into(),
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

    fn message_body(message: &ChatMessage) -> Value {
        if message.images.is_empty() {
            return json!({ "role": message.role, "content": message.content });
        }

        let mut parts = vec![json!({ "type": "text", "text": message.content })];
        parts.extend(message.images.iter().map(|image| {
            json!({
                "type": "image_url",
                "image_url": {
                    "url": format!("data:image/png;base64,{}", BASE64_STANDARD.encode(image))
                }
            })
        }));
        json!({ "role": message.role, "content": parts })
    }

    pub async fn send_completion_request(
        &self,
        messages: &[ChatMessage],
    ) -> Result<CompletionResponse, OpenAIError> {
        let body = json!({
            "model": self.model,
            "temperature": 0,
            "messages": messages.iter().map(Self::message_body).collect::<Vec<_>>(),
        });

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(OpenAIError::Api { status, message });
        }

        Ok(resp.json::<CompletionResponse>().await?)
    }
}

#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    pub id: String,
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionChoice {
    pub index: u32,
    pub message: CompletionMessage,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionMessage {
    pub role: String,
    pub content: Option<String>,
}

impl Completion for OpenAIClient {
    type Error = OpenAIError;

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, Self::Error> {
        let response = self
            .send_completion_request(messages)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to complete chat"))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(OpenAIError::EmptyCompletion)
    }
}

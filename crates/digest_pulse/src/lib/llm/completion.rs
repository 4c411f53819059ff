use std::{fmt::Display, future::Future};

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One role-tagged chat turn. Images are raw encoded bytes (PNG, JPEG) and are
/// only honoured on user turns.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub images: Vec<Vec<u8>>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            images: Vec::new(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            images: Vec::new(),
        }
    }

    pub fn with_image(mut self, image: Vec<u8>) -> Self {
        self.images.push(image);
        self
    }
}

/// A text-completion backend: an ordered conversation in, one reply out.
pub trait Completion {
    type Error: Display + Send;

    fn model(&self) -> &str;

    fn complete(
        &self,
        messages: &[ChatMessage],
    ) -> impl Future<Output = Result<String, Self::Error>> + Send;
}

impl<T: Completion + Sync> Completion for &T {
    type Error = T::Error;

    fn model(&self) -> &str {
        (**self).model()
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, Self::Error> {
        (**self).complete(messages).await
    }
}

use super::completion::{ChatMessage, Completion};

/// A running chat with a model. Every question is sent together with the
/// whole history, and answered turns are kept for the next one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the history with an assistant turn carrying `context`.
    pub fn with_context(context: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::assistant(context)],
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub async fn ask<C: Completion>(
        &mut self,
        completion: &C,
        question: impl Into<String>,
    ) -> Result<String, C::Error> {
        self.send(completion, ChatMessage::user(question)).await
    }

    /// Like [`Conversation::ask`], with images attached to the question.
    pub async fn ask_with_images<C: Completion>(
        &mut self,
        completion: &C,
        question: impl Into<String>,
        images: impl IntoIterator<Item = Vec<u8>>,
    ) -> Result<String, C::Error> {
        let message = images
            .into_iter()
            .fold(ChatMessage::user(question), ChatMessage::with_image);
        self.send(completion, message).await
    }

    /// A failed turn leaves the history as it was before the question.
    #[tracing::instrument(
        skip_all,
        fields(turns = self.messages.len(), model = completion.model())
    )]
    async fn send<C: Completion>(
        &mut self,
        completion: &C,
        question: ChatMessage,
    ) -> Result<String, C::Error> {
        self.messages.push(question);

        match completion.complete(&self.messages).await {
            Ok(reply) => {
                self.messages.push(ChatMessage::assistant(reply.clone()));
                Ok(reply)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to get a reply");
                self.messages.pop();
                Err(e)
            }
        }
    }
}

use std::sync::{Arc, Mutex};

use digest_pulse::{ChatMessage, Completion};

#[derive(Clone)]
pub struct MockCompletion {
    pub reply: String,
    pub calls: Arc<Mutex<Vec<String>>>,
    pub fail_with: Option<String>,
    /// Zero-based call indices that fail even when `fail_with` is unset
    pub failing_calls: Vec<usize>,
}

impl MockCompletion {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
            failing_calls: Vec::new(),
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Self::new("")
        }
    }

    pub fn failing_on(reply: &str, calls: &[usize]) -> Self {
        Self {
            failing_calls: calls.to_vec(),
            ..Self::new(reply)
        }
    }
}

impl Completion for MockCompletion {
    type Error = anyhow::Error;

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, Self::Error> {
        let prompt = messages
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        let index = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(prompt);
            calls.len() - 1
        };

        if let Some(ref msg) = self.fail_with {
            return Err(anyhow::anyhow!("{}", msg));
        }
        if self.failing_calls.contains(&index) {
            return Err(anyhow::anyhow!("call {index} failed"));
        }
        Ok(self.reply.clone())
    }
}

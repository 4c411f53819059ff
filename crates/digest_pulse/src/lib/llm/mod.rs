pub mod completion;
pub mod conversation;
pub mod ollama;
pub mod openai;

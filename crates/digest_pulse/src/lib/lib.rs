pub mod chunker;
mod error;
mod llm;
pub mod notes;
pub mod parser;
mod processor;
pub mod prompt;
pub mod scan;
pub mod tracing;
pub mod travel;
pub mod types;
pub mod yt;

pub use error::Error;
pub use llm::{
    completion::{ChatMessage, Completion, Role},
    conversation::Conversation,
    ollama, openai,
};
pub use processor::{
    builder::PlaylistProcessorBuilder, PlaylistProcessor, ScanReport, SourceOutcome,
};

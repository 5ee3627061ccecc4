//! Grammatical analysis, quiz generation and the chat tutor.
//!
//! A remote `TextGenerator` is used when configured. Its failures never reach
//! the caller; the service answers from the offline heuristics instead.

mod client;
mod offline;
mod service;

use async_trait::async_trait;
use latin_core::model::ChatTurn;

use crate::error::GenerationError;

pub use client::{GenerationClient, GenerationConfig};
pub use offline::{analyze_offline, quiz_offline, tutor_offline};
pub use service::AnalysisService;

/// Remote text-generation capability.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Ask for a single JSON document answering `prompt`.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError` if the request fails or yields nothing.
    async fn generate_json(&self, prompt: &str) -> Result<String, GenerationError>;

    /// Continue a conversation.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError` if the request fails or yields nothing.
    async fn chat(
        &self,
        system: &str,
        history: &[ChatTurn],
        message: &str,
    ) -> Result<String, GenerationError>;
}

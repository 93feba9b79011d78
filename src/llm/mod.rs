//! Text-generation backends.
//!
//! Orchestration only depends on [`ModelClient`]: submit a prompt, receive
//! the response text or an error.

pub mod gemini;

use async_trait::async_trait;

use crate::error::ModelInvocationError;

pub use gemini::GeminiClient;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Run `prompt` through the model and return its text, trimmed.
    async fn generate(&self, prompt: &str) -> Result<String, ModelInvocationError>;
}

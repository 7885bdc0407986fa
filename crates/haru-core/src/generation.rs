//! Text generation capability.
//!
//! Every transport that can turn a prompt into text implements
//! [`TextGenerator`]. The vendor protocol behind it is opaque to the rest of
//! the workspace.

use async_trait::async_trait;
use thiserror::Error;

/// Errors produced by a single generation attempt.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// The request never produced a response (connect failure, timeout, ...)
    #[error("request failed: {0}")]
    Request(String),

    /// The endpoint answered with a non-success status
    #[error("endpoint returned status {status_code}: {message}")]
    Status { status_code: u16, message: String },

    /// The endpoint answered but the body held no usable text
    #[error("empty response")]
    EmptyResponse,

    /// The text could not be interpreted as the expected payload
    #[error("unparseable payload: {0}")]
    Unparseable(String),

    /// The transport lacks credentials or an endpoint
    #[error("transport not configured: {0}")]
    NotConfigured(String),

    /// Every link of a fallback chain failed
    #[error("all {attempts} transports failed; last error: {last}")]
    Exhausted { attempts: usize, last: String },
}

/// A prompt-in/text-out generation strategy.
///
/// Implementations must resolve (success, error or their own timeout); they
/// are never cancelled by callers.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Short name used in logs (e.g. "remote-endpoint", "gemini-api").
    fn name(&self) -> &str;

    /// Generates text for the given prompt.
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: The raw text payload, before any field extraction
    /// - `Err(GenerationError)`: The attempt failed
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

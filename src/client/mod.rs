//! # Model Client
//!
//! Boundary to the external text-generation provider. The core only needs a prompt in
//! and text out; everything provider-specific stays behind [`ModelClient`].
//!
//! - [`RetryingClient`] wraps any client with bounded exponential backoff.
//! - [`OpenRouterClient`] talks to an OpenAI-compatible chat-completions endpoint.

pub mod error;
pub mod openrouter;
pub mod retry;

pub use error::ModelCallError;
pub use openrouter::OpenRouterClient;
pub use retry::{retry_with_backoff, RetryPolicy, RetryingClient};

use async_trait::async_trait;

/// Turns a prompt into generated text
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Send `prompt` to the provider and return its trimmed, non-empty answer
    async fn complete(&self, prompt: &str) -> Result<String, ModelCallError>;
}

//! Seams of the generation client: the remote call and the sleep.

use async_trait::async_trait;
use std::time::Duration;

use super::error::RemoteError;

/// One outbound generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub model: String,
    pub prompt: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

/// A remote text-generation service.
///
/// Implementations perform exactly one attempt per call and never retry;
/// retry policy belongs to [`GenerationClient`](super::GenerationClient).
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Returns the generated text, possibly empty.
    async fn generate_text(&self, request: &GenerationRequest) -> Result<String, RemoteError>;
}

/// Waits between attempts.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Real wall-clock sleeping on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

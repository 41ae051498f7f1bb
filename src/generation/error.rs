//! Structured errors returned by a [`TextGenerator`](super::TextGenerator).
//!
//! Adapters classify remote failures into a category and, when the service
//! says how long to wait, an explicit `retry_after`. The retry loop works
//! only on these fields.

use std::time::Duration;
use thiserror::Error;

/// Failure class of a remote generation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteErrorCategory {
    /// Quota or rate limit hit (HTTP 429, RESOURCE_EXHAUSTED).
    RateLimited,
    /// The service rejected the request body.
    InvalidRequest,
    /// Missing, invalid or unauthorized credential.
    Unauthorized,
    /// Unknown model or endpoint.
    NotFound,
    /// Upstream 5xx.
    ServerError,
    /// Round trip exceeded the client timeout.
    Timeout,
    /// Could not reach the service.
    Connection,
    /// Response body could not be decoded.
    MalformedResponse,
}

impl RemoteErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            RemoteErrorCategory::RateLimited => "RateLimited",
            RemoteErrorCategory::InvalidRequest => "InvalidRequest",
            RemoteErrorCategory::Unauthorized => "Unauthorized",
            RemoteErrorCategory::NotFound => "NotFound",
            RemoteErrorCategory::ServerError => "ServerError",
            RemoteErrorCategory::Timeout => "Timeout",
            RemoteErrorCategory::Connection => "Connection",
            RemoteErrorCategory::MalformedResponse => "MalformedResponse",
        }
    }
}

impl std::fmt::Display for RemoteErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error from one remote generation attempt.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{category} — {message}")]
pub struct RemoteError {
    pub category: RemoteErrorCategory,
    pub message: String,
    /// Wait demanded by the service before the next attempt.
    pub retry_after: Option<Duration>,
}

impl RemoteError {
    pub fn new(category: RemoteErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            retry_after: None,
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(RemoteErrorCategory::RateLimited, message)
    }

    pub fn with_retry_after(mut self, retry_after: Duration) -> Self {
        self.retry_after = Some(retry_after);
        self
    }

    /// Only rate limiting is retried.
    pub fn is_retryable(&self) -> bool {
        self.category == RemoteErrorCategory::RateLimited
    }
}

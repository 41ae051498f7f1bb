use super::error::{RemoteError, RemoteErrorCategory};

/// Message shown once every attempt was rate limited.
pub const EXHAUSTED_MESSAGE: &str = "Rate limit hit. Please wait 30–60 seconds and try again.";

/// Terminal outcome of [`GenerationClient::generate`](super::GenerationClient::generate).
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationResult {
    Success(Generated),
    Failure(GenerationFailure),
}

/// A successful call's payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generated {
    Text(String),
    /// The call succeeded but returned no text.
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// A non-retryable remote error, surfaced on first occurrence.
    Remote(RemoteErrorCategory),
    /// Every attempt in the budget was rate limited.
    Exhausted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl GenerationFailure {
    pub fn exhausted() -> Self {
        Self {
            kind: FailureKind::Exhausted,
            message: EXHAUSTED_MESSAGE.to_string(),
        }
    }

    /// Display string: "category — message" for remote failures, the fixed
    /// friendly text once retries are exhausted.
    pub fn display(&self) -> String {
        match self.kind {
            FailureKind::Remote(category) => format!("{} — {}", category, self.message),
            FailureKind::Exhausted => self.message.clone(),
        }
    }
}

impl From<RemoteError> for GenerationFailure {
    fn from(err: RemoteError) -> Self {
        Self {
            kind: FailureKind::Remote(err.category),
            message: err.message,
        }
    }
}

impl GenerationResult {
    /// Blank or whitespace-only text maps to [`Generated::Empty`].
    pub fn from_text(text: String) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            GenerationResult::Success(Generated::Empty)
        } else {
            GenerationResult::Success(Generated::Text(trimmed.to_string()))
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, GenerationResult::Success(_))
    }
}

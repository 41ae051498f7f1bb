//! Remote text generation with bounded retry.
//!
//! ```text
//! Attempting ──ok──────────────→ Success (text or empty sentinel)
//!     │ ──other error──────────→ NonRetryableFailure
//!     │ ──rate limited─→ Backoff ──sleep──→ Attempting
//!     └ ──rate limited, budget spent──→ ExhaustedFailure
//! ```

mod backoff;
mod client;
mod error;
mod result;
mod traits;

pub use backoff::BackoffPolicy;
pub use client::{GenerationClient, RetryState};
pub use error::{RemoteError, RemoteErrorCategory};
pub use result::{FailureKind, Generated, GenerationFailure, GenerationResult, EXHAUSTED_MESSAGE};
pub use traits::{GenerationRequest, Sleeper, TextGenerator, TokioSleeper};

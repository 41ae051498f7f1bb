use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;

use super::backoff::BackoffPolicy;
use super::error::RemoteError;
use super::result::{GenerationFailure, GenerationResult};
use super::traits::{GenerationRequest, Sleeper, TextGenerator, TokioSleeper};

/// Bookkeeping for one `generate` call. Discarded by [`GenerationClient::generate`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RetryState {
    /// Zero-based index of the latest attempt.
    pub attempt: u32,
    pub last_error: Option<RemoteError>,
    pub total_wait: Duration,
}

impl RetryState {
    /// Remote calls made so far.
    pub fn attempts_made(&self) -> u32 {
        self.attempt + 1
    }
}

/// Runs a prompt against a [`TextGenerator`] with bounded retry.
///
/// Rate-limit errors are retried with exponential backoff (or the delay the
/// service asked for); every other error ends the call immediately.
pub struct GenerationClient {
    remote: Arc<dyn TextGenerator>,
    sleeper: Arc<dyn Sleeper>,
    policy: BackoffPolicy,
    model: String,
    temperature: f32,
    rng: Mutex<StdRng>,
}

impl GenerationClient {
    pub fn new(
        remote: Arc<dyn TextGenerator>,
        model: impl Into<String>,
        temperature: f32,
        policy: BackoffPolicy,
    ) -> Self {
        Self {
            remote,
            sleeper: Arc::new(TokioSleeper),
            policy,
            model: model.into(),
            temperature,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Client wired from the `[model]` and `[retry]` config tables.
    pub fn from_config(config: &Config, remote: Arc<dyn TextGenerator>) -> Self {
        Self::new(
            remote,
            config.model.name.clone(),
            config.model.temperature,
            BackoffPolicy::from(&config.retry),
        )
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Deterministic jitter.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    pub fn policy(&self) -> &BackoffPolicy {
        &self.policy
    }

    pub async fn generate(&self, prompt: &str, max_output_tokens: u32) -> GenerationResult {
        self.generate_traced(prompt, max_output_tokens).await.0
    }

    /// Like [`generate`](Self::generate), also returning the retry bookkeeping.
    pub async fn generate_traced(
        &self,
        prompt: &str,
        max_output_tokens: u32,
    ) -> (GenerationResult, RetryState) {
        let request = GenerationRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            temperature: self.temperature,
            max_output_tokens,
        };
        let mut state = RetryState::default();

        loop {
            let err = match self.remote.generate_text(&request).await {
                Ok(text) => return (GenerationResult::from_text(text), state),
                Err(err) if !err.is_retryable() => {
                    let failure = GenerationFailure::from(err.clone());
                    state.last_error = Some(err);
                    return (GenerationResult::Failure(failure), state);
                }
                Err(err) => err,
            };

            let retry_after = err.retry_after;
            state.last_error = Some(err);

            if state.attempts_made() >= self.policy.max_attempts {
                return (
                    GenerationResult::Failure(GenerationFailure::exhausted()),
                    state,
                );
            }

            let jitter = self.policy.sample_jitter(&mut *self.rng.lock());
            let wait = self.policy.delay_for(state.attempt, retry_after, jitter);
            self.sleeper.sleep(wait).await;

            state.total_wait += wait;
            state.attempt += 1;
        }
    }
}

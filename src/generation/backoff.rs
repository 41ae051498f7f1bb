use rand::Rng;
use std::time::Duration;

use crate::config::RetryConfig;

/// Backoff parameters for rate-limited attempts.
#[derive(Debug, Clone, PartialEq)]
pub struct BackoffPolicy {
    /// Total remote attempts, including the first.
    pub max_attempts: u32,
    pub base: f64,
    pub ceiling: Duration,
    /// Upper bound (exclusive) of the uniform jitter.
    pub jitter: Duration,
    /// Added to a service-supplied retry delay.
    pub retry_after_buffer: Duration,
}

impl BackoffPolicy {
    /// Wait before the retry that follows failed attempt `attempt` (zero-based).
    ///
    /// A service-supplied delay replaces the exponential term entirely and is
    /// not capped; otherwise the wait is `min(ceiling, base^attempt + jitter)`.
    pub fn delay_for(
        &self,
        attempt: u32,
        retry_after: Option<Duration>,
        jitter: Duration,
    ) -> Duration {
        if let Some(stated) = retry_after {
            return stated.saturating_add(self.retry_after_buffer);
        }

        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let exponential =
            Duration::try_from_secs_f64(self.base.powi(exponent)).unwrap_or(self.ceiling);
        exponential.saturating_add(jitter).min(self.ceiling)
    }

    /// Draw a jitter value from `[0, self.jitter)`.
    pub fn sample_jitter<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if self.jitter.is_zero() {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(rng.gen_range(0.0..self.jitter.as_secs_f64()))
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for BackoffPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base: config.backoff_base,
            ceiling: secs(config.ceiling_seconds),
            jitter: secs(config.jitter_seconds),
            retry_after_buffer: secs(config.retry_after_buffer_seconds),
        }
    }
}

fn secs(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or(Duration::ZERO)
}

//! Per-session submission state: the cooldown gate and the generation phase.
//!
//! Callers pass the current time in, so the gate is deterministic under test.

use serde::Serialize;
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::config::CooldownConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    #[default]
    Idle,
    Generating,
}

/// A submission arrived before the cooldown interval elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Please wait ~{} seconds between runs to avoid rate limits.", .interval.as_secs())]
pub struct CooldownRejection {
    pub interval: Duration,
    /// Time left until the next submission is accepted.
    pub remaining: Duration,
}

/// Snapshot for a UI deciding whether to enable its controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionStatus {
    pub phase: SessionPhase,
    pub can_submit: bool,
    pub cooldown_remaining_seconds: u64,
}

#[derive(Debug, Clone)]
pub struct Session {
    interval: Duration,
    last_accepted_at: Option<Instant>,
    /// Generations started and not yet finished.
    in_flight: u32,
}

impl Session {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_accepted_at: None,
            in_flight: 0,
        }
    }

    /// Accept a submission at `now`, or reject it if the previous accepted
    /// one started less than `interval` ago. Acceptance stamps `now`.
    pub fn try_accept(&mut self, now: Instant) -> Result<(), CooldownRejection> {
        let remaining = self.cooldown_remaining(now);
        if !remaining.is_zero() {
            return Err(CooldownRejection {
                interval: self.interval,
                remaining,
            });
        }
        self.last_accepted_at = Some(now);
        Ok(())
    }

    /// Zero once the gate is open.
    pub fn cooldown_remaining(&self, now: Instant) -> Duration {
        match self.last_accepted_at {
            None => Duration::ZERO,
            Some(last) => self
                .interval
                .saturating_sub(now.saturating_duration_since(last)),
        }
    }

    pub fn last_accepted_at(&self) -> Option<Instant> {
        self.last_accepted_at
    }

    /// `Generating` while any accepted submission is still running.
    pub fn phase(&self) -> SessionPhase {
        if self.in_flight > 0 {
            SessionPhase::Generating
        } else {
            SessionPhase::Idle
        }
    }

    pub fn begin_generation(&mut self) {
        self.in_flight += 1;
    }

    pub fn finish_generation(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    pub fn can_submit(&self, now: Instant) -> bool {
        self.phase() == SessionPhase::Idle && self.cooldown_remaining(now).is_zero()
    }

    pub fn status(&self, now: Instant) -> SessionStatus {
        let remaining = self.cooldown_remaining(now);
        SessionStatus {
            phase: self.phase(),
            can_submit: self.can_submit(now),
            cooldown_remaining_seconds: remaining.as_secs_f64().ceil() as u64,
        }
    }
}

impl From<&CooldownConfig> for Session {
    fn from(config: &CooldownConfig) -> Self {
        Self::new(Duration::from_secs(config.interval_seconds))
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::from(&CooldownConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_submission_is_accepted() {
        let mut session = Session::default();
        let now = Instant::now();
        assert!(session.last_accepted_at().is_none());
        assert!(session.try_accept(now).is_ok());
        assert_eq!(session.last_accepted_at(), Some(now));
    }

    #[test]
    fn rejection_reports_remaining_time() {
        let mut session = Session::default();
        let start = Instant::now();
        session.try_accept(start).unwrap();

        let err = session.try_accept(start + Duration::from_secs(3)).unwrap_err();
        assert_eq!(err.remaining, Duration::from_secs(7));
        assert_eq!(
            err.to_string(),
            "Please wait ~10 seconds between runs to avoid rate limits."
        );
        assert_eq!(session.last_accepted_at(), Some(start));
    }

    #[test]
    fn status_rounds_remaining_up() {
        let mut session = Session::default();
        let start = Instant::now();
        session.try_accept(start).unwrap();

        let status = session.status(start + Duration::from_millis(8_500));
        assert_eq!(status.cooldown_remaining_seconds, 2);
        assert!(!status.can_submit);
    }

    #[test]
    fn generating_phase_blocks_submit_capability() {
        let mut session = Session::default();
        let now = Instant::now();
        session.begin_generation();
        assert_eq!(session.phase(), SessionPhase::Generating);
        assert!(!session.can_submit(now));

        session.finish_generation();
        assert!(session.can_submit(now));
    }

    #[test]
    fn overlapping_generations_stay_generating_until_last_finishes() {
        let mut session = Session::default();
        session.begin_generation();
        session.begin_generation();

        session.finish_generation();
        assert_eq!(session.phase(), SessionPhase::Generating);

        session.finish_generation();
        assert_eq!(session.phase(), SessionPhase::Idle);

        session.finish_generation();
        assert_eq!(session.phase(), SessionPhase::Idle);
    }
}

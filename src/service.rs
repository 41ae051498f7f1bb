//! The submission pipeline: gate, validate, prompt, generate, report.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::generation::{
    FailureKind, Generated, GenerationClient, GenerationFailure, GenerationResult, TextGenerator,
};
use crate::prompt::{build_prompt, PromptProfile, StudyRequest, ValidationError};
use crate::session::{CooldownRejection, Session, SessionStatus};

/// Soft warning shown when the model answered with nothing.
pub const EMPTY_RESPONSE_WARNING: &str = "Got an empty response. Please try again.";

/// What the user sees after a submission.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Generated(String),
    EmptyResponse,
    ValidationWarning(ValidationError),
    CooldownWarning(CooldownRejection),
    Error(GenerationFailure),
}

impl Outcome {
    /// Display text for the outcome.
    pub fn message(&self) -> String {
        match self {
            Outcome::Generated(text) => text.clone(),
            Outcome::EmptyResponse => EMPTY_RESPONSE_WARNING.to_string(),
            Outcome::ValidationWarning(err) => err.to_string(),
            Outcome::CooldownWarning(rejection) => rejection.to_string(),
            Outcome::Error(failure) => failure.display(),
        }
    }

    /// Generated text or the empty-response warning.
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Generated(_) | Outcome::EmptyResponse)
    }
}

pub struct StudyService {
    prompts: PromptProfile,
    client: GenerationClient,
    session: Mutex<Session>,
}

impl StudyService {
    pub fn new(prompts: PromptProfile, client: GenerationClient, session: Session) -> Self {
        Self {
            prompts,
            client,
            session: Mutex::new(session),
        }
    }

    pub fn from_config(config: &Config, remote: Arc<dyn TextGenerator>) -> Self {
        Self::new(
            config.prompts.clone(),
            GenerationClient::from_config(config, remote),
            Session::from(&config.cooldown),
        )
    }

    /// Handle one submission made at `now`.
    ///
    /// The cooldown gate runs first and stamps every submission it lets
    /// through, even one that then fails validation. The remote service is
    /// contacted only after both pass.
    pub async fn submit(&self, request: &StudyRequest, now: Instant) -> Outcome {
        let gate = self.session.lock().try_accept(now);
        if let Err(rejection) = gate {
            tracing::info!(
                remaining_ms = rejection.remaining.as_millis() as u64,
                "Submission rejected by cooldown"
            );
            return Outcome::CooldownWarning(rejection);
        }

        let spec = match build_prompt(request, &self.prompts) {
            Ok(spec) => spec,
            Err(err) => {
                tracing::info!(mode = ?request.mode, reason = %err, "Submission rejected by validation");
                return Outcome::ValidationWarning(err);
            }
        };

        self.session.lock().begin_generation();
        // Released on every exit, including a dropped future.
        let _idle = scopeguard::guard(&self.session, |session| {
            session.lock().finish_generation();
        });

        let (result, retries) = self
            .client
            .generate_traced(&spec.prompt, spec.max_output_tokens)
            .await;

        tracing::info!(
            mode = ?request.mode,
            attempts = retries.attempts_made(),
            total_wait_ms = retries.total_wait.as_millis() as u64,
            success = result.is_success(),
            "Generation finished"
        );

        match result {
            GenerationResult::Success(Generated::Text(text)) => Outcome::Generated(text),
            GenerationResult::Success(Generated::Empty) => Outcome::EmptyResponse,
            GenerationResult::Failure(failure) => {
                if let FailureKind::Remote(category) = failure.kind {
                    tracing::warn!(%category, message = %failure.message, "Generation failed");
                }
                Outcome::Error(failure)
            }
        }
    }

    pub fn status(&self, now: Instant) -> SessionStatus {
        self.session.lock().status(now)
    }
}

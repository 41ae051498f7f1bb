//! Shared test utilities and mock infrastructure.

#![allow(dead_code, unused_imports)]

pub mod mock_backend;

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::Notify;

use studybuddy::generation::{
    BackoffPolicy, GenerationClient, GenerationRequest, RemoteError, Sleeper, TextGenerator,
};
use studybuddy::prompt::PromptProfile;
use studybuddy::service::StudyService;
use studybuddy::session::Session;

/// In-process [`TextGenerator`] returning queued replies.
///
/// Once the queue is empty every call gets the fallback reply.
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<Result<String, RemoteError>>>,
    fallback: Result<String, RemoteError>,
    calls: AtomicUsize,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedGenerator {
    pub fn new(replies: Vec<Result<String, RemoteError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            fallback: Ok("fallback".to_string()),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Every call returns `reply`.
    pub fn always(reply: Result<String, RemoteError>) -> Self {
        Self {
            fallback: reply,
            ..Self::new(Vec::new())
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate_text(&self, request: &GenerationRequest) -> Result<String, RemoteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(request.clone());
        self.replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

/// [`TextGenerator`] whose calls each block on their own gate.
///
/// Call `n` waits for `gates[n]` to be notified, then returns `reply`.
pub struct GatedGenerator {
    gates: Vec<Arc<Notify>>,
    reply: String,
    started: AtomicUsize,
}

impl GatedGenerator {
    pub fn new(gates: Vec<Arc<Notify>>, reply: &str) -> Self {
        Self {
            gates,
            reply: reply.to_string(),
            started: AtomicUsize::new(0),
        }
    }

    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    /// Yield until `count` calls have reached their gate.
    pub async fn wait_started(&self, count: usize) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while self.started() < count {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("generation calls never started");
    }
}

#[async_trait]
impl TextGenerator for GatedGenerator {
    async fn generate_text(&self, _request: &GenerationRequest) -> Result<String, RemoteError> {
        let index = self.started.fetch_add(1, Ordering::SeqCst);
        let gate = self
            .gates
            .get(index)
            .cloned()
            .expect("more calls than gates");
        gate.notified().await;
        Ok(self.reply.clone())
    }
}

/// Records requested sleeps instead of waiting.
#[derive(Default)]
pub struct RecordingSleeper {
    slept: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn durations(&self) -> Vec<Duration> {
        self.slept.lock().clone()
    }

    pub fn total(&self) -> Duration {
        self.slept.lock().iter().sum()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.slept.lock().push(duration);
    }
}

/// Generation client over `remote` that never really sleeps.
pub fn test_client(
    remote: Arc<dyn TextGenerator>,
    sleeper: Arc<RecordingSleeper>,
) -> GenerationClient {
    GenerationClient::new(remote, "gemini-2.0-flash", 0.5, BackoffPolicy::default())
        .with_sleeper(sleeper)
        .with_seed(1234)
}

/// Service with default prompts and a 10s cooldown.
pub fn test_service(remote: Arc<dyn TextGenerator>) -> StudyService {
    StudyService::new(
        PromptProfile::default(),
        test_client(remote, Arc::new(RecordingSleeper::default())),
        Session::default(),
    )
}

/// Write `content` to a config file in a fresh temp dir.
pub fn temp_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, content).expect("Failed to write config");
    (temp_dir, config_path)
}

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The task the user selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Explain a topic.
    Explain,
    /// Summarize pasted notes.
    Summarize,
    /// Quiz plus flashcards from notes or a topic.
    Quiz,
    /// Mermaid flowchart from notes or a topic.
    Flowchart,
}

impl Mode {
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Explain => "Explain Topic",
            Mode::Summarize => "Summarize Notes",
            Mode::Quiz => "Quiz + Flashcards",
            Mode::Flowchart => "Flowchart",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Quiz difficulty. Ignored by every mode except [`Mode::Quiz`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

/// A user submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyRequest {
    pub mode: Mode,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub difficulty: Difficulty,
}

impl StudyRequest {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            topic: None,
            notes: None,
            difficulty: Difficulty::default(),
        }
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Trimmed topic, `None` when absent or blank.
    pub fn topic(&self) -> Option<&str> {
        non_blank(self.topic.as_deref())
    }

    /// Trimmed notes, `None` when absent or blank.
    pub fn notes(&self) -> Option<&str> {
        non_blank(self.notes.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Required input for the selected mode is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a topic.")]
    MissingTopic,

    #[error("Please paste notes.")]
    MissingNotes,

    #[error("Enter a topic or paste notes.")]
    MissingContent,
}

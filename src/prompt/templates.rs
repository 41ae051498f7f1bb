use serde::{Deserialize, Serialize};

use super::request::{Mode, StudyRequest, ValidationError};

/// Per-mode item counts and output budgets.
///
/// Loaded from the `[prompts]` config table; every field has a default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptProfile {
    pub explain_bullets: u32,
    pub explain_examples: u32,
    pub explain_check_questions: u32,
    pub explain_max_tokens: u32,

    pub summarize_key_points: u32,
    pub summarize_flashcards: u32,
    pub summarize_max_tokens: u32,

    pub quiz_multiple_choice: u32,
    pub quiz_flashcards: u32,
    pub quiz_max_tokens: u32,

    pub flowchart_min_nodes: u32,
    pub flowchart_max_nodes: u32,
    pub flowchart_max_tokens: u32,
}

impl Default for PromptProfile {
    fn default() -> Self {
        Self {
            explain_bullets: 8,
            explain_examples: 1,
            explain_check_questions: 3,
            explain_max_tokens: 520,

            summarize_key_points: 8,
            summarize_flashcards: 5,
            summarize_max_tokens: 600,

            quiz_multiple_choice: 3,
            quiz_flashcards: 8,
            quiz_max_tokens: 380,

            flowchart_min_nodes: 6,
            flowchart_max_nodes: 12,
            flowchart_max_tokens: 400,
        }
    }
}

/// A ready-to-send prompt and its output budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSpec {
    pub prompt: String,
    pub max_output_tokens: u32,
}

/// Build the prompt for `request`.
///
/// Pure: the same request and profile always produce the same output.
pub fn build_prompt(
    request: &StudyRequest,
    profile: &PromptProfile,
) -> Result<PromptSpec, ValidationError> {
    match request.mode {
        // Topic and notes go in verbatim; only the emptiness check trims.
        Mode::Explain => {
            request.topic().ok_or(ValidationError::MissingTopic)?;
            let raw = request.topic.as_deref().unwrap_or_default();
            Ok(explain(raw, profile))
        }
        Mode::Summarize => {
            request.notes().ok_or(ValidationError::MissingNotes)?;
            let raw = request.notes.as_deref().unwrap_or_default();
            Ok(summarize(raw, profile))
        }
        Mode::Quiz => {
            let content = preferred_content(request)?;
            Ok(quiz(content, request.difficulty.as_str(), profile))
        }
        Mode::Flowchart => {
            let content = preferred_content(request)?;
            Ok(flowchart(content, profile))
        }
    }
}

fn preferred_content(request: &StudyRequest) -> Result<&str, ValidationError> {
    request
        .notes()
        .or_else(|| request.topic())
        .ok_or(ValidationError::MissingContent)
}

fn explain(topic: &str, profile: &PromptProfile) -> PromptSpec {
    let examples = if profile.explain_examples == 1 {
        "1 simple real-world example".to_string()
    } else {
        format!("{} simple real-world examples", profile.explain_examples)
    };

    let prompt = format!(
        "Explain '{topic}' for a student.\n\
         Output:\n\
         - Exactly {bullets} bullet points\n\
         - {examples}\n\
         - {questions} quick check questions\n",
        bullets = profile.explain_bullets,
        questions = profile.explain_check_questions,
    );

    PromptSpec {
        prompt,
        max_output_tokens: profile.explain_max_tokens,
    }
}

fn summarize(notes: &str, profile: &PromptProfile) -> PromptSpec {
    let prompt = format!(
        "Summarize these notes for quick revision.\n\
         Output:\n\
         1) {points} bullet key points\n\
         2) Definitions (if any)\n\
         3) Formulas (if any)\n\
         4) {cards} flashcards (Front | Back)\n\n\
         NOTES:\n{notes}",
        points = profile.summarize_key_points,
        cards = profile.summarize_flashcards,
    );

    PromptSpec {
        prompt,
        max_output_tokens: profile.summarize_max_tokens,
    }
}

fn quiz(content: &str, difficulty: &str, profile: &PromptProfile) -> PromptSpec {
    let total = profile.quiz_multiple_choice + 2;

    let prompt = format!(
        "Create a {difficulty} quiz and flashcards from the content.\n\
         Output EXACTLY:\n\
         A) Quiz ({total} questions)\n\
         - {mcq} MCQ (A-D + correct answer)\n\
         - 1 short answer (model answer)\n\
         - 1 true/false (answer)\n\n\
         B) Flashcards ({cards})\n\
         - Front: ... | Back: ...\n\n\
         CONTENT:\n{content}",
        mcq = profile.quiz_multiple_choice,
        cards = profile.quiz_flashcards,
    );

    PromptSpec {
        prompt,
        max_output_tokens: profile.quiz_max_tokens,
    }
}

fn flowchart(content: &str, profile: &PromptProfile) -> PromptSpec {
    let prompt = format!(
        "Turn the content into a Mermaid flowchart.\n\
         Rules:\n\
         - Output ONLY Mermaid code starting with `flowchart TD`\n\
         - Use between {min} and {max} nodes\n\
         - Keep node labels short\n\
         - No prose, no explanations, no code fences\n\n\
         CONTENT:\n{content}",
        min = profile.flowchart_min_nodes,
        max = profile.flowchart_max_nodes,
    );

    PromptSpec {
        prompt,
        max_output_tokens: profile.flowchart_max_tokens,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::Difficulty;

    #[test]
    fn explain_embeds_topic_and_counts() {
        let request = StudyRequest::new(Mode::Explain).with_topic("Photosynthesis");
        let spec = build_prompt(&request, &PromptProfile::default()).unwrap();

        assert!(spec.prompt.contains("'Photosynthesis'"));
        assert!(spec.prompt.contains("Exactly 8 bullet points"));
        assert!(spec.prompt.contains("1 simple real-world example\n"));
        assert!(spec.prompt.contains("3 quick check questions"));
        assert_eq!(spec.max_output_tokens, 520);
    }

    #[test]
    fn explain_keeps_topic_verbatim() {
        let request = StudyRequest::new(Mode::Explain).with_topic("  Osmosis \n");
        let spec = build_prompt(&request, &PromptProfile::default()).unwrap();
        assert!(spec.prompt.starts_with("Explain '  Osmosis \n' for a student."));
    }

    #[test]
    fn explain_pluralizes_examples() {
        let profile = PromptProfile {
            explain_examples: 2,
            ..PromptProfile::default()
        };
        let request = StudyRequest::new(Mode::Explain).with_topic("Gravity");
        let spec = build_prompt(&request, &profile).unwrap();
        assert!(spec.prompt.contains("2 simple real-world examples"));
    }

    #[test]
    fn summarize_keeps_notes_verbatim() {
        let notes = "  line one\n\tline two  \n";
        let request = StudyRequest::new(Mode::Summarize).with_notes(notes);
        let spec = build_prompt(&request, &PromptProfile::default()).unwrap();

        assert!(spec.prompt.ends_with(&format!("NOTES:\n{}", notes)));
        assert!(spec.prompt.contains("5 flashcards (Front | Back)"));
        assert_eq!(spec.max_output_tokens, 600);
    }

    #[test]
    fn quiz_prefers_notes_over_topic() {
        let request = StudyRequest::new(Mode::Quiz)
            .with_topic("Cells")
            .with_notes("Mitochondria make ATP.")
            .with_difficulty(Difficulty::Hard);
        let spec = build_prompt(&request, &PromptProfile::default()).unwrap();

        assert!(spec.prompt.starts_with("Create a hard quiz"));
        assert!(spec.prompt.contains("CONTENT:\nMitochondria make ATP."));
        assert!(!spec.prompt.contains("Cells"));
        assert!(spec.prompt.contains("A) Quiz (5 questions)"));
        assert!(spec.prompt.contains("B) Flashcards (8)"));
        assert_eq!(spec.max_output_tokens, 380);
    }

    #[test]
    fn quiz_falls_back_to_topic_when_notes_blank() {
        let request = StudyRequest::new(Mode::Quiz)
            .with_topic("Cells")
            .with_notes("   ");
        let spec = build_prompt(&request, &PromptProfile::default()).unwrap();

        assert!(spec.prompt.starts_with("Create a medium quiz"));
        assert!(spec.prompt.ends_with("CONTENT:\nCells"));
    }

    #[test]
    fn flowchart_requests_markup_only() {
        let request = StudyRequest::new(Mode::Flowchart).with_topic("Water cycle");
        let spec = build_prompt(&request, &PromptProfile::default()).unwrap();

        assert!(spec.prompt.contains("flowchart TD"));
        assert!(spec.prompt.contains("between 6 and 12 nodes"));
        assert!(spec.prompt.contains("No prose"));
        assert_eq!(spec.max_output_tokens, 400);
    }

    #[test]
    fn missing_inputs_are_rejected_per_mode() {
        let profile = PromptProfile::default();
        let cases = [
            (Mode::Explain, ValidationError::MissingTopic),
            (Mode::Summarize, ValidationError::MissingNotes),
            (Mode::Quiz, ValidationError::MissingContent),
            (Mode::Flowchart, ValidationError::MissingContent),
        ];

        for (mode, expected) in cases {
            let request = StudyRequest::new(mode).with_topic(" ").with_notes("\n");
            assert_eq!(build_prompt(&request, &profile), Err(expected), "{mode:?}");
        }
    }

    #[test]
    fn explain_ignores_notes_without_topic() {
        let request = StudyRequest::new(Mode::Explain).with_notes("Some notes");
        assert_eq!(
            build_prompt(&request, &PromptProfile::default()),
            Err(ValidationError::MissingTopic)
        );
    }

    #[test]
    fn same_input_same_prompt() {
        let profile = PromptProfile::default();
        let request = StudyRequest::new(Mode::Quiz).with_topic("Enzymes");
        assert_eq!(
            build_prompt(&request, &profile),
            build_prompt(&request.clone(), &profile)
        );
    }
}

//! Prompt construction for each study mode.
//!
//! Everything here is pure: no I/O, no clock, no randomness.

mod request;
mod templates;

pub use request::{Difficulty, Mode, StudyRequest, ValidationError};
pub use templates::{build_prompt, PromptProfile, PromptSpec};

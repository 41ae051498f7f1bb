//! Study helper backed by a hosted text-generation model.
//!
//! A submission flows through [`service::StudyService`]: the mode's prompt is
//! built ([`prompt`]), the per-session cooldown is checked ([`session`]), and
//! the prompt runs through the retrying [`generation::GenerationClient`]
//! against a [`generation::TextGenerator`] such as [`remote::GeminiClient`].

pub mod config;
pub mod generation;
pub mod logging;
pub mod prompt;
pub mod remote;
pub mod server;
pub mod service;
pub mod session;

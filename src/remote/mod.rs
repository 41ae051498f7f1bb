//! Boundary adapters for hosted text-generation APIs.

mod dto;
mod gemini;

pub use gemini::GeminiClient;

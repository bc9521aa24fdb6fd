//! studycomp-providers: text-generation provider integrations.
//!
//! Implements the `TextGenerator` trait for OpenAI-compatible APIs, Google
//! Gemini, and Ollama, plus a scripted mock, so the quiz engine can draw on
//! any of them as an optional source of questions and explanations.

pub mod config;
pub mod gemini;
mod http;
pub mod mock;
pub mod ollama;
pub mod openai;

pub use config::{create_provider, load_config, load_config_from, ProviderConfig, StudycompConfig};
pub use studycomp_core::error::ProviderError;

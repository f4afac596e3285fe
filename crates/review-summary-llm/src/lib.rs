//! review-summary-llm: OpenAI-compatible generation backend
//!
//! [`OpenAiGenerator`] implements [`SummaryGenerator`] over the
//! chat-completions endpoint of any OpenAI-compatible server.
//!
//! [`SummaryGenerator`]: review_summary_core::SummaryGenerator

mod client;
mod config;
mod prompt;

pub use client::OpenAiGenerator;
pub use config::OpenAiConfig;
pub use prompt::{render_prompt, REVIEWS_PLACEHOLDER, SUMMARY_TEMPLATE};

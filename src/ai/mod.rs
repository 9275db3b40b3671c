//! AI explanations and word-problem solving.
//!
//! Requests go to a remote text service through the [`TextService`] trait.
//! They run as background tasks and report back through the
//! [`ExplanationPipeline`], which owns the latest explanation and answer.

mod error;
mod explanation;
mod pipeline;
mod service;

pub use error::AiError;
pub use explanation::{AiExplanation, WordProblemAnswer};
pub use pipeline::{AiUpdate, ExplanationPipeline};
pub use service::{LlmTextService, TextRequest, TextService};

#[cfg(test)]
pub use service::testing;

//! Prompts and response parsing for the two AI flows.

use super::error::AiError;
use super::service::TextRequest;
use serde::{Deserialize, Serialize};

/// Shown in place of an answer when a word problem could not be solved.
pub const SOLVE_APOLOGY: &str = "Sorry, I couldn't solve that problem.";

const SOLVER_SYSTEM: &str = "You are a helpful math assistant. Focus on accuracy and clarity.";

/// Structured explanation of one calculation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiExplanation {
    /// High-level summary of the calculation.
    pub explanation: String,
    /// How the result was reached, in order.
    pub steps: Vec<String>,
    /// Related shortcuts or tips.
    pub tips: Vec<String>,
}

/// Free-form answer to a word problem.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordProblemAnswer {
    pub problem: String,
    pub text: String,
}

impl WordProblemAnswer {
    /// The numeric result, when the first line of the answer is a number.
    pub fn numeric_answer(&self) -> Option<&str> {
        let first = self
            .text
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())?;
        let candidate = first.trim_matches('*').trim();
        candidate
            .replace(',', "")
            .parse::<f64>()
            .is_ok()
            .then_some(candidate)
    }
}

/// Request asking for a JSON explanation of `expression = result`.
pub fn explanation_request(expression: &str, result: &str) -> TextRequest {
    let prompt = format!(
        "Explain the calculation: {expression} = {result}.\n\
         Break it down into simple steps and give one or two helpful math tips \
         related to this kind of operation.\n\
         Reply with a single JSON object and nothing else, using exactly these keys:\n\
         \"explanation\": a short summary string,\n\
         \"steps\": an array of strings describing each step,\n\
         \"tips\": an array of strings with related tips or shortcuts."
    );

    TextRequest {
        system: None,
        prompt,
    }
}

/// Request asking for a word problem's answer, number first.
pub fn word_problem_request(problem: &str) -> TextRequest {
    TextRequest {
        system: Some(SOLVER_SYSTEM.to_string()),
        prompt: format!(
            "Solve this math word problem. Put the numeric result alone on the very first line, \
             followed by a short explanation: {problem}"
        ),
    }
}

/// Parse the service's reply into an [`AiExplanation`].
///
/// Models sometimes wrap JSON in a Markdown code fence; the fence is ignored.
pub fn parse_explanation(text: &str) -> Result<AiExplanation, AiError> {
    let body = strip_code_fence(text.trim());
    if body.is_empty() {
        return Err(AiError::EmptyResponse);
    }
    Ok(serde_json::from_str(body)?)
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Skip the info string (e.g. "json") on the opening line.
    let rest = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

//! Rendering for the AI explanation and word-problem panels.

use crate::ai::{AiExplanation, WordProblemAnswer};

/// Render the live explanation, with a loading line while a request is pending.
pub fn render_explanation(explanation: Option<&AiExplanation>, loading: bool) -> String {
    let mut lines = Vec::new();
    if loading {
        lines.push("AI insight: thinking…".to_string());
    }

    match explanation {
        Some(explanation) => {
            lines.push(format!("AI insight: {}", explanation.explanation));
            if !explanation.steps.is_empty() {
                lines.push("Steps:".to_string());
                lines.extend(
                    explanation
                        .steps
                        .iter()
                        .enumerate()
                        .map(|(i, step)| format!("  {}. {}", i + 1, step)),
                );
            }
            if !explanation.tips.is_empty() {
                lines.push("Tips:".to_string());
                lines.extend(explanation.tips.iter().map(|tip| format!("  • {}", tip)));
            }
        }
        None if !loading => lines.push("Complete a calculation to get an AI insight.".to_string()),
        None => {}
    }

    lines.join("\n")
}

/// Render the word-problem answer panel.
pub fn render_answer(answer: Option<&WordProblemAnswer>, solving: bool) -> String {
    if solving {
        return "Solving…".to_string();
    }

    match answer {
        Some(answer) => match answer.numeric_answer() {
            Some(number) => format!("Answer: {}\n{}", number, answer.text.trim()),
            None => answer.text.trim().to_string(),
        },
        None => "No word problem submitted yet.".to_string(),
    }
}

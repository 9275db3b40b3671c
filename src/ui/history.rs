//! History panel rendering.

use crate::history::HistoryLog;
use chrono::{DateTime, Local};

/// Render the history newest-first, numbered from 1 for `:select`.
pub fn render_history(history: &HistoryLog) -> String {
    if history.is_empty() {
        return "No calculations yet.".to_string();
    }

    history
        .iter()
        .enumerate()
        .map(|(i, calc)| {
            let time = DateTime::from_timestamp_millis(calc.timestamp)
                .map(|utc| utc.with_timezone(&Local).format("%H:%M:%S").to_string())
                .unwrap_or_default();
            format!("{:>2}. {} = {}  ({})", i + 1, calc.expression, calc.result, time)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

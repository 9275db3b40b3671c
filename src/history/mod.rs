//! Bounded log of completed calculations.

use crate::calculator::Record;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use uuid::Uuid;

/// Maximum number of calculations kept; older ones are dropped for good.
pub const HISTORY_LIMIT: usize = 20;

/// A completed calculation. Never changes once logged.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calculation {
    /// Unique identifier for this entry.
    pub id: String,
    /// The expression as it was shown, e.g. `5 + 3` or `hypot(3,4)`.
    pub expression: String,
    /// The formatted result.
    pub result: String,
    /// Creation time in milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl Calculation {
    /// Create a calculation with a fresh identifier and the current time.
    pub fn new(expression: impl Into<String>, result: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            expression: expression.into(),
            result: result.into(),
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}

impl From<Record> for Calculation {
    fn from(record: Record) -> Self {
        Self::new(record.expression, record.result)
    }
}

/// Newest-first history of calculations.
#[derive(Clone, Debug, Default)]
pub struct HistoryLog {
    entries: VecDeque<Calculation>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log a calculation as the newest entry, evicting the oldest beyond the limit.
    pub fn push(&mut self, calculation: Calculation) -> &Calculation {
        self.entries.push_front(calculation);
        while self.entries.len() > HISTORY_LIMIT {
            if let Some(evicted) = self.entries.pop_back() {
                tracing::debug!(id = %evicted.id, "evicted oldest calculation");
            }
        }
        &self.entries[0]
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Look up an entry by its identifier.
    pub fn get(&self, id: &str) -> Option<&Calculation> {
        self.entries.iter().find(|calc| calc.id == id)
    }

    /// Entry at `index`, 0 being the newest.
    pub fn nth(&self, index: usize) -> Option<&Calculation> {
        self.entries.get(index)
    }

    /// Entries from newest to oldest.
    pub fn iter(&self) -> impl Iterator<Item = &Calculation> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// JSON array of the entries, newest first.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.entries)
    }
}

//! Display state of the calculator.
//!
//! The calculator only ever holds two text slots: the buffer the user is
//! typing into and the committed left operand with its operator.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Marker shown in the display after a failed evaluation.
pub const ERROR_MARKER: &str = "Error";

/// Separator between values entered for aggregate functions.
pub const SEPARATOR: char = ',';

/// The two text slots driven by key presses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CalculatorState {
    /// Current entry buffer. Never empty.
    pub display: String,
    /// Pending `"<operand> <op> "` prefix, empty when no operator is pending.
    pub expression: String,
}

impl Default for CalculatorState {
    fn default() -> Self {
        Self {
            display: "0".to_string(),
            expression: String::new(),
        }
    }
}

impl CalculatorState {
    /// Build a state from explicit slot values.
    pub fn new(display: impl Into<String>, expression: impl Into<String>) -> Self {
        let display = display.into();
        Self {
            display: if display.is_empty() {
                "0".to_string()
            } else {
                display
            },
            expression: expression.into(),
        }
    }

    /// State showing the error marker, keeping the pending expression.
    pub fn errored(&self) -> Self {
        Self {
            display: ERROR_MARKER.to_string(),
            expression: self.expression.clone(),
        }
    }

    /// Same expression, different display.
    pub fn with_display(&self, display: impl Into<String>) -> Self {
        Self::new(display, self.expression.clone())
    }

    pub fn is_error(&self) -> bool {
        self.display == ERROR_MARKER
    }

    pub fn is_zero(&self) -> bool {
        self.display == "0"
    }

    pub fn has_pending_operator(&self) -> bool {
        !self.expression.is_empty()
    }

    /// The comma-delimited segment currently being typed.
    pub fn trailing_segment(&self) -> &str {
        self.display.rsplit(SEPARATOR).next().unwrap_or_default()
    }
}

/// Which extra key rows are offered to the user.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalculatorMode {
    #[default]
    Basic,
    Scientific,
    Custom,
}

impl CalculatorMode {
    pub const ALL: [CalculatorMode; 3] = [Self::Basic, Self::Scientific, Self::Custom];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Scientific => "scientific",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for CalculatorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CalculatorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown calculator mode: {}", s))
    }
}

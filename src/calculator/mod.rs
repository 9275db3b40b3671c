//! Calculator core: display state, key handling and evaluation.
//!
//! This module provides:
//! - The two display slots and the calculator mode
//! - Pure key-press transitions over those slots
//! - A restricted two-operand evaluator plus scientific and aggregate functions
//! - Clipboard export of the display

mod clipboard;
mod evaluation;
mod format;
mod input;
mod state;

pub use clipboard::copy_display;
pub use evaluation::{
    AggregateFn, EvalError, Operator, Record, ScientificFn, Transition, evaluate_expression,
};
pub use input::{Key, apply};
pub use state::{CalculatorMode, CalculatorState, ERROR_MARKER};

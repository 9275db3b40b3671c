use crate::calculator::{CalculatorMode, Key};

/// Everything the presentation layer can ask the controller to do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// A calculator key press.
    Key(Key),
    SetMode(CalculatorMode),
    /// Restore display and expression from a history entry, by id.
    SelectHistory(String),
    ClearHistory,
    /// Free-text problem for the AI solver.
    SolveWordProblem(String),
}

impl From<Key> for Event {
    fn from(key: Key) -> Self {
        Self::Key(key)
    }
}

//! Plain-text rendering of the calculator for the terminal front end.
//!
//! Every function returns a `String`; printing is left to the caller.

mod ai;
mod calculator;
mod history;

pub use ai::{render_answer, render_explanation};
pub use calculator::{render_display, render_keypad};
pub use history::render_history;

/// Width of the display panel, in characters.
pub const PANEL_WIDTH: usize = 36;

/// Usage text for the terminal front end.
pub fn help() -> String {
    [
        "Type keys on one line, e.g. `12.5*4=`, `3,4 hyp`, `16 sqrt`.",
        "  digits . , + - * / × ÷ = %   neg (±)   ac (clear)   bs (backspace)",
        "  sin cos tan sqrt (√) sq (x²) log pi (π)   max hyp",
        "Commands:",
        "  :mode basic|scientific|custom   :history [json]   :select <n>",
        "  :clear-history   :solve <word problem>   :explain   :copy   :quit",
    ]
    .join("\n")
}

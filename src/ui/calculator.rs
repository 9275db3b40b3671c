//! Display and keypad rendering.

use super::PANEL_WIDTH;
use crate::calculator::{CalculatorMode, CalculatorState};

/// Render the display panel: mode tabs, pending expression, then the value.
///
/// The expression sits on its own muted line above the value, both
/// right-aligned like a pocket calculator.
pub fn render_display(state: &CalculatorState, mode: CalculatorMode) -> String {
    let tabs: Vec<String> = CalculatorMode::ALL
        .iter()
        .map(|m| {
            if *m == mode {
                format!("[{}]", m)
            } else {
                format!(" {} ", m)
            }
        })
        .collect();

    let border = "─".repeat(PANEL_WIDTH);
    format!(
        "{tabs}\n{border}\n{expression:>width$}\n{display:>width$}\n{border}",
        tabs = tabs.join(" "),
        expression = state.expression.trim_end(),
        display = state.display,
        width = PANEL_WIDTH,
    )
}

/// Keys available in `mode`, extra rows first.
pub fn render_keypad(mode: CalculatorMode) -> String {
    let mut rows: Vec<&str> = match mode {
        CalculatorMode::Basic => Vec::new(),
        CalculatorMode::Scientific => vec!["sin  cos  tan  √", "log  x²   π"],
        CalculatorMode::Custom => vec!["max  hyp  ,"],
    };
    rows.extend([
        "AC   ⌫    %    ÷",
        "7    8    9    ×",
        "4    5    6    -",
        "1    2    3    +",
        "±    0    .    =",
    ]);
    rows.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_shows_both_slots() {
        let rendered = render_display(&CalculatorState::new("3", "5 + "), CalculatorMode::Basic);
        let lines: Vec<&str> = rendered.lines().collect();

        assert!(lines[0].starts_with("[basic]"));
        assert!(lines[2].ends_with("5 +"));
        assert!(lines[3].ends_with('3'));
        assert_eq!(lines[3].chars().count(), PANEL_WIDTH);
    }

    #[test]
    fn test_keypad_depends_on_mode() {
        assert!(!render_keypad(CalculatorMode::Basic).contains("sin"));
        assert!(render_keypad(CalculatorMode::Scientific).contains("sin"));
        assert!(render_keypad(CalculatorMode::Custom).contains("hyp"));
        assert!(!render_keypad(CalculatorMode::Custom).contains("sin"));
    }
}

//! Key handling for the calculator.
//!
//! Every key maps to a pure transition from one [`CalculatorState`] to the
//! next. Invalid input never fails; it shows up as the error marker in the
//! display instead.

use super::evaluation::{
    self, AggregateFn, Operator, ScientificFn, Transition, apply_aggregate, apply_scientific,
};
use super::format::{self, parse_float_prefix};
use super::state::{CalculatorState, SEPARATOR};

/// A single calculator key press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Digit(u8),
    Operator(Operator),
    Evaluate,
    Clear,
    Backspace,
    Decimal,
    Separator,
    ToggleSign,
    Percent,
    Scientific(ScientificFn),
    Aggregate(AggregateFn),
}

/// Apply one key press to the state.
pub fn apply(state: &CalculatorState, key: Key) -> Transition {
    let next = match key {
        Key::Digit(digit) => enter_digit(state, digit),
        Key::Operator(op) => enter_operator(state, op),
        Key::Evaluate => return evaluation::evaluate(state),
        Key::Clear => clear(),
        Key::Backspace => backspace(state),
        Key::Decimal => enter_decimal(state),
        Key::Separator => enter_separator(state),
        Key::ToggleSign => toggle_sign(state),
        Key::Percent => percent(state),
        Key::Scientific(func) => return apply_scientific(state, func),
        Key::Aggregate(func) => return apply_aggregate(state, func),
    };

    Transition::silent(next)
}

/// Digits replace a lone zero or the error marker, otherwise append.
pub fn enter_digit(state: &CalculatorState, digit: u8) -> CalculatorState {
    let digit = char::from(b'0' + digit.min(9));
    if state.is_zero() || state.is_error() {
        state.with_display(digit.to_string())
    } else {
        state.with_display(format!("{}{}", state.display, digit))
    }
}

/// Commit the display as left operand. A previously pending operator is replaced.
pub fn enter_operator(state: &CalculatorState, op: Operator) -> CalculatorState {
    CalculatorState::new("0", format!("{} {} ", state.display, op.symbol()))
}

pub fn enter_separator(state: &CalculatorState) -> CalculatorState {
    if state.is_error() {
        return state.clone();
    }
    state.with_display(format!("{}{}", state.display, SEPARATOR))
}

/// Adds a point unless the segment being typed already has one.
pub fn enter_decimal(state: &CalculatorState) -> CalculatorState {
    if state.trailing_segment().contains('.') {
        return state.clone();
    }
    state.with_display(format!("{}.", state.display))
}

pub fn toggle_sign(state: &CalculatorState) -> CalculatorState {
    if state.is_zero() || state.is_error() {
        return state.clone();
    }

    match state.display.strip_prefix('-') {
        Some(positive) => state.with_display(positive),
        None => state.with_display(format!("-{}", state.display)),
    }
}

pub fn backspace(state: &CalculatorState) -> CalculatorState {
    let mut display = state.display.clone();
    display.pop();
    // with_display turns an emptied buffer back into "0".
    state.with_display(display)
}

pub fn clear() -> CalculatorState {
    CalculatorState::default()
}

/// Divide the display by 100. Non-numeric displays turn into the error marker.
pub fn percent(state: &CalculatorState) -> CalculatorState {
    match parse_float_prefix(&state.display) {
        Some(value) if value.is_finite() => state.with_display(format::full(value / 100.0)),
        _ => state.errored(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::state::ERROR_MARKER;

    fn press(state: &CalculatorState, keys: &[Key]) -> CalculatorState {
        keys.iter()
            .fold(state.clone(), |state, key| apply(&state, *key).state)
    }

    fn display(value: &str) -> CalculatorState {
        CalculatorState::new(value, "")
    }

    #[test]
    fn test_digits_replace_zero_and_error() {
        assert_eq!(enter_digit(&display("0"), 7).display, "7");
        assert_eq!(enter_digit(&display(ERROR_MARKER), 4).display, "4");
        assert_eq!(enter_digit(&display("12"), 3).display, "123");
        assert_eq!(enter_digit(&display("0.5"), 0).display, "0.50");
    }

    #[test]
    fn test_operator_sets_pending_expression() {
        let state = enter_operator(&display("12"), Operator::Multiply);
        assert_eq!(state.display, "0");
        assert_eq!(state.expression, "12 × ");
    }

    #[test]
    fn test_last_operator_wins() {
        let state = press(
            &CalculatorState::default(),
            &[
                Key::Digit(5),
                Key::Operator(Operator::Add),
                Key::Operator(Operator::Subtract),
            ],
        );
        // The second operator commits the reset display, not the first operand.
        assert_eq!(state.expression, "0 - ");
        assert_eq!(state.display, "0");
    }

    #[test]
    fn test_separator() {
        assert_eq!(enter_separator(&display("3")).display, "3,");
        assert_eq!(enter_separator(&display(ERROR_MARKER)).display, ERROR_MARKER);
    }

    #[test]
    fn test_decimal_once_per_segment() {
        let state = enter_decimal(&display("3"));
        assert_eq!(state.display, "3.");
        assert_eq!(enter_decimal(&state), state);

        let state = press(&display("1.5"), &[Key::Decimal, Key::Decimal]);
        assert_eq!(state.display, "1.5");

        let state = press(&display("1.5"), &[Key::Separator, Key::Decimal, Key::Decimal]);
        assert_eq!(state.display, "1.5,.");
    }

    #[test]
    fn test_toggle_sign() {
        assert_eq!(toggle_sign(&display("0")).display, "0");
        assert_eq!(toggle_sign(&display(ERROR_MARKER)).display, ERROR_MARKER);
        assert_eq!(toggle_sign(&display("8")).display, "-8");
        assert_eq!(toggle_sign(&display("-8")).display, "8");
    }

    #[test]
    fn test_backspace() {
        assert_eq!(backspace(&display("123")).display, "12");
        assert_eq!(backspace(&display("7")).display, "0");
        assert_eq!(backspace(&display("0")).display, "0");
        assert_eq!(backspace(&display("Error")).display, "Erro");
    }

    #[test]
    fn test_clear_resets_everything() {
        for state in [
            CalculatorState::new("123", "4 + "),
            CalculatorState::new(ERROR_MARKER, "9 ÷ "),
            CalculatorState::default(),
        ] {
            let cleared = apply(&state, Key::Clear);
            assert_eq!(cleared.state, CalculatorState::default());
            assert!(cleared.record.is_none());
        }
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(&display("50")).display, "0.5");
        assert_eq!(percent(&display("-5")).display, "-0.05");
        assert_eq!(percent(&display(ERROR_MARKER)).display, ERROR_MARKER);
    }

    #[test]
    fn test_keys_end_to_end() {
        let transition = apply(
            &press(
                &CalculatorState::default(),
                &[
                    Key::Digit(1),
                    Key::Digit(2),
                    Key::Decimal,
                    Key::Digit(5),
                    Key::Operator(Operator::Divide),
                    Key::Digit(5),
                ],
            ),
            Key::Evaluate,
        );
        assert_eq!(transition.state.display, "2.5");
        assert_eq!(transition.record.unwrap().expression, "12.5 ÷ 5");
    }
}

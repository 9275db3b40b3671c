//! Expression evaluation for the calculator.
//!
//! Arithmetic goes through a deliberately tiny grammar: one optionally signed
//! number, one of the four binary operators, and a second optionally signed
//! number. Nothing else is accepted, so any other text that ends up in the
//! pending expression (for instance a recalled `sin(30)` entry) evaluates to
//! the error marker.

use super::format::{self, parse_float_prefix};
use super::state::{CalculatorState, SEPARATOR};
use std::f64::consts::PI;
use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;
use thiserror::Error;

/// Why an evaluation produced the error marker.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum EvalError {
    #[error("multiple values cannot be used in arithmetic")]
    MultipleValues,
    #[error("expected a number at position {0}")]
    ExpectedNumber(usize),
    #[error("expected an operator at position {0}")]
    ExpectedOperator(usize),
    #[error("unexpected trailing input at position {0}")]
    TrailingInput(usize),
    #[error("invalid number literal: {0}")]
    InvalidNumber(String),
    #[error("division by zero")]
    DivisionByZero,
    #[error("not a number: {0}")]
    NotANumber(String),
    #[error("result is not a finite number")]
    NonFinite,
}

/// Binary operator keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    /// Symbol as shown in the pending expression.
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "×",
            Self::Divide => "÷",
        }
    }

    /// Accepts both display symbols and their ASCII forms.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Self::Add),
            '-' => Some(Self::Subtract),
            '*' | '×' => Some(Self::Multiply),
            '/' | '÷' => Some(Self::Divide),
            _ => None,
        }
    }

    pub fn apply(&self, lhs: f64, rhs: f64) -> Result<f64, EvalError> {
        match self {
            Self::Add => Ok(lhs + rhs),
            Self::Subtract => Ok(lhs - rhs),
            Self::Multiply => Ok(lhs * rhs),
            Self::Divide if rhs == 0.0 => Err(EvalError::DivisionByZero),
            Self::Divide => Ok(lhs / rhs),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Single-argument functions of the scientific key row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScientificFn {
    Sin,
    Cos,
    Tan,
    Sqrt,
    Square,
    Log10,
    Pi,
}

impl ScientificFn {
    pub const ALL: [ScientificFn; 7] = [
        Self::Sin,
        Self::Cos,
        Self::Tan,
        Self::Sqrt,
        Self::Square,
        Self::Log10,
        Self::Pi,
    ];

    /// Key label, also used as the function name in history entries.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Sqrt => "√",
            Self::Square => "x²",
            Self::Log10 => "log",
            Self::Pi => "π",
        }
    }

    fn apply(&self, value: f64) -> f64 {
        match self {
            Self::Sin => value.sin(),
            Self::Cos => value.cos(),
            Self::Tan => value.tan(),
            Self::Sqrt => value.sqrt(),
            Self::Square => value.powi(2),
            Self::Log10 => value.log10(),
            Self::Pi => PI,
        }
    }
}

/// Functions over several comma-separated values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AggregateFn {
    Max,
    Hypot,
}

impl AggregateFn {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Max => "max",
            Self::Hypot => "hypot",
        }
    }
}

/// A completed calculation, before the history assigns it an identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    pub expression: String,
    pub result: String,
}

/// Next state plus the calculation to log, if any.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    pub state: CalculatorState,
    pub record: Option<Record>,
}

impl Transition {
    pub fn silent(state: CalculatorState) -> Self {
        Self {
            state,
            record: None,
        }
    }

    pub fn recorded(state: CalculatorState, expression: String, result: String) -> Self {
        Self {
            state,
            record: Some(Record { expression, result }),
        }
    }
}

/// A parsed `lhs op rhs` expression.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BinaryExpr {
    pub lhs: f64,
    pub op: Operator,
    pub rhs: f64,
}

impl BinaryExpr {
    pub fn eval(&self) -> Result<f64, EvalError> {
        let value = self.op.apply(self.lhs, self.rhs)?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(EvalError::NonFinite)
        }
    }
}

/// Parse `[sign]number op [sign]number`, whitespace-tolerant.
pub fn parse_binary(input: &str) -> Result<BinaryExpr, EvalError> {
    let mut parser = Parser {
        input,
        chars: input.char_indices().peekable(),
    };

    let lhs = parser.operand()?;
    let op = parser.operator()?;
    let rhs = parser.operand()?;
    parser.finish()?;

    Ok(BinaryExpr { lhs, op, rhs })
}

struct Parser<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl Parser<'_> {
    fn skip_whitespace(&mut self) {
        while self.chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}
    }

    fn position(&mut self) -> usize {
        self.chars
            .peek()
            .map(|(i, _)| *i)
            .unwrap_or(self.input.len())
    }

    fn digits(&mut self) -> usize {
        let mut count = 0;
        while self.chars.next_if(|(_, c)| c.is_ascii_digit()).is_some() {
            count += 1;
        }
        count
    }

    fn operand(&mut self) -> Result<f64, EvalError> {
        self.skip_whitespace();
        let start = self.position();

        self.chars.next_if(|(_, c)| *c == '+' || *c == '-');

        let mut mantissa_digits = self.digits();
        if self.chars.next_if(|(_, c)| *c == '.').is_some() {
            mantissa_digits += self.digits();
        }
        if mantissa_digits == 0 {
            return Err(EvalError::ExpectedNumber(start));
        }

        if self.chars.next_if(|(_, c)| *c == 'e' || *c == 'E').is_some() {
            self.chars.next_if(|(_, c)| *c == '+' || *c == '-');
            if self.digits() == 0 {
                return Err(EvalError::ExpectedNumber(self.position()));
            }
        }

        let end = self.position();
        let literal = &self.input[start..end];
        literal
            .parse()
            .map_err(|_| EvalError::InvalidNumber(literal.to_string()))
    }

    fn operator(&mut self) -> Result<Operator, EvalError> {
        self.skip_whitespace();
        let position = self.position();
        self.chars
            .next()
            .and_then(|(_, c)| Operator::from_char(c))
            .ok_or(EvalError::ExpectedOperator(position))
    }

    fn finish(&mut self) -> Result<(), EvalError> {
        self.skip_whitespace();
        match self.chars.peek() {
            None => Ok(()),
            Some((i, _)) => Err(EvalError::TrailingInput(*i)),
        }
    }
}

/// Evaluate the full expression `expression + display` (the `=` key).
///
/// Does nothing while no operator is pending.
pub fn evaluate(state: &CalculatorState) -> Transition {
    if !state.has_pending_operator() {
        return Transition::silent(state.clone());
    }

    let full_expression = format!("{}{}", state.expression, state.display);
    match evaluate_expression(&full_expression) {
        Ok(value) => {
            let result = format::full(value);
            tracing::debug!(%full_expression, %result, "evaluated");
            Transition::recorded(CalculatorState::new(result.clone(), ""), full_expression, result)
        }
        Err(err) => {
            tracing::debug!(%full_expression, error = %err, "evaluation failed");
            Transition::silent(state.errored())
        }
    }
}

/// Evaluate a full expression string in display notation.
pub fn evaluate_expression(full_expression: &str) -> Result<f64, EvalError> {
    if full_expression.contains(SEPARATOR) {
        return Err(EvalError::MultipleValues);
    }

    let sanitized = full_expression.replace('×', "*").replace('÷', "/");
    parse_binary(&sanitized)?.eval()
}

/// Apply a scientific function to the display.
///
/// `π` replaces the display without logging anything.
pub fn apply_scientific(state: &CalculatorState, func: ScientificFn) -> Transition {
    if func == ScientificFn::Pi {
        return Transition::silent(state.with_display(format::full(PI)));
    }

    let Some(input) = parse_float_prefix(&state.display) else {
        tracing::debug!(display = %state.display, func = func.label(), "not a number");
        return Transition::silent(state.errored());
    };

    let value = func.apply(input);
    if !value.is_finite() {
        tracing::debug!(input, func = func.label(), "function result out of domain");
        return Transition::silent(state.errored());
    }

    let result = format::fixed4(value);
    let expression = format!("{}({})", func.label(), format::full(input));
    Transition::recorded(state.with_display(result.clone()), expression, result)
}

/// Apply an aggregate function to the comma-separated display values.
///
/// Segments that are not numbers are skipped; with no numbers left the
/// state is returned unchanged.
pub fn apply_aggregate(state: &CalculatorState, func: AggregateFn) -> Transition {
    let values: Vec<f64> = state
        .display
        .split(SEPARATOR)
        .filter_map(|segment| parse_float_prefix(segment.trim()))
        .collect();

    if values.is_empty() {
        return Transition::silent(state.clone());
    }

    let (value, result) = match func {
        AggregateFn::Max => {
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            (max, format::full(max))
        }
        AggregateFn::Hypot => {
            let hypot = values.iter().map(|v| v * v).sum::<f64>().sqrt();
            (hypot, format::fixed4(hypot))
        }
    };

    if !value.is_finite() {
        return Transition::silent(state.errored());
    }

    let expression = format!("{}({})", func.name(), state.display);
    Transition::recorded(state.with_display(result.clone()), expression, result)
}

//! Mapping raw keyboard and terminal input to calculator keys and commands.
//!
//! A terminal line is either a `:command` or a run of key tokens such as
//! `12.5*4=` or `3,4 hyp`.

use crate::calculator::{AggregateFn, CalculatorMode, Key, Operator, ScientificFn};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// One key token. Longer names come first so `sqrt` wins over `sq`.
    static ref KEY_TOKEN: Regex = Regex::new(
        r"(?i)sqrt|hypot|sin|cos|tan|log|max|hyp|neg|pi|sq|ac|bs|x²|√|π|±|[0-9+\-*/×÷=.,%]"
    ).unwrap();
}

/// Commands that are not calculator keys.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Mode(CalculatorMode),
    History { json: bool },
    /// Recall the n-th history entry, 1 being the newest.
    Select(usize),
    ClearHistory,
    Solve(String),
    Explain,
    Copy,
    Help,
    Quit,
}

/// One parsed terminal line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Input {
    Keys(Vec<Key>),
    Command(Command),
    Empty,
}

/// Map a physical keyboard key name to a calculator key.
///
/// Accepts digits, `+ - * /`, `Enter`/`=`, `Backspace`, `Escape`, `.` and `,`.
pub fn key_event(key: &str) -> Option<Key> {
    match key {
        "Enter" | "=" => Some(Key::Evaluate),
        "Backspace" => Some(Key::Backspace),
        "Escape" => Some(Key::Clear),
        "." => Some(Key::Decimal),
        "," => Some(Key::Separator),
        _ => {
            let mut chars = key.chars();
            let c = chars.next()?;
            if chars.next().is_some() {
                return None;
            }
            if let Some(digit) = c.to_digit(10) {
                return Some(Key::Digit(digit as u8));
            }
            match c {
                '+' | '-' | '*' | '/' => Operator::from_char(c).map(Key::Operator),
                _ => None,
            }
        }
    }
}

/// Parse a terminal line.
pub fn parse_input(line: &str) -> Result<Input, String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(Input::Empty);
    }

    match trimmed.strip_prefix(':') {
        Some(command) => parse_command(command).map(Input::Command),
        None => parse_keys(trimmed).map(Input::Keys),
    }
}

fn parse_command(command: &str) -> Result<Command, String> {
    let (name, arg) = command
        .trim()
        .split_once(char::is_whitespace)
        .map(|(name, arg)| (name, arg.trim()))
        .unwrap_or((command.trim(), ""));

    match name.to_lowercase().as_str() {
        "mode" => arg.parse().map(Command::Mode),
        "history" | "h" => Ok(Command::History {
            json: arg.eq_ignore_ascii_case("json"),
        }),
        "select" | "s" => match arg.parse::<usize>() {
            Ok(n) if n > 0 => Ok(Command::Select(n)),
            _ => Err(format!("Expected a history number, got '{}'", arg)),
        },
        "clear-history" => Ok(Command::ClearHistory),
        "solve" if arg.is_empty() => Err("Usage: :solve <word problem>".to_string()),
        "solve" => Ok(Command::Solve(arg.to_string())),
        "explain" => Ok(Command::Explain),
        "copy" => Ok(Command::Copy),
        "help" | "?" => Ok(Command::Help),
        "quit" | "q" | "exit" => Ok(Command::Quit),
        other => Err(format!("Unknown command: :{}", other)),
    }
}

/// Split a line into key presses.
fn parse_keys(line: &str) -> Result<Vec<Key>, String> {
    let mut keys = Vec::new();
    let mut last_end = 0;

    for token in KEY_TOKEN.find_iter(line) {
        check_gap(&line[last_end..token.start()])?;
        // The pattern only matches known tokens.
        if let Some(key) = token_key(token.as_str()) {
            keys.push(key);
        }
        last_end = token.end();
    }
    check_gap(&line[last_end..])?;

    Ok(keys)
}

fn check_gap(gap: &str) -> Result<(), String> {
    if gap.trim().is_empty() {
        Ok(())
    } else {
        Err(format!("Unrecognized input: {}", gap.trim()))
    }
}

fn token_key(token: &str) -> Option<Key> {
    let key = match token.to_lowercase().as_str() {
        "sin" => Key::Scientific(ScientificFn::Sin),
        "cos" => Key::Scientific(ScientificFn::Cos),
        "tan" => Key::Scientific(ScientificFn::Tan),
        "sqrt" | "√" => Key::Scientific(ScientificFn::Sqrt),
        "sq" | "x²" => Key::Scientific(ScientificFn::Square),
        "log" => Key::Scientific(ScientificFn::Log10),
        "pi" | "π" => Key::Scientific(ScientificFn::Pi),
        "max" => Key::Aggregate(AggregateFn::Max),
        "hyp" | "hypot" => Key::Aggregate(AggregateFn::Hypot),
        "neg" | "±" => Key::ToggleSign,
        "ac" => Key::Clear,
        "bs" => Key::Backspace,
        "%" => Key::Percent,
        "×" | "÷" => Key::Operator(Operator::from_char(token.chars().next()?)?),
        single => key_event(single)?,
    };
    Some(key)
}

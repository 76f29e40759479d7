//! Line-oriented interaction scripts replayed against the demo page.
//!
//! ```text
//! # comments and blank lines are skipped
//! click optimize
//! key ctrl+o
//! wait 500
//! fill exam-title Midterm
//! submit exam-form
//! resize 480 800
//! navigate
//! theme dark
//! language de
//! ```

use std::time::Duration;

use interaction_core::{KeyPress, Viewport};
use shared::domain::Theme;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Click(String),
    Submit(String),
    Fill { name: String, value: String },
    Key(KeyPress),
    Resize(Viewport),
    Navigate,
    Wait(Duration),
    Theme(Theme),
    Language(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    #[error("line {line}: unknown command '{command}'")]
    UnknownCommand { line: usize, command: String },
    #[error("line {line}: '{command}' expects {expected}")]
    MissingArgument {
        line: usize,
        command: &'static str,
        expected: &'static str,
    },
    #[error("line {line}: invalid {what} '{value}'")]
    InvalidArgument {
        line: usize,
        what: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub line: usize,
    pub command: Command,
}

pub fn parse(source: &str) -> Result<Vec<Step>, ScriptError> {
    source
        .lines()
        .enumerate()
        .filter_map(|(index, raw)| {
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                None
            } else {
                Some(parse_line(index + 1, trimmed))
            }
        })
        .collect()
}

fn parse_line(line: usize, text: &str) -> Result<Step, ScriptError> {
    let (verb, rest) = match text.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (text, ""),
    };
    let missing = |command, expected| ScriptError::MissingArgument {
        line,
        command,
        expected,
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "click" => Command::Click(single(rest).ok_or_else(|| missing("click", "an element name"))?),
        "submit" => {
            Command::Submit(single(rest).ok_or_else(|| missing("submit", "a form name"))?)
        }
        "fill" => {
            let (name, value) = rest
                .split_once(char::is_whitespace)
                .map(|(name, value)| (name, value.trim()))
                .unwrap_or((rest, ""));
            if name.is_empty() {
                return Err(missing("fill", "an element name and a value"));
            }
            Command::Fill {
                name: name.to_string(),
                value: value.to_string(),
            }
        }
        "key" => Command::Key(parse_key(line, rest)?),
        "resize" => {
            let mut parts = rest.split_whitespace();
            let (Some(width), Some(height)) = (parts.next(), parts.next()) else {
                return Err(missing("resize", "a width and a height"));
            };
            Command::Resize(Viewport {
                width: number(line, "width", width)?,
                height: number(line, "height", height)?,
            })
        }
        "navigate" => Command::Navigate,
        "wait" => {
            let millis = single(rest).ok_or_else(|| missing("wait", "a duration in milliseconds"))?;
            Command::Wait(Duration::from_millis(number(line, "duration", &millis)?))
        }
        "theme" => {
            let name = single(rest).ok_or_else(|| missing("theme", "light or dark"))?;
            Command::Theme(name.parse().map_err(|_| ScriptError::InvalidArgument {
                line,
                what: "theme",
                value: name.clone(),
            })?)
        }
        "language" => {
            Command::Language(single(rest).ok_or_else(|| missing("language", "a language code"))?)
        }
        other => {
            return Err(ScriptError::UnknownCommand {
                line,
                command: other.to_string(),
            })
        }
    };
    Ok(Step { line, command })
}

fn single(rest: &str) -> Option<String> {
    rest.split_whitespace().next().map(str::to_string)
}

fn number<T: std::str::FromStr>(line: usize, what: &'static str, raw: &str) -> Result<T, ScriptError> {
    raw.parse().map_err(|_| ScriptError::InvalidArgument {
        line,
        what,
        value: raw.to_string(),
    })
}

/// `ctrl+s`, `cmd+o`, `meta+o`, `escape`, or any bare key name.
fn parse_key(line: usize, raw: &str) -> Result<KeyPress, ScriptError> {
    if raw.is_empty() {
        return Err(ScriptError::MissingArgument {
            line,
            command: "key",
            expected: "a key combination",
        });
    }

    let mut press = KeyPress::plain("");
    let mut parts: Vec<&str> = raw.split('+').map(str::trim).collect();
    let key = parts.pop().unwrap_or_default();
    for modifier in parts {
        match modifier.to_ascii_lowercase().as_str() {
            "ctrl" | "control" => press.ctrl = true,
            "cmd" | "meta" => press.meta = true,
            _ => {
                return Err(ScriptError::InvalidArgument {
                    line,
                    what: "key modifier",
                    value: modifier.to_string(),
                })
            }
        }
    }

    if key.is_empty() {
        return Err(ScriptError::InvalidArgument {
            line,
            what: "key",
            value: raw.to_string(),
        });
    }
    press.key = if key.eq_ignore_ascii_case("escape") || key.eq_ignore_ascii_case("esc") {
        "Escape".to_string()
    } else if key.chars().count() == 1 {
        key.to_ascii_lowercase()
    } else {
        key.to_string()
    };
    Ok(press)
}

#[cfg(test)]
#[path = "tests/script_tests.rs"]
mod tests;

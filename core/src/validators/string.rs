//! String validation: type, length bounds, exact length, pattern.

use super::FieldContext;
use crate::error::{ErrorKind, ValidationResult};
use crate::message::MessageKey;
use crate::{StringRule, Value};

/// Checks a string against `rule`, reporting the first failing constraint.
///
/// Length counts Unicode scalar values. The pattern is compiled per call and
/// matched anywhere in the string unless it carries its own anchors.
pub(crate) fn check(value: &Value, rule: &StringRule, ctx: &FieldContext<'_>) -> ValidationResult {
    let Some(text) = value.as_str() else {
        return Err(ctx.type_mismatch("string"));
    };
    let length = text.chars().count();

    if let Some(min) = rule.min {
        if length < min {
            return Err(ctx.error(ErrorKind::TooShort, MessageKey::StringMin, &[&min]));
        }
    }
    if let Some(max) = rule.max {
        if length > max {
            return Err(ctx.error(ErrorKind::TooLong, MessageKey::StringMax, &[&max]));
        }
    }
    if let Some(len) = rule.len {
        if length != len {
            return Err(ctx.error(ErrorKind::WrongLength, MessageKey::StringLen, &[&len]));
        }
    }
    if let Some(source) = &rule.pattern {
        let matched = Pattern::compile(source)
            .and_then(|pattern| pattern.is_match(text))
            .map_err(|err| {
                tracing::debug!(pattern = %source, error = %err, "Rejected string pattern");
                ctx.error(
                    ErrorKind::InvalidPattern,
                    MessageKey::StringInvalidPattern,
                    &[source],
                )
            })?;
        if !matched {
            return Err(ctx.error(
                ErrorKind::PatternMismatch,
                MessageKey::StringPattern,
                &[source],
            ));
        }
    }

    Ok(value.clone())
}

/// A compiled `pattern`.
///
/// Patterns compile with `regex` when they can. Lookaround and
/// backreferences are only supported by the backtracking engine.
enum Pattern {
    Linear(regex::Regex),
    Backtracking(fancy_regex::Regex),
}

impl Pattern {
    fn compile(source: &str) -> Result<Self, fancy_regex::Error> {
        match regex::Regex::new(source) {
            Ok(regex) => Ok(Pattern::Linear(regex)),
            Err(_) => fancy_regex::Regex::new(source).map(Pattern::Backtracking),
        }
    }

    /// Fails only when the backtracking engine gives up on `text`.
    fn is_match(&self, text: &str) -> Result<bool, fancy_regex::Error> {
        match self {
            Pattern::Linear(regex) => Ok(regex.is_match(text)),
            Pattern::Backtracking(regex) => regex.is_match(text),
        }
    }
}

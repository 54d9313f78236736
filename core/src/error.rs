//! Error types for rule and schema validation.
//!
//! Validation never panics on bad input or bad rules: every failure is a
//! value. [`ValidationError`] describes why one value failed its rule,
//! [`SchemaError`] why an object (or a schema under construction) was
//! rejected, and [`ConfigError`] why a message catalog could not be parsed.

use indexmap::IndexMap;

use thiserror::Error;

use crate::Value;

/// Category of a single-value validation failure.
///
/// Configuration kinds point at a malformed rule; the rest describe a value
/// that does not satisfy a well-formed rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Rule has no `type`, or a `type` no validator handles.
    InvalidType,
    /// Rule's `valid` is not a sequence.
    InvalidValidRule,
    /// String rule's `pattern` is not a valid regular expression.
    InvalidPattern,
    /// Array rule's `items` has a type that cannot validate elements.
    InvalidItemType,
    /// Required value is absent or null.
    Required,
    /// Value is not in the rule's allowed list.
    NotAllowed,
    /// Value has the wrong primitive type.
    TypeMismatch,
    /// String or array is shorter than `min`.
    TooShort,
    /// String or array is longer than `max`.
    TooLong,
    /// String or array length differs from `len`.
    WrongLength,
    /// String does not match `pattern`.
    PatternMismatch,
    /// Number has a fractional part under an `integer` rule.
    NotInteger,
    /// Number or date is below `min`.
    BelowMinimum,
    /// Number or date is above `max`.
    AboveMaximum,
    /// Date value could not be parsed.
    InvalidDate,
    /// An array element failed its item rule.
    InvalidItem,
}

impl ErrorKind {
    /// Returns `true` when the failure stems from the rule rather than the value.
    pub fn is_configuration(self) -> bool {
        matches!(
            self,
            ErrorKind::InvalidType
                | ErrorKind::InvalidValidRule
                | ErrorKind::InvalidPattern
                | ErrorKind::InvalidItemType
        )
    }
}

/// A value failed its rule.
///
/// `Display` yields the rendered message, which is the rule's custom
/// `message` when one is set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// What went wrong.
    pub kind: ErrorKind,
    /// Human-readable message.
    pub message: String,
}

impl ValidationError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Replaces the message, keeping the kind.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

/// Result of validating one value: the (possibly coerced) value, or why it failed.
pub type ValidationResult<T = Value> = std::result::Result<T, ValidationError>;

/// Per-field failure messages from a schema validation, keyed by field name
/// in schema order.
pub type FieldErrors = IndexMap<String, String>;

/// A rule document with a length bound no value can meet.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuleError {
    /// Negative `max`, or a `len` that is negative or fractional.
    #[error("{field} bound {value} cannot be met by any length")]
    UnsatisfiableLength { field: &'static str, value: f64 },
}

/// Errors from building a schema or validating an object against one.
///
/// Only [`SchemaError::Fields`] carries per-field details; every other
/// variant is a single top-level message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The object to validate is not a plain key/value object.
    #[error("{0}")]
    InvalidObject(String),
    /// The schema is not a mapping of field names to rules.
    #[error("{0}")]
    InvalidSchema(String),
    /// The rule list handed to schema construction is not a sequence.
    #[error("{0}")]
    InvalidRules(String),
    /// An entry of the rule list is not a rule.
    #[error("{message}")]
    InvalidRule { index: usize, message: String },
    /// A rule in the rule list has no name.
    #[error("{message}")]
    MissingName { index: usize, message: String },
    /// One or more fields failed validation.
    #[error("{} field(s) failed validation", .0.len())]
    Fields(FieldErrors),
}

impl SchemaError {
    /// Per-field messages, present only for [`SchemaError::Fields`].
    pub fn details(&self) -> Option<&FieldErrors> {
        match self {
            SchemaError::Fields(details) => Some(details),
            _ => None,
        }
    }
}

/// Errors from parsing a message catalog.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// YAML parsing failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

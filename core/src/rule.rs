//! Rule type definitions.
//!
//! A [`Rule`] describes the constraints for one value: a set of fields
//! common to every rule (`name`, `required`, `valid`, `message`) plus a
//! [`RuleKind`] carrying the constraints specific to the declared type.
//!
//! Rules serialize in a flat shape, with the type as a `"type"` tag:
//!
//! ```
//! use rule_schema_core::{Rule, RuleKind};
//!
//! let rule: Rule = serde_json::from_value(serde_json::json!({
//!     "type": "array",
//!     "name": "tags",
//!     "min": 1,
//!     "items": { "type": "string", "valid": ["a", "b"] }
//! }))
//! .unwrap();
//!
//! assert_eq!(rule.type_name(), Some("array"));
//! let RuleKind::Array(array) = rule.kind.unwrap() else { panic!() };
//! assert_eq!(array.min, Some(1));
//! assert_eq!(array.items.unwrap().type_name(), Some("string"));
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::error::RuleError;
use crate::value::json_number;
use crate::Value;

/// Constraints for string values.
///
/// Lengths count Unicode scalar values.
///
/// # Examples
///
/// ```
/// use rule_schema_core::StringRule;
///
/// let rule = StringRule::new().min(2).max(20).pattern("^[A-Za-z]+$");
/// assert_eq!(rule.min, Some(2));
/// assert_eq!(rule.pattern.as_deref(), Some("^[A-Za-z]+$"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StringRule {
    /// Minimum length.
    pub min: Option<usize>,
    /// Maximum length.
    pub max: Option<usize>,
    /// Exact length.
    pub len: Option<usize>,
    /// Regular expression the value must match.
    pub pattern: Option<String>,
}

impl StringRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min(mut self, min: usize) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: usize) -> Self {
        self.max = Some(max);
        self
    }

    pub fn len(mut self, len: usize) -> Self {
        self.len = Some(len);
        self
    }

    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }
}

/// Constraints for numeric values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NumberRule {
    /// Inclusive lower bound.
    pub min: Option<f64>,
    /// Inclusive upper bound.
    pub max: Option<f64>,
    /// Reject values with a fractional part.
    pub integer: bool,
}

impl NumberRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn integer(mut self) -> Self {
        self.integer = true;
        self
    }
}

/// Constraints for date values, as epoch-millisecond timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DateRule {
    /// Earliest allowed instant.
    pub min: Option<i64>,
    /// Latest allowed instant.
    pub max: Option<i64>,
}

impl DateRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min(mut self, min: i64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: i64) -> Self {
        self.max = Some(max);
        self
    }
}

/// Constraints for arrays.
///
/// `items` validates every element. It must declare a scalar type (or no
/// type at all, in which case elements only go through the
/// `required`/`valid` checks).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ArrayRule {
    /// Minimum element count.
    pub min: Option<usize>,
    /// Maximum element count.
    pub max: Option<usize>,
    /// Exact element count.
    pub len: Option<usize>,
    /// Rule applied to each element.
    pub items: Option<Box<Rule>>,
}

impl ArrayRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min(mut self, min: usize) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: usize) -> Self {
        self.max = Some(max);
        self
    }

    pub fn len(mut self, len: usize) -> Self {
        self.len = Some(len);
        self
    }

    pub fn items(mut self, items: Rule) -> Self {
        self.items = Some(Box::new(items));
        self
    }
}

/// The declared type of a rule, with its type-specific constraints.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleKind {
    String(StringRule),
    Number(NumberRule),
    Boolean,
    Date(DateRule),
    Array(ArrayRule),
    /// A `type` tag no validator handles, kept so it can be reported.
    Unsupported(String),
}

impl RuleKind {
    /// The `type` tag of this kind.
    pub fn type_name(&self) -> &str {
        match self {
            RuleKind::String(_) => "string",
            RuleKind::Number(_) => "number",
            RuleKind::Boolean => "boolean",
            RuleKind::Date(_) => "date",
            RuleKind::Array(_) => "array",
            RuleKind::Unsupported(name) => name,
        }
    }
}

/// Constraints for one value.
///
/// Build rules with the typed constructors and chain the common settings:
///
/// ```
/// use rule_schema_core::{Rule, StringRule};
///
/// let rule = Rule::string(StringRule::new().min(2))
///     .with_name("firstName")
///     .with_description("The first name of the person")
///     .required()
///     .with_message("please enter a first name");
///
/// assert!(rule.required);
/// assert_eq!(rule.name.as_deref(), Some("firstName"));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "RuleDef", into = "RuleDef")]
pub struct Rule {
    /// Declared type. `None` when the rule has no `type`.
    pub kind: Option<RuleKind>,
    /// Label used in messages.
    pub name: Option<String>,
    /// Free-form documentation; never checked.
    pub description: Option<String>,
    /// Reject absent and null values.
    pub required: bool,
    /// Allowed values. Well-formed only when it is a [`Value::Array`].
    pub valid: Option<Value>,
    /// Replaces any generated failure message.
    pub message: Option<String>,
}

impl Rule {
    pub fn new(kind: RuleKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    /// A rule without a declared type.
    pub fn untyped() -> Self {
        Self::default()
    }

    pub fn string(rule: StringRule) -> Self {
        Self::new(RuleKind::String(rule))
    }

    pub fn number(rule: NumberRule) -> Self {
        Self::new(RuleKind::Number(rule))
    }

    pub fn boolean() -> Self {
        Self::new(RuleKind::Boolean)
    }

    pub fn date(rule: DateRule) -> Self {
        Self::new(RuleKind::Date(rule))
    }

    pub fn array(rule: ArrayRule) -> Self {
        Self::new(RuleKind::Array(rule))
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the allowed values.
    pub fn with_valid<I, T>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        self.valid = Some(Value::Array(values.into_iter().map(Into::into).collect()));
        self
    }

    /// Sets `valid` to an arbitrary value, well-formed or not.
    pub fn with_valid_value(mut self, valid: Value) -> Self {
        self.valid = Some(valid);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// The declared `type` tag, if any.
    pub fn type_name(&self) -> Option<&str> {
        self.kind.as_ref().map(RuleKind::type_name)
    }
}

/// Flat wire shape of a [`Rule`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RuleDef {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    valid: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    min: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    len: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    integer: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    items: Option<Box<Rule>>,
}

// Counts are whole numbers, so a fractional lower bound rounds up and a
// fractional upper bound rounds down without changing which lengths pass.

fn min_count(n: f64) -> usize {
    n.ceil().max(0.0) as usize
}

fn max_count(n: f64) -> Result<usize, RuleError> {
    if n < 0.0 {
        return Err(RuleError::UnsatisfiableLength { field: "max", value: n });
    }
    Ok(n.floor() as usize)
}

fn exact_count(n: f64) -> Result<usize, RuleError> {
    if n < 0.0 || n.fract() != 0.0 {
        return Err(RuleError::UnsatisfiableLength { field: "len", value: n });
    }
    Ok(n as usize)
}

impl TryFrom<RuleDef> for Rule {
    type Error = RuleError;

    fn try_from(def: RuleDef) -> Result<Self, RuleError> {
        let min = def.min.as_ref().and_then(Number::as_f64);
        let max = def.max.as_ref().and_then(Number::as_f64);
        let len = def.len.as_ref().and_then(Number::as_f64);

        let kind = match def.kind {
            None => None,
            Some(tag) => Some(match tag.as_str() {
                "string" => RuleKind::String(StringRule {
                    min: min.map(min_count),
                    max: max.map(max_count).transpose()?,
                    len: len.map(exact_count).transpose()?,
                    pattern: def.pattern,
                }),
                "number" => RuleKind::Number(NumberRule {
                    min,
                    max,
                    integer: def.integer.unwrap_or(false),
                }),
                "boolean" => RuleKind::Boolean,
                "date" => RuleKind::Date(DateRule {
                    min: min.map(|n| n.ceil() as i64),
                    max: max.map(|n| n.floor() as i64),
                }),
                "array" => RuleKind::Array(ArrayRule {
                    min: min.map(min_count),
                    max: max.map(max_count).transpose()?,
                    len: len.map(exact_count).transpose()?,
                    items: def.items,
                }),
                _ => RuleKind::Unsupported(tag),
            }),
        };

        Ok(Rule {
            kind,
            name: def.name,
            description: def.description,
            required: def.required.unwrap_or(false),
            valid: def.valid,
            message: def.message,
        })
    }
}

impl From<Rule> for RuleDef {
    fn from(rule: Rule) -> Self {
        let mut def = RuleDef {
            kind: rule.type_name().map(String::from),
            name: rule.name,
            description: rule.description,
            required: rule.required.then_some(true),
            valid: rule.valid,
            message: rule.message,
            ..RuleDef::default()
        };

        match rule.kind {
            Some(RuleKind::String(s)) => {
                def.min = s.min.map(Number::from);
                def.max = s.max.map(Number::from);
                def.len = s.len.map(Number::from);
                def.pattern = s.pattern;
            }
            Some(RuleKind::Number(n)) => {
                def.min = n.min.and_then(json_number);
                def.max = n.max.and_then(json_number);
                def.integer = n.integer.then_some(true);
            }
            Some(RuleKind::Date(d)) => {
                def.min = d.min.map(Number::from);
                def.max = d.max.map(Number::from);
            }
            Some(RuleKind::Array(a)) => {
                def.min = a.min.map(Number::from);
                def.max = a.max.map(Number::from);
                def.len = a.len.map(Number::from);
                def.items = a.items;
            }
            Some(RuleKind::Boolean) | Some(RuleKind::Unsupported(_)) | None => {}
        }

        def
    }
}

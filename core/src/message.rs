//! Message templates and the `%s` formatter.
//!
//! Every failure message the engine produces is rendered from a template in a
//! [`MessageCatalog`], selected by a [`MessageKey`]. Templates use ordered `%s`
//! placeholders: the field name fills the first one, the remaining arguments
//! fill the rest left to right.
//!
//! The catalog is plain data, so callers can swap in their own wording (or a
//! translation) without touching validator logic:
//!
//! ```
//! use rule_schema_core::{MessageCatalog, MessageKey};
//!
//! let catalog = MessageCatalog::from_yaml_str(
//!     r#"
//! required: "%s est obligatoire"
//! string:
//!   min: "%s doit contenir au moins %s caractères"
//! "#,
//! )
//! .unwrap();
//!
//! assert_eq!(catalog.render(MessageKey::Required, Some("nom"), &[]), "nom est obligatoire");
//! // Sections and keys that are not overridden keep the English default.
//! assert_eq!(catalog.render(MessageKey::StringMax, None, &[&3]), "value must be at most 3 characters");
//! ```

use std::fmt::{self, Write as _};
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Label used when a rule has no name.
pub const DEFAULT_FIELD: &str = "value";

static DEFAULT_CATALOG: LazyLock<MessageCatalog> = LazyLock::new(MessageCatalog::default);

/// Replaces each `%s` in `template` with the next argument.
///
/// Placeholders left over once `args` is exhausted render as the empty
/// string; surplus arguments are ignored.
///
/// # Examples
///
/// ```
/// use rule_schema_core::message::format;
///
/// assert_eq!(format("%s must be a %s", &[&"age", &"number"]), "age must be a number");
/// assert_eq!(format("%s has invalid type: %s", &[&"age"]), "age has invalid type: ");
/// ```
pub fn format(template: &str, args: &[&dyn fmt::Display]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut args = args.iter();
    let mut pieces = template.split("%s");
    if let Some(head) = pieces.next() {
        out.push_str(head);
    }
    for piece in pieces {
        if let Some(arg) = args.next() {
            let _ = write!(out, "{arg}");
        }
        out.push_str(piece);
    }
    out
}

/// Formats `template` with the field name as the first argument.
///
/// An absent or empty `field` falls back to [`DEFAULT_FIELD`].
pub fn field_message(template: &str, field: Option<&str>, args: &[&dyn fmt::Display]) -> String {
    render_with_field(template, field, DEFAULT_FIELD, args)
}

fn render_with_field(
    template: &str,
    field: Option<&str>,
    fallback: &str,
    args: &[&dyn fmt::Display],
) -> String {
    let field = field.filter(|f| !f.is_empty()).unwrap_or(fallback);
    let mut all: Vec<&dyn fmt::Display> = Vec::with_capacity(args.len() + 1);
    all.push(&field);
    all.extend_from_slice(args);
    format(template, &all)
}

/// Identifies one template in a [`MessageCatalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    /// `field, type`
    InvalidType,
    /// `field`
    Required,
    /// `field, expected type`
    TypeMismatch,
    /// `field, allowed values`
    Valid,
    /// `field, offending valid rule`
    InvalidValid,
    StringMin,
    StringMax,
    StringLen,
    StringPattern,
    StringInvalidPattern,
    NumberMin,
    NumberMax,
    NumberInteger,
    ArrayMin,
    ArrayMax,
    ArrayLen,
    /// `field, inner message`
    ArrayItems,
    /// `field, item type`
    ArrayItemsType,
    DateMin,
    DateMax,
    SchemaInvalidObject,
    SchemaInvalid,
    SchemaInvalidRules,
    /// `index` (no field)
    SchemaInvalidRule,
    /// `index` (no field)
    SchemaMissingName,
}

/// Templates for string rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StringMessages {
    pub min: String,
    pub max: String,
    pub len: String,
    pub pattern: String,
    pub invalid_pattern: String,
}

impl Default for StringMessages {
    fn default() -> Self {
        Self {
            min: "%s must be at least %s characters".into(),
            max: "%s must be at most %s characters".into(),
            len: "%s must be exactly %s characters".into(),
            pattern: "%s does not match the pattern %s".into(),
            invalid_pattern: "%s has an invalid pattern: %s".into(),
        }
    }
}

/// Templates for number rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberMessages {
    pub min: String,
    pub max: String,
    pub integer: String,
}

impl Default for NumberMessages {
    fn default() -> Self {
        Self {
            min: "%s must be greater than or equal to %s".into(),
            max: "%s must be less than or equal to %s".into(),
            integer: "%s must be an integer".into(),
        }
    }
}

/// Templates for array rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrayMessages {
    pub min: String,
    pub max: String,
    pub len: String,
    pub items: String,
    pub items_type: String,
}

impl Default for ArrayMessages {
    fn default() -> Self {
        Self {
            min: "%s must have at least %s items".into(),
            max: "%s must have at most %s items".into(),
            len: "%s must have exactly %s items".into(),
            items: "array %s: %s".into(),
            items_type: "%s has invalid items type: %s".into(),
        }
    }
}

/// Templates for date rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DateMessages {
    pub min: String,
    pub max: String,
}

impl Default for DateMessages {
    fn default() -> Self {
        Self {
            min: "%s must be after %s".into(),
            max: "%s must be before %s".into(),
        }
    }
}

/// Templates for schema construction and object-level failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaMessages {
    pub invalid_object: String,
    pub invalid: String,
    pub invalid_rules: String,
    pub invalid_rule: String,
    pub missing_name: String,
}

impl Default for SchemaMessages {
    fn default() -> Self {
        Self {
            invalid_object: "invalid value".into(),
            invalid: "invalid schema object".into(),
            invalid_rules: "rules must be an array".into(),
            invalid_rule: "rule at index %s is not a valid rule".into(),
            missing_name: "rule at index %s is missing a name".into(),
        }
    }
}

/// The full set of message templates.
///
/// `Default` yields the built-in English catalog. Deserialization fills any
/// missing key or section from that default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageCatalog {
    /// Substituted for the field name when a rule is unnamed.
    pub default_field: String,
    pub invalid_type: String,
    pub required: String,
    pub type_mismatch: String,
    pub valid: String,
    pub invalid_valid: String,
    pub string: StringMessages,
    pub number: NumberMessages,
    pub array: ArrayMessages,
    pub date: DateMessages,
    pub schema: SchemaMessages,
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self {
            default_field: DEFAULT_FIELD.into(),
            invalid_type: "%s has invalid type: %s".into(),
            required: "%s is required".into(),
            type_mismatch: "%s must be a %s".into(),
            valid: "%s must be one of %s".into(),
            invalid_valid: "%s has an invalid valid rule: %s".into(),
            string: StringMessages::default(),
            number: NumberMessages::default(),
            array: ArrayMessages::default(),
            date: DateMessages::default(),
            schema: SchemaMessages::default(),
        }
    }
}

impl MessageCatalog {
    /// Returns the shared built-in catalog.
    pub fn english() -> &'static MessageCatalog {
        &DEFAULT_CATALOG
    }

    /// Parses a catalog override from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the text is not a valid catalog.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Parses a catalog override from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] if the text is not a valid catalog.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Returns the raw template for `key`.
    pub fn template(&self, key: MessageKey) -> &str {
        match key {
            MessageKey::InvalidType => &self.invalid_type,
            MessageKey::Required => &self.required,
            MessageKey::TypeMismatch => &self.type_mismatch,
            MessageKey::Valid => &self.valid,
            MessageKey::InvalidValid => &self.invalid_valid,
            MessageKey::StringMin => &self.string.min,
            MessageKey::StringMax => &self.string.max,
            MessageKey::StringLen => &self.string.len,
            MessageKey::StringPattern => &self.string.pattern,
            MessageKey::StringInvalidPattern => &self.string.invalid_pattern,
            MessageKey::NumberMin => &self.number.min,
            MessageKey::NumberMax => &self.number.max,
            MessageKey::NumberInteger => &self.number.integer,
            MessageKey::ArrayMin => &self.array.min,
            MessageKey::ArrayMax => &self.array.max,
            MessageKey::ArrayLen => &self.array.len,
            MessageKey::ArrayItems => &self.array.items,
            MessageKey::ArrayItemsType => &self.array.items_type,
            MessageKey::DateMin => &self.date.min,
            MessageKey::DateMax => &self.date.max,
            MessageKey::SchemaInvalidObject => &self.schema.invalid_object,
            MessageKey::SchemaInvalid => &self.schema.invalid,
            MessageKey::SchemaInvalidRules => &self.schema.invalid_rules,
            MessageKey::SchemaInvalidRule => &self.schema.invalid_rule,
            MessageKey::SchemaMissingName => &self.schema.missing_name,
        }
    }

    /// Renders `key` with `field` (or the catalog's default label) followed by `args`.
    pub fn render(&self, key: MessageKey, field: Option<&str>, args: &[&dyn fmt::Display]) -> String {
        render_with_field(self.template(key), field, &self.default_field, args)
    }

    /// Renders `key` with `args` only, for templates that name no field.
    pub fn render_plain(&self, key: MessageKey, args: &[&dyn fmt::Display]) -> String {
        format(self.template(key), args)
    }
}

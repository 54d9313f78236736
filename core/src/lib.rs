//! Declarative validation of dynamic values against typed rules.
//!
//! This crate checks a [`Value`] against a [`Rule`], or a whole object
//! against a [`Schema`] of named rules, and returns either the validated
//! value or a structured error:
//!
//! - [`Rule`]: the constraints for one value, covering `required`, an allowed-value
//!   list (`valid`), a custom failure `message`, and a [`RuleKind`] with the
//!   constraints of its declared type (string, number, boolean, date, array).
//! - [`Schema`]: an insertion-ordered map from field name to rule.
//! - [`Validator`]: dispatches rules to the type validators, rendering
//!   messages from a [`MessageCatalog`].
//! - [`ValidationError`] / [`SchemaError`]: failures as values; nothing in
//!   the validation path panics on bad input.
//!
//! Validation is pure: inputs are never mutated, and the only transformation
//! is date coercion (strings and epoch-millisecond numbers become
//! [`Value::Date`]).
//!
//! # Example
//!
//! ```
//! use rule_schema_core::*;
//! use serde_json::json;
//!
//! let schema = to_schema(vec![
//!     Rule::string(StringRule::new().min(2).max(20)).with_name("name").required(),
//!     Rule::number(NumberRule::new().integer().min(0.0).max(120.0)).with_name("age"),
//!     Rule::array(ArrayRule::new().items(Rule::string(StringRule::new()))).with_name("hobbies"),
//!     Rule::date(DateRule::new()).with_name("joined"),
//! ])
//! .unwrap();
//!
//! let input = Value::from(json!({
//!     "name": "Ada",
//!     "age": 36,
//!     "hobbies": ["chess"],
//!     "joined": "2022-01-01",
//! }));
//! let data = schema_validate(&input, &schema).unwrap();
//! assert!(matches!(data.get("joined"), Value::Date(_)));
//!
//! let bad = Value::from(json!({ "age": "old", "hobbies": ["chess", 1] }));
//! let err = schema_validate(&bad, &schema).unwrap_err();
//! let details = err.details().unwrap();
//! assert_eq!(details["name"], "name is required");
//! assert_eq!(details["age"], "age must be a number");
//! assert_eq!(details["hobbies"], "array hobbies: value must be a string");
//! assert!(!details.contains_key("joined"));
//! ```

mod engine;
mod error;
pub mod message;
mod rule;
mod schema;
mod validators;
mod value;

pub use engine::{Validator, schema_validate, to_schema, validate};
pub use error::{
    ConfigError, ErrorKind, FieldErrors, RuleError, SchemaError, ValidationError, ValidationResult,
};
pub use message::{MessageCatalog, MessageKey};
pub use rule::{ArrayRule, DateRule, NumberRule, Rule, RuleKind, StringRule};
pub use schema::Schema;
pub use validators::parse_timestamp;
pub use value::{Object, Value};

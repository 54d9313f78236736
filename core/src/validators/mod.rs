//! Type-specific validators and the checks shared by every rule.
//!
//! Each validator takes the value, the constraints for its kind, and a
//! [`FieldContext`] used to render failure messages. Validators never mutate
//! their input; on success they return the value to hand back to the caller
//! (a copy of the input, or the coerced date).

mod array;
mod base;
mod boolean;
mod date;
mod number;
mod string;

use std::fmt;

use crate::error::{ErrorKind, ValidationError};
use crate::message::{MessageCatalog, MessageKey};
use crate::Value;

pub(crate) use array::check as check_array;
pub(crate) use base::check as check_base;
pub(crate) use boolean::check as check_boolean;
pub(crate) use date::check as check_date;
pub(crate) use number::check as check_number;
pub(crate) use string::check as check_string;

pub use date::parse_timestamp;

/// The field being validated and the catalog its messages come from.
#[derive(Clone, Copy)]
pub(crate) struct FieldContext<'a> {
    pub catalog: &'a MessageCatalog,
    pub name: Option<&'a str>,
}

impl<'a> FieldContext<'a> {
    pub fn new(catalog: &'a MessageCatalog, name: Option<&'a str>) -> Self {
        Self { catalog, name }
    }

    /// Builds an error whose message names this field.
    pub fn error(&self, kind: ErrorKind, key: MessageKey, args: &[&dyn fmt::Display]) -> ValidationError {
        ValidationError::new(kind, self.catalog.render(key, self.name, args))
    }

    /// The "wrong primitive type" error.
    pub fn type_mismatch(&self, expected: &str) -> ValidationError {
        self.error(ErrorKind::TypeMismatch, MessageKey::TypeMismatch, &[&expected])
    }

    /// The "not in the allowed list" error.
    pub fn not_allowed(&self, allowed: &[Value]) -> ValidationError {
        let joined = join_values(allowed);
        self.error(ErrorKind::NotAllowed, MessageKey::Valid, &[&joined])
    }
}

/// Joins allowed values for a message. Null and undefined entries render empty.
fn join_values(values: &[Value]) -> String {
    values
        .iter()
        .map(|value| match value {
            Value::Null | Value::Undefined => String::new(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

use super::FieldContext;
use crate::error::ValidationResult;
use crate::Value;

pub(crate) fn check(value: &Value, ctx: &FieldContext<'_>) -> ValidationResult {
    match value {
        Value::Bool(_) => Ok(value.clone()),
        _ => Err(ctx.type_mismatch("boolean")),
    }
}

//! Checks applied to every rule before type dispatch: `required` and `valid`.

use super::FieldContext;
use crate::error::{ErrorKind, ValidationResult};
use crate::message::MessageKey;
use crate::{Rule, RuleKind, Value};

/// Runs the `required` and `valid` checks for `rule`.
///
/// `valid` constrains present values only; an absent, optional value
/// passes. For array rules a well-formed `valid` list is not checked here:
/// it applies to the elements and the array validator enforces it.
pub(crate) fn check(value: &Value, rule: &Rule, ctx: &FieldContext<'_>) -> ValidationResult<()> {
    if rule.required && value.is_nullish() {
        return Err(ctx.error(ErrorKind::Required, MessageKey::Required, &[]));
    }

    let Some(valid) = &rule.valid else {
        return Ok(());
    };
    let Value::Array(allowed) = valid else {
        return Err(ctx.error(ErrorKind::InvalidValidRule, MessageKey::InvalidValid, &[valid]));
    };
    if value.is_absent() || matches!(rule.kind, Some(RuleKind::Array(_))) {
        return Ok(());
    }
    if !allowed.contains(value) {
        return Err(ctx.not_allowed(allowed));
    }

    Ok(())
}

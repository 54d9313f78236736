//! Number validation: type, integer-ness, inclusive bounds.

use super::FieldContext;
use crate::error::{ErrorKind, ValidationResult};
use crate::message::MessageKey;
use crate::value::format_number;
use crate::{NumberRule, Value};

pub(crate) fn check(value: &Value, rule: &NumberRule, ctx: &FieldContext<'_>) -> ValidationResult {
    let Some(number) = value.as_f64() else {
        return Err(ctx.type_mismatch("number"));
    };

    if rule.integer && !is_integer(number) {
        return Err(ctx.error(ErrorKind::NotInteger, MessageKey::NumberInteger, &[]));
    }
    if let Some(min) = rule.min {
        if number < min {
            let bound = format_number(min);
            return Err(ctx.error(ErrorKind::BelowMinimum, MessageKey::NumberMin, &[&bound]));
        }
    }
    if let Some(max) = rule.max {
        if number > max {
            let bound = format_number(max);
            return Err(ctx.error(ErrorKind::AboveMaximum, MessageKey::NumberMax, &[&bound]));
        }
    }

    Ok(value.clone())
}

fn is_integer(n: f64) -> bool {
    n.is_finite() && n.fract() == 0.0
}

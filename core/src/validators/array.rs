//! Array validation, including per-element checks against an item rule.

use super::FieldContext;
use crate::error::{ErrorKind, ValidationError, ValidationResult};
use crate::message::MessageKey;
use crate::{ArrayRule, Rule, RuleKind, Value};

/// Checks an array against `rule` and, element by element, against
/// `rule.items`.
///
/// `valid` is the array rule's allowed list: every element must be in it.
/// All elements are evaluated; the first failing element (lowest index)
/// is reported, wrapped in a message naming the array. On success the input
/// array is returned as is: item-level date coercion does not rewrite it.
pub(crate) fn check(
    value: &Value,
    rule: &ArrayRule,
    valid: Option<&Value>,
    ctx: &FieldContext<'_>,
) -> ValidationResult {
    let Some(elements) = value.as_array() else {
        return Err(ctx.type_mismatch("array"));
    };
    let count = elements.len();

    if let Some(min) = rule.min {
        if count < min {
            return Err(ctx.error(ErrorKind::TooShort, MessageKey::ArrayMin, &[&min]));
        }
    }
    if let Some(max) = rule.max {
        if count > max {
            return Err(ctx.error(ErrorKind::TooLong, MessageKey::ArrayMax, &[&max]));
        }
    }
    if let Some(len) = rule.len {
        if count != len {
            return Err(ctx.error(ErrorKind::WrongLength, MessageKey::ArrayLen, &[&len]));
        }
    }
    if let Some(Value::Array(allowed)) = valid {
        if elements.iter().any(|element| !allowed.contains(element)) {
            return Err(ctx.not_allowed(allowed));
        }
    }

    let Some(items) = rule.items.as_deref() else {
        return Ok(value.clone());
    };
    let item_ctx = FieldContext::new(ctx.catalog, items.name.as_deref());
    let results: Vec<ValidationResult> = elements
        .iter()
        .map(|element| check_element(element, items, &item_ctx, ctx))
        .collect();

    if let Some((index, first)) = results
        .into_iter()
        .enumerate()
        .find_map(|(index, result)| result.err().map(|err| (index, err)))
    {
        tracing::trace!(index, kind = ?first.kind, "Array element failed its item rule");
        let kind = if first.kind.is_configuration() {
            first.kind
        } else {
            ErrorKind::InvalidItem
        };
        return Err(ctx.error(kind, MessageKey::ArrayItems, &[&first.message]));
    }

    Ok(value.clone())
}

/// Validates one element: base checks with the item rule, then the item
/// type's validator. An item rule without a type accepts any element that
/// passes the base checks.
fn check_element(
    element: &Value,
    items: &Rule,
    item_ctx: &FieldContext<'_>,
    array_ctx: &FieldContext<'_>,
) -> ValidationResult {
    super::check_base(element, items, item_ctx)?;

    let Some(kind) = &items.kind else {
        return Ok(element.clone());
    };
    match kind {
        RuleKind::String(rule) => super::check_string(element, rule, item_ctx),
        RuleKind::Number(rule) => super::check_number(element, rule, item_ctx),
        RuleKind::Boolean => super::check_boolean(element, item_ctx),
        RuleKind::Date(rule) => super::check_date(element, rule, item_ctx),
        RuleKind::Array(_) | RuleKind::Unsupported(_) => Err(invalid_item_type(kind, array_ctx)),
    }
}

fn invalid_item_type(kind: &RuleKind, array_ctx: &FieldContext<'_>) -> ValidationError {
    let type_name = kind.type_name();
    tracing::debug!(field = ?array_ctx.name, item_type = type_name, "Unsupported array item type");
    array_ctx.error(
        ErrorKind::InvalidItemType,
        MessageKey::ArrayItemsType,
        &[&type_name],
    )
}

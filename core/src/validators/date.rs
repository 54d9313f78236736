//! Date validation and timestamp coercion.
//!
//! Strings and numbers are coerced to a [`DateTime<Utc>`]; on success the
//! validator returns the coerced [`Value::Date`] rather than the input.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use super::FieldContext;
use crate::error::{ErrorKind, ValidationError, ValidationResult};
use crate::message::MessageKey;
use crate::{DateRule, Value};

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parses a timestamp string.
///
/// Accepts RFC 3339 date-times (with an offset), RFC 2822 dates, ISO 8601
/// calendar dates (`2022-01-01`, `2022-01`, `2022`) and offset-less ISO date-
/// times. Values without an offset are read as UTC.
///
/// # Examples
///
/// ```
/// use rule_schema_core::parse_timestamp;
///
/// let date = parse_timestamp("2022-01-01").unwrap();
/// assert_eq!(date.timestamp_millis(), 1_640_995_200_000);
/// assert!(parse_timestamp("2022-13-01").is_none());
/// assert!(parse_timestamp("not a date").is_none());
/// ```
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();

    if let Ok(date) = DateTime::parse_from_rfc3339(text) {
        return Some(date.with_timezone(&Utc));
    }
    if let Some(date) = parse_calendar_date(text) {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }
    if let Some(naive) = DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
    {
        return Some(naive.and_utc());
    }
    DateTime::parse_from_rfc2822(text)
        .ok()
        .map(|date| date.with_timezone(&Utc))
}

fn digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn parse_calendar_date(text: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = text.split('-').collect();
    match parts.as_slice() {
        [year] if year.len() == 4 && digits(year) => NaiveDate::from_ymd_opt(year.parse().ok()?, 1, 1),
        [year, month] if year.len() == 4 && digits(year) && digits(month) => {
            NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)
        }
        [year, month, day] if year.len() == 4 && digits(year) && digits(month) && digits(day) => {
            NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
        }
        _ => None,
    }
}

/// Interprets a number as epoch milliseconds, dropping any fraction.
fn from_epoch_millis(millis: f64) -> Option<DateTime<Utc>> {
    if !millis.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis(millis.trunc() as i64)
}

/// Coerces a value to a date: dates pass through, strings are parsed,
/// numbers are epoch milliseconds. Anything else does not coerce.
pub(crate) fn coerce(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Date(date) => Some(*date),
        Value::String(text) => parse_timestamp(text),
        Value::Number(millis) => from_epoch_millis(*millis),
        _ => None,
    }
}

pub(crate) fn check(value: &Value, rule: &DateRule, ctx: &FieldContext<'_>) -> ValidationResult {
    let date = coerce(value).ok_or_else(|| invalid_date(ctx))?;
    let millis = date.timestamp_millis();

    if let Some(min) = rule.min {
        if millis < min {
            return Err(ctx.error(ErrorKind::BelowMinimum, MessageKey::DateMin, &[&min]));
        }
    }
    if let Some(max) = rule.max {
        if millis > max {
            return Err(ctx.error(ErrorKind::AboveMaximum, MessageKey::DateMax, &[&max]));
        }
    }

    Ok(Value::Date(date))
}

fn invalid_date(ctx: &FieldContext<'_>) -> ValidationError {
    ctx.error(ErrorKind::InvalidDate, MessageKey::TypeMismatch, &[&"date"])
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::validators::test_support::{field, unnamed};

    fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_string_and_timestamp_coerce_to_same_date() {
        let rule = DateRule::new();
        let from_string = check(&Value::from("2022-01-01"), &rule, &unnamed()).unwrap();
        let from_number = check(&Value::from(1_640_995_200_000_i64), &rule, &unnamed()).unwrap();
        assert_eq!(from_string, Value::Date(utc(2022, 1, 1)));
        assert_eq!(from_number, from_string);
    }

    #[test]
    fn test_date_value_passes_through() {
        let date = utc(2022, 3, 15);
        assert_eq!(
            check(&Value::Date(date), &DateRule::new(), &unnamed()),
            Ok(Value::Date(date))
        );
    }

    #[test]
    fn test_invalid_month_is_format_error() {
        let err = check(&Value::from("2022-13-01"), &DateRule::new(), &field("born")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidDate);
        assert_eq!(err.message, "born must be a date");
    }

    #[test]
    fn test_unparseable_and_non_coercible_values() {
        for value in [Value::from("not a date"), Value::from(true), Value::Null, Value::from(vec![1])] {
            let err = check(&value, &DateRule::new(), &unnamed()).unwrap_err();
            assert_eq!(err.kind, ErrorKind::InvalidDate);
        }
        assert!(check(&Value::Number(f64::NAN), &DateRule::new(), &unnamed()).is_err());
    }

    #[test]
    fn test_range() {
        let rule = DateRule::new()
            .min(utc(2022, 1, 1).timestamp_millis())
            .max(utc(2022, 12, 31).timestamp_millis());

        assert_eq!(
            check(&Value::Date(utc(2022, 3, 15)), &rule, &unnamed()),
            Ok(Value::Date(utc(2022, 3, 15)))
        );

        let err = check(&Value::Date(utc(2023, 1, 1)), &rule, &unnamed()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::AboveMaximum);
        assert_eq!(err.message, "value must be before 1672444800000");

        let err = check(&Value::from("2021-12-31"), &rule, &unnamed()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::BelowMinimum);
        assert_eq!(err.message, "value must be after 1640995200000");
    }

    #[test]
    fn test_zero_minimum_is_respected() {
        let rule = DateRule::new().min(0);
        assert!(check(&Value::from(-1), &rule, &unnamed()).is_err());
        assert!(check(&Value::from(0), &rule, &unnamed()).is_ok());
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let noon = Utc.with_ymd_and_hms(2022, 1, 1, 12, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2022-01-01T12:00:00Z"), Some(noon));
        assert_eq!(parse_timestamp("2022-01-01T14:00:00+02:00"), Some(noon));
        assert_eq!(parse_timestamp("2022-01-01T12:00:00"), Some(noon));
        assert_eq!(parse_timestamp("2022-01-01T12:00"), Some(noon));
        assert_eq!(parse_timestamp("Sat, 01 Jan 2022 12:00:00 +0000"), Some(noon));
        assert_eq!(parse_timestamp("2022-01"), Some(utc(2022, 1, 1)));
        assert_eq!(parse_timestamp("2022"), Some(utc(2022, 1, 1)));
        assert_eq!(parse_timestamp(" 2022-01-01 "), Some(utc(2022, 1, 1)));
        assert_eq!(parse_timestamp("2022-02-30"), None);
        assert_eq!(parse_timestamp(""), None);
    }
}

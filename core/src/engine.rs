//! Rule dispatch and schema validation.
//!
//! [`Validator`] ties the pieces together: it resolves a rule's declared
//! type to a validator, runs the shared `required`/`valid` checks first,
//! applies the rule's custom message to failures, and validates whole
//! objects against a [`Schema`].
//!
//! The free functions [`validate`], [`schema_validate`] and [`to_schema`]
//! use the built-in English messages.

use serde::Deserialize;
use tracing::{debug, trace};

use crate::error::{ErrorKind, FieldErrors, SchemaError, ValidationResult};
use crate::message::{MessageCatalog, MessageKey};
use crate::validators::{self, FieldContext};
use crate::value::Object;
use crate::{Rule, RuleKind, Schema, Value};

/// Validates values against rules using one message catalog.
///
/// Holds no mutable state; a single validator may be shared freely.
///
/// # Examples
///
/// ```
/// use rule_schema_core::{MessageCatalog, Rule, StringRule, Validator, Value};
///
/// let catalog = MessageCatalog::from_yaml_str(r#"required: "%s cannot be empty""#).unwrap();
/// let validator = Validator::new(&catalog);
///
/// let rule = Rule::string(StringRule::new()).with_name("title").required();
/// let err = validator.validate(&Value::Null, &rule).unwrap_err();
/// assert_eq!(err.message, "title cannot be empty");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Validator<'c> {
    catalog: &'c MessageCatalog,
}

impl Default for Validator<'static> {
    fn default() -> Self {
        Self::new(MessageCatalog::english())
    }
}

impl<'c> Validator<'c> {
    /// Creates a validator that renders messages from `catalog`.
    pub fn new(catalog: &'c MessageCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &'c MessageCatalog {
        self.catalog
    }

    /// Validates one value against one rule.
    ///
    /// On success returns the validated value: the input unchanged, or the
    /// coerced [`Value::Date`] for date rules. An absent value
    /// ([`Value::Undefined`]) that is not required passes without type checks.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`](crate::ValidationError) describing the
    /// first failed constraint. When the rule has a custom `message`, it
    /// replaces the generated one.
    pub fn validate(&self, value: &Value, rule: &Rule) -> ValidationResult {
        self.validate_field(value, rule, None)
    }

    /// Validates `value` using the rule's own name, or `fallback_name` when
    /// the rule is unnamed.
    fn validate_field(&self, value: &Value, rule: &Rule, fallback_name: Option<&str>) -> ValidationResult {
        let name = rule.name.as_deref().or(fallback_name);
        let ctx = FieldContext::new(self.catalog, name);

        self.dispatch(value, rule, &ctx).map_err(|err| {
            if err.kind.is_configuration() {
                debug!(field = ?name, kind = ?err.kind, message = %err.message, "Rule configuration error");
            }
            match &rule.message {
                Some(custom) => err.with_message(custom.clone()),
                None => err,
            }
        })
    }

    fn dispatch(&self, value: &Value, rule: &Rule, ctx: &FieldContext<'_>) -> ValidationResult {
        let Some(kind) = &rule.kind else {
            return Err(ctx.error(ErrorKind::InvalidType, MessageKey::InvalidType, &[]));
        };

        validators::check_base(value, rule, ctx)?;
        if value.is_absent() {
            return Ok(Value::Undefined);
        }

        trace!(field = ?ctx.name, rule_type = kind.type_name(), value_type = value.type_name(), "Dispatching rule");
        match kind {
            RuleKind::String(string) => validators::check_string(value, string, ctx),
            RuleKind::Number(number) => validators::check_number(value, number, ctx),
            RuleKind::Boolean => validators::check_boolean(value, ctx),
            RuleKind::Date(date) => validators::check_date(value, date, ctx),
            RuleKind::Array(array) => validators::check_array(value, array, rule.valid.as_ref(), ctx),
            RuleKind::Unsupported(type_name) => {
                Err(ctx.error(ErrorKind::InvalidType, MessageKey::InvalidType, &[type_name]))
            }
        }
    }

    /// Validates every field of `object` against `schema`.
    ///
    /// Each schema field is looked up in `object` (missing keys are
    /// [`Value::Undefined`]) and validated with the field's rule, named by the
    /// rule's own `name` or else the field key. Every field is evaluated.
    /// Keys of `object` that the schema does not mention are ignored.
    ///
    /// On success returns a [`Value::Object`] holding the validated value of
    /// every schema field, absent optional fields included as
    /// [`Value::Undefined`].
    ///
    /// # Errors
    ///
    /// - [`SchemaError::InvalidObject`] if `object` is not an object.
    /// - [`SchemaError::Fields`] mapping each failing field to its message.
    pub fn schema_validate(&self, object: &Value, schema: &Schema) -> Result<Value, SchemaError> {
        if !matches!(object, Value::Object(_)) {
            return Err(SchemaError::InvalidObject(
                self.catalog.render_plain(MessageKey::SchemaInvalidObject, &[]),
            ));
        }

        let mut data = Object::new();
        let mut details = FieldErrors::new();
        for (name, rule) in schema {
            match self.validate_field(object.get(name), rule, Some(name)) {
                Ok(value) => {
                    data.insert(name.to_string(), value);
                }
                Err(err) => {
                    details.insert(name.to_string(), err.message);
                }
            }
        }

        debug!(fields = schema.len(), failures = details.len(), "Validated object against schema");
        if !details.is_empty() {
            return Err(SchemaError::Fields(details));
        }
        Ok(Value::Object(data))
    }

    /// Validates loosely typed JSON input against a JSON schema mapping.
    ///
    /// # Errors
    ///
    /// - [`SchemaError::InvalidObject`] if `object` is not a JSON object.
    /// - [`SchemaError::InvalidSchema`] if `schema` is not a JSON object of
    ///   rules.
    /// - [`SchemaError::Fields`] as for [`schema_validate`](Self::schema_validate).
    pub fn schema_validate_json(
        &self,
        object: &serde_json::Value,
        schema: &serde_json::Value,
    ) -> Result<Value, SchemaError> {
        if !object.is_object() {
            return Err(SchemaError::InvalidObject(
                self.catalog.render_plain(MessageKey::SchemaInvalidObject, &[]),
            ));
        }
        let invalid_schema =
            || SchemaError::InvalidSchema(self.catalog.render_plain(MessageKey::SchemaInvalid, &[]));
        if !schema.is_object() {
            return Err(invalid_schema());
        }
        let schema = Schema::deserialize(schema).map_err(|err| {
            debug!(error = %err, "Rejected schema");
            invalid_schema()
        })?;

        self.schema_validate(&Value::from(object.clone()), &schema)
    }

    /// Builds a schema from rules, keyed by each rule's `name`.
    ///
    /// Rules keep their order; a later rule with a repeated name replaces the
    /// earlier one.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::MissingName`] with the index of the first rule
    /// whose name is absent or empty.
    pub fn to_schema<I>(&self, rules: I) -> Result<Schema, SchemaError>
    where
        I: IntoIterator<Item = Rule>,
    {
        let mut schema = Schema::new();
        for (index, rule) in rules.into_iter().enumerate() {
            let name = self.schema_key(index, &rule)?;
            schema.insert(name, rule);
        }
        Ok(schema)
    }

    /// Builds a schema from a JSON array of rules.
    ///
    /// # Errors
    ///
    /// - [`SchemaError::InvalidRules`] if `rules` is not an array.
    /// - [`SchemaError::InvalidRule`] for the first element that is not a rule.
    /// - [`SchemaError::MissingName`] for the first rule without a name.
    pub fn to_schema_json(&self, rules: &serde_json::Value) -> Result<Schema, SchemaError> {
        let Some(entries) = rules.as_array() else {
            return Err(SchemaError::InvalidRules(
                self.catalog.render_plain(MessageKey::SchemaInvalidRules, &[]),
            ));
        };

        let mut schema = Schema::new();
        for (index, entry) in entries.iter().enumerate() {
            let rule = Rule::deserialize(entry).map_err(|err| {
                debug!(index, error = %err, "Rejected rule");
                self.invalid_rule(index)
            })?;
            let name = self.schema_key(index, &rule)?;
            schema.insert(name, rule);
        }
        Ok(schema)
    }

    fn invalid_rule(&self, index: usize) -> SchemaError {
        SchemaError::InvalidRule {
            index,
            message: self.catalog.render_plain(MessageKey::SchemaInvalidRule, &[&index]),
        }
    }

    /// The schema key for the rule at `index`: its non-empty name.
    fn schema_key(&self, index: usize, rule: &Rule) -> Result<String, SchemaError> {
        match rule.name.as_deref() {
            Some(name) if !name.is_empty() => Ok(name.to_string()),
            _ => Err(SchemaError::MissingName {
                index,
                message: self.catalog.render_plain(MessageKey::SchemaMissingName, &[&index]),
            }),
        }
    }
}

/// Validates `value` against `rule` with the built-in messages.
///
/// # Examples
///
/// ```
/// use rule_schema_core::{validate, ErrorKind, NumberRule, Rule, Value};
///
/// let rule = Rule::number(NumberRule::new().min(0.0).max(100.0)).with_name("score");
/// assert_eq!(validate(&Value::from(42), &rule), Ok(Value::from(42)));
///
/// let err = validate(&Value::from(101), &rule).unwrap_err();
/// assert_eq!(err.kind, ErrorKind::AboveMaximum);
/// assert_eq!(err.to_string(), "score must be less than or equal to 100");
///
/// // Optional and absent: no type checks.
/// assert_eq!(validate(&Value::Undefined, &rule), Ok(Value::Undefined));
/// ```
///
/// # Errors
///
/// See [`Validator::validate`].
pub fn validate(value: &Value, rule: &Rule) -> ValidationResult {
    Validator::default().validate(value, rule)
}

/// Validates `object` against `schema` with the built-in messages.
///
/// # Examples
///
/// ```
/// use rule_schema_core::{schema_validate, NumberRule, Rule, Schema, StringRule, Value};
/// use serde_json::json;
///
/// let schema = Schema::new()
///     .with_field("name", Rule::string(StringRule::new()).required())
///     .with_field("age", Rule::number(NumberRule::new().integer()));
///
/// let data = schema_validate(&Value::from(json!({ "name": "Ada", "age": 36 })), &schema).unwrap();
/// assert_eq!(data.get("age"), &Value::from(36));
///
/// let err = schema_validate(&Value::from(json!({ "age": 1.5 })), &schema).unwrap_err();
/// let details = err.details().unwrap();
/// assert_eq!(details["name"], "name is required");
/// assert_eq!(details["age"], "age must be an integer");
/// ```
///
/// # Errors
///
/// See [`Validator::schema_validate`].
pub fn schema_validate(object: &Value, schema: &Schema) -> Result<Value, SchemaError> {
    Validator::default().schema_validate(object, schema)
}

/// Builds a schema from named rules with the built-in messages.
///
/// # Examples
///
/// ```
/// use rule_schema_core::{to_schema, Rule, SchemaError, StringRule};
///
/// let schema = to_schema(vec![
///     Rule::string(StringRule::new()).with_name("a"),
///     Rule::boolean().with_name("b"),
/// ])
/// .unwrap();
/// assert_eq!(schema.field_names().collect::<Vec<_>>(), ["a", "b"]);
///
/// let err = to_schema(vec![Rule::string(StringRule::new())]).unwrap_err();
/// assert!(matches!(err, SchemaError::MissingName { index: 0, .. }));
/// ```
///
/// # Errors
///
/// See [`Validator::to_schema`].
pub fn to_schema<I>(rules: I) -> Result<Schema, SchemaError>
where
    I: IntoIterator<Item = Rule>,
{
    Validator::default().to_schema(rules)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{ArrayRule, DateRule, NumberRule, StringRule};

    #[test]
    fn test_missing_type() {
        let rule = Rule::untyped().with_name("test-rule");
        let err = validate(&Value::from("test"), &rule).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidType);
        assert_eq!(err.message, "test-rule has invalid type: ");
    }

    #[test]
    fn test_missing_type_reported_even_for_absent_values() {
        let err = validate(&Value::Undefined, &Rule::untyped()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidType);
    }

    #[test]
    fn test_unsupported_type() {
        let rule = Rule::new(RuleKind::Unsupported("invalid-type".into())).with_name("test-rule");
        let err = validate(&Value::from("test"), &rule).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidType);
        assert_eq!(err.message, "test-rule has invalid type: invalid-type");
    }

    #[test]
    fn test_unsupported_type_with_absent_value_passes() {
        // Absent optional values never reach the type lookup.
        let rule = Rule::new(RuleKind::Unsupported("invalid-type".into()));
        assert_eq!(validate(&Value::Undefined, &rule), Ok(Value::Undefined));
    }

    #[test]
    fn test_base_failure_short_circuits_type_checks() {
        let rule = Rule::string(StringRule::new().min(10)).with_valid(["a"]);
        let err = validate(&Value::from("b"), &rule).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotAllowed);
    }

    #[test]
    fn test_absent_optional_skips_type_checks() {
        for rule in [
            Rule::string(StringRule::new().min(2)),
            Rule::number(NumberRule::new().min(0.0).max(100.0)),
            Rule::boolean(),
            Rule::date(DateRule::new()),
            Rule::array(ArrayRule::new().min(1)),
        ] {
            assert_eq!(validate(&Value::Undefined, &rule), Ok(Value::Undefined));
        }
    }

    #[test]
    fn test_null_is_not_absent() {
        let rule = Rule::string(StringRule::new());
        let err = validate(&Value::Null, &rule).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_custom_message_replaces_failure_only() {
        let rule = Rule::string(StringRule::new())
            .with_name("test-rule")
            .with_message("Custom message");
        let err = validate(&Value::from(5678), &rule).unwrap_err();
        assert_eq!(err.message, "Custom message");
        assert_eq!(err.kind, ErrorKind::TypeMismatch);

        assert_eq!(validate(&Value::from("ok"), &rule), Ok(Value::from("ok")));
    }

    #[test]
    fn test_custom_message_applies_to_configuration_errors() {
        let rule = Rule::untyped().with_message("Custom message");
        assert_eq!(validate(&Value::from(1), &rule).unwrap_err().message, "Custom message");
    }

    #[test]
    fn test_schema_field_uses_rule_name_over_key() {
        let schema = Schema::new().with_field(
            "firstName",
            Rule::string(StringRule::new()).with_name("First name").required(),
        );
        let err = schema_validate(&Value::from(json!({})), &schema).unwrap_err();
        assert_eq!(
            err.details().unwrap()["firstName"],
            "First name is required"
        );
    }

    #[test]
    fn test_schema_validate_reports_fields_in_schema_order() {
        let schema = Schema::new()
            .with_field("zeta", Rule::string(StringRule::new()).required())
            .with_field("alpha", Rule::number(NumberRule::new()))
            .with_field("mid", Rule::boolean().required());

        let data = schema_validate(&Value::from(json!({ "mid": true, "zeta": "z" })), &schema).unwrap();
        let keys: Vec<&str> = data.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);

        let err = schema_validate(&Value::from(json!({ "alpha": "x" })), &schema).unwrap_err();
        let failed: Vec<&str> = err.details().unwrap().keys().map(String::as_str).collect();
        assert_eq!(failed, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_schema_validate_rejects_non_objects() {
        let schema = Schema::new();
        for object in [json!("not an object"), json!(null), json!([1, 2]), json!(3)] {
            let err = schema_validate(&Value::from(object), &schema).unwrap_err();
            assert_eq!(err, SchemaError::InvalidObject("invalid value".into()));
        }
        assert!(matches!(
            schema_validate(&Value::Undefined, &schema),
            Err(SchemaError::InvalidObject(_))
        ));
    }

    #[test]
    fn test_schema_validate_json_rejects_non_object_schema() {
        let validator = Validator::default();
        let err = validator
            .schema_validate_json(&json!({}), &json!("not an object"))
            .unwrap_err();
        assert_eq!(err, SchemaError::InvalidSchema("invalid schema object".into()));

        let err = validator
            .schema_validate_json(&json!({}), &json!({ "a": { "type": "string", "min": "two" } }))
            .unwrap_err();
        assert!(matches!(err, SchemaError::InvalidSchema(_)));
    }

    #[test]
    fn test_schema_validate_json_checks_object_first() {
        let err = Validator::default()
            .schema_validate_json(&json!([]), &json!("not an object"))
            .unwrap_err();
        assert!(matches!(err, SchemaError::InvalidObject(_)));
    }

    #[test]
    fn test_to_schema_missing_name_reports_index() {
        let err = to_schema(vec![
            Rule::string(StringRule::new()).with_name("rule1"),
            Rule::string(StringRule::new()),
            Rule::string(StringRule::new()).with_name("rule3"),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            SchemaError::MissingName {
                index: 1,
                message: "rule at index 1 is missing a name".into()
            }
        );
    }

    #[test]
    fn test_to_schema_empty_name_is_missing() {
        let err = to_schema(vec![Rule::boolean().with_name("")]).unwrap_err();
        assert!(matches!(err, SchemaError::MissingName { index: 0, .. }));
    }

    #[test]
    fn test_to_schema_empty() {
        assert_eq!(to_schema(Vec::<Rule>::new()), Ok(Schema::new()));
    }

    #[test]
    fn test_to_schema_duplicate_name_last_wins() {
        let schema = to_schema(vec![
            Rule::string(StringRule::new()).with_name("a"),
            Rule::boolean().with_name("b"),
            Rule::boolean().with_name("a"),
        ])
        .unwrap();
        assert_eq!(schema.field_names().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(schema.get("a"), Some(&Rule::boolean().with_name("a")));
    }

    #[test]
    fn test_to_schema_json_errors() {
        let validator = Validator::default();
        assert_eq!(
            validator.to_schema_json(&json!("not an array")),
            Err(SchemaError::InvalidRules("rules must be an array".into()))
        );
        assert!(matches!(
            validator.to_schema_json(&json!([{ "name": "a", "type": "string" }, 5])),
            Err(SchemaError::InvalidRule { index: 1, .. })
        ));
        assert!(matches!(
            validator.to_schema_json(&json!([{ "type": "string" }, 5])),
            Err(SchemaError::MissingName { index: 0, .. })
        ));
    }

    #[test]
    fn test_custom_catalog() {
        let catalog = MessageCatalog {
            type_mismatch: "%s: expected %s".into(),
            ..MessageCatalog::default()
        };
        let validator = Validator::new(&catalog);
        let err = validator
            .validate(&Value::from(1), &Rule::string(StringRule::new()).with_name("title"))
            .unwrap_err();
        assert_eq!(err.message, "title: expected string");
    }
}

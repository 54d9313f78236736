//! Property tests for rule validation and schema evaluation.
//!
//! - Re-validating validated data yields the same data
//! - Absent optional values pass every rule kind
//! - A custom message replaces every failure message and never touches success
//! - Schema validation evaluates every field independently

use std::collections::BTreeSet;

use proptest::prelude::*;
use rule_schema_core::{
    schema_validate, validate, ArrayRule, DateRule, NumberRule, Rule, Schema, StringRule, Value,
};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        (-1000i64..1000).prop_map(Value::from),
        (-1000.0f64..1000.0).prop_map(Value::from),
        "[a-z]{0,8}".prop_map(Value::from),
        prop_oneof![
            Just("2022-01-01"),
            Just("2022-06-15T12:30:00Z"),
            Just("not a date"),
        ]
        .prop_map(Value::from),
        (1_600_000_000_000i64..1_700_000_000_000).prop_map(Value::from),
    ]
}

fn arb_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        4 => arb_scalar(),
        1 => prop::collection::vec(arb_scalar(), 0..5).prop_map(Value::Array),
    ]
}

fn arb_bound() -> impl Strategy<Value = Option<usize>> {
    prop::option::of(0usize..6)
}

fn arb_string_rule() -> impl Strategy<Value = StringRule> {
    (arb_bound(), arb_bound(), prop::option::of(Just("^[a-m]")))
        .prop_map(|(min, max, pattern)| StringRule {
            min,
            max,
            len: None,
            pattern: pattern.map(String::from),
        })
}

fn arb_number_rule() -> impl Strategy<Value = NumberRule> {
    (
        prop::option::of(-500.0f64..0.0),
        prop::option::of(0.0f64..500.0),
        any::<bool>(),
    )
        .prop_map(|(min, max, integer)| NumberRule { min, max, integer })
}

fn arb_date_rule() -> impl Strategy<Value = DateRule> {
    prop::option::of(1_600_000_000_000i64..1_700_000_000_000)
        .prop_map(|min| DateRule { min, max: None })
}

fn arb_item_rule() -> impl Strategy<Value = Rule> {
    prop_oneof![
        arb_string_rule().prop_map(Rule::string),
        arb_number_rule().prop_map(Rule::number),
        Just(Rule::boolean()),
        arb_date_rule().prop_map(Rule::date),
    ]
}

fn arb_array_rule() -> impl Strategy<Value = ArrayRule> {
    (arb_bound(), arb_bound(), arb_item_rule()).prop_map(|(min, max, items)| ArrayRule {
        min,
        max,
        len: None,
        items: Some(Box::new(items)),
    })
}

fn arb_kind_rule() -> impl Strategy<Value = Rule> {
    prop_oneof![
        4 => arb_item_rule(),
        1 => arb_array_rule().prop_map(Rule::array),
    ]
}

fn arb_rule() -> impl Strategy<Value = Rule> {
    (arb_kind_rule(), any::<bool>()).prop_map(|(rule, required)| {
        if required { rule.required() } else { rule }
    })
}

fn arb_schema() -> impl Strategy<Value = Schema> {
    prop::collection::vec(arb_rule(), 1..6).prop_map(|rules| {
        rules
            .into_iter()
            .enumerate()
            .map(|(i, rule)| (format!("field{i}"), rule))
            .collect()
    })
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn validated_data_revalidates_unchanged(value in arb_value(), rule in arb_rule()) {
        if let Ok(data) = validate(&value, &rule) {
            prop_assert_eq!(validate(&data, &rule), Ok(data));
        }
    }

    #[test]
    fn absent_optional_value_passes(rule in arb_kind_rule()) {
        prop_assert_eq!(validate(&Value::Undefined, &rule), Ok(Value::Undefined));
    }

    #[test]
    fn custom_message_replaces_failures_only(value in arb_value(), rule in arb_rule()) {
        let custom = rule.clone().with_message("custom failure");
        match validate(&value, &rule) {
            Ok(data) => prop_assert_eq!(validate(&value, &custom), Ok(data)),
            Err(err) => {
                let replaced = validate(&value, &custom).unwrap_err();
                prop_assert_eq!(replaced.kind, err.kind);
                prop_assert_eq!(replaced.message, "custom failure");
            }
        }
    }

    #[test]
    fn schema_evaluates_every_field(
        schema in arb_schema(),
        values in prop::collection::vec(prop::option::of(arb_value()), 6),
    ) {
        let mut object = rule_schema_core::Object::new();
        for (i, value) in values.into_iter().enumerate() {
            if let Some(value) = value {
                object.insert(format!("field{i}"), value);
            }
        }
        let object = Value::Object(object);

        let expected: BTreeSet<String> = schema
            .iter()
            .filter(|(name, rule)| validate(object.get(name), rule).is_err())
            .map(|(name, _)| name.to_string())
            .collect();

        match schema_validate(&object, &schema) {
            Ok(data) => {
                prop_assert!(expected.is_empty());
                let keys: BTreeSet<String> = data.as_object().unwrap().keys().cloned().collect();
                let names: BTreeSet<String> = schema.field_names().map(String::from).collect();
                prop_assert_eq!(keys, names);
            }
            Err(err) => {
                let failed: BTreeSet<String> = err.details().unwrap().keys().cloned().collect();
                prop_assert_eq!(failed, expected);
            }
        }
    }
}

//! Property-based tests using proptest
//!
//! These tests verify key normalization over randomized camelCase
//! documents: no capitals survive, structure is preserved, and applying
//! the conversion twice changes nothing.

use apigw_resources::transform::{camel_dict_to_snake_dict, camel_to_snake};
use proptest::prelude::*;
use serde_json::{Map, Value};

/// Generate camelCase / CamelCase / acronym-heavy keys
fn arb_key() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z]{1,8}([A-Z][a-z]{1,8}){0,3}",
        "[A-Z][a-z]{1,8}([A-Z][a-z]{1,8}){0,3}",
        "[A-Z]{2,5}[A-Z][a-z]{1,6}",
        "[A-Z][a-z]{1,6}[A-Z]{3,4}s",
        "[a-z]{1,6}[0-9][A-Z][a-z]{1,6}",
    ]
}

/// Generate a resource-like document with nested maps and lists
fn arb_document() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        "[a-zA-Z/{}+]{0,12}".prop_map(Value::String),
    ];

    leaf.prop_recursive(4, 64, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..5).prop_map(Value::Array),
            prop::collection::vec((arb_key(), inner), 0..5)
                .prop_map(|entries| Value::Object(entries.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

fn keys_have_no_capitals(value: &Value) -> bool {
    match value {
        Value::Object(map) => map
            .iter()
            .all(|(k, v)| !k.chars().any(|c| c.is_ascii_uppercase()) && keys_have_no_capitals(v)),
        Value::Array(items) => items.iter().all(keys_have_no_capitals),
        _ => true,
    }
}

/// Objects may lose keys when two names normalize alike; nothing else changes
fn same_structure(original: &Value, converted: &Value) -> bool {
    match (original, converted) {
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| same_structure(x, y))
        }
        (Value::Object(a), Value::Object(b)) => b.len() <= a.len(),
        (a, b) => a == b,
    }
}

proptest! {
    /// Converted names never contain ASCII capitals
    #[test]
    fn converted_key_is_lowercase(key in arb_key()) {
        let snake = camel_to_snake(&key, false);
        prop_assert!(!snake.chars().any(|c| c.is_ascii_uppercase()));
    }

    /// Converting twice equals converting once
    #[test]
    fn conversion_is_idempotent(doc in arb_document()) {
        let once = camel_dict_to_snake_dict(&doc, false, &[]);
        let twice = camel_dict_to_snake_dict(&once, false, &[]);
        prop_assert_eq!(once, twice);
    }

    /// Every object key at every depth is normalized
    #[test]
    fn no_capitals_at_any_depth(doc in arb_document()) {
        let converted = camel_dict_to_snake_dict(&doc, false, &[]);
        prop_assert!(keys_have_no_capitals(&converted));
    }

    /// Arrays keep their length and scalars their value
    #[test]
    fn structure_preserved(doc in arb_document()) {
        let converted = camel_dict_to_snake_dict(&doc, false, &[]);
        prop_assert!(same_structure(&doc, &converted));
    }

    /// Dropping capitals from an all-lowercase key is a no-op
    #[test]
    fn lowercase_keys_untouched(key in "[a-z][a-z0-9_]{0,15}") {
        prop_assert_eq!(camel_to_snake(&key, false), key);
    }
}

//! Property-based tests for the configuration binder.

use proptest::prelude::*;

use super::schema::SectionSchema;
use super::tree::ConfigTree;
use super::value::{Mapping, Value};

// Strategy for names the validator must accept
fn valid_name_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z_][a-zA-Z0-9_]{0,15}"
}

// Strategy for scalar values that survive the default formatter unchanged
fn scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Integer),
        "[a-z][a-z0-9 ]{0,10}[a-z0-9]".prop_map(Value::String),
    ]
}

proptest! {
    /// Names made of identifier characters are always accepted, no matter
    /// how often or in what order validation runs.
    #[test]
    fn prop_validator_accepts_identifiers(name in valid_name_strategy()) {
        prop_assert!(ConfigTree::validate_attribute(&name).is_ok());
        prop_assert!(ConfigTree::validate_attribute(&name).is_ok());
    }

    /// Any name containing a character outside `[A-Za-z0-9_]` is rejected.
    #[test]
    fn prop_validator_rejects_foreign_characters(
        name in valid_name_strategy(),
        bad in "[^a-zA-Z0-9_]{1,3}",
        split in 0usize..8,
    ) {
        let split = split.min(name.len());
        let mangled = format!("{}{}{}", &name[..split], bad, &name[split..]);
        prop_assert!(ConfigTree::validate_attribute(&mangled).is_err());
    }

    /// Names starting with a digit are rejected even though the character
    /// class itself allows digits.
    #[test]
    fn prop_validator_rejects_leading_digit(digit in 0u8..=9, name in valid_name_strategy()) {
        let mangled = format!("{digit}{name}");
        prop_assert!(ConfigTree::validate_attribute(&mangled).is_err());
    }

    /// A flat mapping of scalars binds and reports back unchanged.
    #[test]
    fn prop_flat_mapping_round_trip(
        entries in prop::collection::vec((valid_name_strategy(), scalar_strategy()), 1..8),
    ) {
        let mut data = Mapping::new();
        for (key, value) in entries {
            data.insert(key, value);
        }
        let tree = ConfigTree::new(SectionSchema::new(), Some(&data)).unwrap();
        prop_assert_eq!(tree.root().as_mapping(), data);
    }

    /// Dotted keys and nested mappings bind identically.
    #[test]
    fn prop_dotted_path_equivalence(
        outer in valid_name_strategy(),
        inner in valid_name_strategy(),
        leaf in valid_name_strategy(),
        value in "[a-z0-9]{1,12}",
    ) {
        let mut dotted = Mapping::new();
        dotted.insert(format!("{outer}.{inner}.{leaf}"), Value::from(value.as_str()));

        let mut innermost = Mapping::new();
        innermost.insert(leaf.clone(), Value::from(value.as_str()));
        let mut middle = Mapping::new();
        middle.insert(inner.clone(), Value::Mapping(innermost));
        let mut nested = Mapping::new();
        nested.insert(outer.clone(), Value::Mapping(middle));

        let from_dotted = ConfigTree::new(SectionSchema::new(), Some(&dotted)).unwrap();
        let from_nested = ConfigTree::new(SectionSchema::new(), Some(&nested)).unwrap();
        prop_assert_eq!(
            from_dotted.root().as_mapping(),
            from_nested.root().as_mapping()
        );
    }

    /// Explicit data always overrides schema defaults.
    #[test]
    fn prop_data_overrides_defaults(
        key in valid_name_strategy(),
        default in "[a-z]{1,8}",
        supplied in "[0-9]{1,8}",
    ) {
        let schema = SectionSchema::new().with_default(key.clone(), Value::from(default.as_str()));
        let mut data = Mapping::new();
        data.insert(key.clone(), Value::from(supplied.as_str()));

        let tree = ConfigTree::new(schema, Some(&data)).unwrap();
        prop_assert_eq!(
            tree.root().value(&key).unwrap().as_str(),
            Some(supplied.as_str())
        );
    }
}

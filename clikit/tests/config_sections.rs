//! Integration tests for the configuration tree binder.
//!
//! These tests exercise complete binding scenarios across schemas,
//! defaults, explicit data and environment variables. Tests that touch
//! environment variables are marked with `#[serial]` since the process
//! environment is global.

use clikit::config::{ConfigTree, ItemRef, Mapping, SectionSchema, Value};
use clikit::Error;
use serial_test::serial;
use std::env;

/// RAII guard for setting and restoring environment variables.
struct EnvGuard {
    key: String,
    old_value: Option<String>,
}

impl EnvGuard {
    fn new(key: &str, value: &str) -> Self {
        let old_value = env::var(key).ok();
        env::set_var(key, value);
        Self {
            key: key.to_string(),
            old_value,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match &self.old_value {
            Some(value) => env::set_var(&self.key, value),
            None => env::remove_var(&self.key),
        }
    }
}

fn mapping(document: &str) -> Mapping {
    let parsed: serde_yaml::Value = serde_yaml::from_str(document).unwrap();
    match Value::from(parsed) {
        Value::Mapping(mapping) => mapping,
        other => panic!("expected mapping, got {other:?}"),
    }
}

#[test]
fn test_round_trip_scalars_and_mappings() {
    let data = mapping(
        r"
name: demo
servers:
  primary:
    hostname: one.example.com
    port: 8080
  secondary:
    hostname: two.example.com
region: eu
",
    );
    let tree = ConfigTree::new(SectionSchema::new(), Some(&data)).unwrap();
    assert_eq!(tree.root().as_mapping(), data);
}

#[test]
fn test_dotted_and_nested_input_build_identical_trees() {
    let dotted = mapping("'server.tls.enabled': 'yes'\n'server.port': 443\n");
    let nested = mapping("server:\n  tls:\n    enabled: 'yes'\n  port: 443\n");

    let from_dotted = ConfigTree::new(SectionSchema::new(), Some(&dotted)).unwrap();
    let from_nested = ConfigTree::new(SectionSchema::new(), Some(&nested)).unwrap();

    assert_eq!(
        from_dotted.root().as_mapping(),
        from_nested.root().as_mapping()
    );
    let tls = from_dotted
        .root()
        .section("server")
        .unwrap()
        .section("tls")
        .unwrap();
    assert_eq!(tls.value("enabled").unwrap().as_str(), Some("yes"));
}

#[test]
fn test_defaults_overridden_by_data() {
    let schema = SectionSchema::new().with_default("k", Value::from("default"));
    let data = mapping("k: override\n");
    let tree = ConfigTree::new(schema, Some(&data)).unwrap();
    assert_eq!(tree.root().value("k").unwrap().as_str(), Some("override"));
}

#[test]
#[serial]
fn test_environment_wins_over_defaults_and_data() {
    let _guard = EnvGuard::new("CLIKIT_TEST_K", "fromenv");
    let schema = SectionSchema::new()
        .with_default("k", Value::from("default"))
        .with_env_var("CLIKIT_TEST_K", "k");
    let data = mapping("k: fromdata\n");
    let tree = ConfigTree::new(schema, Some(&data)).unwrap();
    assert_eq!(tree.root().value("k").unwrap().as_str(), Some("fromenv"));
}

#[test]
#[serial]
fn test_environment_prefix_convention() {
    let _guard = EnvGuard::new("MYAPP_REGION", "us-east");
    let schema = SectionSchema::new()
        .with_default("region", Value::from("eu"))
        .with_env_prefix("myapp");
    let tree = ConfigTree::new(schema, None).unwrap();
    assert_eq!(tree.root().value("region").unwrap().as_str(), Some("us-east"));
}

#[test]
#[serial]
fn test_environment_values_run_through_coercion() {
    let _guard = EnvGuard::new("CLIKIT_TEST_PORT", "9090");
    let schema = SectionSchema::new()
        .with_integer_setting("port")
        .with_env_var("CLIKIT_TEST_PORT", "port");
    let tree = ConfigTree::new(schema, None).unwrap();
    assert_eq!(tree.root().value("port").unwrap().as_i64(), Some(9090));
}

#[test]
#[serial]
fn test_environment_blank_value_formats_to_null() {
    let _guard = EnvGuard::new("CLIKIT_TEST_BLANK", "   ");
    let schema = SectionSchema::new().with_env_var("CLIKIT_TEST_BLANK", "blank");
    let tree = ConfigTree::new(schema, None).unwrap();
    assert!(tree.root().value("blank").unwrap().is_null());
}

#[test]
fn test_required_setting_missing_fails_construction() {
    let schema = SectionSchema::new().with_required("k");
    let err = ConfigTree::new(schema, None).unwrap_err();
    match err {
        Error::MissingSetting { section, attr } => {
            assert_eq!(section, "root");
            assert_eq!(attr, "k");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
#[serial]
fn test_required_setting_satisfied_by_environment() {
    let _guard = EnvGuard::new("CLIKIT_TEST_REQUIRED", "present");
    let schema = SectionSchema::new()
        .with_required("k")
        .with_env_var("CLIKIT_TEST_REQUIRED", "k");
    let tree = ConfigTree::new(schema, None).unwrap();
    assert_eq!(tree.root().value("k").unwrap().as_str(), Some("present"));
}

#[test]
fn test_required_setting_satisfied_by_defaults() {
    let schema = SectionSchema::new()
        .with_required("k")
        .with_default("k", Value::from("default"));
    assert!(ConfigTree::new(schema, None).is_ok());
}

#[test]
fn test_list_round_trip_with_nested_section() {
    let data = mapping("items:\n  - 1\n  - x: y\n  - text\n");
    let tree = ConfigTree::new(SectionSchema::new(), Some(&data)).unwrap();

    let items = tree.root().list("items").unwrap();
    assert_eq!(items.len(), 3);
    match items.get(0) {
        Some(ItemRef::Value(value)) => assert_eq!(value.as_i64(), Some(1)),
        other => panic!("unexpected first element: {other:?}"),
    }
    match items.get(1) {
        Some(ItemRef::Section(section)) => {
            assert_eq!(section.value("x").unwrap().as_str(), Some("y"));
        }
        other => panic!("unexpected second element: {other:?}"),
    }

    assert_eq!(tree.root().as_mapping(), data);
}

#[test]
fn test_declared_subsections_with_typed_settings() {
    let database = SectionSchema::new()
        .with_name("database")
        .with_required("hostname")
        .with_integer_setting("port")
        .with_default("port", Value::from(5432i64));
    let schema = SectionSchema::new().with_section(database);

    let data = mapping("database:\n  hostname: db.example.com\n  port: '5433'\n");
    let tree = ConfigTree::new(schema, Some(&data)).unwrap();

    let database = tree.root().section("database").unwrap();
    assert_eq!(
        database.value("hostname").unwrap().as_str(),
        Some("db.example.com")
    );
    assert_eq!(database.value("port").unwrap().as_i64(), Some(5433));
}

#[test]
fn test_subsection_required_setting_enforced_from_root() {
    let database = SectionSchema::new()
        .with_name("database")
        .with_required("hostname");
    let schema = SectionSchema::new().with_section(database);

    let err = ConfigTree::new(schema.clone(), None).unwrap_err();
    assert!(matches!(err, Error::MissingSetting { ref section, .. } if section == "database"));

    let data = mapping("database:\n  hostname: db.example.com\n");
    assert!(ConfigTree::new(schema, Some(&data)).is_ok());
}

#[test]
fn test_key_alias_maps_file_keys_to_attributes() {
    let schema = SectionSchema::new().with_key_alias("server-name", "server_name");
    let data = mapping("server-name: demo\n");
    let tree = ConfigTree::new(schema, Some(&data)).unwrap();
    assert_eq!(
        tree.root().value("server_name").unwrap().as_str(),
        Some("demo")
    );
}

#[test]
fn test_validator_and_formatter_hooks_in_order() {
    let schema = SectionSchema::new()
        .with_integer_setting("port")
        .with_validator("port", |value| match value.as_i64() {
            Some(port) if (1..=65535).contains(&port) => Ok(value.clone()),
            _ => Err("port out of range".to_string()),
        })
        .with_formatter("port", |value| {
            Ok(Value::String(format!("port-{}", value.as_i64().unwrap_or(0))))
        });

    let data = mapping("port: '8080'\n");
    let tree = ConfigTree::new(schema.clone(), Some(&data)).unwrap();
    assert_eq!(
        tree.root().value("port").unwrap().as_str(),
        Some("port-8080")
    );

    let bad = mapping("port: '70000'\n");
    let err = ConfigTree::new(schema, Some(&bad)).unwrap_err();
    assert!(matches!(err, Error::SettingValidation { .. }));
}

#[test]
fn test_config_root_reachable_from_deep_sections() {
    let data = mapping("a:\n  b:\n    c:\n      leaf: value\n");
    let tree = ConfigTree::new(SectionSchema::new(), Some(&data)).unwrap();

    let deep = tree
        .root()
        .section("a")
        .unwrap()
        .section("b")
        .unwrap()
        .section("c")
        .unwrap();
    let root = deep.config_root();
    assert!(root.name().is_none());
    assert!(root.section("a").is_some());
}

#[test]
fn test_seeded_settings_exist_before_data_arrives() {
    let schema = SectionSchema::new()
        .with_required("hostname")
        .with_env_var("CLIKIT_TEST_UNSET_VARIABLE", "from_env")
        .with_default("region", Value::from("eu"));

    // Build without validation to observe the seeded state.
    let data = mapping("hostname: localhost\n");
    let tree = ConfigTree::new(schema, Some(&data)).unwrap();

    assert_eq!(
        tree.root().value("hostname").unwrap().as_str(),
        Some("localhost")
    );
    // Never supplied, but seeded to null by the schema.
    assert!(tree.root().value("from_env").unwrap().is_null());
    assert_eq!(tree.root().value("region").unwrap().as_str(), Some("eu"));
}

#[test]
fn test_incremental_merge_into_existing_subsection() {
    let data = mapping("database:\n  hostname: localhost\n");
    let mut tree = ConfigTree::new(SectionSchema::new(), Some(&data)).unwrap();

    let root = tree.root().id();
    let update = mapping("database:\n  port: 5432\n");
    tree.load_mapping(root, &update).unwrap();

    let database = tree.root().section("database").unwrap();
    assert_eq!(
        database.value("hostname").unwrap().as_str(),
        Some("localhost")
    );
    assert_eq!(database.value("port").unwrap().as_i64(), Some(5432));
}

//! Integration tests for configuration file loading.
//!
//! End-to-end scenarios across YAML, JSON and INI sources: default-path
//! fallbacks, precedence between sources, environment overrides and hard
//! failures on broken files. Environment-dependent tests run serially.

use clikit::config::{ConfigFile, FileFormat, SectionSchema, Value};
use clikit::Error;
use serial_test::serial;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

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

fn write_config(directory: &Path, name: &str, contents: &str) -> PathBuf {
    let path = directory.join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_yaml_end_to_end_with_schema() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_config(
        temp_dir.path(),
        "app.yml",
        r"
name: demo
database:
  hostname: db.example.com
  port: '5432'
",
    );

    let database = SectionSchema::new()
        .with_name("database")
        .with_required("hostname")
        .with_integer_setting("port");
    let config = ConfigFile::builder(FileFormat::Yaml)
        .with_schema(SectionSchema::new().with_section(database))
        .with_path(&path)
        .load()
        .unwrap();

    assert_eq!(config.root().value("name").unwrap().as_str(), Some("demo"));
    let database = config.root().section("database").unwrap();
    assert_eq!(database.value("port").unwrap().as_i64(), Some(5432));
}

#[test]
fn test_json_end_to_end() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_config(
        temp_dir.path(),
        "app.json",
        r#"{"name": "demo", "servers": {"primary": {"port": 8080}}}"#,
    );

    let config = ConfigFile::builder(FileFormat::Json)
        .with_path(&path)
        .load()
        .unwrap();

    let primary = config
        .root()
        .section("servers")
        .unwrap()
        .section("primary")
        .unwrap();
    assert_eq!(primary.value("port").unwrap().as_i64(), Some(8080));
}

#[test]
fn test_ini_restricted_to_two_levels() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_config(
        temp_dir.path(),
        "app.ini",
        "top = level\n\n[server]\nhostname = localhost\nport = 8080\n\n[client]\nretries = 3\n",
    );

    let config = ConfigFile::builder(FileFormat::Ini)
        .with_path(&path)
        .load()
        .unwrap();

    assert_eq!(config.root().value("top").unwrap().as_str(), Some("level"));
    let server = config.root().section("server").unwrap();
    assert_eq!(server.value("hostname").unwrap().as_str(), Some("localhost"));
    // INI has no native nesting, so values stay plain strings.
    assert_eq!(server.value("port").unwrap().as_str(), Some("8080"));
    let client = config.root().section("client").unwrap();
    assert_eq!(client.value("retries").unwrap().as_str(), Some("3"));
}

#[test]
fn test_missing_default_paths_construct_with_seeded_values() {
    let temp_dir = TempDir::new().unwrap();
    let schema = SectionSchema::new()
        .with_default("region", Value::from("eu"))
        .with_env_var("CLIKIT_FILES_UNSET_VARIABLE", "from_env");

    let config = ConfigFile::builder(FileFormat::Yaml)
        .with_schema(schema)
        .with_default_path(temp_dir.path().join("missing.yml"))
        .load()
        .unwrap();

    assert_eq!(config.root().value("region").unwrap().as_str(), Some("eu"));
    assert!(config.root().value("from_env").unwrap().is_null());
}

#[test]
fn test_explicit_path_overrides_default_paths() {
    let temp_dir = TempDir::new().unwrap();
    let system = write_config(
        temp_dir.path(),
        "system.yml",
        "name: system\nregion: eu\ntier: base\n",
    );
    let user = write_config(temp_dir.path(), "user.yml", "name: user\nregion: us\n");
    let explicit = write_config(temp_dir.path(), "explicit.yml", "name: explicit\n");

    let config = ConfigFile::builder(FileFormat::Yaml)
        .with_default_path(&system)
        .with_default_path(&user)
        .with_path(&explicit)
        .load()
        .unwrap();

    // Later sources override field-by-field, earlier values survive.
    assert_eq!(
        config.root().value("name").unwrap().as_str(),
        Some("explicit")
    );
    assert_eq!(config.root().value("region").unwrap().as_str(), Some("us"));
    assert_eq!(config.root().value("tier").unwrap().as_str(), Some("base"));
}

#[test]
#[serial]
fn test_environment_overrides_file_values() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_config(temp_dir.path(), "app.yml", "region: fromfile\n");
    let _guard = EnvGuard::new("CLIKIT_FILES_REGION", "fromenv");

    let schema = SectionSchema::new().with_env_var("CLIKIT_FILES_REGION", "region");
    let config = ConfigFile::builder(FileFormat::Yaml)
        .with_schema(schema)
        .with_path(&path)
        .load()
        .unwrap();

    assert_eq!(
        config.root().value("region").unwrap().as_str(),
        Some("fromenv")
    );
}

#[test]
#[serial]
fn test_required_setting_satisfied_by_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_config(temp_dir.path(), "app.yml", "hostname: localhost\n");

    let schema = SectionSchema::new().with_required("hostname");
    let config = ConfigFile::builder(FileFormat::Yaml)
        .with_schema(schema.clone())
        .with_path(&path)
        .load()
        .unwrap();
    assert_eq!(
        config.root().value("hostname").unwrap().as_str(),
        Some("localhost")
    );

    // Without any source for the setting, construction fails.
    let result = ConfigFile::builder(FileFormat::Yaml).with_schema(schema).load();
    assert!(matches!(result, Err(Error::MissingSetting { .. })));
}

#[test]
fn test_broken_yaml_fails_hard() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_config(temp_dir.path(), "bad.yml", "invalid: yaml: syntax:\n");

    let result = ConfigFile::builder(FileFormat::Yaml).with_path(&path).load();
    match result {
        Err(Error::FileParse { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_broken_json_fails_hard() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_config(temp_dir.path(), "bad.json", "{\"unterminated\": ");

    let result = ConfigFile::builder(FileFormat::Json).with_path(&path).load();
    assert!(matches!(result, Err(Error::FileParse { .. })));
}

#[test]
fn test_broken_default_path_fails_hard() {
    let temp_dir = TempDir::new().unwrap();
    let broken = write_config(temp_dir.path(), "broken.yml", "invalid: yaml: syntax:\n");

    // Default paths are optional when absent, fatal when broken.
    let result = ConfigFile::builder(FileFormat::Yaml)
        .with_default_path(&broken)
        .load();
    assert!(matches!(result, Err(Error::FileParse { .. })));
}

#[test]
fn test_dotted_keys_in_files() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_config(
        temp_dir.path(),
        "app.yml",
        "'server.tls.enabled': 'yes'\n'server.port': 8443\n",
    );

    let config = ConfigFile::builder(FileFormat::Yaml)
        .with_path(&path)
        .load()
        .unwrap();

    let server = config.root().section("server").unwrap();
    assert_eq!(server.value("port").unwrap().as_i64(), Some(8443));
    let tls = server.section("tls").unwrap();
    assert_eq!(tls.value("enabled").unwrap().as_str(), Some("yes"));
}

#[test]
fn test_as_mapping_reports_merged_state() {
    let temp_dir = TempDir::new().unwrap();
    let defaults = write_config(temp_dir.path(), "defaults.yml", "region: eu\n");
    let explicit = write_config(temp_dir.path(), "app.yml", "name: demo\n");

    let config = ConfigFile::builder(FileFormat::Yaml)
        .with_default_path(&defaults)
        .with_path(&explicit)
        .load()
        .unwrap();

    let data = config.as_mapping();
    assert_eq!(data.get("region").unwrap().as_str(), Some("eu"));
    assert_eq!(data.get("name").unwrap().as_str(), Some("demo"));
}

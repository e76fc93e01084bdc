//! Declarative configuration section schemas.
//!
//! A [`SectionSchema`] describes everything a section knows before any data
//! arrives: required settings, scalar defaults, environment variable
//! bindings, key aliases, typed-setting declarations, per-attribute
//! validator/formatter hooks, and the schemas of declared subsections.
//!
//! Schemas are plain values built with `with_*` methods and attached to a
//! tree at construction time; nothing is discovered through naming
//! conventions at runtime.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::config::value::{Mapping, Value};

/// Hook validating (and possibly rewriting) a setting value.
///
/// A failure message is wrapped into a configuration error naming the
/// attribute.
pub type ValidatorHook = Arc<dyn Fn(&Value) -> std::result::Result<Value, String> + Send + Sync>;

/// Hook formatting a setting value after validation.
///
/// Replaces the default formatter (trim strings, empty string to null) for
/// the attribute it is registered under.
pub type FormatterHook = Arc<dyn Fn(&Value) -> std::result::Result<Value, String> + Send + Sync>;

/// Declarative schema for one configuration section.
///
/// # Examples
///
/// ```
/// use clikit::config::{SectionSchema, Value};
///
/// let schema = SectionSchema::new()
///     .with_required("hostname")
///     .with_default("port", Value::from(8080))
///     .with_integer_setting("port")
///     .with_env_prefix("MYAPP");
/// assert_eq!(schema.required(), ["hostname"]);
/// ```
#[derive(Clone, Default)]
pub struct SectionSchema {
    name: Option<String>,
    required: Vec<String>,
    defaults: Mapping,
    env_map: Vec<(String, String)>,
    env_prefix: Option<String>,
    key_map: Vec<(String, String)>,
    integer_settings: Vec<String>,
    float_settings: Vec<String>,
    path_settings: Vec<String>,
    loaders: Vec<SectionSchema>,
    dict_loader: Option<Box<SectionSchema>>,
    validators: HashMap<String, ValidatorHook>,
    formatters: HashMap<String, FormatterHook>,
}

impl SectionSchema {
    /// Creates an empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the section name, used to link the schema as a subsection.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Declares a required setting.
    #[must_use]
    pub fn with_required(mut self, attr: impl Into<String>) -> Self {
        self.required.push(attr.into());
        self
    }

    /// Declares a default value for a setting. Defaults may nest mappings.
    #[must_use]
    pub fn with_default(mut self, key: impl Into<String>, value: Value) -> Self {
        self.defaults.insert(key, value);
        self
    }

    /// Replaces the default-settings mapping wholesale.
    #[must_use]
    pub fn with_defaults(mut self, defaults: Mapping) -> Self {
        self.defaults = defaults;
        self
    }

    /// Binds an environment variable to a setting.
    #[must_use]
    pub fn with_env_var(mut self, env: impl Into<String>, attr: impl Into<String>) -> Self {
        self.env_map.push((env.into(), attr.into()));
        self
    }

    /// Sets the prefix for convention-based environment variable lookup.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// Maps a configuration file key to a differently named attribute.
    #[must_use]
    pub fn with_key_alias(mut self, key: impl Into<String>, attr: impl Into<String>) -> Self {
        self.key_map.push((key.into(), attr.into()));
        self
    }

    /// Declares a setting coerced to an integer.
    #[must_use]
    pub fn with_integer_setting(mut self, attr: impl Into<String>) -> Self {
        self.integer_settings.push(attr.into());
        self
    }

    /// Declares a setting coerced to a float.
    #[must_use]
    pub fn with_float_setting(mut self, attr: impl Into<String>) -> Self {
        self.float_settings.push(attr.into());
        self
    }

    /// Declares a setting coerced to a filesystem path with `~` expansion.
    #[must_use]
    pub fn with_path_setting(mut self, attr: impl Into<String>) -> Self {
        self.path_settings.push(attr.into());
        self
    }

    /// Registers a named subsection schema, instantiated as an empty child
    /// on construction and consulted by name when resolving dotted paths.
    #[must_use]
    pub fn with_section(mut self, schema: SectionSchema) -> Self {
        self.loaders.push(schema);
        self
    }

    /// Overrides the schema used for untyped nested mappings.
    #[must_use]
    pub fn with_dict_loader(mut self, schema: SectionSchema) -> Self {
        self.dict_loader = Some(Box::new(schema));
        self
    }

    /// Registers a validator hook for a setting.
    #[must_use]
    pub fn with_validator<F>(mut self, attr: impl Into<String>, hook: F) -> Self
    where
        F: Fn(&Value) -> std::result::Result<Value, String> + Send + Sync + 'static,
    {
        self.validators.insert(attr.into(), Arc::new(hook));
        self
    }

    /// Registers a formatter hook for a setting.
    #[must_use]
    pub fn with_formatter<F>(mut self, attr: impl Into<String>, hook: F) -> Self
    where
        F: Fn(&Value) -> std::result::Result<Value, String> + Send + Sync + 'static,
    {
        self.formatters.insert(attr.into(), Arc::new(hook));
        self
    }

    /// Declared section name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Required setting names.
    #[must_use]
    pub fn required(&self) -> &[String] {
        &self.required
    }

    /// Default settings mapping.
    #[must_use]
    pub fn defaults(&self) -> &Mapping {
        &self.defaults
    }

    /// Declared environment variable bindings, in declaration order.
    #[must_use]
    pub fn env_map(&self) -> &[(String, String)] {
        &self.env_map
    }

    /// Environment variable prefix, if any.
    #[must_use]
    pub fn env_prefix(&self) -> Option<&str> {
        self.env_prefix.as_deref()
    }

    /// Maps a configuration key to its attribute name.
    #[must_use]
    pub fn attribute_from_key<'a>(&'a self, key: &'a str) -> &'a str {
        self.key_map
            .iter()
            .find(|(from, _)| from == key)
            .map_or(key, |(_, to)| to.as_str())
    }

    /// Maps an attribute name back to its configuration key.
    #[must_use]
    pub fn key_from_attribute<'a>(&'a self, attr: &'a str) -> &'a str {
        self.key_map
            .iter()
            .find(|(_, to)| to == attr)
            .map_or(attr, |(from, _)| from.as_str())
    }

    /// True when the attribute is declared integer-typed.
    #[must_use]
    pub fn is_integer_setting(&self, attr: &str) -> bool {
        self.integer_settings.iter().any(|name| name == attr)
    }

    /// True when the attribute is declared float-typed.
    #[must_use]
    pub fn is_float_setting(&self, attr: &str) -> bool {
        self.float_settings.iter().any(|name| name == attr)
    }

    /// True when the attribute is declared path-typed.
    #[must_use]
    pub fn is_path_setting(&self, attr: &str) -> bool {
        self.path_settings.iter().any(|name| name == attr)
    }

    /// Declared subsection schemas.
    #[must_use]
    pub fn loaders(&self) -> &[SectionSchema] {
        &self.loaders
    }

    /// Finds a subsection schema by (alias-mapped) name.
    #[must_use]
    pub fn loader_for(&self, name: &str) -> Option<&SectionSchema> {
        self.loaders.iter().find(|loader| {
            loader
                .name()
                .is_some_and(|loader_name| self.attribute_from_key(loader_name) == name)
        })
    }

    /// Schema used for untyped nested mappings.
    ///
    /// Falls back to an anonymous empty schema when no override is set.
    #[must_use]
    pub fn dict_loader(&self) -> SectionSchema {
        self.dict_loader
            .as_deref()
            .cloned()
            .unwrap_or_default()
    }

    /// Registered validator hook for an attribute.
    #[must_use]
    pub fn validator(&self, attr: &str) -> Option<&ValidatorHook> {
        self.validators.get(attr)
    }

    /// Registered formatter hook for an attribute.
    #[must_use]
    pub fn formatter(&self, attr: &str) -> Option<&FormatterHook> {
        self.formatters.get(attr)
    }
}

impl fmt::Debug for SectionSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SectionSchema")
            .field("name", &self.name)
            .field("required", &self.required)
            .field("defaults", &self.defaults)
            .field("env_map", &self.env_map)
            .field("env_prefix", &self.env_prefix)
            .field("key_map", &self.key_map)
            .field("integer_settings", &self.integer_settings)
            .field("float_settings", &self.float_settings)
            .field("path_settings", &self.path_settings)
            .field("loaders", &self.loaders)
            .field("validators", &self.validators.keys().collect::<Vec<_>>())
            .field("formatters", &self.formatters.keys().collect::<Vec<_>>())
            .finish()
    }
}

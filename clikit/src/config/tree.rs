//! The configuration tree binder.
//!
//! A [`ConfigTree`] owns every section node in a single arena; sections are
//! addressed by [`SectionId`] and read through cheap [`SectionRef`] handles.
//! Loading walks arbitrary nested mappings (or flat dotted-path keys) and
//! binds each leaf through a fixed coercion pipeline: declared type
//! coercion, a registered validator hook, then a formatter hook or the
//! default trim/blank-to-null formatter.
//!
//! The load order for a section is always: seeded null placeholders for
//! every known setting, declared subsections, schema defaults, explicit
//! data, environment variables. Only the root validates required settings,
//! after the full sequence completes.

use std::collections::HashMap;

use crate::config::schema::SectionSchema;
use crate::config::value::{Mapping, Value};
use crate::error::{Error, Result};

/// Index of a section inside its owning [`ConfigTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionId(usize);

/// One bound attribute of a section.
#[derive(Debug, Clone)]
enum Entry {
    /// Scalar or null setting value.
    Value(Value),
    /// Nested section.
    Section(SectionId),
    /// Ordered list container.
    List(ConfigList),
}

/// Ordered list container bound under a single setting name.
///
/// Elements are either scalar values or nested sections. Re-binding the
/// setting fully reloads the element list.
#[derive(Debug, Clone)]
pub struct ConfigList {
    setting: String,
    values: Vec<ListEntry>,
}

#[derive(Debug, Clone)]
enum ListEntry {
    Value(Value),
    Section(SectionId),
}

#[derive(Debug)]
struct SectionNode {
    name: Option<String>,
    parent: Option<SectionId>,
    schema: SectionSchema,
    /// Settings seeded to null at construction (sorted, deduplicated).
    valid: Vec<String>,
    /// Attribute bind order, for deterministic serialization.
    order: Vec<String>,
    entries: HashMap<String, Entry>,
}

/// A configuration tree bound from mappings, files and the environment.
///
/// # Examples
///
/// ```
/// use clikit::config::{ConfigTree, Mapping, SectionSchema, Value};
///
/// let mut data = Mapping::new();
/// data.insert("hostname", Value::from("localhost"));
/// data.insert("port", Value::from("8080"));
///
/// let schema = SectionSchema::new().with_integer_setting("port");
/// let tree = ConfigTree::new(schema, Some(&data)).unwrap();
/// let root = tree.root();
/// assert_eq!(root.value("hostname").unwrap().as_str(), Some("localhost"));
/// assert_eq!(root.value("port").unwrap().as_i64(), Some(8080));
/// ```
#[derive(Debug)]
pub struct ConfigTree {
    nodes: Vec<SectionNode>,
}

impl ConfigTree {
    /// Builds and validates a tree from a schema and optional data mapping.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid attribute names, failing hooks or
    /// coercions, unnamed subsection schemas, or required settings left
    /// null after the full load sequence.
    pub fn new(schema: SectionSchema, data: Option<&Mapping>) -> Result<Self> {
        let tree = Self::build(schema, data)?;
        tree.validate()?;
        Ok(tree)
    }

    /// Builds a tree without running required-setting validation.
    ///
    /// Used by configuration files, which validate only after every
    /// default and explicit path has been loaded.
    pub(crate) fn build(schema: SectionSchema, data: Option<&Mapping>) -> Result<Self> {
        let mut tree = Self { nodes: Vec::new() };
        let root = tree.add_node(None, None, schema);
        tree.init_node(root, data)?;
        Ok(tree)
    }

    /// Read handle for the root section.
    #[must_use]
    pub fn root(&self) -> SectionRef<'_> {
        SectionRef {
            tree: self,
            id: SectionId(0),
        }
    }

    /// Read handle for any section by id.
    #[must_use]
    pub fn section(&self, id: SectionId) -> SectionRef<'_> {
        SectionRef { tree: self, id }
    }

    /// Validates that a candidate attribute name is a safe identifier.
    ///
    /// Accepts non-empty names of ASCII alphanumerics and underscores that
    /// do not start with a digit; rejects everything else.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAttribute`] for rejected names.
    pub fn validate_attribute(name: &str) -> Result<()> {
        let mut chars = name.chars();
        let valid = match chars.next() {
            Some(first) => {
                (first.is_ascii_alphabetic() || first == '_')
                    && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
            }
            None => false,
        };
        if valid {
            Ok(())
        } else {
            Err(Error::InvalidAttribute {
                name: name.to_string(),
            })
        }
    }

    /// Binds a setting on a section through the coercion pipeline.
    ///
    /// Dotted names resolve intermediate subsections exactly as dotted
    /// keys do during a mapping load.
    ///
    /// # Errors
    ///
    /// Returns an error when the attribute name is invalid or the value
    /// fails coercion, validation or formatting.
    pub fn set(&mut self, id: SectionId, attr: &str, value: Value) -> Result<()> {
        let (attr, rest) = self.split_attribute_path(id, attr);
        if rest.is_empty() {
            self.set_attribute(id, &attr, value)
        } else {
            self.load_section(id, &attr, value, Some(&rest))
        }
    }

    /// Loads a nested mapping into a section.
    ///
    /// Mapping values merge into (or create) subsections; dotted keys and
    /// nested mappings produce identical trees; anything else routes
    /// through [`ConfigTree::set`].
    ///
    /// # Errors
    ///
    /// Propagates any bind failure from the keys and values loaded.
    pub fn load_mapping(&mut self, id: SectionId, data: &Mapping) -> Result<()> {
        for (key, value) in data.iter() {
            let (attr, rest) = self.split_attribute_path(id, key);
            if !rest.is_empty() {
                self.load_section(id, &attr, value.clone(), Some(&rest))?;
            } else if let Value::Mapping(mapping) = value {
                let subsection = self.get_or_create_subsection(id, &attr)?;
                self.load_mapping(subsection, mapping)?;
            } else {
                self.set_attribute(id, &attr, value.clone())?;
            }
        }
        Ok(())
    }

    /// Applies environment variables to a section.
    ///
    /// Runs automatically as the last construction step of every section;
    /// exposed for re-overlay after manual mutation.
    ///
    /// # Errors
    ///
    /// Propagates coercion or hook failures for applied values.
    pub fn load_environment(&mut self, id: SectionId) -> Result<()> {
        let schema = self.nodes[id.0].schema.clone();

        if let Some(prefix) = schema.env_prefix() {
            for attr in self.nodes[id.0].valid.clone() {
                let env = format!("{prefix}_{attr}").to_uppercase();
                if let Ok(value) = std::env::var(&env) {
                    log::debug!("environment override {env} for setting {attr}");
                    self.set(id, &attr, Value::String(value))?;
                }
            }
        }

        for (env, attr) in schema.env_map() {
            if let Ok(value) = std::env::var(env) {
                log::debug!("environment override {env} for setting {attr}");
                self.set(id, attr, Value::String(value))?;
            }
        }

        Ok(())
    }

    /// Re-applies the environment overlay to every section in the tree.
    ///
    /// Configuration files run this after loading so environment values
    /// keep precedence over file-supplied ones.
    pub(crate) fn reapply_environment(&mut self) -> Result<()> {
        for index in 0..self.nodes.len() {
            self.load_environment(SectionId(index))?;
        }
        Ok(())
    }

    /// Checks required settings across the tree.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingSetting`] naming the section and attribute
    /// of the first required setting still null.
    pub fn validate(&self) -> Result<()> {
        self.validate_section(SectionId(0))
    }

    fn validate_section(&self, id: SectionId) -> Result<()> {
        let node = &self.nodes[id.0];
        for attr in node.schema.required() {
            let missing = match node.entries.get(attr) {
                Some(Entry::Value(value)) => value.is_null(),
                Some(_) => false,
                None => true,
            };
            if missing {
                return Err(Error::MissingSetting {
                    section: node.name.clone().unwrap_or_else(|| "root".to_string()),
                    attr: attr.clone(),
                });
            }
        }
        for entry in node.entries.values() {
            match entry {
                Entry::Section(child) => self.validate_section(*child)?,
                Entry::List(list) => {
                    for element in &list.values {
                        if let ListEntry::Section(child) = element {
                            self.validate_section(*child)?;
                        }
                    }
                }
                Entry::Value(_) => {}
            }
        }
        Ok(())
    }

    fn add_node(
        &mut self,
        name: Option<String>,
        parent: Option<SectionId>,
        schema: SectionSchema,
    ) -> SectionId {
        let id = SectionId(self.nodes.len());
        self.nodes.push(SectionNode {
            name,
            parent,
            schema,
            valid: Vec::new(),
            order: Vec::new(),
            entries: HashMap::new(),
        });
        id
    }

    /// Runs the section construction sequence: seed known settings to
    /// null, instantiate declared subsections, load schema defaults, load
    /// explicit data, overlay the environment.
    fn init_node(&mut self, id: SectionId, data: Option<&Mapping>) -> Result<()> {
        let schema = self.nodes[id.0].schema.clone();

        let valid = Self::detect_valid_settings(&schema)?;
        self.nodes[id.0].valid = valid.clone();
        for attr in &valid {
            self.set(id, attr, Value::Null)?;
        }

        for loader in schema.loaders() {
            let name = loader.name().ok_or(Error::UnnamedSection)?;
            let attr = schema.attribute_from_key(name).to_string();
            Self::validate_attribute(&attr)?;
            let child = self.add_node(Some(attr.clone()), Some(id), loader.clone());
            self.init_node(child, None)?;
            self.bind(id, &attr, Entry::Section(child));
        }

        let defaults = schema.defaults().clone();
        self.load_mapping(id, &defaults)?;

        if let Some(data) = data {
            self.load_mapping(id, data)?;
        }

        self.load_environment(id)?;
        Ok(())
    }

    /// Known settings for a section: required names, scalar default keys
    /// and environment-mapped attributes, sorted and deduplicated.
    fn detect_valid_settings(schema: &SectionSchema) -> Result<Vec<String>> {
        let mut attributes: Vec<String> = schema.required().to_vec();
        for (key, value) in schema.defaults().iter() {
            Self::validate_attribute(key)?;
            if !matches!(value, Value::Mapping(_)) && !attributes.iter().any(|a| a == key) {
                attributes.push(key.to_string());
            }
        }
        for (_, attr) in schema.env_map() {
            Self::validate_attribute(attr)?;
            if !attributes.iter().any(|a| a == attr) {
                attributes.push(attr.clone());
            }
        }
        attributes.sort();
        attributes.dedup();
        Ok(attributes)
    }

    /// Remaps a key through the alias table and splits off the first
    /// dotted-path segment.
    fn split_attribute_path(&self, id: SectionId, key: &str) -> (String, String) {
        let schema = &self.nodes[id.0].schema;
        let mapped = schema.attribute_from_key(key);
        match mapped.split_once('.') {
            Some((attr, rest)) => (attr.to_string(), rest.to_string()),
            None => (mapped.to_string(), String::new()),
        }
    }

    /// The leaf bind pipeline: delegate to a bound container, nest a
    /// mapping, build a list, or coerce and bind a scalar.
    fn set_attribute(&mut self, id: SectionId, attr: &str, value: Value) -> Result<()> {
        Self::validate_attribute(attr)?;

        // Delegate to an already-bound container instead of overwriting it.
        enum Bound {
            List,
            Section(SectionId),
            Other,
        }
        let bound = match self.nodes[id.0].entries.get(attr) {
            Some(Entry::List(_)) => Bound::List,
            Some(Entry::Section(child)) => Bound::Section(*child),
            _ => Bound::Other,
        };
        match bound {
            Bound::List => {
                let values = match value {
                    Value::List(items) => self.build_list_entries(id, items)?,
                    other => self.build_list_entries(id, vec![other])?,
                };
                if let Some(Entry::List(list)) = self.nodes[id.0].entries.get_mut(attr) {
                    list.values = values;
                }
                return Ok(());
            }
            Bound::Section(child) => {
                return match value {
                    Value::Mapping(mapping) => self.load_mapping(child, &mapping),
                    other => self.set(child, attr, other),
                };
            }
            Bound::Other => {}
        }

        match value {
            Value::Mapping(mapping) => {
                let loader = self.nodes[id.0].schema.dict_loader();
                let child = self.add_node(Some(attr.to_string()), Some(id), loader);
                self.init_node(child, Some(&mapping))?;
                self.bind(id, attr, Entry::Section(child));
            }
            Value::List(items) => {
                let values = self.build_list_entries(id, items)?;
                self.bind(
                    id,
                    attr,
                    Entry::List(ConfigList {
                        setting: attr.to_string(),
                        values,
                    }),
                );
            }
            scalar => {
                let processed = self.process_scalar(id, attr, scalar)?;
                self.bind(id, attr, Entry::Value(processed));
            }
        }
        Ok(())
    }

    /// Type coercion, validator hook, formatter hook (or the default
    /// trim/blank-to-null formatter), in fixed order.
    fn process_scalar(&self, id: SectionId, attr: &str, value: Value) -> Result<Value> {
        let schema = &self.nodes[id.0].schema;

        let mut value = value;
        if !value.is_null() {
            if schema.is_float_setting(attr) {
                value = coerce_float(attr, value)?;
            }
            if schema.is_integer_setting(attr) {
                value = coerce_integer(attr, value)?;
            }
            if schema.is_path_setting(attr) {
                value = coerce_path(attr, value)?;
            }
        }

        if let Some(hook) = schema.validator(attr) {
            value = hook(&value).map_err(|message| Error::SettingValidation {
                attr: attr.to_string(),
                message,
            })?;
        }

        match schema.formatter(attr) {
            Some(hook) => hook(&value).map_err(|message| Error::SettingFormat {
                attr: attr.to_string(),
                message,
            }),
            None => Ok(default_formatter(value)),
        }
    }

    /// Inserts an entry and records bind order exactly once per attribute.
    fn bind(&mut self, id: SectionId, attr: &str, entry: Entry) {
        let node = &mut self.nodes[id.0];
        node.entries.insert(attr.to_string(), entry);
        if !node.order.iter().any(|existing| existing == attr) {
            node.order.push(attr.to_string());
        }
    }

    fn build_list_entries(&mut self, parent: SectionId, items: Vec<Value>) -> Result<Vec<ListEntry>> {
        let mut values = Vec::with_capacity(items.len());
        for item in items {
            match item {
                Value::Mapping(mapping) => {
                    let loader = self.nodes[parent.0].schema.dict_loader();
                    let child = self.add_node(None, Some(parent), loader);
                    self.init_node(child, Some(&mapping))?;
                    values.push(ListEntry::Section(child));
                }
                other => values.push(ListEntry::Value(other)),
            }
        }
        Ok(values)
    }

    /// Returns the subsection bound under `name`, creating it with the
    /// schema registered for that name (or the dict-loader fallback).
    ///
    /// A scalar placeholder bound under the name is replaced.
    fn get_or_create_subsection(&mut self, parent: SectionId, name: &str) -> Result<SectionId> {
        Self::validate_attribute(name)?;
        if let Some(Entry::Section(child)) = self.nodes[parent.0].entries.get(name) {
            return Ok(*child);
        }
        let schema = &self.nodes[parent.0].schema;
        let loader = schema
            .loader_for(name)
            .cloned()
            .unwrap_or_else(|| schema.dict_loader());
        let child = self.add_node(Some(name.to_string()), Some(parent), loader);
        self.init_node(child, None)?;
        self.bind(parent, name, Entry::Section(child));
        Ok(child)
    }

    /// Resolves a dotted residual path below `section`, then binds `data`
    /// at the final segment: mappings load into the section named by the
    /// last segment (creating it), scalars bind on its parent section.
    fn load_section(
        &mut self,
        id: SectionId,
        section: &str,
        data: Value,
        path: Option<&str>,
    ) -> Result<()> {
        match path {
            Some(path) => {
                let mut current = self.get_or_create_subsection(id, section)?;
                let mut segments = path.split('.');
                let last = segments.next_back().unwrap_or(path);
                for segment in segments {
                    current = self.get_or_create_subsection(current, segment)?;
                }
                match data {
                    Value::Mapping(mapping) => {
                        let target = self.get_or_create_subsection(current, last)?;
                        self.load_mapping(target, &mapping)
                    }
                    other => self.set_attribute(current, last, other),
                }
            }
            None => match data {
                Value::Mapping(mapping) => {
                    let target = self.get_or_create_subsection(id, section)?;
                    self.load_mapping(target, &mapping)
                }
                other => Err(Error::NotAMapping {
                    context: other.type_name().to_string(),
                }),
            },
        }
    }

    fn list_values(&self, list: &ConfigList) -> Vec<Value> {
        list.values
            .iter()
            .map(|element| match element {
                ListEntry::Value(value) => value.clone(),
                ListEntry::Section(child) => Value::Mapping(self.section(*child).as_mapping()),
            })
            .collect()
    }
}

/// Default formatter: trim string whitespace, map empty strings to null.
fn default_formatter(value: Value) -> Value {
    match value {
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                Value::Null
            } else if trimmed.len() == text.len() {
                Value::String(text)
            } else {
                Value::String(trimmed.to_string())
            }
        }
        other => other,
    }
}

fn coerce_integer(attr: &str, value: Value) -> Result<Value> {
    let coerced = match &value {
        Value::Integer(_) => return Ok(value),
        #[allow(clippy::cast_possible_truncation)]
        Value::Float(number) => Some(*number as i64),
        Value::Bool(flag) => Some(i64::from(*flag)),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    };
    coerced.map(Value::Integer).ok_or_else(|| Error::SettingCoercion {
        attr: attr.to_string(),
        expected: "integer",
        value: format!("{value:?}"),
    })
}

fn coerce_float(attr: &str, value: Value) -> Result<Value> {
    let coerced = match &value {
        Value::Float(_) => return Ok(value),
        #[allow(clippy::cast_precision_loss)]
        Value::Integer(number) => Some(*number as f64),
        Value::Bool(flag) => Some(f64::from(u8::from(*flag))),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    coerced.map(Value::Float).ok_or_else(|| Error::SettingCoercion {
        attr: attr.to_string(),
        expected: "float",
        value: format!("{value:?}"),
    })
}

/// Path coercion expands a leading `~` to the user's home directory.
fn coerce_path(attr: &str, value: Value) -> Result<Value> {
    match &value {
        Value::Path(_) => Ok(value),
        Value::String(text) => Ok(Value::Path(expand_user(text))),
        _ => Err(Error::SettingCoercion {
            attr: attr.to_string(),
            expected: "path",
            value: format!("{value:?}"),
        }),
    }
}

pub(crate) fn expand_user(path: &str) -> std::path::PathBuf {
    if path == "~" {
        if let Some(dir) = home::home_dir() {
            return dir;
        }
    } else if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(dir) = home::home_dir() {
            return dir.join(stripped);
        }
    }
    std::path::PathBuf::from(path)
}

/// Borrowed view of one bound attribute.
#[derive(Debug, Clone, Copy)]
pub enum ItemRef<'a> {
    /// Scalar or null setting value.
    Value(&'a Value),
    /// Nested section handle.
    Section(SectionRef<'a>),
    /// List container handle.
    List(ListRef<'a>),
}

/// Cheap read handle for a section inside a [`ConfigTree`].
#[derive(Debug, Clone, Copy)]
pub struct SectionRef<'a> {
    tree: &'a ConfigTree,
    id: SectionId,
}

impl<'a> SectionRef<'a> {
    /// The section's id, usable with the tree's mutation methods.
    #[must_use]
    pub fn id(&self) -> SectionId {
        self.id
    }

    /// The section's name; absent for the root.
    #[must_use]
    pub fn name(&self) -> Option<&'a str> {
        self.tree.nodes[self.id.0].name.as_deref()
    }

    /// The owning parent section, if any.
    #[must_use]
    pub fn parent(&self) -> Option<SectionRef<'a>> {
        self.tree.nodes[self.id.0]
            .parent
            .map(|id| self.tree.section(id))
    }

    /// The configuration root, found by walking parent links.
    #[must_use]
    pub fn config_root(&self) -> SectionRef<'a> {
        let mut current = *self;
        while let Some(parent) = current.parent() {
            current = parent;
        }
        current
    }

    /// Bound attribute names in bind order.
    pub fn attributes(&self) -> impl Iterator<Item = &'a str> {
        self.tree.nodes[self.id.0]
            .order
            .iter()
            .map(String::as_str)
    }

    /// Looks up any bound attribute.
    #[must_use]
    pub fn get(&self, attr: &str) -> Option<ItemRef<'a>> {
        match self.tree.nodes[self.id.0].entries.get(attr)? {
            Entry::Value(value) => Some(ItemRef::Value(value)),
            Entry::Section(child) => Some(ItemRef::Section(self.tree.section(*child))),
            Entry::List(list) => Some(ItemRef::List(ListRef {
                tree: self.tree,
                list,
            })),
        }
    }

    /// Looks up a scalar setting value.
    #[must_use]
    pub fn value(&self, attr: &str) -> Option<&'a Value> {
        match self.get(attr)? {
            ItemRef::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Looks up a nested section.
    #[must_use]
    pub fn section(&self, attr: &str) -> Option<SectionRef<'a>> {
        match self.get(attr)? {
            ItemRef::Section(section) => Some(section),
            _ => None,
        }
    }

    /// Looks up a list container.
    #[must_use]
    pub fn list(&self, attr: &str) -> Option<ListRef<'a>> {
        match self.get(attr)? {
            ItemRef::List(list) => Some(list),
            _ => None,
        }
    }

    /// Resolves a dotted path of sections ending in any attribute.
    #[must_use]
    pub fn resolve(&self, dotted: &str) -> Option<ItemRef<'a>> {
        let mut current = *self;
        let mut segments = dotted.split('.').peekable();
        while let Some(segment) = segments.next() {
            if segments.peek().is_none() {
                return current.get(segment);
            }
            current = current.section(segment)?;
        }
        None
    }

    /// Reports the section as a plain nested mapping in bind order.
    #[must_use]
    pub fn as_mapping(&self) -> Mapping {
        let node = &self.tree.nodes[self.id.0];
        let mut data = Mapping::new();
        for attr in &node.order {
            match node.entries.get(attr) {
                Some(Entry::Value(value)) => data.insert(attr.clone(), value.clone()),
                Some(Entry::Section(child)) => data.insert(
                    attr.clone(),
                    Value::Mapping(self.tree.section(*child).as_mapping()),
                ),
                Some(Entry::List(list)) => {
                    data.insert(attr.clone(), Value::List(self.tree.list_values(list)));
                }
                None => {}
            }
        }
        data
    }
}

/// Cheap read handle for a list container.
#[derive(Debug, Clone, Copy)]
pub struct ListRef<'a> {
    tree: &'a ConfigTree,
    list: &'a ConfigList,
}

impl<'a> ListRef<'a> {
    /// The setting name the list is bound under.
    #[must_use]
    pub fn setting(&self) -> &'a str {
        &self.list.setting
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.list.values.len()
    }

    /// Returns true when the list has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.list.values.is_empty()
    }

    /// Element by index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<ItemRef<'a>> {
        match self.list.values.get(index)? {
            ListEntry::Value(value) => Some(ItemRef::Value(value)),
            ListEntry::Section(child) => Some(ItemRef::Section(self.tree.section(*child))),
        }
    }

    /// Iterates elements in order.
    pub fn iter(&self) -> impl Iterator<Item = ItemRef<'a>> + '_ {
        (0..self.len()).filter_map(|index| self.get(index))
    }
}

//! Configuration system for clikit.
//!
//! This module provides the configuration tree binder: nested mappings from
//! YAML, JSON or INI sources bind onto section trees described by
//! declarative schemas, with support for:
//! - dotted-path keys (`a.b.c`) equivalent to nested mappings
//! - scalar defaults, required settings and environment variable overrides
//! - per-attribute type coercion and validator/formatter hooks
//! - strongly-typed subsection schemas and key aliasing
//!
//! # Load order
//!
//! Every section binds its settings in a fixed sequence (later sources
//! overwrite earlier ones field-by-field):
//!
//! 1. Null placeholders for every known setting
//! 2. Declared subsection schemas, as empty children
//! 3. Schema default settings
//! 4. Explicit data (or configuration files, defaults first)
//! 5. Environment variables (prefix convention, then explicit bindings)
//!
//! Only the root validates required settings, after the full sequence.
//!
//! # Examples
//!
//! Binding a mapping with a schema:
//!
//! ```
//! use clikit::config::{ConfigTree, Mapping, SectionSchema, Value};
//!
//! let schema = SectionSchema::new()
//!     .with_default("region", Value::from("eu"))
//!     .with_integer_setting("port");
//!
//! let mut data = Mapping::new();
//! data.insert("port", Value::from("8080"));
//!
//! let tree = ConfigTree::new(schema, Some(&data)).unwrap();
//! assert_eq!(tree.root().value("region").unwrap().as_str(), Some("eu"));
//! assert_eq!(tree.root().value("port").unwrap().as_i64(), Some(8080));
//! ```
//!
//! Loading a configuration file with fallbacks:
//!
//! ```no_run
//! use clikit::config::{ConfigFile, FileFormat};
//!
//! let config = ConfigFile::builder(FileFormat::Yaml)
//!     .with_default_path("/etc/myapp.yml")
//!     .with_path("~/.config/myapp.yml")
//!     .load()
//!     .unwrap();
//! ```

pub mod file;
pub mod schema;
pub mod tree;
pub mod value;

#[cfg(test)]
mod proptests;

// Re-export key types at module root
pub use file::{ConfigFile, ConfigFileBuilder, FileFormat};
pub use schema::{FormatterHook, SectionSchema, ValidatorHook};
pub use tree::{ConfigList, ConfigTree, ItemRef, ListRef, SectionId, SectionRef};
pub use value::{Mapping, Value};

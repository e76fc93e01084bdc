#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # clikit
//!
//! A toolkit for building command-line programs with hierarchical
//! subcommands, layered configuration-file loading, and leveled logging.
//!
//! ## Core Types
//!
//! - [`config::ConfigTree`] and [`config::SectionSchema`]: the
//!   configuration tree binder and its declarative schemas
//! - [`config::ConfigFile`]: YAML/JSON/INI configuration files with
//!   default-path fallbacks
//! - [`command::Script`] and [`command::CliCommand`]: nested CLI command
//!   trees
//! - [`Error`] and [`Result`]: error handling types
//! - [`Logger`] and [`LogLevel`]: leveled stderr logging
//!
//! ## Examples
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
//! assert_eq!(tree.root().value("port").unwrap().as_i64(), Some(8080));
//! ```

pub mod command;
pub mod config;
pub mod encoders;
pub mod error;
pub mod logging;
pub mod path;
pub mod platform;
pub mod process;
pub mod textfile;

// Re-export key types at crate root for convenience
pub use command::{CliCommand, Script, ScriptContext};
pub use config::{ConfigFile, ConfigTree, FileFormat, Mapping, SectionSchema, Value};
pub use error::{Error, Result};
pub use logging::{init_logger, LogLevel, Logger};
pub use path::Executables;
pub use platform::{PlatformFamily, ToolchainFamily};

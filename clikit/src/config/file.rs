//! Configuration file loading.
//!
//! A [`ConfigFile`] binds one or more configuration files onto a section
//! tree. Default paths are tried in order before the explicit path; a
//! path that does not exist is silently skipped, while a file that exists
//! but cannot be read or parsed fails hard. YAML, JSON and INI sources all
//! reduce to the same plain-mapping input for the tree binder.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::config::schema::SectionSchema;
use crate::config::tree::{expand_user, ConfigTree, SectionRef};
use crate::config::value::{Mapping, Value};
use crate::error::{Error, Result};

/// Supported configuration file formats.
///
/// # Examples
///
/// ```
/// use clikit::config::FileFormat;
///
/// assert_eq!("yaml".parse::<FileFormat>().unwrap(), FileFormat::Yaml);
/// assert_eq!(FileFormat::Ini.to_string(), "ini");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// YAML documents.
    Yaml,
    /// JSON documents.
    Json,
    /// INI files, restricted to two levels (section and keys).
    Ini,
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Yaml => write!(f, "yaml"),
            Self::Json => write!(f, "json"),
            Self::Ini => write!(f, "ini"),
        }
    }
}

impl FromStr for FileFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            "ini" => Ok(Self::Ini),
            other => Err(Error::Script(format!("unknown file format: {other}"))),
        }
    }
}

/// A configuration tree bound from files.
///
/// # Examples
///
/// ```no_run
/// use clikit::config::{ConfigFile, FileFormat, SectionSchema};
///
/// let config = ConfigFile::builder(FileFormat::Yaml)
///     .with_schema(SectionSchema::new())
///     .with_default_path("/etc/myapp.yml")
///     .with_path("~/.config/myapp.yml")
///     .load()
///     .unwrap();
/// println!("{:?}", config.as_mapping());
/// ```
#[derive(Debug)]
pub struct ConfigFile {
    tree: ConfigTree,
    format: FileFormat,
    path: Option<PathBuf>,
}

impl ConfigFile {
    /// Starts building a configuration file of the given format.
    #[must_use]
    pub fn builder(format: FileFormat) -> ConfigFileBuilder {
        ConfigFileBuilder {
            format,
            schema: SectionSchema::new(),
            default_paths: Vec::new(),
            path: None,
        }
    }

    /// The explicit path this configuration was built with, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The file format this configuration parses.
    #[must_use]
    pub fn format(&self) -> FileFormat {
        self.format
    }

    /// Read handle for the root section.
    #[must_use]
    pub fn root(&self) -> SectionRef<'_> {
        self.tree.root()
    }

    /// The underlying tree.
    #[must_use]
    pub fn tree(&self) -> &ConfigTree {
        &self.tree
    }

    /// Mutable access to the underlying tree.
    pub fn tree_mut(&mut self) -> &mut ConfigTree {
        &mut self.tree
    }

    /// Reports the bound tree as a plain nested mapping.
    #[must_use]
    pub fn as_mapping(&self) -> Mapping {
        self.tree.root().as_mapping()
    }

    /// Loads one configuration file into the tree in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not a regular readable file or its
    /// content does not parse as the configured format.
    pub fn load(&mut self, path: &Path) -> Result<()> {
        let path = check_file_access(path)?;
        log::debug!("loading {} configuration from {}", self.format, path.display());

        let contents = fs::read_to_string(&path).map_err(|error| {
            if error.kind() == std::io::ErrorKind::PermissionDenied {
                Error::FileAccess { path: path.clone() }
            } else {
                Error::FileParse {
                    path: path.clone(),
                    message: error.to_string(),
                }
            }
        })?;

        let data = parse_document(self.format, &path, &contents)?;
        self.parse_data(data)
    }

    /// Feeds parsed file data to the tree binder.
    ///
    /// A null document is a no-op; anything but a mapping is an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAMapping`] for non-mapping data and propagates
    /// bind failures.
    pub fn parse_data(&mut self, data: Value) -> Result<()> {
        match data {
            Value::Null => Ok(()),
            Value::Mapping(mapping) => {
                let root = self.tree.root().id();
                self.tree.load_mapping(root, &mapping)
            }
            other => Err(Error::NotAMapping {
                context: other.type_name().to_string(),
            }),
        }
    }
}

/// Builder for [`ConfigFile`].
#[derive(Debug)]
pub struct ConfigFileBuilder {
    format: FileFormat,
    schema: SectionSchema,
    default_paths: Vec<PathBuf>,
    path: Option<PathBuf>,
}

impl ConfigFileBuilder {
    /// Sets the root section schema.
    #[must_use]
    pub fn with_schema(mut self, schema: SectionSchema) -> Self {
        self.schema = schema;
        self
    }

    /// Adds a default path tried before the explicit path.
    #[must_use]
    pub fn with_default_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.default_paths.push(path.into());
        self
    }

    /// Sets the explicit configuration file path.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Builds the tree, loads every existing path in order and validates
    /// required settings.
    ///
    /// Default paths load first, the explicit path last; absent files are
    /// skipped without error.
    ///
    /// # Errors
    ///
    /// Returns an error when schema construction fails, an existing file
    /// cannot be read or parsed, or a required setting is still null once
    /// every source has loaded.
    pub fn load(self) -> Result<ConfigFile> {
        let tree = ConfigTree::build(self.schema, None)?;
        let mut file = ConfigFile {
            tree,
            format: self.format,
            path: self.path.map(|path| expand_path(&path)),
        };

        for default_path in &self.default_paths {
            let default_path = expand_path(default_path);
            if default_path.is_file() {
                file.load(&default_path)?;
            }
        }

        if let Some(path) = file.path.clone() {
            if path.exists() {
                file.load(&path)?;
            }
        }

        // Environment values keep precedence over file-supplied ones.
        file.tree.reapply_environment()?;
        file.tree.validate()?;
        Ok(file)
    }
}

fn expand_path(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(text) => expand_user(text),
        None => path.to_path_buf(),
    }
}

/// Verify the path points at a regular file.
fn check_file_access(path: &Path) -> Result<PathBuf> {
    let path = expand_path(path);
    if path.is_file() {
        Ok(path)
    } else {
        Err(Error::FileNotFound { path })
    }
}

/// Parse file contents into plain values for the binder.
fn parse_document(format: FileFormat, path: &Path, contents: &str) -> Result<Value> {
    match format {
        FileFormat::Yaml => {
            let parsed: serde_yaml::Value =
                serde_yaml::from_str(contents).map_err(|error| Error::FileParse {
                    path: path.to_path_buf(),
                    message: error.to_string(),
                })?;
            Ok(Value::from(parsed))
        }
        FileFormat::Json => {
            let parsed: serde_json::Value =
                serde_json::from_str(contents).map_err(|error| Error::FileParse {
                    path: path.to_path_buf(),
                    message: error.to_string(),
                })?;
            Ok(Value::from(parsed))
        }
        FileFormat::Ini => parse_ini(path, contents),
    }
}

/// INI sources bind as exactly two levels: section name to string keys.
/// Keys outside any section bind directly on the root.
fn parse_ini(path: &Path, contents: &str) -> Result<Value> {
    let parsed = ini::Ini::load_from_str(contents).map_err(|error| Error::FileParse {
        path: path.to_path_buf(),
        message: error.to_string(),
    })?;

    let mut data = Mapping::new();
    for (section, properties) in parsed.iter() {
        match section {
            Some(name) => {
                let mut keys = Mapping::new();
                for (key, value) in properties.iter() {
                    keys.insert(key.to_string(), Value::String(value.to_string()));
                }
                data.insert(name.to_string(), Value::Mapping(keys));
            }
            None => {
                for (key, value) in properties.iter() {
                    data.insert(key.to_string(), Value::String(value.to_string()));
                }
            }
        }
    }
    Ok(Value::Mapping(data))
}

//! Error types for the clikit library.
//!
//! This module provides the error hierarchy for all operations in the
//! clikit library, using `thiserror` for ergonomic error handling.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for operations that may fail with a clikit error.
///
/// # Examples
///
/// ```
/// use clikit::{Error, Result};
///
/// fn example_operation() -> Result<u16> {
///     Ok(8080)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the clikit library.
///
/// This enum encompasses all error conditions raised while binding
/// configuration trees, loading configuration files, running commands and
/// subprocesses, and parsing text files.
#[derive(Debug, Error)]
pub enum Error {
    /// A configuration attribute name is not a valid identifier.
    #[error("invalid attribute name: {name}")]
    InvalidAttribute {
        /// The rejected attribute name.
        name: String,
    },

    /// Data that must be a mapping was something else.
    #[error("data is not a mapping: {context}")]
    NotAMapping {
        /// Description of the offending value.
        context: String,
    },

    /// A subsection schema was registered without a name.
    #[error("subsection schema defines no name")]
    UnnamedSection,

    /// A required setting was still unset after the full load sequence.
    #[error("{section}: required setting {attr} has no value")]
    MissingSetting {
        /// Name of the section missing the setting.
        section: String,
        /// The required attribute name.
        attr: String,
    },

    /// A registered validator hook rejected a setting value.
    #[error("error validating setting {attr}: {message}")]
    SettingValidation {
        /// The attribute being validated.
        attr: String,
        /// The validator's failure message.
        message: String,
    },

    /// A registered formatter hook failed for a setting value.
    #[error("error formatting setting {attr}: {message}")]
    SettingFormat {
        /// The attribute being formatted.
        attr: String,
        /// The formatter's failure message.
        message: String,
    },

    /// A declared typed setting could not be coerced.
    #[error("error coercing setting {attr} to {expected}: {value}")]
    SettingCoercion {
        /// The attribute being coerced.
        attr: String,
        /// The declared target type.
        expected: &'static str,
        /// The raw value that failed coercion.
        value: String,
    },

    /// A configuration file path does not exist or is not a regular file.
    #[error("no such file: {}", path.display())]
    FileNotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// A configuration file exists but cannot be read.
    #[error("permission denied: {}", path.display())]
    FileAccess {
        /// The unreadable path.
        path: PathBuf,
    },

    /// A configuration file could not be parsed.
    #[error("error loading {}: {message}", path.display())]
    FileParse {
        /// The path that failed to parse.
        path: PathBuf,
        /// The underlying parser failure.
        message: String,
    },

    /// A line-oriented text file could not be read.
    #[error("error parsing {}: {message}", path.display())]
    FileParser {
        /// The path being parsed.
        path: PathBuf,
        /// The reason parsing failed.
        message: String,
    },

    /// Running a subprocess failed or returned an unexpected status.
    #[error("error running {command}: {message}")]
    Command {
        /// The command line that was executed.
        command: String,
        /// The reason the run was considered failed.
        message: String,
    },

    /// An error raised while building or running a CLI script.
    #[error("script error: {0}")]
    Script(String),

    /// An error raised by logging configuration.
    #[error("logger error: {0}")]
    Logger(String),

    /// An error raised while encoding data for output.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// The operating system platform could not be classified.
    #[error("unsupported platform: {platform}")]
    UnsupportedPlatform {
        /// The reported OS name.
        platform: String,
    },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Check if error indicates a missing file.
    ///
    /// # Examples
    ///
    /// ```
    /// use clikit::Error;
    /// use std::path::PathBuf;
    ///
    /// let err = Error::FileNotFound { path: PathBuf::from("/nonexistent") };
    /// assert!(err.is_not_found());
    /// ```
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::FileNotFound { .. })
    }

    /// Check if error was raised by the configuration binder itself.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidAttribute { .. }
                | Self::NotAMapping { .. }
                | Self::UnnamedSection
                | Self::MissingSetting { .. }
                | Self::SettingValidation { .. }
                | Self::SettingFormat { .. }
                | Self::SettingCoercion { .. }
        )
    }
}

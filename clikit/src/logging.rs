//! Logging infrastructure for the clikit library.
//!
//! Provides a leveled stderr logger for CLI scripts. Library internals
//! additionally emit trace diagnostics through the `log` facade macros, so
//! embedding applications can route them to their own subscriber.

use std::env;
use std::fmt;
use std::str::FromStr;

/// Environment variable consulted for the default log level.
pub const LOG_MODE_ENV: &str = "CLIKIT_LOG_MODE";

/// Output verbosity for CLI scripts.
///
/// Levels are ordered from least verbose (`Quiet`) to most verbose
/// (`Verbose`).
///
/// # Examples
///
/// ```
/// use clikit::LogLevel;
///
/// assert!(LogLevel::Quiet < LogLevel::Normal);
/// assert!(LogLevel::Normal < LogLevel::Verbose);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Suppress all non-essential output.
    Quiet,
    /// Errors and warnings only.
    Normal,
    /// Errors, warnings, info and debug messages.
    Verbose,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Quiet => write!(f, "quiet"),
            Self::Normal => write!(f, "normal"),
            Self::Verbose => write!(f, "verbose"),
        }
    }
}

impl FromStr for LogLevel {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "quiet" => Ok(Self::Quiet),
            "normal" => Ok(Self::Normal),
            "verbose" => Ok(Self::Verbose),
            other => Err(crate::Error::Logger(format!("invalid log level: {other}"))),
        }
    }
}

/// A leveled stderr logger for scripts and commands.
///
/// # Examples
///
/// ```
/// use clikit::{LogLevel, Logger};
///
/// let logger = Logger::new(LogLevel::Normal);
/// logger.error("something went wrong");
/// logger.debug("not printed at Normal level");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Logger {
    level: LogLevel,
}

impl Logger {
    /// Creates a logger with the given level.
    #[must_use]
    pub const fn new(level: LogLevel) -> Self {
        Self { level }
    }

    /// The configured level.
    #[must_use]
    pub const fn level(&self) -> LogLevel {
        self.level
    }

    /// Prints an error message unless the level is `Quiet`.
    pub fn error(&self, message: &str) {
        if self.level >= LogLevel::Normal {
            eprintln!("ERROR: {message}");
        }
    }

    /// Prints a warning unless the level is `Quiet`.
    pub fn warn(&self, message: &str) {
        if self.level >= LogLevel::Normal {
            eprintln!("WARN: {message}");
        }
    }

    /// Prints an informational message at `Verbose` level.
    pub fn info(&self, message: &str) {
        if self.level >= LogLevel::Verbose {
            eprintln!("INFO: {message}");
        }
    }

    /// Prints a debug message at `Verbose` level.
    pub fn debug(&self, message: &str) {
        if self.level >= LogLevel::Verbose {
            eprintln!("DEBUG: {message}");
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(LogLevel::Normal)
    }
}

/// Resolves a logger from CLI flags and the environment.
///
/// Priority: the `verbose` flag, then the `quiet` flag, then the
/// `CLIKIT_LOG_MODE` environment variable, then `Normal`. An unparseable
/// environment value falls back to the default.
///
/// # Examples
///
/// ```
/// use clikit::{init_logger, LogLevel};
///
/// let logger = init_logger(true, false);
/// assert_eq!(logger.level(), LogLevel::Verbose);
/// ```
#[must_use]
pub fn init_logger(verbose: bool, quiet: bool) -> Logger {
    if verbose {
        return Logger::new(LogLevel::Verbose);
    }
    if quiet {
        return Logger::new(LogLevel::Quiet);
    }

    if let Ok(value) = env::var(LOG_MODE_ENV) {
        if let Ok(level) = value.parse::<LogLevel>() {
            return Logger::new(level);
        }
    }

    Logger::new(LogLevel::Normal)
}

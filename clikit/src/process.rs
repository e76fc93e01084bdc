//! Subprocess execution helpers.
//!
//! Thin wrappers over `std::process::Command` that check the exit status
//! against an expected set and hand back captured output, either as raw
//! bytes or decoded to lines.

use std::ffi::{OsStr, OsString};
use std::path::PathBuf;
use std::process::Command;

use crate::error::{Error, Result};

/// Options for running a subprocess.
///
/// # Examples
///
/// ```
/// use clikit::process::RunOptions;
///
/// let options = RunOptions::new()
///     .with_cwd("/tmp")
///     .with_expected_status(0)
///     .with_expected_status(1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    cwd: Option<PathBuf>,
    env: Vec<(OsString, OsString)>,
    expected_status: Vec<i32>,
}

impl RunOptions {
    /// Creates default options: inherited environment, status 0 expected.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the working directory for the subprocess.
    #[must_use]
    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Adds an environment variable on top of the inherited environment.
    #[must_use]
    pub fn with_env(mut self, key: impl Into<OsString>, value: impl Into<OsString>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Adds an accepted exit status. The first call replaces the implicit
    /// default of 0.
    #[must_use]
    pub fn with_expected_status(mut self, status: i32) -> Self {
        self.expected_status.push(status);
        self
    }
}

/// Runs a command and returns captured stdout and stderr as bytes.
///
/// # Errors
///
/// Returns [`Error::Command`] when the argument list is empty, the process
/// cannot be spawned, or it exits with an unexpected status.
///
/// # Examples
///
/// ```no_run
/// use clikit::process::run_command;
///
/// let (stdout, _stderr) = run_command(&["uname", "-s"]).unwrap();
/// assert!(!stdout.is_empty());
/// ```
pub fn run_command<S: AsRef<OsStr>>(args: &[S]) -> Result<(Vec<u8>, Vec<u8>)> {
    run_command_in(args, &RunOptions::default())
}

/// Runs a command with explicit options.
///
/// # Errors
///
/// See [`run_command`].
pub fn run_command_in<S: AsRef<OsStr>>(
    args: &[S],
    options: &RunOptions,
) -> Result<(Vec<u8>, Vec<u8>)> {
    let display = args
        .iter()
        .map(|arg| arg.as_ref().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ");

    let (program, rest) = args.split_first().ok_or_else(|| Error::Command {
        command: display.clone(),
        message: "empty argument list".to_string(),
    })?;

    let mut command = Command::new(program.as_ref());
    command.args(rest.iter().map(AsRef::as_ref));
    if let Some(cwd) = &options.cwd {
        command.current_dir(cwd);
    }
    for (key, value) in &options.env {
        command.env(key, value);
    }

    let output = command.output().map_err(|error| Error::Command {
        command: display.clone(),
        message: error.to_string(),
    })?;

    let expected: &[i32] = if options.expected_status.is_empty() {
        &[0]
    } else {
        &options.expected_status
    };
    let status = output.status.code().unwrap_or(-1);
    if !expected.contains(&status) {
        return Err(Error::Command {
            command: display,
            message: format!(
                "returns {status}: {}",
                String::from_utf8_lossy(&output.stderr).trim_end()
            ),
        });
    }

    Ok((output.stdout, output.stderr))
}

/// Runs a command and returns stdout and stderr decoded to lines.
///
/// Lines that are not valid UTF-8 decode lossily.
///
/// # Errors
///
/// See [`run_command`].
pub fn run_command_lineoutput<S: AsRef<OsStr>>(args: &[S]) -> Result<(Vec<String>, Vec<String>)> {
    run_command_lineoutput_in(args, &RunOptions::default())
}

/// Runs a command with explicit options and returns decoded lines.
///
/// # Errors
///
/// See [`run_command`].
pub fn run_command_lineoutput_in<S: AsRef<OsStr>>(
    args: &[S],
    options: &RunOptions,
) -> Result<(Vec<String>, Vec<String>)> {
    let (stdout, stderr) = run_command_in(args, options)?;
    Ok((decode_lines(&stdout), decode_lines(&stderr)))
}

fn decode_lines(bytes: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(bytes)
        .lines()
        .map(ToString::to_string)
        .collect()
}

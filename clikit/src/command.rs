//! CLI scripts with nested subcommands.
//!
//! A [`Script`] owns a tree of [`CliCommand`] implementations and builds
//! the matching `clap` parser at runtime: each command contributes its own
//! arguments through `configure` and its children through `subcommands`.
//! Dispatch walks the parsed matches down to the deepest selected command
//! and invokes its `run` with a [`ScriptContext`] carrying the global
//! `--debug`/`--quiet` flags.
//!
//! # Examples
//!
//! ```
//! use clap::ArgMatches;
//! use clikit::command::{CliCommand, Script, ScriptContext};
//!
//! struct Hello;
//!
//! impl CliCommand for Hello {
//!     fn name(&self) -> &str {
//!         "hello"
//!     }
//!
//!     fn description(&self) -> &str {
//!         "Print a greeting"
//!     }
//!
//!     fn run(&self, _args: &ArgMatches, ctx: &ScriptContext) -> clikit::Result<()> {
//!         ctx.message("hello world");
//!         Ok(())
//!     }
//! }
//!
//! let script = Script::new("demo").with_command(Hello);
//! script.try_run_from(["demo", "hello"]).unwrap();
//! ```

use std::ffi::OsString;

use clap::{Arg, ArgAction, ArgMatches};

use crate::error::{Error, Result};
use crate::logging::{init_logger, Logger};

/// Shared state passed to every executed command.
///
/// Carries the global output flags and a [`Logger`] resolved from them.
#[derive(Debug)]
pub struct ScriptContext {
    debug: bool,
    quiet: bool,
    logger: Logger,
}

impl ScriptContext {
    /// Creates a context from the global flag values.
    #[must_use]
    pub fn new(debug: bool, quiet: bool) -> Self {
        Self {
            debug,
            quiet,
            logger: init_logger(debug, quiet),
        }
    }

    /// True when `--debug` was given.
    #[must_use]
    pub fn is_debug_enabled(&self) -> bool {
        self.debug
    }

    /// True when `--quiet` was given.
    #[must_use]
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// The resolved logger.
    #[must_use]
    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Prints a message to stdout unless quiet mode is enabled.
    pub fn message(&self, message: &str) {
        if !self.quiet {
            println!("{message}");
        }
    }

    /// Prints a message to stderr.
    pub fn error(&self, message: &str) {
        eprintln!("{message}");
    }

    /// Prints a message to stderr when debug mode is enabled.
    pub fn debug(&self, message: &str) {
        if self.debug {
            eprintln!("{message}");
        }
    }
}

/// One command in a script's command tree.
///
/// Commands nest: a command that returns children from `subcommands`
/// becomes a parser for those children, and its own `run` is only invoked
/// when no child was selected.
pub trait CliCommand {
    /// The name used on the command line.
    fn name(&self) -> &str;

    /// Short description shown in help output.
    fn description(&self) -> &str {
        ""
    }

    /// Usage override for help output.
    fn usage(&self) -> Option<&str> {
        None
    }

    /// Epilog shown at the bottom of help output.
    fn epilog(&self) -> Option<&str> {
        None
    }

    /// Registers the command's own arguments on its parser.
    fn configure(&self, command: clap::Command) -> clap::Command {
        command
    }

    /// Child commands nested under this command.
    fn subcommands(&self) -> Vec<Box<dyn CliCommand>> {
        Vec::new()
    }

    /// Runs the command with its parsed arguments.
    ///
    /// The default implementation fails: commands that only parent nested
    /// subcommands rely on it when invoked without a selection.
    ///
    /// # Errors
    ///
    /// Returns an error when the command fails; the script reports it on
    /// stderr and exits nonzero.
    fn run(&self, args: &ArgMatches, ctx: &ScriptContext) -> Result<()> {
        let _ = (args, ctx);
        Err(Error::Script("no command selected".to_string()))
    }
}

/// A CLI script: a named root with registered top-level commands.
pub struct Script {
    name: String,
    description: String,
    commands: Vec<Box<dyn CliCommand>>,
}

impl Script {
    /// Creates a script with the given program name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            commands: Vec::new(),
        }
    }

    /// Sets the description shown on top of `--help` output.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Registers a top-level command.
    #[must_use]
    pub fn with_command(mut self, command: impl CliCommand + 'static) -> Self {
        self.commands.push(Box::new(command));
        self
    }

    /// Builds the full argument parser for the command tree.
    #[must_use]
    pub fn build_parser(&self) -> clap::Command {
        let mut parser = clap::Command::new(self.name.clone())
            .arg(
                Arg::new("debug")
                    .long("debug")
                    .action(ArgAction::SetTrue)
                    .global(true)
                    .help("Enable debug messages"),
            )
            .arg(
                Arg::new("quiet")
                    .long("quiet")
                    .action(ArgAction::SetTrue)
                    .global(true)
                    .help("Silence printed messages"),
            );
        if !self.description.is_empty() {
            parser = parser.about(self.description.clone());
        }
        for command in &self.commands {
            parser = parser.subcommand(build_command(command.as_ref()));
        }
        parser
    }

    /// Parses the given argument list and runs the selected command.
    ///
    /// # Errors
    ///
    /// Returns an error for unparseable arguments, an unselected command,
    /// or a failing command run.
    pub fn try_run_from<I, T>(&self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self
            .build_parser()
            .try_get_matches_from(args)
            .map_err(|error| Error::Script(error.to_string()))?;
        let ctx = ScriptContext::new(matches.get_flag("debug"), matches.get_flag("quiet"));
        self.dispatch(&matches, &ctx)
    }

    /// Parses process arguments, runs the selected command and exits.
    ///
    /// Help and version requests are rendered by `clap` and exit directly;
    /// command failures are reported on stderr with exit code 1.
    pub fn run(&self) -> ! {
        let matches = self.build_parser().get_matches();
        let ctx = ScriptContext::new(matches.get_flag("debug"), matches.get_flag("quiet"));
        match self.dispatch(&matches, &ctx) {
            Ok(()) => std::process::exit(0),
            Err(error) => {
                ctx.error(&format!("{error}"));
                std::process::exit(1);
            }
        }
    }

    fn dispatch(&self, matches: &ArgMatches, ctx: &ScriptContext) -> Result<()> {
        match matches.subcommand() {
            Some((name, sub_matches)) => {
                let command = self
                    .commands
                    .iter()
                    .find(|command| command.name() == name)
                    .ok_or_else(|| Error::Script(format!("unknown command: {name}")))?;
                dispatch_command(command.as_ref(), sub_matches, ctx)
            }
            None => Err(Error::Script("no command selected".to_string())),
        }
    }
}

/// Builds the parser for one command and its nested children.
fn build_command(command: &dyn CliCommand) -> clap::Command {
    let mut parser = clap::Command::new(command.name().to_string());
    if !command.description().is_empty() {
        parser = parser.about(command.description().to_string());
    }
    if let Some(usage) = command.usage() {
        parser = parser.override_usage(usage.to_string());
    }
    if let Some(epilog) = command.epilog() {
        parser = parser.after_help(epilog.to_string());
    }
    parser = command.configure(parser);
    for child in command.subcommands() {
        parser = parser.subcommand(build_command(child.as_ref()));
    }
    parser
}

/// Walks matches down to the deepest selected command and runs it.
fn dispatch_command(
    command: &dyn CliCommand,
    matches: &ArgMatches,
    ctx: &ScriptContext,
) -> Result<()> {
    if let Some((name, sub_matches)) = matches.subcommand() {
        let children = command.subcommands();
        if let Some(child) = children.iter().find(|child| child.name() == name) {
            return dispatch_command(child.as_ref(), sub_matches, ctx);
        }
    }
    command.run(matches, ctx)
}

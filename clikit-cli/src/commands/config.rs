//! Commands to inspect the demo tool configuration.

use std::path::PathBuf;

use clap::{Arg, ArgAction, ArgMatches};
use clikit::command::{CliCommand, ScriptContext};
use clikit::config::Value;
use clikit::encoders::{json_dump, yaml_dump};
use clikit::{Error, Result};

use super::load_config;

/// Parent command for the nested configuration commands.
pub struct ConfigCommand;

impl CliCommand for ConfigCommand {
    fn name(&self) -> &str {
        "config"
    }

    fn description(&self) -> &str {
        "Inspect tool configuration"
    }

    fn subcommands(&self) -> Vec<Box<dyn CliCommand>> {
        vec![Box::new(ShowCommand), Box::new(ValidateCommand)]
    }
}

/// Show the effective configuration after all sources have loaded.
pub struct ShowCommand;

impl CliCommand for ShowCommand {
    fn name(&self) -> &str {
        "show"
    }

    fn description(&self) -> &str {
        "Show the effective configuration"
    }

    fn configure(&self, command: clap::Command) -> clap::Command {
        command
            .arg(
                Arg::new("path")
                    .long("path")
                    .value_name("PATH")
                    .value_parser(clap::value_parser!(PathBuf))
                    .help("Configuration file to load on top of the defaults"),
            )
            .arg(
                Arg::new("format")
                    .long("format")
                    .value_name("FORMAT")
                    .value_parser(["yaml", "json"])
                    .default_value("yaml")
                    .help("Output format"),
            )
    }

    fn run(&self, args: &ArgMatches, ctx: &ScriptContext) -> Result<()> {
        let path = args.get_one::<PathBuf>("path");
        let config = load_config(path.map(PathBuf::as_path))?;
        let data = Value::Mapping(config.as_mapping());

        let rendered = match args.get_one::<String>("format").map(String::as_str) {
            Some("json") => json_dump(&data)?,
            _ => yaml_dump(&data)?,
        };
        ctx.message(rendered.trim_end());
        Ok(())
    }
}

/// Load a configuration file and report whether it is usable.
pub struct ValidateCommand;

impl CliCommand for ValidateCommand {
    fn name(&self) -> &str {
        "validate"
    }

    fn description(&self) -> &str {
        "Validate a configuration file"
    }

    fn configure(&self, command: clap::Command) -> clap::Command {
        command.arg(
            Arg::new("path")
                .value_name("PATH")
                .required(true)
                .action(ArgAction::Set)
                .value_parser(clap::value_parser!(PathBuf))
                .help("Configuration file to validate"),
        )
    }

    fn run(&self, args: &ArgMatches, ctx: &ScriptContext) -> Result<()> {
        let path = args
            .get_one::<PathBuf>("path")
            .ok_or_else(|| Error::Script("missing path argument".to_string()))?;
        if !path.is_file() {
            return Err(Error::FileNotFound { path: path.clone() });
        }
        let config = load_config(Some(path))?;
        ctx.debug(&format!("loaded {} settings", config.as_mapping().len()));
        ctx.message(&format!("{} is valid", path.display()));
        Ok(())
    }
}

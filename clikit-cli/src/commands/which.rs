//! Command to look up executables on PATH.

use clap::{Arg, ArgAction, ArgMatches};
use clikit::command::{CliCommand, ScriptContext};
use clikit::path::Executables;
use clikit::{Error, Result};

/// Print the path an executable runs from.
pub struct WhichCommand;

impl CliCommand for WhichCommand {
    fn name(&self) -> &str {
        "which"
    }

    fn description(&self) -> &str {
        "Look up an executable on PATH"
    }

    fn configure(&self, command: clap::Command) -> clap::Command {
        command
            .arg(
                Arg::new("name")
                    .value_name("NAME")
                    .required(true)
                    .action(ArgAction::Set)
                    .help("Command name to look up"),
            )
            .arg(
                Arg::new("all")
                    .long("all")
                    .action(ArgAction::SetTrue)
                    .help("Print every match on PATH instead of the first"),
            )
    }

    fn run(&self, args: &ArgMatches, ctx: &ScriptContext) -> Result<()> {
        let name = args
            .get_one::<String>("name")
            .ok_or_else(|| Error::Script("missing command name".to_string()))?;
        let executables = Executables::shared();

        if args.get_flag("all") {
            let paths = executables.paths(name);
            if paths.is_empty() {
                return Err(Error::Script(format!("no such command: {name}")));
            }
            for path in paths {
                ctx.message(&path.display().to_string());
            }
            return Ok(());
        }

        match executables.get(name) {
            Some(path) => {
                ctx.message(&path.display().to_string());
                Ok(())
            }
            None => Err(Error::Script(format!("no such command: {name}"))),
        }
    }
}

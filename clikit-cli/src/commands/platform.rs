//! Command to show detected platform information.

use clap::ArgMatches;
use clikit::command::{CliCommand, ScriptContext};
use clikit::platform::{PlatformFamily, ToolchainFamily};
use clikit::Result;

/// Print the platform and toolchain families of the running system.
pub struct PlatformCommand;

impl CliCommand for PlatformCommand {
    fn name(&self) -> &str {
        "platform"
    }

    fn description(&self) -> &str {
        "Show detected platform and toolchain families"
    }

    fn run(&self, _args: &ArgMatches, ctx: &ScriptContext) -> Result<()> {
        let platform = PlatformFamily::detect()?;
        let toolchain = ToolchainFamily::detect()?;
        ctx.message(&format!("platform: {platform}"));
        ctx.message(&format!("toolchain: {toolchain}"));
        Ok(())
    }
}

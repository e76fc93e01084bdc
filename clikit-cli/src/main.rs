//! Main entry point for the clikit-demo CLI.
//!
//! A small demonstration tool built entirely with the clikit command
//! layer. It provides commands for inspecting tool configuration and the
//! running platform:
//! - `config show`: load and print the effective configuration
//! - `config validate`: load a configuration file and report problems
//! - `platform`: print the detected platform and toolchain families
//! - `which`: look up executables on PATH

mod commands;

use clikit::Script;
use commands::{ConfigCommand, PlatformCommand, WhichCommand};

fn main() {
    Script::new("clikit-demo")
        .with_description("Demo CLI for the clikit toolkit")
        .with_command(ConfigCommand)
        .with_command(PlatformCommand)
        .with_command(WhichCommand)
        .run();
}

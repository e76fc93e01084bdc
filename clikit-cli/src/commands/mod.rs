//! Command implementations for the clikit-demo CLI.
//!
//! - `config`: parent for the nested `show` and `validate` commands
//! - `platform`: print detected platform and toolchain families
//! - `which`: look up executables on PATH

pub mod config;
pub mod platform;
pub mod which;

pub use config::ConfigCommand;
pub use platform::PlatformCommand;
pub use which::WhichCommand;

use std::path::Path;

use clikit::config::{ConfigFile, FileFormat, SectionSchema, Value};
use clikit::Result;

/// System-wide default configuration path.
pub const DEFAULT_SYSTEM_PATH: &str = "/etc/clikit-demo.yml";

/// Per-user default configuration path.
pub const DEFAULT_USER_PATH: &str = "~/.config/clikit-demo.yml";

/// The demo tool's configuration schema.
///
/// Settings can be overridden with `CLIKIT_DEMO_*` environment variables.
pub fn demo_schema() -> SectionSchema {
    SectionSchema::new()
        .with_default("region", Value::from("eu"))
        .with_default("log_level", Value::from("normal"))
        .with_integer_setting("port")
        .with_env_prefix("clikit_demo")
        .with_env_var("CLIKIT_DEMO_PORT", "port")
}

/// Loads the demo configuration from default paths plus an optional
/// explicit path.
pub fn load_config(path: Option<&Path>) -> Result<ConfigFile> {
    let mut builder = ConfigFile::builder(FileFormat::Yaml)
        .with_schema(demo_schema())
        .with_default_path(DEFAULT_SYSTEM_PATH)
        .with_default_path(DEFAULT_USER_PATH);
    if let Some(path) = path {
        builder = builder.with_path(path);
    }
    builder.load()
}

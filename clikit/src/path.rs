//! Lookup cache for executables on the user's `PATH`.
//!
//! Scans every directory on `PATH` once and records executable regular
//! files: all of them in search order, plus a first-wins map from command
//! name to the path that would actually run.

use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

static SHARED: OnceLock<Executables> = OnceLock::new();

/// Cache of executable commands found on `PATH`.
///
/// # Examples
///
/// ```
/// use clikit::path::Executables;
///
/// let executables = Executables::shared();
/// if let Some(shell) = executables.get("sh") {
///     println!("sh runs from {}", shell.display());
/// }
/// ```
#[derive(Debug)]
pub struct Executables {
    path: String,
    executables: Vec<PathBuf>,
    commands: HashMap<String, PathBuf>,
}

impl Executables {
    /// Scans the process `PATH` and builds a fresh cache.
    #[must_use]
    pub fn load() -> Self {
        Self::scan(&env::var("PATH").unwrap_or_default())
    }

    /// Returns the process-wide cache, scanning on first use.
    #[must_use]
    pub fn shared() -> &'static Self {
        SHARED.get_or_init(Self::load)
    }

    fn scan(path: &str) -> Self {
        let mut executables = Vec::new();
        let mut commands = HashMap::new();

        for directory in env::split_paths(path) {
            if !directory.is_dir() {
                continue;
            }
            let Ok(entries) = directory.read_dir() else {
                continue;
            };
            let mut files: Vec<PathBuf> = entries
                .filter_map(std::result::Result::ok)
                .map(|entry| entry.path())
                .collect();
            files.sort();
            for file in files {
                if !is_executable(&file) {
                    continue;
                }
                if let Some(name) = file.file_name().and_then(|name| name.to_str()) {
                    commands
                        .entry(name.to_string())
                        .or_insert_with(|| file.clone());
                }
                executables.push(file);
            }
        }

        Self {
            path: path.to_string(),
            executables,
            commands,
        }
    }

    /// The `PATH` value the cache was built from.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The path that runs for a command name, if the command exists.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Path> {
        self.commands.get(name).map(PathBuf::as_path)
    }

    /// Every path providing a command with the given name, in `PATH` order.
    #[must_use]
    pub fn paths(&self, name: &str) -> Vec<&Path> {
        self.executables
            .iter()
            .filter(|path| {
                path.file_name()
                    .and_then(|file_name| file_name.to_str())
                    .is_some_and(|file_name| file_name == name)
            })
            .map(PathBuf::as_path)
            .collect()
    }

    /// True when a command with the given name is on `PATH`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Number of distinct command names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// True when no executables were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Iterates every executable found, in `PATH` search order.
    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.executables.iter().map(PathBuf::as_path)
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|metadata| metadata.is_file() && metadata.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

//! Line-oriented text file readers.
//!
//! Loads a file as a list of lines, skipping blank lines and comments and
//! trimming trailing whitespace.

use std::fs;
use std::ops::Index;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Default comment prefix.
pub const DEFAULT_COMMENT_PREFIXES: &[&str] = &["#"];

/// A text file loaded as a list of content lines.
///
/// # Examples
///
/// ```no_run
/// use clikit::textfile::LineTextFile;
///
/// let hosts = LineTextFile::load("/etc/hosts").unwrap();
/// for line in hosts.iter() {
///     println!("{line}");
/// }
/// ```
#[derive(Debug, Clone)]
pub struct LineTextFile {
    path: PathBuf,
    lines: Vec<String>,
}

impl LineTextFile {
    /// Loads a file skipping `#` comments and blank lines.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileParser`] when the path is not a regular
    /// readable file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_with_prefixes(path, DEFAULT_COMMENT_PREFIXES)
    }

    /// Loads a file with custom comment prefixes.
    ///
    /// # Errors
    ///
    /// See [`LineTextFile::load`].
    pub fn load_with_prefixes(path: impl AsRef<Path>, comment_prefixes: &[&str]) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.is_file() {
            return Err(Error::FileParser {
                path,
                message: "no such file".to_string(),
            });
        }

        let contents = fs::read_to_string(&path).map_err(|error| Error::FileParser {
            path: path.clone(),
            message: error.to_string(),
        })?;

        let lines = contents
            .lines()
            .filter(|line| !skip_line(line, comment_prefixes))
            .map(|line| line.trim_end().to_string())
            .collect();

        Ok(Self { path, lines })
    }

    /// Loads a file and sorts the resulting lines.
    ///
    /// # Errors
    ///
    /// See [`LineTextFile::load`].
    pub fn load_sorted(path: impl AsRef<Path>) -> Result<Self> {
        let mut file = Self::load(path)?;
        file.lines.sort();
        Ok(file)
    }

    /// The path the file was loaded from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The loaded content lines.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of content lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True when no content lines survived loading.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Line by index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    /// Iterates content lines in file order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }
}

impl Index<usize> for LineTextFile {
    type Output = str;

    fn index(&self, index: usize) -> &Self::Output {
        &self.lines[index]
    }
}

impl<'a> IntoIterator for &'a LineTextFile {
    type Item = &'a str;
    type IntoIter = Box<dyn Iterator<Item = &'a str> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

/// Blank lines and lines starting with a comment prefix are skipped.
fn skip_line(line: &str, comment_prefixes: &[&str]) -> bool {
    line.trim().is_empty()
        || comment_prefixes
            .iter()
            .any(|prefix| line.starts_with(prefix))
}

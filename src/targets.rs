//! Target list loading.
//!
//! A target list is plain text: one endpoint identifier per line. Lines are
//! trimmed and blank lines are skipped. There is no comment or quoting
//! syntax. Order and duplicates are kept as written.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One endpoint identifier being monitored.
///
/// Opaque to everything except the prober, which interprets it as a URL.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Target(String);

impl Target {
    /// Creates a target from an already-trimmed identifier.
    #[must_use]
    pub fn new(identifier: impl Into<String>) -> Self {
        Self(identifier.into())
    }

    /// Returns the identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Target {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Error reading the target list.
#[derive(Debug, Error)]
pub enum TargetsError {
    /// The list file could not be read.
    #[error("Failed to read target list '{}': {source}", path.display())]
    Read {
        /// Path to the list
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },
}

/// Parses a target list from its text content.
#[must_use]
pub fn parse_targets(content: &str) -> Vec<Target> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(Target::new)
        .collect()
}

/// Reads and parses the target list at `path`.
///
/// # Errors
///
/// Returns [`TargetsError::Read`] if the file cannot be read.
pub fn load_targets(path: &Path) -> Result<Vec<Target>, TargetsError> {
    let content = std::fs::read_to_string(path).map_err(|source| TargetsError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(parse_targets(&content))
}

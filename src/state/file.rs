//! File-based state persistence implementation.

use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use super::{State, StateError, StateStore, to_pretty_json};

/// File-based implementation of [`StateStore`].
///
/// Stores the state map as a pretty-printed JSON object keyed by target.
///
/// # Bootstrap
///
/// Loading a path that does not exist writes an empty state there first,
/// so the first run starts from a valid file.
///
/// # Atomic Writes
///
/// Uses write-to-temp-then-rename:
/// 1. Write to `{path}.tmp`
/// 2. Rename `{path}.tmp` to `{path}`
///
/// The file is either fully written or left as it was.
#[derive(Debug, Clone)]
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    /// Creates a new file-based state store at the given path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path to the state file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(path: &Path) -> PathBuf {
        // state.json -> state.json.tmp, not state.tmp
        PathBuf::from(format!("{}.tmp", path.display()))
    }

    /// Performs the blocking save operation.
    fn save_blocking(path: &Path, content: &str) -> Result<(), StateError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(StateError::Write)?;
            }
        }

        let temp_path = Self::temp_path(path);
        std::fs::write(&temp_path, content).map_err(StateError::Write)?;

        if let Err(e) = std::fs::rename(&temp_path, path) {
            let _ = std::fs::remove_file(&temp_path);
            return Err(StateError::Write(e));
        }

        Ok(())
    }

    fn read(&self) -> Result<String, io::Error> {
        std::fs::read_to_string(&self.path)
    }
}

impl StateStore for FileStateStore {
    fn load(&self) -> Result<State, StateError> {
        let content = match self.read() {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(
                    "No state file at {}, initializing empty state",
                    self.path.display()
                );
                let empty = to_pretty_json(&State::new()).map_err(StateError::Serialize)?;
                Self::save_blocking(&self.path, &empty).map_err(|e| match e {
                    StateError::Write(source) => StateError::Bootstrap {
                        path: self.path.clone(),
                        source,
                    },
                    other => other,
                })?;
                self.read().map_err(|source| StateError::Read {
                    path: self.path.clone(),
                    source,
                })?
            }
            Err(source) => {
                return Err(StateError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        serde_json::from_str(&content).map_err(|source| StateError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    async fn save(&self, state: &State) -> Result<(), StateError> {
        let content = to_pretty_json(state).map_err(StateError::Serialize)?;
        let path = self.path.clone();

        // Keep blocking file I/O off the async worker
        tokio::task::spawn_blocking(move || Self::save_blocking(&path, &content))
            .await
            .map_err(|e| StateError::Write(io::Error::other(e)))?
    }
}

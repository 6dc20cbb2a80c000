//! Target status persistence between runs.
//!
//! This module owns the [`State`] map (target → last [`Observation`]) and
//! the [`StateStore`] abstraction used to load it once at the start of a
//! run and save it once at the end.

mod file;
mod observation;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

pub use file::FileStateStore;
pub use observation::{Observation, State, to_pretty_json};

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading or saving state.
///
/// All variants are fatal to a run: comparing against missing or stale
/// state would report the wrong changes.
#[derive(Debug, Error)]
pub enum StateError {
    /// The state file exists but could not be read.
    #[error("Failed to read state file '{}': {source}", path.display())]
    Read {
        /// Path to the state file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The state file is not a valid state document.
    #[error("State file '{}' is corrupt: {source}", path.display())]
    Corrupt {
        /// Path to the state file
        path: PathBuf,
        /// Parse error
        #[source]
        source: serde_json::Error,
    },

    /// The empty state for a first run could not be written.
    #[error("Failed to create state file '{}': {source}", path.display())]
    Bootstrap {
        /// Path to the state file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Failed to write the state file.
    #[error("Failed to write state file: {0}")]
    Write(#[source] io::Error),

    /// Failed to serialize state to JSON.
    #[error("Failed to serialize state: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl StateError {
    /// Returns true for errors raised while loading.
    #[must_use]
    pub const fn is_load_error(&self) -> bool {
        matches!(
            self,
            Self::Read { .. } | Self::Corrupt { .. } | Self::Bootstrap { .. }
        )
    }
}

/// Abstraction for persisting target state between program runs.
///
/// Implementations should:
/// - Create an empty state when none exists yet, instead of failing
/// - Report unparsable state as [`StateError::Corrupt`], never discard it
/// - Use atomic writes so a crash mid-save leaves the old state intact
///
/// # Testing
///
/// Use [`mock::MockStateStore`] in tests to avoid filesystem dependencies.
pub trait StateStore: Send + Sync {
    /// Loads previously saved state, bootstrapping an empty one if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the state exists but cannot be read or parsed,
    /// or if the empty bootstrap state cannot be written.
    fn load(&self) -> Result<State, StateError>;

    /// Overwrites the persisted state with `state`.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be serialized or written.
    fn save(
        &self,
        state: &State,
    ) -> impl std::future::Future<Output = Result<(), StateError>> + Send;
}

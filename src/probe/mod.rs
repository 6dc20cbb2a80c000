//! Liveness probing of targets.
//!
//! A probe either reaches the target and returns whatever status code the
//! final response carried, or fails below HTTP. The two cases are modeled
//! as [`ProbeOutcome`] variants so the checker's skip policy is an ordinary
//! `match` arm.

mod http_prober;


pub use http_prober::{DEFAULT_USER_AGENT, HttpProber};

use thiserror::Error;

use crate::targets::Target;
use crate::transport::HttpError;

/// Why a probe produced no status.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The target identifier is not a usable URL.
    #[error("Invalid target '{target}': {reason}")]
    InvalidTarget {
        /// The offending identifier
        target: String,
        /// Parse failure
        reason: String,
    },

    /// The request failed at the transport level.
    #[error(transparent)]
    Http(#[from] HttpError),
}

/// Result of probing one target.
#[derive(Debug)]
pub enum ProbeOutcome {
    /// The target answered with this status code.
    Reached(u16),
    /// No status could be obtained.
    Unreachable(ProbeError),
}

impl ProbeOutcome {
    /// Returns the status code if the target was reached.
    #[cfg(test)]
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Reached(status) => Some(*status),
            Self::Unreachable(_) => None,
        }
    }

    /// Returns true if the target answered.
    #[cfg(test)]
    #[must_use]
    pub const fn is_reached(&self) -> bool {
        matches!(self, Self::Reached(_))
    }
}

impl From<Result<u16, ProbeError>> for ProbeOutcome {
    fn from(result: Result<u16, ProbeError>) -> Self {
        match result {
            Ok(status) => Self::Reached(status),
            Err(e) => Self::Unreachable(e),
        }
    }
}

/// Trait for checking whether a target is reachable.
///
/// Probes never fail the caller: every failure is folded into
/// [`ProbeOutcome::Unreachable`].
pub trait Prober: Send + Sync {
    /// Probes `target` once.
    fn probe(&self, target: &Target) -> impl std::future::Future<Output = ProbeOutcome> + Send;
}

//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

use std::time::Duration;

/// Default path of the target list.
pub const TARGETS_FILE: &str = "data/DomainsToWatch.txt";

/// Default path of the state file.
pub const STATE_FILE: &str = "data/history.json";

/// Default per-probe timeout in seconds.
pub const PROBE_TIMEOUT_SECS: u64 = 30;

/// Default per-probe timeout as Duration.
#[must_use]
pub const fn probe_timeout() -> Duration {
    Duration::from_secs(PROBE_TIMEOUT_SECS)
}

//! Status change detection.
//!
//! The [`StatusChecker`] probes each target, compares the result against
//! the stored [`State`], records the new observation and collects the
//! changed ones into a [`ChangeReport`].
//!
//! # Change rule
//!
//! A status change is `new != previous`, where a target with no stored
//! status compares as "absent". Absent never equals a real status code, so
//! the first successful probe of a target is always a change.
//!
//! # Unreachable targets
//!
//! A probe that fails below HTTP yields no data, so the checker makes no
//! claim: the stored observation (if any) is left exactly as it was and the
//! target is not reported.

mod report;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

pub use report::ChangeReport;

use chrono::NaiveDate;

use crate::probe::{ProbeOutcome, Prober};
use crate::state::{Observation, State, StateError, StateStore};
use crate::targets::Target;
use crate::time::{Clock, SystemClock};

/// Builds the observation for a successful probe of `target`.
///
/// `previous` is the status stored before this probe, `None` if absent.
#[must_use]
pub fn observe(target: &Target, previous: Option<u16>, status: u16, date: NaiveDate) -> Observation {
    let changed = previous != Some(status);
    Observation::new(target.as_str(), Some(status), changed, date)
}

/// Probes targets and diffs them against stored state.
///
/// # Type Parameters
///
/// - `P`: The prober used per target
/// - `C`: The clock stamping observations (defaults to [`SystemClock`])
#[derive(Debug)]
pub struct StatusChecker<P, C = SystemClock> {
    prober: P,
    clock: C,
}

impl<P> StatusChecker<P, SystemClock> {
    /// Creates a checker stamping observations with the local date.
    #[must_use]
    pub const fn new(prober: P) -> Self {
        Self {
            prober,
            clock: SystemClock,
        }
    }
}

impl<P, C> StatusChecker<P, C> {
    /// Replaces the clock.
    #[must_use]
    pub fn with_clock<C2>(self, clock: C2) -> StatusChecker<P, C2> {
        StatusChecker {
            prober: self.prober,
            clock,
        }
    }

    /// Returns the prober.
    #[cfg(test)]
    #[must_use]
    pub const fn prober(&self) -> &P {
        &self.prober
    }
}

impl<P: Prober, C: Clock> StatusChecker<P, C> {
    /// Probes every target in order and returns the updated state together
    /// with the report of changed observations.
    ///
    /// Targets are processed sequentially. A target listed twice is probed
    /// twice; the second probe compares against the first one's result.
    pub async fn check_all(&self, targets: &[Target], mut state: State) -> (State, ChangeReport) {
        let today = self.clock.today();
        let mut report = ChangeReport::new();
        let mut skipped = 0_usize;

        for target in targets {
            let previous = state.status_of(target.as_str());

            let status = match self.prober.probe(target).await {
                ProbeOutcome::Reached(status) => status,
                ProbeOutcome::Unreachable(e) => {
                    tracing::warn!("Skipping {target}: {e}");
                    skipped += 1;
                    continue;
                }
            };

            let observation = observe(target, previous, status, today);
            if observation.changed_since_last_check {
                tracing::info!(
                    "{target}: {} -> {status}",
                    previous.map_or_else(|| "none".to_string(), |s| s.to_string())
                );
                report.push(observation.clone());
            } else {
                tracing::debug!("{target}: {status} (unchanged)");
            }
            state.record(observation);
        }

        tracing::debug!(
            "Checked {} target(s): {} changed, {} skipped",
            targets.len(),
            report.len(),
            skipped
        );

        (state, report)
    }

    /// Runs one full cycle against `store`: load, check every target, save.
    ///
    /// The state is saved exactly once, after all probes, and before the
    /// report is handed to anyone. Nothing is saved if loading fails.
    ///
    /// # Errors
    ///
    /// Returns the [`StateError`] from loading or saving.
    pub async fn run<S: StateStore>(
        &self,
        store: &S,
        targets: &[Target],
    ) -> Result<ChangeReport, StateError> {
        let state = store.load()?;
        tracing::debug!("Loaded {} stored observation(s)", state.len());

        let (state, report) = self.check_all(targets, state).await;

        store.save(&state).await?;
        Ok(report)
    }
}

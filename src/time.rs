//! Time abstraction for testability.
//!
//! This module provides a [`Clock`] trait that allows injecting fixed dates
//! in tests while using the local calendar in production.

use chrono::{Local, NaiveDate};

/// Abstraction over the calendar for testability.
///
/// Observations are stamped with day granularity, so the clock only
/// answers "what day is it".
///
/// # Example
///
/// ```
/// use net_sentinel::time::{Clock, SystemClock};
///
/// let clock = SystemClock;
/// let today = clock.today();
/// assert!(today.to_string().len() == 10);
/// ```
pub trait Clock: Send + Sync {
    /// Returns the current local date.
    fn today(&self) -> NaiveDate;
}

/// Production clock using the local system date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock pinned to a single date.
///
/// Useful for tests and for replaying a run against a known day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

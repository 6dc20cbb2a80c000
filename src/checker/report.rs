//! The per-run change report.

use serde::Serialize;

use crate::state::{Observation, to_pretty_json};

/// Observations whose status changed during this run, in processing order.
///
/// Rebuilt from scratch on every run and never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ChangeReport {
    entries: Vec<Observation>,
}

impl ChangeReport {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a changed observation.
    pub fn push(&mut self, observation: Observation) {
        self.entries.push(observation);
    }

    /// Returns true if nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of changed observations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns the observations in report order.
    #[must_use]
    pub fn entries(&self) -> &[Observation] {
        &self.entries
    }

    /// Iterates over the observations in report order.
    pub fn iter(&self) -> std::slice::Iter<'_, Observation> {
        self.entries.iter()
    }

    /// Renders the report as a JSON array indented with four spaces.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        to_pretty_json(self)
    }
}

impl FromIterator<Observation> for ChangeReport {
    fn from_iter<I: IntoIterator<Item = Observation>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ChangeReport {
    type Item = &'a Observation;
    type IntoIter = std::slice::Iter<'a, Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

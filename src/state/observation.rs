//! Observation and state map types.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The last-known status of one target.
///
/// `name` mirrors the map key so a change report can be serialized on its
/// own and still say which target each entry belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    /// The target identifier.
    #[serde(default)]
    pub name: String,

    /// Status code of the last successful probe, or `None` if the target
    /// has never answered.
    #[serde(default)]
    pub status: Option<u16>,

    /// True exactly when `status` differs from the status stored before
    /// this observation was recorded.
    #[serde(rename = "statusChangedRecently", default)]
    pub changed_since_last_check: bool,

    /// Day the observation was recorded. Omitted when unknown, so a record
    /// read without a date is written back without one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_checked: Option<NaiveDate>,
}

impl Observation {
    /// Creates an observation recorded on `date`.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        status: Option<u16>,
        changed_since_last_check: bool,
        date: NaiveDate,
    ) -> Self {
        Self {
            name: name.into(),
            status,
            changed_since_last_check,
            last_checked: Some(date),
        }
    }
}

/// Mapping from target identifier to its most recent observation.
///
/// Holds at most one observation per target. Entries are sorted by
/// identifier so saved files are stable between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct State {
    entries: BTreeMap<String, Observation>,
}

impl State {
    /// Creates an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a state from raw entries.
    ///
    /// Entries whose `name` is missing take it from their key.
    #[must_use]
    pub fn from_entries(mut entries: BTreeMap<String, Observation>) -> Self {
        for (key, observation) in &mut entries {
            if observation.name.is_empty() {
                observation.name.clone_from(key);
            }
        }
        Self { entries }
    }

    /// Returns the observation recorded for `target`, if any.
    #[must_use]
    pub fn get(&self, target: &str) -> Option<&Observation> {
        self.entries.get(target)
    }

    /// Returns the last known status of `target`.
    ///
    /// `None` both when the target has never been seen and when it was seen
    /// without a status.
    #[must_use]
    pub fn status_of(&self, target: &str) -> Option<u16> {
        self.get(target).and_then(|o| o.status)
    }

    /// Stores `observation` under its own name, replacing any previous one.
    pub fn record(&mut self, observation: Observation) -> Option<Observation> {
        self.entries.insert(observation.name.clone(), observation)
    }

    /// Number of targets with an observation.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no target has been observed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(target, observation)` pairs in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Observation)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<Observation> for State {
    fn from_iter<I: IntoIterator<Item = Observation>>(iter: I) -> Self {
        let mut state = Self::new();
        for observation in iter {
            state.record(observation);
        }
        state
    }
}

impl Serialize for State {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for State {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        BTreeMap::<String, Observation>::deserialize(deserializer).map(Self::from_entries)
    }
}

/// Serializes `value` as JSON indented with four spaces.
///
/// # Errors
///
/// Returns an error if `value` fails to serialize.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;

    // serde_json only ever writes valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

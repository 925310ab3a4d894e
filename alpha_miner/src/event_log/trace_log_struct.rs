use std::{
    borrow::Borrow,
    collections::{BTreeMap, BTreeSet},
    fmt::Display,
};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

///
/// Error when constructing [`Activity`]s, [`Trace`]s or a [`TraceLog`]
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceLogError {
    /// An activity label was empty (or only consisted of whitespace)
    EmptyLabel,
    /// A trace did not contain any activity
    EmptyTrace,
    /// The trace at the given index (0-based) of a log was invalid
    InvalidTrace {
        /// Index of the trace in the log
        index: usize,
        /// Underlying error
        error: Box<TraceLogError>,
    },
}

impl Display for TraceLogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TraceLogError::EmptyLabel => write!(f, "Activity label is empty"),
            TraceLogError::EmptyTrace => write!(f, "Trace contains no activities"),
            TraceLogError::InvalidTrace { index, error } => {
                write!(f, "Invalid trace #{}: {}", index, error)
            }
        }
    }
}

impl std::error::Error for TraceLogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TraceLogError::InvalidTrace { error, .. } => Some(error.as_ref()),
            _ => None,
        }
    }
}

///
/// Activity label
///
/// Activities are compared, ordered and hashed by their label only.
/// Noise or rare-path activities are not distinguished in any way.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Activity(String);

impl Activity {
    /// Create a new [`Activity`] from a (non-blank) label
    pub fn new<S: Into<String>>(label: S) -> Result<Self, TraceLogError> {
        let label = label.into();
        if label.trim().is_empty() {
            return Err(TraceLogError::EmptyLabel);
        }
        Ok(Self(label))
    }

    /// Get the activity label
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Activity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Activity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Activity {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Activity {
    type Error = TraceLogError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        Activity::new(value)
    }
}

impl TryFrom<&str> for Activity {
    type Error = TraceLogError;
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Activity::new(value)
    }
}

impl From<Activity> for String {
    fn from(value: Activity) -> Self {
        value.0
    }
}

///
/// A trace: non-empty, ordered sequence of [`Activity`]s
///
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Vec<Activity>", into = "Vec<Activity>")]
pub struct Trace {
    activities: Vec<Activity>,
}

impl Trace {
    /// Create a new [`Trace`] (fails for an empty activity sequence)
    pub fn new(activities: Vec<Activity>) -> Result<Self, TraceLogError> {
        if activities.is_empty() {
            return Err(TraceLogError::EmptyTrace);
        }
        Ok(Self { activities })
    }

    /// Create a new [`Trace`] from activity labels
    pub fn from_labels<I, S>(labels: I) -> Result<Self, TraceLogError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let activities = labels
            .into_iter()
            .map(Activity::new)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(activities)
    }

    /// Activities of this trace (in order)
    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    /// Number of activities in this trace (always at least 1)
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.activities.len()
    }
}

impl TryFrom<Vec<Activity>> for Trace {
    type Error = TraceLogError;
    fn try_from(value: Vec<Activity>) -> Result<Self, Self::Error> {
        Trace::new(value)
    }
}

impl From<Trace> for Vec<Activity> {
    fn from(value: Trace) -> Self {
        value.activities
    }
}

impl Display for Trace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<{}>", self.activities.iter().join(", "))
    }
}

///
/// A log of [`Trace`]s
///
/// The order of traces and duplicated traces are kept, but have no influence on discovery.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceLog {
    /// Traces of the log
    pub traces: Vec<Trace>,
}

impl TraceLog {
    /// Create a new empty [`TraceLog`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a [`TraceLog`] from already validated [`Trace`]s
    pub fn from_traces(traces: Vec<Trace>) -> Self {
        Self { traces }
    }

    ///
    /// Create a [`TraceLog`] from a sequence of label sequences
    ///
    /// Every label and every trace is validated; the first invalid trace is reported with its index.
    pub fn from_label_sequences<I, T, S>(sequences: I) -> Result<Self, TraceLogError>
    where
        I: IntoIterator<Item = T>,
        T: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let traces = sequences
            .into_iter()
            .enumerate()
            .map(|(index, labels)| {
                Trace::from_labels(labels).map_err(|error| TraceLogError::InvalidTrace {
                    index,
                    error: Box::new(error),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { traces })
    }

    /// Add a trace to the log
    pub fn push(&mut self, trace: Trace) {
        self.traces.push(trace);
    }

    /// Number of traces (including duplicates)
    pub fn len(&self) -> usize {
        self.traces.len()
    }

    /// Whether the log contains no traces
    pub fn is_empty(&self) -> bool {
        self.traces.is_empty()
    }

    /// All activities occurring in the log
    pub fn alphabet(&self) -> BTreeSet<&Activity> {
        self.traces.iter().flat_map(|t| t.activities()).collect()
    }

    ///
    /// Distinct traces (variants) with their frequency
    ///
    /// Sorted by the trace itself, so the result does not depend on the order of traces in the log.
    pub fn variants(&self) -> Vec<(&Trace, u64)> {
        let mut counts: BTreeMap<&Trace, u64> = BTreeMap::new();
        self.traces.iter().for_each(|t| {
            *counts.entry(t).or_insert(0) += 1;
        });
        counts.into_iter().collect()
    }
}

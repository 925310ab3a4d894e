use std::{collections::HashSet, fmt::Display};

use itertools::Itertools;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::event_log::{
    activity_projection::ActivityProjection,
    trace_log_struct::{Activity, TraceLog},
};

///
/// Footprint relation between two distinct activities `a` and `b`
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Relation {
    /// `a -> b`: `b` directly follows `a`, but never the other way around
    Causal,
    /// `a <- b`: `a` directly follows `b`, but never the other way around
    ReverseCausal,
    /// `a || b`: both directions were observed
    Parallel,
    /// `a # b`: the activities never directly follow each other
    Unrelated,
}

impl Relation {
    /// Footprint symbol of this relation
    pub fn symbol(&self) -> &'static str {
        match self {
            Relation::Causal => "->",
            Relation::ReverseCausal => "<-",
            Relation::Parallel => "||",
            Relation::Unrelated => "#",
        }
    }

    /// Relation of the mirrored pair `(b, a)`
    pub fn inverse(self) -> Self {
        match self {
            Relation::Causal => Relation::ReverseCausal,
            Relation::ReverseCausal => Relation::Causal,
            r => r,
        }
    }
}

impl Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

///
/// Collect all directly-follows pairs (as activity indices) of an [`ActivityProjection`]
///
/// Each distinct trace contributes its adjacent pairs; the per-trace sets are merged by set union.
/// With `parallel` set, traces are processed with rayon.
pub fn directly_follows_pairs(
    log_proj: &ActivityProjection,
    parallel: bool,
) -> HashSet<(usize, usize)> {
    if !parallel {
        return log_proj
            .traces
            .iter()
            .flat_map(|(t, _)| t.iter().copied().tuple_windows::<(usize, usize)>())
            .collect();
    }
    log_proj
        .traces
        .par_iter()
        .fold(HashSet::<(usize, usize)>::new, |mut set, (t, _)| {
            set.extend(t.iter().copied().tuple_windows::<(usize, usize)>());
            set
        })
        .reduce(HashSet::new, |mut s1, mut s2| {
            if s1.len() < s2.len() {
                s2.extend(s1);
                s2
            } else {
                s1.extend(s2);
                s1
            }
        })
}

///
/// Footprint matrix of a trace log
///
/// Stores, for every ordered pair of activities (including self-pairs), whether the second activity
/// directly follows the first one in at least one trace.
/// All relations are derived from this directly-follows information only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FootprintMatrix {
    activities: Vec<Activity>,
    /// Row-major `activities.len() x activities.len()` matrix
    directly_follows: Vec<bool>,
}

impl FootprintMatrix {
    /// Build the footprint matrix of an [`ActivityProjection`]
    pub fn from_projection(log_proj: &ActivityProjection, parallel: bool) -> Self {
        let n = log_proj.activities.len();
        let mut directly_follows = vec![false; n * n];
        directly_follows_pairs(log_proj, parallel)
            .into_iter()
            .for_each(|(a, b)| directly_follows[a * n + b] = true);
        Self {
            activities: log_proj.activities.clone(),
            directly_follows,
        }
    }

    /// Build the footprint matrix of a [`TraceLog`]
    pub fn from_trace_log(log: &TraceLog, parallel: bool) -> Self {
        Self::from_projection(&log.into(), parallel)
    }

    /// Activities (sorted); positions are the activity indices used by all other methods
    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    /// Number of activities
    pub fn len(&self) -> usize {
        self.activities.len()
    }

    /// Whether the matrix has no activities
    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    /// Index of an activity label
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.activities
            .binary_search_by(|a| a.as_str().cmp(label))
            .ok()
    }

    /// Whether `b` directly follows `a` in some trace
    pub fn directly_follows(&self, a: usize, b: usize) -> bool {
        self.directly_follows[a * self.activities.len() + b]
    }

    /// Whether `a` directly follows itself in some trace
    pub fn has_self_loop(&self, a: usize) -> bool {
        self.directly_follows(a, a)
    }

    ///
    /// Footprint relation of the ordered pair `(a, b)`
    ///
    /// Returns `None` for self-pairs: those are only tracked through [`FootprintMatrix::has_self_loop`].
    pub fn relation(&self, a: usize, b: usize) -> Option<Relation> {
        if a == b {
            return None;
        }
        Some(
            match (self.directly_follows(a, b), self.directly_follows(b, a)) {
                (true, true) => Relation::Parallel,
                (true, false) => Relation::Causal,
                (false, true) => Relation::ReverseCausal,
                (false, false) => Relation::Unrelated,
            },
        )
    }

    /// Footprint relation of two activities given by their labels
    pub fn relation_by_label(&self, a: &str, b: &str) -> Option<Relation> {
        self.relation(self.index_of(a)?, self.index_of(b)?)
    }

    ///
    /// Render the footprint matrix as a text table
    ///
    /// Self-pairs show `||` for a self-loop and `#` otherwise.
    /// With `abbreviate`, headers use [`abbreviate_activity`].
    pub fn to_table(&self, abbreviate: bool) -> String {
        let names: Vec<String> = self
            .activities
            .iter()
            .map(|a| {
                if abbreviate {
                    abbreviate_activity(a.as_str())
                } else {
                    a.to_string()
                }
            })
            .collect();
        let width = names
            .iter()
            .map(|n| n.chars().count())
            .max()
            .unwrap_or(0)
            .max(2);
        let separator = format!(
            "+{}\n",
            std::iter::repeat(format!("{}+", "-".repeat(width + 2)))
                .take(names.len() + 1)
                .join("")
        );
        let row = |cells: Vec<&str>| -> String {
            format!(
                "|{}\n",
                cells
                    .into_iter()
                    .map(|c| format!(" {:<width$} |", c, width = width))
                    .join("")
            )
        };

        let mut out = separator.clone();
        out.push_str(&row(
            std::iter::once("").chain(names.iter().map(String::as_str)).collect(),
        ));
        out.push_str(&separator);
        for (a, name) in names.iter().enumerate() {
            let cells: Vec<&str> = (0..self.len())
                .map(|b| match self.relation(a, b) {
                    Some(rel) => rel.symbol(),
                    None if self.has_self_loop(a) => Relation::Parallel.symbol(),
                    None => Relation::Unrelated.symbol(),
                })
                .collect();
            out.push_str(&row(
                std::iter::once(name.as_str()).chain(cells).collect(),
            ));
            out.push_str(&separator);
        }
        out
    }
}

///
/// Short label for an activity name
///
/// Camel-case or capitalized words are abbreviated by their initials (e.g., `GetOrder` or `Get Order` to `GO`).
/// Otherwise, the first two characters are used (uppercased).
pub fn abbreviate_activity(activity: &str) -> String {
    let initials: String = activity.chars().filter(|c| c.is_ascii_uppercase()).collect();
    if !initials.is_empty() {
        return initials;
    }
    activity.chars().take(2).collect::<String>().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn footprint(traces: Vec<Vec<&str>>, parallel: bool) -> FootprintMatrix {
        FootprintMatrix::from_trace_log(&TraceLog::from_label_sequences(traces).unwrap(), parallel)
    }

    #[test]
    fn relations_of_simple_log() {
        let fp = footprint(vec![vec!["A", "B", "C"], vec!["A", "C", "B"]], true);
        assert_eq!(fp.relation_by_label("A", "B"), Some(Relation::Causal));
        assert_eq!(fp.relation_by_label("B", "A"), Some(Relation::ReverseCausal));
        assert_eq!(fp.relation_by_label("B", "C"), Some(Relation::Parallel));
        assert_eq!(fp.relation_by_label("C", "B"), Some(Relation::Parallel));
        assert_eq!(fp.relation_by_label("A", "C"), Some(Relation::Causal));
        assert_eq!(fp.relation_by_label("A", "A"), None);
        assert_eq!(fp.relation_by_label("A", "X"), None);
    }

    #[test]
    fn single_activity_traces_have_no_pairs() {
        let fp = footprint(vec![vec!["A"], vec!["B"]], true);
        assert_eq!(fp.len(), 2);
        assert_eq!(fp.relation_by_label("A", "B"), Some(Relation::Unrelated));
        assert!(!fp.has_self_loop(0));
    }

    #[test]
    fn self_loops_are_flagged() {
        let fp = footprint(vec![vec!["A", "A", "B"]], false);
        let a = fp.index_of("A").unwrap();
        let b = fp.index_of("B").unwrap();
        assert!(fp.has_self_loop(a));
        assert!(!fp.has_self_loop(b));
        assert_eq!(fp.relation(a, b), Some(Relation::Causal));
    }

    #[test]
    fn parallel_and_sequential_building_agree() {
        let traces: Vec<Vec<&str>> = vec![
            vec!["a", "b", "c", "d"],
            vec!["a", "c", "b", "d"],
            vec!["a", "e", "d"],
            vec!["a", "e", "e", "d"],
            vec!["x"],
        ];
        assert_eq!(footprint(traces.clone(), true), footprint(traces, false));
    }

    #[test]
    fn relation_inverse_and_symbols() {
        assert_eq!(Relation::Causal.inverse(), Relation::ReverseCausal);
        assert_eq!(Relation::Parallel.inverse(), Relation::Parallel);
        assert_eq!(Relation::Unrelated.to_string(), "#");
    }

    #[test]
    fn abbreviations() {
        assert_eq!(abbreviate_activity("GetOrder"), "GO");
        assert_eq!(abbreviate_activity("Receive Order"), "RO");
        assert_eq!(abbreviate_activity("pay"), "PA");
        assert_eq!(abbreviate_activity("x"), "X");
    }

    #[test]
    fn table_rendering() {
        let fp = footprint(vec![vec!["A", "A", "B"]], true);
        let table = fp.to_table(false);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "+----+----+----+");
        assert_eq!(lines[1], "|    | A  | B  |");
        assert_eq!(lines[3], "| A  | || | -> |");
        assert_eq!(lines[5], "| B  | <- | #  |");
    }
}

use std::{collections::BTreeSet, fmt::Display};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use super::{
    candidate_building::{build_candidates, PlaceCandidate},
    candidate_pruning::prune_candidates,
    relations::AlphaRelations,
};
use crate::event_log::trace_log_struct::Activity;

///
/// Place `(In, Out)` with resolved activity labels
///
/// Ordering is the canonical place order: lexicographic on the sorted input labels, then on the sorted output labels.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AlphaPlace {
    /// Activities producing into the place
    pub input: BTreeSet<Activity>,
    /// Activities consuming from the place
    pub output: BTreeSet<Activity>,
}

impl AlphaPlace {
    /// Resolve an index-based [`PlaceCandidate`]
    pub fn from_candidate(rel: &AlphaRelations, (a, b): &PlaceCandidate) -> Self {
        Self {
            input: rel.acts_to_names(a).cloned().collect(),
            output: rel.acts_to_names(b).cloned().collect(),
        }
    }
}

impl Display for AlphaPlace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({{{}}}, {{{}}})",
            self.input.iter().join(", "),
            self.output.iter().join(", ")
        )
    }
}

fn to_places<'a>(
    rel: &AlphaRelations,
    cnds: impl IntoIterator<Item = &'a PlaceCandidate>,
) -> Vec<AlphaPlace> {
    let mut places: Vec<AlphaPlace> = cnds
        .into_iter()
        .map(|cnd| AlphaPlace::from_candidate(rel, cnd))
        .collect();
    places.sort();
    places
}

/// All valid places (not only maximal ones), in canonical order
pub fn valid_places(rel: &AlphaRelations) -> Vec<AlphaPlace> {
    to_places(rel, &build_candidates(rel))
}

///
/// Synthesize the maximal places of the Alpha algorithm, in canonical order
///
/// No causal pairs result in no places.
pub fn synthesize_places(rel: &AlphaRelations) -> Vec<AlphaPlace> {
    let cnds = build_candidates(rel);
    to_places(rel, &prune_candidates(&cnds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{alpha::footprint::FootprintMatrix, event_log::trace_log_struct::TraceLog};

    fn relations(traces: Vec<Vec<&str>>) -> AlphaRelations {
        let log = TraceLog::from_label_sequences(traces).unwrap();
        AlphaRelations::classify(&FootprintMatrix::from_trace_log(&log, true))
    }

    fn place(input: &[&str], output: &[&str]) -> AlphaPlace {
        AlphaPlace {
            input: input.iter().map(|l| Activity::new(*l).unwrap()).collect(),
            output: output.iter().map(|l| Activity::new(*l).unwrap()).collect(),
        }
    }

    #[test]
    fn concurrent_branches_get_separate_places() {
        let rel = relations(vec![vec!["A", "B", "C"], vec!["A", "C", "B"]]);
        assert_eq!(
            synthesize_places(&rel),
            vec![place(&["A"], &["B"]), place(&["A"], &["C"])]
        );
    }

    #[test]
    fn exclusive_choice_shares_a_place() {
        let rel = relations(vec![vec!["A", "B", "D"], vec!["A", "C", "D"]]);
        assert_eq!(
            synthesize_places(&rel),
            vec![place(&["A"], &["B", "C"]), place(&["B", "C"], &["D"])]
        );
        assert_eq!(valid_places(&rel).len(), 6);
    }

    #[test]
    fn no_places_without_causality() {
        let rel = relations(vec![vec!["A", "B"], vec!["B", "A"]]);
        assert!(synthesize_places(&rel).is_empty());
        assert!(valid_places(&rel).is_empty());
    }

    #[test]
    fn display_place() {
        assert_eq!(place(&["a", "e"], &["b"]).to_string(), "({a, e}, {b})");
    }

    #[test]
    fn canonical_order() {
        let mut places = vec![
            place(&["b"], &["d"]),
            place(&["a"], &["c"]),
            place(&["a"], &["b", "e"]),
        ];
        places.sort();
        assert_eq!(
            places,
            vec![
                place(&["a"], &["b", "e"]),
                place(&["a"], &["c"]),
                place(&["b"], &["d"]),
            ]
        );
    }
}

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::footprint::{FootprintMatrix, Relation};
use crate::event_log::trace_log_struct::Activity;

///
/// Alpha relations derived from a [`FootprintMatrix`]
///
/// Every unordered pair of distinct activities is classified exactly once: as causal (in one direction),
/// parallel or unrelated. Self-loops are kept separately and are not part of any of these relations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlphaRelations {
    activities: Vec<Activity>,
    /// Directly-follows pairs `(a, b)` with `a != b`
    directly_follows: BTreeSet<(usize, usize)>,
    /// Causal pairs `a -> b`
    causal: BTreeSet<(usize, usize)>,
    /// Parallel pairs, stored once as `(a, b)` with `a < b`
    parallel: BTreeSet<(usize, usize)>,
    /// Unrelated pairs, stored once as `(a, b)` with `a < b`
    unrelated: BTreeSet<(usize, usize)>,
    /// Activities directly following themselves
    self_loops: BTreeSet<usize>,
    /// Activities without a causal predecessor
    start_candidates: BTreeSet<usize>,
    /// Activities without a causal successor
    end_candidates: BTreeSet<usize>,
}

impl AlphaRelations {
    /// Classify all pairs of activities of the passed [`FootprintMatrix`]
    pub fn classify(footprint: &FootprintMatrix) -> Self {
        let n = footprint.len();
        let mut ret = Self {
            activities: footprint.activities().to_vec(),
            directly_follows: BTreeSet::new(),
            causal: BTreeSet::new(),
            parallel: BTreeSet::new(),
            unrelated: BTreeSet::new(),
            self_loops: (0..n).filter(|a| footprint.has_self_loop(*a)).collect(),
            start_candidates: BTreeSet::new(),
            end_candidates: BTreeSet::new(),
        };
        for a in 0..n {
            for b in (a + 1)..n {
                if footprint.directly_follows(a, b) {
                    ret.directly_follows.insert((a, b));
                }
                if footprint.directly_follows(b, a) {
                    ret.directly_follows.insert((b, a));
                }
                match footprint.relation(a, b) {
                    Some(Relation::Causal) => {
                        ret.causal.insert((a, b));
                    }
                    Some(Relation::ReverseCausal) => {
                        ret.causal.insert((b, a));
                    }
                    Some(Relation::Parallel) => {
                        ret.parallel.insert((a, b));
                    }
                    Some(Relation::Unrelated) => {
                        ret.unrelated.insert((a, b));
                    }
                    None => {}
                }
            }
        }
        ret.start_candidates = (0..n)
            .filter(|b| !ret.causal.iter().any(|(_, to)| to == b))
            .collect();
        ret.end_candidates = (0..n)
            .filter(|a| !ret.causal.iter().any(|(from, _)| from == a))
            .collect();
        log::info!(
            "Classified {} activities: {} causal, {} parallel, {} unrelated pairs, {} self-loops",
            n,
            ret.causal.len(),
            ret.parallel.len(),
            ret.unrelated.len(),
            ret.self_loops.len()
        );
        ret
    }

    /// Activities (sorted); positions are the activity indices
    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    /// Directly-follows pairs between distinct activities
    pub fn directly_follows_pairs(&self) -> &BTreeSet<(usize, usize)> {
        &self.directly_follows
    }

    /// Causal pairs `(a, b)`, i.e., `a -> b`
    pub fn causal_pairs(&self) -> &BTreeSet<(usize, usize)> {
        &self.causal
    }

    /// Parallel pairs, each stored once with the smaller index first
    pub fn parallel_pairs(&self) -> &BTreeSet<(usize, usize)> {
        &self.parallel
    }

    /// Unrelated pairs, each stored once with the smaller index first
    pub fn unrelated_pairs(&self) -> &BTreeSet<(usize, usize)> {
        &self.unrelated
    }

    /// Activities with a self-loop
    pub fn self_loops(&self) -> &BTreeSet<usize> {
        &self.self_loops
    }

    /// Activities without any causal predecessor
    pub fn start_candidates(&self) -> &BTreeSet<usize> {
        &self.start_candidates
    }

    /// Activities without any causal successor
    pub fn end_candidates(&self) -> &BTreeSet<usize> {
        &self.end_candidates
    }

    /// `a -> b`
    pub fn is_causal(&self, a: usize, b: usize) -> bool {
        self.causal.contains(&(a, b))
    }

    /// `a || b`
    pub fn is_parallel(&self, a: usize, b: usize) -> bool {
        self.parallel.contains(&(a.min(b), a.max(b)))
    }

    /// `a # b` (only for distinct activities)
    pub fn is_unrelated(&self, a: usize, b: usize) -> bool {
        self.unrelated.contains(&(a.min(b), a.max(b)))
    }

    ///
    /// Independence relation used for place synthesis
    ///
    /// Distinct activities are independent iff they are unrelated.
    /// An activity is independent of itself iff it has no self-loop.
    pub fn is_independent(&self, a: usize, b: usize) -> bool {
        if a == b {
            !self.self_loops.contains(&a)
        } else {
            self.is_unrelated(a, b)
        }
    }

    /// Relation of `(a, b)` as recorded by this classification (`None` for `a == b`)
    pub fn relation(&self, a: usize, b: usize) -> Option<Relation> {
        if a == b {
            None
        } else if self.is_causal(a, b) {
            Some(Relation::Causal)
        } else if self.is_causal(b, a) {
            Some(Relation::ReverseCausal)
        } else if self.is_parallel(a, b) {
            Some(Relation::Parallel)
        } else {
            Some(Relation::Unrelated)
        }
    }

    /// Index of an activity label
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.activities
            .binary_search_by(|a| a.as_str().cmp(label))
            .ok()
    }

    /// Resolve activity indices to activities
    pub fn acts_to_names<'a>(
        &'a self,
        acts: impl IntoIterator<Item = &'a usize> + 'a,
    ) -> impl Iterator<Item = &'a Activity> + 'a {
        acts.into_iter().map(move |a| &self.activities[*a])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_log::trace_log_struct::TraceLog;

    fn relations(traces: Vec<Vec<&str>>) -> AlphaRelations {
        let log = TraceLog::from_label_sequences(traces).unwrap();
        AlphaRelations::classify(&FootprintMatrix::from_trace_log(&log, true))
    }

    fn labels<'a>(rel: &'a AlphaRelations, acts: &'a BTreeSet<usize>) -> Vec<&'a str> {
        rel.acts_to_names(acts).map(|a| a.as_str()).collect()
    }

    #[test]
    fn sequence_with_concurrency() {
        let rel = relations(vec![vec!["A", "B", "C"], vec!["A", "C", "B"]]);
        let (a, b, c) = (0, 1, 2);
        assert!(rel.is_causal(a, b));
        assert!(rel.is_causal(a, c));
        assert!(rel.is_parallel(b, c));
        assert!(rel.is_parallel(c, b));
        assert!(!rel.is_independent(b, c));
        assert_eq!(labels(&rel, rel.start_candidates()), vec!["A"]);
        assert_eq!(labels(&rel, rel.end_candidates()), vec!["B", "C"]);
    }

    #[test]
    fn mutual_succession_is_parallel() {
        let rel = relations(vec![vec!["A", "B"], vec!["B", "A"]]);
        assert!(rel.causal_pairs().is_empty());
        assert!(rel.is_parallel(0, 1));
        assert_eq!(labels(&rel, rel.start_candidates()), vec!["A", "B"]);
        assert_eq!(labels(&rel, rel.end_candidates()), vec!["A", "B"]);
    }

    #[test]
    fn self_loop_keeps_causality_but_breaks_self_independence() {
        let rel = relations(vec![vec!["A", "A", "B"]]);
        let a = rel.index_of("A").unwrap();
        let b = rel.index_of("B").unwrap();
        assert!(rel.self_loops().contains(&a));
        assert!(rel.is_causal(a, b));
        assert!(!rel.is_independent(a, a));
        assert!(rel.is_independent(b, b));
        assert_eq!(rel.relation(a, a), None);
        assert!(!rel.directly_follows_pairs().contains(&(a, a)));
    }

    #[test]
    fn classification_is_exhaustive_and_symmetric() {
        let rel = relations(vec![
            vec!["a", "b", "c", "d"],
            vec!["a", "c", "b", "d"],
            vec!["a", "e", "d"],
            vec!["f"],
            vec!["d", "a"],
        ]);
        let n = rel.activities().len();
        for a in 0..n {
            for b in 0..n {
                if a == b {
                    continue;
                }
                let holds = [
                    rel.is_causal(a, b),
                    rel.is_causal(b, a),
                    rel.is_parallel(a, b),
                    rel.is_unrelated(a, b),
                ];
                assert_eq!(holds.iter().filter(|h| **h).count(), 1, "pair ({a}, {b})");
                assert_eq!(rel.is_parallel(a, b), rel.is_parallel(b, a));
                assert_eq!(rel.is_unrelated(a, b), rel.is_unrelated(b, a));
                assert_eq!(
                    rel.relation(a, b).map(Relation::inverse),
                    rel.relation(b, a)
                );
            }
        }
    }

    #[test]
    fn relations_match_footprint() {
        let log = TraceLog::from_label_sequences(vec![
            vec!["a", "b", "c"],
            vec!["c", "a"],
            vec!["b", "b"],
        ])
        .unwrap();
        let fp = FootprintMatrix::from_trace_log(&log, false);
        let rel = AlphaRelations::classify(&fp);
        for a in 0..fp.len() {
            for b in 0..fp.len() {
                assert_eq!(fp.relation(a, b), rel.relation(a, b));
            }
        }
    }
}

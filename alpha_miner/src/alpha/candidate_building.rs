use std::collections::HashSet;

use itertools::Itertools;
use rayon::prelude::*;

use super::relations::AlphaRelations;

/// Place candidate `(A, B)` as sorted, deduplicated activity indices
pub type PlaceCandidate = (Vec<usize>, Vec<usize>);

fn all_causal_between(rel: &AlphaRelations, a: &[usize], b: &[usize]) -> bool {
    a.iter()
        .cartesian_product(b.iter())
        .all(|(a1, b1)| rel.is_causal(*a1, *b1))
}

fn pairwise_independent(rel: &AlphaRelations, acts: &[usize]) -> bool {
    acts.iter()
        .tuple_combinations()
        .all(|(a1, a2)| rel.is_independent(*a1, *a2))
        && acts.iter().all(|a| rel.is_independent(*a, *a))
}

///
/// Check whether `(a, b)` is a valid place candidate
///
/// Both sides are non-empty, every activity of `a` is causally followed by every activity of `b`,
/// and the activities within `a` (respectively `b`) are pairwise independent (including each activity with itself).
pub fn satisfies_cnd_condition(rel: &AlphaRelations, a: &[usize], b: &[usize]) -> bool {
    !a.is_empty()
        && !b.is_empty()
        && all_causal_between(rel, a, b)
        && pairwise_independent(rel, a)
        && pairwise_independent(rel, b)
}

///
/// Build all valid place candidates
///
/// Starts from one candidate `({a}, {b})` per usable causal pair and repeatedly merges newly found candidates
/// with all known candidates until no new valid candidate appears.
/// Since every subset of a valid candidate is valid, this yields all valid candidates.
pub fn build_candidates(rel: &AlphaRelations) -> HashSet<PlaceCandidate> {
    let mut cnds: HashSet<PlaceCandidate> = rel
        .causal_pairs()
        .iter()
        .filter(|(a, b)| satisfies_cnd_condition(rel, &[*a], &[*b]))
        .map(|(a, b)| (vec![*a], vec![*b]))
        .collect();
    log::debug!("Causal seed candidates: {}", cnds.len());

    let mut new_cnds: HashSet<PlaceCandidate> = cnds.clone();
    while !new_cnds.is_empty() {
        let added_cnds: HashSet<PlaceCandidate> = new_cnds
            .par_iter()
            .flat_map(|(a1, b1)| {
                cnds.par_iter()
                    .filter_map(|(a2, b2)| {
                        if !all_causal_between(rel, a1, b2) || !all_causal_between(rel, a2, b1) {
                            return None;
                        }
                        let mut a = [a1.as_slice(), a2.as_slice()].concat();
                        let mut b = [b1.as_slice(), b2.as_slice()].concat();
                        a.sort();
                        a.dedup();
                        b.sort();
                        b.dedup();
                        let cnd = (a, b);
                        if !cnds.contains(&cnd) && satisfies_cnd_condition(rel, &cnd.0, &cnd.1) {
                            Some(cnd)
                        } else {
                            None
                        }
                    })
                    .collect::<HashSet<PlaceCandidate>>()
            })
            .collect();
        cnds.extend(added_cnds.iter().cloned());
        new_cnds = added_cnds;
    }
    log::info!("Built {} valid place candidates", cnds.len());
    cnds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{alpha::footprint::FootprintMatrix, event_log::trace_log_struct::TraceLog};

    fn relations(traces: Vec<Vec<&str>>) -> AlphaRelations {
        let log = TraceLog::from_label_sequences(traces).unwrap();
        AlphaRelations::classify(&FootprintMatrix::from_trace_log(&log, true))
    }

    #[test]
    fn candidates_of_textbook_log() {
        // a=0, b=1, c=2, d=3, e=4
        let rel = relations(vec![
            vec!["a", "b", "c", "d"],
            vec!["a", "c", "b", "d"],
            vec!["a", "e", "d"],
        ]);
        let cnds = build_candidates(&rel);
        let expected: HashSet<PlaceCandidate> = vec![
            (vec![0], vec![1]),
            (vec![0], vec![2]),
            (vec![0], vec![4]),
            (vec![1], vec![3]),
            (vec![2], vec![3]),
            (vec![4], vec![3]),
            (vec![0], vec![1, 4]),
            (vec![0], vec![2, 4]),
            (vec![1, 4], vec![3]),
            (vec![2, 4], vec![3]),
        ]
        .into_iter()
        .collect();
        assert_eq!(cnds, expected);
    }

    #[test]
    fn no_candidates_without_causality() {
        let rel = relations(vec![vec!["A", "B"], vec!["B", "A"]]);
        assert!(build_candidates(&rel).is_empty());
    }

    #[test]
    fn self_loop_activity_is_never_part_of_a_candidate() {
        let rel = relations(vec![vec!["A", "A", "B"], vec!["C", "B"]]);
        let a = rel.index_of("A").unwrap();
        let cnds = build_candidates(&rel);
        assert!(cnds.iter().all(|(x, y)| !x.contains(&a) && !y.contains(&a)));
        let b = rel.index_of("B").unwrap();
        let c = rel.index_of("C").unwrap();
        assert_eq!(cnds, vec![(vec![c], vec![b])].into_iter().collect());
    }

    #[test]
    fn every_candidate_is_valid() {
        let rel = relations(vec![
            vec!["a", "b", "d"],
            vec!["a", "c", "d"],
            vec!["e", "b", "f"],
            vec!["e", "c", "f"],
        ]);
        let cnds = build_candidates(&rel);
        assert!(cnds.contains(&(vec![0, 4], vec![1, 2])));
        for (a, b) in &cnds {
            assert!(satisfies_cnd_condition(&rel, a, b));
        }
    }
}

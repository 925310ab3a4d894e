use std::collections::HashSet;

use rayon::prelude::*;

use super::candidate_building::PlaceCandidate;

fn is_subset(small: &[usize], large: &[usize]) -> bool {
    small.len() <= large.len() && small.iter().all(|e| large.contains(e))
}

///
/// Keep only maximal place candidates
///
/// A candidate `(A, B)` is dropped if another candidate `(A2, B2)` with `A ⊆ A2` and `B ⊆ B2` exists.
/// The result is sorted, so it only depends on the set of passed candidates.
pub fn prune_candidates(cnds: &HashSet<PlaceCandidate>) -> Vec<PlaceCandidate> {
    let mut sel: Vec<PlaceCandidate> = cnds
        .par_iter()
        .filter(|(a, b)| {
            let is_dominated = cnds
                .iter()
                .any(|(a2, b2)| (a != a2 || b != b2) && is_subset(a, a2) && is_subset(b, b2));
            !is_dominated
        })
        .cloned()
        .collect();
    sel.sort();
    log::info!("After maximal: {}", sel.len());
    sel
}

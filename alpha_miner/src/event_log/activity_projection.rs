use std::collections::{BTreeMap, HashMap};

use super::trace_log_struct::{Activity, TraceLog};

#[derive(Debug, Clone)]
/// Projection of a trace log on dense activity indices
///
/// Activities are indexed in their sorted (lexicographic) order and only distinct traces are kept,
/// so two logs with the same set of distinct traces yield the same projection.
pub struct ActivityProjection {
    /// Sorted activities; the position is the activity index
    pub activities: Vec<Activity>,
    /// Reverse lookup from activity to its index
    pub act_to_index: HashMap<Activity, usize>,
    /// Distinct traces (as activity indices) with their frequency, sorted
    pub traces: Vec<(Vec<usize>, u64)>,
}

impl From<&TraceLog> for ActivityProjection {
    fn from(val: &TraceLog) -> Self {
        let activities: Vec<Activity> = val.alphabet().into_iter().cloned().collect();
        let act_to_index: HashMap<Activity, usize> = activities
            .iter()
            .cloned()
            .enumerate()
            .map(|(i, act)| (act, i))
            .collect();
        let mut traces_set: BTreeMap<Vec<usize>, u64> = BTreeMap::new();
        val.variants().into_iter().for_each(|(t, w)| {
            let trace: Vec<usize> = t
                .activities()
                .iter()
                .map(|act| act_to_index[act])
                .collect();
            *traces_set.entry(trace).or_insert(0) += w;
        });

        ActivityProjection {
            activities,
            act_to_index,
            traces: traces_set.into_iter().collect(),
        }
    }
}

impl ActivityProjection {
    /// Index of the activity with the given label (if it occurs in the log)
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.act_to_index.get(label).copied()
    }
}

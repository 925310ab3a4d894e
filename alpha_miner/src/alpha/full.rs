use std::{
    fmt::Display,
    time::{SystemTime, UNIX_EPOCH},
};

use serde::{Deserialize, Serialize};

use crate::{event_log::trace_log_struct::TraceLog, petri_net::petri_net_struct::PetriNet};

use super::{
    candidate_building::build_candidates,
    candidate_pruning::prune_candidates,
    footprint::FootprintMatrix,
    net_assembly::assemble_net,
    place_synthesis::AlphaPlace,
    relations::AlphaRelations,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
/// Duration (in seconds) per parts of the Alpha algorithm (+ total time)
pub struct AlgoDuration {
    /// Duration for building the footprint matrix (in seconds)
    pub footprint: f32,
    /// Duration for classifying relations (in seconds)
    pub relations: f32,
    /// Duration for building place candidates (in seconds)
    pub cnd_building: f32,
    /// Duration for keeping only maximal place candidates (in seconds)
    pub prune_cnd: f32,
    /// Duration for constructing Petri net (in seconds)
    pub build_net: f32,
    /// Total duration (in seconds)
    pub total: f32,
}
impl AlgoDuration {
    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
    /// Deserialize from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Get current system time milliseconds
pub fn get_current_time_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
/// Algorithm parameters for the Alpha algorithm
pub struct AlphaConfig {
    /// Use rayon for building the footprint matrix
    ///
    /// Does not change the result.
    pub parallel: bool,
}
impl Default for AlphaConfig {
    fn default() -> Self {
        Self { parallel: true }
    }
}
impl AlphaConfig {
    /// Serialize Alpha parameters to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
    /// Deserialize Alpha parameters from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Error encountered while running the Alpha algorithm
pub enum AlphaError {
    /// The log does not contain any trace
    EmptyLog,
}
impl Display for AlphaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlphaError::EmptyLog => write!(f, "Cannot discover a model from an empty log"),
        }
    }
}
impl std::error::Error for AlphaError {}

///
/// All artifacts of an Alpha algorithm run
///
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlphaDiscovery {
    /// Directly-follows footprint of the log
    pub footprint: FootprintMatrix,
    /// Relations derived from the footprint
    pub relations: AlphaRelations,
    /// Maximal places (in canonical order)
    pub places: Vec<AlphaPlace>,
    /// Assembled net
    pub net: PetriNet,
    /// Durations per stage
    pub durations: AlgoDuration,
}

///
/// Run the Alpha algorithm, returning all intermediate artifacts
///
/// Also see [`alpha_discover_petri_net`].
pub fn alpha_discover(log: &TraceLog, config: AlphaConfig) -> Result<AlphaDiscovery, AlphaError> {
    alpha_discover_with_timing_fn(log, config, &get_current_time_millis)
}

/// Run Alpha discovery
///
/// Measures [`AlgoDuration`] using the passed `get_time_millis_fn` function
pub fn alpha_discover_with_timing_fn(
    log: &TraceLog,
    config: AlphaConfig,
    get_time_millis_fn: &dyn Fn() -> u128,
) -> Result<AlphaDiscovery, AlphaError> {
    if log.is_empty() {
        return Err(AlphaError::EmptyLog);
    }
    log::info!("Started Alpha Discovery on {} traces", log.len());
    let secs_since = |start: u128| (get_time_millis_fn().saturating_sub(start)) as f32 / 1000.0;
    let mut algo_dur = AlgoDuration::default();
    let total_start = get_time_millis_fn();

    let mut start = get_time_millis_fn();
    let footprint = FootprintMatrix::from_trace_log(log, config.parallel);
    algo_dur.footprint = secs_since(start);
    log::debug!("Building footprint took: {:.4}s", algo_dur.footprint);

    start = get_time_millis_fn();
    let relations = AlphaRelations::classify(&footprint);
    algo_dur.relations = secs_since(start);
    log::debug!("Classifying relations took: {:.4}s", algo_dur.relations);

    start = get_time_millis_fn();
    let cnds = build_candidates(&relations);
    algo_dur.cnd_building = secs_since(start);
    log::debug!("Building candidates took: {:.4}s", algo_dur.cnd_building);

    start = get_time_millis_fn();
    let sel = prune_candidates(&cnds);
    let mut places: Vec<AlphaPlace> = sel
        .iter()
        .map(|cnd| AlphaPlace::from_candidate(&relations, cnd))
        .collect();
    places.sort();
    algo_dur.prune_cnd = secs_since(start);
    log::debug!("Pruning candidates took: {:.4}s", algo_dur.prune_cnd);

    start = get_time_millis_fn();
    let net = assemble_net(&relations, &places);
    let structure = net.check_workflow_structure();
    if !structure.is_connected() {
        log::warn!(
            "Discovered net is not a connected workflow net (not reachable from start: {:?}, cannot reach end: {:?})",
            structure.unreachable_from_start,
            structure.cannot_reach_end
        );
    }
    algo_dur.build_net = secs_since(start);
    log::debug!("Building PN took: {:.4}s", algo_dur.build_net);

    algo_dur.total = secs_since(total_start);
    log::info!(
        "Alpha Discovery finished: {} transitions, {} places in {:.4}s",
        net.transitions.len(),
        net.places.len(),
        algo_dur.total
    );
    Ok(AlphaDiscovery {
        footprint,
        relations,
        places,
        net,
        durations: algo_dur,
    })
}

///
/// Discover a [`PetriNet`] using the Alpha algorithm
///
/// Additionally returns the durations for performance measurements
///
pub fn alpha_discover_petri_net(
    log: &TraceLog,
    config: AlphaConfig,
) -> Result<(PetriNet, AlgoDuration), AlphaError> {
    let res = alpha_discover(log, config)?;
    Ok((res.net, res.durations))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_log_is_an_error() {
        let res = alpha_discover_petri_net(&TraceLog::new(), AlphaConfig::default());
        assert_eq!(res.err(), Some(AlphaError::EmptyLog));
    }

    #[test]
    fn config_json() {
        let config = AlphaConfig::from_json(r#"{"parallel": false}"#).unwrap();
        assert!(!config.parallel);
        assert_eq!(AlphaConfig::from_json("{}").unwrap(), AlphaConfig::default());
        let json = config.to_json().unwrap();
        assert_eq!(AlphaConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn timing_fn_is_used() {
        let log = TraceLog::from_label_sequences(vec![vec!["A", "B"]]).unwrap();
        let res = alpha_discover_with_timing_fn(&log, AlphaConfig::default(), &|| 0_u128).unwrap();
        assert_eq!(res.durations, AlgoDuration::default());
        assert_eq!(res.places.len(), 1);
        assert_eq!(res.net.places.len(), 3);
    }

    #[test]
    fn parallel_and_sequential_agree() {
        let log = TraceLog::from_label_sequences(vec![
            vec!["a", "b", "c", "d"],
            vec!["a", "c", "b", "d"],
            vec!["a", "e", "d"],
        ])
        .unwrap();
        let par = alpha_discover(&log, AlphaConfig { parallel: true }).unwrap();
        let seq = alpha_discover(&log, AlphaConfig { parallel: false }).unwrap();
        assert_eq!(par.footprint, seq.footprint);
        assert_eq!(par.places, seq.places);
        assert_eq!(par.net, seq.net);
    }
}

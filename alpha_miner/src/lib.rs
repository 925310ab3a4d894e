#![warn(
    clippy::doc_markdown,
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs
)]

#![doc = include_str!("../README.md")]

///
/// Trace logs (sequences of activity labels) and their import/export
///
pub mod event_log {
    /// Index-based projection of a [`TraceLog`]
    pub mod activity_projection;
    /// Plain-text trace export
    pub mod export_traces;
    /// Generation of noisy trace logs from a process description
    ///
    /// __Requires the `log-generation` feature to be enabled__
    #[cfg(feature = "log-generation")]
    pub mod generation;
    /// Plain-text trace import
    pub mod import_traces;
    /// [`Activity`], [`Trace`] and [`TraceLog`] structs
    pub mod trace_log_struct;

    pub use trace_log_struct::{Activity, Trace, TraceLog, TraceLogError};
}

///
/// Petri nets
///
pub mod petri_net {
    /// Export [`PetriNet`] to `.pnml`
    pub mod export_pnml;
    #[cfg(feature = "graphviz-export")]
    /// Export [`PetriNet`] to images (SVG, PNG, ...)
    ///
    /// __Requires the `graphviz-export` feature to be enabled__
    ///
    /// Also requires an active graphviz installation in the PATH.
    /// See also <https://github.com/besok/graphviz-rust?tab=readme-ov-file#caveats> and <https://graphviz.org/download/>
    pub mod image_export;
    /// [`PetriNet`] struct
    pub mod petri_net_struct;
    /// Reachability check of the start and end places
    pub mod workflow_check;

    #[doc(inline)]
    pub use petri_net_struct::PetriNet;
}

///
/// Module for the Alpha Process Discovery algorithm
///
pub mod alpha {
    /// Alpha Place Candidate Building
    pub mod candidate_building;
    /// Alpha Place Candidate Pruning (maximality)
    pub mod candidate_pruning;
    /// Footprint matrix (directly-follows relation)
    pub mod footprint;
    /// Full Alpha Discovery algorithm
    pub mod full;
    /// Assembly of the discovered [`crate::PetriNet`]
    pub mod net_assembly;
    /// Maximal places with resolved activity labels
    pub mod place_synthesis;
    /// Causal, parallel and unrelated relations
    pub mod relations;
}

#[doc(inline)]
pub use alpha::full::{alpha_discover, alpha_discover_petri_net, AlphaConfig, AlphaError};

#[doc(inline)]
pub use alpha::footprint::{FootprintMatrix, Relation};

#[doc(inline)]
pub use alpha::relations::AlphaRelations;

#[doc(inline)]
pub use alpha::place_synthesis::AlphaPlace;

#[doc(inline)]
pub use event_log::trace_log_struct::{Activity, Trace, TraceLog};

#[doc(inline)]
pub use event_log::import_traces::{
    import_traces_file, import_traces_slice, import_traces_str, TraceImportOptions,
};

#[doc(inline)]
pub use event_log::export_traces::export_traces_to_file_path;

#[cfg(feature = "log-generation")]
#[doc(inline)]
pub use event_log::generation::{generate_traces, parse_process_description, GenerationConfig};

#[doc(inline)]
pub use petri_net::petri_net_struct::PetriNet;

#[cfg(feature = "graphviz-export")]
#[doc(inline)]
pub use petri_net::image_export::export_petri_net_image_png;

#[cfg(feature = "graphviz-export")]
#[doc(inline)]
pub use petri_net::image_export::export_petri_net_image_svg;

#[doc(inline)]
pub use petri_net::export_pnml::export_petri_net_to_pnml;

///
/// Serialize a [`PetriNet`] as a JSON [`String`]
///
pub fn petrinet_to_json(net: &PetriNet) -> Result<String, serde_json::Error> {
    serde_json::to_string(net)
}
///
/// Deserialize a [`PetriNet`] from a JSON [`String`]
///
pub fn json_to_petrinet(net_json: &str) -> Result<PetriNet, serde_json::Error> {
    serde_json::from_str(net_json)
}

#[cfg(test)]
mod tests;

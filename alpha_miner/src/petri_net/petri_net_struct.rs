use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::event_log::trace_log_struct::Activity;

#[derive(Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Clone, Serialize, Deserialize)]
#[serde(transparent)]
/// Place ID
pub struct PlaceID(pub String);
impl PlaceID {
    /// Get the ID as string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
    /// Node ID that is unique among places and transitions (used for PNML/DOT exports)
    pub fn node_id(&self) -> String {
        format!("place:{}", self.0)
    }
}
impl From<&Place> for PlaceID {
    fn from(value: &Place) -> Self {
        value.id.clone()
    }
}

#[derive(Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Clone, Serialize, Deserialize)]
#[serde(transparent)]
/// Transition ID (the label of the transition's activity)
pub struct TransitionID(pub String);
impl TransitionID {
    /// Get the ID as string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
    /// Node ID that is unique among places and transitions (used for PNML/DOT exports)
    pub fn node_id(&self) -> String {
        format!("transition:{}", self.0)
    }
}
impl From<&Transition> for TransitionID {
    fn from(value: &Transition) -> Self {
        TransitionID(value.label.to_string())
    }
}
impl From<&Activity> for TransitionID {
    fn from(value: &Activity) -> Self {
        TransitionID(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
/// Place in a Petri net
///
/// Besides its ID, a place records the resolved labels of the transitions feeding it (`input`)
/// and of the transitions consuming from it (`output`).
pub struct Place {
    /// Place ID
    pub id: PlaceID,
    /// Activities with an arc into this place
    pub input: BTreeSet<Activity>,
    /// Activities with an arc from this place
    pub output: BTreeSet<Activity>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
/// Transition in a Petri net
pub struct Transition {
    /// Activity of this transition
    pub label: Activity,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", content = "nodes")]
/// Arc type in a Petri net
pub enum ArcType {
    /// From Place to Transition
    PlaceTransition(PlaceID, TransitionID),
    /// From Transition to Place
    TransitionPlace(TransitionID, PlaceID),
}

impl ArcType {
    /// Create new from place to transition
    pub fn place_to_transition(from: PlaceID, to: TransitionID) -> ArcType {
        ArcType::PlaceTransition(from, to)
    }
    /// Create new from transition to place
    pub fn transition_to_place(from: TransitionID, to: PlaceID) -> ArcType {
        ArcType::TransitionPlace(from, to)
    }
    /// Unique node IDs (see [`PlaceID::node_id`]) of source and target node
    pub fn node_ids(&self) -> (String, String) {
        match self {
            ArcType::PlaceTransition(p, t) => (p.node_id(), t.node_id()),
            ArcType::TransitionPlace(t, p) => (t.node_id(), p.node_id()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
/// Arc in a Petri net
///
/// Connecting a transition and a place (or the other way around)
pub struct Arc {
    /// Source and target of Arc
    pub from_to: ArcType,
    /// Weight (i.e., how many tokens this arc moves)
    pub weight: u32,
}

/// Marking of a Petri net: Assigning [`PlaceID`]s to a number of tokens
pub type Marking = BTreeMap<PlaceID, u64>;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
///
/// A Petri net of [`Place`]s and [`Transition`]s
///
/// Bipartite graph of [`Place`]s and [`Transition`]s with [`Arc`]s connecting them, as well as initial and final [`Marking`]s.
/// Places and transitions are kept in ordered maps, so iteration (and thus every export) is deterministic.
pub struct PetriNet {
    /// Places
    pub places: BTreeMap<PlaceID, Place>,
    /// Transitions
    pub transitions: BTreeMap<TransitionID, Transition>,
    /// Arcs
    pub arcs: Vec<Arc>,
    /// Initial marking
    pub initial_marking: Option<Marking>,
    /// Final markings (any of them are accepted as a final marking)
    pub final_markings: Option<Vec<Marking>>,
}

impl Default for PetriNet {
    fn default() -> Self {
        Self::new()
    }
}
impl PetriNet {
    /// Create new [`PetriNet`] with no places or transitions
    pub fn new() -> Self {
        Self {
            places: BTreeMap::new(),
            transitions: BTreeMap::new(),
            arcs: Vec::new(),
            initial_marking: None,
            final_markings: None,
        }
    }
    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Add a place with the given ID and resolved input/output activities
    pub fn add_place<S: Into<String>>(
        &mut self,
        id: S,
        input: BTreeSet<Activity>,
        output: BTreeSet<Activity>,
    ) -> PlaceID {
        let place_id = PlaceID(id.into());
        let place = Place {
            id: place_id.clone(),
            input,
            output,
        };
        self.places.insert(place_id.clone(), place);
        place_id
    }

    /// Add a transition for an activity
    pub fn add_transition(&mut self, label: Activity) -> TransitionID {
        let transition = Transition { label };
        let transition_id: TransitionID = (&transition).into();
        self.transitions.insert(transition_id.clone(), transition);
        transition_id
    }

    /// Add an arc
    pub fn add_arc(&mut self, from_to: ArcType, weight: Option<u32>) {
        self.arcs.push(Arc {
            from_to,
            weight: weight.unwrap_or(1),
        });
    }

    /// Get the preset of a [`PetriNet`] place
    pub fn preset_of_place(&self, p: &PlaceID) -> Vec<&TransitionID> {
        self.arcs
            .iter()
            .filter_map(|x: &Arc| match &x.from_to {
                ArcType::TransitionPlace(from, to) if to == p => Some(from),
                _ => None,
            })
            .collect()
    }

    /// Get the preset of a [`PetriNet`] transition
    pub fn preset_of_transition(&self, t: &TransitionID) -> Vec<&PlaceID> {
        self.arcs
            .iter()
            .filter_map(|x: &Arc| match &x.from_to {
                ArcType::PlaceTransition(from, to) if to == t => Some(from),
                _ => None,
            })
            .collect()
    }

    /// Get postset of [`PetriNet`] place
    pub fn postset_of_place(&self, p: &PlaceID) -> Vec<&TransitionID> {
        self.arcs
            .iter()
            .filter_map(|x: &Arc| match &x.from_to {
                ArcType::PlaceTransition(from, to) if from == p => Some(to),
                _ => None,
            })
            .collect()
    }

    /// Get postset of [`PetriNet`] transition
    pub fn postset_of_transition(&self, t: &TransitionID) -> Vec<&PlaceID> {
        self.arcs
            .iter()
            .filter_map(|x: &Arc| match &x.from_to {
                ArcType::TransitionPlace(from, to) if from == t => Some(to),
                _ => None,
            })
            .collect()
    }

    /// Check if place is in initial marking
    pub fn is_in_initial_marking(&self, p: &PlaceID) -> bool {
        self.initial_marking
            .as_ref()
            .is_some_and(|m| m.contains_key(p))
    }

    /// Check if place is in _any_ final marking
    pub fn is_in_a_final_marking(&self, p: &PlaceID) -> bool {
        self.final_markings
            .as_ref()
            .is_some_and(|ms| ms.iter().any(|m| m.contains_key(p)))
    }

    #[cfg(feature = "graphviz-export")]
    /// Export Petri net as a PNG image
    ///
    /// The PNG file is written to the specified filepath
    ///
    /// _Note_: This is an export method for __visualizing__ the Petri net.
    ///
    /// Only available with the `graphviz-export` feature.
    pub fn export_png<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), std::io::Error> {
        super::image_export::export_petri_net_image_png(self, path)
    }

    #[cfg(feature = "graphviz-export")]
    /// Export Petri net as a SVG image
    ///
    /// The SVG file is written to the specified filepath
    ///
    /// _Note_: This is an export method for __visualizing__ the Petri net.
    ///
    /// Only available with the `graphviz-export` feature.
    pub fn export_svg<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), std::io::Error> {
        super::image_export::export_petri_net_image_svg(self, path)
    }

    /// Export Petri net to a PNML file
    ///
    /// The PNML file is written to the specified filepath
    pub fn export_pnml<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), std::io::Error> {
        super::export_pnml::export_petri_net_to_pnml_path(self, path)
    }
}

#[cfg(test)]
mod tests {
    pub const SAMPLE_JSON_NET: &str = r#"
{
    "places": {
        "start": { "id": "start", "input": [], "output": ["Register"] },
        "p_0": { "id": "p_0", "input": ["Register"], "output": ["Repair"] },
        "end": { "id": "end", "input": ["Repair"], "output": [] }
    },
    "transitions": {
        "Register": { "label": "Register" },
        "Repair": { "label": "Repair" }
    },
    "arcs": [
        { "from_to": { "type": "PlaceTransition", "nodes": ["start", "Register"] }, "weight": 1 },
        { "from_to": { "type": "TransitionPlace", "nodes": ["Register", "p_0"] }, "weight": 1 },
        { "from_to": { "type": "PlaceTransition", "nodes": ["p_0", "Repair"] }, "weight": 1 },
        { "from_to": { "type": "TransitionPlace", "nodes": ["Repair", "end"] }, "weight": 1 }
    ],
    "initial_marking": { "start": 1 },
    "final_markings": [{ "end": 1 }]
}
"#;
    use super::*;

    fn act(label: &str) -> Activity {
        Activity::new(label).unwrap()
    }

    #[test]
    fn petri_nets() {
        let mut net = PetriNet::new();
        let p1 = net.add_place("p1", BTreeSet::new(), BTreeSet::new());
        let t1 = net.add_transition(act("Have fun"));
        let t2 = net.add_transition(act("Sleep"));
        net.add_arc(ArcType::place_to_transition(p1.clone(), t1.clone()), None);
        net.add_arc(ArcType::transition_to_place(t2.clone(), p1.clone()), None);

        assert!(net.postset_of_transition(&t1).is_empty());
        assert!(net.preset_of_transition(&t1) == vec![&p1]);
        assert!(net.postset_of_place(&p1) == vec![&t1]);
        assert!(net.preset_of_place(&p1) == vec![&t2]);
        assert!(net.preset_of_transition(&t2).is_empty());
        let node_ids: Vec<(String, String)> =
            net.arcs.iter().map(|a| a.from_to.node_ids()).collect();
        assert_eq!(
            node_ids,
            vec![
                ("place:p1".to_string(), "transition:Have fun".to_string()),
                ("transition:Sleep".to_string(), "place:p1".to_string()),
            ]
        );
    }

    #[test]
    fn node_ids_separate_places_and_transitions_with_equal_ids() {
        let mut net = PetriNet::new();
        let p = net.add_place("start", BTreeSet::new(), BTreeSet::new());
        let t = net.add_transition(act("start"));
        assert_eq!(p.as_str(), t.as_str());
        let (source, target) = ArcType::place_to_transition(p, t).node_ids();
        assert_ne!(source, target);
    }

    #[test]
    fn deserialize_petri_net_test() {
        let pn = PetriNet::from_json(SAMPLE_JSON_NET).unwrap();
        assert!(pn.places.len() == 3);
        let register = TransitionID("Register".to_string());
        assert_eq!(
            pn.postset_of_transition(&register),
            vec![&PlaceID("p_0".to_string())]
        );
        assert!(pn.is_in_initial_marking(&PlaceID("start".to_string())));
        assert!(pn.is_in_a_final_marking(&PlaceID("end".to_string())));
        assert!(!pn.is_in_a_final_marking(&PlaceID("p_0".to_string())));
        let json = pn.to_json().unwrap();
        assert_eq!(PetriNet::from_json(&json).unwrap(), pn);
    }
}

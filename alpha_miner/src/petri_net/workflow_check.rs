use std::collections::{BTreeSet, HashMap};

use petgraph::{
    graph::NodeIndex,
    visit::{Dfs, Reversed},
    Directed, Graph,
};
use serde::{Deserialize, Serialize};

use super::petri_net_struct::{ArcType, PetriNet, PlaceID};
use crate::event_log::trace_log_struct::Activity;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum NetNode<'a> {
    Place(&'a PlaceID),
    Transition(&'a Activity),
}

///
/// Result of checking the workflow structure of a [`PetriNet`]
///
/// Lists the transitions that are not on any path from the initially marked places
/// or from which no finally marked place can be reached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowStructure {
    /// Activities of transitions not reachable from an initially marked place
    pub unreachable_from_start: Vec<Activity>,
    /// Activities of transitions that cannot reach a finally marked place
    pub cannot_reach_end: Vec<Activity>,
}

impl WorkflowStructure {
    /// `true` if every transition lies on a path from the start to the end
    pub fn is_connected(&self) -> bool {
        self.unreachable_from_start.is_empty() && self.cannot_reach_end.is_empty()
    }
}

impl PetriNet {
    ///
    /// Check that every transition lies on a path from an initially marked place to a finally marked place
    ///
    /// Nets without initial or final marking report every transition accordingly.
    pub fn check_workflow_structure(&self) -> WorkflowStructure {
        let mut graph: Graph<NetNode, (), Directed> = Graph::new();
        let mut place_nodes: HashMap<&PlaceID, NodeIndex> = HashMap::new();
        let mut transition_nodes: HashMap<&str, NodeIndex> = HashMap::new();
        for p_id in self.places.keys() {
            place_nodes.insert(p_id, graph.add_node(NetNode::Place(p_id)));
        }
        for (t_id, t) in &self.transitions {
            transition_nodes.insert(t_id.as_str(), graph.add_node(NetNode::Transition(&t.label)));
        }
        for arc in &self.arcs {
            let (from, to) = match &arc.from_to {
                ArcType::PlaceTransition(p, t) => {
                    (place_nodes.get(p), transition_nodes.get(t.as_str()))
                }
                ArcType::TransitionPlace(t, p) => {
                    (transition_nodes.get(t.as_str()), place_nodes.get(p))
                }
            };
            if let (Some(from), Some(to)) = (from, to) {
                graph.add_edge(*from, *to, ());
            }
        }

        let mut from_start: BTreeSet<NodeIndex> = BTreeSet::new();
        for (p_id, node) in &place_nodes {
            if self.is_in_initial_marking(p_id) {
                let mut dfs = Dfs::new(&graph, *node);
                while let Some(n) = dfs.next(&graph) {
                    from_start.insert(n);
                }
            }
        }
        let mut to_end: BTreeSet<NodeIndex> = BTreeSet::new();
        let reversed = Reversed(&graph);
        for (p_id, node) in &place_nodes {
            if self.is_in_a_final_marking(p_id) {
                let mut dfs = Dfs::new(reversed, *node);
                while let Some(n) = dfs.next(reversed) {
                    to_end.insert(n);
                }
            }
        }

        let mut ret = WorkflowStructure::default();
        for node in transition_nodes.values() {
            if let NetNode::Transition(act) = &graph[*node] {
                if !from_start.contains(node) {
                    ret.unreachable_from_start.push((*act).clone());
                }
                if !to_end.contains(node) {
                    ret.cannot_reach_end.push((*act).clone());
                }
            }
        }
        ret.unreachable_from_start.sort();
        ret.cannot_reach_end.sort();
        ret
    }
}

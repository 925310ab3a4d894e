use std::collections::BTreeSet;

use super::{place_synthesis::AlphaPlace, relations::AlphaRelations};
use crate::{
    event_log::trace_log_struct::Activity,
    petri_net::petri_net_struct::{ArcType, Marking, PetriNet, TransitionID},
};

/// ID of the synthetic start place (holds the initial token)
pub const START_PLACE: &str = "start";
/// ID of the synthetic end place (final marking)
pub const END_PLACE: &str = "end";
/// Prefix of the IDs of synthesized places (`p_0`, `p_1`, ...)
pub const PLACE_PREFIX: &str = "p_";

///
/// Assemble the [`PetriNet`] of the Alpha algorithm
///
/// One transition per activity, a `start` place feeding all start candidates, an `end` place fed by all end candidates,
/// and one place `p_i` per passed place (in the passed order) with arcs from its input and to its output activities.
pub fn assemble_net(rel: &AlphaRelations, places: &[AlphaPlace]) -> PetriNet {
    let mut pn = PetriNet::new();
    let transitions: Vec<TransitionID> = rel
        .activities()
        .iter()
        .map(|act| pn.add_transition(act.clone()))
        .collect();

    let start_acts: BTreeSet<Activity> = rel
        .acts_to_names(rel.start_candidates())
        .cloned()
        .collect();
    let end_acts: BTreeSet<Activity> = rel.acts_to_names(rel.end_candidates()).cloned().collect();

    let start = pn.add_place(START_PLACE, BTreeSet::new(), start_acts);
    rel.start_candidates().iter().for_each(|a| {
        pn.add_arc(
            ArcType::place_to_transition(start.clone(), transitions[*a].clone()),
            None,
        )
    });

    places.iter().enumerate().for_each(|(i, place)| {
        let place_id = pn.add_place(
            format!("{PLACE_PREFIX}{i}"),
            place.input.clone(),
            place.output.clone(),
        );
        place.input.iter().for_each(|in_act| {
            pn.add_arc(
                ArcType::transition_to_place(in_act.into(), place_id.clone()),
                None,
            )
        });
        place.output.iter().for_each(|out_act| {
            pn.add_arc(
                ArcType::place_to_transition(place_id.clone(), out_act.into()),
                None,
            )
        });
    });

    let end = pn.add_place(END_PLACE, end_acts, BTreeSet::new());
    rel.end_candidates().iter().for_each(|a| {
        pn.add_arc(
            ArcType::transition_to_place(transitions[*a].clone(), end.clone()),
            None,
        )
    });

    pn.initial_marking = Some(Marking::from([(start, 1)]));
    pn.final_markings = Some(vec![Marking::from([(end, 1)])]);
    pn
}

use std::{fs::File, io::Write, path::Path};

use graphviz_rust::{
    cmd::Format,
    dot_generator::{attr, edge, graph, id, node, node_id, stmt},
    dot_structures::*,
    printer::{DotPrinter, PrinterContext},
};

use crate::PetriNet;

///
/// Build the DOT [`Graph`] of a [`PetriNet`]
///
/// Places are circles (the initially marked place shows a token, final places are double circles),
/// transitions are boxes labeled with their activity. The graph is laid out left to right.
pub fn export_petri_net_to_dot_graph(net: &PetriNet, dpi_factor: Option<f32>) -> Graph {
    let place_nodes: Vec<_> = net
        .places
        .keys()
        .map(|p_id| {
            let symbol = if net.is_in_initial_marking(p_id) { "●" } else { "" };
            let is_final = net.is_in_a_final_marking(p_id);
            let shape = if is_final { "doublecircle" } else { "circle" };
            let size = if is_final { 0.4 } else { 0.5 };
            let node_name = p_id.node_id();
            let tooltip = p_id.as_str();
            stmt!(node!(esc node_name; attr!("label", esc symbol), attr!("tooltip", esc tooltip), attr!("shape",shape), attr!("fixedsize",true), attr!("width",size), attr!("height",size)))
        })
        .collect();

    let transition_nodes: Vec<_> = net
        .transitions
        .iter()
        .map(|(t_id, t)| {
            let node_name = t_id.node_id();
            let label = t.label.as_str();
            stmt!(node!(esc node_name; attr!("label", esc label), attr!("shape","box"), attr!("fixedsize",false), attr!("height",0.5)))
        })
        .collect();

    let arcs: Vec<_> = net
        .arcs
        .iter()
        .map(|arc| {
            let (from_id, to_id) = arc.from_to.node_ids();
            stmt!(edge!(node_id!(esc from_id) => node_id!(esc to_id)))
        })
        .collect();

    let mut global_graph_options = vec![stmt!(attr!("rankdir", "LR"))];
    if let Some(dpi_fac) = dpi_factor {
        global_graph_options.push(stmt!(attr!("dpi", (dpi_fac * 96.0))))
    }

    graph!(strict di id!("petri_net"), vec![global_graph_options, place_nodes, transition_nodes, arcs].into_iter().flatten().collect())
}

/// Render a [`PetriNet`] as a DOT source string
pub fn petri_net_to_dot(net: &PetriNet) -> String {
    export_petri_net_to_dot_graph(net, None).print(&mut PrinterContext::default())
}

///
/// Export the image of a [`PetriNet`]
///
/// Requires the Graphviz `dot` executable to be available.
/// Also see [`export_petri_net_image_svg`] and [`export_petri_net_image_png`]
///
pub fn export_petri_net_image<P: AsRef<Path>>(
    net: &PetriNet,
    path: P,
    format: Format,
    dpi_factor: Option<f32>,
) -> Result<(), std::io::Error> {
    let g = export_petri_net_to_dot_graph(net, dpi_factor);
    let out = graphviz_rust::exec(g, &mut PrinterContext::default(), vec![format.into()])?;
    let mut f = File::create(path)?;
    f.write_all(&out)?;
    Ok(())
}

///
/// Export the image of a [`PetriNet`] as a SVG file
///
pub fn export_petri_net_image_svg<P: AsRef<Path>>(
    net: &PetriNet,
    path: P,
) -> Result<(), std::io::Error> {
    export_petri_net_image(net, path, Format::Svg, None)
}

///
/// Export the image of a [`PetriNet`] as a PNG file
///
pub fn export_petri_net_image_png<P: AsRef<Path>>(
    net: &PetriNet,
    path: P,
) -> Result<(), std::io::Error> {
    export_petri_net_image(net, path, Format::Png, Some(2.0))
}

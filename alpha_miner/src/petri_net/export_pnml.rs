use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use quick_xml::{events::BytesText, Writer};

use super::petri_net_struct::PetriNet;

fn write_text_element<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    text: &str,
) -> Result<(), std::io::Error> {
    writer.create_element(name).write_inner_content(|writer| {
        writer
            .create_element("text")
            .write_text_content(BytesText::new(text))?;
        Ok(())
    })?;
    Ok(())
}

///
/// Export a [`PetriNet`] to the PNML format and write the result to the provided [`quick_xml::Writer`]
///
/// Node IDs are the unique node IDs of places and transitions (see [`super::petri_net_struct::PlaceID::node_id`]);
/// names are the place IDs and activity labels.
pub fn export_petri_net_to_pnml<W: Write>(
    pn: &PetriNet,
    writer: &mut Writer<W>,
) -> Result<(), std::io::Error> {
    writer
        .create_element("pnml")
        .write_inner_content(|writer| {
            writer
                .create_element("net")
                .with_attributes(vec![
                    ("id", "Alpha Miner PetriNet Export"),
                    (
                        "type",
                        "http://www.pnml.org/version-2009/grammar/pnmlcoremodel",
                    ),
                ])
                .write_inner_content(|writer| {
                    writer
                        .create_element("page")
                        .with_attribute(("id", "n0"))
                        .write_inner_content(|writer| {
                            for (id, place) in &pn.places {
                                writer
                                    .create_element("place")
                                    .with_attribute(("id", id.node_id().as_str()))
                                    .write_inner_content(|writer| {
                                        write_text_element(writer, "name", place.id.as_str())?;
                                        if let Some(tokens) = pn
                                            .initial_marking
                                            .as_ref()
                                            .and_then(|m| m.get(id))
                                        {
                                            write_text_element(
                                                writer,
                                                "initialMarking",
                                                tokens.to_string().as_str(),
                                            )?;
                                        }
                                        Ok(())
                                    })?;
                            }
                            for (id, transition) in &pn.transitions {
                                writer
                                    .create_element("transition")
                                    .with_attribute(("id", id.node_id().as_str()))
                                    .write_inner_content(|writer| {
                                        write_text_element(
                                            writer,
                                            "name",
                                            transition.label.as_str(),
                                        )
                                    })?;
                            }
                            for arc in &pn.arcs {
                                let (source_id, target_id) = arc.from_to.node_ids();
                                writer
                                    .create_element("arc")
                                    .with_attribute((
                                        "id",
                                        format!("{}->{}", source_id, target_id).as_str(),
                                    ))
                                    .with_attribute(("source", source_id.as_str()))
                                    .with_attribute(("target", target_id.as_str()))
                                    .write_inner_content(|writer| {
                                        write_text_element(
                                            writer,
                                            "inscription",
                                            arc.weight.to_string().as_str(),
                                        )
                                    })?;
                            }
                            Ok(())
                        })?;

                    if let Some(final_markings) = &pn.final_markings {
                        writer
                            .create_element("finalmarkings")
                            .write_inner_content(|writer| {
                                for marking in final_markings {
                                    writer.create_element("marking").write_inner_content(
                                        |writer| {
                                            for (place_id, tokens) in marking {
                                                writer
                                                    .create_element("place")
                                                    .with_attribute((
                                                        "idref",
                                                        place_id.node_id().as_str(),
                                                    ))
                                                    .write_inner_content(|writer| {
                                                        writer
                                                            .create_element("text")
                                                            .write_text_content(BytesText::new(
                                                                tokens.to_string().as_str(),
                                                            ))?;
                                                        Ok(())
                                                    })?;
                                            }
                                            Ok(())
                                        },
                                    )?;
                                }
                                Ok(())
                            })?;
                    }
                    Ok(())
                })?;
            Ok(())
        })?;
    Ok(())
}

/// Export a [`PetriNet`] to a `.pnml` file (specified through path)
///
/// Also consider using [`PetriNet::export_pnml`] for convenience or [`export_petri_net_to_pnml`] for more control.
pub fn export_petri_net_to_pnml_path<P: AsRef<Path>>(
    pn: &PetriNet,
    path: P,
) -> Result<(), std::io::Error> {
    let file = File::create(path)?;
    let mut writer = Writer::new_with_indent(BufWriter::new(file), b' ', 4);
    export_petri_net_to_pnml(pn, &mut writer)?;
    writer.into_inner().flush()
}

//! Parsing of the graph input record into a [`StreetGraph`].
//!
//! The record is `{ nodes: [{id, lat, lon, weight}], adjacency_list:
//! { "<id>": [{target, weight, length_m}] } }`. Node ids arrive as JSON
//! numbers or strings depending on the producer; both normalize to the
//! canonical string form here, at the boundary, so nothing downstream ever
//! compares heterogeneously typed ids.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use geo::Point;
use hashbrown::HashMap;
use log::{info, warn};
use serde::{Deserialize, Deserializer};

use crate::{
    Error, NodeId,
    model::{Node, RoadClass, StreetEdge, StreetGraph},
};

#[derive(Debug, Deserialize)]
pub struct GraphInput {
    pub nodes: Vec<RawNode>,
    pub adjacency_list: HashMap<String, Vec<RawEdge>>,
}

#[derive(Debug, Deserialize)]
pub struct RawNode {
    #[serde(deserialize_with = "deserialize_node_id")]
    pub id: NodeId,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub weight: f64,
}

#[derive(Debug, Deserialize)]
pub struct RawEdge {
    #[serde(deserialize_with = "deserialize_node_id")]
    pub target: NodeId,
    pub weight: f64,
    pub length_m: f64,
}

/// Accepts a string or a number and yields the canonical string id.
/// Integral floats collapse to their integer form so `17`, `17.0` and
/// `"17"` all key the same node.
fn deserialize_node_id<'de, D>(deserializer: D) -> Result<NodeId, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IdRepr {
        Int(i64),
        Float(f64),
        Text(String),
    }

    Ok(match IdRepr::deserialize(deserializer)? {
        IdRepr::Int(n) => n.to_string(),
        IdRepr::Float(f) if f.fract() == 0.0 => (f as i64).to_string(),
        IdRepr::Float(f) => f.to_string(),
        IdRepr::Text(s) => s,
    })
}

/// Builds the street graph from a parsed input record.
///
/// Fails softly on partial data: an edge whose endpoint is absent from the
/// node table is dropped and counted, never fatal. Only a structurally
/// empty record is an error, since nothing downstream can proceed.
///
/// # Errors
///
/// Returns [`Error::InvalidData`] when the record carries no nodes.
pub fn build_street_graph(input: GraphInput) -> Result<StreetGraph, Error> {
    if input.nodes.is_empty() {
        return Err(Error::InvalidData(
            "graph record contains no nodes".to_string(),
        ));
    }

    let mut graph = StreetGraph::default();

    for raw in input.nodes {
        graph.insert_node(Node {
            id: raw.id,
            geometry: Point::new(raw.lon, raw.lat),
            static_weight: raw.weight,
        });
    }

    for (source, edges) in input.adjacency_list {
        for raw in edges {
            graph.insert_edge(StreetEdge {
                source: source.clone(),
                target: raw.target,
                length_m: raw.length_m,
                base_weight: raw.weight,
                road_class: RoadClass::default(),
            });
        }
    }

    graph.build_snap_index();

    if graph.dropped_edges() > 0 {
        warn!(
            "Dropped {} edges referencing nodes absent from the node table",
            graph.dropped_edges()
        );
    }
    info!(
        "Street graph loaded: {} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );

    Ok(graph)
}

/// # Errors
///
/// Returns an error when the stream is not a parseable graph record.
pub fn street_graph_from_reader(reader: impl Read) -> Result<StreetGraph, Error> {
    let input: GraphInput = serde_json::from_reader(reader)?;
    build_street_graph(input)
}

/// # Errors
///
/// Returns an error when the file cannot be opened or parsed.
pub fn street_graph_from_path(path: &Path) -> Result<StreetGraph, Error> {
    let file = File::open(path).map_err(|e| {
        std::io::Error::new(
            e.kind(),
            format!("Failed to open graph file '{}': {}", path.display(), e),
        )
    })?;
    street_graph_from_reader(BufReader::new(file))
}

/// # Errors
///
/// Returns an error when the string is not a parseable graph record.
pub fn street_graph_from_str(json: &str) -> Result<StreetGraph, Error> {
    let input: GraphInput = serde_json::from_str(json)?;
    build_street_graph(input)
}

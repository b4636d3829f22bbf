//! This module is responsible for loading external feeds: the graph input
//! record, the road-classification feature collection, and the incident
//! event feed.

pub mod classification;
pub mod graph_input;
pub mod incidents;

pub use classification::enrich_road_classes;
pub use graph_input::{
    GraphInput, build_street_graph, street_graph_from_path, street_graph_from_reader,
    street_graph_from_str,
};
pub use incidents::{IncidentFeed, parse_incident_feed};

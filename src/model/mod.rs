//! Data model for the street-intersection network.

pub mod components;
pub mod network;

pub use components::{Node, RoadClass, StreetEdge};
pub use network::StreetGraph;

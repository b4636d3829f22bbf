//! Risk-weighted path search and route assembly.

pub mod alternatives;
pub mod astar;
pub mod route;
mod to_geojson;

pub use alternatives::{RouteAlternatives, RouteProfile, calculate_routes};
pub use astar::{SearchTree, astar};
pub use route::{DangerLevel, Route, format_distance, reconstruct};

use crate::{model::StreetGraph, overlay::RiskOverlay};

/// Single search plus assembly: the common one-profile entry point.
///
/// `None` carries every "no usable path" case - unknown endpoints, an
/// exhausted frontier, or the expansion cap.
#[must_use]
pub fn find_route(
    graph: &StreetGraph,
    overlay: &RiskOverlay,
    start: &str,
    goal: &str,
    safety_factor: f64,
) -> Option<Route> {
    astar(graph, overlay, start, goal, safety_factor).map(|tree| reconstruct(&tree, graph))
}

// Re-export key components
pub use crate::error::Error;
pub use crate::geodesy::haversine_distance;
pub use crate::loading::{
    enrich_road_classes, parse_incident_feed, street_graph_from_path, street_graph_from_reader,
    street_graph_from_str,
};
pub use crate::model::{Node, RoadClass, StreetEdge, StreetGraph};
pub use crate::overlay::{IncidentCategory, IncidentEvent, RiskOverlay};
pub use crate::regions::{Region, is_near, locate, regions_from_geojson};
pub use crate::routing::{
    DangerLevel, Route, RouteAlternatives, RouteProfile, calculate_routes, find_route,
    format_distance,
};

// Core constants and aliases
pub use crate::NodeId;
pub use crate::{INFLUENCE_RADIUS_M, MAX_EDGE_WEIGHT, MAX_SEARCH_ITERATIONS};

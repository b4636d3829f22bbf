//! Street network components - intersection nodes and street-segment edges

use geo::Point;
use serde::Serialize;

use crate::NodeId;

/// Street graph node (an intersection)
#[derive(Debug, Clone)]
pub struct Node {
    /// Canonical string id of the intersection
    pub id: NodeId,
    /// Node coordinates, x = lon, y = lat
    pub geometry: Point<f64>,
    /// Baseline risk weight attached to the intersection itself
    pub static_weight: f64,
}

/// Directed street graph edge (street segment). A reverse edge is a
/// distinct entity, never implied.
#[derive(Debug, Clone, Serialize)]
pub struct StreetEdge {
    pub source: NodeId,
    pub target: NodeId,
    /// Segment length in meters
    pub length_m: f64,
    /// Baseline risk weight of the segment, before any incident overlay
    pub base_weight: f64,
    /// OSM-derived road classification attached by the enrichment pass
    pub road_class: RoadClass,
}

impl StreetEdge {
    pub fn length_km(&self) -> f64 {
        self.length_m / 1000.0
    }
}

/// Road classification from the enrichment source's `highway_type` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoadClass {
    Primary,
    Secondary,
    Tertiary,
    Residential,
    LivingStreet,
    Pedestrian,
    Footway,
    Path,
    Service,
    /// Sentinel for segments absent from the classification source
    #[default]
    Unclassified,
}

impl RoadClass {
    /// Maps an OSM `highway` tag value, unknown tags fall back to
    /// [`RoadClass::Unclassified`].
    #[must_use]
    pub fn from_highway_tag(tag: &str) -> Self {
        match tag {
            "primary" | "trunk" => Self::Primary,
            "secondary" => Self::Secondary,
            "tertiary" => Self::Tertiary,
            "residential" => Self::Residential,
            "living_street" => Self::LivingStreet,
            "pedestrian" => Self::Pedestrian,
            "footway" | "steps" => Self::Footway,
            "path" => Self::Path,
            "service" => Self::Service,
            _ => Self::Unclassified,
        }
    }
}

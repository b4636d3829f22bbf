//! Route assembly from search state, plus the danger-score contract
//! shared with the renderer.

use geo::Coord;

use crate::{MAX_EDGE_WEIGHT, NodeId, model::StreetEdge, model::StreetGraph};

use super::astar::SearchTree;

/// A concrete computed route. Transient, owned by the caller.
///
/// Invariants: `nodes.len() == edges.len() + 1` and `coordinates` mirrors
/// `nodes` in order, one `(lon, lat)` coordinate per node.
#[derive(Debug, Clone)]
pub struct Route {
    pub nodes: Vec<NodeId>,
    /// Node coordinates in `nodes` order, x = lon, y = lat (the mapping
    /// convention the renderer consumes)
    pub coordinates: Vec<Coord<f64>>,
    /// The edges actually traversed, in travel order
    pub edges: Vec<StreetEdge>,
    pub distance_km: f64,
    /// Sum of *base* edge weights; incident adjustments are a search-time
    /// concern and are not re-applied at reconstruction
    pub total_weight: f64,
    pub avg_weight: f64,
    /// Normalized 0-100 average risk along the route
    pub danger_score: f64,
    pub segment_count: usize,
}

impl Route {
    #[must_use]
    pub fn danger_level(&self) -> DangerLevel {
        DangerLevel::from_score(self.danger_score)
    }
}

/// Walks predecessor links from the goal back to the start and assembles
/// the route. Mutates neither the search tree nor the graph.
#[must_use]
pub fn reconstruct(tree: &SearchTree, graph: &StreetGraph) -> Route {
    let mut nodes = vec![tree.goal.clone()];
    let mut edges: Vec<StreetEdge> = Vec::new();

    let mut current = tree.goal.as_str();
    while let Some((prev, edge)) = tree.predecessors.get(current) {
        nodes.push(prev.clone());
        edges.push(edge.clone());
        current = prev;
    }
    nodes.reverse();
    edges.reverse();

    // Every route node came out of the graph during the search, so each
    // lookup hits; filter_map keeps the walk panic-free regardless.
    let coordinates: Vec<Coord<f64>> = nodes
        .iter()
        .filter_map(|id| graph.node(id).map(|node| node.geometry.into()))
        .collect();

    let distance_m: f64 = edges.iter().map(|e| e.length_m).sum();
    let total_weight: f64 = edges.iter().map(|e| e.base_weight).sum();
    let avg_weight = if edges.is_empty() {
        0.0
    } else {
        total_weight / edges.len() as f64
    };
    let danger_score = (avg_weight / MAX_EDGE_WEIGHT * 100.0).min(100.0);

    Route {
        coordinates,
        distance_km: distance_m / 1000.0,
        total_weight,
        avg_weight,
        danger_score,
        segment_count: edges.len(),
        nodes,
        edges,
    }
}

/// Danger bands shared with the renderer. Both sides threshold the same
/// score the same way; changing a boundary here is a contract change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DangerLevel {
    VerySafe,
    Safe,
    Moderate,
    Risky,
    HighRisk,
}

impl DangerLevel {
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score < 20.0 {
            Self::VerySafe
        } else if score < 40.0 {
            Self::Safe
        } else if score < 60.0 {
            Self::Moderate
        } else if score < 80.0 {
            Self::Risky
        } else {
            Self::HighRisk
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::VerySafe => "Very Safe",
            Self::Safe => "Safe",
            Self::Moderate => "Moderate",
            Self::Risky => "Risky",
            Self::HighRisk => "High Risk",
        }
    }

    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            Self::VerySafe => "#00ff00",
            Self::Safe => "#7fff00",
            Self::Moderate => "#ffaa00",
            Self::Risky => "#ff6600",
            Self::HighRisk => "#ff0000",
        }
    }
}

/// Display helper for the renderer: meters below 1 km, two-decimal
/// kilometers above.
#[must_use]
pub fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{}m", meters.round() as i64)
    } else {
        format!("{:.2}km", meters / 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn danger_bands_threshold_as_documented() {
        assert_eq!(DangerLevel::from_score(0.0), DangerLevel::VerySafe);
        assert_eq!(DangerLevel::from_score(19.99), DangerLevel::VerySafe);
        assert_eq!(DangerLevel::from_score(20.0), DangerLevel::Safe);
        assert_eq!(DangerLevel::from_score(59.99), DangerLevel::Moderate);
        assert_eq!(DangerLevel::from_score(80.0), DangerLevel::HighRisk);
        assert_eq!(DangerLevel::from_score(100.0), DangerLevel::HighRisk);
    }

    #[test]
    fn distance_formatting() {
        assert_eq!(format_distance(850.4), "850m");
        assert_eq!(format_distance(999.4), "999m");
        assert_eq!(format_distance(1250.0), "1.25km");
    }
}

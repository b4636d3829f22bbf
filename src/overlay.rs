//! Mutable risk overlay: active incident events and their effect on edge
//! weights.
//!
//! The overlay is an explicit instance handed to the search by reference;
//! nothing in the crate reaches for ambient global state. Mutators take
//! `&mut self`, searches read through `&self`, so exclusive access is
//! enforced by the borrow checker.

use chrono::{DateTime, Utc};
use geo::Point;
use hashbrown::HashMap;
use serde::Deserialize;

use crate::{
    INFLUENCE_RADIUS_M, MAX_EDGE_WEIGHT, RISK_AMPLIFICATION,
    geodesy::haversine_distance,
    model::{Node, StreetEdge},
    regions::{Region, is_near},
};

/// Incident category from the feed's `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentCategory {
    Shooting,
    Robbery,
    Assault,
    BreakAndEnter,
    AutoTheft,
    #[serde(other)]
    Other,
}

/// A reported incident. Immutable once created; its effect on edge costs
/// is recomputed on every search, never baked into the graph.
#[derive(Debug, Clone)]
pub struct IncidentEvent {
    /// Incident location, x = lon, y = lat
    pub geometry: Point<f64>,
    pub category: IncidentCategory,
    /// Severity in percent, clamped into 0..=100 at construction
    pub impact_percent: f64,
    /// Human-readable location ("King St W & Spadina Ave")
    pub location: String,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

impl IncidentEvent {
    #[must_use]
    pub fn new(
        lat: f64,
        lon: f64,
        category: IncidentCategory,
        impact_percent: f64,
        location: String,
        description: String,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            geometry: Point::new(lon, lat),
            category,
            impact_percent: impact_percent.clamp(0.0, 100.0),
            location,
            description,
            timestamp,
        }
    }
}

/// The active incident set plus the per-area cumulative modifiers derived
/// from it. Append/clear-only; events are never mutated in place.
#[derive(Debug, Clone, Default)]
pub struct RiskOverlay {
    events: Vec<IncidentEvent>,
    area_modifiers: HashMap<String, f64>,
}

impl RiskOverlay {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event and credits its impact to every region whose
    /// boundary lies within [`crate::AREA_IMPACT_RADIUS_M`] of it.
    pub fn add_event(&mut self, event: IncidentEvent, regions: &[Region]) {
        for region in regions {
            if is_near(event.geometry, region, crate::AREA_IMPACT_RADIUS_M) {
                *self.area_modifiers.entry(region.name.clone()).or_insert(0.0) +=
                    event.impact_percent;
            }
        }
        self.events.push(event);
    }

    pub fn extend_events(
        &mut self,
        events: impl IntoIterator<Item = IncidentEvent>,
        regions: &[Region],
    ) {
        for event in events {
            self.add_event(event, regions);
        }
    }

    /// Drops every active event and the derived area modifiers.
    pub fn clear(&mut self) {
        self.events.clear();
        self.area_modifiers.clear();
    }

    #[must_use]
    pub fn events(&self) -> &[IncidentEvent] {
        &self.events
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Cumulative percentage modifier for an administrative area, 0 when
    /// no nearby incident credited it.
    #[must_use]
    pub fn area_modifier(&self, area: &str) -> f64 {
        self.area_modifiers.get(area).copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn area_modifiers(&self) -> &HashMap<String, f64> {
        &self.area_modifiers
    }

    /// Risk-adjusted weight of an edge under the current event set.
    ///
    /// Only the single worst event within [`INFLUENCE_RADIUS_M`]
    /// (inclusive) of the edge midpoint matters; effects are not additive
    /// across events. Adding an event can only raise the result, and the
    /// result never exceeds [`MAX_EDGE_WEIGHT`]. Pure given the current
    /// event set; no caching, every call re-scans the active events.
    #[must_use]
    pub fn adjusted_weight(&self, edge: &StreetEdge, source: &Node, target: &Node) -> f64 {
        if self.events.is_empty() {
            return edge.base_weight;
        }

        // Midpoint as the arithmetic mean of the endpoint coordinates.
        let midpoint = Point::new(
            (source.geometry.x() + target.geometry.x()) / 2.0,
            (source.geometry.y() + target.geometry.y()) / 2.0,
        );

        let mut max_impact: f64 = 0.0;
        for event in &self.events {
            if haversine_distance(midpoint, event.geometry) <= INFLUENCE_RADIUS_M {
                max_impact = max_impact.max(event.impact_percent / 100.0);
            }
        }

        if max_impact > 0.0 {
            (edge.base_weight * (1.0 + max_impact * RISK_AMPLIFICATION)).min(MAX_EDGE_WEIGHT)
        } else {
            edge.base_weight
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RoadClass;
    use crate::{EARTH_RADIUS_M, NodeId};

    fn node(id: &str, lat: f64, lon: f64) -> Node {
        Node {
            id: NodeId::from(id),
            geometry: Point::new(lon, lat),
            static_weight: 1.0,
        }
    }

    fn edge(base_weight: f64) -> StreetEdge {
        StreetEdge {
            source: "a".to_string(),
            target: "b".to_string(),
            length_m: 500.0,
            base_weight,
            road_class: RoadClass::Unclassified,
        }
    }

    fn event_at(lat: f64, lon: f64, impact: f64) -> IncidentEvent {
        IncidentEvent::new(
            lat,
            lon,
            IncidentCategory::Robbery,
            impact,
            String::new(),
            String::new(),
            Utc::now(),
        )
    }

    /// Longitude offset (degrees, at the equator) spanning `meters`.
    fn lon_for_meters(meters: f64) -> f64 {
        (meters / EARTH_RADIUS_M).to_degrees()
    }

    #[test]
    fn no_events_returns_base_weight() {
        let overlay = RiskOverlay::new();
        let (a, b) = (node("a", 0.0, 0.0), node("b", 0.0, lon_for_meters(500.0)));
        assert_eq!(overlay.adjusted_weight(&edge(10.0), &a, &b), 10.0);
    }

    #[test]
    fn nearby_event_inflates_by_worst_impact() {
        let mut overlay = RiskOverlay::new();
        let (a, b) = (node("a", 0.0, 0.0), node("b", 0.0, lon_for_meters(500.0)));
        // Both events sit on the midpoint; only the worst one counts.
        overlay.add_event(event_at(0.0, lon_for_meters(250.0), 20.0), &[]);
        overlay.add_event(event_at(0.0, lon_for_meters(250.0), 50.0), &[]);

        // 10 * (1 + 0.5 * 10) = 60, not 10 * (1 + 0.7 * 10).
        let adjusted = overlay.adjusted_weight(&edge(10.0), &a, &b);
        assert!((adjusted - 60.0).abs() < 1e-9, "got {adjusted}");
    }

    #[test]
    fn influence_radius_is_inclusive_at_100_meters() {
        let (a, b) = (node("a", 0.0, 0.0), node("b", 0.0, lon_for_meters(500.0)));
        let midpoint = Point::new(lon_for_meters(250.0), 0.0);

        // Just inside and just outside the radius; verify the actual
        // haversine distances straddle the 100 m boundary.
        let inside = event_at(0.0, lon_for_meters(250.0) + lon_for_meters(99.999), 50.0);
        let outside = event_at(0.0, lon_for_meters(250.0) + lon_for_meters(100.001), 50.0);
        assert!(haversine_distance(midpoint, inside.geometry) <= 100.0);
        assert!(haversine_distance(midpoint, outside.geometry) > 100.0);

        let mut overlay = RiskOverlay::new();
        overlay.add_event(inside, &[]);
        assert!((overlay.adjusted_weight(&edge(10.0), &a, &b) - 60.0).abs() < 1e-9);

        overlay.clear();
        overlay.add_event(outside, &[]);
        assert_eq!(overlay.adjusted_weight(&edge(10.0), &a, &b), 10.0);
    }

    #[test]
    fn event_exactly_on_the_radius_still_counts() {
        let (a, b) = (node("a", 0.0, 0.0), node("b", 0.0, lon_for_meters(500.0)));
        let midpoint = Point::new(lon_for_meters(250.0), 0.0);

        // Land the event exactly on the inclusive boundary: walk the
        // longitude offset down ulp by ulp until the computed distance is
        // no longer past the radius.
        let mut offset = lon_for_meters(INFLUENCE_RADIUS_M);
        let event_point = |offset: f64| Point::new(midpoint.x() + offset, 0.0);
        while haversine_distance(midpoint, event_point(offset)) > INFLUENCE_RADIUS_M {
            offset = offset.next_down();
        }

        let distance = haversine_distance(midpoint, event_point(offset));
        assert!((distance - INFLUENCE_RADIUS_M).abs() < 1e-6, "got {distance}");
        assert!(distance <= INFLUENCE_RADIUS_M);

        let mut overlay = RiskOverlay::new();
        overlay.add_event(event_at(0.0, event_point(offset).x(), 50.0), &[]);
        let adjusted = overlay.adjusted_weight(&edge(10.0), &a, &b);
        assert!((adjusted - 60.0).abs() < 1e-9, "got {adjusted}");
    }

    #[test]
    fn adjusted_weight_is_capped() {
        let mut overlay = RiskOverlay::new();
        let (a, b) = (node("a", 0.0, 0.0), node("b", 0.0, lon_for_meters(500.0)));
        overlay.add_event(event_at(0.0, lon_for_meters(250.0), 100.0), &[]);

        // 10 * (1 + 1.0 * 10) = 110 -> capped at 84.
        assert_eq!(
            overlay.adjusted_weight(&edge(10.0), &a, &b),
            crate::MAX_EDGE_WEIGHT
        );
    }

    #[test]
    fn adding_events_never_decreases_weight() {
        let mut overlay = RiskOverlay::new();
        let (a, b) = (node("a", 0.0, 0.0), node("b", 0.0, lon_for_meters(500.0)));
        let e = edge(10.0);

        let mut last = overlay.adjusted_weight(&e, &a, &b);
        for impact in [5.0, 15.0, 40.0, 90.0, 100.0] {
            overlay.add_event(event_at(0.0, lon_for_meters(250.0), impact), &[]);
            let now = overlay.adjusted_weight(&e, &a, &b);
            assert!(now >= last);
            assert!(now <= crate::MAX_EDGE_WEIGHT);
            last = now;
        }
    }

    #[test]
    fn clear_resets_events_and_modifiers() {
        let mut overlay = RiskOverlay::new();
        overlay.add_event(event_at(0.0, 0.0, 50.0), &[]);
        assert!(!overlay.is_empty());

        overlay.clear();
        assert!(overlay.is_empty());
        assert!(overlay.area_modifiers().is_empty());
    }

    #[test]
    fn impact_is_clamped_at_construction() {
        let over = event_at(0.0, 0.0, 250.0);
        let under = event_at(0.0, 0.0, -10.0);
        assert_eq!(over.impact_percent, 100.0);
        assert_eq!(under.impact_percent, 0.0);
    }
}

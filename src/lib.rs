//! Safety-weighted street routing core.
//!
//! Computes risk-adjusted shortest paths over a fixed street-intersection
//! graph. Edge traversal cost blends physical distance with a mutable risk
//! overlay fed by reported incident events; a weighted A* search trades the
//! two off through a single safety factor.
//!
//! Rendering, animation and any serving surface live outside this crate:
//! it consumes the graph record, the road-classification feature collection
//! and the incident feed, and produces [`Route`](routing::Route) values plus
//! GeoJSON for the renderer.

pub mod error;
pub mod geodesy;
pub mod loading;
pub mod model;
pub mod overlay;
pub mod prelude;
pub mod regions;
pub mod routing;

pub use error::Error;

/// Canonical node identifier. Node ids arrive from the graph feed as either
/// JSON numbers or strings; everything past the loading boundary compares
/// them in this one string form.
pub type NodeId = String;

/// Earth radius used by the haversine distance, in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Incident events within this distance of an edge midpoint (inclusive)
/// affect that edge's adjusted weight.
pub const INFLUENCE_RADIUS_M: f64 = 100.0;

/// Upper bound on any edge weight, adjusted or base. Also the normalizer
/// for the 0-100 danger score.
pub const MAX_EDGE_WEIGHT: f64 = 84.0;

/// Multiplier applied to an incident's impact fraction when inflating an
/// edge's base weight: `base * (1 + impact * RISK_AMPLIFICATION)`.
pub const RISK_AMPLIFICATION: f64 = 10.0;

/// Hard cap on A* expansions. Hitting it is reported as "no route", the
/// same as an exhausted frontier.
pub const MAX_SEARCH_ITERATIONS: usize = 50_000;

/// An incident within this distance of any boundary vertex of a region
/// contributes to that region's cumulative area modifier.
pub const AREA_IMPACT_RADIUS_M: f64 = 500.0;

/// Minimum number of R-tree candidates `nearest_node` refines by haversine
/// distance before its planar lower bound is allowed to stop the walk.
pub const NEAREST_CANDIDATES: usize = 8;

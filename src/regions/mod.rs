//! Administrative areas and point-in-region tests.
//!
//! Regions are loaded from a boundary feature collection and queried two
//! ways: [`locate`] labels a coordinate with the area it falls in, and
//! [`is_near`] answers whether a point sits close enough to an area's
//! boundary for an incident there to affect it.

use geo::{Coord, LineString, Point};
use geojson::FeatureCollection;
use itertools::Itertools;
use log::{info, warn};

use crate::geodesy::haversine_distance;

/// An administrative area: a name plus its boundary rings. Multi-polygon
/// areas keep every ring of every polygon.
#[derive(Debug, Clone)]
pub struct Region {
    pub name: String,
    pub rings: Vec<LineString<f64>>,
}

/// Loads regions from a boundary feature collection, in feature order.
/// The area name comes from `properties.AREA_NAME`, falling back to
/// `properties.name`; features without either, or without polygonal
/// geometry, are skipped with a diagnostic.
#[must_use]
pub fn regions_from_geojson(collection: &FeatureCollection) -> Vec<Region> {
    let mut regions = Vec::new();

    for feature in &collection.features {
        let name = feature
            .properties
            .as_ref()
            .and_then(|props| {
                props
                    .get("AREA_NAME")
                    .or_else(|| props.get("name"))
                    .and_then(|v| v.as_str())
            })
            .map(str::to_string);

        let Some(name) = name else {
            warn!("Skipping boundary feature without an area name");
            continue;
        };

        let geometry = feature
            .geometry
            .as_ref()
            .and_then(|g| geo::Geometry::<f64>::try_from(g).ok());

        let rings = match geometry {
            Some(geo::Geometry::Polygon(polygon)) => polygon_rings(&polygon),
            Some(geo::Geometry::MultiPolygon(multi)) => {
                multi.iter().flat_map(polygon_rings).collect()
            }
            _ => {
                warn!("Skipping non-polygonal boundary for area '{name}'");
                continue;
            }
        };

        regions.push(Region { name, rings });
    }

    info!("Loaded {} region boundaries", regions.len());
    regions
}

fn polygon_rings(polygon: &geo::Polygon<f64>) -> Vec<LineString<f64>> {
    std::iter::once(polygon.exterior().clone())
        .chain(polygon.interiors().iter().cloned())
        .collect()
}

/// Labels a coordinate with the first region containing it, in fixed
/// region order. `None` renders as "Unknown" downstream.
///
/// A point counts as inside a region when *any* of its rings contains it
/// (ray casting). Interior rings are deliberately not treated as holes;
/// the boundary contract is "any ring contains".
#[must_use]
pub fn locate<'a>(regions: &'a [Region], lat: f64, lon: f64) -> Option<&'a str> {
    let point = Coord { x: lon, y: lat };
    regions
        .iter()
        .find(|region| region.rings.iter().any(|ring| ring_contains(ring, point)))
        .map(|region| region.name.as_str())
}

/// Whether the point lies within `max_distance_m` of any boundary vertex
/// of the region. Used to decide which areas an incident event affects.
#[must_use]
pub fn is_near(point: Point<f64>, region: &Region, max_distance_m: f64) -> bool {
    region.rings.iter().any(|ring| {
        ring.coords()
            .any(|c| haversine_distance(point, Point::from(*c)) <= max_distance_m)
    })
}

/// Ray cast from the point along +x, counting ring-segment crossings.
/// Rings arrive closed (first vertex repeated last), so consecutive vertex
/// pairs cover every segment.
fn ring_contains(ring: &LineString<f64>, point: Coord<f64>) -> bool {
    let mut inside = false;

    for (a, b) in ring.coords().tuple_windows() {
        let crosses = (a.y > point.y) != (b.y > point.y)
            && point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x;
        if crosses {
            inside = !inside;
        }
    }

    inside
}

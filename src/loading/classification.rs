//! Road-class enrichment from a secondary classification source.
//!
//! The source is a GeoJSON feature collection where each feature carries
//! `properties.source`, `properties.target` and `properties.highway_type`.
//! The lookup key is the literal `"<source>-><target>"` concatenation.

use geojson::FeatureCollection;
use hashbrown::HashMap;
use log::info;
use serde_json::Value as JsonValue;

use crate::model::{RoadClass, StreetGraph};

/// Renders a property value the way the id normalizer would: numbers and
/// strings both become the canonical string form.
fn property_string(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Builds the `"<source>-><target>"` -> class index from the feature
/// collection. Features missing any of the three properties are skipped.
#[must_use]
pub fn classification_index(collection: &FeatureCollection) -> HashMap<String, RoadClass> {
    let mut index = HashMap::new();

    for feature in &collection.features {
        let Some(properties) = &feature.properties else {
            continue;
        };
        let source = properties.get("source").and_then(property_string);
        let target = properties.get("target").and_then(property_string);
        let highway = properties
            .get("highway_type")
            .and_then(|v| v.as_str().map(str::to_string));

        if let (Some(source), Some(target), Some(highway)) = (source, target, highway) {
            index.insert(
                format!("{source}->{target}"),
                RoadClass::from_highway_tag(&highway),
            );
        }
    }

    index
}

/// Attaches a road class to every adjacency entry, defaulting to
/// [`RoadClass::Unclassified`] when the `(source, target)` pair is absent
/// from the classification source. The only mutation the graph sees after
/// load.
pub fn enrich_road_classes(graph: &mut StreetGraph, collection: &FeatureCollection) {
    let index = classification_index(collection);
    let mut matched = 0usize;
    let mut total = 0usize;

    for (_, edges) in graph.adjacency_mut() {
        for edge in edges.iter_mut() {
            total += 1;
            let key = format!("{}->{}", edge.source, edge.target);
            edge.road_class = match index.get(&key) {
                Some(class) => {
                    matched += 1;
                    *class
                }
                None => RoadClass::Unclassified,
            };
        }
    }

    info!("Road classes attached: {matched} of {total} edges matched");
}

//! `GeoJSON` export of computed routes for the renderer.

use geo::LineString;
use geojson::{Feature, FeatureCollection, Geometry};
use serde_json::json;

use crate::Error;

use super::{
    alternatives::{RouteAlternatives, RouteProfile},
    route::Route,
};

impl Route {
    /// Converts the route to a `GeoJSON` Feature styled for a profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the assembled feature is rejected by the
    /// `GeoJSON` parser, which indicates a malformed route.
    pub fn to_feature(&self, profile: RouteProfile) -> Result<Feature, Error> {
        let linestring: LineString = self.coordinates.clone().into();

        let value = json!({
            "type": "Feature",
            "geometry": Geometry::new((&linestring).into()),
            "properties": {
                "name": profile.name(),
                "color": profile.color(),
                "description": profile.description(),
                "distance_km": self.distance_km,
                "total_weight": self.total_weight,
                "danger_score": self.danger_score,
                "danger_level": self.danger_level().label(),
                "segments": self.segment_count,
            }
        });

        serde_json::from_value(value).map_err(Error::from)
    }
}

impl RouteAlternatives {
    /// Converts the full alternatives set to a `GeoJSON`
    /// `FeatureCollection`, one feature per profile.
    ///
    /// # Errors
    ///
    /// Propagates feature-conversion failures from [`Route::to_feature`].
    pub fn to_geojson(&self) -> Result<FeatureCollection, Error> {
        let features = RouteProfile::ALL
            .iter()
            .map(|profile| self.get(*profile).to_feature(*profile))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FeatureCollection {
            features,
            bbox: None,
            foreign_members: None,
        })
    }

    /// # Errors
    ///
    /// Propagates conversion and serialization failures.
    pub fn to_geojson_string(&self) -> Result<String, Error> {
        let collection = self.to_geojson()?;
        Ok(serde_json::to_string(&collection)?)
    }
}

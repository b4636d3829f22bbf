//! Great-circle distance over the service area.

use geo::Point;

use crate::EARTH_RADIUS_M;

/// Haversine distance between two points in meters, on a sphere of
/// [`EARTH_RADIUS_M`]. Points carry `x = lon`, `y = lat` in degrees.
///
/// Numerically stable across the few-kilometer spans of a bounded street
/// network; no antipodal handling.
#[must_use]
pub fn haversine_distance(a: Point<f64>, b: Point<f64>) -> f64 {
    let d_lat = (b.y() - a.y()).to_radians();
    let d_lon = (b.x() - a.x()).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.y().to_radians().cos() * b.y().to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_for_identical_points() {
        let p = Point::new(-79.3832, 43.6532);
        assert_eq!(haversine_distance(p, p), 0.0);
    }

    #[test]
    fn symmetric() {
        let a = Point::new(-79.3832, 43.6532);
        let b = Point::new(-79.3871, 43.6426);
        assert!((haversine_distance(a, b) - haversine_distance(b, a)).abs() < 1e-9);
    }

    #[test]
    fn meridian_arc_matches_spherical_arc_length() {
        // One minute of latitude on a 6371 km sphere is ~1853.2 m.
        let a = Point::new(0.0, 0.0);
        let b = Point::new(0.0, 1.0 / 60.0);
        let d = haversine_distance(a, b);
        assert!((d - 1853.2).abs() < 0.5, "got {d}");
    }

    #[test]
    fn downtown_block_scale() {
        // Yonge & Dundas to Yonge & Queen, roughly 450 m.
        let dundas = Point::new(-79.3805, 43.6561);
        let queen = Point::new(-79.3793, 43.6525);
        let d = haversine_distance(dundas, queen);
        assert!((350.0..550.0).contains(&d), "got {d}");
    }
}

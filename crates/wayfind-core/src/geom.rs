//! Geographic primitives: [`LatLng`] and the distance functions used to
//! weigh edges and guide A*.

use std::fmt;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Rough length of one degree of latitude, in meters.
pub const METERS_PER_DEGREE: f64 = 111_000.0;

// ---------------------------------------------------------------------------
// LatLng
// ---------------------------------------------------------------------------

/// A geographic coordinate in floating-point degrees.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Create a new coordinate.
    #[inline]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Return a coordinate shifted by (dlat, dlng) degrees.
    #[inline]
    pub const fn shift(self, dlat: f64, dlng: f64) -> Self {
        Self {
            lat: self.lat + dlat,
            lng: self.lng + dlng,
        }
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}

// ---------------------------------------------------------------------------
// Distances
// ---------------------------------------------------------------------------

/// Great-circle distance between two coordinates, in meters.
pub fn haversine(a: LatLng, b: LatLng) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlng = (b.lng - a.lng).to_radians();
    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_M * c
}

/// Euclidean distance on raw degrees, scaled to approximate meters.
///
/// Longitude degrees are not shortened towards the poles, so this only
/// approximates [`haversine`] near the equator. Away from it the estimate
/// can exceed the real distance.
#[inline]
pub fn planar_meters(a: LatLng, b: LatLng) -> f64 {
    (a.lat - b.lat).hypot(a.lng - b.lng) * METERS_PER_DEGREE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn haversine_zero_for_same_point() {
        let p = LatLng::new(17.385, 78.4867);
        assert_eq!(haversine(p, p), 0.0);
    }

    #[test]
    fn haversine_one_degree_at_equator() {
        let d = haversine(LatLng::new(0.0, 0.0), LatLng::new(0.0, 1.0));
        assert!((d - 111_195.0).abs() < 1.0, "got {d}");
    }

    #[test]
    fn haversine_is_symmetric() {
        let a = LatLng::new(51.5007, -0.1246);
        let b = LatLng::new(40.6892, -74.0445);
        assert!((haversine(a, b) - haversine(b, a)).abs() < 1e-6);
        // London to New York is roughly 5575 km.
        assert!((haversine(a, b) / 1000.0 - 5574.0).abs() < 10.0);
    }

    #[test]
    fn planar_scales_degrees() {
        let d = planar_meters(LatLng::new(0.0, 0.0), LatLng::new(0.0, 2.0));
        assert!((d - 222_000.0).abs() < 1e-6);
        let d = planar_meters(LatLng::new(0.0, 0.0), LatLng::new(3.0, 4.0));
        assert!((d - 555_000.0).abs() < 1e-6);
    }

    #[test]
    fn shift_and_display() {
        let p = LatLng::new(1.0, 2.0).shift(0.5, -0.5);
        assert_eq!(p, LatLng::new(1.5, 1.5));
        assert_eq!(p.to_string(), "(1.500000, 1.500000)");
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn latlng_round_trip() {
        let p = LatLng::new(17.4, 78.5);
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, r#"{"lat":17.4,"lng":78.5}"#);
        let back: LatLng = serde_json::from_str(&json).unwrap();
        assert_eq!(p, back);
    }
}

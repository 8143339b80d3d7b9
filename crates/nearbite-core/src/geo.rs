//! Great-circle distance and distance display formatting.

use serde::{Deserialize, Serialize};

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A point on Earth in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.5},{:.5}", self.latitude, self.longitude)
    }
}

/// Haversine distance between two coordinates in kilometres.
///
/// Symmetric, and exactly `0.0` for identical points. Inputs must be finite
/// degrees; NaN or out-of-range values give an unspecified result.
#[must_use]
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lng = (b.longitude - a.longitude).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Render a distance for display.
///
/// | range | output |
/// |---|---|
/// | `km < 1` | rounded metres, `"500m"` |
/// | `1 <= km < 10` | one decimal, `"1.2km"` |
/// | `km >= 10` | rounded kilometres, `"13km"` |
#[must_use]
pub fn format_distance(km: f64) -> String {
    if km < 1.0 {
        format!("{:.0}m", (km * 1000.0).round())
    } else if km < 10.0 {
        format!("{km:.1}km")
    } else {
        format!("{:.0}km", km.round())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMES_SQUARE: Coordinate = Coordinate::new(40.758, -73.9855);
    const CENTRAL_PARK: Coordinate = Coordinate::new(40.7812, -73.9665);

    #[test]
    fn distance_is_zero_for_identical_points() {
        assert_eq!(distance_km(TIMES_SQUARE, TIMES_SQUARE), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let ab = distance_km(TIMES_SQUARE, CENTRAL_PARK);
        let ba = distance_km(CENTRAL_PARK, TIMES_SQUARE);
        assert!((ab - ba).abs() < 1e-12, "{ab} != {ba}");
    }

    #[test]
    fn distance_matches_known_city_pair() {
        // London to Paris is roughly 343.5 km along the great circle.
        let london = Coordinate::new(51.5074, -0.1278);
        let paris = Coordinate::new(48.8566, 2.3522);
        let d = distance_km(london, paris);
        assert!((d - 343.5).abs() < 1.0, "got {d}");
    }

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let d = distance_km(Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 0.0));
        assert!((d - 111.19).abs() < 0.01, "got {d}");
    }

    #[test]
    fn format_distance_below_one_km_uses_metres() {
        assert_eq!(format_distance(0.5), "500m");
        assert_eq!(format_distance(0.0), "0m");
        assert_eq!(format_distance(0.0424), "42m");
    }

    #[test]
    fn format_distance_below_ten_km_uses_one_decimal() {
        assert_eq!(format_distance(1.234), "1.2km");
        assert_eq!(format_distance(1.0), "1.0km");
        assert_eq!(format_distance(9.94), "9.9km");
    }

    #[test]
    fn format_distance_from_ten_km_rounds_to_whole_km() {
        assert_eq!(format_distance(12.6), "13km");
        assert_eq!(format_distance(10.0), "10km");
        assert_eq!(format_distance(250.2), "250km");
    }
}

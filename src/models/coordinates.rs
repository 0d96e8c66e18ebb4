use crate::constants::EARTH_RADIUS_KM;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Result<Self, String> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(format!(
                "Invalid latitude: {} (must be between -90 and 90)",
                lat
            ));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(format!(
                "Invalid longitude: {} (must be between -180 and 180)",
                lng
            ));
        }
        Ok(Coordinates { lat, lng })
    }

    /// Build from a GeoJSON position (`[lng, lat]`)
    pub fn from_lng_lat(position: [f64; 2]) -> Result<Self, String> {
        Self::new(position[1], position[0])
    }

    /// GeoJSON position order (`[lng, lat]`), as the routing service expects
    pub fn to_lng_lat(&self) -> [f64; 2] {
        [self.lng, self.lat]
    }

    /// Calculate distance between two coordinates using Haversine formula
    /// Returns distance in kilometers
    pub fn distance_to(&self, other: &Coordinates) -> f64 {
        let lat1_rad = self.lat.to_radians();
        let lat2_rad = other.lat.to_radians();
        let delta_lat = (other.lat - self.lat).to_radians();
        let delta_lng = (other.lng - self.lng).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_KM * c
    }

    /// Round coordinates to specified decimal places
    pub fn round(&self, decimal_places: u32) -> Self {
        let multiplier = 10_f64.powi(decimal_places as i32);
        Coordinates {
            lat: (self.lat * multiplier).round() / multiplier,
            lng: (self.lng * multiplier).round() / multiplier,
        }
    }
}

/// Total length of a path in kilometers
pub fn path_length_km(path: &[Coordinates]) -> f64 {
    path.windows(2).map(|w| w[0].distance_to(&w[1])).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_validation() {
        assert!(Coordinates::new(48.8566, 2.3522).is_ok());
        assert!(Coordinates::new(91.0, 0.0).is_err()); // Invalid lat
        assert!(Coordinates::new(0.0, 181.0).is_err()); // Invalid lng
    }

    #[test]
    fn test_distance_same_point_is_zero() {
        let london = Coordinates::new(51.5074, -0.1278).unwrap();
        assert_eq!(london.distance_to(&london), 0.0);
    }

    #[test]
    fn test_distance_london_landmarks() {
        let tower_bridge = Coordinates::new(51.5055, -0.0754).unwrap();
        let london_bridge = Coordinates::new(51.5079, -0.0877).unwrap();

        let distance = tower_bridge.distance_to(&london_bridge);
        assert!(distance > 0.8 && distance < 1.2, "got {distance}");
    }

    #[test]
    fn test_distance_calculation() {
        let paris = Coordinates::new(48.8566, 2.3522).unwrap();
        let london = Coordinates::new(51.5074, -0.1278).unwrap();

        let distance = paris.distance_to(&london);
        // Paris to London is approximately 344 km
        assert!((distance - 344.0).abs() < 10.0);
    }

    #[test]
    fn test_distance_southern_hemisphere() {
        let buenos_aires = Coordinates::new(-34.6037, -58.3816).unwrap();
        let santiago = Coordinates::new(-33.4489, -70.6693).unwrap();

        let distance = buenos_aires.distance_to(&santiago);
        assert!(distance > 1000.0 && distance < 1300.0, "got {distance}");
    }

    #[test]
    fn test_rounding() {
        let coords = Coordinates::new(48.856614, 2.352222).unwrap();
        let rounded = coords.round(3);
        assert_eq!(rounded.lat, 48.857);
        assert_eq!(rounded.lng, 2.352);
    }

    #[test]
    fn test_lng_lat_order() {
        let coords = Coordinates::from_lng_lat([-0.1278, 51.5074]).unwrap();
        assert_eq!(coords.lat, 51.5074);
        assert_eq!(coords.lng, -0.1278);
        assert_eq!(coords.to_lng_lat(), [-0.1278, 51.5074]);
        assert!(Coordinates::from_lng_lat([51.5074, 95.0]).is_err());
    }

    #[test]
    fn test_path_length() {
        let a = Coordinates::new(51.5055, -0.0754).unwrap();
        let b = Coordinates::new(51.5079, -0.0877).unwrap();
        let there_and_back = path_length_km(&[a, b, a]);
        assert!((there_and_back - 2.0 * a.distance_to(&b)).abs() < 1e-9);
        assert_eq!(path_length_km(&[a]), 0.0);
    }
}

use crate::models::Coordinates;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in geographic coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    /// Smallest box enclosing every coordinate. `None` for an empty slice.
    pub fn from_coordinates(coordinates: &[Coordinates]) -> Option<Self> {
        let first = coordinates.first()?;

        let mut bbox = BoundingBox {
            min_lat: first.lat,
            max_lat: first.lat,
            min_lng: first.lng,
            max_lng: first.lng,
        };

        for coord in &coordinates[1..] {
            bbox.min_lat = bbox.min_lat.min(coord.lat);
            bbox.max_lat = bbox.max_lat.max(coord.lat);
            bbox.min_lng = bbox.min_lng.min(coord.lng);
            bbox.max_lng = bbox.max_lng.max(coord.lng);
        }

        Some(bbox)
    }

    pub fn center(&self) -> Coordinates {
        Coordinates {
            lat: (self.min_lat + self.max_lat) / 2.0,
            lng: (self.min_lng + self.max_lng) / 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(lat: f64, lng: f64) -> Coordinates {
        Coordinates::new(lat, lng).unwrap()
    }

    #[test]
    fn bounds_empty() {
        assert!(BoundingBox::from_coordinates(&[]).is_none());
    }

    #[test]
    fn bounds_single_point() {
        let bbox = BoundingBox::from_coordinates(&[c(51.5074, -0.1278)]).unwrap();
        assert_eq!((bbox.min_lat, bbox.min_lng), (51.5074, -0.1278));
        assert_eq!((bbox.max_lat, bbox.max_lng), (51.5074, -0.1278));
    }

    #[test]
    fn bounds_multi_point_envelope() {
        let coords = vec![
            c(51.5074, -0.1278),
            c(51.5085, -0.1257),
            c(51.5063, -0.1299),
        ];
        let bbox = BoundingBox::from_coordinates(&coords).unwrap();
        assert_eq!(bbox.min_lat, 51.5063);
        assert_eq!(bbox.min_lng, -0.1299);
        assert_eq!(bbox.max_lat, 51.5085);
        assert_eq!(bbox.max_lng, -0.1257);
    }

    #[test]
    fn center_of_diagonal() {
        let bbox =
            BoundingBox::from_coordinates(&[c(51.5063, -0.1299), c(51.5085, -0.1257)]).unwrap();
        let center = bbox.center();
        assert!((center.lat - 51.5074).abs() < 1e-4);
        assert!((center.lng - -0.1278).abs() < 1e-4);
    }
}

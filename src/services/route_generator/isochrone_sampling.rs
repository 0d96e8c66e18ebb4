use super::StageError;
use crate::config::RouteGeneratorConfig;
use crate::constants::MIN_ISOCHRONE_POINTS;
use crate::models::Coordinates;
use rand::rngs::StdRng;
use rand::RngExt;

/// Picks waypoints along the boundary of a reachability polygon
pub struct IsochroneSampler {
    min_samples: usize,
    max_samples: usize,
    jitter_deg: f64,
}

impl IsochroneSampler {
    pub fn new(config: &RouteGeneratorConfig) -> Self {
        IsochroneSampler {
            min_samples: config.isochrone_min_samples,
            max_samples: config.isochrone_max_samples,
            jitter_deg: config.isochrone_jitter_deg,
        }
    }

    /// Number of waypoints to take from a boundary of `boundary_len` points
    pub fn sample_count(&self, boundary_len: usize) -> usize {
        (boundary_len / 4).clamp(self.min_samples, self.max_samples)
    }

    /// Evenly strided boundary points, topped up with jittered random
    /// boundary points when striding falls short.
    pub fn sample(
        &self,
        polygon: &[Coordinates],
        rng: &mut StdRng,
    ) -> Result<Vec<Coordinates>, StageError> {
        if polygon.len() < MIN_ISOCHRONE_POINTS {
            return Err(StageError::InvalidIsochrone {
                points: polygon.len(),
            });
        }

        let count = self.sample_count(polygon.len());
        let stride = (polygon.len() / count).max(1);

        let mut points: Vec<Coordinates> = polygon
            .iter()
            .step_by(stride)
            .take(count)
            .copied()
            .collect();

        let strided = points.len();
        while points.len() < count {
            let base = polygon[rng.random_range(0..polygon.len())];
            let lat = base.lat + (rng.random::<f64>() - 0.5) * self.jitter_deg;
            let lng = base.lng + (rng.random::<f64>() - 0.5) * self.jitter_deg;
            points.push(Coordinates::new(lat, lng).unwrap_or(base));
        }

        tracing::debug!(
            boundary_points = polygon.len(),
            strided = strided,
            filled = count - strided,
            "Sampled {} isochrone waypoints (stride {})",
            count,
            stride
        );

        Ok(points)
    }
}

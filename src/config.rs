use crate::constants::*;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Proxy, // Network-backed, forwards through the routing proxy
    Demo, // Synthetic geometry only, works offline
}

impl std::str::FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "proxy" | "ors" => Ok(ProviderKind::Proxy),
            "demo" | "synthetic" => Ok(ProviderKind::Demo),
            _ => Err(format!(
                "Invalid routing provider: {}. Use 'proxy' or 'demo'",
                s
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub routing_provider: ProviderKind,
    pub routing_proxy_url: String,
    pub history_window: usize,
    pub store_max_routes: usize,
    pub route_generator: RouteGeneratorConfig,
}

#[derive(Debug, Clone)]
pub struct RouteGeneratorConfig {
    /// Lower bound on waypoints sampled from an isochrone boundary
    pub isochrone_min_samples: usize,

    /// Upper bound on waypoints sampled from an isochrone boundary
    pub isochrone_max_samples: usize,

    /// Maximum offset (degrees) applied to randomly filled boundary samples
    pub isochrone_jitter_deg: f64,

    /// Waypoints placed around the start by the radius heuristic
    pub radius_waypoint_count: usize,

    /// Smallest random scaling of the estimated radius
    pub radius_variation_min: f64,

    /// Largest random scaling of the estimated radius
    pub radius_variation_max: f64,

    /// Weight of freshness in the composite candidate score
    pub freshness_weight: f64,

    /// Geometric decay applied to older routes in the variety score.
    /// The most recent route has weight 1, the next `decay`, then `decay^2`...
    pub recency_decay: f64,

    /// Waypoint requests in flight at once. 1 keeps requests strictly sequential.
    pub max_concurrent_requests: usize,

    /// Deadline for a single routing or isochrone request
    pub request_timeout_secs: u64,

    /// Fixed seed for sampling jitter. Random per request when unset.
    pub random_seed: Option<u64>,
}

impl Default for RouteGeneratorConfig {
    fn default() -> Self {
        Self {
            isochrone_min_samples: 6,
            isochrone_max_samples: 12,
            isochrone_jitter_deg: 0.001,
            radius_waypoint_count: 12,
            radius_variation_min: 0.7,
            radius_variation_max: 1.3,
            freshness_weight: 0.3,
            recency_decay: 0.7,
            max_concurrent_requests: 1,
            request_timeout_secs: 30,
            random_seed: None,
        }
    }
}

impl RouteGeneratorConfig {
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();

        let config = Self {
            isochrone_min_samples: env::var("ROUTE_ISOCHRONE_MIN_SAMPLES")
                .unwrap_or_else(|_| defaults.isochrone_min_samples.to_string())
                .parse()
                .map_err(|_| "Invalid ROUTE_ISOCHRONE_MIN_SAMPLES")?,

            isochrone_max_samples: env::var("ROUTE_ISOCHRONE_MAX_SAMPLES")
                .unwrap_or_else(|_| defaults.isochrone_max_samples.to_string())
                .parse()
                .map_err(|_| "Invalid ROUTE_ISOCHRONE_MAX_SAMPLES")?,

            isochrone_jitter_deg: env::var("ROUTE_ISOCHRONE_JITTER_DEG")
                .unwrap_or_else(|_| defaults.isochrone_jitter_deg.to_string())
                .parse()
                .map_err(|_| "Invalid ROUTE_ISOCHRONE_JITTER_DEG")?,

            radius_waypoint_count: env::var("ROUTE_RADIUS_WAYPOINT_COUNT")
                .unwrap_or_else(|_| defaults.radius_waypoint_count.to_string())
                .parse()
                .map_err(|_| "Invalid ROUTE_RADIUS_WAYPOINT_COUNT")?,

            radius_variation_min: env::var("ROUTE_RADIUS_VARIATION_MIN")
                .unwrap_or_else(|_| defaults.radius_variation_min.to_string())
                .parse()
                .map_err(|_| "Invalid ROUTE_RADIUS_VARIATION_MIN")?,

            radius_variation_max: env::var("ROUTE_RADIUS_VARIATION_MAX")
                .unwrap_or_else(|_| defaults.radius_variation_max.to_string())
                .parse()
                .map_err(|_| "Invalid ROUTE_RADIUS_VARIATION_MAX")?,

            freshness_weight: env::var("ROUTE_FRESHNESS_WEIGHT")
                .unwrap_or_else(|_| defaults.freshness_weight.to_string())
                .parse()
                .map_err(|_| "Invalid ROUTE_FRESHNESS_WEIGHT")?,

            recency_decay: env::var("ROUTE_RECENCY_DECAY")
                .unwrap_or_else(|_| defaults.recency_decay.to_string())
                .parse()
                .map_err(|_| "Invalid ROUTE_RECENCY_DECAY")?,

            max_concurrent_requests: env::var("ROUTE_MAX_CONCURRENT_REQUESTS")
                .unwrap_or_else(|_| defaults.max_concurrent_requests.to_string())
                .parse()
                .map_err(|_| "Invalid ROUTE_MAX_CONCURRENT_REQUESTS")?,

            request_timeout_secs: env::var("ROUTE_REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| defaults.request_timeout_secs.to_string())
                .parse()
                .map_err(|_| "Invalid ROUTE_REQUEST_TIMEOUT_SECS")?,

            random_seed: match env::var("ROUTE_RANDOM_SEED") {
                Ok(seed) => Some(seed.parse().map_err(|_| "Invalid ROUTE_RANDOM_SEED")?),
                Err(_) => None,
            },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.isochrone_min_samples == 0 || self.isochrone_min_samples > self.isochrone_max_samples
        {
            return Err(
                "ROUTE_ISOCHRONE_MIN_SAMPLES must be between 1 and ROUTE_ISOCHRONE_MAX_SAMPLES"
                    .to_string(),
            );
        }
        if self.radius_waypoint_count == 0 {
            return Err("ROUTE_RADIUS_WAYPOINT_COUNT must be at least 1".to_string());
        }
        if self.radius_variation_min <= 0.0 || self.radius_variation_min > self.radius_variation_max
        {
            return Err(
                "ROUTE_RADIUS_VARIATION_MIN must be positive and not above ROUTE_RADIUS_VARIATION_MAX"
                    .to_string(),
            );
        }
        if !(0.0..=1.0).contains(&self.recency_decay) || self.recency_decay == 0.0 {
            return Err("ROUTE_RECENCY_DECAY must be in (0, 1]".to_string());
        }
        if self.max_concurrent_requests == 0 {
            return Err("ROUTE_MAX_CONCURRENT_REQUESTS must be at least 1".to_string());
        }
        if self.request_timeout_secs == 0 {
            return Err("ROUTE_REQUEST_TIMEOUT_SECS must be at least 1".to_string());
        }
        Ok(())
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenv::dotenv().ok();

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| "Invalid PORT")?,
            routing_provider: env::var("ROUTING_PROVIDER")
                .unwrap_or_else(|_| "proxy".to_string())
                .parse()?,
            routing_proxy_url: env::var("ROUTING_PROXY_URL")
                .unwrap_or_else(|_| DEFAULT_ROUTING_PROXY_URL.to_string()),
            history_window: env::var("ROUTE_HISTORY_WINDOW")
                .unwrap_or_else(|_| DEFAULT_HISTORY_WINDOW.to_string())
                .parse()
                .map_err(|_| "Invalid ROUTE_HISTORY_WINDOW")?,
            store_max_routes: env::var("ROUTE_STORE_MAX_ROUTES")
                .unwrap_or_else(|_| DEFAULT_STORE_MAX_ROUTES.to_string())
                .parse()
                .map_err(|_| "Invalid ROUTE_STORE_MAX_ROUTES")?,
            route_generator: RouteGeneratorConfig::from_env()?,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

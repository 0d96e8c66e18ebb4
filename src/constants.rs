//! Stable application-wide constants.
//!
//! Values here are structural invariants, algorithm coefficients, and default
//! fallbacks for env-var-based configuration. They should rarely change.
//! For tuning knobs that benefit from runtime experimentation, see
//! [`RouteGeneratorConfig`](crate::config::RouteGeneratorConfig) instead.

// --- Server defaults (used when HOST / PORT env vars are absent) ---

/// Default bind address for the HTTP server.
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Default port for the HTTP server.
pub const DEFAULT_PORT: &str = "3000";
/// Default base URL of the routing proxy (`/route` and `/isochrone` live below it).
pub const DEFAULT_ROUTING_PROXY_URL: &str = "http://localhost:4000/api";
/// Routing profile requested from the upstream service.
pub const WALKING_PROFILE: &str = "foot-walking";

// --- Route history ---

/// Number of most recent routes fed to the variety scorer.
pub const DEFAULT_HISTORY_WINDOW: usize = 5;
/// Upper bound on routes kept by the in-memory store.
pub const DEFAULT_STORE_MAX_ROUTES: usize = 500;

// --- Request validation ---

/// Shortest loop (minutes) a caller may ask for.
pub const MIN_DURATION_MINUTES: f64 = 5.0;
/// Longest loop (minutes) a caller may ask for.
pub const MAX_DURATION_MINUTES: f64 = 600.0;

// --- Geodesy ---

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;
/// Flat-earth conversion used when turning a radius into a lat/lng offset.
pub const KM_PER_DEGREE: f64 = 111.0;
/// Exact international mile.
pub const KM_PER_MILE: f64 = 1.609344;

// --- Pace ---

/// Default walking pace: 12 min/km is roughly 5 km/h.
pub const DEFAULT_PACE_MIN_PER_KM: f64 = 12.0;

// --- Segment fingerprints ---
// Changing any of these invalidates every stored fingerprint.

/// Decimal places kept before hashing (~11 m at 4 places).
pub const FINGERPRINT_PRECISION: u32 = 4;
/// Length of a fingerprint string.
pub const FINGERPRINT_LENGTH: usize = 16;
/// Step between consecutive fingerprint windows. Each window also takes the
/// next point, so neighbours share one boundary coordinate.
pub const SEGMENT_WINDOW: usize = 10;

// --- Candidate selection ---

/// Minimum points a reachability polygon needs to be usable.
pub const MIN_ISOCHRONE_POINTS: usize = 4;
/// Truncation applied to upstream error bodies before they are surfaced.
pub const ERROR_BODY_MAX_CHARS: usize = 200;

// --- Synthetic provider ---

/// Walking speed assumed when sizing synthetic isochrones.
pub const SYNTHETIC_WALKING_SPEED_KMH: f64 = 5.0;
/// Ring vertices of a synthetic isochrone (before closing the ring).
pub const SYNTHETIC_ISOCHRONE_POINTS: usize = 16;

pub mod coordinates;
pub mod geo;
pub mod pace;
pub mod route;

pub use coordinates::{path_length_km, Coordinates};
pub use geo::BoundingBox;
pub use pace::{DistanceUnit, PaceSetting};
pub use route::{GenerationStage, Route, RouteCandidate, RouteRequest};

// Library exports for testing and reusability

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

// Re-export commonly used types
pub use error::{AppError, Result};

use config::ProviderKind;
use services::route_generator::RouteGenerator;
use services::routing::RoutingProvider;
use std::sync::Arc;
use store::RouteStore;

// App state for sharing across the application
pub struct AppState {
    pub route_generator: RouteGenerator,
    /// Provider selected by configuration
    pub routing: Arc<dyn RoutingProvider>,
    /// Offline provider, used for `demo` requests
    pub synthetic: Arc<dyn RoutingProvider>,
    pub store: Arc<dyn RouteStore>,
    /// Recent routes considered when scoring freshness
    pub history_window: usize,
}

impl AppState {
    /// Provider for one request. Only `demo` overrides the configured one.
    pub fn provider_for(&self, requested: Option<ProviderKind>) -> &dyn RoutingProvider {
        match requested {
            Some(ProviderKind::Demo) => self.synthetic.as_ref(),
            _ => self.routing.as_ref(),
        }
    }
}

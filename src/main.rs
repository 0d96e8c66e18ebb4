use axum::Router;
use loopwalk::config::{Config, ProviderKind};
use loopwalk::services::route_generator::RouteGenerator;
use loopwalk::services::routing::{ProxyRoutingClient, RoutingProvider, SyntheticRoutingProvider};
use loopwalk::store::{MemoryRouteStore, RouteStore};
use loopwalk::AppState;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "loopwalk=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| format!("Failed to load configuration: {}", e))?;

    tracing::info!("Starting Loopwalk API server");
    tracing::info!("Configuration loaded successfully");

    let synthetic: Arc<dyn RoutingProvider> = Arc::new(SyntheticRoutingProvider::new(
        config.route_generator.random_seed,
    ));

    let routing: Arc<dyn RoutingProvider> = match config.routing_provider {
        ProviderKind::Proxy => {
            tracing::info!("Routing through proxy at {}", config.routing_proxy_url);
            Arc::new(ProxyRoutingClient::new(config.routing_proxy_url.clone()))
        }
        ProviderKind::Demo => {
            tracing::info!("Demo mode: using synthetic routes only");
            synthetic.clone()
        }
    };

    let store: Arc<dyn RouteStore> = Arc::new(MemoryRouteStore::new(config.store_max_routes));
    let route_generator = RouteGenerator::new(config.route_generator.clone(), synthetic.clone());

    // Create application state
    let state = Arc::new(AppState {
        route_generator,
        routing,
        synthetic,
        store,
        history_window: config.history_window,
    });

    // Build router with CORS and tracing
    let app = Router::new()
        .nest("/api/v1", loopwalk::routes::create_router(state))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = config.server_address();
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

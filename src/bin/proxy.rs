use axum::{
    extract::{ConnectInfo, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::{
    collections::HashMap,
    net::{IpAddr, SocketAddr},
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const ORS_API_BASE: &str = "https://api.openrouteservice.org/v2";
const DEFAULT_PROFILE: &str = "foot-walking";
const RATE_LIMIT_WINDOW: Duration = Duration::from_secs(60);
const ERROR_DETAILS_MAX_CHARS: usize = 200;

// ── Config ──────────────────────────────────────────────

#[derive(Clone, Debug)]
struct ProxyConfig {
    ors_api_key: String,
    ors_base_url: String,
    rate_limit: usize,
    port: u16,
}

impl ProxyConfig {
    fn from_env() -> Result<Self, String> {
        let ors_api_key = std::env::var("ORS_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or("ORS_API_KEY must be set")?;
        let ors_base_url = std::env::var("ORS_BASE_URL")
            .unwrap_or_else(|_| ORS_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();
        let rate_limit: usize = std::env::var("PROXY_RATE_LIMIT")
            .unwrap_or_else(|_| "60".to_string())
            .parse()
            .map_err(|_| "Invalid PROXY_RATE_LIMIT")?;
        let port: u16 = std::env::var("PROXY_PORT")
            .unwrap_or_else(|_| "4000".to_string())
            .parse()
            .map_err(|_| "Invalid PROXY_PORT")?;

        Ok(Self {
            ors_api_key,
            ors_base_url,
            rate_limit,
            port,
        })
    }
}

// ── Rate limiter ────────────────────────────────────────

/// Fixed-window request log per client address. Clients with no request in
/// the last window are swept out at most once per window.
#[derive(Default)]
struct RateLimiter {
    windows: HashMap<IpAddr, Vec<Instant>>,
    last_sweep: Option<Instant>,
}

impl RateLimiter {
    fn check(&mut self, client: IpAddr, limit: usize) -> bool {
        self.check_at(client, limit, Instant::now())
    }

    fn check_at(&mut self, client: IpAddr, limit: usize, now: Instant) -> bool {
        let cutoff = now.checked_sub(RATE_LIMIT_WINDOW);

        if let Some(cutoff) = cutoff {
            if self.last_sweep.map_or(true, |swept| swept <= cutoff) {
                self.windows.retain(|_, times| {
                    times.retain(|t| *t > cutoff);
                    !times.is_empty()
                });
                self.last_sweep = Some(now);
            }
        }

        let entries = self.windows.entry(client).or_default();
        if let Some(cutoff) = cutoff {
            entries.retain(|t| *t > cutoff);
        }

        if entries.len() >= limit {
            return false;
        }
        entries.push(now);
        true
    }
}

// ── App state ───────────────────────────────────────────

struct AppState {
    config: ProxyConfig,
    http: Client,
    limiter: Mutex<RateLimiter>,
}

// ── Request bodies ──────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RouteBody {
    start: Option<Vec<f64>>,
    #[serde(default)]
    waypoints: Vec<[f64; 2]>,
    profile: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IsochroneBody {
    start: Option<Vec<f64>>,
    time_seconds: Option<f64>,
    profile: Option<String>,
}

/// `[lng, lat]` with both values in range
fn parse_position(position: Option<&[f64]>) -> Option<[f64; 2]> {
    match position? {
        [lng, lat]
            if (-180.0..=180.0).contains(lng) && (-90.0..=90.0).contains(lat) =>
        {
            Some([*lng, *lat])
        }
        _ => None,
    }
}

fn directions_body(start: [f64; 2], waypoints: &[[f64; 2]]) -> Value {
    let mut coordinates = Vec::with_capacity(waypoints.len() + 2);
    coordinates.push(start);
    coordinates.extend_from_slice(waypoints);
    coordinates.push(start);

    json!({
        "coordinates": coordinates,
        "format": "geojson",
        "instructions": false,
        "elevation": false,
    })
}

fn isochrone_body(start: [f64; 2], time_seconds: f64) -> Value {
    json!({
        "locations": [start],
        "range": [time_seconds],
        "range_type": "time",
        "smoothing": 0.9,
    })
}

// ── Handlers ────────────────────────────────────────────

fn bad_request(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
}

async fn rate_limited(state: &AppState, client: IpAddr) -> Option<Response> {
    let mut limiter = state.limiter.lock().await;
    if limiter.check(client, state.config.rate_limit) {
        None
    } else {
        tracing::warn!(client = %client, "Rate limit exceeded");
        Some(
            (
                StatusCode::TOO_MANY_REQUESTS,
                Json(json!({"error": "Rate limit exceeded"})),
            )
                .into_response(),
        )
    }
}

/// Send `body` to OpenRouteService and relay the answer
async fn forward(state: &AppState, url: &str, body: &Value, kind: &str) -> Response {
    let result = state
        .http
        .post(url)
        .header("Authorization", &state.config.ors_api_key)
        .json(body)
        .send()
        .await;

    match result {
        Ok(resp) if resp.status().is_success() => {
            let body = resp.bytes().await.unwrap_or_default();
            (
                StatusCode::OK,
                [("content-type", "application/json")],
                body,
            )
                .into_response()
        }
        Ok(resp) => {
            let status =
                StatusCode::from_u16(resp.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
            let text = resp.text().await.unwrap_or_default();
            tracing::error!(status = %status, "OpenRouteService {} error: {}", kind, text);
            let details: String = text.chars().take(ERROR_DETAILS_MAX_CHARS).collect();
            (
                status,
                Json(json!({
                    "error": format!("{} service error", kind),
                    "details": details,
                })),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "OpenRouteService {} request failed", kind);
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({"error": "Upstream request failed"})),
            )
                .into_response()
        }
    }
}

async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "upstream": state.config.ors_base_url,
        "rate_limit": state.config.rate_limit,
    }))
}

async fn route(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(body): Json<RouteBody>,
) -> Response {
    if let Some(resp) = rate_limited(&state, addr.ip()).await {
        return resp;
    }

    let Some(start) = parse_position(body.start.as_deref()) else {
        return bad_request("Invalid start coordinates");
    };
    if body
        .waypoints
        .iter()
        .any(|w| parse_position(Some(w.as_slice())).is_none())
    {
        return bad_request("Invalid waypoint coordinates");
    }

    let profile = body.profile.as_deref().unwrap_or(DEFAULT_PROFILE);
    let url = format!("{}/directions/{}/geojson", state.config.ors_base_url, profile);

    tracing::info!(
        profile = %profile,
        waypoints = body.waypoints.len(),
        "Proxying directions request"
    );

    forward(&state, &url, &directions_body(start, &body.waypoints), "Routing").await
}

async fn isochrone(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(body): Json<IsochroneBody>,
) -> Response {
    if let Some(resp) = rate_limited(&state, addr.ip()).await {
        return resp;
    }

    let Some(start) = parse_position(body.start.as_deref()) else {
        return bad_request("Invalid start coordinates");
    };
    let time_seconds = match body.time_seconds {
        Some(t) if t.is_finite() && t > 0.0 => t,
        _ => return bad_request("Invalid time parameter"),
    };

    let profile = body.profile.as_deref().unwrap_or(DEFAULT_PROFILE);
    let url = format!("{}/isochrones/{}", state.config.ors_base_url, profile);

    tracing::info!(profile = %profile, time_seconds = time_seconds, "Proxying isochrone request");

    forward(&state, &url, &isochrone_body(start, time_seconds), "Isochrone").await
}

// ── Main ────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "proxy=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenv::dotenv().ok();
    let config = ProxyConfig::from_env().map_err(|e| format!("Config error: {}", e))?;
    let addr = format!("0.0.0.0:{}", config.port);

    tracing::info!(
        port = config.port,
        upstream = %config.ors_base_url,
        rate_limit = config.rate_limit,
        "Starting routing proxy"
    );

    let state = Arc::new(AppState {
        config,
        http: Client::new(),
        limiter: Mutex::new(RateLimiter::default()),
    });

    let app = Router::new()
        .route("/health", get(health))
        .route("/api/route", post(route))
        .route("/api/isochrone", post(isochrone))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Proxy listening on http://{}", addr);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

// ── Tests ───────────────────────────────────────────────

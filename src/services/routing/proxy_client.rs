use super::{IsochroneResponse, RouteResponse, RoutingProvider};
use crate::constants::{ERROR_BODY_MAX_CHARS, WALKING_PROFILE};
use crate::error::{AppError, Result};
use crate::models::Coordinates;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Routing provider backed by the credential-holding proxy.
///
/// The proxy exposes `POST {base}/route` and `POST {base}/isochrone` and
/// answers with the upstream GeoJSON feature collections untouched.
#[derive(Clone)]
pub struct ProxyRoutingClient {
    client: Client,
    base_url: String,
}

impl ProxyRoutingClient {
    pub fn new(base_url: String) -> Self {
        ProxyRoutingClient {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::RoutingApi(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!(
                status = %status,
                path = path,
                "Routing proxy HTTP error {}: {}",
                status, error_text
            );
            return Err(AppError::UpstreamStatus {
                status: status.as_u16(),
                body: truncate_chars(&error_text, ERROR_BODY_MAX_CHARS),
            });
        }

        response
            .json()
            .await
            .map_err(|e| AppError::RoutingApi(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl RoutingProvider for ProxyRoutingClient {
    async fn get_route(&self, start: Coordinates, waypoint: Coordinates) -> Result<RouteResponse> {
        let body = ProxyRouteBody {
            start: start.to_lng_lat(),
            waypoints: vec![waypoint.to_lng_lat()],
            profile: WALKING_PROFILE,
        };

        tracing::debug!(
            waypoint_lat = waypoint.lat,
            waypoint_lng = waypoint.lng,
            "Routing request via proxy"
        );

        let collection: RouteFeatureCollection = self.post("route", &body).await?;
        parse_route(collection)
    }

    async fn get_isochrone(
        &self,
        start: Coordinates,
        time_seconds: f64,
    ) -> Result<IsochroneResponse> {
        let body = ProxyIsochroneBody {
            start: start.to_lng_lat(),
            time_seconds,
            profile: WALKING_PROFILE,
        };

        tracing::debug!(time_seconds = time_seconds, "Isochrone request via proxy");

        let collection: IsochroneFeatureCollection = self.post("isochrone", &body).await?;
        parse_isochrone(collection, time_seconds)
    }

    fn name(&self) -> &'static str {
        "proxy"
    }
}

/// Cut to at most `max` characters without splitting a UTF-8 sequence
pub fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

fn parse_route(collection: RouteFeatureCollection) -> Result<RouteResponse> {
    let feature = collection
        .features
        .into_iter()
        .next()
        .ok_or_else(|| AppError::RoutingApi("No route feature in response".to_string()))?;

    let props = feature.properties;
    let (distance, duration) = match props.summary {
        Some(summary) => (summary.distance, summary.duration),
        None => (props.distance, props.duration),
    };

    match (distance, duration) {
        (Some(distance_meters), Some(duration_seconds)) => Ok(RouteResponse {
            distance_meters,
            duration_seconds,
            geometry: feature.geometry.coordinates,
        }),
        _ => Err(AppError::RoutingApi(
            "Route feature is missing distance or duration".to_string(),
        )),
    }
}

fn parse_isochrone(
    collection: IsochroneFeatureCollection,
    time_seconds: f64,
) -> Result<IsochroneResponse> {
    let feature = collection
        .features
        .into_iter()
        .next()
        .ok_or_else(|| AppError::RoutingApi("No isochrone feature in response".to_string()))?;

    let polygon = feature
        .geometry
        .coordinates
        .into_iter()
        .next()
        .unwrap_or_default();

    Ok(IsochroneResponse {
        polygon,
        time_seconds: feature.properties.value.unwrap_or(time_seconds),
    })
}

// Proxy request bodies

#[derive(Debug, Serialize)]
struct ProxyRouteBody {
    start: [f64; 2],
    waypoints: Vec<[f64; 2]>,
    profile: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProxyIsochroneBody {
    start: [f64; 2],
    time_seconds: f64,
    profile: &'static str,
}

// GeoJSON response types

#[derive(Debug, Deserialize)]
struct RouteFeatureCollection {
    #[serde(default)]
    features: Vec<RouteFeature>,
}

#[derive(Debug, Deserialize)]
struct RouteFeature {
    geometry: LineStringGeometry,
    #[serde(default)]
    properties: RouteProperties,
}

#[derive(Debug, Deserialize)]
struct LineStringGeometry {
    coordinates: Vec<[f64; 2]>, // [lng, lat] pairs
}

#[derive(Debug, Default, Deserialize)]
struct RouteProperties {
    summary: Option<RouteSummary>,
    distance: Option<f64>, // meters
    duration: Option<f64>, // seconds
}

#[derive(Debug, Deserialize)]
struct RouteSummary {
    distance: Option<f64>,
    duration: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct IsochroneFeatureCollection {
    #[serde(default)]
    features: Vec<IsochroneFeature>,
}

#[derive(Debug, Deserialize)]
struct IsochroneFeature {
    geometry: PolygonGeometry,
    #[serde(default)]
    properties: IsochroneProperties,
}

#[derive(Debug, Deserialize)]
struct PolygonGeometry {
    coordinates: Vec<Vec<[f64; 2]>>, // rings, outer first
}

#[derive(Debug, Default, Deserialize)]
struct IsochroneProperties {
    value: Option<f64>,
}

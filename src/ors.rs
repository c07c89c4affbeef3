//! OpenRouteService directions adapter.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::Deserialize;

use crate::error::RoutingError;
use crate::model::Coordinate;
use crate::traits::RouteDistanceProvider;

pub const DEFAULT_ORS_BASE_URL: &str =
    "https://api.openrouteservice.org/v2/directions/driving-car";

#[derive(Debug, Clone)]
pub struct OrsConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

impl Default for OrsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_ORS_BASE_URL.to_string(),
            api_key: String::new(),
            timeout_secs: 15,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OrsClient {
    config: OrsConfig,
    client: reqwest::Client,
}

impl OrsClient {
    pub fn new(config: OrsConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }
}

#[async_trait]
impl RouteDistanceProvider for OrsClient {
    async fn distance_km(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<f64, RoutingError> {
        let body = self
            .client
            .get(&self.config.base_url)
            .query(&[
                ("start", lng_lat(origin)),
                ("end", lng_lat(destination)),
            ])
            .header(AUTHORIZATION, &self.config.api_key)
            .header(ACCEPT, "application/json")
            .send()
            .await?
            .error_for_status()?
            .json::<OrsDirectionsResponse>()
            .await?;

        body.distance_km()
    }
}

fn lng_lat(point: Coordinate) -> String {
    format!("{:.6},{:.6}", point.lng, point.lat)
}

#[derive(Debug, Deserialize)]
struct OrsDirectionsResponse {
    features: Option<Vec<OrsFeature>>,
}

#[derive(Debug, Deserialize)]
struct OrsFeature {
    properties: Option<OrsProperties>,
}

#[derive(Debug, Deserialize)]
struct OrsProperties {
    summary: Option<OrsSummary>,
}

#[derive(Debug, Deserialize)]
struct OrsSummary {
    distance: Option<f64>,
}

impl OrsDirectionsResponse {
    fn distance_km(&self) -> Result<f64, RoutingError> {
        let feature = self
            .features
            .as_deref()
            .and_then(|features| features.first())
            .ok_or(RoutingError::NoRoute)?;

        let meters = feature
            .properties
            .as_ref()
            .and_then(|properties| properties.summary.as_ref())
            .and_then(|summary| summary.distance)
            .ok_or(RoutingError::MissingDistance)?;

        meters_to_km(meters)
    }
}

/// Convert an upstream distance in meters, rejecting values no route can have.
pub(crate) fn meters_to_km(meters: f64) -> Result<f64, RoutingError> {
    if meters.is_finite() && meters >= 0.0 {
        Ok(meters / 1000.0)
    } else {
        Err(RoutingError::InvalidDistance(meters))
    }
}

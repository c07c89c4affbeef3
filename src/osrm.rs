//! OSRM HTTP adapter for point-to-point route distances.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::RoutingError;
use crate::model::Coordinate;
use crate::ors::meters_to_km;
use crate::traits::RouteDistanceProvider;

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "car".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn route_url(&self, origin: Coordinate, destination: Coordinate) -> String {
        format!(
            "{}/route/v1/{}/{:.6},{:.6};{:.6},{:.6}?overview=false",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile,
            origin.lng,
            origin.lat,
            destination.lng,
            destination.lat
        )
    }
}

#[async_trait]
impl RouteDistanceProvider for OsrmClient {
    async fn distance_km(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<f64, RoutingError> {
        let body = self
            .client
            .get(self.route_url(origin, destination))
            .send()
            .await?
            .error_for_status()?
            .json::<OsrmRouteResponse>()
            .await?;

        body.distance_km()
    }
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    code: String,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    distance: Option<f64>,
}

impl OsrmRouteResponse {
    fn distance_km(&self) -> Result<f64, RoutingError> {
        if self.code != "Ok" {
            return Err(RoutingError::NoRoute);
        }
        let route = self.routes.first().ok_or(RoutingError::NoRoute)?;
        let meters = route.distance.ok_or(RoutingError::MissingDistance)?;
        meters_to_km(meters)
    }
}

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::{
    error::FetchError,
    model::Coordinate,
    raw::{RawAirQuality, RawCurrentConditions, RawForecast, RawGeocodingResult},
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_GEO_URL: &str = "https://api.openweathermap.org/geo/1.0";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Where the data and geocoding APIs live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    pub base_url: String,
    pub geo_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            geo_url: DEFAULT_GEO_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    http: Client,
    endpoints: Endpoints,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Result<Self, FetchError> {
        Self::with_endpoints(api_key, Endpoints::default())
    }

    pub fn with_endpoints(api_key: String, endpoints: Endpoints) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|source| FetchError::Transport { endpoint: "client", source })?;

        Ok(Self {
            api_key,
            http,
            endpoints,
        })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        url: String,
        query: &[(&str, &str)],
    ) -> Result<T, FetchError> {
        debug!(endpoint, %url, "requesting OpenWeather");

        let res = self
            .http
            .get(&url)
            .query(query)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(|source| FetchError::Transport { endpoint, source })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| FetchError::Transport { endpoint, source })?;

        if !status.is_success() {
            return Err(FetchError::Status {
                endpoint,
                status,
                body: truncate_body(&body),
            });
        }

        serde_json::from_str(&body).map_err(|source| FetchError::Decode { endpoint, source })
    }

    async fn get_at<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        path: &str,
        at: Coordinate,
        metric: bool,
    ) -> Result<T, FetchError> {
        let lat = at.lat.to_string();
        let lon = at.lon.to_string();
        let mut query = vec![("lat", lat.as_str()), ("lon", lon.as_str())];
        if metric {
            query.push(("units", "metric"));
        }

        let url = format!("{}/{}", self.endpoints.base_url.trim_end_matches('/'), path);
        self.get_json(endpoint, url, &query).await
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current(&self, at: Coordinate) -> Result<RawCurrentConditions, FetchError> {
        self.get_at("current weather", "weather", at, true).await
    }

    async fn forecast(&self, at: Coordinate) -> Result<RawForecast, FetchError> {
        self.get_at("5-day forecast", "forecast", at, true).await
    }

    async fn air_quality(&self, at: Coordinate) -> Result<RawAirQuality, FetchError> {
        self.get_at("air pollution", "air_pollution", at, false).await
    }

    async fn geocode(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<RawGeocodingResult>, FetchError> {
        let url = format!("{}/direct", self.endpoints.geo_url.trim_end_matches('/'));
        let limit = limit.to_string();
        self.get_json("geocoding", url, &[("q", query), ("limit", limit.as_str())])
            .await
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}

use crate::{
    Config,
    error::FetchError,
    model::Coordinate,
    provider::openweather::OpenWeatherProvider,
    raw::{RawAirQuality, RawCurrentConditions, RawForecast, RawGeocodingResult},
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod openweather;

/// Raw access to the weather provider. Each call is one HTTP round trip.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, at: Coordinate) -> Result<RawCurrentConditions, FetchError>;

    async fn forecast(&self, at: Coordinate) -> Result<RawForecast, FetchError>;

    async fn air_quality(&self, at: Coordinate) -> Result<RawAirQuality, FetchError>;

    async fn geocode(&self, query: &str, limit: usize)
    -> Result<Vec<RawGeocodingResult>, FetchError>;
}

#[async_trait]
impl<P: WeatherProvider + ?Sized> WeatherProvider for Arc<P> {
    async fn current(&self, at: Coordinate) -> Result<RawCurrentConditions, FetchError> {
        (**self).current(at).await
    }

    async fn forecast(&self, at: Coordinate) -> Result<RawForecast, FetchError> {
        (**self).forecast(at).await
    }

    async fn air_quality(&self, at: Coordinate) -> Result<RawAirQuality, FetchError> {
        (**self).air_quality(at).await
    }

    async fn geocode(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<RawGeocodingResult>, FetchError> {
        (**self).geocode(query, limit).await
    }
}

/// Construct the OpenWeather client from the stored credential and endpoints.
pub fn provider_from_config(config: &Config) -> anyhow::Result<OpenWeatherProvider> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No OpenWeatherMap API key configured.\n\
                 Hint: run `weather-dashboard configure` and enter your API key."
        )
    })?;

    Ok(OpenWeatherProvider::with_endpoints(
        api_key.to_owned(),
        config.endpoints(),
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn provider_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = provider_from_config(&cfg).unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("No OpenWeatherMap API key configured"));
        assert!(msg.contains("Hint: run `weather-dashboard configure`"));
    }

    #[test]
    fn provider_from_config_uses_endpoint_overrides() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY").unwrap();
        cfg.base_url = Some("http://127.0.0.1:9999/data/2.5".into());

        let provider = provider_from_config(&cfg).expect("configured provider");
        assert_eq!(provider.endpoints().base_url, "http://127.0.0.1:9999/data/2.5");
        assert_eq!(provider.endpoints().geo_url, openweather::DEFAULT_GEO_URL);
    }
}

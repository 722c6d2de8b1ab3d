use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::{
    error::{FetchError, WeatherError},
    model::{CanonicalWeather, Coordinate, SearchLocation},
    normalize::normalize,
    provider::WeatherProvider,
};

pub const MAX_SEARCH_RESULTS: usize = 5;

/// Fetches and normalizes weather for a coordinate.
#[derive(Debug, Clone)]
pub struct WeatherService<P> {
    provider: P,
}

impl<P: WeatherProvider> WeatherService<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub async fn fetch(&self, at: Coordinate) -> Result<CanonicalWeather, WeatherError> {
        self.fetch_at(at, Utc::now()).await
    }

    /// Like [`fetch`](Self::fetch) with an explicit "now" for day/night.
    ///
    /// Current conditions and forecast are required. Air quality is best effort
    /// and is left out of the result when its request fails.
    pub async fn fetch_at(
        &self,
        at: Coordinate,
        now: DateTime<Utc>,
    ) -> Result<CanonicalWeather, WeatherError> {
        debug!(%at, "fetching weather");

        let (current, forecast, air_quality) = tokio::join!(
            self.provider.current(at),
            self.provider.forecast(at),
            self.provider.air_quality(at),
        );

        let current = current?;
        let forecast = forecast?;
        let air_quality = match air_quality {
            Ok(aq) => Some(aq),
            Err(e) => {
                warn!("Air quality data not available: {e}");
                None
            }
        };

        Ok(normalize(&current, &forecast, air_quality.as_ref(), now)?)
    }

    /// Up to five places matching `query`. A blank query matches nothing.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchLocation>, FetchError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let results = self.provider.geocode(query, MAX_SEARCH_RESULTS).await?;
        debug!(query, found = results.len(), "geocoding finished");

        Ok(results
            .into_iter()
            .take(MAX_SEARCH_RESULTS)
            .map(|r| SearchLocation {
                name: r.name,
                country: r.country,
                state: r.state,
                coordinate: Coordinate::new(r.lat, r.lon),
            })
            .collect())
    }
}

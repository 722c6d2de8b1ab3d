//! Provider-shaped payloads, one per OpenWeather response.
//!
//! Fields the provider is known to omit are `Option`; the accessors turn an
//! absent field into a [`NormalizationError`] so the normalizer never has to
//! guess.

use serde::Deserialize;

use crate::error::NormalizationError;

/// Body of `/data/2.5/weather`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCurrentConditions {
    pub coord: Option<RawCoord>,
    #[serde(default)]
    pub weather: Vec<RawCondition>,
    pub main: Option<RawMain>,
    /// Meters; missing when the station does not report it.
    pub visibility: Option<f64>,
    pub wind: Option<RawWind>,
    pub dt: Option<i64>,
    pub sys: Option<RawSys>,
    /// Shift from UTC in seconds.
    pub timezone: Option<i32>,
    pub name: Option<String>,
}

impl RawCurrentConditions {
    pub fn coord(&self) -> Result<&RawCoord, NormalizationError> {
        self.coord.as_ref().ok_or(NormalizationError::MissingField("coord"))
    }

    pub fn main(&self) -> Result<&RawMain, NormalizationError> {
        self.main.as_ref().ok_or(NormalizationError::MissingField("main"))
    }

    pub fn wind(&self) -> Result<&RawWind, NormalizationError> {
        self.wind.as_ref().ok_or(NormalizationError::MissingField("wind"))
    }

    pub fn condition(&self) -> Result<&RawCondition, NormalizationError> {
        self.weather.first().ok_or(NormalizationError::MissingField("weather"))
    }

    pub fn sunrise(&self) -> Result<i64, NormalizationError> {
        self.sys
            .as_ref()
            .and_then(|s| s.sunrise)
            .ok_or(NormalizationError::MissingField("sys.sunrise"))
    }

    pub fn sunset(&self) -> Result<i64, NormalizationError> {
        self.sys
            .as_ref()
            .and_then(|s| s.sunset)
            .ok_or(NormalizationError::MissingField("sys.sunset"))
    }

    pub fn country(&self) -> &str {
        self.sys.as_ref().and_then(|s| s.country.as_deref()).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RawCoord {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCondition {
    /// Group name, e.g. "Rain".
    pub main: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMain {
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: f64,
    pub pressure: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawWind {
    /// m/s
    pub speed: f64,
    /// Omitted in calm conditions.
    pub deg: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSys {
    pub country: Option<String>,
    pub sunrise: Option<i64>,
    pub sunset: Option<i64>,
}

/// Body of `/data/2.5/forecast`: 3-hourly samples for five days.
#[derive(Debug, Clone, Deserialize)]
pub struct RawForecast {
    #[serde(default)]
    pub list: Vec<RawForecastEntry>,
    pub city: Option<RawCity>,
}

impl RawForecast {
    pub fn timezone(&self) -> Option<i32> {
        self.city.as_ref().and_then(|c| c.timezone)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCity {
    pub name: Option<String>,
    pub country: Option<String>,
    pub timezone: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawForecastEntry {
    /// Unix seconds.
    pub dt: i64,
    pub main: Option<RawSampleMain>,
    #[serde(default)]
    pub weather: Vec<RawCondition>,
    /// Probability of precipitation, 0..=1.
    pub pop: Option<f64>,
}

impl RawForecastEntry {
    pub fn temp(&self) -> Result<f64, NormalizationError> {
        self.main
            .as_ref()
            .map(|m| m.temp)
            .ok_or(NormalizationError::MissingField("list[].main"))
    }

    pub fn condition(&self) -> Result<&RawCondition, NormalizationError> {
        self.weather.first().ok_or(NormalizationError::MissingField("list[].weather"))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSampleMain {
    pub temp: f64,
}

/// Body of `/data/2.5/air_pollution`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawAirQuality {
    #[serde(default)]
    pub list: Vec<RawAirQualitySample>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawAirQualitySample {
    pub main: RawAqiIndex,
    #[serde(default)]
    pub components: RawPollutants,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RawAqiIndex {
    pub aqi: u8,
}

/// μg/m³
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawPollutants {
    pub co: f64,
    pub no2: f64,
    pub o3: f64,
    pub pm2_5: f64,
    pub pm10: f64,
}

/// One element of the `/geo/1.0/direct` array.
#[derive(Debug, Clone, Deserialize)]
pub struct RawGeocodingResult {
    pub name: String,
    #[serde(default)]
    pub country: String,
    pub state: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::LocationError;

/// A WGS84 position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Build a coordinate from user input, rejecting values outside the globe.
    pub fn try_new(lat: f64, lon: f64) -> Result<Self, LocationError> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(LocationError::Other(format!(
                "latitude {lat} is outside -90..=90"
            )));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(LocationError::Other(format!(
                "longitude {lon} is outside -180..=180"
            )));
        }
        Ok(Self::new(lat, lon))
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.lat, self.lon)
    }
}

/// One geocoding match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchLocation {
    pub name: String,
    pub country: String,
    pub state: Option<String>,
    pub coordinate: Coordinate,
}

impl SearchLocation {
    /// "Springfield, Illinois, US" style label for pickers.
    pub fn label(&self) -> String {
        match &self.state {
            Some(state) if !state.is_empty() => {
                format!("{}, {}, {}", self.name, state, self.country)
            }
            _ => format!("{}, {}", self.name, self.country),
        }
    }
}

/// The provider-agnostic weather view produced by the normalizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalWeather {
    pub location: LocationInfo,
    pub current: CurrentConditions,
    pub air_quality: Option<AirQuality>,
    pub astronomy: Astronomy,
    pub forecast: Vec<ForecastDay>,
}

impl CanonicalWeather {
    pub fn theme(&self) -> WeatherTheme {
        WeatherTheme::from_condition(&self.current.condition, self.current.is_day)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationInfo {
    pub name: String,
    pub country: String,
    pub coordinate: Coordinate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// °C
    pub temp: i32,
    pub feels_like: i32,
    /// %
    pub humidity: u8,
    /// hPa
    pub pressure: u32,
    /// km/h
    pub wind_speed: i32,
    /// Degrees, meteorological.
    pub wind_direction: u16,
    /// km
    pub visibility: i32,
    /// Not offered by the free tier; always 0.
    pub uv_index: u8,
    pub condition: String,
    pub description: String,
    pub icon: String,
    pub is_day: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirQuality {
    /// 1 (good) ..= 5 (very poor)
    pub aqi: u8,
    pub co: f64,
    pub no2: f64,
    pub o3: f64,
    pub pm2_5: f64,
    pub pm10: f64,
}

impl AirQuality {
    pub fn level(&self) -> AqiLevel {
        AqiLevel::from_index(self.aqi)
    }
}

/// Sunrise and sunset as `HH:MM` in the location's local time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Astronomy {
    pub sunrise: String,
    pub sunset: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub day: DaySummary,
    pub hours: Vec<HourlyForecast>,
}

/// Headline values for a forecast day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySummary {
    pub max_temp: i32,
    pub min_temp: i32,
    pub condition: String,
    pub icon: String,
    pub chance_of_rain: u8,
    pub chance_of_snow: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyForecast {
    pub time: DateTime<Utc>,
    pub temp: i32,
    pub condition: String,
    pub icon: String,
    pub chance_of_rain: u8,
}

/// Background category derived from the current condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherTheme {
    #[default]
    Sunny,
    Cloudy,
    Rainy,
    Snowy,
    Stormy,
    Night,
}

impl WeatherTheme {
    /// Map a provider condition (`"Clear"`, `"Rain"`, ...) to a theme.
    /// Night always wins over the condition.
    pub fn from_condition(condition: &str, is_day: bool) -> Self {
        if !is_day {
            return WeatherTheme::Night;
        }

        match condition.to_lowercase().as_str() {
            "clear" => WeatherTheme::Sunny,
            "clouds" => WeatherTheme::Cloudy,
            "rain" | "drizzle" => WeatherTheme::Rainy,
            "snow" => WeatherTheme::Snowy,
            "thunderstorm" => WeatherTheme::Stormy,
            _ => WeatherTheme::Cloudy,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherTheme::Sunny => "sunny",
            WeatherTheme::Cloudy => "cloudy",
            WeatherTheme::Rainy => "rainy",
            WeatherTheme::Snowy => "snowy",
            WeatherTheme::Stormy => "stormy",
            WeatherTheme::Night => "night",
        }
    }
}

impl fmt::Display for WeatherTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AqiLevel {
    Good,
    Fair,
    Moderate,
    Poor,
    VeryPoor,
    Unknown,
}

impl AqiLevel {
    pub fn from_index(aqi: u8) -> Self {
        match aqi {
            1 => AqiLevel::Good,
            2 => AqiLevel::Fair,
            3 => AqiLevel::Moderate,
            4 => AqiLevel::Poor,
            5 => AqiLevel::VeryPoor,
            _ => AqiLevel::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AqiLevel::Good => "Good",
            AqiLevel::Fair => "Fair",
            AqiLevel::Moderate => "Moderate",
            AqiLevel::Poor => "Poor",
            AqiLevel::VeryPoor => "Very Poor",
            AqiLevel::Unknown => "Unknown",
        }
    }
}

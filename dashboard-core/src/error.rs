//! Error types for the dashboard core.
//!
//! Each stage of a load has its own error enum so callers can tell a denied
//! location apart from a provider outage. [`WeatherError`] wraps all of them
//! and knows how to phrase itself for a notification.

use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Failures while obtaining a position from the device.
#[derive(Debug, Error)]
pub enum LocationError {
    #[error("Location services are not available on this device")]
    Unavailable,

    #[error("Location permission denied")]
    Denied,

    #[error("Location request timed out")]
    Timeout,

    #[error("Location error: {0}")]
    Other(String),
}

/// Failures while talking to the weather provider.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to send request to OpenWeather ({endpoint}): {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("OpenWeather {endpoint} request failed with status {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("Failed to parse OpenWeather {endpoint} JSON: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    /// HTTP status of the failed response, if the request got that far.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            FetchError::Transport { source, .. } => source.status(),
            FetchError::Decode { .. } => None,
        }
    }
}

/// A provider payload that could not be turned into the canonical model.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizationError {
    #[error("Provider response is missing required field `{0}`")]
    MissingField(&'static str),

    #[error("Provider response contains an out-of-range timestamp: {0}")]
    InvalidTimestamp(i64),
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Failed to write location cache {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize cached location: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Top-level error for a dashboard operation.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error(transparent)]
    Location(#[from] LocationError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Normalization(#[from] NormalizationError),

    #[error(transparent)]
    Cache(#[from] CacheError),
}

impl WeatherError {
    /// Short, non-technical message for a notification.
    pub fn user_message(&self) -> &'static str {
        match self {
            WeatherError::Location(LocationError::Denied) => {
                "Location access denied. Please search for a city."
            }
            WeatherError::Location(LocationError::Timeout) => {
                "Finding your location took too long. Please search for a city."
            }
            WeatherError::Location(_) => "Your location is not available. Please search for a city.",
            WeatherError::Fetch(e) if e.status() == Some(StatusCode::UNAUTHORIZED) => {
                "The API key was rejected. Run `weather-dashboard configure` to update it."
            }
            WeatherError::Fetch(_) => "Unable to reach the weather service. Please try again.",
            WeatherError::Normalization(_) => "The weather service returned unexpected data.",
            WeatherError::Cache(_) => "Unable to remember the last location.",
        }
    }
}

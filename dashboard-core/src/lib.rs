//! Core library for the weather dashboard.
//!
//! This crate defines:
//! - Configuration & credential storage
//! - Device location and the last-location cache
//! - The OpenWeatherMap client behind the [`WeatherProvider`] seam
//! - Normalization of provider payloads into [`CanonicalWeather`]
//! - [`Dashboard`], which turns user actions into state updates and notices
//!
//! It is used by `dashboard-cli`, but can also back other front ends.

pub mod cache;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod location;
pub mod model;
pub mod normalize;
pub mod provider;
pub mod raw;
pub mod service;

pub use cache::{FileLocationCache, LocationCache, MemoryLocationCache};
pub use config::Config;
pub use dashboard::{Dashboard, DashboardState, Notice, NoticeKind};
pub use error::{CacheError, FetchError, LocationError, NormalizationError, WeatherError};
pub use location::{FixedLocator, LocateOptions, Locator};
pub use model::{
    AirQuality, AqiLevel, Astronomy, CanonicalWeather, Coordinate, CurrentConditions, DaySummary,
    ForecastDay, HourlyForecast, LocationInfo, SearchLocation, WeatherTheme,
};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider, provider_from_config};
pub use service::WeatherService;

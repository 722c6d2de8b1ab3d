//! The dashboard's view state and the user actions that change it.
//!
//! Every action finishes with a [`Notice`] instead of an error: failures are
//! reported to the user and the previously shown weather stays in place.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::{
    cache::LocationCache,
    error::WeatherError,
    location::{self, LocateOptions, Locator},
    model::{CanonicalWeather, Coordinate, SearchLocation, WeatherTheme},
    provider::WeatherProvider,
    service::WeatherService,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Info,
    Error,
}

/// A user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub description: String,
    /// What went wrong, phrased for the user.
    pub cause: Option<String>,
}

impl Notice {
    fn new(kind: NoticeKind, title: &str, description: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.to_string(),
            description: description.into(),
            cause: None,
        }
    }

    fn success(title: &str, description: impl Into<String>) -> Self {
        Self::new(NoticeKind::Success, title, description)
    }

    fn error(title: &str, description: impl Into<String>) -> Self {
        Self::new(NoticeKind::Error, title, description)
    }

    fn caused_by(mut self, err: &WeatherError) -> Self {
        self.cause = Some(err.user_message().to_string());
        self
    }

    fn info(title: &str, description: impl Into<String>) -> Self {
        Self::new(NoticeKind::Info, title, description)
    }

    fn superseded() -> Self {
        Self::info("Update skipped", "A newer request finished first.")
    }

    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }
}

/// Everything the presentation layer renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    pub weather: Option<CanonicalWeather>,
    pub theme: WeatherTheme,
    pub search_results: Vec<SearchLocation>,
}

#[derive(Debug, Default)]
struct Inner {
    view: DashboardState,
    /// Generation of the fetch currently on display.
    applied: u64,
}

pub struct Dashboard<P, C> {
    service: WeatherService<P>,
    cache: C,
    locate: LocateOptions,
    inner: Mutex<Inner>,
    generation: AtomicU64,
}

impl<P: WeatherProvider, C: LocationCache> Dashboard<P, C> {
    pub fn new(service: WeatherService<P>, cache: C) -> Self {
        Self {
            service,
            cache,
            locate: LocateOptions::default(),
            inner: Mutex::new(Inner::default()),
            generation: AtomicU64::new(0),
        }
    }

    pub fn with_locate_options(mut self, options: LocateOptions) -> Self {
        self.locate = options;
        self
    }

    pub fn state(&self) -> DashboardState {
        self.inner.lock().view.clone()
    }

    pub fn weather(&self) -> Option<CanonicalWeather> {
        self.inner.lock().view.weather.clone()
    }

    pub fn theme(&self) -> WeatherTheme {
        self.inner.lock().view.theme
    }

    pub fn search_results(&self) -> Vec<SearchLocation> {
        self.inner.lock().view.search_results.clone()
    }

    /// Locate the device and show its weather, falling back to the last
    /// cached coordinate when locating or fetching fails.
    pub async fn load_current_location(&self, locator: &dyn Locator) -> Notice {
        match self.locate_and_fetch(locator).await {
            Ok(Some(name)) => Notice::success("Location found!", format!("Weather loaded for {name}")),
            Ok(None) => Notice::superseded(),
            Err(e) => {
                warn!("Error loading weather: {e}");
                self.load_cached_location(&e).await
            }
        }
    }

    async fn locate_and_fetch(&self, locator: &dyn Locator) -> Result<Option<String>, WeatherError> {
        let at = location::resolve(locator, &self.locate).await?;
        self.fetch_and_apply(at).await
    }

    async fn load_cached_location(&self, original: &WeatherError) -> Notice {
        let Some(at) = self.cache.load() else {
            return Notice::error(
                "Location access denied",
                "Please search for a city to view weather.",
            )
            .caused_by(original);
        };

        match self.fetch_and_apply(at).await {
            Ok(Some(name)) => {
                Notice::success("Using cached location", format!("Weather loaded for {name}"))
            }
            Ok(None) => Notice::superseded(),
            Err(e) => {
                warn!("Error loading weather for cached location {at}: {e}");
                Notice::error("Error", "Unable to load weather data. Please search for a city.")
                    .caused_by(&e)
            }
        }
    }

    /// Look up places; results land in [`DashboardState::search_results`].
    ///
    /// Returns a notice only when there is something to tell.
    pub async fn search(&self, query: &str) -> Option<Notice> {
        if query.trim().is_empty() {
            return None;
        }

        match self.service.search(query).await {
            Ok(results) => {
                let empty = results.is_empty();
                self.inner.lock().view.search_results = results;
                empty.then(|| Notice::info("No results", "No cities found matching your search."))
            }
            Err(e) => {
                warn!("Error searching locations: {e}");
                let e = WeatherError::from(e);
                Some(
                    Notice::error("Search failed", "Unable to search for cities. Please try again.")
                        .caused_by(&e),
                )
            }
        }
    }

    pub async fn select_location(&self, place: &SearchLocation) -> Notice {
        self.inner.lock().view.search_results.clear();

        match self.fetch_and_apply(place.coordinate).await {
            Ok(Some(name)) => {
                Notice::success("Location updated!", format!("Weather loaded for {name}"))
            }
            Ok(None) => Notice::superseded(),
            Err(e) => {
                warn!("Error loading weather for {}: {e}", place.label());
                Notice::error("Error", "Unable to load weather for this location.").caused_by(&e)
            }
        }
    }

    /// Re-fetch the location on display. `None` when nothing is loaded yet.
    pub async fn refresh(&self) -> Option<Notice> {
        let at = self.inner.lock().view.weather.as_ref()?.location.coordinate;

        let notice = match self.fetch_and_apply(at).await {
            Ok(Some(_)) => Notice::success("Weather updated!", "Latest weather data loaded."),
            Ok(None) => Notice::superseded(),
            Err(e) => {
                warn!("Error refreshing weather: {e}");
                Notice::error("Refresh failed", "Unable to refresh weather data.").caused_by(&e)
            }
        };
        Some(notice)
    }

    /// Fetch weather for `at` and put it on display unless a fetch started
    /// later has already been shown. Returns the location name when applied.
    async fn fetch_and_apply(&self, at: Coordinate) -> Result<Option<String>, WeatherError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let weather = self.service.fetch(at).await?;
        let name = weather.location.name.clone();

        {
            let mut inner = self.inner.lock();
            if generation <= inner.applied {
                debug!(generation, applied = inner.applied, "dropping superseded weather");
                return Ok(None);
            }
            inner.applied = generation;
            inner.view.theme = weather.theme();
            inner.view.weather = Some(weather);

            // Under the lock so the cache follows the same order as the view.
            if let Err(e) = self.cache.store(&at) {
                warn!("{e}");
            }
        }

        info!(%at, location = %name, "weather loaded");
        Ok(Some(name))
    }
}

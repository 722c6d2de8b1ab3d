//! Device positioning.
//!
//! A [`Locator`] wraps whatever position source the host offers. [`resolve`]
//! adds the timeout so individual locators don't have to.

use std::{fmt::Debug, time::Duration};

use async_trait::async_trait;
use tracing::debug;

use crate::{error::LocationError, model::Coordinate};

pub const DEFAULT_LOCATE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocateOptions {
    pub timeout: Duration,
    pub high_accuracy: bool,
}

impl Default for LocateOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_LOCATE_TIMEOUT,
            high_accuracy: true,
        }
    }
}

#[async_trait]
pub trait Locator: Send + Sync + Debug {
    async fn locate(&self, options: &LocateOptions) -> Result<Coordinate, LocationError>;
}

/// Ask `locator` for a position, giving up after `options.timeout`.
pub async fn resolve(
    locator: &dyn Locator,
    options: &LocateOptions,
) -> Result<Coordinate, LocationError> {
    debug!(?locator, ?options, "resolving device location");

    match tokio::time::timeout(options.timeout, locator.locate(options)).await {
        Ok(result) => result,
        Err(_) => Err(LocationError::Timeout),
    }
}

/// A position known up front, e.g. from command-line flags.
///
/// Without one it behaves like a host with no positioning at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedLocator {
    position: Option<Coordinate>,
}

impl FixedLocator {
    pub fn new(position: Coordinate) -> Self {
        Self {
            position: Some(position),
        }
    }

    pub fn unavailable() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Locator for FixedLocator {
    async fn locate(&self, _options: &LocateOptions) -> Result<Coordinate, LocationError> {
        self.position.ok_or(LocationError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Silent;

    #[async_trait]
    impl Locator for Silent {
        async fn locate(&self, _options: &LocateOptions) -> Result<Coordinate, LocationError> {
            std::future::pending().await
        }
    }

    #[derive(Debug)]
    struct Declines;

    #[async_trait]
    impl Locator for Declines {
        async fn locate(&self, _options: &LocateOptions) -> Result<Coordinate, LocationError> {
            Err(LocationError::Denied)
        }
    }

    /// Only answers when asked for a precise fix.
    #[derive(Debug)]
    struct PreciseOnly;

    #[async_trait]
    impl Locator for PreciseOnly {
        async fn locate(&self, options: &LocateOptions) -> Result<Coordinate, LocationError> {
            if options.high_accuracy {
                Ok(Coordinate::new(51.5, -0.12))
            } else {
                Err(LocationError::Other("coarse fix requested".into()))
            }
        }
    }

    #[tokio::test]
    async fn resolve_forwards_accuracy_preference() {
        let got = resolve(&PreciseOnly, &LocateOptions::default()).await.unwrap();
        assert_eq!(got, Coordinate::new(51.5, -0.12));

        let coarse = LocateOptions {
            high_accuracy: false,
            ..LocateOptions::default()
        };
        let err = resolve(&PreciseOnly, &coarse).await.unwrap_err();
        assert!(matches!(err, LocationError::Other(_)));
    }

    #[test]
    fn defaults_request_high_accuracy_within_ten_seconds() {
        let options = LocateOptions::default();
        assert!(options.high_accuracy);
        assert_eq!(options.timeout, Duration::from_secs(10));
    }

    #[tokio::test]
    async fn fixed_locator_returns_position() {
        let here = Coordinate::new(51.5, -0.12);
        let got = resolve(&FixedLocator::new(here), &LocateOptions::default()).await.unwrap();
        assert_eq!(got, here);
    }

    #[tokio::test]
    async fn missing_position_is_unavailable() {
        let err = resolve(&FixedLocator::unavailable(), &LocateOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, LocationError::Unavailable));
    }

    #[tokio::test]
    async fn denial_is_passed_through() {
        let err = resolve(&Declines, &LocateOptions::default()).await.unwrap_err();
        assert!(matches!(err, LocationError::Denied));
    }

    #[tokio::test]
    async fn silent_locator_times_out() {
        let options = LocateOptions {
            timeout: Duration::from_millis(20),
            ..LocateOptions::default()
        };
        let err = resolve(&Silent, &options).await.unwrap_err();
        assert!(matches!(err, LocationError::Timeout));
    }
}

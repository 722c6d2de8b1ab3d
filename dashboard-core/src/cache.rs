//! Last-known coordinate, used when the device cannot locate itself.

use std::{fs, path::PathBuf};

use parking_lot::Mutex;
use tracing::warn;

use crate::{config::project_dirs, error::CacheError, model::Coordinate};

pub trait LocationCache: Send + Sync {
    /// The last stored coordinate. Unreadable entries count as absent.
    fn load(&self) -> Option<Coordinate>;

    /// Replace the stored coordinate.
    fn store(&self, coordinate: &Coordinate) -> Result<(), CacheError>;
}

/// JSON file holding `{"lat": .., "lon": ..}`.
#[derive(Debug, Clone)]
pub struct FileLocationCache {
    path: PathBuf,
}

impl FileLocationCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `last_location.json` in the platform cache directory.
    pub fn default_location() -> anyhow::Result<Self> {
        Ok(Self::new(project_dirs()?.cache_dir().join("last_location.json")))
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl LocationCache for FileLocationCache {
    fn load(&self) -> Option<Coordinate> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!("Failed to read location cache {}: {}", self.path.display(), e);
                return None;
            }
        };

        match serde_json::from_str(&contents) {
            Ok(coordinate) => Some(coordinate),
            Err(e) => {
                warn!("Ignoring corrupt location cache {}: {}", self.path.display(), e);
                None
            }
        }
    }

    fn store(&self, coordinate: &Coordinate) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| CacheError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let json = serde_json::to_string(coordinate)?;
        fs::write(&self.path, json).map_err(|source| CacheError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

#[derive(Debug, Default)]
pub struct MemoryLocationCache {
    slot: Mutex<Option<Coordinate>>,
}

impl MemoryLocationCache {
    pub fn with(coordinate: Coordinate) -> Self {
        Self {
            slot: Mutex::new(Some(coordinate)),
        }
    }
}

impl LocationCache for MemoryLocationCache {
    fn load(&self) -> Option<Coordinate> {
        *self.slot.lock()
    }

    fn store(&self, coordinate: &Coordinate) -> Result<(), CacheError> {
        *self.slot.lock() = Some(*coordinate);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_cache_roundtrip_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileLocationCache::new(dir.path().join("sub").join("last_location.json"));

        assert_eq!(cache.load(), None);

        cache.store(&Coordinate::new(51.5, -0.12)).unwrap();
        assert_eq!(cache.load(), Some(Coordinate::new(51.5, -0.12)));

        cache.store(&Coordinate::new(48.85, 2.35)).unwrap();
        assert_eq!(cache.load(), Some(Coordinate::new(48.85, 2.35)));

        let raw = fs::read_to_string(cache.path()).unwrap();
        assert_eq!(raw, r#"{"lat":48.85,"lon":2.35}"#);
    }

    #[test]
    fn corrupt_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("last_location.json");
        fs::write(&path, "{not json").unwrap();

        assert_eq!(FileLocationCache::new(path).load(), None);
    }

    #[test]
    fn memory_cache_last_writer_wins() {
        let cache = MemoryLocationCache::default();
        assert_eq!(cache.load(), None);

        cache.store(&Coordinate::new(1.0, 2.0)).unwrap();
        cache.store(&Coordinate::new(3.0, 4.0)).unwrap();
        assert_eq!(cache.load(), Some(Coordinate::new(3.0, 4.0)));
    }
}

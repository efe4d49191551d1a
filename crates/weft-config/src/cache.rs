//! Shared, swappable configuration.

use crate::loader::{ConfigError, ConfigLoader};
use crate::schema::Config;
use arc_swap::ArcSwap;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Current configuration behind an [`ArcSwap`].
///
/// Readers take an `Arc` snapshot and never block writers. A failed reload
/// leaves the previous configuration in place.
#[derive(Debug)]
pub struct ConfigCache {
    current: ArcSwap<Config>,
}

impl ConfigCache {
    /// Cache holding `config`.
    pub fn new(config: Config) -> Self {
        Self {
            current: ArcSwap::from_pointee(config),
        }
    }

    /// Snapshot of the current configuration.
    pub fn snapshot(&self) -> Arc<Config> {
        self.current.load_full()
    }

    /// Replace the whole configuration.
    pub fn replace(&self, config: Config) {
        self.current.store(Arc::new(config));
    }

    /// Load, override, and validate `path`, then publish the result.
    pub fn reload<P: AsRef<Path>>(&self, path: P) -> Result<Arc<Config>, ConfigError> {
        let path = path.as_ref();
        match ConfigLoader::load_config(path) {
            Ok(config) => {
                self.replace(config);
                info!("Reloaded configuration from {}", path.display());
                Ok(self.snapshot())
            }
            Err(e) => {
                warn!("Keeping previous configuration: {}", e);
                Err(e)
            }
        }
    }
}

impl Default for ConfigCache {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_survives_replace() {
        let cache = ConfigCache::default();
        let before = cache.snapshot();

        let mut next = Config::default();
        next.i18n.base_locale = "de".to_string();
        cache.replace(next);

        assert_eq!(before.i18n.base_locale, "en");
        assert_eq!(cache.snapshot().i18n.base_locale, "de");
    }

    #[test]
    fn test_failed_reload_keeps_previous() {
        let mut config = Config::default();
        config.session.session_id = "s".to_string();
        let cache = ConfigCache::new(config);

        let missing = std::env::temp_dir().join("weft-missing-config.yaml");
        assert!(cache.reload(&missing).is_err());
        assert_eq!(cache.snapshot().session.session_id, "s");
    }
}

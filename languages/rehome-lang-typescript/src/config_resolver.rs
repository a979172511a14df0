//! Alias-configuration lookup with per-project caching
//!
//! Maps a source file to the nearest tsconfig.json / jsconfig.json above it
//! and to that config's fully resolved [`ConfigInfo`]. Both lookups are
//! cached on the resolver instance; [`ConfigResolver::clear`] drops them
//! together.

use crate::paths::normalize;
use crate::tsconfig::{parse_config, ConfigInfo};
use dashmap::DashMap;
use once_cell::sync::OnceCell;
use rehome_foundation::ConfigError;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Filenames and markers that drive the upward config search
#[derive(Debug, Clone)]
pub struct ConfigResolverOptions {
    /// Checked first in every directory
    pub primary_config: String,
    /// Used when the primary file is absent from the same directory
    pub fallback_config: String,
    /// The search does not continue above a directory containing this entry
    pub boundary_marker: String,
}

impl Default for ConfigResolverOptions {
    fn default() -> Self {
        Self {
            primary_config: "tsconfig.json".to_string(),
            fallback_config: "jsconfig.json".to_string(),
            boundary_marker: ".git".to_string(),
        }
    }
}

type ParsedConfig = Result<Arc<ConfigInfo>, ConfigError>;

/// Resolves and caches alias configuration for source files
#[derive(Debug, Default)]
pub struct ConfigResolver {
    options: ConfigResolverOptions,
    /// Config path → parse result. The per-key cell makes concurrent
    /// first queries for one config parse it only once.
    configs: DashMap<PathBuf, Arc<OnceCell<ParsedConfig>>>,
    /// Queried file → config path it resolved to (None: no config found)
    file_configs: DashMap<PathBuf, Option<PathBuf>>,
}

impl ConfigResolver {
    pub fn new(options: ConfigResolverOptions) -> Self {
        Self {
            options,
            configs: DashMap::new(),
            file_configs: DashMap::new(),
        }
    }

    pub fn options(&self) -> &ConfigResolverOptions {
        &self.options
    }

    /// Configuration governing `file`, or `None` when there is none or it
    /// could not be resolved. Failures are logged, never returned.
    pub fn find_config_for_file(&self, file: &Path) -> Option<Arc<ConfigInfo>> {
        match self.try_find_config_for_file(file) {
            Ok(info) => info,
            Err(e) => {
                debug!(file = %file.display(), error = %e, "No usable alias configuration");
                None
            }
        }
    }

    /// Like [`find_config_for_file`](Self::find_config_for_file), but a
    /// circular `extends` chain is returned as an error. Read and parse
    /// failures still resolve to `Ok(None)`.
    pub fn try_find_config_for_file(
        &self,
        file: &Path,
    ) -> Result<Option<Arc<ConfigInfo>>, ConfigError> {
        let file = normalize(file);
        let Some(config_path) = self.config_path_for(&file) else {
            return Ok(None);
        };

        match self.load(&config_path) {
            Ok(info) => Ok(Some(info)),
            Err(e) if e.is_circular() => Err(e),
            Err(_) => Ok(None),
        }
    }

    /// Drop both caches
    pub fn clear(&self) {
        self.configs.clear();
        self.file_configs.clear();
        debug!("Alias configuration caches cleared");
    }

    /// Number of config files parsed (or attempted) so far
    pub fn cached_config_count(&self) -> usize {
        self.configs.len()
    }

    fn config_path_for(&self, file: &Path) -> Option<PathBuf> {
        if let Some(cached) = self.file_configs.get(file) {
            return cached.clone();
        }

        let found = self.find_nearest_config(file);
        self.file_configs.insert(file.to_path_buf(), found.clone());
        found
    }

    /// Walk up from the file's directory. Primary beats fallback within one
    /// directory; the search ends at the boundary marker or the root.
    fn find_nearest_config(&self, file: &Path) -> Option<PathBuf> {
        let start = file.parent()?;

        for dir in start.ancestors() {
            let primary = dir.join(&self.options.primary_config);
            if primary.is_file() {
                return Some(primary);
            }
            let fallback = dir.join(&self.options.fallback_config);
            if fallback.is_file() {
                return Some(fallback);
            }
            if dir.join(&self.options.boundary_marker).exists() {
                debug!(dir = %dir.display(), "Reached repository boundary without alias configuration");
                return None;
            }
        }

        None
    }

    fn load(&self, config_path: &Path) -> ParsedConfig {
        // Clone the cell out so the map shard is not locked while parsing
        let cell = Arc::clone(&self.configs.entry(config_path.to_path_buf()).or_default());

        cell.get_or_init(|| {
            let parsed = parse_config(config_path).map(Arc::new);
            if let Err(e) = &parsed {
                warn!(
                    config = %config_path.display(),
                    error = %e,
                    "Failed to resolve alias configuration"
                );
            }
            parsed
        })
        .clone()
    }
}

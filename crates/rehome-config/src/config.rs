//! Configuration management for rehome

use rehome_foundation::{RehomeError, RehomeResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings files looked up in the project root, first found wins
pub const CONFIG_FILE_CANDIDATES: [&str; 2] = ["rehome.toml", ".rehome/config.toml"];

/// Prefix for environment variable overrides (`REHOME__LOGGING__LEVEL=debug`)
pub const ENV_PREFIX: &str = "REHOME__";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// Which files take part in a move or scan
    #[serde(default)]
    pub project: ProjectConfig,
    /// How alias-configuration files are located
    #[serde(default)]
    pub resolution: ResolutionConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Project discovery configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    /// File extensions (without the dot) scanned for imports
    pub extensions: Vec<String>,
    /// Honour `.gitignore` / `.ignore` files while walking the project
    pub respect_ignore: bool,
    /// Directory names that are never descended into
    pub skip_dirs: Vec<String>,
}

/// Alias-configuration lookup
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionConfig {
    /// Checked first in every directory on the way up
    pub primary_config: String,
    /// Used when the primary file is absent from a directory
    pub fallback_config: String,
    /// Entry marking a repository root; the upward search stops there
    pub boundary_marker: String,
}

/// Log output format
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format for development
    #[default]
    Pretty,
    /// Structured JSON format
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format
    pub format: LogFormat,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            extensions: ["ts", "tsx", "js", "jsx", "mjs", "cjs", "vue", "svelte"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            respect_ignore: true,
            skip_dirs: vec!["node_modules".to_string(), ".git".to_string()],
        }
    }
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            primary_config: "tsconfig.json".to_string(),
            fallback_config: "jsconfig.json".to_string(),
            boundary_marker: ".git".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl AppConfig {
    /// Load configuration for the project rooted at `project_root`
    ///
    /// Configuration is layered in the following priority order (highest to lowest):
    /// 1. Environment variables (REHOME__*)
    /// 2. `rehome.toml` or `.rehome/config.toml` in the project root
    /// 3. Default values
    pub fn load(project_root: &Path) -> RehomeResult<Self> {
        use figment::{
            providers::{Env, Format, Serialized, Toml},
            Figment,
        };

        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

        for candidate in CONFIG_FILE_CANDIDATES {
            let path = project_root.join(candidate);
            if path.is_file() {
                tracing::debug!(path = %path.display(), "Loading TOML configuration");
                figment = figment.merge(Toml::file(path));
                break;
            }
        }

        let figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: AppConfig = figment
            .extract()
            .map_err(|e| RehomeError::settings(format!("Failed to load configuration: {}", e)))?;

        config.validate()?;

        tracing::debug!(
            extensions = ?config.project.extensions,
            respect_ignore = config.project.respect_ignore,
            "Configuration loaded"
        );

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> RehomeResult<()> {
        if self.project.extensions.is_empty() {
            return Err(RehomeError::settings(
                "At least one file extension must be configured",
            ));
        }

        if self.project.extensions.iter().any(|ext| ext.starts_with('.')) {
            return Err(RehomeError::settings(
                "Extensions are written without a leading dot (\"ts\", not \".ts\")",
            ));
        }

        if self.resolution.primary_config.is_empty() || self.resolution.fallback_config.is_empty()
        {
            return Err(RehomeError::settings(
                "Alias configuration filenames cannot be empty",
            ));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(RehomeError::settings(format!(
                "Invalid log level '{}', must be one of: {}",
                self.logging.level,
                valid_levels.join(", ")
            )));
        }

        Ok(())
    }
}

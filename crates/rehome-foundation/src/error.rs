//! Error handling for rehome
//!
//! Two layers: [`ConfigError`] covers alias-configuration resolution and is
//! cheap to clone so it can sit inside the resolver cache; [`RehomeError`] is
//! what move and scan operations return to their callers.

use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure while resolving an alias-configuration file
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A config extends itself, directly or through intermediate configs.
    /// `chain` lists every visited config, ending with the repeated one.
    #[error("Circular extends detected: {}", ExtendsChain(.chain))]
    CircularExtends { chain: Vec<PathBuf> },

    #[error("Failed to read config {}: {message}", .path.display())]
    Read { path: PathBuf, message: String },

    #[error("Failed to parse config {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },
}

impl ConfigError {
    pub fn read(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Read {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// True for the one config failure that is fatal rather than recovered.
    pub fn is_circular(&self) -> bool {
        matches!(self, Self::CircularExtends { .. })
    }
}

struct ExtendsChain<'a>(&'a [PathBuf]);

impl fmt::Display for ExtendsChain<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, path) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{}", path.display())?;
        }
        Ok(())
    }
}

/// Core error type returned by move and scan operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum RehomeError {
    #[error("Source not found: {}", .path.display())]
    SourceNotFound { path: PathBuf },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Cannot move {} into itself ({})", .source_path.display(), .destination.display())]
    DestinationInsideSource {
        source_path: PathBuf,
        destination: PathBuf,
    },

    #[error("Invalid glob pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Failed to move {} to {}: {source}", .from.display(), .to.display())]
    PhysicalMove {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Settings error: {message}")]
    Settings { message: String },
}

impl RehomeError {
    /// Create a new source-not-found error
    pub fn source_not_found(path: impl Into<PathBuf>) -> Self {
        Self::SourceNotFound { path: path.into() }
    }

    pub fn destination_inside_source(
        source_path: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
    ) -> Self {
        Self::DestinationInsideSource {
            source_path: source_path.into(),
            destination: destination.into(),
        }
    }

    /// Create a new invalid pattern error
    pub fn invalid_pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    /// Create a new settings error
    pub fn settings(message: impl Into<String>) -> Self {
        Self::Settings {
            message: message.into(),
        }
    }

    /// Wrap an I/O failure together with the path it happened on
    pub fn io_at(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            message: format!("{}: {}", path.display(), source),
            path: Some(path.to_path_buf()),
            source: Some(source),
        }
    }
}

impl From<std::io::Error> for RehomeError {
    fn from(err: std::io::Error) -> Self {
        RehomeError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

/// Result type alias for convenience
pub type RehomeResult<T> = Result<T, RehomeError>;

//! Application settings for rehome: layered loading and logging setup.

pub mod config;
pub mod logging;

pub use config::{AppConfig, LogFormat, LoggingConfig, ProjectConfig, ResolutionConfig};

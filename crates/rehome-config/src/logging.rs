//! Logging setup for the rehome binary

use crate::{AppConfig, LogFormat};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Crates whose events follow the configured level; everything else
/// (directory walking, glob matching) is held at `warn`.
const OWN_CRATES: [&str; 5] = [
    "rehome",
    "rehome_config",
    "rehome_services",
    "rehome_lang_typescript",
    "rehome_foundation",
];

/// Install the global tracing subscriber.
///
/// `RUST_LOG`, when set, replaces the configured filter entirely.
/// `LOG_FORMAT=json|pretty` overrides the configured format. Events always
/// go to stderr: stdout carries the move or scan report.
///
/// ```bash
/// RUST_LOG=rehome_lang_typescript=trace rehome scan --unresolved-only
/// LOG_FORMAT=json rehome move "src/services/*.ts" src/core
/// ```
pub fn initialize(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&config.logging.level)));

    let format = format_override().unwrap_or_else(|| config.logging.format.clone());

    // A subscriber may already be installed when embedded or under test
    let installed = match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };

    if installed.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}

fn default_directives(level: &str) -> String {
    let mut directives = vec!["warn".to_string()];
    directives.extend(OWN_CRATES.iter().map(|krate| format!("{}={}", krate, level)));
    directives.join(",")
}

fn format_override() -> Option<LogFormat> {
    match std::env::var("LOG_FORMAT").ok()?.to_lowercase().as_str() {
        "json" => Some(LogFormat::Json),
        "pretty" | "human" => Some(LogFormat::Pretty),
        _ => None,
    }
}

//! Services for coordinating moves and scans over a project

pub mod discovery;
pub mod move_service;
pub mod report;
pub mod scan_service;

pub use discovery::{list_project_files, DiscoveryOptions, FileRecord};
pub use move_service::{MoveOptions, MoveService};
pub use report::{ItemReport, MoveReport};
pub use scan_service::{ScanEntry, ScanService};

use rehome_config::AppConfig;
use rehome_lang_typescript::{ConfigResolver, ConfigResolverOptions, SpecifierResolver};
use std::sync::Arc;

/// Specifier resolver with a fresh config cache, set up from `resolution.*`
pub(crate) fn build_resolver(config: &AppConfig) -> SpecifierResolver {
    let configs = ConfigResolver::new(ConfigResolverOptions {
        primary_config: config.resolution.primary_config.clone(),
        fallback_config: config.resolution.fallback_config.clone(),
        boundary_marker: config.resolution.boundary_marker.clone(),
    });
    SpecifierResolver::new(Arc::new(configs))
}

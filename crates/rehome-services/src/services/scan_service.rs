//! Read-only import inventory

use crate::services::build_resolver;
use crate::services::discovery::{list_project_files, DiscoveryOptions};
use rehome_config::AppConfig;
use rehome_foundation::{ImportKind, RehomeResult};
use rehome_lang_typescript::paths::normalize;
use rehome_lang_typescript::SpecifierResolver;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

/// One import and where it currently points
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanEntry {
    /// Project-relative path of the importing file
    pub file: PathBuf,
    pub line: usize,
    pub specifier: String,
    pub kind: ImportKind,
    /// Existing file or directory the specifier loads, if any
    pub resolved: Option<PathBuf>,
}

pub struct ScanService {
    resolver: SpecifierResolver,
    discovery: DiscoveryOptions,
}

impl ScanService {
    pub fn new(project_root: impl Into<PathBuf>, config: &AppConfig) -> Self {
        let project_root = normalize(&project_root.into());
        Self {
            discovery: DiscoveryOptions::from_config(project_root, config),
            resolver: build_resolver(config),
        }
    }

    /// Every import in the project, in file then offset order
    pub async fn scan(&self, unresolved_only: bool) -> RehomeResult<Vec<ScanEntry>> {
        let files = list_project_files(&self.discovery).await?;

        let mut entries = Vec::new();
        for file in &files {
            let mut imports: Vec<_> = file.imports.iter().collect();
            imports.sort_by_key(|import| import.start_offset);

            for import in imports {
                let resolved = self
                    .resolver
                    .resolve(&import.specifier, &file.absolute_path)
                    .filter(|path| path.exists());
                if unresolved_only && resolved.is_some() {
                    continue;
                }
                entries.push(ScanEntry {
                    file: file.relative_path.clone(),
                    line: import.line,
                    specifier: import.specifier.clone(),
                    kind: import.kind,
                    resolved,
                });
            }
        }

        info!(
            files = files.len(),
            imports = entries.len(),
            unresolved_only,
            "Scan complete"
        );
        Ok(entries)
    }
}

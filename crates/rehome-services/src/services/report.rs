//! Move reports
//!
//! Presentation-neutral aggregation of per-item results; the CLI renders
//! them as text or JSON.

use rehome_foundation::EditResult;
use serde::Serialize;
use std::path::PathBuf;

/// Outcome of moving one item (a literal source or one glob match)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemReport {
    pub source: PathBuf,
    /// Effective destination after directory placement
    pub destination: PathBuf,
    pub is_directory: bool,
    pub edits: Vec<EditResult>,
    /// False in dry-run mode or when the item failed
    pub moved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ItemReport {
    pub fn failed(source: PathBuf, destination: PathBuf, error: String) -> Self {
        Self {
            source,
            destination,
            is_directory: false,
            edits: Vec::new(),
            moved: false,
            error: Some(error),
        }
    }

    pub fn imports_updated(&self) -> usize {
        self.edits.iter().map(|edit| edit.updated_count).sum()
    }
}

/// Summary of one `move` invocation
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveReport {
    pub dry_run: bool,
    pub items: Vec<ItemReport>,
    /// Glob patterns that matched nothing
    pub unmatched_patterns: Vec<String>,
    pub files_updated: usize,
    pub imports_updated: usize,
    pub items_failed: usize,
}

impl MoveReport {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Self::default()
        }
    }

    /// Add an item and fold it into the totals
    pub fn record(&mut self, item: ItemReport) {
        self.files_updated += item.edits.len();
        self.imports_updated += item.imports_updated();
        if item.error.is_some() {
            self.items_failed += 1;
        }
        self.items.push(item);
    }

    /// Edit result for a file, by its post-move path, across all items
    pub fn edits_for(&self, file_path: &std::path::Path) -> Vec<&EditResult> {
        self.items
            .iter()
            .flat_map(|item| item.edits.iter())
            .filter(|edit| edit.file_path == file_path)
            .collect()
    }
}

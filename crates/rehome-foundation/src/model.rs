//! Shared model types passed between the scanner, resolver and move service.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How an import-like construct loads its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportKind {
    /// Declarations, re-exports and `require(...)` calls
    Static,
    /// `import(...)` expressions
    Dynamic,
}

/// One move step: relocate `from` to `to`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveSpec {
    pub from: PathBuf,
    pub to: PathBuf,
    pub is_directory: bool,
}

impl MoveSpec {
    pub fn new(from: impl Into<PathBuf>, to: impl Into<PathBuf>, is_directory: bool) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            is_directory,
        }
    }
}

/// A single rewritten specifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineChange {
    pub line: usize,
    pub from: String,
    pub to: String,
}

/// All specifier rewrites applied to one file during a move step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditResult {
    /// Location of the file once the move step has completed
    pub file_path: PathBuf,
    pub updated_count: usize,
    pub changes: Vec<LineChange>,
}

impl EditResult {
    pub fn new(file_path: impl Into<PathBuf>, changes: Vec<LineChange>) -> Self {
        Self {
            file_path: file_path.into(),
            updated_count: changes.len(),
            changes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_edit_result_serializes_camel_case() {
        let result = EditResult::new(
            "/p/src/pages/Home.vue",
            vec![LineChange {
                line: 3,
                from: "@/components/Button.vue".to_string(),
                to: "@/shared/Button.vue".to_string(),
            }],
        );

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "filePath": "/p/src/pages/Home.vue",
                "updatedCount": 1,
                "changes": [
                    { "line": 3, "from": "@/components/Button.vue", "to": "@/shared/Button.vue" }
                ]
            })
        );
    }
}

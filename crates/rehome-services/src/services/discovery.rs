//! Project file discovery
//!
//! Walks the project with `ignore::WalkBuilder`, then reads and scans the
//! matching files concurrently. The resulting [`FileRecord`]s are a snapshot:
//! every move step takes a fresh one.

use rehome_config::AppConfig;
use rehome_foundation::{RehomeError, RehomeResult};
use rehome_lang_typescript::{parse_imports, ImportRecord};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Which files take part in discovery
#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    pub root: PathBuf,
    /// Extensions without the leading dot
    pub extensions: Vec<String>,
    /// Honour `.gitignore` / `.ignore` files
    pub respect_ignore: bool,
    /// Directory names never descended into
    pub skip_dirs: Vec<String>,
}

impl DiscoveryOptions {
    pub fn from_config(root: impl Into<PathBuf>, config: &AppConfig) -> Self {
        Self {
            root: root.into(),
            extensions: config.project.extensions.clone(),
            respect_ignore: config.project.respect_ignore,
            skip_dirs: config.project.skip_dirs.clone(),
        }
    }
}

/// A scanned project file
#[derive(Debug, Clone)]
pub struct FileRecord {
    pub absolute_path: PathBuf,
    pub relative_path: PathBuf,
    pub extension: String,
    pub content: String,
    pub imports: Vec<ImportRecord>,
}

/// Read and scan every project file with a configured extension.
///
/// Files that cannot be read (binary content, permissions) are skipped with
/// a warning. Results are sorted by path.
pub async fn list_project_files(options: &DiscoveryOptions) -> RehomeResult<Vec<FileRecord>> {
    let walk_options = options.clone();
    let paths = tokio::task::spawn_blocking(move || collect_paths(&walk_options))
        .await
        .map_err(|e| RehomeError::Io {
            message: format!("File discovery task failed: {}", e),
            path: Some(options.root.clone()),
            source: None,
        })?;

    debug!(count = paths.len(), root = %options.root.display(), "Discovered project files");

    let root = Arc::new(options.root.clone());
    let mut join_set = JoinSet::new();

    for path in paths {
        let root = Arc::clone(&root);
        join_set.spawn(async move {
            let content = match tokio::fs::read_to_string(&path).await {
                Ok(content) => content,
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "Skipping unreadable file");
                    return None;
                }
            };
            let imports = parse_imports(&path, &content);
            Some(FileRecord {
                relative_path: path.strip_prefix(root.as_path()).unwrap_or(&path).to_path_buf(),
                extension: path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .unwrap_or_default()
                    .to_string(),
                absolute_path: path,
                content,
                imports,
            })
        });
    }

    let mut records = Vec::new();
    while let Some(result) = join_set.join_next().await {
        match result {
            Ok(Some(record)) => records.push(record),
            Ok(None) => {}
            Err(e) => {
                tracing::error!("File scan task failed: {}", e);
            }
        }
    }

    records.sort_by(|a, b| a.absolute_path.cmp(&b.absolute_path));
    Ok(records)
}

fn collect_paths(options: &DiscoveryOptions) -> Vec<PathBuf> {
    let skip_dirs = options.skip_dirs.clone();
    let walker = ignore::WalkBuilder::new(&options.root)
        .hidden(false)
        .git_ignore(options.respect_ignore)
        .git_exclude(options.respect_ignore)
        .git_global(false)
        .ignore(options.respect_ignore)
        .parents(options.respect_ignore)
        .require_git(false)
        .filter_entry(move |entry| {
            let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
            !(is_dir
                && entry.depth() > 0
                && entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| skip_dirs.iter().any(|skip| skip == name)))
        })
        .build();

    walker
        .flatten()
        .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
        .map(|entry| entry.into_path())
        .filter(|path| has_extension(path, &options.extensions))
        .collect()
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|wanted| wanted == ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rehome_test_support::TestWorkspace;

    fn options(workspace: &TestWorkspace) -> DiscoveryOptions {
        DiscoveryOptions::from_config(workspace.path(), &AppConfig::default())
    }

    fn relative_paths(records: &[FileRecord]) -> Vec<String> {
        records
            .iter()
            .map(|r| r.relative_path.to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[tokio::test]
    async fn test_lists_source_files_with_imports() {
        let workspace = TestWorkspace::new();
        workspace.create_file("src/main.ts", "import { a } from './a'\n");
        workspace.create_file("src/a.ts", "export const a = 1\n");
        workspace.create_file("src/App.vue", "<script setup>\nimport B from './B.vue'\n</script>\n");
        workspace.create_file("README.md", "# readme\n");

        let records = list_project_files(&options(&workspace)).await.unwrap();

        assert_eq!(relative_paths(&records), vec!["src/App.vue", "src/a.ts", "src/main.ts"]);
        let main = &records[2];
        assert_eq!(main.extension, "ts");
        assert_eq!(main.imports.len(), 1);
        assert_eq!(main.imports[0].specifier, "./a");
    }

    #[tokio::test]
    async fn test_skip_dirs_and_gitignore() {
        let workspace = TestWorkspace::new();
        workspace.create_file("node_modules/vue/index.js", "");
        workspace.create_file("dist/bundle.js", "");
        workspace.create_file(".gitignore", "dist/\n");
        workspace.create_file("src/main.ts", "");

        let records = list_project_files(&options(&workspace)).await.unwrap();
        assert_eq!(relative_paths(&records), vec!["src/main.ts"]);

        let mut no_ignore = options(&workspace);
        no_ignore.respect_ignore = false;
        let records = list_project_files(&no_ignore).await.unwrap();
        assert_eq!(relative_paths(&records), vec!["dist/bundle.js", "src/main.ts"]);
    }

    #[tokio::test]
    async fn test_extension_filter() {
        let workspace = TestWorkspace::new();
        workspace.create_file("src/main.ts", "");
        workspace.create_file("src/legacy.js", "");

        let mut ts_only = options(&workspace);
        ts_only.extensions = vec!["ts".to_string()];
        let records = list_project_files(&ts_only).await.unwrap();
        assert_eq!(relative_paths(&records), vec!["src/main.ts"]);
    }
}

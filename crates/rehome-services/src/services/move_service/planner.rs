//! Impact analysis and specifier rewriting for one move step

use crate::services::discovery::FileRecord;
use rehome_foundation::{EditResult, LineChange, MoveSpec};
use rehome_lang_typescript::paths::is_at_or_under;
use rehome_lang_typescript::{update_imports_in_content, ImportEdit, SpecifierResolver};
use std::path::{Path, PathBuf};
use tracing::debug;

/// New content for one file, plus what changed
#[derive(Debug, Clone)]
pub struct PlannedEdit {
    /// Where the file lives now; rewritten content is written here
    pub current_path: PathBuf,
    pub new_content: String,
    pub result: EditResult,
}

/// Files affected by `spec`: files being relocated, and files with an
/// import that resolves into the moved item
pub fn analyze<'a>(
    files: &'a [FileRecord],
    spec: &MoveSpec,
    resolver: &SpecifierResolver,
) -> Vec<&'a FileRecord> {
    files
        .iter()
        .filter(|file| {
            is_at_or_under(&file.absolute_path, &spec.from)
                || file.imports.iter().any(|import| {
                    resolver
                        .resolve(&import.specifier, &file.absolute_path)
                        .is_some_and(|target| is_at_or_under(&target, &spec.from))
                })
        })
        .collect()
}

/// Compute the rewritten content of every flagged file. Files whose
/// specifiers all stay the same produce nothing.
pub fn rewrite(
    flagged: &[&FileRecord],
    spec: &MoveSpec,
    resolver: &SpecifierResolver,
) -> Vec<PlannedEdit> {
    flagged
        .iter()
        .filter_map(|file| plan_file(file, spec, resolver))
        .collect()
}

fn plan_file(file: &FileRecord, spec: &MoveSpec, resolver: &SpecifierResolver) -> Option<PlannedEdit> {
    let new_location = relocated_path(&file.absolute_path, spec);

    let mut edits = Vec::new();
    let mut changes = Vec::new();
    for import in &file.imports {
        let Some(new_specifier) = resolver.calculate_new_path(
            &import.specifier,
            &file.absolute_path,
            &spec.from,
            &spec.to,
            new_location.as_deref(),
        ) else {
            continue;
        };

        changes.push(LineChange {
            line: import.line,
            from: import.specifier.clone(),
            to: new_specifier.clone(),
        });
        edits.push(ImportEdit {
            record: import,
            new_specifier,
        });
    }

    if edits.is_empty() {
        return None;
    }

    debug!(
        file = %file.relative_path.display(),
        updates = edits.len(),
        "Planned import updates"
    );

    let new_content = update_imports_in_content(&file.content, &edits);
    let post_move_path = new_location.unwrap_or_else(|| file.absolute_path.clone());
    Some(PlannedEdit {
        current_path: file.absolute_path.clone(),
        new_content,
        result: EditResult::new(post_move_path, changes),
    })
}

/// Post-move location of `path` if the move carries it along
pub fn relocated_path(path: &Path, spec: &MoveSpec) -> Option<PathBuf> {
    let suffix = path.strip_prefix(&spec.from).ok()?;
    if suffix.as_os_str().is_empty() {
        Some(spec.to.clone())
    } else {
        Some(spec.to.join(suffix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::discovery::{list_project_files, DiscoveryOptions};
    use pretty_assertions::assert_eq;
    use rehome_config::AppConfig;
    use rehome_lang_typescript::ConfigResolver;
    use rehome_test_support::TestWorkspace;
    use std::sync::Arc;

    #[test]
    fn test_relocated_path() {
        let spec = MoveSpec::new("/p/src/store", "/p/src/state", true);
        assert_eq!(
            relocated_path(Path::new("/p/src/store/user.ts"), &spec),
            Some(PathBuf::from("/p/src/state/user.ts"))
        );
        assert_eq!(
            relocated_path(Path::new("/p/src/store"), &spec),
            Some(PathBuf::from("/p/src/state"))
        );
        assert_eq!(relocated_path(Path::new("/p/src/store-old/a.ts"), &spec), None);
    }

    #[tokio::test]
    async fn test_moved_file_and_its_importers_are_flagged() {
        let workspace = TestWorkspace::new();
        workspace.create_file("src/utils.ts", "import { cfg } from './config'\n");
        workspace.create_file("src/config.ts", "export const cfg = {}\n");
        workspace.create_file("src/main.ts", "import { u } from './utils'\n");
        workspace.create_file("src/other.ts", "import { cfg } from './config'\n");

        let files = list_project_files(&DiscoveryOptions::from_config(
            workspace.path(),
            &AppConfig::default(),
        ))
        .await
        .unwrap();
        let resolver = SpecifierResolver::new(Arc::new(ConfigResolver::default()));
        let spec = MoveSpec::new(
            workspace.absolute_path("src/utils.ts"),
            workspace.absolute_path("src/lib/utils.ts"),
            false,
        );

        let flagged = analyze(&files, &spec, &resolver);
        let flagged_paths: Vec<_> = flagged.iter().map(|f| f.absolute_path.clone()).collect();
        assert_eq!(
            flagged_paths,
            vec![workspace.absolute_path("src/main.ts"), workspace.absolute_path("src/utils.ts")]
        );

        let planned = rewrite(&flagged, &spec, &resolver);
        assert_eq!(planned.len(), 2);
        assert_eq!(planned[0].new_content, "import { u } from './lib/utils'\n");
        assert_eq!(planned[1].new_content, "import { cfg } from '../config'\n");
        assert_eq!(planned[1].current_path, workspace.absolute_path("src/utils.ts"));
        assert_eq!(planned[1].result.file_path, workspace.absolute_path("src/lib/utils.ts"));
    }
}

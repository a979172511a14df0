//! Move Service - relocates files and directories and rewrites the imports
//! that refer to them
//!
//! Each item runs the same pipeline:
//!
//! 1. Discover the source and compute the effective destination
//! 2. Analyze: snapshot the project and flag affected files
//! 3. Rewrite: correct specifiers in place, before anything moves
//! 4. Physical move (skipped in dry-run mode)
//!
//! Glob sources fan out into one pipeline per match, run strictly one after
//! another so each item sees the edits of the previous ones.

mod physical;
mod planner;

pub use physical::{merge_directory, relocate};
pub use planner::{analyze, relocated_path, rewrite, PlannedEdit};

use crate::services::build_resolver;
use crate::services::discovery::{list_project_files, DiscoveryOptions};
use crate::services::report::{ItemReport, MoveReport};
use rehome_config::AppConfig;
use rehome_foundation::{MoveSpec, RehomeError, RehomeResult};
use rehome_lang_typescript::paths::{is_at_or_under, normalize};
use rehome_lang_typescript::SpecifierResolver;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};
use tracing::{debug, info, warn};

/// Flags for a move invocation
#[derive(Debug, Clone, Default)]
pub struct MoveOptions {
    /// Compute and report everything, mutate nothing
    pub dry_run: bool,
}

/// How the destination of one item is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    /// Decide from the destination's shape on disk
    Auto,
    /// The destination is a directory the item goes into
    Into,
}

/// Move orchestrator for one project
pub struct MoveService {
    project_root: PathBuf,
    resolver: SpecifierResolver,
    discovery: DiscoveryOptions,
}

impl MoveService {
    /// Create a new MoveService
    pub fn new(project_root: impl Into<PathBuf>, config: &AppConfig) -> Self {
        let project_root = normalize(&project_root.into());
        Self {
            discovery: DiscoveryOptions::from_config(project_root.clone(), config),
            resolver: build_resolver(config),
            project_root,
        }
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn resolver(&self) -> &SpecifierResolver {
        &self.resolver
    }

    /// Move every source into `destination`.
    ///
    /// Literal sources fail fast: the first fatal error is returned and
    /// later sources are not attempted. Glob matches fail individually and
    /// are recorded in the report. With more than one source the destination
    /// is always treated as a directory.
    pub async fn move_paths(
        &self,
        sources: &[String],
        destination: &str,
        options: &MoveOptions,
    ) -> RehomeResult<MoveReport> {
        let mut report = MoveReport::new(options.dry_run);
        let trailing_separator = destination.ends_with('/') || destination.ends_with(MAIN_SEPARATOR);
        let destination = self.absolutize(destination);

        let literal_placement = if sources.len() > 1 || trailing_separator {
            Placement::Into
        } else {
            Placement::Auto
        };

        for source in sources {
            if is_glob(source) {
                self.move_glob(source, &destination, options, &mut report)
                    .await?;
            } else {
                let item = self
                    .move_item(&self.absolutize(source), &destination, literal_placement, options)
                    .await?;
                report.record(item);
            }
        }

        info!(
            items = report.items.len(),
            files_updated = report.files_updated,
            imports_updated = report.imports_updated,
            failed = report.items_failed,
            dry_run = options.dry_run,
            "Move complete"
        );

        Ok(report)
    }

    async fn move_glob(
        &self,
        pattern: &str,
        destination: &Path,
        options: &MoveOptions,
        report: &mut MoveReport,
    ) -> RehomeResult<()> {
        let matches = self.expand_glob(pattern, destination)?;
        if matches.is_empty() {
            info!(pattern, "Pattern matched nothing");
            report.unmatched_patterns.push(pattern.to_string());
            return Ok(());
        }

        info!(pattern, matches = matches.len(), "Expanded pattern");

        for source in matches {
            match self
                .move_item(&source, destination, Placement::Into, options)
                .await
            {
                Ok(item) => report.record(item),
                Err(e) => {
                    warn!(source = %source.display(), error = %e, "Item failed, continuing");
                    let target = placed_into(&source, destination);
                    report.record(ItemReport::failed(source, target, e.to_string()));
                }
            }
        }

        Ok(())
    }

    /// Matches of `pattern` under the project root, sorted. Matches nested
    /// inside another matched directory are dropped; they move with it. So
    /// are the destination itself and its ancestors, which cannot move into it.
    fn expand_glob(&self, pattern: &str, destination: &Path) -> RehomeResult<Vec<PathBuf>> {
        let absolute = self.project_root.join(pattern);
        let absolute = absolute.to_string_lossy();

        let entries = glob::glob(&absolute)
            .map_err(|e| RehomeError::invalid_pattern(pattern, e.msg))?;

        let mut matches: Vec<PathBuf> = entries
            .filter_map(|entry| match entry {
                Ok(path) => Some(normalize(&path)),
                Err(e) => {
                    warn!(pattern, error = %e, "Skipping unreadable match");
                    None
                }
            })
            .collect();
        matches.retain(|path| {
            let holds_destination = is_at_or_under(destination, path);
            if holds_destination {
                debug!(pattern, path = %path.display(), "Skipping match that holds the destination");
            }
            !holds_destination
        });
        matches.sort();

        let mut kept: Vec<PathBuf> = Vec::with_capacity(matches.len());
        for path in matches {
            if !kept.iter().any(|dir| path != *dir && path.starts_with(dir)) {
                kept.push(path);
            }
        }
        Ok(kept)
    }

    /// The full pipeline for one item
    async fn move_item(
        &self,
        source: &Path,
        destination: &Path,
        placement: Placement,
        options: &MoveOptions,
    ) -> RehomeResult<ItemReport> {
        // DiscoverSource
        let metadata = tokio::fs::metadata(source)
            .await
            .map_err(|_| RehomeError::source_not_found(source))?;
        let is_directory = metadata.is_dir();

        self.resolver
            .config_resolver()
            .try_find_config_for_file(source)?;

        let target = effective_destination(source, destination, placement);
        if target != source && is_at_or_under(&target, source) {
            return Err(RehomeError::destination_inside_source(source, target));
        }
        let spec = MoveSpec::new(source, target.clone(), is_directory);

        info!(
            source = %source.display(),
            destination = %target.display(),
            is_directory,
            "Moving"
        );

        // Analyze
        let files = list_project_files(&self.discovery).await?;
        let flagged = analyze(&files, &spec, &self.resolver);
        info!(scanned = files.len(), affected = flagged.len(), "Analyzed project");

        // Rewrite
        let planned = rewrite(&flagged, &spec, &self.resolver);
        if !options.dry_run {
            for edit in &planned {
                tokio::fs::write(&edit.current_path, &edit.new_content)
                    .await
                    .map_err(|e| RehomeError::io_at(&edit.current_path, e))?;
            }
        }

        // PhysicalMove
        if !options.dry_run {
            relocate(&spec.from, &spec.to, is_directory).await?;
            // Config files may have moved with the item
            self.resolver.config_resolver().clear();
        }

        Ok(ItemReport {
            source: spec.from,
            destination: spec.to,
            is_directory,
            edits: planned.into_iter().map(|edit| edit.result).collect(),
            moved: !options.dry_run,
            error: None,
        })
    }

    fn absolutize(&self, path: &str) -> PathBuf {
        normalize(&self.project_root.join(path))
    }
}

/// Where `source` ends up when moved to `destination`.
///
/// An existing directory receives the item under its own name. So does a
/// path that merely looks like a directory: no extension, with an existing
/// parent directory. Anything else is a plain rename.
fn effective_destination(source: &Path, destination: &Path, placement: Placement) -> PathBuf {
    let into = match placement {
        Placement::Into => true,
        Placement::Auto => {
            destination.is_dir()
                || (destination.extension().is_none()
                    && destination.parent().is_some_and(Path::is_dir))
        }
    };

    if into {
        placed_into(source, destination)
    } else {
        destination.to_path_buf()
    }
}

fn placed_into(source: &Path, destination: &Path) -> PathBuf {
    match source.file_name() {
        Some(name) => destination.join(name),
        None => destination.to_path_buf(),
    }
}

fn is_glob(source: &str) -> bool {
    source.contains(['*', '?', '['])
}

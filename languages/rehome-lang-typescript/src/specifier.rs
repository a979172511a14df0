//! Specifier resolution and rewriting
//!
//! [`SpecifierResolver::resolve`] maps a specifier written in some file to
//! the file it loads. [`SpecifierResolver::calculate_new_path`] computes the
//! replacement specifier once the target, the importer, or both move.

use crate::config_resolver::ConfigResolver;
use crate::paths::{
    has_source_extension, is_at_or_under, normalize, strip_source_extension, to_slash,
    with_appended, SOURCE_EXTENSIONS,
};
use crate::tsconfig::AliasRule;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::trace;

/// Resolves specifiers against the filesystem and alias configuration
#[derive(Debug, Clone)]
pub struct SpecifierResolver {
    configs: Arc<ConfigResolver>,
}

impl SpecifierResolver {
    pub fn new(configs: Arc<ConfigResolver>) -> Self {
        Self { configs }
    }

    pub fn config_resolver(&self) -> &Arc<ConfigResolver> {
        &self.configs
    }

    /// Absolute path `specifier` loads when written in `from_file`.
    ///
    /// Returns `None` when nothing on disk matches; such imports are simply
    /// not affected by moves. Absolute specifiers are returned normalized
    /// even when they do not exist.
    pub fn resolve(&self, specifier: &str, from_file: &Path) -> Option<PathBuf> {
        let specifier_path = Path::new(specifier);
        if specifier_path.is_absolute() {
            let normalized = normalize(specifier_path);
            return Some(locate(&normalized).unwrap_or(normalized));
        }

        let candidate = self
            .configs
            .find_config_for_file(from_file)
            .and_then(|config| {
                config
                    .matching_alias(specifier)
                    .map(|rule| expand_alias(rule, specifier))
            })
            .unwrap_or_else(|| {
                let dir = from_file.parent().unwrap_or_else(|| Path::new("/"));
                normalize(&dir.join(specifier))
            });

        let located = locate(&candidate);
        trace!(
            specifier,
            from = %from_file.display(),
            resolved = ?located,
            "Resolved specifier"
        );
        located
    }

    /// New specifier for `original` after `moved_from` was relocated to
    /// `moved_to`.
    ///
    /// `new_from_file` is the importer's own post-move location when the
    /// importer is relocated too. Returns `None` when the specifier does not
    /// resolve, is unaffected, or would come out unchanged.
    pub fn calculate_new_path(
        &self,
        original: &str,
        from_file: &Path,
        moved_from: &Path,
        moved_to: &Path,
        new_from_file: Option<&Path>,
    ) -> Option<String> {
        let resolved = self.resolve(original, from_file)?;
        let moved_from = normalize(moved_from);
        let moved_to = normalize(moved_to);

        let nested = is_at_or_under(&resolved, &moved_from);
        if !nested && new_from_file.is_none() {
            return None;
        }

        let new_target = if nested {
            let suffix = resolved.strip_prefix(&moved_from).ok()?;
            if suffix.as_os_str().is_empty() {
                moved_to
            } else {
                moved_to.join(suffix)
            }
        } else {
            resolved.clone()
        };

        let importer = normalize(new_from_file.unwrap_or(from_file));
        let mut rewritten = self
            .alias_form(original, from_file, &importer, &new_target)
            .unwrap_or_else(|| {
                if Path::new(original).is_absolute() {
                    to_slash(&new_target)
                } else {
                    relative_specifier(&importer, &new_target)
                }
            });

        if strip_source_extension(original).is_none() {
            if let Some(stripped) = strip_source_extension(&rewritten) {
                rewritten = stripped.to_string();
            }
        }

        if resolved_to_index(&resolved) && !names_index(original) {
            if let Some(dir) = rewritten.strip_suffix("/index") {
                if !dir.is_empty() && dir != "." {
                    rewritten = dir.to_string();
                }
            }
        }

        (rewritten != original).then_some(rewritten)
    }

    /// Alias spelling of `target`, for specifiers that were written with an
    /// alias. The alias already used is preferred; otherwise the importer's
    /// most specific alias covering the target is used.
    fn alias_form(
        &self,
        original: &str,
        from_file: &Path,
        importer: &Path,
        target: &Path,
    ) -> Option<String> {
        let original_config = self.configs.find_config_for_file(from_file)?;
        let used = original_config.matching_alias(original)?;

        if let Some(spelled) = spell_with_alias(used, target) {
            return Some(spelled);
        }

        let importer_config = self.configs.find_config_for_file(importer)?;
        importer_config
            .aliases
            .iter()
            .find_map(|rule| spell_with_alias(rule, target))
    }
}

fn expand_alias(rule: &AliasRule, specifier: &str) -> PathBuf {
    let remainder = specifier[rule.alias.len()..].trim_start_matches('/');
    if remainder.is_empty() {
        rule.target_dir.clone()
    } else {
        normalize(&rule.target_dir.join(remainder))
    }
}

fn spell_with_alias(rule: &AliasRule, target: &Path) -> Option<String> {
    let rest = target.strip_prefix(&rule.target_dir).ok()?;
    let spelled = if rest.as_os_str().is_empty() {
        rule.alias.clone()
    } else {
        format!("{}/{}", rule.alias, to_slash(rest))
    };
    Some(spelled)
}

/// Path from the importer's directory to `target`, always starting with
/// `./` or `../`
fn relative_specifier(importer: &Path, target: &Path) -> String {
    let base = importer.parent().unwrap_or_else(|| Path::new("/"));
    let relative = pathdiff::diff_paths(target, base)
        .map(|path| to_slash(&path))
        .unwrap_or_else(|| to_slash(target));

    if relative.is_empty() {
        ".".to_string()
    } else if relative == ".."
        || relative.starts_with("./")
        || relative.starts_with("../")
        || relative.starts_with('/')
    {
        relative
    } else {
        format!("./{relative}")
    }
}

/// Find the concrete file behind a resolved path: the path itself, the path
/// with a source extension appended, or a directory's index file. A
/// directory without an index file resolves to the directory.
fn locate(path: &Path) -> Option<PathBuf> {
    if path.is_file() {
        return Some(path.to_path_buf());
    }

    if !has_source_extension(path) {
        for ext in SOURCE_EXTENSIONS {
            let candidate = with_appended(path, &format!(".{ext}"));
            if candidate.is_file() {
                return Some(candidate);
            }
        }
    }

    if path.is_dir() {
        for ext in SOURCE_EXTENSIONS {
            let candidate = path.join(format!("index.{ext}"));
            if candidate.is_file() {
                return Some(candidate);
            }
        }
        return Some(path.to_path_buf());
    }

    None
}

fn resolved_to_index(resolved: &Path) -> bool {
    resolved.file_stem().and_then(|stem| stem.to_str()) == Some("index")
        && has_source_extension(resolved)
}

fn names_index(specifier: &str) -> bool {
    let base = strip_source_extension(specifier).unwrap_or(specifier);
    base == "index" || base.ends_with("/index")
}

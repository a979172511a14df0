//! Path helpers shared by the resolvers
//!
//! All comparisons in this crate are lexical: paths are cleaned (`.`/`..`
//! folded) but never canonicalized, so a symlinked project root keeps the
//! spelling the caller used.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Extensions probed, in order, when a specifier omits one
pub const SOURCE_EXTENSIONS: [&str; 8] = ["ts", "tsx", "js", "jsx", "mjs", "cjs", "vue", "svelte"];

/// Lexically normalize a path
pub fn normalize(path: &Path) -> PathBuf {
    path_clean::clean(path)
}

/// Render a path with forward slashes
pub fn to_slash(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// `path` is `base` itself or lies somewhere below it
pub fn is_at_or_under(path: &Path, base: &Path) -> bool {
    path == base || path.starts_with(base)
}

/// Append `suffix` to the final component without touching any existing extension
pub fn with_appended(path: &Path, suffix: &str) -> PathBuf {
    let mut raw: OsString = path.as_os_str().to_owned();
    raw.push(suffix);
    PathBuf::from(raw)
}

pub fn has_source_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}

/// Drop a known source extension from the last segment of a specifier
pub fn strip_source_extension(specifier: &str) -> Option<&str> {
    let segment_start = specifier.rfind('/').map_or(0, |idx| idx + 1);
    let dot = specifier[segment_start..].rfind('.')? + segment_start;
    if dot == segment_start {
        return None;
    }
    let ext = &specifier[dot + 1..];
    SOURCE_EXTENSIONS
        .contains(&ext)
        .then(|| &specifier[..dot])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_at_or_under_is_component_wise() {
        let base = Path::new("/proj/src/components");
        assert!(is_at_or_under(Path::new("/proj/src/components"), base));
        assert!(is_at_or_under(Path::new("/proj/src/components/Button.vue"), base));
        assert!(!is_at_or_under(Path::new("/proj/src/components-old/Button.vue"), base));
    }

    #[test]
    fn test_with_appended_keeps_inner_dots() {
        let path = with_appended(Path::new("/proj/src/Button.styles"), ".ts");
        assert_eq!(path, PathBuf::from("/proj/src/Button.styles.ts"));
    }

    #[test]
    fn test_strip_source_extension() {
        assert_eq!(strip_source_extension("../helpers/utils.ts"), Some("../helpers/utils"));
        assert_eq!(strip_source_extension("@/shared/Button.vue"), Some("@/shared/Button"));
        assert_eq!(strip_source_extension("./data.json"), None);
        assert_eq!(strip_source_extension("../"), None);
        assert_eq!(strip_source_extension("./.eslintrc"), None);
    }

    #[test]
    fn test_normalize_folds_dot_segments() {
        assert_eq!(
            normalize(Path::new("/proj/src/pages/../components/./Button.vue")),
            PathBuf::from("/proj/src/components/Button.vue")
        );
    }
}

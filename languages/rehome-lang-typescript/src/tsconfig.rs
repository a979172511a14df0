//! TypeScript Configuration Parser
//!
//! Parses tsconfig.json / jsconfig.json files, follows their `extends` chain
//! and turns `compilerOptions.paths` into an ordered list of [`AliasRule`]s.

use crate::paths::{normalize, with_appended};
use indexmap::IndexMap;
use rehome_foundation::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Filename assumed when an `extends` or `references` entry names a directory
const DEFAULT_CONFIG_NAME: &str = "tsconfig.json";

/// A prefix token that stands for an absolute directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasRule {
    /// `@` for a `"@/*"` pattern, `@components` for `"@components/*"`
    pub alias: String,
    /// Absolute, normalized directory the token expands to
    pub target_dir: PathBuf,
}

/// Fully resolved configuration for one config file
#[derive(Debug, Clone)]
pub struct ConfigInfo {
    pub config_path: PathBuf,
    /// Absolute directory that alias targets are resolved against
    pub base_url: PathBuf,
    /// Effective `compilerOptions.paths` after the `extends` chain
    pub raw_path_map: IndexMap<String, Vec<String>>,
    /// Sorted by descending alias length; the sort is stable
    pub aliases: Vec<AliasRule>,
    pub extends_path: Option<PathBuf>,
    pub references: Option<Vec<String>>,
}

impl ConfigInfo {
    /// Most specific alias rule that `specifier` uses, if any
    pub fn matching_alias(&self, specifier: &str) -> Option<&AliasRule> {
        self.aliases
            .iter()
            .find(|rule| specifier_uses_alias(specifier, &rule.alias))
    }
}

/// `specifier` is exactly `alias` or continues it with a `/`
pub fn specifier_uses_alias(specifier: &str, alias: &str) -> bool {
    match specifier.strip_prefix(alias) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Represents a parsed config file, before inheritance is applied.
/// Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct TsConfigFile {
    extends: Option<Extends>,
    #[serde(rename = "compilerOptions")]
    compiler_options: CompilerOptions,
    references: Option<Vec<ProjectReference>>,
}

/// `extends` is a single reference, or (TypeScript 5+) a list applied in order
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Extends {
    Single(String),
    Many(Vec<String>),
}

impl Extends {
    fn entries(&self) -> &[String] {
        match self {
            Extends::Single(entry) => std::slice::from_ref(entry),
            Extends::Many(entries) => entries,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct CompilerOptions {
    #[serde(rename = "baseUrl")]
    base_url: Option<String>,
    /// Uses IndexMap to keep declaration order for equal-length aliases
    paths: Option<IndexMap<String, Vec<String>>>,
}

#[derive(Debug, Clone, Deserialize)]
struct ProjectReference {
    path: String,
}

/// Compiler options accumulated along an `extends` chain. Child values
/// replace parent values key by key; `paths` is replaced as a whole.
#[derive(Debug, Clone)]
struct Inherited {
    /// Absolute; resolved against the config that declared it
    base_url: Option<PathBuf>,
    paths: Option<IndexMap<String, Vec<String>>>,
    /// Directory of the config that declared `paths`
    paths_dir: PathBuf,
    extends_path: Option<PathBuf>,
    references: Option<Vec<String>>,
}

/// Parse a config file, resolving its `extends` chain and, when it declares
/// no aliases of its own, harvesting aliases from its project references.
pub fn parse_config(path: &Path) -> Result<ConfigInfo, ConfigError> {
    load_config(path, true)
}

fn load_config(path: &Path, harvest_references: bool) -> Result<ConfigInfo, ConfigError> {
    let config_path = normalize(path);
    let mut chain = Vec::new();
    let inherited = load_inherited(&config_path, &mut chain)?;

    let config_dir = parent_dir(&config_path);
    let base_url = inherited.base_url.clone().unwrap_or(config_dir);
    let alias_base = inherited
        .base_url
        .clone()
        .unwrap_or_else(|| inherited.paths_dir.clone());
    let raw_path_map = inherited.paths.unwrap_or_default();

    let mut aliases = extract_aliases(&raw_path_map, &alias_base);

    if aliases.is_empty() && harvest_references {
        if let Some(references) = &inherited.references {
            aliases = harvest_reference_aliases(&config_path, references);
        }
    }

    // Stable: equal-length aliases keep declaration order
    aliases.sort_by(|a, b| b.alias.len().cmp(&a.alias.len()));

    debug!(
        config = %config_path.display(),
        alias_count = aliases.len(),
        "Resolved alias configuration"
    );

    Ok(ConfigInfo {
        config_path,
        base_url,
        raw_path_map,
        aliases,
        extends_path: inherited.extends_path,
        references: inherited.references,
    })
}

/// Walk the `extends` chain depth-first. `chain` holds the configs currently
/// being resolved; meeting one of them again is a cycle and is reported
/// before the file is read a second time.
fn load_inherited(path: &Path, chain: &mut Vec<PathBuf>) -> Result<Inherited, ConfigError> {
    if chain.iter().any(|visited| visited == path) {
        let mut cycle = chain.clone();
        cycle.push(path.to_path_buf());
        return Err(ConfigError::CircularExtends { chain: cycle });
    }
    chain.push(path.to_path_buf());

    let file = read_config_file(path)?;
    let config_dir = parent_dir(path);

    let mut inherited = Inherited {
        base_url: None,
        paths: None,
        paths_dir: config_dir.clone(),
        extends_path: None,
        references: None,
    };

    if let Some(extends) = &file.extends {
        for reference in extends.entries() {
            match resolve_extends(&config_dir, reference) {
                Some(parent_path) => {
                    let parent = load_inherited(&parent_path, chain)?;
                    if parent.base_url.is_some() {
                        inherited.base_url = parent.base_url;
                    }
                    if parent.paths.is_some() {
                        inherited.paths = parent.paths;
                        inherited.paths_dir = parent.paths_dir;
                    }
                    inherited.extends_path.get_or_insert(parent_path);
                }
                None => {
                    warn!(
                        config = %path.display(),
                        extends = %reference,
                        "Could not resolve extended config, continuing without it"
                    );
                }
            }
        }
    }

    if let Some(base_url) = &file.compiler_options.base_url {
        inherited.base_url = Some(normalize(&config_dir.join(base_url)));
    }
    if let Some(paths) = file.compiler_options.paths {
        inherited.paths = Some(paths);
        inherited.paths_dir = config_dir;
    }
    // References are never inherited
    inherited.references = file
        .references
        .map(|refs| refs.into_iter().map(|r| r.path).collect());

    chain.pop();
    Ok(inherited)
}

fn read_config_file(path: &Path) -> Result<TsConfigFile, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::read(path, e.to_string()))?;
    parse_config_text(&raw).map_err(|e| ConfigError::parse(path, e.to_string()))
}

fn parse_config_text(raw: &str) -> Result<TsConfigFile, serde_json::Error> {
    let content = strip_trailing_commas(&strip_json_comments(raw));
    if content.trim().is_empty() {
        return Ok(TsConfigFile::default());
    }
    serde_json::from_str(&content)
}

/// Locate the file an `extends` entry points at.
///
/// Relative and absolute entries are joined to the config's directory,
/// with `.json` appended when the literal path is missing. Anything else is
/// a package reference, looked up in `node_modules` of every ancestor.
fn resolve_extends(config_dir: &Path, reference: &str) -> Option<PathBuf> {
    let reference_path = Path::new(reference);
    if reference.starts_with('.') || reference_path.is_absolute() {
        return config_file_at(&normalize(&config_dir.join(reference_path)));
    }

    config_dir.ancestors().find_map(|ancestor| {
        config_file_at(&ancestor.join("node_modules").join(reference_path))
    })
}

fn config_file_at(candidate: &Path) -> Option<PathBuf> {
    if candidate.is_file() {
        return Some(candidate.to_path_buf());
    }
    let with_json = with_appended(candidate, ".json");
    if with_json.is_file() {
        return Some(with_json);
    }
    let nested = candidate.join(DEFAULT_CONFIG_NAME);
    nested.is_file().then_some(nested)
}

/// Turn `paths` entries into alias rules. Only the first target of each
/// pattern is used; a repeated alias token keeps its first declaration.
fn extract_aliases(paths: &IndexMap<String, Vec<String>>, base: &Path) -> Vec<AliasRule> {
    let mut aliases: Vec<AliasRule> = Vec::with_capacity(paths.len());

    for (pattern, targets) in paths {
        let alias = strip_wildcard(pattern);
        if alias.is_empty() {
            debug!(pattern = %pattern, "Skipping catch-all path pattern");
            continue;
        }
        let Some(target) = targets.first() else {
            continue;
        };
        if aliases.iter().any(|rule| rule.alias == alias) {
            continue;
        }

        aliases.push(AliasRule {
            alias: alias.to_string(),
            target_dir: normalize(&base.join(strip_wildcard(target))),
        });
    }

    aliases
}

fn strip_wildcard(pattern: &str) -> &str {
    pattern
        .strip_suffix("/*")
        .or_else(|| pattern.strip_suffix('*'))
        .unwrap_or(pattern)
}

/// Monorepo support: collect aliases declared by referenced projects.
/// Missing or broken references are skipped.
fn harvest_reference_aliases(config_path: &Path, references: &[String]) -> Vec<AliasRule> {
    let config_dir = parent_dir(config_path);
    let mut harvested: Vec<AliasRule> = Vec::new();

    for reference in references {
        let target = normalize(&config_dir.join(reference));
        let referenced = if target.is_dir() {
            target.join(DEFAULT_CONFIG_NAME)
        } else {
            target
        };

        match load_config(&referenced, false) {
            Ok(info) => {
                for rule in info.aliases {
                    if !harvested.iter().any(|existing| existing.alias == rule.alias) {
                        harvested.push(rule);
                    }
                }
            }
            Err(e) => {
                warn!(
                    config = %config_path.display(),
                    reference = %referenced.display(),
                    error = %e,
                    "Skipping unusable project reference"
                );
            }
        }
    }

    harvested
}

fn parent_dir(path: &Path) -> PathBuf {
    path.parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("/"))
}

/// Strip JSON comments from content
///
/// tsconfig.json allows `//` and `/* */` comments. Comment markers inside
/// string literals are kept; newlines ending line comments are kept so error
/// positions stay meaningful.
pub fn strip_json_comments(content: &str) -> String {
    let mut result = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();
    let mut in_string = false;
    let mut escaped = false;

    while let Some(ch) = chars.next() {
        if in_string {
            result.push(ch);
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match (ch, chars.peek()) {
            ('"', _) => {
                in_string = true;
                result.push(ch);
            }
            ('/', Some('/')) => {
                for next in chars.by_ref() {
                    if next == '\n' {
                        result.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for next in chars.by_ref() {
                    if prev == '*' && next == '/' {
                        break;
                    }
                    if next == '\n' {
                        result.push('\n');
                    }
                    prev = next;
                }
            }
            _ => result.push(ch),
        }
    }

    result
}

/// Remove commas that directly precede a closing `}` or `]`
pub fn strip_trailing_commas(content: &str) -> String {
    let chars: Vec<char> = content.chars().collect();
    let mut result = String::with_capacity(content.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, &ch) in chars.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            result.push(ch);
            continue;
        }

        if ch == '"' {
            in_string = true;
        } else if ch == ',' {
            let next = chars[i + 1..].iter().find(|c| !c.is_whitespace());
            if matches!(next, Some('}') | Some(']')) {
                continue;
            }
        }
        result.push(ch);
    }

    result
}

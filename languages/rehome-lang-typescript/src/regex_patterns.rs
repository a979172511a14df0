//! Shared regex patterns for TypeScript/JavaScript import recognition
//!
//! Every pattern captures the specifier through one of three named groups,
//! `sq`, `dq` or `bq`, one per quote style; see [`quoted_specifier`].

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// One string literal whose closing quote matches its opening quote
const QUOTED: &str = r#"(?:'(?P<sq>[^'\n]*)'|"(?P<dq>[^"\n]*)"|`(?P<bq>[^`\n]*)`)"#;

/// Binding clause of an import declaration: namespace, default, named list
/// or default plus named list / namespace
const BINDINGS: &str = r"(?:\*[ \t]*as[ \t]+[\w$]+|[\w$]+(?:[ \t]*,[ \t]*(?:\{[^}]*\}|\*[ \t]*as[ \t]+[\w$]+))?|\{[^}]*\})";

/// Import declaration starting a line and ending at end of line
/// Matches: import Button from './Button.vue';
/// Matches: import type { Props } from "@/types"
/// Matches: import './styles.css'
///
/// A named list may span several lines; the statement still has to start
/// a line and its literal has to end one.
pub static STATIC_IMPORT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?m)^[ \t]*import[ \t]+(?:type[ \t]+)?(?:{BINDINGS}[ \t]*from[ \t]*)?{QUOTED}[ \t]*;?[ \t]*\r?$"
    ))
    .expect("static import regex should be valid")
});

/// Re-export declaration
/// Matches: export * from './utils'
/// Matches: export { a, b as c } from '../lib'
/// Matches: export * as helpers from "./helpers"
pub static RE_EXPORT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?m)^[ \t]*export[ \t]+(?:type[ \t]+)?(?:\*(?:[ \t]*as[ \t]+[\w$]+)?|\{{[^}}]*\}})[ \t]*from[ \t]*{QUOTED}[ \t]*;?[ \t]*\r?$"
    ))
    .expect("re-export regex should be valid")
});

/// Dynamic import pattern: import('module')
/// Matches: const Page = () => import('./Page.vue')
pub static DYNAMIC_IMPORT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"\bimport[ \t]*\(\s*{QUOTED}\s*\)"))
        .expect("dynamic import regex should be valid")
});

/// CommonJS require pattern: require('module')
/// Matches: const fs = require("fs")
pub static REQUIRE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"\brequire[ \t]*\(\s*{QUOTED}\s*\)"))
        .expect("require regex should be valid")
});

/// The specifier captured by any pattern in this module.
///
/// Template literals with `${...}` interpolation are not static specifiers
/// and yield `None`.
pub fn quoted_specifier<'t>(caps: &Captures<'t>) -> Option<&'t str> {
    if let Some(m) = caps.name("sq").or_else(|| caps.name("dq")) {
        return Some(m.as_str());
    }
    caps.name("bq")
        .map(|m| m.as_str())
        .filter(|text| !text.contains("${"))
}

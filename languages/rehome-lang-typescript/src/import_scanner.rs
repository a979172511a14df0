//! Lexical import scanner
//!
//! Extracts import-like constructs with byte offsets into the whole file and
//! rewrites their specifiers in place. No syntax tree is built: the
//! recognizers in [`crate::regex_patterns`] define what counts as an import.

use crate::component::{script_regions, template_region, ComponentKind};
use crate::regex_patterns::{
    quoted_specifier, DYNAMIC_IMPORT_RE, REQUIRE_RE, RE_EXPORT_RE, STATIC_IMPORT_RE,
};
use memchr::memchr_iter;
use regex::Regex;
use rehome_foundation::ImportKind;
use serde::Serialize;
use std::path::Path;
use tracing::warn;

/// One import-like occurrence in a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRecord {
    /// Full matched text, from the first character of the construct
    pub original_text: String,
    pub specifier: String,
    /// Byte offset of `original_text` in the file
    pub start_offset: usize,
    /// Exclusive end offset
    pub end_offset: usize,
    pub kind: ImportKind,
    /// 1-based line of `start_offset`
    pub line: usize,
}

/// A planned specifier replacement for one record
#[derive(Debug, Clone)]
pub struct ImportEdit<'a> {
    pub record: &'a ImportRecord,
    pub new_specifier: String,
}

/// All import records of a file, dispatched on its extension.
///
/// For `.vue` and `.svelte` files only script regions (and the first
/// template region of `.vue` files, for `import(...)` only) are scanned.
pub fn parse_imports(path: &Path, content: &str) -> Vec<ImportRecord> {
    let Some(kind) = ComponentKind::from_path(path) else {
        return scan_source(content);
    };

    let mut records = Vec::new();
    for region in script_regions(content) {
        records.extend(relocate(scan_source(region.text), content, region.offset));
    }
    if kind.has_template_region() {
        if let Some(region) = template_region(content) {
            records.extend(relocate(scan_dynamic(region.text), content, region.offset));
        }
    }
    records
}

/// Plain-source scan: declarations, re-exports, `import(...)` and
/// `require(...)`, concatenated in that order
pub fn scan_source(text: &str) -> Vec<ImportRecord> {
    let mut records = collect(&STATIC_IMPORT_RE, text, ImportKind::Static);
    records.extend(collect(&RE_EXPORT_RE, text, ImportKind::Static));
    records.extend(collect(&DYNAMIC_IMPORT_RE, text, ImportKind::Dynamic));
    records.extend(collect(&REQUIRE_RE, text, ImportKind::Static));
    records
}

fn scan_dynamic(text: &str) -> Vec<ImportRecord> {
    collect(&DYNAMIC_IMPORT_RE, text, ImportKind::Dynamic)
}

fn collect(re: &Regex, text: &str, kind: ImportKind) -> Vec<ImportRecord> {
    re.captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let specifier = quoted_specifier(&caps)?;
            Some(ImportRecord {
                original_text: whole.as_str().to_string(),
                specifier: specifier.to_string(),
                start_offset: whole.start(),
                end_offset: whole.end(),
                kind,
                line: line_at(text, whole.start()),
            })
        })
        .collect()
}

/// Shift region-relative records into whole-file coordinates
fn relocate(records: Vec<ImportRecord>, content: &str, region_offset: usize) -> Vec<ImportRecord> {
    let lines_before = line_at(content, region_offset) - 1;
    records
        .into_iter()
        .map(|mut record| {
            record.start_offset += region_offset;
            record.end_offset += region_offset;
            record.line += lines_before;
            record
        })
        .collect()
}

fn line_at(text: &str, offset: usize) -> usize {
    memchr_iter(b'\n', &text.as_bytes()[..offset]).count() + 1
}

/// Apply `edits` to `content` in one pass.
///
/// Edits are applied from the highest start offset down, so the offsets of
/// the edits still pending stay valid. All records must come from a scan of
/// this exact `content`; an edit whose text no longer matches is skipped.
pub fn update_imports_in_content(content: &str, edits: &[ImportEdit<'_>]) -> String {
    let mut ordered: Vec<&ImportEdit<'_>> = edits.iter().collect();
    ordered.sort_by(|a, b| b.record.start_offset.cmp(&a.record.start_offset));

    let mut updated = content.to_string();
    for edit in ordered {
        let record = edit.record;
        if updated.get(record.start_offset..record.end_offset) != Some(record.original_text.as_str())
        {
            warn!(
                line = record.line,
                specifier = %record.specifier,
                "Import text changed since scan, skipping edit"
            );
            continue;
        }

        let Some(replacement) = replace_specifier(record, &edit.new_specifier) else {
            continue;
        };
        updated.replace_range(record.start_offset..record.end_offset, &replacement);
    }

    updated
}

/// `original_text` with its quoted specifier swapped, keeping the quote style.
/// The specifier literal is always the last quoted string in the text.
fn replace_specifier(record: &ImportRecord, new_specifier: &str) -> Option<String> {
    let text = &record.original_text;
    let (position, quote) = ['\'', '"', '`']
        .into_iter()
        .filter_map(|quote| {
            let needle = format!("{quote}{}{quote}", record.specifier);
            text.rfind(&needle).map(|position| (position, quote))
        })
        .max_by_key(|(position, _)| *position)?;

    let literal_len = record.specifier.len() + 2;
    let mut replaced = String::with_capacity(text.len() + new_specifier.len());
    replaced.push_str(&text[..position]);
    replaced.push(quote);
    replaced.push_str(new_specifier);
    replaced.push(quote);
    replaced.push_str(&text[position + literal_len..]);
    Some(replaced)
}

//! Script and template regions of single-file components
//!
//! `.vue` and `.svelte` files embed one or more `<script>` blocks; `.vue`
//! files also carry a `<template>` block whose expressions may contain
//! `import(...)` calls. Regions are located with `memchr::memmem` and
//! reported with their byte offset in the whole file.

use memchr::memmem;
use std::path::Path;

/// Component file flavours that embed script regions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    Vue,
    Svelte,
}

impl ComponentKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "vue" => Some(Self::Vue),
            "svelte" => Some(Self::Svelte),
            _ => None,
        }
    }

    pub fn has_template_region(self) -> bool {
        matches!(self, Self::Vue)
    }
}

/// Inner text of a block plus where it starts in the file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region<'a> {
    pub text: &'a str,
    /// Byte offset of `text` within the file: the position just past the
    /// opening tag's `>`
    pub offset: usize,
}

/// Every `<script>` block in document order. Self-closing tags contribute
/// nothing; an unclosed block ends the search.
pub fn script_regions(source: &str) -> Vec<Region<'_>> {
    let bytes = source.as_bytes();
    let mut regions = Vec::new();
    let mut pointer = 0;

    while let Some(tag_start) = find_tag(bytes, b"<script", pointer) {
        let attrs_start = tag_start + "<script".len();
        let Some(tag_end) = find_closing_angle(bytes, attrs_start) else {
            break;
        };

        if bytes[tag_end - 1] == b'/' {
            pointer = tag_end + 1;
            continue;
        }

        let content_start = tag_end + 1;
        let Some(content_end) = memmem::find(&bytes[content_start..], b"</script")
            .map(|pos| content_start + pos)
        else {
            break;
        };

        regions.push(Region {
            text: &source[content_start..content_end],
            offset: content_start,
        });
        pointer = content_end + "</script".len();
    }

    regions
}

/// The first top-level `<template>` block. Nested `<template>` tags are
/// balanced so the region ends at the matching close tag.
pub fn template_region(source: &str) -> Option<Region<'_>> {
    let bytes = source.as_bytes();
    let tag_start = find_tag(bytes, b"<template", 0)?;
    let tag_end = find_closing_angle(bytes, tag_start + "<template".len())?;
    if bytes[tag_end - 1] == b'/' {
        return None;
    }

    let content_start = tag_end + 1;
    let mut depth = 1usize;
    let mut pointer = content_start;

    loop {
        let close = memmem::find(&bytes[pointer..], b"</template").map(|pos| pointer + pos)?;
        match find_tag(bytes, b"<template", pointer) {
            Some(open) if open < close => {
                let open_end = find_closing_angle(bytes, open + "<template".len())?;
                if bytes[open_end - 1] != b'/' {
                    depth += 1;
                }
                pointer = open_end + 1;
            }
            _ => {
                depth -= 1;
                if depth == 0 {
                    return Some(Region {
                        text: &source[content_start..close],
                        offset: content_start,
                    });
                }
                pointer = close + "</template".len();
            }
        }
    }
}

/// Next occurrence of `tag` (e.g. `<script`) followed by a character that
/// can end a tag name, so `<scripts>` or `<template-row>` are skipped
fn find_tag(bytes: &[u8], tag: &[u8], from: usize) -> Option<usize> {
    let finder = memmem::Finder::new(tag);
    let mut pointer = from;

    while pointer < bytes.len() {
        let found = pointer + finder.find(&bytes[pointer..])?;
        let next = bytes.get(found + tag.len()).copied();
        if matches!(next, Some(b' ' | b'\t' | b'\n' | b'\r' | b'>' | b'/')) {
            return Some(found);
        }
        pointer = found + tag.len();
    }

    None
}

/// Position of the `>` closing an opening tag, skipping quoted attribute values
fn find_closing_angle(bytes: &[u8], start: usize) -> Option<usize> {
    let mut quote: Option<u8> = None;

    for (i, &byte) in bytes.get(start..)?.iter().enumerate() {
        match (quote, byte) {
            (None, b'"' | b'\'') => quote = Some(byte),
            (Some(q), _) if q == byte => quote = None,
            (None, b'>') => return Some(start + i),
            _ => {}
        }
    }

    None
}

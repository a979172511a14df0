//! Human-readable rendering of move and scan reports

use rehome_services::{MoveReport, ScanEntry};
use std::fmt::Write;
use std::path::Path;

fn display_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

pub fn render_move(report: &MoveReport, root: &Path, verbose: bool) -> String {
    let mut out = String::new();

    if report.dry_run {
        let _ = writeln!(out, "Dry run: no files were changed");
    }

    for item in &report.items {
        let source = display_path(&item.source, root);
        let destination = display_path(&item.destination, root);
        match &item.error {
            Some(error) => {
                let _ = writeln!(out, "FAILED {} -> {}: {}", source, destination, error);
            }
            None => {
                let _ = writeln!(out, "{} -> {}", source, destination);
            }
        }

        for edit in &item.edits {
            let _ = writeln!(
                out,
                "  {}: {} import(s) updated",
                display_path(&edit.file_path, root),
                edit.updated_count
            );
            if verbose {
                for change in &edit.changes {
                    let _ = writeln!(
                        out,
                        "    line {}: '{}' -> '{}'",
                        change.line, change.from, change.to
                    );
                }
            }
        }
    }

    for pattern in &report.unmatched_patterns {
        let _ = writeln!(out, "Pattern matched nothing: {}", pattern);
    }

    let _ = writeln!(
        out,
        "files updated: {}, imports updated: {}, items failed: {}",
        report.files_updated, report.imports_updated, report.items_failed
    );
    out
}

pub fn render_scan(entries: &[ScanEntry], root: &Path) -> String {
    let mut out = String::new();
    let mut unresolved = 0;

    for entry in entries {
        let target = match &entry.resolved {
            Some(path) => display_path(path, root),
            None => {
                unresolved += 1;
                "(unresolved)".to_string()
            }
        };
        let _ = writeln!(
            out,
            "{}:{}  {}  -> {}",
            entry.file.display(),
            entry.line,
            entry.specifier,
            target
        );
    }

    let _ = writeln!(out, "imports: {}, unresolved: {}", entries.len(), unresolved);
    out
}

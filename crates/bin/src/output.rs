//! Output formatting helpers for history and diff rendering.

use cityvers::{Diff, history::LogEntry};

/// Shorten a version id for display.
///
/// Ids in well-formed documents are hex, but a hand-edited file can carry
/// anything, so slicing must not assume a char boundary at byte 8.
pub fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

/// Print one log entry in the multi-line `log` format.
pub fn print_log_entry(entry: &LogEntry) {
    let mut decorations: Vec<String> = Vec::new();
    for branch in &entry.branches {
        decorations.push(branch.clone());
    }
    for tag in &entry.tags {
        decorations.push(format!("tag: {tag}"));
    }

    if decorations.is_empty() {
        println!("version {}", entry.id);
    } else {
        println!("version {} ({})", entry.id, decorations.join(", "));
    }
    if entry.parents.len() > 1 {
        let parents: Vec<&str> = entry
            .parents
            .iter()
            .map(|p| short_id(p.as_str()))
            .collect();
        println!("Merge: {}", parents.join(" "));
    }
    println!("Author: {}", entry.author);
    println!("Date:   {}", entry.date);
    println!();
    println!("    {}", entry.message);

    if let Some(diff) = &entry.diff {
        if !diff.is_empty() {
            println!();
            print_diff_indented(diff, "    ");
        }
    }
    println!();
}

/// Print a diff with one line per object.
pub fn print_diff(diff: &Diff) {
    print_diff_indented(diff, "");
    let (added, removed, changed, unchanged) = diff.counts();
    println!("{added} added, {removed} removed, {changed} changed, {unchanged} unchanged");
}

fn print_diff_indented(diff: &Diff, indent: &str) {
    for object in &diff.added {
        println!(
            "{indent}added:   {} ({})",
            object.logical_id(),
            short_id(object.name().as_str())
        );
    }
    for object in &diff.removed {
        println!(
            "{indent}removed: {} ({})",
            object.logical_id(),
            short_id(object.name().as_str())
        );
    }
    for change in &diff.changed {
        println!(
            "{indent}changed: {} ({} -> {})",
            change.logical_id,
            short_id(change.source.name().as_str()),
            short_id(change.dest.name().as_str())
        );
    }
}

/// Print a table with aligned columns in human-readable format.
///
/// `headers` and each row in `rows` must have the same length.
pub fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    if rows.is_empty() {
        return;
    }

    let col_count = headers.len();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(col_count) {
            widths[i] = widths[i].max(cell.len());
        }
    }

    let header_line: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| format!("{:<width$}", h, width = widths[i]))
        .collect();
    println!("{}", header_line.join("  "));

    for row in rows {
        let line: Vec<String> = row
            .iter()
            .enumerate()
            .take(col_count)
            .map(|(i, cell)| format!("{:<width$}", cell, width = widths[i]))
            .collect();
        println!("{}", line.join("  "));
    }
}

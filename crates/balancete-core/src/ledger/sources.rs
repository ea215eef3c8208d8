//! The funding-source reference table.

use tracing::debug;

use crate::models::{Grid, SourceEntry};

/// Flatten source blocks into (code, description, balance) entries.
///
/// Each of the first three columns is split into lines and flattened on
/// its own, then the columns are zipped by position; a shorter column
/// yields empty strings. The last `trailing_rows` entries of the whole
/// table (report totals) are dropped.
pub fn build_source_table(blocks: &[&Grid], trailing_rows: usize) -> Vec<SourceEntry> {
    let mut entries = Vec::new();

    for block in blocks {
        let codes = column_lines(block, 0);
        let descriptions = column_lines(block, 1);
        let balances = column_lines(block, 2);
        let len = codes.len().max(descriptions.len()).max(balances.len());

        for i in 0..len {
            entries.push(SourceEntry {
                code: line_at(&codes, i),
                description: line_at(&descriptions, i),
                balance: line_at(&balances, i),
            });
        }
    }

    entries.truncate(entries.len().saturating_sub(trailing_rows));
    debug!("Built {} source entries from {} blocks", entries.len(), blocks.len());
    entries
}

/// Lines of one column below the header row.
fn column_lines(block: &Grid, column: usize) -> Vec<&str> {
    block
        .rows
        .iter()
        .skip(1)
        .filter_map(|row| row.get(column))
        .flat_map(|cell| cell.split('\n'))
        .collect()
}

fn line_at(lines: &[&str], index: usize) -> String {
    lines.get(index).copied().unwrap_or_default().to_string()
}

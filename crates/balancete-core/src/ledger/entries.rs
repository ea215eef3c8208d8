//! Flattening ledger blocks into one table of account/source row pairs.

use tracing::{debug, trace};

use super::Result;
use crate::error::LedgerError;
use crate::models::grid::cell_matches;
use crate::models::{Grid, Table};

/// Concatenate the data rows of all ledger blocks.
///
/// Repeated header rows (one per page) and rows without a col-1 value are
/// dropped. Columns are labelled after the first block's header row.
pub fn clean_entries(blocks: &[&Grid], header: &str) -> Result<Table> {
    let first = blocks.first().ok_or_else(|| LedgerError::NoDataFound {
        header: header.to_string(),
    })?;

    let mut table = Table::new(first.rows.first().cloned().unwrap_or_default());

    for block in blocks {
        let mut kept = 0;
        for row in &block.rows {
            if is_header_row(row, header) || !has_account_cell(row) {
                continue;
            }
            table.push_row(row.clone());
            kept += 1;
        }
        trace!(
            "Ledger block on page {}: kept {} of {} rows",
            block.page,
            kept,
            block.num_rows()
        );
    }

    debug!("Cleaned {} ledger entries from {} blocks", table.len(), blocks.len());
    Ok(table)
}

fn is_header_row(row: &[String], header: &str) -> bool {
    row.first().is_some_and(|cell| cell_matches(cell, header))
}

fn has_account_cell(row: &[String]) -> bool {
    row.get(1).is_some_and(|cell| !cell.trim().is_empty())
}

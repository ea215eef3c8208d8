//! Reshaping paired ledger rows into flat account/source records.

use tracing::{debug, warn};

use super::Result;
use crate::error::LedgerError;
use crate::metadata::ResolvedMetadata;
use crate::models::config::ExtractionConfig;
use crate::models::{FlatRecord, Table};

/// Build one record per non-blank source line of every (account, sources)
/// row pair.
///
/// Even rows carry the reduced code in col 0 and "`<account code>`
/// `<description>`" in col 1. The following odd row carries
/// newline-separated source lines, with the matching descriptions and
/// balances at the same line index in their own columns.
pub fn build_records(
    entries: &Table,
    metadata: &ResolvedMetadata,
    config: &ExtractionConfig,
) -> Result<Vec<FlatRecord>> {
    let rows = entries.rows();
    let mut records = Vec::new();

    for pair in rows.chunks(2) {
        let [account_row, sources_row] = pair else {
            let reduced_code = pair[0].first().map(String::as_str).unwrap_or_default();
            warn!(
                "Ignoring unpaired trailing ledger row (reduced code {:?})",
                reduced_code
            );
            continue;
        };

        let reduced_code = cell(account_row, 0);
        let account = cell(account_row, 1);
        let (account_code, account_description) = account.split_once(' ').unwrap_or((account, ""));

        let descriptions = SubLines::new(sources_row, config.source_description_column);
        let balances = SubLines::new(sources_row, config.source_balance_column);

        for (line, source) in cell(sources_row, config.source_line_column).split('\n').enumerate() {
            let source = source.trim();
            if source.is_empty() {
                continue;
            }

            let misaligned = |lines: &SubLines<'_>| LedgerError::Alignment {
                reduced_code: reduced_code.to_string(),
                account: account.to_string(),
                column: lines.column,
                line,
                available: lines.len(),
            };

            records.push(FlatRecord {
                locality: metadata.locality.clone(),
                report_end_date: metadata.report_end_date.clone(),
                reduced_code: reduced_code.to_string(),
                account_code: account_code.to_string(),
                account_description: account_description.to_string(),
                source_line: source.to_string(),
                source_description: descriptions
                    .get(line)
                    .ok_or_else(|| misaligned(&descriptions))?
                    .to_string(),
                source_balance: balances
                    .get(line)
                    .ok_or_else(|| misaligned(&balances))?
                    .to_string(),
            });
        }
    }

    debug!("Built {} records from {} ledger rows", records.len(), rows.len());
    Ok(records)
}

fn cell(row: &[String], column: usize) -> &str {
    row.get(column).map(String::as_str).unwrap_or_default()
}

/// The `\n`-separated lines of one cell. A missing column has no lines.
struct SubLines<'a> {
    column: usize,
    lines: Vec<&'a str>,
}

impl<'a> SubLines<'a> {
    fn new(row: &'a [String], column: usize) -> Self {
        let lines = row
            .get(column)
            .map(|cell| cell.split('\n').collect())
            .unwrap_or_default();
        Self { column, lines }
    }

    fn len(&self) -> usize {
        self.lines.len()
    }

    fn get(&self, line: usize) -> Option<&'a str> {
        self.lines.get(line).map(|text| text.trim())
    }
}

//! Output records produced from ledger and source grids.

use serde::{Deserialize, Serialize};

use super::table::TableRow;

/// One (ledger account × funding source) row with its current balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatRecord {
    /// Municipality the report belongs to.
    pub locality: String,
    /// Report end date (DD/MM/YYYY).
    pub report_end_date: String,
    /// Short numeric account identifier ("reduzido").
    pub reduced_code: String,
    /// Full ledger account code.
    pub account_code: String,
    /// Ledger account description.
    pub account_description: String,
    /// Funding-source line ("fonte").
    pub source_line: String,
    /// Funding-source description.
    pub source_description: String,
    /// Current balance for the account/source pair, as printed.
    pub source_balance: String,
}

impl TableRow for FlatRecord {
    const COLUMNS: &'static [&'static str] = &[
        "Município",
        "Data",
        "Reduzido",
        "Conta",
        "Descrição da Conta",
        "Fonte",
        "Descrição da Fonte",
        "Saldo Atual",
    ];

    fn into_row(self) -> Vec<String> {
        vec![
            self.locality,
            self.report_end_date,
            self.reduced_code,
            self.account_code,
            self.account_description,
            self.source_line,
            self.source_description,
            self.source_balance,
        ]
    }
}

/// A funding-source reference entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceEntry {
    pub code: String,
    pub description: String,
    pub balance: String,
}

impl TableRow for SourceEntry {
    const COLUMNS: &'static [&'static str] = &["Código", "Descrição", "Saldo Atual"];

    fn into_row(self) -> Vec<String> {
        vec![self.code, self.description, self.balance]
    }
}

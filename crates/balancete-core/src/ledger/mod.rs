//! Ledger grid classification and reshaping.
//!
//! The report prints each account as a pair of rows: the account itself,
//! then a row listing the funding sources that hold a balance for it. The
//! functions here find those rows among the extracted grids and turn them
//! into flat records.

pub mod classifier;
pub mod entries;
pub mod records;
pub mod sources;

pub use classifier::{BlockKind, ClassifiedGrids, block_kind, classify};
pub use entries::clean_entries;
pub use records::build_records;
pub use sources::build_source_table;

use crate::error::LedgerError;

/// Result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;

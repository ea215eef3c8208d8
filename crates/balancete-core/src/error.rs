//! Error types for the balancete-core library.

use thiserror::Error;

use crate::metadata::MetadataField;

/// Main error type for the balancete library.
#[derive(Error, Debug)]
pub enum BalanceteError {
    /// PDF reading or grid/text extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] PdfError),

    /// Ledger reshaping error.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Metadata could not be parsed and no substitute was supplied.
    #[error("metadata missing: {0}")]
    MetadataMissing(MetadataField),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// Failed to decode a page content stream.
    #[error("failed to decode content of page {page}: {reason}")]
    Content { page: u32, reason: String },

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),
}

/// Errors raised while turning ledger grids into records.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum LedgerError {
    /// No grid in the document starts with the ledger header.
    #[error("no ledger blocks found (no table starts with '{header}')")]
    NoDataFound { header: String },

    /// A source column has fewer sub-lines than the source-line column.
    #[error(
        "misaligned source columns for reduced code {reduced_code} (account {account}): \
         column {column} has {available} line(s), line {line} requested"
    )]
    Alignment {
        reduced_code: String,
        account: String,
        column: usize,
        line: usize,
        available: usize,
    },
}

/// Result type for the balancete library.
pub type Result<T> = std::result::Result<T, BalanceteError>;

//! Core library for converting municipal trial-balance ("balancete") PDF
//! reports into flat record tables.
//!
//! This crate provides:
//! - PDF processing (first-page text and ruled "lattice" table extraction)
//! - Report metadata parsing (locality and reporting period)
//! - Ledger grid classification and reshaping into account/source records
//! - The per-document conversion pipeline and its configuration

pub mod error;
pub mod ledger;
pub mod metadata;
pub mod models;
pub mod pdf;
pub mod pipeline;

pub use error::{BalanceteError, LedgerError, PdfError, Result};
pub use metadata::{
    DocumentMetadata, MetadataField, MetadataParser, MetadataPrompt, MetadataSubstitutes,
    NoPrompt, ResolvedMetadata, validate_report_date,
};
pub use models::config::{BalanceteConfig, OutputFormat};
pub use models::{FlatRecord, Grid, SourceEntry, Table, TableRow};
pub use pdf::{DocumentSource, PdfExtractor, PdfProcessor};
pub use pipeline::{DocumentOutput, DocumentPipeline};

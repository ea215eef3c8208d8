//! PDF processing module.

mod extractor;

pub use extractor::{PdfExtractor, page_grids};

use crate::error::PdfError;
use crate::models::Grid;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// What the conversion pipeline needs from a document: the text of its
/// first page and its ruled tables.
pub trait DocumentSource {
    /// Text of the first page, where the report header lives.
    fn first_page_text(&self) -> Result<String>;

    /// Ruled ("lattice") tables from all pages, in page order.
    fn extract_grids(&self) -> Result<Vec<Grid>>;
}

/// Trait for PDF processing implementations.
pub trait PdfProcessor: DocumentSource {
    /// Load a PDF from bytes.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Get the number of pages in the PDF.
    fn page_count(&self) -> u32;

    /// Extract text from a specific page (1-indexed).
    fn extract_page_text(&self, page: u32) -> Result<String>;
}

//! PDF text and lattice table extraction using lopdf and pdfplumber.

use lopdf::Document;
use pdfplumber::{Page, Pdf, Strategy, TableSettings, TextOptions};
use tracing::{debug, trace, warn};

use super::{DocumentSource, PdfProcessor, Result};
use crate::error::PdfError;
use crate::models::Grid;
use crate::models::config::LatticeConfig;

/// PDF content extractor. lopdf opens (and if needed decrypts) the file,
/// pdfplumber reads characters and ruling edges per page.
pub struct PdfExtractor {
    document: Option<Pdf>,
    page_count: u32,
    lattice: LatticeConfig,
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self {
            document: None,
            page_count: 0,
            lattice: LatticeConfig::default(),
        }
    }

    /// Set lattice detection parameters.
    pub fn with_lattice_config(mut self, lattice: LatticeConfig) -> Self {
        self.lattice = lattice;
        self
    }

    fn document(&self) -> Result<&Pdf> {
        self.document
            .as_ref()
            .ok_or(PdfError::Parse("No document loaded".to_string()))
    }

    fn page(&self, page: u32) -> Result<Page> {
        if page == 0 || page > self.page_count {
            return Err(PdfError::InvalidPage(page));
        }
        self.document()?
            .page(page as usize - 1)
            .map_err(|e| PdfError::Content {
                page,
                reason: e.to_string(),
            })
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Table settings for ruled tables only: cell borders come from drawn
/// lines (and rectangle sides unless `lines_only` is set), never from text
/// alignment.
fn table_settings(lattice: &LatticeConfig) -> TableSettings {
    TableSettings {
        strategy: if lattice.lines_only {
            Strategy::LatticeStrict
        } else {
            Strategy::Lattice
        },
        min_accuracy: lattice.min_accuracy,
        ..TableSettings::default()
    }
}

/// Ruled tables of one page as grids. Empty cells become empty strings and
/// multi-line cells keep their line breaks.
pub fn page_grids(page: &Page, page_number: u32, lattice: &LatticeConfig) -> Vec<Grid> {
    page.extract_tables(&table_settings(lattice))
        .into_iter()
        .map(|table| {
            let rows = table
                .into_iter()
                .map(|row| row.into_iter().map(Option::unwrap_or_default).collect())
                .collect();
            Grid::new(page_number, rows)
        })
        .inspect(|grid| {
            trace!(
                "Page {}: {}x{} grid, header {:?}",
                page_number,
                grid.num_rows(),
                grid.num_cols(),
                grid.header_cell()
            )
        })
        .collect()
}

impl DocumentSource for PdfExtractor {
    fn first_page_text(&self) -> Result<String> {
        self.extract_page_text(1)
    }

    fn extract_grids(&self) -> Result<Vec<Grid>> {
        let mut grids = Vec::new();

        for number in 1..=self.page_count {
            let page = match self.page(number) {
                Ok(page) => page,
                Err(e @ PdfError::Content { .. }) => {
                    warn!("Skipping page {}: {}", number, e);
                    continue;
                }
                Err(e) => return Err(e),
            };
            grids.extend(page_grids(&page, number, &self.lattice));
        }

        debug!("Extracted {} grids from {} pages", grids.len(), self.page_count);
        Ok(grids)
    }
}

impl PdfProcessor for PdfExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        // Handle PDFs with empty password encryption
        let plain = if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            decrypted_data
        } else {
            data.to_vec()
        };

        let pdf = Pdf::open(&plain, None).map_err(|e| PdfError::Parse(e.to_string()))?;

        debug!("Loaded PDF with {} pages", page_count);
        self.page_count = page_count as u32;
        self.document = Some(pdf);
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.page_count
    }

    fn extract_page_text(&self, page: u32) -> Result<String> {
        let text = match self.page(page) {
            Ok(page) => page.extract_text(&TextOptions::default()),
            Err(PdfError::Content { reason, .. }) => return Err(PdfError::TextExtraction(reason)),
            Err(e) => return Err(e),
        };
        Ok(text)
    }
}

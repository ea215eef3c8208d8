//! End-to-end conversion of one report.

use serde::Serialize;
use tracing::{debug, info};

use crate::error::Result;
use crate::ledger::{build_records, build_source_table, classify, clean_entries};
use crate::metadata::{MetadataParser, MetadataPrompt, MetadataSubstitutes, ResolvedMetadata};
use crate::models::config::ExtractionConfig;
use crate::models::Table;
use crate::pdf::DocumentSource;

/// Tables produced from one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentOutput {
    pub metadata: ResolvedMetadata,
    /// Flat account/source records.
    pub records: Table,
    /// Funding-source reference table, when enabled.
    pub sources: Option<Table>,
}

/// Runs every stage for a single document and returns its tables only if
/// all of them succeed.
pub struct DocumentPipeline<'a> {
    config: ExtractionConfig,
    parser: MetadataParser,
    prompt: &'a dyn MetadataPrompt,
}

impl<'a> DocumentPipeline<'a> {
    /// Create a pipeline that asks `prompt` for metadata the document and
    /// the substitutes lack.
    pub fn new(config: ExtractionConfig, prompt: &'a dyn MetadataPrompt) -> Self {
        Self {
            config,
            parser: MetadataParser::new(),
            prompt,
        }
    }

    /// Convert one document. `name` identifies it in logs and prompts.
    pub fn run(
        &self,
        source: &dyn DocumentSource,
        name: &str,
        substitutes: &MetadataSubstitutes,
    ) -> Result<DocumentOutput> {
        let text = source.first_page_text()?;
        let metadata = self
            .parser
            .extract(&text)
            .resolve(substitutes, self.prompt, name)?;
        debug!("{}: locality={}, date={}", name, metadata.locality, metadata.report_end_date);

        let grids = source.extract_grids()?;
        let classified = classify(&grids, &self.config);

        let entries = clean_entries(&classified.ledger_blocks, &self.config.ledger_header)?;
        let records = build_records(&entries, &metadata, &self.config)?;

        let sources = self.config.emit_sources.then(|| {
            Table::from_records(build_source_table(
                &classified.source_blocks,
                self.config.source_trailing_rows,
            ))
        });

        info!(
            "{}: {} records from {} ledger entries",
            name,
            records.len(),
            entries.len()
        );

        Ok(DocumentOutput {
            metadata,
            records: Table::from_records(records),
            sources,
        })
    }
}

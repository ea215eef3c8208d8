//! Configuration structures for the conversion pipeline.

use serde::{Deserialize, Serialize};

/// Main configuration for the balancete pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceteConfig {
    /// Template-specific ledger extraction settings.
    pub extraction: ExtractionConfig,

    /// Lattice table detection settings.
    pub lattice: LatticeConfig,

    /// Metadata fallback settings.
    pub metadata: MetadataConfig,

    /// Output settings.
    pub output: OutputConfig,
}

/// Ledger template configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Header token identifying ledger blocks.
    pub ledger_header: String,

    /// Header token identifying funding-source blocks.
    pub source_header: String,

    /// Column of the odd row holding the funding-source lines.
    pub source_line_column: usize,

    /// Column of the odd row holding the funding-source descriptions.
    pub source_description_column: usize,

    /// Column of the odd row holding the current balances.
    pub source_balance_column: usize,

    /// Rows dropped from the end of the source table (totals, footnotes).
    pub source_trailing_rows: usize,

    /// Also build and write the funding-source reference table.
    pub emit_sources: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            ledger_header: "reduzido".to_string(),
            source_header: "código".to_string(),
            source_line_column: 1,
            source_description_column: 2,
            source_balance_column: 7,
            source_trailing_rows: 2,
            emit_sources: false,
        }
    }
}

/// Lattice (ruled table) detection configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LatticeConfig {
    /// Build cell borders from stroked lines only, ignoring rectangle sides.
    pub lines_only: bool,

    /// Drop tables whose share of non-empty cells is below this (0.0 - 1.0).
    pub min_accuracy: Option<f64>,
}

/// Metadata fallback configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataConfig {
    /// Ask on the terminal when a value cannot be parsed.
    pub interactive: bool,

    /// Locality used when the document does not name one.
    pub locality: Option<String>,

    /// Report end date (DD/MM/YYYY) used when the document has none.
    pub report_end_date: Option<String>,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            interactive: true,
            locality: None,
            report_end_date: None,
        }
    }
}

/// Output file format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Excel workbook.
    #[default]
    Xlsx,
    /// Comma-separated values.
    Csv,
    /// JSON array of objects.
    Json,
}

impl OutputFormat {
    /// File extension for this format.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output file format.
    pub format: OutputFormat,

    /// Number of documents processed in parallel (0 = number of CPUs).
    pub jobs: usize,
}

impl BalanceteConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{ "extraction": { "emit_sources": true }, "output": { "format": "csv" } }"#;
        let config: BalanceteConfig = serde_json::from_str(json).unwrap();

        assert!(config.extraction.emit_sources);
        assert_eq!(config.extraction.ledger_header, "reduzido");
        assert_eq!(config.extraction.source_balance_column, 7);
        assert_eq!(config.output.format, OutputFormat::Csv);
        assert!(config.metadata.interactive);
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join(format!("balancete-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");

        let mut config = BalanceteConfig::default();
        config.metadata.locality = Some("Canoas".to_string());
        config.save(&path).unwrap();

        let loaded = BalanceteConfig::from_file(&path).unwrap();
        assert_eq!(loaded.metadata.locality.as_deref(), Some("Canoas"));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}

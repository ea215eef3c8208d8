//! Inspect command - show what the extractor sees in one report.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use serde::Serialize;
use tracing::debug;

use balancete_core::ledger::{BlockKind, block_kind};
use balancete_core::models::config::ExtractionConfig;
use balancete_core::{
    DocumentMetadata, DocumentSource, Grid, MetadataParser, PdfExtractor, PdfProcessor,
};

/// Arguments for the inspect command.
#[derive(Args)]
pub struct InspectArgs {
    /// Input PDF file
    #[arg(required = true)]
    input: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: InspectFormat,

    /// Print the cells of every grid, not only ledger and source blocks
    #[arg(long)]
    all: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum InspectFormat {
    /// Human-readable summary
    Text,
    /// JSON report
    Json,
}

#[derive(Serialize)]
struct InspectReport {
    file: String,
    pages: u32,
    metadata: DocumentMetadata,
    grids: Vec<GridReport>,
}

#[derive(Serialize)]
struct GridReport {
    page: u32,
    rows: usize,
    columns: usize,
    kind: Option<&'static str>,
    header: Option<String>,
    cells: Option<Vec<Vec<String>>>,
}

pub async fn run(args: InspectArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::config::load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let data = fs::read(&args.input)?;
    let mut extractor = PdfExtractor::new().with_lattice_config(config.lattice.clone());
    extractor.load(&data)?;
    debug!("PDF has {} pages", extractor.page_count());

    let text = extractor.extract_page_text(1)?;
    let metadata = MetadataParser::new().extract(&text);
    let grids = extractor.extract_grids()?;

    let report = InspectReport {
        file: args.input.display().to_string(),
        pages: extractor.page_count(),
        metadata,
        grids: grids
            .iter()
            .map(|grid| grid_report(grid, &config.extraction, args.all))
            .collect(),
    };

    match args.format {
        InspectFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        InspectFormat::Text => print!("{}", format_text(&report)),
    }

    Ok(())
}

fn grid_report(grid: &Grid, config: &ExtractionConfig, all: bool) -> GridReport {
    let kind = block_kind(grid, config);
    GridReport {
        page: grid.page,
        rows: grid.num_rows(),
        columns: grid.num_cols(),
        kind: kind.map(|kind| match kind {
            BlockKind::Ledger => "ledger",
            BlockKind::Source => "source",
        }),
        header: grid.header_cell().map(str::to_string),
        cells: (all || kind.is_some()).then(|| grid.rows.clone()),
    }
}

fn format_text(report: &InspectReport) -> String {
    let mut output = String::new();

    output.push_str(&format!("File: {}\n", report.file));
    output.push_str(&format!("Pages: {}\n", report.pages));
    output.push_str(&format!(
        "Locality: {}\n",
        report.metadata.locality.as_deref().unwrap_or("(not found)")
    ));
    output.push_str(&format!(
        "Report end date: {}\n",
        report.metadata.report_end_date.as_deref().unwrap_or("(not found)")
    ));
    output.push_str(&format!("Grids: {}\n", report.grids.len()));

    for (i, grid) in report.grids.iter().enumerate() {
        let kind = match grid.kind {
            Some(kind) => style(kind).green().to_string(),
            None => style("ignored").dim().to_string(),
        };
        output.push_str(&format!(
            "\n#{} page {} {}x{} [{}] header: {:?}\n",
            i + 1,
            grid.page,
            grid.rows,
            grid.columns,
            kind,
            grid.header.as_deref().unwrap_or_default()
        ));

        for row in grid.cells.iter().flatten() {
            let cells: Vec<String> = row.iter().map(|cell| cell.replace('\n', " | ")).collect();
            output.push_str(&format!("  {}\n", cells.join(" ; ")));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_report_kinds() {
        let config = ExtractionConfig::default();
        let ledger = Grid::from_rows(1, vec![vec!["Reduzido", "Conta"], vec!["1", "1.1 Caixa"]]);
        let other = Grid::from_rows(1, vec![vec!["Assinaturas"]]);

        let report = grid_report(&ledger, &config, false);
        assert_eq!(report.kind, Some("ledger"));
        assert_eq!(report.cells.map(|c| c.len()), Some(2));

        let report = grid_report(&other, &config, false);
        assert_eq!(report.kind, None);
        assert!(report.cells.is_none());
        assert!(grid_report(&other, &config, true).cells.is_some());
    }

    #[test]
    fn test_format_text_lists_grids() {
        let report = InspectReport {
            file: "a.pdf".to_string(),
            pages: 2,
            metadata: DocumentMetadata {
                locality: Some("Canoas".to_string()),
                report_end_date: None,
            },
            grids: vec![grid_report(
                &Grid::from_rows(2, vec![vec!["Código", "Descrição"], vec!["1500\n1501", "a\nb"]]),
                &ExtractionConfig::default(),
                false,
            )],
        };

        let text = format_text(&report);
        assert!(text.contains("Locality: Canoas"));
        assert!(text.contains("Report end date: (not found)"));
        assert!(text.contains("page 2 2x2"));
        assert!(text.contains("1500 | 1501 ; a | b"));
    }
}

//! Convert command - turn a batch of reports into spreadsheets.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tokio::task::JoinError;
use tracing::{debug, info, warn};

use balancete_core::{
    BalanceteConfig, DocumentOutput, DocumentPipeline, MetadataPrompt, MetadataSubstitutes, NoPrompt,
    OutputFormat, PdfExtractor, PdfProcessor, validate_report_date,
};

use super::FormatArg;
use crate::output::write_table;
use crate::prompt::TerminalPrompt;

/// Arguments for the convert command.
#[derive(Args)]
pub struct ConvertArgs {
    /// Input PDF files or glob patterns
    #[arg(short, long, required = true, num_args = 1..)]
    input: Vec<String>,

    /// Output path prefix; files are written as <prefix>_<n>.<ext>
    #[arg(short, long)]
    output: String,

    /// Output format (default: from config, else xlsx)
    #[arg(short, long, value_enum)]
    format: Option<FormatArg>,

    /// Number of documents converted in parallel (default: number of CPUs)
    #[arg(short = 'j', long)]
    jobs: Option<usize>,

    /// Also write the funding-source table as <prefix>_sources_<n>.<ext>
    #[arg(long)]
    sources: bool,

    /// Locality for documents that don't state one
    #[arg(long)]
    locality: Option<String>,

    /// Report end date (DD/MM/YYYY) for documents that don't state one
    #[arg(long)]
    date: Option<String>,

    /// Never ask on the terminal; documents with missing metadata fail
    #[arg(long)]
    no_prompt: bool,
}

/// Everything a worker needs to convert one document.
struct ConvertJob {
    index: usize,
    input: PathBuf,
    prefix: String,
    format: OutputFormat,
    config: Arc<BalanceteConfig>,
    substitutes: Arc<MetadataSubstitutes>,
    prompt: Arc<dyn MetadataPrompt + Send + Sync>,
}

pub async fn run(args: ConvertArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = super::config::load_config(config_path)?;
    if args.sources {
        config.extraction.emit_sources = true;
    }
    let format = args.format.map(OutputFormat::from).unwrap_or(config.output.format);

    let substitutes = MetadataSubstitutes {
        locality: args.locality.clone().or_else(|| config.metadata.locality.clone()),
        report_end_date: args.date.clone().or_else(|| config.metadata.report_end_date.clone()),
    };
    if let Some(date) = &substitutes.report_end_date {
        if !validate_report_date(date) {
            anyhow::bail!("Invalid report end date '{}', expected DD/MM/YYYY", date);
        }
    }

    check_output_prefix(&args.output)?;
    let files = expand_inputs(&args.input)?;

    let jobs = worker_count(args.jobs.unwrap_or(config.output.jobs));
    info!("Converting {} documents with {} workers", files.len(), jobs);

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let interactive = config.metadata.interactive && !args.no_prompt && console::user_attended_stderr();
    let prompt: Arc<dyn MetadataPrompt + Send + Sync> = if interactive {
        Arc::new(TerminalPrompt::new(pb.clone()))
    } else {
        Arc::new(NoPrompt)
    };

    let config = Arc::new(config);
    let substitutes = Arc::new(substitutes);
    let semaphore = Arc::new(Semaphore::new(jobs));
    let mut handles = Vec::with_capacity(files.len());

    for (i, input) in files.into_iter().enumerate() {
        let permit = semaphore.clone().acquire_owned().await?;
        let job = ConvertJob {
            index: i + 1,
            input: input.clone(),
            prefix: args.output.clone(),
            format,
            config: Arc::clone(&config),
            substitutes: Arc::clone(&substitutes),
            prompt: Arc::clone(&prompt),
        };
        let pb = pb.clone();

        let handle = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            let result = convert_document(&job);
            pb.inc(1);
            result
        });
        handles.push((i + 1, input, handle));
    }

    // Awaited in submission order so the report follows input order.
    let mut lines = Vec::with_capacity(handles.len());
    let mut failed = 0;
    for (index, input, handle) in handles {
        let result = match handle.await {
            Ok(result) => result,
            Err(e) => {
                pb.inc(1);
                Err(worker_failure(e))
            }
        };
        match result {
            Ok(path) => lines.push(format!("[{}] done: {}", index, path.display())),
            Err(e) => {
                failed += 1;
                warn!("Failed to convert {}: {:#}", input.display(), e);
                lines.push(format!("[{}] error: {} - {:#}", index, input.display(), e));
            }
        }
    }
    pb.finish_and_clear();

    for line in &lines {
        println!("{}", line);
    }

    eprintln!(
        "{} Converted {} of {} documents in {:?}",
        if failed == 0 { style("✓").green() } else { style("!").yellow() },
        lines.len() - failed,
        lines.len(),
        start.elapsed()
    );

    Ok(())
}

fn convert_document(job: &ConvertJob) -> anyhow::Result<PathBuf> {
    let name = job.input.display().to_string();
    debug!("[{}] Converting {}", job.index, name);

    let data = fs::read(&job.input)?;
    let mut extractor = PdfExtractor::new().with_lattice_config(job.config.lattice.clone());
    extractor.load(&data)?;

    let pipeline = DocumentPipeline::new(job.config.extraction.clone(), job.prompt.as_ref());
    let output = pipeline.run(&extractor, &name, &job.substitutes)?;

    write_outputs(&output, &job.prefix, job.index, job.format)
}

/// Write the records table and, when present, the sources table. A document
/// either gets all of its files or none of them.
fn write_outputs(
    output: &DocumentOutput,
    prefix: &str,
    index: usize,
    format: OutputFormat,
) -> anyhow::Result<PathBuf> {
    let path = output_path(prefix, None, index, format);
    write_table(&output.records, &path, format)?;

    if let Some(sources) = &output.sources {
        let sources_path = output_path(prefix, Some("sources"), index, format);
        if let Err(e) = write_table(sources, &sources_path, format) {
            if let Err(cleanup) = fs::remove_file(&path) {
                warn!("Could not remove {}: {}", path.display(), cleanup);
            }
            return Err(e.context(format!("writing {}", sources_path.display())));
        }
        debug!("[{}] Wrote sources to {}", index, sources_path.display());
    }

    Ok(path)
}

/// Turn a crashed worker into a per-document error.
fn worker_failure(error: JoinError) -> anyhow::Error {
    if !error.is_panic() {
        return anyhow::anyhow!("worker cancelled: {}", error);
    }
    let payload = error.into_panic();
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown cause".to_string());
    anyhow::anyhow!("worker panicked: {}", message)
}

/// `<prefix>_<index>.<ext>`, or `<prefix>_<kind>_<index>.<ext>`.
fn output_path(prefix: &str, kind: Option<&str>, index: usize, format: OutputFormat) -> PathBuf {
    let name = match kind {
        Some(kind) => format!("{}_{}_{}.{}", prefix, kind, index, format.extension()),
        None => format!("{}_{}.{}", prefix, index, format.extension()),
    };
    PathBuf::from(name)
}

fn check_output_prefix(prefix: &str) -> anyhow::Result<()> {
    match Path::new(prefix).parent() {
        Some(dir) if !dir.as_os_str().is_empty() && !dir.is_dir() => {
            anyhow::bail!("Output directory does not exist: {}", dir.display())
        }
        _ => Ok(()),
    }
}

/// Expand glob patterns in order. Plain paths are kept even when missing so
/// that they are reported like any other failed document.
fn expand_inputs(patterns: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for pattern in patterns {
        if !pattern.contains(['*', '?', '[']) {
            files.push(PathBuf::from(pattern));
            continue;
        }

        let before = files.len();
        files.extend(glob(pattern)?.filter_map(|r| r.ok()).filter(|p| p.is_file()));
        if files.len() == before {
            warn!("No files match {}", pattern);
        }
    }

    if files.is_empty() {
        anyhow::bail!("No matching files found for: {}", patterns.join(" "));
    }
    Ok(files)
}

fn worker_count(requested: usize) -> usize {
    if requested > 0 {
        requested
    } else {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use balancete_core::{ResolvedMetadata, Table};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_output_path() {
        assert_eq!(
            output_path("out/balancete", None, 3, OutputFormat::Xlsx),
            PathBuf::from("out/balancete_3.xlsx")
        );
        assert_eq!(
            output_path("b", Some("sources"), 1, OutputFormat::Csv),
            PathBuf::from("b_sources_1.csv")
        );
    }

    #[test]
    fn test_expand_inputs_keeps_order_and_plain_paths() {
        let dir = TempDir::new().unwrap();
        for name in ["b.pdf", "a.pdf", "notes.txt"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        let pattern = format!("{}/*.pdf", dir.path().display());

        let files = expand_inputs(&["missing.pdf".to_string(), pattern]).unwrap();
        assert_eq!(
            files,
            vec![
                PathBuf::from("missing.pdf"),
                dir.path().join("a.pdf"),
                dir.path().join("b.pdf"),
            ]
        );
    }

    #[test]
    fn test_expand_inputs_without_matches() {
        let dir = TempDir::new().unwrap();
        let pattern = format!("{}/*.pdf", dir.path().display());
        assert!(expand_inputs(&[pattern]).is_err());
    }

    #[test]
    fn test_check_output_prefix() {
        let dir = TempDir::new().unwrap();
        assert!(check_output_prefix("balancete").is_ok());
        assert!(check_output_prefix(&dir.path().join("out").display().to_string()).is_ok());
        assert!(check_output_prefix(&dir.path().join("nope/out").display().to_string()).is_err());
    }

    fn output_with_sources() -> DocumentOutput {
        let mut records = Table::new(["Reduzido", "Conta"]);
        records.push_row(vec!["1001".to_string(), "1.1.1".to_string()]);
        let mut sources = Table::new(["Fonte"]);
        sources.push_row(vec!["1500".to_string()]);
        DocumentOutput {
            metadata: ResolvedMetadata {
                locality: "Canoas".to_string(),
                report_end_date: "31/03/2024".to_string(),
            },
            records,
            sources: Some(sources),
        }
    }

    #[test]
    fn test_write_outputs_writes_both_tables() {
        let dir = TempDir::new().unwrap();
        let prefix = dir.path().join("out").display().to_string();

        let path = write_outputs(&output_with_sources(), &prefix, 2, OutputFormat::Csv).unwrap();
        assert_eq!(path, dir.path().join("out_2.csv"));
        assert!(path.exists());
        assert!(dir.path().join("out_sources_2.csv").exists());
    }

    #[test]
    fn test_write_outputs_leaves_nothing_when_sources_fail() {
        let dir = TempDir::new().unwrap();
        let prefix = dir.path().join("out").display().to_string();
        // A directory where the sources file should go makes that write fail.
        fs::create_dir(dir.path().join("out_sources_1.csv")).unwrap();

        let result = write_outputs(&output_with_sources(), &prefix, 1, OutputFormat::Csv);
        assert!(result.is_err());
        assert!(!dir.path().join("out_1.csv").exists());
    }

    #[tokio::test]
    async fn test_worker_failure_reports_panic_message() {
        let handle = tokio::task::spawn_blocking(|| -> anyhow::Result<PathBuf> {
            panic!("bad font program")
        });
        let error = worker_failure(handle.await.unwrap_err());
        assert_eq!(error.to_string(), "worker panicked: bad font program");
    }

    #[tokio::test]
    async fn test_worker_failure_with_formatted_panic() {
        let handle = tokio::task::spawn_blocking(|| -> anyhow::Result<PathBuf> {
            panic!("page {} is broken", 3)
        });
        let error = worker_failure(handle.await.unwrap_err());
        assert_eq!(error.to_string(), "worker panicked: page 3 is broken");
    }

    #[test]
    fn test_worker_count() {
        assert_eq!(worker_count(3), 3);
        assert!(worker_count(0) >= 1);
    }
}

//! Terminal prompt for metadata the report does not state.

use std::sync::Mutex;

use dialoguer::Input;
use indicatif::ProgressBar;
use tracing::warn;

use balancete_core::{MetadataField, MetadataPrompt, validate_report_date};

/// Asks on the terminal, one question at a time.
///
/// Documents are converted in parallel, so the lock keeps two workers from
/// interleaving their questions. Workers that don't need an answer keep
/// running while one waits.
pub struct TerminalPrompt {
    lock: Mutex<()>,
    progress: ProgressBar,
}

impl TerminalPrompt {
    /// The progress bar is hidden while a question is on screen.
    pub fn new(progress: ProgressBar) -> Self {
        Self {
            lock: Mutex::new(()),
            progress,
        }
    }
}

impl MetadataPrompt for TerminalPrompt {
    fn prompt(&self, field: MetadataField, document: &str) -> Option<String> {
        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        let question = match field {
            MetadataField::Locality => format!("Locality not found in {document}. Enter it (blank to skip)"),
            MetadataField::ReportEndDate => {
                format!("Report end date not found in {document}. Enter it as DD/MM/YYYY (blank to skip)")
            }
        };

        let answer = self.progress.suspend(|| {
            Input::<String>::new()
                .with_prompt(question)
                .allow_empty(true)
                .validate_with(|input: &String| -> Result<(), &str> {
                    let input = input.trim();
                    if field == MetadataField::ReportEndDate
                        && !input.is_empty()
                        && !validate_report_date(input)
                    {
                        Err("not a valid DD/MM/YYYY date")
                    } else {
                        Ok(())
                    }
                })
                .interact_text()
        });

        match answer {
            Ok(value) if !value.trim().is_empty() => Some(value.trim().to_string()),
            Ok(_) => None,
            Err(e) => {
                warn!("Prompt for {} failed: {}", field, e);
                None
            }
        }
    }
}

//! Report metadata (locality and reporting period) parsed from page text.

pub mod patterns;

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{BalanceteError, Result};
use patterns::{LOCALITY, PERIOD_END, REPORT_DATE};

/// A metadata value stamped onto every output record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataField {
    Locality,
    ReportEndDate,
}

impl fmt::Display for MetadataField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Locality => write!(f, "locality"),
            Self::ReportEndDate => write!(f, "report end date"),
        }
    }
}

/// Metadata as parsed from the document. Either value may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub locality: Option<String>,
    pub report_end_date: Option<String>,
}

/// Metadata with every value present, ready to stamp onto records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedMetadata {
    pub locality: String,
    pub report_end_date: String,
}

/// Explicit replacement values, used only for fields the document lacks.
#[derive(Debug, Clone, Default)]
pub struct MetadataSubstitutes {
    pub locality: Option<String>,
    pub report_end_date: Option<String>,
}

/// Source of a value for a field that could not be parsed.
///
/// Returning `None` declines, which makes resolution fail with
/// [`BalanceteError::MetadataMissing`].
pub trait MetadataPrompt {
    /// Ask for `field` of the document at `document`.
    fn prompt(&self, field: MetadataField, document: &str) -> Option<String>;
}

impl<F> MetadataPrompt for F
where
    F: Fn(MetadataField, &str) -> Option<String>,
{
    fn prompt(&self, field: MetadataField, document: &str) -> Option<String> {
        self(field, document)
    }
}

/// A prompt that always declines.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPrompt;

impl MetadataPrompt for NoPrompt {
    fn prompt(&self, _field: MetadataField, _document: &str) -> Option<String> {
        None
    }
}

/// Pattern-based metadata parser for the report's first page.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataParser;

impl MetadataParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse locality and report end date from page text.
    pub fn extract(&self, text: &str) -> DocumentMetadata {
        let metadata = DocumentMetadata {
            locality: self.extract_locality(text),
            report_end_date: self.extract_report_end_date(text),
        };

        debug!(
            "Parsed metadata: locality={:?}, report_end_date={:?}",
            metadata.locality, metadata.report_end_date
        );

        metadata
    }

    /// First word after "Município de".
    pub fn extract_locality(&self, text: &str) -> Option<String> {
        let caps = LOCALITY.captures(text)?;
        caps[1].split_whitespace().next().map(str::to_string)
    }

    /// End date of the "Período: ... até: ..." range.
    pub fn extract_report_end_date(&self, text: &str) -> Option<String> {
        PERIOD_END
            .captures(text)
            .map(|caps| caps[1].trim().to_string())
    }
}

impl DocumentMetadata {
    /// Whether both values were found in the document.
    pub fn is_complete(&self) -> bool {
        self.locality.is_some() && self.report_end_date.is_some()
    }

    /// Fill missing values from `substitutes`, then from `prompt`.
    ///
    /// Parsed values always win. Blank answers count as declined.
    pub fn resolve(
        self,
        substitutes: &MetadataSubstitutes,
        prompt: &dyn MetadataPrompt,
        document: &str,
    ) -> Result<ResolvedMetadata> {
        let locality = resolve_field(
            self.locality,
            substitutes.locality.as_deref(),
            MetadataField::Locality,
            prompt,
            document,
        )?;
        let report_end_date = resolve_field(
            self.report_end_date,
            substitutes.report_end_date.as_deref(),
            MetadataField::ReportEndDate,
            prompt,
            document,
        )?;

        Ok(ResolvedMetadata {
            locality,
            report_end_date,
        })
    }
}

fn resolve_field(
    parsed: Option<String>,
    substitute: Option<&str>,
    field: MetadataField,
    prompt: &dyn MetadataPrompt,
    document: &str,
) -> Result<String> {
    if let Some(value) = parsed {
        return Ok(value);
    }

    warn!("No {} found in {}", field, document);

    let value = substitute
        .map(str::to_string)
        .or_else(|| prompt.prompt(field, document))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    match value {
        Some(value) => {
            if field == MetadataField::ReportEndDate && !validate_report_date(&value) {
                warn!("Report end date '{}' for {} is not a DD/MM/YYYY date", value, document);
            }
            Ok(value)
        }
        None => Err(BalanceteError::MetadataMissing(field)),
    }
}

/// Check that `value` is a real calendar date written as DD/MM/YYYY.
pub fn validate_report_date(value: &str) -> bool {
    let value = value.trim();
    REPORT_DATE.is_match(value) && NaiveDate::parse_from_str(value, "%d/%m/%Y").is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "ESTADO DO RIO GRANDE DO SUL\n\
        MUNICÍPIO DE Canoas Prefeitura Municipal\n\
        Balancete da Despesa\n\
        Período: 01/01/2024   até: 31/03/2024\n";

    #[test]
    fn test_extract_locality_first_word() {
        let parser = MetadataParser::new();
        assert_eq!(parser.extract_locality(HEADER), Some("Canoas".to_string()));
    }

    #[test]
    fn test_extract_locality_accentless_marker() {
        let parser = MetadataParser::new();
        assert_eq!(
            parser.extract_locality("Municipio de   Erechim - RS"),
            Some("Erechim".to_string())
        );
    }

    #[test]
    fn test_extract_report_end_date() {
        let parser = MetadataParser::new();
        assert_eq!(
            parser.extract_report_end_date(HEADER),
            Some("31/03/2024".to_string())
        );
    }

    #[test]
    fn test_absent_markers() {
        let metadata = MetadataParser::new().extract("Relatório sem cabeçalho");
        assert_eq!(metadata, DocumentMetadata::default());
        assert!(!metadata.is_complete());
    }

    #[test]
    fn test_resolve_prefers_parsed_values() {
        let metadata = MetadataParser::new().extract(HEADER);
        let substitutes = MetadataSubstitutes {
            locality: Some("Outra".to_string()),
            report_end_date: Some("01/01/2000".to_string()),
        };

        let resolved = metadata.resolve(&substitutes, &NoPrompt, "a.pdf").unwrap();
        assert_eq!(resolved.locality, "Canoas");
        assert_eq!(resolved.report_end_date, "31/03/2024");
    }

    #[test]
    fn test_resolve_uses_substitute_before_prompt() {
        let substitutes = MetadataSubstitutes {
            locality: Some("Gravataí".to_string()),
            report_end_date: None,
        };
        let prompt = |field: MetadataField, _doc: &str| match field {
            MetadataField::Locality => Some("never asked".to_string()),
            MetadataField::ReportEndDate => Some(" 30/06/2024 ".to_string()),
        };

        let resolved = DocumentMetadata::default()
            .resolve(&substitutes, &prompt, "a.pdf")
            .unwrap();
        assert_eq!(resolved.locality, "Gravataí");
        assert_eq!(resolved.report_end_date, "30/06/2024");
    }

    #[test]
    fn test_resolve_fails_when_prompt_declines() {
        let err = DocumentMetadata::default()
            .resolve(&MetadataSubstitutes::default(), &NoPrompt, "a.pdf")
            .unwrap_err();
        assert!(matches!(
            err,
            BalanceteError::MetadataMissing(MetadataField::Locality)
        ));
    }

    #[test]
    fn test_resolve_treats_blank_answer_as_declined() {
        let metadata = DocumentMetadata {
            locality: Some("Canoas".to_string()),
            report_end_date: None,
        };
        let prompt = |_field: MetadataField, _doc: &str| Some("   ".to_string());

        let err = metadata
            .resolve(&MetadataSubstitutes::default(), &prompt, "a.pdf")
            .unwrap_err();
        assert!(matches!(
            err,
            BalanceteError::MetadataMissing(MetadataField::ReportEndDate)
        ));
    }

    #[test]
    fn test_validate_report_date() {
        assert!(validate_report_date("31/12/2023"));
        assert!(!validate_report_date("31/02/2023"));
        assert!(!validate_report_date("1/2/2023"));
        assert!(!validate_report_date("2023-12-31"));
    }
}

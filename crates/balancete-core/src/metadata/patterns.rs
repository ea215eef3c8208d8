//! Regex patterns for the report header of municipal trial balances.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // "Município de <name> ..." up to the end of the line
    pub static ref LOCALITY: Regex = Regex::new(
        r"(?i)Munic[ií]pio de\s+(.+)"
    ).unwrap();

    // "Período: 01/01/2024 até: 31/01/2024", only the end date is captured
    pub static ref PERIOD_END: Regex = Regex::new(
        r"Período:\s*\d{2}/\d{2}/\d{4}\s+até:\s*(\d{2}/\d{2}/\d{4})"
    ).unwrap();

    pub static ref REPORT_DATE: Regex = Regex::new(
        r"^\d{2}/\d{2}/\d{4}$"
    ).unwrap();
}

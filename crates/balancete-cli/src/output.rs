//! Table writers for the supported output formats.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use rust_xlsxwriter::{Format, Workbook};
use serde_json::{Map, Value};
use tracing::debug;

use balancete_core::{OutputFormat, Table};

/// Write `table` to `path`, headers first, in the given format.
pub fn write_table(table: &Table, path: &Path, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Xlsx => write_xlsx(table, path)?,
        OutputFormat::Csv => write_csv(table, path)?,
        OutputFormat::Json => write_json(table, path)?,
    }
    debug!("Wrote {} rows to {}", table.len(), path.display());
    Ok(())
}

fn write_xlsx(table: &Table, path: &Path) -> anyhow::Result<()> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let sheet = workbook.add_worksheet();

    for (col, label) in table.columns().iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, label, &header_format)?;
    }
    for (row, cells) in table.rows().iter().enumerate() {
        for (col, value) in cells.iter().enumerate() {
            sheet.write_string(row as u32 + 1, col as u16, value)?;
        }
    }
    sheet.autofit();

    workbook.save(path)?;
    Ok(())
}

fn write_csv(table: &Table, path: &Path) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(table.columns())?;
    for row in table.rows() {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// One object per row, keyed by column label.
fn write_json(table: &Table, path: &Path) -> anyhow::Result<()> {
    let objects: Vec<Value> = table
        .rows()
        .iter()
        .map(|row| {
            let object: Map<String, Value> = table
                .columns()
                .iter()
                .zip(row)
                .map(|(label, value)| (label.clone(), Value::String(value.clone())))
                .collect();
            Value::Object(object)
        })
        .collect();

    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, &objects)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn sample() -> Table {
        let mut table = Table::new(["Código", "Descrição", "Saldo Atual"]);
        table.push_row(vec!["1500".into(), "Recursos, livres".into(), "1.234,56".into()]);
        table.push_row(vec!["1501".into(), "Saúde".into(), "0,00".into()]);
        table
    }

    #[test]
    fn test_write_csv() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");

        write_table(&sample(), &path, OutputFormat::Csv).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "Código,Descrição,Saldo Atual\n1500,\"Recursos, livres\",\"1.234,56\"\n1501,Saúde,\"0,00\"\n"
        );
    }

    #[test]
    fn test_write_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.json");

        write_table(&sample(), &path, OutputFormat::Json).unwrap();

        let value: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value[1]["Descrição"], "Saúde");
        assert_eq!(value.as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn test_write_xlsx() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.xlsx");

        write_table(&sample(), &path, OutputFormat::Xlsx).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }
}

//! A minimal named-column string table.

use serde::{Deserialize, Serialize};

/// Rows of string cells under named columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// A record type that can be laid out as a table row.
pub trait TableRow {
    /// Column labels, in output order.
    const COLUMNS: &'static [&'static str];

    /// Cell values, in the same order as [`TableRow::COLUMNS`].
    fn into_row(self) -> Vec<String>;
}

impl Table {
    /// Create an empty table with the given column labels.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Materialize a table from records.
    pub fn from_records<T, I>(records: I) -> Self
    where
        T: TableRow,
        I: IntoIterator<Item = T>,
    {
        let mut table = Self::new(T::COLUMNS.iter().copied());
        table.rows = records.into_iter().map(TableRow::into_row).collect();
        table
    }

    /// Append a row. Short rows are padded, long rows are kept as-is.
    pub fn push_row(&mut self, mut row: Vec<String>) {
        if row.len() < self.columns.len() {
            row.resize(self.columns.len(), String::new());
        }
        self.rows.push(row);
    }

    /// Column labels.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All rows.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell at a position.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Pair(&'static str, &'static str);

    impl TableRow for Pair {
        const COLUMNS: &'static [&'static str] = &["left", "right"];

        fn into_row(self) -> Vec<String> {
            vec![self.0.to_string(), self.1.to_string()]
        }
    }

    #[test]
    fn test_from_records_uses_row_columns() {
        let table = Table::from_records(vec![Pair("a", "b"), Pair("c", "d")]);
        assert_eq!(table.columns(), &["left".to_string(), "right".to_string()]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.cell(1, 0), Some("c"));
    }

    #[test]
    fn test_push_row_pads() {
        let mut table = Table::new(["a", "b", "c"]);
        table.push_row(vec!["1".to_string()]);
        assert_eq!(table.cell(0, 2), Some(""));
        assert!(!table.is_empty());
    }
}

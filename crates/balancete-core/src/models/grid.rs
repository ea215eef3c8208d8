//! Grids of text cells detected on PDF pages.

use serde::{Deserialize, Serialize};

/// A detected rectangular table of text cells.
///
/// Rows are stored top to bottom, cells left to right. Every row of a grid
/// has the same number of cells. A cell may hold several logical lines
/// joined by `'\n'`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    /// Page the grid was found on (1-indexed).
    pub page: u32,
    /// Cell text, row-major.
    pub rows: Vec<Vec<String>>,
}

impl Grid {
    /// Create a grid from rows, padding short rows with empty cells.
    pub fn new(page: u32, mut rows: Vec<Vec<String>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(width, String::new());
        }
        Self { page, rows }
    }

    /// Build a grid from string slices. Mostly useful in tests.
    pub fn from_rows<R, C>(page: u32, rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();
        Self::new(page, rows)
    }

    /// Number of rows.
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn num_cols(&self) -> usize {
        self.rows.first().map(Vec::len).unwrap_or(0)
    }

    /// Cell at a position.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    /// The row-0/col-0 cell, which carries the template header token.
    pub fn header_cell(&self) -> Option<&str> {
        self.cell(0, 0)
    }

    /// Whether the header cell matches `token`, ignoring case and
    /// surrounding whitespace.
    pub fn has_header(&self, token: &str) -> bool {
        self.header_cell()
            .is_some_and(|cell| cell_matches(cell, token))
    }
}

/// Compare a cell against a header token, ignoring case and surrounding
/// whitespace.
pub fn cell_matches(cell: &str, token: &str) -> bool {
    cell.trim().to_lowercase() == token.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_pads_ragged_rows() {
        let grid = Grid::from_rows(1, vec![vec!["a", "b", "c"], vec!["d"]]);
        assert_eq!(grid.num_cols(), 3);
        assert_eq!(grid.cell(1, 2), Some(""));
    }

    #[test]
    fn test_has_header_ignores_case_and_whitespace() {
        let grid = Grid::from_rows(1, vec![vec!["  Reduzido \n", "Conta"]]);
        assert!(grid.has_header("reduzido"));
        assert!(!grid.has_header("código"));

        let grid = Grid::from_rows(2, vec![vec!["CÓDIGO"]]);
        assert!(grid.has_header("código"));
    }

    #[test]
    fn test_empty_grid_has_no_header() {
        let grid = Grid::default();
        assert_eq!(grid.header_cell(), None);
        assert!(!grid.has_header("reduzido"));
    }
}

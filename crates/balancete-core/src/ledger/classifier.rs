//! Sorting extracted grids into ledger and funding-source blocks.

use tracing::{debug, trace};

use crate::models::Grid;
use crate::models::config::ExtractionConfig;

/// Role of a grid in the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Ledger,
    Source,
}

/// Grids that carry data, by role. Everything else is discarded.
#[derive(Debug, Clone, Default)]
pub struct ClassifiedGrids<'a> {
    pub ledger_blocks: Vec<&'a Grid>,
    pub source_blocks: Vec<&'a Grid>,
}

/// Role of a single grid, judged by its row-0/col-0 cell.
pub fn block_kind(grid: &Grid, config: &ExtractionConfig) -> Option<BlockKind> {
    if grid.num_cols() == 0 {
        return None;
    }
    if grid.has_header(&config.ledger_header) {
        Some(BlockKind::Ledger)
    } else if grid.has_header(&config.source_header) {
        Some(BlockKind::Source)
    } else {
        None
    }
}

/// Split grids into ledger and source blocks, keeping document order.
pub fn classify<'a>(grids: &'a [Grid], config: &ExtractionConfig) -> ClassifiedGrids<'a> {
    let mut classified = ClassifiedGrids::default();

    for grid in grids {
        match block_kind(grid, config) {
            Some(BlockKind::Ledger) => classified.ledger_blocks.push(grid),
            Some(BlockKind::Source) => classified.source_blocks.push(grid),
            None => trace!(
                "Discarding {}x{} grid on page {} (header {:?})",
                grid.num_rows(),
                grid.num_cols(),
                grid.page,
                grid.header_cell()
            ),
        }
    }

    debug!(
        "Classified {} grids: {} ledger blocks, {} source blocks",
        grids.len(),
        classified.ledger_blocks.len(),
        classified.source_blocks.len()
    );

    classified
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_by_header_cell() {
        let grids = vec![
            Grid::from_rows(1, vec![vec!["PREFEITURA MUNICIPAL"]]),
            Grid::from_rows(1, vec![vec![" REDUZIDO ", "Conta"], vec!["1", "2"]]),
            Grid::from_rows(2, vec![vec!["Código", "Descrição", "Saldo"]]),
            Grid::from_rows(2, vec![vec!["Reduzido", "Conta"]]),
            Grid::from_rows(3, vec![vec!["Total", "", "1.000,00"]]),
        ];

        let classified = classify(&grids, &ExtractionConfig::default());
        assert_eq!(classified.ledger_blocks.len(), 2);
        assert_eq!(classified.source_blocks.len(), 1);
        assert_eq!(classified.ledger_blocks[0].page, 1);
        assert_eq!(classified.ledger_blocks[1].page, 2);
        assert_eq!(classified.source_blocks[0].page, 2);
    }

    #[test]
    fn test_classification_is_exclusive() {
        let config = ExtractionConfig::default();
        let grids = vec![
            Grid::from_rows(1, vec![vec!["reduzido"]]),
            Grid::from_rows(1, vec![vec!["código"]]),
            Grid::from_rows(1, vec![vec!["outro"]]),
            Grid::default(),
        ];

        for grid in &grids {
            let ledger = grid.has_header(&config.ledger_header);
            let source = grid.has_header(&config.source_header);
            assert!(!(ledger && source));
        }

        let classified = classify(&grids, &config);
        assert_eq!(
            classified.ledger_blocks.len() + classified.source_blocks.len(),
            2
        );
    }

    #[test]
    fn test_grid_without_columns_is_discarded() {
        let grid = Grid::new(1, vec![vec![]]);
        assert_eq!(block_kind(&grid, &ExtractionConfig::default()), None);
    }
}

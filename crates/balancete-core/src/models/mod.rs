//! Data models shared by the extraction pipeline.

pub mod config;
pub mod grid;
pub mod record;
pub mod table;

pub use grid::Grid;
pub use record::{FlatRecord, SourceEntry};
pub use table::{Table, TableRow};

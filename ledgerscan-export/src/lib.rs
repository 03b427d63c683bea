//! ledgerscan-export: table-detection grids and CSV export of reconstructed statements

pub mod csv_export;
pub mod error;
pub mod grid;

pub use csv_export::{grid_to_csv, transactions_to_csv};
pub use error::ExportError;
pub use grid::{Cell, MAX_GRID_COLUMNS, TableGrid, parse_detection_response};

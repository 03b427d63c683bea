//! Dense grids from a table-detection service response.
//!
//! The hosted service returns pre-structured cells, so no text reconstruction is
//! needed here. Expected response shape (extra fields are ignored):
//!
//!   { "result": [ { "prediction": [ ..., { "cells": [ { "row": 1, "col": 1, "text": "Date" }, ... ] } ] } ] }
//!
//! Only the last prediction of each table is used.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::ExportError;

/// One detected cell; `row` and `col` are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Deserialize)]
struct DetectedTable {
    #[serde(default)]
    prediction: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
struct Prediction {
    #[serde(default)]
    cells: Vec<Cell>,
}

/// Widest table a response may describe; rows are allocated densely up to this.
pub const MAX_GRID_COLUMNS: usize = 1024;

/// Row-major table; every row has `columns` entries, missing cells are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableGrid {
    pub columns: usize,
    pub rows: Vec<Vec<String>>,
}

impl TableGrid {
    pub fn from_cells(cells: &[Cell]) -> Result<Self, ExportError> {
        let columns = cells.iter().map(|c| c.col).max().unwrap_or(0);
        if columns > MAX_GRID_COLUMNS {
            return Err(ExportError::GridTooWide { col: columns });
        }
        let mut rows: BTreeMap<usize, Vec<String>> = BTreeMap::new();

        for cell in cells {
            if cell.col == 0 {
                warn!(row = cell.row, "skipping cell with column 0");
                continue;
            }
            let row = rows
                .entry(cell.row)
                .or_insert_with(|| vec![String::new(); columns]);
            row[cell.col - 1] = cell.text.clone();
        }

        Ok(Self {
            columns,
            rows: rows.into_values().collect(),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Parse a saved detection response (either the full object or its `result` array).
pub fn parse_detection_response(json: &str) -> Result<Vec<TableGrid>, ExportError> {
    let value: Value = serde_json::from_str(json)?;
    let result = match value {
        Value::Object(mut obj) => obj.remove("result").ok_or(ExportError::MissingResult)?,
        tables @ Value::Array(_) => tables,
        _ => return Err(ExportError::MissingResult),
    };

    let tables: Vec<DetectedTable> = serde_json::from_value(result)?;
    tables
        .iter()
        .map(|t| match t.prediction.last() {
            Some(p) => TableGrid::from_cells(&p.cells),
            None => Ok(TableGrid::default()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(row: usize, col: usize, text: &str) -> Cell {
        Cell {
            row,
            col,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_grid_fills_gaps_and_orders_rows() {
        let grid = TableGrid::from_cells(&[
            cell(2, 1, "01/10/2024"),
            cell(1, 1, "Date"),
            cell(1, 3, "Balance"),
            cell(2, 3, "995.00"),
        ])
        .unwrap();
        assert_eq!(grid.columns, 3);
        assert_eq!(
            grid.rows,
            vec![
                vec!["Date".to_string(), String::new(), "Balance".to_string()],
                vec!["01/10/2024".to_string(), String::new(), "995.00".to_string()],
            ]
        );
    }

    #[test]
    fn test_later_cell_overwrites() {
        let grid = TableGrid::from_cells(&[cell(1, 1, "a"), cell(1, 1, "b")]).unwrap();
        assert_eq!(grid.rows, vec![vec!["b".to_string()]]);
    }

    #[test]
    fn test_column_zero_skipped() {
        let grid = TableGrid::from_cells(&[cell(1, 0, "x"), cell(1, 2, "y")]).unwrap();
        assert_eq!(grid.rows, vec![vec![String::new(), "y".to_string()]]);
    }

    #[test]
    fn test_response_shapes() {
        let bare = r#"[{"prediction": [{"cells": []}, {"cells": [{"row": 1, "col": 1, "text": "Date", "score": 0.9}]}]}]"#;
        let grids = parse_detection_response(bare).unwrap();
        assert_eq!(grids.len(), 1);
        assert_eq!(grids[0].rows, vec![vec!["Date".to_string()]]);

        let wrapped = format!(r#"{{"message": "Success", "result": {bare}}}"#);
        assert_eq!(parse_detection_response(&wrapped).unwrap(), grids);

        let empty = r#"[{"prediction": []}]"#;
        assert!(parse_detection_response(empty).unwrap()[0].is_empty());
    }

    #[test]
    fn test_oversized_column_is_rejected() {
        let wide = r#"[{"prediction":[{"cells":[{"row":1,"col":4000000000000,"text":"x"}]}]}]"#;
        assert!(matches!(
            parse_detection_response(wide),
            Err(ExportError::GridTooWide { col: 4_000_000_000_000 })
        ));

        let edge = TableGrid::from_cells(&[cell(1, MAX_GRID_COLUMNS, "x")]).unwrap();
        assert_eq!(edge.rows[0].len(), MAX_GRID_COLUMNS);
        assert!(TableGrid::from_cells(&[cell(1, MAX_GRID_COLUMNS + 1, "x")]).is_err());

        // Sparse rows are fine; only width is bounded.
        let tall = TableGrid::from_cells(&[cell(usize::MAX, 1, "x")]).unwrap();
        assert_eq!(tall.rows.len(), 1);
    }

    #[test]
    fn test_missing_result_is_error() {
        assert!(matches!(
            parse_detection_response(r#"{"message": "Failure"}"#),
            Err(ExportError::MissingResult)
        ));
        assert!(matches!(
            parse_detection_response("not json"),
            Err(ExportError::Json(_))
        ));
    }
}

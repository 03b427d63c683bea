//! CSV rendering of reconstructed transactions and detected grids.

use csv::WriterBuilder;
use ledgerscan_core::TransactionRecord;

use crate::error::ExportError;
use crate::grid::TableGrid;

const TRANSACTION_HEADER: [&str; 5] = ["date", "description", "credit", "debit", "balance"];

fn finish(wtr: csv::Writer<Vec<u8>>) -> Result<String, ExportError> {
    let bytes = wtr.into_inner().map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}

/// One record per transaction; absent credit/debit become empty cells.
pub fn transactions_to_csv(rows: &[TransactionRecord]) -> Result<String, ExportError> {
    let mut wtr = WriterBuilder::new().from_writer(Vec::new());
    wtr.write_record(TRANSACTION_HEADER)?;

    for t in rows {
        wtr.write_record([
            t.date.as_str(),
            t.description.as_str(),
            t.credit.as_deref().unwrap_or(""),
            t.debit.as_deref().unwrap_or(""),
            t.balance.as_str(),
        ])?;
    }

    finish(wtr)
}

/// One record per grid row, no header row.
pub fn grid_to_csv(grid: &TableGrid) -> Result<String, ExportError> {
    let mut wtr = WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());
    for row in &grid.rows {
        wtr.write_record(row)?;
    }
    finish(wtr)
}

//! Spreadsheet parsing for the supplier stock list.
//!
//! The supplier's workbook opens with a free-form preamble (company name,
//! date, legend) before the table. The header row is located by its code
//! column rather than by a fixed offset, so a preamble that grows or shrinks
//! by a line does not shift every column.

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use stocksync_core::SupplierRecord;

use crate::error::FeedError;

pub const CODE_COLUMN: &str = "Код";
pub const QUANTITY_COLUMN: &str = "Количество";
pub const PRICE_COLUMN: &str = "Цена";

/// Parses the first worksheet of an `.xls`/`.xlsx` workbook held in memory.
///
/// # Errors
///
/// Returns [`FeedError::Workbook`] if the bytes are not a readable workbook,
/// [`FeedError::EmptyWorkbook`] if it has no worksheets, or
/// [`FeedError::MissingHeader`] if the table header cannot be found.
pub fn parse_workbook(bytes: Vec<u8>) -> Result<Vec<SupplierRecord>, FeedError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(FeedError::EmptyWorkbook)??;

    let rows = range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect::<Vec<_>>());
    records_from_rows(rows)
}

/// Renders a cell the way the supplier meant it to be read.
///
/// Integral floats lose their fractional part (`12345.0` becomes `"12345"`),
/// since codes and quantities are often stored as numbers.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_owned(),
        Data::Int(i) => i.to_string(),
        #[allow(clippy::cast_possible_truncation)]
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => (*f as i64).to_string(),
        other => other.to_string(),
    }
}

fn column_index(header: &[String], column: &str) -> Result<usize, FeedError> {
    header
        .iter()
        .position(|cell| cell == column)
        .ok_or_else(|| FeedError::MissingHeader {
            column: column.to_owned(),
        })
}

/// Converts rendered worksheet rows into supplier records.
///
/// Rows before the one holding [`CODE_COLUMN`] are skipped as preamble.
/// Rows with an empty code (blank lines, group subtotals) are dropped.
/// Cells missing from a short row read as empty strings.
///
/// # Errors
///
/// Returns [`FeedError::MissingHeader`] naming the first column that could
/// not be found.
pub fn records_from_rows<I, R>(rows: I) -> Result<Vec<SupplierRecord>, FeedError>
where
    I: IntoIterator<Item = R>,
    R: AsRef<[String]>,
{
    let mut rows = rows.into_iter();

    let header = rows
        .by_ref()
        .find(|row| row.as_ref().iter().any(|cell| cell == CODE_COLUMN))
        .ok_or_else(|| FeedError::MissingHeader {
            column: CODE_COLUMN.to_owned(),
        })?;
    let header = header.as_ref();
    let code_idx = column_index(header, CODE_COLUMN)?;
    let quantity_idx = column_index(header, QUANTITY_COLUMN)?;
    let price_idx = column_index(header, PRICE_COLUMN)?;

    let cell = |row: &[String], idx: usize| row.get(idx).cloned().unwrap_or_default();

    let mut skipped = 0usize;
    let mut records = Vec::new();
    for row in rows {
        let row = row.as_ref();
        let code = cell(row, code_idx);
        if code.is_empty() {
            skipped += 1;
            continue;
        }
        records.push(SupplierRecord {
            code,
            quantity: cell(row, quantity_idx),
            price: cell(row, price_idx),
        });
    }

    tracing::info!(records = records.len(), skipped, "parsed supplier worksheet");
    Ok(records)
}

#[cfg(test)]
#[path = "sheet_test.rs"]
mod tests;

use crate::domain::model::ResultTable;
use crate::utils::error::{EtlError, Result};

/// Serializes the table as UTF-8 CSV with `\n` line endings and no index column.
///
/// An empty table produces zero bytes. A table whose records carry no fields
/// has no header and one blank line per row.
pub fn to_csv_bytes(table: &ResultTable) -> Result<Vec<u8>> {
    if table.columns.is_empty() {
        return Ok(b"\n".repeat(table.row_count()));
    }

    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(&table.columns)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }

    writer
        .into_inner()
        .map_err(|e| EtlError::IoError(e.into_error()))
}

//! CSV writer for the assembled per-object table.
//!
//! CSV is written only after the whole input stream decoded successfully;
//! a failed run never leaves a partial CSV behind.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::error::RegionpolyError;
use crate::ir::Table;

/// Writes the table as one header record (the padded short header list)
/// followed by one record per row.
pub fn write_csv(path: &Path, table: &Table) -> Result<(), RegionpolyError> {
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(BufWriter::new(file));

    writer
        .write_record(&table.headers)
        .map_err(|source| RegionpolyError::CsvWrite {
            path: path.to_owned(),
            source,
        })?;
    for row in &table.rows {
        writer
            .write_record(row.iter().map(|cell| cell.to_string()))
            .map_err(|source| RegionpolyError::CsvWrite {
                path: path.to_owned(),
                source,
            })?;
    }
    writer.flush()?;
    Ok(())
}

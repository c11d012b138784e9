//! Tabular assembly: value rows extended with bounding boxes, aligned
//! against the two streamed header lists.

use crate::error::RegionpolyError;
use crate::ir::model::Scalar;

/// Synthetic column names appended for the bounding box cells, in the order
/// the cells are appended to each row.
pub const BBOX_COLUMNS: [&str; 4] = ["bbox_x0", "bbox_y0", "bbox_x1", "bbox_y1"];

/// Placeholder name for header positions the stream did not label.
pub const SKIP_COLUMN: &str = "skip";

/// The assembled per-object table: one row per object (each already carrying
/// its four bbox cells), plus the padded short and long header lists.
/// After assembly every row and both header lists have identical length.
#[derive(Clone, Debug, Default)]
pub struct Table {
    pub headers: Vec<String>,
    pub long_headers: Vec<String>,
    pub rows: Vec<Vec<Scalar>>,
}

impl Table {
    /// Aligns rows and headers into one rectangular table.
    ///
    /// Header lists shorter than the row width are padded with `"skip"`
    /// entries before the four bbox column names are appended; a header list
    /// that is already too wide is a fatal error, as is any ragged row.
    /// With zero rows the table is valid and consists of the headers alone.
    pub fn assemble(
        rows: Vec<Vec<Scalar>>,
        headers: Vec<String>,
        long_headers: Vec<String>,
    ) -> Result<Self, RegionpolyError> {
        let row_len = rows
            .first()
            .map(Vec::len)
            .unwrap_or(headers.len() + BBOX_COLUMNS.len());

        for (index, row) in rows.iter().enumerate() {
            if row.len() != row_len {
                return Err(RegionpolyError::RaggedRow {
                    index,
                    expected: row_len,
                    found: row.len(),
                });
            }
        }

        Ok(Self {
            headers: pad_headers(headers, row_len)?,
            long_headers: pad_headers(long_headers, row_len)?,
            rows,
        })
    }

    /// Column count shared by every row and both header lists.
    pub fn width(&self) -> usize {
        self.headers.len()
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }
}

fn pad_headers(mut names: Vec<String>, row_len: usize) -> Result<Vec<String>, RegionpolyError> {
    let padding = row_len
        .checked_sub(BBOX_COLUMNS.len())
        .and_then(|base| base.checked_sub(names.len()))
        .ok_or(RegionpolyError::HeaderOverflow {
            headers: names.len(),
            row_len,
        })?;
    names.extend((0..padding).map(|_| SKIP_COLUMN.to_owned()));
    names.extend(BBOX_COLUMNS.iter().map(|name| (*name).to_owned()));
    Ok(names)
}

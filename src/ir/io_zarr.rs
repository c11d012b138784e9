//! Chunked binary array store: a zarr-v2 array packed into a zip archive.
//!
//! Layout inside the archive:
//! - `.zarray` — array metadata: shape `[rows, cols]`, chunks `[1000, cols]`,
//!   dtype `<f8`, C order, no codec (`compressor: null`; the zip layer is the
//!   only compression).
//! - `.zattrs` — both padded header lists, for downstream consumers.
//! - `<i>.0` — row-major chunk files of 1000 rows each; the trailing chunk is
//!   padded to full chunk extent with the NaN fill value, per the zarr chunk
//!   contract.
//!
//! Cells are coerced to f64: numbers pass through, booleans map to 1.0/0.0,
//! strings and nulls to NaN.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde_json::json;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::RegionpolyError;
use crate::ir::Table;

/// Rows per chunk. The column extent of every chunk is the full table width.
pub const CHUNK_ROWS: usize = 1000;

/// Writes the table to `path` as a zip-packed zarr-v2 array in one pass.
pub fn write_zarr(path: &Path, table: &Table) -> Result<(), RegionpolyError> {
    let rows = table.n_rows();
    let cols = table.width();

    let file = File::create(path)?;
    let mut zip = ZipWriter::new(BufWriter::new(file));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let zarray = json!({
        "zarr_format": 2,
        "shape": [rows, cols],
        "chunks": [CHUNK_ROWS, cols],
        "dtype": "<f8",
        "compressor": null,
        "fill_value": "NaN",
        "filters": null,
        "order": "C",
    });
    write_json_entry(&mut zip, path, options, ".zarray", &zarray)?;

    let zattrs = json!({
        "headers": table.headers,
        "long_headers": table.long_headers,
    });
    write_json_entry(&mut zip, path, options, ".zattrs", &zattrs)?;

    for (chunk_index, chunk_rows) in table.rows.chunks(CHUNK_ROWS).enumerate() {
        zip.start_file(format!("{chunk_index}.0"), options)
            .map_err(|source| RegionpolyError::StoreWrite {
                path: path.to_owned(),
                source,
            })?;
        let mut buf = Vec::with_capacity(CHUNK_ROWS * cols * 8);
        for row in chunk_rows {
            for cell in row {
                buf.extend_from_slice(&cell.to_f64().to_le_bytes());
            }
        }
        for _ in 0..(CHUNK_ROWS - chunk_rows.len()) * cols {
            buf.extend_from_slice(&f64::NAN.to_le_bytes());
        }
        zip.write_all(&buf)?;
    }

    zip.finish().map_err(|source| RegionpolyError::StoreWrite {
        path: path.to_owned(),
        source,
    })?;
    Ok(())
}

fn write_json_entry(
    zip: &mut ZipWriter<BufWriter<File>>,
    path: &Path,
    options: SimpleFileOptions,
    name: &str,
    value: &serde_json::Value,
) -> Result<(), RegionpolyError> {
    zip.start_file(name, options)
        .map_err(|source| RegionpolyError::StoreWrite {
            path: path.to_owned(),
            source,
        })?;
    let bytes = serde_json::to_vec_pretty(value).map_err(|source| RegionpolyError::StoreMeta {
        path: path.to_owned(),
        source,
    })?;
    zip.write_all(&bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Scalar;
    use zip::ZipArchive;

    fn read_entry(archive: &mut ZipArchive<File>, name: &str) -> Vec<u8> {
        use std::io::Read;
        let mut entry = archive.by_name(name).unwrap();
        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes).unwrap();
        bytes
    }

    fn sample_table(n_rows: usize) -> Table {
        let rows = (0..n_rows)
            .map(|i| {
                vec![
                    Scalar::Number(i as f64),
                    Scalar::Number(2.0),
                    Scalar::Number(4.0),
                    Scalar::Number(3.0),
                    Scalar::Number(5.0),
                ]
            })
            .collect();
        Table::assemble(rows, vec!["area".into()], vec!["object area".into()]).unwrap()
    }

    #[test]
    fn store_metadata_declares_shape_and_chunking() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.zarr.zip");
        write_zarr(&path, &sample_table(3)).unwrap();

        let mut archive = ZipArchive::new(File::open(&path).unwrap()).unwrap();
        let zarray: serde_json::Value =
            serde_json::from_slice(&read_entry(&mut archive, ".zarray")).unwrap();
        assert_eq!(zarray["zarr_format"], 2);
        assert_eq!(zarray["shape"], json!([3, 5]));
        assert_eq!(zarray["chunks"], json!([1000, 5]));
        assert_eq!(zarray["dtype"], "<f8");
        assert_eq!(zarray["order"], "C");

        let zattrs: serde_json::Value =
            serde_json::from_slice(&read_entry(&mut archive, ".zattrs")).unwrap();
        assert_eq!(
            zattrs["headers"],
            json!(["area", "bbox_x0", "bbox_y0", "bbox_x1", "bbox_y1"])
        );
        assert_eq!(zattrs["long_headers"][0], "object area");
    }

    #[test]
    fn chunks_are_padded_to_full_extent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.zarr.zip");
        write_zarr(&path, &sample_table(3)).unwrap();

        let mut archive = ZipArchive::new(File::open(&path).unwrap()).unwrap();
        let chunk = read_entry(&mut archive, "0.0");
        assert_eq!(chunk.len(), 1000 * 5 * 8);

        // First cell of row 1 is its row index.
        let cell = f64::from_le_bytes(chunk[5 * 8..6 * 8].try_into().unwrap());
        assert_eq!(cell, 1.0);
        // Cells beyond the last real row hold the NaN fill.
        let fill = f64::from_le_bytes(chunk[3 * 5 * 8..3 * 5 * 8 + 8].try_into().unwrap());
        assert!(fill.is_nan());
    }

    #[test]
    fn row_count_beyond_chunk_size_splits_chunks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.zarr.zip");
        write_zarr(&path, &sample_table(1001)).unwrap();

        let mut archive = ZipArchive::new(File::open(&path).unwrap()).unwrap();
        assert!(archive.by_name("0.0").is_ok());
        assert!(archive.by_name("1.0").is_ok());
        assert!(archive.by_name("2.0").is_err());
    }

    #[test]
    fn empty_table_writes_metadata_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.zarr.zip");
        write_zarr(&path, &Table::assemble(vec![], vec![], vec![]).unwrap()).unwrap();

        let mut archive = ZipArchive::new(File::open(&path).unwrap()).unwrap();
        let zarray: serde_json::Value =
            serde_json::from_slice(&read_entry(&mut archive, ".zarray")).unwrap();
        assert_eq!(zarray["shape"], json!([0, 4]));
        assert!(archive.by_name("0.0").is_err());
    }
}

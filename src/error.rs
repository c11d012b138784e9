use std::path::PathBuf;
use thiserror::Error;

use crate::stream::StreamState;

/// The main error type for regionpoly operations.
///
/// Every error is fatal for the current run: the converter makes no attempt
/// at recovery or partial-output commit beyond GeoJSON bytes already flushed.
#[derive(Debug, Error)]
pub enum RegionpolyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unexpected input structure while reading {expected}: {source}")]
    Structure {
        expected: StreamState,
        #[source]
        source: serde_json::Error,
    },

    #[error("surprising region count for object {index}: expected exactly 1, found {count}")]
    RegionCount { index: usize, count: usize },

    #[error("object {index} has an invalid region: {source}")]
    InvalidRegion {
        index: usize,
        #[source]
        source: RegionShapeError,
    },

    #[error("object {index} produced no boundary polygon where one was expected")]
    DegenerateGeometry { index: usize },

    #[error("object {index} decomposed into {parts} disjoint polygons; expected one connected shape")]
    DisjointRegion { index: usize, parts: usize },

    #[error("value row {index} has no matching object bounding box")]
    RowWithoutBBox { index: usize },

    #[error("value row {index} has {found} columns, expected {expected}")]
    RaggedRow {
        index: usize,
        expected: usize,
        found: usize,
    },

    #[error("header list with {headers} names is wider than the {row_len}-column rows allow")]
    HeaderOverflow { headers: usize, row_len: usize },

    #[error("failed to write GeoJSON feature to {path}: {source}")]
    GeoJsonWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write CSV to {path}: {source}")]
    CsvWrite {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to encode array store metadata for {path}: {source}")]
    StoreMeta {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write array store to {path}: {source}")]
    StoreWrite {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },
}

/// Ways a region's coordinate arrays can fail to describe a raster.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegionShapeError {
    #[error("region has no pixels")]
    Empty,

    #[error("parallel coordinate arrays differ in length ({xs} x values, {ys} y values)")]
    LengthMismatch { xs: usize, ys: usize },
}

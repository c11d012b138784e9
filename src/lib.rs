//! Regionpoly: object-region stream exports to analysis-ready formats.
//!
//! Regionpoly reads the JSON dump of a serialized object stream — labeled
//! image regions plus their tabular metadata — in one incremental pass and
//! writes any subset of three outputs: a GeoJSON FeatureCollection of
//! region boundary polygons, a CSV table of per-object values extended with
//! bounding boxes, and a chunked binary array store.
//!
//! # Modules
//!
//! - [`stream`]: incremental decoder for the export document
//! - [`mask`]: occupancy rasterization and mask-to-polygon extraction
//! - [`ir`]: record, ring, bbox, and table model plus the output writers
//! - [`conversion`]: the one-pass pipeline tying the above together
//! - [`error`]: error types for regionpoly operations

pub mod conversion;
pub mod error;
pub mod ir;
pub mod mask;
pub mod stream;

use std::path::PathBuf;

use clap::Parser;

use conversion::{convert, ConvertOptions};

pub use error::RegionpolyError;

/// The regionpoly CLI application.
#[derive(Parser)]
#[command(name = "regionpoly")]
#[command(version, author, about)]
struct Cli {
    /// Source JSON export file.
    source: PathBuf,

    /// Output GeoJSON file.
    #[arg(long)]
    geojson: Option<PathBuf>,

    /// Output chunked array store (zip-packed zarr).
    #[arg(long)]
    zarr: Option<PathBuf>,

    /// Output CSV file.
    #[arg(long)]
    csv: Option<PathBuf>,
}

/// Run the regionpoly CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), RegionpolyError> {
    let cli = Cli::parse();
    let options = ConvertOptions {
        geojson: cli.geojson,
        zarr: cli.zarr,
        csv: cli.csv,
    };

    let summary = convert(&cli.source, &options)?;

    if let Some(id) = &summary.stream_id {
        println!("stream id: {id}");
    }
    println!(
        "{} object(s), {} row(s), {} column(s)",
        summary.objects, summary.rows, summary.columns
    );
    Ok(())
}

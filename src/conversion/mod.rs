//! One-pass conversion pipeline: stream decode → polygonize → export.
//!
//! The pipeline is the [`RecordSink`] the stream decoder drives. Each object
//! record is consumed on arrival — rasterized, polygonized, translated back
//! into the original coordinate space, and (when requested) flushed to the
//! GeoJSON output — before the next record is decoded. Value rows are merged
//! with the positionally matching bounding box as they arrive. CSV and the
//! array store are written only after the whole stream decoded successfully.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::error::RegionpolyError;
use crate::ir::io_csv::write_csv;
use crate::ir::io_geojson::FeatureCollectionWriter;
use crate::ir::io_zarr::write_zarr;
use crate::ir::{ObjectRecord, PixelBBox, Scalar, Table};
use crate::mask::OccupancyGrid;
use crate::stream::{decode_stream, RecordSink};

/// Which outputs to produce. Any subset may be requested.
#[derive(Clone, Debug, Default)]
pub struct ConvertOptions {
    pub geojson: Option<PathBuf>,
    pub zarr: Option<PathBuf>,
    pub csv: Option<PathBuf>,
}

/// Counts reported after a successful run.
#[derive(Clone, Debug)]
pub struct ConvertSummary {
    /// The identifier scalar leading the export array.
    pub stream_id: Option<Scalar>,
    /// Objects (and therefore GeoJSON features and bounding boxes) seen.
    pub objects: usize,
    /// Table rows assembled.
    pub rows: usize,
    /// Table width after header padding.
    pub columns: usize,
}

/// Runs one conversion pass over `source`, producing the requested outputs.
pub fn convert(source: &Path, options: &ConvertOptions) -> Result<ConvertSummary, RegionpolyError> {
    let file = File::open(source)?;
    let mut pipeline = Pipeline::open(options)?;
    decode_stream(BufReader::new(file), &mut pipeline)?;
    pipeline.finish(options)
}

struct Pipeline {
    geojson: Option<FeatureCollectionWriter>,
    stream_id: Option<Scalar>,
    bboxes: Vec<PixelBBox>,
    rows: Vec<Vec<Scalar>>,
    headers: Vec<String>,
    long_headers: Vec<String>,
}

impl Pipeline {
    fn open(options: &ConvertOptions) -> Result<Self, RegionpolyError> {
        let geojson = options
            .geojson
            .as_deref()
            .map(FeatureCollectionWriter::create)
            .transpose()?;
        Ok(Self {
            geojson,
            stream_id: None,
            bboxes: Vec::new(),
            rows: Vec::new(),
            headers: Vec::new(),
            long_headers: Vec::new(),
        })
    }

    fn finish(self, options: &ConvertOptions) -> Result<ConvertSummary, RegionpolyError> {
        if let Some(writer) = self.geojson {
            writer.finish()?;
        }

        let objects = self.bboxes.len();
        let table = Table::assemble(self.rows, self.headers, self.long_headers)?;
        if let Some(path) = &options.csv {
            write_csv(path, &table)?;
        }
        if let Some(path) = &options.zarr {
            write_zarr(path, &table)?;
        }

        Ok(ConvertSummary {
            stream_id: self.stream_id,
            objects,
            rows: table.n_rows(),
            columns: table.width(),
        })
    }
}

impl RecordSink for Pipeline {
    fn id(&mut self, id: Scalar) -> Result<(), RegionpolyError> {
        self.stream_id = Some(id);
        Ok(())
    }

    fn object(&mut self, record: ObjectRecord) -> Result<(), RegionpolyError> {
        let index = self.bboxes.len();
        let regions = &record.fields.regions;
        if regions.len() != 1 {
            return Err(RegionpolyError::RegionCount {
                index,
                count: regions.len(),
            });
        }

        let grid = OccupancyGrid::from_region(&regions[0].fields)
            .map_err(|source| RegionpolyError::InvalidRegion { index, source })?;
        let bbox = grid.bbox();

        let mut rings = grid.boundaries();
        if rings.len() > 1 {
            return Err(RegionpolyError::DisjointRegion {
                index,
                parts: rings.len(),
            });
        }
        let mut ring = rings
            .pop()
            .ok_or(RegionpolyError::DegenerateGeometry { index })?;
        ring.translate(bbox.xmin, bbox.ymin);
        ring.close();

        if let Some(writer) = &mut self.geojson {
            writer.write_ring(&ring)?;
        }
        self.bboxes.push(bbox);
        Ok(())
    }

    fn row(&mut self, mut row: Vec<Scalar>) -> Result<(), RegionpolyError> {
        let index = self.rows.len();
        let bbox = self
            .bboxes
            .get(index)
            .ok_or(RegionpolyError::RowWithoutBBox { index })?;
        row.extend(bbox.to_row_cells());
        self.rows.push(row);
        Ok(())
    }

    fn headers(&mut self, headers: Vec<String>) -> Result<(), RegionpolyError> {
        self.headers = headers;
        Ok(())
    }

    fn long_headers(&mut self, headers: Vec<String>) -> Result<(), RegionpolyError> {
        self.long_headers = headers;
        Ok(())
    }
}

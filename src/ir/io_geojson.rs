//! Incremental GeoJSON FeatureCollection writer.
//!
//! Features are flushed to disk as objects arrive rather than buffered into
//! one in-memory document, so this is the only output that can be partially
//! written when a run aborts. Comma placement between features is manual:
//! the writer tracks whether a feature has been emitted yet.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::RegionpolyError;
use crate::ir::Ring;

const COLLECTION_HEADER: &[u8] = b"{\"type\": \"FeatureCollection\", \"features\": [\n";
const COLLECTION_FOOTER: &[u8] = b"\n]}";

#[derive(Serialize)]
struct Feature<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    geometry: Geometry<'a>,
}

#[derive(Serialize)]
struct Geometry<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    /// A single exterior ring; interior holes are not modeled.
    coordinates: [&'a [[i64; 2]]; 1],
}

/// Streams one `Polygon` Feature per region into a FeatureCollection, in
/// arrival order.
pub struct FeatureCollectionWriter {
    out: BufWriter<File>,
    path: PathBuf,
    features: usize,
}

impl FeatureCollectionWriter {
    /// Creates the output file and writes the collection header.
    pub fn create(path: &Path) -> Result<Self, RegionpolyError> {
        let mut out = BufWriter::new(File::create(path)?);
        out.write_all(COLLECTION_HEADER)?;
        Ok(Self {
            out,
            path: path.to_owned(),
            features: 0,
        })
    }

    /// Appends one closed ring as a compact Feature object and flushes it.
    pub fn write_ring(&mut self, ring: &Ring) -> Result<(), RegionpolyError> {
        if self.features > 0 {
            self.out.write_all(b",\n")?;
        }
        let feature = Feature {
            kind: "Feature",
            geometry: Geometry {
                kind: "Polygon",
                coordinates: [ring.points()],
            },
        };
        serde_json::to_writer(&mut self.out, &feature).map_err(|source| {
            RegionpolyError::GeoJsonWrite {
                path: self.path.clone(),
                source,
            }
        })?;
        self.out.flush()?;
        self.features += 1;
        Ok(())
    }

    /// Writes the collection footer and returns the feature count.
    pub fn finish(mut self) -> Result<usize, RegionpolyError> {
        self.out.write_all(COLLECTION_FOOTER)?;
        self.out.flush()?;
        Ok(self.features)
    }
}

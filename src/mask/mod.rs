//! Occupancy rasterization and mask-to-polygon boundary extraction.
//!
//! This is the core of the converter: a region's sparse pixel coordinates
//! become a tightly-bounding binary raster, each occupied cell becomes an
//! axis-aligned unit square, and the topological union of those squares
//! yields the region's exact pixel-aligned outer boundary. The union result
//! is simplified with zero tolerance (removing only vertices that split a
//! straight edge), truncated back to integers, and seam-normalized so every
//! ring starts at a true corner.

use geo::{unary_union, Simplify};
use geo_types::{coord, MultiPolygon, Polygon, Rect};
use ndarray::Array2;

use crate::error::RegionShapeError;
use crate::ir::{PixelBBox, Region, Ring};

/// Dense boolean raster tightly bounding one region, with the bounding
/// extremes that anchor it back into the original coordinate space.
#[derive(Clone, Debug)]
pub struct OccupancyGrid {
    cells: Array2<u8>,
    bbox: PixelBBox,
}

impl OccupancyGrid {
    /// Rasterizes a region onto a grid of shape
    /// `(maxy-miny+1, maxx-minx+1)`, setting cell `(py-miny, px-minx)` for
    /// every pixel. Fails on empty or length-mismatched coordinate arrays.
    pub fn from_region(region: &Region) -> Result<Self, RegionShapeError> {
        if region.x.len() != region.y.len() {
            return Err(RegionShapeError::LengthMismatch {
                xs: region.x.len(),
                ys: region.y.len(),
            });
        }
        let bbox =
            PixelBBox::from_pixels(&region.x, &region.y).ok_or(RegionShapeError::Empty)?;
        let mut cells = Array2::<u8>::zeros(bbox.grid_shape());
        for (&px, &py) in region.x.iter().zip(&region.y) {
            cells[[(py - bbox.ymin) as usize, (px - bbox.xmin) as usize]] = 1;
        }
        Ok(Self { cells, bbox })
    }

    pub fn bbox(&self) -> PixelBBox {
        self.bbox
    }

    pub fn cells(&self) -> &Array2<u8> {
        &self.cells
    }

    /// Extracts the grid's boundary rings in grid-local coordinates.
    pub fn boundaries(&self) -> Vec<Ring> {
        mask_boundaries(&self.cells)
    }
}

/// Converts a binary raster into closed integer boundary rings.
///
/// One ring per contiguous part of the union, in union order; disjoint
/// pixel clusters legitimately produce several rings and none is ever
/// dropped here — the caller decides the multi-part policy. An empty mask
/// produces an empty list, which is a valid, non-error outcome at this
/// layer. Interior holes are not emitted; each ring is a part's exterior.
pub fn mask_boundaries(mask: &Array2<u8>) -> Vec<Ring> {
    let mut pixel_squares: Vec<Polygon<f64>> = Vec::new();
    for ((row, col), &cell) in mask.indexed_iter() {
        if cell != 0 {
            pixel_squares.push(
                Rect::new(
                    coord! { x: col as f64, y: row as f64 },
                    coord! { x: (col + 1) as f64, y: (row + 1) as f64 },
                )
                .to_polygon(),
            );
        }
    }
    if pixel_squares.is_empty() {
        return Vec::new();
    }

    let union: MultiPolygon<f64> = unary_union(pixel_squares.iter());
    union
        .iter()
        .map(|part| {
            // Zero-tolerance simplify canonicalizes the exterior without
            // moving it; truncation guards against float residue from the
            // union, whose vertices are integer-valued by construction.
            let simplified = part.simplify(&0.0);
            let mut ring = Ring::new(
                simplified
                    .exterior()
                    .coords()
                    .map(|c| [c.x.trunc() as i64, c.y.trunc() as i64])
                    .collect(),
            );
            ring.normalize_seam();
            ring
        })
        .collect()
}

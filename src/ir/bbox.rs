//! Integer pixel bounding boxes in XYXY order.

use crate::ir::model::Scalar;

/// The axis-aligned minimal rectangle containing a region's pixels, in the
/// original (untranslated) coordinate space. Inclusive on both ends: a single
/// pixel at `(5, 5)` has `xmin == xmax == 5`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelBBox {
    pub xmin: i64,
    pub ymin: i64,
    pub xmax: i64,
    pub ymax: i64,
}

impl PixelBBox {
    /// Computes the componentwise extremes of parallel pixel coordinate
    /// arrays. Returns `None` when the arrays are empty.
    pub fn from_pixels(xs: &[i64], ys: &[i64]) -> Option<Self> {
        let (&xmin, &xmax) = (xs.iter().min()?, xs.iter().max()?);
        let (&ymin, &ymax) = (ys.iter().min()?, ys.iter().max()?);
        Some(Self {
            xmin,
            ymin,
            xmax,
            ymax,
        })
    }

    /// Grid shape `(rows, cols)` of the tightly-bounding occupancy raster.
    pub fn grid_shape(&self) -> (usize, usize) {
        (
            (self.ymax - self.ymin + 1) as usize,
            (self.xmax - self.xmin + 1) as usize,
        )
    }

    /// The four bbox cells appended to a tabular row, in column order
    /// `bbox_x0, bbox_y0, bbox_x1, bbox_y1`.
    pub fn to_row_cells(&self) -> [Scalar; 4] {
        [
            self.xmin.into(),
            self.ymin.into(),
            self.xmax.into(),
            self.ymax.into(),
        ]
    }
}

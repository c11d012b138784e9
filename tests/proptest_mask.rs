use std::collections::BTreeSet;

use geo::{Contains, LineString, Point, Polygon};
use proptest::prelude::*;

use regionpoly::ir::{PixelBBox, Region, Ring};
use regionpoly::mask::OccupancyGrid;

/// Converts a grid-local ring into a float polygon for containment tests.
fn ring_polygon(ring: &Ring) -> Polygon<f64> {
    let coords: Vec<(f64, f64)> = ring
        .points()
        .iter()
        .map(|p| (p[0] as f64, p[1] as f64))
        .collect();
    Polygon::new(LineString::from(coords), vec![])
}

/// Rasterizes the rings back onto the grid: a cell is occupied when its
/// center falls inside any ring. Valid because the generated pixel sets are
/// too small to enclose interior holes and disjoint parts never overlap.
fn rasterize_back(rings: &[Ring], shape: (usize, usize)) -> BTreeSet<(usize, usize)> {
    let polygons: Vec<Polygon<f64>> = rings.iter().map(ring_polygon).collect();
    let mut occupied = BTreeSet::new();
    for row in 0..shape.0 {
        for col in 0..shape.1 {
            let center = Point::new(col as f64 + 0.5, row as f64 + 0.5);
            if polygons.iter().any(|poly| poly.contains(&center)) {
                occupied.insert((row, col));
            }
        }
    }
    occupied
}

/// Pixel sets are capped at 7 pixels: a ring of pixels enclosing a hole
/// needs at least 8, so every generated mask is hole-free and the
/// exterior-only boundary representation is exact.
fn arb_pixels() -> impl Strategy<Value = BTreeSet<(i64, i64)>> {
    prop::collection::btree_set((0..6i64, 0..6i64), 1..=7)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn boundaries_roundtrip_to_the_original_mask(pixels in arb_pixels()) {
        let region = Region::new(
            pixels.iter().map(|p| p.0).collect(),
            pixels.iter().map(|p| p.1).collect(),
        );
        let grid = OccupancyGrid::from_region(&region).expect("non-empty region");
        let rings = grid.boundaries();
        prop_assert!(!rings.is_empty());

        let bbox = grid.bbox();
        let expected: BTreeSet<(usize, usize)> = pixels
            .iter()
            .map(|&(x, y)| ((y - bbox.ymin) as usize, (x - bbox.xmin) as usize))
            .collect();
        let shape = grid.cells().dim();
        prop_assert_eq!(rasterize_back(&rings, shape), expected);
    }

    #[test]
    fn every_boundary_ring_is_closed(pixels in arb_pixels()) {
        let region = Region::new(
            pixels.iter().map(|p| p.0).collect(),
            pixels.iter().map(|p| p.1).collect(),
        );
        let rings = OccupancyGrid::from_region(&region).unwrap().boundaries();
        for ring in &rings {
            prop_assert!(ring.is_closed());
            prop_assert!(ring.len() >= 5);
        }
    }

    #[test]
    fn seam_normalization_is_a_noop_on_extracted_rings(pixels in arb_pixels()) {
        let region = Region::new(
            pixels.iter().map(|p| p.0).collect(),
            pixels.iter().map(|p| p.1).collect(),
        );
        let rings = OccupancyGrid::from_region(&region).unwrap().boundaries();
        for ring in rings {
            let mut again = ring.clone();
            again.normalize_seam();
            prop_assert_eq!(again, ring);
        }
    }

    #[test]
    fn bbox_matches_componentwise_extremes(pixels in arb_pixels()) {
        let xs: Vec<i64> = pixels.iter().map(|p| p.0).collect();
        let ys: Vec<i64> = pixels.iter().map(|p| p.1).collect();
        let bbox = PixelBBox::from_pixels(&xs, &ys).unwrap();
        prop_assert_eq!(bbox.xmin, *xs.iter().min().unwrap());
        prop_assert_eq!(bbox.xmax, *xs.iter().max().unwrap());
        prop_assert_eq!(bbox.ymin, *ys.iter().min().unwrap());
        prop_assert_eq!(bbox.ymax, *ys.iter().max().unwrap());
    }
}

//! Closed integer polygon rings and their canonicalization.
//!
//! Rings come out of the geometry union in grid-local coordinates with an
//! arbitrary start vertex. Canonicalization is domain-specific and happens
//! here: seam rotation, translation back into the original coordinate
//! space, and explicit closure.

/// An ordered sequence of integer `(x, y)` vertices describing a polygon
/// boundary. A well-formed ring is explicitly closed: the first and last
/// vertex are identical.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Ring {
    points: Vec<[i64; 2]>,
}

impl Ring {
    pub fn new(points: Vec<[i64; 2]>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[[i64; 2]] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => first == last,
            _ => false,
        }
    }

    /// Maps a grid-local ring back into the original coordinate space.
    pub fn translate(&mut self, dx: i64, dy: i64) {
        for point in &mut self.points {
            point[0] += dx;
            point[1] += dy;
        }
    }

    /// Ensures the ring is explicitly closed by appending a copy of the
    /// first vertex when needed. No-op on already-closed or empty rings.
    pub fn close(&mut self) {
        if !self.points.is_empty() && !self.is_closed() {
            let first = self.points[0];
            self.points.push(first);
        }
    }

    /// Removes the seam artifact a union/simplify pass can leave at the ring
    /// start: when the first vertex splits a straight edge (first, second,
    /// and second-to-last vertex share an x or a y value), drop the first
    /// and last vertex and re-close on the new first vertex, so the ring
    /// starts at a true corner. Idempotent on normalized rings.
    pub fn normalize_seam(&mut self) {
        if self.points.len() < 4 {
            return;
        }
        let first = self.points[0];
        let second = self.points[1];
        let penultimate = self.points[self.points.len() - 2];
        let seam = (first[0] == second[0] && first[0] == penultimate[0])
            || (first[1] == second[1] && first[1] == penultimate[1]);
        if seam {
            self.points.remove(0);
            self.points.pop();
            let head = self.points[0];
            self.points.push(head);
        }
    }
}

impl From<Vec<[i64; 2]>> for Ring {
    fn from(points: Vec<[i64; 2]>) -> Self {
        Ring::new(points)
    }
}

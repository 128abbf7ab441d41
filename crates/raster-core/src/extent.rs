//! Projected bounding boxes.

use serde::{Deserialize, Serialize};

/// A projected bounding box in map units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Extent {
    /// Create a new extent from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Width in map units.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height in map units.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// An extent is degenerate when it encloses no area.
    pub fn is_empty(&self) -> bool {
        self.max_x <= self.min_x || self.max_y <= self.min_y
    }

    /// Compute the intersection of two extents.
    ///
    /// Returns `None` when the boxes do not overlap (touching edges count
    /// as empty; a shared border contains no pixels).
    pub fn intersection(&self, other: &Extent) -> Option<Extent> {
        let candidate = Extent {
            min_x: self.min_x.max(other.min_x),
            min_y: self.min_y.max(other.min_y),
            max_x: self.max_x.min(other.max_x),
            max_y: self.max_y.min(other.max_y),
        };

        if candidate.is_empty() {
            None
        } else {
            Some(candidate)
        }
    }

    /// Check if a point is contained within this extent.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Compare two extents within an absolute tolerance per edge.
    pub fn approx_eq(&self, other: &Extent, tolerance: f64) -> bool {
        (self.min_x - other.min_x).abs() <= tolerance
            && (self.min_y - other.min_y).abs() <= tolerance
            && (self.max_x - other.max_x).abs() <= tolerance
            && (self.max_y - other.max_y).abs() <= tolerance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersection_overlapping() {
        let a = Extent::new(0.0, 0.0, 10.0, 10.0);
        let b = Extent::new(5.0, 5.0, 15.0, 15.0);

        let i = a.intersection(&b).unwrap();
        assert_eq!(i, Extent::new(5.0, 5.0, 10.0, 10.0));
        assert_eq!(i, b.intersection(&a).unwrap());
    }

    #[test]
    fn test_intersection_disjoint() {
        let a = Extent::new(0.0, 0.0, 10.0, 10.0);
        let b = Extent::new(20.0, 20.0, 30.0, 30.0);
        assert!(a.intersection(&b).is_none());
    }

    #[test]
    fn test_intersection_touching_edge_is_empty() {
        let a = Extent::new(0.0, 0.0, 10.0, 10.0);
        let b = Extent::new(10.0, 0.0, 20.0, 10.0);
        assert!(a.intersection(&b).is_none());
    }

    #[test]
    fn test_dimensions() {
        let e = Extent::new(100.0, 200.0, 160.0, 240.0);
        assert!((e.width() - 60.0).abs() < f64::EPSILON);
        assert!((e.height() - 40.0).abs() < f64::EPSILON);
        assert!(!e.is_empty());
    }

    #[test]
    fn test_approx_eq() {
        let a = Extent::new(0.0, 0.0, 10.0, 10.0);
        let b = Extent::new(0.0, 1e-9, 10.0, 10.0);
        assert!(a.approx_eq(&b, 1e-6));
        assert!(!a.approx_eq(&Extent::new(0.0, 0.5, 10.0, 10.0), 1e-6));
    }
}

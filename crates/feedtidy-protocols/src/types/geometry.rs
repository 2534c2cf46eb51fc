//! Rendered geometry.

use serde::{Deserialize, Serialize};

/// Bounding box of a rendered element in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    /// Whether the box describes something that is actually laid out:
    /// finite position and a positive height.
    pub fn is_measurable(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.height.is_finite() && self.height > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measurable_box() {
        assert!(BoundingBox::new(0.0, 20.0, 100.0, 10.0).is_measurable());
    }

    #[test]
    fn test_zero_height_is_not_measurable() {
        assert!(!BoundingBox::new(0.0, 20.0, 100.0, 0.0).is_measurable());
    }

    #[test]
    fn test_non_finite_is_not_measurable() {
        assert!(!BoundingBox::new(0.0, f64::NAN, 100.0, 10.0).is_measurable());
        assert!(!BoundingBox::new(f64::INFINITY, 0.0, 100.0, 10.0).is_measurable());
    }
}

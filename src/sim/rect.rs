//! Axis-aligned rectangle geometry for paddles and blocks
//!
//! Rectangles are stored by their top-left corner in court space
//! (y grows downward, matching the canvas the court is drawn on).

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Strict overlap between this rectangle and a circle's bounding box.
    ///
    /// Touching edges do not count, so a ball resting flush against a face
    /// is not re-detected on the next frame.
    pub fn overlaps_circle_bounds(&self, center: Vec2, radius: f32) -> bool {
        center.x + radius > self.left()
            && center.x - radius < self.right()
            && center.y + radius > self.top()
            && center.y - radius < self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_and_center() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(r.right(), 40.0);
        assert_eq!(r.bottom(), 60.0);
        assert_eq!(r.center(), Vec2::new(25.0, 40.0));
    }

    #[test]
    fn test_circle_bounds_overlap() {
        let r = Rect::new(90.0, 60.0, 10.0, 50.0);
        // Centre 5 px right of the face with radius 7: overlapping
        assert!(r.overlaps_circle_bounds(Vec2::new(105.0, 80.0), 7.0));
        // Exactly flush: not overlapping
        assert!(!r.overlaps_circle_bounds(Vec2::new(107.0, 80.0), 7.0));
        // Above the block entirely
        assert!(!r.overlaps_circle_bounds(Vec2::new(95.0, 40.0), 7.0));
    }
}

//! Rectangle and point math shared by layout, hit-testing, and snapping.
//!
//! All coordinates are absolute canvas pixels with the origin at the top-left
//! corner of the output frame. Nothing here allocates.

#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use serde::{Deserialize, Serialize};

/// A point in canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// An axis-aligned box in canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    #[must_use]
    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.center_x(), self.center_y())
    }

    /// Whether `pt` lies inside the box, edges included.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= self.x && pt.x <= self.right() && pt.y >= self.y && pt.y <= self.bottom()
    }

    /// Shrink to fit a `bounds_w` × `bounds_h` frame, then slide inside it.
    ///
    /// Size is reduced only when the box is larger than the frame itself;
    /// otherwise only the origin moves.
    #[must_use]
    pub fn clamped_into(self, bounds_w: f64, bounds_h: f64) -> Self {
        let width = self.width.min(bounds_w);
        let height = self.height.min(bounds_h);
        Self {
            x: clamp_origin(self.x, width, bounds_w),
            y: clamp_origin(self.y, height, bounds_h),
            width,
            height,
        }
    }
}

/// Clamp an origin coordinate so that `[origin, origin + extent]` stays in `[0, bound]`.
#[must_use]
pub fn clamp_origin(origin: f64, extent: f64, bound: f64) -> f64 {
    origin.min(bound - extent).max(0.0)
}

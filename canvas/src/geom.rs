//! Rectangle geometry: edge anchors and grid snapping.
//!
//! Everything here is pure and works in world (scene) coordinates.

#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use serde::{Deserialize, Serialize};

use crate::camera::Point;

/// Width and height of a box.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle given by its top-left corner and size.
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
    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    /// A `side` x `side` square centered on `center`.
    #[must_use]
    pub fn centered(center: Point, side: f64) -> Self {
        Self::new(center.x - side / 2.0, center.y - side / 2.0, side, side)
    }

    #[must_use]
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
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
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Inclusive containment test.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Grow the rectangle by `margin` on every side.
    #[must_use]
    pub fn inflate(&self, margin: f64) -> Self {
        Self::new(self.x - margin, self.y - margin, self.width + margin * 2.0, self.height + margin * 2.0)
    }
}

// =============================================================
// Anchors
// =============================================================

/// Midpoint of the left edge.
#[must_use]
pub fn anchor_left(rect: &Rect) -> Point {
    Point::new(rect.x, rect.y + rect.height / 2.0)
}

/// Midpoint of the right edge.
#[must_use]
pub fn anchor_right(rect: &Rect) -> Point {
    Point::new(rect.right(), rect.y + rect.height / 2.0)
}

/// Midpoint of the top edge.
#[must_use]
pub fn anchor_top(rect: &Rect) -> Point {
    Point::new(rect.x + rect.width / 2.0, rect.y)
}

/// Midpoint of the bottom edge.
#[must_use]
pub fn anchor_bottom(rect: &Rect) -> Point {
    Point::new(rect.x + rect.width / 2.0, rect.bottom())
}

// =============================================================
// Snapping
// =============================================================

/// Round a single coordinate to the nearest multiple of `grid`.
#[must_use]
pub fn snap_value(value: f64, grid: f64) -> f64 {
    if grid <= 0.0 {
        return value;
    }
    (value / grid).round() * grid
}

/// Round both axes of `p` to the nearest multiple of `grid`.
#[must_use]
pub fn snap_to_grid(p: Point, grid: f64) -> Point {
    Point::new(snap_value(p.x, grid), snap_value(p.y, grid))
}

/// Smallest multiple of `grid` that is at least `len`.
#[must_use]
pub fn round_up_to_grid(len: f64, grid: f64) -> f64 {
    if grid <= 0.0 {
        return len;
    }
    (len / grid).ceil() * grid
}

/// Snap a box by whichever of its corners lies closest to a grid intersection.
///
/// The four corners are visited top-left, top-right, bottom-left,
/// bottom-right; the first corner with the smallest Euclidean snap distance
/// wins. Returns the top-left that puts the chosen corner on the grid while
/// keeping `size` unchanged.
#[must_use]
pub fn snap_to_nearest_grid_corner(origin: Point, size: Size, grid: f64) -> Point {
    let corners = [
        Point::new(0.0, 0.0),
        Point::new(size.width, 0.0),
        Point::new(0.0, size.height),
        Point::new(size.width, size.height),
    ];

    let mut best = origin;
    let mut best_dist = f64::INFINITY;
    for offset in corners {
        let corner = origin + offset;
        let snapped = snap_to_grid(corner, grid);
        let dist = corner.distance(snapped);
        if dist < best_dist {
            best_dist = dist;
            best = snapped - offset;
        }
    }
    best
}

/// Clamp a box origin so the box stays inside `[0, bounds.width] x [0, bounds.height]`.
#[must_use]
pub fn clamp_origin(origin: Point, size: Size, bounds: Size) -> Point {
    let max_x = (bounds.width - size.width).max(0.0);
    let max_y = (bounds.height - size.height).max(0.0);
    Point::new(origin.x.clamp(0.0, max_x), origin.y.clamp(0.0, max_y))
}

/// Clamp an already snapped origin, with the far limits rounded down to the
/// grid so the result stays grid aligned for any scene size.
#[must_use]
pub fn clamp_snapped_origin(origin: Point, size: Size, bounds: Size, grid: f64) -> Point {
    if grid <= 0.0 {
        return clamp_origin(origin, size, bounds);
    }
    let max_x = ((bounds.width - size.width) / grid).floor().max(0.0) * grid;
    let max_y = ((bounds.height - size.height) / grid).floor().max(0.0) * grid;
    Point::new(origin.x.clamp(0.0, max_x), origin.y.clamp(0.0, max_y))
}

//! Connector lines: the curves drawn from a parent to each of its children.
//!
//! A connector never holds its endpoints' geometry. It stores the ids of the
//! two ends and the engine hands it the current rectangles whenever one of
//! them moves, so nodes and lines never own each other.

#[cfg(test)]
#[path = "connector_test.rs"]
mod connector_test;

use crate::camera::Point;
use crate::consts::{CONNECTOR_COLOR, CURVE_FACTOR, Z_CONNECTORS, Z_OVERLAY};
use crate::doc::NodeRef;
use crate::geom::{Rect, anchor_left, anchor_right};

/// A cubic Bezier segment.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CubicPath {
    pub start: Point,
    pub c1: Point,
    pub c2: Point,
    pub end: Point,
}

impl CubicPath {
    /// Curve from `start` to `end` leaving and entering horizontally.
    ///
    /// Control points sit `CURVE_FACTOR * |dx|` to the right of the start and
    /// to the left of the end, so the curve flattens as the span shrinks.
    #[must_use]
    pub fn horizontal(start: Point, end: Point) -> Self {
        let k = CURVE_FACTOR * (end.x - start.x).abs();
        Self {
            start,
            c1: Point::new(start.x + k, start.y),
            c2: Point::new(end.x - k, end.y),
            end,
        }
    }

    /// Evaluate the curve at `t` in `[0, 1]`.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point {
        let u = 1.0 - t;
        let a = u * u * u;
        let b = 3.0 * u * u * t;
        let c = 3.0 * u * t * t;
        let d = t * t * t;
        Point::new(
            a * self.start.x + b * self.c1.x + c * self.c2.x + d * self.end.x,
            a * self.start.y + b * self.c1.y + c * self.c2.y + d * self.end.y,
        )
    }

    /// SVG path data (`M ... C ...`).
    #[must_use]
    pub fn to_svg_d(&self) -> String {
        format!(
            "M {:.2} {:.2} C {:.2} {:.2}, {:.2} {:.2}, {:.2} {:.2}",
            self.start.x, self.start.y, self.c1.x, self.c1.y, self.c2.x, self.c2.y, self.end.x, self.end.y
        )
    }
}

/// One end of a connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum End {
    /// A node or the project root.
    Node(NodeRef),
    /// The creator handle of a node (start of a preview line).
    Handle(NodeRef),
    /// The floating destination marker (end of a preview line).
    Marker,
}

/// A curved line between two anchored ends.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectorLine {
    pub source: End,
    pub dest: End,
    pub color: String,
    pub z: i32,
    /// Hidden lines are kept but not drawn (the preview before the first move).
    pub visible: bool,
    path: CubicPath,
}

impl ConnectorLine {
    /// A parent -> child connector.
    #[must_use]
    pub fn between(source: NodeRef, dest: NodeRef) -> Self {
        Self {
            source: End::Node(source),
            dest: End::Node(dest),
            color: CONNECTOR_COLOR.to_string(),
            z: Z_CONNECTORS,
            visible: true,
            path: CubicPath::default(),
        }
    }

    /// The hidden preview line of a creation gesture, from `owner`'s handle to the marker.
    #[must_use]
    pub fn preview(owner: NodeRef) -> Self {
        Self {
            source: End::Handle(owner),
            dest: End::Marker,
            color: CONNECTOR_COLOR.to_string(),
            z: Z_OVERLAY,
            visible: false,
            path: CubicPath::default(),
        }
    }

    /// Whether this is a creation-gesture preview.
    #[must_use]
    pub fn is_preview(&self) -> bool {
        matches!(self.dest, End::Marker)
    }

    /// Recompute the curve from the current source and destination rectangles.
    pub fn recompute_path(&mut self, source_rect: &Rect, dest_rect: &Rect) {
        self.path = CubicPath::horizontal(anchor_right(source_rect), anchor_left(dest_rect));
    }

    /// The most recently computed curve.
    #[must_use]
    pub fn path(&self) -> &CubicPath {
        &self.path
    }

    /// Whether either end is `node`.
    #[must_use]
    pub fn touches(&self, node: NodeRef) -> bool {
        self.source == End::Node(node) || self.dest == End::Node(node)
    }
}

//! Scene nodes: the positioned, draggable box that shows one checklist.

#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;

use tracing::debug;

use crate::camera::Point;
use crate::doc::{Check, ChecklistId};
use crate::geom::{Rect, Size, clamp_origin, clamp_snapped_origin, snap_to_grid};

/// Result of a drag step: where the node ended up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragOutcome {
    pub id: ChecklistId,
    pub x: f64,
    pub y: f64,
}

/// One checklist on the canvas.
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub id: ChecklistId,
    pub parent_id: Option<ChecklistId>,
    title: String,
    checks: Vec<Check>,
    rect: Rect,
    /// Pointer offset from the top-left captured at drag start.
    grab: Option<Point>,
    /// Connectors touching this node, keyed by their destination checklist.
    lines: Vec<ChecklistId>,
}

impl SceneNode {
    #[must_use]
    pub fn new(id: ChecklistId, parent_id: Option<ChecklistId>, title: &str, checks: Vec<Check>, rect: Rect) -> Self {
        Self { id, parent_id, title: title.to_string(), checks, rect, grab: None, lines: Vec::new() }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn checks(&self) -> &[Check] {
        &self.checks
    }

    pub fn checks_mut(&mut self) -> &mut [Check] {
        &mut self.checks
    }

    #[must_use]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    #[must_use]
    pub fn is_grabbed(&self) -> bool {
        self.grab.is_some()
    }

    /// Replace the displayed title. The caller resizes the node afterwards.
    pub fn set_title(&mut self, title: &str) {
        title.clone_into(&mut self.title);
    }

    /// Replace the displayed checks. The caller resizes the node afterwards.
    pub fn set_checks(&mut self, checks: Vec<Check>) {
        self.checks = checks;
    }

    /// Resize the box, keeping its top-left.
    pub fn set_size(&mut self, size: Size) {
        self.rect.width = size.width;
        self.rect.height = size.height;
    }

    /// Move the box to `origin` without any drag bookkeeping.
    pub fn move_to(&mut self, origin: Point) {
        self.rect.x = origin.x;
        self.rect.y = origin.y;
    }

    // --- Connectors ---

    /// Record that the connector keyed by `key` touches this node.
    pub fn add_line(&mut self, key: ChecklistId) {
        if !self.lines.contains(&key) {
            self.lines.push(key);
        }
    }

    pub fn remove_line(&mut self, key: ChecklistId) {
        self.lines.retain(|k| *k != key);
    }

    /// Keys of the connectors that must be recomputed when this node moves.
    #[must_use]
    pub fn lines(&self) -> &[ChecklistId] {
        &self.lines
    }

    // --- Drag ---

    /// Begin a drag with the pointer at world-space `pointer`.
    pub fn on_drag_start(&mut self, pointer: Point) {
        self.grab = Some(pointer - self.rect.origin());
    }

    /// Follow the pointer, clamped to the scene. Returns `None` without a grab.
    pub fn on_drag_move(&mut self, pointer: Point, bounds: Size) -> Option<DragOutcome> {
        let Some(grab) = self.grab else {
            debug!(id = %self.id, "drag move without grab ignored");
            return None;
        };
        let origin = clamp_origin(pointer - grab, self.rect.size(), bounds);
        self.move_to(origin);
        Some(DragOutcome { id: self.id, x: origin.x, y: origin.y })
    }

    /// Finish the drag: follow the pointer, snap to the grid, clamp again.
    pub fn on_drag_end(&mut self, pointer: Point, bounds: Size, grid: f64) -> Option<DragOutcome> {
        let Some(grab) = self.grab.take() else {
            debug!(id = %self.id, "drag end without grab ignored");
            return None;
        };
        let size = self.rect.size();
        let free = clamp_origin(pointer - grab, size, bounds);
        let origin = clamp_snapped_origin(snap_to_grid(free, grid), size, bounds, grid);
        self.move_to(origin);
        Some(DragOutcome { id: self.id, x: origin.x, y: origin.y })
    }

    /// Abandon a drag in progress, leaving the node where it is.
    pub fn cancel_drag(&mut self) {
        self.grab = None;
    }
}

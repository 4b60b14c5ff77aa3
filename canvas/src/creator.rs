//! Creator handles: the small control on a node's right edge that is dragged
//! out to create a child.
//!
//! The handle only tracks the gesture; the engine owns the preview line and
//! the destination marker and decides what a finished gesture creates.

#[cfg(test)]
#[path = "creator_test.rs"]
mod creator_test;

use tracing::debug;

use crate::camera::Point;
use crate::consts::CREATOR_SIZE;
use crate::doc::NodeRef;
use crate::geom::{Rect, anchor_right};

/// Gesture state of one creator handle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum CreatorState {
    #[default]
    Idle,
    /// Pressed, pointer not moved yet.
    Armed,
    /// Pressed and moved; the marker follows `pointer`.
    Dragging { pointer: Point },
}

/// What a handle event asks the engine to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CreatorSignal {
    /// Pressed: set up a hidden preview from this handle.
    CreateStart { owner: NodeRef },
    /// First move after press: show the marker and preview.
    ShowMarker { owner: NodeRef, at: Point },
    /// Later moves: follow the pointer.
    MarkerMoved { owner: NodeRef, at: Point },
    /// Released after dragging: create a child at the drop point.
    CreateEnd { owner: NodeRef, drop: Point },
    /// Released without moving, or cancelled.
    Cancelled { owner: NodeRef },
}

/// A creator handle attached to a node or to the root.
#[derive(Debug, Clone)]
pub struct CreatorHandle {
    pub owner: NodeRef,
    rect: Rect,
    state: CreatorState,
}

impl CreatorHandle {
    /// A handle for `owner`, placed on the right-center edge of `owner_rect`.
    #[must_use]
    pub fn new(owner: NodeRef, owner_rect: &Rect) -> Self {
        let mut handle = Self { owner, rect: Rect::default(), state: CreatorState::Idle };
        handle.reposition(owner_rect);
        handle
    }

    /// Recompute the handle position from the owner's box extents.
    pub fn reposition(&mut self, owner_rect: &Rect) {
        self.rect = Rect::centered(anchor_right(owner_rect), CREATOR_SIZE);
    }

    #[must_use]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    #[must_use]
    pub fn state(&self) -> CreatorState {
        self.state
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state != CreatorState::Idle
    }

    /// Pointer pressed on the handle.
    pub fn press(&mut self) -> Option<CreatorSignal> {
        if self.is_active() {
            debug!(owner = ?self.owner, "creator already pressed");
            return None;
        }
        self.state = CreatorState::Armed;
        Some(CreatorSignal::CreateStart { owner: self.owner })
    }

    /// Pointer moved to world-space `pointer` while the gesture is live.
    pub fn drag(&mut self, pointer: Point) -> Option<CreatorSignal> {
        match self.state {
            CreatorState::Idle => None,
            CreatorState::Armed => {
                self.state = CreatorState::Dragging { pointer };
                Some(CreatorSignal::ShowMarker { owner: self.owner, at: pointer })
            }
            CreatorState::Dragging { .. } => {
                self.state = CreatorState::Dragging { pointer };
                Some(CreatorSignal::MarkerMoved { owner: self.owner, at: pointer })
            }
        }
    }

    /// Pointer released at world-space `pointer`.
    pub fn release(&mut self, pointer: Point) -> Option<CreatorSignal> {
        let previous = std::mem::take(&mut self.state);
        match previous {
            CreatorState::Idle => None,
            CreatorState::Armed => Some(CreatorSignal::Cancelled { owner: self.owner }),
            CreatorState::Dragging { .. } => Some(CreatorSignal::CreateEnd { owner: self.owner, drop: pointer }),
        }
    }

    /// Abort a live gesture.
    pub fn cancel(&mut self) -> Option<CreatorSignal> {
        let previous = std::mem::take(&mut self.state);
        (previous != CreatorState::Idle).then_some(CreatorSignal::Cancelled { owner: self.owner })
    }
}

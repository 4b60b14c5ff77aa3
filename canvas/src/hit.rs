#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::{Camera, Point};
use crate::consts::HANDLE_RADIUS_PX;
use crate::doc::NodeRef;
use crate::layout::{Metrics, delete_button_rect, edit_button_rect};
use crate::scene::Scene;

/// Which part of a node was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    /// The head strip (title); starts a drag.
    Head,
    /// Body area outside any check row; starts a drag.
    Body,
    /// Check row at the given index.
    Check(usize),
    EditButton,
    DeleteButton,
    /// The creator handle on the right edge.
    Creator,
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub target: NodeRef,
    pub part: HitPart,
}

/// Find what is under `world_pt`.
///
/// Creator handles are tested first (they overlap node edges), with a
/// screen-constant slop. Then checklist nodes, most recently added first,
/// then the root box. `None` means empty background.
#[must_use]
pub fn hit_test(world_pt: Point, scene: &Scene, metrics: &Metrics, camera: &Camera) -> Option<Hit> {
    let slop = camera.screen_dist_to_world(HANDLE_RADIUS_PX);

    for handle in scene.creators() {
        if handle.rect().inflate(slop).contains(world_pt) {
            return Some(Hit { target: handle.owner, part: HitPart::Creator });
        }
    }

    for node in scene.nodes_topmost_first() {
        let rect = node.rect();
        if !rect.contains(world_pt) {
            continue;
        }
        let target = NodeRef::Checklist(node.id);
        let part = if delete_button_rect(&rect).contains(world_pt) {
            HitPart::DeleteButton
        } else if edit_button_rect(&rect).contains(world_pt) {
            HitPart::EditButton
        } else if metrics.head_rect(&rect).contains(world_pt) {
            HitPart::Head
        } else if let Some(index) = metrics.row_at(&rect, world_pt.y, node.checks().len()) {
            HitPart::Check(index)
        } else {
            HitPart::Body
        };
        return Some(Hit { target, part });
    }

    scene
        .root_rect()
        .contains(world_pt)
        .then_some(Hit { target: NodeRef::Root, part: HitPart::Body })
}

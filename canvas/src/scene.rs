//! Scene graph: an arena of nodes keyed by id, their creator handles, the
//! parent -> children index and the connectors between them.
//!
//! Connectors are keyed by their destination checklist, since every
//! checklist has exactly one incoming line (from its parent or the root).
//! Geometry is always re-resolved by id, so moving a node only needs
//! [`Scene::refresh_node`].

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use std::collections::BTreeMap;

use tracing::debug;

use crate::camera::Point;
use crate::connector::{ConnectorLine, End};
use crate::consts::MARKER_SIZE;
use crate::creator::CreatorHandle;
use crate::doc::{ChecklistId, NodeRef};
use crate::geom::Rect;
use crate::node::SceneNode;

/// The creation-gesture overlay: preview line and destination marker.
#[derive(Debug, Clone)]
pub struct Preview {
    pub owner: NodeRef,
    pub line: ConnectorLine,
    /// Marker rectangle; `None` until the pointer first moves.
    pub marker: Option<Rect>,
}

/// All positioned content of one open project.
#[derive(Debug, Clone)]
pub struct Scene {
    root_title: String,
    root_rect: Rect,
    nodes: BTreeMap<ChecklistId, SceneNode>,
    /// Insertion order, oldest first; later nodes are drawn and hit on top.
    order: Vec<ChecklistId>,
    creators: BTreeMap<NodeRef, CreatorHandle>,
    connectors: BTreeMap<ChecklistId, ConnectorLine>,
    children: BTreeMap<NodeRef, Vec<ChecklistId>>,
    preview: Option<Preview>,
}

impl Scene {
    /// An empty scene with the project root box at `root_rect`.
    #[must_use]
    pub fn new(root_title: &str, root_rect: Rect) -> Self {
        let mut creators = BTreeMap::new();
        creators.insert(NodeRef::Root, CreatorHandle::new(NodeRef::Root, &root_rect));
        Self {
            root_title: root_title.to_string(),
            root_rect,
            nodes: BTreeMap::new(),
            order: Vec::new(),
            creators,
            connectors: BTreeMap::new(),
            children: BTreeMap::new(),
            preview: None,
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn root_title(&self) -> &str {
        &self.root_title
    }

    #[must_use]
    pub fn root_rect(&self) -> Rect {
        self.root_rect
    }

    #[must_use]
    pub fn node(&self, id: &ChecklistId) -> Option<&SceneNode> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: &ChecklistId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id)
    }

    #[must_use]
    pub fn contains(&self, id: &ChecklistId) -> bool {
        self.nodes.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in draw order (bottom first).
    pub fn nodes(&self) -> impl Iterator<Item = &SceneNode> {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    /// Nodes in hit-test order (top first).
    pub fn nodes_topmost_first(&self) -> impl Iterator<Item = &SceneNode> {
        self.order.iter().rev().filter_map(|id| self.nodes.get(id))
    }

    pub fn creators(&self) -> impl Iterator<Item = &CreatorHandle> {
        self.creators.values()
    }

    pub fn creator_mut(&mut self, owner: NodeRef) -> Option<&mut CreatorHandle> {
        self.creators.get_mut(&owner)
    }

    #[must_use]
    pub fn creator(&self, owner: NodeRef) -> Option<&CreatorHandle> {
        self.creators.get(&owner)
    }

    pub fn connectors(&self) -> impl Iterator<Item = (&ChecklistId, &ConnectorLine)> {
        self.connectors.iter()
    }

    /// The incoming connector of checklist `child`.
    #[must_use]
    pub fn connector(&self, child: &ChecklistId) -> Option<&ConnectorLine> {
        self.connectors.get(child)
    }

    /// Children attached under `parent`, in attachment order.
    #[must_use]
    pub fn children_of(&self, parent: NodeRef) -> &[ChecklistId] {
        self.children.get(&parent).map_or(&[], Vec::as_slice)
    }

    /// Current rectangle of a node or the root.
    #[must_use]
    pub fn rect_of(&self, node: NodeRef) -> Option<Rect> {
        match node {
            NodeRef::Root => Some(self.root_rect),
            NodeRef::Checklist(id) => self.nodes.get(&id).map(SceneNode::rect),
        }
    }

    #[must_use]
    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    /// Whether following parent links from `id` leads back to `id`.
    #[must_use]
    pub fn in_parent_cycle(&self, id: ChecklistId) -> bool {
        let mut current = self.nodes.get(&id).and_then(|n| n.parent_id);
        for _ in 0..self.nodes.len() {
            let Some(cur) = current else {
                return false;
            };
            if cur == id {
                return true;
            }
            current = self.nodes.get(&cur).and_then(|n| n.parent_id);
        }
        false
    }

    // --- Mutation ---

    /// Add a node and its creator handle. Connectors are wired separately.
    pub fn insert_node(&mut self, node: SceneNode) {
        let id = node.id;
        let owner = NodeRef::Checklist(id);
        self.creators.insert(owner, CreatorHandle::new(owner, &node.rect()));
        if !self.nodes.contains_key(&id) {
            self.order.push(id);
        }
        self.nodes.insert(id, node);
    }

    /// Remove a node and its creator handle. Its connector must be detached first.
    pub fn remove_node(&mut self, id: &ChecklistId) -> Option<SceneNode> {
        self.creators.remove(&NodeRef::Checklist(*id));
        self.order.retain(|o| o != id);
        self.nodes.remove(id)
    }

    /// Wire the connector `parent -> child` and record it in the child index.
    ///
    /// Returns `false` (and changes nothing) when either end is missing or
    /// the child already has an incoming connector.
    pub fn connect(&mut self, parent: NodeRef, child: ChecklistId) -> bool {
        if self.connectors.contains_key(&child) {
            debug!(%child, "child already connected");
            return false;
        }
        let (Some(src), Some(dst)) = (self.rect_of(parent), self.rect_of(NodeRef::Checklist(child))) else {
            return false;
        };
        let mut line = ConnectorLine::between(parent, NodeRef::Checklist(child));
        line.recompute_path(&src, &dst);
        self.connectors.insert(child, line);
        self.children.entry(parent).or_default().push(child);
        if let Some(node) = self.nodes.get_mut(&child) {
            node.add_line(child);
        }
        if let NodeRef::Checklist(pid) = parent {
            if let Some(node) = self.nodes.get_mut(&pid) {
                node.add_line(child);
            }
        }
        true
    }

    /// Remove the incoming connector of `child` and detach it from its
    /// parent's child list, pruning the list if it becomes empty.
    pub fn disconnect(&mut self, child: ChecklistId) -> Option<ConnectorLine> {
        let line = self.connectors.remove(&child)?;
        if let End::Node(parent) = line.source {
            if let Some(list) = self.children.get_mut(&parent) {
                list.retain(|c| *c != child);
                if list.is_empty() {
                    self.children.remove(&parent);
                }
            }
            if let NodeRef::Checklist(pid) = parent {
                if let Some(node) = self.nodes.get_mut(&pid) {
                    node.remove_line(child);
                }
            }
        }
        if let Some(node) = self.nodes.get_mut(&child) {
            node.remove_line(child);
        }
        Some(line)
    }

    /// Reposition the creator handle of `id` and recompute every connector
    /// touching it. Call after any move or resize.
    pub fn refresh_node(&mut self, id: ChecklistId) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        let rect = node.rect();
        let lines = node.lines().to_vec();
        if let Some(handle) = self.creators.get_mut(&NodeRef::Checklist(id)) {
            handle.reposition(&rect);
        }
        for key in lines {
            self.recompute_connector(key);
        }
    }

    fn recompute_connector(&mut self, key: ChecklistId) {
        let Some(line) = self.connectors.get(&key) else {
            return;
        };
        let (End::Node(src), End::Node(dst)) = (line.source, line.dest) else {
            return;
        };
        let (Some(src_rect), Some(dst_rect)) = (self.rect_of(src), self.rect_of(dst)) else {
            return;
        };
        if let Some(line) = self.connectors.get_mut(&key) {
            line.recompute_path(&src_rect, &dst_rect);
        }
    }

    // --- Creation preview ---

    /// Start a hidden preview line from `owner`'s creator handle.
    pub fn begin_preview(&mut self, owner: NodeRef) {
        self.preview = Some(Preview { owner, line: ConnectorLine::preview(owner), marker: None });
    }

    /// Show or move the destination marker centered on `at` and recompute the preview.
    pub fn move_marker(&mut self, at: Point) {
        let Some(preview) = self.preview.as_mut() else {
            return;
        };
        let Some(handle) = self.creators.get(&preview.owner) else {
            return;
        };
        let marker = Rect::centered(at, MARKER_SIZE);
        preview.marker = Some(marker);
        preview.line.visible = true;
        preview.line.recompute_path(&handle.rect(), &marker);
    }

    /// Drop the preview line and marker.
    pub fn clear_preview(&mut self) -> Option<Preview> {
        self.preview.take()
    }
}

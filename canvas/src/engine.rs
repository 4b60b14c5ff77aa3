//! The workspace canvas: scene, camera, gesture state and persistence glue.
//!
//! DESIGN
//! ======
//! Every handler takes `&mut self`, mutates in-memory state first and then
//! returns the [`Action`]s the host should react to. Storage calls go
//! through the injected [`Gateway`] at the end of a gesture and block the
//! caller.
//!
//! ERROR HANDLING
//! ==============
//! Pointer input that does not fit the current gesture is ignored with a
//! debug log. Explicit operations (delete, edit, toggle) return
//! [`CanvasError`]. A failed storage write leaves the in-memory scene as
//! already updated; nothing is rolled back or retried.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use tracing::{debug, info, warn};

use crate::camera::{Camera, Point};
use crate::consts::{
    GRID_SIZE, ROOT_HEIGHT, ROOT_ORIGIN_X, ROOT_ORIGIN_Y, ROOT_WIDTH, SCENE_HEIGHT, SCENE_WIDTH, ZOOM_OUT_EXTENT,
};
use crate::creator::{CreatorHandle, CreatorSignal};
use crate::diff::diff_checks;
use crate::doc::{Check, CheckId, CheckState, Checklist, ChecklistDraft, ChecklistId, NodeRef, Project, ProjectId};
use crate::gateway::{Gateway, GatewayError};
use crate::geom::{Rect, Size, clamp_origin, clamp_snapped_origin, snap_to_grid, snap_to_nearest_grid_corner};
use crate::hit::{Hit, HitPart, hit_test};
use crate::input::{Button, InputEvent, InputState, Key, Modifiers, WheelDelta};
use crate::layout::Metrics;
use crate::node::SceneNode;
use crate::scene::Scene;

// =============================================================================
// TYPES
// =============================================================================

/// Tunables for one canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasConfig {
    pub grid_size: f64,
    pub scene_width: f64,
    pub scene_height: f64,
    /// Side of the square region shown by the zoomed-out view.
    pub zoom_out_extent: f64,
    /// Top-left of the project root box.
    pub root_origin: Point,
    pub metrics: Metrics,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            grid_size: GRID_SIZE,
            scene_width: SCENE_WIDTH,
            scene_height: SCENE_HEIGHT,
            zoom_out_extent: ZOOM_OUT_EXTENT,
            root_origin: Point::new(ROOT_ORIGIN_X, ROOT_ORIGIN_Y),
            metrics: Metrics::default(),
        }
    }
}

impl CanvasConfig {
    #[must_use]
    pub fn scene_bounds(&self) -> Size {
        Size::new(self.scene_width, self.scene_height)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CanvasError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error("checklist not found on canvas: {0}")]
    NodeNotFound(ChecklistId),
    #[error("checklist {id} still has {count} children")]
    HasChildren { id: ChecklistId, count: usize },
    #[error("check {check} not found on checklist {checklist}")]
    CheckNotFound { checklist: ChecklistId, check: CheckId },
    #[error("invalid checklist: {0}")]
    InvalidDraft(String),
    #[error("no editor is open")]
    NoEditorOpen,
}

/// What an open content editor will be applied to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditorTarget {
    /// A child of `owner` to be spawned near `drop`.
    NewChild { owner: NodeRef, drop: Point },
    /// An existing checklist.
    Edit(ChecklistId),
}

/// Actions returned from handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Transient position during a drag; not persisted.
    NodeMoved { id: ChecklistId, x: f64, y: f64 },
    /// Final snapped position, persisted.
    PositionChanged { id: ChecklistId, x: f64, y: f64 },
    CreateStarted { owner: NodeRef },
    CreateCancelled { owner: NodeRef },
    /// Open the content editor pre-filled with `draft`.
    EditorRequested { target: EditorTarget, draft: ChecklistDraft },
    NodeCreated { id: ChecklistId, parent_id: Option<ChecklistId>, x: f64, y: f64 },
    NodeUpdated { id: ChecklistId },
    NodeDeleted { id: ChecklistId },
    CheckToggled { checklist_id: ChecklistId, check_id: CheckId, state: CheckState },
    /// The 1:1 viewport center was persisted.
    ViewChanged { x: f64, y: f64 },
    ZoomToggled { zoomed_out: bool },
    SetCursor(String),
    ProjectSwitchRequested,
    RenderNeeded,
}

// =============================================================================
// CANVAS
// =============================================================================

/// One open project.
pub struct Canvas<G: Gateway> {
    gateway: G,
    config: CanvasConfig,
    project: Project,
    scene: Scene,
    camera: Camera,
    input: InputState,
    viewport: Size,
    zoomed_out: bool,
    /// Viewport center at 1:1; restored when zooming back in.
    center: Point,
    /// Center of the zoomed-out square.
    fit_center: Point,
    editor: Option<EditorTarget>,
    cursor: &'static str,
}

impl<G: Gateway> Canvas<G> {
    /// Load `project_id` from `gateway` and build its scene.
    ///
    /// # Errors
    ///
    /// Returns a gateway error if the project cannot be read.
    pub fn open(mut gateway: G, project_id: ProjectId, config: CanvasConfig) -> Result<Self, CanvasError> {
        let project = gateway.get_project(project_id)?;
        gateway.update_project_last_accessed(project_id)?;
        let checklists = gateway.list_checklists(project_id)?;

        let root_rect = Rect::new(config.root_origin.x, config.root_origin.y, ROOT_WIDTH, ROOT_HEIGHT);
        let scene = build_scene(&project.title, root_rect, checklists, &config);

        let center = match (project.view_x, project.view_y) {
            (Some(x), Some(y)) => Point::new(x, y),
            _ => root_rect.center(),
        };
        let zoomed_out = project.zoomed_out;
        info!(%project_id, nodes = scene.len(), zoomed_out, "canvas loaded");

        let mut canvas = Self {
            gateway,
            config,
            project,
            scene,
            camera: Camera::default(),
            input: InputState::default(),
            viewport: Size::default(),
            zoomed_out,
            center,
            fit_center: center,
            editor: None,
            cursor: "default",
        };
        canvas.apply_view();
        Ok(canvas)
    }

    // --- Queries ---

    #[must_use]
    pub fn project(&self) -> &Project {
        &self.project
    }

    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    #[must_use]
    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    #[must_use]
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    #[must_use]
    pub fn input_state(&self) -> InputState {
        self.input
    }

    #[must_use]
    pub fn is_zoomed_out(&self) -> bool {
        self.zoomed_out
    }

    /// The 1:1 viewport center, as persisted.
    #[must_use]
    pub fn view_center(&self) -> Point {
        self.center
    }

    #[must_use]
    pub fn editor(&self) -> Option<EditorTarget> {
        self.editor
    }

    #[must_use]
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn gateway_mut(&mut self) -> &mut G {
        &mut self.gateway
    }

    /// Give the gateway back to the host.
    #[must_use]
    pub fn into_gateway(self) -> G {
        self.gateway
    }

    // --- Viewport ---

    /// Resize the viewport, keeping the current view center.
    pub fn set_viewport(&mut self, width: f64, height: f64) -> Vec<Action> {
        self.viewport = Size::new(width.max(0.0), height.max(0.0));
        self.apply_view();
        vec![Action::RenderNeeded]
    }

    fn apply_view(&mut self) {
        let Size { width, height } = self.viewport;
        if self.zoomed_out {
            self.camera.fit_square(self.fit_center, self.config.zoom_out_extent, width, height);
        } else {
            self.camera.zoom = 1.0;
            self.camera.center_on(self.center, width, height);
        }
    }

    /// Pan by a screen delta; while zoomed out the saved 1:1 center moves by
    /// the same world delta.
    fn pan_view(&mut self, dx: f64, dy: f64) {
        let Size { width, height } = self.viewport;
        let before = self.camera.center(width, height);
        self.camera.pan_by(dx, dy);
        let after = self.camera.center(width, height);
        if self.zoomed_out {
            self.fit_center = after;
            self.center = self.center + (after - before);
        } else {
            self.center = after;
        }
    }

    fn persist_view(&mut self) -> Result<Action, CanvasError> {
        self.gateway.update_project_view(self.project.id, self.center.x, self.center.y)?;
        self.project.view_x = Some(self.center.x);
        self.project.view_y = Some(self.center.y);
        Ok(Action::ViewChanged { x: self.center.x, y: self.center.y })
    }

    /// Toggle between 1:1 and the zoomed-out view around `world`.
    ///
    /// # Errors
    ///
    /// Returns a gateway error if the view cannot be persisted.
    pub fn toggle_zoom(&mut self, world: Point) -> Result<Vec<Action>, CanvasError> {
        self.zoomed_out = !self.zoomed_out;
        if self.zoomed_out {
            self.fit_center = world;
        }
        self.apply_view();
        self.gateway.update_project_zoomed_out(self.project.id, self.zoomed_out)?;
        self.project.zoomed_out = self.zoomed_out;
        debug!(zoomed_out = self.zoomed_out, zoom = self.camera.zoom, "zoom toggled");
        let view = self.persist_view()?;
        Ok(vec![Action::ZoomToggled { zoomed_out: self.zoomed_out }, view, Action::RenderNeeded])
    }

    // --- Pointer input ---

    /// # Errors
    ///
    /// Returns an error if a check toggle cannot be persisted.
    pub fn on_pointer_down(
        &mut self,
        screen_pt: Point,
        button: Button,
        _modifiers: Modifiers,
    ) -> Result<Vec<Action>, CanvasError> {
        if self.editor.is_some() {
            debug!("pointer down ignored while editor is open");
            return Ok(Vec::new());
        }
        if !self.input.is_idle() {
            debug!(state = ?self.input, "pointer down during gesture ignored");
            return Ok(Vec::new());
        }
        let world = self.camera.screen_to_world(screen_pt);
        let hit = hit_test(world, &self.scene, &self.config.metrics, &self.camera);

        let Some(Hit { target, part }) = hit else {
            return Ok(self.start_pan(screen_pt, button));
        };
        match (target, part) {
            (NodeRef::Checklist(id), HitPart::Check(index)) if button != Button::Middle => {
                self.toggle_check_at(id, index, button == Button::Secondary)
            }
            _ if button != Button::Primary => Ok(self.start_pan(screen_pt, button)),
            (_, HitPart::Creator) => Ok(self.start_create(target)),
            (NodeRef::Checklist(id), HitPart::Head | HitPart::Body) => Ok(self.start_drag(id, world)),
            (NodeRef::Checklist(id), HitPart::EditButton | HitPart::DeleteButton) => {
                self.input = InputState::PressingButton { id, part };
                Ok(Vec::new())
            }
            _ => Ok(self.start_pan(screen_pt, button)),
        }
    }

    /// Primary or middle press on the background (or the root box) pans.
    fn start_pan(&mut self, screen_pt: Point, button: Button) -> Vec<Action> {
        if button == Button::Secondary {
            return Vec::new();
        }
        self.input =
            InputState::Panning { last_screen: screen_pt, start_center: self.center, start_fit: self.fit_center };
        self.set_cursor("grabbing")
    }

    /// # Errors
    ///
    /// Does not fail; fallible like the other pointer handlers.
    pub fn on_pointer_move(&mut self, screen_pt: Point, _modifiers: Modifiers) -> Result<Vec<Action>, CanvasError> {
        let world = self.camera.screen_to_world(screen_pt);
        match self.input {
            InputState::Idle => {
                if self.editor.is_some() {
                    return Ok(Vec::new());
                }
                let hit = hit_test(world, &self.scene, &self.config.metrics, &self.camera);
                Ok(self.set_cursor(cursor_for(hit)))
            }
            InputState::Panning { last_screen, start_center, start_fit } => {
                let delta = screen_pt - last_screen;
                self.pan_view(delta.x, delta.y);
                self.input = InputState::Panning { last_screen: screen_pt, start_center, start_fit };
                Ok(vec![Action::RenderNeeded])
            }
            InputState::DraggingNode { id, .. } => {
                let bounds = self.config.scene_bounds();
                let Some(moved) = self.scene.node_mut(&id).and_then(|n| n.on_drag_move(world, bounds)) else {
                    return Ok(Vec::new());
                };
                self.scene.refresh_node(id);
                Ok(vec![Action::NodeMoved { id, x: moved.x, y: moved.y }, Action::RenderNeeded])
            }
            InputState::Creating { owner } => {
                let Some(signal) = self.scene.creator_mut(owner).and_then(|h| h.drag(world)) else {
                    return Ok(Vec::new());
                };
                match signal {
                    CreatorSignal::ShowMarker { at, .. } | CreatorSignal::MarkerMoved { at, .. } => {
                        self.scene.move_marker(at);
                        Ok(vec![Action::RenderNeeded])
                    }
                    other => {
                        debug!(?other, "unexpected creator signal on move");
                        Ok(Vec::new())
                    }
                }
            }
            InputState::PressingButton { .. } => Ok(Vec::new()),
        }
    }

    /// # Errors
    ///
    /// Returns an error if the gesture's result cannot be persisted, or if a
    /// pressed delete button hits a checklist that still has children.
    pub fn on_pointer_up(
        &mut self,
        screen_pt: Point,
        _button: Button,
        _modifiers: Modifiers,
    ) -> Result<Vec<Action>, CanvasError> {
        let world = self.camera.screen_to_world(screen_pt);
        match std::mem::take(&mut self.input) {
            InputState::Idle => {
                debug!("pointer up without gesture ignored");
                Ok(Vec::new())
            }
            InputState::Panning { last_screen, .. } => {
                let delta = screen_pt - last_screen;
                self.pan_view(delta.x, delta.y);
                let mut actions = self.set_cursor("default");
                actions.push(self.persist_view()?);
                actions.push(Action::RenderNeeded);
                Ok(actions)
            }
            InputState::DraggingNode { id, .. } => self.finish_drag(id, world),
            InputState::Creating { owner } => Ok(self.finish_create(owner, world)),
            InputState::PressingButton { id, part } => {
                let hit = hit_test(world, &self.scene, &self.config.metrics, &self.camera);
                if hit != Some(Hit { target: NodeRef::Checklist(id), part }) {
                    debug!(%id, "button released elsewhere");
                    return Ok(Vec::new());
                }
                match part {
                    HitPart::EditButton => self.open_editor(id),
                    HitPart::DeleteButton => self.delete_node(id),
                    _ => Ok(Vec::new()),
                }
            }
        }
    }

    /// Double-click on empty background toggles the zoomed-out view.
    ///
    /// # Errors
    ///
    /// Returns a gateway error if the view cannot be persisted.
    pub fn on_double_click(&mut self, screen_pt: Point) -> Result<Vec<Action>, CanvasError> {
        if self.editor.is_some() || !self.input.is_idle() {
            return Ok(Vec::new());
        }
        let world = self.camera.screen_to_world(screen_pt);
        match hit_test(world, &self.scene, &self.config.metrics, &self.camera) {
            None => self.toggle_zoom(world),
            Some(_) => Ok(Vec::new()),
        }
    }

    /// Wheel scrolling pans the view and persists it.
    ///
    /// # Errors
    ///
    /// Returns a gateway error if the view cannot be persisted.
    pub fn on_wheel(
        &mut self,
        _screen_pt: Point,
        delta: WheelDelta,
        _modifiers: Modifiers,
    ) -> Result<Vec<Action>, CanvasError> {
        if delta.dx == 0.0 && delta.dy == 0.0 {
            return Ok(Vec::new());
        }
        self.pan_view(-delta.dx, -delta.dy);
        Ok(vec![self.persist_view()?, Action::RenderNeeded])
    }

    /// Escape cancels the active gesture, then an open editor.
    ///
    /// # Errors
    ///
    /// Does not fail; fallible like the other input handlers.
    pub fn on_key_down(&mut self, key: &Key, _modifiers: Modifiers) -> Result<Vec<Action>, CanvasError> {
        if !key.is_escape() {
            return Ok(Vec::new());
        }
        match std::mem::take(&mut self.input) {
            InputState::Creating { owner } => {
                let signal = self.scene.creator_mut(owner).and_then(CreatorHandle::cancel);
                Ok(self.abandon_create(owner, signal))
            }
            InputState::Panning { start_center, start_fit, .. } => {
                self.center = start_center;
                self.fit_center = start_fit;
                self.apply_view();
                let mut actions = self.set_cursor("default");
                actions.push(Action::RenderNeeded);
                Ok(actions)
            }
            InputState::DraggingNode { id, orig } => {
                if let Some(node) = self.scene.node_mut(&id) {
                    node.cancel_drag();
                    node.move_to(orig);
                }
                self.scene.refresh_node(id);
                Ok(vec![Action::NodeMoved { id, x: orig.x, y: orig.y }, Action::RenderNeeded])
            }
            InputState::Idle if self.editor.is_some() => self.cancel_editor(),
            _ => Ok(self.set_cursor("default")),
        }
    }

    /// Replay one recorded input event.
    ///
    /// # Errors
    ///
    /// Returns whatever the dispatched handler returns.
    pub fn apply_input(&mut self, event: &InputEvent) -> Result<Vec<Action>, CanvasError> {
        match event {
            InputEvent::Viewport { width, height } => Ok(self.set_viewport(*width, *height)),
            InputEvent::Down { x, y, button, modifiers } => self.on_pointer_down(Point::new(*x, *y), *button, *modifiers),
            InputEvent::Move { x, y, modifiers } => self.on_pointer_move(Point::new(*x, *y), *modifiers),
            InputEvent::Up { x, y, button, modifiers } => self.on_pointer_up(Point::new(*x, *y), *button, *modifiers),
            InputEvent::DoubleClick { x, y } => self.on_double_click(Point::new(*x, *y)),
            InputEvent::Wheel { x, y, dx, dy } => {
                self.on_wheel(Point::new(*x, *y), WheelDelta { dx: *dx, dy: *dy }, Modifiers::default())
            }
            InputEvent::Key { key, modifiers } => self.on_key_down(&Key(key.clone()), *modifiers),
            InputEvent::Submit { draft } => self.submit_editor(draft),
            InputEvent::CancelEditor => self.cancel_editor(),
        }
    }

    fn set_cursor(&mut self, cursor: &'static str) -> Vec<Action> {
        if self.cursor == cursor {
            return Vec::new();
        }
        self.cursor = cursor;
        vec![Action::SetCursor(cursor.to_string())]
    }

    // --- Drag ---

    fn start_drag(&mut self, id: ChecklistId, world: Point) -> Vec<Action> {
        let Some(node) = self.scene.node_mut(&id) else {
            return Vec::new();
        };
        let orig = node.rect().origin();
        node.on_drag_start(world);
        self.input = InputState::DraggingNode { id, orig };
        self.set_cursor("grabbing")
    }

    fn finish_drag(&mut self, id: ChecklistId, world: Point) -> Result<Vec<Action>, CanvasError> {
        let bounds = self.config.scene_bounds();
        let grid = self.config.grid_size;
        let Some(done) = self.scene.node_mut(&id).and_then(|n| n.on_drag_end(world, bounds, grid)) else {
            return Ok(Vec::new());
        };
        self.scene.refresh_node(id);
        let mut actions = self.set_cursor("grab");
        self.gateway.update_checklist_position(id, done.x, done.y)?;
        debug!(%id, x = done.x, y = done.y, "checklist moved");
        actions.push(Action::PositionChanged { id, x: done.x, y: done.y });
        actions.push(Action::RenderNeeded);
        Ok(actions)
    }

    /// Move a checklist to `(x, y)` as if it had been dragged there.
    ///
    /// # Errors
    ///
    /// Returns `NodeNotFound` or a gateway error.
    pub fn move_node(&mut self, id: ChecklistId, x: f64, y: f64) -> Result<Vec<Action>, CanvasError> {
        let bounds = self.config.scene_bounds();
        let grid = self.config.grid_size;
        let node = self.scene.node_mut(&id).ok_or(CanvasError::NodeNotFound(id))?;
        let size = node.rect().size();
        let free = clamp_origin(Point::new(x, y), size, bounds);
        let origin = clamp_snapped_origin(snap_to_grid(free, grid), size, bounds, grid);
        node.move_to(origin);
        self.scene.refresh_node(id);
        self.gateway.update_checklist_position(id, origin.x, origin.y)?;
        Ok(vec![Action::PositionChanged { id, x: origin.x, y: origin.y }, Action::RenderNeeded])
    }

    // --- Create child ---

    fn start_create(&mut self, owner: NodeRef) -> Vec<Action> {
        if self.scene.preview().is_some() {
            debug!(?owner, "creation already in progress");
            return Vec::new();
        }
        let Some(CreatorSignal::CreateStart { owner }) = self.scene.creator_mut(owner).and_then(|h| h.press()) else {
            return Vec::new();
        };
        self.scene.begin_preview(owner);
        self.input = InputState::Creating { owner };
        vec![Action::CreateStarted { owner }]
    }

    fn finish_create(&mut self, owner: NodeRef, world: Point) -> Vec<Action> {
        match self.scene.creator_mut(owner).and_then(|h| h.release(world)) {
            Some(CreatorSignal::CreateEnd { owner, drop }) => {
                let target = EditorTarget::NewChild { owner, drop };
                self.editor = Some(target);
                vec![Action::EditorRequested { target, draft: ChecklistDraft::default() }]
            }
            signal => self.abandon_create(owner, signal),
        }
    }

    /// End a creation gesture without creating anything.
    fn abandon_create(&mut self, owner: NodeRef, signal: Option<CreatorSignal>) -> Vec<Action> {
        self.scene.clear_preview();
        match signal {
            Some(CreatorSignal::Cancelled { owner }) => debug!(?owner, "creation cancelled"),
            other => debug!(?owner, ?other, "creation ended with no live handle gesture"),
        }
        vec![Action::CreateCancelled { owner }, Action::RenderNeeded]
    }

    /// Create a child of `owner` from `draft`, placed near the `drop` point.
    ///
    /// The box is raised by half its height (in half-grid steps) so the drop
    /// point lands beside its head, snapped by its nearest corner and kept
    /// inside the scene.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDraft`, `NodeNotFound` for an unknown owner, or a
    /// gateway error.
    pub fn create_child(
        &mut self,
        owner: NodeRef,
        drop: Point,
        draft: &ChecklistDraft,
    ) -> Result<Vec<Action>, CanvasError> {
        if let Some(problem) = draft.problem() {
            return Err(CanvasError::InvalidDraft(problem));
        }
        if let NodeRef::Checklist(parent) = owner {
            if !self.scene.contains(&parent) {
                return Err(CanvasError::NodeNotFound(parent));
            }
        }
        let grid = self.config.grid_size;
        let bounds = self.config.scene_bounds();
        let size = self.config.metrics.node_size(&draft.title, draft.checks.iter().map(|c| c.content.as_str()), grid);

        let half = grid / 2.0;
        let offset = if half > 0.0 { ((size.height / 2.0) / half).round() * half } else { 0.0 };
        let candidate = Point::new(drop.x, drop.y - offset);
        let origin = clamp_snapped_origin(snap_to_nearest_grid_corner(candidate, size, grid), size, bounds, grid);

        let parent_id = owner.as_parent();
        let title = draft.title.trim();
        let id = self.gateway.create_checklist(self.project.id, parent_id, title, origin.x, origin.y)?;
        let mut checks = Vec::with_capacity(draft.checks.len());
        for (position, item) in (0_i64..).zip(&draft.checks) {
            let state = item.state.unwrap_or_default();
            let check_id = self.gateway.create_check(id, &item.content, state, position)?;
            checks.push(Check { id: check_id, checklist_id: id, content: item.content.clone(), state, position });
        }

        self.scene.insert_node(SceneNode::new(id, parent_id, title, checks, Rect::from_origin_size(origin, size)));
        self.scene.connect(owner, id);
        info!(%id, ?parent_id, x = origin.x, y = origin.y, "checklist created");
        Ok(vec![Action::NodeCreated { id, parent_id, x: origin.x, y: origin.y }, Action::RenderNeeded])
    }

    // --- Editor ---

    /// Open the content editor on an existing checklist.
    ///
    /// # Errors
    ///
    /// Returns `NodeNotFound` for an unknown checklist.
    pub fn open_editor(&mut self, id: ChecklistId) -> Result<Vec<Action>, CanvasError> {
        let node = self.scene.node(&id).ok_or(CanvasError::NodeNotFound(id))?;
        let draft = ChecklistDraft::from_checklist(node.title(), node.checks());
        let target = EditorTarget::Edit(id);
        self.editor = Some(target);
        Ok(vec![Action::EditorRequested { target, draft }])
    }

    /// Accept the open editor with `draft`. An invalid draft leaves the editor open.
    ///
    /// # Errors
    ///
    /// Returns `NoEditorOpen`, `InvalidDraft`, or whatever applying the draft returns.
    pub fn submit_editor(&mut self, draft: &ChecklistDraft) -> Result<Vec<Action>, CanvasError> {
        let target = self.editor.ok_or(CanvasError::NoEditorOpen)?;
        if let Some(problem) = draft.problem() {
            return Err(CanvasError::InvalidDraft(problem));
        }
        self.editor = None;
        match target {
            EditorTarget::NewChild { owner, drop } => {
                self.scene.clear_preview();
                self.create_child(owner, drop, draft)
            }
            EditorTarget::Edit(id) => self.edit_node(id, draft),
        }
    }

    /// Dismiss the open editor. A pending creation is discarded without any
    /// storage write.
    ///
    /// # Errors
    ///
    /// Returns `NoEditorOpen` if no editor is open.
    pub fn cancel_editor(&mut self) -> Result<Vec<Action>, CanvasError> {
        match self.editor.take().ok_or(CanvasError::NoEditorOpen)? {
            EditorTarget::NewChild { owner, .. } => {
                self.scene.clear_preview();
                Ok(vec![Action::CreateCancelled { owner }, Action::RenderNeeded])
            }
            EditorTarget::Edit(_) => Ok(Vec::new()),
        }
    }

    /// Replace a checklist's title and items, writing only what changed.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDraft`, `NodeNotFound`, or a gateway error.
    pub fn edit_node(&mut self, id: ChecklistId, draft: &ChecklistDraft) -> Result<Vec<Action>, CanvasError> {
        if let Some(problem) = draft.problem() {
            return Err(CanvasError::InvalidDraft(problem));
        }
        let node = self.scene.node(&id).ok_or(CanvasError::NodeNotFound(id))?;
        let old = node.checks().to_vec();
        let diff = diff_checks(&old, &draft.checks);
        let title = draft.title.trim();

        self.gateway.update_checklist_content(id, title)?;
        for check_id in &diff.deletes {
            self.gateway.delete_check(*check_id)?;
        }
        for update in &diff.updates {
            self.gateway.update_check(update.id, &update.content, update.state, update.position)?;
        }
        let mut created = Vec::with_capacity(diff.creates.len());
        for create in &diff.creates {
            let check_id = self.gateway.create_check(id, &create.content, create.state, create.position)?;
            created.push(check_id);
        }

        // Rebuild the display list in draft order, pairing new items with
        // their ids in the order the diff created them.
        let mut created = created.into_iter();
        let mut kept = Vec::new();
        let mut checks = Vec::with_capacity(draft.checks.len());
        for (position, item) in (0_i64..).zip(&draft.checks) {
            let stored = item.id.filter(|cid| !kept.contains(cid)).and_then(|cid| old.iter().find(|c| c.id == cid));
            let (check_id, state) = match stored {
                Some(stored) => {
                    kept.push(stored.id);
                    (stored.id, item.state.unwrap_or(stored.state))
                }
                None => match created.next() {
                    Some(check_id) => (check_id, item.state.unwrap_or_default()),
                    None => continue,
                },
            };
            checks.push(Check { id: check_id, checklist_id: id, content: item.content.clone(), state, position });
        }

        let grid = self.config.grid_size;
        let size = self.config.metrics.node_size(title, checks.iter().map(|c| c.content.as_str()), grid);
        if let Some(node) = self.scene.node_mut(&id) {
            node.set_title(title);
            node.set_checks(checks);
            node.set_size(size);
        }
        self.scene.refresh_node(id);
        info!(
            %id,
            created = diff.creates.len(),
            updated = diff.updates.len(),
            deleted = diff.deletes.len(),
            "checklist edited"
        );
        Ok(vec![Action::NodeUpdated { id }, Action::RenderNeeded])
    }

    // --- Delete ---

    /// Delete a leaf checklist.
    ///
    /// # Errors
    ///
    /// Returns `HasChildren` (nothing is changed) if the checklist has
    /// children, `NodeNotFound`, or a gateway error.
    pub fn delete_node(&mut self, id: ChecklistId) -> Result<Vec<Action>, CanvasError> {
        if !self.scene.contains(&id) {
            return Err(CanvasError::NodeNotFound(id));
        }
        let count = self.scene.children_of(NodeRef::Checklist(id)).len();
        if count > 0 {
            return Err(CanvasError::HasChildren { id, count });
        }
        self.scene.disconnect(id);
        self.scene.remove_node(&id);
        if self.editor == Some(EditorTarget::Edit(id)) {
            self.editor = None;
        }
        self.gateway.delete_checklist(id)?;
        info!(%id, "checklist deleted");
        Ok(vec![Action::NodeDeleted { id }, Action::RenderNeeded])
    }

    // --- Checks ---

    /// Toggle a check between checked and unchecked, or in and out of
    /// not-applicable when `not_applicable` is set.
    ///
    /// # Errors
    ///
    /// Returns `NodeNotFound`, `CheckNotFound`, or a gateway error.
    pub fn toggle_check(
        &mut self,
        checklist_id: ChecklistId,
        check_id: CheckId,
        not_applicable: bool,
    ) -> Result<Vec<Action>, CanvasError> {
        let node = self.scene.node(&checklist_id).ok_or(CanvasError::NodeNotFound(checklist_id))?;
        let index = node
            .checks()
            .iter()
            .position(|c| c.id == check_id)
            .ok_or(CanvasError::CheckNotFound { checklist: checklist_id, check: check_id })?;
        self.toggle_check_at(checklist_id, index, not_applicable)
    }

    fn toggle_check_at(
        &mut self,
        checklist_id: ChecklistId,
        index: usize,
        not_applicable: bool,
    ) -> Result<Vec<Action>, CanvasError> {
        let node = self.scene.node_mut(&checklist_id).ok_or(CanvasError::NodeNotFound(checklist_id))?;
        let Some(check) = node.checks_mut().get_mut(index) else {
            debug!(%checklist_id, index, "check row out of range");
            return Ok(Vec::new());
        };
        check.state =
            if not_applicable { check.state.toggled_not_applicable() } else { check.state.toggled_checked() };
        let (check_id, state) = (check.id, check.state);
        let (content, position) = (check.content.clone(), check.position);
        self.gateway.update_check(check_id, &content, state, position)?;
        Ok(vec![Action::CheckToggled { checklist_id, check_id, state }, Action::RenderNeeded])
    }

    // --- Projects ---

    /// Ask the host to switch to another project. The canvas itself keeps
    /// showing this one until the host opens a new canvas.
    #[must_use]
    pub fn request_project_switch(&self) -> Vec<Action> {
        vec![Action::ProjectSwitchRequested]
    }
}

// =============================================================================
// LOADING
// =============================================================================

/// Build the scene for a project's checklists: one node per checklist, then
/// one connector per parent edge. Orphans and members of parent cycles stay
/// on the canvas unconnected.
fn build_scene(title: &str, root_rect: Rect, checklists: Vec<Checklist>, config: &CanvasConfig) -> Scene {
    let mut scene = Scene::new(title, root_rect);
    let grid = config.grid_size;

    let mut edges = Vec::with_capacity(checklists.len());
    for checklist in checklists {
        let size = config.metrics.node_size(&checklist.title, checklist.checks.iter().map(|c| c.content.as_str()), grid);
        let rect = Rect::new(checklist.position_x, checklist.position_y, size.width, size.height);
        edges.push((checklist.id, checklist.parent_id));
        scene.insert_node(SceneNode::new(checklist.id, checklist.parent_id, &checklist.title, checklist.checks, rect));
    }

    for (id, parent_id) in edges {
        match parent_id {
            None => {
                scene.connect(NodeRef::Root, id);
            }
            Some(parent) if !scene.contains(&parent) => {
                warn!(%id, %parent, "checklist parent not in project; left unconnected");
            }
            Some(parent) if scene.in_parent_cycle(id) => {
                warn!(%id, %parent, "checklist is part of a parent cycle; left unconnected");
            }
            Some(parent) => {
                scene.connect(NodeRef::Checklist(parent), id);
            }
        }
    }
    scene
}

/// Hover cursor for what is under the pointer.
fn cursor_for(hit: Option<Hit>) -> &'static str {
    match hit {
        Some(Hit { target: NodeRef::Checklist(_), part: HitPart::Head | HitPart::Body }) => "grab",
        Some(Hit { part: HitPart::Creator | HitPart::EditButton | HitPart::DeleteButton | HitPart::Check(_), .. }) => {
            "pointer"
        }
        _ => "default",
    }
}

//! Shared numeric constants for the canvas crate.

// ── Grid and scene ──────────────────────────────────────────────

/// Default grid cell size in world units.
pub const GRID_SIZE: f64 = 50.0;

/// Default scene width in world units. Nodes are clamped inside the scene.
pub const SCENE_WIDTH: f64 = 10_000.0;

/// Default scene height in world units.
pub const SCENE_HEIGHT: f64 = 10_000.0;

/// Side length of the square region fitted into the viewport when zoomed out.
pub const ZOOM_OUT_EXTENT: f64 = 4_000.0;

/// Default grid line color.
pub const GRID_COLOR: &str = "#cccccc";

// ── Connectors ──────────────────────────────────────────────────

/// Control-point offset as a fraction of the horizontal span between endpoints.
pub const CURVE_FACTOR: f64 = 0.8;

/// Default connector stroke color.
pub const CONNECTOR_COLOR: &str = "#7a8c99";

// ── Draw order ──────────────────────────────────────────────────

/// Z layer of the background grid.
pub const Z_GRID: i32 = 0;

/// Z layer of checklist nodes and the root.
pub const Z_NODES: i32 = 10;

/// Z layer of connectors: above nodes.
pub const Z_CONNECTORS: i32 = 20;

/// Z layer of interactive overlays (creator handles, destination marker, preview line).
pub const Z_OVERLAY: i32 = 30;

// ── Node layout ─────────────────────────────────────────────────

/// Height of the node head (title, edit and delete buttons).
pub const HEAD_HEIGHT: f64 = 50.0;

/// Height of a single check row.
pub const ROW_HEIGHT: f64 = 30.0;

/// Padding below the last check row.
pub const BODY_PADDING_BOTTOM: f64 = 5.0;

/// Minimum node width before rounding to the grid.
pub const MIN_NODE_WIDTH: f64 = 250.0;

/// Approximate advance width of one character of node text.
pub const CHAR_WIDTH: f64 = 9.0;

/// Horizontal space taken by head controls next to the title.
pub const HEAD_CONTROLS_WIDTH: f64 = 150.0;

/// Horizontal space taken by the checkbox and row margins next to a check label.
pub const ROW_CHROME_WIDTH: f64 = 45.0;

/// Side length of the edit and delete buttons in the node head.
pub const BUTTON_SIZE: f64 = 40.0;

/// Gap between head buttons and around the head edges.
pub const BUTTON_GAP: f64 = 5.0;

// ── Root pseudo-node ────────────────────────────────────────────

/// Default top-left of the root (project) box.
pub const ROOT_ORIGIN_X: f64 = 100.0;

/// Default top-left of the root (project) box.
pub const ROOT_ORIGIN_Y: f64 = 100.0;

/// Root box width.
pub const ROOT_WIDTH: f64 = 200.0;

/// Root box height.
pub const ROOT_HEIGHT: f64 = 50.0;

// ── Creation gesture ────────────────────────────────────────────

/// Side length of a creator handle.
pub const CREATOR_SIZE: f64 = 14.0;

/// Screen-space hit slop in pixels around creator handles.
pub const HANDLE_RADIUS_PX: f64 = 8.0;

/// Side length of the destination marker shown while dragging out a child.
pub const MARKER_SIZE: f64 = 14.0;

// ── Render ──────────────────────────────────────────────────────

/// Fill of checklist boxes.
pub const NODE_FILL: &str = "#ffffff";

/// Outline of checklist boxes and the root.
pub const NODE_STROKE: &str = "#33414d";

/// Fill of the head strip.
pub const HEAD_FILL: &str = "#e6edf2";

/// Fill of the project root box.
pub const ROOT_FILL: &str = "#33414d";

/// Default text color.
pub const TEXT_COLOR: &str = "#1a1a1a";

/// Title font size in world units.
pub const TITLE_FONT_SIZE: f64 = 18.0;

/// Check label font size in world units.
pub const ITEM_FONT_SIZE: f64 = 14.0;

/// Side of a check box drawn at the start of each row.
pub const CHECKBOX_SIZE: f64 = 18.0;

/// Inner horizontal padding of heads and rows.
pub const TEXT_PADDING: f64 = 12.0;

/// Grid lines closer than this many screen pixels are not drawn.
pub const MIN_GRID_SPACING_PX: f64 = 4.0;

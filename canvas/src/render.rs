//! Rendering: turns an open canvas into a screen-space display list, and a
//! display list into SVG.
//!
//! Nothing here mutates canvas state. A GUI host walks the [`DrawCmd`] list
//! with its own painter; the CLI writes it out with [`to_svg`]. Commands are
//! ordered by z layer (grid, nodes, connectors, overlays) and keep insertion
//! order within a layer.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use crate::camera::{Camera, Point};
use crate::connector::CubicPath;
use crate::consts::{
    CHECKBOX_SIZE, GRID_COLOR, HEAD_FILL, ITEM_FONT_SIZE, MIN_GRID_SPACING_PX, NODE_FILL, NODE_STROKE, ROOT_FILL,
    TEXT_COLOR, TEXT_PADDING, TITLE_FONT_SIZE, Z_GRID, Z_NODES, Z_OVERLAY,
};
use crate::doc::CheckState;
use crate::engine::{Canvas, CanvasConfig};
use crate::gateway::Gateway;
use crate::geom::{Rect, Size};
use crate::layout::{Metrics, delete_button_rect, edit_button_rect};
use crate::node::SceneNode;

/// Interactive affordances, drawn by kind rather than as raw shapes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlKind {
    Edit,
    Delete,
    Creator,
    Check(CheckState),
    /// Destination marker of a creation gesture.
    Marker,
}

/// One drawing primitive in screen pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Line { from: Point, to: Point, color: String, z: i32 },
    Box { rect: Rect, fill: String, stroke: String, z: i32 },
    /// Left-aligned, vertically centered on `at`.
    Text { at: Point, text: String, size: f64, color: String, z: i32 },
    Curve { path: CubicPath, color: String, dashed: bool, z: i32 },
    Control { rect: Rect, kind: ControlKind, z: i32 },
}

impl DrawCmd {
    #[must_use]
    pub fn z(&self) -> i32 {
        match self {
            Self::Line { z, .. }
            | Self::Box { z, .. }
            | Self::Text { z, .. }
            | Self::Curve { z, .. }
            | Self::Control { z, .. } => *z,
        }
    }
}

// =============================================================================
// DISPLAY LIST
// =============================================================================

/// Build the display list for the canvas's current view.
#[must_use]
pub fn build_display_list<G: Gateway>(canvas: &Canvas<G>) -> Vec<DrawCmd> {
    let camera = canvas.camera();
    let config = canvas.config();
    let scene = canvas.scene();
    let mut out = Vec::new();

    push_grid(&mut out, &camera, canvas.viewport(), config);

    let root = scene.root_rect();
    out.push(DrawCmd::Box {
        rect: to_screen(&camera, root),
        fill: ROOT_FILL.to_string(),
        stroke: NODE_STROKE.to_string(),
        z: Z_NODES,
    });
    out.push(DrawCmd::Text {
        at: camera.world_to_screen(Point::new(root.x + TEXT_PADDING, root.center().y)),
        text: scene.root_title().to_string(),
        size: TITLE_FONT_SIZE * camera.zoom,
        color: NODE_FILL.to_string(),
        z: Z_NODES,
    });

    for node in scene.nodes() {
        push_node(&mut out, &camera, &config.metrics, node);
    }

    for (_, line) in scene.connectors() {
        out.push(DrawCmd::Curve {
            path: path_to_screen(&camera, line.path()),
            color: line.color.clone(),
            dashed: false,
            z: line.z,
        });
    }

    for handle in scene.creators() {
        out.push(DrawCmd::Control { rect: to_screen(&camera, handle.rect()), kind: ControlKind::Creator, z: Z_OVERLAY });
    }

    if let Some(preview) = scene.preview() {
        if preview.line.visible {
            out.push(DrawCmd::Curve {
                path: path_to_screen(&camera, preview.line.path()),
                color: preview.line.color.clone(),
                dashed: true,
                z: preview.line.z,
            });
        }
        if let Some(marker) = preview.marker {
            out.push(DrawCmd::Control { rect: to_screen(&camera, marker), kind: ControlKind::Marker, z: Z_OVERLAY });
        }
    }

    out.sort_by_key(DrawCmd::z);
    out
}

fn to_screen(camera: &Camera, rect: Rect) -> Rect {
    let origin = camera.world_to_screen(rect.origin());
    Rect::new(origin.x, origin.y, rect.width * camera.zoom, rect.height * camera.zoom)
}

fn path_to_screen(camera: &Camera, path: &CubicPath) -> CubicPath {
    CubicPath {
        start: camera.world_to_screen(path.start),
        c1: camera.world_to_screen(path.c1),
        c2: camera.world_to_screen(path.c2),
        end: camera.world_to_screen(path.end),
    }
}

/// Grid lines over the visible part of the scene.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn push_grid(out: &mut Vec<DrawCmd>, camera: &Camera, viewport: Size, config: &CanvasConfig) {
    let grid = config.grid_size;
    if grid <= 0.0 || grid * camera.zoom < MIN_GRID_SPACING_PX {
        return;
    }
    let top_left = camera.screen_to_world(Point::new(0.0, 0.0));
    let bottom_right = camera.screen_to_world(Point::new(viewport.width, viewport.height));
    let (x0, x1) = (top_left.x.max(0.0), bottom_right.x.min(config.scene_width));
    let (y0, y1) = (top_left.y.max(0.0), bottom_right.y.min(config.scene_height));
    if x0 > x1 || y0 > y1 {
        return;
    }

    let line = |from: Point, to: Point| DrawCmd::Line {
        from: camera.world_to_screen(from),
        to: camera.world_to_screen(to),
        color: GRID_COLOR.to_string(),
        z: Z_GRID,
    };
    for i in ((x0 / grid).ceil() as i64)..=((x1 / grid).floor() as i64) {
        let x = i as f64 * grid;
        out.push(line(Point::new(x, y0), Point::new(x, y1)));
    }
    for i in ((y0 / grid).ceil() as i64)..=((y1 / grid).floor() as i64) {
        let y = i as f64 * grid;
        out.push(line(Point::new(x0, y), Point::new(x1, y)));
    }
}

fn push_node(out: &mut Vec<DrawCmd>, camera: &Camera, metrics: &Metrics, node: &SceneNode) {
    let rect = node.rect();
    let head = metrics.head_rect(&rect);
    out.push(DrawCmd::Box {
        rect: to_screen(camera, rect),
        fill: NODE_FILL.to_string(),
        stroke: NODE_STROKE.to_string(),
        z: Z_NODES,
    });
    out.push(DrawCmd::Box {
        rect: to_screen(camera, head),
        fill: HEAD_FILL.to_string(),
        stroke: NODE_STROKE.to_string(),
        z: Z_NODES,
    });
    out.push(DrawCmd::Text {
        at: camera.world_to_screen(Point::new(head.x + TEXT_PADDING, head.center().y)),
        text: node.title().to_string(),
        size: TITLE_FONT_SIZE * camera.zoom,
        color: TEXT_COLOR.to_string(),
        z: Z_NODES,
    });
    out.push(DrawCmd::Control { rect: to_screen(camera, edit_button_rect(&rect)), kind: ControlKind::Edit, z: Z_NODES });
    out.push(DrawCmd::Control {
        rect: to_screen(camera, delete_button_rect(&rect)),
        kind: ControlKind::Delete,
        z: Z_NODES,
    });

    for (index, check) in node.checks().iter().enumerate() {
        let row = metrics.row_rect(&rect, index);
        let checkbox =
            Rect::new(row.x + TEXT_PADDING, row.y + (row.height - CHECKBOX_SIZE) / 2.0, CHECKBOX_SIZE, CHECKBOX_SIZE);
        out.push(DrawCmd::Control {
            rect: to_screen(camera, checkbox),
            kind: ControlKind::Check(check.state),
            z: Z_NODES,
        });
        out.push(DrawCmd::Text {
            at: camera.world_to_screen(Point::new(checkbox.right() + TEXT_PADDING, row.center().y)),
            text: check.content.clone(),
            size: ITEM_FONT_SIZE * camera.zoom,
            color: TEXT_COLOR.to_string(),
            z: Z_NODES,
        });
    }
}

// =============================================================================
// SVG
// =============================================================================

/// Serialize a display list as a standalone SVG document of the viewport's size.
#[must_use]
pub fn to_svg(cmds: &[DrawCmd], viewport: Size) -> String {
    let (w, h) = (viewport.width, viewport.height);
    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w:.0}\" height=\"{h:.0}\" viewBox=\"0 0 {w:.2} {h:.2}\">\n"
    );
    svg.push_str(&format!("<rect width=\"{w:.2}\" height=\"{h:.2}\" fill=\"#fafafa\"/>\n"));
    for cmd in cmds {
        svg.push_str(&cmd_to_svg(cmd));
        svg.push('\n');
    }
    svg.push_str("</svg>\n");
    svg
}

fn cmd_to_svg(cmd: &DrawCmd) -> String {
    match cmd {
        DrawCmd::Line { from, to, color, .. } => format!(
            "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{color}\" stroke-width=\"1\"/>",
            from.x, from.y, to.x, to.y
        ),
        DrawCmd::Box { rect, fill, stroke, .. } => format!(
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"{fill}\" stroke=\"{stroke}\"/>",
            rect.x, rect.y, rect.width, rect.height
        ),
        DrawCmd::Text { at, text, size, color, .. } => format!(
            "<text x=\"{:.2}\" y=\"{:.2}\" font-family=\"sans-serif\" font-size=\"{size:.2}\" fill=\"{color}\" \
             dominant-baseline=\"middle\">{}</text>",
            at.x,
            at.y,
            escape(text)
        ),
        DrawCmd::Curve { path, color, dashed, .. } => {
            let dash = if *dashed { " stroke-dasharray=\"6 4\"" } else { "" };
            format!("<path d=\"{}\" fill=\"none\" stroke=\"{color}\" stroke-width=\"2\"{dash}/>", path.to_svg_d())
        }
        DrawCmd::Control { rect, kind, .. } => control_to_svg(rect, *kind),
    }
}

fn control_to_svg(rect: &Rect, kind: ControlKind) -> String {
    let frame = |fill: &str, extra: &str| {
        format!(
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"3\" fill=\"{fill}\" stroke=\"{NODE_STROKE}\"{extra}/>",
            rect.x, rect.y, rect.width, rect.height
        )
    };
    let glyph = |text: &str| {
        let c = rect.center();
        format!(
            "<text x=\"{:.2}\" y=\"{:.2}\" font-family=\"sans-serif\" font-size=\"{:.2}\" text-anchor=\"middle\" \
             dominant-baseline=\"middle\" fill=\"{TEXT_COLOR}\">{text}</text>",
            c.x,
            c.y,
            rect.height * 0.6
        )
    };
    match kind {
        ControlKind::Edit => format!("{}{}", frame(NODE_FILL, ""), glyph("&#9998;")),
        ControlKind::Delete => format!("{}{}", frame(NODE_FILL, ""), glyph("&#10005;")),
        ControlKind::Creator => {
            let c = rect.center();
            format!(
                "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" fill=\"{NODE_FILL}\" stroke=\"{NODE_STROKE}\" stroke-width=\"2\"/>",
                c.x,
                c.y,
                rect.width / 2.0
            )
        }
        ControlKind::Marker => frame("none", " stroke-dasharray=\"3 2\""),
        ControlKind::Check(CheckState::Unchecked) => frame(NODE_FILL, ""),
        ControlKind::Check(CheckState::Checked) => format!("{}{}", frame(NODE_FILL, ""), glyph("&#10003;")),
        ControlKind::Check(CheckState::NotApplicable) => format!("{}{}", frame(HEAD_FILL, ""), glyph("&#8211;")),
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

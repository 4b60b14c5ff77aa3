#![allow(clippy::float_cmp)]

use uuid::Uuid;

use super::*;
use crate::consts::Z_CONNECTORS;
use crate::doc::{Check, Checklist, ChecklistDraft, ProjectId};
use crate::gateway::MemoryGateway;
use crate::input::{Button, Modifiers};

fn canvas_with(build: impl FnOnce(ProjectId) -> Vec<Checklist>) -> Canvas<MemoryGateway> {
    let mut gw = MemoryGateway::new();
    let project = gw.insert_project("Launch <prep>", false);
    gw.update_project_view(project, 400.0, 300.0).unwrap();
    for checklist in build(project) {
        gw.insert_checklist(checklist);
    }
    let mut canvas = Canvas::open(gw, project, CanvasConfig::default()).unwrap();
    canvas.set_viewport(800.0, 600.0);
    canvas
}

fn fuel(project: ProjectId, state: CheckState) -> Checklist {
    let id = Uuid::new_v4();
    Checklist {
        id,
        project_id: project,
        parent_id: None,
        title: "Fuel".into(),
        position_x: 400.0,
        position_y: 100.0,
        checks: vec![Check { id: Uuid::new_v4(), checklist_id: id, content: "open valve".into(), state, position: 0 }],
    }
}

fn grid_lines(cmds: &[DrawCmd]) -> usize {
    cmds.iter().filter(|c| matches!(c, DrawCmd::Line { .. })).count()
}

#[test]
fn grid_covers_visible_scene() {
    let canvas = canvas_with(|_| Vec::new());
    let cmds = build_display_list(&canvas);
    // World 0..800 x 0..600 at 50: 17 vertical and 13 horizontal lines.
    assert_eq!(grid_lines(&cmds), 30);
}

#[test]
fn grid_is_clipped_to_scene() {
    let mut gw = MemoryGateway::new();
    let project = gw.insert_project("P", false);
    gw.update_project_view(project, 0.0, 0.0).unwrap();
    let mut canvas = Canvas::open(gw, project, CanvasConfig::default()).unwrap();
    canvas.set_viewport(800.0, 600.0);
    // Only world 0..400 x 0..300 is inside the scene: 9 + 7 lines.
    assert_eq!(grid_lines(&build_display_list(&canvas)), 16);
}

#[test]
fn dense_grid_is_skipped() {
    let mut canvas = canvas_with(|_| Vec::new());
    canvas.set_viewport(80.0, 60.0);
    canvas.toggle_zoom(Point::new(500.0, 500.0)).unwrap();
    // 60 / 4000 zoom puts grid lines under a pixel apart.
    assert_eq!(grid_lines(&build_display_list(&canvas)), 0);
}

#[test]
fn commands_are_ordered_by_layer() {
    let canvas = canvas_with(|p| vec![fuel(p, CheckState::Unchecked)]);
    let cmds = build_display_list(&canvas);
    let layers: Vec<i32> = cmds.iter().map(DrawCmd::z).collect();
    let mut sorted = layers.clone();
    sorted.sort_unstable();
    assert_eq!(layers, sorted);
    assert!(cmds.iter().any(|c| matches!(c, DrawCmd::Curve { dashed: false, z, .. } if *z == Z_CONNECTORS)));
}

#[test]
fn node_is_drawn_in_screen_space() {
    let canvas = canvas_with(|p| vec![fuel(p, CheckState::Unchecked)]);
    let cmds = build_display_list(&canvas);
    let node_box = Rect::new(400.0, 100.0, 250.0, 100.0);
    assert!(cmds.iter().any(|c| matches!(c, DrawCmd::Box { rect, .. } if *rect == node_box)));
    assert!(cmds.iter().any(|c| matches!(c, DrawCmd::Text { text, .. } if text == "Fuel")));
    assert!(cmds.iter().any(|c| matches!(c, DrawCmd::Text { text, .. } if text == "open valve")));
}

#[test]
fn check_controls_carry_state() {
    let canvas = canvas_with(|p| vec![fuel(p, CheckState::NotApplicable)]);
    let cmds = build_display_list(&canvas);
    assert!(
        cmds.iter()
            .any(|c| matches!(c, DrawCmd::Control { kind: ControlKind::Check(CheckState::NotApplicable), .. }))
    );
    let creators = cmds.iter().filter(|c| matches!(c, DrawCmd::Control { kind: ControlKind::Creator, .. })).count();
    assert_eq!(creators, 2);
}

#[test]
fn preview_appears_only_after_first_move() {
    let mut canvas = canvas_with(|_| Vec::new());
    canvas.on_pointer_down(Point::new(300.0, 125.0), Button::Primary, Modifiers::default()).unwrap();
    let pressed = build_display_list(&canvas);
    assert!(!pressed.iter().any(|c| matches!(c, DrawCmd::Curve { dashed: true, .. })));
    assert!(!pressed.iter().any(|c| matches!(c, DrawCmd::Control { kind: ControlKind::Marker, .. })));

    canvas.on_pointer_move(Point::new(600.0, 400.0), Modifiers::default()).unwrap();
    let dragging = build_display_list(&canvas);
    assert!(dragging.iter().any(|c| matches!(c, DrawCmd::Curve { dashed: true, .. })));
    assert!(dragging.iter().any(|c| matches!(c, DrawCmd::Control { kind: ControlKind::Marker, .. })));
}

#[test]
fn zoom_scales_node_boxes() {
    let mut canvas = canvas_with(|p| vec![fuel(p, CheckState::Unchecked)]);
    canvas.toggle_zoom(Point::new(400.0, 300.0)).unwrap();
    let zoom = canvas.camera().zoom;
    let cmds = build_display_list(&canvas);
    let expected = 250.0 * zoom;
    assert!(
        cmds.iter()
            .any(|c| matches!(c, DrawCmd::Box { rect, .. } if (rect.width - expected).abs() < 1e-9))
    );
}

#[test]
fn svg_document_escapes_text() {
    let mut canvas = canvas_with(|p| vec![fuel(p, CheckState::Checked)]);
    let owner = canvas.scene().nodes().next().map(|n| crate::doc::NodeRef::Checklist(n.id)).unwrap();
    canvas.create_child(owner, Point::new(900.0, 400.0), &ChecklistDraft::new("a & b", Vec::new())).unwrap();
    let svg = to_svg(&build_display_list(&canvas), canvas.viewport());

    assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"800\" height=\"600\""));
    assert!(svg.trim_end().ends_with("</svg>"));
    assert!(svg.contains("Launch &lt;prep&gt;"));
    assert!(svg.contains("a &amp; b"));
    assert!(svg.contains("<path d=\"M "));
    assert!(!svg.contains("<prep>"));
}

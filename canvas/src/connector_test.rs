#![allow(clippy::float_cmp)]

use uuid::Uuid;

use super::*;

fn child() -> NodeRef {
    NodeRef::Checklist(Uuid::new_v4())
}

#[test]
fn path_endpoints_follow_anchors() {
    let mut line = ConnectorLine::between(NodeRef::Root, child());
    let src = Rect::new(100.0, 100.0, 200.0, 50.0);
    let dst = Rect::new(500.0, 300.0, 250.0, 150.0);
    line.recompute_path(&src, &dst);
    assert_eq!(line.path().start, anchor_right(&src));
    assert_eq!(line.path().end, anchor_left(&dst));
}

#[test]
fn control_points_offset_by_span() {
    let path = CubicPath::horizontal(Point::new(300.0, 125.0), Point::new(500.0, 375.0));
    // 0.8 * 200 = 160
    assert_eq!(path.c1, Point::new(460.0, 125.0));
    assert_eq!(path.c2, Point::new(340.0, 375.0));
}

#[test]
fn control_points_collapse_when_vertically_aligned() {
    let path = CubicPath::horizontal(Point::new(300.0, 0.0), Point::new(300.0, 400.0));
    assert_eq!(path.c1, path.start);
    assert_eq!(path.c2, path.end);
}

#[test]
fn backwards_span_uses_absolute_distance() {
    let path = CubicPath::horizontal(Point::new(500.0, 0.0), Point::new(400.0, 0.0));
    assert_eq!(path.c1, Point::new(580.0, 0.0));
    assert_eq!(path.c2, Point::new(320.0, 0.0));
}

#[test]
fn recompute_tracks_moved_destination() {
    let mut line = ConnectorLine::between(NodeRef::Root, child());
    let src = Rect::new(0.0, 0.0, 100.0, 50.0);
    line.recompute_path(&src, &Rect::new(200.0, 0.0, 100.0, 50.0));
    let before = *line.path();
    line.recompute_path(&src, &Rect::new(400.0, 100.0, 100.0, 50.0));
    assert_ne!(*line.path(), before);
    assert_eq!(line.path().end, Point::new(400.0, 125.0));
}

#[test]
fn point_at_hits_endpoints() {
    let path = CubicPath::horizontal(Point::new(0.0, 0.0), Point::new(100.0, 50.0));
    assert_eq!(path.point_at(0.0), path.start);
    assert_eq!(path.point_at(1.0), path.end);
}

#[test]
fn preview_is_hidden_overlay() {
    let line = ConnectorLine::preview(NodeRef::Root);
    assert!(line.is_preview());
    assert!(!line.visible);
    assert_eq!(line.z, Z_OVERLAY);
}

#[test]
fn connector_sits_above_nodes() {
    let line = ConnectorLine::between(NodeRef::Root, child());
    assert!(line.z > crate::consts::Z_NODES);
    assert!(line.z < Z_OVERLAY);
}

#[test]
fn touches_matches_either_end() {
    let c = child();
    let line = ConnectorLine::between(NodeRef::Root, c);
    assert!(line.touches(NodeRef::Root));
    assert!(line.touches(c));
    assert!(!line.touches(child()));
}

#[test]
fn svg_path_data_has_move_and_curve() {
    let path = CubicPath::horizontal(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
    assert_eq!(path.to_svg_d(), "M 0.00 0.00 C 8.00 0.00, 2.00 0.00, 10.00 0.00");
}

#![allow(clippy::float_cmp)]

use super::*;

fn rect() -> Rect {
    Rect::new(200.0, 200.0, 100.0, 50.0)
}

// =============================================================
// Anchors
// =============================================================

#[test]
fn anchors_are_edge_midpoints() {
    let r = rect();
    assert_eq!(anchor_left(&r), Point::new(200.0, 225.0));
    assert_eq!(anchor_right(&r), Point::new(300.0, 225.0));
    assert_eq!(anchor_top(&r), Point::new(250.0, 200.0));
    assert_eq!(anchor_bottom(&r), Point::new(250.0, 250.0));
}

#[test]
fn rect_contains_is_inclusive() {
    let r = rect();
    assert!(r.contains(Point::new(200.0, 200.0)));
    assert!(r.contains(Point::new(300.0, 250.0)));
    assert!(!r.contains(Point::new(300.1, 250.0)));
}

#[test]
fn rect_centered_and_inflate() {
    let r = Rect::centered(Point::new(10.0, 10.0), 4.0);
    assert_eq!(r, Rect::new(8.0, 8.0, 4.0, 4.0));
    assert_eq!(r.inflate(1.0), Rect::new(7.0, 7.0, 6.0, 6.0));
}

// =============================================================
// Grid snapping
// =============================================================

#[test]
fn snap_to_grid_rounds_each_axis() {
    assert_eq!(snap_to_grid(Point::new(143.0, 202.0), 50.0), Point::new(150.0, 200.0));
    assert_eq!(snap_to_grid(Point::new(-26.0, 24.0), 50.0), Point::new(-50.0, 0.0));
}

#[test]
fn snap_is_idempotent() {
    let grid = 50.0;
    let mut x = -1234.5;
    while x < 1234.5 {
        let p = Point::new(x, x * 0.37 + 11.0);
        let once = snap_to_grid(p, grid);
        assert_eq!(snap_to_grid(once, grid), once);
        x += 17.25;
    }
}

#[test]
fn snap_moves_at_most_one_cell() {
    let grid = 25.0;
    let mut x = -500.0;
    while x < 500.0 {
        let p = Point::new(x, 3.0 - x);
        let s = snap_to_grid(p, grid);
        assert!((s.x - p.x).abs() <= grid);
        assert!((s.y - p.y).abs() <= grid);
        x += 7.3;
    }
}

#[test]
fn snap_with_non_positive_grid_is_identity() {
    let p = Point::new(13.0, 7.0);
    assert_eq!(snap_to_grid(p, 0.0), p);
    assert_eq!(round_up_to_grid(13.0, -1.0), 13.0);
}

#[test]
fn round_up_to_grid_keeps_exact_multiples() {
    assert_eq!(round_up_to_grid(100.0, 50.0), 100.0);
    assert_eq!(round_up_to_grid(101.0, 50.0), 150.0);
    assert_eq!(round_up_to_grid(1.0, 50.0), 50.0);
}

// =============================================================
// Nearest-corner snapping
// =============================================================

#[test]
fn nearest_corner_prefers_top_left_on_ties() {
    // Every corner is 15 units off; the first visited corner wins.
    let snapped = snap_to_nearest_grid_corner(Point::new(500.0, 185.0), Size::new(250.0, 150.0), 50.0);
    assert_eq!(snapped, Point::new(500.0, 200.0));
}

#[test]
fn nearest_corner_uses_closest_corner() {
    // Bottom-right corner (148, 98) is 2.8 away from (150, 100); top-left (8, 8) is 11.3 away.
    let snapped = snap_to_nearest_grid_corner(Point::new(8.0, 8.0), Size::new(140.0, 90.0), 50.0);
    assert_eq!(snapped, Point::new(10.0, 10.0));
}

#[test]
fn nearest_corner_on_grid_is_unchanged() {
    let p = Point::new(100.0, 50.0);
    assert_eq!(snap_to_nearest_grid_corner(p, Size::new(250.0, 150.0), 50.0), p);
}

#[test]
fn nearest_corner_grid_sized_box_lands_on_grid() {
    let snapped = snap_to_nearest_grid_corner(Point::new(312.0, 441.0), Size::new(300.0, 100.0), 50.0);
    assert_eq!(snapped.x % 50.0, 0.0);
    assert_eq!(snapped.y % 50.0, 0.0);
}

// =============================================================
// Clamping
// =============================================================

#[test]
fn clamp_origin_keeps_box_inside_bounds() {
    let bounds = Size::new(1000.0, 800.0);
    let size = Size::new(100.0, 50.0);
    assert_eq!(clamp_origin(Point::new(-20.0, 900.0), size, bounds), Point::new(0.0, 750.0));
    assert_eq!(clamp_origin(Point::new(950.0, 10.0), size, bounds), Point::new(900.0, 10.0));
}

#[test]
fn clamp_origin_box_larger_than_bounds_pins_to_zero() {
    let p = clamp_origin(Point::new(40.0, 40.0), Size::new(2000.0, 2000.0), Size::new(100.0, 100.0));
    assert_eq!(p, Point::new(0.0, 0.0));
}

#[test]
fn snapped_clamp_rounds_far_edge_down_to_grid() {
    let bounds = Size::new(10_000.0, 10_000.0);
    let size = Size::new(250.0, 100.0);
    let p = clamp_snapped_origin(Point::new(9_780.0, 9_960.0), size, bounds, 60.0);
    assert_eq!(p, Point::new(9_720.0, 9_900.0));
    assert_eq!(clamp_snapped_origin(Point::new(-60.0, 120.0), size, bounds, 60.0), Point::new(0.0, 120.0));
}

#[test]
fn snapped_clamp_without_grid_matches_plain_clamp() {
    let bounds = Size::new(1000.0, 800.0);
    let size = Size::new(100.0, 50.0);
    let origin = Point::new(950.0, 900.0);
    assert_eq!(clamp_snapped_origin(origin, size, bounds, 0.0), clamp_origin(origin, size, bounds));
}

#![allow(clippy::float_cmp)]

use serde_json::json;
use uuid::Uuid;

use super::*;
use crate::doc::{Item, Paint};

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn boxed_item(x: f64, y: f64, w: f64, h: f64) -> Item {
    Item {
        id: Uuid::new_v4(),
        x,
        y,
        width: w,
        height: h,
        fill: Paint::None,
        stroke: Paint::None,
        props: json!({}),
        version: 1,
    }
}

// =============================================================
// SnapLevels
// =============================================================

#[test]
fn levels_from_one_item() {
    let item = boxed_item(10.0, 20.0, 40.0, 60.0);
    let levels = SnapLevels::from_items([&item].into_iter());
    assert_eq!(levels.vertical, vec![10.0, 30.0, 50.0]);
    assert_eq!(levels.horizontal, vec![20.0, 50.0, 80.0]);
}

#[test]
fn levels_accumulate_across_items() {
    let a = boxed_item(0.0, 0.0, 10.0, 10.0);
    let b = boxed_item(100.0, 100.0, 10.0, 10.0);
    let levels = SnapLevels::from_items([&a, &b].into_iter());
    assert_eq!(levels.vertical.len(), 6);
    assert_eq!(levels.horizontal.len(), 6);
}

#[test]
fn level_snap_picks_nearest_within_distance() {
    let item = boxed_item(0.0, 0.0, 10.0, 10.0);
    let levels = SnapLevels::from_items([&item].into_iter());
    // x near the 5.0 midpoint level, y out of range of everything.
    let snapped = levels.snap(pt(5.3, 57.0), 0.5);
    assert_eq!(snapped, pt(5.0, 57.0));
    // Both axes snap independently.
    let snapped = levels.snap(pt(9.8, 0.2), 0.5);
    assert_eq!(snapped, pt(10.0, 0.0));
}

#[test]
fn level_snap_out_of_range_is_identity() {
    let item = boxed_item(0.0, 0.0, 10.0, 10.0);
    let levels = SnapLevels::from_items([&item].into_iter());
    assert_eq!(levels.snap(pt(42.0, 42.0), 0.5), pt(42.0, 42.0));
}

#[test]
fn empty_levels_never_snap() {
    let levels = SnapLevels::default();
    assert_eq!(levels.snap(pt(1.0, 2.0), 1000.0), pt(1.0, 2.0));
}

// =============================================================
// SnappedPoint
// =============================================================

#[test]
fn snapped_point_miss_is_identity() {
    let miss = SnappedPoint::miss(pt(3.0, 4.0));
    assert!(!miss.snapped);
    assert_eq!(miss.point, pt(3.0, 4.0));
}

// =============================================================
// snap_angle
// =============================================================

#[test]
fn angle_snap_rounds_to_division() {
    // 8 divisions: steps of 22.5 degrees. A vector at 20 degrees rounds to 22.5.
    let reference = pt(0.0, 0.0);
    let p = Point::from_angle(20f64.to_radians()) * 10.0;
    let snapped = snap_angle(p, reference, reference, 8, false).unwrap();
    let expected = Point::from_angle(22.5f64.to_radians()) * 10.0;
    assert!(snapped.distance(expected) < 1e-9);
}

#[test]
fn angle_snap_preserves_length() {
    let reference = pt(2.0, 3.0);
    let p = reference + Point::from_angle(1.0) * 7.0;
    let snapped = snap_angle(p, reference, reference, 4, false).unwrap();
    assert!((snapped.distance(reference) - 7.0).abs() < 1e-9);
}

#[test]
fn angle_snap_exact_angle_is_fixed_point() {
    let reference = pt(0.0, 0.0);
    let p = pt(10.0, 0.0);
    let snapped = snap_angle(p, reference, reference, 8, false).unwrap();
    assert!(snapped.distance(p) < 1e-9);
}

#[test]
fn angle_snap_to_original_axis() {
    let reference = pt(0.0, 0.0);
    // Grab axis at 30 degrees; candidates are 30, 120, 210, 300 degrees.
    let original = Point::from_angle(30f64.to_radians()) * 5.0;
    let p = Point::from_angle(115f64.to_radians()) * 5.0;
    let snapped = snap_angle(p, reference, original, 8, true).unwrap();
    let expected = Point::from_angle(120f64.to_radians()) * 5.0;
    assert!(snapped.distance(expected) < 1e-9);
}

#[test]
fn angle_snap_degenerate_vector_is_none() {
    let reference = pt(1.0, 1.0);
    assert!(snap_angle(reference, reference, reference, 8, false).is_none());
}

#[test]
fn angle_snap_degenerate_axis_is_none() {
    let reference = pt(0.0, 0.0);
    // Original coincides with the reference: no axis to snap against.
    assert!(snap_angle(pt(5.0, 5.0), reference, reference, 8, true).is_none());
}

#[test]
fn angle_snap_zero_divisions_is_none() {
    assert!(snap_angle(pt(5.0, 5.0), pt(0.0, 0.0), pt(0.0, 0.0), 0, false).is_none());
}

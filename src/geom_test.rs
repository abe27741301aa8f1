#![allow(clippy::float_cmp)]

use super::*;

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

// =============================================================
// Point
// =============================================================

#[test]
fn point_add_sub() {
    assert_eq!(pt(1.0, 2.0) + pt(3.0, 4.0), pt(4.0, 6.0));
    assert_eq!(pt(3.0, 4.0) - pt(1.0, 2.0), pt(2.0, 2.0));
}

#[test]
fn point_assign_ops() {
    let mut p = pt(1.0, 1.0);
    p += pt(2.0, 3.0);
    assert_eq!(p, pt(3.0, 4.0));
    p -= pt(3.0, 4.0);
    assert_eq!(p, pt(0.0, 0.0));
}

#[test]
fn point_scale_and_neg() {
    assert_eq!(pt(1.0, -2.0) * 3.0, pt(3.0, -6.0));
    assert_eq!(-pt(1.0, -2.0), pt(-1.0, 2.0));
}

#[test]
fn point_length_and_distance() {
    assert_eq!(pt(3.0, 4.0).length(), 5.0);
    assert_eq!(pt(1.0, 1.0).distance(pt(4.0, 5.0)), 5.0);
}

#[test]
fn point_dot() {
    assert_eq!(pt(1.0, 2.0).dot(pt(3.0, 4.0)), 11.0);
    assert_eq!(pt(1.0, 0.0).dot(pt(0.0, 1.0)), 0.0);
}

#[test]
fn point_angle_round_trip() {
    let a = std::f64::consts::FRAC_PI_3;
    let v = Point::from_angle(a);
    assert!((v.angle() - a).abs() < 1e-12);
    assert!((v.length() - 1.0).abs() < 1e-12);
}

#[test]
fn point_lerp_and_midpoint() {
    let a = pt(0.0, 0.0);
    let b = pt(10.0, 20.0);
    assert_eq!(a.lerp(b, 0.0), a);
    assert_eq!(a.lerp(b, 1.0), b);
    assert_eq!(a.lerp(b, 0.25), pt(2.5, 5.0));
    assert_eq!(a.midpoint(b), pt(5.0, 10.0));
}

#[test]
fn point_reflect_through_pivot() {
    assert_eq!(pt(2.0, 0.0).reflect(pt(5.0, 0.0)), pt(8.0, 0.0));
    assert_eq!(pt(1.0, 1.0).reflect(pt(0.0, 0.0)), pt(-1.0, -1.0));
}

// =============================================================
// Camera
// =============================================================

#[test]
fn camera_default_is_identity() {
    let cam = Camera::default();
    assert_eq!(cam.zoom, 1.0);
    assert_eq!(cam.screen_dist_to_world(4.0), 4.0);
}

#[test]
fn camera_zoom_scales_distances() {
    let cam = Camera { zoom: 2.0 };
    assert_eq!(cam.screen_dist_to_world(4.0), 2.0);
    let cam = Camera { zoom: 0.5 };
    assert_eq!(cam.screen_dist_to_world(4.0), 8.0);
}

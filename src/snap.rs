//! Snapping: host free-snap delegation, bounding-box levels, angle constraint.
//!
//! Three layers, applied by the move pipeline in this order: a host-provided
//! [`Snapper`] over whatever geometry the host indexes, a fallback against
//! axis levels derived from the selection's bounding boxes, and the Ctrl
//! angle constraint evaluated per draggable.

#[cfg(test)]
#[path = "snap_test.rs"]
mod snap_test;

use crate::consts::DEGENERATE_EPS;
use crate::doc::Item;
use crate::geom::Point;

/// Result of a host free-snap query.
#[derive(Debug, Clone, Copy)]
pub struct SnappedPoint {
    /// The snapped position (equal to the query point when not snapped).
    pub point: Point,
    /// Whether a snap target was found within range.
    pub snapped: bool,
    /// Distance from the query point to the snap target.
    pub distance: f64,
}

impl SnappedPoint {
    /// A miss: the query point unchanged.
    #[must_use]
    pub fn miss(point: Point) -> Self {
        Self { point, snapped: false, distance: f64::INFINITY }
    }
}

/// Host-provided free snapping against document geometry.
pub trait Snapper {
    /// Snap `point` to the nearest node/bounding-box target, if any is in range.
    fn free_snap(&self, point: Point) -> SnappedPoint;
}

/// Axis-aligned snap levels derived from selected items' bounding boxes:
/// min, midpoint, and max on each axis.
#[derive(Debug, Clone, Default)]
pub struct SnapLevels {
    /// y coordinates of horizontal levels.
    pub horizontal: Vec<f64>,
    /// x coordinates of vertical levels.
    pub vertical: Vec<f64>,
}

impl SnapLevels {
    /// Derive levels from the given items.
    #[must_use]
    pub fn from_items<'a>(items: impl Iterator<Item = &'a Item>) -> Self {
        let mut levels = Self::default();
        for item in items {
            levels.vertical.push(item.x);
            levels.vertical.push(item.x + item.width / 2.0);
            levels.vertical.push(item.x + item.width);
            levels.horizontal.push(item.y);
            levels.horizontal.push(item.y + item.height / 2.0);
            levels.horizontal.push(item.y + item.height);
        }
        levels
    }

    /// Snap each coordinate of `p` independently to the nearest level within
    /// `dist`, leaving it unchanged when none is in range.
    #[must_use]
    pub fn snap(&self, p: Point, dist: f64) -> Point {
        Point {
            x: nearest_level(&self.vertical, p.x, dist).unwrap_or(p.x),
            y: nearest_level(&self.horizontal, p.y, dist).unwrap_or(p.y),
        }
    }
}

fn nearest_level(levels: &[f64], v: f64, dist: f64) -> Option<f64> {
    levels
        .iter()
        .copied()
        .filter(|level| (level - v).abs() < dist)
        .min_by(|a, b| (a - v).abs().total_cmp(&(b - v).abs()))
}

/// Constrain `p` to a snapped angle around `reference`.
///
/// Without `to_original_axis`, the angle of `p - reference` is rounded to the
/// nearest multiple of `π / divisions`. With it (Alt), the angle is rounded to
/// the original grab axis (`original - reference`) and its perpendiculars.
/// The distance from `reference` is preserved. Returns `None` when either
/// vector is degenerate.
#[must_use]
pub fn snap_angle(
    p: Point,
    reference: Point,
    original: Point,
    divisions: u32,
    to_original_axis: bool,
) -> Option<Point> {
    let v = p - reference;
    let len = v.length();
    if len * len < DEGENERATE_EPS || divisions == 0 {
        return None;
    }
    let angle = v.angle();
    let snapped = if to_original_axis {
        let axis = original - reference;
        if axis.dot(axis) < DEGENERATE_EPS {
            return None;
        }
        let base = axis.angle();
        let step = std::f64::consts::FRAC_PI_2;
        base + ((angle - base) / step).round() * step
    } else {
        let step = std::f64::consts::PI / f64::from(divisions);
        (angle / step).round() * step
    };
    Some(reference + Point::from_angle(snapped) * len)
}

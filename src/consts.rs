//! Shared numeric constants for the drag engine.

// ── Merging ────────────────────────────────────────────────────

/// Absolute world-unit distance within which coincident gradient points are
/// folded into one dragger when the dragger set is rebuilt.
pub const MERGE_DIST: f64 = 0.1;

/// World-unit distance within which a radial focus collapses onto its center
/// and starts riding it.
pub const FOCUS_SNAP_DIST: f64 = 0.1;

// ── Snapping ───────────────────────────────────────────────────

/// Screen-space distance in pixels within which a dragged handle snaps onto
/// another merge-compatible dragger, or onto a bounding-box level.
pub const SNAP_DIST_PX: f64 = 4.0;

/// Default number of angle subdivisions per half-turn for Ctrl angle snap.
pub const ANGLE_SNAP_DIVISIONS: u32 = 8;

// ── Numerics ───────────────────────────────────────────────────

/// Below this squared length a vector is treated as degenerate and skipped by
/// angle snapping and mid-stop projection.
pub const DEGENERATE_EPS: f64 = 1e-12;

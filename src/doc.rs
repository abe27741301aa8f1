//! Document model: items, gradient paints, stops, and the in-memory store.
//!
//! This module defines what the drag engine edits (`Item`, `Paint`,
//! `LinearGradient`, `RadialGradient`, `Stop`), a typed accessor for the
//! open-ended `props` JSON bag (`Props`), and the runtime store that owns all
//! live items (`DocStore`).
//!
//! The store also implements the gradient coordinate interface the engine is
//! written against: `get_coord` reads the world position of a semantic point
//! (`PointRole` on a fill or stroke gradient) and `set_coord` writes one back,
//! bumping the item version when the write is a committed one. Reads are
//! idempotent and writes are visible to subsequent reads in the same call
//! chain.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::{DEGENERATE_EPS, FOCUS_SNAP_DIST};
use crate::draggable::{Channel, PointRole};
use crate::geom::Point;

/// Unique identifier for a document item.
pub type ItemId = Uuid;

/// Errors from stop and paint mutation.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DocError {
    /// No item with the given id exists in the store.
    #[error("unknown item {0}")]
    UnknownItem(ItemId),
    /// The addressed paint channel does not hold a gradient.
    #[error("item {item} has no gradient on its {channel:?} channel")]
    NotAGradient { item: ItemId, channel: Channel },
    /// A stop index was outside the gradient's stop list.
    #[error("stop index {index} out of range for {len} stops")]
    StopIndexOutOfRange { index: usize, len: usize },
    /// Removing the stop would leave the gradient with fewer than 2 stops.
    #[error("gradient must keep at least 2 stops")]
    TooFewStops,
}

/// A color/offset keyframe along a gradient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    /// Position along the gradient span, in `[0, 1]`, nondecreasing.
    pub offset: f64,
    /// CSS color string for this stop.
    pub color: String,
}

impl Stop {
    #[must_use]
    pub fn new(offset: f64, color: &str) -> Self {
        Self { offset, color: color.to_owned() }
    }
}

/// A linear gradient between two endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearGradient {
    pub start: Point,
    pub end: Point,
    pub stops: Vec<Stop>,
}

/// A radial gradient with independent radii along the two handle axes.
///
/// `focus: None` means the focus rides the center; it stays `None` until a
/// focus write lands far enough from the center to break the snap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadialGradient {
    pub center: Point,
    pub focus: Option<Point>,
    pub radius1: f64,
    pub radius2: f64,
    pub stops: Vec<Stop>,
}

impl RadialGradient {
    /// Effective focus position: the explicit focus, or the center when snapped.
    #[must_use]
    pub fn focus_point(&self) -> Point {
        self.focus.unwrap_or(self.center)
    }

    /// Handle point for the first radius, on the positive x axis.
    #[must_use]
    pub fn r1_point(&self) -> Point {
        self.center + Point::new(self.radius1, 0.0)
    }

    /// Handle point for the second radius, on the negative y axis.
    #[must_use]
    pub fn r2_point(&self) -> Point {
        self.center + Point::new(0.0, -self.radius2)
    }
}

/// Kind of gradient held by a paint, for closed-switch dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradientKind {
    Linear,
    Radial,
}

/// What fills or strokes an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "type")]
pub enum Paint {
    /// No paint on this channel.
    None,
    /// Flat color, opaque to the drag engine.
    Solid { color: String },
    /// Linear gradient paint.
    Linear(LinearGradient),
    /// Radial gradient paint.
    Radial(RadialGradient),
}

impl Paint {
    /// Gradient kind, if this paint is a gradient.
    #[must_use]
    pub fn gradient_kind(&self) -> Option<GradientKind> {
        match self {
            Self::Linear(_) => Some(GradientKind::Linear),
            Self::Radial(_) => Some(GradientKind::Radial),
            Self::None | Self::Solid { .. } => None,
        }
    }

    /// Stop list, if this paint is a gradient.
    #[must_use]
    pub fn stops(&self) -> Option<&[Stop]> {
        match self {
            Self::Linear(lg) => Some(&lg.stops),
            Self::Radial(rg) => Some(&rg.stops),
            Self::None | Self::Solid { .. } => None,
        }
    }

    fn stops_mut(&mut self) -> Option<&mut Vec<Stop>> {
        match self {
            Self::Linear(lg) => Some(&mut lg.stops),
            Self::Radial(rg) => Some(&mut rg.stops),
            Self::None | Self::Solid { .. } => None,
        }
    }
}

impl Default for Paint {
    fn default() -> Self {
        Self::None
    }
}

/// A document item: a bounding box plus fill and stroke paints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    /// Unique identifier for this item.
    pub id: ItemId,
    /// Left edge of the bounding box in world coordinates.
    pub x: f64,
    /// Top edge of the bounding box in world coordinates.
    pub y: f64,
    /// Width of the bounding box in world coordinates.
    pub width: f64,
    /// Height of the bounding box in world coordinates.
    pub height: f64,
    /// Fill paint.
    pub fill: Paint,
    /// Stroke paint.
    pub stroke: Paint,
    /// Open-ended host metadata (label, etc.).
    pub props: serde_json::Value,
    /// Monotonically increasing edit counter; bumped on committed writes.
    pub version: i64,
}

impl Item {
    /// The paint on the given channel.
    #[must_use]
    pub fn paint(&self, channel: Channel) -> &Paint {
        match channel {
            Channel::Fill => &self.fill,
            Channel::Stroke => &self.stroke,
        }
    }

    /// Mutable access to the paint on the given channel.
    pub fn paint_mut(&mut self, channel: Channel) -> &mut Paint {
        match channel {
            Channel::Fill => &mut self.fill,
            Channel::Stroke => &mut self.stroke,
        }
    }
}

/// Typed access to common props fields from an `Item.props` JSON value.
pub struct Props<'a> {
    value: &'a serde_json::Value,
}

impl<'a> Props<'a> {
    /// Wrap a reference to a `props` JSON value for typed access.
    #[must_use]
    pub fn new(value: &'a serde_json::Value) -> Self {
        Self { value }
    }

    /// Human-readable item label. Defaults to `"item"` when absent.
    #[must_use]
    pub fn label(&self) -> &str {
        self.value
            .get("label")
            .and_then(|v| v.as_str())
            .unwrap_or("item")
    }
}

/// In-memory store of document items.
pub struct DocStore {
    items: HashMap<ItemId, Item>,
}

impl DocStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self { items: HashMap::new() }
    }

    /// Insert or replace an item. An existing item with the same `id` is
    /// overwritten.
    pub fn insert(&mut self, item: Item) {
        self.items.insert(item.id, item);
    }

    /// Remove an item by id, returning it if it was present.
    pub fn remove(&mut self, id: &ItemId) -> Option<Item> {
        self.items.remove(id)
    }

    /// Return a reference to an item by id.
    #[must_use]
    pub fn get(&self, id: &ItemId) -> Option<&Item> {
        self.items.get(id)
    }

    /// Replace all items with a full snapshot.
    pub fn load_snapshot(&mut self, items: Vec<Item>) {
        self.items.clear();
        for item in items {
            self.items.insert(item.id, item);
        }
    }

    /// All items sorted by id, for deterministic iteration.
    #[must_use]
    pub fn sorted_items(&self) -> Vec<&Item> {
        let mut items: Vec<&Item> = self.items.values().collect();
        items.sort_by_key(|i| i.id);
        items
    }

    /// Number of items currently in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the store contains no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The paint on `channel` of `item`, if the item exists.
    #[must_use]
    pub fn paint(&self, item: &ItemId, channel: Channel) -> Option<&Paint> {
        self.items.get(item).map(|i| i.paint(channel))
    }

    /// Mutable paint access. Callers that commit must also `bump_version`.
    pub fn paint_mut(&mut self, item: &ItemId, channel: Channel) -> Option<&mut Paint> {
        self.items.get_mut(item).map(|i| i.paint_mut(channel))
    }

    /// Bump the edit counter of an item after a committed mutation.
    pub fn bump_version(&mut self, item: &ItemId) {
        if let Some(i) = self.items.get_mut(item) {
            i.version += 1;
        }
    }

    /// Whether the radial focus on this channel currently rides the center.
    #[must_use]
    pub fn focus_snapped(&self, item: &ItemId, channel: Channel) -> bool {
        matches!(self.paint(item, channel), Some(Paint::Radial(rg)) if rg.focus.is_none())
    }

    // ── Coordinate interface ───────────────────────────────────

    /// World position of a semantic gradient point, or `None` if the item,
    /// gradient, or stop does not exist.
    #[must_use]
    pub fn get_coord(
        &self,
        item: &ItemId,
        role: PointRole,
        index: usize,
        channel: Channel,
    ) -> Option<Point> {
        match (self.paint(item, channel)?, role) {
            (Paint::Linear(lg), PointRole::LinearStart) => Some(lg.start),
            (Paint::Linear(lg), PointRole::LinearEnd) => Some(lg.end),
            (Paint::Linear(lg), PointRole::LinearMid) => {
                let stop = lg.stops.get(index)?;
                Some(lg.start.lerp(lg.end, stop.offset))
            }
            (Paint::Radial(rg), PointRole::RadialCenter) => Some(rg.center),
            (Paint::Radial(rg), PointRole::RadialRadius1) => Some(rg.r1_point()),
            (Paint::Radial(rg), PointRole::RadialRadius2) => Some(rg.r2_point()),
            (Paint::Radial(rg), PointRole::RadialFocus) => Some(rg.focus_point()),
            (Paint::Radial(rg), PointRole::RadialMid1) => {
                let stop = rg.stops.get(index)?;
                Some(rg.center.lerp(rg.r1_point(), stop.offset))
            }
            (Paint::Radial(rg), PointRole::RadialMid2) => {
                let stop = rg.stops.get(index)?;
                Some(rg.center.lerp(rg.r2_point(), stop.offset))
            }
            _ => None,
        }
    }

    /// Write a semantic gradient point back into the document.
    ///
    /// Returns `false` (and changes nothing) when the target is missing or the
    /// carrying geometry is degenerate. `write` bumps the item version, the
    /// analogue of serializing to the document tree; in-progress drags pass
    /// `false` and only the release writes. `scale_radial` makes a radius
    /// write scale the other radius proportionally.
    pub fn set_coord(
        &mut self,
        item: &ItemId,
        role: PointRole,
        index: usize,
        channel: Channel,
        p: Point,
        write: bool,
        scale_radial: bool,
    ) -> bool {
        let Some(paint) = self.paint_mut(item, channel) else {
            return false;
        };
        let changed = match (paint, role) {
            (Paint::Linear(lg), PointRole::LinearStart) => {
                lg.start = p;
                true
            }
            (Paint::Linear(lg), PointRole::LinearEnd) => {
                lg.end = p;
                true
            }
            (Paint::Linear(lg), PointRole::LinearMid) => {
                set_mid_offset(&mut lg.stops, index, lg.start, lg.end, p)
            }
            (Paint::Radial(rg), PointRole::RadialCenter) => {
                let delta = p - rg.center;
                rg.center = p;
                if let Some(f) = rg.focus.as_mut() {
                    *f += delta;
                }
                true
            }
            (Paint::Radial(rg), PointRole::RadialRadius1) => {
                let r = p.distance(rg.center);
                if scale_radial && rg.radius1.abs() > DEGENERATE_EPS {
                    rg.radius2 *= r / rg.radius1;
                }
                rg.radius1 = r;
                true
            }
            (Paint::Radial(rg), PointRole::RadialRadius2) => {
                let r = p.distance(rg.center);
                if scale_radial && rg.radius2.abs() > DEGENERATE_EPS {
                    rg.radius1 *= r / rg.radius2;
                }
                rg.radius2 = r;
                true
            }
            (Paint::Radial(rg), PointRole::RadialFocus) => {
                if p.distance(rg.center) < FOCUS_SNAP_DIST {
                    rg.focus = None;
                } else {
                    rg.focus = Some(p);
                }
                true
            }
            (Paint::Radial(rg), PointRole::RadialMid1) => {
                let (center, r1) = (rg.center, rg.r1_point());
                set_mid_offset(&mut rg.stops, index, center, r1, p)
            }
            (Paint::Radial(rg), PointRole::RadialMid2) => {
                let (center, r2) = (rg.center, rg.r2_point());
                set_mid_offset(&mut rg.stops, index, center, r2, p)
            }
            _ => false,
        };
        if changed && write {
            self.bump_version(item);
        }
        changed
    }

    // ── Stop interface ─────────────────────────────────────────

    /// Number of stops on the gradient, or `None` if there is no gradient.
    #[must_use]
    pub fn stop_count(&self, item: &ItemId, channel: Channel) -> Option<usize> {
        self.paint(item, channel).and_then(Paint::stops).map(<[Stop]>::len)
    }

    /// Offset of stop `index`, or `None` if missing.
    #[must_use]
    pub fn stop_offset(&self, item: &ItemId, channel: Channel, index: usize) -> Option<f64> {
        self.paint(item, channel)
            .and_then(Paint::stops)
            .and_then(|s| s.get(index))
            .map(|s| s.offset)
    }

    /// Insert a stop at `index`, shifting later stops up.
    pub fn insert_stop(
        &mut self,
        item: &ItemId,
        channel: Channel,
        index: usize,
        stop: Stop,
    ) -> Result<(), DocError> {
        let stops = self.stops_mut_checked(item, channel)?;
        if index > stops.len() {
            return Err(DocError::StopIndexOutOfRange { index, len: stops.len() });
        }
        stops.insert(index, stop);
        self.bump_version(item);
        Ok(())
    }

    /// Remove the stop at `index`, returning it. Refuses to drop the stop
    /// count below 2.
    pub fn remove_stop(
        &mut self,
        item: &ItemId,
        channel: Channel,
        index: usize,
    ) -> Result<Stop, DocError> {
        let stops = self.stops_mut_checked(item, channel)?;
        if index >= stops.len() {
            return Err(DocError::StopIndexOutOfRange { index, len: stops.len() });
        }
        if stops.len() <= 2 {
            return Err(DocError::TooFewStops);
        }
        let stop = stops.remove(index);
        self.bump_version(item);
        Ok(stop)
    }

    /// Set the offset of stop `index` directly.
    pub fn set_stop_offset(
        &mut self,
        item: &ItemId,
        channel: Channel,
        index: usize,
        offset: f64,
    ) -> Result<(), DocError> {
        let stops = self.stops_mut_checked(item, channel)?;
        let len = stops.len();
        let Some(stop) = stops.get_mut(index) else {
            return Err(DocError::StopIndexOutOfRange { index, len });
        };
        stop.offset = offset.clamp(0.0, 1.0);
        self.bump_version(item);
        Ok(())
    }

    /// Remove the paint reference on a channel entirely.
    pub fn clear_paint(&mut self, item: &ItemId, channel: Channel) -> Result<(), DocError> {
        let Some(i) = self.items.get_mut(item) else {
            return Err(DocError::UnknownItem(*item));
        };
        *i.paint_mut(channel) = Paint::None;
        i.version += 1;
        Ok(())
    }

    fn stops_mut_checked(
        &mut self,
        item: &ItemId,
        channel: Channel,
    ) -> Result<&mut Vec<Stop>, DocError> {
        let Some(i) = self.items.get_mut(item) else {
            return Err(DocError::UnknownItem(*item));
        };
        i.paint_mut(channel)
            .stops_mut()
            .ok_or(DocError::NotAGradient { item: *item, channel })
    }
}

impl Default for DocStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Project `p` onto the `a`→`b` segment and store the resulting offset on
/// stop `index`, clamped between its neighbouring stops. Returns `false` when
/// the segment is degenerate or the index is out of range.
fn set_mid_offset(stops: &mut [Stop], index: usize, a: Point, b: Point, p: Point) -> bool {
    let span = b - a;
    let len2 = span.dot(span);
    if len2 < DEGENERATE_EPS {
        return false;
    }
    if index >= stops.len() {
        return false;
    }
    let lo = if index > 0 { stops[index - 1].offset } else { 0.0 };
    let hi = if index + 1 < stops.len() { stops[index + 1].offset } else { 1.0 };
    let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    let t = ((p - a).dot(span) / len2).clamp(lo, hi).clamp(0.0, 1.0);
    stops[index].offset = t;
    true
}

//! The on-screen handle: one position carrying one or more draggables.
//!
//! A dragger owns the draggables whose points currently coincide at its
//! position. It knows how to test merge compatibility against a candidate
//! draggable or a whole other dragger, and how to push its position into the
//! document for everything it carries. The arena that owns draggers, and the
//! move pipeline that coordinates them, live in [`crate::session`].

#[cfg(test)]
#[path = "dragger_test.rs"]
mod dragger_test;

use crate::doc::{DocStore, ItemId, Props};
use crate::draggable::{Channel, Draggable, PointRole};
use crate::geom::Point;

/// Stable handle to a dragger in the session arena.
///
/// Ids stay valid across moves and merges of *other* draggers but go stale
/// after any rebuild; callers must re-resolve through the session afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DraggerId(pub(crate) usize);

/// A draggable control point and the semantic points bound to it.
#[derive(Debug, Clone)]
pub struct Dragger {
    /// Current position in world coordinates.
    pub position: Point,
    /// Position snapshotted at the last grab; reference for angle snapping.
    pub original_position: Point,
    draggables: Vec<Draggable>,
    tip: String,
}

impl Dragger {
    pub(crate) fn new(position: Point, draggable: Draggable, doc: &DocStore) -> Self {
        let mut dragger = Self {
            position,
            original_position: position,
            draggables: vec![draggable],
            tip: String::new(),
        };
        dragger.update_tip(doc);
        dragger
    }

    pub(crate) fn from_parts(position: Point, draggables: Vec<Draggable>, doc: &DocStore) -> Self {
        let mut dragger = Self {
            position,
            original_position: position,
            draggables,
            tip: String::new(),
        };
        dragger.update_tip(doc);
        dragger
    }

    /// The draggables bound to this dragger, most recently added first.
    #[must_use]
    pub fn draggables(&self) -> &[Draggable] {
        &self.draggables
    }

    /// Hover tip describing what this handle drags.
    #[must_use]
    pub fn tip(&self) -> &str {
        &self.tip
    }

    /// Bind another draggable to this dragger, in front of the existing ones.
    pub(crate) fn add_draggable(&mut self, draggable: Draggable, doc: &DocStore) {
        self.draggables.insert(0, draggable);
        self.update_tip(doc);
    }

    /// Detach every draggable but the first, returning the rest.
    pub(crate) fn split_rest(&mut self, doc: &DocStore) -> Vec<Draggable> {
        let rest = self.draggables.split_off(1);
        self.update_tip(doc);
        rest
    }

    /// Take all draggables, leaving this dragger empty for teardown.
    pub(crate) fn take_draggables(&mut self) -> Vec<Draggable> {
        std::mem::take(&mut self.draggables)
    }

    /// Whether any bound draggable has the given role.
    #[must_use]
    pub fn has_role(&self, role: PointRole) -> bool {
        self.draggables.iter().any(|d| d.role == role)
    }

    /// Whether a bound draggable matches the full semantic-point tuple.
    #[must_use]
    pub fn has_point(&self, item: &ItemId, role: PointRole, index: usize, channel: Channel) -> bool {
        self.draggables
            .iter()
            .any(|d| d.item == *item && d.role == role && d.index == index && d.channel == channel)
    }

    /// Whether `candidate` may merge with every draggable already bound here.
    #[must_use]
    pub fn may_merge_draggable(&self, candidate: &Draggable) -> bool {
        self.draggables.iter().all(|d| d.may_merge(candidate))
    }

    /// Whether this dragger and `other` may merge: every pairwise draggable
    /// combination across both must be compatible.
    #[must_use]
    pub fn may_merge(&self, other: &Self) -> bool {
        self.draggables
            .iter()
            .all(|d| other.may_merge_draggable(d))
    }

    /// Whether merging with `other` would bring a radial center and its own
    /// focus together, which must override the focus-snap write suppression.
    #[must_use]
    pub(crate) fn merge_joins_focus(&self, other: &Self) -> bool {
        let pair = |a: &Draggable, b: &Draggable| {
            a.item == b.item
                && a.channel == b.channel
                && matches!(
                    (a.role, b.role),
                    (PointRole::RadialCenter, PointRole::RadialFocus)
                        | (PointRole::RadialFocus, PointRole::RadialCenter)
                )
        };
        self.draggables
            .iter()
            .any(|a| other.draggables.iter().any(|b| pair(a, b)))
    }

    /// Push the current position into the document for every bound draggable.
    ///
    /// A focus whose gradient is in the snapped state is skipped unless
    /// `merging_focus` is set, so the focus cannot escape the center during
    /// unrelated edits of a shared handle.
    pub(crate) fn fire_draggables(
        &self,
        doc: &mut DocStore,
        write: bool,
        scale_radial: bool,
        merging_focus: bool,
    ) {
        for d in &self.draggables {
            if d.role == PointRole::RadialFocus
                && !merging_focus
                && doc.focus_snapped(&d.item, d.channel)
            {
                continue;
            }
            doc.set_coord(&d.item, d.role, d.index, d.channel, self.position, write, scale_radial);
        }
    }

    /// Items whose gradients this dragger touches, deduplicated.
    #[must_use]
    pub fn touched_items(&self) -> Vec<ItemId> {
        let mut items: Vec<ItemId> = self.draggables.iter().map(|d| d.item).collect();
        items.sort_unstable();
        items.dedup();
        items
    }

    fn update_tip(&mut self, doc: &DocStore) {
        self.tip = match self.draggables.as_slice() {
            [] => String::new(),
            [d] => {
                let label = doc
                    .get(&d.item)
                    .map_or_else(|| "item".to_owned(), |item| Props::new(&item.props).label().to_owned());
                format!("Drag gradient point {} of {label}", d.role.label())
            }
            many => format!("Drag gradient point shared by {} gradients", many.len()),
        };
    }
}

//! The drag session: the dragger arena and the interactive move pipeline.
//!
//! `DragSession` owns every dragger for the current selection. The host feeds
//! it selection and document notifications plus pointer gestures; the session
//! rebuilds its dragger set from the selected items' gradients, runs the
//! merge/split/snap pipeline on each move, propagates dependent point updates,
//! and hands mutations back as [`Action`]s for the host to persist, render,
//! and record as undo steps.
//!
//! Draggers live in a vector-backed slot arena addressed by
//! [`DraggerId`]; ids go stale after any [`DragSession::rebuild`] and must be
//! re-resolved through [`DragSession::dragger_for`].

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::consts::{ANGLE_SNAP_DIVISIONS, MERGE_DIST, SNAP_DIST_PX};
use crate::doc::{DocStore, GradientKind, ItemId, Paint};
use crate::draggable::{Channel, Draggable, PointRole};
use crate::dragger::{Dragger, DraggerId};
use crate::geom::{Camera, Point};
use crate::input::{GestureState, Modifiers, PaintSnapshot};
use crate::snap::{SnapLevels, Snapper, snap_angle};

/// Actions returned from session entry points for the host to process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Establish one undo step for the completed gesture.
    Commit { description: String },
    /// The sub-selection changed; carries the primary selected dragger.
    SubselectionChanged { dragger: Option<DraggerId> },
    /// A document item's gradient geometry changed.
    ItemUpdated { id: ItemId },
    /// Derived display state (handles, guide lines) changed.
    RenderNeeded,
}

/// A transient guide segment between gradient anchor points. Display only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuideLine {
    pub a: Point,
    pub b: Point,
}

/// Tunable engine preferences. Hosts deserialize this from their own config.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Prefs {
    /// Screen-space snap distance in pixels (handle merging, level snap).
    pub snap_dist_px: f64,
    /// World-unit distance for folding coincident points at rebuild time.
    pub merge_dist: f64,
    /// Angle subdivisions per half-turn for Ctrl angle snap.
    pub angle_snap_divisions: u32,
}

impl Default for Prefs {
    fn default() -> Self {
        Self {
            snap_dist_px: SNAP_DIST_PX,
            merge_dist: MERGE_DIST,
            angle_snap_divisions: ANGLE_SNAP_DIVISIONS,
        }
    }
}

/// Per-selection manager of all gradient handle draggers.
pub struct DragSession {
    /// The document being edited. The session owns it; hosts hydrate it via
    /// [`DocStore::load_snapshot`] and mutate through session entry points.
    pub doc: DocStore,
    camera: Camera,
    prefs: Prefs,
    snapper: Option<Box<dyn Snapper>>,
    selection: Vec<ItemId>,
    slots: Vec<Option<Dragger>>,
    order: Vec<DraggerId>,
    selected: Vec<DraggerId>,
    lines: Vec<GuideLine>,
    levels: SnapLevels,
    /// Set when the engine itself wrote to the document, so the echoed
    /// modification callback skips the wholesale rebuild.
    local_change: bool,
    suppress_grab: bool,
    gesture: GestureState,
}

impl DragSession {
    /// Create a session over a document with default preferences.
    #[must_use]
    pub fn new(doc: DocStore) -> Self {
        Self::with_prefs(doc, Prefs::default())
    }

    /// Create a session with explicit preferences.
    #[must_use]
    pub fn with_prefs(doc: DocStore, prefs: Prefs) -> Self {
        Self {
            doc,
            camera: Camera::default(),
            prefs,
            snapper: None,
            selection: Vec::new(),
            slots: Vec::new(),
            order: Vec::new(),
            selected: Vec::new(),
            lines: Vec::new(),
            levels: SnapLevels::default(),
            local_change: false,
            suppress_grab: false,
            gesture: GestureState::Idle,
        }
    }

    /// Install a host snapper for free snapping against document geometry.
    pub fn set_snapper(&mut self, snapper: Box<dyn Snapper>) {
        self.snapper = Some(snapper);
    }

    /// Update the view zoom used for pixel-denominated thresholds.
    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
    }

    /// The current view state.
    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    /// The active preferences.
    #[must_use]
    pub fn prefs(&self) -> &Prefs {
        &self.prefs
    }

    // ── Host notifications ─────────────────────────────────────

    /// The host's item selection changed; re-derive everything.
    pub fn on_selection_changed(&mut self, ids: Vec<ItemId>) -> Vec<Action> {
        self.selection = ids;
        self.rebuild();
        self.update_lines();
        self.update_levels();
        vec![
            Action::SubselectionChanged { dragger: None },
            Action::RenderNeeded,
        ]
    }

    /// Selected items were modified. Rebuilds unless the modification was the
    /// engine's own write echoing back.
    pub fn on_selection_modified(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.local_change {
            self.local_change = false;
        } else {
            self.rebuild();
            actions.push(Action::SubselectionChanged { dragger: None });
        }
        self.update_lines();
        self.update_levels();
        actions.push(Action::RenderNeeded);
        actions
    }

    // ── Queries ────────────────────────────────────────────────

    /// Resolve a dragger id, if it is still live.
    #[must_use]
    pub fn dragger(&self, id: DraggerId) -> Option<&Dragger> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    /// All live draggers in insertion order.
    pub fn draggers(&self) -> impl Iterator<Item = (DraggerId, &Dragger)> {
        self.order
            .iter()
            .filter_map(|id| self.dragger(*id).map(|d| (*id, d)))
    }

    /// Number of live draggers.
    #[must_use]
    pub fn dragger_count(&self) -> usize {
        self.order.len()
    }

    /// The currently sub-selected draggers, in selection order.
    #[must_use]
    pub fn selected(&self) -> &[DraggerId] {
        &self.selected
    }

    /// The most recently selected dragger, if any.
    #[must_use]
    pub fn primary_selected(&self) -> Option<DraggerId> {
        self.selected.last().copied()
    }

    /// Current guide lines. Derived display data, rebuilt after every move.
    #[must_use]
    pub fn lines(&self) -> &[GuideLine] {
        &self.lines
    }

    /// Current snap levels.
    #[must_use]
    pub fn levels(&self) -> &SnapLevels {
        &self.levels
    }

    /// Find the dragger carrying the given semantic point.
    #[must_use]
    pub fn dragger_for(
        &self,
        item: &ItemId,
        role: PointRole,
        index: usize,
        channel: Channel,
    ) -> Option<DraggerId> {
        self.order
            .iter()
            .copied()
            .find(|id| {
                self.dragger(*id)
                    .is_some_and(|d| d.has_point(item, role, index, channel))
            })
    }

    /// The nearest dragger within the screen-space snap distance of `p`.
    #[must_use]
    pub fn dragger_near(&self, p: Point) -> Option<DraggerId> {
        let dist = self.camera.screen_dist_to_world(self.prefs.snap_dist_px);
        self.draggers()
            .filter(|(_, d)| d.position.distance(p) < dist)
            .min_by(|(_, a), (_, b)| {
                a.position.distance(p).total_cmp(&b.position.distance(p))
            })
            .map(|(id, _)| id)
    }

    // ── Rebuild ────────────────────────────────────────────────

    /// Discard and re-derive the whole dragger set from the current selection.
    ///
    /// Every existing [`DraggerId`] is invalidated. The sub-selection is
    /// cleared before draggers are dropped, and any gesture is abandoned.
    pub fn rebuild(&mut self) {
        self.selected.clear();
        self.slots.clear();
        self.order.clear();
        self.gesture = GestureState::Idle;
        for item in self.selection.clone() {
            for channel in [Channel::Fill, Channel::Stroke] {
                match self.doc.paint(&item, channel).and_then(Paint::gradient_kind) {
                    Some(GradientKind::Linear) => self.add_draggers_for_linear(item, channel),
                    Some(GradientKind::Radial) => self.add_draggers_for_radial(item, channel),
                    None => {}
                }
            }
        }
        debug!(draggers = self.order.len(), "rebuilt dragger set");
    }

    fn add_draggers_for_linear(&mut self, item: ItemId, channel: Channel) {
        self.add_dragger(Draggable::new(item, PointRole::LinearStart, 0, channel));
        self.add_dragger(Draggable::new(item, PointRole::LinearEnd, 0, channel));
        if let Some(n) = self.doc.stop_count(&item, channel) {
            for i in 1..n.saturating_sub(1) {
                self.add_dragger(Draggable::new(item, PointRole::LinearMid, i, channel));
            }
        }
    }

    fn add_draggers_for_radial(&mut self, item: ItemId, channel: Channel) {
        self.add_dragger(Draggable::new(item, PointRole::RadialCenter, 0, channel));
        self.add_dragger(Draggable::new(item, PointRole::RadialRadius1, 0, channel));
        self.add_dragger(Draggable::new(item, PointRole::RadialRadius2, 0, channel));
        self.add_dragger(Draggable::new(item, PointRole::RadialFocus, 0, channel));
        if let Some(n) = self.doc.stop_count(&item, channel) {
            for i in 1..n.saturating_sub(1) {
                self.add_dragger(Draggable::new(item, PointRole::RadialMid1, i, channel));
                self.add_dragger(Draggable::new(item, PointRole::RadialMid2, i, channel));
            }
        }
    }

    /// Register a draggable: attach it to a merge-compatible dragger within
    /// the merge distance, or create a new dragger at its current position.
    /// A draggable whose geometry is missing is skipped.
    pub fn add_dragger(&mut self, draggable: Draggable) {
        let Some(pos) =
            self.doc
                .get_coord(&draggable.item, draggable.role, draggable.index, draggable.channel)
        else {
            return;
        };
        let merge_dist = self.prefs.merge_dist;
        let target = self.order.iter().copied().find(|id| {
            self.slots[id.0].as_ref().is_some_and(|d| {
                d.position.distance(pos) < merge_dist && d.may_merge_draggable(&draggable)
            })
        });
        if let Some(id) = target {
            if let Some(d) = self.slots[id.0].as_mut() {
                d.add_draggable(draggable, &self.doc);
            }
            return;
        }
        let id = self.alloc_slot(Dragger::new(pos, draggable, &self.doc));
        self.order.push(id);
    }

    fn alloc_slot(&mut self, dragger: Dragger) -> DraggerId {
        if let Some(i) = self.slots.iter().position(Option::is_none) {
            self.slots[i] = Some(dragger);
            DraggerId(i)
        } else {
            self.slots.push(Some(dragger));
            DraggerId(self.slots.len() - 1)
        }
    }

    /// Drop a dragger from the arena. Selection references go first, keeping
    /// `selected ⊆ draggers` at every intermediate state.
    fn remove_dragger(&mut self, id: DraggerId) {
        self.selected.retain(|s| *s != id);
        self.order.retain(|s| *s != id);
        if let Some(slot) = self.slots.get_mut(id.0) {
            *slot = None;
        }
    }

    // ── Derived display state ──────────────────────────────────

    /// Recompute guide lines between gradient anchors of the selection.
    pub fn update_lines(&mut self) {
        self.lines.clear();
        for item in &self.selection {
            for channel in [Channel::Fill, Channel::Stroke] {
                match self.doc.paint(item, channel) {
                    Some(Paint::Linear(lg)) => {
                        self.lines.push(GuideLine { a: lg.start, b: lg.end });
                    }
                    Some(Paint::Radial(rg)) => {
                        self.lines.push(GuideLine { a: rg.center, b: rg.r1_point() });
                        self.lines.push(GuideLine { a: rg.center, b: rg.r2_point() });
                    }
                    _ => {}
                }
            }
        }
    }

    /// Recompute snap levels from the selection's bounding boxes.
    pub fn update_levels(&mut self) {
        self.levels =
            SnapLevels::from_items(self.selection.iter().filter_map(|id| self.doc.get(id)));
    }

    // ── Sub-selection ──────────────────────────────────────────

    /// Update the sub-selection.
    ///
    /// Three policies: replace (`add = false`), add-without-toggle
    /// (`add = true, override_add = true`), and toggle
    /// (`add = true, override_add = false`). Stale ids are ignored.
    pub fn set_selected(
        &mut self,
        dragger: Option<DraggerId>,
        add: bool,
        override_add: bool,
    ) -> Action {
        match dragger {
            None => self.selected.clear(),
            Some(id) if self.dragger(id).is_some() => {
                if add {
                    if let Some(pos) = self.selected.iter().position(|s| *s == id) {
                        if !override_add {
                            self.selected.remove(pos);
                        }
                    } else {
                        self.selected.push(id);
                    }
                } else {
                    self.selected.clear();
                    self.selected.push(id);
                }
            }
            Some(_) => {}
        }
        Action::SubselectionChanged { dragger: self.primary_selected() }
    }

    /// Cycle single-selection forward through the draggers, wrapping.
    pub fn select_next(&mut self) -> Action {
        if self.order.is_empty() {
            return self.set_selected(None, false, false);
        }
        let next = match self
            .primary_selected()
            .and_then(|id| self.order.iter().position(|o| *o == id))
        {
            Some(i) => self.order.get((i + 1) % self.order.len()).copied(),
            None => self.order.first().copied(),
        };
        self.set_selected(next, false, false)
    }

    /// Cycle single-selection backward through the draggers, wrapping.
    pub fn select_prev(&mut self) -> Action {
        if self.order.is_empty() {
            return self.set_selected(None, false, false);
        }
        let prev = match self
            .primary_selected()
            .and_then(|id| self.order.iter().position(|o| *o == id))
        {
            Some(i) => self
                .order
                .get((i + self.order.len() - 1) % self.order.len())
                .copied(),
            None => self.order.last().copied(),
        };
        self.set_selected(prev, false, false)
    }

    /// Click on a handle: plain click replaces the sub-selection, shift-click
    /// toggles membership.
    pub fn click_dragger(&mut self, id: DraggerId, mods: Modifiers) -> Action {
        self.set_selected(Some(id), mods.shift, false)
    }

    /// Suppress the next grab (double-click guard). Consumed by the next
    /// [`DragSession::begin_drag`] and reset deterministically.
    pub fn suppress_next_grab(&mut self) {
        self.suppress_grab = true;
    }

    // ── Gesture ────────────────────────────────────────────────

    /// Grab a dragger. Snapshots the touched gradients for cancellation and
    /// pins the angle-snap reference. Returns `false` when the grab was
    /// suppressed or the id is stale.
    pub fn begin_drag(&mut self, id: DraggerId, _mods: Modifiers) -> bool {
        if self.suppress_grab {
            self.suppress_grab = false;
            return false;
        }
        let Some(dragger) = self.slots.get_mut(id.0).and_then(Option::as_mut) else {
            return false;
        };
        dragger.original_position = dragger.position;
        let draggables = dragger.draggables().to_vec();

        let mut snapshots = Vec::new();
        let mut midpoints = Vec::new();
        let mut seen: Vec<(ItemId, Channel)> = Vec::new();
        for d in &draggables {
            if seen.contains(&(d.item, d.channel)) {
                continue;
            }
            seen.push((d.item, d.channel));
            if let Some(paint) = self.doc.paint(&d.item, d.channel) {
                if let Paint::Linear(lg) = paint {
                    midpoints.push((d.item, d.channel, lg.start.midpoint(lg.end)));
                }
                snapshots.push(PaintSnapshot {
                    item: d.item,
                    channel: d.channel,
                    paint: paint.clone(),
                });
            }
        }
        self.gesture = GestureState::Dragging { dragger: id, snapshots, midpoints };
        true
    }

    /// Move the grabbed dragger to follow the pointer.
    ///
    /// Runs the full pipeline: Shift unmerge, merge-on-approach (which ends
    /// the gesture and commits immediately), free/level snap, Ctrl angle
    /// snap, then position update and dependency propagation.
    pub fn drag_to(&mut self, pointer: Point, mods: Modifiers) -> Vec<Action> {
        let id = match &self.gesture {
            GestureState::Dragging { dragger, .. } => *dragger,
            GestureState::Idle => return Vec::new(),
        };
        if self.dragger(id).is_none() {
            return Vec::new();
        }
        let mut actions = Vec::new();
        let mut p = pointer;

        // Shift splits a shared handle apart before anything else moves.
        if mods.unmerges() {
            let rest = match self.slots.get_mut(id.0).and_then(Option::as_mut) {
                Some(d) if d.draggables().len() > 1 => d.split_rest(&self.doc),
                _ => Vec::new(),
            };
            if !rest.is_empty() {
                let pos = self.dragger(id).map_or(pointer, |d| d.position);
                let nid = self.alloc_slot(Dragger::from_parts(pos, rest, &self.doc));
                self.order.push(nid);
                debug!("unmerged shared handle");
            }
        }

        // Merge-on-approach; Ctrl disables it, and so does Shift, or the
        // scan would immediately re-merge the dragger split off above.
        if !mods.angle_snaps() && !mods.unmerges() {
            let snap_dist = self.camera.screen_dist_to_world(self.prefs.snap_dist_px);
            let target = self.order.iter().copied().find(|other| {
                *other != id
                    && self.slots[other.0]
                        .as_ref()
                        .zip(self.slots[id.0].as_ref())
                        .is_some_and(|(o, me)| {
                            o.position.distance(p) < snap_dist && o.may_merge(me)
                        })
            });
            if let Some(other) = target {
                return self.merge_into(id, other, actions);
            }
        }

        // Free snap with level fallback; Shift (and Ctrl+Alt) suppresses it.
        if !mods.suppresses_snap() {
            let snap_dist = self.camera.screen_dist_to_world(self.prefs.snap_dist_px);
            let snapped = self.snapper.as_ref().map(|s| s.free_snap(p));
            match snapped {
                Some(sp) if sp.snapped => p = sp.point,
                _ => p = self.levels.snap(p, snap_dist),
            }
        }

        // Ctrl constrains the move to snapped angles; the smallest correction
        // among all carried draggables wins.
        if mods.angle_snaps() {
            if let Some(best) = self.angle_snap_candidate(id, p, mods) {
                p = best;
            }
        }

        if let Some(d) = self.slots.get_mut(id.0).and_then(Option::as_mut) {
            d.position = p;
        }
        if let Some(d) = self.slots[id.0].as_ref() {
            d.fire_draggables(&mut self.doc, false, mods.ctrl, false);
        }
        self.local_change = true;
        self.update_dependencies(id, false, mods);
        self.update_lines();
        if let Some(d) = self.dragger(id) {
            for item in d.touched_items() {
                actions.push(Action::ItemUpdated { id: item });
            }
        }
        actions.push(Action::RenderNeeded);
        trace!(x = p.x, y = p.y, "dragged handle");
        actions
    }

    /// Release the grabbed dragger: write-through, re-select, one commit.
    pub fn end_drag(&mut self, mods: Modifiers) -> Vec<Action> {
        let id = match &self.gesture {
            GestureState::Dragging { dragger, .. } => *dragger,
            GestureState::Idle => return Vec::new(),
        };
        let mut actions = Vec::new();
        if let Some(d) = self.slots[id.0].as_ref() {
            d.fire_draggables(&mut self.doc, true, mods.ctrl, false);
            for item in d.touched_items() {
                actions.push(Action::ItemUpdated { id: item });
            }
        }
        self.local_change = true;
        self.update_dependencies(id, true, mods);
        self.update_lines();
        self.gesture = GestureState::Idle;
        actions.push(self.set_selected(Some(id), false, false));
        debug!("committed gradient drag");
        actions.push(Action::Commit { description: "Move gradient handle".into() });
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Abort the gesture without committing: restore the grabbed gradients to
    /// their grab-time state and re-derive the dragger set.
    pub fn cancel_drag(&mut self) -> Vec<Action> {
        let snapshots = match std::mem::take(&mut self.gesture) {
            GestureState::Dragging { snapshots, .. } => snapshots,
            GestureState::Idle => return Vec::new(),
        };
        for snap in snapshots {
            if let Some(paint) = self.doc.paint_mut(&snap.item, snap.channel) {
                *paint = snap.paint;
            }
        }
        self.rebuild();
        self.update_lines();
        debug!("cancelled gradient drag");
        vec![
            Action::SubselectionChanged { dragger: None },
            Action::RenderNeeded,
        ]
    }

    // ── Move pipeline internals ────────────────────────────────

    /// Transfer everything carried by `from` into `into`, write the merged
    /// position through, and commit immediately.
    fn merge_into(
        &mut self,
        from: DraggerId,
        into: DraggerId,
        mut actions: Vec<Action>,
    ) -> Vec<Action> {
        let merging_focus = match (self.dragger(from), self.dragger(into)) {
            (Some(a), Some(b)) => a.merge_joins_focus(b),
            _ => return actions,
        };
        let moved = self
            .slots
            .get_mut(from.0)
            .and_then(Option::as_mut)
            .map(Dragger::take_draggables)
            .unwrap_or_default();
        if let Some(d) = self.slots.get_mut(into.0).and_then(Option::as_mut) {
            for draggable in moved {
                d.add_draggable(draggable, &self.doc);
            }
        }
        self.remove_dragger(from);
        if let Some(d) = self.slots[into.0].as_ref() {
            d.fire_draggables(&mut self.doc, true, false, merging_focus);
            for item in d.touched_items() {
                actions.push(Action::ItemUpdated { id: item });
            }
        }
        self.local_change = true;
        self.gesture = GestureState::Idle;
        actions.push(self.set_selected(Some(into), false, false));
        self.update_lines();
        debug!("merged gradient handles");
        actions.push(Action::Commit { description: "Merge gradient handles".into() });
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Best angle-snapped position for the pointer, or `None` when no carried
    /// draggable contributes a non-degenerate constraint.
    fn angle_snap_candidate(&self, id: DraggerId, p: Point, mods: Modifiers) -> Option<Point> {
        let dragger = self.dragger(id)?;
        let original = dragger.original_position;
        let mut best: Option<Point> = None;
        for d in dragger.draggables() {
            let reference = match d.role {
                PointRole::LinearStart | PointRole::LinearEnd => {
                    let opposite = if d.role == PointRole::LinearStart {
                        PointRole::LinearEnd
                    } else {
                        PointRole::LinearStart
                    };
                    let Some(other) = self.doc.get_coord(&d.item, opposite, 0, d.channel) else {
                        continue;
                    };
                    if mods.shift {
                        let Some(this) = self.doc.get_coord(&d.item, d.role, 0, d.channel) else {
                            continue;
                        };
                        this.midpoint(other)
                    } else {
                        other
                    }
                }
                PointRole::RadialRadius1 | PointRole::RadialRadius2 | PointRole::RadialFocus => {
                    let Some(center) =
                        self.doc.get_coord(&d.item, PointRole::RadialCenter, 0, d.channel)
                    else {
                        continue;
                    };
                    center
                }
                PointRole::RadialCenter => original,
                // Mid points are already constrained to their carrying segment.
                PointRole::LinearMid | PointRole::RadialMid1 | PointRole::RadialMid2 => continue,
            };
            if let Some(candidate) =
                snap_angle(p, reference, original, self.prefs.angle_snap_divisions, mods.alt)
            {
                let better = best.is_none_or(|b| candidate.distance(p) < b.distance(p));
                if better {
                    best = Some(candidate);
                }
            }
        }
        best
    }

    /// Propagate a move into geometrically linked draggers.
    fn update_dependencies(&mut self, id: DraggerId, write: bool, mods: Modifiers) {
        let (position, draggables) = match self.dragger(id) {
            Some(d) => (d.position, d.draggables().to_vec()),
            None => return,
        };
        let midpoints: Vec<(ItemId, Channel, Point)> = match &self.gesture {
            GestureState::Dragging { midpoints, .. } => midpoints.clone(),
            GestureState::Idle => Vec::new(),
        };
        for d in &draggables {
            match d.role {
                PointRole::LinearStart | PointRole::LinearEnd => {
                    if mods.shift && mods.ctrl {
                        let opposite = if d.role == PointRole::LinearStart {
                            PointRole::LinearEnd
                        } else {
                            PointRole::LinearStart
                        };
                        let pivot = midpoints
                            .iter()
                            .find(|(i, c, _)| *i == d.item && *c == d.channel)
                            .map(|(_, _, m)| *m);
                        if let Some(pivot) = pivot {
                            let mirrored = position.reflect(pivot);
                            self.doc
                                .set_coord(&d.item, opposite, 0, d.channel, mirrored, write, false);
                            self.move_dragger_to_coord(&d.item, opposite, 0, d.channel, write, id);
                        }
                    }
                    self.update_midstops(&d.item, d.channel, write, id);
                }
                PointRole::RadialCenter => {
                    self.move_dragger_to_coord(&d.item, PointRole::RadialRadius1, 0, d.channel, write, id);
                    self.move_dragger_to_coord(&d.item, PointRole::RadialRadius2, 0, d.channel, write, id);
                    self.move_dragger_to_coord(&d.item, PointRole::RadialFocus, 0, d.channel, write, id);
                    self.update_midstops(&d.item, d.channel, write, id);
                }
                PointRole::RadialRadius1 => {
                    self.move_dragger_to_coord(&d.item, PointRole::RadialRadius2, 0, d.channel, write, id);
                    self.move_dragger_to_coord(&d.item, PointRole::RadialFocus, 0, d.channel, write, id);
                    self.update_midstops(&d.item, d.channel, write, id);
                }
                PointRole::RadialRadius2 => {
                    self.move_dragger_to_coord(&d.item, PointRole::RadialRadius1, 0, d.channel, write, id);
                    self.move_dragger_to_coord(&d.item, PointRole::RadialFocus, 0, d.channel, write, id);
                    self.update_midstops(&d.item, d.channel, write, id);
                }
                PointRole::RadialMid1 => {
                    self.move_dragger_to_coord(&d.item, PointRole::RadialMid2, d.index, d.channel, write, id);
                }
                PointRole::RadialMid2 => {
                    self.move_dragger_to_coord(&d.item, PointRole::RadialMid1, d.index, d.channel, write, id);
                }
                PointRole::RadialFocus | PointRole::LinearMid => {}
            }
        }
    }

    /// Move the dragger carrying a semantic point to that point's current
    /// document position, and keep its co-located points in step. Skips the
    /// triggering dragger and silently does nothing when no dragger matches.
    fn move_dragger_to_coord(
        &mut self,
        item: &ItemId,
        role: PointRole,
        index: usize,
        channel: Channel,
        write: bool,
        skip: DraggerId,
    ) {
        let Some(pos) = self.doc.get_coord(item, role, index, channel) else {
            return;
        };
        let Some(did) = self.dragger_for(item, role, index, channel) else {
            return;
        };
        if did == skip {
            return;
        }
        if let Some(d) = self.slots.get_mut(did.0).and_then(Option::as_mut) {
            d.position = pos;
        }
        let others: Vec<Draggable> = self
            .dragger(did)
            .map(|d| {
                d.draggables()
                    .iter()
                    .filter(|x| {
                        !(x.item == *item
                            && x.role == role
                            && x.index == index
                            && x.channel == channel)
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        for o in others {
            self.doc.set_coord(&o.item, o.role, o.index, o.channel, pos, write, false);
        }
    }

    /// Reposition every interior-stop dragger of a gradient with more than
    /// 2 stops, keeping the visual geometry consistent with a moved anchor.
    fn update_midstops(&mut self, item: &ItemId, channel: Channel, write: bool, skip: DraggerId) {
        let Some(n) = self.doc.stop_count(item, channel) else {
            return;
        };
        if n <= 2 {
            return;
        }
        let kind = self.doc.paint(item, channel).and_then(Paint::gradient_kind);
        for i in 1..n - 1 {
            match kind {
                Some(GradientKind::Linear) => {
                    self.move_dragger_to_coord(item, PointRole::LinearMid, i, channel, write, skip);
                }
                Some(GradientKind::Radial) => {
                    self.move_dragger_to_coord(item, PointRole::RadialMid1, i, channel, write, skip);
                    self.move_dragger_to_coord(item, PointRole::RadialMid2, i, channel, write, skip);
                }
                None => {}
            }
        }
    }

    // ── Deletion ───────────────────────────────────────────────

    /// Delete the points carried by the selected draggers (or just the first
    /// selected dragger when `just_one`).
    ///
    /// Mid points remove their stop directly. Endpoints remove the outermost
    /// stop and rescale the surviving geometry so the remaining stops keep
    /// their visual positions. A gradient with fewer than 3 stops loses its
    /// paint reference instead.
    pub fn delete_selected(&mut self, just_one: bool) -> Vec<Action> {
        let targets: Vec<DraggerId> = if just_one {
            self.selected.first().copied().into_iter().collect()
        } else {
            self.selected.clone()
        };
        if targets.is_empty() {
            return Vec::new();
        }
        let mut draggables: Vec<Draggable> = Vec::new();
        for id in targets {
            if let Some(d) = self.dragger(id) {
                draggables.extend(d.draggables().iter().cloned());
            }
        }
        let mut touched: Vec<ItemId> = Vec::new();
        for d in &draggables {
            if self.delete_point(d) {
                touched.push(d.item);
            }
        }
        touched.sort_unstable();
        touched.dedup();
        if touched.is_empty() {
            return Vec::new();
        }
        self.local_change = true;
        self.rebuild();
        self.update_lines();
        self.update_levels();
        let mut actions: Vec<Action> =
            touched.into_iter().map(|id| Action::ItemUpdated { id }).collect();
        actions.push(Action::SubselectionChanged { dragger: None });
        actions.push(Action::Commit { description: "Delete gradient stop".into() });
        actions.push(Action::RenderNeeded);
        actions
    }

    fn delete_point(&mut self, d: &Draggable) -> bool {
        let Some(count) = self.doc.stop_count(&d.item, d.channel) else {
            return false;
        };
        if count < 3 {
            return self.doc.clear_paint(&d.item, d.channel).is_ok();
        }
        match d.role {
            PointRole::LinearMid | PointRole::RadialMid1 | PointRole::RadialMid2 => {
                if d.index == 0 || d.index + 1 >= count {
                    return false;
                }
                self.doc.remove_stop(&d.item, d.channel, d.index).is_ok()
            }
            PointRole::LinearStart | PointRole::RadialCenter => self.delete_first_stop(d),
            PointRole::LinearEnd | PointRole::RadialRadius1 | PointRole::RadialRadius2 => {
                self.delete_last_stop(d)
            }
            PointRole::RadialFocus => false,
        }
    }

    /// Remove the first stop, shifting the start anchor up to the next stop
    /// and renormalizing the surviving offsets so their positions hold.
    fn delete_first_stop(&mut self, d: &Draggable) -> bool {
        let Some(paint) = self.doc.paint_mut(&d.item, d.channel) else {
            return false;
        };
        let changed = match paint {
            Paint::Linear(lg) if lg.stops.len() >= 3 => {
                let o = lg.stops[1].offset;
                if o >= 1.0 {
                    false
                } else {
                    let span = lg.end - lg.start;
                    lg.start = lg.start + span * o;
                    lg.stops.remove(0);
                    for s in &mut lg.stops {
                        s.offset = (s.offset - o) / (1.0 - o);
                    }
                    true
                }
            }
            Paint::Radial(rg) if rg.stops.len() >= 3 => {
                // The center anchor cannot move off the center; drop the stop
                // and renormalize the survivors.
                let o = rg.stops[1].offset;
                if o >= 1.0 {
                    false
                } else {
                    rg.stops.remove(0);
                    for s in &mut rg.stops {
                        s.offset = (s.offset - o) / (1.0 - o);
                    }
                    true
                }
            }
            _ => false,
        };
        if changed {
            self.doc.bump_version(&d.item);
        }
        changed
    }

    /// Remove the last stop, pulling the end anchor (or the radii) in to the
    /// previous stop and rescaling offsets so surviving positions hold.
    fn delete_last_stop(&mut self, d: &Draggable) -> bool {
        let Some(paint) = self.doc.paint_mut(&d.item, d.channel) else {
            return false;
        };
        let changed = match paint {
            Paint::Linear(lg) if lg.stops.len() >= 3 => {
                let o = lg.stops[lg.stops.len() - 2].offset;
                if o <= 0.0 {
                    false
                } else {
                    let span = lg.end - lg.start;
                    lg.end = lg.start + span * o;
                    lg.stops.pop();
                    for s in &mut lg.stops {
                        s.offset /= o;
                    }
                    true
                }
            }
            Paint::Radial(rg) if rg.stops.len() >= 3 => {
                let o = rg.stops[rg.stops.len() - 2].offset;
                if o <= 0.0 {
                    false
                } else {
                    rg.radius1 *= o;
                    rg.radius2 *= o;
                    rg.stops.pop();
                    for s in &mut rg.stops {
                        s.offset /= o;
                    }
                    true
                }
            }
            _ => false,
        };
        if changed {
            self.doc.bump_version(&d.item);
        }
        changed
    }
}

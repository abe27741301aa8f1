//! Input model: modifier keys and the drag gesture state machine.
//!
//! `Modifiers` captures the keyboard state at the time of a pointer event and
//! drives which branches of the move pipeline run (unmerge, merge-on-approach,
//! free/level snap, angle snap). `GestureState` is the active gesture tracked
//! between grab and release, carrying the snapshots needed to cancel cleanly
//! and the reference geometry for symmetric endpoint scaling.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::doc::{ItemId, Paint};
use crate::dragger::DraggerId;
use crate::draggable::Channel;
use crate::geom::Point;

/// Keyboard modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// Shift alone: unmerge shared handles; skip free/level snapping.
    #[must_use]
    pub fn unmerges(self) -> bool {
        self.shift
    }

    /// Ctrl: constrain movement to snapped angles; disables merge-on-approach.
    #[must_use]
    pub fn angle_snaps(self) -> bool {
        self.ctrl
    }

    /// Whether free/level snapping is suppressed for this event.
    #[must_use]
    pub fn suppresses_snap(self) -> bool {
        self.shift || (self.ctrl && self.alt)
    }
}

/// Pre-gesture copy of one gradient paint, restored on cancel.
#[derive(Debug, Clone)]
pub(crate) struct PaintSnapshot {
    pub item: ItemId,
    pub channel: Channel,
    pub paint: Paint,
}

/// The active drag gesture, if any.
#[derive(Debug, Clone, Default)]
pub(crate) enum GestureState {
    /// No gesture in progress; waiting for the next grab.
    #[default]
    Idle,
    /// A dragger is grabbed and following the pointer.
    Dragging {
        /// The grabbed dragger.
        dragger: DraggerId,
        /// Paints touched by this gesture, as they were at grab time.
        snapshots: Vec<PaintSnapshot>,
        /// Midpoints of grabbed linear gradients at grab time, the pivot for
        /// Shift+Ctrl scale-around-center.
        midpoints: Vec<(ItemId, Channel, Point)>,
    },
}

//! Semantic bindings between on-screen handles and gradient points.
//!
//! A `Draggable` names one coordinate role of one gradient on one item. It is
//! the unit of merging: several draggables whose points coincide are carried
//! by a single dragger and move together. The pairwise `may_merge` rule here
//! is the whole merge policy; draggers apply it over their draggable lists.

#[cfg(test)]
#[path = "draggable_test.rs"]
mod draggable_test;

use serde::{Deserialize, Serialize};

use crate::doc::ItemId;

/// Which paint channel a gradient belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Fill,
    Stroke,
}

/// The semantic role of a gradient control point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointRole {
    /// Start endpoint of a linear gradient.
    LinearStart,
    /// End endpoint of a linear gradient.
    LinearEnd,
    /// An interior stop of a linear gradient, addressed by stop index.
    LinearMid,
    /// Center of a radial gradient.
    RadialCenter,
    /// Handle for the first radius of a radial gradient.
    RadialRadius1,
    /// Handle for the second radius of a radial gradient.
    RadialRadius2,
    /// Focus of a radial gradient.
    RadialFocus,
    /// An interior stop along the first radius axis.
    RadialMid1,
    /// An interior stop along the second radius axis.
    RadialMid2,
}

impl PointRole {
    /// Whether this is an interior-stop role. Mid points never merge.
    #[must_use]
    pub fn is_mid(self) -> bool {
        matches!(self, Self::LinearMid | Self::RadialMid1 | Self::RadialMid2)
    }

    /// Short human-readable name, used in handle tips.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::LinearStart => "start",
            Self::LinearEnd => "end",
            Self::LinearMid => "mid stop",
            Self::RadialCenter => "center",
            Self::RadialRadius1 | Self::RadialRadius2 => "radius",
            Self::RadialFocus => "focus",
            Self::RadialMid1 | Self::RadialMid2 => "radial mid stop",
        }
    }
}

/// Binding of a control point to one coordinate role of one gradient on one
/// item. `(item, role, index, channel)` uniquely identifies a semantic point;
/// the index is only meaningful for mid roles and is 0 otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Draggable {
    pub item: ItemId,
    pub role: PointRole,
    pub index: usize,
    pub channel: Channel,
}

impl Draggable {
    #[must_use]
    pub fn new(item: ItemId, role: PointRole, index: usize, channel: Channel) -> Self {
        Self { item, role, index, channel }
    }

    /// Whether this draggable and `other` may share a dragger.
    ///
    /// Mid points never merge with anything. Two points of the same gradient
    /// (same item and channel) may only coincide when one is the radial
    /// center and the other the radial focus; points of different gradients
    /// merge freely. The rule is symmetric.
    #[must_use]
    pub fn may_merge(&self, other: &Self) -> bool {
        if self.role.is_mid() || other.role.is_mid() {
            return false;
        }
        if self.item == other.item && self.channel == other.channel {
            matches!(
                (self.role, other.role),
                (PointRole::RadialCenter, PointRole::RadialFocus)
                    | (PointRole::RadialFocus, PointRole::RadialCenter)
            )
        } else {
            true
        }
    }
}

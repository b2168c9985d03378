//! Tri-state visibility and lock values.
//!
//! Both axes share the same shape: two authoritative, user-set states and
//! one "partial" state that an ancestor's authoritative state forces onto
//! descendants. A partial node is not independently settable while the
//! ancestor holds its forcing state; the toggle contracts on
//! [`LayerTree`](super::LayerTree) are the only way these values move.

use serde::{Deserialize, Serialize};

/// Visibility of a layer-tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Visibility {
    /// Authoritative: the user set this node visible.
    #[default]
    Visible,
    /// Forced by an ancestor's `Invisible`; the node itself was visible.
    PartiallyVisible,
    /// Authoritative: the user hid this node.
    Invisible,
}

impl Visibility {
    /// Whether this node, on its own, lets queries see its contents.
    pub fn is_enabling(self) -> bool {
        self == Self::Visible
    }
}

/// Lock state of a layer-tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LockState {
    /// Authoritative: the node is editable.
    #[default]
    Unlocked,
    /// Forced by an ancestor's `Locked`; the node itself was unlocked.
    PartiallyUnlocked,
    /// Authoritative: the user locked this node.
    Locked,
}

impl LockState {
    /// Whether this node, on its own, lets its contents be edited.
    pub fn is_enabling(self) -> bool {
        self == Self::Unlocked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_enabling() {
        assert!(Visibility::default().is_enabling());
        assert!(LockState::default().is_enabling());
    }

    #[test]
    fn partial_states_do_not_enable() {
        assert!(!Visibility::PartiallyVisible.is_enabling());
        assert!(!LockState::PartiallyUnlocked.is_enabling());
        assert!(!Visibility::Invisible.is_enabling());
        assert!(!LockState::Locked.is_enabling());
    }
}

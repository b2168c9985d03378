//! The layer tree: leaf layers holding game objects, composite groups
//! holding child layers, and the tri-state visibility/lock machinery.
//!
//! Nodes live in an arena ([`LayerTree`]) and are addressed by stable
//! [`LayerId`] handles; parent/child links are id lookups, never owning
//! pointers. Removing a node frees its whole subtree.
//!
//! Visibility and lock each follow the same three-state machine: an
//! authoritative on state, an authoritative off state, and a "partial"
//! state forced onto descendants by an ancestor's authoritative state.
//! The full toggle contracts live in [`LayerTree::toggle_visibility`] and
//! [`LayerTree::toggle_lock`].

mod queries;
mod tree;
mod tristate;

pub use queries::ObjectHit;
pub use tree::{DEFAULT_MAX_DEPTH, LayerId, LayerKind, LayerNode, LayerTree, TreeError};
pub use tristate::{LockState, Visibility};

//! The editable document: one open scene/level.
//!
//! A [`Document`] owns the layer tree (root group plus at least one leaf
//! layer), the active layer targeted by object insertion, the monotonic
//! id/name counters, and the guide lists. All mutations go through it so
//! the structural invariants hold:
//!
//! - the root group is never removed or duplicated,
//! - at least one leaf layer always exists,
//! - the active layer is always a live leaf layer,
//! - object ids are never reused.
//!
//! One document exists per open editor tab; dropping it drops the whole
//! tree.

#[allow(clippy::module_inception)]
mod document;
mod guides;
mod naming;

pub use document::{Document, DocumentError};
pub use guides::GuideAxis;
pub use naming::NameScope;

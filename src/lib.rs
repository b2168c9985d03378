//! # Stratum Core
//!
//! Document model core for the Stratum 2D level editor.
//!
//! This crate owns everything the editor UI is a thin shell around: the
//! layer tree with tri-state visibility/lock propagation, positioned and
//! rotatable game objects (sprites, labels), snapshot-based undo/redo,
//! axis snapping, and the two persistence formats (binary snapshots and
//! the script table format). It depends on no UI toolkit; rendering,
//! font shaping, and file watching are host concerns.
//!
//! - [`document::Document`] — the editable document: layer tree, active
//!   layer, id/name counters, guides
//! - [`layer`] — layer/group tree nodes and tri-state state machines
//! - [`object`] — game objects with transform and hit-testing math
//! - [`history::DocumentHistory`] — whole-document snapshot undo/redo
//! - [`snapshot`] — binary `Document` ⇄ bytes serialization
//! - [`script`] — script-table save format over collaborator traits
//! - [`snap`] — nearest-edge/center snapping for interactive transforms

pub mod document;
pub mod history;
pub mod layer;
pub mod math;
pub mod object;
pub mod resource;
pub mod script;
pub mod snap;
pub mod snapshot;

/// Core library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

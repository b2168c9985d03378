//! On-disk document representation.
//!
//! These types mirror the live document but carry no derived state
//! (geometry caches, arena slots). They are what actually gets encoded,
//! so identical documents always produce identical bytes.

use serde::{Deserialize, Serialize};

use crate::layer::{LockState, Visibility};
use crate::object::ObjectKind;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// A fully serialized document, suitable for file I/O.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SavedDocument {
    pub version: u32,
    /// Child-index path from the root to the active layer.
    pub active_layer: Vec<usize>,
    pub next_object_id: u64,
    pub layer_counter: u64,
    pub group_counter: u64,
    pub sprite_counter: u64,
    pub label_counter: u64,
    pub horizontal_guides: Vec<f32>,
    pub vertical_guides: Vec<f32>,
    pub max_depth: usize,
    pub root: SavedNode,
}

/// One node of the saved layer tree.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SavedNode {
    pub name: String,
    pub visibility: Visibility,
    pub lock: LockState,
    pub expanded: bool,
    pub kind: SavedNodeKind,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum SavedNodeKind {
    Layer { objects: Vec<SavedObject> },
    Group { children: Vec<SavedNode> },
}

/// One saved object. Geometry is stored as its independent inputs; the
/// transform and vertex caches are rebuilt on load.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SavedObject {
    pub name: String,
    pub id: u64,
    pub position: [f32; 2],
    pub size: [f32; 2],
    pub angle: f32,
    pub rotation_center: [f32; 2],
    pub kind: ObjectKind,
}

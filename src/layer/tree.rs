//! Arena-backed layer tree.

use std::fmt;

use crate::object::{GameObject, ObjectId};

use super::tristate::{LockState, Visibility};

/// Default maximum nesting depth of the layer tree (root counts as 1).
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Stable handle of a layer-tree node.
///
/// Handles are index + generation; within one arena's lifetime a
/// handle left over from a removed node never resolves again, even if
/// the slot is reused. Handles are not meaningful across arenas: a
/// snapshot restore rebuilds the arena from scratch, so ids taken
/// before a restore must be re-looked-up (by path or name) afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerId {
    index: u32,
    generation: u32,
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "layer {}v{}", self.index, self.generation)
    }
}

/// Leaf or composite payload of a node.
#[derive(Debug, Clone, PartialEq)]
pub enum LayerKind {
    /// A leaf layer owning game objects, stored front-to-back
    /// (index 0 is topmost in draw order).
    Layer { objects: Vec<GameObject> },
    /// A composite group owning child nodes, stored front-to-back.
    Group { children: Vec<LayerId> },
}

/// A node of the layer tree.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerNode {
    pub name: String,
    pub(crate) visibility: Visibility,
    pub(crate) lock: LockState,
    pub expanded: bool,
    pub(crate) parent: Option<LayerId>,
    pub(crate) kind: LayerKind,
}

impl LayerNode {
    fn new(name: String, kind: LayerKind) -> Self {
        Self {
            name,
            visibility: Visibility::Visible,
            lock: LockState::Unlocked,
            expanded: true,
            parent: None,
            kind,
        }
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn lock(&self) -> LockState {
        self.lock
    }

    pub fn parent(&self) -> Option<LayerId> {
        self.parent
    }

    pub fn kind(&self) -> &LayerKind {
        &self.kind
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, LayerKind::Group { .. })
    }

    pub fn is_layer(&self) -> bool {
        matches!(self.kind, LayerKind::Layer { .. })
    }

    /// Whether this node's own state lets queries and edits through.
    pub fn is_enabling(&self) -> bool {
        self.visibility.is_enabling() && self.lock.is_enabling()
    }
}

/// Errors from structural tree operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// The handle does not resolve to a live node.
    UnknownLayer,
    /// The operation requires a group node.
    NotAGroup,
    /// The operation requires a leaf layer node.
    NotALayer,
    /// Child index out of range.
    InvalidIndex { index: usize, len: usize },
    /// Attaching here would exceed the maximum nesting depth.
    DepthExceeded { max: usize },
    /// Attaching a node under its own descendant.
    WouldCreateCycle,
    /// Attaching a node that already has a parent.
    AlreadyAttached,
    /// The object id is not present in the addressed layer.
    UnknownObject,
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownLayer => write!(f, "unknown layer id"),
            Self::NotAGroup => write!(f, "node is not a layer group"),
            Self::NotALayer => write!(f, "node is not a layer"),
            Self::InvalidIndex { index, len } => {
                write!(f, "child index {index} out of range (len {len})")
            }
            Self::DepthExceeded { max } => {
                write!(f, "operation would exceed the maximum nesting depth {max}")
            }
            Self::WouldCreateCycle => write!(f, "cannot attach a node under its own subtree"),
            Self::AlreadyAttached => write!(f, "node already has a parent"),
            Self::UnknownObject => write!(f, "object id not found in layer"),
        }
    }
}

impl std::error::Error for TreeError {}

struct Slot {
    generation: u32,
    node: Option<LayerNode>,
}

/// The arena owning every layer node of a document.
pub struct LayerTree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    max_depth: usize,
}

impl fmt::Debug for LayerTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayerTree")
            .field("live_nodes", &(self.slots.len() - self.free.len()))
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

impl LayerTree {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Adjusts the nesting limit. Existing deeper nodes are left alone;
    /// the limit applies to subsequent attach operations.
    pub fn set_max_depth(&mut self, max_depth: usize) {
        self.max_depth = max_depth.max(1);
    }

    // -- slot plumbing --

    fn alloc(&mut self, node: LayerNode) -> LayerId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.generation += 1;
            slot.node = Some(node);
            LayerId { index, generation: slot.generation }
        } else {
            self.slots.push(Slot { generation: 0, node: Some(node) });
            LayerId {
                index: (self.slots.len() - 1) as u32,
                generation: 0,
            }
        }
    }

    fn free_slot(&mut self, id: LayerId) {
        if let Some(slot) = self.slots.get_mut(id.index as usize)
            && slot.generation == id.generation
            && slot.node.is_some()
        {
            slot.node = None;
            self.free.push(id.index);
        }
    }

    /// Resolves a handle to its node, if still live.
    pub fn node(&self, id: LayerId) -> Option<&LayerNode> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_ref()
    }

    /// Mutable counterpart of [`node`](Self::node).
    pub fn node_mut(&mut self, id: LayerId) -> Option<&mut LayerNode> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_mut()
    }

    pub fn contains(&self, id: LayerId) -> bool {
        self.node(id).is_some()
    }

    fn require(&self, id: LayerId) -> Result<&LayerNode, TreeError> {
        self.node(id).ok_or(TreeError::UnknownLayer)
    }

    fn require_mut(&mut self, id: LayerId) -> Result<&mut LayerNode, TreeError> {
        self.node_mut(id).ok_or(TreeError::UnknownLayer)
    }

    // -- structure --

    /// Creates a detached group node; used for the document root.
    pub fn new_group(&mut self, name: impl Into<String>) -> LayerId {
        self.alloc(LayerNode::new(name.into(), LayerKind::Group { children: Vec::new() }))
    }

    /// Creates a detached leaf layer node.
    pub fn new_layer(&mut self, name: impl Into<String>) -> LayerId {
        self.alloc(LayerNode::new(name.into(), LayerKind::Layer { objects: Vec::new() }))
    }

    /// Children of a group, front-to-back. Empty for leaf layers.
    pub fn children(&self, id: LayerId) -> &[LayerId] {
        match self.node(id).map(|n| &n.kind) {
            Some(LayerKind::Group { children }) => children,
            _ => &[],
        }
    }

    /// Position of `id` within its parent's child list.
    pub fn index_of(&self, id: LayerId) -> Option<usize> {
        let parent = self.node(id)?.parent?;
        self.children(parent).iter().position(|&c| c == id)
    }

    /// Nesting depth of the node; a parentless node has depth 1.
    pub fn depth(&self, id: LayerId) -> usize {
        let mut depth = 1;
        let mut cursor = id;
        while let Some(parent) = self.node(cursor).and_then(|n| n.parent) {
            depth += 1;
            cursor = parent;
        }
        depth
    }

    /// Height of the subtree rooted at `id`; a leaf has height 1.
    pub fn height(&self, id: LayerId) -> usize {
        let children = self.children(id).to_vec();
        1 + children.iter().map(|&c| self.height(c)).max().unwrap_or(0)
    }

    /// Whether `ancestor` lies on the path from the root to `id`,
    /// exclusive of `id` itself.
    pub fn is_ancestor(&self, ancestor: LayerId, id: LayerId) -> bool {
        let mut cursor = self.node(id).and_then(|n| n.parent);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.node(current).and_then(|n| n.parent);
        }
        false
    }

    /// Attaches a detached node under `parent` at `index`.
    ///
    /// Rejects non-group parents, out-of-range indices, cycles, and
    /// attachments that would push the subtree past the nesting limit.
    pub fn attach(&mut self, id: LayerId, parent: LayerId, index: usize) -> Result<(), TreeError> {
        if self.depth(parent) + self.height(id) > self.max_depth {
            return Err(TreeError::DepthExceeded { max: self.max_depth });
        }
        self.attach_unbounded(id, parent, index)
    }

    /// [`attach`](Self::attach) without the nesting-depth gate.
    ///
    /// Deserialization uses this to re-link nodes: a snapshot taken
    /// before the limit was lowered may legitimately hold a deeper tree
    /// than the current limit allows, and restoring it must not fail.
    /// The limit stays enforced for user-driven mutations.
    pub(crate) fn attach_unbounded(
        &mut self,
        id: LayerId,
        parent: LayerId,
        index: usize,
    ) -> Result<(), TreeError> {
        if self.require(id)?.parent.is_some() {
            return Err(TreeError::AlreadyAttached);
        }
        if id == parent || self.is_ancestor(id, parent) {
            return Err(TreeError::WouldCreateCycle);
        }
        let parent_node = self.require(parent)?;
        let LayerKind::Group { children } = &parent_node.kind else {
            return Err(TreeError::NotAGroup);
        };
        if index > children.len() {
            return Err(TreeError::InvalidIndex { index, len: children.len() });
        }
        if let LayerKind::Group { children } = &mut self.require_mut(parent)?.kind {
            children.insert(index, id);
        }
        self.require_mut(id)?.parent = Some(parent);
        Ok(())
    }

    /// Detaches a node from its parent, leaving it (and its subtree)
    /// alive but parentless. A root node detaches to itself.
    pub fn detach(&mut self, id: LayerId) -> Result<(), TreeError> {
        let Some(parent) = self.require(id)?.parent else {
            return Ok(());
        };
        if let LayerKind::Group { children } = &mut self.require_mut(parent)?.kind {
            children.retain(|&c| c != id);
        }
        self.require_mut(id)?.parent = None;
        Ok(())
    }

    /// Moves a node to a new parent/index in one step.
    pub fn move_node(
        &mut self,
        id: LayerId,
        parent: LayerId,
        index: usize,
    ) -> Result<(), TreeError> {
        if id == parent || self.is_ancestor(id, parent) {
            return Err(TreeError::WouldCreateCycle);
        }
        let old_parent = self.require(id)?.parent;
        let old_index = self.index_of(id);
        self.detach(id)?;
        if let Err(e) = self.attach(id, parent, index) {
            // Roll back to keep the node reachable.
            if let (Some(p), Some(i)) = (old_parent, old_index) {
                let _ = self.attach(id, p, i);
            }
            return Err(e);
        }
        Ok(())
    }

    /// Removes a node and frees its entire subtree.
    pub fn remove(&mut self, id: LayerId) -> Result<(), TreeError> {
        self.require(id)?;
        self.detach(id)?;
        self.free_subtree(id);
        Ok(())
    }

    fn free_subtree(&mut self, id: LayerId) {
        let children = self.children(id).to_vec();
        for child in children {
            self.free_subtree(child);
        }
        self.free_slot(id);
    }

    /// Deep-clones the subtree at `id`, returning the detached clone
    /// root. Names, states, and object ids are copied verbatim; the
    /// caller re-identifies clones as needed.
    pub fn clone_subtree(&mut self, id: LayerId) -> Result<LayerId, TreeError> {
        let source = self.require(id)?;
        let mut clone = source.clone();
        clone.parent = None;
        match &mut clone.kind {
            LayerKind::Layer { .. } => Ok(self.alloc(clone)),
            LayerKind::Group { children } => {
                let source_children = std::mem::take(children);
                let clone_id = self.alloc(clone);
                for (i, child) in source_children.iter().enumerate() {
                    let child_clone = self.clone_subtree(*child)?;
                    // Attach never fails here: the clone root is a fresh
                    // detached group and indices grow one at a time.
                    self.attach(child_clone, clone_id, i)?;
                }
                Ok(clone_id)
            }
        }
    }

    /// Pre-order traversal ids of the subtree at `id`, front-to-back.
    pub fn descendants(&self, id: LayerId) -> Vec<LayerId> {
        let mut out = Vec::new();
        self.collect_descendants(id, &mut out);
        out
    }

    fn collect_descendants(&self, id: LayerId, out: &mut Vec<LayerId>) {
        if !self.contains(id) {
            return;
        }
        out.push(id);
        for child in self.children(id).to_vec() {
            self.collect_descendants(child, out);
        }
    }

    // -- object access --

    /// Objects of a leaf layer, front-to-back.
    pub fn objects(&self, layer: LayerId) -> Result<&[GameObject], TreeError> {
        match &self.require(layer)?.kind {
            LayerKind::Layer { objects } => Ok(objects),
            LayerKind::Group { .. } => Err(TreeError::NotALayer),
        }
    }

    pub fn objects_mut(&mut self, layer: LayerId) -> Result<&mut Vec<GameObject>, TreeError> {
        match &mut self.require_mut(layer)?.kind {
            LayerKind::Layer { objects } => Ok(objects),
            LayerKind::Group { .. } => Err(TreeError::NotALayer),
        }
    }

    /// Inserts an object into a leaf layer at `index` (0 = frontmost).
    pub fn insert_object(
        &mut self,
        layer: LayerId,
        index: usize,
        object: GameObject,
    ) -> Result<(), TreeError> {
        let objects = self.objects_mut(layer)?;
        if index > objects.len() {
            return Err(TreeError::InvalidIndex { index, len: objects.len() });
        }
        objects.insert(index, object);
        Ok(())
    }

    /// Removes an object from a layer by id, returning it.
    pub fn remove_object(&mut self, layer: LayerId, id: ObjectId) -> Result<GameObject, TreeError> {
        let objects = self.objects_mut(layer)?;
        let index = objects
            .iter()
            .position(|o| o.id() == id)
            .ok_or(TreeError::UnknownObject)?;
        Ok(objects.remove(index))
    }

    /// Position of an object within its layer's front-to-back order.
    pub fn index_of_object(&self, layer: LayerId, id: ObjectId) -> Result<usize, TreeError> {
        self.objects(layer)?
            .iter()
            .position(|o| o.id() == id)
            .ok_or(TreeError::UnknownObject)
    }

    /// Finds an object anywhere in the subtree at `root` by id.
    pub fn find_object(&self, root: LayerId, id: ObjectId) -> Option<(LayerId, &GameObject)> {
        for node_id in self.descendants(root) {
            if let Ok(objects) = self.objects(node_id)
                && let Some(object) = objects.iter().find(|o| o.id() == id)
            {
                return Some((node_id, object));
            }
        }
        None
    }

    /// Mutable lookup of an object anywhere in the subtree at `root`.
    pub fn find_object_mut(
        &mut self,
        root: LayerId,
        id: ObjectId,
    ) -> Option<(LayerId, &mut GameObject)> {
        let layer = self.find_object(root, id)?.0;
        let object = self
            .objects_mut(layer)
            .ok()?
            .iter_mut()
            .find(|o| o.id() == id)?;
        Some((layer, object))
    }

    // -- tri-state machines --

    /// Handles a user click on the visibility control of `id`.
    ///
    /// An `Invisible` or `PartiallyVisible` node comes on: every
    /// non-`Visible` node on the upward path is set `Visible`, and for
    /// each node set this way its `PartiallyVisible` descendants are
    /// promoted to `Visible`, never entering a subtree whose root is
    /// authoritatively `Invisible`.
    ///
    /// A `Visible` node goes off: the node becomes `Invisible` and its
    /// `Visible` descendants fall to `PartiallyVisible`, skipping
    /// authoritatively `Invisible` subtrees entirely.
    pub fn toggle_visibility(&mut self, id: LayerId) -> Result<(), TreeError> {
        match self.require(id)?.visibility {
            Visibility::Visible => {
                self.require_mut(id)?.visibility = Visibility::Invisible;
                for child in self.children(id).to_vec() {
                    self.demote_visible(child);
                }
            }
            Visibility::Invisible | Visibility::PartiallyVisible => {
                let mut cursor = Some(id);
                while let Some(current) = cursor {
                    if self.require(current)?.visibility == Visibility::Visible {
                        break;
                    }
                    self.require_mut(current)?.visibility = Visibility::Visible;
                    for child in self.children(current).to_vec() {
                        self.promote_partially_visible(child);
                    }
                    cursor = self.require(current)?.parent;
                }
            }
        }
        Ok(())
    }

    fn demote_visible(&mut self, id: LayerId) {
        let Some(node) = self.node_mut(id) else { return };
        if node.visibility != Visibility::Visible {
            // An Invisible child keeps its own state and shields its
            // subtree; a Partial child cannot occur under a Visible path.
            return;
        }
        node.visibility = Visibility::PartiallyVisible;
        for child in self.children(id).to_vec() {
            self.demote_visible(child);
        }
    }

    fn promote_partially_visible(&mut self, id: LayerId) {
        let Some(node) = self.node_mut(id) else { return };
        if node.visibility != Visibility::PartiallyVisible {
            return;
        }
        node.visibility = Visibility::Visible;
        for child in self.children(id).to_vec() {
            self.promote_partially_visible(child);
        }
    }

    /// Handles a user click on the lock control of `id`.
    ///
    /// An `Unlocked` or `PartiallyUnlocked` node locks: the node becomes
    /// authoritatively `Locked` and its `Unlocked` descendants fall to
    /// `PartiallyUnlocked`, stopping at descendants that are themselves
    /// `Locked`.
    ///
    /// A `Locked` node unlocks: if any ancestor is `Locked` the node can
    /// only fall to `PartiallyUnlocked`; otherwise it becomes `Unlocked`
    /// and its `PartiallyUnlocked` descendants are released to
    /// `Unlocked`, stopping at `Locked` descendants.
    pub fn toggle_lock(&mut self, id: LayerId) -> Result<(), TreeError> {
        match self.require(id)?.lock {
            LockState::Unlocked | LockState::PartiallyUnlocked => {
                self.require_mut(id)?.lock = LockState::Locked;
                for child in self.children(id).to_vec() {
                    self.demote_unlocked(child);
                }
            }
            LockState::Locked => {
                if self.has_locked_ancestor(id) {
                    self.require_mut(id)?.lock = LockState::PartiallyUnlocked;
                } else {
                    self.require_mut(id)?.lock = LockState::Unlocked;
                    for child in self.children(id).to_vec() {
                        self.release_partially_unlocked(child);
                    }
                }
            }
        }
        Ok(())
    }

    fn has_locked_ancestor(&self, id: LayerId) -> bool {
        let mut cursor = self.node(id).and_then(|n| n.parent);
        while let Some(current) = cursor {
            let Some(node) = self.node(current) else { return false };
            if node.lock == LockState::Locked {
                return true;
            }
            cursor = node.parent;
        }
        false
    }

    fn demote_unlocked(&mut self, id: LayerId) {
        let Some(node) = self.node_mut(id) else { return };
        if node.lock != LockState::Unlocked {
            // A Locked child forces its own subtree already.
            return;
        }
        node.lock = LockState::PartiallyUnlocked;
        for child in self.children(id).to_vec() {
            self.demote_unlocked(child);
        }
    }

    fn release_partially_unlocked(&mut self, id: LayerId) {
        let Some(node) = self.node_mut(id) else { return };
        if node.lock != LockState::PartiallyUnlocked {
            return;
        }
        node.lock = LockState::Unlocked;
        for child in self.children(id).to_vec() {
            self.release_partially_unlocked(child);
        }
    }

    /// Restores raw states during deserialization; not a user toggle.
    pub(crate) fn set_states(&mut self, id: LayerId, visibility: Visibility, lock: LockState) {
        if let Some(node) = self.node_mut(id) {
            node.visibility = visibility;
            node.lock = lock;
        }
    }

    /// Whether the whole path from the root to `id`, inclusive, is
    /// `Visible` and `Unlocked` — the eligibility rule for hit-testing
    /// and "active object" queries.
    pub fn is_path_enabled(&self, id: LayerId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let Some(node) = self.node(current) else { return false };
            if !node.is_enabling() {
                return false;
            }
            cursor = node.parent;
        }
        true
    }
}

impl Default for LayerTree {
    fn default() -> Self {
        Self::new()
    }
}

//! The document core type.

use std::fmt;

use crate::layer::{LayerId, LayerTree, ObjectHit, TreeError};
use crate::math::{Rect, Vec2};
use crate::object::{GameObject, LabelData, ObjectId, ObjectKind, SpriteData};
use crate::resource::{ResourceRef, ResourceResolver};

use super::naming::NameScope;

/// Errors from rejected document operations.
///
/// A rejected operation leaves the document untouched; the caller is
/// told why and can surface it to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// A structural tree operation failed.
    Tree(TreeError),
    /// The root group cannot be removed, moved, or duplicated.
    RootImmutable,
    /// The active layer must be a leaf layer.
    ActiveMustBeLayer,
    /// The last remaining leaf layer cannot be removed.
    MustKeepOneLayer,
    /// The object id does not resolve in this document.
    UnknownObject,
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tree(e) => write!(f, "{e}"),
            Self::RootImmutable => write!(f, "the root group cannot be modified"),
            Self::ActiveMustBeLayer => write!(f, "the active layer must be a leaf layer"),
            Self::MustKeepOneLayer => write!(f, "a document must keep at least one layer"),
            Self::UnknownObject => write!(f, "unknown object id"),
        }
    }
}

impl std::error::Error for DocumentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Tree(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TreeError> for DocumentError {
    fn from(e: TreeError) -> Self {
        Self::Tree(e)
    }
}

/// One open scene/level document.
#[derive(Debug)]
pub struct Document {
    pub(crate) tree: LayerTree,
    pub(crate) root: LayerId,
    pub(crate) active_layer: LayerId,
    /// Post-incremented on every object creation; never reused.
    pub(crate) next_object_id: u64,
    pub(crate) layer_counter: u64,
    pub(crate) group_counter: u64,
    pub(crate) sprite_counter: u64,
    pub(crate) label_counter: u64,
    pub(crate) horizontal_guides: Vec<f32>,
    pub(crate) vertical_guides: Vec<f32>,
}

impl Document {
    /// Creates an empty document: a root group holding one default
    /// layer, which becomes the active layer.
    pub fn new() -> Self {
        let mut tree = LayerTree::new();
        let root = tree.new_group("Root");
        let layer = tree.new_layer("Layer 1");
        // Root is a fresh group; this attach cannot fail.
        tree.attach(layer, root, 0).expect("attach to fresh root");
        Self {
            tree,
            root,
            active_layer: layer,
            next_object_id: 0,
            layer_counter: 1,
            group_counter: 0,
            sprite_counter: 0,
            label_counter: 0,
            horizontal_guides: Vec::new(),
            vertical_guides: Vec::new(),
        }
    }

    // -- accessors --

    pub fn tree(&self) -> &LayerTree {
        &self.tree
    }

    pub fn root(&self) -> LayerId {
        self.root
    }

    pub fn active_layer(&self) -> LayerId {
        self.active_layer
    }

    /// Points object insertion at a different leaf layer.
    pub fn set_active_layer(&mut self, id: LayerId) -> Result<(), DocumentError> {
        let node = self.tree.node(id).ok_or(TreeError::UnknownLayer)?;
        if !node.is_layer() {
            return Err(DocumentError::ActiveMustBeLayer);
        }
        self.active_layer = id;
        Ok(())
    }

    /// The configured nesting limit of the layer tree.
    pub fn max_depth(&self) -> usize {
        self.tree.max_depth()
    }

    pub fn set_max_depth(&mut self, max_depth: usize) {
        self.tree.set_max_depth(max_depth);
    }

    // -- id and name generation --

    /// Returns the next document-unique object id, post-incrementing the
    /// counter. Ids are never reused, even after deletion.
    pub fn generate_object_id(&mut self) -> ObjectId {
        let id = ObjectId(self.next_object_id);
        self.next_object_id += 1;
        id
    }

    fn next_layer_name(&mut self) -> String {
        self.layer_counter += 1;
        format!("Layer {}", self.layer_counter)
    }

    fn next_group_name(&mut self) -> String {
        self.group_counter += 1;
        format!("Group {}", self.group_counter)
    }

    fn next_sprite_name(&mut self) -> String {
        self.sprite_counter += 1;
        format!("Sprite {}", self.sprite_counter)
    }

    fn next_label_name(&mut self) -> String {
        self.label_counter += 1;
        format!("Label {}", self.label_counter)
    }

    // -- layer structure --

    /// Creates an empty layer under `parent` (default: the root) at
    /// `index` (default: the front).
    pub fn create_layer(
        &mut self,
        parent: Option<LayerId>,
        index: usize,
    ) -> Result<LayerId, DocumentError> {
        let parent = parent.unwrap_or(self.root);
        let name = self.next_layer_name();
        let id = self.tree.new_layer(name);
        if let Err(e) = self.tree.attach(id, parent, index) {
            self.tree.remove(id).ok();
            return Err(e.into());
        }
        log::debug!("created layer {id} under {parent}");
        Ok(id)
    }

    /// Creates an empty layer group under `parent` (default: the root)
    /// at `index` (default: the front).
    pub fn create_group(
        &mut self,
        parent: Option<LayerId>,
        index: usize,
    ) -> Result<LayerId, DocumentError> {
        let parent = parent.unwrap_or(self.root);
        let name = self.next_group_name();
        let id = self.tree.new_group(name);
        if let Err(e) = self.tree.attach(id, parent, index) {
            self.tree.remove(id).ok();
            return Err(e.into());
        }
        log::debug!("created group {id} under {parent}");
        Ok(id)
    }

    /// Removes a layer or group and its whole subtree.
    ///
    /// Rejected for the root and when it would leave the document
    /// without any leaf layer. If the active layer was inside the
    /// removed subtree, the first remaining leaf layer becomes active.
    pub fn remove_layer(&mut self, id: LayerId) -> Result<(), DocumentError> {
        if id == self.root {
            return Err(DocumentError::RootImmutable);
        }
        if !self.tree.contains(id) {
            return Err(TreeError::UnknownLayer.into());
        }
        let doomed = self.tree.descendants(id);
        let survivor = self
            .tree
            .descendants(self.root)
            .into_iter()
            .find(|n| !doomed.contains(n) && self.tree.node(*n).is_some_and(|l| l.is_layer()));
        let Some(survivor) = survivor else {
            return Err(DocumentError::MustKeepOneLayer);
        };
        self.tree.remove(id)?;
        if !self.tree.contains(self.active_layer) {
            self.active_layer = survivor;
        }
        log::debug!("removed layer {id}");
        Ok(())
    }

    /// Moves a layer or group to a new parent and index.
    pub fn move_layer(
        &mut self,
        id: LayerId,
        parent: LayerId,
        index: usize,
    ) -> Result<(), DocumentError> {
        if id == self.root {
            return Err(DocumentError::RootImmutable);
        }
        self.tree.move_node(id, parent, index)?;
        Ok(())
    }

    /// Duplicates a layer or group subtree in place: the clone lands at
    /// the source's index (in front of it) under the same parent, with
    /// freshly generated, document-unique object ids and names.
    pub fn duplicate_layer(&mut self, id: LayerId) -> Result<LayerId, DocumentError> {
        if id == self.root {
            return Err(DocumentError::RootImmutable);
        }
        let node = self.tree.node(id).ok_or(TreeError::UnknownLayer)?;
        let parent = node.parent().ok_or(TreeError::UnknownLayer)?;
        let index = self.tree.index_of(id).unwrap_or(0);

        let clone = self.tree.clone_subtree(id)?;
        if let Err(e) = self.tree.attach(clone, parent, index) {
            self.tree.remove(clone).ok();
            return Err(e.into());
        }
        self.reidentify_subtree(clone);
        log::debug!("duplicated layer {id} as {clone}");
        Ok(clone)
    }

    /// Gives every node and object in a freshly cloned subtree a new
    /// name (and objects a new id).
    fn reidentify_subtree(&mut self, id: LayerId) {
        for node_id in self.tree.descendants(id) {
            let old_name = self.tree.node(node_id).map(|n| n.name.clone());
            if let Some(old_name) = old_name {
                let fresh = self.generate_duplicate_name(&old_name, NameScope::Layers);
                if let Some(node) = self.tree.node_mut(node_id) {
                    node.name = fresh;
                }
            }
            let object_ids: Vec<ObjectId> = match self.tree.objects(node_id) {
                Ok(objects) => objects.iter().map(|o| o.id()).collect(),
                Err(_) => continue,
            };
            for old_id in object_ids {
                let Some(old_name) = self
                    .tree
                    .find_object(node_id, old_id)
                    .map(|(_, o)| o.name().to_string())
                else {
                    continue;
                };
                let fresh_id = self.generate_object_id();
                let fresh_name = self.generate_duplicate_name(&old_name, NameScope::Objects);
                if let Some((_, object)) = self.tree.find_object_mut(node_id, old_id) {
                    *object = object.duplicate(fresh_name, fresh_id);
                }
            }
        }
    }

    // -- objects --

    /// Creates a sprite at the front of the active layer.
    pub fn create_sprite(
        &mut self,
        position: Vec2,
        size: Vec2,
        texture: &str,
        resolver: &dyn ResourceResolver,
    ) -> Result<ObjectId, DocumentError> {
        let id = self.generate_object_id();
        let name = self.next_sprite_name();
        let sprite = GameObject::new(
            name,
            id,
            position,
            size,
            ObjectKind::Sprite(SpriteData::new(ResourceRef::resolve(texture, resolver))),
        );
        self.tree.insert_object(self.active_layer, 0, sprite)?;
        log::debug!("created sprite {id} on {}", self.active_layer);
        Ok(id)
    }

    /// Creates a text label at the front of the active layer.
    pub fn create_label(
        &mut self,
        position: Vec2,
        size: Vec2,
        text: &str,
        font: &str,
        font_size: f32,
        resolver: &dyn ResourceResolver,
    ) -> Result<ObjectId, DocumentError> {
        let id = self.generate_object_id();
        let name = self.next_label_name();
        let label = GameObject::new(
            name,
            id,
            position,
            size,
            ObjectKind::Label(LabelData::new(
                text,
                ResourceRef::resolve(font, resolver),
                font_size,
            )),
        );
        self.tree.insert_object(self.active_layer, 0, label)?;
        log::debug!("created label {id} on {}", self.active_layer);
        Ok(id)
    }

    /// Duplicates an object in place: the clone lands at the source's
    /// index (in front of it) with a fresh id and name.
    pub fn duplicate_object(&mut self, id: ObjectId) -> Result<ObjectId, DocumentError> {
        let (layer, source) = self
            .tree
            .find_object(self.root, id)
            .map(|(layer, object)| (layer, object.clone()))
            .ok_or(DocumentError::UnknownObject)?;
        let name = self.generate_duplicate_name(source.name(), NameScope::Objects);
        let fresh_id = self.generate_object_id();
        let clone = source.duplicate(name, fresh_id);
        let index = self.tree.index_of_object(layer, id)?;
        self.tree.insert_object(layer, index, clone)?;
        log::debug!("duplicated object {id} as {fresh_id}");
        Ok(fresh_id)
    }

    /// Removes an object by id.
    pub fn remove_object(&mut self, id: ObjectId) -> Result<GameObject, DocumentError> {
        let (layer, _) = self
            .tree
            .find_object(self.root, id)
            .ok_or(DocumentError::UnknownObject)?;
        Ok(self.tree.remove_object(layer, id)?)
    }

    pub fn object(&self, id: ObjectId) -> Option<&GameObject> {
        self.tree.find_object(self.root, id).map(|(_, o)| o)
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut GameObject> {
        self.tree.find_object_mut(self.root, id).map(|(_, o)| o)
    }

    // -- document-wide queries --

    pub fn find_object_by_point(&self, point: Vec2) -> Option<ObjectHit> {
        self.tree.find_object_by_point(self.root, point)
    }

    pub fn find_objects_by_rect(&self, rect: &Rect) -> Vec<ObjectHit> {
        self.tree.find_objects_by_rect(self.root, rect)
    }

    pub fn find_object_by_name(&self, name: &str) -> Option<ObjectHit> {
        self.tree.find_object_by_name(self.root, name)
    }

    pub fn active_objects(&self) -> Vec<ObjectHit> {
        self.tree.active_objects(self.root)
    }

    pub fn bounding_rect(&self) -> Option<Rect> {
        self.tree.bounding_rect(self.root)
    }

    /// Re-resolves every matching resource reference in the document.
    pub fn change_texture(
        &mut self,
        path: &str,
        resolver: &dyn ResourceResolver,
    ) -> Vec<ObjectId> {
        let root = self.root;
        self.tree.change_texture(root, path, resolver)
    }

    pub fn missed_files(&self) -> Vec<String> {
        self.tree.missed_files(self.root)
    }

    /// Tree mutations that need direct access (tri-state toggles,
    /// expansion, renames).
    pub fn tree_mut(&mut self) -> &mut LayerTree {
        &mut self.tree
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

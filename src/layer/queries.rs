//! Aggregate queries over layer subtrees.
//!
//! All traversals are depth-first, front-to-back (child 0 first, objects
//! in front-to-back order), matching draw order so that "first hit" is
//! the topmost object under the cursor. The enabling rule short-circuits
//! recursion: a layer contributes its objects, and a group recurses, only
//! while its own state is Visible + Unlocked.

use crate::math::{Rect, Vec2};
use crate::object::{GameObject, ObjectId};
use crate::resource::ResourceResolver;

use super::tree::{LayerId, LayerKind, LayerTree};

/// An object found by a spatial query, addressed by its owning layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectHit {
    pub layer: LayerId,
    pub object: ObjectId,
}

impl LayerTree {
    /// Union of the bounding rects of every object in the subtree.
    /// `None` when the subtree holds no objects. Visibility and lock do
    /// not filter here; bounds are a structural property.
    pub fn bounding_rect(&self, id: LayerId) -> Option<Rect> {
        let mut bounds: Option<Rect> = None;
        for node_id in self.descendants(id) {
            if let Ok(objects) = self.objects(node_id) {
                for object in objects {
                    let rect = object.bounding_rect();
                    bounds = Some(match bounds {
                        Some(b) => b.union(&rect),
                        None => rect,
                    });
                }
            }
        }
        bounds
    }

    /// Objects eligible for editing: reachable through a path where every
    /// node is Visible and Unlocked, front-to-back.
    pub fn active_objects(&self, id: LayerId) -> Vec<ObjectHit> {
        let mut out = Vec::new();
        self.collect_active(id, &mut out);
        out
    }

    fn collect_active(&self, id: LayerId, out: &mut Vec<ObjectHit>) {
        let Some(node) = self.node(id) else { return };
        if !node.is_enabling() {
            return;
        }
        match node.kind() {
            LayerKind::Layer { objects } => {
                out.extend(objects.iter().map(|o| ObjectHit { layer: id, object: o.id() }));
            }
            LayerKind::Group { children } => {
                for &child in children {
                    self.collect_active(child, out);
                }
            }
        }
    }

    /// The topmost active object containing `point`, if any.
    pub fn find_object_by_point(&self, id: LayerId, point: Vec2) -> Option<ObjectHit> {
        self.active_objects(id)
            .into_iter()
            .find(|hit| self.hit_object(*hit).is_some_and(|o| o.contains_point(point)))
    }

    /// All active objects fully enclosed by `rect`, front-to-back.
    pub fn find_objects_by_rect(&self, id: LayerId, rect: &Rect) -> Vec<ObjectHit> {
        self.active_objects(id)
            .into_iter()
            .filter(|hit| {
                self.hit_object(*hit).is_some_and(|o| o.contained_by_rect(rect))
            })
            .collect()
    }

    /// The first object in the subtree with the given name, searched in
    /// draw order regardless of visibility or lock.
    pub fn find_object_by_name(&self, id: LayerId, name: &str) -> Option<ObjectHit> {
        for node_id in self.descendants(id) {
            if let Ok(objects) = self.objects(node_id)
                && let Some(object) = objects.iter().find(|o| o.name() == name)
            {
                return Some(ObjectHit { layer: node_id, object: object.id() });
            }
        }
        None
    }

    /// Resolves a query hit back to its object.
    pub fn hit_object(&self, hit: ObjectHit) -> Option<&GameObject> {
        self.objects(hit.layer)
            .ok()?
            .iter()
            .find(|o| o.id() == hit.object)
    }

    /// Returns the subset of `ids` reordered to match the subtree's draw
    /// order. Ids not present in the subtree are dropped. Used to keep
    /// multi-selection lists canonically ordered.
    pub fn sort_objects(&self, id: LayerId, ids: &[ObjectId]) -> Vec<ObjectId> {
        let mut out = Vec::with_capacity(ids.len());
        for node_id in self.descendants(id) {
            if let Ok(objects) = self.objects(node_id) {
                for object in objects {
                    if ids.contains(&object.id()) {
                        out.push(object.id());
                    }
                }
            }
        }
        out
    }

    /// Re-resolves every resource reference in the subtree whose filename
    /// equals `path`, returning the ids of affected objects. The host
    /// uses the list to invalidate caches and mark the document dirty.
    pub fn change_texture(
        &mut self,
        id: LayerId,
        path: &str,
        resolver: &dyn ResourceResolver,
    ) -> Vec<ObjectId> {
        let mut affected = Vec::new();
        for node_id in self.descendants(id) {
            if let Ok(objects) = self.objects_mut(node_id) {
                for object in objects {
                    if object.replace_resource(path, resolver) {
                        affected.push(object.id());
                    }
                }
            }
        }
        affected
    }

    /// Filenames of every resource in the subtree currently resolved to
    /// a fallback, de-duplicated in first-seen order.
    pub fn missed_files(&self, id: LayerId) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for node_id in self.descendants(id) {
            if let Ok(objects) = self.objects(node_id) {
                for object in objects {
                    for resource in object.resource_refs() {
                        if resource.is_missing() && !out.iter().any(|p| p == &resource.path) {
                            out.push(resource.path.clone());
                        }
                    }
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{LabelData, ObjectKind, SpriteData};
    use crate::resource::{ResourceRef, ResourceStatus};

    fn sprite_at(id: u64, pos: Vec2, texture: &str, status: ResourceStatus) -> GameObject {
        GameObject::new(
            format!("Sprite {id}"),
            ObjectId(id),
            pos,
            Vec2::new(10.0, 10.0),
            ObjectKind::Sprite(SpriteData::new(ResourceRef {
                path: texture.into(),
                status,
            })),
        )
    }

    fn label_at(id: u64, pos: Vec2, font: &str, status: ResourceStatus) -> GameObject {
        GameObject::new(
            format!("Label {id}"),
            ObjectId(id),
            pos,
            Vec2::new(40.0, 12.0),
            ObjectKind::Label(LabelData::new(
                "text",
                ResourceRef { path: font.into(), status },
                12.0,
            )),
        )
    }

    /// root ── front layer, back group ── back layer
    fn sample_tree() -> (LayerTree, LayerId, LayerId, LayerId) {
        let mut tree = LayerTree::new();
        let root = tree.new_group("Root");
        let front = tree.new_layer("Front");
        let group = tree.new_group("Group");
        let back = tree.new_layer("Back");
        tree.attach(front, root, 0).unwrap();
        tree.attach(group, root, 1).unwrap();
        tree.attach(back, group, 0).unwrap();
        (tree, root, front, back)
    }

    #[test]
    fn bounding_rect_is_union_of_objects() {
        let (mut tree, root, front, back) = sample_tree();
        assert!(tree.bounding_rect(root).is_none());
        tree.insert_object(front, 0, sprite_at(1, Vec2::new(0.0, 0.0), "a.png", ResourceStatus::Resolved))
            .unwrap();
        tree.insert_object(back, 0, sprite_at(2, Vec2::new(50.0, 20.0), "a.png", ResourceStatus::Resolved))
            .unwrap();
        assert_eq!(tree.bounding_rect(root), Some(Rect::new(0.0, 0.0, 60.0, 30.0)));
    }

    #[test]
    fn active_objects_respect_enabling_path() {
        let (mut tree, root, front, back) = sample_tree();
        tree.insert_object(front, 0, sprite_at(1, Vec2::zeros(), "a.png", ResourceStatus::Resolved))
            .unwrap();
        tree.insert_object(back, 0, sprite_at(2, Vec2::zeros(), "a.png", ResourceStatus::Resolved))
            .unwrap();
        assert_eq!(tree.active_objects(root).len(), 2);

        // Hiding the group removes only the back layer's objects.
        let group = tree.node(back).unwrap().parent().unwrap();
        tree.toggle_visibility(group).unwrap();
        let active = tree.active_objects(root);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].object, ObjectId(1));

        // Locking the front layer leaves nothing.
        tree.toggle_lock(front).unwrap();
        assert!(tree.active_objects(root).is_empty());
    }

    #[test]
    fn point_hit_returns_topmost() {
        let (mut tree, root, front, back) = sample_tree();
        // Both objects cover (5, 5); the front layer wins.
        tree.insert_object(front, 0, sprite_at(1, Vec2::zeros(), "a.png", ResourceStatus::Resolved))
            .unwrap();
        tree.insert_object(back, 0, sprite_at(2, Vec2::zeros(), "a.png", ResourceStatus::Resolved))
            .unwrap();
        let hit = tree.find_object_by_point(root, Vec2::new(5.0, 5.0)).unwrap();
        assert_eq!(hit.object, ObjectId(1));

        // Within one layer, index 0 is frontmost.
        tree.insert_object(front, 0, sprite_at(3, Vec2::zeros(), "a.png", ResourceStatus::Resolved))
            .unwrap();
        let hit = tree.find_object_by_point(root, Vec2::new(5.0, 5.0)).unwrap();
        assert_eq!(hit.object, ObjectId(3));
    }

    #[test]
    fn rect_query_requires_full_enclosure() {
        let (mut tree, root, front, _back) = sample_tree();
        tree.insert_object(front, 0, sprite_at(1, Vec2::zeros(), "a.png", ResourceStatus::Resolved))
            .unwrap();
        tree.insert_object(front, 1, sprite_at(2, Vec2::new(100.0, 0.0), "a.png", ResourceStatus::Resolved))
            .unwrap();
        let hits = tree.find_objects_by_rect(root, &Rect::new(-1.0, -1.0, 20.0, 20.0));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].object, ObjectId(1));
    }

    #[test]
    fn sort_objects_returns_draw_order_subset() {
        let (mut tree, root, front, back) = sample_tree();
        tree.insert_object(front, 0, sprite_at(1, Vec2::zeros(), "a.png", ResourceStatus::Resolved))
            .unwrap();
        tree.insert_object(front, 1, sprite_at(2, Vec2::zeros(), "a.png", ResourceStatus::Resolved))
            .unwrap();
        tree.insert_object(back, 0, sprite_at(3, Vec2::zeros(), "a.png", ResourceStatus::Resolved))
            .unwrap();
        let sorted = tree.sort_objects(root, &[ObjectId(3), ObjectId(1), ObjectId(9)]);
        assert_eq!(sorted, vec![ObjectId(1), ObjectId(3)]);
    }

    #[test]
    fn change_texture_reports_affected_objects() {
        let (mut tree, root, front, back) = sample_tree();
        tree.insert_object(front, 0, sprite_at(1, Vec2::zeros(), "a.png", ResourceStatus::Missing))
            .unwrap();
        tree.insert_object(back, 0, sprite_at(2, Vec2::zeros(), "b.png", ResourceStatus::Resolved))
            .unwrap();
        let now_there = |_: &str| ResourceStatus::Resolved;
        let affected = tree.change_texture(root, "a.png", &now_there);
        assert_eq!(affected, vec![ObjectId(1)]);
        assert!(tree.missed_files(root).is_empty());
    }

    #[test]
    fn missed_files_dedups_across_objects() {
        let (mut tree, root, front, back) = sample_tree();
        tree.insert_object(front, 0, sprite_at(1, Vec2::zeros(), "gone.png", ResourceStatus::Missing))
            .unwrap();
        tree.insert_object(back, 0, sprite_at(2, Vec2::zeros(), "gone.png", ResourceStatus::Missing))
            .unwrap();
        tree.insert_object(back, 1, label_at(3, Vec2::zeros(), "gone.ttf", ResourceStatus::Missing))
            .unwrap();
        assert_eq!(tree.missed_files(root), vec!["gone.png", "gone.ttf"]);
    }

    #[test]
    fn find_object_by_name_ignores_states() {
        let (mut tree, root, front, _back) = sample_tree();
        tree.insert_object(front, 0, sprite_at(1, Vec2::zeros(), "a.png", ResourceStatus::Resolved))
            .unwrap();
        tree.toggle_visibility(front).unwrap();
        let hit = tree.find_object_by_name(root, "Sprite 1").unwrap();
        assert_eq!(hit.object, ObjectId(1));
        assert!(tree.find_object_by_name(root, "nope").is_none());
    }
}

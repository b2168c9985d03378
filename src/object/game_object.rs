//! The game object: shared transform state plus a typed payload.

use crate::math::{Rect, Transform2, Vec2, transform_from_position_angle, transform_point};
use crate::resource::{ResourceRef, ResourceResolver};

use super::types::{ObjectId, ObjectKind};

/// A positioned, sized, rotated entity owned by a layer.
///
/// `position` is the world-space location of the local origin (top-left
/// corner of the unrotated shape). `size` is sign-bearing: negative
/// components represent flips. `angle` is in degrees, clockwise in
/// y-down screen space.
///
/// The transform, its inverse, the four world-space vertices, and the
/// axis-aligned bounding rect are cached and recomputed eagerly on every
/// mutation of position, size, angle, or rotation center.
#[derive(Debug, Clone, PartialEq)]
pub struct GameObject {
    name: String,
    id: ObjectId,
    position: Vec2,
    size: Vec2,
    angle: f32,
    /// Rotation pivot in local unrotated space. Tracks the same relative
    /// point in the shape across resizes.
    rotation_center: Vec2,
    kind: ObjectKind,

    // Caches, recomputed by `update_geometry`.
    transform: Transform2,
    inverse: Transform2,
    vertices: [Vec2; 4],
    bounding: Rect,
}

impl GameObject {
    /// Creates an object with its rotation center at the shape's middle.
    pub fn new(
        name: impl Into<String>,
        id: ObjectId,
        position: Vec2,
        size: Vec2,
        kind: ObjectKind,
    ) -> Self {
        let mut object = Self {
            name: name.into(),
            id,
            position,
            size,
            angle: 0.0,
            rotation_center: size / 2.0,
            kind,
            transform: Transform2::identity(),
            inverse: Transform2::identity(),
            vertices: [Vec2::zeros(); 4],
            bounding: Rect::default(),
        };
        object.update_geometry();
        object
    }

    /// Rebuilds a fully specified object, e.g. from a snapshot.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        name: String,
        id: ObjectId,
        position: Vec2,
        size: Vec2,
        angle: f32,
        rotation_center: Vec2,
        kind: ObjectKind,
    ) -> Self {
        let mut object = Self::new(name, id, position, size, kind);
        object.angle = angle;
        object.rotation_center = rotation_center;
        object.update_geometry();
        object
    }

    fn update_geometry(&mut self) {
        self.transform = transform_from_position_angle(self.position, self.angle);
        self.inverse = self.transform.inverse();
        self.vertices = [
            self.local_to_world(Vec2::zeros()),
            self.local_to_world(Vec2::new(self.size.x, 0.0)),
            self.local_to_world(self.size),
            self.local_to_world(Vec2::new(0.0, self.size.y)),
        ];
        // Four points, so the envelope always exists.
        self.bounding = Rect::enclosing(&self.vertices).unwrap_or_default();
    }

    // -- identity --

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Deep clone under a new identity, for duplication.
    pub fn duplicate(&self, name: impl Into<String>, id: ObjectId) -> Self {
        let mut clone = self.clone();
        clone.name = name.into();
        clone.id = id;
        clone
    }

    // -- transform state --

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
        self.update_geometry();
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Sets the signed size and rescales the stored rotation center so it
    /// keeps pointing at the same relative spot in the shape. An axis
    /// with zero previous extent keeps its pivot coordinate.
    pub fn set_size(&mut self, size: Vec2) {
        if self.size.x != 0.0 {
            self.rotation_center.x *= size.x / self.size.x;
        }
        if self.size.y != 0.0 {
            self.rotation_center.y *= size.y / self.size.y;
        }
        self.size = size;
        self.update_geometry();
    }

    /// Rotation in degrees, clockwise.
    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn set_angle(&mut self, angle: f32) {
        self.angle = angle;
        self.update_geometry();
    }

    /// The rotation pivot in local unrotated space.
    pub fn rotation_center_local(&self) -> Vec2 {
        self.rotation_center
    }

    /// The rotation pivot in world space.
    pub fn rotation_center(&self) -> Vec2 {
        self.local_to_world(self.rotation_center)
    }

    /// Sets the rotation pivot from a world-space point.
    pub fn set_rotation_center(&mut self, world: Vec2) {
        self.rotation_center = self.world_to_local(world);
        self.update_geometry();
    }

    // -- payload --

    pub fn kind(&self) -> &ObjectKind {
        &self.kind
    }

    /// Payload mutations don't touch geometry, so direct mutable access
    /// is safe.
    pub fn kind_mut(&mut self) -> &mut ObjectKind {
        &mut self.kind
    }

    /// All resource references held by this object.
    pub fn resource_refs(&self) -> Vec<&ResourceRef> {
        self.kind.resource_refs()
    }

    /// Re-resolves every resource reference whose filename equals `path`.
    /// Returns `true` if any reference matched.
    pub fn replace_resource(&mut self, path: &str, resolver: &dyn ResourceResolver) -> bool {
        let mut touched = false;
        for resource in self.kind.resource_refs_mut() {
            if resource.path == path {
                resource.status = resolver.resolve(path);
                touched = true;
            }
        }
        touched
    }

    // -- geometry queries --

    /// Maps a local-space point into world space.
    pub fn local_to_world(&self, p: Vec2) -> Vec2 {
        transform_point(&self.transform, p)
    }

    /// Maps a world-space point into local unrotated space.
    pub fn world_to_local(&self, p: Vec2) -> Vec2 {
        transform_point(&self.inverse, p)
    }

    /// The four world-space corners, starting at the local origin,
    /// winding through (w,0), (w,h), (0,h).
    pub fn vertices(&self) -> [Vec2; 4] {
        self.vertices
    }

    /// Axis-aligned world-space envelope of the four vertices.
    pub fn bounding_rect(&self) -> Rect {
        self.bounding
    }

    /// Point hit test: the query point is mapped into local space and
    /// tested against `(0, 0, |w|, |h|)`.
    pub fn contains_point(&self, world: Vec2) -> bool {
        let local = self.world_to_local(world);
        Rect::new(0.0, 0.0, self.size.x.abs(), self.size.y.abs()).contains_point(local)
    }

    /// Marquee test: all four world vertices must lie inside `rect`, so
    /// rotated objects are only selected when fully enclosed.
    pub fn contained_by_rect(&self, rect: &Rect) -> bool {
        self.vertices.iter().all(|v| rect.contains_point(*v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::types::SpriteData;
    use crate::resource::ResourceStatus;

    fn sprite(position: Vec2, size: Vec2) -> GameObject {
        let texture = ResourceRef {
            path: "a.png".into(),
            status: ResourceStatus::Resolved,
        };
        GameObject::new(
            "Sprite 1",
            ObjectId(1),
            position,
            size,
            ObjectKind::Sprite(SpriteData::new(texture)),
        )
    }

    #[test]
    fn unrotated_bounding_rect_matches_position_and_size() {
        let o = sprite(Vec2::new(10.0, 20.0), Vec2::new(30.0, 40.0));
        assert_eq!(o.bounding_rect(), Rect::new(10.0, 20.0, 30.0, 40.0));
    }

    #[test]
    fn negative_size_flips_bounding_rect() {
        let o = sprite(Vec2::new(10.0, 20.0), Vec2::new(-30.0, 40.0));
        assert_eq!(o.bounding_rect(), Rect::new(-20.0, 20.0, 30.0, 40.0));
    }

    #[test]
    fn world_local_round_trip_over_sizes_and_angles() {
        for &size in &[Vec2::new(20.0, 10.0), Vec2::new(-20.0, 10.0), Vec2::new(-5.0, -7.0)] {
            for angle in [0.0, 33.0, 90.0, 181.5, 270.0, 359.0] {
                let mut o = sprite(Vec2::new(3.0, 4.0), size);
                o.set_angle(angle);
                let p = Vec2::new(12.3, -4.5);
                let q = o.world_to_local(o.local_to_world(p));
                assert!((q - p).norm() < 1e-3, "size {size:?} angle {angle}");
            }
        }
    }

    #[test]
    fn contains_point_respects_rotation() {
        let mut o = sprite(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        assert!(o.contains_point(Vec2::new(9.0, 9.0)));
        o.set_angle(45.0);
        // The unrotated far corner is outside the rotated shape.
        assert!(!o.contains_point(Vec2::new(9.0, 9.0)));
        // A point along the rotated diagonal stays inside.
        assert!(o.contains_point(o.local_to_world(Vec2::new(5.0, 5.0))));
    }

    #[test]
    fn contains_point_uses_absolute_size() {
        let o = sprite(Vec2::new(0.0, 0.0), Vec2::new(-10.0, 10.0));
        // Hit region is the unsigned local rect, not the mirrored span.
        assert!(o.contains_point(Vec2::new(5.0, 5.0)));
    }

    #[test]
    fn marquee_requires_full_enclosure() {
        let mut o = sprite(Vec2::new(10.0, 10.0), Vec2::new(10.0, 10.0));
        o.set_angle(30.0);
        assert!(o.contained_by_rect(&Rect::new(-10.0, -10.0, 50.0, 50.0)));
        assert!(!o.contained_by_rect(&Rect::new(10.0, 10.0, 10.0, 10.0)));
    }

    #[test]
    fn rotation_center_tracks_resize() {
        let mut o = sprite(Vec2::new(0.0, 0.0), Vec2::new(10.0, 20.0));
        assert_eq!(o.rotation_center_local(), Vec2::new(5.0, 10.0));
        o.set_size(Vec2::new(20.0, 10.0));
        // Pivot stays at the relative middle of the shape.
        assert_eq!(o.rotation_center_local(), Vec2::new(10.0, 5.0));
    }

    #[test]
    fn rotation_center_world_round_trip() {
        let mut o = sprite(Vec2::new(100.0, 50.0), Vec2::new(10.0, 10.0));
        o.set_angle(60.0);
        let pivot = Vec2::new(103.0, 52.0);
        o.set_rotation_center(pivot);
        assert!((o.rotation_center() - pivot).norm() < 1e-3);
    }

    #[test]
    fn resize_with_zero_axis_keeps_pivot_coordinate() {
        let mut o = sprite(Vec2::zeros(), Vec2::new(0.0, 10.0));
        let pivot = o.rotation_center_local();
        o.set_size(Vec2::new(8.0, 10.0));
        assert_eq!(o.rotation_center_local().x, pivot.x);
    }

    #[test]
    fn duplicate_gets_new_identity_same_geometry() {
        let mut o = sprite(Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0));
        o.set_angle(15.0);
        let copy = o.duplicate("Sprite 1 copy", ObjectId(2));
        assert_eq!(copy.name(), "Sprite 1 copy");
        assert_eq!(copy.id(), ObjectId(2));
        assert_eq!(copy.position(), o.position());
        assert_eq!(copy.bounding_rect(), o.bounding_rect());
    }

    #[test]
    fn replace_resource_matches_by_path() {
        let mut o = sprite(Vec2::zeros(), Vec2::new(1.0, 1.0));
        let gone = |_: &str| ResourceStatus::Missing;
        assert!(o.replace_resource("a.png", &gone));
        assert!(!o.replace_resource("other.png", &gone));
        assert!(o.resource_refs()[0].is_missing());
    }
}

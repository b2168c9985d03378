//! 2D math type aliases and helpers.
//!
//! World space follows screen conventions: the y axis points down and
//! positive rotation angles turn clockwise. Angles are stored in degrees
//! throughout the document model; conversion to radians happens only at
//! the transform boundary.

pub use nalgebra;

/// 2D vector (f32).
pub type Vec2 = nalgebra::Vector2<f32>;

/// 2D rigid transform: rotation followed by translation (f32).
pub type Transform2 = nalgebra::Isometry2<f32>;

/// Build a transform `Translate(position) ∘ Rotate(angle)`.
///
/// `angle_deg` is in degrees, clockwise in y-down screen space. The
/// rotation is about the local origin; the translation is applied after.
pub fn transform_from_position_angle(position: Vec2, angle_deg: f32) -> Transform2 {
    Transform2::new(position, angle_deg.to_radians())
}

/// Apply a transform to a point expressed as a [`Vec2`].
pub fn transform_point(t: &Transform2, p: Vec2) -> Vec2 {
    (t * nalgebra::Point2::from(p)).coords
}

/// An axis-aligned rectangle.
///
/// `width`/`height` are always non-negative; use [`Rect::from_points`]
/// to build a rect from arbitrary corner points.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Creates a rect from origin and extent. Negative extents are
    /// normalized so the stored origin is the top-left corner.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        let (x, width) = if width < 0.0 { (x + width, -width) } else { (x, width) };
        let (y, height) = if height < 0.0 { (y + height, -height) } else { (y, height) };
        Self { x, y, width, height }
    }

    /// The axis-aligned envelope of two corner points.
    pub fn from_points(a: Vec2, b: Vec2) -> Self {
        Self::new(a.x.min(b.x), a.y.min(b.y), (a.x - b.x).abs(), (a.y - b.y).abs())
    }

    /// The axis-aligned envelope of a point set. Returns `None` for an
    /// empty slice.
    pub fn enclosing(points: &[Vec2]) -> Option<Self> {
        let first = points.first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(Self::new(min_x, min_y, max_x - min_x, max_y - min_y))
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn top_left(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn bottom_right(&self) -> Vec2 {
        Vec2::new(self.right(), self.bottom())
    }

    /// Whether the point lies inside the rect (edges inclusive).
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.top() && p.y <= self.bottom()
    }

    /// Whether `other` lies entirely inside this rect (edges inclusive).
    pub fn contains_rect(&self, other: &Rect) -> bool {
        self.contains_point(other.top_left()) && self.contains_point(other.bottom_right())
    }

    /// The smallest rect covering both rects.
    pub fn union(&self, other: &Rect) -> Rect {
        let left = self.left().min(other.left());
        let top = self.top().min(other.top());
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(left, top, right - left, bottom - top)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_normalizes_negative_extent() {
        let r = Rect::new(10.0, 10.0, -4.0, -2.0);
        assert_eq!(r, Rect::new(6.0, 8.0, 4.0, 2.0));
    }

    #[test]
    fn rect_from_points() {
        let r = Rect::from_points(Vec2::new(5.0, 1.0), Vec2::new(1.0, 3.0));
        assert_eq!(r, Rect::new(1.0, 1.0, 4.0, 2.0));
    }

    #[test]
    fn rect_enclosing_empty() {
        assert!(Rect::enclosing(&[]).is_none());
    }

    #[test]
    fn rect_union() {
        let a = Rect::new(0.0, 0.0, 2.0, 2.0);
        let b = Rect::new(5.0, -1.0, 1.0, 1.0);
        assert_eq!(a.union(&b), Rect::new(0.0, -1.0, 6.0, 3.0));
    }

    #[test]
    fn rect_containment() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains_point(Vec2::new(0.0, 0.0)));
        assert!(r.contains_point(Vec2::new(10.0, 10.0)));
        assert!(!r.contains_point(Vec2::new(10.1, 5.0)));
        assert!(r.contains_rect(&Rect::new(1.0, 1.0, 5.0, 5.0)));
        assert!(!r.contains_rect(&Rect::new(7.0, 7.0, 5.0, 5.0)));
    }

    #[test]
    fn transform_round_trip() {
        let t = transform_from_position_angle(Vec2::new(3.0, -2.0), 37.0);
        let p = Vec2::new(11.0, 4.5);
        let q = transform_point(&t.inverse(), transform_point(&t, p));
        assert!((q - p).norm() < 1e-4);
    }

    #[test]
    fn rotation_is_clockwise_in_screen_space() {
        // 90° clockwise with y down maps +x onto +y.
        let t = transform_from_position_angle(Vec2::zeros(), 90.0);
        let p = transform_point(&t, Vec2::new(1.0, 0.0));
        assert!((p.x - 0.0).abs() < 1e-6);
        assert!((p.y - 1.0).abs() < 1e-6);
    }
}

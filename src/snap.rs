//! Edge and guide snapping for interactive transforms.
//!
//! Snapping works per axis: a candidate coordinate is tested against
//! the left/center/right (or top/center/bottom) of every active
//! object's bounding rect, then against the document's guide lines, and
//! the closest candidate within the threshold wins. For each object the
//! three tests run in a fixed order and a candidate only takes over
//! when it beats the running best strictly and is at least as close as
//! the object's other two candidates, so exact ties resolve to the
//! earlier position in the test order. Existing documents rely on that
//! preference, so it is kept literal.

use crate::document::{Document, GuideAxis};
use crate::math::{Rect, Vec2};
use crate::object::ObjectId;

/// Default snap-in distance in scene units.
pub const DEFAULT_SNAP_THRESHOLD: f32 = 10.0;

/// The visual indicator segment for a snap match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapLine {
    pub start: Vec2,
    pub end: Vec2,
}

/// Running single-axis snap state.
///
/// Starts at the raw coordinate with the threshold as the distance to
/// beat; feeding rects and guides tightens it. Every candidate is
/// measured against the original query coordinate, so traversal order
/// never changes which candidate wins. After the sweep,
/// [`coord`](Self::coord) is the snapped coordinate (unchanged when
/// nothing came within the threshold).
#[derive(Debug, Clone)]
pub struct AxisSnap {
    query: f32,
    coord: f32,
    distance: f32,
    line: Option<SnapLine>,
}

impl AxisSnap {
    pub fn new(coord: f32, threshold: f32) -> Self {
        Self {
            query: coord,
            coord,
            distance: threshold,
            line: None,
        }
    }

    pub fn coord(&self) -> f32 {
        self.coord
    }

    /// Distance to beat; the remaining threshold while unsnapped.
    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn line(&self) -> Option<SnapLine> {
        self.line
    }

    pub fn is_snapped(&self) -> bool {
        self.line.is_some()
    }

    /// Tests the candidate's x against the rect's left, center, and
    /// right, in that order.
    pub fn snap_x_to_rect(&mut self, rect: &Rect) {
        let left = (self.query - rect.left()).abs();
        let center = (self.query - rect.center().x).abs();
        let right = (self.query - rect.right()).abs();

        if left < self.distance && left <= center && left <= right {
            self.take(rect.left(), left, vertical_line(rect.left(), rect));
        }
        if center < self.distance && center <= left && center <= right {
            self.take(rect.center().x, center, vertical_line(rect.center().x, rect));
        }
        if right < self.distance && right <= left && right <= center {
            self.take(rect.right(), right, vertical_line(rect.right(), rect));
        }
    }

    /// Tests the candidate's y against the rect's top, center, and
    /// bottom, in that order.
    pub fn snap_y_to_rect(&mut self, rect: &Rect) {
        let top = (self.query - rect.top()).abs();
        let center = (self.query - rect.center().y).abs();
        let bottom = (self.query - rect.bottom()).abs();

        if top < self.distance && top <= center && top <= bottom {
            self.take(rect.top(), top, horizontal_line(rect.top(), rect));
        }
        if center < self.distance && center <= top && center <= bottom {
            self.take(rect.center().y, center, horizontal_line(rect.center().y, rect));
        }
        if bottom < self.distance && bottom <= top && bottom <= center {
            self.take(rect.bottom(), bottom, horizontal_line(rect.bottom(), rect));
        }
    }

    /// Tests the candidate against a bare guide coordinate. `extent`
    /// bounds the indicator segment.
    pub fn snap_to_guide(&mut self, axis: GuideAxis, position: f32, extent: &Rect) {
        let distance = (self.query - position).abs();
        if distance < self.distance {
            let line = match axis {
                GuideAxis::Vertical => vertical_line(position, extent),
                GuideAxis::Horizontal => horizontal_line(position, extent),
            };
            self.take(position, distance, line);
        }
    }

    fn take(&mut self, coord: f32, distance: f32, line: SnapLine) {
        self.coord = coord;
        self.distance = distance;
        self.line = Some(line);
    }
}

fn vertical_line(x: f32, extent: &Rect) -> SnapLine {
    SnapLine {
        start: Vec2::new(x, extent.top()),
        end: Vec2::new(x, extent.bottom()),
    }
}

fn horizontal_line(y: f32, extent: &Rect) -> SnapLine {
    SnapLine {
        start: Vec2::new(extent.left(), y),
        end: Vec2::new(extent.right(), y),
    }
}

impl Document {
    /// Snaps an x coordinate against all active objects except the
    /// excluded ones (typically the dragged selection), then against
    /// the vertical guides.
    pub fn snap_x(&self, coord: f32, threshold: f32, exclude: &[ObjectId]) -> AxisSnap {
        let mut snap = AxisSnap::new(coord, threshold);
        for hit in self.active_objects() {
            if exclude.contains(&hit.object) {
                continue;
            }
            if let Some(object) = self.tree().hit_object(hit) {
                snap.snap_x_to_rect(&object.bounding_rect());
            }
        }
        let extent = self.guide_extent();
        for &position in self.guides(GuideAxis::Vertical) {
            snap.snap_to_guide(GuideAxis::Vertical, position, &extent);
        }
        snap
    }

    /// Snaps a y coordinate against all active objects except the
    /// excluded ones, then against the horizontal guides.
    pub fn snap_y(&self, coord: f32, threshold: f32, exclude: &[ObjectId]) -> AxisSnap {
        let mut snap = AxisSnap::new(coord, threshold);
        for hit in self.active_objects() {
            if exclude.contains(&hit.object) {
                continue;
            }
            if let Some(object) = self.tree().hit_object(hit) {
                snap.snap_y_to_rect(&object.bounding_rect());
            }
        }
        let extent = self.guide_extent();
        for &position in self.guides(GuideAxis::Horizontal) {
            snap.snap_to_guide(GuideAxis::Horizontal, position, &extent);
        }
        snap
    }

    fn guide_extent(&self) -> Rect {
        self.bounding_rect().unwrap_or_default()
    }
}

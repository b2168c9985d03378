//! Alignment guides: infinite horizontal/vertical lines objects snap to.

use super::Document;

/// Which axis a guide line crosses.
///
/// A horizontal guide is a horizontal line at some `y`; a vertical
/// guide is a vertical line at some `x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuideAxis {
    Horizontal,
    Vertical,
}

impl Document {
    fn guide_list(&self, axis: GuideAxis) -> &Vec<f32> {
        match axis {
            GuideAxis::Horizontal => &self.horizontal_guides,
            GuideAxis::Vertical => &self.vertical_guides,
        }
    }

    fn guide_list_mut(&mut self, axis: GuideAxis) -> &mut Vec<f32> {
        match axis {
            GuideAxis::Horizontal => &mut self.horizontal_guides,
            GuideAxis::Vertical => &mut self.vertical_guides,
        }
    }

    /// Adds a guide and returns its index on the axis.
    pub fn add_guide(&mut self, axis: GuideAxis, coordinate: f32) -> usize {
        let list = self.guide_list_mut(axis);
        list.push(coordinate);
        list.len() - 1
    }

    pub fn guides(&self, axis: GuideAxis) -> &[f32] {
        self.guide_list(axis)
    }

    /// Moves an existing guide. Out-of-range indices are ignored.
    pub fn set_guide(&mut self, axis: GuideAxis, index: usize, coordinate: f32) {
        if let Some(slot) = self.guide_list_mut(axis).get_mut(index) {
            *slot = coordinate;
        }
    }

    /// Removes a guide by index. Out-of-range indices are ignored.
    pub fn remove_guide(&mut self, axis: GuideAxis, index: usize) {
        let list = self.guide_list_mut(axis);
        if index < list.len() {
            list.remove(index);
        }
    }

    pub fn clear_guides(&mut self) {
        self.horizontal_guides.clear();
        self.vertical_guides.clear();
    }

    /// The guide on `axis` nearest to `coordinate`, as `(index, position)`.
    pub fn find_nearest_guide(&self, axis: GuideAxis, coordinate: f32) -> Option<(usize, f32)> {
        let mut best: Option<(usize, f32)> = None;
        for (index, &position) in self.guide_list(axis).iter().enumerate() {
            let distance = (position - coordinate).abs();
            match best {
                Some((_, best_position)) if (best_position - coordinate).abs() <= distance => {}
                _ => best = Some((index, position)),
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axes_are_independent() {
        let mut doc = Document::new();
        doc.add_guide(GuideAxis::Horizontal, 10.0);
        doc.add_guide(GuideAxis::Vertical, 20.0);
        assert_eq!(doc.guides(GuideAxis::Horizontal), &[10.0]);
        assert_eq!(doc.guides(GuideAxis::Vertical), &[20.0]);
    }

    #[test]
    fn set_and_remove_by_index() {
        let mut doc = Document::new();
        doc.add_guide(GuideAxis::Horizontal, 10.0);
        doc.add_guide(GuideAxis::Horizontal, 30.0);
        doc.set_guide(GuideAxis::Horizontal, 1, 40.0);
        assert_eq!(doc.guides(GuideAxis::Horizontal), &[10.0, 40.0]);
        doc.remove_guide(GuideAxis::Horizontal, 0);
        assert_eq!(doc.guides(GuideAxis::Horizontal), &[40.0]);
        // Out of range is a no-op.
        doc.remove_guide(GuideAxis::Horizontal, 5);
        assert_eq!(doc.guides(GuideAxis::Horizontal).len(), 1);
    }

    #[test]
    fn nearest_guide_prefers_first_on_tie() {
        let mut doc = Document::new();
        assert_eq!(doc.find_nearest_guide(GuideAxis::Vertical, 0.0), None);
        doc.add_guide(GuideAxis::Vertical, -5.0);
        doc.add_guide(GuideAxis::Vertical, 5.0);
        doc.add_guide(GuideAxis::Vertical, 6.0);
        assert_eq!(doc.find_nearest_guide(GuideAxis::Vertical, 0.0), Some((0, -5.0)));
        assert_eq!(doc.find_nearest_guide(GuideAxis::Vertical, 5.4), Some((1, 5.0)));
    }
}

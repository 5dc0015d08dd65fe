//! Axis-aligned rectangles used for every hitbox in the simulation.

use glam::Vec2;

/// Axis-aligned rectangle expressed in screen units, anchored at its top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    origin: Vec2,
    size: Vec2,
}

impl Rect {
    /// Creates a rectangle from its top-left corner and dimensions.
    #[must_use]
    pub const fn new(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    /// Creates a rectangle from scalar components.
    #[must_use]
    pub const fn from_xywh(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(Vec2::new(x, y), Vec2::new(width, height))
    }

    /// Creates a rectangle of the provided size centred on `center`.
    #[must_use]
    pub fn centered_on(center: Vec2, size: Vec2) -> Self {
        Self::new(center - size * 0.5, size)
    }

    /// Top-left corner of the rectangle.
    #[must_use]
    pub const fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Width and height of the rectangle.
    #[must_use]
    pub const fn size(&self) -> Vec2 {
        self.size
    }

    /// Smallest x coordinate covered by the rectangle.
    #[must_use]
    pub fn left(&self) -> f32 {
        self.origin.x
    }

    /// Largest x coordinate covered by the rectangle.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.origin.x + self.size.x
    }

    /// Smallest y coordinate covered by the rectangle.
    #[must_use]
    pub fn top(&self) -> f32 {
        self.origin.y
    }

    /// Largest y coordinate covered by the rectangle.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.origin.y + self.size.y
    }

    /// Centre point of the rectangle.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.origin + self.size * 0.5
    }

    /// Reports whether two rectangles overlap.
    ///
    /// Touching edges do not count as an overlap, matching the strict
    /// comparison used by sprite hitboxes.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Returns a copy moved by `delta`.
    #[must_use]
    pub fn translated(&self, delta: Vec2) -> Self {
        Self::new(self.origin + delta, self.size)
    }

    /// Returns a copy grown by `padding` on every side around the same centre.
    #[must_use]
    pub fn inflated(&self, padding: Vec2) -> Self {
        Self::centered_on(self.center(), self.size + padding * 2.0)
    }

    /// Returns a copy scaled by `factor` around the same centre.
    #[must_use]
    pub fn scaled(&self, factor: f32) -> Self {
        Self::centered_on(self.center(), self.size * factor)
    }

    /// Returns a copy moved so that it lies within `bounds` when it fits.
    #[must_use]
    pub fn clamped_within(&self, bounds: &Rect) -> Self {
        let max = (bounds.origin + bounds.size - self.size).max(bounds.origin);
        Self::new(self.origin.clamp(bounds.origin, max), self.size)
    }

    /// Reports whether the rectangle lies completely outside `bounds`.
    #[must_use]
    pub fn is_outside(&self, bounds: &Rect) -> bool {
        self.bottom() < bounds.top()
            || self.top() > bounds.bottom()
            || self.right() < bounds.left()
            || self.left() > bounds.right()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlapping_rectangles_intersect() {
        let first = Rect::from_xywh(0.0, 0.0, 10.0, 10.0);
        let second = Rect::from_xywh(5.0, 5.0, 10.0, 10.0);
        assert!(first.intersects(&second));
        assert!(second.intersects(&first));
    }

    #[test]
    fn touching_edges_do_not_intersect() {
        let first = Rect::from_xywh(0.0, 0.0, 10.0, 10.0);
        let second = Rect::from_xywh(10.0, 0.0, 10.0, 10.0);
        assert!(!first.intersects(&second));
    }

    #[test]
    fn inflation_preserves_center() {
        let rect = Rect::from_xywh(10.0, 20.0, 30.0, 40.0);
        let grown = rect.inflated(Vec2::splat(5.0));
        assert_eq!(grown.center(), rect.center());
        assert_eq!(grown.size(), Vec2::new(40.0, 50.0));
    }

    #[test]
    fn clamping_keeps_rectangle_on_screen() {
        let bounds = Rect::from_xywh(0.0, 0.0, 100.0, 100.0);
        let rect = Rect::from_xywh(95.0, -5.0, 10.0, 10.0);
        let clamped = rect.clamped_within(&bounds);
        assert_eq!(clamped.origin(), Vec2::new(90.0, 0.0));
    }
}

use std::ops::{Add, AddAssign, Mul, Sub};

use serde::{Deserialize, Serialize};

/// A 2D vector in world units.
///
/// The origin is the top-left corner of the arena, `x` grows to the right and
/// `y` grows downward.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Returns the unit vector pointing the same way.
    ///
    /// The zero vector stays zero.
    #[must_use]
    pub fn normalized(self) -> Self {
        let len = self.length();
        if len <= f32::EPSILON {
            Self::ZERO
        } else {
            Self::new(self.x / len, self.y / len)
        }
    }

    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        (other - self).length()
    }
}

impl Add for Vec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

/// Axis-aligned bounding box used for collision tests.
///
/// # Example
///
/// ```
/// use lightplane_engine::{Rect, Vec2};
///
/// let a = Rect::new(0.0, 0.0, 10.0, 10.0);
/// let b = Rect::from_center(Vec2::new(12.0, 5.0), Vec2::new(6.0, 6.0));
/// assert!(a.overlaps(&b));
///
/// // Sharing an edge is not an overlap.
/// let c = Rect::new(10.0, 0.0, 10.0, 10.0);
/// assert!(!a.overlaps(&c));
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    #[must_use]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[must_use]
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self::new(
            center.x - size.x / 2.0,
            center.y - size.y / 2.0,
            size.x,
            size.y,
        )
    }

    #[must_use]
    pub const fn left(&self) -> f32 {
        self.x
    }

    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[must_use]
    pub const fn top(&self) -> f32 {
        self.y
    }

    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    #[must_use]
    pub const fn size(&self) -> Vec2 {
        Vec2::new(self.w, self.h)
    }

    /// Grows the rectangle by `margin` on every side.
    #[must_use]
    pub fn expanded(&self, margin: f32) -> Self {
        Self::new(
            self.x - margin,
            self.y - margin,
            self.w + 2.0 * margin,
            self.h + 2.0 * margin,
        )
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }

    /// Returns `true` if the interiors of both rectangles intersect.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// Returns `true` if this rectangle has left `bounds` entirely.
    #[must_use]
    pub fn is_outside(&self, bounds: &Self) -> bool {
        !self.overlaps(bounds)
    }

    /// Moves the rectangle the shortest distance that puts it inside `bounds`.
    ///
    /// A rectangle larger than `bounds` is aligned to the top-left corner.
    pub fn clamp_inside(&mut self, bounds: &Self) {
        let max_x = (bounds.right() - self.w).max(bounds.left());
        let max_y = (bounds.bottom() - self.h).max(bounds.top());
        self.x = self.x.clamp(bounds.left(), max_x);
        self.y = self.y.clamp(bounds.top(), max_y);
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_normalized_zero_stays_zero() {
        assert_eq!(Vec2::ZERO.normalized(), Vec2::ZERO);
        let v = Vec2::new(3.0, 4.0).normalized();
        assert!((v.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_overlap_requires_interior_intersection() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&Rect::new(9.0, 9.0, 5.0, 5.0)));
        assert!(!a.overlaps(&Rect::new(0.0, 10.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Rect::new(20.0, 0.0, 1.0, 1.0)));
        // containment counts
        assert!(a.overlaps(&Rect::new(2.0, 2.0, 1.0, 1.0)));
    }

    #[test]
    fn test_clamp_inside() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 50.0);
        let mut r = Rect::new(-5.0, 45.0, 10.0, 10.0);
        r.clamp_inside(&bounds);
        assert_eq!(r, Rect::new(0.0, 40.0, 10.0, 10.0));
    }

    #[test]
    fn test_from_center_round_trips_center() {
        let r = Rect::from_center(Vec2::new(50.0, 20.0), Vec2::new(10.0, 4.0));
        assert_eq!(r.center(), Vec2::new(50.0, 20.0));
        assert_eq!(r.left(), 45.0);
        assert_eq!(r.bottom(), 22.0);
    }

    fn rect_strategy() -> impl Strategy<Value = Rect> {
        (-100.0f32..100.0, -100.0f32..100.0, 0.5f32..50.0, 0.5f32..50.0)
            .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
    }

    proptest! {
        #[test]
        fn test_overlap_is_symmetric(a in rect_strategy(), b in rect_strategy()) {
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }

        #[test]
        fn test_clamped_rect_is_inside(mut r in rect_strategy()) {
            let bounds = Rect::new(-60.0, -60.0, 120.0, 120.0);
            r.clamp_inside(&bounds);
            prop_assert!(r.left() >= bounds.left());
            prop_assert!(r.top() >= bounds.top());
            prop_assert!(r.right() <= bounds.right() + 1e-3);
            prop_assert!(r.bottom() <= bounds.bottom() + 1e-3);
        }
    }
}

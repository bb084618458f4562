//! Rectangles used for windows, regions and screens.
use serde::{Deserialize, Serialize};
use std::ops::Add;
use std::ops::Sub;

/// A rectangle. x,y from top left.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq, Hash, Copy)]
pub struct Xyhw {
    x: i32,
    y: i32,
    h: i32,
    w: i32,
}

/// Modifiable struct that can be used to generate an Xyhw struct.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq, Copy)]
pub struct XyhwBuilder {
    pub x: i32,
    pub y: i32,
    pub h: i32,
    pub w: i32,
}

impl From<XyhwBuilder> for Xyhw {
    fn from(b: XyhwBuilder) -> Self {
        Self {
            x: b.x,
            y: b.y,
            h: b.h,
            w: b.w,
        }
    }
}

impl Add for Xyhw {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            w: self.w + other.w,
            h: self.h + other.h,
        }
    }
}

impl Sub for Xyhw {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            w: self.w - other.w,
            h: self.h - other.h,
        }
    }
}

impl Xyhw {
    #[must_use]
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, h, w }
    }

    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }
    #[must_use]
    pub const fn h(&self) -> i32 {
        self.h
    }
    #[must_use]
    pub const fn w(&self) -> i32 {
        self.w
    }
    /// The first column to the right of the rectangle.
    #[must_use]
    pub const fn max_x(&self) -> i32 {
        self.x + self.w
    }
    /// The first row below the rectangle.
    #[must_use]
    pub const fn max_y(&self) -> i32 {
        self.y + self.h
    }

    pub fn set_x(&mut self, value: i32) {
        self.x = value;
    }
    pub fn set_y(&mut self, value: i32) {
        self.y = value;
    }
    pub fn set_h(&mut self, value: i32) {
        self.h = value;
    }
    pub fn set_w(&mut self, value: i32) {
        self.w = value;
    }

    #[must_use]
    pub const fn contains_point(&self, x: i32, y: i32) -> bool {
        (self.x <= x && x < self.max_x()) && (self.y <= y && y < self.max_y())
    }

    #[must_use]
    pub const fn intersects(&self, other: &Self) -> bool {
        self.x < other.max_x()
            && other.x < self.max_x()
            && self.y < other.max_y()
            && other.y < self.max_y()
    }

    #[must_use]
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        if !self.intersects(other) {
            return None;
        }
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        Some(Self::new(
            x,
            y,
            self.max_x().min(other.max_x()) - x,
            self.max_y().min(other.max_y()) - y,
        ))
    }

    #[must_use]
    pub const fn volume(&self) -> u64 {
        self.h as u64 * self.w as u64
    }

    #[must_use]
    pub const fn is_landscape(&self) -> bool {
        self.w >= self.h
    }

    #[must_use]
    pub const fn same_size(&self, other: &Self) -> bool {
        self.w == other.w && self.h == other.h
    }

    /// Mirrors the rectangle over the main diagonal (x <-> y, w <-> h).
    /// Applying it twice gives back the original rectangle.
    #[must_use]
    pub const fn transposed(&self) -> Self {
        Self {
            x: self.y,
            y: self.x,
            w: self.h,
            h: self.w,
        }
    }

    /// Shrinks the rectangle by `amount` on every side.
    #[must_use]
    pub fn inset(&self, amount: i32) -> Self {
        Self {
            x: self.x + amount,
            y: self.y + amount,
            w: (self.w - 2 * amount).max(1),
            h: (self.h - 2 * amount).max(1),
        }
    }

    pub fn center_relative(&mut self, outer: Self, border: i32) {
        self.x = outer.x() + outer.w() / 2 - self.w / 2 - border;
        self.y = outer.y() + outer.h() / 2 - self.h / 2 - border;
    }

    #[must_use]
    pub const fn center(&self) -> (i32, i32) {
        let x = self.x + (self.w / 2);
        let y = self.y + (self.h / 2);
        (x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transposed_twice_is_identity() {
        let a = Xyhw::new(10, 20, 300, 400);
        assert_eq!(a.transposed(), Xyhw::new(20, 10, 400, 300));
        assert_eq!(a.transposed().transposed(), a);
    }

    #[test]
    fn intersection_of_overlapping_rects() {
        let a = Xyhw::new(0, 0, 100, 100);
        let b = Xyhw::new(50, 60, 100, 100);
        assert_eq!(a.intersection(&b), Some(Xyhw::new(50, 60, 50, 40)));
    }

    #[test]
    fn touching_rects_do_not_intersect() {
        let a = Xyhw::new(0, 0, 100, 100);
        let b = Xyhw::new(100, 0, 100, 100);
        assert!(!a.intersects(&b));
        assert_eq!(a.intersection(&b), None);
    }

    #[test]
    fn contains_point_excludes_far_edge() {
        let a = Xyhw::new(0, 0, 100, 100);
        assert!(a.contains_point(0, 0));
        assert!(a.contains_point(99, 99));
        assert!(!a.contains_point(100, 50));
    }

    #[test]
    fn center_relative_centers_inside_outer() {
        let outer = Xyhw::new(0, 0, 1000, 800);
        let mut inner = Xyhw::new(0, 0, 200, 100);
        inner.center_relative(outer, 0);
        assert_eq!(inner, Xyhw::new(400, 350, 200, 100));
    }
}

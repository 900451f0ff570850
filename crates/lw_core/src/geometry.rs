//! Integer axis-aligned rectangles in screen space (y grows downward).
//!
//! `right()` and `bottom()` are exclusive: a rect at `x = 10` with `w = 5`
//! covers columns `10..15`, so `right() == 15`. Two rects whose edges only
//! touch therefore do not intersect.

use glam::IVec2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    /// Negative sizes are clamped to zero.
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self {
            x,
            y,
            w: if w < 0 { 0 } else { w },
            h: if h < 0 { 0 } else { h },
        }
    }

    pub fn from_pos_size(pos: IVec2, size: IVec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub fn position(&self) -> IVec2 {
        IVec2::new(self.x, self.y)
    }

    pub fn size(&self) -> IVec2 {
        IVec2::new(self.w, self.h)
    }

    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Strict overlap test. Shared edges and zero-area rects never count.
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// True iff `point` lies in `[x, x + w) × [y, y + h)`.
    pub fn contains(&self, point: IVec2) -> bool {
        point.x >= self.left()
            && point.x < self.right()
            && point.y >= self.top()
            && point.y < self.bottom()
    }

    pub fn translated(&self, delta: IVec2) -> Self {
        Self {
            x: self.x + delta.x,
            y: self.y + delta.y,
            ..*self
        }
    }
}

pub fn intersects(a: &Rect, b: &Rect) -> bool {
    a.intersects(b)
}

pub fn contains(r: &Rect, point: IVec2) -> bool {
    r.contains(point)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlapping_rects_intersect() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 5, 10, 10);
        assert!(intersects(&a, &b));
        assert!(intersects(&b, &a));
    }

    #[test]
    fn touching_edges_do_not_intersect() {
        let a = Rect::new(0, 0, 10, 10);
        let right = Rect::new(10, 0, 10, 10);
        let below = Rect::new(0, 10, 10, 10);
        assert!(!a.intersects(&right));
        assert!(!a.intersects(&below));
    }

    #[test]
    fn one_pixel_overlap_intersects() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(9, 9, 10, 10);
        assert!(a.intersects(&b));
    }

    #[test]
    fn zero_area_rect_never_intersects() {
        let a = Rect::new(0, 0, 10, 10);
        let line = Rect::new(5, 0, 0, 10);
        assert!(!a.intersects(&line));
    }

    #[test]
    fn contains_is_half_open() {
        let r = Rect::new(10, 20, 5, 5);
        assert!(contains(&r, IVec2::new(10, 20)));
        assert!(contains(&r, IVec2::new(14, 24)));
        assert!(!contains(&r, IVec2::new(15, 24)));
        assert!(!contains(&r, IVec2::new(14, 25)));
        assert!(!contains(&r, IVec2::new(9, 20)));
    }

    #[test]
    fn negative_size_is_clamped() {
        let r = Rect::new(0, 0, -4, 3);
        assert_eq!(r.w, 0);
        assert!(r.is_empty());
    }

    #[test]
    fn edges_are_exclusive() {
        let r = Rect::new(3, 4, 10, 20);
        assert_eq!(r.left(), 3);
        assert_eq!(r.right(), 13);
        assert_eq!(r.top(), 4);
        assert_eq!(r.bottom(), 24);
        assert_eq!(r.translated(IVec2::new(1, -1)), Rect::new(4, 3, 10, 20));
    }
}

//! Integer geometry
//!
//! Everything the scroll view composites is pixel addressed, so positions and
//! rectangles are `i32`. Rectangles are half-open: `[left, right) x [top, bottom)`.

use smallvec::SmallVec;

/// A point in pixel coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Translate by the given deltas
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// L1 (taxicab) distance to another point
    pub fn manhattan_distance(self, other: Point) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

/// A width/height pair
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

/// A half-open rectangle
///
/// Any rectangle with `right <= left` or `bottom <= top` is empty. Operations
/// that produce an empty result normalize it to [`Rect::EMPTY`] so empty
/// rectangles compare equal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub const EMPTY: Rect = Rect {
        left: 0,
        top: 0,
        right: 0,
        bottom: 0,
    };

    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Rectangle from an origin and a size
    pub const fn from_origin_size(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            left: x,
            top: y,
            right: x + width,
            bottom: y + height,
        }
    }

    /// Rectangle of the given size anchored at the origin
    pub const fn from_size(size: Size) -> Self {
        Self::from_origin_size(0, 0, size.width, size.height)
    }

    pub const fn width(&self) -> i32 {
        self.right - self.left
    }

    pub const fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub const fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    pub const fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    pub const fn is_empty(&self) -> bool {
        self.right <= self.left || self.bottom <= self.top
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left && point.x < self.right && point.y >= self.top && point.y < self.bottom
    }

    /// Whether `other` lies entirely inside this rectangle (empty rects always do)
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.is_empty()
            || (other.left >= self.left
                && other.right <= self.right
                && other.top >= self.top
                && other.bottom <= self.bottom)
    }

    /// Translate by the given deltas
    pub const fn offset(&self, dx: i32, dy: i32) -> Rect {
        Rect {
            left: self.left + dx,
            top: self.top + dy,
            right: self.right + dx,
            bottom: self.bottom + dy,
        }
    }

    /// Overlap of two rectangles, [`Rect::EMPTY`] when they do not overlap
    pub fn intersect(&self, other: &Rect) -> Rect {
        let r = Rect {
            left: self.left.max(other.left),
            top: self.top.max(other.top),
            right: self.right.min(other.right),
            bottom: self.bottom.min(other.bottom),
        };
        if r.is_empty() {
            Rect::EMPTY
        } else {
            r
        }
    }

    /// Bounding box of two rectangles
    ///
    /// Empty operands do not contribute, so accumulating into an empty rect
    /// starts from the first non-empty rectangle.
    pub fn union(&self, other: &Rect) -> Rect {
        match (self.is_empty(), other.is_empty()) {
            (true, true) => Rect::EMPTY,
            (true, false) => *other,
            (false, true) => *self,
            (false, false) => Rect {
                left: self.left.min(other.left),
                top: self.top.min(other.top),
                right: self.right.max(other.right),
                bottom: self.bottom.max(other.bottom),
            },
        }
    }

    /// The parts of this rectangle not covered by `other`
    ///
    /// Produces at most four bands: above, below, left of and right of the
    /// overlap. Pure horizontal shifts of equal-height rects always yield one.
    pub fn subtract(&self, other: &Rect) -> SmallVec<[Rect; 4]> {
        let mut out = SmallVec::new();
        if self.is_empty() {
            return out;
        }
        let overlap = self.intersect(other);
        if overlap.is_empty() {
            out.push(*self);
            return out;
        }

        let bands = [
            Rect::new(self.left, self.top, self.right, overlap.top),
            Rect::new(self.left, overlap.bottom, self.right, self.bottom),
            Rect::new(self.left, overlap.top, overlap.left, overlap.bottom),
            Rect::new(overlap.right, overlap.top, self.right, overlap.bottom),
        ];
        out.extend(bands.into_iter().filter(|r| !r.is_empty()));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersect_disjoint_is_empty() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(10, 0, 20, 10);
        assert_eq!(a.intersect(&b), Rect::EMPTY);
        assert!(a.intersect(&b).is_empty());
    }

    #[test]
    fn test_union_ignores_empty() {
        let a = Rect::new(5, 5, 10, 10);
        assert_eq!(Rect::EMPTY.union(&a), a);
        assert_eq!(a.union(&Rect::new(3, 3, 3, 9)), a);
        assert_eq!(
            a.union(&Rect::new(20, 0, 30, 6)),
            Rect::new(5, 0, 30, 10)
        );
    }

    #[test]
    fn test_subtract_horizontal_shift() {
        let visible = Rect::new(50, 0, 350, 40);
        let overlap = Rect::new(50, 0, 300, 40);
        let exposed = visible.subtract(&overlap);
        assert_eq!(exposed.as_slice(), &[Rect::new(300, 0, 350, 40)]);
    }

    #[test]
    fn test_subtract_hole_gives_four_bands() {
        let outer = Rect::new(0, 0, 30, 30);
        let hole = Rect::new(10, 10, 20, 20);
        let parts = outer.subtract(&hole);
        assert_eq!(parts.len(), 4);
        let area: i32 = parts.iter().map(|r| r.width() * r.height()).sum();
        assert_eq!(area, 30 * 30 - 10 * 10);
    }

    #[test]
    fn test_subtract_covered_is_nothing() {
        let r = Rect::new(0, 0, 10, 10);
        assert!(r.subtract(&Rect::new(-5, -5, 20, 20)).is_empty());
    }

    #[test]
    fn test_contains_is_half_open() {
        let r = Rect::new(0, 0, 10, 10);
        assert!(r.contains(Point::new(0, 0)));
        assert!(!r.contains(Point::new(10, 5)));
    }

    #[test]
    fn test_manhattan_distance() {
        assert_eq!(Point::new(1, 2).manhattan_distance(Point::new(6, 1)), 6);
    }
}

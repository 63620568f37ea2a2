//! Core geometry types.
//!
//! All values are in terminal cells. Coordinates are signed so that
//! intermediate positions (and views scrolled off-screen) can go negative;
//! sizes produced by the layout engine are always clamped to `>= 0`.

// =============================================================================
// Point
// =============================================================================

/// A location in some coordinate space (content, frame or screen).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Translate by another point.
    #[inline]
    pub fn offset(self, by: Point) -> Point {
        Point::new(self.x + by.x, self.y + by.y)
    }

    /// Translate by the negation of another point.
    #[inline]
    pub fn offset_back(self, by: Point) -> Point {
        Point::new(self.x - by.x, self.y - by.y)
    }
}

// =============================================================================
// Size
// =============================================================================

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const ZERO: Size = Size { width: 0, height: 0 };

    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Clamp both dimensions at zero.
    #[inline]
    pub fn clamped(self) -> Size {
        Size::new(self.width.max(0), self.height.max(0))
    }
}

// =============================================================================
// Rect
// =============================================================================

/// An integer rectangle.
///
/// A view's frame is a `Rect` in its parent's content space; its content
/// rect is a `Rect` at the origin of its own content space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const ZERO: Rect = Rect { x: 0, y: 0, width: 0, height: 0 };

    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// A rect of the given size at the origin.
    pub const fn from_size(size: Size) -> Self {
        Self::new(0, 0, size.width, size.height)
    }

    #[inline]
    pub fn location(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[inline]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// First column past the right edge.
    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    /// First row past the bottom edge.
    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Check if a point is inside this rect.
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Same size, translated by `by`.
    #[inline]
    pub fn offset(self, by: Point) -> Rect {
        Rect::new(self.x + by.x, self.y + by.y, self.width, self.height)
    }

    /// Same size, translated by the negation of `by`.
    #[inline]
    pub fn offset_back(self, by: Point) -> Rect {
        Rect::new(self.x - by.x, self.y - by.y, self.width, self.height)
    }

    /// Compute intersection of two rects.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = self.right().min(other.right());
        let y2 = self.bottom().min(other.bottom());

        if x2 > x1 && y2 > y1 {
            Some(Rect::new(x1, y1, x2 - x1, y2 - y1))
        } else {
            None
        }
    }
}

// =============================================================================
// Thickness
// =============================================================================

/// Per-side inset of an adornment, in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Thickness {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Thickness {
    pub const ZERO: Thickness = Thickness { left: 0, top: 0, right: 0, bottom: 0 };

    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self { left, top, right, bottom }
    }

    /// Same inset on all four sides.
    pub const fn uniform(n: i32) -> Self {
        Self::new(n, n, n, n)
    }

    /// Total inset along the x axis.
    #[inline]
    pub fn horizontal(&self) -> i32 {
        self.left + self.right
    }

    /// Total inset along the y axis.
    #[inline]
    pub fn vertical(&self) -> i32 {
        self.top + self.bottom
    }

    pub fn is_negative(&self) -> bool {
        self.left < 0 || self.top < 0 || self.right < 0 || self.bottom < 0
    }

    /// The rect left inside `outer` after removing this thickness.
    ///
    /// Width and height are clamped at zero; the location still moves by
    /// `left`/`top` so nested insets stay anchored to the outer corner.
    pub fn inside(&self, outer: Rect) -> Rect {
        Rect::new(
            outer.x + self.left,
            outer.y + self.top,
            (outer.width - self.horizontal()).max(0),
            (outer.height - self.vertical()).max(0),
        )
    }
}

// =============================================================================
// Tests
// =============================================================================

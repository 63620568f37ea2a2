//! Adornment Stack
//!
//! Every view carries three nested frames around its content area:
//!
//! ```text
//! frame ─┬─ margin
//!        └──┬─ border
//!           └──┬─ padding
//!              └── content area
//! ```
//!
//! Each layer is its parent rect inset by the parent layer's thickness.
//! All rects here are in the owning view's frame space (origin at the
//! view's top-left corner), so the stack only needs the frame size to be
//! recomputed.
//!
//! An [`Adornment`] is plain data: it has no adornments of its own and is
//! never positioned by the expression solver.

use crate::types::{Point, Rect, Size, Thickness};

/// Which layer of the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdornmentKind {
    Margin,
    Border,
    Padding,
}

/// One layer of the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Adornment {
    thickness: Thickness,
    frame: Rect,
}

impl Adornment {
    pub fn thickness(&self) -> Thickness {
        self.thickness
    }

    /// This layer's outer rect, in the owning view's frame space.
    pub fn frame(&self) -> Rect {
        self.frame
    }

    /// What's left inside this layer.
    pub fn inner(&self) -> Rect {
        self.thickness.inside(self.frame)
    }
}

/// The margin → border → padding triad owned by a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Adornments {
    margin: Adornment,
    border: Adornment,
    padding: Adornment,
}

impl Adornments {
    pub fn margin(&self) -> &Adornment {
        &self.margin
    }

    pub fn border(&self) -> &Adornment {
        &self.border
    }

    pub fn padding(&self) -> &Adornment {
        &self.padding
    }

    pub fn get(&self, kind: AdornmentKind) -> &Adornment {
        match kind {
            AdornmentKind::Margin => &self.margin,
            AdornmentKind::Border => &self.border,
            AdornmentKind::Padding => &self.padding,
        }
    }

    /// Replace one layer's thickness. Call [`Adornments::relayout`] after.
    pub(crate) fn set_thickness(&mut self, kind: AdornmentKind, thickness: Thickness) {
        match kind {
            AdornmentKind::Margin => self.margin.thickness = thickness,
            AdornmentKind::Border => self.border.thickness = thickness,
            AdornmentKind::Padding => self.padding.thickness = thickness,
        }
    }

    /// Recompute all three frames, outermost first, for a view of
    /// `frame_size`.
    pub(crate) fn relayout(&mut self, frame_size: Size) {
        self.margin.frame = Rect::from_size(frame_size.clamped());
        self.border.frame = self.margin.inner();
        self.padding.frame = self.border.inner();
    }

    /// The content area in frame space.
    pub fn content_area(&self) -> Rect {
        self.padding.inner()
    }

    /// Offset from the frame's origin to the content origin.
    pub fn content_offset(&self) -> Point {
        self.content_area().location()
    }

    /// Sum of all three thicknesses.
    pub fn total_thickness(&self) -> Thickness {
        let (m, b, p) = (self.margin.thickness, self.border.thickness, self.padding.thickness);
        Thickness::new(
            m.left + b.left + p.left,
            m.top + b.top + p.top,
            m.right + b.right + p.right,
            m.bottom + b.bottom + p.bottom,
        )
    }
}

// =============================================================================
// Tests
// =============================================================================

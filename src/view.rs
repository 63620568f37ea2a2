//! View - a node in the layout tree.
//!
//! A view owns its expressions, its resolved frame and its adornment stack.
//! Children are listed by id; the parent is a non-owning id back-reference,
//! so the tree never forms reference cycles. All mutation goes through
//! [`ViewTree`](crate::ViewTree), which keeps the dirty flags consistent.

use crate::adornment::Adornments;
use crate::expr::{Dim, Pos};
use crate::types::{Point, Rect};

slotmap::new_key_type! {
    /// Generational handle to a view in a [`ViewTree`](crate::ViewTree).
    pub struct ViewId;
}

bitflags::bitflags! {
    /// Per-view state bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ViewFlags: u8 {
        /// A recomputation is pending before the next read.
        const NEEDS_LAYOUT = 1 << 0;
        /// Dimensions are raised to the measured content size.
        const AUTO_SIZE = 1 << 1;
        /// The frame has been resolved (or assigned) at least once.
        const LAID_OUT = 1 << 2;
    }
}

/// A view in the tree.
#[derive(Debug, Clone)]
pub struct View {
    pub(crate) id: ViewId,
    pub(crate) name: String,
    pub(crate) text: String,
    pub(crate) parent: Option<ViewId>,
    pub(crate) children: Vec<ViewId>,

    pub(crate) x: Pos,
    pub(crate) y: Pos,
    pub(crate) width: Dim,
    pub(crate) height: Dim,

    pub(crate) frame: Rect,
    pub(crate) flags: ViewFlags,
    pub(crate) adornments: Adornments,
}

impl View {
    pub(crate) fn new(id: ViewId, name: String) -> Self {
        Self {
            id,
            name,
            text: String::new(),
            parent: None,
            children: Vec::new(),
            x: Pos::default(),
            y: Pos::default(),
            width: Dim::default(),
            height: Dim::default(),
            frame: Rect::ZERO,
            flags: ViewFlags::NEEDS_LAYOUT,
            adornments: Adornments::default(),
        }
    }

    pub fn id(&self) -> ViewId {
        self.id
    }

    /// Display name, used in diagnostics and error messages.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Text payload handed to the measurement collaborator.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn parent(&self) -> Option<ViewId> {
        self.parent
    }

    pub fn children(&self) -> &[ViewId] {
        &self.children
    }

    pub fn x(&self) -> &Pos {
        &self.x
    }

    pub fn y(&self) -> &Pos {
        &self.y
    }

    pub fn width(&self) -> &Dim {
        &self.width
    }

    pub fn height(&self) -> &Dim {
        &self.height
    }

    pub fn flags(&self) -> ViewFlags {
        self.flags
    }

    pub fn auto_size(&self) -> bool {
        self.flags.contains(ViewFlags::AUTO_SIZE)
    }

    pub fn needs_layout(&self) -> bool {
        self.flags.contains(ViewFlags::NEEDS_LAYOUT)
    }

    pub fn is_laid_out(&self) -> bool {
        self.flags.contains(ViewFlags::LAID_OUT)
    }

    /// Frame in the parent's content space.
    ///
    /// Before the first pass this is `Rect::ZERO`; check
    /// [`View::is_laid_out`] to tell the two apart.
    pub fn frame(&self) -> Rect {
        self.frame
    }

    pub fn adornments(&self) -> &Adornments {
        &self.adornments
    }

    /// Content area at the origin of the view's own content space.
    pub fn content_rect(&self) -> Rect {
        Rect::from_size(self.adornments.content_area().size())
    }

    /// Offset from the frame origin to the content origin.
    pub fn content_offset(&self) -> Point {
        self.adornments.content_offset()
    }

    /// True when all four expressions are plain `Absolute`.
    pub fn is_absolute(&self) -> bool {
        self.x.is_absolute() && self.y.is_absolute() && self.width.is_absolute() && self.height.is_absolute()
    }
}

//! Geometry Expressions
//!
//! [`Pos`] and [`Dim`] describe a view's location and extent along one axis
//! as a function of the container's available extent and, optionally, of
//! another view's resolved frame.
//!
//! # Evaluation
//!
//! Expressions are immutable and evaluated from scratch on every pass.
//! A `Dim` may depend on the location already chosen along its axis
//! (`Fill`, `Factor` from remaining); a `Pos` may depend on the view's own
//! extent (`Center`, `AnchorEnd`). The resolver breaks that circle with a
//! two-step evaluation, see [`crate::layout`].
//!
//! # Example
//!
//! ```
//! use spark_layout::{Dim, Pos};
//!
//! // Ten cells in from the right edge, filling what's left minus a border.
//! let x = Pos::anchor_end(10);
//! let width = Dim::fill(1) - 2;
//! assert!(!x.is_absolute());
//! assert!(!width.is_absolute());
//! ```

mod dim;
mod pos;

pub use dim::{Dim, Extent};
pub use pos::{Pos, Side};

use std::collections::HashMap;

use crate::error::{LayoutError, Result};
use crate::types::Rect;
use crate::view::ViewId;

// =============================================================================
// Shared pieces
// =============================================================================

/// Arithmetic used by `Combine` nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Add,
    Subtract,
}

impl Op {
    #[inline]
    pub fn apply(self, left: i32, right: i32) -> i32 {
        match self {
            Op::Add => left + right,
            Op::Subtract => left - right,
        }
    }
}

/// Lookup of already-resolved frames for `View` references.
pub trait FrameSource {
    fn resolved_frame(&self, id: ViewId) -> Option<Rect>;
}

impl FrameSource for HashMap<ViewId, Rect> {
    fn resolved_frame(&self, id: ViewId) -> Option<Rect> {
        self.get(&id).copied()
    }
}

fn frame_of<F: FrameSource + ?Sized>(frames: &F, target: ViewId) -> Result<Rect> {
    frames.resolved_frame(target).ok_or(LayoutError::UnknownView(target))
}

/// `round(fraction * base)`.
fn scale(fraction: f32, base: i32) -> i32 {
    (fraction * base as f32).round() as i32
}

fn validate_fraction(fraction: f32) -> Result<()> {
    if fraction.is_finite() && (0.0..=1.0).contains(&fraction) {
        Ok(())
    } else {
        Err(LayoutError::InvalidArgument(format!(
            "factor must be within 0.0..=1.0, got {fraction}"
        )))
    }
}

//! Dimension expressions.

use std::ops::{Add, Sub};

use super::{frame_of, scale, validate_fraction, FrameSource, Op};
use crate::error::{LayoutError, Result};
use crate::view::ViewId;

/// Which extent of a referenced view a [`Dim::View`] reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extent {
    Width,
    Height,
}

/// An extent along one axis.
#[derive(Debug, Clone, PartialEq)]
pub enum Dim {
    /// A fixed number of cells.
    Absolute(i32),
    /// A fraction of the available extent, or of what remains past the
    /// view's location when `from_remaining` is set.
    Factor { fraction: f32, from_remaining: bool },
    /// Everything from the view's location to the far edge, minus `margin`.
    Fill(i32),
    /// Another view's resolved width or height.
    View { target: ViewId, extent: Extent },
    Combine { left: Box<Dim>, right: Box<Dim>, op: Op },
}

impl Default for Dim {
    fn default() -> Self {
        Dim::Absolute(0)
    }
}

impl From<i32> for Dim {
    fn from(n: i32) -> Self {
        Dim::Absolute(n)
    }
}

impl Dim {
    pub fn sized(n: i32) -> Self {
        Dim::Absolute(n)
    }

    /// `percent` of the available extent (0-100).
    pub fn percent(percent: f32) -> Self {
        Dim::Factor { fraction: percent / 100.0, from_remaining: false }
    }

    /// `percent` of the extent left past the view's own location.
    pub fn percent_of_remaining(percent: f32) -> Self {
        Dim::Factor { fraction: percent / 100.0, from_remaining: true }
    }

    pub fn fill(margin: i32) -> Self {
        Dim::Fill(margin)
    }

    pub fn width(target: ViewId) -> Self {
        Dim::View { target, extent: Extent::Width }
    }

    pub fn height(target: ViewId) -> Self {
        Dim::View { target, extent: Extent::Height }
    }

    /// True for a plain `Absolute`.
    pub fn is_absolute(&self) -> bool {
        matches!(self, Dim::Absolute(_))
    }

    /// The fixed extent, if this is a plain `Absolute`.
    pub fn as_absolute(&self) -> Option<i32> {
        match self {
            Dim::Absolute(n) => Some(*n),
            _ => None,
        }
    }

    /// Reject a negative absolute extent and fractions outside `0.0..=1.0`.
    ///
    /// Operands of a `Combine` may be negative: only the combined result is
    /// an extent, and it is clamped at evaluation.
    pub fn validate(&self) -> Result<()> {
        match self {
            Dim::Absolute(n) if *n < 0 => Err(LayoutError::InvalidArgument(format!(
                "absolute dimension must be >= 0, got {n}"
            ))),
            _ => self.validate_fractions(),
        }
    }

    fn validate_fractions(&self) -> Result<()> {
        match self {
            Dim::Factor { fraction, .. } => validate_fraction(*fraction),
            Dim::Combine { left, right, .. } => {
                left.validate_fractions()?;
                right.validate_fractions()
            }
            Dim::Absolute(_) | Dim::Fill(_) | Dim::View { .. } => Ok(()),
        }
    }

    /// Append every view this expression reads from.
    pub fn collect_targets(&self, out: &mut Vec<ViewId>) {
        match self {
            Dim::View { target, .. } => out.push(*target),
            Dim::Combine { left, right, .. } => {
                left.collect_targets(out);
                right.collect_targets(out);
            }
            Dim::Absolute(_) | Dim::Factor { .. } | Dim::Fill(_) => {}
        }
    }

    /// Evaluate to an extent `>= 0` for a view placed at `location`.
    pub fn calculate<F>(&self, location: i32, available: i32, frames: &F) -> Result<i32>
    where
        F: FrameSource + ?Sized,
    {
        Ok(self.raw(location, available, frames)?.max(0))
    }

    // Unclamped so that `Combine` subtractions see the real operands.
    fn raw<F>(&self, location: i32, available: i32, frames: &F) -> Result<i32>
    where
        F: FrameSource + ?Sized,
    {
        Ok(match self {
            Dim::Absolute(n) => *n,
            Dim::Factor { fraction, from_remaining } => {
                let base = if *from_remaining { available - location } else { available };
                scale(*fraction, base)
            }
            Dim::Fill(margin) => (available - location - margin).max(0),
            Dim::View { target, extent } => {
                let frame = frame_of(frames, *target)?;
                match extent {
                    Extent::Width => frame.width,
                    Extent::Height => frame.height,
                }
            }
            Dim::Combine { left, right, op } => op.apply(
                left.raw(location, available, frames)?,
                right.raw(location, available, frames)?,
            ),
        })
    }
}

// =============================================================================
// Operators
// =============================================================================

impl Add for Dim {
    type Output = Dim;

    fn add(self, rhs: Dim) -> Dim {
        Dim::Combine { left: Box::new(self), right: Box::new(rhs), op: Op::Add }
    }
}

impl Sub for Dim {
    type Output = Dim;

    fn sub(self, rhs: Dim) -> Dim {
        Dim::Combine { left: Box::new(self), right: Box::new(rhs), op: Op::Subtract }
    }
}

impl Add<i32> for Dim {
    type Output = Dim;

    fn add(self, rhs: i32) -> Dim {
        self + Dim::Absolute(rhs)
    }
}

impl Sub<i32> for Dim {
    type Output = Dim;

    fn sub(self, rhs: i32) -> Dim {
        self - Dim::Absolute(rhs)
    }
}

// =============================================================================
// Tests
// =============================================================================

//! Position expressions.

use std::ops::{Add, Sub};

use super::{frame_of, scale, validate_fraction, FrameSource, Op};
use crate::error::Result;
use crate::view::ViewId;

/// Which edge of a referenced view a [`Pos::View`] reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Target's x.
    Left,
    /// Target's y.
    Top,
    /// Target's x + width.
    Right,
    /// Target's y + height.
    Bottom,
}

/// A location along one axis.
#[derive(Debug, Clone, PartialEq)]
pub enum Pos {
    /// A fixed offset from the container's origin.
    Absolute(i32),
    /// A fraction of the available extent.
    Factor { fraction: f32, from_remaining: bool },
    /// Centered in the available extent.
    Center,
    /// Pushed against the far edge, `margin` cells in.
    AnchorEnd(i32),
    /// An edge of another view's resolved frame.
    View { target: ViewId, side: Side },
    Combine { left: Box<Pos>, right: Box<Pos>, op: Op },
}

impl Default for Pos {
    fn default() -> Self {
        Pos::Absolute(0)
    }
}

impl From<i32> for Pos {
    fn from(n: i32) -> Self {
        Pos::Absolute(n)
    }
}

impl Pos {
    pub fn at(n: i32) -> Self {
        Pos::Absolute(n)
    }

    /// `percent` of the available extent (0-100).
    pub fn percent(percent: f32) -> Self {
        Pos::Factor { fraction: percent / 100.0, from_remaining: false }
    }

    pub fn center() -> Self {
        Pos::Center
    }

    pub fn anchor_end(margin: i32) -> Self {
        Pos::AnchorEnd(margin)
    }

    pub fn left(target: ViewId) -> Self {
        Pos::View { target, side: Side::Left }
    }

    pub fn top(target: ViewId) -> Self {
        Pos::View { target, side: Side::Top }
    }

    pub fn right(target: ViewId) -> Self {
        Pos::View { target, side: Side::Right }
    }

    pub fn bottom(target: ViewId) -> Self {
        Pos::View { target, side: Side::Bottom }
    }

    /// True for a plain `Absolute`.
    pub fn is_absolute(&self) -> bool {
        matches!(self, Pos::Absolute(_))
    }

    /// Reject fractions outside `0.0..=1.0` anywhere in the tree.
    pub fn validate(&self) -> Result<()> {
        match self {
            Pos::Factor { fraction, .. } => validate_fraction(*fraction),
            Pos::Combine { left, right, .. } => {
                left.validate()?;
                right.validate()
            }
            Pos::Absolute(_) | Pos::Center | Pos::AnchorEnd(_) | Pos::View { .. } => Ok(()),
        }
    }

    /// Append every view this expression reads from.
    pub fn collect_targets(&self, out: &mut Vec<ViewId>) {
        match self {
            Pos::View { target, .. } => out.push(*target),
            Pos::Combine { left, right, .. } => {
                left.collect_targets(out);
                right.collect_targets(out);
            }
            Pos::Absolute(_) | Pos::Factor { .. } | Pos::Center | Pos::AnchorEnd(_) => {}
        }
    }

    /// Evaluate to a location.
    ///
    /// `dimension` is the view's own extent along this axis, computed with
    /// the view at location 0.
    pub fn calculate<F>(&self, available: i32, dimension: i32, frames: &F) -> Result<i32>
    where
        F: FrameSource + ?Sized,
    {
        Ok(match self {
            Pos::Absolute(n) => *n,
            // Evaluated at location 0, so the remaining extent is the
            // whole extent.
            Pos::Factor { fraction, .. } => scale(*fraction, available),
            Pos::Center => (available - dimension).div_euclid(2),
            Pos::AnchorEnd(margin) => available - dimension - margin,
            Pos::View { target, side } => {
                let frame = frame_of(frames, *target)?;
                match side {
                    Side::Left => frame.x,
                    Side::Top => frame.y,
                    Side::Right => frame.right(),
                    Side::Bottom => frame.bottom(),
                }
            }
            Pos::Combine { left, right, op } => op.apply(
                left.calculate(available, dimension, frames)?,
                right.calculate(available, dimension, frames)?,
            ),
        })
    }
}

// =============================================================================
// Operators
// =============================================================================

impl Add for Pos {
    type Output = Pos;

    fn add(self, rhs: Pos) -> Pos {
        Pos::Combine { left: Box::new(self), right: Box::new(rhs), op: Op::Add }
    }
}

impl Sub for Pos {
    type Output = Pos;

    fn sub(self, rhs: Pos) -> Pos {
        Pos::Combine { left: Box::new(self), right: Box::new(rhs), op: Op::Subtract }
    }
}

impl Add<i32> for Pos {
    type Output = Pos;

    fn add(self, rhs: i32) -> Pos {
        self + Pos::Absolute(rhs)
    }
}

impl Sub<i32> for Pos {
    type Output = Pos;

    fn sub(self, rhs: i32) -> Pos {
        self - Pos::Absolute(rhs)
    }
}

// =============================================================================
// Tests
// =============================================================================

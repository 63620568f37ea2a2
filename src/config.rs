//! Engine configuration.

use crate::types::Size;

/// Options for a [`ViewTree`](crate::ViewTree).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutConfig {
    /// Log a debug diagnostic whenever a frame is read before the view was
    /// ever laid out.
    pub warn_unresolved_reads: bool,

    /// Fixed screen extent. When `None` the reactive screen signals are used
    /// (see [`crate::screen`]).
    pub screen: Option<Size>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            warn_unresolved_reads: cfg!(debug_assertions),
            screen: None,
        }
    }
}

impl LayoutConfig {
    /// Config with a fixed screen extent.
    pub fn with_screen(width: i32, height: i32) -> Self {
        Self {
            screen: Some(Size::new(width, height)),
            ..Self::default()
        }
    }
}

//! # spark-layout
//!
//! Relative layout engine for terminal UIs.
//!
//! Views sit in a tree and describe their geometry with small expressions
//! instead of fixed rects: "centered", "10 cells from the right edge",
//! "fill what's left", "just right of that sibling". A layout pass resolves
//! those expressions into integer frames, in dependency order.
//!
//! ## Architecture
//!
//! ```text
//! ViewTree (slotmap arena)
//!   └─ View: Pos x/y, Dim width/height, adornments, flags
//!        │
//!        ▼  layout(&measure)
//!   per level: collect edges → topological order → resolve each child
//!        │
//!        ▼
//!   frames + content rects + layout events
//! ```
//!
//! The screen extent comes from reactive [spark-signals](https://github.com/RLabs-Inc/spark-signals)
//! (see [`screen`]) unless a fixed one is configured.
//!
//! ## Modules
//!
//! - [`types`] - Point, Size, Rect, Thickness
//! - [`expr`] - Pos / Dim expressions
//! - [`tree`] - the view arena and mutation API
//! - [`layout`] - dependency ordering and the resolver
//! - [`coords`] - content / frame / screen transforms
//! - [`events`] - layout started / completed notifications

pub mod adornment;
pub mod config;
pub mod coords;
pub mod error;
pub mod events;
pub mod expr;
pub mod layout;
pub mod screen;
pub mod tree;
pub mod types;
pub mod view;

// Re-export commonly used items
pub use types::*;

pub use adornment::{Adornment, AdornmentKind, Adornments};
pub use config::LayoutConfig;
pub use error::{LayoutError, Result};
pub use events::{LayoutEvent, LayoutHandler};
pub use expr::{Dim, Extent, FrameSource, Op, Pos, Side};
pub use layout::{CellMeasure, TextMeasure, string_width};
pub use screen::{detect_screen_size, screen_size, set_screen_size};
pub use tree::ViewTree;
pub use view::{View, ViewFlags, ViewId};

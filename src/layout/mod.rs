//! Layout Module
//!
//! Relative layout computation for the view tree.
//!
//! # Architecture
//!
//! 1. `graph`: per-level dependency edges and their topological order
//! 2. `resolve`: expression evaluation into frames, recursive subtree passes
//! 3. `text_measure`: the measurement collaborator used by auto-size
//!
//! # Example
//!
//! ```
//! use spark_layout::{CellMeasure, Dim, LayoutConfig, Pos, ViewTree};
//!
//! let mut tree = ViewTree::with_config(LayoutConfig::with_screen(100, 30));
//! let root = tree.root();
//! let label = tree.add_new(root, "label").unwrap();
//! tree.set_x(label, Pos::center()).unwrap();
//! tree.set_width(label, Dim::sized(4)).unwrap();
//! tree.set_height(label, Dim::sized(1)).unwrap();
//!
//! tree.layout(&CellMeasure).unwrap();
//! assert_eq!(tree.frame(label).unwrap().x, 48);
//! ```

pub mod graph;
mod resolve;
mod text_measure;

pub use graph::{Edge, LayoutOrder};
pub use text_measure::*;

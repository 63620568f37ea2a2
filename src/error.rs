//! Layout errors.

use thiserror::Error;

use crate::view::ViewId;

/// Everything the engine can reject.
///
/// Argument and configuration errors are raised by setters and leave the
/// view untouched. Graph errors abort the layout pass they occur in.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid configuration for \"{view}\": {reason}")]
    InvalidConfiguration { view: String, reason: &'static str },

    #[error("no view with id {0:?} in this tree")]
    UnknownView(ViewId),

    /// A `Pos`/`Dim` targets a view that was destroyed.
    #[error("\"{dependent}\" references a view that no longer exists ({target:?})")]
    Dangling { dependent: String, target: ViewId },

    /// A `Pos`/`Dim` targets a view outside the dependent's ancestor chain
    /// and sibling set.
    #[error("\"{dependent}\" references \"{target}\", which is not a subview of \"{parent}\" or one of its ancestors")]
    Unattached {
        dependent: String,
        target: String,
        parent: String,
    },

    /// A `Pos`/`Dim` targets one of the dependent's own descendants.
    #[error("\"{dependent}\" references its own subview \"{target}\"")]
    ReferencesSubview { dependent: String, target: String },
}

pub type Result<T> = std::result::Result<T, LayoutError>;

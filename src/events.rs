//! Layout Events - "layout started" / "layout completed" notifications.
//!
//! Observers (a renderer, diagnostic tooling) subscribe on the tree and get
//! one notification per pass, at the view that initiated it.
//!
//! # Example
//!
//! ```
//! use spark_layout::{CellMeasure, LayoutConfig, ViewTree};
//!
//! let mut tree = ViewTree::with_config(LayoutConfig::with_screen(80, 24));
//! let cleanup = tree.on_layout_completed(|event| {
//!     println!("laid out {:?}, content was {:?}", event.view, event.old_content);
//! });
//!
//! tree.layout(&CellMeasure).unwrap();
//! cleanup();
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use crate::types::Rect;
use crate::view::ViewId;

/// Payload of both notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutEvent {
    /// The view the pass was started on.
    pub view: ViewId,
    /// Its content rect before the pass ran.
    pub old_content: Rect,
}

/// Handler for layout notifications.
pub type LayoutHandler = Box<dyn Fn(&LayoutEvent)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    Started,
    Completed,
}

// =============================================================================
// HANDLER REGISTRY
// =============================================================================

#[derive(Default)]
struct Registry {
    started: Vec<(usize, LayoutHandler)>,
    completed: Vec<(usize, LayoutHandler)>,
    next_id: usize,
}

impl Registry {
    fn handlers_mut(&mut self, phase: Phase) -> &mut Vec<(usize, LayoutHandler)> {
        match phase {
            Phase::Started => &mut self.started,
            Phase::Completed => &mut self.completed,
        }
    }

    fn handlers(&self, phase: Phase) -> &[(usize, LayoutHandler)] {
        match phase {
            Phase::Started => &self.started,
            Phase::Completed => &self.completed,
        }
    }
}

/// Shared handle to a tree's observers.
///
/// Handlers must not subscribe or unsubscribe while being notified.
#[derive(Clone, Default)]
pub(crate) struct LayoutEvents {
    registry: Rc<RefCell<Registry>>,
}

impl LayoutEvents {
    /// Subscribe a handler. Returns cleanup function.
    pub(crate) fn subscribe<F>(&self, phase: Phase, handler: F) -> impl FnOnce() + use<F>
    where
        F: Fn(&LayoutEvent) + 'static,
    {
        let id = {
            let mut reg = self.registry.borrow_mut();
            let id = reg.next_id;
            reg.next_id += 1;
            reg.handlers_mut(phase).push((id, Box::new(handler)));
            id
        };

        let registry = Rc::downgrade(&self.registry);
        move || {
            if let Some(registry) = registry.upgrade() {
                registry
                    .borrow_mut()
                    .handlers_mut(phase)
                    .retain(|(handler_id, _)| *handler_id != id);
            }
        }
    }

    pub(crate) fn emit(&self, phase: Phase, event: &LayoutEvent) {
        let reg = self.registry.borrow();
        for (_, handler) in reg.handlers(phase) {
            handler(event);
        }
    }

    pub(crate) fn clear(&self) {
        let mut reg = self.registry.borrow_mut();
        reg.started.clear();
        reg.completed.clear();
    }
}

impl std::fmt::Debug for LayoutEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reg = self.registry.borrow();
        f.debug_struct("LayoutEvents")
            .field("started", &reg.started.len())
            .field("completed", &reg.completed.len())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

//! View Tree - arena of views plus the mutation API.
//!
//! Views live in a [`SlotMap`] keyed by [`ViewId`]. Parents own the ordered
//! list of their children; children point back at their parent by id only.
//! Ids are generational, so an expression that targets a destroyed view
//! fails cleanly at the next pass instead of reading a recycled slot.
//!
//! Every setter validates first and mutates second: a rejected call leaves
//! the view exactly as it was. Accepted geometry changes mark the view dirty
//! (see [`ViewTree::set_needs_layout`]).

use slotmap::SlotMap;

use crate::adornment::{Adornments, AdornmentKind};
use crate::config::LayoutConfig;
use crate::error::{LayoutError, Result};
use crate::events::{LayoutEvent, LayoutEvents, Phase};
use crate::expr::{Dim, FrameSource, Pos};
use crate::screen;
use crate::types::{Rect, Size, Thickness};
use crate::view::{View, ViewFlags, ViewId};

/// A tree of views and the layout state derived from it.
#[derive(Debug)]
pub struct ViewTree {
    pub(crate) views: SlotMap<ViewId, View>,
    pub(crate) root: ViewId,
    pub(crate) config: LayoutConfig,
    pub(crate) events: LayoutEvents,
}

impl Default for ViewTree {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSource for ViewTree {
    fn resolved_frame(&self, id: ViewId) -> Option<Rect> {
        self.views.get(id).map(|view| view.frame)
    }
}

impl ViewTree {
    /// Create a tree whose root fills the screen.
    pub fn new() -> Self {
        Self::with_config(LayoutConfig::default())
    }

    pub fn with_config(config: LayoutConfig) -> Self {
        let mut views = SlotMap::with_key();
        let root = views.insert_with_key(|id| {
            let mut view = View::new(id, "root".to_string());
            view.width = Dim::Fill(0);
            view.height = Dim::Fill(0);
            view
        });

        Self {
            views,
            root,
            config,
            events: LayoutEvents::default(),
        }
    }

    pub fn root(&self) -> ViewId {
        self.root
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// The extent the root resolves against.
    pub fn screen_size(&self) -> Size {
        self.config.screen.unwrap_or_else(screen::screen_size)
    }

    pub fn view(&self, id: ViewId) -> Option<&View> {
        self.views.get(id)
    }

    pub fn contains(&self, id: ViewId) -> bool {
        self.views.contains_key(id)
    }

    /// Number of views, attached or not.
    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    pub(crate) fn get(&self, id: ViewId) -> Result<&View> {
        self.views.get(id).ok_or(LayoutError::UnknownView(id))
    }

    pub(crate) fn get_mut(&mut self, id: ViewId) -> Result<&mut View> {
        self.views.get_mut(id).ok_or(LayoutError::UnknownView(id))
    }

    pub(crate) fn name_of(&self, id: ViewId) -> String {
        self.views
            .get(id)
            .map(|view| view.name.clone())
            .unwrap_or_else(|| format!("{id:?}"))
    }

    // =========================================================================
    // Structure
    // =========================================================================

    /// Create a detached view.
    pub fn create(&mut self, name: impl Into<String>) -> ViewId {
        let name = name.into();
        self.views.insert_with_key(|id| View::new(id, name))
    }

    /// Create a view and attach it as the last child of `parent`.
    pub fn add_new(&mut self, parent: ViewId, name: impl Into<String>) -> Result<ViewId> {
        self.get(parent)?;
        let child = self.create(name);
        self.add(parent, child)?;
        Ok(child)
    }

    /// Attach `child` as the last subview of `parent`, detaching it from
    /// wherever it was.
    pub fn add(&mut self, parent: ViewId, child: ViewId) -> Result<()> {
        self.get(parent)?;
        self.get(child)?;
        if child == self.root {
            return Err(LayoutError::InvalidArgument("the root view cannot be a subview".into()));
        }
        if child == parent || self.is_ancestor(child, parent) {
            return Err(LayoutError::InvalidArgument(format!(
                "adding \"{}\" under \"{}\" would create a cycle",
                self.name_of(child),
                self.name_of(parent)
            )));
        }

        self.detach(child);
        self.views[parent].children.push(child);
        self.views[child].parent = Some(parent);
        self.mark_needs_layout(child);
        Ok(())
    }

    /// Detach `child` from its parent. The view stays in the arena.
    pub fn remove(&mut self, child: ViewId) -> Result<()> {
        self.get(child)?;
        if let Some(parent) = self.detach(child) {
            self.mark_needs_layout(parent);
        }
        Ok(())
    }

    /// Drop `id` and its whole subtree from the arena.
    pub fn destroy(&mut self, id: ViewId) -> Result<()> {
        self.get(id)?;
        if id == self.root {
            return Err(LayoutError::InvalidArgument("the root view cannot be destroyed".into()));
        }
        if let Some(parent) = self.detach(id) {
            self.mark_needs_layout(parent);
        }

        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(view) = self.views.remove(next) {
                stack.extend(view.children);
            }
        }
        Ok(())
    }

    fn detach(&mut self, child: ViewId) -> Option<ViewId> {
        let parent = self.views.get_mut(child)?.parent.take()?;
        if let Some(view) = self.views.get_mut(parent) {
            view.children.retain(|c| *c != child);
        }
        Some(parent)
    }

    pub fn parent(&self, id: ViewId) -> Option<ViewId> {
        self.views.get(id).and_then(|view| view.parent)
    }

    pub fn children(&self, id: ViewId) -> &[ViewId] {
        self.views.get(id).map(|view| view.children.as_slice()).unwrap_or(&[])
    }

    /// True when `ancestor` is a strict ancestor of `of`.
    pub fn is_ancestor(&self, ancestor: ViewId, of: ViewId) -> bool {
        let mut next = self.parent(of);
        while let Some(current) = next {
            if current == ancestor {
                return true;
            }
            next = self.parent(current);
        }
        false
    }

    /// The outermost ancestor of `id` (itself when detached).
    pub fn top_ancestor(&self, id: ViewId) -> ViewId {
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current
    }

    // =========================================================================
    // Expression setters
    // =========================================================================

    pub fn set_x(&mut self, id: ViewId, x: Pos) -> Result<()> {
        x.validate()?;
        self.get_mut(id)?.x = x;
        self.mark_needs_layout(id);
        Ok(())
    }

    pub fn set_y(&mut self, id: ViewId, y: Pos) -> Result<()> {
        y.validate()?;
        self.get_mut(id)?.y = y;
        self.mark_needs_layout(id);
        Ok(())
    }

    pub fn set_width(&mut self, id: ViewId, width: Dim) -> Result<()> {
        width.validate()?;
        self.check_fixed_dim(id, &width)?;
        self.get_mut(id)?.width = width;
        self.mark_needs_layout(id);
        Ok(())
    }

    pub fn set_height(&mut self, id: ViewId, height: Dim) -> Result<()> {
        height.validate()?;
        self.check_fixed_dim(id, &height)?;
        self.get_mut(id)?.height = height;
        self.mark_needs_layout(id);
        Ok(())
    }

    /// Set all four expressions at once, validating every one first.
    pub fn set_layout(&mut self, id: ViewId, x: Pos, y: Pos, width: Dim, height: Dim) -> Result<()> {
        x.validate()?;
        y.validate()?;
        width.validate()?;
        height.validate()?;
        self.check_fixed_dim(id, &width)?;
        self.check_fixed_dim(id, &height)?;

        let view = self.get_mut(id)?;
        view.x = x;
        view.y = y;
        view.width = width;
        view.height = height;
        self.mark_needs_layout(id);
        Ok(())
    }

    // Auto-size owns the extent; an explicit non-zero absolute would be
    // silently overridden, so it is refused instead.
    fn check_fixed_dim(&self, id: ViewId, dim: &Dim) -> Result<()> {
        let view = self.get(id)?;
        if view.auto_size() && dim.as_absolute().is_some_and(|n| n > 0) {
            return Err(LayoutError::InvalidConfiguration {
                view: view.name.clone(),
                reason: "cannot set an absolute dimension while auto-size is enabled",
            });
        }
        Ok(())
    }

    /// Enable or disable auto-size.
    ///
    /// Enabling fails while either dimension is a non-zero `Absolute`.
    pub fn set_auto_size(&mut self, id: ViewId, enabled: bool) -> Result<()> {
        let view = self.get(id)?;
        if enabled == view.auto_size() {
            return Ok(());
        }
        let fixed = |dim: &Dim| dim.as_absolute().is_some_and(|n| n > 0);
        if enabled && (fixed(&view.width) || fixed(&view.height)) {
            return Err(LayoutError::InvalidConfiguration {
                view: view.name.clone(),
                reason: "cannot enable auto-size while an absolute dimension is set",
            });
        }

        self.get_mut(id)?.flags.set(ViewFlags::AUTO_SIZE, enabled);
        self.mark_needs_layout(id);
        Ok(())
    }

    /// Replace the text payload. Only auto-size views need a new pass.
    pub fn set_text(&mut self, id: ViewId, text: impl Into<String>) -> Result<()> {
        let view = self.get_mut(id)?;
        view.text = text.into();
        if view.auto_size() {
            self.mark_needs_layout(id);
        }
        Ok(())
    }

    pub fn set_name(&mut self, id: ViewId, name: impl Into<String>) -> Result<()> {
        self.get_mut(id)?.name = name.into();
        Ok(())
    }

    pub fn set_thickness(&mut self, id: ViewId, kind: AdornmentKind, thickness: Thickness) -> Result<()> {
        if thickness.is_negative() {
            return Err(LayoutError::InvalidArgument(format!(
                "{kind:?} thickness must not be negative: {thickness:?}"
            )));
        }
        let view = self.get_mut(id)?;
        view.adornments.set_thickness(kind, thickness);
        let size = view.frame.size();
        view.adornments.relayout(size);
        self.mark_needs_layout(id);
        Ok(())
    }

    // =========================================================================
    // Frame setters
    // =========================================================================

    /// Assign a frame directly.
    ///
    /// The expressions become `Absolute` copies of the rect, so the next pass
    /// reproduces it exactly.
    pub fn set_frame(&mut self, id: ViewId, frame: Rect) -> Result<()> {
        if frame.width < 0 || frame.height < 0 {
            return Err(LayoutError::InvalidArgument(format!("frame size must not be negative: {frame:?}")));
        }
        let view = self.get(id)?;
        if view.auto_size() {
            return Err(LayoutError::InvalidConfiguration {
                view: view.name.clone(),
                reason: "cannot assign a frame while auto-size is enabled",
            });
        }

        let view = self.get_mut(id)?;
        view.x = Pos::Absolute(frame.x);
        view.y = Pos::Absolute(frame.y);
        view.width = Dim::Absolute(frame.width);
        view.height = Dim::Absolute(frame.height);
        view.flags.insert(ViewFlags::LAID_OUT);
        self.commit_frame(id, frame);
        self.mark_needs_layout(id);
        Ok(())
    }

    /// Size the frame so the content area is exactly `size`.
    pub fn set_content_size(&mut self, id: ViewId, size: Size) -> Result<()> {
        if size.width < 0 || size.height < 0 {
            return Err(LayoutError::InvalidArgument(format!("content size must not be negative: {size:?}")));
        }
        let view = self.get(id)?;
        let total = view.adornments.total_thickness();
        let frame = Rect::new(
            view.frame.x,
            view.frame.y,
            size.width + total.horizontal(),
            size.height + total.vertical(),
        );
        self.set_frame(id, frame)
    }

    /// Like [`ViewTree::set_content_size`], but takes a rect.
    ///
    /// Content space always starts at `(0, 0)`; any other origin is rejected.
    pub fn set_content_rect(&mut self, id: ViewId, rect: Rect) -> Result<()> {
        if rect.x != 0 || rect.y != 0 {
            return Err(LayoutError::InvalidArgument(format!(
                "content rect must start at the origin, got ({}, {})",
                rect.x, rect.y
            )));
        }
        self.set_content_size(id, rect.size())
    }

    /// Store a new frame and re-establish the adornment stack under it.
    pub(crate) fn commit_frame(&mut self, id: ViewId, frame: Rect) {
        if let Some(view) = self.views.get_mut(id) {
            view.frame = frame;
            view.adornments.relayout(frame.size());
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Resolved frame in the parent's content space.
    pub fn frame(&self, id: ViewId) -> Result<Rect> {
        let view = self.get(id)?;
        self.note_unresolved_read(view);
        Ok(view.frame)
    }

    /// Content area at the origin of the view's content space.
    pub fn content_rect(&self, id: ViewId) -> Result<Rect> {
        let view = self.get(id)?;
        self.note_unresolved_read(view);
        Ok(view.content_rect())
    }

    pub fn adornments(&self, id: ViewId) -> Result<&Adornments> {
        Ok(&self.get(id)?.adornments)
    }

    pub fn needs_layout(&self, id: ViewId) -> bool {
        self.views.get(id).is_some_and(View::needs_layout)
    }

    pub fn is_laid_out(&self, id: ViewId) -> bool {
        self.views.get(id).is_some_and(View::is_laid_out)
    }

    fn note_unresolved_read(&self, view: &View) {
        if self.config.warn_unresolved_reads && !view.is_laid_out() {
            log::debug!("geometry of \"{}\" read before it was laid out", view.name);
        }
    }

    // =========================================================================
    // Dirty flag
    // =========================================================================

    /// Mark `id` as needing layout.
    ///
    /// The mark goes down to every descendant (their measurements are stale)
    /// and up through the ancestors (so a pass started higher up reaches
    /// this subtree). The upward walk stops at the first ancestor that is
    /// already marked: every mark goes all the way up, so its ancestors are
    /// marked too.
    pub fn set_needs_layout(&mut self, id: ViewId) -> Result<()> {
        self.get(id)?;
        self.mark_needs_layout(id);
        Ok(())
    }

    pub(crate) fn mark_needs_layout(&mut self, id: ViewId) {
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(view) = self.views.get_mut(next) {
                view.flags.insert(ViewFlags::NEEDS_LAYOUT);
                stack.extend(view.children.iter().copied());
            }
        }

        let mut next = self.parent(id);
        while let Some(current) = next {
            let Some(view) = self.views.get_mut(current) else { break };
            if view.needs_layout() {
                break;
            }
            view.flags.insert(ViewFlags::NEEDS_LAYOUT);
            next = view.parent;
        }
    }

    pub(crate) fn clear_needs_layout(&mut self, id: ViewId) {
        if let Some(view) = self.views.get_mut(id) {
            view.flags.remove(ViewFlags::NEEDS_LAYOUT);
        }
    }

    // =========================================================================
    // Layout events
    // =========================================================================

    /// Subscribe to "layout started". Returns cleanup function.
    pub fn on_layout_started<F>(&self, handler: F) -> impl FnOnce() + use<F>
    where
        F: Fn(&LayoutEvent) + 'static,
    {
        self.events.subscribe(Phase::Started, handler)
    }

    /// Subscribe to "layout completed". Returns cleanup function.
    pub fn on_layout_completed<F>(&self, handler: F) -> impl FnOnce() + use<F>
    where
        F: Fn(&LayoutEvent) + 'static,
    {
        self.events.subscribe(Phase::Completed, handler)
    }

    /// Drop every layout observer.
    pub fn clear_layout_observers(&self) {
        self.events.clear();
    }
}

// =============================================================================
// Tests
// =============================================================================

//! Relative Layout Resolver
//!
//! Turns a view's expressions into a frame, then walks down the tree.
//!
//! # Algorithm
//!
//! For each axis independently, with `available` the container's extent:
//!
//! 1. **Provisional extent**: the `Dim` evaluated with the view at location 0
//! 2. **Location**: the `Pos` evaluated against the provisional extent
//! 3. **Final extent**: the `Dim` evaluated again at the resolved location
//!
//! Auto-size views clamp steps 1 and 3 up to the measured extent. A measured
//! extent of 0 means "no content" and collapses the axis to 0.
//!
//! # Passes
//!
//! `layout_subviews` resolves a view's children in dependency order (see
//! [`super::graph`]), recursing into each one right after it is resolved.
//! References to ancestors further up than the parent are replayed at the
//! end, against the ancestor's frame. Siblings reading a replayed view are
//! then resolved again, in the same order, so the level ends consistent.

use super::graph::{collect_edges, layout_order, Edge, LayoutOrder};
use super::text_measure::TextMeasure;
use crate::error::Result;
use crate::events::{LayoutEvent, Phase};
use crate::expr::{Dim, Pos};
use crate::tree::ViewTree;
use crate::types::Rect;
use crate::view::{ViewFlags, ViewId};

impl ViewTree {
    /// Lay out the whole tree: the root against the screen extent, then
    /// everything below it.
    ///
    /// A no-op when the root is clean and the screen extent gives it the
    /// same frame. Otherwise one "layout started" / "layout completed" pair
    /// fires at the root, around the root's own resize.
    pub fn layout<M>(&mut self, measure: &M) -> Result<()>
    where
        M: TextMeasure + ?Sized,
    {
        let root = self.root;
        let screen = Rect::from_size(self.screen_size());
        let frame = self.relative_frame(root, screen, measure)?;

        let view = self.get(root)?;
        if frame == view.frame && !view.needs_layout() {
            return Ok(());
        }

        self.run_pass(root, |tree| {
            tree.commit_relative_frame(root, frame);
            tree.layout_level(root, measure)
        })
    }

    /// Recompute `id`'s frame inside a container rect.
    ///
    /// Only the container's size is used: content space always starts at
    /// the origin. Returns whether the frame changed; a changed frame marks
    /// the view (and so its subtree and ancestors) as needing layout.
    pub fn set_relative_layout<M>(&mut self, id: ViewId, container: Rect, measure: &M) -> Result<bool>
    where
        M: TextMeasure + ?Sized,
    {
        let frame = self.relative_frame(id, container, measure)?;
        Ok(self.commit_relative_frame(id, frame))
    }

    fn relative_frame<M>(&self, id: ViewId, container: Rect, measure: &M) -> Result<Rect>
    where
        M: TextMeasure + ?Sized,
    {
        let view = self.get(id)?;
        let available = container.size().clamped();
        let measured = view.auto_size().then(|| measure.measure(view, available));

        let (x, width) = self.resolve_axis(&view.x, &view.width, available.width, measured.map(|m| m.width))?;
        let (y, height) = self.resolve_axis(&view.y, &view.height, available.height, measured.map(|m| m.height))?;
        Ok(Rect::new(x, y, width, height))
    }

    fn commit_relative_frame(&mut self, id: ViewId, frame: Rect) -> bool {
        let Some(view) = self.views.get_mut(id) else {
            return false;
        };
        view.flags.insert(ViewFlags::LAID_OUT);

        let changed = frame != view.frame;
        if changed {
            log::trace!("\"{}\" frame {:?} -> {:?}", view.name, view.frame, frame);
            self.commit_frame(id, frame);
            self.mark_needs_layout(id);
        }
        changed
    }

    fn resolve_axis(&self, pos: &Pos, dim: &Dim, available: i32, measured: Option<i32>) -> Result<(i32, i32)> {
        let fit = |extent: i32| match measured {
            Some(0) => 0,
            Some(content) => extent.max(content),
            None => extent,
        };

        let provisional = fit(dim.calculate(0, available, self)?);
        let location = pos.calculate(available, provisional, self)?;
        let extent = fit(dim.calculate(location, available, self)?);
        Ok((location, extent))
    }

    /// Lay out everything below `id`.
    ///
    /// A no-op when `id` does not need layout. Otherwise fires "layout
    /// started", resolves the subtree and fires "layout completed". A graph
    /// error aborts the pass; frames already committed stay committed and
    /// "layout completed" is not fired.
    pub fn layout_subviews<M>(&mut self, id: ViewId, measure: &M) -> Result<()>
    where
        M: TextMeasure + ?Sized,
    {
        if !self.get(id)?.needs_layout() {
            return Ok(());
        }
        self.run_pass(id, |tree| tree.layout_level(id, measure))
    }

    /// Bracket one public pass with its events.
    fn run_pass<F>(&mut self, id: ViewId, pass: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        let event = LayoutEvent { view: id, old_content: self.get(id)?.content_rect() };
        self.events.emit(Phase::Started, &event);

        match pass(self) {
            Ok(()) => {
                self.events.emit(Phase::Completed, &event);
                Ok(())
            }
            Err(err) => {
                log::warn!("layout of \"{}\" aborted: {err}", self.name_of(id));
                Err(err)
            }
        }
    }

    fn layout_level<M>(&mut self, id: ViewId, measure: &M) -> Result<()>
    where
        M: TextMeasure + ?Sized,
    {
        if !self.needs_layout(id) {
            return Ok(());
        }

        let content = self.get(id)?.content_rect();
        let LayoutOrder { order, deferred } = layout_order(self, id)?;

        for &child in &order {
            self.set_relative_layout(child, content, measure)?;
            self.layout_level(child, measure)?;
        }

        let mut moved = Vec::new();
        for &Edge { from, to } in &deferred {
            let space = Rect::from_size(self.get(from)?.frame.size());
            log::debug!(
                "\"{}\" anchored to ancestor \"{}\", re-resolving in {:?}",
                self.name_of(to),
                self.name_of(from),
                space
            );
            if self.set_relative_layout(to, space, measure)? && !moved.contains(&to) {
                moved.push(to);
            }
            self.layout_level(to, measure)?;
        }

        if !moved.is_empty() {
            self.reflow_dependents(id, &order, &deferred, moved, content, measure)?;
        }

        self.clear_needs_layout(id);
        Ok(())
    }

    /// Resolve again every child of `parent` that reads, directly or
    /// through other siblings, a view in `moved`. `order` is topological, so
    /// a single sweep reaches every transitive dependent.
    fn reflow_dependents<M>(
        &mut self,
        parent: ViewId,
        order: &[ViewId],
        deferred: &[Edge],
        mut moved: Vec<ViewId>,
        content: Rect,
        measure: &M,
    ) -> Result<()>
    where
        M: TextMeasure + ?Sized,
    {
        let edges = collect_edges(self, parent)?;

        for &child in order {
            if moved.contains(&child) {
                continue;
            }
            let stale = edges.iter().any(|edge| edge.to == child && moved.contains(&edge.from));
            if !stale {
                continue;
            }

            // Views anchored to an ancestor keep resolving in its space.
            let space = match deferred.iter().rev().find(|edge| edge.to == child) {
                Some(edge) => Rect::from_size(self.get(edge.from)?.frame.size()),
                None => content,
            };
            if self.set_relative_layout(child, space, measure)? {
                moved.push(child);
            }
            self.layout_level(child, measure)?;
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use super::*;
    use crate::adornment::AdornmentKind;
    use crate::config::LayoutConfig;
    use crate::error::LayoutError;
    use crate::layout::{CellMeasure, string_width};
    use crate::types::{Size, Thickness};
    use crate::view::View;

    fn setup() -> ViewTree {
        ViewTree::with_config(LayoutConfig::with_screen(80, 24))
    }

    #[test]
    fn test_root_fills_screen() {
        let mut tree = setup();
        tree.layout(&CellMeasure).unwrap();
        assert_eq!(tree.frame(tree.root()), Ok(Rect::new(0, 0, 80, 24)));
        assert!(!tree.needs_layout(tree.root()));
    }

    #[test]
    fn test_center_and_fill() {
        let mut tree = ViewTree::with_config(LayoutConfig::with_screen(100, 30));
        let root = tree.root();
        let label = tree.add_new(root, "label").unwrap();
        tree.set_layout(label, Pos::center(), Pos::at(0), Dim::sized(4), Dim::sized(1)).unwrap();
        let body = tree.add_new(root, "body").unwrap();
        tree.set_layout(body, Pos::at(10), Pos::at(2), Dim::fill(0), Dim::fill(1)).unwrap();

        tree.layout(&CellMeasure).unwrap();
        assert_eq!(tree.frame(label), Ok(Rect::new(48, 0, 4, 1)));
        assert_eq!(tree.frame(body), Ok(Rect::new(10, 2, 90, 27)));
    }

    #[test]
    fn test_set_frame_survives_layout() {
        let mut tree = setup();
        let a = tree.add_new(tree.root(), "a").unwrap();
        tree.set_frame(a, Rect::new(3, 4, 20, 5)).unwrap();

        tree.layout(&CellMeasure).unwrap();
        assert_eq!(tree.frame(a), Ok(Rect::new(3, 4, 20, 5)));
    }

    #[test]
    fn test_sibling_reference() {
        let mut tree = setup();
        let root = tree.root();
        let b = tree.add_new(root, "b").unwrap();
        let a = tree.add_new(root, "a").unwrap();
        tree.set_layout(b, Pos::right(a) + 1, Pos::bottom(a), Dim::width(a), Dim::sized(1)).unwrap();
        tree.set_layout(a, Pos::at(2), Pos::at(1), Dim::sized(10), Dim::sized(3)).unwrap();

        tree.layout(&CellMeasure).unwrap();
        assert_eq!(tree.frame(b), Ok(Rect::new(13, 4, 10, 1)));

        // Changing the referent re-flows the dependent on the next pass.
        tree.set_width(a, Dim::sized(20)).unwrap();
        tree.layout(&CellMeasure).unwrap();
        assert_eq!(tree.frame(b), Ok(Rect::new(23, 4, 20, 1)));
    }

    #[test]
    fn test_sizes_never_negative() {
        let mut tree = setup();
        let a = tree.add_new(tree.root(), "a").unwrap();
        tree.set_layout(a, Pos::anchor_end(0), Pos::at(0), Dim::sized(5) - 20, Dim::fill(100)).unwrap();

        tree.layout(&CellMeasure).unwrap();
        assert_eq!(tree.frame(a), Ok(Rect::new(80, 0, 0, 0)));
    }

    #[test]
    fn test_auto_size_raises_to_content() {
        let mut tree = setup();
        let root = tree.root();
        let natural = tree.add_new(root, "natural").unwrap();
        tree.set_auto_size(natural, true).unwrap();
        tree.set_text(natural, "hello").unwrap();

        let wide = tree.add_new(root, "wide").unwrap();
        tree.set_width(wide, Dim::fill(0)).unwrap();
        tree.set_auto_size(wide, true).unwrap();
        tree.set_text(wide, "hello").unwrap();

        tree.layout(&CellMeasure).unwrap();
        assert_eq!(tree.frame(natural).unwrap().size(), Size::new(5, 1));
        // Content narrower than the expression never lowers it.
        assert_eq!(tree.frame(wide).unwrap().size(), Size::new(80, 1));
    }

    #[test]
    fn test_auto_size_collapses_without_content() {
        let mut tree = setup();
        let a = tree.add_new(tree.root(), "a").unwrap();
        tree.set_width(a, Dim::fill(0)).unwrap();
        tree.set_auto_size(a, true).unwrap();
        tree.set_thickness(a, AdornmentKind::Margin, Thickness::uniform(1)).unwrap();

        tree.layout(&CellMeasure).unwrap();
        assert_eq!(tree.frame(a).unwrap().size(), Size::ZERO);

        tree.set_text(a, "x").unwrap();
        tree.layout(&CellMeasure).unwrap();
        assert_eq!(tree.frame(a).unwrap().size(), Size::new(80, 3));
    }

    #[test]
    fn test_closure_measure() {
        let mut tree = setup();
        let a = tree.add_new(tree.root(), "a").unwrap();
        tree.set_auto_size(a, true).unwrap();
        tree.set_text(a, "abc").unwrap();

        let measure = |view: &View, _: Size| Size::new(string_width(view.text()) as i32 * 2, 2);
        tree.layout(&measure).unwrap();
        assert_eq!(tree.frame(a).unwrap().size(), Size::new(6, 2));
    }

    #[test]
    fn test_content_rect_follows_adornments() {
        let mut tree = setup();
        let a = tree.add_new(tree.root(), "a").unwrap();
        tree.set_layout(a, Pos::at(0), Pos::at(0), Dim::fill(0), Dim::fill(0)).unwrap();
        tree.set_thickness(a, AdornmentKind::Margin, Thickness::uniform(1)).unwrap();
        tree.set_thickness(a, AdornmentKind::Border, Thickness::uniform(1)).unwrap();
        tree.set_thickness(a, AdornmentKind::Padding, Thickness::new(2, 0, 2, 0)).unwrap();

        tree.layout(&CellMeasure).unwrap();
        let adornments = tree.adornments(a).unwrap();
        assert_eq!(adornments.margin().frame(), Rect::new(0, 0, 80, 24));
        assert_eq!(adornments.border().frame(), Rect::new(1, 1, 78, 22));
        assert_eq!(adornments.padding().frame(), Rect::new(2, 2, 76, 20));
        assert_eq!(tree.content_rect(a), Ok(Rect::new(0, 0, 72, 20)));
    }

    #[test]
    fn test_children_resolve_in_parent_content() {
        let mut tree = setup();
        let root = tree.root();
        let outer = tree.add_new(root, "outer").unwrap();
        tree.set_frame(outer, Rect::new(0, 0, 20, 10)).unwrap();
        tree.set_thickness(outer, AdornmentKind::Border, Thickness::uniform(1)).unwrap();
        let inner = tree.add_new(outer, "inner").unwrap();
        tree.set_layout(inner, Pos::anchor_end(0), Pos::at(0), Dim::sized(4), Dim::fill(0)).unwrap();

        tree.layout(&CellMeasure).unwrap();
        assert_eq!(tree.frame(inner), Ok(Rect::new(14, 0, 4, 8)));
    }

    #[test]
    fn test_ancestor_reference_uses_ancestor_space() {
        let mut tree = setup();
        let root = tree.root();
        let outer = tree.add_new(root, "outer").unwrap();
        tree.set_frame(outer, Rect::new(0, 0, 40, 10)).unwrap();
        let middle = tree.add_new(outer, "middle").unwrap();
        tree.set_frame(middle, Rect::new(2, 2, 10, 5)).unwrap();
        let inner = tree.add_new(middle, "inner").unwrap();
        tree.set_layout(inner, Pos::center() + Pos::left(outer), Pos::at(0), Dim::sized(4), Dim::sized(1))
            .unwrap();

        tree.layout(&CellMeasure).unwrap();
        assert_eq!(tree.frame(inner), Ok(Rect::new(18, 0, 4, 1)));
        assert!(!tree.needs_layout(inner));
        assert!(!tree.needs_layout(root));
    }

    #[test]
    fn test_siblings_follow_ancestor_anchored_view() {
        let mut tree = setup();
        let root = tree.root();
        let outer = tree.add_new(root, "outer").unwrap();
        tree.set_frame(outer, Rect::new(0, 0, 40, 10)).unwrap();
        let middle = tree.add_new(outer, "middle").unwrap();
        tree.set_frame(middle, Rect::new(2, 2, 10, 5)).unwrap();

        let follower = tree.add_new(middle, "follower").unwrap();
        let under = tree.add_new(middle, "under").unwrap();
        let inner = tree.add_new(middle, "inner").unwrap();
        tree.set_layout(follower, Pos::right(inner), Pos::at(0), Dim::sized(2), Dim::sized(1)).unwrap();
        tree.set_layout(under, Pos::left(follower), Pos::at(1), Dim::width(inner), Dim::sized(1)).unwrap();
        tree.set_layout(inner, Pos::center() + Pos::left(outer), Pos::at(0), Dim::sized(4), Dim::sized(1))
            .unwrap();

        tree.layout(&CellMeasure).unwrap();
        assert_eq!(tree.frame(inner), Ok(Rect::new(18, 0, 4, 1)));
        assert_eq!(tree.frame(follower), Ok(Rect::new(22, 0, 2, 1)));
        assert_eq!(tree.frame(under), Ok(Rect::new(22, 1, 4, 1)));

        // A clean second pass keeps the same frames.
        tree.set_needs_layout(root).unwrap();
        tree.layout(&CellMeasure).unwrap();
        assert_eq!(tree.frame(follower), Ok(Rect::new(22, 0, 2, 1)));
    }

    #[test]
    fn test_second_pass_is_stable() {
        let mut tree = setup();
        let root = tree.root();
        let a = tree.add_new(root, "a").unwrap();
        let b = tree.add_new(root, "b").unwrap();
        tree.set_layout(a, Pos::percent(25.0), Pos::center(), Dim::percent(50.0), Dim::sized(3)).unwrap();
        tree.set_layout(b, Pos::left(a), Pos::bottom(a), Dim::fill(0), Dim::height(a)).unwrap();

        tree.layout(&CellMeasure).unwrap();
        let first = (tree.frame(a).unwrap(), tree.frame(b).unwrap());
        for id in [root, a, b] {
            assert!(!tree.needs_layout(id));
            assert!(tree.is_laid_out(id));
        }

        tree.set_needs_layout(root).unwrap();
        tree.layout(&CellMeasure).unwrap();
        assert_eq!((tree.frame(a).unwrap(), tree.frame(b).unwrap()), first);
        assert_eq!(first.0, Rect::new(20, 10, 40, 3));
        assert_eq!(first.1, Rect::new(20, 13, 60, 3));
    }

    #[test]
    fn test_events_fire_once_per_pass() {
        let mut tree = setup();
        let started = Rc::new(Cell::new(0));
        let completed = Rc::new(RefCell::new(Vec::new()));

        let s = started.clone();
        let _stop_started = tree.on_layout_started(move |_| s.set(s.get() + 1));
        let c = completed.clone();
        let stop_completed = tree.on_layout_completed(move |event| c.borrow_mut().push(*event));

        tree.layout(&CellMeasure).unwrap();
        assert_eq!(started.get(), 1);
        assert_eq!(completed.borrow().len(), 1);
        assert_eq!(completed.borrow()[0].view, tree.root());
        // Snapshot taken before the root was first sized.
        assert_eq!(completed.borrow()[0].old_content, Rect::ZERO);

        // Nothing dirty: no pass, no events.
        tree.layout(&CellMeasure).unwrap();
        assert_eq!(started.get(), 1);

        stop_completed();
        tree.set_needs_layout(tree.root()).unwrap();
        tree.layout(&CellMeasure).unwrap();
        assert_eq!(started.get(), 2);
        assert_eq!(completed.borrow().len(), 1);
    }

    #[test]
    fn test_screen_resize_reports_previous_content() {
        let mut tree = setup();
        tree.layout(&CellMeasure).unwrap();

        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        let _stop = tree.on_layout_started(move |event| s.borrow_mut().push(event.old_content));

        // Clean tree, same screen: nothing to do.
        tree.layout(&CellMeasure).unwrap();
        assert!(seen.borrow().is_empty());

        tree.config.screen = Some(Size::new(100, 30));
        tree.layout(&CellMeasure).unwrap();
        assert_eq!(*seen.borrow(), vec![Rect::new(0, 0, 80, 24)]);
        assert_eq!(tree.frame(tree.root()), Ok(Rect::new(0, 0, 100, 30)));
    }

    #[test]
    fn test_failed_pass_skips_completed() {
        let mut tree = setup();
        let root = tree.root();
        let ok = tree.add_new(root, "ok").unwrap();
        tree.set_frame(ok, Rect::new(1, 1, 2, 2)).unwrap();
        let broken = tree.add_new(root, "broken").unwrap();
        let stray = tree.create("stray");
        tree.set_x(broken, Pos::right(stray)).unwrap();

        let started = Rc::new(Cell::new(0));
        let completed = Rc::new(Cell::new(0));
        let s = started.clone();
        let _a = tree.on_layout_started(move |_| s.set(s.get() + 1));
        let c = completed.clone();
        let _b = tree.on_layout_completed(move |_| c.set(c.get() + 1));

        let err = tree.layout(&CellMeasure).unwrap_err();
        assert!(matches!(err, LayoutError::Unattached { .. }));
        assert_eq!(started.get(), 1);
        assert_eq!(completed.get(), 0);
        assert!(tree.needs_layout(root));

        assert_eq!(tree.frame(ok), Ok(Rect::new(1, 1, 2, 2)));
        assert_eq!(tree.frame(broken), Ok(Rect::ZERO));
        assert!(!tree.is_laid_out(broken));
    }

    #[test]
    fn test_failure_below_keeps_earlier_siblings() {
        let mut tree = setup();
        let root = tree.root();
        let first = tree.add_new(root, "first").unwrap();
        tree.set_layout(first, Pos::at(2), Pos::at(1), Dim::sized(5), Dim::sized(2)).unwrap();
        let panel = tree.add_new(root, "panel").unwrap();
        tree.set_layout(panel, Pos::at(0), Pos::bottom(first), Dim::fill(0), Dim::fill(0)).unwrap();
        let inside = tree.add_new(panel, "inside").unwrap();
        tree.set_width(inside, Dim::sized(3)).unwrap();
        let broken = tree.add_new(panel, "broken").unwrap();
        let stray = tree.create("stray");
        tree.set_x(broken, Pos::right(stray)).unwrap();

        let err = tree.layout(&CellMeasure).unwrap_err();
        assert_eq!(
            err,
            LayoutError::Unattached {
                dependent: "broken".into(),
                target: "stray".into(),
                parent: "panel".into(),
            }
        );

        // Resolved before the failing level, left committed.
        assert_eq!(tree.frame(first), Ok(Rect::new(2, 1, 5, 2)));
        assert_eq!(tree.frame(panel), Ok(Rect::new(0, 3, 80, 21)));
        assert!(tree.is_laid_out(panel));

        // The failing level never got to its children.
        for id in [inside, broken] {
            assert_eq!(tree.frame(id), Ok(Rect::ZERO));
            assert!(!tree.is_laid_out(id));
        }
        assert!(tree.needs_layout(panel));
        assert!(tree.needs_layout(root));
    }

    #[test]
    fn test_dangling_reference_aborts() {
        let mut tree = setup();
        let root = tree.root();
        let a = tree.add_new(root, "a").unwrap();
        let gone = tree.add_new(root, "gone").unwrap();
        tree.set_y(a, Pos::bottom(gone)).unwrap();
        tree.destroy(gone).unwrap();

        assert!(matches!(tree.layout(&CellMeasure), Err(LayoutError::Dangling { .. })));
    }

    #[test]
    fn test_detached_view_lays_out_against_container() {
        let mut tree = setup();
        let lone = tree.create("lone");
        tree.set_layout(lone, Pos::center(), Pos::center(), Dim::sized(2), Dim::sized(2)).unwrap();

        let changed = tree.set_relative_layout(lone, Rect::new(5, 5, 10, 10), &CellMeasure).unwrap();
        assert!(changed);
        assert_eq!(tree.frame(lone), Ok(Rect::new(4, 4, 2, 2)));
        assert!(!tree.set_relative_layout(lone, Rect::new(0, 0, 10, 10), &CellMeasure).unwrap());
    }
}

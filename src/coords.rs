//! Coordinate Transform
//!
//! Three spaces per view:
//!
//! - **content**: origin at the top-left of the content area (inside padding)
//! - **frame**: origin at the top-left of the view's frame (outside margin)
//! - **screen**: origin at the top-left of the root's parent space
//!
//! A view's frame lives in its parent's content space, so going up one level
//! adds the view's frame origin and then the parent's content offset.
//! Everything here reads the current frames and mutates nothing.

use crate::adornment::AdornmentKind;
use crate::error::Result;
use crate::tree::ViewTree;
use crate::types::{Point, Rect};
use crate::view::ViewId;

impl ViewTree {
    /// Screen position of the content origin of `parent`, or `(0, 0)` for a
    /// parentless view.
    fn content_origin_on_screen(&self, parent: Option<ViewId>) -> Result<Point> {
        let mut origin = Point::ZERO;
        let mut next = parent;
        while let Some(id) = next {
            let view = self.get(id)?;
            origin = origin.offset(view.frame.location()).offset(view.content_offset());
            next = view.parent;
        }
        Ok(origin)
    }

    /// Map a rect in `id`'s content space to screen space, optionally
    /// clipped to the visible screen.
    pub fn content_to_screen(&self, id: ViewId, rect: Rect, clamp: bool) -> Result<Rect> {
        let view = self.get(id)?;
        let origin = self
            .content_origin_on_screen(view.parent)?
            .offset(view.frame.location())
            .offset(view.content_offset());

        let screen = rect.offset(origin);
        Ok(if clamp { self.clamp_to_screen(screen) } else { screen })
    }

    /// `id`'s frame in screen space.
    pub fn frame_to_screen(&self, id: ViewId) -> Result<Rect> {
        let view = self.get(id)?;
        Ok(view.frame.offset(self.content_origin_on_screen(view.parent)?))
    }

    /// Map a screen point into `id`'s frame space.
    pub fn screen_to_frame(&self, id: ViewId, point: Point) -> Result<Point> {
        let view = self.get(id)?;
        let in_parent = match view.parent {
            Some(parent) => self.screen_to_content(parent, point)?,
            None => point,
        };
        Ok(in_parent.offset_back(view.frame.location()))
    }

    /// Map a screen point into `id`'s content space.
    pub fn screen_to_content(&self, id: ViewId, point: Point) -> Result<Point> {
        let offset = self.get(id)?.content_offset();
        Ok(self.screen_to_frame(id, point)?.offset_back(offset))
    }

    /// An adornment's frame in screen space.
    pub fn adornment_to_screen(&self, id: ViewId, kind: AdornmentKind) -> Result<Rect> {
        let frame = self.get(id)?.adornments.get(kind).frame();
        let origin = self.frame_to_screen(id)?.location();
        Ok(frame.offset(origin))
    }

    /// Map a screen point into an adornment's own space.
    pub fn screen_to_adornment(&self, id: ViewId, kind: AdornmentKind, point: Point) -> Result<Point> {
        let offset = self.get(id)?.adornments.get(kind).frame().location();
        Ok(self.screen_to_frame(id, point)?.offset_back(offset))
    }

    /// The deepest view under a screen point, later siblings first.
    pub fn view_at(&self, point: Point) -> Option<ViewId> {
        let mut current = self.root;
        if !self.frame_to_screen(current).ok()?.contains(point) {
            return None;
        }

        loop {
            let local = self.screen_to_content(current, point).ok()?;
            let hit = self.children(current).iter().rev().copied().find(|child| {
                self.views.get(*child).is_some_and(|view| view.frame.contains(local))
            });
            match hit {
                Some(child) => current = child,
                None => return Some(current),
            }
        }
    }

    /// Clip a screen rect to the visible screen.
    pub fn clamp_to_screen(&self, rect: Rect) -> Rect {
        let screen = self.screen_size();
        let x = rect.x.clamp(0, screen.width.max(0));
        let y = rect.y.clamp(0, screen.height.max(0));
        let right = rect.right().clamp(x, screen.width.max(x));
        let bottom = rect.bottom().clamp(y, screen.height.max(y));
        Rect::new(x, y, right - x, bottom - y)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::layout::CellMeasure;
    use crate::types::Thickness;

    /// root (80x24) > outer at (5,3) 40x12 with border 1 + padding (2,0,2,0)
    ///              > inner at (1,1) 10x4 with margin 1
    fn setup() -> (ViewTree, ViewId, ViewId) {
        let mut tree = ViewTree::with_config(LayoutConfig::with_screen(80, 24));
        let root = tree.root();
        let outer = tree.add_new(root, "outer").unwrap();
        tree.set_thickness(outer, AdornmentKind::Border, Thickness::uniform(1)).unwrap();
        tree.set_thickness(outer, AdornmentKind::Padding, Thickness::new(2, 0, 2, 0)).unwrap();
        tree.set_frame(outer, Rect::new(5, 3, 40, 12)).unwrap();

        let inner = tree.add_new(outer, "inner").unwrap();
        tree.set_thickness(inner, AdornmentKind::Margin, Thickness::uniform(1)).unwrap();
        tree.set_frame(inner, Rect::new(1, 1, 10, 4)).unwrap();

        tree.layout(&CellMeasure).unwrap();
        (tree, outer, inner)
    }

    #[test]
    fn test_frame_to_screen() {
        let (tree, outer, inner) = setup();
        assert_eq!(tree.frame_to_screen(outer), Ok(Rect::new(5, 3, 40, 12)));
        // outer content origin on screen: (5 + 1 + 2, 3 + 1) = (8, 4)
        assert_eq!(tree.frame_to_screen(inner), Ok(Rect::new(9, 5, 10, 4)));
    }

    #[test]
    fn test_content_to_screen() {
        let (tree, outer, inner) = setup();
        assert_eq!(tree.content_to_screen(outer, Rect::new(0, 0, 1, 1), false), Ok(Rect::new(8, 4, 1, 1)));
        assert_eq!(tree.content_to_screen(inner, Rect::new(2, 0, 3, 1), false), Ok(Rect::new(12, 6, 3, 1)));
    }

    #[test]
    fn test_screen_round_trip() {
        let (tree, outer, inner) = setup();
        for id in [outer, inner] {
            let rect = Rect::new(3, 2, 1, 1);
            let screen = tree.content_to_screen(id, rect, false).unwrap();
            assert_eq!(tree.screen_to_content(id, screen.location()), Ok(rect.location()));

            let frame = tree.frame_to_screen(id).unwrap();
            assert_eq!(tree.screen_to_frame(id, frame.location()), Ok(Point::ZERO));
        }
    }

    #[test]
    fn test_adornment_delegates_to_owner() {
        let (tree, outer, _) = setup();
        assert_eq!(tree.adornment_to_screen(outer, AdornmentKind::Margin), Ok(Rect::new(5, 3, 40, 12)));
        assert_eq!(tree.adornment_to_screen(outer, AdornmentKind::Border), Ok(Rect::new(5, 3, 40, 12)));
        assert_eq!(tree.adornment_to_screen(outer, AdornmentKind::Padding), Ok(Rect::new(6, 4, 38, 10)));
        assert_eq!(
            tree.screen_to_adornment(outer, AdornmentKind::Padding, Point::new(6, 4)),
            Ok(Point::ZERO)
        );
    }

    #[test]
    fn test_clamp_to_screen() {
        let (tree, _, inner) = setup();
        let clipped = tree.content_to_screen(inner, Rect::new(-20, 0, 100, 2), true).unwrap();
        assert_eq!(clipped, Rect::new(0, 6, 80, 2));
        assert_eq!(tree.clamp_to_screen(Rect::new(90, 30, 5, 5)), Rect::new(80, 24, 0, 0));
    }

    #[test]
    fn test_view_at() {
        let (tree, outer, inner) = setup();
        assert_eq!(tree.view_at(Point::new(0, 0)), Some(tree.root()));
        assert_eq!(tree.view_at(Point::new(6, 4)), Some(outer));
        assert_eq!(tree.view_at(Point::new(10, 6)), Some(inner));
        assert_eq!(tree.view_at(Point::new(80, 0)), None);
    }
}

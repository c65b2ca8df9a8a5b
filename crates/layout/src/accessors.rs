//! Convenience coordinate accessors.
//!
//! Read/write projections onto a view's frame for use after a pass. Moving a
//! view also records its declared origin, which overlay containers honor on
//! the next pass; stack containers overwrite the position.

use crate::node::ViewId;
use crate::tree::ViewTree;
use common::error::{LayoutError, LayoutResult};
use common::geometry::{Point, Rect, Size};

impl ViewTree {
    fn frame_of(&self, id: ViewId) -> Option<Rect> {
        self.get(id).map(|v| v.frame)
    }

    pub fn origin(&self, id: ViewId) -> Option<Point> {
        self.frame_of(id).map(|f| f.origin())
    }

    pub fn set_origin(&mut self, id: ViewId, origin: Point) -> LayoutResult<()> {
        let view = self.node_mut(id)?;
        let margins = view.constraints.margins();
        view.frame.x = origin.x;
        view.frame.y = origin.y;
        view.declared_origin = Point::new(origin.x - margins.left, origin.y - margins.top);
        Ok(())
    }

    pub fn x(&self, id: ViewId) -> Option<f32> {
        self.frame_of(id).map(|f| f.x)
    }

    pub fn set_x(&mut self, id: ViewId, x: f32) -> LayoutResult<()> {
        let y = self.node(id)?.frame.y;
        self.set_origin(id, Point::new(x, y))
    }

    pub fn y(&self, id: ViewId) -> Option<f32> {
        self.frame_of(id).map(|f| f.y)
    }

    pub fn set_y(&mut self, id: ViewId, y: f32) -> LayoutResult<()> {
        let x = self.node(id)?.frame.x;
        self.set_origin(id, Point::new(x, y))
    }

    pub fn size(&self, id: ViewId) -> Option<Size> {
        self.frame_of(id).map(|f| f.size())
    }

    pub fn set_size(&mut self, id: ViewId, size: Size) -> LayoutResult<()> {
        let view = self.node_mut(id)?;
        view.frame.width = size.width;
        view.frame.height = size.height;
        Ok(())
    }

    pub fn width(&self, id: ViewId) -> Option<f32> {
        self.frame_of(id).map(|f| f.width)
    }

    pub fn set_width(&mut self, id: ViewId, width: f32) -> LayoutResult<()> {
        self.node_mut(id)?.frame.width = width;
        Ok(())
    }

    pub fn height(&self, id: ViewId) -> Option<f32> {
        self.frame_of(id).map(|f| f.height)
    }

    pub fn set_height(&mut self, id: ViewId, height: f32) -> LayoutResult<()> {
        self.node_mut(id)?.frame.height = height;
        Ok(())
    }

    pub fn right(&self, id: ViewId) -> Option<f32> {
        self.frame_of(id).map(|f| f.right())
    }

    /// Move the view so its right edge sits at `right`; the width is kept.
    pub fn set_right(&mut self, id: ViewId, right: f32) -> LayoutResult<()> {
        let width = self.node(id)?.frame.width;
        self.set_x(id, right - width)
    }

    pub fn bottom(&self, id: ViewId) -> Option<f32> {
        self.frame_of(id).map(|f| f.bottom())
    }

    /// Move the view so its bottom edge sits at `bottom`; the height is kept.
    pub fn set_bottom(&mut self, id: ViewId, bottom: f32) -> LayoutResult<()> {
        let height = self.node(id)?.frame.height;
        self.set_y(id, bottom - height)
    }

    fn superview_size(&self, id: ViewId) -> LayoutResult<Size> {
        let view = self.node(id)?;
        let parent = view
            .parent
            .ok_or_else(|| LayoutError::unknown_view(format!("superview of {}", view.label())))?;
        Ok(self.node(parent)?.frame.size())
    }

    pub fn center_horizontally_in_superview(&mut self, id: ViewId) -> LayoutResult<()> {
        let bounds = self.superview_size(id)?;
        let width = self.node(id)?.frame.width;
        self.set_x(id, (bounds.width - width) / 2.0)
    }

    pub fn center_vertically_in_superview(&mut self, id: ViewId) -> LayoutResult<()> {
        let bounds = self.superview_size(id)?;
        let height = self.node(id)?.frame.height;
        self.set_y(id, (bounds.height - height) / 2.0)
    }

    pub fn center_in_superview(&mut self, id: ViewId) -> LayoutResult<()> {
        self.center_horizontally_in_superview(id)?;
        self.center_vertically_in_superview(id)
    }
}

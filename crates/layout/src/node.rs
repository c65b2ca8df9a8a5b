//! View node representation.

use crate::constraints::ConstraintRecord;
use common::geometry::{Point, Rect, Size};
use slotmap::new_key_type;
use smallvec::SmallVec;

new_key_type! {
    /// Unique identifier for a view.
    pub struct ViewId;
}

/// How a view lays out its children.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Container {
    /// Children packed left to right.
    #[default]
    Horizontal,
    /// Children packed top to bottom.
    Vertical,
    /// Children placed at their declared origins, stacked in insertion order.
    Overlay,
}

impl Container {
    pub fn name(&self) -> &'static str {
        match self {
            Container::Horizontal => "horizontal",
            Container::Vertical => "vertical",
            Container::Overlay => "overlay",
        }
    }
}

/// A view in the view tree.
#[derive(Clone, Debug)]
pub struct ViewNode {
    /// Unique ID.
    pub id: ViewId,
    /// Layout constraints.
    pub constraints: ConstraintRecord,
    /// Layout strategy for the children.
    pub container: Container,
    /// Intrinsic content size supplied by the host for leaves.
    pub content_size: Size,
    /// Origin of the margin box inside an overlay parent.
    pub declared_origin: Point,
    /// Frame relative to the parent's bounds, written by arrange.
    pub frame: Rect,
    /// Parent view.
    pub parent: Option<ViewId>,
    /// Child views, in stack and z order.
    pub children: SmallVec<[ViewId; 8]>,
}

impl ViewNode {
    pub fn new(id: ViewId, container: Container) -> Self {
        Self {
            id,
            constraints: ConstraintRecord::default(),
            container,
            content_size: Size::ZERO,
            declared_origin: Point::ZERO,
            frame: Rect::ZERO,
            parent: None,
            children: SmallVec::new(),
        }
    }

    /// Create a leaf with a fixed intrinsic content size.
    pub fn leaf(id: ViewId, content_size: Size) -> Self {
        let mut node = Self::new(id, Container::default());
        node.content_size = content_size;
        node
    }

    /// Check if view has children.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Label used in diagnostics and error messages.
    pub fn label(&self) -> String {
        match self.constraints.debug_name() {
            Some(name) => name.to_string(),
            None => format!("{:?}", self.id),
        }
    }
}

//! View tree structure.

use crate::constraints::ConstraintRecord;
use crate::node::{Container, ViewId, ViewNode};
use common::error::{LayoutError, LayoutResult};
use common::geometry::{Point, Rect, Size};
use slotmap::SlotMap;

/// The view tree.
///
/// Owns every view; children are referenced by id in insertion order.
pub struct ViewTree {
    /// All views.
    views: SlotMap<ViewId, ViewNode>,
    /// Root view.
    root: Option<ViewId>,
}

impl ViewTree {
    pub fn new() -> Self {
        Self {
            views: SlotMap::with_key(),
            root: None,
        }
    }

    /// Get root view.
    pub fn root(&self) -> Option<ViewId> {
        self.root
    }

    /// Set root view.
    pub fn set_root(&mut self, id: ViewId) {
        self.root = Some(id);
    }

    /// Create a container view.
    pub fn create_view(&mut self, container: Container) -> ViewId {
        self.views
            .insert_with_key(|id| ViewNode::new(id, container))
    }

    /// Create a leaf view with the given intrinsic content size.
    pub fn create_leaf(&mut self, content_size: Size) -> ViewId {
        self.views
            .insert_with_key(|id| ViewNode::leaf(id, content_size))
    }

    /// Get a view by ID.
    pub fn get(&self, id: ViewId) -> Option<&ViewNode> {
        self.views.get(id)
    }

    /// Get a mutable view by ID.
    pub fn get_mut(&mut self, id: ViewId) -> Option<&mut ViewNode> {
        self.views.get_mut(id)
    }

    /// Get a view, failing with [`LayoutError::UnknownView`].
    pub fn node(&self, id: ViewId) -> LayoutResult<&ViewNode> {
        self.views
            .get(id)
            .ok_or_else(|| LayoutError::unknown_view(format!("{id:?}")))
    }

    pub(crate) fn node_mut(&mut self, id: ViewId) -> LayoutResult<&mut ViewNode> {
        self.views
            .get_mut(id)
            .ok_or_else(|| LayoutError::unknown_view(format!("{id:?}")))
    }

    pub fn constraints(&self, id: ViewId) -> LayoutResult<&ConstraintRecord> {
        Ok(&self.node(id)?.constraints)
    }

    /// Constraints of a view, for chained setters:
    /// `tree.constraints_mut(id)?.set_margin(4.0)?.with_stretch();`
    pub fn constraints_mut(&mut self, id: ViewId) -> LayoutResult<&mut ConstraintRecord> {
        Ok(&mut self.node_mut(id)?.constraints)
    }

    /// Update the intrinsic content size of a leaf.
    pub fn set_content_size(&mut self, id: ViewId, size: Size) -> LayoutResult<()> {
        self.node_mut(id)?.content_size = size;
        Ok(())
    }

    /// Append `child` to `parent`, detaching it from its previous parent.
    pub fn append_child(&mut self, parent: ViewId, child: ViewId) -> LayoutResult<()> {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` into `parent` before `reference`, or last when
    /// `reference` is `None` or not a child of `parent`.
    ///
    /// Fails if either view is unknown or if `child` is `parent` or one of
    /// its ancestors.
    pub fn insert_before(
        &mut self,
        parent: ViewId,
        child: ViewId,
        reference: Option<ViewId>,
    ) -> LayoutResult<()> {
        self.node(child)?;
        self.node(parent)?;
        if self.is_ancestor_or_self(child, parent) {
            return Err(LayoutError::cycle(
                self.node(parent)?.label(),
                self.node(child)?.label(),
            ));
        }

        self.detach(child);

        let parent_view = self.node_mut(parent)?;
        let pos = reference
            .and_then(|ref_id| parent_view.children.iter().position(|&id| id == ref_id))
            .unwrap_or(parent_view.children.len());
        parent_view.children.insert(pos, child);

        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// True when `ancestor` is `id` or lies on its parent chain.
    fn is_ancestor_or_self(&self, ancestor: ViewId, id: ViewId) -> bool {
        let mut current = Some(id);
        while let Some(view_id) = current {
            if view_id == ancestor {
                return true;
            }
            current = self.views.get(view_id).and_then(|v| v.parent);
        }
        false
    }

    /// Unlink a view from its parent's child list.
    fn detach(&mut self, id: ViewId) {
        let Some(parent_id) = self.views.get_mut(id).and_then(|v| v.parent.take()) else {
            return;
        };
        if let Some(parent) = self.views.get_mut(parent_id) {
            parent.children.retain(|child| *child != id);
        }
    }

    /// Remove view and its subtree.
    pub fn remove(&mut self, id: ViewId) {
        self.detach(id);

        let mut to_remove = vec![id];
        let mut i = 0;
        while i < to_remove.len() {
            if let Some(v) = self.views.get(to_remove[i]) {
                to_remove.extend(v.children.iter().copied());
            }
            i += 1;
        }

        for id in to_remove {
            self.views.remove(id);
        }

        if self.root == Some(id) {
            self.root = None;
        }
    }

    /// Get parent view.
    pub fn parent(&self, id: ViewId) -> Option<ViewId> {
        self.views.get(id).and_then(|v| v.parent)
    }

    /// Get children.
    pub fn children(&self, id: ViewId) -> impl Iterator<Item = ViewId> + '_ {
        self.views
            .get(id)
            .into_iter()
            .flat_map(|v| v.children.iter().copied())
    }

    /// Find a view by debug name.
    pub fn find_by_name(&self, name: &str) -> Option<ViewId> {
        self.views
            .iter()
            .find(|(_, v)| v.constraints.debug_name() == Some(name))
            .map(|(id, _)| id)
    }

    /// Get number of views.
    pub fn len(&self) -> usize {
        self.views.len()
    }

    /// Check if tree is empty.
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// Frame of a view in root coordinates.
    pub fn absolute_frame(&self, id: ViewId) -> Option<Rect> {
        let view = self.views.get(id)?;
        let mut frame = view.frame;
        let mut parent = view.parent;
        while let Some(parent_id) = parent {
            let parent_view = self.views.get(parent_id)?;
            frame = frame.translate(parent_view.frame.x, parent_view.frame.y);
            parent = parent_view.parent;
        }
        Some(frame)
    }

    /// Get the topmost view at a point in root coordinates.
    pub fn hit_test(&self, x: f32, y: f32) -> Option<ViewId> {
        self.root
            .and_then(|root| self.hit_test_view(root, Point::new(x, y)))
    }

    fn hit_test_view(&self, id: ViewId, point: Point) -> Option<ViewId> {
        let view = self.views.get(id)?;
        if !view.frame.contains_point(point) {
            return None;
        }

        let local = point - view.frame.origin();
        // Last child is on top
        for &child in view.children.iter().rev() {
            if let Some(hit) = self.hit_test_view(child, local) {
                return Some(hit);
            }
        }

        Some(id)
    }
}

impl Default for ViewTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Pre-order traversal yielding each view with its depth.
pub struct PreOrderIterator<'a> {
    tree: &'a ViewTree,
    stack: Vec<(ViewId, usize)>,
}

impl<'a> PreOrderIterator<'a> {
    pub fn new(tree: &'a ViewTree, start: ViewId) -> Self {
        Self {
            tree,
            stack: vec![(start, 0)],
        }
    }
}

impl<'a> Iterator for PreOrderIterator<'a> {
    type Item = (ViewId, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (id, depth) = self.stack.pop()?;
        if let Some(view) = self.tree.get(id) {
            for &child in view.children.iter().rev() {
                self.stack.push((child, depth + 1));
            }
        }
        Some((id, depth))
    }
}

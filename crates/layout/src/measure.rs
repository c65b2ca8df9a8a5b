//! Natural size measurement.

use crate::config::LayoutConfig;
use crate::constraints::DebugFlags;
use crate::node::{ViewId, ViewNode};
use crate::tree::ViewTree;
use common::error::{LayoutError, LayoutResult};
use common::geometry::Size;

/// Supplies the intrinsic content size of leaf views.
///
/// This is the only place layout reads host rendering state (text metrics,
/// image dimensions and so on).
pub trait ContentMeasurer {
    /// Intrinsic size of `view`'s content, given the size proposed by its parent.
    fn measure_content(&self, view: &ViewNode, proposed: Size) -> Size;
}

/// Reads the size the host stored in [`ViewNode::content_size`].
#[derive(Clone, Copy, Debug, Default)]
pub struct StoredContentSize;

impl ContentMeasurer for StoredContentSize {
    fn measure_content(&self, view: &ViewNode, _proposed: Size) -> Size {
        view.content_size
    }
}

impl<F> ContentMeasurer for F
where
    F: Fn(&ViewNode, Size) -> Size,
{
    fn measure_content(&self, view: &ViewNode, proposed: Size) -> Size {
        self(view, proposed)
    }
}

/// Read-only state shared by one measure or arrange pass.
pub struct LayoutContext<'a> {
    pub tree: &'a ViewTree,
    pub measurer: &'a dyn ContentMeasurer,
    pub config: &'a LayoutConfig,
}

impl<'a> LayoutContext<'a> {
    pub fn new(
        tree: &'a ViewTree,
        measurer: &'a dyn ContentMeasurer,
        config: &'a LayoutConfig,
    ) -> Self {
        Self {
            tree,
            measurer,
            config,
        }
    }

    /// Natural size of `id`, clamped to its own bounds.
    pub fn measure(&self, id: ViewId, proposed: Size) -> LayoutResult<Size> {
        let view = self.tree.node(id)?;
        let constraints = &view.constraints;

        let raw = if constraints.ignore_natural_size() {
            Size::ZERO
        } else if view.has_children() {
            view.container.strategy().measure(self, view, proposed)?
        } else {
            let content = self.measurer.measure_content(view, proposed);
            if !content.is_valid_extent() {
                return Err(LayoutError::invalid_content(
                    view.label(),
                    content.width,
                    content.height,
                ));
            }
            content
        };

        let natural = constraints.clamp(raw + constraints.desired_size_adjustment());

        if constraints.debug_flags().contains(DebugFlags::MIN_SIZE) {
            tracing::debug!(
                view = %view.label(),
                width = natural.width,
                height = natural.height,
                "measured natural size"
            );
        }

        Ok(natural)
    }
}

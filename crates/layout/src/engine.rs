//! Main layout engine.

use crate::config::LayoutConfig;
use crate::measure::{ContentMeasurer, LayoutContext, StoredContentSize};
use crate::node::{ViewId, ViewNode};
use crate::tree::ViewTree;
use common::error::{LayoutError, LayoutResult};
use common::geometry::{Axis, Rect, Size};

/// The layout engine.
///
/// A pass takes the tree by reference: `measure` borrows it shared and
/// `arrange` exclusively, so constraints cannot change mid-pass.
pub struct LayoutEngine<M: ContentMeasurer = StoredContentSize> {
    config: LayoutConfig,
    /// Intrinsic size provider for leaves.
    measurer: M,
}

impl LayoutEngine {
    pub fn new() -> Self {
        Self::with_config(LayoutConfig::default())
    }

    pub fn with_config(config: LayoutConfig) -> Self {
        Self {
            config,
            measurer: StoredContentSize,
        }
    }
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: ContentMeasurer> LayoutEngine<M> {
    /// Create an engine reading leaf sizes from `measurer`.
    pub fn with_measurer(config: LayoutConfig, measurer: M) -> Self {
        Self { config, measurer }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Natural size of the subtree rooted at `id`.
    pub fn measure(&self, tree: &ViewTree, id: ViewId, proposed: Size) -> LayoutResult<Size> {
        let cx = LayoutContext::new(tree, &self.measurer, &self.config);
        cx.measure(id, proposed)
    }

    /// Arrange the subtree rooted at `id` inside `allotted`.
    ///
    /// `allotted` is relative to the view's parent. The view's own size is
    /// clamped to its constraints, so its frame may exceed `allotted` when
    /// its minimum does.
    pub fn arrange(&self, tree: &mut ViewTree, id: ViewId, allotted: Rect) -> LayoutResult<()> {
        let span = tracing::debug_span!("arrange", ?id);
        let _enter = span.enter();
        self.arrange_view(tree, id, allotted)
    }

    /// Measure then arrange the tree's root at the origin of `viewport`.
    ///
    /// Returns the root's natural size.
    pub fn layout(&self, tree: &mut ViewTree, viewport: Rect) -> LayoutResult<Size> {
        let root = tree
            .root()
            .ok_or_else(|| LayoutError::unknown_view("root"))?;
        let natural = self.measure(tree, root, viewport.size())?;
        self.arrange(tree, root, viewport)?;
        tracing::debug!(
            width = natural.width,
            height = natural.height,
            "layout pass complete"
        );
        Ok(natural)
    }

    fn arrange_view(&self, tree: &mut ViewTree, id: ViewId, allotted: Rect) -> LayoutResult<()> {
        let (frame, placements) = {
            let view = tree.node(id)?;
            let constraints = &view.constraints;

            let width = checked_extent(view, Axis::Horizontal, allotted.width)?;
            let height = checked_extent(view, Axis::Vertical, allotted.height)?;
            let size = constraints.clamp(Size::new(width, height));
            let frame = Rect::from_origin_size(allotted.origin(), size);

            let cx = LayoutContext::new(tree, &self.measurer, &self.config);
            let placements = view.container.strategy().place_children(&cx, view, size)?;

            if constraints.debug_layout() {
                tracing::debug!(view = %view.label(), ?frame, "arranged");
            } else if self.config.trace_passes {
                tracing::trace!(view = %view.label(), ?frame, "arranged");
            }

            if size.width > allotted.width || size.height > allotted.height {
                tracing::trace!(
                    view = %view.label(),
                    ?allotted,
                    ?size,
                    "minimum size overflows allotted space"
                );
            }

            (frame, placements)
        };

        tree.node_mut(id)?.frame = frame;

        for (child, rect) in placements {
            self.arrange_view(tree, child, rect)?;
        }
        Ok(())
    }
}

/// Reject extents no constraint set can produce.
fn checked_extent(view: &ViewNode, axis: Axis, value: f32) -> LayoutResult<f32> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(LayoutError::invalid_extent(view.label(), axis.name(), value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::{HAlign, VAlign};
    use crate::node::Container;
    use common::geometry::Point;

    fn frame(tree: &ViewTree, id: ViewId) -> Rect {
        tree.get(id).unwrap().frame
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_overflow_packs_at_minimum() {
        let mut tree = ViewTree::new();
        let row = tree.create_view(Container::Horizontal);
        tree.set_root(row);
        tree.constraints_mut(row).unwrap().set_h_spacing(10.0).unwrap();

        let mut children = Vec::new();
        for _ in 0..3 {
            let child = tree.create_leaf(Size::ZERO);
            tree.constraints_mut(child).unwrap().set_min_width(100.0).unwrap();
            tree.append_child(row, child).unwrap();
            children.push(child);
        }

        let engine = LayoutEngine::new();
        engine
            .arrange(&mut tree, row, Rect::new(0.0, 0.0, 250.0, 40.0))
            .unwrap();

        let xs: Vec<f32> = children.iter().map(|&c| frame(&tree, c).x).collect();
        assert_eq!(xs, vec![0.0, 110.0, 220.0]);
        for &child in &children {
            assert_eq!(frame(&tree, child).width, 100.0);
        }
        let content_right = frame(&tree, children[2]).right();
        assert_eq!(content_right, 320.0);
        assert!(content_right > 250.0);
    }

    #[test]
    fn test_fixed_size_centered() {
        let mut tree = ViewTree::new();
        let container = tree.create_view(Container::Horizontal);
        let child = tree.create_leaf(Size::new(10.0, 10.0));
        tree.append_child(container, child).unwrap();
        tree.constraints_mut(child)
            .unwrap()
            .set_fixed_size(Size::new(50.0, 50.0))
            .unwrap()
            .set_h_align(HAlign::Center)
            .set_v_align(VAlign::Center);

        let engine = LayoutEngine::new();
        engine
            .arrange(&mut tree, container, Rect::new(0.0, 0.0, 200.0, 200.0))
            .unwrap();

        assert_eq!(frame(&tree, child), Rect::new(75.0, 75.0, 50.0, 50.0));
    }

    #[test]
    fn test_fixed_size_centered_in_vertical_stack() {
        let mut tree = ViewTree::new();
        let container = tree.create_view(Container::Vertical);
        let child = tree.create_leaf(Size::ZERO);
        tree.append_child(container, child).unwrap();
        tree.constraints_mut(child)
            .unwrap()
            .set_fixed_size(Size::new(50.0, 50.0))
            .unwrap()
            .set_h_align(HAlign::Center)
            .set_v_align(VAlign::Center);

        let engine = LayoutEngine::new();
        engine
            .arrange(&mut tree, container, Rect::new(0.0, 0.0, 200.0, 200.0))
            .unwrap();

        assert_eq!(frame(&tree, child), Rect::new(75.0, 75.0, 50.0, 50.0));
    }

    #[test]
    fn test_zero_weights_keep_natural_extent() {
        let mut tree = ViewTree::new();
        let column = tree.create_view(Container::Vertical);
        let a = tree.create_leaf(Size::new(30.0, 20.0));
        let b = tree.create_leaf(Size::new(30.0, 40.0));
        tree.append_child(column, a).unwrap();
        tree.append_child(column, b).unwrap();

        let engine = LayoutEngine::new();
        engine
            .arrange(&mut tree, column, Rect::new(0.0, 0.0, 100.0, 500.0))
            .unwrap();

        assert_eq!(frame(&tree, a), Rect::new(0.0, 0.0, 30.0, 20.0));
        assert_eq!(frame(&tree, b), Rect::new(0.0, 20.0, 30.0, 40.0));
    }

    #[test]
    fn test_proportional_growth_law() {
        let mut tree = ViewTree::new();
        let row = tree.create_view(Container::Horizontal);
        let a = tree.create_leaf(Size::new(20.0, 10.0));
        let b = tree.create_leaf(Size::new(10.0, 10.0));
        tree.constraints_mut(a).unwrap().set_h_stretch_weight(1.0).unwrap();
        tree.constraints_mut(b).unwrap().set_h_stretch_weight(2.0).unwrap();
        tree.append_child(row, a).unwrap();
        tree.append_child(row, b).unwrap();

        let engine = LayoutEngine::new();
        engine
            .arrange(&mut tree, row, Rect::new(0.0, 0.0, 120.0, 10.0))
            .unwrap();

        let extra_a = frame(&tree, a).width - 20.0;
        let extra_b = frame(&tree, b).width - 10.0;
        assert!(approx(extra_a, 30.0));
        assert!(approx(extra_b, 60.0));
        assert!(approx(extra_a / extra_b, 0.5));
        assert!(approx(frame(&tree, b).x, 50.0));
    }

    #[test]
    fn test_monotonic_in_allotted_extent() {
        let mut tree = ViewTree::new();
        let row = tree.create_view(Container::Horizontal);
        let fixed = tree.create_leaf(Size::new(40.0, 10.0));
        let stretchy = tree.create_leaf(Size::new(10.0, 10.0));
        tree.constraints_mut(stretchy).unwrap().with_stretch();
        tree.append_child(row, fixed).unwrap();
        tree.append_child(row, stretchy).unwrap();

        let engine = LayoutEngine::new();
        let mut previous = 0.0;
        for width in (50..400).step_by(25) {
            engine
                .arrange(&mut tree, row, Rect::new(0.0, 0.0, width as f32, 10.0))
                .unwrap();
            let current = frame(&tree, stretchy).width;
            assert!(current >= previous);
            previous = current;
        }
    }

    #[test]
    fn test_arrange_is_idempotent() {
        let mut tree = ViewTree::new();
        let root = tree.create_view(Container::Vertical);
        let header = tree.create_leaf(Size::new(80.0, 20.0));
        let body = tree.create_view(Container::Horizontal);
        let side = tree.create_leaf(Size::new(30.0, 30.0));
        let main = tree.create_leaf(Size::new(10.0, 10.0));
        let badge = tree.create_leaf(Size::new(8.0, 8.0));
        tree.set_root(root);
        tree.append_child(root, header).unwrap();
        tree.append_child(root, body).unwrap();
        tree.append_child(body, side).unwrap();
        tree.append_child(body, main).unwrap();
        tree.append_child(main, badge).unwrap();
        tree.constraints_mut(body).unwrap().with_stretch().set_spacing(4.0).unwrap();
        tree.constraints_mut(main).unwrap().with_pure_stretch().set_margin(3.0).unwrap();
        tree.get_mut(main).unwrap().container = Container::Overlay;
        tree.get_mut(badge).unwrap().declared_origin = Point::new(2.0, 2.0);

        let engine = LayoutEngine::new();
        let viewport = Rect::new(0.0, 0.0, 320.0, 240.0);
        engine.layout(&mut tree, viewport).unwrap();
        let first: Vec<Rect> = [root, header, body, side, main, badge]
            .iter()
            .map(|&id| frame(&tree, id))
            .collect();

        engine.layout(&mut tree, viewport).unwrap();
        let second: Vec<Rect> = [root, header, body, side, main, badge]
            .iter()
            .map(|&id| frame(&tree, id))
            .collect();

        assert_eq!(first, second);
        assert_eq!(frame(&tree, body), Rect::new(0.0, 20.0, 320.0, 220.0));
        assert_eq!(frame(&tree, main), Rect::new(37.0, 3.0, 280.0, 214.0));
        assert_eq!(frame(&tree, badge), Rect::new(2.0, 2.0, 8.0, 8.0));
    }

    #[test]
    fn test_root_frame_is_clamped() {
        let mut tree = ViewTree::new();
        let root = tree.create_view(Container::Vertical);
        tree.constraints_mut(root)
            .unwrap()
            .set_max_width(100.0)
            .unwrap()
            .set_min_height(300.0)
            .unwrap();

        let engine = LayoutEngine::new();
        engine
            .arrange(&mut tree, root, Rect::new(10.0, 10.0, 200.0, 200.0))
            .unwrap();
        assert_eq!(frame(&tree, root), Rect::new(10.0, 10.0, 100.0, 300.0));
    }

    #[test]
    fn test_invalid_allotted_rect_fails() {
        let mut tree = ViewTree::new();
        let root = tree.create_view(Container::Vertical);

        let engine = LayoutEngine::new();
        let err = engine
            .arrange(&mut tree, root, Rect::new(0.0, 0.0, -10.0, 10.0))
            .unwrap_err();
        assert!(matches!(err, LayoutError::InvalidExtent { axis: "width", .. }));

        let err = engine
            .arrange(&mut tree, root, Rect::new(0.0, 0.0, 10.0, f32::NAN))
            .unwrap_err();
        assert!(matches!(err, LayoutError::InvalidExtent { axis: "height", .. }));
    }

    #[test]
    fn test_measured_size_within_bounds() {
        let mut tree = ViewTree::new();
        let row = tree.create_view(Container::Horizontal);
        tree.constraints_mut(row)
            .unwrap()
            .set_min_width(50.0)
            .unwrap()
            .set_max_height(15.0)
            .unwrap();
        let leaf = tree.create_leaf(Size::new(20.0, 40.0));
        tree.append_child(row, leaf).unwrap();

        let engine = LayoutEngine::new();
        let size = engine.measure(&tree, row, Size::UNBOUNDED).unwrap();
        assert_eq!(size, Size::new(50.0, 15.0));
    }

    #[test]
    fn test_custom_measurer() {
        let mut tree = ViewTree::new();
        let root = tree.create_view(Container::Vertical);
        let text = tree.create_leaf(Size::ZERO);
        tree.set_root(root);
        tree.append_child(root, text).unwrap();

        // Wrap 1000 units of text into lines 20 high.
        let wrap = |_: &ViewNode, proposed: Size| {
            let width = proposed.width.min(1000.0);
            Size::new(width, (1000.0 / width).ceil() * 20.0)
        };
        let engine = LayoutEngine::with_measurer(LayoutConfig::default(), wrap);
        let natural = engine
            .layout(&mut tree, Rect::new(0.0, 0.0, 250.0, 500.0))
            .unwrap();

        assert_eq!(natural, Size::new(250.0, 80.0));
        assert_eq!(frame(&tree, text), Rect::new(0.0, 0.0, 250.0, 80.0));
    }

    #[test]
    fn test_verbose_pass_with_debug_flags() {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_test_writer()
            .try_init();

        let mut tree = ViewTree::new();
        let root = tree.create_view(Container::Horizontal);
        let leaf = tree.create_leaf(Size::new(30.0, 30.0));
        tree.set_root(root);
        tree.append_child(root, leaf).unwrap();
        tree.constraints_mut(root)
            .unwrap()
            .set_debug_name("root")
            .set_debug_layout(true);
        tree.constraints_mut(leaf)
            .unwrap()
            .set_debug_flags(crate::constraints::DebugFlags::all())
            .set_min_width(60.0)
            .unwrap();

        let engine = LayoutEngine::with_config(LayoutConfig::verbose());
        let natural = engine
            .layout(&mut tree, Rect::new(0.0, 0.0, 40.0, 40.0))
            .unwrap();
        assert_eq!(natural, Size::new(60.0, 30.0));
        assert_eq!(frame(&tree, leaf), Rect::new(0.0, 0.0, 60.0, 30.0));
    }

    #[test]
    fn test_layout_without_root_fails() {
        let mut tree = ViewTree::new();
        let engine = LayoutEngine::new();
        assert!(matches!(
            engine.layout(&mut tree, Rect::new(0.0, 0.0, 10.0, 10.0)),
            Err(LayoutError::UnknownView(_))
        ));
    }
}

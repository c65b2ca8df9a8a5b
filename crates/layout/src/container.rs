//! Container layout strategies.
//!
//! Every [`Container`] kind maps to a [`LayoutStrategy`] that knows how to
//! measure a view's children and where to put them inside the view's bounds.

use crate::constraints::{Alignment, ConstraintRecord};
use crate::distribute::{distribute, DistributionItem};
use crate::measure::LayoutContext;
use crate::node::{Container, ViewId, ViewNode};
use common::error::LayoutResult;
use common::geometry::{Axis, EdgeSizes, Point, Rect, Size};
use smallvec::SmallVec;

/// Child frames relative to the parent's bounds, in insertion order.
pub type Placements = SmallVec<[(ViewId, Rect); 8]>;

/// A way of laying out children.
pub trait LayoutStrategy {
    /// Natural size of `view`'s children, before `view`'s own clamp.
    fn measure(&self, cx: &LayoutContext<'_>, view: &ViewNode, proposed: Size) -> LayoutResult<Size>;

    /// Frames for `view`'s children within bounds of size `bounds`.
    fn place_children(
        &self,
        cx: &LayoutContext<'_>,
        view: &ViewNode,
        bounds: Size,
    ) -> LayoutResult<Placements>;
}

static HORIZONTAL_STACK: StackLayout = StackLayout::new(Axis::Horizontal);
static VERTICAL_STACK: StackLayout = StackLayout::new(Axis::Vertical);
static OVERLAY: OverlayLayout = OverlayLayout;

impl Container {
    /// Strategy implementing this container kind.
    pub fn strategy(&self) -> &'static dyn LayoutStrategy {
        match self {
            Container::Horizontal => &HORIZONTAL_STACK,
            Container::Vertical => &VERTICAL_STACK,
            Container::Overlay => &OVERLAY,
        }
    }
}

/// A measured child.
struct Cell {
    id: ViewId,
    margins: EdgeSizes,
    natural: Size,
}

fn measure_cells(cx: &LayoutContext<'_>, view: &ViewNode, proposed: Size) -> LayoutResult<Vec<Cell>> {
    view.children
        .iter()
        .map(|&id| {
            let margins = cx.tree.node(id)?.constraints.margins();
            let natural = cx.measure(id, proposed.deflate(margins))?;
            Ok(Cell {
                id,
                margins,
                natural,
            })
        })
        .collect()
}

/// A child's alignment along `axis`: its own explicit alignment, else the
/// container's, else the start edge.
fn child_alignment(container: &ViewNode, child: &ConstraintRecord, axis: Axis) -> Alignment {
    child
        .explicit_alignment_along(axis)
        .or_else(|| container.constraints.explicit_alignment_along(axis))
        .unwrap_or(Alignment::Start)
}

/// Children packed one after another along an axis.
#[derive(Clone, Copy, Debug)]
pub struct StackLayout {
    axis: Axis,
}

impl StackLayout {
    pub const fn new(axis: Axis) -> Self {
        Self { axis }
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Where the packed run sits when primary-axis space is left over.
    ///
    /// An explicit alignment on the container wins; otherwise an explicit
    /// alignment shared by every child; otherwise the start edge.
    fn run_alignment(&self, cx: &LayoutContext<'_>, view: &ViewNode) -> LayoutResult<Alignment> {
        if let Some(alignment) = view.constraints.explicit_alignment_along(self.axis) {
            return Ok(alignment);
        }

        let mut shared = None;
        for &child in &view.children {
            match (cx.tree.node(child)?.constraints.explicit_alignment_along(self.axis), shared) {
                (None, _) => return Ok(Alignment::Start),
                (Some(alignment), None) => shared = Some(alignment),
                (Some(alignment), Some(current)) if alignment != current => {
                    return Ok(Alignment::Start)
                }
                _ => {}
            }
        }
        Ok(shared.unwrap_or(Alignment::Start))
    }
}

impl LayoutStrategy for StackLayout {
    fn measure(&self, cx: &LayoutContext<'_>, view: &ViewNode, proposed: Size) -> LayoutResult<Size> {
        let axis = self.axis;
        let cross = axis.cross();
        let cells = measure_cells(cx, view, proposed)?;

        let spacing = view.constraints.spacing_along(axis);
        let gaps = cells.len().saturating_sub(1) as f32 * spacing;
        let main: f32 = cells
            .iter()
            .map(|c| c.natural.along(axis) + c.margins.along(axis))
            .sum::<f32>()
            + gaps;
        let cross_extent = cells
            .iter()
            .map(|c| c.natural.along(cross) + c.margins.along(cross))
            .fold(0.0f32, f32::max);

        Ok(Size::from_axes(axis, main, cross_extent))
    }

    fn place_children(
        &self,
        cx: &LayoutContext<'_>,
        view: &ViewNode,
        bounds: Size,
    ) -> LayoutResult<Placements> {
        let axis = self.axis;
        let cross = axis.cross();
        let cells = measure_cells(cx, view, bounds)?;
        if cells.is_empty() {
            return Ok(Placements::new());
        }

        let spacing = view.constraints.spacing_along(axis);
        let fixed: f32 = cells.iter().map(|c| c.margins.along(axis)).sum::<f32>()
            + (cells.len() - 1) as f32 * spacing;

        let mut items: SmallVec<[DistributionItem; 8]> = SmallVec::with_capacity(cells.len());
        for cell in &cells {
            let constraints = &cx.tree.node(cell.id)?.constraints;
            items.push(DistributionItem {
                natural: cell.natural.along(axis),
                min: constraints.min_along(axis),
                max: constraints.max_along(axis),
                weight: constraints.stretch_along(axis),
            });
        }

        let distribution = distribute(&items, bounds.along(axis) - fixed, cx.config);

        // Overflowing content packs from the start edge.
        let mut cursor = if distribution.leftover > cx.config.epsilon {
            self.run_alignment(cx, view)?
                .offset(distribution.leftover, 0.0)
        } else {
            0.0
        };

        let cross_extent = bounds.along(cross);
        let mut placements = Placements::with_capacity(cells.len());

        let positioning = view.constraints.cell_positioning();

        for (cell, &main_size) in cells.iter().zip(&distribution.sizes) {
            let constraints = &cx.tree.node(cell.id)?.constraints;
            let alignment = child_alignment(view, constraints, cross);
            let room = (cross_extent - cell.margins.along(cross)).max(0.0);
            let cell_size = Size::from_axes(axis, main_size, room);

            cursor += cell.margins.start(axis);
            let frame = match positioning.size_in_cell(cell.natural, cell_size) {
                Some(size) => {
                    let size = constraints.clamp(size);
                    let main_pos = cursor
                        + child_alignment(view, constraints, axis).offset(main_size, size.along(axis));
                    let cross_pos =
                        cell.margins.start(cross) + alignment.offset(room, size.along(cross));
                    Rect::from_axes(axis, main_pos, cross_pos, size.along(axis), size.along(cross))
                }
                None => {
                    let cross_size =
                        if alignment == Alignment::Fill || constraints.stretch_along(cross) > 0.0 {
                            constraints.clamp_along(cross, room)
                        } else {
                            constraints.clamp_along(cross, cell.natural.along(cross).min(room))
                        };
                    let cross_pos = cell.margins.start(cross)
                        + match alignment {
                            Alignment::Start | Alignment::Fill => 0.0,
                            Alignment::Center => (room - cross_size) / 2.0,
                            Alignment::End => room - cross_size,
                        };
                    Rect::from_axes(axis, cursor, cross_pos, main_size, cross_size)
                }
            };
            placements.push((cell.id, frame));
            cursor += main_size + cell.margins.end(axis) + spacing;
        }

        Ok(placements)
    }
}

/// Children placed independently at their declared origins.
#[derive(Clone, Copy, Debug, Default)]
pub struct OverlayLayout;

impl LayoutStrategy for OverlayLayout {
    fn measure(&self, cx: &LayoutContext<'_>, view: &ViewNode, proposed: Size) -> LayoutResult<Size> {
        let mut extent = Size::ZERO;
        for cell in measure_cells(cx, view, proposed)? {
            let origin = cx.tree.node(cell.id)?.declared_origin;
            let footprint = cell.natural + cell.margins.total_size();
            extent.width = extent.width.max(origin.x + footprint.width);
            extent.height = extent.height.max(origin.y + footprint.height);
        }
        Ok(extent)
    }

    fn place_children(
        &self,
        cx: &LayoutContext<'_>,
        view: &ViewNode,
        bounds: Size,
    ) -> LayoutResult<Placements> {
        let mut placements = Placements::with_capacity(view.children.len());
        let positioning = view.constraints.cell_positioning();

        for cell in measure_cells(cx, view, bounds)? {
            let child = cx.tree.node(cell.id)?;
            let constraints = &child.constraints;

            // The cell runs from the declared origin, inside the margins, to
            // the far edges of the bounds.
            let origin = Point::new(
                child.declared_origin.x + cell.margins.left,
                child.declared_origin.y + cell.margins.top,
            );
            let cell_size = Size::new(
                (bounds.width - origin.x - cell.margins.right).max(0.0),
                (bounds.height - origin.y - cell.margins.bottom).max(0.0),
            );

            let frame = match positioning.size_in_cell(cell.natural, cell_size) {
                Some(size) => {
                    let size = constraints.clamp(size);
                    let x = origin.x
                        + child_alignment(view, constraints, Axis::Horizontal)
                            .offset(cell_size.width, size.width);
                    let y = origin.y
                        + child_alignment(view, constraints, Axis::Vertical)
                            .offset(cell_size.height, size.height);
                    Rect::from_origin_size(Point::new(x, y), size)
                }
                None => {
                    let extent = |axis: Axis| {
                        let stretch = constraints.stretch_along(axis) > 0.0
                            || child_alignment(view, constraints, axis) == Alignment::Fill;
                        if stretch {
                            constraints.clamp_along(axis, cell_size.along(axis))
                        } else {
                            cell.natural.along(axis)
                        }
                    };
                    Rect::from_origin_size(
                        origin,
                        Size::new(extent(Axis::Horizontal), extent(Axis::Vertical)),
                    )
                }
            };
            placements.push((cell.id, frame));
        }

        Ok(placements)
    }
}

//! Layout diagnostics.

use crate::constraints::CellPositioning;
use crate::node::{ViewId, ViewNode};
use crate::tree::{PreOrderIterator, ViewTree};
use common::geometry::Rect;
use std::fmt::Write;

/// Indented dump of the subtree rooted at `id`.
///
/// Every view gets one line with its label, container kind and frame. Views
/// with `debug_layout` set get a second line listing their constraints.
pub fn layout_description(tree: &ViewTree, id: ViewId) -> String {
    let mut out = String::new();

    for (view_id, depth) in PreOrderIterator::new(tree, id) {
        let indent = "  ".repeat(depth);
        let Some(view) = tree.get(view_id) else {
            let _ = writeln!(out, "{indent}<unknown view {view_id:?}>");
            continue;
        };

        let kind = if view.has_children() {
            view.container.name()
        } else {
            "leaf"
        };
        let _ = writeln!(
            out,
            "{indent}{} [{kind}] frame={}",
            view.label(),
            format_rect(&view.frame)
        );

        if view.constraints.debug_layout() {
            let _ = writeln!(out, "{indent}  {}", describe_constraints(view));
        }
    }

    out
}

/// Emit [`layout_description`] at debug level.
pub fn log_layout(tree: &ViewTree, id: ViewId) {
    tracing::debug!("layout of {:?}:\n{}", id, layout_description(tree, id));
}

fn format_rect(rect: &Rect) -> String {
    format!("({}, {}, {}, {})", rect.x, rect.y, rect.width, rect.height)
}

fn describe_constraints(view: &ViewNode) -> String {
    let c = &view.constraints;
    let margins = c.margins();
    let mut line = format!(
        "min=({}, {}) max=({}, {}) stretch=({}, {}) margins=({}, {}, {}, {}) spacing=({}, {}) align=({:?}, {:?})",
        c.min_width(),
        c.min_height(),
        c.max_width(),
        c.max_height(),
        c.h_stretch_weight(),
        c.v_stretch_weight(),
        margins.top,
        margins.right,
        margins.bottom,
        margins.left,
        c.h_spacing(),
        c.v_spacing(),
        c.h_align(),
        c.v_align(),
    );
    if c.ignore_natural_size() {
        line.push_str(" ignore-natural-size");
    }
    if c.cell_positioning() != CellPositioning::Normal {
        let _ = write!(line, " cells={:?}", c.cell_positioning());
    }
    let adjustment = c.desired_size_adjustment();
    if adjustment.width > 0.0 || adjustment.height > 0.0 {
        let _ = write!(line, " adjust=({}, {})", adjustment.width, adjustment.height);
    }
    if view.content_size.width > 0.0 || view.content_size.height > 0.0 {
        let _ = write!(
            line,
            " content=({}, {})",
            view.content_size.width, view.content_size.height
        );
    }
    line
}

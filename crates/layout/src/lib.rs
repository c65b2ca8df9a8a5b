//! Box layout engine.
//!
//! Views carry [`ConstraintRecord`]s and live in a [`ViewTree`]. The
//! [`LayoutEngine`] measures a subtree's natural size bottom-up and arranges
//! frames top-down inside an allotted rectangle, using the stack or overlay
//! strategy of each container.
//!
//! ```ignore
//! let mut tree = ViewTree::new();
//! let row = tree.create_view(Container::Horizontal);
//! let label = tree.create_leaf(Size::new(80.0, 20.0));
//! tree.set_root(row);
//! tree.append_child(row, label)?;
//! tree.constraints_mut(label)?.set_margin(4.0)?.with_stretch();
//!
//! LayoutEngine::new().layout(&mut tree, Rect::new(0.0, 0.0, 320.0, 28.0))?;
//! ```

pub mod accessors;
pub mod config;
pub mod constraints;
pub mod container;
pub mod debug;
pub mod distribute;
pub mod engine;
pub mod measure;
pub mod node;
pub mod tree;

pub use common::{Axis, EdgeSizes, LayoutError, LayoutResult, Point, Rect, Size, ValidationError};
pub use config::LayoutConfig;
pub use constraints::{
    Alignment, CellPositioning, ConstraintRecord, DebugFlags, HAlign, VAlign,
    DEFAULT_STRETCH_WEIGHT, UNBOUNDED,
};
pub use container::{LayoutStrategy, OverlayLayout, StackLayout};
pub use debug::{layout_description, log_layout};
pub use engine::LayoutEngine;
pub use measure::{ContentMeasurer, LayoutContext, StoredContentSize};
pub use node::{Container, ViewId, ViewNode};
pub use tree::ViewTree;

//! Common types shared by the layout crates.

pub mod error;
pub mod geometry;

pub use error::{LayoutError, LayoutResult, ValidationError};
pub use geometry::{Axis, EdgeSizes, Point, Rect, Size};

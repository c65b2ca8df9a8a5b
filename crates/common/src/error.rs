//! Common error types.

use thiserror::Error;

/// A constraint setter received an out-of-range value.
///
/// The record that rejected the value is left unchanged.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f32 },

    #[error("{field} must be finite (got {value})")]
    NotFinite { field: &'static str, value: f32 },

    #[error("minimum {axis} {min} exceeds maximum {max}")]
    MinExceedsMax {
        axis: &'static str,
        min: f32,
        max: f32,
    },
}

impl ValidationError {
    pub fn negative(field: &'static str, value: f32) -> Self {
        Self::Negative { field, value }
    }

    pub fn not_finite(field: &'static str, value: f32) -> Self {
        Self::NotFinite { field, value }
    }

    pub fn min_exceeds_max(axis: &'static str, min: f32, max: f32) -> Self {
        Self::MinExceedsMax { axis, min, max }
    }
}

/// A measure or arrange pass hit an unsatisfiable geometry.
///
/// Views are identified by their debug label.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("view {view}: computed {axis} {value} is not a valid extent")]
    InvalidExtent {
        view: String,
        axis: &'static str,
        value: f32,
    },

    #[error("view {view}: content size {width}x{height} is not a valid extent")]
    InvalidContentSize {
        view: String,
        width: f32,
        height: f32,
    },

    #[error("unknown view: {0}")]
    UnknownView(String),

    #[error("cannot add view {child} under {parent}: it would become its own ancestor")]
    Cycle { parent: String, child: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

pub type LayoutResult<T> = Result<T, LayoutError>;

impl LayoutError {
    pub fn invalid_extent(view: impl Into<String>, axis: &'static str, value: f32) -> Self {
        Self::InvalidExtent {
            view: view.into(),
            axis,
            value,
        }
    }

    pub fn invalid_content(view: impl Into<String>, width: f32, height: f32) -> Self {
        Self::InvalidContentSize {
            view: view.into(),
            width,
            height,
        }
    }

    pub fn unknown_view(view: impl Into<String>) -> Self {
        Self::UnknownView(view.into())
    }

    pub fn cycle(parent: impl Into<String>, child: impl Into<String>) -> Self {
        Self::Cycle {
            parent: parent.into(),
            child: child.into(),
        }
    }
}

//! Per-view layout constraints.
//!
//! A [`ConstraintRecord`] is a plain value owned by its view. Every setter
//! validates its input and leaves the record untouched on failure, so a record
//! always satisfies `0 <= min <= max <= UNBOUNDED` on both axes.

use bitflags::bitflags;
use common::error::ValidationError;
use common::geometry::{Axis, EdgeSizes, Size};
use serde::{Deserialize, Serialize};

/// Maximum extent meaning "no upper bound".
pub const UNBOUNDED: f32 = f32::INFINITY;

/// Stretch weight applied by [`ConstraintRecord::with_stretch`].
pub const DEFAULT_STRETCH_WEIGHT: f32 = 1.0;

/// Horizontal alignment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HAlign {
    #[default]
    Left,
    Center,
    Right,
    Fill,
}

/// Vertical alignment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VAlign {
    #[default]
    Top,
    Center,
    Bottom,
    Fill,
}

/// Orientation-free alignment along one axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alignment {
    Start,
    Center,
    End,
    Fill,
}

impl Alignment {
    /// Offset of an item of extent `used` inside `available`.
    pub fn offset(self, available: f32, used: f32) -> f32 {
        let free = (available - used).max(0.0);
        match self {
            Alignment::Start | Alignment::Fill => 0.0,
            Alignment::Center => free / 2.0,
            Alignment::End => free,
        }
    }
}

impl From<HAlign> for Alignment {
    fn from(align: HAlign) -> Self {
        match align {
            HAlign::Left => Alignment::Start,
            HAlign::Center => Alignment::Center,
            HAlign::Right => Alignment::End,
            HAlign::Fill => Alignment::Fill,
        }
    }
}

impl From<VAlign> for Alignment {
    fn from(align: VAlign) -> Self {
        match align {
            VAlign::Top => Alignment::Start,
            VAlign::Center => Alignment::Center,
            VAlign::Bottom => Alignment::End,
            VAlign::Fill => Alignment::Fill,
        }
    }
}

/// How children of a container size themselves inside their layout cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellPositioning {
    /// Natural size, aligned within the cell.
    #[default]
    Normal,
    /// The whole cell.
    Fill,
    /// The natural aspect ratio, scaled to cover the cell.
    FillWithAspectRatio,
    /// The natural aspect ratio, scaled to fit inside the cell.
    FitWithAspectRatio,
}

impl CellPositioning {
    /// Size of a child with natural size `natural` in a cell of size `cell`,
    /// before clamping. `None` leaves sizing to the container's normal rules.
    ///
    /// Aspect modes fall back to filling the cell when the natural size is
    /// empty on either axis.
    pub fn size_in_cell(self, natural: Size, cell: Size) -> Option<Size> {
        let cover = match self {
            CellPositioning::Normal => return None,
            CellPositioning::Fill => return Some(cell),
            CellPositioning::FillWithAspectRatio => true,
            CellPositioning::FitWithAspectRatio => false,
        };
        if natural.width <= 0.0 || natural.height <= 0.0 {
            return Some(cell);
        }

        let sx = cell.width / natural.width;
        let sy = cell.height / natural.height;
        let scale = if cover { sx.max(sy) } else { sx.min(sy) };
        Some(Size::new(natural.width * scale, natural.height * scale))
    }
}

bitflags! {
    /// Diagnostics switches. Never affect geometry.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct DebugFlags: u8 {
        /// Include constraints in layout descriptions and log arranged frames.
        const LAYOUT = 1 << 0;
        /// Log every measured natural size.
        const MIN_SIZE = 1 << 1;
    }
}

/// Constraints of a single view.
///
/// Deserialized records go through the same checks as the setters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedRecord")]
pub struct ConstraintRecord {
    min_width: f32,
    #[serde(serialize_with = "unbounded::serialize")]
    max_width: f32,
    min_height: f32,
    #[serde(serialize_with = "unbounded::serialize")]
    max_height: f32,

    h_stretch_weight: f32,
    v_stretch_weight: f32,
    ignore_natural_size: bool,

    desired_width_adjustment: f32,
    desired_height_adjustment: f32,

    left_margin: f32,
    right_margin: f32,
    top_margin: f32,
    bottom_margin: f32,

    h_spacing: f32,
    v_spacing: f32,

    h_align: Option<HAlign>,
    v_align: Option<VAlign>,
    cell_positioning: CellPositioning,

    debug_name: Option<String>,
    debug_flags: DebugFlags,
}

impl Default for ConstraintRecord {
    fn default() -> Self {
        Self {
            min_width: 0.0,
            max_width: UNBOUNDED,
            min_height: 0.0,
            max_height: UNBOUNDED,
            h_stretch_weight: 0.0,
            v_stretch_weight: 0.0,
            ignore_natural_size: false,
            desired_width_adjustment: 0.0,
            desired_height_adjustment: 0.0,
            left_margin: 0.0,
            right_margin: 0.0,
            top_margin: 0.0,
            bottom_margin: 0.0,
            h_spacing: 0.0,
            v_spacing: 0.0,
            h_align: None,
            v_align: None,
            cell_positioning: CellPositioning::Normal,
            debug_name: None,
            debug_flags: DebugFlags::empty(),
        }
    }
}

/// Wire form of a [`ConstraintRecord`]. Missing fields take their defaults;
/// a missing or `null` maximum is unbounded.
#[derive(Default, Deserialize)]
#[serde(default)]
struct UncheckedRecord {
    min_width: f32,
    max_width: Option<f32>,
    min_height: f32,
    max_height: Option<f32>,
    h_stretch_weight: f32,
    v_stretch_weight: f32,
    ignore_natural_size: bool,
    desired_width_adjustment: f32,
    desired_height_adjustment: f32,
    left_margin: f32,
    right_margin: f32,
    top_margin: f32,
    bottom_margin: f32,
    h_spacing: f32,
    v_spacing: f32,
    h_align: Option<HAlign>,
    v_align: Option<VAlign>,
    cell_positioning: CellPositioning,
    debug_name: Option<String>,
    debug_flags: DebugFlags,
}

impl TryFrom<UncheckedRecord> for ConstraintRecord {
    type Error = ValidationError;

    fn try_from(raw: UncheckedRecord) -> Result<Self, Self::Error> {
        ConstraintRecord {
            min_width: raw.min_width,
            max_width: raw.max_width.unwrap_or(UNBOUNDED),
            min_height: raw.min_height,
            max_height: raw.max_height.unwrap_or(UNBOUNDED),
            h_stretch_weight: raw.h_stretch_weight,
            v_stretch_weight: raw.v_stretch_weight,
            ignore_natural_size: raw.ignore_natural_size,
            desired_width_adjustment: raw.desired_width_adjustment,
            desired_height_adjustment: raw.desired_height_adjustment,
            left_margin: raw.left_margin,
            right_margin: raw.right_margin,
            top_margin: raw.top_margin,
            bottom_margin: raw.bottom_margin,
            h_spacing: raw.h_spacing,
            v_spacing: raw.v_spacing,
            h_align: raw.h_align,
            v_align: raw.v_align,
            cell_positioning: raw.cell_positioning,
            debug_name: raw.debug_name,
            debug_flags: raw.debug_flags,
        }
        .validated()
    }
}

/// A finite, non-negative length.
fn length(field: &'static str, value: f32) -> Result<f32, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::not_finite(field, value));
    }
    if value < 0.0 {
        return Err(ValidationError::negative(field, value));
    }
    Ok(value)
}

/// A non-negative length that may be [`UNBOUNDED`].
fn max_length(field: &'static str, value: f32) -> Result<f32, ValidationError> {
    if value.is_nan() {
        return Err(ValidationError::not_finite(field, value));
    }
    if value < 0.0 {
        return Err(ValidationError::negative(field, value));
    }
    Ok(value)
}

fn ordered(axis: &'static str, min: f32, max: f32) -> Result<(), ValidationError> {
    if min > max {
        return Err(ValidationError::min_exceeds_max(axis, min, max));
    }
    Ok(())
}

impl ConstraintRecord {
    pub fn new() -> Self {
        Self::default()
    }

    // Size bounds.

    pub fn min_width(&self) -> f32 {
        self.min_width
    }

    pub fn set_min_width(&mut self, value: f32) -> Result<&mut Self, ValidationError> {
        let value = length("min width", value)?;
        ordered("width", value, self.max_width)?;
        self.min_width = value;
        Ok(self)
    }

    pub fn max_width(&self) -> f32 {
        self.max_width
    }

    pub fn set_max_width(&mut self, value: f32) -> Result<&mut Self, ValidationError> {
        let value = max_length("max width", value)?;
        ordered("width", self.min_width, value)?;
        self.max_width = value;
        Ok(self)
    }

    pub fn min_height(&self) -> f32 {
        self.min_height
    }

    pub fn set_min_height(&mut self, value: f32) -> Result<&mut Self, ValidationError> {
        let value = length("min height", value)?;
        ordered("height", value, self.max_height)?;
        self.min_height = value;
        Ok(self)
    }

    pub fn max_height(&self) -> f32 {
        self.max_height
    }

    pub fn set_max_height(&mut self, value: f32) -> Result<&mut Self, ValidationError> {
        let value = max_length("max height", value)?;
        ordered("height", self.min_height, value)?;
        self.max_height = value;
        Ok(self)
    }

    pub fn min_size(&self) -> Size {
        Size::new(self.min_width, self.min_height)
    }

    pub fn set_min_size(&mut self, size: Size) -> Result<&mut Self, ValidationError> {
        let width = length("min width", size.width)?;
        let height = length("min height", size.height)?;
        ordered("width", width, self.max_width)?;
        ordered("height", height, self.max_height)?;
        self.min_width = width;
        self.min_height = height;
        Ok(self)
    }

    pub fn max_size(&self) -> Size {
        Size::new(self.max_width, self.max_height)
    }

    pub fn set_max_size(&mut self, size: Size) -> Result<&mut Self, ValidationError> {
        let width = max_length("max width", size.width)?;
        let height = max_length("max height", size.height)?;
        ordered("width", self.min_width, width)?;
        ordered("height", self.min_height, height)?;
        self.max_width = width;
        self.max_height = height;
        Ok(self)
    }

    /// Pin the width: min and max both become `value`.
    pub fn set_fixed_width(&mut self, value: f32) -> Result<&mut Self, ValidationError> {
        let value = length("fixed width", value)?;
        self.min_width = value;
        self.max_width = value;
        Ok(self)
    }

    /// Pin the height: min and max both become `value`.
    pub fn set_fixed_height(&mut self, value: f32) -> Result<&mut Self, ValidationError> {
        let value = length("fixed height", value)?;
        self.min_height = value;
        self.max_height = value;
        Ok(self)
    }

    /// Pin both axes to `size`.
    pub fn set_fixed_size(&mut self, size: Size) -> Result<&mut Self, ValidationError> {
        let width = length("fixed width", size.width)?;
        let height = length("fixed height", size.height)?;
        self.min_width = width;
        self.max_width = width;
        self.min_height = height;
        self.max_height = height;
        Ok(self)
    }

    // Stretch.

    pub fn h_stretch_weight(&self) -> f32 {
        self.h_stretch_weight
    }

    pub fn set_h_stretch_weight(&mut self, value: f32) -> Result<&mut Self, ValidationError> {
        self.h_stretch_weight = length("horizontal stretch weight", value)?;
        Ok(self)
    }

    pub fn v_stretch_weight(&self) -> f32 {
        self.v_stretch_weight
    }

    pub fn set_v_stretch_weight(&mut self, value: f32) -> Result<&mut Self, ValidationError> {
        self.v_stretch_weight = length("vertical stretch weight", value)?;
        Ok(self)
    }

    pub fn set_stretch_weight(&mut self, value: f32) -> Result<&mut Self, ValidationError> {
        let value = length("stretch weight", value)?;
        self.h_stretch_weight = value;
        self.v_stretch_weight = value;
        Ok(self)
    }

    pub fn ignore_natural_size(&self) -> bool {
        self.ignore_natural_size
    }

    pub fn set_ignore_natural_size(&mut self, value: bool) -> &mut Self {
        self.ignore_natural_size = value;
        self
    }

    /// Stretch on both axes with the default weight.
    pub fn with_stretch(&mut self) -> &mut Self {
        self.h_stretch_weight = DEFAULT_STRETCH_WEIGHT;
        self.v_stretch_weight = DEFAULT_STRETCH_WEIGHT;
        self
    }

    /// Stretch on both axes and measure as zero before clamping.
    pub fn with_pure_stretch(&mut self) -> &mut Self {
        self.with_stretch().set_ignore_natural_size(true)
    }

    // Desired size adjustment.

    pub fn desired_size_adjustment(&self) -> Size {
        Size::new(self.desired_width_adjustment, self.desired_height_adjustment)
    }

    /// Extra extent added to the natural size before clamping.
    pub fn set_desired_size_adjustment(&mut self, size: Size) -> Result<&mut Self, ValidationError> {
        let width = length("desired width adjustment", size.width)?;
        let height = length("desired height adjustment", size.height)?;
        self.desired_width_adjustment = width;
        self.desired_height_adjustment = height;
        Ok(self)
    }

    // Margins.

    pub fn left_margin(&self) -> f32 {
        self.left_margin
    }

    pub fn set_left_margin(&mut self, value: f32) -> Result<&mut Self, ValidationError> {
        self.left_margin = length("left margin", value)?;
        Ok(self)
    }

    pub fn right_margin(&self) -> f32 {
        self.right_margin
    }

    pub fn set_right_margin(&mut self, value: f32) -> Result<&mut Self, ValidationError> {
        self.right_margin = length("right margin", value)?;
        Ok(self)
    }

    pub fn top_margin(&self) -> f32 {
        self.top_margin
    }

    pub fn set_top_margin(&mut self, value: f32) -> Result<&mut Self, ValidationError> {
        self.top_margin = length("top margin", value)?;
        Ok(self)
    }

    pub fn bottom_margin(&self) -> f32 {
        self.bottom_margin
    }

    pub fn set_bottom_margin(&mut self, value: f32) -> Result<&mut Self, ValidationError> {
        self.bottom_margin = length("bottom margin", value)?;
        Ok(self)
    }

    /// Left and right margins.
    pub fn set_h_margin(&mut self, value: f32) -> Result<&mut Self, ValidationError> {
        let value = length("horizontal margin", value)?;
        self.left_margin = value;
        self.right_margin = value;
        Ok(self)
    }

    /// Top and bottom margins.
    pub fn set_v_margin(&mut self, value: f32) -> Result<&mut Self, ValidationError> {
        let value = length("vertical margin", value)?;
        self.top_margin = value;
        self.bottom_margin = value;
        Ok(self)
    }

    pub fn set_margin(&mut self, value: f32) -> Result<&mut Self, ValidationError> {
        let value = length("margin", value)?;
        self.left_margin = value;
        self.right_margin = value;
        self.top_margin = value;
        self.bottom_margin = value;
        Ok(self)
    }

    pub fn margins(&self) -> EdgeSizes {
        EdgeSizes::new(
            self.top_margin,
            self.right_margin,
            self.bottom_margin,
            self.left_margin,
        )
    }

    // Spacing.

    pub fn h_spacing(&self) -> f32 {
        self.h_spacing
    }

    pub fn set_h_spacing(&mut self, value: f32) -> Result<&mut Self, ValidationError> {
        self.h_spacing = length("horizontal spacing", value)?;
        Ok(self)
    }

    pub fn v_spacing(&self) -> f32 {
        self.v_spacing
    }

    pub fn set_v_spacing(&mut self, value: f32) -> Result<&mut Self, ValidationError> {
        self.v_spacing = length("vertical spacing", value)?;
        Ok(self)
    }

    pub fn set_spacing(&mut self, value: f32) -> Result<&mut Self, ValidationError> {
        let value = length("spacing", value)?;
        self.h_spacing = value;
        self.v_spacing = value;
        Ok(self)
    }

    // Alignment.

    pub fn h_align(&self) -> HAlign {
        self.h_align.unwrap_or_default()
    }

    pub fn set_h_align(&mut self, value: HAlign) -> &mut Self {
        self.h_align = Some(value);
        self
    }

    pub fn v_align(&self) -> VAlign {
        self.v_align.unwrap_or_default()
    }

    pub fn set_v_align(&mut self, value: VAlign) -> &mut Self {
        self.v_align = Some(value);
        self
    }

    /// Sizing policy for this view's children within their cells.
    pub fn cell_positioning(&self) -> CellPositioning {
        self.cell_positioning
    }

    pub fn set_cell_positioning(&mut self, value: CellPositioning) -> &mut Self {
        self.cell_positioning = value;
        self
    }

    /// Forget any explicit alignment on both axes.
    pub fn clear_alignment(&mut self) -> &mut Self {
        self.h_align = None;
        self.v_align = None;
        self
    }

    // Diagnostics.

    pub fn debug_name(&self) -> Option<&str> {
        self.debug_name.as_deref()
    }

    pub fn set_debug_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.debug_name = Some(name.into());
        self
    }

    pub fn debug_layout(&self) -> bool {
        self.debug_flags.contains(DebugFlags::LAYOUT)
    }

    pub fn set_debug_layout(&mut self, value: bool) -> &mut Self {
        self.debug_flags.set(DebugFlags::LAYOUT, value);
        self
    }

    pub fn debug_flags(&self) -> DebugFlags {
        self.debug_flags
    }

    pub fn set_debug_flags(&mut self, flags: DebugFlags) -> &mut Self {
        self.debug_flags = flags;
        self
    }

    /// Re-check every field.
    pub fn validated(self) -> Result<Self, ValidationError> {
        length("min width", self.min_width)?;
        length("min height", self.min_height)?;
        max_length("max width", self.max_width)?;
        max_length("max height", self.max_height)?;
        ordered("width", self.min_width, self.max_width)?;
        ordered("height", self.min_height, self.max_height)?;
        length("horizontal stretch weight", self.h_stretch_weight)?;
        length("vertical stretch weight", self.v_stretch_weight)?;
        length("desired width adjustment", self.desired_width_adjustment)?;
        length("desired height adjustment", self.desired_height_adjustment)?;
        length("left margin", self.left_margin)?;
        length("right margin", self.right_margin)?;
        length("top margin", self.top_margin)?;
        length("bottom margin", self.bottom_margin)?;
        length("horizontal spacing", self.h_spacing)?;
        length("vertical spacing", self.v_spacing)?;
        Ok(self)
    }

    // Axis-relative views used by the layout strategies.

    pub(crate) fn min_along(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.min_width,
            Axis::Vertical => self.min_height,
        }
    }

    pub(crate) fn max_along(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.max_width,
            Axis::Vertical => self.max_height,
        }
    }

    pub(crate) fn stretch_along(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.h_stretch_weight,
            Axis::Vertical => self.v_stretch_weight,
        }
    }

    pub(crate) fn spacing_along(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.h_spacing,
            Axis::Vertical => self.v_spacing,
        }
    }

    pub(crate) fn explicit_alignment_along(&self, axis: Axis) -> Option<Alignment> {
        match axis {
            Axis::Horizontal => self.h_align.map(Alignment::from),
            Axis::Vertical => self.v_align.map(Alignment::from),
        }
    }

    /// Clamp `value` into `[min, max]` along `axis`. The minimum wins.
    pub(crate) fn clamp_along(&self, axis: Axis, value: f32) -> f32 {
        value.min(self.max_along(axis)).max(self.min_along(axis))
    }

    pub(crate) fn clamp(&self, size: Size) -> Size {
        Size::new(
            self.clamp_along(Axis::Horizontal, size.width),
            self.clamp_along(Axis::Vertical, size.height),
        )
    }
}

/// Serializes [`UNBOUNDED`] as `null`, since JSON has no infinity.
mod unbounded {
    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &f32, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_infinite() {
            serializer.serialize_none()
        } else {
            serializer.serialize_some(value)
        }
    }
}

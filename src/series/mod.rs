//! Series kinds and their translate/draw pipelines.
//!
//! Every kind implements [`SeriesKind`]; [`SeriesType`] is the serializable
//! tag used to build one from a JSON definition.

mod column_pyramid;
mod data;
mod line;
mod map;
mod stacking;

use std::any::Any;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::{AxisPair, FullTransformReason, GroupTransform, TransformMode, ValueExtremes};
use crate::error::ChartResult;
use crate::render::{PointAttribs, SeriesLayer};

pub use column_pyramid::{ColumnPyramidOptions, ColumnPyramidSeries, PyramidPoint};
pub use data::{XyPoint, parse_xy_data};
pub use line::{LinePoint, LineSeries, LineSeriesOptions};
pub use map::{MapSeries, MapSeriesOptions};
pub use stacking::{StackRegistry, StackTotals};

/// Chart-wide conditions of one redraw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedrawEnvironment {
    /// The plot area changed size since the last redraw.
    pub resizing: bool,
    /// The backend can scale and translate a retained group.
    pub hardware_transforms: bool,
}

impl Default for RedrawEnvironment {
    fn default() -> Self {
        Self {
            resizing: false,
            hardware_transforms: true,
        }
    }
}

/// Everything a series may read while translating.
#[derive(Debug, Clone, Copy)]
pub struct TranslateContext<'a> {
    pub environment: RedrawEnvironment,
    pub stacks: &'a StackRegistry,
}

/// What one `translate` pass did.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TranslateSummary {
    pub mode: TransformMode,
    pub reason: Option<FullTransformReason>,
    /// Entities whose pixel geometry was rebuilt.
    pub translated: usize,
    pub group: GroupTransform,
    pub stroke_width: f64,
}

impl TranslateSummary {
    #[must_use]
    pub fn full(translated: usize, reason: Option<FullTransformReason>, stroke_width: f64) -> Self {
        Self {
            mode: TransformMode::Full,
            reason,
            translated,
            group: GroupTransform::identity(),
            stroke_width,
        }
    }
}

/// Contract between the engine and one series.
///
/// The engine drives every series through the same redraw order:
/// `process_data`, x extremes, `prepare_values`, y extremes, `translate`,
/// `draw_points`.
pub trait SeriesKind: Any {
    fn id(&self) -> &str;

    fn series_type(&self) -> SeriesType;

    /// Rebuilds entities from raw data when needed and folds data-derived
    /// limits (such as `min_range`) into the axes.
    fn process_data(&mut self, axes: &mut AxisPair) -> ChartResult<()>;

    /// Data-space x range, used when the x axis has no explicit extremes.
    fn x_extremes(&self) -> Option<ValueExtremes>;

    /// Applies value strategies that depend on the visible x range and
    /// registers stack contributions.
    fn prepare_values(&mut self, _visible_x_min: Option<f64>, _stacks: &mut StackRegistry) {}

    /// Data-space y range after `prepare_values`.
    fn y_extremes(&self, stacks: &StackRegistry) -> Option<ValueExtremes>;

    fn translate(&mut self, axes: &AxisPair, context: TranslateContext<'_>) -> TranslateSummary;

    /// Scene update for the last translate.
    fn draw_points(&self) -> SeriesLayer;

    fn point_attribs(&self, index: usize) -> Option<PointAttribs>;

    fn point_count(&self) -> usize;

    /// Color-axis range of the series values, when it has one.
    fn value_extremes(&self) -> Option<ValueExtremes> {
        None
    }

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Serializable series tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesType {
    Map,
    ColumnPyramid,
    Line,
}

impl SeriesType {
    /// Builds a series of this type from its JSON definition (options plus
    /// `data`, and `mapData` for maps).
    pub fn build(self, id: &str, definition: &Value) -> ChartResult<Box<dyn SeriesKind>> {
        Ok(match self {
            Self::Map => Box::new(MapSeries::from_definition(id, definition)?),
            Self::ColumnPyramid => Box::new(ColumnPyramidSeries::from_definition(id, definition)?),
            Self::Line => Box::new(LineSeries::from_definition(id, definition)?),
        })
    }
}

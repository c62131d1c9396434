use std::any::Any;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::core::{
    AxisPair, ColumnMetrics, ColumnSlot, CompareOptions, GroupTransform, PyramidShape,
    PyramidSlice, ShapeType, ValueExtremes, ValueStrategy, column_metrics, pyramid_shape,
    value_extremes,
};
use crate::error::{ChartError, ChartResult};
use crate::render::{Color, DrawInstruction, GroupAttributes, LabelAnchor, PointAttribs, SeriesLayer};

use super::data::{closest_point_range, definition_data};
use super::{
    SeriesKind, SeriesType, StackRegistry, TranslateContext, TranslateSummary, XyPoint,
    parse_xy_data,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnPyramidOptions {
    #[serde(default = "default_group_padding")]
    pub group_padding: f64,
    #[serde(default = "default_point_padding")]
    pub point_padding: f64,
    #[serde(default = "default_min_point_length")]
    pub min_point_length: f64,
    /// Data-space category width; the closest point distance otherwise.
    #[serde(default)]
    pub point_range: Option<f64>,
    #[serde(default)]
    pub max_point_width: Option<f64>,
    #[serde(default)]
    pub threshold: f64,
    #[serde(default)]
    pub stacking: bool,
    /// Stack group name; series sharing it share one column.
    #[serde(default)]
    pub stack: Option<String>,
    #[serde(default = "default_color")]
    pub color: Color,
    #[serde(default = "default_border_color")]
    pub border_color: Color,
    #[serde(default = "default_border_width")]
    pub border_width: f64,
    #[serde(flatten)]
    pub compare: CompareOptions,
}

fn default_group_padding() -> f64 {
    0.2
}

fn default_point_padding() -> f64 {
    0.1
}

fn default_min_point_length() -> f64 {
    5.0
}

fn default_color() -> Color {
    Color::rgb(0.17, 0.56, 0.8)
}

fn default_border_color() -> Color {
    Color::rgb(1.0, 1.0, 1.0)
}

fn default_border_width() -> f64 {
    1.0
}

impl Default for ColumnPyramidOptions {
    fn default() -> Self {
        Self {
            group_padding: default_group_padding(),
            point_padding: default_point_padding(),
            min_point_length: default_min_point_length(),
            point_range: None,
            max_point_width: None,
            threshold: 0.0,
            stacking: false,
            stack: None,
            color: default_color(),
            border_color: default_border_color(),
            border_width: default_border_width(),
            compare: CompareOptions::default(),
        }
    }
}

impl ColumnPyramidOptions {
    #[must_use]
    pub fn with_stacking(mut self, stack: Option<String>) -> Self {
        self.stacking = true;
        self.stack = stack;
        self
    }

    #[must_use]
    pub fn with_point_range(mut self, point_range: f64) -> Self {
        self.point_range = Some(point_range);
        self
    }

    #[must_use]
    pub fn with_paddings(mut self, group_padding: f64, point_padding: f64) -> Self {
        self.group_padding = group_padding;
        self.point_padding = point_padding;
        self
    }

    #[must_use]
    pub fn with_min_point_length(mut self, min_point_length: f64) -> Self {
        self.min_point_length = min_point_length;
        self
    }

    #[must_use]
    pub fn with_compare(mut self, compare: CompareOptions) -> Self {
        self.compare = compare;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        for (name, value) in [
            ("groupPadding", self.group_padding),
            ("pointPadding", self.point_padding),
        ] {
            if !value.is_finite() || !(0.0..0.5).contains(&value) {
                return Err(ChartError::InvalidConfig(format!(
                    "`{name}` must be finite and in [0, 0.5)"
                )));
            }
        }
        if !self.min_point_length.is_finite() || self.min_point_length < 0.0 {
            return Err(ChartError::InvalidConfig(
                "`minPointLength` must be finite and >= 0".to_owned(),
            ));
        }
        if self
            .point_range
            .is_some_and(|range| !range.is_finite() || range <= 0.0)
        {
            return Err(ChartError::InvalidConfig(
                "`pointRange` must be finite and > 0".to_owned(),
            ));
        }
        if !self.threshold.is_finite() {
            return Err(ChartError::InvalidConfig(
                "`threshold` must be finite".to_owned(),
            ));
        }
        if !self.border_width.is_finite() || self.border_width < 0.0 {
            return Err(ChartError::InvalidConfig(
                "`borderWidth` must be finite and >= 0".to_owned(),
            ));
        }
        self.compare.validate()?;
        Ok(())
    }

    pub fn from_json_value(value: &Value) -> ChartResult<Self> {
        let options: Self = serde_json::from_value(value.clone()).map_err(|e| {
            ChartError::InvalidConfig(format!("failed to parse column pyramid options: {e}"))
        })?;
        options.validate()?;
        Ok(options)
    }
}

/// One sample with its derived stack and pixel geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PyramidPoint {
    pub index: usize,
    pub x: f64,
    /// Raw value as supplied.
    pub y: Option<f64>,
    /// Value after the comparison strategy (`change` for tooltips).
    pub change: Option<f64>,
    /// Offset of this slice inside its stack.
    pub stack_bottom: Option<f64>,
    pub plot: Option<(f64, f64)>,
    pub shape: Option<PyramidShape>,
}

/// Columns drawn as pyramids; stacked slices form one pyramid per x.
#[derive(Debug, Clone)]
pub struct ColumnPyramidSeries {
    id: String,
    options: ColumnPyramidOptions,
    strategy: ValueStrategy,
    points: Vec<PyramidPoint>,
    data_version: u64,
    metrics: Option<ColumnMetrics>,
}

impl ColumnPyramidSeries {
    pub fn new(id: impl Into<String>, options: ColumnPyramidOptions) -> ChartResult<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(ChartError::InvalidConfig(
                "series id must not be empty".to_owned(),
            ));
        }
        options.validate()?;
        Ok(Self {
            id,
            strategy: ValueStrategy::from_options(Some(options.compare)),
            options,
            points: Vec::new(),
            data_version: 0,
            metrics: None,
        })
    }

    pub fn from_definition(id: &str, definition: &Value) -> ChartResult<Self> {
        let options = ColumnPyramidOptions::from_json_value(definition)?;
        let data = parse_xy_data(&definition_data(definition)?)?;
        let mut series = Self::new(id, options)?;
        series.set_data(data);
        Ok(series)
    }

    pub fn set_data(&mut self, data: Vec<XyPoint>) {
        self.points = data
            .into_iter()
            .enumerate()
            .map(|(index, sample)| PyramidPoint {
                index,
                x: sample.x,
                y: sample.y,
                change: sample.y,
                stack_bottom: None,
                plot: None,
                shape: None,
            })
            .collect();
        self.data_version = self.data_version.wrapping_add(1);
    }

    #[must_use]
    pub fn options(&self) -> &ColumnPyramidOptions {
        &self.options
    }

    #[must_use]
    pub fn points(&self) -> &[PyramidPoint] {
        &self.points
    }

    #[must_use]
    pub fn compare_value(&self) -> Option<f64> {
        self.strategy.compare_value()
    }

    #[must_use]
    pub fn column_metrics(&self) -> Option<ColumnMetrics> {
        self.metrics
    }

    fn stack_key(&self) -> Option<String> {
        self.options
            .stacking
            .then(|| format!("stack:{}", self.options.stack.as_deref().unwrap_or("")))
    }

    fn column_key(&self) -> String {
        self.stack_key()
            .unwrap_or_else(|| format!("series:{}", self.id))
    }

    fn category_range(&self) -> f64 {
        self.options
            .point_range
            .or_else(|| {
                let samples: Vec<XyPoint> =
                    self.points.iter().map(|p| XyPoint::new(p.x, p.y)).collect();
                closest_point_range(&samples)
            })
            .unwrap_or(1.0)
    }
}

impl SeriesKind for ColumnPyramidSeries {
    fn id(&self) -> &str {
        &self.id
    }

    fn series_type(&self) -> SeriesType {
        SeriesType::ColumnPyramid
    }

    fn process_data(&mut self, _axes: &mut AxisPair) -> ChartResult<()> {
        if self.points.iter().any(|point| !point.x.is_finite()) {
            return Err(ChartError::InvalidData(format!(
                "series `{}` has non-finite x values",
                self.id
            )));
        }
        Ok(())
    }

    fn x_extremes(&self) -> Option<ValueExtremes> {
        let extremes = value_extremes(self.points.iter().map(|p| Some(p.x)))?;
        let half = self.category_range() / 2.0;
        Some(ValueExtremes {
            min: extremes.min - half,
            max: extremes.max + half,
        })
    }

    fn prepare_values(&mut self, visible_x_min: Option<f64>, stacks: &mut StackRegistry) {
        let xs: Vec<f64> = self.points.iter().map(|p| p.x).collect();
        let ys: Vec<Option<f64>> = self.points.iter().map(|p| p.y).collect();
        self.strategy
            .refresh(&xs, &ys, visible_x_min, self.data_version);

        stacks.register_column(&self.column_key());
        let stack_key = self.stack_key();
        for point in &mut self.points {
            point.change = self.strategy.modify(point.y);
            point.stack_bottom = match (&stack_key, point.change) {
                (Some(key), Some(value)) if value.is_finite() => {
                    Some(stacks.push(key, point.x, value))
                }
                _ => None,
            };
        }
    }

    fn y_extremes(&self, stacks: &StackRegistry) -> Option<ValueExtremes> {
        let threshold = self.options.threshold;
        if let Some(key) = self.stack_key() {
            let (low, high) = stacks.extremes(&key)?;
            return Some(ValueExtremes {
                min: threshold + low,
                max: threshold + high,
            });
        }
        let values = value_extremes(self.points.iter().map(|p| p.change))?;
        Some(ValueExtremes {
            min: values.min.min(threshold),
            max: values.max.max(threshold),
        })
    }

    fn translate(&mut self, axes: &AxisPair, context: TranslateContext<'_>) -> TranslateSummary {
        let column_key = self.column_key();
        let slot = ColumnSlot {
            category_range: self.category_range(),
            group_padding: self.options.group_padding,
            point_padding: self.options.point_padding,
            max_point_width: self.options.max_point_width,
            column_index: context.stacks.column_index(&column_key).unwrap_or(0),
            column_count: context.stacks.column_count().max(1),
        };
        let metrics = column_metrics(&axes.x, slot);
        self.metrics = Some(metrics);

        let threshold = self.options.threshold;
        let base_y = axes.y.to_pixels(threshold, true);
        let stack_key = self.stack_key();
        let mut translated = 0;

        for point in &mut self.points {
            let Some(value) = point.change.filter(|v| v.is_finite()) else {
                point.plot = None;
                point.shape = None;
                continue;
            };

            let (bottom_value, apex_value, negative) = match (&stack_key, point.stack_bottom) {
                (Some(key), Some(bottom)) => {
                    let negative = value < 0.0;
                    let total = context
                        .stacks
                        .totals(key, point.x)
                        .map_or(bottom + value, |totals| totals.total_for(negative));
                    (threshold + bottom, threshold + total, negative)
                }
                _ => (threshold, value, value < threshold),
            };
            let top_value = if stack_key.is_some() {
                bottom_value + value
            } else {
                value
            };

            let plot_x = axes.x.to_pixels(point.x, true);
            let slice = PyramidSlice {
                plot_x,
                plot_y: axes.y.to_pixels(top_value, true),
                y_bottom: axes.y.to_pixels(bottom_value, true),
                apex_y: axes.y.to_pixels(apex_value, true),
                base_y,
                negative,
            };
            let shape = pyramid_shape(
                slice,
                metrics,
                metrics.width,
                self.options.min_point_length,
                axes.y.len(),
            );
            point.plot = Some((shape.bar_x + metrics.width / 2.0, slice.plot_y));
            point.shape = Some(shape);
            translated += 1;
        }

        debug!(
            series = %self.id,
            translated,
            width = metrics.width,
            offset = metrics.offset,
            "translated column pyramid series"
        );
        TranslateSummary::full(translated, None, self.options.border_width)
    }

    fn draw_points(&self) -> SeriesLayer {
        let instructions = self
            .points
            .iter()
            .filter_map(|point| {
                Some(DrawInstruction {
                    index: point.index,
                    shape_type: ShapeType::Path,
                    shape_args: point.shape.as_ref()?.shape_args.clone(),
                    attribs: self.point_attribs(point.index)?,
                })
            })
            .collect();
        let labels = self
            .points
            .iter()
            .filter_map(|point| {
                let (x, y) = point.plot?;
                Some(LabelAnchor {
                    index: point.index,
                    x,
                    y,
                })
            })
            .collect();
        SeriesLayer::full(
            self.id.clone(),
            GroupAttributes::new(GroupTransform::identity(), self.options.border_width),
            instructions,
        )
        .with_labels(labels)
    }

    fn point_attribs(&self, index: usize) -> Option<PointAttribs> {
        self.points.get(index)?;
        Some(PointAttribs {
            fill: Some(self.options.color),
            stroke: self.options.border_color,
            stroke_width: self.options.border_width,
        })
    }

    fn point_count(&self) -> usize {
        self.points.len()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

use std::any::Any;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::core::{
    AxisPair, CompareOptions, GroupTransform, PathSegment, ShapeArgs, ShapeType, ValueExtremes,
    ValueStrategy, value_extremes,
};
use crate::error::{ChartError, ChartResult};
use crate::render::{Color, DrawInstruction, GroupAttributes, LabelAnchor, PointAttribs, SeriesLayer};

use super::data::definition_data;
use super::{
    SeriesKind, SeriesType, StackRegistry, TranslateContext, TranslateSummary, XyPoint,
    parse_xy_data,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineSeriesOptions {
    #[serde(default = "default_color")]
    pub color: Color,
    #[serde(default = "default_line_width")]
    pub line_width: f64,
    #[serde(flatten)]
    pub compare: CompareOptions,
}

fn default_color() -> Color {
    Color::rgb(0.17, 0.56, 0.8)
}

fn default_line_width() -> f64 {
    2.0
}

impl Default for LineSeriesOptions {
    fn default() -> Self {
        Self {
            color: default_color(),
            line_width: default_line_width(),
            compare: CompareOptions::default(),
        }
    }
}

impl LineSeriesOptions {
    #[must_use]
    pub fn with_compare(mut self, compare: CompareOptions) -> Self {
        self.compare = compare;
        self
    }

    #[must_use]
    pub fn with_line_width(mut self, line_width: f64) -> Self {
        self.line_width = line_width;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.line_width.is_finite() || self.line_width <= 0.0 {
            return Err(ChartError::InvalidConfig(
                "line width must be finite and > 0".to_owned(),
            ));
        }
        self.compare.validate()?;
        Ok(())
    }

    pub fn from_json_value(value: &Value) -> ChartResult<Self> {
        let options: Self = serde_json::from_value(value.clone()).map_err(|e| {
            ChartError::InvalidConfig(format!("failed to parse line options: {e}"))
        })?;
        options.validate()?;
        Ok(options)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinePoint {
    pub index: usize,
    pub x: f64,
    pub y: Option<f64>,
    /// Value after the comparison strategy.
    pub change: Option<f64>,
    pub plot: Option<(f64, f64)>,
}

/// Polyline series; null values split the line.
#[derive(Debug, Clone)]
pub struct LineSeries {
    id: String,
    options: LineSeriesOptions,
    strategy: ValueStrategy,
    points: Vec<LinePoint>,
    data_version: u64,
    path: Vec<PathSegment>,
}

impl LineSeries {
    pub fn new(id: impl Into<String>, options: LineSeriesOptions) -> ChartResult<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(ChartError::InvalidConfig(
                "series id must not be empty".to_owned(),
            ));
        }
        options.validate()?;
        Ok(Self {
            id,
            options,
            strategy: ValueStrategy::from_options(Some(options.compare)),
            points: Vec::new(),
            data_version: 0,
            path: Vec::new(),
        })
    }

    pub fn from_definition(id: &str, definition: &Value) -> ChartResult<Self> {
        let options = LineSeriesOptions::from_json_value(definition)?;
        let data = parse_xy_data(&definition_data(definition)?)?;
        let mut series = Self::new(id, options)?;
        series.set_data(data);
        Ok(series)
    }

    pub fn set_data(&mut self, data: Vec<XyPoint>) {
        self.points = data
            .into_iter()
            .enumerate()
            .map(|(index, sample)| LinePoint {
                index,
                x: sample.x,
                y: sample.y,
                change: sample.y,
                plot: None,
            })
            .collect();
        self.path.clear();
        self.data_version = self.data_version.wrapping_add(1);
    }

    #[must_use]
    pub fn points(&self) -> &[LinePoint] {
        &self.points
    }

    /// Pixel path from the last translate.
    #[must_use]
    pub fn path(&self) -> &[PathSegment] {
        &self.path
    }

    #[must_use]
    pub fn compare_value(&self) -> Option<f64> {
        self.strategy.compare_value()
    }
}

impl SeriesKind for LineSeries {
    fn id(&self) -> &str {
        &self.id
    }

    fn series_type(&self) -> SeriesType {
        SeriesType::Line
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
        value_extremes(self.points.iter().map(|p| Some(p.x)))
    }

    fn prepare_values(&mut self, visible_x_min: Option<f64>, _stacks: &mut StackRegistry) {
        let xs: Vec<f64> = self.points.iter().map(|p| p.x).collect();
        let ys: Vec<Option<f64>> = self.points.iter().map(|p| p.y).collect();
        if self
            .strategy
            .refresh(&xs, &ys, visible_x_min, self.data_version)
        {
            debug!(series = %self.id, baseline = ?self.strategy.compare_value(), "rebased line");
        }
        for point in &mut self.points {
            point.change = self.strategy.modify(point.y);
        }
    }

    fn y_extremes(&self, _stacks: &StackRegistry) -> Option<ValueExtremes> {
        value_extremes(self.points.iter().map(|p| p.change))
    }

    fn translate(&mut self, axes: &AxisPair, _context: TranslateContext<'_>) -> TranslateSummary {
        self.path.clear();
        let mut pen_down = false;
        let mut translated = 0;
        for point in &mut self.points {
            let plot = point
                .change
                .map(|value| (axes.x.to_pixels(point.x, true), axes.y.to_pixels(value, true)))
                .filter(|(x, y)| x.is_finite() && y.is_finite());
            point.plot = plot;
            let Some((x, y)) = plot else {
                pen_down = false;
                continue;
            };
            self.path.push(if pen_down {
                PathSegment::Line { x, y }
            } else {
                PathSegment::Move { x, y }
            });
            pen_down = true;
            translated += 1;
        }
        TranslateSummary::full(translated, None, self.options.line_width)
    }

    fn draw_points(&self) -> SeriesLayer {
        let instructions = self
            .point_attribs(0)
            .filter(|_| !self.path.is_empty())
            .map(|attribs| DrawInstruction {
                index: 0,
                shape_type: ShapeType::Path,
                shape_args: ShapeArgs::from_path(self.path.clone()),
                attribs,
            })
            .into_iter()
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
            GroupAttributes::new(GroupTransform::identity(), self.options.line_width),
            instructions,
        )
        .with_labels(labels)
    }

    fn point_attribs(&self, index: usize) -> Option<PointAttribs> {
        self.points.get(index)?;
        Some(PointAttribs {
            fill: None,
            stroke: self.options.color,
            stroke_width: self.options.line_width,
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

use std::any::Any;
use std::cmp::Reverse;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace};

use crate::core::{
    AxisPair, BoxUpdate, ExtremesTracker, GroupTransform, JoinOptions, MapPoint, RedrawCriteria,
    ShapeArgs, ShapeDataset, ShapeType, TransformMode, TransformSnapshot, ValueExtremes,
    fast_group_transform, is_value_only_record, join_data, normalize_value_record,
    scaled_stroke_width, translate_path, value_extremes, value_key,
};
use crate::error::{ChartError, ChartResult};
use crate::render::{Color, DrawInstruction, GroupAttributes, LabelAnchor, PointAttribs, SeriesLayer};

use super::data::definition_data;
use super::{
    SeriesKind, SeriesType, StackRegistry, TranslateContext, TranslateSummary,
};

/// Map series configuration.
///
/// Join options are flattened, so a JSON definition reads
/// `{ "joinBy": ["iso-a2", "code"], "allAreas": false, "borderWidth": 2 }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapSeriesOptions {
    #[serde(flatten)]
    pub join: JoinOptions,
    #[serde(default = "default_border_width")]
    pub border_width: f64,
    #[serde(default = "default_border_color")]
    pub border_color: Color,
    #[serde(default = "default_null_color")]
    pub null_color: Color,
    #[serde(default = "default_min_color")]
    pub min_color: Color,
    #[serde(default = "default_max_color")]
    pub max_color: Color,
    /// Relative label anchor inside each shape box.
    #[serde(default = "default_middle")]
    pub middle_x: f64,
    #[serde(default = "default_middle")]
    pub middle_y: f64,
}

fn default_border_width() -> f64 {
    1.0
}

fn default_border_color() -> Color {
    Color::rgb(0.8, 0.8, 0.8)
}

fn default_null_color() -> Color {
    Color::rgb(0.97, 0.97, 0.97)
}

fn default_min_color() -> Color {
    Color::rgb(0.9, 0.93, 0.98)
}

fn default_max_color() -> Color {
    Color::rgb(0.0, 0.13, 0.38)
}

fn default_middle() -> f64 {
    0.5
}

impl Default for MapSeriesOptions {
    fn default() -> Self {
        Self {
            join: JoinOptions::default(),
            border_width: default_border_width(),
            border_color: default_border_color(),
            null_color: default_null_color(),
            min_color: default_min_color(),
            max_color: default_max_color(),
            middle_x: default_middle(),
            middle_y: default_middle(),
        }
    }
}

impl MapSeriesOptions {
    #[must_use]
    pub fn with_join(mut self, join: JoinOptions) -> Self {
        self.join = join;
        self
    }

    #[must_use]
    pub fn with_border_width(mut self, border_width: f64) -> Self {
        self.border_width = border_width;
        self
    }

    #[must_use]
    pub fn with_colors(mut self, min_color: Color, max_color: Color) -> Self {
        self.min_color = min_color;
        self.max_color = max_color;
        self
    }

    #[must_use]
    pub fn with_null_color(mut self, null_color: Color) -> Self {
        self.null_color = null_color;
        self
    }

    #[must_use]
    pub fn with_middle(mut self, middle_x: f64, middle_y: f64) -> Self {
        self.middle_x = middle_x;
        self.middle_y = middle_y;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.border_width.is_finite() || self.border_width < 0.0 {
            return Err(ChartError::InvalidConfig(
                "map border width must be finite and >= 0".to_owned(),
            ));
        }
        for (name, value) in [("middleX", self.middle_x), ("middleY", self.middle_y)] {
            if !value.is_finite() {
                return Err(ChartError::InvalidConfig(format!(
                    "map `{name}` must be finite"
                )));
            }
        }
        for color in [
            self.border_color,
            self.null_color,
            self.min_color,
            self.max_color,
        ] {
            color
                .validate()
                .map_err(|e| ChartError::InvalidConfig(e.to_string()))?;
        }
        Ok(())
    }

    pub fn from_json_value(value: &Value) -> ChartResult<Self> {
        let options: Self = serde_json::from_value(value.clone())
            .map_err(|e| ChartError::InvalidConfig(format!("failed to parse map options: {e}")))?;
        options.validate()?;
        Ok(options)
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let options: Self = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidConfig(format!("failed to parse map options: {e}")))?;
        options.validate()?;
        Ok(options)
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::InvalidConfig(format!("failed to serialize map options: {e}")))
    }
}

/// Shapes joined with values, translated with a retained-scene fast path.
///
/// A full translate rebuilds every shape in pixel space and records a
/// [`TransformSnapshot`]. Later redraws that only pan or zoom move the whole
/// group with a [`GroupTransform`] relative to that snapshot instead.
#[derive(Debug, Clone)]
pub struct MapSeries {
    id: String,
    options: MapSeriesOptions,
    values: Vec<Value>,
    shapes: ShapeDataset,
    points: Vec<MapPoint>,
    tracker: ExtremesTracker,
    value_extremes: Option<ValueExtremes>,
    last_box_update: Option<BoxUpdate>,
    snapshot: Option<TransformSnapshot>,
    group: GroupTransform,
    stroke_width: f64,
    last_mode: Option<TransformMode>,
    join_dirty: bool,
    box_dirty: bool,
    data_dirty: bool,
    incremental_updates: bool,
    force_full_once: bool,
}

impl MapSeries {
    pub fn new(id: impl Into<String>, options: MapSeriesOptions) -> ChartResult<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(ChartError::InvalidConfig(
                "series id must not be empty".to_owned(),
            ));
        }
        options.validate()?;
        Ok(Self {
            id,
            tracker: ExtremesTracker::new((options.middle_x, options.middle_y)),
            stroke_width: options.border_width,
            options,
            values: Vec::new(),
            shapes: ShapeDataset::new(Vec::new()),
            points: Vec::new(),
            value_extremes: None,
            last_box_update: None,
            snapshot: None,
            group: GroupTransform::identity(),
            last_mode: None,
            join_dirty: false,
            box_dirty: true,
            data_dirty: true,
            incremental_updates: true,
            force_full_once: false,
        })
    }

    /// Reads options, `data` and `mapData` from one definition object.
    pub fn from_definition(id: &str, definition: &Value) -> ChartResult<Self> {
        let options = MapSeriesOptions::from_json_value(definition)?;
        let values = definition_data(definition)?;
        let shapes = match definition.get("mapData") {
            None | Some(Value::Null) => ShapeDataset::new(Vec::new()),
            Some(map_data) => ShapeDataset::from_json_value(map_data)?,
        };
        let mut series = Self::new(id, options)?;
        series.set_data(values, shapes);
        Ok(series)
    }

    /// Replaces value and shape data; entities are rebuilt on the next pass.
    pub fn set_data(&mut self, values: Vec<Value>, shapes: ShapeDataset) {
        self.values = values;
        self.shapes = shapes;
        self.points.clear();
        self.join_dirty = true;
        self.box_dirty = true;
        self.data_dirty = true;
    }

    /// Replaces value data only.
    ///
    /// When the previous join synthesized no placeholders and every record
    /// still lines up with the existing entity of the same key and carries
    /// nothing but that key and `value`, values are updated in place and
    /// cached geometry survives. Otherwise the join runs again.
    pub fn set_values(&mut self, values: Vec<Value>) {
        let in_place =
            self.incremental_updates && !self.join_dirty && self.update_values_in_place(&values);
        debug!(series = %self.id, records = values.len(), in_place, "set map values");
        self.values = values;
        if in_place {
            self.value_extremes = value_extremes(self.points.iter().map(MapPoint::value));
        } else {
            self.points.clear();
            self.join_dirty = true;
        }
        self.box_dirty = true;
        self.data_dirty = true;
    }

    fn update_values_in_place(&mut self, values: &[Value]) -> bool {
        if values.len() != self.points.len() {
            return false;
        }
        let mut updates = Vec::with_capacity(values.len());
        for (i, (value, point)) in values.iter().zip(&self.points).enumerate() {
            let Some(record) = normalize_value_record(value, &self.options.join) else {
                return false;
            };
            if !is_value_only_record(&record, &self.options.join.join_by) {
                return false;
            }
            let key = value_key(&record, i, &self.options.join.join_by);
            if key.as_deref() != point.key() {
                return false;
            }
            updates.push(record.get("value").and_then(Value::as_f64));
        }
        for (point, value) in self.points.iter_mut().zip(updates) {
            point.set_value(value);
        }
        true
    }

    #[must_use]
    pub fn options(&self) -> &MapSeriesOptions {
        &self.options
    }

    #[must_use]
    pub fn points(&self) -> &[MapPoint] {
        &self.points
    }

    #[must_use]
    pub fn point(&self, index: usize) -> Option<&MapPoint> {
        self.points.get(index)
    }

    #[must_use]
    pub fn shapes(&self) -> &ShapeDataset {
        &self.shapes
    }

    #[must_use]
    pub fn collection_box(&self) -> Option<crate::core::BoundingBox> {
        self.tracker.collection_box()
    }

    #[must_use]
    pub fn last_box_update(&self) -> Option<BoxUpdate> {
        self.last_box_update
    }

    #[must_use]
    pub fn snapshot(&self) -> Option<TransformSnapshot> {
        self.snapshot
    }

    #[must_use]
    pub fn group_transform(&self) -> GroupTransform {
        self.group
    }

    #[must_use]
    pub fn stroke_width(&self) -> f64 {
        self.stroke_width
    }

    /// `true` until the next full translate consumes pending data changes.
    #[must_use]
    pub fn is_dirty_data(&self) -> bool {
        self.data_dirty || self.join_dirty
    }

    /// `false` once a join synthesized placeholders; value updates then
    /// always re-run the join.
    #[must_use]
    pub fn allows_incremental_updates(&self) -> bool {
        self.incremental_updates
    }

    /// Entity indices with a label rank, largest rank first (ties by index).
    #[must_use]
    pub fn label_order(&self) -> Vec<usize> {
        let mut ranked: Vec<(usize, f64)> = self
            .points
            .iter()
            .filter_map(|point| Some((point.index(), point.label_rank()?)))
            .filter(|(_, rank)| rank.is_finite())
            .collect();
        ranked.sort_by_key(|&(index, rank)| (Reverse(OrderedFloat(rank)), index));
        ranked.into_iter().map(|(index, _)| index).collect()
    }

    /// Joins pending data and refreshes the collection box, at most once per
    /// data change.
    fn ensure_points(&mut self) {
        if self.join_dirty {
            let outcome = join_data(&self.values, &mut self.shapes, &self.options.join);
            self.incremental_updates = outcome.allows_incremental_updates();
            self.force_full_once = !self.incremental_updates;
            self.points = outcome.points;
            self.join_dirty = false;
            self.box_dirty = true;
            self.data_dirty = true;
        }
        if self.box_dirty || self.points.iter().any(|point| !point.has_fresh_geometry()) {
            self.last_box_update = Some(self.tracker.update_box(&mut self.points));
            self.value_extremes = value_extremes(self.points.iter().map(MapPoint::value));
            self.box_dirty = false;
        }
    }

    fn full_translate(&mut self, axes: &AxisPair) -> usize {
        let mut translated = 0;
        for point in &mut self.points {
            let path = translate_path(point.path(), &axes.x, &axes.y);
            let shape_args = if !path.is_empty() && path.iter().all(|segment| segment.is_finite()) {
                translated += 1;
                ShapeArgs::from_path(path)
            } else {
                trace!(index = point.index(), "entity without finite geometry");
                ShapeArgs::empty()
            };
            point.set_shape_args(shape_args);
        }
        translated
    }
}

impl SeriesKind for MapSeries {
    fn id(&self) -> &str {
        &self.id
    }

    fn series_type(&self) -> SeriesType {
        SeriesType::Map
    }

    fn process_data(&mut self, axes: &mut AxisPair) -> ChartResult<()> {
        self.ensure_points();
        self.tracker.apply_min_range(axes);
        Ok(())
    }

    fn x_extremes(&self) -> Option<ValueExtremes> {
        self.tracker.collection_box().map(|bounds| ValueExtremes {
            min: bounds.min_x,
            max: bounds.max_x,
        })
    }

    fn y_extremes(&self, _stacks: &StackRegistry) -> Option<ValueExtremes> {
        self.tracker.collection_box().map(|bounds| ValueExtremes {
            min: bounds.min_y,
            max: bounds.max_y,
        })
    }

    fn translate(&mut self, axes: &AxisPair, context: TranslateContext<'_>) -> TranslateSummary {
        self.ensure_points();

        // Anchors use the same unflipped mapping as the paths.
        for point in &mut self.points {
            let plot = point
                .geometry()
                .map(|geometry| {
                    (
                        axes.x.linear_to_pixels(geometry.mid_x),
                        axes.y.linear_to_pixels(geometry.mid_y),
                    )
                })
                .filter(|(x, y)| x.is_finite() && y.is_finite());
            point.set_plot(plot);
        }

        let decision = RedrawCriteria {
            has_snapshot: self.snapshot.is_some(),
            data_dirty: self.data_dirty,
            incremental_updates_allowed: !self.force_full_once,
            resizing: context.environment.resizing,
            hardware_transforms: context.environment.hardware_transforms,
        }
        .resolve();

        let (mode, translated) = match (decision.mode, self.snapshot) {
            (TransformMode::Fast, Some(snapshot)) => {
                let group = fast_group_transform(snapshot, axes);
                self.group = if group.is_finite() {
                    group
                } else {
                    GroupTransform::identity()
                };
                (TransformMode::Fast, 0)
            }
            _ => {
                let translated = self.full_translate(axes);
                self.snapshot = Some(TransformSnapshot::capture(axes));
                self.group = GroupTransform::identity();
                self.data_dirty = false;
                self.force_full_once = false;
                (TransformMode::Full, translated)
            }
        };
        self.stroke_width = scaled_stroke_width(self.options.border_width, self.group);
        self.last_mode = Some(mode);

        debug!(
            series = %self.id,
            ?mode,
            reason = ?decision.reason,
            translated,
            scale_x = self.group.scale_x,
            scale_y = self.group.scale_y,
            "translated map series"
        );

        TranslateSummary {
            mode,
            reason: decision.reason,
            translated,
            group: self.group,
            stroke_width: self.stroke_width,
        }
    }

    fn draw_points(&self) -> SeriesLayer {
        let group = GroupAttributes::new(self.group, self.stroke_width);
        let labels = self
            .label_order()
            .into_iter()
            .filter_map(|index| {
                let (x, y) = self.points.get(index)?.plot()?;
                Some(LabelAnchor { index, x, y })
            })
            .collect();

        let layer = match self.last_mode {
            Some(TransformMode::Fast) => SeriesLayer::transform_only(self.id.clone(), group),
            _ => {
                let instructions = self
                    .points
                    .iter()
                    .filter_map(|point| {
                        Some(DrawInstruction {
                            index: point.index(),
                            shape_type: ShapeType::Path,
                            shape_args: point.shape_args()?.clone(),
                            attribs: self.point_attribs(point.index())?,
                        })
                    })
                    .collect();
                SeriesLayer::full(self.id.clone(), group, instructions)
            }
        };
        layer.with_labels(labels)
    }

    fn point_attribs(&self, index: usize) -> Option<PointAttribs> {
        let point = self.points.get(index)?;
        let fill = match (point.value(), self.value_extremes) {
            (Some(value), Some(extremes)) if value.is_finite() => self
                .options
                .min_color
                .lerp(self.options.max_color, extremes.normalize(value)),
            _ => self.options.null_color,
        };
        Some(PointAttribs {
            fill: Some(fill),
            stroke: self.options.border_color,
            stroke_width: self.options.border_width,
        })
    }

    fn point_count(&self) -> usize {
        self.points.len()
    }

    fn value_extremes(&self) -> Option<ValueExtremes> {
        self.value_extremes
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

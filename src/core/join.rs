use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::core::{MapPoint, MapTransforms, PathSegment, path_from_json};
use crate::error::{ChartError, ChartResult};

/// Default shape-side join field.
pub const DEFAULT_JOIN_FIELD: &str = "shape-key";

/// Join key selection between value records and shape records.
///
/// Serialized as `null` (positional index), `"field"` (same field on both
/// sides) or `["shape_field", "value_field"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JoinBy {
    Index,
    Field(String),
    Fields(String, String),
}

impl Default for JoinBy {
    fn default() -> Self {
        Self::Field(DEFAULT_JOIN_FIELD.to_owned())
    }
}

impl JoinBy {
    #[must_use]
    pub fn shape_field(&self) -> Option<&str> {
        match self {
            Self::Index => None,
            Self::Field(field) | Self::Fields(field, _) => Some(field),
        }
    }

    #[must_use]
    pub fn value_field(&self) -> Option<&str> {
        match self {
            Self::Index => None,
            Self::Field(field) | Self::Fields(_, field) => Some(field),
        }
    }
}

const DEFAULT_FIELD_ORDER: [&str; 1] = ["value"];

/// How value records are normalized and matched to shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinOptions {
    #[serde(default)]
    pub join_by: JoinBy,
    /// Field order for tuple records; dotted names write nested fields.
    /// Defaults to `["value"]`. Supplying it disables the leading-key
    /// tuple heuristic.
    #[serde(default)]
    pub keys: Option<Vec<String>>,
    #[serde(default = "default_all_areas")]
    pub all_areas: bool,
}

fn default_all_areas() -> bool {
    true
}

impl Default for JoinOptions {
    fn default() -> Self {
        Self {
            join_by: JoinBy::default(),
            keys: None,
            all_areas: default_all_areas(),
        }
    }
}

impl JoinOptions {
    #[must_use]
    pub fn with_join_by(mut self, join_by: JoinBy) -> Self {
        self.join_by = join_by;
        self
    }

    #[must_use]
    pub fn with_keys(mut self, keys: Vec<String>) -> Self {
        self.keys = Some(keys);
        self
    }

    #[must_use]
    pub fn with_all_areas(mut self, all_areas: bool) -> Self {
        self.all_areas = all_areas;
        self
    }
}

/// One shape: raw geometry plus the fields a join key may live in.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShapeRecord {
    pub fields: Map<String, Value>,
    pub properties: Map<String, Value>,
    pub path: Vec<PathSegment>,
}

impl ShapeRecord {
    #[must_use]
    pub fn new(path: Vec<PathSegment>) -> Self {
        Self {
            path,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, value: Value) -> Self {
        self.properties.insert(name.into(), value);
        self
    }

    /// Reads `{ "path": ..., "properties": {...}, ...fields }`.
    pub fn from_json(value: &Value) -> ChartResult<Self> {
        let Value::Object(object) = value else {
            return Err(ChartError::InvalidData(
                "shape record must be a JSON object".to_owned(),
            ));
        };
        let mut record = Self::default();
        for (name, field) in object {
            match (name.as_str(), field) {
                ("path", path) => record.path = path_from_json(path)?,
                ("properties", Value::Object(properties)) => {
                    record.properties = properties.clone();
                }
                _ => {
                    record.fields.insert(name.clone(), field.clone());
                }
            }
        }
        Ok(record)
    }

    /// Looks `field` up in `properties`, then in the top-level fields.
    #[must_use]
    pub fn lookup(&self, field: &str) -> Option<&Value> {
        get_nested(&self.properties, field).or_else(|| get_nested(&self.fields, field))
    }
}

/// Shape records plus the transforms shipped with them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShapeDataset {
    pub shapes: Vec<ShapeRecord>,
    pub transforms: Option<MapTransforms>,
}

impl ShapeDataset {
    #[must_use]
    pub fn new(shapes: Vec<ShapeRecord>) -> Self {
        Self {
            shapes,
            transforms: None,
        }
    }

    #[must_use]
    pub fn with_transforms(mut self, transforms: MapTransforms) -> Self {
        self.transforms = Some(transforms);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Accepts a shape array, `{ "shapes": [...], "transforms": {...} }`, or
    /// a GeoJSON `FeatureCollection`.
    pub fn from_json_value(value: &Value) -> ChartResult<Self> {
        match value {
            Value::Array(items) => Ok(Self::new(
                items
                    .iter()
                    .map(ShapeRecord::from_json)
                    .collect::<ChartResult<Vec<_>>>()?,
            )),
            Value::Object(object)
                if object.get("type").and_then(Value::as_str) == Some("FeatureCollection") =>
            {
                crate::core::shapes_from_geojson(value)
            }
            Value::Object(object) => {
                let shapes = match object.get("shapes") {
                    Some(shapes) => Self::from_json_value(shapes)?.shapes,
                    None => Vec::new(),
                };
                let transforms = object
                    .get("transforms")
                    .map(|transforms| {
                        serde_json::from_value::<MapTransforms>(transforms.clone()).map_err(|e| {
                            ChartError::InvalidData(format!("invalid shape transforms: {e}"))
                        })
                    })
                    .transpose()?;
                Ok(Self { shapes, transforms })
            }
            other => Err(ChartError::InvalidData(format!(
                "unsupported shape dataset `{other}`"
            ))),
        }
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let value: Value = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse shape json: {e}")))?;
        Self::from_json_value(&value)
    }
}

/// Result of merging value records onto shapes.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinOutcome {
    pub points: Vec<MapPoint>,
    pub matched: usize,
    /// Null-valued placeholders appended for unreferenced shapes.
    pub synthesized: usize,
    /// Value records whose key matched no shape.
    pub unmatched_values: usize,
    /// Value records that could not be normalized at all.
    pub malformed_values: usize,
}

impl JoinOutcome {
    /// Incremental point updates are unsafe once placeholders were injected.
    #[must_use]
    pub fn allows_incremental_updates(&self) -> bool {
        self.synthesized == 0
    }
}

/// Merges `values` onto `shapes`.
///
/// Shapes are indexed by join key (last write wins). Each value record
/// resolves its key, possibly through a dotted path, and takes the indexed
/// shape's geometry and properties; a later record for the same shape
/// replaces the earlier one. Records without a matching shape are dropped.
/// With `all_areas`, every shape left unreferenced becomes a null-valued
/// placeholder, so the result holds exactly one entity per shape. Without
/// shapes, records carrying their own `path` become entities directly.
///
/// Rotation caches of the dataset's transforms are refreshed as a side
/// effect.
pub fn join_data(values: &[Value], shapes: &mut ShapeDataset, options: &JoinOptions) -> JoinOutcome {
    if let Some(transforms) = shapes.transforms.as_mut() {
        transforms.prepare();
    }

    let mut malformed_values = 0;
    let records: Vec<(usize, Map<String, Value>)> = values
        .iter()
        .enumerate()
        .filter_map(|(i, value)| match normalize_value_record(value, options) {
            Some(record) => Some((i, record)),
            None => {
                trace!(index = i, "skipping malformed value record");
                malformed_values += 1;
                None
            }
        })
        .collect();

    if shapes.is_empty() {
        let points: Vec<MapPoint> = records
            .into_iter()
            .filter_map(|(i, record)| {
                let key = value_key(&record, i, &options.join_by);
                let path = record_path(&record)?;
                Some(point_from_record(0, key, path, Map::new(), &record))
            })
            .collect();
        let matched = points.len();
        return finish(points, matched, 0, values.len() - malformed_values - matched, malformed_values);
    }

    let mut index: IndexMap<String, usize> = IndexMap::with_capacity(shapes.len());
    for (j, shape) in shapes.shapes.iter().enumerate() {
        if let Some(key) = shape_key(shape, j, &options.join_by) {
            index.insert(key, j);
        }
    }

    let mut matched_points: IndexMap<usize, MapPoint> = IndexMap::new();
    let mut unmatched_values = 0;
    for (i, record) in records {
        let key = value_key(&record, i, &options.join_by);
        let Some(&shape_index) = key.as_ref().and_then(|key| index.get(key)) else {
            trace!(index = i, ?key, "value record has no matching shape");
            unmatched_values += 1;
            continue;
        };
        let shape = &shapes.shapes[shape_index];
        let path = record_path(&record).unwrap_or_else(|| shape.path.clone());
        let point = point_from_record(0, key, path, shape.properties.clone(), &record);
        matched_points.insert(shape_index, point);
    }

    let matched = matched_points.len();
    let mut used = vec![false; shapes.len()];
    for &shape_index in matched_points.keys() {
        used[shape_index] = true;
    }
    let mut points: Vec<MapPoint> = matched_points.into_values().collect();
    let mut synthesized = 0;
    if options.all_areas {
        for (j, shape) in shapes.shapes.iter().enumerate() {
            if used[j] {
                continue;
            }
            let key = shape_key(shape, j, &options.join_by);
            let name = shape.lookup("name").and_then(Value::as_str).map(str::to_owned);
            points.push(
                MapPoint::placeholder(0, shape.path.clone())
                    .with_key(key)
                    .with_name(name)
                    .with_middle(
                        shape.lookup("hc-middle-x").and_then(Value::as_f64),
                        shape.lookup("hc-middle-y").and_then(Value::as_f64),
                    )
                    .with_properties(shape.properties.clone()),
            );
            synthesized += 1;
        }
    }

    finish(points, matched, synthesized, unmatched_values, malformed_values)
}

fn finish(
    mut points: Vec<MapPoint>,
    matched: usize,
    synthesized: usize,
    unmatched_values: usize,
    malformed_values: usize,
) -> JoinOutcome {
    for (i, point) in points.iter_mut().enumerate() {
        point.set_index(i);
    }
    debug!(
        entities = points.len(),
        matched,
        synthesized,
        unmatched_values,
        malformed_values,
        "joined value data onto shapes"
    );
    JoinOutcome {
        points,
        matched,
        synthesized,
        unmatched_values,
        malformed_values,
    }
}

fn shape_key(shape: &ShapeRecord, position: usize, join_by: &JoinBy) -> Option<String> {
    match join_by.shape_field() {
        None => Some(position.to_string()),
        Some(field) => shape.lookup(field).and_then(join_key_string),
    }
}

/// Join key of a normalized value record at `position`.
#[must_use]
pub fn value_key(record: &Map<String, Value>, position: usize, join_by: &JoinBy) -> Option<String> {
    match join_by.value_field() {
        None => Some(position.to_string()),
        Some(field) => get_nested(record, field).and_then(join_key_string),
    }
}

fn record_path(record: &Map<String, Value>) -> Option<Vec<PathSegment>> {
    let path = record.get("path")?;
    match path_from_json(path) {
        Ok(segments) => Some(segments),
        Err(err) => {
            debug!(error = %err, "ignoring unparsable point path");
            None
        }
    }
}

const RESERVED_FIELDS: [&str; 6] = ["value", "name", "path", "middleX", "middleY", "labelrank"];

fn point_from_record(
    index: usize,
    key: Option<String>,
    path: Vec<PathSegment>,
    mut properties: Map<String, Value>,
    record: &Map<String, Value>,
) -> MapPoint {
    let name = record
        .get("name")
        .and_then(Value::as_str)
        .or_else(|| properties.get("name").and_then(Value::as_str))
        .map(str::to_owned);
    let middle_x = record
        .get("middleX")
        .and_then(Value::as_f64)
        .or_else(|| properties.get("hc-middle-x").and_then(Value::as_f64));
    let middle_y = record
        .get("middleY")
        .and_then(Value::as_f64)
        .or_else(|| properties.get("hc-middle-y").and_then(Value::as_f64));
    let label_rank = record.get("labelrank").and_then(Value::as_f64);

    for (name, field) in record {
        if !RESERVED_FIELDS.contains(&name.as_str()) {
            properties.insert(name.clone(), field.clone());
        }
    }

    MapPoint::new(index, path)
        .with_key(key)
        .with_value(record.get("value").and_then(Value::as_f64))
        .with_name(name)
        .with_middle(middle_x, middle_y)
        .with_label_rank(label_rank)
        .with_properties(properties)
}

/// Normalizes one value record into an object.
///
/// Numbers and `null` become `{ "value": ... }`. Tuples are spread over
/// `options.keys`; without explicit keys, a leading string in a tuple longer
/// than the key list is taken as the join key. Objects pass through. Any
/// other JSON type is malformed.
#[must_use]
pub fn normalize_value_record(value: &Value, options: &JoinOptions) -> Option<Map<String, Value>> {
    match value {
        Value::Number(_) | Value::Null => {
            let mut record = Map::new();
            record.insert("value".to_owned(), value.clone());
            Some(record)
        }
        Value::Array(items) => {
            let default_order = DEFAULT_FIELD_ORDER.map(str::to_owned);
            let field_order = options.keys.as_deref().unwrap_or(&default_order);
            let mut record = Map::new();
            let mut ix = 0;
            if options.keys.is_none() && items.len() > field_order.len() {
                if let Some(Value::String(key)) = items.first() {
                    let field = options.join_by.value_field().unwrap_or("name");
                    set_nested(&mut record, field, Value::String(key.clone()));
                    ix = 1;
                }
            }
            for field in field_order {
                if let Some(item) = items.get(ix) {
                    set_nested(&mut record, field, item.clone());
                }
                ix += 1;
            }
            Some(record)
        }
        Value::Object(object) => Some(object.clone()),
        Value::Bool(_) | Value::String(_) => None,
    }
}

/// `true` when a normalized record holds nothing but its join key and
/// `value`. Any other field (path, name, middle offsets, label rank,
/// properties) requires a fresh join to take effect.
#[must_use]
pub fn is_value_only_record(record: &Map<String, Value>, join_by: &JoinBy) -> bool {
    let key_field = join_by.value_field();
    let key_root = key_field.and_then(|field| field.split('.').next());
    record.keys().all(|name| {
        let name = Some(name.as_str());
        name == Some("value") || name == key_field || name == key_root
    })
}

/// Stringified join key; numbers and strings compare by their text.
#[must_use]
pub fn join_key_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Dot-separated lookup (`"properties.iso-a2"`).
#[must_use]
pub fn get_nested<'a>(map: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    if let Some(value) = map.get(path) {
        return Some(value);
    }
    let mut parts = path.split('.');
    let mut current = map.get(parts.next()?)?;
    for part in parts {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}

/// Dot-separated insert, creating intermediate objects as needed.
pub fn set_nested(map: &mut Map<String, Value>, path: &str, value: Value) {
    let mut parts: Vec<&str> = path.split('.').collect();
    let Some(last) = parts.pop() else {
        return;
    };
    let mut current = map;
    for part in parts {
        let entry = current
            .entry(part.to_owned())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        let Value::Object(next) = entry else {
            return;
        };
        current = next;
    }
    current.insert(last.to_owned(), value);
}

use serde_json::{Map, Value};

use crate::core::{DerivedGeometry, GeometryCache, PathSegment, ShapeArgs};

/// One joined map entity: value data merged onto shape geometry.
///
/// Raw geometry is fixed at join time. Builders that change derived geometry
/// (middle offsets, label rank) bump the geometry version, which invalidates
/// the derived-geometry cache.
#[derive(Debug, Clone, PartialEq)]
pub struct MapPoint {
    index: usize,
    key: Option<String>,
    value: Option<f64>,
    name: Option<String>,
    properties: Map<String, Value>,
    middle_x: Option<f64>,
    middle_y: Option<f64>,
    label_rank: Option<f64>,
    synthetic: bool,
    path: Vec<PathSegment>,
    geometry_version: u64,
    cache: GeometryCache,
    plot: Option<(f64, f64)>,
    shape_args: Option<ShapeArgs>,
}

impl MapPoint {
    #[must_use]
    pub fn new(index: usize, path: Vec<PathSegment>) -> Self {
        Self {
            index,
            key: None,
            value: None,
            name: None,
            properties: Map::new(),
            middle_x: None,
            middle_y: None,
            label_rank: None,
            synthetic: false,
            path,
            geometry_version: 0,
            cache: GeometryCache::default(),
            plot: None,
            shape_args: None,
        }
    }

    /// Null-valued placeholder for a shape without value data.
    #[must_use]
    pub fn placeholder(index: usize, path: Vec<PathSegment>) -> Self {
        let mut point = Self::new(index, path);
        point.synthetic = true;
        point
    }

    #[must_use]
    pub fn with_key(mut self, key: Option<String>) -> Self {
        self.key = key;
        self
    }

    #[must_use]
    pub fn with_value(mut self, value: Option<f64>) -> Self {
        self.value = value;
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    #[must_use]
    pub fn with_properties(mut self, properties: Map<String, Value>) -> Self {
        self.properties = properties;
        self
    }

    #[must_use]
    pub fn with_middle(mut self, middle_x: Option<f64>, middle_y: Option<f64>) -> Self {
        self.middle_x = middle_x;
        self.middle_y = middle_y;
        self.invalidate_geometry();
        self
    }

    #[must_use]
    pub fn with_label_rank(mut self, label_rank: Option<f64>) -> Self {
        self.label_rank = label_rank;
        self.invalidate_geometry();
        self
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    pub(crate) fn set_index(&mut self, index: usize) {
        self.index = index;
    }

    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    #[must_use]
    pub fn value(&self) -> Option<f64> {
        self.value
    }

    pub fn set_value(&mut self, value: Option<f64>) {
        self.value = value;
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub fn properties(&self) -> &Map<String, Value> {
        &self.properties
    }

    /// `true` for placeholders synthesized by the `all_areas` join.
    #[must_use]
    pub fn is_synthetic(&self) -> bool {
        self.synthetic
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        self.value.is_none()
    }

    #[must_use]
    pub fn path(&self) -> &[PathSegment] {
        &self.path
    }

    #[must_use]
    pub fn geometry_version(&self) -> u64 {
        self.geometry_version
    }

    fn invalidate_geometry(&mut self) {
        self.geometry_version = self.geometry_version.wrapping_add(1);
        self.plot = None;
        self.shape_args = None;
    }

    /// Derived geometry, computing it when the cache is stale.
    ///
    /// Per-point middle offsets override `default_offsets`.
    pub fn resolve_geometry(&mut self, default_offsets: (f64, f64)) -> Option<DerivedGeometry> {
        let offsets = (
            self.middle_x.unwrap_or(default_offsets.0),
            self.middle_y.unwrap_or(default_offsets.1),
        );
        self.cache
            .resolve(self.geometry_version, &self.path, offsets, self.label_rank)
    }

    /// Cached derived geometry; `None` when stale or absent.
    #[must_use]
    pub fn geometry(&self) -> Option<DerivedGeometry> {
        self.cache.get(self.geometry_version)
    }

    #[must_use]
    pub fn has_fresh_geometry(&self) -> bool {
        self.cache.is_fresh(self.geometry_version)
    }

    #[must_use]
    pub fn label_rank(&self) -> Option<f64> {
        self.geometry().map(|geometry| geometry.label_rank).or(self.label_rank)
    }

    /// Pixel-space label anchor from the last translate.
    #[must_use]
    pub fn plot(&self) -> Option<(f64, f64)> {
        self.plot
    }

    pub(crate) fn set_plot(&mut self, plot: Option<(f64, f64)>) {
        self.plot = plot;
    }

    /// Pixel-space shape from the last full translate.
    #[must_use]
    pub fn shape_args(&self) -> Option<&ShapeArgs> {
        self.shape_args.as_ref()
    }

    pub(crate) fn set_shape_args(&mut self, shape_args: ShapeArgs) {
        self.shape_args = Some(shape_args);
    }
}

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

fn one() -> f64 {
    1.0
}

/// Projected-to-plane transform shipped with a shape set.
///
/// Maps projected coordinates (already run through the projection
/// collaborator) onto the plane the shape paths are drawn in. `rotation` is
/// in radians; its cosine and sine are cached by [`MapTransform::prepare`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapTransform {
    #[serde(default = "one")]
    pub scale: f64,
    #[serde(default = "one")]
    pub jsonres: f64,
    #[serde(default, rename = "jsonmarginX")]
    pub jsonmargin_x: f64,
    #[serde(default, rename = "jsonmarginY")]
    pub jsonmargin_y: f64,
    #[serde(default)]
    pub xoffset: f64,
    #[serde(default)]
    pub yoffset: f64,
    #[serde(default)]
    pub xpan: f64,
    #[serde(default)]
    pub ypan: f64,
    #[serde(default)]
    pub rotation: Option<f64>,
    /// Polygon (projected coordinates) selecting this transform.
    #[serde(default)]
    pub hit_zone: Option<Vec<[f64; 2]>>,
    #[serde(skip)]
    cos_angle: Option<f64>,
    #[serde(skip)]
    sin_angle: Option<f64>,
}

impl Default for MapTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            jsonres: 1.0,
            jsonmargin_x: 0.0,
            jsonmargin_y: 0.0,
            xoffset: 0.0,
            yoffset: 0.0,
            xpan: 0.0,
            ypan: 0.0,
            rotation: None,
            hit_zone: None,
            cos_angle: None,
            sin_angle: None,
        }
    }
}

impl MapTransform {
    /// Caches `cos`/`sin` of the rotation.
    pub fn prepare(&mut self) {
        match self.rotation {
            Some(rotation) => {
                self.cos_angle = Some(rotation.cos());
                self.sin_angle = Some(rotation.sin());
            }
            None => {
                self.cos_angle = None;
                self.sin_angle = None;
            }
        }
    }

    #[must_use]
    pub fn rotation_cache(&self) -> Option<(f64, f64)> {
        Some((self.cos_angle?, self.sin_angle?))
    }

    fn angles(&self) -> Option<(f64, f64)> {
        self.rotation_cache()
            .or_else(|| self.rotation.map(|rotation| (rotation.cos(), rotation.sin())))
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.scale.is_finite() || self.scale == 0.0 {
            return Err(ChartError::InvalidConfig(
                "map transform scale must be finite and non-zero".to_owned(),
            ));
        }
        if !self.jsonres.is_finite() || self.jsonres == 0.0 {
            return Err(ChartError::InvalidConfig(
                "map transform jsonres must be finite and non-zero".to_owned(),
            ));
        }
        Ok(())
    }

    /// Projected coordinates to plane coordinates.
    #[must_use]
    pub fn to_plane(&self, x: f64, y: f64) -> (f64, f64) {
        let (rx, ry) = match self.angles() {
            Some((cos, sin)) => (x * cos + y * sin, -x * sin + y * cos),
            None => (x, y),
        };
        (
            ((rx - self.xoffset) * self.scale + self.xpan) * self.jsonres + self.jsonmargin_x,
            ((self.yoffset - ry) * self.scale + self.ypan) * self.jsonres - self.jsonmargin_y,
        )
    }

    /// Inverse of [`MapTransform::to_plane`].
    #[must_use]
    pub fn from_plane(&self, x: f64, y: f64) -> (f64, f64) {
        let rx = ((x - self.jsonmargin_x) / self.jsonres - self.xpan) / self.scale + self.xoffset;
        let ry = ((-y - self.jsonmargin_y) / self.jsonres + self.ypan) / self.scale + self.yoffset;
        match self.angles() {
            Some((cos, sin)) => (rx * cos - ry * sin, rx * sin + ry * cos),
            None => (rx, ry),
        }
    }

    #[must_use]
    pub fn hits(&self, x: f64, y: f64) -> bool {
        self.hit_zone
            .as_deref()
            .is_some_and(|polygon| point_in_polygon(x, y, polygon))
    }
}

/// Named transforms of one shape set, in declaration order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MapTransforms(IndexMap<String, MapTransform>);

impl MapTransforms {
    #[must_use]
    pub fn new(transforms: IndexMap<String, MapTransform>) -> Self {
        Self(transforms)
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let transforms: Self = serde_json::from_str(input).map_err(|e| {
            ChartError::InvalidConfig(format!("failed to parse map transforms: {e}"))
        })?;
        for transform in transforms.0.values() {
            transform.validate()?;
        }
        Ok(transforms)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&MapTransform> {
        self.0.get(name)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Refreshes every rotation cache.
    pub fn prepare(&mut self) {
        for transform in self.0.values_mut() {
            transform.prepare();
        }
    }

    /// Transform for a projected point: the first whose hit zone contains
    /// it, else `"default"`, else the first declared.
    #[must_use]
    pub fn select(&self, x: f64, y: f64) -> Option<&MapTransform> {
        self.0
            .values()
            .find(|transform| transform.hits(x, y))
            .or_else(|| self.0.get("default"))
            .or_else(|| self.0.values().next())
    }

    #[must_use]
    pub fn to_plane(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        self.select(x, y).map(|transform| transform.to_plane(x, y))
    }
}

fn point_in_polygon(x: f64, y: f64, polygon: &[[f64; 2]]) -> bool {
    if polygon.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let [xi, yi] = polygon[i];
        let [xj, yj] = polygon[j];
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

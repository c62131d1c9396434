use serde::{Deserialize, Serialize};

use crate::core::{AxisOrientation, AxisState, Viewport};
use crate::error::{ChartError, ChartResult};

/// Bootstrap settings of one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AxisConfig {
    /// Explicit extremes; when both are set, data never moves the axis.
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub reversed: bool,
    /// Pins the zoom floor instead of deriving it from the data.
    #[serde(default)]
    pub min_range: Option<f64>,
}

impl AxisConfig {
    #[must_use]
    pub fn with_extremes(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    #[must_use]
    pub fn with_reversed(mut self, reversed: bool) -> Self {
        self.reversed = reversed;
        self
    }

    #[must_use]
    pub fn with_min_range(mut self, min_range: f64) -> Self {
        self.min_range = Some(min_range);
        self
    }

    /// Explicit extremes, when both bounds are configured.
    #[must_use]
    pub fn extremes(self) -> Option<(f64, f64)> {
        Some((self.min?, self.max?))
    }

    pub(crate) fn build(self, len: f64, orientation: AxisOrientation) -> ChartResult<AxisState> {
        let axis = AxisState::new(len, orientation)?
            .with_reversed(self.reversed)
            .with_configured_min_range(self.min_range)?;
        match self.extremes() {
            Some((min, max)) => axis.with_domain(min, max),
            None => Ok(axis),
        }
    }
}

/// Public engine bootstrap configuration.
///
/// This type is serializable so host applications can persist/load chart setup
/// without inventing their own ad-hoc format.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartEngineConfig {
    pub viewport: Viewport,
    #[serde(default)]
    pub x_axis: AxisConfig,
    #[serde(default)]
    pub y_axis: AxisConfig,
    /// One data unit spans the same pixels on both axes (maps).
    #[serde(default)]
    pub preserve_aspect_ratio: bool,
    /// The renderer can move and scale a retained series group.
    #[serde(default = "default_hardware_transforms")]
    pub hardware_transforms: bool,
}

fn default_hardware_transforms() -> bool {
    true
}

impl ChartEngineConfig {
    /// Cartesian chart: y grows upward, free aspect ratio.
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            x_axis: AxisConfig::default(),
            y_axis: AxisConfig::default(),
            preserve_aspect_ratio: false,
            hardware_transforms: default_hardware_transforms(),
        }
    }

    /// Map chart: plane y grows downward and aspect ratio is preserved.
    #[must_use]
    pub fn map(viewport: Viewport) -> Self {
        Self {
            y_axis: AxisConfig::default().with_reversed(true),
            preserve_aspect_ratio: true,
            ..Self::new(viewport)
        }
    }

    #[must_use]
    pub fn with_x_axis(mut self, x_axis: AxisConfig) -> Self {
        self.x_axis = x_axis;
        self
    }

    #[must_use]
    pub fn with_y_axis(mut self, y_axis: AxisConfig) -> Self {
        self.y_axis = y_axis;
        self
    }

    #[must_use]
    pub fn with_preserve_aspect_ratio(mut self, enabled: bool) -> Self {
        self.preserve_aspect_ratio = enabled;
        self
    }

    #[must_use]
    pub fn with_hardware_transforms(mut self, enabled: bool) -> Self {
        self.hardware_transforms = enabled;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }
        for (name, axis) in [("x", self.x_axis), ("y", self.y_axis)] {
            if axis.min.is_some() != axis.max.is_some() {
                return Err(ChartError::InvalidConfig(format!(
                    "{name} axis needs both `min` and `max` or neither"
                )));
            }
        }
        Ok(())
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            ChartError::InvalidConfig(format!("failed to serialize chart config: {e}"))
        })
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidConfig(format!("failed to parse chart config: {e}")))?;
        config.validate()?;
        Ok(config)
    }
}

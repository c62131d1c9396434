use serde::{Deserialize, Serialize};

use crate::core::{TransformMode, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::render::{DrawInstruction, GroupAttributes};

/// Pixel-space label anchor of one entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelAnchor {
    pub index: usize,
    pub x: f64,
    pub y: f64,
}

/// Retained-scene update for one series.
///
/// A `Full` layer replaces every shape of the series. A `Fast` layer carries
/// no instructions: the backend keeps its shapes and only applies `group`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesLayer {
    pub series_id: String,
    pub mode: TransformMode,
    pub group: GroupAttributes,
    pub instructions: Vec<DrawInstruction>,
    /// Anchors in placement order (largest areas first for maps).
    pub labels: Vec<LabelAnchor>,
}

impl SeriesLayer {
    #[must_use]
    pub fn full(
        series_id: impl Into<String>,
        group: GroupAttributes,
        instructions: Vec<DrawInstruction>,
    ) -> Self {
        Self {
            series_id: series_id.into(),
            mode: TransformMode::Full,
            group,
            instructions,
            labels: Vec::new(),
        }
    }

    #[must_use]
    pub fn transform_only(series_id: impl Into<String>, group: GroupAttributes) -> Self {
        Self {
            series_id: series_id.into(),
            mode: TransformMode::Fast,
            group,
            instructions: Vec::new(),
            labels: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_labels(mut self, labels: Vec<LabelAnchor>) -> Self {
        self.labels = labels;
        self
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.mode == TransformMode::Full
    }

    pub fn validate(&self) -> ChartResult<()> {
        self.group.validate()?;
        if self.mode == TransformMode::Fast && !self.instructions.is_empty() {
            return Err(ChartError::InvalidData(format!(
                "transform-only layer `{}` must not carry shapes",
                self.series_id
            )));
        }
        for instruction in &self.instructions {
            instruction.validate()?;
        }
        Ok(())
    }
}

/// Backend-agnostic scene update for one redraw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderFrame {
    pub viewport: Viewport,
    pub layers: Vec<SeriesLayer>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            layers: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_layer(mut self, layer: SeriesLayer) -> Self {
        self.layers.push(layer);
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }

        for layer in &self.layers {
            layer.validate()?;
        }

        Ok(())
    }

    #[must_use]
    pub fn instruction_count(&self) -> usize {
        self.layers.iter().map(|layer| layer.instructions.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

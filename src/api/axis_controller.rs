use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::AxisState;
use crate::error::ChartResult;
use crate::render::Renderer;

use super::ChartEngine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisKind {
    X,
    Y,
}

impl<R: Renderer> ChartEngine<R> {
    #[must_use]
    pub fn axis(&self, kind: AxisKind) -> &AxisState {
        match kind {
            AxisKind::X => &self.axes.x,
            AxisKind::Y => &self.axes.y,
        }
    }

    fn axis_mut(&mut self, kind: AxisKind) -> &mut AxisState {
        match kind {
            AxisKind::X => &mut self.axes.x,
            AxisKind::Y => &mut self.axes.y,
        }
    }

    fn user_extremes_mut(&mut self, kind: AxisKind) -> &mut Option<(f64, f64)> {
        match kind {
            AxisKind::X => &mut self.user_x_extremes,
            AxisKind::Y => &mut self.user_y_extremes,
        }
    }

    /// Pins the visible domain of one axis; it no longer follows the data.
    pub fn set_axis_extremes(&mut self, kind: AxisKind, min: f64, max: f64) -> ChartResult<()> {
        let axis = self.axis_mut(kind);
        axis.set_extremes(min, max)?;
        let domain = axis.domain();
        *self.user_extremes_mut(kind) = domain;
        debug!(axis = ?kind, ?domain, "set axis extremes");
        self.emit_extremes_changed();
        Ok(())
    }

    /// Returns one axis to data-driven extremes on the next redraw.
    pub fn clear_axis_extremes(&mut self, kind: AxisKind) {
        *self.user_extremes_mut(kind) = None;
        self.axis_mut(kind).clear_extremes();
    }

    /// Moves the content by a pixel delta on both axes.
    pub fn pan(&mut self, delta_x_px: f64, delta_y_px: f64) -> ChartResult<()> {
        self.axes.x.pan_by_pixels(delta_x_px)?;
        self.axes.y.pan_by_pixels(delta_y_px)?;
        self.user_x_extremes = self.axes.x.domain();
        self.user_y_extremes = self.axes.y.domain();
        debug!(delta_x_px, delta_y_px, "panned");
        self.emit_extremes_changed();
        Ok(())
    }

    /// Scales both visible spans by `factor` around a data-space anchor
    /// (the domain centers by default). Spans never drop below each axis'
    /// `min_range`.
    pub fn zoom(&mut self, factor: f64, anchor: Option<(f64, f64)>) -> ChartResult<()> {
        self.axes.x.zoom(factor, anchor.map(|(x, _)| x))?;
        self.axes.y.zoom(factor, anchor.map(|(_, y)| y))?;
        self.user_x_extremes = self.axes.x.domain();
        self.user_y_extremes = self.axes.y.domain();
        debug!(factor, ?anchor, "zoomed");
        self.emit_extremes_changed();
        Ok(())
    }

    /// Data value to plot-area pixel.
    #[must_use]
    pub fn map_value_to_pixel(&self, kind: AxisKind, value: f64) -> f64 {
        self.axis(kind).to_pixels(value, true)
    }

    #[must_use]
    pub fn map_pixel_to_value(&self, kind: AxisKind, pixel: f64) -> f64 {
        self.axis(kind).to_value(pixel, true)
    }
}

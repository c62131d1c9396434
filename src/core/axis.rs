use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AxisOrientation {
    #[default]
    Horizontal,
    Vertical,
}

/// Axis-relative coordinate system consumed by every series translate.
///
/// Pixel mapping is `(value - min) * trans_a + min_pixel_padding`, measured
/// from the axis start. Vertical axes grow upward, so their pixels are
/// flipped against `len` unless the axis is also `reversed` (map charts use
/// reversed vertical axes so plane coordinates keep their y-down order).
///
/// `trans_a == (len - 2 * min_pixel_padding) / (max - min)` after every
/// mutation. A missing domain bound reads as `0` and keeps `trans_a` at `1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisState {
    min: Option<f64>,
    max: Option<f64>,
    len: f64,
    #[serde(default)]
    pos: f64,
    #[serde(default)]
    min_pixel_padding: f64,
    trans_a: f64,
    #[serde(default)]
    orientation: AxisOrientation,
    #[serde(default)]
    reversed: bool,
    #[serde(default)]
    min_range: Option<f64>,
    #[serde(default)]
    min_range_configured: bool,
}

impl AxisState {
    pub fn new(len: f64, orientation: AxisOrientation) -> ChartResult<Self> {
        validate_len(len)?;
        Ok(Self {
            min: None,
            max: None,
            len,
            pos: 0.0,
            min_pixel_padding: 0.0,
            trans_a: 1.0,
            orientation,
            reversed: false,
            min_range: None,
            min_range_configured: false,
        })
    }

    pub fn horizontal(len: f64) -> ChartResult<Self> {
        Self::new(len, AxisOrientation::Horizontal)
    }

    pub fn vertical(len: f64) -> ChartResult<Self> {
        Self::new(len, AxisOrientation::Vertical)
    }

    pub fn with_domain(mut self, min: f64, max: f64) -> ChartResult<Self> {
        self.set_extremes(min, max)?;
        Ok(self)
    }

    #[must_use]
    pub fn with_reversed(mut self, reversed: bool) -> Self {
        self.reversed = reversed;
        self
    }

    #[must_use]
    pub fn with_pos(mut self, pos: f64) -> Self {
        self.pos = pos;
        self
    }

    /// Pins `min_range`; the data-driven heuristic no longer touches it.
    pub fn with_configured_min_range(mut self, min_range: Option<f64>) -> ChartResult<Self> {
        if let Some(range) = min_range {
            if !range.is_finite() || range <= 0.0 {
                return Err(ChartError::InvalidAxis(
                    "configured min range must be finite and > 0".to_owned(),
                ));
            }
        }
        self.min_range = min_range;
        self.min_range_configured = min_range.is_some();
        Ok(self)
    }

    #[must_use]
    pub fn min(&self) -> Option<f64> {
        self.min
    }

    #[must_use]
    pub fn max(&self) -> Option<f64> {
        self.max
    }

    #[must_use]
    pub fn domain(&self) -> Option<(f64, f64)> {
        Some((self.min?, self.max?))
    }

    #[must_use]
    pub fn len(&self) -> f64 {
        self.len
    }

    #[must_use]
    pub fn pos(&self) -> f64 {
        self.pos
    }

    #[must_use]
    pub fn trans_a(&self) -> f64 {
        self.trans_a
    }

    #[must_use]
    pub fn min_pixel_padding(&self) -> f64 {
        self.min_pixel_padding
    }

    #[must_use]
    pub fn orientation(&self) -> AxisOrientation {
        self.orientation
    }

    #[must_use]
    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    /// `true` when pixels run against the linear formula.
    #[must_use]
    pub fn is_flipped(&self) -> bool {
        (self.orientation == AxisOrientation::Vertical) != self.reversed
    }

    #[must_use]
    pub fn min_range(&self) -> Option<f64> {
        self.min_range
    }

    #[must_use]
    pub fn has_configured_min_range(&self) -> bool {
        self.min_range_configured
    }

    /// Sets the visible domain, widening it around its center when it is
    /// narrower than `min_range`.
    pub fn set_extremes(&mut self, min: f64, max: f64) -> ChartResult<()> {
        if !min.is_finite() || !max.is_finite() {
            return Err(ChartError::InvalidAxis(
                "axis extremes must be finite".to_owned(),
            ));
        }
        if min > max {
            return Err(ChartError::InvalidAxis(format!(
                "axis min ({min}) must not exceed max ({max})"
            )));
        }

        let (mut min, mut max) = (min, max);
        if let Some(min_range) = self.min_range {
            let span = max - min;
            if span < min_range {
                let grow = (min_range - span) / 2.0;
                min -= grow;
                max += grow;
            }
        }
        if max - min <= 0.0 {
            return Err(ChartError::InvalidAxis(
                "axis span must be > 0".to_owned(),
            ));
        }

        self.min = Some(min);
        self.max = Some(max);
        self.recompute_trans_a();
        Ok(())
    }

    pub fn clear_extremes(&mut self) {
        self.min = None;
        self.max = None;
        self.recompute_trans_a();
    }

    pub fn set_len(&mut self, len: f64) -> ChartResult<()> {
        validate_len(len)?;
        self.len = len;
        self.recompute_trans_a();
        Ok(())
    }

    pub fn set_min_pixel_padding(&mut self, padding: f64) -> ChartResult<()> {
        if !padding.is_finite() || padding < 0.0 || padding * 2.0 >= self.len {
            return Err(ChartError::InvalidAxis(format!(
                "pixel padding {padding} does not fit axis length {}",
                self.len
            )));
        }
        self.min_pixel_padding = padding;
        self.recompute_trans_a();
        Ok(())
    }

    /// Lowers `min_range` to `candidate` unless it was configured explicitly.
    pub fn fold_min_range(&mut self, candidate: f64) {
        if self.min_range_configured || !candidate.is_finite() || candidate <= 0.0 {
            return;
        }
        self.min_range = Some(self.min_range.map_or(candidate, |existing| existing.min(candidate)));
    }

    fn recompute_trans_a(&mut self) {
        self.trans_a = match self.domain() {
            Some((min, max)) if max > min => {
                let mut usable = self.len - 2.0 * self.min_pixel_padding;
                if usable <= 0.0 {
                    usable = self.len;
                }
                usable / (max - min)
            }
            _ => 1.0,
        };
    }

    #[must_use]
    fn min_or_zero(&self) -> f64 {
        self.min.unwrap_or(0.0)
    }

    /// Unflipped pane-coordinate mapping used for path geometry.
    #[must_use]
    pub fn linear_to_pixels(&self, value: f64) -> f64 {
        (value - self.min_or_zero()) * self.trans_a + self.min_pixel_padding
    }

    /// Maps a data value to pixels; `pane_coordinates` omits the `pos` offset.
    #[must_use]
    pub fn to_pixels(&self, value: f64, pane_coordinates: bool) -> f64 {
        let linear = self.linear_to_pixels(value);
        let pixel = if self.is_flipped() {
            self.len - linear
        } else {
            linear
        };
        if pane_coordinates {
            pixel
        } else {
            pixel + self.pos
        }
    }

    /// Inverse of [`AxisState::to_pixels`].
    #[must_use]
    pub fn to_value(&self, pixel: f64, pane_coordinates: bool) -> f64 {
        let pixel = if pane_coordinates {
            pixel
        } else {
            pixel - self.pos
        };
        let linear = if self.is_flipped() {
            self.len - pixel
        } else {
            pixel
        };
        (linear - self.min_pixel_padding) / self.trans_a + self.min_or_zero()
    }

    /// Shifts the domain so content moves by `delta_px` pixels.
    pub fn pan_by_pixels(&mut self, delta_px: f64) -> ChartResult<()> {
        let (min, max) = self.require_domain()?;
        if !delta_px.is_finite() {
            return Err(ChartError::InvalidAxis("pan delta must be finite".to_owned()));
        }
        let shift = delta_px / self.trans_a;
        let shift = if self.is_flipped() { shift } else { -shift };
        self.set_extremes(min + shift, max + shift)
    }

    /// Scales the visible span by `factor` around `anchor` (domain center by
    /// default). Factors below one zoom in; the span never drops below
    /// `min_range`.
    pub fn zoom(&mut self, factor: f64, anchor: Option<f64>) -> ChartResult<()> {
        let (min, max) = self.require_domain()?;
        if !factor.is_finite() || factor <= 0.0 {
            return Err(ChartError::InvalidAxis(
                "zoom factor must be finite and > 0".to_owned(),
            ));
        }
        let span = max - min;
        let anchor = anchor.unwrap_or(min + span / 2.0);
        let ratio = (anchor - min) / span;
        let new_span = (span * factor).max(self.min_range.unwrap_or(0.0));
        let new_min = anchor - ratio * new_span;
        self.set_extremes(new_min, new_min + new_span)
    }

    fn require_domain(&self) -> ChartResult<(f64, f64)> {
        self.domain().ok_or_else(|| {
            ChartError::InvalidAxis("axis has no extremes yet".to_owned())
        })
    }
}

/// The x/y axis pair shared by every series of a chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisPair {
    pub x: AxisState,
    pub y: AxisState,
}

impl AxisPair {
    #[must_use]
    pub fn new(x: AxisState, y: AxisState) -> Self {
        Self { x, y }
    }

    /// Forces one shared `trans_a` (the smaller one) and centers the slack
    /// axis with pixel padding, so one data unit spans the same number of
    /// pixels in both directions.
    pub fn preserve_aspect_ratio(&mut self) -> ChartResult<()> {
        let (Some((x_min, x_max)), Some((y_min, y_max))) = (self.x.domain(), self.y.domain())
        else {
            return Ok(());
        };
        let x_span = x_max - x_min;
        let y_span = y_max - y_min;
        let trans_a = (self.x.len / x_span).min(self.y.len / y_span);

        self.x.min_pixel_padding = 0.0;
        self.y.min_pixel_padding = 0.0;
        self.x.set_min_pixel_padding(((self.x.len - x_span * trans_a) / 2.0).max(0.0))?;
        self.y.set_min_pixel_padding(((self.y.len - y_span * trans_a) / 2.0).max(0.0))?;
        Ok(())
    }
}

fn validate_len(len: f64) -> ChartResult<()> {
    if !len.is_finite() || len <= 0.0 {
        return Err(ChartError::InvalidAxis(format!(
            "axis length must be finite and > 0, got {len}"
        )));
    }
    Ok(())
}

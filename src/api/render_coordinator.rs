use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::core::{AxisState, ValueExtremes};
use crate::error::ChartResult;
use crate::extensions::PluginEvent;
use crate::render::{RenderFrame, Renderer};
use crate::series::{RedrawEnvironment, TranslateContext, TranslateSummary};

use super::ChartEngine;

/// Outcome of one redraw, per series in draw order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedrawReport {
    pub environment: RedrawEnvironment,
    pub series: Vec<(String, TranslateSummary)>,
    pub instruction_count: usize,
}

impl RedrawReport {
    #[must_use]
    pub fn summary(&self, series_id: &str) -> Option<TranslateSummary> {
        self.series
            .iter()
            .find(|(id, _)| id == series_id)
            .map(|(_, summary)| *summary)
    }
}

impl<R: Renderer> ChartEngine<R> {
    /// Runs one redraw: data, extremes, translate, draw, render.
    ///
    /// Holding `&mut self` for the whole pass keeps caches and the retained
    /// snapshot consistent; a redraw cannot interleave with another one.
    pub fn redraw(&mut self) -> ChartResult<()> {
        let environment = RedrawEnvironment {
            resizing: self.resizing,
            hardware_transforms: self.config.hardware_transforms,
        };

        for series in &mut self.series {
            series.process_data(&mut self.axes)?;
        }

        let x_data = merge_extremes(self.series.iter().map(|series| series.x_extremes()));
        apply_extremes(&mut self.axes.x, self.user_x_extremes, x_data)?;

        self.stacks.clear();
        let visible_x_min = self.axes.x.min();
        for series in &mut self.series {
            series.prepare_values(visible_x_min, &mut self.stacks);
        }

        let y_data = merge_extremes(
            self.series
                .iter()
                .map(|series| series.y_extremes(&self.stacks)),
        );
        apply_extremes(&mut self.axes.y, self.user_y_extremes, y_data)?;

        if self.config.preserve_aspect_ratio {
            self.axes.preserve_aspect_ratio()?;
        }

        let context = TranslateContext {
            environment,
            stacks: &self.stacks,
        };
        let mut frame = RenderFrame::new(self.viewport);
        let mut summaries = Vec::with_capacity(self.series.len());
        for series in &mut self.series {
            let summary = series.translate(&self.axes, context);
            frame.layers.push(series.draw_points());
            summaries.push((series.id().to_owned(), summary));
        }

        for (series_index, (_, summary)) in summaries.iter().enumerate() {
            self.emit_plugin_event(PluginEvent::SeriesTranslated {
                series_index,
                mode: summary.mode,
                translated: summary.translated,
            });
        }

        self.renderer.render(&frame)?;
        self.resizing = false;

        let report = RedrawReport {
            environment,
            series: summaries,
            instruction_count: frame.instruction_count(),
        };
        debug!(
            series = report.series.len(),
            instructions = report.instruction_count,
            resizing = environment.resizing,
            "redraw complete"
        );
        self.last_redraw = Some(report);
        self.emit_plugin_event(PluginEvent::Rendered);
        Ok(())
    }
}

fn merge_extremes(
    extremes: impl IntoIterator<Item = Option<ValueExtremes>>,
) -> Option<ValueExtremes> {
    extremes
        .into_iter()
        .flatten()
        .filter(|e| e.min.is_finite() && e.max.is_finite())
        .reduce(|a, b| ValueExtremes {
            min: a.min.min(b.min),
            max: a.max.max(b.max),
        })
}

/// User extremes win; otherwise the axis follows the data. A single-value
/// range is widened by half a unit each way.
fn apply_extremes(
    axis: &mut AxisState,
    user: Option<(f64, f64)>,
    data: Option<ValueExtremes>,
) -> ChartResult<()> {
    let (min, max) = match (user, data) {
        (Some(domain), _) => domain,
        (None, Some(data)) if data.max > data.min => (data.min, data.max),
        (None, Some(data)) => (data.min - 0.5, data.max + 0.5),
        (None, None) => {
            trace!("axis has neither user nor data extremes");
            return Ok(());
        }
    };
    if axis.domain() == Some((min, max)) {
        return Ok(());
    }
    axis.set_extremes(min, max).inspect_err(|err| {
        warn!(error = %err, min, max, "rejected axis extremes");
    })
}

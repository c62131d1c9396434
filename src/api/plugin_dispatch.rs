use crate::extensions::{PluginContext, PluginEvent};
use crate::render::Renderer;

use super::ChartEngine;

impl<R: Renderer> ChartEngine<R> {
    pub(super) fn plugin_context(&self) -> PluginContext {
        PluginContext {
            viewport: self.viewport,
            x_domain: self.axes.x.domain(),
            y_domain: self.axes.y.domain(),
            series_count: self.series.len(),
            points_len: self.series.iter().map(|series| series.point_count()).sum(),
        }
    }

    pub(super) fn emit_plugin_event(&mut self, event: PluginEvent) {
        if self.plugins.is_empty() {
            return;
        }
        let context = self.plugin_context();
        for plugin in &mut self.plugins {
            plugin.on_event(event, context);
        }
    }

    pub(super) fn emit_extremes_changed(&mut self) {
        let (Some((x_min, x_max)), Some((y_min, y_max))) =
            (self.axes.x.domain(), self.axes.y.domain())
        else {
            return;
        };
        self.emit_plugin_event(PluginEvent::ExtremesChanged {
            x_min,
            x_max,
            y_min,
            y_max,
        });
    }
}

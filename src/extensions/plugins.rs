use serde::{Deserialize, Serialize};

use crate::core::{TransformMode, Viewport};

/// Read-only state snapshot passed to plugin hooks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PluginContext {
    pub viewport: Viewport,
    pub x_domain: Option<(f64, f64)>,
    pub y_domain: Option<(f64, f64)>,
    pub series_count: usize,
    pub points_len: usize,
}

/// Event stream exposed to plugins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PluginEvent {
    DataUpdated {
        series_index: usize,
        points_len: usize,
    },
    ExtremesChanged {
        x_min: f64,
        x_max: f64,
        y_min: f64,
        y_max: f64,
    },
    ViewportResized {
        width: u32,
        height: u32,
    },
    /// One series finished translating; label placement hooks in here.
    SeriesTranslated {
        series_index: usize,
        mode: TransformMode,
        translated: usize,
    },
    Rendered,
}

/// Extension hook interface for bounded custom logic.
///
/// Plugins can observe events and read engine context without mutating core
/// internals directly.
pub trait ChartPlugin {
    fn id(&self) -> &str;
    fn on_event(&mut self, event: PluginEvent, context: PluginContext);
}

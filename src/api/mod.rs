mod axis_controller;
mod engine_config;
mod plugin_dispatch;
mod plugin_registry;
mod render_coordinator;
mod series_controller;

pub use axis_controller::AxisKind;
pub use engine_config::{AxisConfig, ChartEngineConfig};
pub use render_coordinator::RedrawReport;

use tracing::debug;

use crate::core::{AxisOrientation, AxisPair, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::extensions::{ChartPlugin, PluginEvent};
use crate::render::Renderer;
use crate::series::{SeriesKind, StackRegistry};

/// Chart facade: owns axes, series, plugins and the renderer.
///
/// Every mutation only records state; [`ChartEngine::redraw`] runs the
/// data, extremes, translate and draw passes in order.
pub struct ChartEngine<R: Renderer> {
    renderer: R,
    config: ChartEngineConfig,
    viewport: Viewport,
    axes: AxisPair,
    user_x_extremes: Option<(f64, f64)>,
    user_y_extremes: Option<(f64, f64)>,
    series: Vec<Box<dyn SeriesKind>>,
    stacks: StackRegistry,
    plugins: Vec<Box<dyn ChartPlugin>>,
    resizing: bool,
    last_redraw: Option<RedrawReport>,
}

impl<R: Renderer> ChartEngine<R> {
    pub fn new(renderer: R, config: ChartEngineConfig) -> ChartResult<Self> {
        config.validate()?;
        let viewport = config.viewport;
        let axes = AxisPair::new(
            config
                .x_axis
                .build(f64::from(viewport.width), AxisOrientation::Horizontal)?,
            config
                .y_axis
                .build(f64::from(viewport.height), AxisOrientation::Vertical)?,
        );
        debug!(
            width = viewport.width,
            height = viewport.height,
            preserve_aspect_ratio = config.preserve_aspect_ratio,
            "created chart engine"
        );

        Ok(Self {
            renderer,
            config,
            viewport,
            axes,
            user_x_extremes: config.x_axis.extremes(),
            user_y_extremes: config.y_axis.extremes(),
            series: Vec::new(),
            stacks: StackRegistry::new(),
            plugins: Vec::new(),
            resizing: false,
            last_redraw: None,
        })
    }

    #[must_use]
    pub fn config(&self) -> ChartEngineConfig {
        self.config
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn axes(&self) -> &AxisPair {
        &self.axes
    }

    /// Report of the last completed redraw.
    #[must_use]
    pub fn last_redraw(&self) -> Option<&RedrawReport> {
        self.last_redraw.as_ref()
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Changes the plot size; the next redraw runs a full translate.
    pub fn resize(&mut self, viewport: Viewport) -> ChartResult<()> {
        if !viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        if viewport == self.viewport {
            return Ok(());
        }
        self.axes.x.set_len(f64::from(viewport.width))?;
        self.axes.y.set_len(f64::from(viewport.height))?;
        self.viewport = viewport;
        self.resizing = true;
        self.emit_plugin_event(PluginEvent::ViewportResized {
            width: viewport.width,
            height: viewport.height,
        });
        Ok(())
    }
}

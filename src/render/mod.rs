mod frame;
mod null_renderer;
mod primitives;

pub use frame::{LabelAnchor, RenderFrame, SeriesLayer};
pub use null_renderer::NullRenderer;
pub use primitives::{Color, DrawInstruction, GroupAttributes, PointAttribs};

use crate::error::ChartResult;

/// Contract implemented by any rendering backend.
///
/// Backends keep a retained scene per series: full layers replace its shapes,
/// transform-only layers move and scale the existing group.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()>;
}

use crate::error::ChartResult;
use crate::render::{RenderFrame, Renderer};

/// No-op renderer used by tests and headless engine usage.
///
/// It still validates frame content so tests can catch invalid geometry before
/// a real backend is introduced. The last frame is retained for inspection.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub frames_rendered: usize,
    pub last_instruction_count: usize,
    pub full_layers: usize,
    pub transform_only_layers: usize,
    pub last_frame: Option<RenderFrame>,
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;
        self.frames_rendered += 1;
        self.last_instruction_count = frame.instruction_count();
        for layer in &frame.layers {
            if layer.is_full() {
                self.full_layers += 1;
            } else {
                self.transform_only_layers += 1;
            }
        }
        self.last_frame = Some(frame.clone());
        Ok(())
    }
}

mod frame;
mod null_renderer;

pub use frame::{DrawOutcome, PlotFrame};
pub use null_renderer::{NullRenderer, RecordedFrame};

use crate::error::PlotResult;

/// Contract implemented by the plotting library binding.
///
/// Backends receive fully prepared data and display state so that drawing
/// stays isolated from step reshaping and layout annotation.
pub trait PlotRenderer {
    fn draw(&mut self, frame: PlotFrame<'_>) -> PlotResult<DrawOutcome>;

    /// Called when the observed plot container changes size.
    fn resize(&mut self) {}
}

use crate::core::{PlotConfig, PlotLayout, Trace};
use crate::error::{PlotError, PlotResult};
use crate::render::{DrawOutcome, PlotFrame, PlotRenderer};

/// Owned copy of a drawn frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedFrame {
    pub data: Vec<Trace>,
    pub layout: PlotLayout,
    pub config: PlotConfig,
}

/// Headless renderer used by tests and server-side consumers.
///
/// It records every frame and can play back a negotiated layout the way a
/// real plotting library reports autoscale results.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub frames: Vec<RecordedFrame>,
    pub resize_count: usize,
    /// Returned from the next draw as the library-negotiated layout.
    pub negotiated_layout: Option<PlotLayout>,
    /// Makes the next draw fail.
    pub fail_next_draw: bool,
}

impl NullRenderer {
    #[must_use]
    pub fn last_frame(&self) -> Option<&RecordedFrame> {
        self.frames.last()
    }
}

impl PlotRenderer for NullRenderer {
    fn draw(&mut self, frame: PlotFrame<'_>) -> PlotResult<DrawOutcome> {
        if std::mem::take(&mut self.fail_next_draw) {
            return Err(PlotError::Render("null renderer asked to fail".to_owned()));
        }
        self.frames.push(RecordedFrame {
            data: frame.data.to_vec(),
            layout: frame.layout.clone(),
            config: frame.config.clone(),
        });
        Ok(DrawOutcome {
            layout: self.negotiated_layout.take(),
        })
    }

    fn resize(&mut self) {
        self.resize_count += 1;
    }
}

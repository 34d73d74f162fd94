use crate::core::{PlotConfig, PlotLayout, Trace};

/// Everything a backend needs to draw one plot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotFrame<'a> {
    pub data: &'a [Trace],
    pub layout: &'a PlotLayout,
    pub config: &'a PlotConfig,
}

impl PlotFrame<'_> {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Result of a successful draw.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DrawOutcome {
    /// Layout the library settled on (autoscale, legend toggles), when it
    /// differs from the one it was handed.
    pub layout: Option<PlotLayout>,
}

impl DrawOutcome {
    #[must_use]
    pub fn with_layout(layout: PlotLayout) -> Self {
        Self {
            layout: Some(layout),
        }
    }
}

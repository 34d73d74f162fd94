use serde::{Deserialize, Serialize};

use crate::core::{ReshapeOptions, StepMarkerStyle};
use crate::error::{PlotError, PlotResult};

/// How the surface reacts to size observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResizeBehavior {
    /// Also resize on the initial observation, not only on later changes.
    #[serde(default)]
    pub resize_on_observe: bool,
}

/// Plot surface bootstrap configuration.
///
/// Serializable so hosts can persist surface setup next to their chart
/// definitions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlotSurfaceConfig {
    #[serde(default)]
    pub step_marker: StepMarkerStyle,
    #[serde(default)]
    pub reshape: ReshapeOptions,
    #[serde(default)]
    pub resize: ResizeBehavior,
}

impl PlotSurfaceConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the style of the current-step marker line.
    #[must_use]
    pub fn with_step_marker(mut self, step_marker: StepMarkerStyle) -> Self {
        self.step_marker = step_marker;
        self
    }

    /// Sets how many traces are reshaped between yields to the host.
    #[must_use]
    pub fn with_yield_every_traces(mut self, traces: usize) -> Self {
        self.reshape.yield_every_traces = traces;
        self
    }

    #[must_use]
    pub fn with_resize_on_observe(mut self, enabled: bool) -> Self {
        self.resize.resize_on_observe = enabled;
        self
    }

    pub fn validate(&self) -> PlotResult<()> {
        let width = self.step_marker.width;
        if !width.is_finite() || width <= 0.0 {
            return Err(PlotError::InvalidData(format!(
                "step marker width must be finite and > 0, got {width}"
            )));
        }
        if self.step_marker.color.is_empty() {
            return Err(PlotError::InvalidData(
                "step marker color must not be empty".to_owned(),
            ));
        }
        Ok(())
    }

    pub fn to_json_pretty(&self) -> PlotResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            PlotError::InvalidData(format!("failed to serialize surface config: {e}"))
        })
    }

    pub fn from_json_str(input: &str) -> PlotResult<Self> {
        let config: Self = serde_json::from_str(input).map_err(|e| {
            PlotError::InvalidData(format!("failed to parse surface config json: {e}"))
        })?;
        config.validate()?;
        Ok(config)
    }
}

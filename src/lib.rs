//! plot-step-rs: step-wise reshaping of experiment output series.
//!
//! Chart definitions are bound to growing output series; as a step counter
//! advances, each trace is sliced to what should be visible at that step.
//! Reshapes run through a single-slot async pipeline per plot so rapid step
//! changes collapse onto the newest one.

pub mod api;
pub mod core;
pub mod error;
pub mod render;
pub mod telemetry;

pub use api::{PlotProps, PlotSurface, PlotSurfaceConfig, ReshapePipeline};
pub use error::{PlotError, PlotResult};

mod config;
mod exhaust;
mod json_contract;
mod pipeline;
mod surface;

pub use config::{PlotSurfaceConfig, ResizeBehavior};
pub use exhaust::{Admission, ExhaustWithTrailing, SlotState};
pub use json_contract::{outputs_from_json_str, series_from_json_str, series_to_json_pretty};
pub use pipeline::{PipelineStats, Reshape, ReshapePipeline};
pub use surface::{EditCallback, PlotProps, PlotSurface, TitleBar};

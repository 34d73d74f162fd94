pub mod classifier;
pub mod layout;
pub mod operation;
pub mod reshape;
pub mod trace;
pub mod types;

pub use classifier::{
    AggregationClassifier, KindAggregationClassifier, is_axis_available, last_operation,
    last_operation_types_match,
};
pub use layout::{PlotConfig, PlotLayout, StepMarkerStyle, annotate_layout};
pub use operation::{AggregationKind, GET_TAG, Operation, OperationKind, OutputsMap};
pub use reshape::{DataReshaper, ReshapeOptions, ReshapeRequest, yield_to_host};
pub use trace::{AxisValues, PreparedData, RawSeriesData, Trace};
pub use types::{Axis, PlotDefinition, PlotKind, SeriesBinding};

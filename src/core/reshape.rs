use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace};

use super::classifier::{is_axis_available, last_operation, last_operation_types_match};
use super::{
    AggregationClassifier, Axis, AxisValues, Operation, OutputsMap, PlotDefinition, PlotKind,
    PreparedData, RawSeriesData, Trace,
};

/// Tuning for the per-trace reshape loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReshapeOptions {
    /// Yield back to the host executor after this many traces. Zero is
    /// treated as one.
    #[serde(default = "default_yield_every_traces")]
    pub yield_every_traces: usize,
}

impl Default for ReshapeOptions {
    fn default() -> Self {
        Self {
            yield_every_traces: default_yield_every_traces(),
        }
    }
}

fn default_yield_every_traces() -> usize {
    1
}

/// Everything one reshape cycle reads. Shared so that superseded requests
/// cost a pointer copy rather than a data copy.
#[derive(Debug, Clone, PartialEq)]
pub struct ReshapeRequest {
    pub definition: Arc<PlotDefinition>,
    pub outputs: Arc<OutputsMap>,
    pub data: Arc<RawSeriesData>,
    pub current_step: usize,
}

impl ReshapeRequest {
    #[must_use]
    pub fn new(
        definition: PlotDefinition,
        outputs: OutputsMap,
        data: RawSeriesData,
        current_step: usize,
    ) -> Self {
        Self {
            definition: Arc::new(definition),
            outputs: Arc::new(outputs),
            data: Arc::new(data),
            current_step,
        }
    }
}

/// Hands control back to the executor for one scheduling tick.
pub async fn yield_to_host() {
    tokio::task::yield_now().await;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TraceOutcome {
    Reshaped,
    Skipped(&'static str),
}

/// Derives the slice of every trace to display at a given step.
///
/// Input data is never mutated: the result starts as a deep copy and each
/// trace is rewritten according to the plot kind. Traces whose bindings or
/// data do not fit the kind's rule are left as copied.
#[derive(Clone)]
pub struct DataReshaper {
    classifier: Arc<dyn AggregationClassifier>,
    options: ReshapeOptions,
}

impl std::fmt::Debug for DataReshaper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataReshaper")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl DataReshaper {
    #[must_use]
    pub fn new(classifier: Arc<dyn AggregationClassifier>) -> Self {
        Self {
            classifier,
            options: ReshapeOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: ReshapeOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn options(&self) -> ReshapeOptions {
        self.options
    }

    pub async fn reshape_request(&self, request: &ReshapeRequest) -> PreparedData {
        self.reshape(
            &request.definition,
            &request.outputs,
            &request.data,
            request.current_step,
        )
        .await
    }

    pub async fn reshape(
        &self,
        definition: &PlotDefinition,
        outputs: &OutputsMap,
        raw: &[Trace],
        current_step: usize,
    ) -> PreparedData {
        let mut result = raw.to_vec();
        let Some(kind) = self.resolve_kind(definition) else {
            debug!(
                plot_type = ?definition.plot_type,
                traces = raw.len(),
                "passing through data of unsupported plot type"
            );
            return result;
        };

        let yield_every = self.options.yield_every_traces.max(1);
        for (index, (source, target)) in raw.iter().zip(result.iter_mut()).enumerate() {
            let cx = TraceContext {
                classifier: self.classifier.as_ref(),
                definition,
                outputs,
                source,
                index,
                step: current_step,
            };
            let outcome = match kind {
                PlotKind::Bar => cx.reshape_bar(target),
                PlotKind::Box => cx.reshape_box(target),
                PlotKind::Histogram => cx.reshape_histogram(target),
                PlotKind::Line | PlotKind::Scatter => cx.reshape_line(kind, target),
            };
            if let TraceOutcome::Skipped(reason) = outcome {
                trace!(index, kind = kind.name(), reason, "trace left unchanged");
            }
            if (index + 1) % yield_every == 0 || index + 1 == raw.len() {
                yield_to_host().await;
            }
        }

        debug!(
            kind = kind.name(),
            traces = result.len(),
            current_step,
            "reshaped plot data"
        );
        result
    }

    fn resolve_kind(&self, definition: &PlotDefinition) -> Option<PlotKind> {
        let kind = definition.kind()?;
        self.classifier
            .valid_plot_types()
            .contains(&kind)
            .then_some(kind)
    }
}

struct TraceContext<'a> {
    classifier: &'a dyn AggregationClassifier,
    definition: &'a PlotDefinition,
    outputs: &'a OutputsMap,
    source: &'a Trace,
    index: usize,
    step: usize,
}

impl TraceContext<'_> {
    fn available(&self, axis: Axis) -> bool {
        is_axis_available(self.definition, self.index, axis)
    }

    fn last_operation(&self, axis: Axis) -> Option<&Operation> {
        last_operation(self.definition, self.outputs, axis, self.index)
    }

    fn aggregates(&self, axis: Axis) -> bool {
        self.classifier
            .classifies_as_aggregation(self.last_operation(axis))
    }

    fn label(&self, axis: Axis) -> Option<String> {
        self.definition
            .binding(self.index)
            .and_then(|binding| binding.label(axis))
    }

    /// Only the current step's value, labelled by the trace name.
    fn reshape_bar(&self, target: &mut Trace) -> TraceOutcome {
        if !self.available(Axis::Y) {
            return TraceOutcome::Skipped("bar trace without y binding");
        }
        let Some(y) = self.source.series(Axis::Y) else {
            return TraceOutcome::Skipped("bar trace without y series");
        };

        let value = point_at(y, self.step).unwrap_or(Value::Null);
        let category = self.label(Axis::Y).map_or(Value::Null, Value::String);
        target.y = Some(AxisValues::Series(vec![value]));
        target.x = Some(AxisValues::Series(vec![category]));
        TraceOutcome::Reshaped
    }

    fn reshape_box(&self, target: &mut Trace) -> TraceOutcome {
        if !self.available(Axis::Y) || self.available(Axis::X) {
            return TraceOutcome::Skipped("box trace must bind y only");
        }
        let Some(y) = self.source.series(Axis::Y) else {
            return TraceOutcome::Skipped("box trace without y series");
        };

        let last = self.last_operation(Axis::Y);
        target.name = self.label(Axis::Y).map(Value::String);
        if self.classifier.classifies_as_aggregation(last) {
            target.y = Some(prefix(y, self.step));
        }
        // A `get` tail samples the current step even when it also classifies
        // as an aggregation.
        if last.is_some_and(Operation::is_get) {
            target.y = point_at(y, self.step).map(AxisValues::Scalar);
        }
        TraceOutcome::Reshaped
    }

    fn reshape_histogram(&self, target: &mut Trace) -> TraceOutcome {
        let x_available = self.available(Axis::X);
        if x_available && self.available(Axis::Y) {
            return TraceOutcome::Skipped("histogram trace binds both axes");
        }
        let axis = if x_available { Axis::X } else { Axis::Y };
        let Some(last) = self.last_operation(axis) else {
            return TraceOutcome::Skipped("histogram trace without operation chain");
        };
        let Some(series) = self.source.series(axis) else {
            return TraceOutcome::Skipped("histogram trace without series");
        };

        target.name = self.label(axis).map(Value::String);
        let values = if last.is_get() {
            point_at(series, self.step)
                .map(unwrap_nested_scalar)
                .map(AxisValues::Scalar)
        } else {
            Some(prefix(series, self.step))
        };
        target.set_axis(axis, values);
        TraceOutcome::Reshaped
    }

    fn reshape_line(&self, kind: PlotKind, target: &mut Trace) -> TraceOutcome {
        target.trace_type = Some(PlotKind::Scatter.name().to_owned());
        let mode = if kind == PlotKind::Scatter {
            "markers"
        } else {
            "lines"
        };
        target.mode = Some(mode.to_owned());

        let x_available = self.available(Axis::X);
        let y_available = self.available(Axis::Y);

        if x_available
            && y_available
            && last_operation_types_match(self.classifier, self.definition, self.outputs, self.index)
        {
            let (Some(x), Some(y)) = (self.source.series(Axis::X), self.source.series(Axis::Y))
            else {
                return TraceOutcome::Skipped("line trace without x/y series");
            };
            if self.aggregates(Axis::X) {
                target.x = Some(prefix(x, self.step));
                target.y = Some(prefix(y, self.step));
            } else {
                target.x = point_at(x, self.step).map(AxisValues::Scalar);
                target.y = point_at(y, self.step).map(AxisValues::Scalar);
            }
            return TraceOutcome::Reshaped;
        }

        if !x_available && y_available && self.aggregates(Axis::Y) {
            let Some(y) = self.source.series(Axis::Y) else {
                return TraceOutcome::Skipped("line trace without y series");
            };
            target.y = Some(prefix(y, self.step));
            return TraceOutcome::Reshaped;
        }

        TraceOutcome::Skipped("no line rule matches the trace bindings")
    }
}

/// Value recorded at 1-based `step`.
fn point_at(series: &[Value], step: usize) -> Option<Value> {
    step.checked_sub(1)
        .and_then(|index| series.get(index))
        .cloned()
}

/// Values recorded up to and including `step`.
fn prefix(series: &[Value], step: usize) -> AxisValues {
    AxisValues::Series(series[..step.min(series.len())].to_vec())
}

fn unwrap_nested_scalar(value: Value) -> Value {
    match value {
        Value::Array(mut items) if !items.is_empty() => items.swap_remove(0),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::{point_at, prefix, unwrap_nested_scalar};
    use crate::core::AxisValues;

    #[test]
    fn point_at_is_one_based_and_total() {
        let series = vec![json!(10), json!(20)];
        assert_eq!(point_at(&series, 1), Some(json!(10)));
        assert_eq!(point_at(&series, 2), Some(json!(20)));
        assert_eq!(point_at(&series, 0), None);
        assert_eq!(point_at(&series, 3), None);
    }

    #[test]
    fn prefix_clamps_to_series_length() {
        let series = vec![json!(1), json!(2), json!(3)];
        assert_eq!(prefix(&series, 0), AxisValues::Series(Vec::new()));
        assert_eq!(prefix(&series, 2), AxisValues::series([1, 2]));
        assert_eq!(prefix(&series, 9), AxisValues::series([1, 2, 3]));
    }

    #[test]
    fn nested_scalars_unwrap_only_when_non_empty() {
        assert_eq!(unwrap_nested_scalar(json!([4.5, 9])), json!(4.5));
        assert_eq!(unwrap_nested_scalar(json!([])), json!([]));
        assert_eq!(unwrap_nested_scalar(json!(3)), json!(3));
        assert_eq!(unwrap_nested_scalar(Value::Null), Value::Null);
    }
}

use smallvec::SmallVec;

use super::{AggregationKind, Axis, Operation, OperationKind, OutputsMap, PlotDefinition, PlotKind};

/// Analysis-side knowledge the reshaper consumes but does not own.
pub trait AggregationClassifier: Send + Sync {
    /// Whether `operation` reveals accumulated history as steps advance
    /// rather than a single per-step sample.
    fn is_single_step_aggregation(&self, operation: &Operation) -> bool;

    /// Plot kinds the host currently accepts.
    fn valid_plot_types(&self) -> SmallVec<[PlotKind; 5]> {
        SmallVec::from_slice(&PlotKind::ALL)
    }

    /// Absent operations never classify as aggregations.
    fn classifies_as_aggregation(&self, operation: Option<&Operation>) -> bool {
        operation.is_some_and(|operation| self.is_single_step_aggregation(operation))
    }
}

/// Classifies by operation kind: aggregations in the configured set reveal
/// cumulatively, everything else is a point operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindAggregationClassifier {
    aggregations: SmallVec<[AggregationKind; 7]>,
}

impl Default for KindAggregationClassifier {
    fn default() -> Self {
        Self {
            aggregations: SmallVec::from_slice(&AggregationKind::ALL),
        }
    }
}

impl KindAggregationClassifier {
    #[must_use]
    pub fn with_aggregations(aggregations: impl IntoIterator<Item = AggregationKind>) -> Self {
        Self {
            aggregations: aggregations.into_iter().collect(),
        }
    }
}

impl AggregationClassifier for KindAggregationClassifier {
    fn is_single_step_aggregation(&self, operation: &Operation) -> bool {
        match &operation.kind {
            OperationKind::Aggregate(kind) => self.aggregations.contains(kind),
            OperationKind::Get | OperationKind::Other(_) => false,
        }
    }
}

/// Last operation of the chain feeding `axis` of trace `index`.
///
/// `None` when the trace has no binding for the axis or the bound key has no
/// registered chain.
#[must_use]
pub fn last_operation<'a>(
    definition: &PlotDefinition,
    outputs: &'a OutputsMap,
    axis: Axis,
    index: usize,
) -> Option<&'a Operation> {
    let key = definition.binding(index)?.axis_key(axis)?;
    outputs.get(key)?.last()
}

#[must_use]
pub fn is_axis_available(definition: &PlotDefinition, index: usize, axis: Axis) -> bool {
    definition
        .binding(index)
        .and_then(|binding| binding.axis_key(axis))
        .is_some()
}

/// Whether the x and y chains of trace `index` end in the same class of
/// operation. Missing chains classify as point operations.
#[must_use]
pub fn last_operation_types_match<C: AggregationClassifier + ?Sized>(
    classifier: &C,
    definition: &PlotDefinition,
    outputs: &OutputsMap,
    index: usize,
) -> bool {
    let x = classifier.classifies_as_aggregation(last_operation(definition, outputs, Axis::X, index));
    let y = classifier.classifies_as_aggregation(last_operation(definition, outputs, Axis::Y, index));
    x == y
}

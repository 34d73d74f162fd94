use std::sync::Arc;

use plot_step::core::{
    AggregationKind, AxisValues, DataReshaper, KindAggregationClassifier, Operation, OutputsMap,
    PlotDefinition, PlotKind, PlotLayout, RawSeriesData, SeriesBinding, StepMarkerStyle, Trace,
    annotate_layout,
};
use proptest::prelude::*;
use serde_json::json;

fn layout_with_shapes(shape_count: usize) -> PlotLayout {
    let mut layout = PlotLayout {
        title: Some(json!("hidden by the surface")),
        ..PlotLayout::default()
    };
    layout
        .extra
        .insert("xaxis".to_owned(), json!({"autorange": true}));
    for index in 0..shape_count {
        layout
            .shapes
            .push(json!({"type": "rect", "x0": index, "x1": index + 1}));
    }
    layout
}

fn plot_kind() -> impl Strategy<Value = PlotKind> {
    prop::sample::select(PlotKind::ALL.to_vec())
}

fn chain() -> impl Strategy<Value = Vec<Operation>> {
    prop_oneof![
        Just(vec![Operation::get("v")]),
        Just(vec![
            Operation::get("v"),
            Operation::aggregate(AggregationKind::Mean)
        ]),
        Just(vec![Operation::get("v"), Operation::other("filter")]),
    ]
}

fn series(len: usize) -> impl Strategy<Value = AxisValues> {
    prop::collection::vec(-1_000i64..1_000, 0..len).prop_map(AxisValues::series)
}

fn trace() -> impl Strategy<Value = Trace> {
    (prop::option::of(series(12)), prop::option::of(series(12))).prop_map(|(x, y)| Trace {
        x,
        y,
        name: Some(json!("raw")),
        ..Trace::default()
    })
}

proptest! {
    #[test]
    fn annotate_is_pure_for_the_same_input(
        shape_count in 0usize..6,
        step in 0usize..500,
        hide_step in any::<bool>()
    ) {
        let base = layout_with_shapes(shape_count);
        let marker = StepMarkerStyle::default();

        let first = annotate_layout(&base, step, hide_step, &marker);
        let second = annotate_layout(&base, step, hide_step, &marker);

        prop_assert_eq!(
            serde_json::to_string(&first).expect("encode first"),
            serde_json::to_string(&second).expect("encode second")
        );
        prop_assert_eq!(base, layout_with_shapes(shape_count));
    }

    #[test]
    fn step_marker_is_added_exactly_when_visible(
        shape_count in 0usize..6,
        step in 0usize..500,
        hide_step in any::<bool>()
    ) {
        let base = layout_with_shapes(shape_count);
        let layout = annotate_layout(&base, step, hide_step, &StepMarkerStyle::default());

        let expected = if step > 0 && !hide_step { shape_count + 1 } else { shape_count };
        prop_assert_eq!(layout.shapes.len(), expected);
        prop_assert!(layout.title.is_none());
        prop_assert_eq!(&layout.shapes[..shape_count], &base.shapes[..]);
    }

    #[test]
    fn reshape_never_mutates_its_input(
        kind in plot_kind(),
        raw in prop::collection::vec(trace(), 0..5),
        x_chain in chain(),
        y_chain in chain(),
        bind_x in any::<bool>(),
        steps in prop::collection::vec(0usize..15, 1..4)
    ) {
        let raw: RawSeriesData = raw;
        let snapshot = raw.clone();
        let definition = raw.iter().fold(PlotDefinition::new(kind, "prop"), |definition, _| {
            let binding = SeriesBinding::y("yk");
            definition.with_binding(if bind_x { binding.with_x("xk") } else { binding })
        });
        let mut outputs = OutputsMap::new();
        outputs.insert("xk".to_owned(), x_chain);
        outputs.insert("yk".to_owned(), y_chain);

        let reshaper = DataReshaper::new(Arc::new(KindAggregationClassifier::default()));
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("runtime");
        for step in steps {
            let prepared = runtime.block_on(reshaper.reshape(&definition, &outputs, &raw, step));
            prop_assert_eq!(prepared.len(), raw.len());
        }

        prop_assert_eq!(raw, snapshot);
    }
}

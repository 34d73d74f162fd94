use std::sync::Arc;

use criterion::{Criterion, criterion_group, criterion_main};
use plot_step::core::{
    AggregationKind, AxisValues, DataReshaper, KindAggregationClassifier, Operation, OutputsMap,
    PlotDefinition, PlotKind, PlotLayout, RawSeriesData, SeriesBinding, StepMarkerStyle, Trace,
    annotate_layout,
};
use std::hint::black_box;

fn line_fixture(trace_count: usize, len: usize) -> (PlotDefinition, OutputsMap, RawSeriesData) {
    let mut definition = PlotDefinition::new(PlotKind::Line, "bench");
    let mut outputs = OutputsMap::new();
    let mut data = RawSeriesData::with_capacity(trace_count);
    for index in 0..trace_count {
        let x_key = format!("step_{index}");
        let y_key = format!("loss_{index}");
        outputs.insert(
            x_key.clone(),
            vec![Operation::get("step"), Operation::aggregate(AggregationKind::Max)],
        );
        outputs.insert(
            y_key.clone(),
            vec![Operation::get("loss"), Operation::aggregate(AggregationKind::Mean)],
        );
        definition = definition.with_binding(SeriesBinding::xy(x_key, y_key));
        data.push(
            Trace::default()
                .with_x(AxisValues::series(0..len as u64))
                .with_y(AxisValues::series((0..len).map(|i| 1.0 / (i as f64 + 1.0)))),
        );
    }
    (definition, outputs, data)
}

fn bench_line_reshape_64x10k(c: &mut Criterion) {
    let (definition, outputs, data) = line_fixture(64, 10_000);
    let reshaper = DataReshaper::new(Arc::new(KindAggregationClassifier::default()));
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime");

    c.bench_function("line_reshape_64x10k", |b| {
        b.iter(|| {
            runtime.block_on(reshaper.reshape(
                black_box(&definition),
                black_box(&outputs),
                black_box(&data),
                black_box(5_000),
            ))
        })
    });
}

fn bench_annotate_layout(c: &mut Criterion) {
    let layout = PlotLayout::default();
    let marker = StepMarkerStyle::default();

    c.bench_function("annotate_layout", |b| {
        b.iter(|| annotate_layout(black_box(&layout), black_box(42), false, &marker))
    });
}

criterion_group!(benches, bench_line_reshape_64x10k, bench_annotate_layout);
criterion_main!(benches);

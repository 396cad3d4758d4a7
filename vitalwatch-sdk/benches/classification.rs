use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use vitalwatch_sdk::{AlertAggregator, Classifier, MeasurementKind, SignalSimulator, Snapshot};

/// Benchmark classifying single values across the reference table
fn bench_classify(c: &mut Criterion) {
    let classifier = Classifier::reference();
    let mut group = c.benchmark_group("classify");

    for (kind, value) in [
        (MeasurementKind::HeartRate, 72.0),
        (MeasurementKind::HeartRate, 145.0),
        (MeasurementKind::Temperature, 40.5),
        (MeasurementKind::EndTidalCo2, 55.0),
    ] {
        group.bench_with_input(
            BenchmarkId::new(kind.key(), value),
            &(kind, value),
            |b, &(kind, value)| b.iter(|| classifier.classify(black_box(kind), black_box(value))),
        );
    }
    group.finish();
}

/// Benchmark alert aggregation and full assessment over simulated snapshots
fn bench_aggregate(c: &mut Criterion) {
    let aggregator = AlertAggregator::default();
    let mut simulator = SignalSimulator::reference(Some(7));
    let mut snapshots = Vec::with_capacity(1_000);
    let mut current = Snapshot::baseline(0);
    for i in 1..=1_000u64 {
        current = simulator.step(&current, i * 5_000).unwrap();
        snapshots.push(current.clone());
    }

    let mut group = c.benchmark_group("aggregate");
    group.throughput(Throughput::Elements(snapshots.len() as u64));

    group.bench_function("active_alerts", |b| {
        b.iter(|| {
            snapshots
                .iter()
                .map(|s| aggregator.active_alerts(black_box(s)).len())
                .sum::<usize>()
        })
    });

    group.bench_function("assess", |b| {
        b.iter(|| {
            snapshots
                .iter()
                .map(|s| aggregator.classifier().assess(black_box(s)).overall)
                .max()
        })
    });
    group.finish();
}

/// Benchmark one simulator step
fn bench_simulator_step(c: &mut Criterion) {
    let mut simulator = SignalSimulator::reference(Some(1));
    let baseline = Snapshot::baseline(0);

    c.bench_function("simulator_step", |b| {
        b.iter(|| simulator.step(black_box(&baseline), black_box(5_000)).unwrap())
    });
}

criterion_group!(benches, bench_classify, bench_aggregate, bench_simulator_step);
criterion_main!(benches);

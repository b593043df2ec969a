use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use taxifare::{
    backend::CpuBackend,
    data::Trip,
    preprocessing::{ColumnTransformer, FittedTransformer, Transformer},
};

/// Deterministic trips spread over Manhattan and two years of timestamps.
fn synthetic_trips(n: usize) -> Vec<Trip> {
    (0..n)
        .map(|i| Trip {
            key: None,
            pickup_datetime: format!(
                "{}-{:02}-{:02} {:02}:{:02}:00 UTC",
                2013 + i % 2,
                i % 12 + 1,
                i % 28 + 1,
                i % 24,
                i % 60
            ),
            pickup_longitude: -74.0 + (i % 97) as f64 * 0.001,
            pickup_latitude: 40.70 + (i % 89) as f64 * 0.001,
            dropoff_longitude: -73.95 + (i % 83) as f64 * 0.001,
            dropoff_latitude: 40.75 + (i % 79) as f64 * 0.001,
            passenger_count: Some(1.0),
        })
        .collect()
}

fn bench_fit(c: &mut Criterion) {
    for size in [100, 1000, 10000].iter() {
        let trips = synthetic_trips(*size);
        c.bench_with_input(BenchmarkId::new("assembler_fit", size), &trips, |b, trips| {
            b.iter(|| {
                let fitted = ColumnTransformer::<CpuBackend>::fare_default(0)
                    .fit(black_box(trips.as_slice()))
                    .unwrap();
                black_box(fitted);
            });
        });
    }
}

fn bench_transform(c: &mut Criterion) {
    let fitted = ColumnTransformer::<CpuBackend>::fare_default(0)
        .fit(&synthetic_trips(1000))
        .unwrap();

    for size in [100, 1000, 10000].iter() {
        let trips = synthetic_trips(*size);
        c.bench_with_input(
            BenchmarkId::new("assembler_transform", size),
            &trips,
            |b, trips| {
                b.iter(|| {
                    let x = fitted.transform(black_box(trips.as_slice())).unwrap();
                    black_box(x);
                });
            },
        );
    }
}

criterion_group!(benches, bench_fit, bench_transform);
criterion_main!(benches);

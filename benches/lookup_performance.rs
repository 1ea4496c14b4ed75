use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use spectral_engine::prelude::*;

/// Build a section with `n` samples of a damped sine
fn create_section(mode: DataMode, n: usize, sorted: bool) -> DataSection {
    let mut section = DataSection::new(
        "bench",
        vec![
            VariableDefinition::independent("x", "Hz"),
            VariableDefinition::dependent("y", "arb"),
        ],
        mode,
    )
    .unwrap();
    for i in 0..n {
        let x = i as f64 * 0.5;
        let y = (x * 0.01).sin() * (-x * 1e-4).exp();
        section.append_item(vec![x, y]).unwrap();
    }
    if sorted {
        section.sort();
    }
    section
}

/// Interpolated lookup: binary bracket on sorted data vs linear scan
fn bench_value_at(c: &mut Criterion) {
    let mut group = c.benchmark_group("value_at");

    for n in [1_000, 10_000, 100_000] {
        let sorted = create_section(DataMode::Continuous, n, true);
        let unsorted = create_section(DataMode::Continuous, n, false);
        let x = n as f64 * 0.5 * 0.37;

        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("sorted", n), &sorted, |b, section| {
            b.iter(|| section.value_at(black_box(x)).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("unsorted", n), &unsorted, |b, section| {
            b.iter(|| section.value_at(black_box(x)).unwrap())
        });
    }

    group.finish();
}

/// Peak matching within a relative tolerance
fn bench_peak_match(c: &mut Criterion) {
    let mut group = c.benchmark_group("peak_match");

    for n in [100, 1_000, 10_000] {
        let section = create_section(DataMode::Peak, n, true);
        let x = n as f64 * 0.5 * 0.61 + 0.1;

        group.bench_with_input(BenchmarkId::from_parameter(n), &section, |b, section| {
            b.iter(|| {
                section
                    .find_nearest_item_index(&[("x", black_box(x))], Some(1e-3))
                    .unwrap()
            })
        });
    }

    group.finish();
}

/// Range statistics: cold (cache cleared by a mutation) vs cached
fn bench_range_cache(c: &mut Criterion) {
    let mut group = c.benchmark_group("range_of");

    for n in [1_000, 100_000] {
        let mut section = create_section(DataMode::Continuous, n, false);

        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(BenchmarkId::new("cached", n), |b| {
            b.iter(|| section.range_of(black_box("y"), RangeOptions::default()).unwrap())
        });
        group.bench_function(BenchmarkId::new("cold", n), |b| {
            b.iter(|| {
                section.set_extra_info_at(0, None).unwrap();
                section.range_of(black_box("y"), RangeOptions::default()).unwrap()
            })
        });
    }

    group.finish();
}

/// Range query over the middle half of the data
fn bench_range_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("values_in_independent_range");

    for n in [1_000, 10_000] {
        let section = create_section(DataMode::Continuous, n, true);
        let span = n as f64 * 0.5;

        group.bench_with_input(BenchmarkId::from_parameter(n), &section, |b, section| {
            b.iter(|| {
                section
                    .values_in_independent_range(
                        "x",
                        black_box(span * 0.25),
                        black_box(span * 0.75),
                        RangeQueryOptions::default(),
                    )
                    .unwrap()
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_value_at,
    bench_peak_match,
    bench_range_cache,
    bench_range_query
);
criterion_main!(benches);

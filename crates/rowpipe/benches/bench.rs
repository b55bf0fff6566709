use core::hint::black_box;
use criterion::{BatchSize, Criterion, Throughput, criterion_group, criterion_main};
use rowpipe::{
    Dataset, FIELD_BIRTHDATE, FIELD_USERNAME, FIELD_VEHICLE, FacetSpec, FilterSpec,
    RecordGenerator, SortSpec, UserRecordGenerator, distinct_field_values, filter, sort,
};

// Rows per benchmark dataset.
const TOTAL_ROWS: usize = 100_000;

fn dataset() -> Dataset {
    let mut generator = UserRecordGenerator::seeded(42);
    let mut rows = Vec::new();
    generator.fill(TOTAL_ROWS, &mut rows);
    Dataset::new(generator.schema(), rows)
}

fn bench_sort(c: &mut Criterion) {
    let data = dataset();
    let mut group = c.benchmark_group("sort");
    group.throughput(Throughput::Elements(TOTAL_ROWS as u64));
    group.sample_size(20);

    for (name, spec) in [
        ("username/asc", SortSpec::ascending(FIELD_USERNAME)),
        ("username/desc", SortSpec::descending(FIELD_USERNAME)),
        ("birthdate/asc", SortSpec::ascending(FIELD_BIRTHDATE)),
    ] {
        group.bench_function(format!("{name}/rows/{TOTAL_ROWS}"), |b| {
            b.iter_batched(
                || data.clone(),
                |d| black_box(sort(&d, &spec)),
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_filter(c: &mut Criterion) {
    let data = dataset();
    let mut group = c.benchmark_group("filter");
    group.throughput(Throughput::Elements(TOTAL_ROWS as u64));

    let facet = FacetSpec::new(FIELD_VEHICLE).with_value(Some("Golf".to_string()));
    for (name, spec) in [
        ("query/ascii", FilterSpec::query("al")),
        ("query/unicode", FilterSpec::query("zoë")),
        ("facet", FilterSpec::default().with_facet(facet.clone())),
        ("query+facet", FilterSpec::query("al").with_facet(facet)),
    ] {
        group.bench_function(format!("{name}/rows/{TOTAL_ROWS}"), |b| {
            b.iter(|| black_box(filter(&data, &spec)));
        });
    }
    group.finish();
}

fn bench_distinct(c: &mut Criterion) {
    let data = dataset();
    let mut group = c.benchmark_group("distinct");
    group.throughput(Throughput::Elements(TOTAL_ROWS as u64));

    group.bench_function(format!("vehicle/rows/{TOTAL_ROWS}"), |b| {
        b.iter(|| black_box(distinct_field_values(&data, FIELD_VEHICLE)));
    });
    group.finish();
}

criterion_group!(benches, bench_sort, bench_filter, bench_distinct);
criterion_main!(benches);

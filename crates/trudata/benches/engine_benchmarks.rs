//! Rule engine and suggester performance benchmarks.
//!
//! Measures loading, rule evaluation (sequential and parallel) and rule
//! suggestion over generated customer tables of increasing size.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use trudata::{Dataset, EngineConfig, Loader, RuleEngine, RuleSpec, RuleSuggester};

const RULES: &str = "\
rules:
  - column: customer_id
    rules: [not_null, unique, {pattern: 'CUST[0-9]{6}'}]
  - column: email
    rules: [not_null, {pattern: '[^@]+@[^@]+\\.[^@]+'}]
  - column: age
    rules: [not_null, {range: {min: 18, max: 99}}]
  - column: signup
    rules: [{range: {min: '2020-01-01', max: '2024-12-31'}}]
";

/// Generate a customer CSV with a sprinkling of bad values.
fn generate_customers(rows: usize) -> String {
    let mut data = String::from("customer_id,email,age,signup,city\n");
    let cities = ["Lisbon", "Osaka", "Quito", "Tallinn", "Perth"];

    for row in 0..rows {
        // customer_id (every 97th row duplicates the previous id)
        let id = if row % 97 == 0 && row > 0 { row - 1 } else { row };
        data.push_str(&format!("CUST{:06},", id));
        // email
        if row % 41 == 0 {
            data.push_str("not-an-email,");
        } else {
            data.push_str(&format!("user{}@example.com,", row));
        }
        // age (with some outliers and gaps)
        match row % 53 {
            0 => data.push_str("NA,"),
            1 => data.push_str("130,"),
            _ => data.push_str(&format!("{},", 18 + row % 70)),
        }
        // signup
        data.push_str(&format!(
            "{}-{:02}-{:02},",
            2019 + row % 6,
            (row % 12) + 1,
            (row % 28) + 1
        ));
        // city
        data.push_str(cities[row % cities.len()]);
        data.push('\n');
    }

    data
}

fn load(rows: usize) -> Dataset {
    Loader::new()
        .load_bytes(generate_customers(rows).as_bytes())
        .unwrap()
}

/// Benchmark CSV loading with type inference.
fn bench_loading(c: &mut Criterion) {
    let mut group = c.benchmark_group("loading");

    for rows in [1_000, 10_000].iter() {
        let data = generate_customers(*rows);
        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &data, |b, data| {
            b.iter(|| black_box(Loader::new().load_bytes(data.as_bytes()).unwrap()))
        });
    }

    group.finish();
}

/// Benchmark rule evaluation, sequential versus rayon.
fn bench_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply");
    let spec = RuleSpec::from_yaml_str(RULES).unwrap();
    let sequential = RuleEngine::with_config(EngineConfig {
        parallel: false,
        ..EngineConfig::default()
    });
    let parallel = RuleEngine::new();

    for rows in [1_000, 10_000, 100_000].iter() {
        let dataset = load(*rows);
        group.throughput(Throughput::Elements(*rows as u64));

        group.bench_with_input(BenchmarkId::new("sequential", rows), &dataset, |b, dataset| {
            b.iter(|| black_box(sequential.apply(dataset, &spec)))
        });
        group.bench_with_input(BenchmarkId::new("parallel", rows), &dataset, |b, dataset| {
            b.iter(|| black_box(parallel.apply(dataset, &spec)))
        });
    }

    group.finish();
}

/// Benchmark rule suggestion.
fn bench_suggest(c: &mut Criterion) {
    let mut group = c.benchmark_group("suggest");
    let suggester = RuleSuggester::new();

    for rows in [1_000, 10_000].iter() {
        let dataset = load(*rows);
        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &dataset, |b, dataset| {
            b.iter(|| black_box(suggester.suggest(dataset)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_loading, bench_apply, bench_suggest);
criterion_main!(benches);

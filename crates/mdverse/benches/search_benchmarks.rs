//! Search and filter performance benchmarks.
//!
//! Measures keyword search, profiling and predicate narrowing over synthetic
//! structure-file tables.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use mdverse::filter::build;
use mdverse::inference::ColumnClassifier;
use mdverse::input::Parser;
use mdverse::{search, ColumnType, Constraint, DataTable, SearchScope, TableKind};

/// Generate a synthetic joined structure-file table as TSV.
fn generate_gro_data(rows: usize) -> String {
    let origins = ["zenodo", "figshare", "osf"];
    let titles = [
        "POPC bilayer with cholesterol",
        "Protein in water",
        "DPPC vesicle",
        "Ion channel in membrane",
        "Coarse-grained micelle",
    ];

    let mut data = String::new();
    data.push_str(
        "dataset_id\tdataset_origin\tfile_name\tatom_number\thas_protein\ttitle\tdescription\tdate_creation\n",
    );
    for row in 0..rows {
        data.push_str(&format!(
            "{}\t{}\tfile_{}.gro\t{}\t{}\t{}\tSimulation number {}\t20{:02}-{:02}-{:02}\n",
            row / 3,
            origins[row % origins.len()],
            row,
            100 + (row * 37) % 100_000,
            if row % 4 == 0 { "True" } else { "False" },
            titles[row % titles.len()],
            row,
            10 + row % 14,
            1 + row % 12,
            1 + row % 28,
        ));
    }
    data
}

fn load_table(rows: usize) -> Arc<DataTable> {
    let mut table = Parser::new()
        .parse_str("gro", &generate_gro_data(rows))
        .unwrap();
    let types = table
        .headers
        .iter()
        .map(|h| match h.as_str() {
            "atom_number" => ColumnType::Integer,
            "date_creation" => ColumnType::Date,
            _ => ColumnType::String,
        })
        .collect();
    table.column_types = types;
    Arc::new(table)
}

/// Benchmark keyword search alone.
fn bench_keyword_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("keyword_search");
    let scope = SearchScope::for_table(TableKind::StructureFiles);

    for rows in [1_000, 10_000, 100_000].iter() {
        let table = load_table(*rows);
        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &table, |b, table| {
            b.iter(|| black_box(search(Arc::clone(table), &scope, black_box("bilayer"), false)))
        });
    }

    group.finish();
}

/// Benchmark profiling every column of a result.
fn bench_profiles(c: &mut Criterion) {
    let mut group = c.benchmark_group("profiles");
    let scope = SearchScope::for_table(TableKind::StructureFiles);
    let classifier = ColumnClassifier::new();

    for rows in [1_000, 10_000].iter() {
        let table = load_table(*rows);
        let base = search(table, &scope, "", true);
        group.bench_with_input(BenchmarkId::new("rows", rows), &base, |b, base| {
            b.iter(|| black_box(base.profiles(&classifier)))
        });
    }

    group.finish();
}

/// Benchmark keyword search followed by two active filters.
fn bench_search_and_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("search_and_filter");
    let scope = SearchScope::for_table(TableKind::StructureFiles);
    let classifier = ColumnClassifier::new();

    for rows in [1_000, 10_000, 100_000].iter() {
        let table = load_table(*rows);
        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &table, |b, table| {
            b.iter(|| {
                let base = search(Arc::clone(table), &scope, "membrane", false);
                let atoms = base.profile(&classifier, "atom_number").unwrap();
                let protein = base.profile(&classifier, "has_protein").unwrap();
                let predicates = [
                    build(&atoms, &Constraint::between(1_000.0, 20_000.0)).unwrap(),
                    build(&protein, &Constraint::one_of(["False"])).unwrap(),
                ];
                black_box(base.narrow(&predicates))
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_keyword_search,
    bench_profiles,
    bench_search_and_filter
);
criterion_main!(benches);

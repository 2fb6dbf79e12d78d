use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use portfolio_graph::{
    build_graph, build_matrix, summarize, BizDevPhase, Catalog, Category, Department, Dimension,
    EngineConfig, GraphRequest, GraphView, PivotRequest, Subject, SummaryRequest, Theme, Vc,
};

/// Synthetic catalog: 10 top-level categories with 5 children each
fn synthetic_catalog(subjects: usize) -> Catalog {
    let mut catalog = Catalog::new();
    for top in 0..10 {
        catalog.categories.push(Category::new(format!("c{}", top), format!("Category {}", top)));
        for child in 0..5 {
            catalog.categories.push(
                Category::new(format!("c{}-{}", top, child), format!("Category {}.{}", top, child))
                    .with_parent(format!("c{}", top)),
            );
        }
    }
    for i in 0..8 {
        catalog.themes.push(Theme::new(format!("t{}", i), format!("Theme {}", i)));
        catalog.vcs.push(Vc::new(format!("v{}", i), format!("VC {}", i)));
        catalog.departments.push(Department::new(format!("d{}", i), format!("Department {}", i)));
    }
    for i in 0..6 {
        catalog
            .biz_dev_phases
            .push(BizDevPhase::new(format!("p{}", i), format!("Phase {}", i)).with_position(i));
    }
    for i in 0..subjects {
        catalog.subjects.push(
            Subject::new(format!("s{}", i), format!("Startup {}", i))
                .with_categories(vec![format!("c{}-{}", i % 10, i % 5), format!("c{}", (i + 3) % 10)])
                .with_themes(vec![format!("t{}", i % 8)])
                .with_vcs(vec![format!("v{}", i % 8), format!("v{}", (i + 1) % 8)])
                .with_departments(vec![format!("d{}", i % 8)])
                .with_phase(format!("p{}", i % 6)),
        );
    }
    catalog
}

/// Benchmark graph construction per view
fn bench_build_graph(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_graph");
    let config = EngineConfig::default();

    for size in [100, 1000, 10_000].iter() {
        let catalog = synthetic_catalog(*size);
        for (name, view) in [("categories", GraphView::Categories), ("themes", GraphView::Themes)] {
            let request = GraphRequest::new(view);
            group.bench_with_input(BenchmarkId::new(name, size), size, |b, _| {
                b.iter(|| {
                    let build = build_graph(&request, &catalog, &config).unwrap();
                    criterion::black_box(build.graph.node_count());
                });
            });
        }
    }
    group.finish();
}

/// Benchmark pivot matrix aggregation
fn bench_build_matrix(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_matrix");
    let config = EngineConfig::default();

    for size in [100, 1000, 10_000].iter() {
        let catalog = synthetic_catalog(*size);
        let request = PivotRequest::new(Dimension::Category, Dimension::BizDevPhase);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let matrix = build_matrix(&request, &catalog, &config);
                criterion::black_box(matrix.cells.len());
            });
        });
    }
    group.finish();
}

/// Benchmark summary statistics
fn bench_summarize(c: &mut Criterion) {
    let mut group = c.benchmark_group("summarize");

    for size in [100, 1000, 10_000].iter() {
        let catalog = synthetic_catalog(*size);
        let request = SummaryRequest::new(Dimension::Vc);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let summary = summarize(&request, &catalog);
                criterion::black_box(summary.matching_count);
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build_graph, bench_build_matrix, bench_summarize);
criterion_main!(benches);

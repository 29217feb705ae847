//! Plan Compilation Baseline Benchmark
//!
//! Establishes baselines for selection-tree compilation and plan application
//! so schema or compiler changes that regress the hot path show up

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use roomline_fetchplan::{
    apply_to_query, compile, Annotation, FetchOptimizer, OptimizationSchema, PrefetchSpec,
    QueryBuilder, SelectionNode,
};

fn leaf(name: &str) -> SelectionNode {
    SelectionNode::new(name)
}

fn tree(name: &str, children: Vec<SelectionNode>) -> SelectionNode {
    SelectionNode::with_children(name, children)
}

fn payment_schema() -> Arc<OptimizationSchema<QueryBuilder>> {
    Arc::new(
        OptimizationSchema::builder("Payment")
            .select("method", "method")
            .build()
            .expect("Payment schema builds"),
    )
}

fn order_line_schema() -> Arc<OptimizationSchema<QueryBuilder>> {
    Arc::new(
        OptimizationSchema::builder("OrderLine")
            .annotate(
                "totalCents",
                Annotation::new("total_cents", "quantity * unit_price_cents"),
            )
            .select("product", "product")
            .prefetch_with(
                "payments",
                PrefetchSpec::new(
                    "payments",
                    QueryBuilder::new().from("payments"),
                    payment_schema(),
                ),
            )
            .build()
            .expect("OrderLine schema builds"),
    )
}

fn reservation_schema() -> Arc<OptimizationSchema<QueryBuilder>> {
    Arc::new(
        OptimizationSchema::builder("Reservation")
            .select("user", "user")
            .select("resource", "resource")
            .annotate(
                "durationMinutes",
                Annotation::new(
                    "duration_minutes",
                    "EXTRACT(EPOCH FROM (end_time - begin_time)) / 60",
                ),
            )
            .prefetch("tags", "tags")
            .prefetch_with(
                "orderLines",
                PrefetchSpec::new(
                    "order_lines",
                    QueryBuilder::new().from("order_lines"),
                    order_line_schema(),
                ),
            )
            .build()
            .expect("Reservation schema builds"),
    )
}

fn wide_schema(fields: usize) -> OptimizationSchema<QueryBuilder> {
    let mut builder = OptimizationSchema::builder("Wide");
    for i in 0..fields {
        builder = builder.select(&format!("field{}", i), &format!("relation_{}", i));
    }
    builder.build().expect("wide schema builds")
}

fn bench_plan_compilation(c: &mut Criterion) {
    let mut group = c.benchmark_group("plan_compilation");

    let schema = reservation_schema();

    let flat = vec![leaf("user"), leaf("durationMinutes"), leaf("tags")];
    group.bench_function("flat_selection", |b| {
        b.iter(|| black_box(compile(black_box(&flat), &schema)))
    });

    let nested = vec![
        leaf("user"),
        leaf("durationMinutes"),
        tree(
            "orderLines",
            vec![
                leaf("totalCents"),
                leaf("product"),
                tree("payments", vec![leaf("method")]),
            ],
        ),
    ];
    group.bench_function("nested_selection", |b| {
        b.iter(|| black_box(compile(black_box(&nested), &schema)))
    });

    // Cost scaling with the number of requested fields
    for &width in &[4, 16, 64] {
        let wide = wide_schema(width);
        let selection: Vec<SelectionNode> =
            (0..width).map(|i| leaf(&format!("field{}", i))).collect();
        group.bench_with_input(BenchmarkId::new("selection_width", width), &width, |b, _| {
            b.iter(|| black_box(compile(black_box(&selection), &wide)))
        });
    }

    group.finish();
}

fn bench_plan_application(c: &mut Criterion) {
    let mut group = c.benchmark_group("plan_application");

    let schema = reservation_schema();
    let selection = vec![
        leaf("user"),
        leaf("resource"),
        leaf("durationMinutes"),
        leaf("tags"),
        tree(
            "orderLines",
            vec![leaf("totalCents"), tree("payments", vec![leaf("method")])],
        ),
    ];
    let plan = compile(&selection, &schema);
    let base = QueryBuilder::new().from("reservations");

    group.bench_function("apply_to_query", |b| {
        b.iter(|| {
            let mut query = base.clone();
            apply_to_query(&plan, &mut query);
            black_box(query)
        })
    });

    let optimizer = FetchOptimizer::new(schema.clone());
    let requested = tree(
        "query",
        vec![tree(
            "reservations",
            vec![tree("edges", vec![tree("node", selection.clone())])],
        )],
    );
    group.bench_function("end_to_end_optimize", |b| {
        b.iter(|| {
            black_box(optimizer.optimize(black_box(&requested), "reservations", base.clone()))
        })
    });

    group.finish();
}

criterion_group!(benches, bench_plan_compilation, bench_plan_application);
criterion_main!(benches);

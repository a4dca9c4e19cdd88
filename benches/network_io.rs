//! Criterion benchmarks for network persistence and derivation
//!
//! Covers the hot paths of an analysis session:
//! - GML render/parse of a concept graph
//! - Full save and cold load through `Network`
//! - Components and communities on a cached graph

use colex_network::storage::gml;
use colex_network::{communities, components, AttrGraph, Attributes, FormatPolicy, Network};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

/// Sparse random concept graph with community labels and edge weights
fn generate_concept_graph(num_nodes: usize, edges_per_node: usize) -> AttrGraph {
    let mut graph = AttrGraph::new();
    let mut rng_state = 12345_u64; // Simple LCG for reproducibility

    for node in 0..num_nodes {
        let attrs = Attributes::new()
            .with("Gloss", format!("CONCEPT {node}"))
            .with("Words", "ruka;kéz;mɛ̃")
            .with("infomap", (node % 17) as i64);
        graph.add_node_with(node.to_string(), attrs);
    }

    for node in 0..num_nodes {
        for _ in 0..edges_per_node {
            rng_state = rng_state.wrapping_mul(1103515245).wrapping_add(12345);
            let target = (rng_state % num_nodes as u64) as usize;
            if target != node {
                let attrs = Attributes::new()
                    .with("FamilyWeight", (rng_state % 50) as i64)
                    .with("weight", (rng_state % 100) as f64 / 100.0);
                graph.add_edge_with(node.to_string(), target.to_string(), attrs);
            }
        }
    }

    graph
}

/// Benchmark: GML render and parse
fn bench_gml(c: &mut Criterion) {
    let mut group = c.benchmark_group("gml");

    for size in [100, 1000, 5000].iter() {
        let graph = generate_concept_graph(*size, 3);
        let text = gml::render(&graph).unwrap();

        group.bench_with_input(BenchmarkId::new("render", size), &graph, |b, graph| {
            b.iter(|| black_box(gml::render(black_box(graph)).unwrap()));
        });

        group.bench_with_input(BenchmarkId::new("parse", size), &text, |b, text| {
            b.iter(|| black_box(gml::parse(black_box(text)).unwrap()));
        });
    }

    group.finish();
}

/// Benchmark: save and cold load per format policy
fn bench_save_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("save_load");
    let dir = tempfile::tempdir().unwrap();
    let graph = generate_concept_graph(1000, 3);

    let policies = [
        ("default", FormatPolicy::default as fn() -> FormatPolicy),
        ("text_only", FormatPolicy::text_only),
    ];

    for (name, policy) in policies {
        let graphdir = dir.path().join(name);
        let network = Network::new("network", 3.0, "families", &graphdir).with_formats(policy());

        group.bench_function(BenchmarkId::new("save", name), |b| {
            b.iter(|| black_box(network.save(black_box(&graph)).unwrap()));
        });

        group.bench_function(BenchmarkId::new("load", name), |b| {
            b.iter(|| {
                let mut fresh =
                    Network::new("network", 3.0, "families", &graphdir).with_formats(policy());
                black_box(fresh.load().unwrap().num_nodes());
            });
        });
    }

    group.finish();
}

/// Benchmark: derived structures on an in-memory graph
fn bench_derivations(c: &mut Criterion) {
    let mut group = c.benchmark_group("derivations");

    for size in [1000, 10000].iter() {
        let graph = generate_concept_graph(*size, 2);

        group.bench_with_input(BenchmarkId::new("components", size), &graph, |b, graph| {
            b.iter(|| black_box(components(black_box(graph))));
        });

        group.bench_with_input(BenchmarkId::new("communities", size), &graph, |b, graph| {
            b.iter(|| black_box(communities(black_box(graph))));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_gml, bench_save_load, bench_derivations);
criterion_main!(benches);

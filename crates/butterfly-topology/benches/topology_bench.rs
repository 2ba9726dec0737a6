//! Benchmarks for butterfly network construction
//!
//! Measures performance of:
//! - Single boundary resolution
//! - Layout computation
//! - Full model build
//! - View materialization

use butterfly_topology::connectivity::resolve_boundary;
use butterfly_topology::{Layout, NetworkConfig, Resolution, TopologyModel};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

/// Representative networks, from the minimum to the port ceiling.
const NETWORKS: &[&[usize]] = &[
    &[2, 2],
    &[4, 2, 4],
    &[2, 2, 2, 2, 2, 2],
    &[4, 4, 4, 4],
    &[2, 2, 2, 2, 2, 2, 2, 2],
];

fn config(radices: &[usize]) -> NetworkConfig {
    NetworkConfig::from_radices(radices, Resolution::default()).unwrap()
}

/// Benchmark wiring of the first boundary
fn bench_resolve_boundary(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_boundary");

    for radices in NETWORKS {
        let cfg = config(radices);
        group.throughput(Throughput::Elements(cfg.n_port() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(cfg.artifact_stem()), &cfg, |b, cfg| {
            b.iter(|| resolve_boundary(black_box(cfg), 0))
        });
    }
    group.finish();
}

/// Benchmark node and pin placement
fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");

    for radices in NETWORKS {
        let cfg = config(radices);
        group.throughput(Throughput::Elements((cfg.n_port() * cfg.n_stage()) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(cfg.artifact_stem()), &cfg, |b, cfg| {
            b.iter(|| Layout::compute(black_box(cfg)))
        });
    }
    group.finish();
}

/// Benchmark the full model build
fn bench_model_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("model_build");

    for radices in NETWORKS {
        let cfg = config(radices);
        group.bench_with_input(BenchmarkId::from_parameter(cfg.artifact_stem()), &cfg, |b, cfg| {
            b.iter(|| TopologyModel::build(black_box(cfg.clone())))
        });
    }
    group.finish();
}

/// Benchmark scene and netlist materialization
fn bench_views(c: &mut Criterion) {
    let mut group = c.benchmark_group("views");

    let model = TopologyModel::build(config(&[4, 4, 4, 4])).unwrap();
    group.bench_function("scene", |b| b.iter(|| black_box(&model).render_view().scene()));
    group.bench_function("netlist", |b| {
        b.iter(|| black_box(&model).connection_view().netlist())
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_resolve_boundary,
    bench_layout,
    bench_model_build,
    bench_views,
);

criterion_main!(benches);

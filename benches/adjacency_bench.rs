use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use mesh_flood::algs::flood::flood;
use mesh_flood::algs::meshgen::cube_surface;
use mesh_flood::algs::neighbours::{AdjacencyOpts, build_adjacency, build_adjacency_with_report};

fn bench_bake(c: &mut Criterion) {
    let mut group = c.benchmark_group("adjacency_bake");
    group.sample_size(10);

    for &n in &[4usize, 8, 16] {
        let mesh = cube_surface(n).expect("cube surface");

        group.bench_with_input(BenchmarkId::new("parallel", n), &n, |b, _| {
            b.iter(|| {
                let report =
                    build_adjacency_with_report::<u32, u32>(&mesh, AdjacencyOpts::default());
                black_box(report)
            });
        });

        group.bench_with_input(BenchmarkId::new("sequential", n), &n, |b, _| {
            let opts = AdjacencyOpts {
                parallel: false,
                ..AdjacencyOpts::default()
            };
            b.iter(|| black_box(build_adjacency_with_report::<u32, u32>(&mesh, opts)));
        });
    }
    group.finish();
}

fn bench_flood(c: &mut Criterion) {
    let mut group = c.benchmark_group("flood");

    for &n in &[8usize, 16] {
        let mesh = cube_surface(n).expect("cube surface");
        let table = build_adjacency(&mesh).expect("bake");
        group.bench_with_input(BenchmarkId::new("cube_surface", n), &n, |b, _| {
            b.iter(|| black_box(flood(&table, &mesh, 0)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_bake, bench_flood);
criterion_main!(benches);

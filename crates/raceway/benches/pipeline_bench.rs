//! Criterion benches for the three heavy stages.
//!
//! - skeleton sampling (A4 canvas, default radius),
//! - spanning tree + lattice classification + wall resolution,
//! - lap solve on a generated track.
//!
//! Results live under `target/criterion`.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use raceway::api::{
    sample_skeleton_seeded, Boundary, SearchCfg, SkeletonCfg, SpanningTree, Track, TrackCfg,
};

fn bench_skeleton(c: &mut Criterion) {
    let mut group = c.benchmark_group("skeleton");
    let cfg = TrackCfg::default();
    for &batch in &[250usize, 1000] {
        let skel = SkeletonCfg {
            batch_size: batch,
            ..SkeletonCfg::default()
        };
        group.bench_with_input(BenchmarkId::new("sample", batch), &skel, |b, skel| {
            let mut seed = 0u64;
            b.iter(|| {
                seed = seed.wrapping_add(1);
                let _ = sample_skeleton_seeded(cfg.canvas(), skel, seed);
            })
        });
    }
    group.finish();
}

fn bench_boundary(c: &mut Criterion) {
    let cfg = TrackCfg::default();
    let points = sample_skeleton_seeded(cfg.canvas(), &cfg.skeleton, 7).unwrap();
    let gate = Track::generate(&cfg.with_seed(7)).unwrap().gate;
    c.bench_function("tree_and_walls", |b| {
        b.iter_batched(
            || points.clone(),
            |pts| {
                let tree = SpanningTree::build(&pts).unwrap();
                let line = tree.segments(&pts);
                let _ = Boundary::extract(
                    cfg.canvas(),
                    &line,
                    cfg.skeleton.radius,
                    &cfg.boundary,
                    &gate,
                );
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_solve(c: &mut Criterion) {
    let track = Track::generate(&TrackCfg::default().with_seed(1)).unwrap();
    let mut group = c.benchmark_group("solver");
    group.sample_size(10);
    group.bench_function("lap_seed1", |b| {
        b.iter(|| {
            let _ = track.solve(&SearchCfg::default());
        })
    });
    group.finish();
}

criterion_group!(benches, bench_skeleton, bench_boundary, bench_solve);
criterion_main!(benches);

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use bounce_geom::{Aabb, Vec3};
use bounce_octree::make_octree;

// Deterministic grid of small face-sized boxes, roughly what a level produces.
fn level_boxes(n: usize) -> Vec<(Aabb, usize)> {
    let side = (n as f32).cbrt().ceil() as usize;
    (0..n)
        .map(|i| {
            let x = (i % side) as f32 * 64.0;
            let y = ((i / side) % side) as f32 * 64.0;
            let z = (i / (side * side)) as f32 * 64.0;
            let mins = Vec3::new(x, y, z);
            (Aabb::new(mins, mins + Vec3::new(96.0, 96.0, 8.0)), i)
        })
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("octree_build");
    let objects = level_boxes(20_000);
    group.bench_function("20k_boxes", |b| {
        b.iter(|| black_box(make_octree(&objects)))
    });
    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("octree_query");
    let objects = level_boxes(20_000);
    let tree = make_octree(&objects);
    let query = Aabb::new(Vec3::splat(512.0), Vec3::splat(768.0));
    group.bench_function("256_cube", |b| {
        b.iter(|| black_box(tree.query_touching_bbox(&query)))
    });
    group.finish();
}

criterion_group!(benches, bench_build, bench_query);
criterion_main!(benches);

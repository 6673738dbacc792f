use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use topo_kernel::prelude::*;

/// An `n x n` grid of unit square polygons sharing corner positions, all
/// in one collection.
fn build_grid(n: usize) -> (Model, usize) {
    let mut m: Model = Model::new();
    let mut corners = Vec::with_capacity((n + 1) * (n + 1));
    for j in 0..=n {
        for i in 0..=n {
            corners.push(m.add_posi_at([i as f64, j as f64, 0.0]));
        }
    }
    let at = |i: usize, j: usize| corners[j * (n + 1) + i];
    let coll = m.store_mut().add_coll();
    for j in 0..n {
        for i in 0..n {
            let ring = [at(i, j), at(i + 1, j), at(i + 1, j + 1), at(i, j + 1)];
            let pg = m.add_pgon(&ring, &[]).expect("grid pgon");
            m.store_mut()
                .coll_add_obj(coll, EntKind::Pgon, pg)
                .expect("coll member");
        }
    }
    (m, coll)
}

fn bench_nav(c: &mut Criterion) {
    let mut group = c.benchmark_group("nav");

    for &n in &[16usize, 48usize] {
        let (m, coll) = build_grid(n);
        let s = m.store();
        let mid = s.count(EntKind::Posi) / 2;

        group.bench_with_input(BenchmarkId::new("posi_to_pgon", n), &n, |b, _| {
            b.iter(|| {
                let out = s.nav_any_to_any(EntKind::Posi, EntKind::Pgon, black_box(mid));
                black_box(out)
            });
        });

        group.bench_with_input(BenchmarkId::new("pgon_to_posi", n), &n, |b, _| {
            b.iter(|| {
                let out = s.nav_any_to_posi(EntKind::Pgon, black_box(0));
                black_box(out)
            });
        });

        group.bench_with_input(BenchmarkId::new("coll_to_posi", n), &n, |b, _| {
            b.iter(|| {
                let out = s.nav_any_to_posi(EntKind::Coll, black_box(coll));
                black_box(out)
            });
        });

        group.bench_with_input(BenchmarkId::new("check_store", n), &n, |b, _| {
            b.iter(|| black_box(check_store(s)));
        });
    }

    group.finish();
}

fn bench_edit(c: &mut Criterion) {
    let mut group = c.benchmark_group("edit");

    for &n in &[16usize] {
        let (m, _) = build_grid(n);
        let verts = m.store().nav_any_to_vert(EntKind::Pgon, 0).expect("pgon verts");

        group.bench_with_input(BenchmarkId::new("del_pgon", n), &n, |b, _| {
            b.iter_batched(
                || m.clone(),
                |mut m| {
                    m.del_objs(EntKind::Pgon, &[0], DelPosis::Prune).expect("delete");
                    black_box(m)
                },
                criterion::BatchSize::LargeInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("del_vert", n), &n, |b, _| {
            b.iter_batched(
                || m.clone(),
                |mut m| {
                    m.del_vert(verts[0]).expect("delete vert");
                    black_box(m)
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_nav, bench_edit);
criterion_main!(benches);

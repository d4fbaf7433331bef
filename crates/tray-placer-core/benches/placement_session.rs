use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use tray_placer_core::prelude::*;

fn generate_trays(count: usize) -> Vec<(String, ShapeMask)> {
    use rand::{Rng, SeedableRng};
    let mut rng = rand::rngs::StdRng::seed_from_u64(17);
    (0..count)
        .map(|i| {
            let w = rng.gen_range(1..=4u32);
            let h = rng.gen_range(1..=4u32);
            let mut cells: Vec<bool> = (0..w * h).map(|_| rng.gen_bool(0.7)).collect();
            cells[0] = true;
            (
                format!("tray_{}", i),
                ShapeMask::new(w, h, Some(cells)).expect("valid mask"),
            )
        })
        .collect()
}

fn bench_place_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("place_all");

    for count in [25usize, 100, 400] {
        let trays = generate_trays(count);
        group.throughput(Throughput::Elements(count as u64));

        for board in [16u32, 64] {
            group.bench_with_input(
                BenchmarkId::new(format!("board_{}", board), count),
                &trays,
                |b, trays| {
                    b.iter(|| {
                        let grid = PlacementGrid::new(board, board).expect("grid");
                        let mut placer = TrayPlacer::new(grid, 100).expect("placer");
                        let out = placer.place_all(trays, &mut RngSource::seeded(1));
                        black_box(out)
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_fit_test(c: &mut Criterion) {
    let mut group = c.benchmark_group("fit_test");
    let mut grid = PlacementGrid::new(64, 64).expect("grid");
    let dot = ShapeMask::filled(1, 1).expect("mask");
    for i in 0..64 {
        let _ = grid.commit(&dot, i, i);
    }
    let mask = ShapeMask::from_rows(&[
        vec![true, true, true, true],
        vec![true, false, false, true],
        vec![true, true, true, true],
    ])
    .expect("mask");

    group.bench_function("fits_4x3", |b| {
        b.iter(|| black_box(grid.fits(&mask, black_box(20), black_box(31))));
    });

    group.finish();
}

criterion_group!(benches, bench_place_all, bench_fit_test);
criterion_main!(benches);

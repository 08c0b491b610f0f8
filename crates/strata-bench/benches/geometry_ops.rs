//! Criterion micro-benchmarks for point location and distance queries.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use strata_bench::{assembly_profile, sample_points, ASSEMBLY, FUEL_RADIUS, PIN, PITCH, ROOT};
use strata_core::{Direction, Point};
use strata_test_utils::fixtures::ROOT as FIXTURE_ROOT;
use strata_test_utils::TwoLevelGeometry;
use strata_universe::Cursor;

/// Benchmark: locate 1000 points in a 17x17 assembly, reusing one cursor.
fn bench_find_cell_assembly(c: &mut Criterion) {
    let table = assembly_profile(17).unwrap();
    let points = sample_points(1000, 17.0 * PITCH / 2.0 * 0.999);

    c.bench_function("find_cell_assembly_17x17_1k", |b| {
        let mut cursor = Cursor::new(Point::ORIGIN, ROOT);
        b.iter(|| {
            for &p in &points {
                cursor.reset(p, ROOT);
                let cell = table.find_cell(&mut cursor).unwrap();
                black_box(cell);
            }
        });
    });
}

/// Benchmark: lattice grid-line distance for 1000 points and angles.
fn bench_lattice_distance(c: &mut Criterion) {
    let table = assembly_profile(17).unwrap();
    let lattice = table.lattice(ASSEMBLY).unwrap();
    let points = sample_points(1000, 17.0 * PITCH / 2.0 * 0.999);
    let dirs: Vec<Direction> = (0..1000)
        .map(|i| Direction::from_angle(i as f64 * 0.618))
        .collect();

    c.bench_function("lattice_min_surface_distance_1k", |b| {
        b.iter(|| {
            for (&p, &d) in points.iter().zip(&dirs) {
                black_box(lattice.min_surface_distance(p, d).unwrap());
            }
        });
    });
}

/// Benchmark: scan distance over all 32 subdivided pin cells.
fn bench_pin_scan_distance(c: &mut Criterion) {
    let table = assembly_profile(1).unwrap();
    let pin = table.get(PIN).unwrap();
    let points = sample_points(1000, PITCH / 2.0);

    c.bench_function("pin_min_surface_distance_1k", |b| {
        b.iter(|| {
            for &p in &points {
                black_box(pin.min_surface_distance(p, Direction::from_angle(0.7)).unwrap());
            }
        });
    });
}

/// Benchmark: locate points in a lattice whose cells each own a distinct pin.
fn bench_find_cell_distinct_pins(c: &mut Criterion) {
    let geo = TwoLevelGeometry::build(17, 17, PITCH, FUEL_RADIUS);
    let points = sample_points(1000, 17.0 * PITCH / 2.0 * 0.999);

    c.bench_function("find_cell_distinct_pins_17x17_1k", |b| {
        let mut cursor = Cursor::new(Point::ORIGIN, FIXTURE_ROOT);
        b.iter(|| {
            for &p in &points {
                cursor.reset(p, FIXTURE_ROOT);
                black_box(geo.table.find_cell(&mut cursor).unwrap());
            }
        });
    });
}

/// Benchmark: build and subdivide a 17x17 assembly.
fn bench_build_assembly(c: &mut Criterion) {
    c.bench_function("build_assembly_17x17", |b| {
        b.iter(|| black_box(assembly_profile(17).unwrap()));
    });
}

criterion_group!(
    benches,
    bench_find_cell_assembly,
    bench_find_cell_distinct_pins,
    bench_lattice_distance,
    bench_pin_scan_distance,
    bench_build_assembly,
);
criterion_main!(benches);

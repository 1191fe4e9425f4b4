//! Benchmarks for slice occupancy sampling.
//!
//! Run with: cargo bench -p vox-slice
//!
//! To compare against baseline:
//! 1. First run: cargo bench -p vox-slice -- --save-baseline main
//! 2. After changes: cargo bench -p vox-slice -- --baseline main

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use vox_slice::{plan, sample_slice, FacetBvh, LinearScan, Plan, PlanParams};
use vox_types::{Facet, Point3, TriMesh};

// =============================================================================
// Test Mesh Generation
// =============================================================================

/// Create a UV sphere as a facet soup.
fn create_sphere(radius: f64, rings: u32, segments: u32) -> TriMesh {
    let point = |ring: u32, segment: u32| {
        let theta = std::f64::consts::PI * f64::from(ring) / f64::from(rings);
        let phi = 2.0 * std::f64::consts::PI * f64::from(segment) / f64::from(segments);
        Point3::new(
            radius * theta.sin() * phi.cos(),
            radius * theta.sin() * phi.sin(),
            radius * theta.cos(),
        )
    };

    let mut mesh = TriMesh::with_capacity((rings * segments * 2) as usize);
    for ring in 0..rings {
        for segment in 0..segments {
            let next_seg = (segment + 1) % segments;
            let a = point(ring, segment);
            let b = point(ring + 1, segment);
            let c = point(ring + 1, next_seg);
            let d = point(ring, next_seg);
            // CCW from outside
            mesh.push(Facet::from_vertices(a, b, c));
            mesh.push(Facet::from_vertices(a, c, d));
        }
    }
    mesh
}

fn planned_sphere() -> Plan {
    let mesh = create_sphere(20.0, 32, 64);
    plan(mesh, &PlanParams::new(0.5)).unwrap_or_else(|_| unreachable!("sphere mesh is non-empty"))
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_bvh_build(c: &mut Criterion) {
    let plan = planned_sphere();

    c.bench_function("bvh_build_sphere_4k_facets", |b| {
        b.iter(|| FacetBvh::build(black_box(&plan.mesh)));
    });
}

fn bench_sample_slice(c: &mut Criterion) {
    let plan = planned_sphere();
    let middle = plan.grid.nz / 2;

    let mut group = c.benchmark_group("sample_slice");

    let bvh = FacetBvh::build(&plan.mesh);
    group.bench_function("bvh", |b| {
        b.iter(|| sample_slice(black_box(&bvh), &plan.grid, middle));
    });

    let scan = LinearScan::new(&plan.mesh);
    group.bench_function("linear_scan", |b| {
        b.iter(|| sample_slice(black_box(&scan), &plan.grid, middle));
    });

    group.finish();
}

criterion_group!(benches, bench_bvh_build, bench_sample_slice);
criterion_main!(benches);

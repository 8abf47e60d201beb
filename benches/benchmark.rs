//! Benchmark to measure (and then optimize) the Newton's method pipeline:
//! classification of every grid point, followed by the depth shading.
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use newton_fractal::core::complex_grid::build_grid;
use newton_fractal::fractals::{
    depth_shading::{colorize, Palette, ShadingParams},
    newtons_method::{generate, GridSpecification, NewtonsMethodParams},
    newtons_method_core::{classify, ConvergenceParams, CubicRootsOfUnity},
};

fn benchmark_params() -> NewtonsMethodParams {
    NewtonsMethodParams {
        grid: GridSpecification {
            width: 384,
            height: 216,
            bound: 2.0,
        },
        ..Default::default()
    }
}

fn benchmark(c: &mut Criterion) {
    let params = benchmark_params();
    let function = CubicRootsOfUnity;
    let roots = function.roots();
    let grid = build_grid(params.grid.width, params.grid.height, params.grid.bound).unwrap();
    let classification =
        classify(&grid, &function, &roots, &ConvergenceParams::default()).unwrap();

    c.bench_function("newton_classify", |b| {
        b.iter(|| classify(black_box(&grid), &function, &roots, &params.convergence).unwrap());
    });

    c.bench_function("depth_colorize", |b| {
        b.iter(|| {
            colorize(
                black_box(&classification),
                &Palette::default(),
                &ShadingParams::default(),
            )
            .unwrap()
        });
    });

    c.bench_function("newton_generate", |b| {
        b.iter(|| generate(black_box(&params)).unwrap());
    });
}

criterion_group!(benches, benchmark);
criterion_main!(benches);

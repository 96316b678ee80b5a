use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use math_linsolve::testdata::{laplacian_1d, ramp, sor_system};
use math_linsolve::{
    CgConfig, DirectMethod, IterativeConfig, StationaryMethod, find_optimal_omega, lu_solve,
    solve_cg, solve_direct, solve_iterative,
};

fn bench_direct(c: &mut Criterion) {
    let mut group = c.benchmark_group("direct");
    for n in [10, 50, 100] {
        // diagonally dominant so the naive paths never meet a small pivot
        let a = laplacian_1d(n) + ndarray::Array2::<f64>::eye(n);
        let b = ramp(n);

        for method in DirectMethod::ALL {
            group.bench_with_input(BenchmarkId::new(method.to_string(), n), &n, |bench, _| {
                bench.iter(|| solve_direct(method, black_box(&a), black_box(&b)))
            });
        }
        group.bench_with_input(BenchmarkId::new("lu_solve_untraced", n), &n, |bench, _| {
            bench.iter(|| lu_solve(black_box(&a), black_box(&b)))
        });
    }
    group.finish();
}

fn bench_iterative(c: &mut Criterion) {
    let (a, b, exact) = sor_system();
    let config = IterativeConfig::default();

    c.bench_function("jacobi_4x4", |bench| {
        bench.iter(|| {
            solve_iterative(StationaryMethod::Jacobi, black_box(&a), &b, None, Some(&exact), &config)
        })
    });
    c.bench_function("sor_4x4_omega_1.25", |bench| {
        bench.iter(|| {
            solve_iterative(
                StationaryMethod::Sor { omega: 1.25 },
                black_box(&a),
                &b,
                None,
                Some(&exact),
                &config,
            )
        })
    });
    c.bench_function("omega_sweep_4x4", |bench| {
        bench.iter(|| find_optimal_omega(black_box(&a), &b, Some(&exact)))
    });

    let lap = laplacian_1d(100);
    let rhs = ramp(100);
    c.bench_function("cg_laplacian_100", |bench| {
        bench.iter(|| solve_cg(black_box(&lap), black_box(&rhs), None, &CgConfig::default()))
    });
}

criterion_group!(benches, bench_direct, bench_iterative);
criterion_main!(benches);

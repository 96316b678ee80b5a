//! Textbook systems used by the demos, tests and benchmarks

use ndarray::{Array1, Array2, array};

/// 4×4 system that needs no row exchange for naive elimination.
pub fn elimination_system() -> (Array2<f64>, Array1<f64>) {
    let a = array![
        [3.0, -2.0, 1.0, 4.0],
        [1.0, 3.0, 7.0, -7.0],
        [3.0, 6.0, 0.0, 3.0],
        [5.0, 5.0, -1.0, 8.0]
    ];
    let b = array![5.0, 2.0, -2.0, 5.0];
    (a, b)
}

/// Exact solution of [`elimination_system`].
pub fn elimination_solution() -> Array1<f64> {
    array![-1149.0, 134.0, 950.0, 815.0] / 99.0
}

/// 3×3 system with a zero in the first pivot position; solution (1, 1, 1).
pub fn pivot_required_system() -> (Array2<f64>, Array1<f64>) {
    let a = array![[0.0, 1.0, 1.0], [1.0, 0.0, 1.0], [1.0, 1.0, 0.0]];
    let b = array![2.0, 2.0, 2.0];
    (a, b)
}

/// 4×4 system for relaxation experiments, with its exact solution (−1, −1, −1, −1).
pub fn sor_system() -> (Array2<f64>, Array1<f64>, Array1<f64>) {
    let a = array![
        [-4.0, 1.0, 1.0, 1.0],
        [1.0, -4.0, 1.0, 1.0],
        [1.0, 1.0, -4.0, 1.0],
        [1.0, 1.0, 1.0, -4.0]
    ];
    let b = Array1::<f64>::ones(4);
    let exact = Array1::<f64>::from_elem(4, -1.0);
    (a, b, exact)
}

/// Symmetric positive definite tridiagonal 4×4 system (4 on the diagonal, 1 beside it).
pub fn spd_system() -> (Array2<f64>, Array1<f64>) {
    let a = array![
        [4.0, 1.0, 0.0, 0.0],
        [1.0, 4.0, 1.0, 0.0],
        [0.0, 1.0, 4.0, 1.0],
        [0.0, 0.0, 1.0, 4.0]
    ];
    let b = array![1.0, 2.0, 3.0, 4.0];
    (a, b)
}

/// n×n 1-D Laplacian: 2 on the diagonal, −1 on both off-diagonals.
pub fn laplacian_1d(n: usize) -> Array2<f64> {
    let mut a = Array2::<f64>::zeros((n, n));
    for i in 0..n {
        a[[i, i]] = 2.0;
        if i > 0 {
            a[[i, i - 1]] = -1.0;
        }
        if i + 1 < n {
            a[[i, i + 1]] = -1.0;
        }
    }
    a
}

/// Right-hand side (1, 2, ..., n).
pub fn ramp(n: usize) -> Array1<f64> {
    Array1::from_iter((1..=n).map(|i| i as f64))
}

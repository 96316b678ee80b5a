//! Dense vector and matrix primitives shared by every solver
//!
//! The solvers only ever need a handful of operations: inner products,
//! Euclidean norms, matrix-vector products and working copies. Keeping them
//! here means each algorithm reads like its textbook recurrence.

use crate::error::{Result, SolverError};
use ndarray::{Array1, Array2, s};

/// Compute inner product (x, y) = Σ x_i * y_i
#[inline]
pub fn inner_product(x: &Array1<f64>, y: &Array1<f64>) -> f64 {
    assert_eq!(
        x.len(),
        y.len(),
        "Vector lengths must match for inner product"
    );
    let mut sum = 0.0;
    for (xi, yi) in x.iter().zip(y.iter()) {
        sum += xi * yi;
    }
    sum
}

/// Compute vector norm squared: ||x||_2^2 = Σ x_i^2
#[inline]
pub fn vector_norm_sqr(x: &Array1<f64>) -> f64 {
    x.iter().map(|xi| xi * xi).sum()
}

/// Compute vector 2-norm: ||x||_2 = sqrt(Σ x_i^2)
#[inline]
pub fn vector_norm(x: &Array1<f64>) -> f64 {
    vector_norm_sqr(x).sqrt()
}

/// Euclidean distance ||x - y||_2
#[inline]
pub fn distance(x: &Array1<f64>, y: &Array1<f64>) -> f64 {
    assert_eq!(x.len(), y.len(), "Vector lengths must match for distance");
    x.iter()
        .zip(y.iter())
        .map(|(xi, yi)| (xi - yi) * (xi - yi))
        .sum::<f64>()
        .sqrt()
}

/// Matrix-vector product y = A * x
#[inline]
pub fn matvec(a: &Array2<f64>, x: &Array1<f64>) -> Array1<f64> {
    a.dot(x)
}

/// Compute axpy: y = α * x + y
#[inline]
pub fn axpy(alpha: f64, x: &Array1<f64>, y: &mut Array1<f64>) {
    for (xi, yi) in x.iter().zip(y.iter_mut()) {
        *yi += alpha * *xi;
    }
}

/// Largest entry-wise difference |A - B|, used to check factorizations.
pub fn max_abs_diff(a: &Array2<f64>, b: &Array2<f64>) -> f64 {
    assert_eq!(a.dim(), b.dim(), "Matrix shapes must match");
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}

/// Validate that `a` is square and `b` matches it; returns n.
pub fn check_system(a: &Array2<f64>, b: &Array1<f64>) -> Result<usize> {
    let n = check_square(a)?;
    check_len(b, n)?;
    Ok(n)
}

/// Validate that `a` is a non-empty square matrix; returns n.
pub fn check_square(a: &Array2<f64>) -> Result<usize> {
    let (rows, cols) = a.dim();
    if rows != cols {
        return Err(SolverError::DimensionMismatch {
            expected: rows,
            got: cols,
        });
    }
    if rows == 0 {
        return Err(SolverError::EmptyMatrix);
    }
    Ok(rows)
}

/// Validate a vector length against the system dimension.
pub fn check_len(v: &Array1<f64>, n: usize) -> Result<()> {
    if v.len() != n {
        return Err(SolverError::DimensionMismatch {
            expected: n,
            got: v.len(),
        });
    }
    Ok(())
}

/// Deep copy of `a` with `b` appended as an extra column.
pub fn augment(a: &Array2<f64>, b: &Array1<f64>) -> Array2<f64> {
    let n = a.nrows();
    let mut augmented = Array2::<f64>::zeros((n, a.ncols() + 1));
    augmented.slice_mut(s![.., ..a.ncols()]).assign(a);
    augmented.column_mut(a.ncols()).assign(b);
    augmented
}

/// Swap two rows of a matrix in place.
pub fn swap_rows(m: &mut Array2<f64>, i: usize, j: usize) {
    if i == j {
        return;
    }
    for col in 0..m.ncols() {
        m.swap([i, col], [j, col]);
    }
}

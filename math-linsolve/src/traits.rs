//! Core traits for linear algebra operations
//!
//! [`LinearOperator`] abstracts over anything that can compute y = A * x, so
//! Krylov methods can run on a dense matrix or on a matrix-free stencil alike.

use ndarray::{Array1, Array2};

/// Trait for linear operators (matrices) that can perform matrix-vector products.
pub trait LinearOperator {
    /// Number of rows in the operator
    fn num_rows(&self) -> usize;

    /// Number of columns in the operator
    fn num_cols(&self) -> usize;

    /// Apply the operator: y = A * x
    fn apply(&self, x: &Array1<f64>) -> Array1<f64>;

    /// Check if the operator is square
    fn is_square(&self) -> bool {
        self.num_rows() == self.num_cols()
    }
}

impl LinearOperator for Array2<f64> {
    fn num_rows(&self) -> usize {
        self.nrows()
    }

    fn num_cols(&self) -> usize {
        self.ncols()
    }

    fn apply(&self, x: &Array1<f64>) -> Array1<f64> {
        crate::arithmetic::matvec(self, x)
    }
}

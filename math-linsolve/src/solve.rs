//! Entry points selecting a solver by method
//!
//! Thin dispatch over [`crate::direct`] and [`crate::iterative`] so callers
//! that pick the method at runtime (the CLI, JSON problem files) do not need
//! to match on it themselves.

use crate::direct::{DirectConfig, DirectMethod, DirectSolution, gauss_eliminate, lu_decompose};
use crate::error::Result;
use crate::iterative::{CgConfig, IterativeConfig, StationaryMethod, cg, stationary_solve};
use crate::trace::ConvergenceResult;
use ndarray::{Array1, Array2};

pub use crate::iterative::sweep_omega;

/// Run a traced direct method with the default [`DirectConfig`].
pub fn solve_direct(
    method: DirectMethod,
    a: &Array2<f64>,
    b: &Array1<f64>,
) -> Result<DirectSolution> {
    solve_direct_with(method, a, b, &DirectConfig::default())
}

/// Run a traced direct method.
pub fn solve_direct_with(
    method: DirectMethod,
    a: &Array2<f64>,
    b: &Array1<f64>,
    config: &DirectConfig,
) -> Result<DirectSolution> {
    log::debug!("direct solve: {} on a {}x{} system", method, a.nrows(), a.ncols());
    if method.is_factorization() {
        lu_decompose(a, b, method.pivoting(), config)
    } else {
        gauss_eliminate(a, b, method.pivoting(), config)
    }
}

/// Run a stationary method; see [`stationary_solve`].
pub fn solve_iterative(
    method: StationaryMethod,
    a: &Array2<f64>,
    b: &Array1<f64>,
    x0: Option<&Array1<f64>>,
    exact: Option<&Array1<f64>>,
    config: &IterativeConfig,
) -> Result<ConvergenceResult> {
    stationary_solve(method, a, b, x0, exact, config)
}

/// Run the Conjugate Gradient method on a dense matrix.
pub fn solve_cg(
    a: &Array2<f64>,
    b: &Array1<f64>,
    x0: Option<&Array1<f64>>,
    config: &CgConfig,
) -> Result<ConvergenceResult> {
    cg(a, b, x0, config)
}

//! Stationary relaxation methods: Jacobi, Gauss-Seidel and SOR
//!
//! All three share one driver: sweep over the unknowns, measure how far the
//! iterate moved (||x_new - x_old||_2), record the sweep and stop once the
//! move is below the tolerance or the sweep limit is hit.

use super::IterativeConfig;
use crate::arithmetic::{check_len, check_system, distance, vector_norm};
use crate::error::{Result, SolverError};
use crate::trace::{ConvergenceResult, IterationRecord};
use ndarray::{Array1, Array2};
use serde::Serialize;
use std::fmt;

/// Which relaxation scheme to run.
///
/// Serializes as `{"method": "sor", "omega": 1.25}`, the same shape
/// [`StationaryMethod::from_name`] reads from problem files.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum StationaryMethod {
    /// Update every unknown from the previous iterate only.
    Jacobi,
    /// Use unknowns already updated in the current sweep.
    GaussSeidel,
    /// Gauss-Seidel extrapolated by the relaxation factor ω.
    ///
    /// ω is not validated; outside (0, 2) the iteration normally diverges.
    Sor {
        /// Relaxation factor
        omega: f64,
    },
}

impl StationaryMethod {
    /// Build a method from its name; `sor` needs `omega`.
    pub fn from_name(name: &str, omega: Option<f64>) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "jacobi" => Ok(StationaryMethod::Jacobi),
            "gauss_seidel" | "gauss-seidel" | "gs" => Ok(StationaryMethod::GaussSeidel),
            "sor" => omega
                .map(|omega| StationaryMethod::Sor { omega })
                .ok_or_else(|| SolverError::Config("sor requires omega".to_string())),
            other => Err(SolverError::UnknownMethod(other.to_string())),
        }
    }
}

impl fmt::Display for StationaryMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StationaryMethod::Jacobi => write!(f, "jacobi"),
            StationaryMethod::GaussSeidel => write!(f, "gauss_seidel"),
            StationaryMethod::Sor { omega } => write!(f, "sor(omega={})", omega),
        }
    }
}

/// Solve Ax = b with Jacobi iteration.
pub fn jacobi(
    a: &Array2<f64>,
    b: &Array1<f64>,
    x0: Option<&Array1<f64>>,
    exact: Option<&Array1<f64>>,
    config: &IterativeConfig,
) -> Result<ConvergenceResult> {
    stationary_solve(StationaryMethod::Jacobi, a, b, x0, exact, config)
}

/// Solve Ax = b with Gauss-Seidel iteration.
pub fn gauss_seidel(
    a: &Array2<f64>,
    b: &Array1<f64>,
    x0: Option<&Array1<f64>>,
    exact: Option<&Array1<f64>>,
    config: &IterativeConfig,
) -> Result<ConvergenceResult> {
    stationary_solve(StationaryMethod::GaussSeidel, a, b, x0, exact, config)
}

/// Solve Ax = b with successive over-relaxation.
///
/// `omega = 1.0` reproduces Gauss-Seidel iterate for iterate.
pub fn sor(
    a: &Array2<f64>,
    b: &Array1<f64>,
    omega: f64,
    x0: Option<&Array1<f64>>,
    exact: Option<&Array1<f64>>,
    config: &IterativeConfig,
) -> Result<ConvergenceResult> {
    stationary_solve(StationaryMethod::Sor { omega }, a, b, x0, exact, config)
}

/// Run `method` on Ax = b.
///
/// `x0` defaults to the zero vector. When `exact` is given every record also
/// carries ||x - exact||_2.
pub fn stationary_solve(
    method: StationaryMethod,
    a: &Array2<f64>,
    b: &Array1<f64>,
    x0: Option<&Array1<f64>>,
    exact: Option<&Array1<f64>>,
    config: &IterativeConfig,
) -> Result<ConvergenceResult> {
    let n = check_system(a, b)?;
    if let Some(x0) = x0 {
        check_len(x0, n)?;
    }
    if let Some(exact) = exact {
        check_len(exact, n)?;
    }
    if let Some(row) = (0..n).find(|&i| a[[i, i]] == 0.0) {
        return Err(SolverError::ZeroDiagonal { row });
    }

    let mut x = match x0 {
        Some(x0) => x0.clone(),
        None => Array1::<f64>::zeros(n),
    };
    let mut history = Vec::new();
    let mut converged = false;

    for iter in 0..config.max_iterations {
        let x_old = x.clone();

        match method {
            StationaryMethod::Jacobi => jacobi_sweep(a, b, &x_old, &mut x),
            StationaryMethod::GaussSeidel => gauss_seidel_sweep(a, b, &x_old, &mut x),
            StationaryMethod::Sor { omega } => sor_sweep(a, b, omega, &x_old, &mut x),
        }

        let residual = distance(&x, &x_old);
        let exact_error = exact.map(|e| distance(&x, e));

        history.push(IterationRecord {
            iteration: iter + 1,
            x: x.clone(),
            residual,
            x_norm: vector_norm(&x),
            exact_error,
        });
        log::debug!("{} sweep {}: residual = {:e}", method, iter + 1, residual);

        if config.print_interval > 0 && (iter + 1) % config.print_interval == 0 {
            log::info!(
                "{} iteration {}: residual = {:.6e}",
                method,
                iter + 1,
                residual
            );
        }

        if residual < config.tolerance {
            converged = true;
            break;
        }
    }

    if !converged {
        log::warn!(
            "{} did not converge in {} iterations",
            method,
            config.max_iterations
        );
    }

    Ok(ConvergenceResult {
        solution: x,
        iterations: history.len(),
        history,
        converged,
    })
}

// x_new[i] = (b[i] - Σ_{j≠i} a_ij x_old[j]) / a_ii
fn jacobi_sweep(a: &Array2<f64>, b: &Array1<f64>, x_old: &Array1<f64>, x: &mut Array1<f64>) {
    let n = b.len();
    for i in 0..n {
        let sum: f64 = (0..n)
            .filter(|&j| j != i)
            .map(|j| a[[i, j]] * x_old[j])
            .sum();
        x[i] = (b[i] - sum) / a[[i, i]];
    }
}

/// Gauss-Seidel value for unknown i; entries j < i of `x` are already updated.
#[inline]
fn gauss_seidel_value(
    a: &Array2<f64>,
    b: &Array1<f64>,
    x_old: &Array1<f64>,
    x: &Array1<f64>,
    i: usize,
) -> f64 {
    let n = b.len();
    let lower: f64 = (0..i).map(|j| a[[i, j]] * x[j]).sum();
    let upper: f64 = ((i + 1)..n).map(|j| a[[i, j]] * x_old[j]).sum();
    (b[i] - lower - upper) / a[[i, i]]
}

fn gauss_seidel_sweep(
    a: &Array2<f64>,
    b: &Array1<f64>,
    x_old: &Array1<f64>,
    x: &mut Array1<f64>,
) {
    for i in 0..b.len() {
        x[i] = gauss_seidel_value(a, b, x_old, x, i);
    }
}

fn sor_sweep(
    a: &Array2<f64>,
    b: &Array1<f64>,
    omega: f64,
    x_old: &Array1<f64>,
    x: &mut Array1<f64>,
) {
    for i in 0..b.len() {
        let gs = gauss_seidel_value(a, b, x_old, x, i);
        x[i] = (1.0 - omega) * x_old[i] + omega * gs;
    }
}

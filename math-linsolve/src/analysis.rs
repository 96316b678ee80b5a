//! Post-processing of solver output
//!
//! Convergence-rate estimates from iteration histories, and error measures
//! used to check a solution against a reference or against the system itself.

use crate::arithmetic::{check_system, distance, matvec, vector_norm};
use crate::direct::lu_solve;
use crate::error::Result;
use crate::iterative::{CgConfig, cg};
use crate::trace::ConvergenceResult;
use ndarray::{Array1, Array2};
use serde::Serialize;
use std::time::Instant;

/// Ratios r_k / r_{k-1} of successive residuals.
///
/// Pairs whose predecessor is zero are skipped.
pub fn convergence_rates(result: &ConvergenceResult) -> Vec<f64> {
    result
        .history
        .windows(2)
        .filter(|w| w[0].residual > 0.0)
        .map(|w| w[1].residual / w[0].residual)
        .collect()
}

/// Mean of [`convergence_rates`], `None` with fewer than two sweeps.
pub fn average_convergence_rate(result: &ConvergenceResult) -> Option<f64> {
    let rates = convergence_rates(result);
    if rates.is_empty() {
        return None;
    }
    Some(rates.iter().sum::<f64>() / rates.len() as f64)
}

/// Whether the residual never increases from one sweep to the next.
pub fn is_monotone(result: &ConvergenceResult) -> bool {
    result
        .history
        .windows(2)
        .all(|w| w[1].residual <= w[0].residual)
}

/// ||x - reference|| / ||reference||, or the absolute error when the
/// reference is the zero vector.
pub fn relative_error(x: &Array1<f64>, reference: &Array1<f64>) -> f64 {
    let err = distance(x, reference);
    let norm = vector_norm(reference);
    if norm > 0.0 { err / norm } else { err }
}

/// ||b - A·x||
pub fn residual_norm(a: &Array2<f64>, x: &Array1<f64>, b: &Array1<f64>) -> f64 {
    vector_norm(&(b - &matvec(a, x)))
}

/// Conjugate Gradient run checked against a direct solve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CgCheck {
    /// The CG run
    pub cg: ConvergenceResult,
    /// Solution from LU with partial pivoting
    #[serde(serialize_with = "crate::trace::serde_arrays::vector")]
    pub reference: Array1<f64>,
    /// ||x_cg - x_lu|| / ||x_lu||
    pub relative_error: f64,
    /// Wall time of the CG run in seconds
    pub cg_seconds: f64,
    /// Wall time of the LU solve in seconds
    pub direct_seconds: f64,
}

impl CgCheck {
    /// LU time over CG time; above 1 means CG was faster.
    pub fn speedup(&self) -> f64 {
        if self.cg_seconds > 0.0 {
            self.direct_seconds / self.cg_seconds
        } else {
            f64::INFINITY
        }
    }
}

/// Run CG and compare its answer with [`lu_solve`].
pub fn check_cg_against_direct(
    a: &Array2<f64>,
    b: &Array1<f64>,
    config: &CgConfig,
) -> Result<CgCheck> {
    check_system(a, b)?;

    let start = Instant::now();
    let reference = lu_solve(a, b)?;
    let direct_seconds = start.elapsed().as_secs_f64();

    let start = Instant::now();
    let cg = cg(a, b, None, config)?;
    let cg_seconds = start.elapsed().as_secs_f64();

    let relative_error = relative_error(&cg.solution, &reference);
    log::info!(
        "CG: {} iterations, relative error vs LU = {:.3e}, {:.3e}s vs {:.3e}s",
        cg.iterations,
        relative_error,
        cg_seconds,
        direct_seconds
    );
    Ok(CgCheck {
        cg,
        reference,
        relative_error,
        cg_seconds,
        direct_seconds,
    })
}

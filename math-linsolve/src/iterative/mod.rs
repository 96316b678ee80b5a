//! Iterative solvers for linear systems
//!
//! This module provides:
//! - [`jacobi`], [`gauss_seidel`], [`sor`]: stationary relaxation methods
//! - [`cg`]: Conjugate Gradient - for symmetric positive definite systems
//! - [`sweep_omega`]: grid search for the SOR relaxation factor
//! - [`compare_methods`]: Jacobi, Gauss-Seidel and several SOR runs side by side
//!
//! None of them treats running out of iterations as an error; inspect
//! [`ConvergenceResult::converged`](crate::ConvergenceResult) instead.

mod cg;
mod compare;
mod omega;
mod stationary;

pub use cg::{CgConfig, cg};
pub use compare::{DEFAULT_COMPARISON_OMEGAS, MethodComparison, SorRun, compare_methods};
pub use omega::{OmegaSweep, OmegaTrial, default_omega_grid, find_optimal_omega, sweep_omega};
pub use stationary::{StationaryMethod, gauss_seidel, jacobi, sor, stationary_solve};

use serde::{Deserialize, Serialize};

/// Configuration shared by the stationary methods
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IterativeConfig {
    /// Maximum number of sweeps
    pub max_iterations: usize,
    /// Stop once ||x_new - x_old|| drops below this
    pub tolerance: f64,
    /// Print progress every N iterations (0 = no output)
    pub print_interval: usize,
}

impl Default for IterativeConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 1e-6,
            print_interval: 0,
        }
    }
}

impl IterativeConfig {
    /// Default config with a different sweep limit
    pub fn with_max_iterations(max_iterations: usize) -> Self {
        Self {
            max_iterations,
            ..Default::default()
        }
    }
}

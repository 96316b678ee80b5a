//! Grid search for the SOR relaxation factor
//!
//! A plain exhaustive scan: SOR is run once per candidate ω and the one that
//! needs the fewest sweeps wins. Cost is O(|grid| · max_iterations · n²).

use super::IterativeConfig;
use super::stationary::sor;
use crate::arithmetic::check_system;
use crate::error::{Result, SolverError};
use ndarray::{Array1, Array2};
use serde::Serialize;

/// Outcome of one SOR run in a sweep.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OmegaTrial {
    /// Relaxation factor tried
    pub omega: f64,
    /// Sweeps until convergence (or the sweep limit)
    pub iterations: usize,
    /// Whether the run converged
    pub converged: bool,
    /// ||x - exact|| at the end, when a reference was given
    pub exact_error: Option<f64>,
}

impl OmegaTrial {
    // fewer sweeps wins; on equal sweeps a converged run beats one that hit the limit
    fn beats(&self, other: &OmegaTrial) -> bool {
        self.iterations < other.iterations
            || (self.iterations == other.iterations && self.converged && !other.converged)
    }
}

/// Result of [`sweep_omega`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OmegaSweep {
    /// ω with the fewest sweeps (converged runs first, then grid order on ties)
    pub best_omega: f64,
    /// Sweeps needed by `best_omega`
    pub best_iterations: usize,
    /// Every candidate, in grid order
    pub table: Vec<OmegaTrial>,
}

/// ω = 0.05, 0.10, ..., 1.95
pub fn default_omega_grid() -> Vec<f64> {
    (1..40).map(|i| i as f64 * 0.05).collect()
}

/// Run SOR for every ω in `omegas` and report the fastest.
pub fn sweep_omega(
    a: &Array2<f64>,
    b: &Array1<f64>,
    exact: Option<&Array1<f64>>,
    omegas: &[f64],
    config: &IterativeConfig,
) -> Result<OmegaSweep> {
    check_system(a, b)?;
    if omegas.is_empty() {
        return Err(SolverError::EmptyOmegaGrid);
    }

    let mut table = Vec::with_capacity(omegas.len());
    for &omega in omegas {
        let result = sor(a, b, omega, None, exact, config)?;
        log::debug!(
            "omega {:.3}: {} iterations (converged: {})",
            omega,
            result.iterations,
            result.converged
        );
        table.push(OmegaTrial {
            omega,
            iterations: result.iterations,
            converged: result.converged,
            exact_error: result.final_exact_error(),
        });
    }

    let mut best = &table[0];
    for trial in &table[1..] {
        if trial.beats(best) {
            best = trial;
        }
    }
    let (best_omega, best_iterations) = (best.omega, best.iterations);
    log::info!(
        "best omega {:.3} with {} iterations over {} candidates",
        best_omega,
        best_iterations,
        table.len()
    );

    Ok(OmegaSweep {
        best_omega,
        best_iterations,
        table,
    })
}

/// [`sweep_omega`] over [`default_omega_grid`] with the default sweep limit.
pub fn find_optimal_omega(
    a: &Array2<f64>,
    b: &Array1<f64>,
    exact: Option<&Array1<f64>>,
) -> Result<OmegaSweep> {
    sweep_omega(a, b, exact, &default_omega_grid(), &IterativeConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_default_grid() {
        let grid = default_omega_grid();
        assert_eq!(grid.len(), 39);
        assert_relative_eq!(grid[0], 0.05);
        assert_relative_eq!(grid[38], 1.95, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_grid_rejected() {
        let a = array![[2.0, 0.0], [0.0, 2.0]];
        let b = array![1.0, 1.0];
        let err = sweep_omega(&a, &b, None, &[], &IterativeConfig::default()).unwrap_err();
        assert!(matches!(err, SolverError::EmptyOmegaGrid));
    }

    #[test]
    fn test_ties_keep_first() {
        // omega = 1 solves a diagonal system in one sweep, the second confirms
        let a = array![[2.0, 0.0], [0.0, 4.0]];
        let b = array![2.0, 4.0];
        let sweep = sweep_omega(&a, &b, None, &[1.0, 1.0], &IterativeConfig::default()).unwrap();
        assert_eq!(sweep.best_iterations, 2);
        assert_eq!(sweep.table.len(), 2);
        assert_eq!(sweep.best_omega, 1.0);
    }

    #[test]
    fn test_converged_run_wins_tie_at_sweep_limit() {
        // omega = 0.5 is still moving after 2 sweeps; omega = 1 converges on the 2nd
        let a = array![[2.0, 0.0], [0.0, 4.0]];
        let b = array![2.0, 4.0];
        let config = IterativeConfig::with_max_iterations(2);
        let sweep = sweep_omega(&a, &b, None, &[0.5, 1.0], &config).unwrap();

        assert_eq!(sweep.table[0].iterations, 2);
        assert!(!sweep.table[0].converged);
        assert!(sweep.table[1].converged);
        assert_eq!(sweep.best_omega, 1.0);
        assert_eq!(sweep.best_iterations, 2);
    }

    #[test]
    fn test_table_follows_grid_order() {
        let a = array![[4.0, 1.0], [1.0, 3.0]];
        let b = array![1.0, 2.0];
        let grid = [0.5, 1.0, 1.2];
        let sweep = sweep_omega(&a, &b, None, &grid, &IterativeConfig::default()).unwrap();
        let omegas: Vec<f64> = sweep.table.iter().map(|t| t.omega).collect();
        assert_eq!(omegas, grid.to_vec());
        assert!(sweep.table.iter().all(|t| t.converged));
        assert!(sweep.table.iter().all(|t| t.exact_error.is_none()));
    }
}

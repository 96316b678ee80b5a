//! CG (Conjugate Gradient) solver
//!
//! The Conjugate Gradient method for symmetric positive definite systems.
//! In exact arithmetic it terminates in at most n iterations, which is why the
//! iteration cap defaults to the system size. There is no preconditioning and
//! no restart.

use crate::arithmetic::{axpy, check_len, inner_product, vector_norm};
use crate::error::{Result, SolverError};
use crate::trace::{ConvergenceResult, IterationRecord};
use crate::traits::LinearOperator;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// p·Ap below this means the search direction has collapsed.
const BREAKDOWN_THRESHOLD: f64 = 1e-30;

/// CG solver configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CgConfig {
    /// Maximum number of iterations (`None` = system size)
    pub max_iterations: Option<usize>,
    /// Absolute tolerance on ||b - A x||
    pub tolerance: f64,
    /// Print progress every N iterations (0 = no output)
    pub print_interval: usize,
}

impl Default for CgConfig {
    fn default() -> Self {
        Self {
            max_iterations: None,
            tolerance: 1e-6,
            print_interval: 0,
        }
    }
}

/// Solve Ax = b using the Conjugate Gradient method
///
/// Note: This method is only correct for symmetric positive definite matrices.
/// Symmetry and definiteness are not checked.
///
/// Each history record carries ||r|| = ||b - A x|| and ||x|| after the
/// update. Hitting the iteration cap returns the current iterate with
/// `converged == false`.
pub fn cg<A>(
    operator: &A,
    b: &Array1<f64>,
    x0: Option<&Array1<f64>>,
    config: &CgConfig,
) -> Result<ConvergenceResult>
where
    A: LinearOperator,
{
    if !operator.is_square() {
        return Err(SolverError::DimensionMismatch {
            expected: operator.num_rows(),
            got: operator.num_cols(),
        });
    }
    let n = operator.num_rows();
    if n == 0 {
        return Err(SolverError::EmptyMatrix);
    }
    check_len(b, n)?;
    if let Some(x0) = x0 {
        check_len(x0, n)?;
    }

    let max_iterations = config.max_iterations.unwrap_or(n);
    let mut x = match x0 {
        Some(x0) => x0.clone(),
        None => Array1::<f64>::zeros(n),
    };

    // Initial residual r = b - Ax
    let ax = operator.apply(&x);
    check_len(&ax, n)?;
    let mut r = b - &ax;
    let mut p = r.clone();
    let mut rho = inner_product(&r, &r);
    let mut history = Vec::new();

    if rho.sqrt() < config.tolerance {
        return Ok(ConvergenceResult {
            solution: x,
            history,
            iterations: 0,
            converged: true,
        });
    }

    let mut converged = false;
    for iter in 0..max_iterations {
        // q = A * p
        let q = operator.apply(&p);
        check_len(&q, n)?;

        // alpha = rho / (p, q)
        let pq = inner_product(&p, &q);
        if pq.abs() < BREAKDOWN_THRESHOLD {
            log::warn!("CG breakdown at iteration {}: p·Ap = {:e}", iter + 1, pq);
            break;
        }
        let alpha = rho / pq;

        // x = x + alpha * p
        axpy(alpha, &p, &mut x);

        // r = r - alpha * q
        axpy(-alpha, &q, &mut r);

        let rho_new = inner_product(&r, &r);
        let residual = rho_new.sqrt();

        history.push(IterationRecord {
            iteration: iter + 1,
            x: x.clone(),
            residual,
            x_norm: vector_norm(&x),
            exact_error: None,
        });

        if config.print_interval > 0 && (iter + 1) % config.print_interval == 0 {
            log::info!("CG iteration {}: residual = {:.6e}", iter + 1, residual);
        }

        if residual < config.tolerance {
            converged = true;
            break;
        }

        let beta = rho_new / rho;
        rho = rho_new;

        // p = r + beta * p
        p = &r + &p.mapv(|pi| pi * beta);
    }

    if !converged {
        log::warn!(
            "CG stopped after {} iterations without reaching tolerance {:e}",
            history.len(),
            config.tolerance
        );
    }

    Ok(ConvergenceResult {
        solution: x,
        iterations: history.len(),
        history,
        converged,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, array};

    #[test]
    fn test_cg_spd() {
        // Symmetric positive definite matrix
        let a = array![[4.0_f64, 1.0], [1.0, 3.0],];
        let b = array![1.0_f64, 2.0];

        let config = CgConfig {
            max_iterations: Some(100),
            tolerance: 1e-10,
            print_interval: 0,
        };

        let solution = cg(&a, &b, None, &config).unwrap();

        assert!(solution.converged, "CG should converge for SPD matrix");

        let ax = a.dot(&solution.solution);
        let error: f64 = (&ax - &b).iter().map(|e| e * e).sum::<f64>().sqrt();
        assert!(error < 1e-8, "Solution should satisfy Ax = b");
    }

    #[test]
    fn test_cg_identity() {
        let n = 5;
        let id = Array2::<f64>::eye(n);
        let b = Array1::from_iter((1..=n).map(|i| i as f64));

        let solution = cg(&id, &b, None, &CgConfig::default()).unwrap();

        assert!(solution.converged);
        assert_eq!(solution.iterations, 1);

        let error: f64 = (&solution.solution - &b)
            .iter()
            .map(|e| e * e)
            .sum::<f64>()
            .sqrt();
        assert!(error < 1e-10);
    }

    #[test]
    fn test_cg_default_cap_is_n() {
        let a = array![[4.0, 1.0, 0.0], [1.0, 4.0, 1.0], [0.0, 1.0, 4.0]];
        let b = array![1.0, 2.0, 3.0];
        let config = CgConfig {
            tolerance: 0.0,
            ..Default::default()
        };

        let solution = cg(&a, &b, None, &config).unwrap();
        assert!(solution.iterations <= 3);
    }

    #[test]
    fn test_cg_zero_rhs_returns_immediately() {
        let a = array![[2.0, 0.0], [0.0, 2.0]];
        let b = array![0.0, 0.0];

        let solution = cg(&a, &b, None, &CgConfig::default()).unwrap();
        assert!(solution.converged);
        assert_eq!(solution.iterations, 0);
        assert!(solution.history.is_empty());
    }

    #[test]
    fn test_cg_initial_guess_is_used() {
        let a = array![[4.0, 1.0], [1.0, 3.0]];
        let b = array![1.0, 2.0];
        let exact = array![1.0 / 11.0, 7.0 / 11.0];

        let solution = cg(&a, &b, Some(&exact), &CgConfig::default()).unwrap();
        assert_eq!(solution.iterations, 0);
        assert_eq!(solution.solution, exact);
    }

    struct TruncatingOperator;

    impl LinearOperator for TruncatingOperator {
        fn num_rows(&self) -> usize {
            3
        }

        fn num_cols(&self) -> usize {
            3
        }

        fn apply(&self, x: &Array1<f64>) -> Array1<f64> {
            x.slice(ndarray::s![..2]).to_owned()
        }
    }

    #[test]
    fn test_cg_operator_output_length_checked() {
        let b = array![1.0, 2.0, 3.0];
        let err = cg(&TruncatingOperator, &b, None, &CgConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            SolverError::DimensionMismatch {
                expected: 3,
                got: 2
            }
        ));
    }

    #[test]
    fn test_cg_rejects_rectangular() {
        let a = Array2::<f64>::zeros((2, 3));
        let b = array![1.0, 2.0];
        assert!(cg(&a, &b, None, &CgConfig::default()).is_err());
    }
}

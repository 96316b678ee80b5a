//! Side-by-side runs of the stationary methods on one system

use super::IterativeConfig;
use super::stationary::{gauss_seidel, jacobi, sor};
use crate::error::Result;
use crate::trace::ConvergenceResult;
use ndarray::{Array1, Array2};
use serde::Serialize;

/// Relaxation factors compared when the caller gives none.
pub const DEFAULT_COMPARISON_OMEGAS: [f64; 5] = [0.5, 1.0, 1.25, 1.5, 1.75];

/// One SOR run of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SorRun {
    /// Relaxation factor
    pub omega: f64,
    /// Outcome
    pub result: ConvergenceResult,
}

/// Jacobi, Gauss-Seidel and SOR on the same system.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodComparison {
    /// Jacobi run
    pub jacobi: ConvergenceResult,
    /// Gauss-Seidel run
    pub gauss_seidel: ConvergenceResult,
    /// One SOR run per relaxation factor
    pub sor: Vec<SorRun>,
}

impl MethodComparison {
    /// SOR run with the fewest iterations, if any converged.
    pub fn fastest_sor(&self) -> Option<&SorRun> {
        self.sor
            .iter()
            .filter(|run| run.result.converged)
            .min_by_key(|run| run.result.iterations)
    }
}

/// Run all three stationary methods from x0 = 0.
///
/// `omegas` defaults to [`DEFAULT_COMPARISON_OMEGAS`]; `exact`, if given, is
/// threaded into every run so the histories carry the true error.
pub fn compare_methods(
    a: &Array2<f64>,
    b: &Array1<f64>,
    exact: Option<&Array1<f64>>,
    omegas: Option<&[f64]>,
    config: &IterativeConfig,
) -> Result<MethodComparison> {
    let omegas = omegas.unwrap_or(&DEFAULT_COMPARISON_OMEGAS[..]);

    let jacobi = jacobi(a, b, None, exact, config)?;
    let gauss_seidel = gauss_seidel(a, b, None, exact, config)?;
    let sor = omegas
        .iter()
        .map(|&omega| {
            sor(a, b, omega, None, exact, config).map(|result| SorRun { omega, result })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(MethodComparison {
        jacobi,
        gauss_seidel,
        sor,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_compare_default_omegas() {
        let a = array![[4.0, 1.0, 0.0], [1.0, 4.0, 1.0], [0.0, 1.0, 4.0]];
        let b = array![5.0, 6.0, 5.0];
        let exact = array![1.0, 1.0, 1.0];

        let cmp = compare_methods(&a, &b, Some(&exact), None, &IterativeConfig::default()).unwrap();
        assert_eq!(cmp.sor.len(), DEFAULT_COMPARISON_OMEGAS.len());
        assert!(cmp.jacobi.converged);
        assert!(cmp.gauss_seidel.converged);
        assert!(cmp.gauss_seidel.iterations <= cmp.jacobi.iterations);

        // the omega = 1 run is Gauss-Seidel
        let sor_one = cmp.sor.iter().find(|run| run.omega == 1.0).unwrap();
        assert_eq!(sor_one.result.iterations, cmp.gauss_seidel.iterations);

        let fastest = cmp.fastest_sor().unwrap();
        assert!(fastest.result.iterations <= sor_one.result.iterations);
    }

    #[test]
    fn test_compare_custom_omegas() {
        let a = array![[2.0, 1.0], [1.0, 2.0]];
        let b = array![3.0, 3.0];
        let cmp = compare_methods(&a, &b, None, Some(&[1.1][..]), &IterativeConfig::default()).unwrap();
        assert_eq!(cmp.sor.len(), 1);
        assert_eq!(cmp.sor[0].omega, 1.1);
    }
}

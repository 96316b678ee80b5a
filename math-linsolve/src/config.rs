//! JSON problem files
//!
//! A problem file holds the system, optional reference data and the solver to
//! run:
//!
//! ```json
//! {
//!   "matrix": [[4.0, 1.0], [1.0, 3.0]],
//!   "rhs": [1.0, 2.0],
//!   "solver": { "type": "iterative", "method": "sor", "omega": 1.25 },
//!   "iterative": { "max_iterations": 200, "tolerance": 1e-8 }
//! }
//! ```

use crate::direct::{DirectConfig, DirectMethod, DirectSolution};
use crate::error::{Result, SolverError};
use crate::iterative::{
    CgConfig, IterativeConfig, OmegaSweep, StationaryMethod, default_omega_grid, sweep_omega,
};
use crate::solve::{solve_cg, solve_direct_with, solve_iterative};
use crate::trace::ConvergenceResult;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Complete problem configuration loaded from JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemConfig {
    /// Coefficient matrix, row by row
    pub matrix: Vec<Vec<f64>>,
    /// Right-hand side
    pub rhs: Vec<f64>,
    /// Reference solution, used for error histories
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exact: Option<Vec<f64>>,
    /// Initial guess for the iterative methods
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x0: Option<Vec<f64>>,
    /// Which solver to run
    pub solver: SolverSpec,
    /// Direct solver settings
    #[serde(default)]
    pub direct: DirectConfig,
    /// Stationary method settings
    #[serde(default)]
    pub iterative: IterativeConfig,
    /// Conjugate Gradient settings
    #[serde(default)]
    pub cg: CgConfig,
}

/// Solver selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SolverSpec {
    /// One of the traced direct methods
    Direct {
        /// Method name (`gauss`, `gauss_pivot`, `lu`, `lu_pivot`)
        method: DirectMethod,
    },
    /// Jacobi, Gauss-Seidel or SOR
    Iterative {
        /// `jacobi`, `gauss_seidel` or `sor`
        method: String,
        /// Relaxation factor, required for `sor`
        #[serde(default, skip_serializing_if = "Option::is_none")]
        omega: Option<f64>,
    },
    /// Conjugate Gradient
    Cg,
    /// SOR over a grid of relaxation factors
    OmegaSweep {
        /// Candidate factors, defaults to 0.05..=1.95 in steps of 0.05
        #[serde(default, skip_serializing_if = "Option::is_none")]
        omegas: Option<Vec<f64>>,
    },
}

/// Result of [`ProblemConfig::run`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "result", rename_all = "snake_case")]
pub enum SolveOutput {
    /// Output of a direct method
    Direct(DirectSolution),
    /// Output of a stationary method or CG
    Iterative(ConvergenceResult),
    /// Output of an omega sweep
    OmegaSweep(OmegaSweep),
}

impl ProblemConfig {
    /// Load configuration from JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Parse configuration from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Save configuration to JSON file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Coefficient matrix as an ndarray; every row must have the same length.
    pub fn matrix(&self) -> Result<Array2<f64>> {
        let nrows = self.matrix.len();
        let ncols = self.matrix.first().map_or(0, Vec::len);
        for (row, values) in self.matrix.iter().enumerate() {
            if values.len() != ncols {
                return Err(SolverError::RaggedMatrix {
                    row,
                    expected: ncols,
                    got: values.len(),
                });
            }
        }
        let flat: Vec<f64> = self.matrix.iter().flatten().copied().collect();
        Array2::from_shape_vec((nrows, ncols), flat)
            .map_err(|e| SolverError::Config(format!("invalid matrix shape: {}", e)))
    }

    /// Right-hand side as an ndarray
    pub fn rhs(&self) -> Array1<f64> {
        Array1::from_vec(self.rhs.clone())
    }

    /// Reference solution as an ndarray, if given
    pub fn exact(&self) -> Option<Array1<f64>> {
        self.exact.clone().map(Array1::from_vec)
    }

    /// Initial guess as an ndarray, if given
    pub fn x0(&self) -> Option<Array1<f64>> {
        self.x0.clone().map(Array1::from_vec)
    }

    /// Run the configured solver.
    pub fn run(&self) -> Result<SolveOutput> {
        let a = self.matrix()?;
        let b = self.rhs();
        let exact = self.exact();
        let x0 = self.x0();
        log::info!("running {:?} on a {}x{} system", self.solver, a.nrows(), a.ncols());

        match &self.solver {
            SolverSpec::Direct { method } => {
                solve_direct_with(*method, &a, &b, &self.direct).map(SolveOutput::Direct)
            }
            SolverSpec::Iterative { method, omega } => {
                let method = StationaryMethod::from_name(method, *omega)?;
                solve_iterative(
                    method,
                    &a,
                    &b,
                    x0.as_ref(),
                    exact.as_ref(),
                    &self.iterative,
                )
                .map(SolveOutput::Iterative)
            }
            SolverSpec::Cg => {
                solve_cg(&a, &b, x0.as_ref(), &self.cg).map(SolveOutput::Iterative)
            }
            SolverSpec::OmegaSweep { omegas } => {
                let grid = omegas.clone().unwrap_or_else(default_omega_grid);
                sweep_omega(&a, &b, exact.as_ref(), &grid, &self.iterative)
                    .map(SolveOutput::OmegaSweep)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::direct::NearZeroPivotPolicy;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_direct() {
        let json = r#"{
            "matrix": [[2.0, 1.0], [1.0, 3.0]],
            "rhs": [3.0, 5.0],
            "solver": { "type": "direct", "method": "pivot" },
            "direct": { "near_zero_pivot": "warn" }
        }"#;
        let config = ProblemConfig::from_json_str(json).unwrap();
        assert_eq!(
            config.solver,
            SolverSpec::Direct {
                method: DirectMethod::GaussPivot
            }
        );
        assert_eq!(config.direct.near_zero_pivot, NearZeroPivotPolicy::Warn);
        assert_eq!(config.iterative.max_iterations, 100);

        match config.run().unwrap() {
            SolveOutput::Direct(result) => {
                assert_relative_eq!(result.solution[0], 0.8, epsilon = 1e-12);
                assert_relative_eq!(result.solution[1], 1.4, epsilon = 1e-12);
            }
            other => panic!("unexpected output {:?}", other),
        }
    }

    #[test]
    fn test_run_sor_with_exact() {
        let json = r#"{
            "matrix": [[4.0, 1.0], [1.0, 3.0]],
            "rhs": [5.0, 4.0],
            "exact": [1.0, 1.0],
            "solver": { "type": "iterative", "method": "sor", "omega": 1.1 },
            "iterative": { "tolerance": 1e-10 }
        }"#;
        let config = ProblemConfig::from_json_str(json).unwrap();
        match config.run().unwrap() {
            SolveOutput::Iterative(result) => {
                assert!(result.converged);
                assert!(result.final_exact_error().unwrap() < 1e-8);
            }
            other => panic!("unexpected output {:?}", other),
        }
    }

    #[test]
    fn test_sor_without_omega_is_config_error() {
        let json = r#"{
            "matrix": [[4.0, 1.0], [1.0, 3.0]],
            "rhs": [5.0, 4.0],
            "solver": { "type": "iterative", "method": "sor" }
        }"#;
        let err = ProblemConfig::from_json_str(json).unwrap().run().unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_run_cg_and_sweep() {
        let json = r#"{
            "matrix": [[4.0, 1.0], [1.0, 3.0]],
            "rhs": [5.0, 4.0],
            "solver": { "type": "cg" }
        }"#;
        let mut config = ProblemConfig::from_json_str(json).unwrap();
        assert!(matches!(config.run().unwrap(), SolveOutput::Iterative(r) if r.converged));

        config.solver = SolverSpec::OmegaSweep {
            omegas: Some(vec![0.8, 1.0, 1.2]),
        };
        match config.run().unwrap() {
            SolveOutput::OmegaSweep(sweep) => assert_eq!(sweep.table.len(), 3),
            other => panic!("unexpected output {:?}", other),
        }
    }

    #[test]
    fn test_ragged_matrix_rejected() {
        let json = r#"{
            "matrix": [[1.0, 2.0], [3.0]],
            "rhs": [1.0, 2.0],
            "solver": { "type": "cg" }
        }"#;
        let config = ProblemConfig::from_json_str(json).unwrap();
        let err = config.matrix().unwrap_err();
        assert!(matches!(
            err,
            SolverError::RaggedMatrix {
                row: 1,
                expected: 2,
                got: 1
            }
        ));
    }

    #[test]
    fn test_unknown_direct_method_fails_to_parse() {
        let json = r#"{
            "matrix": [[1.0]],
            "rhs": [1.0],
            "solver": { "type": "direct", "method": "cholesky" }
        }"#;
        assert!(matches!(
            ProblemConfig::from_json_str(json),
            Err(SolverError::Json(_))
        ));
    }

    #[test]
    fn test_output_serializes_with_kind_tag() {
        let json = r#"{
            "matrix": [[2.0]],
            "rhs": [4.0],
            "solver": { "type": "direct", "method": "lu" }
        }"#;
        let output = ProblemConfig::from_json_str(json).unwrap().run().unwrap();
        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(value["kind"], "direct");
        assert_eq!(value["result"]["solution"][0], 2.0);
    }
}

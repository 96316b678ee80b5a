//! Direct solvers for linear systems
//!
//! This module provides elimination-based solvers that record every step:
//! - [`gauss_eliminate`]: Gaussian elimination, naive or with partial pivoting
//! - [`lu_decompose`]: Doolittle LU, or LU with partial pivoting (P·A = L·U)
//!
//! and an untraced dense solve for callers that only want the answer:
//! - [`lu_solve`]: LU decomposition with partial pivoting

mod gauss;
mod lu;

pub use gauss::gauss_eliminate;
pub use lu::{LuFactorization, lu_decompose, lu_factorize, lu_solve};

use crate::error::{Result, SolverError};
use crate::trace::{PermutationRecord, StepKind, StepRecord, serde_arrays};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Pivots smaller than this in magnitude are treated as zero.
pub const DEFAULT_PIVOT_TOLERANCE: f64 = 1e-10;

/// What to do when a pivot falls below the pivot tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NearZeroPivotPolicy {
    /// Abort with [`SolverError::SingularMatrix`].
    #[default]
    Fail,
    /// Record a `NearZeroPivotWarning` step, skip the column and carry on.
    ///
    /// Back substitution may then divide by a (near) zero diagonal entry and
    /// the returned solution can contain infinities or NaN; check
    /// [`DirectSolution::is_finite`].
    Warn,
}

/// Direct solver configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectConfig {
    /// Magnitude below which a pivot counts as zero
    pub pivot_tolerance: f64,
    /// Behaviour on a near-zero pivot
    pub near_zero_pivot: NearZeroPivotPolicy,
}

impl Default for DirectConfig {
    fn default() -> Self {
        Self {
            pivot_tolerance: DEFAULT_PIVOT_TOLERANCE,
            near_zero_pivot: NearZeroPivotPolicy::Fail,
        }
    }
}

impl DirectConfig {
    /// Config reproducing the classroom behaviour: warn and keep going.
    pub fn warn_on_near_zero_pivot() -> Self {
        Self {
            near_zero_pivot: NearZeroPivotPolicy::Warn,
            ..Default::default()
        }
    }

    /// Decide whether `pivot` in `column` can be divided by.
    ///
    /// Returns `Ok(false)` when the pivot is too small but the policy says to
    /// continue.
    pub(crate) fn accept_pivot(&self, column: usize, pivot: f64) -> Result<bool> {
        if pivot.abs() >= self.pivot_tolerance {
            return Ok(true);
        }
        match self.near_zero_pivot {
            NearZeroPivotPolicy::Fail => Err(SolverError::SingularMatrix { column, pivot }),
            NearZeroPivotPolicy::Warn => {
                log::warn!(
                    "near-zero pivot {:e} in column {}, skipping elimination",
                    pivot,
                    column
                );
                Ok(false)
            }
        }
    }
}

/// The four traced direct methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectMethod {
    /// Gaussian elimination without row exchanges
    Gauss,
    /// Gaussian elimination with partial pivoting
    #[serde(alias = "pivot")]
    GaussPivot,
    /// Doolittle LU factorization
    Lu,
    /// LU factorization with partial pivoting
    LuPivot,
}

impl DirectMethod {
    /// All methods, in presentation order.
    pub const ALL: [DirectMethod; 4] = [
        DirectMethod::Gauss,
        DirectMethod::GaussPivot,
        DirectMethod::Lu,
        DirectMethod::LuPivot,
    ];

    /// Whether the method exchanges rows.
    pub fn pivoting(self) -> bool {
        matches!(self, DirectMethod::GaussPivot | DirectMethod::LuPivot)
    }

    /// Whether the method produces L and U factors.
    pub fn is_factorization(self) -> bool {
        matches!(self, DirectMethod::Lu | DirectMethod::LuPivot)
    }
}

impl fmt::Display for DirectMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DirectMethod::Gauss => "gauss",
            DirectMethod::GaussPivot => "gauss_pivot",
            DirectMethod::Lu => "lu",
            DirectMethod::LuPivot => "lu_pivot",
        };
        f.write_str(name)
    }
}

impl FromStr for DirectMethod {
    type Err = SolverError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gauss" => Ok(DirectMethod::Gauss),
            "gauss_pivot" | "pivot" => Ok(DirectMethod::GaussPivot),
            "lu" => Ok(DirectMethod::Lu),
            "lu_pivot" => Ok(DirectMethod::LuPivot),
            other => Err(SolverError::UnknownMethod(other.to_string())),
        }
    }
}

/// L and U factors (and P) produced by [`lu_decompose`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LuFactors {
    /// Unit lower-triangular factor
    #[serde(serialize_with = "serde_arrays::matrix")]
    pub l: Array2<f64>,
    /// Upper-triangular factor
    #[serde(serialize_with = "serde_arrays::matrix")]
    pub u: Array2<f64>,
    /// Row swaps, present for the pivoted factorization only
    pub permutation: Option<PermutationRecord>,
}

impl LuFactors {
    /// Compute L·U.
    pub fn reconstruct(&self) -> Array2<f64> {
        self.l.dot(&self.u)
    }

    /// Dense P, the identity for the unpivoted factorization.
    pub fn permutation_matrix(&self) -> Array2<f64> {
        let n = self.l.nrows();
        match &self.permutation {
            Some(perm) => perm.matrix(n),
            None => Array2::<f64>::eye(n),
        }
    }

    /// Compute P·A (just A for the unpivoted factorization).
    pub fn permute(&self, a: &Array2<f64>) -> Array2<f64> {
        match &self.permutation {
            Some(perm) => perm.permute_rows(a),
            None => a.clone(),
        }
    }

    /// max |P·A - L·U|
    pub fn reconstruction_error(&self, a: &Array2<f64>) -> f64 {
        crate::arithmetic::max_abs_diff(&self.permute(a), &self.reconstruct())
    }
}

/// Result of a traced direct solve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectSolution {
    /// Method that produced this result
    pub method: DirectMethod,
    /// Solution vector x
    #[serde(serialize_with = "serde_arrays::vector")]
    pub solution: Array1<f64>,
    /// Every step, in algorithm order
    pub trace: Vec<StepRecord>,
    /// Factors, for the LU methods
    pub factors: Option<LuFactors>,
}

impl DirectSolution {
    /// Number of recorded steps
    pub fn num_steps(&self) -> usize {
        self.trace.len()
    }

    /// Whether any near-zero pivot warning was recorded.
    pub fn has_warnings(&self) -> bool {
        self.trace
            .iter()
            .any(|s| matches!(s.kind, StepKind::NearZeroPivotWarning { .. }))
    }

    /// Whether every entry of the solution is finite.
    pub fn is_finite(&self) -> bool {
        self.solution.iter().all(|v| v.is_finite())
    }
}

/// Row index of the largest |m[i][k]| for i ≥ k, and that magnitude.
pub(crate) fn select_pivot(m: &Array2<f64>, k: usize) -> (usize, f64) {
    let mut max_row = k;
    let mut max_val = m[[k, k]].abs();
    for i in (k + 1)..m.nrows() {
        let val = m[[i, k]].abs();
        if val > max_val {
            max_val = val;
            max_row = i;
        }
    }
    (max_row, max_val)
}

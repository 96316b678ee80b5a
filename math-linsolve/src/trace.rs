//! Step and iteration records produced by the solvers
//!
//! Direct methods return an ordered list of [`StepRecord`]s, iterative methods
//! a [`ConvergenceResult`] holding one [`IterationRecord`] per sweep. Both are
//! plain owned values: a solver appends to its own log while it runs and hands
//! the finished log back by value, so a trace can be inspected or serialized
//! long after the algorithm is done without aliasing its working matrices.
//!
//! # Memory
//!
//! Every direct-method step stores a full copy of the matrix (or of the L/U
//! factors) as it looked at that moment. For an n×n system this costs O(n²)
//! per step over O(n²) elimination steps. Visualization consumers replay these
//! snapshots frame by frame, so they are kept in full; the solvers are meant
//! for systems of at most a few hundred unknowns.

use ndarray::{Array1, Array2};
use serde::Serialize;
use std::fmt;

/// What happened at one step of a direct method.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepKind {
    /// Initial augmented matrix or factor state.
    Init,
    /// Partial pivoting exchanged two rows.
    PivotSwap {
        /// The exchanged rows `(k, max_row)`
        rows: (usize, usize),
        /// Magnitude of the selected pivot
        pivot: f64,
    },
    /// `factor * row[pivot_row]` was subtracted from `row[target_row]`.
    Elimination {
        /// Row holding the pivot
        pivot_row: usize,
        /// Row being reduced
        target_row: usize,
        /// Multiplier applied
        factor: f64,
    },
    /// The pivot in `row` fell below the pivot tolerance and was skipped.
    NearZeroPivotWarning {
        /// Pivot row/column index
        row: usize,
        /// Pivot value encountered
        pivot: f64,
    },
    /// Forward elimination finished; the matrix is upper triangular.
    ForwardComplete,
    /// Unknown `index` was recovered by back substitution.
    BackSubstitution {
        /// Index of the unknown just solved
        index: usize,
        /// Solution vector so far (unsolved entries are zero)
        #[serde(serialize_with = "serde_arrays::vector")]
        partial_solution: Array1<f64>,
    },
    /// Row `index` of U and column `index` of L are final.
    DecompositionRow {
        /// Row/column index
        index: usize,
    },
    /// L·y = P·b was solved.
    ForwardSubstitution {
        /// Intermediate vector y
        #[serde(serialize_with = "serde_arrays::vector")]
        y: Array1<f64>,
    },
    /// U·x = y was solved.
    BackwardSubstitution {
        /// Solution vector x
        #[serde(serialize_with = "serde_arrays::vector")]
        solution: Array1<f64>,
    },
    /// The method finished.
    Complete {
        /// Final solution vector
        #[serde(serialize_with = "serde_arrays::vector")]
        solution: Array1<f64>,
    },
}

impl StepKind {
    /// Short machine-friendly tag, matching the serialized `type` field.
    pub fn tag(&self) -> &'static str {
        match self {
            StepKind::Init => "init",
            StepKind::PivotSwap { .. } => "pivot_swap",
            StepKind::Elimination { .. } => "elimination",
            StepKind::NearZeroPivotWarning { .. } => "near_zero_pivot_warning",
            StepKind::ForwardComplete => "forward_complete",
            StepKind::BackSubstitution { .. } => "back_substitution",
            StepKind::DecompositionRow { .. } => "decomposition_row",
            StepKind::ForwardSubstitution { .. } => "forward_substitution",
            StepKind::BackwardSubstitution { .. } => "backward_substitution",
            StepKind::Complete { .. } => "complete",
        }
    }
}

// Row and column numbers are shown 1-based, as on a blackboard.
impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepKind::Init => write!(f, "initial state"),
            StepKind::PivotSwap { rows, pivot } => write!(
                f,
                "partial pivoting: swap row {} with row {} (pivot = {:.4})",
                rows.0 + 1,
                rows.1 + 1,
                pivot
            ),
            StepKind::Elimination {
                pivot_row,
                target_row,
                factor,
            } => write!(
                f,
                "eliminate column {} from row {}, factor = {:.4}",
                pivot_row + 1,
                target_row + 1,
                factor
            ),
            StepKind::NearZeroPivotWarning { row, pivot } => write!(
                f,
                "warning: pivot in row {} column {} is close to zero ({:e})",
                row + 1,
                row + 1,
                pivot
            ),
            StepKind::ForwardComplete => {
                write!(f, "forward elimination complete, matrix is upper triangular")
            }
            StepKind::BackSubstitution {
                index,
                partial_solution,
            } => write!(
                f,
                "back substitution: x{} = {:.6}",
                index + 1,
                partial_solution[*index]
            ),
            StepKind::DecompositionRow { index } => write!(
                f,
                "row {} of U and column {} of L computed",
                index + 1,
                index + 1
            ),
            StepKind::ForwardSubstitution { .. } => write!(f, "solved L·y = P·b"),
            StepKind::BackwardSubstitution { .. } => write!(f, "solved U·x = y"),
            StepKind::Complete { .. } => write!(f, "solution complete"),
        }
    }
}

/// State of the working matrices when a step was recorded.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Snapshot {
    /// Gaussian elimination: the n×(n+1) augmented matrix.
    Augmented {
        /// Augmented matrix rows
        #[serde(serialize_with = "serde_arrays::matrix")]
        matrix: Array2<f64>,
    },
    /// LU factorization: current L and U, and P for the pivoted variant.
    Factors {
        /// Unit lower-triangular factor
        #[serde(serialize_with = "serde_arrays::matrix")]
        l: Array2<f64>,
        /// Upper-triangular factor
        #[serde(serialize_with = "serde_arrays::matrix")]
        u: Array2<f64>,
        /// Permutation matrix (pivoted factorization only)
        #[serde(serialize_with = "serde_arrays::optional_matrix")]
        p: Option<Array2<f64>>,
    },
}

/// One entry of a direct-method trace.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepRecord {
    /// Position in the trace, starting at 0
    pub step: usize,
    /// What happened
    #[serde(flatten)]
    pub kind: StepKind,
    /// Matrix state after the step
    pub snapshot: Snapshot,
}

impl StepRecord {
    /// Human-readable description of the step.
    pub fn description(&self) -> String {
        self.kind.to_string()
    }
}

/// Append-only step log owned by a running direct solver.
#[derive(Debug, Default)]
pub(crate) struct StepLog {
    steps: Vec<StepRecord>,
}

impl StepLog {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, kind: StepKind, snapshot: Snapshot) {
        let step = self.steps.len();
        log::debug!("step {}: {}", step, kind);
        self.steps.push(StepRecord {
            step,
            kind,
            snapshot,
        });
    }

    pub(crate) fn into_steps(self) -> Vec<StepRecord> {
        self.steps
    }
}

/// Row swaps performed by partial pivoting, in order.
///
/// Composing the swaps gives the permutation P with P·A = L·U.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PermutationRecord {
    swaps: Vec<(usize, usize)>,
}

impl PermutationRecord {
    /// Empty record (identity permutation)
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that rows `i` and `j` were exchanged.
    pub fn push(&mut self, i: usize, j: usize) {
        self.swaps.push((i, j));
    }

    /// The recorded swaps in order.
    pub fn swaps(&self) -> &[(usize, usize)] {
        &self.swaps
    }

    /// Number of recorded swaps
    pub fn len(&self) -> usize {
        self.swaps.len()
    }

    /// Whether no swap was recorded
    pub fn is_empty(&self) -> bool {
        self.swaps.is_empty()
    }

    /// `order[k]` is the original row that ended up in position k.
    pub fn row_order(&self, n: usize) -> Vec<usize> {
        let mut order: Vec<usize> = (0..n).collect();
        for &(i, j) in &self.swaps {
            order.swap(i, j);
        }
        order
    }

    /// Dense permutation matrix P.
    pub fn matrix(&self, n: usize) -> Array2<f64> {
        let mut p = Array2::<f64>::zeros((n, n));
        for (k, &row) in self.row_order(n).iter().enumerate() {
            p[[k, row]] = 1.0;
        }
        p
    }

    /// Compute P·b.
    pub fn apply(&self, b: &Array1<f64>) -> Array1<f64> {
        self.row_order(b.len()).iter().map(|&row| b[row]).collect()
    }

    /// Compute P·A.
    pub fn permute_rows(&self, a: &Array2<f64>) -> Array2<f64> {
        let order = self.row_order(a.nrows());
        let mut out = Array2::<f64>::zeros(a.dim());
        for (k, &row) in order.iter().enumerate() {
            out.row_mut(k).assign(&a.row(row));
        }
        out
    }
}

/// One sweep of an iterative method.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IterationRecord {
    /// Sweep number, starting at 1
    pub iteration: usize,
    /// Iterate after the sweep
    #[serde(serialize_with = "serde_arrays::vector")]
    pub x: Array1<f64>,
    /// ||x_new - x_old|| for stationary methods, ||b - A·x|| for CG
    pub residual: f64,
    /// ||x||
    pub x_norm: f64,
    /// ||x - exact|| when a reference solution was supplied
    pub exact_error: Option<f64>,
}

/// Outcome of an iterative solve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConvergenceResult {
    /// Last iterate
    #[serde(serialize_with = "serde_arrays::vector")]
    pub solution: Array1<f64>,
    /// One record per sweep
    pub history: Vec<IterationRecord>,
    /// Number of sweeps performed
    pub iterations: usize,
    /// Whether the residual dropped below the tolerance
    pub converged: bool,
}

impl ConvergenceResult {
    /// Residual of every sweep, in order.
    pub fn residuals(&self) -> Vec<f64> {
        self.history.iter().map(|r| r.residual).collect()
    }

    /// Residual of the last sweep, if any sweep ran.
    pub fn final_residual(&self) -> Option<f64> {
        self.history.last().map(|r| r.residual)
    }

    /// Distance to the reference solution after the last sweep.
    pub fn final_exact_error(&self) -> Option<f64> {
        self.history.last().and_then(|r| r.exact_error)
    }
}

/// Serialize ndarray values as plain nested JSON arrays.
pub(crate) mod serde_arrays {
    use ndarray::{Array1, Array2};
    use serde::{Serialize, Serializer};

    pub fn vector<S: Serializer>(v: &Array1<f64>, s: S) -> Result<S::Ok, S::Error> {
        s.collect_seq(v.iter())
    }

    pub fn matrix<S: Serializer>(m: &Array2<f64>, s: S) -> Result<S::Ok, S::Error> {
        s.collect_seq(m.rows().into_iter().map(|row| row.to_vec()))
    }

    pub fn optional_matrix<S: Serializer>(
        m: &Option<Array2<f64>>,
        s: S,
    ) -> Result<S::Ok, S::Error> {
        match m {
            Some(m) => s.serialize_some(&Rows(m)),
            None => s.serialize_none(),
        }
    }

    struct Rows<'a>(&'a Array2<f64>);

    impl Serialize for Rows<'_> {
        fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
            matrix(self.0, s)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_permutation_record() {
        let mut perm = PermutationRecord::new();
        perm.push(0, 2);
        perm.push(1, 2);

        assert_eq!(perm.len(), 2);
        assert_eq!(perm.row_order(3), vec![2, 0, 1]);

        let b = array![10.0, 20.0, 30.0];
        assert_eq!(perm.apply(&b), array![30.0, 10.0, 20.0]);

        let a = array![[1.0, 0.0], [0.0, 2.0], [3.0, 3.0]];
        let pa = perm.permute_rows(&a);
        assert_eq!(pa.row(0).to_vec(), vec![3.0, 3.0]);

        let p = perm.matrix(3);
        assert_eq!(p.dot(&b), perm.apply(&b));
    }

    #[test]
    fn test_step_log_numbers_steps() {
        let mut log = StepLog::new();
        let snap = Snapshot::Augmented {
            matrix: array![[1.0, 2.0]],
        };
        log.record(StepKind::Init, snap.clone());
        log.record(StepKind::ForwardComplete, snap);

        let steps = log.into_steps();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[1].step, 1);
        assert_eq!(steps[1].kind.tag(), "forward_complete");
    }

    #[test]
    fn test_descriptions_are_one_based() {
        let kind = StepKind::PivotSwap {
            rows: (0, 3),
            pivot: 5.0,
        };
        assert_eq!(
            kind.to_string(),
            "partial pivoting: swap row 1 with row 4 (pivot = 5.0000)"
        );
    }

    #[test]
    fn test_step_serializes_flat() {
        let record = StepRecord {
            step: 3,
            kind: StepKind::Elimination {
                pivot_row: 0,
                target_row: 1,
                factor: 0.5,
            },
            snapshot: Snapshot::Augmented {
                matrix: array![[2.0, 1.0, 3.0], [0.0, 1.0, 1.0]],
            },
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "elimination");
        assert_eq!(json["step"], 3);
        assert_eq!(json["factor"], 0.5);
        assert_eq!(json["snapshot"]["kind"], "augmented");
        assert_eq!(json["snapshot"]["matrix"][0][2], 3.0);
    }

    #[test]
    fn test_convergence_result_accessors() {
        let rec = |i: usize, r: f64| IterationRecord {
            iteration: i,
            x: array![0.0],
            residual: r,
            x_norm: 0.0,
            exact_error: Some(r * 2.0),
        };
        let result = ConvergenceResult {
            solution: array![0.0],
            history: vec![rec(1, 1.0), rec(2, 0.1)],
            iterations: 2,
            converged: true,
        };
        assert_eq!(result.residuals(), vec![1.0, 0.1]);
        assert_eq!(result.final_residual(), Some(0.1));
        assert_eq!(result.final_exact_error(), Some(0.2));
    }
}

//! LU decomposition solvers
//!
//! Two flavours live here:
//! - [`lu_decompose`] builds explicit L and U matrices (Doolittle, or with
//!   partial pivoting) and records a snapshot after every row/column, for
//!   teaching and visualization.
//! - [`lu_factorize`] / [`lu_solve`] compute the compact in-place factorization
//!   with partial pivoting and no trace, for callers that just need x.

use super::{DirectConfig, DirectMethod, DirectSolution, LuFactors, select_pivot};
use crate::arithmetic::{check_len, check_square, check_system, swap_rows};
use crate::error::{Result, SolverError};
use crate::trace::{PermutationRecord, Snapshot, StepKind, StepLog};
use ndarray::{Array1, Array2};

/// Below this the compact factorization declares the matrix singular.
const SINGULAR_THRESHOLD: f64 = 1e-30;

/// LU factorization result
///
/// Stores L and U factors along with pivot information
#[derive(Debug, Clone)]
pub struct LuFactorization {
    /// Combined L and U matrices (L is unit lower triangular, stored below diagonal)
    pub lu: Array2<f64>,
    /// Pivot indices
    pub pivots: Vec<usize>,
    /// Matrix dimension
    pub n: usize,
}

impl LuFactorization {
    /// Solve Ax = b using the pre-computed LU factorization
    pub fn solve(&self, b: &Array1<f64>) -> Result<Array1<f64>> {
        check_len(b, self.n)?;

        // pivots[i] is the original row now in position i
        let mut x: Array1<f64> = self.pivots.iter().map(|&row| b[row]).collect();

        // Forward substitution: Ly = Pb
        for i in 0..self.n {
            for j in 0..i {
                let l_ij = self.lu[[i, j]];
                x[i] = x[i] - l_ij * x[j];
            }
        }

        // Backward substitution: Ux = y
        for i in (0..self.n).rev() {
            for j in (i + 1)..self.n {
                let u_ij = self.lu[[i, j]];
                x[i] = x[i] - u_ij * x[j];
            }
            let u_ii = self.lu[[i, i]];
            if u_ii.abs() < SINGULAR_THRESHOLD {
                return Err(SolverError::SingularMatrix {
                    column: i,
                    pivot: u_ii,
                });
            }
            x[i] /= u_ii;
        }

        Ok(x)
    }

    /// Split the compact storage into explicit factors.
    pub fn factors(&self) -> LuFactors {
        let mut l = Array2::<f64>::eye(self.n);
        let mut u = Array2::<f64>::zeros((self.n, self.n));
        for i in 0..self.n {
            for j in 0..self.n {
                if j < i {
                    l[[i, j]] = self.lu[[i, j]];
                } else {
                    u[[i, j]] = self.lu[[i, j]];
                }
            }
        }

        // express the pivot vector as the swaps that produce it
        let mut order: Vec<usize> = (0..self.n).collect();
        let mut permutation = PermutationRecord::new();
        for k in 0..self.n {
            if order[k] != self.pivots[k] {
                let pos = (k + 1..self.n)
                    .find(|&i| order[i] == self.pivots[k])
                    .unwrap_or(k);
                order.swap(k, pos);
                permutation.push(k, pos);
            }
        }

        LuFactors {
            l,
            u,
            permutation: Some(permutation),
        }
    }
}

/// Compute LU factorization with partial pivoting, without a trace
pub fn lu_factorize(a: &Array2<f64>) -> Result<LuFactorization> {
    let n = check_square(a)?;

    let mut lu = a.clone();
    let mut pivots: Vec<usize> = (0..n).collect();

    for k in 0..n {
        // Find pivot
        let (max_row, max_val) = select_pivot(&lu, k);

        // Check for singularity
        if max_val < SINGULAR_THRESHOLD {
            return Err(SolverError::SingularMatrix {
                column: k,
                pivot: lu[[max_row, k]],
            });
        }

        // Swap rows if needed
        if max_row != k {
            swap_rows(&mut lu, k, max_row);
            pivots.swap(k, max_row);
        }

        // Compute multipliers and eliminate
        let pivot = lu[[k, k]];
        for i in (k + 1)..n {
            let mult = lu[[i, k]] / pivot;
            lu[[i, k]] = mult; // Store multiplier in L part

            for j in (k + 1)..n {
                let update = mult * lu[[k, j]];
                lu[[i, j]] -= update;
            }
        }
    }

    Ok(LuFactorization { lu, pivots, n })
}

/// Solve Ax = b using LU decomposition
///
/// This is a convenience function that combines factorization and solve.
/// A singular system is reported as [`SolverError::SingularMatrix`]; callers
/// wanting a least-squares answer in that case must provide their own fallback.
pub fn lu_solve(a: &Array2<f64>, b: &Array1<f64>) -> Result<Array1<f64>> {
    check_system(a, b)?;
    let factorization = lu_factorize(a)?;
    factorization.solve(b)
}

/// Factor A and solve Ax = b, recording L and U after every stage.
///
/// Without `pivoting` this is Doolittle's method: row i of U, then column i
/// of L, one `DecompositionRow` step per i. With `pivoting`, column k is
/// eliminated Gauss-style after swapping the largest |U[r][k]| (r ≥ k) into
/// place; the swap is applied to U, to the already-computed columns of L and
/// to the permutation, so that P·A = L·U holds at the end.
///
/// The factorization is followed by a `ForwardSubstitution` (L·y = P·b), a
/// `BackwardSubstitution` (U·x = y) and a `Complete` step.
pub fn lu_decompose(
    a: &Array2<f64>,
    b: &Array1<f64>,
    pivoting: bool,
    config: &DirectConfig,
) -> Result<DirectSolution> {
    let n = check_system(a, b)?;
    let mut log = StepLog::new();

    let (l, u, permutation) = if pivoting {
        let (l, u, perm) = factor_pivoted(a, n, config, &mut log)?;
        (l, u, Some(perm))
    } else {
        let (l, u) = factor_doolittle(a, n, config, &mut log)?;
        (l, u, None)
    };

    let p = permutation.as_ref().map(|perm| perm.matrix(n));
    let snapshot = || Snapshot::Factors {
        l: l.clone(),
        u: u.clone(),
        p: p.clone(),
    };

    let pb = match &permutation {
        Some(perm) => perm.apply(b),
        None => b.clone(),
    };

    let y = forward_substitution(&l, &pb);
    log.record(StepKind::ForwardSubstitution { y: y.clone() }, snapshot());

    let x = backward_substitution(&u, &y);
    log.record(
        StepKind::BackwardSubstitution {
            solution: x.clone(),
        },
        snapshot(),
    );
    log.record(
        StepKind::Complete {
            solution: x.clone(),
        },
        snapshot(),
    );

    let method = if pivoting {
        DirectMethod::LuPivot
    } else {
        DirectMethod::Lu
    };
    log::debug!("{}: solved {}x{} system", method, n, n);

    Ok(DirectSolution {
        method,
        solution: x,
        trace: log.into_steps(),
        factors: Some(LuFactors { l, u, permutation }),
    })
}

fn factor_doolittle(
    a: &Array2<f64>,
    n: usize,
    config: &DirectConfig,
    log: &mut StepLog,
) -> Result<(Array2<f64>, Array2<f64>)> {
    let mut l = Array2::<f64>::eye(n);
    let mut u = Array2::<f64>::zeros((n, n));

    log.record(
        StepKind::Init,
        Snapshot::Factors {
            l: l.clone(),
            u: u.clone(),
            p: None,
        },
    );

    for i in 0..n {
        // row i of U
        for j in i..n {
            let sum: f64 = (0..i).map(|k| l[[i, k]] * u[[k, j]]).sum();
            u[[i, j]] = a[[i, j]] - sum;
        }

        let pivot = u[[i, i]];
        if !config.accept_pivot(i, pivot)? {
            log.record(
                StepKind::NearZeroPivotWarning { row: i, pivot },
                Snapshot::Factors {
                    l: l.clone(),
                    u: u.clone(),
                    p: None,
                },
            );
        }

        // column i of L
        for j in (i + 1)..n {
            let sum: f64 = (0..i).map(|k| l[[j, k]] * u[[k, i]]).sum();
            l[[j, i]] = (a[[j, i]] - sum) / pivot;
        }

        log.record(
            StepKind::DecompositionRow { index: i },
            Snapshot::Factors {
                l: l.clone(),
                u: u.clone(),
                p: None,
            },
        );
    }

    Ok((l, u))
}

fn factor_pivoted(
    a: &Array2<f64>,
    n: usize,
    config: &DirectConfig,
    log: &mut StepLog,
) -> Result<(Array2<f64>, Array2<f64>, PermutationRecord)> {
    let mut l = Array2::<f64>::eye(n);
    let mut u = a.clone();
    let mut perm = PermutationRecord::new();

    let snapshot = |l: &Array2<f64>, u: &Array2<f64>, perm: &PermutationRecord| {
        Snapshot::Factors {
            l: l.clone(),
            u: u.clone(),
            p: Some(perm.matrix(n)),
        }
    };

    log.record(StepKind::Init, snapshot(&l, &u, &perm));

    for k in 0..n {
        let (max_row, max_val) = select_pivot(&u, k);
        if max_row != k {
            swap_rows(&mut u, k, max_row);
            // only the first k columns of L are filled in so far
            for j in 0..k {
                l.swap([k, j], [max_row, j]);
            }
            perm.push(k, max_row);
            log.record(
                StepKind::PivotSwap {
                    rows: (k, max_row),
                    pivot: max_val,
                },
                snapshot(&l, &u, &perm),
            );
        }

        let pivot = u[[k, k]];
        if !config.accept_pivot(k, pivot)? {
            log.record(
                StepKind::NearZeroPivotWarning { row: k, pivot },
                snapshot(&l, &u, &perm),
            );
            log.record(
                StepKind::DecompositionRow { index: k },
                snapshot(&l, &u, &perm),
            );
            continue;
        }

        for i in (k + 1)..n {
            let mult = u[[i, k]] / pivot;
            l[[i, k]] = mult;
            u[[i, k]] = 0.0;
            for j in (k + 1)..n {
                let update = mult * u[[k, j]];
                u[[i, j]] -= update;
            }
        }

        log.record(
            StepKind::DecompositionRow { index: k },
            snapshot(&l, &u, &perm),
        );
    }

    Ok((l, u, perm))
}

/// Solve L·y = b for unit lower-triangular L.
fn forward_substitution(l: &Array2<f64>, b: &Array1<f64>) -> Array1<f64> {
    let n = b.len();
    let mut y = Array1::<f64>::zeros(n);
    for i in 0..n {
        let sum: f64 = (0..i).map(|j| l[[i, j]] * y[j]).sum();
        y[i] = b[i] - sum;
    }
    y
}

/// Solve U·x = y for upper-triangular U.
fn backward_substitution(u: &Array2<f64>, y: &Array1<f64>) -> Array1<f64> {
    let n = y.len();
    let mut x = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        let sum: f64 = ((i + 1)..n).map(|j| u[[i, j]] * x[j]).sum();
        x[i] = (y[i] - sum) / u[[i, i]];
    }
    x
}

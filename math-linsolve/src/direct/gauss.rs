//! Gaussian elimination on the augmented matrix [A | b]

use super::{DirectConfig, DirectMethod, DirectSolution, select_pivot};
use crate::arithmetic::{augment, check_system, swap_rows};
use crate::error::Result;
use crate::trace::{Snapshot, StepKind, StepLog};
use ndarray::{Array1, Array2};

fn snapshot(augmented: &Array2<f64>) -> Snapshot {
    Snapshot::Augmented {
        matrix: augmented.clone(),
    }
}

/// Solve Ax = b by Gaussian elimination, recording every row operation.
///
/// With `pivoting`, the row holding the largest |a_ik| (i ≥ k) is swapped into
/// the pivot position before column k is eliminated. Without it, a pivot below
/// `config.pivot_tolerance` is handled according to
/// [`NearZeroPivotPolicy`](super::NearZeroPivotPolicy).
///
/// The trace is `Init`, then `PivotSwap` / `Elimination` /
/// `NearZeroPivotWarning` steps, `ForwardComplete`, one `BackSubstitution`
/// per unknown (last unknown first) and finally `Complete`.
pub fn gauss_eliminate(
    a: &Array2<f64>,
    b: &Array1<f64>,
    pivoting: bool,
    config: &DirectConfig,
) -> Result<DirectSolution> {
    let n = check_system(a, b)?;
    let mut augmented = augment(a, b);
    let mut log = StepLog::new();

    log.record(StepKind::Init, snapshot(&augmented));

    for k in 0..n {
        if pivoting {
            let (max_row, max_val) = select_pivot(&augmented, k);
            if max_row != k {
                swap_rows(&mut augmented, k, max_row);
                log.record(
                    StepKind::PivotSwap {
                        rows: (k, max_row),
                        pivot: max_val,
                    },
                    snapshot(&augmented),
                );
            }
        }

        let pivot = augmented[[k, k]];
        if !config.accept_pivot(k, pivot)? {
            log.record(
                StepKind::NearZeroPivotWarning { row: k, pivot },
                snapshot(&augmented),
            );
            continue;
        }

        for i in (k + 1)..n {
            // exact zeros need no row operation
            if augmented[[i, k]] == 0.0 {
                continue;
            }
            let factor = augmented[[i, k]] / pivot;
            // columns k..=n, the right-hand side included
            for j in k..=n {
                let update = factor * augmented[[k, j]];
                augmented[[i, j]] -= update;
            }
            log.record(
                StepKind::Elimination {
                    pivot_row: k,
                    target_row: i,
                    factor,
                },
                snapshot(&augmented),
            );
        }
    }

    log.record(StepKind::ForwardComplete, snapshot(&augmented));

    let mut x = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        let mut sum = augmented[[i, n]];
        for j in (i + 1)..n {
            sum -= augmented[[i, j]] * x[j];
        }
        x[i] = sum / augmented[[i, i]];
        log.record(
            StepKind::BackSubstitution {
                index: i,
                partial_solution: x.clone(),
            },
            snapshot(&augmented),
        );
    }

    log.record(
        StepKind::Complete {
            solution: x.clone(),
        },
        snapshot(&augmented),
    );

    let method = if pivoting {
        DirectMethod::GaussPivot
    } else {
        DirectMethod::Gauss
    };
    log::debug!("{}: solved {}x{} system", method, n, n);

    Ok(DirectSolution {
        method,
        solution: x,
        trace: log.into_steps(),
        factors: None,
    })
}

//! Dense linear solvers that record what they do
//!
//! This crate solves small dense systems A·x = b and returns, next to the
//! answer, a trace of every step so the process can be replayed or plotted.
//!
//! # Features
//!
//! - **Direct Solvers**: Gaussian elimination and LU factorization, naive or
//!   with partial pivoting, each producing a step-by-step trace with matrix
//!   snapshots
//! - **Iterative Solvers**: Jacobi, Gauss-Seidel, SOR and Conjugate Gradient,
//!   each producing a per-iteration history
//! - **SOR tuning**: grid search for the relaxation factor
//! - **JSON problem files**: load a system and a solver choice, run it,
//!   serialize the result
//!
//! # Example
//!
//! ```
//! use math_linsolve::{DirectMethod, solve_direct};
//! use ndarray::array;
//!
//! let a = array![[2.0, 1.0], [1.0, 3.0]];
//! let b = array![3.0, 5.0];
//!
//! let result = solve_direct(DirectMethod::GaussPivot, &a, &b).unwrap();
//! assert!((result.solution[0] - 0.8).abs() < 1e-12);
//! for step in &result.trace {
//!     println!("{}", step.description());
//! }
//! ```

pub mod analysis;
pub mod arithmetic;
pub mod config;
pub mod direct;
pub mod error;
pub mod iterative;
pub mod solve;
pub mod testdata;
pub mod trace;
pub mod traits;

// Re-export main types
pub use error::{Result, SolverError};
pub use traits::LinearOperator;
pub use trace::{
    ConvergenceResult, IterationRecord, PermutationRecord, Snapshot, StepKind, StepRecord,
};

// Re-export direct solvers
pub use direct::{
    DirectConfig, DirectMethod, DirectSolution, LuFactorization, LuFactors, NearZeroPivotPolicy,
    gauss_eliminate, lu_decompose, lu_solve,
};

// Re-export iterative solvers
pub use iterative::{
    CgConfig, IterativeConfig, MethodComparison, OmegaSweep, OmegaTrial, StationaryMethod, cg,
    compare_methods, find_optimal_omega, gauss_seidel, jacobi, sor, sweep_omega,
};

// Entry points
pub use config::{ProblemConfig, SolveOutput, SolverSpec};
pub use solve::{solve_cg, solve_direct, solve_direct_with, solve_iterative};

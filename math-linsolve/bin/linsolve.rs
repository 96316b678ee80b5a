//! Run a traced linear solve and print the result as JSON
//!
//! Usage:
//!     linsolve problem.json
//!     linsolve --demo sor --output sor.json
//!     linsolve --demo cg --size 200

use anyhow::Context;
use clap::{Parser, ValueEnum};
use math_linsolve::analysis::check_cg_against_direct;
use math_linsolve::testdata;
use math_linsolve::{
    CgConfig, DirectConfig, DirectMethod, IterativeConfig, ProblemConfig, SolveOutput, SolverSpec,
};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "linsolve",
    about = "Solve a dense linear system and dump every step as JSON"
)]
struct Cli {
    /// JSON problem file (matrix, rhs, solver, ...)
    #[arg(required_unless_present = "demo")]
    problem: Option<PathBuf>,

    /// Run one of the built-in textbook systems instead of a file
    #[arg(long, value_enum, conflicts_with = "problem")]
    demo: Option<Demo>,

    /// System size for the CG demo
    #[arg(long, default_value_t = 100)]
    size: usize,

    /// Write the JSON here instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Emit compact JSON
    #[arg(long)]
    compact: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Demo {
    /// Naive Gaussian elimination on the 4x4 elimination system
    Elimination,
    /// LU with partial pivoting on a system with a zero leading pivot
    Pivot,
    /// Omega sweep on the 4x4 relaxation system
    Sor,
    /// Conjugate Gradient on the 1-D Laplacian, checked against LU
    Cg,
}

fn demo_problem(demo: Demo, size: usize) -> ProblemConfig {
    let rows = |a: ndarray::Array2<f64>| a.outer_iter().map(|r| r.to_vec()).collect::<Vec<_>>();
    let (matrix, rhs, exact, solver) = match demo {
        Demo::Elimination => {
            let (a, b) = testdata::elimination_system();
            (
                rows(a),
                b.to_vec(),
                Some(testdata::elimination_solution().to_vec()),
                SolverSpec::Direct {
                    method: DirectMethod::Gauss,
                },
            )
        }
        Demo::Pivot => {
            let (a, b) = testdata::pivot_required_system();
            (
                rows(a),
                b.to_vec(),
                None,
                SolverSpec::Direct {
                    method: DirectMethod::LuPivot,
                },
            )
        }
        Demo::Sor => {
            let (a, b, exact) = testdata::sor_system();
            (
                rows(a),
                b.to_vec(),
                Some(exact.to_vec()),
                SolverSpec::OmegaSweep { omegas: None },
            )
        }
        Demo::Cg => (
            rows(testdata::laplacian_1d(size)),
            testdata::ramp(size).to_vec(),
            None,
            SolverSpec::Cg,
        ),
    };

    ProblemConfig {
        matrix,
        rhs,
        exact,
        x0: None,
        solver,
        direct: DirectConfig::default(),
        iterative: IterativeConfig::default(),
        // floating-point CG on the Laplacian can need a few more than n iterations
        cg: CgConfig {
            max_iterations: Some(2 * size),
            ..Default::default()
        },
    }
}

fn summarize(output: &SolveOutput) {
    match output {
        SolveOutput::Direct(result) => log::info!(
            "{}: {} steps, solution {:?}",
            result.method,
            result.num_steps(),
            result.solution.to_vec()
        ),
        SolveOutput::Iterative(result) => log::info!(
            "{} iterations, converged: {}, final residual {:?}",
            result.iterations,
            result.converged,
            result.final_residual()
        ),
        SolveOutput::OmegaSweep(sweep) => log::info!(
            "best omega {:.2} ({} iterations)",
            sweep.best_omega,
            sweep.best_iterations
        ),
    }
}

fn to_json<T: Serialize>(value: &T, compact: bool) -> serde_json::Result<String> {
    if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    }
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    env_logger::init();

    let args = Cli::parse();

    if args.size == 0 {
        anyhow::bail!("--size must be at least 1");
    }

    let problem = match (&args.problem, args.demo) {
        (_, Some(demo)) => demo_problem(demo, args.size),
        (Some(path), None) => ProblemConfig::from_file(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        (None, None) => anyhow::bail!("either a problem file or --demo is required"),
    };

    let json = if matches!(args.demo, Some(Demo::Cg)) {
        let a = problem.matrix()?;
        let check =
            check_cg_against_direct(&a, &problem.rhs(), &problem.cg).context("solver failed")?;
        log::info!(
            "n = {}: {} CG iterations, relative error {:.3e}, speedup over LU {:.2}x",
            args.size,
            check.cg.iterations,
            check.relative_error,
            check.speedup()
        );
        to_json(&check, args.compact)?
    } else {
        let output = problem.run().context("solver failed")?;
        summarize(&output);
        to_json(&output, args.compact)?
    };

    match &args.output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?
        }
        None => println!("{}", json),
    }

    Ok(())
}

//! Integration tests for JSON problem files

use math_linsolve::testdata;
use math_linsolve::{
    CgConfig, DirectConfig, DirectMethod, IterativeConfig, ProblemConfig, SolveOutput, SolverSpec,
};
use std::fs;

fn sor_problem() -> ProblemConfig {
    let (a, b, exact) = testdata::sor_system();
    ProblemConfig {
        matrix: a.outer_iter().map(|row| row.to_vec()).collect(),
        rhs: b.to_vec(),
        exact: Some(exact.to_vec()),
        x0: None,
        solver: SolverSpec::Iterative {
            method: "sor".to_string(),
            omega: Some(1.25),
        },
        direct: DirectConfig::default(),
        iterative: IterativeConfig::default(),
        cg: CgConfig::default(),
    }
}

#[test]
fn test_problem_file_round_trip() {
    let path = std::env::temp_dir().join(format!("linsolve_problem_{}.json", std::process::id()));
    let problem = sor_problem();
    problem.to_file(&path).unwrap();

    let loaded = ProblemConfig::from_file(&path).unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(loaded.matrix, problem.matrix);
    assert_eq!(loaded.solver, problem.solver);
    match loaded.run().unwrap() {
        SolveOutput::Iterative(result) => {
            assert!(result.converged);
            assert_eq!(result.iterations, 13);
        }
        other => panic!("unexpected output {:?}", other),
    }
}

#[test]
fn test_missing_file_is_io_error() {
    let err = ProblemConfig::from_file("/nonexistent/linsolve/problem.json").unwrap_err();
    assert!(err.is_config_error());
}

#[test]
fn test_direct_problem_output_json() {
    let json = r#"{
        "matrix": [[0.0, 1.0, 1.0], [1.0, 0.0, 1.0], [1.0, 1.0, 0.0]],
        "rhs": [2.0, 2.0, 2.0],
        "solver": { "type": "direct", "method": "gauss_pivot" }
    }"#;
    let problem = ProblemConfig::from_json_str(json).unwrap();
    assert_eq!(
        problem.solver,
        SolverSpec::Direct {
            method: DirectMethod::GaussPivot
        }
    );

    let output = problem.run().unwrap();
    let value = serde_json::to_value(&output).unwrap();
    assert_eq!(value["kind"], "direct");
    let trace = value["result"]["trace"].as_array().unwrap();
    assert_eq!(trace[0]["type"], "init");
    assert_eq!(trace[1]["type"], "pivot_swap");
    assert_eq!(trace.last().unwrap()["type"], "complete");
    assert_eq!(trace[0]["snapshot"]["matrix"].as_array().unwrap().len(), 3);
}

#[test]
fn test_naive_direct_problem_fails_on_zero_pivot() {
    let json = r#"{
        "matrix": [[0.0, 1.0], [1.0, 1.0]],
        "rhs": [1.0, 2.0],
        "solver": { "type": "direct", "method": "gauss" }
    }"#;
    let err = ProblemConfig::from_json_str(json).unwrap().run().unwrap_err();
    assert!(err.is_numerical_error());
}

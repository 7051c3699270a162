use std::path::Path;

use sefplex_solver::{LpProblem, SolverError, StandardForm, parse_constraint_types};
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Error reading file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] SolverError),
}

/// On-disk program: `{"c": [...], "z": 0, "A": [[...]], "b": [...]}`, with
/// optional `"constraint_types"` (`"<="`, `"="`, `">="`) per row. Without
/// them every row is an equality.
#[derive(Debug, Deserialize)]
struct ProgramFile {
    c: Vec<f64>,
    #[serde(default)]
    z: f64,
    #[serde(rename = "A")]
    a: Vec<Vec<f64>>,
    b: Vec<f64>,
    #[serde(default)]
    constraint_types: Option<Vec<String>>,
}

/// A program ready for the solver, plus the number of user variables
/// (the SEF form may carry extra slack columns after them).
#[derive(Debug)]
pub struct LoadedProgram {
    pub lp: StandardForm,
    /// The mixed-relation program `lp` was converted from, if any
    pub problem: Option<LpProblem>,
    pub num_variables: usize,
}

pub fn load(path: &Path) -> Result<LoadedProgram, LoadError> {
    let source = std::fs::read_to_string(path)?;
    parse(&source)
}

pub fn parse(source: &str) -> Result<LoadedProgram, LoadError> {
    let file: ProgramFile = serde_json::from_str(source)?;
    let num_variables = file.c.len();

    let (lp, problem) = match file.constraint_types {
        None => (StandardForm::new(file.a, file.b, file.c, file.z)?, None),
        Some(tokens) => {
            let ops = parse_constraint_types(&tokens)?;
            if ops.len() != file.a.len() || file.b.len() != file.a.len() {
                return Err(LoadError::Invalid(SolverError::InvalidInput(format!(
                    "A has {} rows, b has {} entries and {} constraint types were given",
                    file.a.len(),
                    file.b.len(),
                    ops.len()
                ))));
            }
            let mut problem = LpProblem::new(num_variables);
            problem.set_objective(file.c, file.z);
            for ((row, op), rhs) in file.a.into_iter().zip(ops).zip(file.b) {
                problem.add_constraint(row, op, rhs);
            }
            (problem.to_equality_form()?, Some(problem))
        }
    };

    Ok(LoadedProgram {
        lp,
        problem,
        num_variables,
    })
}

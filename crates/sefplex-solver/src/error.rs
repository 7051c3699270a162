use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid constraint type '{0}', expected one of '<=', '=', '>='")]
    InvalidConstraintType(String),
    #[error("Basis matrix is singular for basis {basis:?}")]
    SingularBasis { basis: Vec<usize> },
    #[error("Simplex did not terminate within {0} pivots")]
    IterationLimit(usize),
    #[error("No integral solution found after {0} cutting planes")]
    CutLimitReached(usize),
    #[error("Numerical failure: {0}")]
    NumericalFailure(String),
}

pub type Result<T> = std::result::Result<T, SolverError>;

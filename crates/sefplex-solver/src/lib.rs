mod certificate;
mod cutting_plane;
mod error;
mod linalg;
mod problem;
mod sef;
mod simplex;
mod solution;
mod tableau;
mod two_phase;

pub use certificate::{
    infeasibility_certificate, optimality_certificate, verify, verify_infeasibility, verify_optimality,
    verify_unboundedness,
};
pub use cutting_plane::{cutting_plane, solve_ip};
pub use error::{Result, SolverError};
pub use problem::{Constraint, ConstraintOp, LpProblem, Objective, StandardForm};
pub use sef::{parse_constraint_types, to_equality_form};
pub use simplex::{Simplex, SimplexResult, Solver, Step, entering_column, leaving_row, unbounded_direction};
pub use solution::{Cut, InfeasibleSolution, IpSolution, OptimalSolution, Outcome, SolutionStatus, UnboundedSolution};
pub use tableau::{CanonicalForm, canonical_form};
pub use two_phase::{AuxiliaryProgram, solve};

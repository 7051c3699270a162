use tracing::{debug, info, warn};

use crate::certificate;
use crate::error::{Result, SolverError};
use crate::problem::StandardForm;
use crate::simplex::{SimplexResult, Solver};
use crate::solution::{InfeasibleSolution, OptimalSolution, Outcome, UnboundedSolution};
use crate::tableau;

/// Phase-one program: maximize `-Σ a` subject to `A' x + a = |b|`, where
/// `A'` is `A` restricted to `rows` with each row negated when its `b` is
/// negative, and `a` is one artificial column per row.
#[derive(Debug, Clone)]
pub struct AuxiliaryProgram {
    pub lp: StandardForm,
    /// Sign each original row was multiplied by
    pub signs: Vec<f64>,
    /// Original row index of each auxiliary row
    pub rows: Vec<usize>,
    /// Number of original (non-artificial) columns
    pub num_original: usize,
}

impl AuxiliaryProgram {
    pub fn new(lp: &StandardForm, rows: &[usize]) -> Self {
        let n = lp.num_cols();
        let m = rows.len();

        let signs: Vec<f64> = rows.iter().map(|&r| if lp.b[r] < 0.0 { -1.0 } else { 1.0 }).collect();
        let a = rows
            .iter()
            .zip(&signs)
            .enumerate()
            .map(|(i, (&r, &sign))| {
                let mut row: Vec<f64> = lp.a[r].iter().map(|v| sign * v).collect();
                row.extend((0..m).map(|k| if k == i { 1.0 } else { 0.0 }));
                row
            })
            .collect();
        let b = rows.iter().zip(&signs).map(|(&r, sign)| sign * lp.b[r]).collect();
        let mut c = vec![0.0; n];
        c.extend(std::iter::repeat_n(-1.0, m));

        Self {
            lp: StandardForm { a, b, c, z: 0.0 },
            signs,
            rows: rows.to_vec(),
            num_original: n,
        }
    }

    /// The artificial columns, which are feasible since `|b| >= 0`.
    pub fn initial_basis(&self) -> Vec<usize> {
        (self.num_original..self.num_original + self.rows.len()).collect()
    }

    pub fn is_artificial(&self, column: usize) -> bool {
        column >= self.num_original
    }
}

/// Result of pushing artificial columns out of a zero-valued phase-one basis
enum Repair {
    /// A basis made only of original columns
    Basis(Vec<usize>),
    /// Auxiliary row that is a linear combination of the others
    Redundant(usize),
}

impl Solver {
    /// Solve the LP using the two-phase simplex method
    pub fn solve(&self, lp: &StandardForm) -> Result<Outcome> {
        self.two_phase(lp).map(|(outcome, _)| outcome)
    }

    /// Like [`Solver::solve`], also returning the rows kept after redundant
    /// equalities were dropped. A returned basis indexes into those rows.
    pub(crate) fn two_phase(&self, lp: &StandardForm) -> Result<(Outcome, Vec<usize>)> {
        lp.validate()?;
        let num_rows = lp.num_rows();
        let mut rows: Vec<usize> = (0..num_rows).collect();

        // Phase 1: find a feasible basis or a certificate of infeasibility
        let basis = loop {
            let aux = AuxiliaryProgram::new(lp, &rows);
            let (basis, value) = match self.simplex(&aux.lp, aux.initial_basis())? {
                SimplexResult::Optimal { basis, value, .. } => (basis, value),
                SimplexResult::Unbounded { .. } => {
                    return Err(SolverError::NumericalFailure(
                        "auxiliary program reported unbounded".into(),
                    ));
                }
            };
            info!(value, "phase one finished");

            if value < -self.tolerance() {
                let certificate = certificate::infeasibility_certificate(&aux, &basis, num_rows, self.tolerance())?;
                return Ok((Outcome::Infeasible(InfeasibleSolution { certificate }), rows));
            }

            match self.drive_out_artificials(&aux, basis)? {
                Repair::Basis(basis) => break basis,
                Repair::Redundant(row) => {
                    warn!(row = rows[row], "dropping redundant equality row");
                    rows.remove(row);
                }
            }
        };

        // Phase 2: optimize the original objective from the feasible basis
        let reduced = restrict_rows(lp, &rows);
        let outcome = match self.simplex(&reduced, basis)? {
            SimplexResult::Optimal { bfs, basis, value } => {
                let dual = certificate::optimality_certificate(&reduced, &basis, self.tolerance())?;
                Outcome::Optimal(OptimalSolution {
                    bfs,
                    basis,
                    value,
                    certificate: certificate::scatter(dual, &rows, num_rows),
                })
            }
            SimplexResult::Unbounded { x, direction } => Outcome::Unbounded(UnboundedSolution { x, direction }),
        };
        info!(status = %outcome.status(), "phase two finished");
        Ok((outcome, rows))
    }

    /// Replaces every artificial column left in an optimal, zero-valued
    /// phase-one basis by an original column with a nonzero entry in its
    /// canonical row. These pivots are degenerate, so feasibility is kept.
    fn drive_out_artificials(&self, aux: &AuxiliaryProgram, mut basis: Vec<usize>) -> Result<Repair> {
        while let Some(row) = basis.iter().position(|&j| aux.is_artificial(j)) {
            let canonical = tableau::canonical_form(&aux.lp, &basis, self.tolerance())?;
            let replacement = (0..aux.num_original)
                .find(|j| !basis.contains(j) && canonical.a[(row, *j)].abs() > self.tolerance());

            match replacement {
                Some(column) => {
                    debug!(row, leaving = basis[row], entering = column, "driving out artificial");
                    basis[row] = column;
                }
                None => {
                    // The row is zero over every original column: its
                    // multipliers combine the constraint rows to zero.
                    let redundant = canonical
                        .basis_inverse
                        .row(row)
                        .iter()
                        .enumerate()
                        .max_by(|p, q| p.1.abs().total_cmp(&q.1.abs()))
                        .map_or(row, |(i, _)| i);
                    return Ok(Repair::Redundant(redundant));
                }
            }
        }
        Ok(Repair::Basis(basis))
    }
}

pub(crate) fn restrict_rows(lp: &StandardForm, rows: &[usize]) -> StandardForm {
    StandardForm {
        a: rows.iter().map(|&r| lp.a[r].clone()).collect(),
        b: rows.iter().map(|&r| lp.b[r]).collect(),
        c: lp.c.clone(),
        z: lp.z,
    }
}

/// Two-phase simplex on `max c·x + z` subject to `A x = b`, `x >= 0`, with
/// default solver settings.
pub fn solve(a: Vec<Vec<f64>>, b: Vec<f64>, c: Vec<f64>, z: f64) -> Result<Outcome> {
    let lp = StandardForm::new(a, b, c, z)?;
    Solver::default().solve(&lp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::certificate::{verify_infeasibility, verify_optimality, verify_unboundedness};
    use crate::linalg;
    use crate::problem::{ConstraintOp, LpProblem};
    use crate::solution::SolutionStatus;

    fn optimal(outcome: Outcome) -> OptimalSolution {
        match outcome {
            Outcome::Optimal(solution) => solution,
            other => panic!("expected optimal, got {:?}", other),
        }
    }

    #[test]
    fn test_auxiliary_flips_negative_rows() {
        let lp = StandardForm::new(vec![vec![1.0, 1.0, -1.0], vec![2.0, 0.0, 1.0]], vec![-2.0, 3.0], vec![1.0, 1.0, 0.0], 0.0)
            .unwrap();
        let aux = AuxiliaryProgram::new(&lp, &[0, 1]);
        assert_eq!(aux.lp.a, vec![vec![-1.0, -1.0, 1.0, 1.0, 0.0], vec![2.0, 0.0, 1.0, 0.0, 1.0]]);
        assert_eq!(aux.lp.b, vec![2.0, 3.0]);
        assert_eq!(aux.lp.c, vec![0.0, 0.0, 0.0, -1.0, -1.0]);
        assert_eq!(aux.signs, vec![-1.0, 1.0]);
        assert_eq!(aux.initial_basis(), vec![3, 4]);
    }

    #[test]
    fn test_two_phase_fractional_optimum() {
        // max x1 + x2  s.t.  2x1 + x2 <= 4, x1 + 2x2 <= 4
        let lp = StandardForm::new(
            vec![vec![2.0, 1.0, 1.0, 0.0], vec![1.0, 2.0, 0.0, 1.0]],
            vec![4.0, 4.0],
            vec![1.0, 1.0, 0.0, 0.0],
            0.0,
        )
        .unwrap();
        let solution = optimal(Solver::new().solve(&lp).unwrap());
        assert!((solution.value - 8.0 / 3.0).abs() < 1e-9, "obj = {}", solution.value);
        assert!((solution.bfs[0] - 4.0 / 3.0).abs() < 1e-9);
        assert!((solution.bfs[1] - 4.0 / 3.0).abs() < 1e-9);
        assert_eq!(solution.basis, vec![0, 1]);
        assert!(verify_optimality(&lp, &solution, 1e-9));
    }

    #[test]
    fn test_mixed_relations_degenerate_optimum() {
        // min x1 + x2  s.t.  x1 + 2x2 >= 4,  3x1 + x2 >= 6,  x1 - x2 = 0.4
        // All three rows are tight at (1.6, 1.2).
        let mut problem = LpProblem::new(2);
        problem.set_objective(vec![-1.0, -1.0], 0.0);
        problem.add_constraint(vec![1.0, 2.0], ConstraintOp::Ge, 4.0);
        problem.add_constraint(vec![3.0, 1.0], ConstraintOp::Ge, 6.0);
        problem.add_constraint(vec![1.0, -1.0], ConstraintOp::Eq, 0.4);
        let lp = problem.to_equality_form().unwrap();
        assert_eq!(lp.num_cols(), 4);

        let solution = optimal(Solver::new().solve(&lp).unwrap());
        assert!((solution.bfs[0] - 1.6).abs() < 1e-9, "x1 = {}", solution.bfs[0]);
        assert!((solution.bfs[1] - 1.2).abs() < 1e-9, "x2 = {}", solution.bfs[1]);
        assert!((solution.value + 2.8).abs() < 1e-9, "obj = {}", solution.value);
        assert_eq!(solution.basis.len(), 3);
        assert!(verify_optimality(&lp, &solution, 1e-9));
    }

    #[test]
    fn test_objective_constant_in_certificate() {
        // max x1 + 5  s.t.  x1 + x2 = 2
        let lp = StandardForm::new(vec![vec![1.0, 1.0]], vec![2.0], vec![1.0, 0.0], 5.0).unwrap();
        let solution = optimal(Solver::new().solve(&lp).unwrap());
        assert!((solution.value - 7.0).abs() < 1e-9);
        let dual_value = linalg::dot(&solution.certificate, &lp.b) + lp.z;
        assert!((dual_value - solution.value).abs() < 1e-9);
    }

    #[test]
    fn test_infeasible() {
        // x1 + x2 = 1, x1 + x2 = -1
        let outcome = solve(vec![vec![1.0, 1.0], vec![1.0, 1.0]], vec![1.0, -1.0], vec![0.0, 0.0], 0.0).unwrap();
        assert_eq!(outcome.status(), SolutionStatus::Infeasible);

        let lp = StandardForm::new(vec![vec![1.0, 1.0], vec![1.0, 1.0]], vec![1.0, -1.0], vec![0.0, 0.0], 0.0).unwrap();
        let certificate = &outcome.as_infeasible().unwrap().certificate;
        assert!(certificate.iter().any(|y| y.abs() > 1e-9));
        assert!(verify_infeasibility(&lp, certificate, 1e-9), "certificate {:?}", certificate);
    }

    #[test]
    fn test_infeasible_bounds() {
        // x >= 5, x <= 3
        let mut problem = LpProblem::new(1);
        problem.set_objective(vec![1.0], 0.0);
        problem.add_constraint(vec![1.0], ConstraintOp::Ge, 5.0);
        problem.add_constraint(vec![1.0], ConstraintOp::Le, 3.0);
        let lp = problem.to_equality_form().unwrap();

        let outcome = Solver::new().solve(&lp).unwrap();
        let certificate = &outcome.as_infeasible().expect("infeasible").certificate;
        assert!(verify_infeasibility(&lp, certificate, 1e-9));
    }

    #[test]
    fn test_unbounded() {
        // maximize x1 subject to x1 - x2 = 0
        let lp = StandardForm::new(vec![vec![1.0, -1.0]], vec![0.0], vec![1.0, 0.0], 0.0).unwrap();
        let outcome = Solver::new().solve(&lp).unwrap();
        let solution = outcome.as_unbounded().expect("unbounded");
        assert!(solution.direction[0] > 0.0);
        assert!(solution.direction.iter().all(|&d| d >= 0.0));
        let ad = linalg::mat_vec(&lp.a, &solution.direction);
        assert!(ad.iter().all(|v| v.abs() < 1e-9));
        assert!(verify_unboundedness(&lp, solution, 1e-9));
    }

    #[test]
    fn test_unbounded_with_negative_rhs() {
        // x1 + x2 - s = 2 written as -x1 - x2 + s = -2; maximize x1 + x2
        let lp = StandardForm::new(vec![vec![-1.0, -1.0, 1.0]], vec![-2.0], vec![1.0, 1.0, 0.0], 0.0).unwrap();
        let outcome = Solver::new().solve(&lp).unwrap();
        assert!(verify_unboundedness(&lp, outcome.as_unbounded().expect("unbounded"), 1e-9));
    }

    #[test]
    fn test_redundant_row_is_dropped() {
        // Row 1 is twice row 0.
        let lp = StandardForm::new(
            vec![
                vec![1.0, 1.0, 1.0, 0.0],
                vec![2.0, 2.0, 2.0, 0.0],
                vec![1.0, 0.0, 0.0, 1.0],
            ],
            vec![2.0, 4.0, 1.0],
            vec![1.0, 2.0, 0.0, 0.0],
            0.0,
        )
        .unwrap();
        let solution = optimal(Solver::new().solve(&lp).unwrap());
        assert!((solution.value - 4.0).abs() < 1e-9, "obj = {}", solution.value);
        assert_eq!(solution.basis.len(), 2);
        assert_eq!(solution.certificate.len(), 3);
        assert!(verify_optimality(&lp, &solution, 1e-9));
    }

    #[test]
    fn test_degenerate_artificial_is_driven_out() {
        // -x1 - x2 = 0 leaves its artificial basic at zero after phase one.
        let lp = StandardForm::new(vec![vec![-1.0, -1.0, 0.0], vec![1.0, 1.0, 1.0]], vec![0.0, 3.0], vec![1.0, 0.0, 1.0], 0.0)
            .unwrap();

        let aux = AuxiliaryProgram::new(&lp, &[0, 1]);
        match Solver::new().simplex(&aux.lp, aux.initial_basis()).unwrap() {
            SimplexResult::Optimal { basis, value, .. } => {
                assert_eq!(basis, vec![3, 2]);
                assert!(value.abs() < 1e-9);
            }
            other => panic!("expected optimal, got {:?}", other),
        }

        let solution = optimal(Solver::new().solve(&lp).unwrap());
        assert_eq!(solution.basis, vec![0, 2]);
        assert!((solution.value - 3.0).abs() < 1e-9, "obj = {}", solution.value);
        assert!(verify_optimality(&lp, &solution, 1e-9));
    }

    #[test]
    fn test_no_constraints() {
        let outcome = solve(vec![], vec![], vec![-1.0, 0.0], 0.0).unwrap();
        let solution = optimal(outcome);
        assert_eq!(solution.bfs, vec![0.0, 0.0]);
        assert!(solution.basis.is_empty());

        let outcome = solve(vec![], vec![], vec![0.0, 2.0], 0.0).unwrap();
        assert_eq!(outcome.as_unbounded().expect("unbounded").direction, vec![0.0, 1.0]);
    }

    #[test]
    fn test_invalid_input_fails_before_pivoting() {
        let err = solve(vec![vec![1.0, 1.0]], vec![1.0], vec![1.0], 0.0).unwrap_err();
        assert!(matches!(err, SolverError::InvalidInput(_)));
    }
}

//! Integer programs over Standard Equality Form, solved by repeatedly adding
//! rounded tableau rows as cutting planes to the LP relaxation.

use tracing::{debug, info};

use crate::error::{Result, SolverError};
use crate::problem::{ConstraintOp, LpProblem, StandardForm};
use crate::sef;
use crate::simplex::Solver;
use crate::solution::{Cut, IpSolution, Outcome};
use crate::tableau::{self, CanonicalForm};
use crate::two_phase::restrict_rows;

impl Solver {
    /// Solve `max c·x + z` subject to `A x = b`, `x >= 0` integral.
    pub fn solve_ip(&self, lp: &StandardForm) -> Result<IpSolution> {
        self.cutting_planes(lp, lp.num_cols())
    }

    /// Solve a mixed-relation program with integral variables. Only the
    /// original variables are required to be integral and reported in the
    /// integral point. Inequality rows are first scaled to integer data so
    /// that their slack columns are integral too.
    pub fn solve_ip_problem(&self, problem: &LpProblem) -> Result<IpSolution> {
        let lp = integral_slacks(problem, self.tolerance())?.to_equality_form()?;
        self.cutting_planes(&lp, problem.num_variables())
    }

    fn cutting_planes(&self, lp: &StandardForm, num_integral: usize) -> Result<IpSolution> {
        lp.validate()?;
        let tolerance = self.tolerance();
        let mut system = lp.clone();
        let mut cuts: Vec<Cut> = Vec::new();

        loop {
            let (outcome, rows) = self.two_phase(&system)?;
            let solution = match &outcome {
                Outcome::Optimal(solution) => solution,
                _ => {
                    info!(status = %outcome.status(), cuts = cuts.len(), "relaxation has no optimum");
                    return Ok(IpSolution { outcome, point: None, cuts });
                }
            };

            let point = &solution.bfs[..num_integral];
            if point.iter().all(|&v| is_integral(v, tolerance)) {
                info!(value = solution.value, cuts = cuts.len(), "integral optimum");
                let point = point.iter().map(|v| v.round()).collect();
                return Ok(IpSolution {
                    outcome,
                    point: Some(point),
                    cuts,
                });
            }

            if let Some(max) = self.max_cuts() {
                if cuts.len() >= max {
                    return Err(SolverError::CutLimitReached(max));
                }
            }

            let reduced = restrict_rows(&system, &rows);
            let canonical = tableau::canonical_form(&reduced, &solution.basis, tolerance)?;
            let Some((row, coefficients, rhs)) = cutting_plane(&canonical, tolerance) else {
                return Err(SolverError::NumericalFailure(
                    "fractional solution without a fractional tableau row".into(),
                ));
            };
            info!(cut = cuts.len(), row, rhs, value = solution.value, "adding cutting plane");
            debug!(?coefficients, "cut coefficients");

            cuts.push(Cut {
                row,
                coefficients: coefficients.clone(),
                rhs,
                cut_off: solution.bfs.clone(),
            });
            system = append_cut(canonical, coefficients, rhs)?;
        }
    }
}

/// Largest multiplier tried when clearing fractions from an inequality row.
const MAX_ROW_SCALE: u32 = 10_000;

/// Smallest positive integer `k` making `k · coefficients` and `k · rhs`
/// integral.
fn row_scale(coefficients: &[f64], rhs: f64, tolerance: f64) -> Option<f64> {
    (1..=MAX_ROW_SCALE).map(f64::from).find(|&k| {
        coefficients
            .iter()
            .chain(std::iter::once(&rhs))
            .all(|&v| is_integral(k * v, tolerance))
    })
}

/// Copy of `problem` with every inequality row multiplied up to integer
/// coefficients and right-hand side. Equality rows get no slack column and
/// are kept as given.
fn integral_slacks(problem: &LpProblem, tolerance: f64) -> Result<LpProblem> {
    let mut scaled = problem.clone();
    for (i, constraint) in scaled.constraints.iter_mut().enumerate() {
        if constraint.op.slack_coefficient().is_none() {
            continue;
        }
        let scale = row_scale(&constraint.coefficients, constraint.rhs, tolerance).ok_or_else(|| {
            SolverError::InvalidInput(format!(
                "constraint {i} has no integer multiple up to {MAX_ROW_SCALE}; its slack cannot be integral"
            ))
        })?;
        if scale > 1.0 {
            debug!(row = i, scale, "scaled inequality row to integer data");
        }
        for v in constraint.coefficients.iter_mut() {
            *v = (scale * *v).round();
        }
        constraint.rhs = (scale * constraint.rhs).round();
    }
    Ok(scaled)
}

fn is_integral(value: f64, tolerance: f64) -> bool {
    (value - value.round()).abs() <= tolerance
}

/// Floor that first snaps values within `tolerance` of an integer onto it.
fn snapped_floor(value: f64, tolerance: f64) -> f64 {
    if is_integral(value, tolerance) {
        value.round()
    } else {
        value.floor()
    }
}

/// Rounds down the first tableau row with a fractional right-hand side.
/// Every integral `x >= 0` satisfying the row satisfies
/// `Σ floor(a~_j) x_j <= floor(b~)`, while the current basic solution
/// does not.
pub fn cutting_plane(canonical: &CanonicalForm, tolerance: f64) -> Option<(usize, Vec<f64>, f64)> {
    let row = canonical.b.iter().position(|&v| !is_integral(v, tolerance))?;
    let coefficients = canonical.a.row(row).iter().map(|&v| snapped_floor(v, tolerance)).collect();
    Some((row, coefficients, snapped_floor(canonical.b[row], tolerance)))
}

/// Replaces the system by its canonical form, appends the cut as a `<=` row
/// and restores equality form with a new slack column.
fn append_cut(canonical: CanonicalForm, coefficients: Vec<f64>, rhs: f64) -> Result<StandardForm> {
    let mut system = canonical.into_standard_form();
    system.a.push(coefficients);
    system.b.push(rhs);

    let mut ops = vec![ConstraintOp::Eq; system.num_rows() - 1];
    ops.push(ConstraintOp::Le);

    let (a, c) = sef::to_equality_form(system.a, system.c, &ops)?;
    Ok(StandardForm {
        a,
        b: system.b,
        c,
        z: system.z,
    })
}

/// Cutting-plane IP solve of `max c·x + z` subject to `A x = b`, `x >= 0`
/// integral, with default solver settings.
pub fn solve_ip(c: Vec<f64>, z: f64, a: Vec<Vec<f64>>, b: Vec<f64>) -> Result<IpSolution> {
    let lp = StandardForm::new(a, b, c, z)?;
    Solver::default().solve_ip(&lp)
}

//! Construction and independent verification of optimality, infeasibility
//! and unboundedness certificates.

use nalgebra::DVector;

use crate::error::{Result, SolverError};
use crate::linalg;
use crate::problem::StandardForm;
use crate::solution::{OptimalSolution, Outcome, UnboundedSolution};
use crate::two_phase::AuxiliaryProgram;

/// `y = (A_B⁻¹)ᵗ c_B`. At an optimal basis of a maximization program this
/// is dual feasible (`yᵗA >= c`) and `yᵗb + z` equals the optimal value.
pub fn optimality_certificate(lp: &StandardForm, basis: &[usize], tolerance: f64) -> Result<Vec<f64>> {
    let a_b = linalg::matrix(&lp.a, lp.num_cols()).select_columns(basis);
    let inverse = linalg::invert(a_b, tolerance).ok_or_else(|| SolverError::SingularBasis {
        basis: basis.to_vec(),
    })?;
    let c_b = DVector::from_iterator(basis.len(), basis.iter().map(|&j| lp.c[j]));
    Ok(linalg::to_vec(&inverse.tr_mul(&c_b)))
}

/// Dual of the auxiliary program at its final basis, mapped back through the
/// row sign flips onto the rows of the original program. Rows that were
/// dropped as redundant get a zero multiplier.
pub fn infeasibility_certificate(
    aux: &AuxiliaryProgram,
    basis: &[usize],
    num_rows: usize,
    tolerance: f64,
) -> Result<Vec<f64>> {
    let dual = optimality_certificate(&aux.lp, basis, tolerance)?;
    let unflipped = dual.iter().zip(&aux.signs).map(|(y, sign)| y * sign).collect();
    Ok(scatter(unflipped, &aux.rows, num_rows))
}

/// Spreads a dual vector over a subset of rows into a vector over all rows.
pub(crate) fn scatter(values: Vec<f64>, rows: &[usize], num_rows: usize) -> Vec<f64> {
    let mut out = vec![0.0; num_rows];
    for (&row, value) in rows.iter().zip(values) {
        out[row] = value;
    }
    out
}

fn is_feasible(lp: &StandardForm, x: &[f64], tolerance: f64) -> bool {
    x.len() == lp.num_cols()
        && x.iter().all(|&v| v >= -tolerance)
        && linalg::mat_vec(&lp.a, x)
            .iter()
            .zip(&lp.b)
            .all(|(lhs, rhs)| (lhs - rhs).abs() <= tolerance)
}

/// `x` feasible, `yᵗA >= c`, and `c·x + z = yᵗb + z = value`.
pub fn verify_optimality(lp: &StandardForm, solution: &OptimalSolution, tolerance: f64) -> bool {
    let y = &solution.certificate;
    if y.len() != lp.num_rows() || !is_feasible(lp, &solution.bfs, tolerance) {
        return false;
    }
    let dual_feasible = linalg::tr_mat_vec(&lp.a, y, lp.num_cols())
        .iter()
        .zip(&lp.c)
        .all(|(ya, c)| *ya >= c - tolerance);
    let primal_value = lp.objective_at(&solution.bfs);
    let dual_value = linalg::dot(y, &lp.b) + lp.z;
    dual_feasible
        && (primal_value - solution.value).abs() <= tolerance
        && (dual_value - solution.value).abs() <= tolerance
}

/// Farkas: `yᵗA >= 0` and `yᵗb < 0`, so no `x >= 0` solves `A x = b`.
pub fn verify_infeasibility(lp: &StandardForm, certificate: &[f64], tolerance: f64) -> bool {
    certificate.len() == lp.num_rows()
        && linalg::tr_mat_vec(&lp.a, certificate, lp.num_cols()).iter().all(|&v| v >= -tolerance)
        && linalg::dot(certificate, &lp.b) < -tolerance
}

/// `x` feasible, `A d = 0`, `d >= 0` and `c·d > 0`.
pub fn verify_unboundedness(lp: &StandardForm, solution: &UnboundedSolution, tolerance: f64) -> bool {
    let d = &solution.direction;
    is_feasible(lp, &solution.x, tolerance)
        && d.len() == lp.num_cols()
        && d.iter().all(|&v| v >= -tolerance)
        && linalg::mat_vec(&lp.a, d).iter().all(|v| v.abs() <= tolerance)
        && linalg::dot(&lp.c, d) > tolerance
}

pub fn verify(lp: &StandardForm, outcome: &Outcome, tolerance: f64) -> bool {
    match outcome {
        Outcome::Optimal(solution) => verify_optimality(lp, solution, tolerance),
        Outcome::Unbounded(solution) => verify_unboundedness(lp, solution, tolerance),
        Outcome::Infeasible(solution) => verify_infeasibility(lp, &solution.certificate, tolerance),
    }
}

//! Canonical form of a Standard Equality Form program relative to a basis.

use nalgebra::{DMatrix, DVector};
use tracing::trace;

use crate::error::{Result, SolverError};
use crate::linalg;
use crate::problem::StandardForm;

/// The system `(A~, b~, c~, z~)` re-expressed for a basis `B`, together with
/// the basic feasible solution it implies.
#[derive(Debug, Clone)]
pub struct CanonicalForm {
    /// `A_B⁻¹ A`
    pub a: DMatrix<f64>,
    /// `A_B⁻¹ b`
    pub b: DVector<f64>,
    /// Reduced costs `c - A~ᵗ c_B`
    pub c: DVector<f64>,
    /// `z + c_B · b~`
    pub z: f64,
    /// `x[B[i]] = b~[i]`, zero elsewhere
    pub bfs: Vec<f64>,
    /// `A_B⁻¹`
    pub basis_inverse: DMatrix<f64>,
}

impl CanonicalForm {
    /// Column `k` of `A~`.
    pub fn column(&self, k: usize) -> Vec<f64> {
        self.a.column(k).iter().copied().collect()
    }

    /// The canonical tableau as a program of its own. It has the same
    /// feasible region and, on it, the same objective values.
    pub fn into_standard_form(self) -> StandardForm {
        StandardForm {
            a: linalg::to_rows(&self.a),
            b: linalg::to_vec(&self.b),
            c: linalg::to_vec(&self.c),
            z: self.z,
        }
    }
}

/// Checks that `basis` holds exactly `m` distinct in-range column indices.
pub(crate) fn check_basis(lp: &StandardForm, basis: &[usize]) -> Result<()> {
    if basis.len() != lp.num_rows() {
        return Err(SolverError::InvalidInput(format!(
            "basis has {} columns but the program has {} rows",
            basis.len(),
            lp.num_rows()
        )));
    }
    for (i, &j) in basis.iter().enumerate() {
        if j >= lp.num_cols() {
            return Err(SolverError::InvalidInput(format!("basis column {j} out of range")));
        }
        if basis[..i].contains(&j) {
            return Err(SolverError::InvalidInput(format!("basis column {j} repeated")));
        }
    }
    Ok(())
}

pub fn canonical_form(lp: &StandardForm, basis: &[usize], tolerance: f64) -> Result<CanonicalForm> {
    check_basis(lp, basis)?;

    let a = linalg::matrix(&lp.a, lp.num_cols());
    let basis_inverse = linalg::invert(a.select_columns(basis), tolerance).ok_or_else(|| SolverError::SingularBasis {
        basis: basis.to_vec(),
    })?;

    let a_tilde = &basis_inverse * &a;
    let b = &basis_inverse * linalg::vector(&lp.b);
    let c_b = DVector::from_iterator(basis.len(), basis.iter().map(|&j| lp.c[j]));
    let z = lp.z + c_b.dot(&b);
    let c = linalg::vector(&lp.c) - a_tilde.tr_mul(&c_b);

    let mut bfs = vec![0.0; lp.num_cols()];
    for (&j, &value) in basis.iter().zip(b.iter()) {
        bfs[j] = value;
    }

    trace!(?basis, z, "canonical form");

    Ok(CanonicalForm {
        a: a_tilde,
        b,
        c,
        z,
        bfs,
        basis_inverse,
    })
}

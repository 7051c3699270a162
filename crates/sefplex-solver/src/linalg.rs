//! Bridges between the row-major `Vec<Vec<f64>>` data of [`StandardForm`]
//! and nalgebra's dense matrices.
//!
//! [`StandardForm`]: crate::StandardForm

use nalgebra::{DMatrix, DVector};

/// `rows` as an `m × cols` matrix. The column count is explicit so that a
/// program without rows still has `cols` columns.
pub fn matrix(rows: &[Vec<f64>], cols: usize) -> DMatrix<f64> {
    DMatrix::from_fn(rows.len(), cols, |i, j| rows[i][j])
}

pub fn vector(values: &[f64]) -> DVector<f64> {
    DVector::from_column_slice(values)
}

pub fn to_rows(m: &DMatrix<f64>) -> Vec<Vec<f64>> {
    m.row_iter().map(|row| row.iter().copied().collect()).collect()
}

pub fn to_vec(v: &DVector<f64>) -> Vec<f64> {
    v.iter().copied().collect()
}

pub fn dot(x: &[f64], y: &[f64]) -> f64 {
    x.iter().zip(y).map(|(a, b)| a * b).sum()
}

/// `A x` for row-major `A`.
pub fn mat_vec(a: &[Vec<f64>], x: &[f64]) -> Vec<f64> {
    to_vec(&(matrix(a, x.len()) * vector(x)))
}

/// `Aᵗ y` for a row-major `A` with `cols` columns.
pub fn tr_mat_vec(a: &[Vec<f64>], y: &[f64], cols: usize) -> Vec<f64> {
    to_vec(&matrix(a, cols).tr_mul(&vector(y)))
}

/// Inverse through an LU factorization with partial pivoting. Returns `None`
/// when a pivot of `U` falls below `tolerance`.
pub fn invert(m: DMatrix<f64>, tolerance: f64) -> Option<DMatrix<f64>> {
    if m.is_empty() {
        return Some(m);
    }
    let lu = m.lu();
    if lu.u().diagonal().iter().any(|pivot| pivot.abs() <= tolerance) {
        return None;
    }
    lu.try_inverse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invert_needs_row_swap() {
        let m = DMatrix::from_row_slice(2, 2, &[0.0, 1.0, 2.0, 0.0]);
        let inv = invert(m.clone(), 1e-12).unwrap();
        let expected = DMatrix::from_row_slice(2, 2, &[0.0, 0.5, 1.0, 0.0]);
        assert!((&inv - &expected).amax() < 1e-12, "inverse {}", inv);
        assert!((&m * &inv - DMatrix::identity(2, 2)).amax() < 1e-12);
    }

    #[test]
    fn test_invert_singular() {
        assert!(invert(DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 4.0]), 1e-9).is_none());
        assert!(invert(DMatrix::from_row_slice(2, 2, &[1.0, 1.0, 1.0, 1.0 + 1e-12]), 1e-9).is_none());
    }

    #[test]
    fn test_invert_empty() {
        assert_eq!(invert(DMatrix::zeros(0, 0), 1e-9).unwrap().shape(), (0, 0));
    }

    #[test]
    fn test_row_major_products() {
        let a = vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]];
        assert_eq!(mat_vec(&a, &[1.0, 0.0, -1.0]), vec![-2.0, -2.0]);
        assert_eq!(tr_mat_vec(&a, &[1.0, -1.0], 3), vec![-3.0, -3.0, -3.0]);
        assert_eq!(tr_mat_vec(&[], &[], 2), vec![0.0, 0.0]);
        assert_eq!(to_rows(&matrix(&a, 3).select_columns(&[2, 0])), vec![vec![3.0, 1.0], vec![6.0, 4.0]]);
    }
}

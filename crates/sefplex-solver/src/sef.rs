//! Conversion of mixed-relation constraint systems into Standard Equality Form.

use crate::error::{Result, SolverError};
use crate::problem::ConstraintOp;

/// Appends one slack (`<=`, coefficient `+1`) or surplus (`>=`, coefficient `-1`)
/// column per inequality row, processing rows top to bottom. Every other row
/// gets a `0` in the new column and `c` gets a `0` entry. Equality rows add
/// no column.
pub fn to_equality_form(
    mut a: Vec<Vec<f64>>,
    mut c: Vec<f64>,
    ops: &[ConstraintOp],
) -> Result<(Vec<Vec<f64>>, Vec<f64>)> {
    if ops.len() != a.len() {
        return Err(SolverError::InvalidInput(format!(
            "{} constraint types given for {} rows",
            ops.len(),
            a.len()
        )));
    }

    for (row, op) in ops.iter().enumerate() {
        let Some(coefficient) = op.slack_coefficient() else {
            continue;
        };
        for (i, r) in a.iter_mut().enumerate() {
            r.push(if i == row { coefficient } else { 0.0 });
        }
        c.push(0.0);
    }

    Ok((a, c))
}

/// Parses relation tokens (`"<="`, `"="`, `">="`).
pub fn parse_constraint_types<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<ConstraintOp>> {
    tokens.iter().map(|t| t.as_ref().parse()).collect()
}

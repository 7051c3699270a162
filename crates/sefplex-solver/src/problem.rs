use std::fmt;
use std::str::FromStr;

use crate::error::{Result, SolverError};
use crate::sef;

/// A linear program in Standard Equality Form:
/// maximize `c·x + z` subject to `A x = b`, `x >= 0`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct StandardForm {
    /// Constraint matrix, row-major, `m × n`
    #[cfg_attr(feature = "serde", serde(rename = "A"))]
    pub a: Vec<Vec<f64>>,
    /// Right-hand side, length `m`
    pub b: Vec<f64>,
    /// Objective coefficients, length `n`
    pub c: Vec<f64>,
    /// Objective constant
    #[cfg_attr(feature = "serde", serde(default))]
    pub z: f64,
}

impl StandardForm {
    pub fn new(a: Vec<Vec<f64>>, b: Vec<f64>, c: Vec<f64>, z: f64) -> Result<Self> {
        let lp = Self { a, b, c, z };
        lp.validate()?;
        Ok(lp)
    }

    /// Checks the shape invariants: `A` is `len(b) × len(c)` and every entry is finite.
    pub fn validate(&self) -> Result<()> {
        if self.c.is_empty() {
            return Err(SolverError::InvalidInput("objective has no variables".into()));
        }
        if self.a.len() != self.b.len() {
            return Err(SolverError::InvalidInput(format!(
                "A has {} rows but b has {} entries",
                self.a.len(),
                self.b.len()
            )));
        }
        for (i, row) in self.a.iter().enumerate() {
            if row.len() != self.c.len() {
                return Err(SolverError::InvalidInput(format!(
                    "row {} of A has {} columns but c has {} entries",
                    i,
                    row.len(),
                    self.c.len()
                )));
            }
        }
        let all_finite = self
            .a
            .iter()
            .flatten()
            .chain(&self.b)
            .chain(&self.c)
            .chain(std::iter::once(&self.z))
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(SolverError::InvalidInput("coefficients must be finite".into()));
        }
        Ok(())
    }

    pub fn num_rows(&self) -> usize {
        self.a.len()
    }

    pub fn num_cols(&self) -> usize {
        self.c.len()
    }

    /// Objective value `c·x + z` at `x`
    pub fn objective_at(&self, x: &[f64]) -> f64 {
        self.z + self.c.iter().zip(x).map(|(c, x)| c * x).sum::<f64>()
    }
}

/// Relation of a single constraint row
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintOp {
    /// Less than or equal (<=)
    #[cfg_attr(feature = "serde", serde(rename = "<="))]
    Le,
    /// Equal (=)
    #[cfg_attr(feature = "serde", serde(rename = "="))]
    Eq,
    /// Greater than or equal (>=)
    #[cfg_attr(feature = "serde", serde(rename = ">="))]
    Ge,
}

impl ConstraintOp {
    /// Coefficient of the slack (`<=`) or surplus (`>=`) column this row receives in SEF.
    pub fn slack_coefficient(self) -> Option<f64> {
        match self {
            ConstraintOp::Le => Some(1.0),
            ConstraintOp::Ge => Some(-1.0),
            ConstraintOp::Eq => None,
        }
    }
}

impl FromStr for ConstraintOp {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "<=" => Ok(ConstraintOp::Le),
            "=" => Ok(ConstraintOp::Eq),
            ">=" => Ok(ConstraintOp::Ge),
            other => Err(SolverError::InvalidConstraintType(other.to_string())),
        }
    }
}

impl fmt::Display for ConstraintOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            ConstraintOp::Le => "<=",
            ConstraintOp::Eq => "=",
            ConstraintOp::Ge => ">=",
        };
        f.write_str(token)
    }
}

/// A linear program with mixed relation types, maximizing its objective
/// over nonnegative variables.
#[derive(Debug, Clone)]
pub struct LpProblem {
    pub objective: Objective,
    pub constraints: Vec<Constraint>,
}

#[derive(Debug, Clone)]
pub struct Objective {
    /// Coefficients for each variable
    pub coefficients: Vec<f64>,
    /// Constant term
    pub constant: f64,
}

#[derive(Debug, Clone)]
pub struct Constraint {
    /// Coefficients for each variable
    pub coefficients: Vec<f64>,
    /// Comparison operator
    pub op: ConstraintOp,
    /// Right-hand side value
    pub rhs: f64,
}

impl LpProblem {
    pub fn new(num_variables: usize) -> Self {
        Self {
            objective: Objective {
                coefficients: vec![0.0; num_variables],
                constant: 0.0,
            },
            constraints: Vec::new(),
        }
    }

    pub fn set_objective(&mut self, coefficients: Vec<f64>, constant: f64) {
        self.objective = Objective { coefficients, constant };
    }

    pub fn add_constraint(&mut self, coefficients: Vec<f64>, op: ConstraintOp, rhs: f64) {
        self.constraints.push(Constraint { coefficients, op, rhs });
    }

    pub fn num_variables(&self) -> usize {
        self.objective.coefficients.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Rewrites the problem into Standard Equality Form by appending one
    /// slack or surplus column per inequality row.
    pub fn to_equality_form(&self) -> Result<StandardForm> {
        let a: Vec<Vec<f64>> = self.constraints.iter().map(|c| c.coefficients.clone()).collect();
        let ops: Vec<ConstraintOp> = self.constraints.iter().map(|c| c.op).collect();
        let b: Vec<f64> = self.constraints.iter().map(|c| c.rhs).collect();

        // Validate the original shape first so errors refer to the user's columns.
        StandardForm::new(a.clone(), b.clone(), self.objective.coefficients.clone(), self.objective.constant)?;

        let (a, c) = sef::to_equality_form(a, self.objective.coefficients.clone(), &ops)?;
        StandardForm::new(a, b, c, self.objective.constant)
    }
}

use tracing::debug;

use crate::error::{Result, SolverError};
use crate::problem::StandardForm;
use crate::tableau::{self, CanonicalForm};

/// Simplex solver for Standard Equality Form programs
#[derive(Debug, Clone, Copy)]
pub struct Solver {
    /// Maximum pivots per simplex run before giving up
    max_iterations: usize,
    /// Tolerance for floating point comparisons
    tolerance: f64,
    /// Maximum cutting planes per integer solve, `None` for no limit
    max_cuts: Option<usize>,
}

impl Default for Solver {
    fn default() -> Self {
        Self {
            max_iterations: 10000,
            tolerance: 1e-9,
            max_cuts: Some(1000),
        }
    }
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    pub fn with_max_cuts(mut self, max: Option<usize>) -> Self {
        self.max_cuts = max;
        self
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn max_cuts(&self) -> Option<usize> {
        self.max_cuts
    }

    /// Runs the simplex method on `lp` starting from the feasible basis `basis`.
    pub fn simplex(&self, lp: &StandardForm, basis: Vec<usize>) -> Result<SimplexResult> {
        Simplex::new(lp, basis, self.tolerance).run(self.max_iterations)
    }
}

/// Terminal state of a simplex run
#[derive(Debug, Clone, PartialEq)]
pub enum SimplexResult {
    /// Every reduced cost is nonpositive
    Optimal {
        bfs: Vec<f64>,
        basis: Vec<usize>,
        value: f64,
    },
    /// The entering column has no positive entry; `x + t·direction` stays
    /// feasible and improves the objective for every `t >= 0`
    Unbounded { x: Vec<f64>, direction: Vec<f64> },
}

/// Outcome of a single simplex iteration
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Pivoted {
        entering: usize,
        leaving: usize,
        row: usize,
    },
    Done(SimplexResult),
}

/// Simplex iteration state over a borrowed program. The basis is owned and
/// replaced wholesale on every pivot.
#[derive(Debug, Clone)]
pub struct Simplex<'a> {
    lp: &'a StandardForm,
    basis: Vec<usize>,
    tolerance: f64,
}

impl<'a> Simplex<'a> {
    pub fn new(lp: &'a StandardForm, basis: Vec<usize>, tolerance: f64) -> Self {
        Self { lp, basis, tolerance }
    }

    pub fn basis(&self) -> &[usize] {
        &self.basis
    }

    /// Recomputes the canonical form for the current basis and either
    /// terminates or pivots once using Bland's rule.
    pub fn step(&mut self) -> Result<Step> {
        let canonical = tableau::canonical_form(self.lp, &self.basis, self.tolerance)?;

        let Some(entering) = entering_column(canonical.c.as_slice(), self.tolerance) else {
            return Ok(Step::Done(SimplexResult::Optimal {
                value: canonical.z,
                bfs: canonical.bfs,
                basis: self.basis.clone(),
            }));
        };

        let column = canonical.column(entering);
        let Some(row) = leaving_row(&column, canonical.b.as_slice(), &self.basis, self.tolerance) else {
            let direction = unbounded_direction(&canonical, &self.basis, entering);
            debug!(entering, "unbounded column");
            return Ok(Step::Done(SimplexResult::Unbounded {
                x: canonical.bfs,
                direction,
            }));
        };

        let leaving = self.basis[row];
        debug!(entering, leaving, row, ratio = canonical.b[row] / column[row], "pivot");
        self.basis = replace_at(&self.basis, row, entering);

        Ok(Step::Pivoted { entering, leaving, row })
    }

    pub fn run(mut self, max_iterations: usize) -> Result<SimplexResult> {
        let mut pivots = 0;
        loop {
            match self.step()? {
                Step::Done(result) => {
                    debug!(pivots, "simplex finished");
                    return Ok(result);
                }
                Step::Pivoted { .. } => {
                    pivots += 1;
                    if pivots > max_iterations {
                        return Err(SolverError::IterationLimit(max_iterations));
                    }
                }
            }
        }
    }
}

fn replace_at(basis: &[usize], row: usize, column: usize) -> Vec<usize> {
    let mut next = basis.to_vec();
    next[row] = column;
    next
}

/// Bland's rule: the smallest index with a positive reduced cost.
pub fn entering_column(reduced_costs: &[f64], tolerance: f64) -> Option<usize> {
    reduced_costs.iter().position(|&c| c > tolerance)
}

/// Minimum ratio test over rows with a positive entry in the entering
/// column. Ties are broken by the smallest basic column index (Bland's rule).
pub fn leaving_row(column: &[f64], rhs: &[f64], basis: &[usize], tolerance: f64) -> Option<usize> {
    // (row, ratio, basic column leaving)
    let mut best: Option<(usize, f64, usize)> = None;
    for (row, (&entry, &value)) in column.iter().zip(rhs).enumerate() {
        if entry <= tolerance {
            continue;
        }
        let ratio = value / entry;
        let leaving = basis[row];
        match &mut best {
            Some((best_row, best_ratio, best_leaving)) => {
                if ratio < *best_ratio - tolerance {
                    *best_row = row;
                    *best_ratio = ratio;
                    *best_leaving = leaving;
                } else if (ratio - *best_ratio).abs() <= tolerance && leaving < *best_leaving {
                    *best_row = row;
                    *best_leaving = leaving;
                }
            }
            None => best = Some((row, ratio, leaving)),
        }
    }
    best.map(|(row, _, _)| row)
}

/// Ray along which the entering column can grow without bound: `+1` at
/// `entering`, `-A~[i][entering]` at each basic column `basis[i]`.
pub fn unbounded_direction(canonical: &CanonicalForm, basis: &[usize], entering: usize) -> Vec<f64> {
    let mut direction = vec![0.0; canonical.c.len()];
    direction[entering] = 1.0;
    for (row, &j) in basis.iter().enumerate() {
        direction[j] = -canonical.a[(row, entering)];
    }
    direction
}

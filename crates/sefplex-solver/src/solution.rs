use std::fmt;

/// The result of solving an LP
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "outcome"))]
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    #[cfg_attr(feature = "serde", serde(rename = "FEASIBLE_BOUNDED"))]
    Optimal(OptimalSolution),
    #[cfg_attr(feature = "serde", serde(rename = "UNBOUNDED"))]
    Unbounded(UnboundedSolution),
    #[cfg_attr(feature = "serde", serde(rename = "INFEASIBLE"))]
    Infeasible(InfeasibleSolution),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionStatus {
    /// An optimal solution was found
    Optimal,
    /// The problem is unbounded
    Unbounded,
    /// The problem is infeasible (no solution exists)
    Infeasible,
}

/// An optimal basic feasible solution with its certificate of optimality
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct OptimalSolution {
    /// Optimal basic feasible solution
    #[cfg_attr(feature = "serde", serde(rename = "optimal_bfs"))]
    pub bfs: Vec<f64>,
    /// Basic column per row
    #[cfg_attr(feature = "serde", serde(rename = "optimal_basis"))]
    pub basis: Vec<usize>,
    /// Objective value `c·bfs + z`
    #[cfg_attr(feature = "serde", serde(rename = "obj_val"))]
    pub value: f64,
    /// Dual vector `y` with `yᵗA >= c` and `yᵗb + z = value`
    pub certificate: Vec<f64>,
}

/// A feasible point and an improving ray
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct UnboundedSolution {
    /// Basic feasible solution at which unboundedness was detected
    #[cfg_attr(feature = "serde", serde(rename = "certificate_x"))]
    pub x: Vec<f64>,
    /// Direction `d` with `A d = 0`, `d >= 0` and `c·d > 0`
    #[cfg_attr(feature = "serde", serde(rename = "certificate_d"))]
    pub direction: Vec<f64>,
}

/// Farkas certificate of infeasibility
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct InfeasibleSolution {
    /// Vector `y` with `yᵗA >= 0` and `yᵗb < 0`
    pub certificate: Vec<f64>,
}

impl Outcome {
    pub fn status(&self) -> SolutionStatus {
        match self {
            Outcome::Optimal(_) => SolutionStatus::Optimal,
            Outcome::Unbounded(_) => SolutionStatus::Unbounded,
            Outcome::Infeasible(_) => SolutionStatus::Infeasible,
        }
    }

    pub fn as_optimal(&self) -> Option<&OptimalSolution> {
        match self {
            Outcome::Optimal(solution) => Some(solution),
            _ => None,
        }
    }

    pub fn as_unbounded(&self) -> Option<&UnboundedSolution> {
        match self {
            Outcome::Unbounded(solution) => Some(solution),
            _ => None,
        }
    }

    pub fn as_infeasible(&self) -> Option<&InfeasibleSolution> {
        match self {
            Outcome::Infeasible(solution) => Some(solution),
            _ => None,
        }
    }
}

impl fmt::Display for SolutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SolutionStatus::Optimal => "FEASIBLE_BOUNDED",
            SolutionStatus::Unbounded => "UNBOUNDED",
            SolutionStatus::Infeasible => "INFEASIBLE",
        };
        f.write_str(name)
    }
}

/// The result of solving an IP with cutting planes
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct IpSolution {
    /// Outcome of the last LP relaxation solved
    pub outcome: Outcome,
    /// Integral values of the original variables, when one was found
    pub point: Option<Vec<f64>>,
    /// Cutting planes added, in order
    pub cuts: Vec<Cut>,
}

/// A Chvátal-Gomory cut `coefficients · x <= rhs` over the columns present
/// when it was generated (original columns, then earlier cut slacks).
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Cut {
    /// Canonical tableau row the cut was rounded from
    pub row: usize,
    pub coefficients: Vec<f64>,
    pub rhs: f64,
    /// The fractional basic feasible solution this cut separates
    pub cut_off: Vec<f64>,
}

impl IpSolution {
    pub fn status(&self) -> SolutionStatus {
        self.outcome.status()
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_json_shape() {
        let outcome = Outcome::Optimal(OptimalSolution {
            bfs: vec![1.0, 0.0],
            basis: vec![0],
            value: 2.0,
            certificate: vec![2.0],
        });
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["outcome"], "FEASIBLE_BOUNDED");
        assert_eq!(json["optimal_bfs"], serde_json::json!([1.0, 0.0]));
        assert_eq!(json["optimal_basis"], serde_json::json!([0]));
        assert_eq!(json["obj_val"], 2.0);
        assert_eq!(json["certificate"], serde_json::json!([2.0]));

        let outcome = Outcome::Unbounded(UnboundedSolution {
            x: vec![0.0],
            direction: vec![1.0],
        });
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["outcome"], "UNBOUNDED");
        assert_eq!(json["certificate_d"], serde_json::json!([1.0]));

        let back: Outcome = serde_json::from_value(json).unwrap();
        assert_eq!(back, outcome);
    }
}

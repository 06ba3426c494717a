//! Mixed-integer linear programming interface.
//!
//! The strip formulation talks to an integer program solver only through the
//! [`MilpSolver`] trait. Any backend that can create bounded continuous,
//! integer and binary variables, accept linear constraints, and certify an
//! optimal solution can be plugged in.
//!
//! # Available Backends
//!
//! - [`MicrolpSolver`]: pure-Rust branch and bound on top of the `microlp` crate
//!
//! # Example
//!
//! ```
//! use optistrip::milp::{Comparison, LinearExpression, MicrolpSolver, MilpSolver};
//!
//! let mut solver = MicrolpSolver::new();
//! let a = solver.add_binary_variable(1.0);
//! let b = solver.add_binary_variable(1.0);
//!
//! let mut sum = LinearExpression::from(a);
//! sum += b;
//! solver.add_constraint(&sum, Comparison::LessEqual, 1.0);
//! solver.set_objective(true);
//! solver.optimize().unwrap();
//!
//! let total = solver.solution_value(a).unwrap() + solver.solution_value(b).unwrap();
//! assert!((total - 1.0).abs() < 1e-6);
//! ```

mod microlp_backend;

use std::collections::BTreeMap;
use std::ops::{Add, AddAssign};

use thiserror::Error;

pub use self::microlp_backend::{MicrolpSolver, MICROLP_FEASIBILITY_TOLERANCE};

/// Handle to a variable created by a [`MilpSolver`].
///
/// Handles are dense and numbered in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Variable(usize);

impl Variable {
    /// Create a handle from its creation index.
    #[inline]
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// The creation index of this variable.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Relation between the left- and right-hand side of a constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// `lhs == rhs`
    Equal,
    /// `lhs >= rhs`
    GreaterEqual,
    /// `lhs <= rhs`
    LessEqual,
}

impl Comparison {
    /// Evaluate the relation for concrete values with an absolute tolerance.
    pub fn holds(self, lhs: f64, rhs: f64, tolerance: f64) -> bool {
        match self {
            Comparison::Equal => (lhs - rhs).abs() <= tolerance,
            Comparison::GreaterEqual => lhs >= rhs - tolerance,
            Comparison::LessEqual => lhs <= rhs + tolerance,
        }
    }
}

/// Errors reported by a solving backend.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolveError {
    /// No assignment satisfies the constraints.
    #[error("model is infeasible")]
    Infeasible,

    /// The objective can grow without bound.
    #[error("model is unbounded")]
    Unbounded,

    /// The backend stopped without proving optimality.
    #[error("no certified optimal solution: {0}")]
    NotOptimal(String),

    /// A solution value was requested before a successful `optimize`.
    #[error("no solution available (optimize has not succeeded)")]
    NotSolved,

    /// The handle was not created by this solver.
    #[error("unknown variable {0:?}")]
    UnknownVariable(Variable),
}

/// A linear combination of variables.
///
/// Each variable appears at most once; adding expressions sums the
/// coefficients of shared variables. Terms iterate in variable order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearExpression {
    terms: BTreeMap<Variable, f64>,
}

impl LinearExpression {
    /// Create an empty expression.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the single-term expression `coefficient * var`.
    pub fn term(coefficient: f64, var: Variable) -> Self {
        let mut terms = BTreeMap::new();
        terms.insert(var, coefficient);
        Self { terms }
    }

    /// Add `coefficient * var` to the expression.
    pub fn add_term(&mut self, coefficient: f64, var: Variable) {
        *self.terms.entry(var).or_insert(0.0) += coefficient;
    }

    /// Coefficient of `var` (zero if absent).
    pub fn coefficient(&self, var: Variable) -> f64 {
        self.terms.get(&var).copied().unwrap_or(0.0)
    }

    /// Iterate over `(variable, coefficient)` pairs in variable order.
    pub fn iter(&self) -> impl Iterator<Item = (Variable, f64)> + '_ {
        self.terms.iter().map(|(&v, &c)| (v, c))
    }

    /// Number of distinct variables.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether the expression has no terms.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Evaluate the expression for the given variable values.
    pub fn evaluate(&self, value: impl Fn(Variable) -> f64) -> f64 {
        self.iter().map(|(v, c)| c * value(v)).sum()
    }
}

impl From<Variable> for LinearExpression {
    fn from(var: Variable) -> Self {
        Self::term(1.0, var)
    }
}

impl AddAssign<&LinearExpression> for LinearExpression {
    fn add_assign(&mut self, other: &LinearExpression) {
        for (var, coefficient) in other.iter() {
            self.add_term(coefficient, var);
        }
    }
}

impl AddAssign<LinearExpression> for LinearExpression {
    fn add_assign(&mut self, other: LinearExpression) {
        *self += &other;
    }
}

impl AddAssign<Variable> for LinearExpression {
    fn add_assign(&mut self, var: Variable) {
        self.add_term(1.0, var);
    }
}

impl Add for LinearExpression {
    type Output = LinearExpression;

    fn add(mut self, other: LinearExpression) -> LinearExpression {
        self += &other;
        self
    }
}

/// A mixed-integer linear programming backend.
///
/// A solver instance holds exactly one model. Objective terms accumulate from
/// the coefficients given at variable creation; [`set_objective`](Self::set_objective)
/// only fixes the direction.
pub trait MilpSolver {
    /// Add a continuous variable bounded by `[min, max]` (infinite bounds allowed).
    fn add_variable(&mut self, min: f64, max: f64, objective: f64) -> Variable;

    /// Add an integer variable bounded by `[min, max]`.
    fn add_integer_variable(&mut self, min: f64, max: f64, objective: f64) -> Variable;

    /// Add a binary variable (an integer variable bounded by `[0, 1]`).
    fn add_binary_variable(&mut self, objective: f64) -> Variable;

    /// Add the constraint `lhs <cmp> rhs`.
    fn add_constraint(&mut self, lhs: &LinearExpression, cmp: Comparison, rhs: f64);

    /// Fix the optimization direction.
    fn set_objective(&mut self, maximize: bool);

    /// Solve the model.
    ///
    /// # Errors
    /// Returns an error unless a provably optimal solution was found.
    fn optimize(&mut self) -> Result<(), SolveError>;

    /// Value of `var` in the optimal solution.
    ///
    /// # Errors
    /// [`SolveError::NotSolved`] before a successful [`optimize`](Self::optimize).
    fn solution_value(&self, var: Variable) -> Result<f64, SolveError>;

    /// Absolute primal feasibility tolerance of the backend, if known.
    fn feasibility_tolerance(&self) -> Option<f64> {
        None
    }
}

impl<S: MilpSolver + ?Sized> MilpSolver for Box<S> {
    fn add_variable(&mut self, min: f64, max: f64, objective: f64) -> Variable {
        (**self).add_variable(min, max, objective)
    }

    fn add_integer_variable(&mut self, min: f64, max: f64, objective: f64) -> Variable {
        (**self).add_integer_variable(min, max, objective)
    }

    fn add_binary_variable(&mut self, objective: f64) -> Variable {
        (**self).add_binary_variable(objective)
    }

    fn add_constraint(&mut self, lhs: &LinearExpression, cmp: Comparison, rhs: f64) {
        (**self).add_constraint(lhs, cmp, rhs)
    }

    fn set_objective(&mut self, maximize: bool) {
        (**self).set_objective(maximize)
    }

    fn optimize(&mut self) -> Result<(), SolveError> {
        (**self).optimize()
    }

    fn solution_value(&self, var: Variable) -> Result<f64, SolveError> {
        (**self).solution_value(var)
    }

    fn feasibility_tolerance(&self) -> Option<f64> {
        (**self).feasibility_tolerance()
    }
}

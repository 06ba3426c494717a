//! [`MilpSolver`] backend built on the pure-Rust `microlp` crate.
//!
//! `microlp` fixes the optimization direction when a problem is created, while
//! [`MilpSolver`] lets the caller choose it after the variables exist. The
//! backend therefore records the model and only builds a `microlp::Problem`
//! inside [`MilpSolver::optimize`].

use log::{debug, trace};
use microlp::{ComparisonOp, LinearExpr, OptimizationDirection, Problem};

use super::{Comparison, LinearExpression, MilpSolver, SolveError, Variable};

/// Absolute feasibility tolerance of the `microlp` simplex (its internal `EPS`
/// is 1e-10; this leaves an order of magnitude of headroom).
pub const MICROLP_FEASIBILITY_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Domain {
    Real,
    Integer,
    Binary,
}

#[derive(Debug, Clone)]
struct VariableDef {
    min: f64,
    max: f64,
    objective: f64,
    domain: Domain,
}

#[derive(Debug, Clone)]
struct ConstraintDef {
    terms: Vec<(Variable, f64)>,
    cmp: Comparison,
    rhs: f64,
}

/// One `microlp` solving session.
///
/// The session opens when the solver is created and closes when it is dropped,
/// discarding the model and any solution.
#[derive(Debug)]
pub struct MicrolpSolver {
    variables: Vec<VariableDef>,
    constraints: Vec<ConstraintDef>,
    maximize: bool,
    values: Option<Vec<f64>>,
}

impl MicrolpSolver {
    /// Open a new, empty solving session.
    pub fn new() -> Self {
        debug!("microlp session opened");
        Self {
            variables: Vec::new(),
            constraints: Vec::new(),
            maximize: false,
            values: None,
        }
    }

    /// Number of variables in the model.
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    /// Number of constraints in the model.
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    fn push_variable(&mut self, min: f64, max: f64, objective: f64, domain: Domain) -> Variable {
        let var = Variable::new(self.variables.len());
        self.variables.push(VariableDef {
            min,
            max,
            objective,
            domain,
        });
        self.values = None;
        var
    }

    fn build_problem(&self) -> (Problem, Vec<microlp::Variable>) {
        let direction = if self.maximize {
            OptimizationDirection::Maximize
        } else {
            OptimizationDirection::Minimize
        };
        let mut problem = Problem::new(direction);

        let handles: Vec<microlp::Variable> = self
            .variables
            .iter()
            .map(|def| match def.domain {
                Domain::Real => problem.add_var(def.objective, (def.min, def.max)),
                // `as` saturates, so infinite bounds become i32::MIN / i32::MAX.
                Domain::Integer => problem.add_integer_var(
                    def.objective,
                    (def.min.ceil() as i32, def.max.floor() as i32),
                ),
                Domain::Binary => problem.add_binary_var(def.objective),
            })
            .collect();

        for constraint in self.constraints.iter().filter(|c| !c.terms.is_empty()) {
            let lhs: LinearExpr = constraint
                .terms
                .iter()
                .map(|&(var, coefficient)| (handles[var.index()], coefficient))
                .collect();
            let op = match constraint.cmp {
                Comparison::Equal => ComparisonOp::Eq,
                Comparison::GreaterEqual => ComparisonOp::Ge,
                Comparison::LessEqual => ComparisonOp::Le,
            };
            problem.add_constraint(lhs, op, constraint.rhs);
        }

        (problem, handles)
    }
}

impl Default for MicrolpSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for MicrolpSolver {
    fn drop(&mut self) {
        debug!(
            "microlp session closed ({} variables, {} constraints, solved: {})",
            self.variables.len(),
            self.constraints.len(),
            self.values.is_some()
        );
    }
}

impl MilpSolver for MicrolpSolver {
    fn add_variable(&mut self, min: f64, max: f64, objective: f64) -> Variable {
        self.push_variable(min, max, objective, Domain::Real)
    }

    fn add_integer_variable(&mut self, min: f64, max: f64, objective: f64) -> Variable {
        self.push_variable(min, max, objective, Domain::Integer)
    }

    fn add_binary_variable(&mut self, objective: f64) -> Variable {
        self.push_variable(0.0, 1.0, objective, Domain::Binary)
    }

    fn add_constraint(&mut self, lhs: &LinearExpression, cmp: Comparison, rhs: f64) {
        trace!("constraint {:?} {:?} {}", lhs, cmp, rhs);
        self.constraints.push(ConstraintDef {
            terms: lhs.iter().collect(),
            cmp,
            rhs,
        });
        self.values = None;
    }

    fn set_objective(&mut self, maximize: bool) {
        self.maximize = maximize;
        self.values = None;
    }

    fn optimize(&mut self) -> Result<(), SolveError> {
        self.values = None;

        // Rows without terms never reach microlp; they are either vacuous or infeasible.
        for constraint in self.constraints.iter().filter(|c| c.terms.is_empty()) {
            if !constraint
                .cmp
                .holds(0.0, constraint.rhs, MICROLP_FEASIBILITY_TOLERANCE)
            {
                return Err(SolveError::Infeasible);
            }
        }

        if self.variables.is_empty() {
            self.values = Some(Vec::new());
            return Ok(());
        }

        let (problem, handles) = self.build_problem();
        debug!(
            "microlp solving {} variables, {} constraints ({})",
            self.variables.len(),
            self.constraints.len(),
            if self.maximize { "maximize" } else { "minimize" }
        );

        let solution = problem.solve().map_err(|e| match e {
            microlp::Error::Infeasible => SolveError::Infeasible,
            microlp::Error::Unbounded => SolveError::Unbounded,
            microlp::Error::InternalError(message) => SolveError::NotOptimal(message),
        })?;

        debug!("microlp optimal objective {}", solution.objective());
        self.values = Some(handles.iter().map(|&h| solution[h]).collect());
        Ok(())
    }

    fn solution_value(&self, var: Variable) -> Result<f64, SolveError> {
        let values = self.values.as_ref().ok_or(SolveError::NotSolved)?;
        values
            .get(var.index())
            .copied()
            .ok_or(SolveError::UnknownVariable(var))
    }

    fn feasibility_tolerance(&self) -> Option<f64> {
        Some(MICROLP_FEASIBILITY_TOLERANCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_binary_knapsack() {
        // max 3a + 2b + 2c  s.t.  a + b + c <= 2
        let mut solver = MicrolpSolver::new();
        let a = solver.add_binary_variable(3.0);
        let b = solver.add_binary_variable(2.0);
        let c = solver.add_binary_variable(2.0);

        let sum = LinearExpression::from(a) + LinearExpression::from(b) + LinearExpression::from(c);
        solver.add_constraint(&sum, Comparison::LessEqual, 2.0);
        solver.set_objective(true);
        solver.optimize().unwrap();

        assert!(approx(solver.solution_value(a).unwrap(), 1.0));
        let bc = solver.solution_value(b).unwrap() + solver.solution_value(c).unwrap();
        assert!(approx(bc, 1.0));
    }

    #[test]
    fn test_continuous_coupling() {
        // max x  s.t.  y0 + y1 - x = 0,  y0 <= 0.25,  y1 <= 0.5
        let mut solver = MicrolpSolver::new();
        let x = solver.add_variable(0.0, f64::INFINITY, 1.0);
        let y0 = solver.add_variable(0.0, f64::INFINITY, 0.0);
        let y1 = solver.add_variable(0.0, f64::INFINITY, 0.0);

        let mut coupling = LinearExpression::term(-1.0, x);
        coupling += y0;
        coupling += y1;
        solver.add_constraint(&coupling, Comparison::Equal, 0.0);
        solver.add_constraint(&LinearExpression::from(y0), Comparison::LessEqual, 0.25);
        solver.add_constraint(&LinearExpression::from(y1), Comparison::LessEqual, 0.5);
        solver.set_objective(true);
        solver.optimize().unwrap();

        assert!(approx(solver.solution_value(x).unwrap(), 0.75));
    }

    #[test]
    fn test_integer_minimize() {
        // min n  s.t.  3n >= 10
        let mut solver = MicrolpSolver::new();
        let n = solver.add_integer_variable(0.0, 100.0, 1.0);
        solver.add_constraint(&LinearExpression::term(3.0, n), Comparison::GreaterEqual, 10.0);
        solver.set_objective(false);
        solver.optimize().unwrap();

        assert!(approx(solver.solution_value(n).unwrap(), 4.0));
    }

    #[test]
    fn test_infeasible() {
        let mut solver = MicrolpSolver::new();
        let a = solver.add_binary_variable(1.0);
        solver.add_constraint(&LinearExpression::from(a), Comparison::GreaterEqual, 2.0);
        solver.set_objective(true);

        assert_eq!(solver.optimize(), Err(SolveError::Infeasible));
        assert_eq!(solver.solution_value(a), Err(SolveError::NotSolved));
    }

    #[test]
    fn test_unbounded() {
        let mut solver = MicrolpSolver::new();
        let a = solver.add_variable(0.0, f64::INFINITY, 1.0);
        solver.add_constraint(&LinearExpression::from(a), Comparison::GreaterEqual, 1.0);
        solver.set_objective(true);

        assert_eq!(solver.optimize(), Err(SolveError::Unbounded));
    }

    #[test]
    fn test_value_before_optimize() {
        let mut solver = MicrolpSolver::new();
        let a = solver.add_binary_variable(1.0);
        assert_eq!(solver.solution_value(a), Err(SolveError::NotSolved));
    }

    #[test]
    fn test_unknown_variable() {
        let mut solver = MicrolpSolver::new();
        solver.add_binary_variable(1.0);
        solver.set_objective(true);
        solver.optimize().unwrap();

        let foreign = Variable::new(5);
        assert_eq!(
            solver.solution_value(foreign),
            Err(SolveError::UnknownVariable(foreign))
        );
    }

    #[test]
    fn test_empty_constraint_rows() {
        let mut solver = MicrolpSolver::new();
        let a = solver.add_binary_variable(1.0);
        solver.add_constraint(&LinearExpression::new(), Comparison::LessEqual, 0.9999);
        solver.set_objective(true);
        solver.optimize().unwrap();
        assert!(approx(solver.solution_value(a).unwrap(), 1.0));

        solver.add_constraint(&LinearExpression::new(), Comparison::GreaterEqual, 1.0);
        assert_eq!(solver.optimize(), Err(SolveError::Infeasible));
    }

    #[test]
    fn test_empty_model() {
        let mut solver = MicrolpSolver::new();
        solver.set_objective(true);
        assert!(solver.optimize().is_ok());
        assert_eq!(solver.num_variables(), 0);
    }

    #[test]
    fn test_reports_tolerance() {
        let solver = MicrolpSolver::new();
        assert_eq!(solver.feasibility_tolerance(), Some(MICROLP_FEASIBILITY_TOLERANCE));
    }
}

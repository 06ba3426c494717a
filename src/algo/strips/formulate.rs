//! Integer program formulation of the strip problem.
//!
//! Every dual edge `e` gets a binary `x[e]` (join the two triangles) and a pair
//! of non-negative flow variables `y[e].forward`, `y[e].reverse`, one owned by
//! each incident triangle. With flow capacity `F` and slack `ε`:
//!
//! - anti-fork: `Σ x ≤ 2` over the three dual edges of a fully interior triangle
//! - anti-cycle: `Σ y ≤ F − ε` over the flow slots a triangle owns
//! - coupling: `y[e].forward + y[e].reverse − F·x[e] = 0`
//!
//! A selected cycle of `k` triangles would need `k·F` units of flow spread over
//! `k` triangles that each hold strictly less than `F`, so no cycle is
//! feasible. An open chain of `k` triangles only carries `(k − 1)·F`, which can
//! be assigned monotonically along the chain as long as `(k − 1)·F ≤ k·(F − ε)`,
//! that is `k ≤ F/ε`. Strips are therefore capped at `⌊F/ε⌋` triangles (10,000
//! with the default `F = 1`, `ε = 1e-4`); longer chains are split.
//!
//! The objective maximizes `Σ x`. In a linear forest the strip count equals
//! the triangle count minus the number of joins, so this minimizes strips.

use log::{debug, trace};

use super::StripOptions;
use crate::mesh::{DualEdgeId, DualGraph, Side};
use crate::milp::{Comparison, LinearExpression, MilpSolver, SolveError, Variable};

/// The two flow variables of a dual edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowVariables {
    /// Flow slot owned by the forward-side triangle.
    pub forward: Variable,
    /// Flow slot owned by the reverse-side triangle.
    pub reverse: Variable,
}

impl FlowVariables {
    /// The slot owned by the triangle on `side`.
    #[inline]
    pub fn slot(&self, side: Side) -> Variable {
        match side {
            Side::Forward => self.forward,
            Side::Reverse => self.reverse,
        }
    }
}

/// Variable handles and constraint counts of an emitted program.
#[derive(Debug, Clone)]
pub struct Formulation {
    x: Vec<Variable>,
    y: Vec<FlowVariables>,
    anti_fork: usize,
    anti_cycle: usize,
    coupling: usize,
}

impl Formulation {
    /// Emit all variables and constraints for `graph` into `solver` and set the
    /// objective direction to maximize.
    ///
    /// The options must already be validated.
    pub fn emit<S: MilpSolver + ?Sized>(
        graph: &DualGraph,
        solver: &mut S,
        options: &StripOptions,
    ) -> Self {
        let num_dual_edges = graph.num_dual_edges();
        let capacity = options.flow_capacity;

        let x: Vec<Variable> = (0..num_dual_edges)
            .map(|_| solver.add_binary_variable(1.0))
            .collect();

        let y: Vec<FlowVariables> = (0..num_dual_edges)
            .map(|_| FlowVariables {
                forward: solver.add_variable(0.0, f64::INFINITY, 0.0),
                reverse: solver.add_variable(0.0, f64::INFINITY, 0.0),
            })
            .collect();

        let mut formulation = Self {
            x,
            y,
            anti_fork: 0,
            anti_cycle: 0,
            coupling: 0,
        };

        for t in graph.triangle_ids() {
            let mut sum_x = LinearExpression::new();
            let mut sum_y = LinearExpression::new();
            let mut incident = 0;

            for &e in graph.triangle_dual_edges(t).iter().flatten() {
                incident += 1;
                sum_x += formulation.x[e.index()];
                if let Some(side) = graph.triangle_side(e, t) {
                    sum_y += formulation.y[e.index()].slot(side);
                }
            }

            if incident == 3 {
                trace!("anti-fork at triangle {}", t);
                solver.add_constraint(&sum_x, Comparison::LessEqual, 2.0);
                formulation.anti_fork += 1;
            }
            solver.add_constraint(&sum_y, Comparison::LessEqual, capacity - options.cycle_slack);
            formulation.anti_cycle += 1;
        }

        for (x, y) in formulation.x.iter().zip(&formulation.y) {
            let mut coupling = LinearExpression::term(-capacity, *x);
            coupling += y.forward;
            coupling += y.reverse;
            solver.add_constraint(&coupling, Comparison::Equal, 0.0);
            formulation.coupling += 1;
        }

        solver.set_objective(true);

        debug!(
            "formulated {} binary + {} flow variables, {} anti-fork / {} anti-cycle / {} coupling constraints",
            formulation.x.len(),
            formulation.y.len() * 2,
            formulation.anti_fork,
            formulation.anti_cycle,
            formulation.coupling
        );

        formulation
    }

    /// The selection variable `x[e]`.
    #[inline]
    pub fn selection_variable(&self, e: DualEdgeId) -> Variable {
        self.x[e.index()]
    }

    /// The flow variables `y[e]`.
    #[inline]
    pub fn flow_variables(&self, e: DualEdgeId) -> FlowVariables {
        self.y[e.index()]
    }

    /// Number of anti-fork constraints emitted.
    pub fn num_anti_fork(&self) -> usize {
        self.anti_fork
    }

    /// Total number of constraints emitted.
    pub fn num_constraints(&self) -> usize {
        self.anti_fork + self.anti_cycle + self.coupling
    }

    /// Run the solver and read back the edge selection.
    ///
    /// A solver value counts as selected when it exceeds `threshold`, which
    /// absorbs binaries returned as e.g. `0.9999999` or `1e-9`.
    pub fn solve<S: MilpSolver + ?Sized>(
        &self,
        solver: &mut S,
        threshold: f64,
    ) -> Result<Vec<bool>, SolveError> {
        solver.optimize()?;
        self.read_selection(solver, threshold)
    }

    /// Read back the edge selection from an already optimized solver.
    pub fn read_selection<S: MilpSolver + ?Sized>(
        &self,
        solver: &S,
        threshold: f64,
    ) -> Result<Vec<bool>, SolveError> {
        let selected = self
            .x
            .iter()
            .map(|&x| solver.solution_value(x).map(|value| value > threshold))
            .collect::<Result<Vec<bool>, SolveError>>()?;

        debug!(
            "solver selected {} of {} dual edges",
            selected.iter().filter(|&&s| s).count(),
            selected.len()
        );
        Ok(selected)
    }
}

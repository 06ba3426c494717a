//! Optimal triangle strips.
//!
//! A triangle strip is an ordered run of triangles in which consecutive
//! triangles share an edge. Finding the fewest strips that cover a mesh is
//! posed as an integer program over the dual graph: every interior edge is a
//! binary "join these two triangles" decision, and flow constraints rule out
//! forks and closed loops so that the selected joins form a set of paths.
//!
//! The pipeline runs four stages in sequence:
//!
//! 1. [`DualGraph::build`] from the index buffer
//! 2. [`Formulation::emit`] into a [`MilpSolver`]
//! 3. solve and threshold the join decisions
//! 4. [`extract_strips`] walks the selected joins
//!
//! # Example
//!
//! ```
//! use optistrip::algo::strips::create_triangle_strips;
//!
//! // Two triangles sharing the edge (0, 2).
//! let strips = create_triangle_strips(&[0, 1, 2, 0, 2, 3]).unwrap();
//! assert_eq!(strips.len(), 1);
//! assert_eq!(strips[0].len(), 2);
//! ```
//!
//! # Solver Backends
//!
//! [`create_triangle_strips`] uses [`MicrolpSolver`]. Any other
//! [`MilpSolver`] can be injected through [`create_triangle_strips_with`]:
//!
//! ```
//! use optistrip::algo::strips::{create_triangle_strips_with, StripOptions};
//! use optistrip::milp::MicrolpSolver;
//!
//! let options = StripOptions::default().with_cycle_slack(1e-3).with_verify(true);
//! let strips = create_triangle_strips_with(&[0, 1, 2, 0, 2, 3], MicrolpSolver::new(), &options).unwrap();
//! assert_eq!(strips.len(), 1);
//! ```

mod extract;
mod formulate;
mod validate;

#[cfg(test)]
pub(crate) mod testing;

use log::{debug, info};

pub use extract::extract_strips;
pub use formulate::{FlowVariables, Formulation};
pub use validate::{validate_strips, StripStats};

use super::{Progress, Stage};
use crate::error::{Result, StripError};
use crate::mesh::{DualGraph, TriangleId};
use crate::milp::{MicrolpSolver, MilpSolver};

/// An ordered run of triangles; consecutive entries share a dual edge.
pub type TriangleStrip = Vec<TriangleId>;

/// Options for strip computation.
#[derive(Debug, Clone)]
pub struct StripOptions {
    /// Flow carried by a selected dual edge (`F`).
    pub flow_capacity: f64,

    /// Amount by which a triangle's flow budget falls short of `F` (`ε`).
    /// Must exceed the solver's feasibility tolerance.
    ///
    /// The slack also caps strip length: an open chain of `k` triangles needs
    /// `(k − 1)·F` units of flow from `k` budgets of `F − ε`, so only chains
    /// with `k ≤ F/ε` are feasible (10,000 triangles with the defaults). See
    /// [`StripOptions::max_strip_length`].
    pub cycle_slack: f64,

    /// Solver values above this count as a selected join.
    pub selection_threshold: f64,

    /// Validate the strip set before returning it.
    pub verify: bool,
}

impl Default for StripOptions {
    fn default() -> Self {
        Self {
            flow_capacity: 1.0,
            cycle_slack: 1e-4,
            selection_threshold: 0.5,
            verify: cfg!(debug_assertions),
        }
    }
}

impl StripOptions {
    /// Set the flow capacity `F`.
    pub fn with_flow_capacity(mut self, capacity: f64) -> Self {
        self.flow_capacity = capacity;
        self
    }

    /// Set the anti-cycle slack `ε`.
    pub fn with_cycle_slack(mut self, slack: f64) -> Self {
        self.cycle_slack = slack;
        self
    }

    /// Set the selection threshold.
    pub fn with_selection_threshold(mut self, threshold: f64) -> Self {
        self.selection_threshold = threshold;
        self
    }

    /// Set whether the result is validated.
    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    /// Longest strip the formulation admits, `⌊F/ε⌋` triangles.
    ///
    /// ```
    /// use optistrip::algo::strips::StripOptions;
    ///
    /// assert_eq!(StripOptions::default().max_strip_length(), 10_000);
    /// ```
    pub fn max_strip_length(&self) -> usize {
        (self.flow_capacity / self.cycle_slack).floor() as usize
    }

    /// Check parameter ranges, and that a backend reporting `tolerance`
    /// resolves the anti-cycle slack.
    ///
    /// # Errors
    ///
    /// - [`StripError::InvalidParameter`] for out-of-range values
    /// - [`StripError::ToleranceTooLoose`] if `tolerance >= cycle_slack`
    pub fn validate(&self, tolerance: Option<f64>) -> Result<()> {
        if !(self.flow_capacity.is_finite() && self.flow_capacity > 0.0) {
            return Err(StripError::invalid_param(
                "flow_capacity",
                self.flow_capacity,
                "must be positive and finite",
            ));
        }
        if !(self.cycle_slack > 0.0 && self.cycle_slack < self.flow_capacity) {
            return Err(StripError::invalid_param(
                "cycle_slack",
                self.cycle_slack,
                "must lie strictly between 0 and flow_capacity",
            ));
        }
        if !(self.selection_threshold > 0.0 && self.selection_threshold < 1.0) {
            return Err(StripError::invalid_param(
                "selection_threshold",
                self.selection_threshold,
                "must lie strictly between 0 and 1",
            ));
        }
        if let Some(tolerance) = tolerance {
            if tolerance >= self.cycle_slack {
                return Err(StripError::ToleranceTooLoose {
                    tolerance,
                    slack: self.cycle_slack,
                });
            }
        }
        Ok(())
    }
}

/// Compute a minimal set of triangle strips with default options and the
/// [`MicrolpSolver`] backend.
///
/// `indices` is a flat triangle list; triangle `t` uses `indices[3t..3t + 3]`.
///
/// # Errors
///
/// - an input precondition error (see [`DualGraph::build`])
/// - [`StripError::Solve`] if no certified optimum was found
/// - [`StripError::ModelConsistency`] if the solution is not a set of paths
pub fn create_triangle_strips(indices: &[u32]) -> Result<Vec<TriangleStrip>> {
    create_triangle_strips_with(indices, MicrolpSolver::new(), &StripOptions::default())
}

/// Compute a minimal set of triangle strips with the given solver and options.
///
/// The solver is consumed: it holds exactly one model and is dropped when the
/// call returns, on success or failure.
pub fn create_triangle_strips_with<S: MilpSolver>(
    indices: &[u32],
    solver: S,
    options: &StripOptions,
) -> Result<Vec<TriangleStrip>> {
    create_triangle_strips_with_progress(indices, solver, options, &Progress::none())
}

/// Compute a minimal set of triangle strips, reporting each stage.
pub fn create_triangle_strips_with_progress<S: MilpSolver>(
    indices: &[u32],
    mut solver: S,
    options: &StripOptions,
    progress: &Progress,
) -> Result<Vec<TriangleStrip>> {
    options.validate(solver.feasibility_tolerance())?;

    progress.stage(Stage::DualGraph);
    let graph = DualGraph::build(indices)?;

    if graph.num_triangles() > options.max_strip_length() {
        debug!(
            "strips are capped at {} triangles by the cycle slack",
            options.max_strip_length()
        );
    }

    progress.stage(Stage::Formulate);
    let formulation = Formulation::emit(&graph, &mut solver, options);

    progress.stage(Stage::Solve);
    let selected = formulation.solve(&mut solver, options.selection_threshold)?;
    drop(solver);

    progress.stage(Stage::Extract);
    let strips = extract_strips(&graph, &selected)?;

    if options.verify {
        let stats = validate_strips(&graph, &strips)?;
        let joins = selected.iter().filter(|&&s| s).count();
        if stats.joins != joins {
            return Err(StripError::consistency(
                0,
                format!("{} selected joins but {} joins in strips", joins, stats.joins),
            ));
        }
    }
    progress.finish();

    info!(
        "{} triangles -> {} strips ({} dual edges)",
        graph.num_triangles(),
        strips.len(),
        graph.num_dual_edges()
    );
    Ok(strips)
}

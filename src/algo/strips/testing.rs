//! Shared fixtures for strip tests: small meshes and a scripted solver.

use crate::mesh::DualGraph;
use crate::milp::{Comparison, LinearExpression, MilpSolver, SolveError, Variable};

/// Kind of a recorded variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Continuous,
    Integer,
    Binary,
}

#[derive(Debug, Clone)]
pub struct VarRecord {
    pub kind: Kind,
    pub min: f64,
    pub max: f64,
    pub objective: f64,
}

/// A solver that records the model and answers with scripted values.
///
/// Binary variables receive `binary_values` in creation order (missing
/// entries read as 0); every other variable reads as 0.
#[derive(Debug, Default)]
pub struct ScriptedSolver {
    pub variables: Vec<VarRecord>,
    pub constraints: Vec<(LinearExpression, Comparison, f64)>,
    pub maximize: Option<bool>,
    pub binary_values: Vec<f64>,
    pub failure: Option<SolveError>,
    pub tolerance: Option<f64>,
    solved: Option<Vec<f64>>,
}

impl ScriptedSolver {
    pub fn selecting(binary_values: Vec<f64>) -> Self {
        Self {
            binary_values,
            ..Self::default()
        }
    }

    pub fn failing(error: SolveError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    fn push(&mut self, kind: Kind, min: f64, max: f64, objective: f64) -> Variable {
        self.variables.push(VarRecord {
            kind,
            min,
            max,
            objective,
        });
        Variable::new(self.variables.len() - 1)
    }

    /// Constraints whose right-hand side equals `rhs` under `cmp`.
    pub fn constraints_with(&self, cmp: Comparison, rhs: f64) -> Vec<&LinearExpression> {
        self.constraints
            .iter()
            .filter(|(_, c, r)| *c == cmp && (*r - rhs).abs() < 1e-12)
            .map(|(e, _, _)| e)
            .collect()
    }
}

impl MilpSolver for ScriptedSolver {
    fn add_variable(&mut self, min: f64, max: f64, objective: f64) -> Variable {
        self.push(Kind::Continuous, min, max, objective)
    }

    fn add_integer_variable(&mut self, min: f64, max: f64, objective: f64) -> Variable {
        self.push(Kind::Integer, min, max, objective)
    }

    fn add_binary_variable(&mut self, objective: f64) -> Variable {
        self.push(Kind::Binary, 0.0, 1.0, objective)
    }

    fn add_constraint(&mut self, lhs: &LinearExpression, cmp: Comparison, rhs: f64) {
        self.constraints.push((lhs.clone(), cmp, rhs));
    }

    fn set_objective(&mut self, maximize: bool) {
        self.maximize = Some(maximize);
    }

    fn optimize(&mut self) -> Result<(), SolveError> {
        if let Some(error) = self.failure.clone() {
            return Err(error);
        }
        let mut binaries = self.binary_values.iter().copied();
        let values = self
            .variables
            .iter()
            .map(|v| match v.kind {
                Kind::Binary => binaries.next().unwrap_or(0.0),
                _ => 0.0,
            })
            .collect();
        self.solved = Some(values);
        Ok(())
    }

    fn solution_value(&self, var: Variable) -> Result<f64, SolveError> {
        let values = self.solved.as_ref().ok_or(SolveError::NotSolved)?;
        values
            .get(var.index())
            .copied()
            .ok_or(SolveError::UnknownVariable(var))
    }

    fn feasibility_tolerance(&self) -> Option<f64> {
        self.tolerance
    }
}

/// Two quads in a row, split into four triangles forming the dual path 1-0-3-2.
pub fn quad_row() -> Vec<u32> {
    // 3---4---5
    // |  /|  /|
    // | / | / |
    // 0---1---2
    vec![0, 1, 4, 0, 4, 3, 1, 2, 5, 1, 5, 4]
}

/// Closed tetrahedron; every triangle has three dual edges.
pub fn tetrahedron() -> Vec<u32> {
    vec![0, 2, 1, 0, 1, 3, 1, 2, 3, 2, 0, 3]
}

/// Four triangles where one is adjacent to the other three: a center
/// triangle (0) with one leaf triangle on each of its edges.
///
/// This is the smallest anti-fork case. The leaves cannot also share a single
/// vertex, since each vertex of the center lies on only two of its edges.
pub fn star() -> Vec<u32> {
    vec![0, 1, 2, 1, 0, 3, 2, 1, 4, 0, 2, 5]
}

/// `n` triangles fanned around vertex 0, consecutive ones sharing an edge.
pub fn fan(n: u32) -> Vec<u32> {
    (1..=n).flat_map(|i| [0, i, i + 1]).collect()
}

/// An `nx` by `ny` grid of quads, each split along its diagonal.
pub fn grid(nx: u32, ny: u32) -> Vec<u32> {
    let mut indices = Vec::with_capacity((nx * ny * 6) as usize);
    for j in 0..ny {
        for i in 0..nx {
            let v00 = j * (nx + 1) + i;
            let v10 = v00 + 1;
            let v01 = v00 + nx + 1;
            let v11 = v01 + 1;
            indices.extend_from_slice(&[v00, v10, v11, v00, v11, v01]);
        }
    }
    indices
}

/// Number of selected dual edges incident to each triangle.
pub fn selected_degrees(graph: &DualGraph, selected: &[bool]) -> Vec<usize> {
    graph
        .triangle_ids()
        .map(|t| {
            graph
                .triangle_dual_edges(t)
                .iter()
                .flatten()
                .filter(|e| selected[e.index()])
                .count()
        })
        .collect()
}

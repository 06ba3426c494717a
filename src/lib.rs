//! # Optistrip
//!
//! Optimal triangle strips for indexed triangle meshes.
//!
//! A triangle strip is a run of triangles in which every consecutive pair
//! shares an edge. Optistrip finds a set of strips covering a mesh with as few
//! strips as possible by solving a mixed-integer program over the mesh's dual
//! graph, then walks the solution to produce ordered strips.
//!
//! ## Features
//!
//! - **Dual graph**: edge adjacency with deterministic dual edge ids
//! - **Exact optimum**: strips from a certified-optimal integer program
//! - **Pluggable solvers**: any [`milp::MilpSolver`], with a pure-Rust default
//! - **Multiple file formats**: OBJ, STL, PLY input; OBJ strip visualization
//!
//! ## Quick Start
//!
//! ```
//! use optistrip::prelude::*;
//!
//! // A quad split along its diagonal
//! let strips = create_triangle_strips(&[0, 1, 2, 0, 2, 3]).unwrap();
//!
//! assert_eq!(strips.len(), 1);
//! assert_eq!(strips[0], vec![TriangleId::new(0), TriangleId::new(1)]);
//! ```
//!
//! ## Working From Files
//!
//! ```no_run
//! use optistrip::prelude::*;
//!
//! let mesh = optistrip::io::load("model.obj").unwrap();
//! let strips = create_triangle_strips(&mesh.indices).unwrap();
//!
//! let graph = DualGraph::build(&mesh.indices).unwrap();
//! let stats = validate_strips(&graph, &strips).unwrap();
//! println!("{} strips, longest {}", stats.strips, stats.longest);
//!
//! optistrip::io::obj::save_strips(&mesh, &strips, "strips.obj").unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod io;
pub mod mesh;
pub mod milp;

pub use algo::strips::{create_triangle_strips, TriangleStrip};

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use optistrip::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::strips::{
        create_triangle_strips, create_triangle_strips_with, validate_strips, StripOptions,
        StripStats, TriangleStrip,
    };
    pub use crate::error::{Result, StripError};
    pub use crate::mesh::{DualEdgeId, DualGraph, TriangleId, TriangleMesh};
    pub use crate::milp::{MicrolpSolver, MilpSolver};
}

// Re-export nalgebra types for convenience
pub use nalgebra;

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use nalgebra::Point3;

    #[test]
    fn test_tetrahedron_mesh() {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ];

        let faces = [
            [0, 2, 1], // bottom
            [0, 1, 3], // front
            [1, 2, 3], // right
            [2, 0, 3], // left
        ];

        let mesh = TriangleMesh::from_triangles(positions, &faces).unwrap();
        let graph = DualGraph::build(&mesh.indices).unwrap();

        // Closed: every edge is interior.
        assert_eq!(graph.num_dual_edges(), 6);
        assert_eq!(graph.num_boundary_edges(), 0);

        let strips = create_triangle_strips(&mesh.indices).unwrap();
        let stats = validate_strips(&graph, &strips).unwrap();
        assert_eq!(stats.strips, 1);
        assert_eq!(stats.joins, 3);
    }
}

//! Mesh-side data structures.
//!
//! # Overview
//!
//! The strip builder works on a flat triangle index buffer, where triangle `t`
//! uses indices `3t`, `3t + 1` and `3t + 2`. From that buffer [`DualGraph`]
//! derives the triangle adjacency graph: one node per triangle and one
//! [`DualEdgeId`] per interior mesh edge.
//!
//! # Index Types
//!
//! - [`TriangleId`] - Identifies a triangle
//! - [`DualEdgeId`] - Identifies an interior edge joining two triangles
//!
//! # Construction
//!
//! ```
//! use optistrip::mesh::{DualGraph, TriangleId};
//!
//! // A quad split into two triangles
//! let graph = DualGraph::build(&[0, 1, 2, 0, 2, 3]).unwrap();
//! assert!(graph.are_adjacent(TriangleId::new(0), TriangleId::new(1)));
//! ```

mod dual;
mod index;
mod triangles;

pub use dual::{CanonicalEdge, DualGraph, EdgeAdjacency, Side};
pub use index::{DualEdgeId, TriangleId};
pub use triangles::TriangleMesh;

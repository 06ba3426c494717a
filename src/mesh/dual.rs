//! Dual graph construction.
//!
//! The dual graph has one node per triangle and one edge per interior mesh edge
//! (a mesh edge shared by exactly two triangles). It is built from a flat index
//! buffer in a single pass over the triangle corners, recording for every
//! undirected mesh edge which triangle traverses it low-to-high (the *forward*
//! side) and which traverses it high-to-low (the *reverse* side).
//!
//! Dual edge ids are dense and assigned in ascending [`CanonicalEdge`] order, so
//! they do not depend on hash iteration order.

use std::collections::HashMap;

use log::{debug, warn};

use super::index::{DualEdgeId, TriangleId};
use crate::error::{Result, StripError};

/// An undirected mesh edge stored as `(min, max)` vertex indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CanonicalEdge {
    /// Smaller vertex index.
    pub v0: u32,
    /// Larger vertex index.
    pub v1: u32,
}

impl CanonicalEdge {
    /// Canonicalize the oriented edge `a -> b`.
    #[inline]
    pub fn new(a: u32, b: u32) -> Self {
        Self {
            v0: a.min(b),
            v1: a.max(b),
        }
    }
}

/// Which side of a canonical edge a triangle lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The triangle traverses the edge from the smaller to the larger vertex.
    Forward,
    /// The triangle traverses the edge from the larger to the smaller vertex.
    Reverse,
}

impl Side {
    /// Side occupied by a triangle whose winding visits `a` then `b`.
    #[inline]
    pub fn of_oriented(a: u32, b: u32) -> Self {
        if a < b {
            Side::Forward
        } else {
            Side::Reverse
        }
    }

    /// The other side of the edge.
    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Side::Forward => Side::Reverse,
            Side::Reverse => Side::Forward,
        }
    }
}

/// The (at most two) triangles incident to a canonical edge.
///
/// A missing side holds [`TriangleId::invalid()`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeAdjacency {
    /// Triangle traversing the edge low-to-high.
    pub forward: TriangleId,
    /// Triangle traversing the edge high-to-low.
    pub reverse: TriangleId,
}

impl EdgeAdjacency {
    fn empty() -> Self {
        Self {
            forward: TriangleId::invalid(),
            reverse: TriangleId::invalid(),
        }
    }

    /// Number of incident triangles (0, 1 or 2).
    #[inline]
    pub fn count(&self) -> usize {
        usize::from(self.forward.is_valid()) + usize::from(self.reverse.is_valid())
    }

    /// Whether both sides are populated, i.e. the edge is a dual edge.
    #[inline]
    pub fn is_interior(&self) -> bool {
        self.forward.is_valid() && self.reverse.is_valid()
    }

    /// The triangle on the given side (possibly invalid).
    #[inline]
    pub fn get(&self, side: Side) -> TriangleId {
        match side {
            Side::Forward => self.forward,
            Side::Reverse => self.reverse,
        }
    }

    fn slot_mut(&mut self, side: Side) -> &mut TriangleId {
        match side {
            Side::Forward => &mut self.forward,
            Side::Reverse => &mut self.reverse,
        }
    }

    /// The triangle across the edge from `t`.
    #[inline]
    pub fn other(&self, t: TriangleId) -> TriangleId {
        if self.forward == t {
            self.reverse
        } else {
            self.forward
        }
    }

    /// The side `t` lies on, if it touches this edge at all.
    #[inline]
    pub fn side_of(&self, t: TriangleId) -> Option<Side> {
        if self.forward == t {
            Some(Side::Forward)
        } else if self.reverse == t {
            Some(Side::Reverse)
        } else {
            None
        }
    }
}

/// The triangle adjacency graph of a manifold triangle list.
#[derive(Debug, Clone)]
pub struct DualGraph {
    num_triangles: usize,
    /// Every canonical edge of the mesh with its incident triangles.
    edges: HashMap<CanonicalEdge, EdgeAdjacency>,
    /// Dual edge id -> canonical edge, ascending.
    dual_edges: Vec<CanonicalEdge>,
    /// Dual edge id -> incident triangles (both valid).
    dual_adjacency: Vec<EdgeAdjacency>,
    /// Per triangle, the dual edge behind each corner edge `(i, i + 1)`.
    corners: Vec<[Option<DualEdgeId>; 3]>,
}

impl DualGraph {
    /// Build the dual graph of a flat triangle index buffer.
    ///
    /// # Errors
    ///
    /// Fails fast when the input violates a precondition:
    /// - [`StripError::InvalidIndexCount`] if `indices.len()` is not a multiple of 3
    /// - [`StripError::DegenerateTriangle`] if a triangle repeats a vertex
    /// - [`StripError::NonManifoldEdge`] if an edge has more than two triangles
    ///
    /// Two triangles that traverse a shared edge in the same direction are
    /// still joined; the second one takes the free side and a warning is logged.
    ///
    /// # Example
    ///
    /// ```
    /// use optistrip::mesh::DualGraph;
    ///
    /// let graph = DualGraph::build(&[0, 1, 2, 0, 2, 3]).unwrap();
    /// assert_eq!(graph.num_triangles(), 2);
    /// assert_eq!(graph.num_dual_edges(), 1);
    /// assert_eq!(graph.num_boundary_edges(), 4);
    /// ```
    pub fn build(indices: &[u32]) -> Result<Self> {
        if indices.len() % 3 != 0 {
            return Err(StripError::InvalidIndexCount { len: indices.len() });
        }

        let num_triangles = indices.len() / 3;
        let mut edges: HashMap<CanonicalEdge, EdgeAdjacency> =
            HashMap::with_capacity(num_triangles * 3 / 2 + 3);

        let mut flipped = 0usize;

        for (ti, tri) in indices.chunks_exact(3).enumerate() {
            if tri[0] == tri[1] || tri[1] == tri[2] || tri[0] == tri[2] {
                return Err(StripError::DegenerateTriangle { triangle: ti });
            }

            let t = TriangleId::new(ti);
            for corner in 0..3 {
                let a = tri[corner];
                let b = tri[(corner + 1) % 3];
                let key = CanonicalEdge::new(a, b);
                let adjacency = edges.entry(key).or_insert_with(EdgeAdjacency::empty);

                if adjacency.count() == 2 {
                    return Err(StripError::NonManifoldEdge {
                        v0: key.v0,
                        v1: key.v1,
                    });
                }

                // A neighbour with flipped winding takes whichever side is still free.
                let mut side = Side::of_oriented(a, b);
                if adjacency.get(side).is_valid() {
                    side = side.opposite();
                    flipped += 1;
                }
                *adjacency.slot_mut(side) = t;
            }
        }

        let mut dual_edges: Vec<CanonicalEdge> = edges
            .iter()
            .filter(|(_, adjacency)| adjacency.is_interior())
            .map(|(&key, _)| key)
            .collect();
        dual_edges.sort_unstable();

        let dual_adjacency: Vec<EdgeAdjacency> = dual_edges.iter().map(|key| edges[key]).collect();
        let dual_ids: HashMap<CanonicalEdge, DualEdgeId> = dual_edges
            .iter()
            .enumerate()
            .map(|(i, &key)| (key, DualEdgeId::new(i)))
            .collect();

        let corners: Vec<[Option<DualEdgeId>; 3]> = indices
            .chunks_exact(3)
            .map(|tri| {
                std::array::from_fn(|corner| {
                    let key = CanonicalEdge::new(tri[corner], tri[(corner + 1) % 3]);
                    dual_ids.get(&key).copied()
                })
            })
            .collect();

        let graph = Self {
            num_triangles,
            edges,
            dual_edges,
            dual_adjacency,
            corners,
        };

        if flipped > 0 {
            warn!(
                "{} shared edges are traversed in the same direction by both triangles (inconsistent winding)",
                flipped
            );
        }
        if graph.num_triangles > 0 && graph.num_dual_edges() == 0 {
            warn!(
                "mesh has {} triangles but no shared edges; every strip will be a single triangle",
                graph.num_triangles
            );
        }
        debug!(
            "dual graph: {} triangles, {} dual edges, {} boundary edges",
            graph.num_triangles,
            graph.num_dual_edges(),
            graph.num_boundary_edges()
        );

        Ok(graph)
    }

    /// Number of triangles (dual graph nodes).
    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.num_triangles
    }

    /// Number of distinct undirected mesh edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Number of dual edges (interior mesh edges).
    #[inline]
    pub fn num_dual_edges(&self) -> usize {
        self.dual_edges.len()
    }

    /// Number of boundary mesh edges (exactly one incident triangle).
    pub fn num_boundary_edges(&self) -> usize {
        self.edges.len() - self.dual_edges.len()
    }

    /// Iterate over all triangle ids in ascending order.
    pub fn triangle_ids(&self) -> impl Iterator<Item = TriangleId> {
        (0..self.num_triangles).map(TriangleId::new)
    }

    /// Iterate over all dual edge ids in ascending order.
    pub fn dual_edge_ids(&self) -> impl Iterator<Item = DualEdgeId> {
        (0..self.dual_edges.len()).map(DualEdgeId::new)
    }

    /// Incident triangles of any mesh edge, if the edge exists.
    pub fn adjacency(&self, edge: &CanonicalEdge) -> Option<&EdgeAdjacency> {
        self.edges.get(edge)
    }

    /// The mesh edge behind a dual edge.
    #[inline]
    pub fn dual_edge(&self, id: DualEdgeId) -> CanonicalEdge {
        self.dual_edges[id.index()]
    }

    /// Look up the dual edge id of a mesh edge, if it is interior.
    pub fn dual_edge_id(&self, edge: &CanonicalEdge) -> Option<DualEdgeId> {
        self.dual_edges
            .binary_search(edge)
            .ok()
            .map(DualEdgeId::new)
    }

    /// The two triangles joined by a dual edge.
    #[inline]
    pub fn dual_adjacency(&self, id: DualEdgeId) -> &EdgeAdjacency {
        &self.dual_adjacency[id.index()]
    }

    /// The dual edges behind corner edges `(0,1)`, `(1,2)` and `(2,0)` of `t`.
    #[inline]
    pub fn triangle_dual_edges(&self, t: TriangleId) -> &[Option<DualEdgeId>; 3] {
        &self.corners[t.index()]
    }

    /// Number of dual edges incident to `t` (0 to 3).
    pub fn dual_degree(&self, t: TriangleId) -> usize {
        self.corners[t.index()].iter().flatten().count()
    }

    /// The triangle across dual edge `id` from `t`.
    #[inline]
    pub fn other_side(&self, id: DualEdgeId, t: TriangleId) -> TriangleId {
        self.dual_adjacency[id.index()].other(t)
    }

    /// The side of dual edge `id` that `t` lies on.
    #[inline]
    pub fn triangle_side(&self, id: DualEdgeId, t: TriangleId) -> Option<Side> {
        self.dual_adjacency[id.index()].side_of(t)
    }

    /// Whether triangles `a` and `b` share a dual edge.
    pub fn are_adjacent(&self, a: TriangleId, b: TriangleId) -> bool {
        self.corners[a.index()]
            .iter()
            .flatten()
            .any(|&e| self.other_side(e, a) == b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tetrahedron() -> Vec<u32> {
        vec![0, 2, 1, 0, 1, 3, 1, 2, 3, 2, 0, 3]
    }

    #[test]
    fn test_two_triangles() {
        let graph = DualGraph::build(&[0, 1, 2, 0, 2, 3]).unwrap();

        assert_eq!(graph.num_triangles(), 2);
        assert_eq!(graph.num_edges(), 5);
        assert_eq!(graph.num_dual_edges(), 1);
        assert_eq!(graph.num_boundary_edges(), 4);

        let e = DualEdgeId::new(0);
        assert_eq!(graph.dual_edge(e), CanonicalEdge::new(2, 0));

        // Triangle 0 walks 2 -> 0 (reverse), triangle 1 walks 0 -> 2 (forward).
        let adjacency = graph.dual_adjacency(e);
        assert_eq!(adjacency.forward, TriangleId::new(1));
        assert_eq!(adjacency.reverse, TriangleId::new(0));
        assert_eq!(graph.triangle_side(e, TriangleId::new(0)), Some(Side::Reverse));
        assert_eq!(graph.other_side(e, TriangleId::new(0)), TriangleId::new(1));
    }

    #[test]
    fn test_boundary_edges_record_sentinel() {
        let graph = DualGraph::build(&[0, 1, 2, 0, 2, 3]).unwrap();
        let boundary = graph.adjacency(&CanonicalEdge::new(0, 1)).unwrap();
        assert_eq!(boundary.count(), 1);
        assert!(!boundary.is_interior());
        assert_eq!(boundary.forward, TriangleId::new(0));
        assert!(!boundary.reverse.is_valid());
        assert_eq!(graph.dual_edge_id(&CanonicalEdge::new(0, 1)), None);
    }

    #[test]
    fn test_corner_lookup() {
        let graph = DualGraph::build(&[0, 1, 2, 0, 2, 3]).unwrap();
        let e = Some(DualEdgeId::new(0));
        // Triangle 0: corners (0,1), (1,2), (2,0)
        assert_eq!(graph.triangle_dual_edges(TriangleId::new(0)), &[None, None, e]);
        // Triangle 1: corners (0,2), (2,3), (3,0)
        assert_eq!(graph.triangle_dual_edges(TriangleId::new(1)), &[e, None, None]);
        assert_eq!(graph.dual_degree(TriangleId::new(0)), 1);
        assert!(graph.are_adjacent(TriangleId::new(0), TriangleId::new(1)));
    }

    #[test]
    fn test_ids_sorted_by_canonical_key() {
        let graph = DualGraph::build(&tetrahedron()).unwrap();
        assert_eq!(graph.num_dual_edges(), 6);
        assert_eq!(graph.num_boundary_edges(), 0);

        let keys: Vec<CanonicalEdge> = graph.dual_edge_ids().map(|e| graph.dual_edge(e)).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
        assert_eq!(keys[0], CanonicalEdge::new(0, 1));
        assert_eq!(keys[5], CanonicalEdge::new(2, 3));

        for t in graph.triangle_ids() {
            assert_eq!(graph.dual_degree(t), 3);
        }
    }

    #[test]
    fn test_rebuild_is_deterministic() {
        let a = DualGraph::build(&tetrahedron()).unwrap();
        let b = DualGraph::build(&tetrahedron()).unwrap();
        for t in a.triangle_ids() {
            assert_eq!(a.triangle_dual_edges(t), b.triangle_dual_edges(t));
        }
    }

    #[test]
    fn test_isolated_triangles() {
        let graph = DualGraph::build(&[0, 1, 2, 3, 4, 5]).unwrap();
        assert_eq!(graph.num_dual_edges(), 0);
        assert_eq!(graph.num_boundary_edges(), 6);
        assert_eq!(graph.dual_degree(TriangleId::new(1)), 0);
    }

    #[test]
    fn test_empty_input() {
        let graph = DualGraph::build(&[]).unwrap();
        assert_eq!(graph.num_triangles(), 0);
        assert_eq!(graph.num_dual_edges(), 0);
    }

    #[test]
    fn test_invalid_index_count() {
        let result = DualGraph::build(&[0, 1, 2, 3]);
        assert!(matches!(result, Err(StripError::InvalidIndexCount { len: 4 })));
    }

    #[test]
    fn test_degenerate_triangle() {
        let result = DualGraph::build(&[0, 1, 2, 3, 3, 4]);
        assert!(matches!(result, Err(StripError::DegenerateTriangle { triangle: 1 })));
    }

    #[test]
    fn test_non_manifold_edge() {
        // Three triangles hinge on edge (0, 1).
        let result = DualGraph::build(&[0, 1, 2, 1, 0, 3, 0, 1, 4]);
        assert!(matches!(result, Err(StripError::NonManifoldEdge { v0: 0, v1: 1 })));
    }

    #[test]
    fn test_flipped_winding_is_joined() {
        // Both triangles walk 0 -> 1; the second takes the reverse side.
        let graph = DualGraph::build(&[0, 1, 2, 0, 1, 3]).unwrap();
        assert_eq!(graph.num_dual_edges(), 1);

        let e = DualEdgeId::new(0);
        assert_eq!(graph.dual_edge(e), CanonicalEdge::new(0, 1));
        let adjacency = graph.dual_adjacency(e);
        assert_eq!(adjacency.forward, TriangleId::new(0));
        assert_eq!(adjacency.reverse, TriangleId::new(1));
        assert_eq!(graph.triangle_side(e, TriangleId::new(1)), Some(Side::Reverse));
    }

    #[test]
    fn test_flipped_winding_third_triangle_is_non_manifold() {
        let result = DualGraph::build(&[0, 1, 2, 0, 1, 3, 0, 1, 4]);
        assert!(matches!(result, Err(StripError::NonManifoldEdge { v0: 0, v1: 1 })));
    }

    #[test]
    fn test_side_opposite() {
        assert_eq!(Side::Forward.opposite(), Side::Reverse);
        assert_eq!(Side::Reverse.opposite(), Side::Forward);
    }
}

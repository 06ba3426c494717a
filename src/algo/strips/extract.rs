//! Strip extraction from a dual edge selection.
//!
//! Triangles are seeded in ascending id order. Each unvisited seed `f` starts a
//! strip that is first grown at its back end, then at its front end:
//!
//! - back: follow the first selected corner edge of `f`, then keep walking
//!   through the selected edge other than the one just crossed, appending to
//!   the back
//! - front: leave `f` through its remaining selected edge (skipping the edge
//!   the back pass started on), prepending to the front
//!
//! Any selected edge that leads to an already visited triangle, including a
//! second edge back to the neighbour just left, is a cycle.
//!
//! The walk is iterative, so long strips do not grow the call stack.

use std::collections::VecDeque;

use log::{debug, trace};

use super::TriangleStrip;
use crate::error::{Result, StripError};
use crate::mesh::{DualEdgeId, DualGraph, TriangleId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum End {
    Back,
    Front,
}

/// Walk the selected dual edges of `graph` and collect every triangle into
/// exactly one strip.
///
/// `selected` holds one flag per dual edge, indexed by [`DualEdgeId`](crate::mesh::DualEdgeId).
///
/// # Errors
///
/// - [`StripError::InvalidParameter`] if `selected` does not have one entry per dual edge
/// - [`StripError::ModelConsistency`] if the selection contains a cycle or a
///   triangle with more than two selected edges
///
/// # Example
///
/// ```
/// use optistrip::algo::strips::extract_strips;
/// use optistrip::mesh::{DualGraph, TriangleId};
///
/// let graph = DualGraph::build(&[0, 1, 2, 0, 2, 3]).unwrap();
/// let strips = extract_strips(&graph, &[true]).unwrap();
/// assert_eq!(strips, vec![vec![TriangleId::new(0), TriangleId::new(1)]]);
/// ```
pub fn extract_strips(graph: &DualGraph, selected: &[bool]) -> Result<Vec<TriangleStrip>> {
    if selected.len() != graph.num_dual_edges() {
        return Err(StripError::invalid_param(
            "selected",
            selected.len(),
            "must have one entry per dual edge",
        ));
    }

    let mut walker = Walker {
        graph,
        selected,
        visited: vec![false; graph.num_triangles()],
    };
    let mut strips = Vec::new();

    for f in graph.triangle_ids() {
        if walker.visited[f.index()] {
            continue;
        }
        walker.visited[f.index()] = true;

        let mut strip = VecDeque::from([f]);
        let seed_edge = walker.extend(&mut strip, End::Back, None)?;
        walker.extend(&mut strip, End::Front, seed_edge)?;

        trace!("strip from seed {}: {} triangles", f, strip.len());
        strips.push(Vec::from(strip));
    }

    debug!(
        "extracted {} strips from {} triangles",
        strips.len(),
        graph.num_triangles()
    );
    Ok(strips)
}

struct Walker<'a> {
    graph: &'a DualGraph,
    selected: &'a [bool],
    visited: Vec<bool>,
}

impl Walker<'_> {
    /// First selected edge of `t` in corner order other than `via`, with the
    /// triangle across it, and whether a second such edge exists.
    fn onward(
        &self,
        t: TriangleId,
        via: Option<DualEdgeId>,
    ) -> (Option<(DualEdgeId, TriangleId)>, bool) {
        let mut candidates = self
            .graph
            .triangle_dual_edges(t)
            .iter()
            .flatten()
            .filter(|&&e| self.selected[e.index()] && Some(e) != via)
            .map(|&e| (e, self.graph.other_side(e, t)));
        (candidates.next(), candidates.next().is_some())
    }

    /// Grow `strip` at `end`, starting from the triangle there, which was
    /// reached through `via`. Returns the first edge taken.
    fn extend(
        &mut self,
        strip: &mut VecDeque<TriangleId>,
        end: End,
        mut via: Option<DualEdgeId>,
    ) -> Result<Option<DualEdgeId>> {
        let mut current = match end {
            End::Back => strip[strip.len() - 1],
            End::Front => strip[0],
        };
        let mut first = None;

        loop {
            let (step, branches) = self.onward(current, via);
            let Some((edge, next)) = step else {
                return Ok(first);
            };

            // A lone seed may branch; it simply takes its first selected edge.
            if via.is_some() && branches {
                return Err(StripError::consistency(
                    current.index(),
                    "more than two selected dual edges",
                ));
            }

            // Includes a second selected edge back to the triangle just left.
            if self.visited[next.index()] {
                return Err(StripError::consistency(
                    current.index(),
                    format!("selected edge leads back to visited triangle {}", next),
                ));
            }

            self.visited[next.index()] = true;
            match end {
                End::Back => strip.push_back(next),
                End::Front => strip.push_front(next),
            }
            first.get_or_insert(edge);
            via = Some(edge);
            current = next;
        }
    }
}

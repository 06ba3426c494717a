//! Post-hoc checks on a strip set.

use log::debug;

use super::TriangleStrip;
use crate::error::{Result, StripError};
use crate::mesh::DualGraph;

/// Summary of a validated strip set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StripStats {
    /// Number of triangles covered.
    pub triangles: usize,
    /// Number of strips.
    pub strips: usize,
    /// Number of consecutive pairs across all strips (selected dual edges).
    pub joins: usize,
    /// Length of the longest strip.
    pub longest: usize,
    /// Number of single-triangle strips.
    pub singletons: usize,
}

impl StripStats {
    /// Count `strips` without checking them against a mesh.
    pub fn from_strips(strips: &[TriangleStrip]) -> Self {
        strips.iter().fold(
            StripStats {
                strips: strips.len(),
                ..StripStats::default()
            },
            |mut stats, strip| {
                stats.triangles += strip.len();
                stats.joins += strip.len().saturating_sub(1);
                stats.longest = stats.longest.max(strip.len());
                if strip.len() == 1 {
                    stats.singletons += 1;
                }
                stats
            },
        )
    }

    /// Average strip length, or 0 for an empty set.
    pub fn mean_length(&self) -> f64 {
        if self.strips == 0 {
            0.0
        } else {
            self.triangles as f64 / self.strips as f64
        }
    }
}

/// Check that `strips` is a valid strip set for `graph`.
///
/// Every triangle must appear in exactly one strip exactly once, and every
/// consecutive pair must share a dual edge.
///
/// # Errors
///
/// [`StripError::ModelConsistency`] naming the first offending triangle.
///
/// # Example
///
/// ```
/// use optistrip::algo::strips::validate_strips;
/// use optistrip::mesh::{DualGraph, TriangleId};
///
/// let graph = DualGraph::build(&[0, 1, 2, 0, 2, 3]).unwrap();
/// let stats = validate_strips(&graph, &[vec![TriangleId::new(1), TriangleId::new(0)]]).unwrap();
/// assert_eq!(stats.joins, 1);
/// ```
pub fn validate_strips(graph: &DualGraph, strips: &[TriangleStrip]) -> Result<StripStats> {
    let mut seen = vec![false; graph.num_triangles()];

    for (s, strip) in strips.iter().enumerate() {
        if strip.is_empty() {
            return Err(StripError::invalid_param("strips", s, "strip is empty"));
        }

        for &t in strip {
            if t.index() >= seen.len() {
                return Err(StripError::consistency(
                    t.index(),
                    format!("strip {} references a triangle outside the mesh", s),
                ));
            }
            if std::mem::replace(&mut seen[t.index()], true) {
                return Err(StripError::consistency(
                    t.index(),
                    format!("triangle appears more than once (again in strip {})", s),
                ));
            }
        }

        for pair in strip.windows(2) {
            if !graph.are_adjacent(pair[0], pair[1]) {
                return Err(StripError::consistency(
                    pair[0].index(),
                    format!("not adjacent to its successor {} in strip {}", pair[1], s),
                ));
            }
        }
    }

    if let Some(missing) = seen.iter().position(|&covered| !covered) {
        return Err(StripError::consistency(missing, "triangle is not in any strip"));
    }

    let stats = StripStats::from_strips(strips);
    debug!("validated {:?}", stats);
    Ok(stats)
}

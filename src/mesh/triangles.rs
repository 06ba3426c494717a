//! Flat indexed triangle meshes.

use nalgebra::Point3;

use super::index::TriangleId;
use crate::error::{Result, StripError};

/// A triangle mesh as vertex positions plus a flat index buffer.
///
/// This is the form the strip builder consumes; positions only matter for
/// file I/O and visualization.
#[derive(Debug, Clone, Default)]
pub struct TriangleMesh {
    /// Vertex positions.
    pub positions: Vec<Point3<f64>>,
    /// Triangle vertex indices, three per triangle.
    pub indices: Vec<u32>,
}

impl TriangleMesh {
    /// Create a mesh from positions and triangles, checking every vertex reference.
    ///
    /// # Example
    /// ```
    /// use optistrip::mesh::TriangleMesh;
    /// use nalgebra::Point3;
    ///
    /// let positions = vec![
    ///     Point3::new(0.0, 0.0, 0.0),
    ///     Point3::new(1.0, 0.0, 0.0),
    ///     Point3::new(0.0, 1.0, 0.0),
    /// ];
    /// let mesh = TriangleMesh::from_triangles(positions, &[[0, 1, 2]]).unwrap();
    /// assert_eq!(mesh.num_triangles(), 1);
    /// ```
    pub fn from_triangles(positions: Vec<Point3<f64>>, faces: &[[usize; 3]]) -> Result<Self> {
        let mut indices = Vec::with_capacity(faces.len() * 3);
        for (fi, face) in faces.iter().enumerate() {
            for &vi in face {
                if vi >= positions.len() || vi > u32::MAX as usize {
                    return Err(StripError::InvalidVertexIndex { face: fi, vertex: vi });
                }
                indices.push(vi as u32);
            }
        }
        Ok(Self { positions, indices })
    }

    /// Number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }

    /// The three vertex indices of a triangle.
    #[inline]
    pub fn triangle(&self, t: TriangleId) -> [u32; 3] {
        let base = 3 * t.index();
        [self.indices[base], self.indices[base + 1], self.indices[base + 2]]
    }

    /// Centroid of a triangle.
    pub fn centroid(&self, t: TriangleId) -> Point3<f64> {
        let [a, b, c] = self.triangle(t);
        let (pa, pb, pc) = (
            self.positions[a as usize],
            self.positions[b as usize],
            self.positions[c as usize],
        );
        Point3::from((pa.coords + pb.coords + pc.coords) / 3.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_vertex_index() {
        let positions = vec![Point3::new(0.0, 0.0, 0.0)];
        let result = TriangleMesh::from_triangles(positions, &[[0, 1, 2]]);
        assert!(matches!(
            result,
            Err(StripError::InvalidVertexIndex { face: 0, vertex: 1 })
        ));
    }

    #[test]
    fn test_centroid() {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(3.0, 0.0, 0.0),
            Point3::new(0.0, 3.0, 0.0),
        ];
        let mesh = TriangleMesh::from_triangles(positions, &[[0, 1, 2]]).unwrap();
        let c = mesh.centroid(TriangleId::new(0));
        assert!((c - Point3::new(1.0, 1.0, 0.0)).norm() < 1e-12);
        assert_eq!(mesh.triangle(TriangleId::new(0)), [0, 1, 2]);
    }
}

use anyhow::Result;
use itertools::Itertools;

use crate::error::MeshError;
use crate::mesh::TriMesh;

impl TriMesh {
    /// Check that a vertex index is in `0..=vertlist.len()`.
    ///
    /// The upper limit is inclusive, so the index one past the last
    /// vertex passes. It isn't referenced by any triangle of a well
    /// formed mesh and the queries below return empty results for it.
    pub fn check_index(&self, index: usize) -> Result<()> {
        let limit = self.vertlist().len();
        if index > limit {
            return Err(MeshError::IndexOutOfRange { index, limit }.into());
        }
        Ok(())
    }

    /// The sorted, unique indices of every vertex sharing a triangle
    /// with `vertex_index`, not including `vertex_index` itself.
    pub fn one_ring_neighborhood(&self, vertex_index: usize) -> Result<Vec<usize>> {
        self.check_index(vertex_index)?;
        Ok(ring(self.trilist(), vertex_index))
    }

    /// The triangles containing `vertex_index`, in the order they
    /// appear in the triangle list.
    pub fn adjacent_tri(&self, vertex_index: usize) -> Result<Vec<[usize; 3]>> {
        self.check_index(vertex_index)?;
        Ok(adjacent(self.trilist(), vertex_index))
    }

    /// The number of triangles containing both `vertex1` and `vertex2`.
    ///
    /// Returns
    /// ------------
    /// count
    ///   0 if they don't share an edge, 1 for a boundary edge and 2 for
    ///   an interior edge. Non-manifold edges return their actual count.
    pub fn is_edge(&self, vertex1: usize, vertex2: usize) -> Result<usize> {
        self.check_index(vertex1)?;
        self.check_index(vertex2)?;
        Ok(shared_count(self.trilist(), vertex1, vertex2))
    }
}

pub(crate) fn ring(trilist: &[[usize; 3]], vertex: usize) -> Vec<usize> {
    trilist
        .iter()
        .filter(|t| t.contains(&vertex))
        .flatten()
        .copied()
        .filter(|index| *index != vertex)
        .sorted_unstable()
        .dedup()
        .collect()
}

pub(crate) fn adjacent(trilist: &[[usize; 3]], vertex: usize) -> Vec<[usize; 3]> {
    trilist
        .iter()
        .filter(|t| t.contains(&vertex))
        .copied()
        .collect()
}

pub(crate) fn shared_count(trilist: &[[usize; 3]], vertex1: usize, vertex2: usize) -> usize {
    trilist
        .iter()
        .filter(|t| t.contains(&vertex1) && t.contains(&vertex2))
        .count()
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::creation::{create_grid, create_octahedron};
    use nalgebra::Point3;

    fn triangle() -> TriMesh {
        TriMesh::new(
            vec![[0, 1, 2]],
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
        )
    }

    #[test]
    fn test_one_ring_neighborhood() {
        let grid = create_grid(2, 2, 1.0);
        assert_eq!(grid.one_ring_neighborhood(4).unwrap(), vec![0, 1, 3, 5, 7, 8]);
        assert_eq!(grid.one_ring_neighborhood(0).unwrap(), vec![1, 3, 4]);
        assert_eq!(grid.one_ring_neighborhood(2).unwrap(), vec![1, 5]);

        let octahedron = create_octahedron(1.0);
        assert_eq!(octahedron.one_ring_neighborhood(4).unwrap(), vec![0, 1, 2, 3]);
        assert_eq!(octahedron.one_ring_neighborhood(0).unwrap(), vec![2, 3, 4, 5]);
    }

    #[test]
    fn test_adjacent_tri() {
        let grid = create_grid(2, 2, 1.0);
        assert_eq!(grid.adjacent_tri(2).unwrap(), vec![[1, 2, 5]]);
        assert_eq!(
            grid.adjacent_tri(0).unwrap(),
            vec![[0, 1, 4], [0, 4, 3]]
        );
        assert_eq!(grid.adjacent_tri(4).unwrap().len(), 6);
    }

    #[test]
    fn test_is_edge() {
        let single = triangle();
        assert_eq!(single.is_edge(0, 1).unwrap(), 1);

        // a quad split along the diagonal 0-3
        let quad = create_grid(1, 1, 1.0);
        assert_eq!(quad.is_edge(0, 3).unwrap(), 2);
        assert_eq!(quad.is_edge(0, 1).unwrap(), 1);
        assert_eq!(quad.is_edge(1, 2).unwrap(), 0);

        for i in 0..4 {
            for j in 0..4 {
                assert_eq!(quad.is_edge(i, j).unwrap(), quad.is_edge(j, i).unwrap());
            }
        }

        // three triangles on one edge aren't special
        let fan = TriMesh::new(
            vec![[0, 1, 2], [0, 1, 3], [1, 0, 4]],
            vec![Point3::origin(); 5],
        );
        assert_eq!(fan.is_edge(0, 1).unwrap(), 3);
    }

    #[test]
    fn test_index_limits() {
        let single = triangle();

        // one past the last vertex passes and finds nothing
        assert!(single.check_index(3).is_ok());
        assert!(single.one_ring_neighborhood(3).unwrap().is_empty());
        assert!(single.adjacent_tri(3).unwrap().is_empty());
        assert_eq!(single.is_edge(3, 0).unwrap(), 0);

        let err = single.one_ring_neighborhood(4).unwrap_err();
        assert_eq!(
            err.downcast_ref::<MeshError>(),
            Some(&MeshError::IndexOutOfRange { index: 4, limit: 3 })
        );
        assert!(single.adjacent_tri(4).is_err());
        assert!(single.is_edge(0, 4).is_err());
        assert!(single.is_edge(4, 0).is_err());
    }
}

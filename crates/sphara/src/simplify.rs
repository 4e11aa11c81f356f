use anyhow::Result;
use itertools::Itertools;
use tracing::{debug, trace, warn};

use crate::error::MeshError;
use crate::geometry::angle_variance;
use crate::mesh::TriMesh;
use crate::topology::{adjacent, ring, shared_count};

/// What `remove_vertices_with` does with a vertex that has no neighbor
/// it can be collapsed into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StuckPolicy {
    // abort the whole removal with `MeshError::NoCollapseCandidate`
    #[default]
    Fail,
    // keep the vertex, log a warning and carry on with the next one
    Skip,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemoveOptions {
    pub on_stuck: StuckPolicy,
}

/// The result of removing vertices from a mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct Removal {
    /// The mesh without the removed vertices.
    pub mesh: TriMesh,
    /// Indices that were removed, in the descending order they were
    /// processed.
    pub removed: Vec<usize>,
    /// Indices that were left in place by `StuckPolicy::Skip`.
    pub skipped: Vec<usize>,
}

/// A half-edge collapse of `vertex` into `target`.
#[derive(Debug, Clone, Copy)]
struct Collapse {
    vertex: usize,
    target: usize,
    score: f64,
    // closes the hole left by a vertex on the boundary
    patch: Option<[usize; 3]>,
}

impl TriMesh {
    /// Remove vertices from the mesh by half-edge collapses.
    ///
    /// Every removed vertex is merged into the neighbor whose collapse
    /// leaves the least distorted triangles, so the positions of the
    /// remaining vertices don't change. The mesh itself is not modified.
    ///
    /// Parameters
    /// -------------
    /// vertex_index_list
    ///   The vertices to remove, in any order and possibly repeated.
    ///
    /// Returns
    /// -------------
    /// mesh
    ///   A new mesh with the vertices removed and the triangles
    ///   renumbered, or an error if any vertex couldn't be removed.
    pub fn remove_vertices(&self, vertex_index_list: &[usize]) -> Result<TriMesh> {
        Ok(self
            .remove_vertices_with(vertex_index_list, &RemoveOptions::default())?
            .mesh)
    }

    /// Remove vertices from the mesh, with control over what happens
    /// when a vertex has no neighbor to collapse into.
    pub fn remove_vertices_with(
        &self,
        vertex_index_list: &[usize],
        options: &RemoveOptions,
    ) -> Result<Removal> {
        // descending so each removal only renumbers vertices that
        // have already been processed
        let order: Vec<usize> = vertex_index_list
            .iter()
            .copied()
            .sorted_unstable_by(|a, b| b.cmp(a))
            .dedup()
            .collect();

        if let Some(&largest) = order.first() {
            self.check_index(largest)?;
        }

        debug!(
            "removing {} vertices from a mesh with {} vertices and {} triangles",
            order.len(),
            self.vertlist().len(),
            self.trilist().len()
        );

        let mut working = self.clone();
        let mut removed = Vec::with_capacity(order.len());
        let mut skipped = Vec::new();

        for vertex in order {
            match working.plan_collapse(vertex)? {
                Some(collapse) => {
                    trace!(
                        vertex = collapse.vertex,
                        target = collapse.target,
                        score = collapse.score,
                        boundary = collapse.patch.is_some(),
                        "collapsing vertex"
                    );
                    working.apply_collapse(&collapse);
                    removed.push(vertex);
                }
                None => match options.on_stuck {
                    StuckPolicy::Fail => {
                        return Err(MeshError::NoCollapseCandidate { vertex }.into());
                    }
                    StuckPolicy::Skip => {
                        warn!("vertex {vertex} has no neighbor to collapse into, skipping");
                        skipped.push(vertex);
                    }
                },
            }
        }

        debug!(
            "removed {} vertices, skipped {}, {} triangles remain",
            removed.len(),
            skipped.len(),
            working.trilist().len()
        );

        Ok(Removal {
            mesh: working,
            removed,
            skipped,
        })
    }

    /// Find the neighbor `vertex` should collapse into without changing
    /// anything. Returns `None` if no neighbor shares exactly two
    /// neighbors with `vertex`.
    fn plan_collapse(&self, vertex: usize) -> Result<Option<Collapse>> {
        let trilist = self.trilist();
        let neighbors = ring(trilist, vertex);
        let adjacent = adjacent(trilist, vertex);

        let boundary: Vec<usize> = neighbors
            .iter()
            .copied()
            .filter(|neighbor| shared_count(trilist, vertex, *neighbor) == 1)
            .collect();

        let mut scored = neighbors
            .iter()
            .map(|&neighbor| -> Result<(usize, f64)> {
                Ok((neighbor, self.distortion(&adjacent, vertex, neighbor)?))
            })
            .collect::<Result<Vec<(usize, f64)>>>()?;
        // stable, with NaN scores after every number
        scored.sort_by(|a, b| {
            a.1.partial_cmp(&b.1)
                .unwrap_or_else(|| a.1.is_nan().cmp(&b.1.is_nan()))
        });

        let candidate = scored.into_iter().find(|(neighbor, _)| {
            ring(trilist, *neighbor)
                .iter()
                .filter(|index| neighbors.binary_search(*index).is_ok())
                .count()
                == 2
        });
        let Some((target, score)) = candidate else {
            return Ok(None);
        };

        let patch = match boundary.as_slice() {
            [] => None,
            [a, b] => Some([*a, *b, target]),
            _ => {
                return Err(MeshError::BoundaryPatch {
                    vertex,
                    count: boundary.len(),
                }
                .into())
            }
        };

        if vertex >= self.vertlist().len() {
            return Err(MeshError::DanglingIndex {
                index: vertex,
                vertex_count: self.vertlist().len(),
            }
            .into());
        }

        Ok(Some(Collapse {
            vertex,
            target,
            score,
            patch,
        }))
    }

    /// The mean angle variance of the triangles around `vertex` after
    /// collapsing it into `neighbor`. Triangles containing both vanish
    /// and aren't scored, leaving none gives NaN.
    fn distortion(&self, adjacent: &[[usize; 3]], vertex: usize, neighbor: usize) -> Result<f64> {
        let variances = adjacent
            .iter()
            .filter(|triangle| !triangle.contains(&neighbor))
            .map(|triangle| -> Result<f64> {
                let moved = triangle.map(|index| if index == vertex { neighbor } else { index });
                let [a, b, c] = self.corners(&moved)?;
                Ok(angle_variance(&a, &b, &c))
            })
            .collect::<Result<Vec<f64>>>()?;

        Ok(variances.iter().sum::<f64>() / variances.len() as f64)
    }

    fn apply_collapse(&mut self, collapse: &Collapse) {
        let Collapse {
            vertex,
            target,
            patch,
            ..
        } = *collapse;

        let (trilist, mut vertlist) = std::mem::take(self).into_parts();

        let mut trilist: Vec<[usize; 3]> = trilist
            .into_iter()
            .filter(|triangle| !(triangle.contains(&vertex) && triangle.contains(&target)))
            .map(|triangle| triangle.map(|index| if index == vertex { target } else { index }))
            .chain(patch)
            .collect();

        // checked against the vertex count in `plan_collapse`
        vertlist.remove(vertex);
        for index in trilist.iter_mut().flatten() {
            if *index > vertex {
                *index -= 1;
            }
        }

        *self = TriMesh::new(trilist, vertlist);
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::creation::{create_grid, create_octahedron};
    use nalgebra::Point3;

    fn mesh_error(err: &anyhow::Error) -> Option<&MeshError> {
        err.downcast_ref::<MeshError>()
    }

    fn in_bounds(mesh: &TriMesh) -> bool {
        mesh.trilist()
            .iter()
            .flatten()
            .all(|index| *index < mesh.vertlist().len())
    }

    #[test]
    fn test_remove_nothing() {
        let grid = create_grid(2, 2, 1.0);
        let result = grid.remove_vertices(&[]).unwrap();
        assert_eq!(result, grid);
    }

    #[test]
    fn test_remove_boundary_vertex() {
        let grid = create_grid(2, 2, 1.0);
        let result = grid.remove_vertices(&[1]).unwrap();

        // collapsed into the center and patched with [0, 2, 4]
        assert_eq!(
            result.trilist(),
            &[
                [0, 3, 2],
                [3, 1, 4],
                [2, 3, 6],
                [2, 6, 5],
                [3, 4, 7],
                [3, 7, 6],
                [0, 1, 3],
            ]
        );
        let expected: Vec<Point3<f64>> = [
            (0.0, 0.0),
            (2.0, 0.0),
            (0.0, 1.0),
            (1.0, 1.0),
            (2.0, 1.0),
            (0.0, 2.0),
            (1.0, 2.0),
            (2.0, 2.0),
        ]
        .iter()
        .map(|(x, y)| Point3::new(*x, *y, 0.0))
        .collect();
        assert_eq!(result.vertlist(), expected.as_slice());

        // the original is untouched
        assert_eq!(grid, create_grid(2, 2, 1.0));
    }

    #[test]
    fn test_remove_interior_vertex() {
        let grid = create_grid(2, 2, 1.0);
        let result = grid.remove_vertices(&[4]).unwrap();
        assert_eq!(result.vertlist().len(), 8);
        assert_eq!(result.trilist().len(), 6);
        assert!(in_bounds(&result));
        assert!(result.is_manifold());

        let octahedron = create_octahedron(1.0);
        let result = octahedron.remove_vertices(&[4]).unwrap();
        assert_eq!(result.vertlist().len(), 5);
        assert_eq!(result.trilist().len(), 6);
        assert!(in_bounds(&result));
        assert!(result.boundary_edges().is_empty());
    }

    #[test]
    fn test_remove_repeated() {
        let grid = create_grid(4, 4, 1.0);
        let removal = grid
            .remove_vertices_with(&[6, 12, 18, 6], &RemoveOptions::default())
            .unwrap();
        assert_eq!(removal.removed, vec![18, 12, 6]);
        assert!(removal.skipped.is_empty());
        assert_eq!(removal.mesh.vertlist().len(), 22);
        assert_eq!(removal.mesh.trilist().len(), 26);
        assert!(in_bounds(&removal.mesh));
    }

    #[test]
    fn test_remove_stuck() {
        let single = TriMesh::new(
            vec![[0, 1, 2]],
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
        );
        let err = single.remove_vertices(&[0]).unwrap_err();
        assert_eq!(
            mesh_error(&err),
            Some(&MeshError::NoCollapseCandidate { vertex: 0 })
        );

        // the corner of a grid only has two neighbors
        let grid = create_grid(3, 3, 1.0);
        let err = grid.remove_vertices(&[5, 12]).unwrap_err();
        assert_eq!(
            mesh_error(&err),
            Some(&MeshError::NoCollapseCandidate { vertex: 12 })
        );
    }

    #[test]
    fn test_remove_skip() {
        let grid = create_grid(3, 3, 1.0);
        let options = RemoveOptions {
            on_stuck: StuckPolicy::Skip,
        };
        let removal = grid.remove_vertices_with(&[12, 5], &options).unwrap();
        assert_eq!(removal.removed, vec![5]);
        assert_eq!(removal.skipped, vec![12]);
        assert_eq!(removal.mesh.vertlist().len(), 15);
        assert_eq!(removal.mesh.trilist().len(), 16);
        assert!(in_bounds(&removal.mesh));
    }

    #[test]
    fn test_remove_index_limits() {
        let grid = create_grid(3, 3, 1.0);

        // one past the last vertex passes validation but has no neighbors
        let err = grid.remove_vertices(&[16]).unwrap_err();
        assert_eq!(
            mesh_error(&err),
            Some(&MeshError::NoCollapseCandidate { vertex: 16 })
        );

        let err = grid.remove_vertices(&[0, 17]).unwrap_err();
        assert_eq!(
            mesh_error(&err),
            Some(&MeshError::IndexOutOfRange {
                index: 17,
                limit: 16
            })
        );
    }

    #[test]
    fn test_remove_boundary_patch() {
        // two fans meeting only at vertex 0, which then has four
        // boundary neighbors
        let bowtie = TriMesh::new(
            vec![[0, 1, 2], [0, 2, 3], [0, 4, 5], [0, 5, 6]],
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, -0.5, 0.0),
                Point3::new(1.2, 0.0, 0.0),
                Point3::new(1.0, 0.5, 0.0),
                Point3::new(-1.0, 0.5, 0.0),
                Point3::new(-1.2, 0.0, 0.0),
                Point3::new(-1.0, -0.5, 0.0),
            ],
        );
        let err = bowtie.remove_vertices(&[0]).unwrap_err();
        assert_eq!(
            mesh_error(&err),
            Some(&MeshError::BoundaryPatch {
                vertex: 0,
                count: 4
            })
        );
    }

    #[test]
    fn test_remove_single_boundary_neighbor() {
        // an octahedron with one extra triangle hanging off the edge 4-0,
        // so vertex 4 has a single boundary neighbor but can still collapse
        let mut vertices = create_octahedron(1.0).vertlist().to_vec();
        vertices.push(Point3::new(1.0, 1.0, 1.0));
        let mut triangles = create_octahedron(1.0).trilist().to_vec();
        triangles.push([4, 0, 6]);
        let mesh = TriMesh::new(triangles, vertices);

        assert_eq!(mesh.is_edge(4, 6).unwrap(), 1);
        assert_eq!(mesh.is_edge(4, 0).unwrap(), 3);

        let err = mesh.remove_vertices(&[4]).unwrap_err();
        assert_eq!(
            mesh_error(&err),
            Some(&MeshError::BoundaryPatch {
                vertex: 4,
                count: 1
            })
        );
    }
}

use ahash::AHashMap;
use anyhow::Result;
use itertools::Itertools;
use nalgebra::Point3;

use crate::error::MeshError;
use crate::geometry::area_triangle;

/// A triangular mesh embedded in 3D space.
///
/// Vertices are identified only by their position in `vertlist`, and
/// each triangle is an ordered triple of those positions. The shape of
/// both lists is checked whenever they're assigned, but nothing checks
/// that triangles reference existing vertices or that the mesh is a
/// 2-manifold: operations that need a missing vertex return
/// `MeshError::DanglingIndex`.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct TriMesh {
    trilist: Vec<[usize; 3]>,
    vertlist: Vec<Point3<f64>>,
}

impl TriMesh {
    /// Create a new mesh from a list of triangles and vertex positions.
    pub fn new(trilist: Vec<[usize; 3]>, vertlist: Vec<Point3<f64>>) -> Self {
        Self { trilist, vertlist }
    }

    /// Create a mesh from row-shaped data, i.e. nested vectors or arrays
    /// as they come out of a loader. Every row has to contain exactly
    /// three entries.
    ///
    /// Parameters
    /// -------------
    /// trilist
    ///   The triangles as rows of vertex indices.
    /// vertlist
    ///   The vertex positions as rows of x, y, z.
    pub fn from_rows<T, V>(trilist: &[T], vertlist: &[V]) -> Result<Self>
    where
        T: AsRef<[usize]>,
        V: AsRef<[f64]>,
    {
        Ok(Self {
            trilist: triangles_from_rows(trilist)?,
            vertlist: vertices_from_rows(vertlist)?,
        })
    }

    /// Create a mesh from flat slices of vertices and faces.
    pub fn from_slice(vertices: &[f64], faces: &[usize]) -> Result<Self> {
        if vertices.len() % 3 != 0 {
            return Err(MeshError::shape("Vertices must be a multiple of 3").into());
        }
        if faces.len() % 3 != 0 {
            return Err(MeshError::shape("Faces must be a multiple of 3").into());
        }

        let vertlist = vertices
            .chunks_exact(3)
            .map(|chunk| Point3::new(chunk[0], chunk[1], chunk[2]))
            .collect();

        let trilist = faces
            .chunks_exact(3)
            .map(|chunk| [chunk[0], chunk[1], chunk[2]])
            .collect();

        Ok(Self { trilist, vertlist })
    }

    /// Create a mesh from raw native-endian buffers of `f64` vertex
    /// coordinates and `usize` face indices. The buffers don't need to
    /// be aligned.
    pub fn from_bytes(vertices: &[u8], faces: &[u8]) -> Result<Self> {
        if vertices.len() % std::mem::size_of::<f64>() != 0 {
            return Err(MeshError::shape("Could not interpret bytes as f64 vertices!").into());
        }
        if faces.len() % std::mem::size_of::<usize>() != 0 {
            return Err(MeshError::shape("Could not interpret bytes as usize faces!").into());
        }

        let vertices: Vec<f64> = bytemuck::pod_collect_to_vec(vertices);
        let faces: Vec<usize> = bytemuck::pod_collect_to_vec(faces);

        Self::from_slice(&vertices, &faces)
    }

    /// The triangles of the mesh as indices into `vertlist`.
    pub fn trilist(&self) -> &[[usize; 3]] {
        &self.trilist
    }

    /// The vertex positions of the mesh.
    pub fn vertlist(&self) -> &[Point3<f64>] {
        &self.vertlist
    }

    pub fn set_trilist(&mut self, trilist: Vec<[usize; 3]>) {
        self.trilist = trilist;
    }

    pub fn set_vertlist(&mut self, vertlist: Vec<Point3<f64>>) {
        self.vertlist = vertlist;
    }

    /// Replace the triangles from row-shaped data, leaving the mesh
    /// unchanged if any row doesn't have exactly three entries.
    pub fn set_trilist_rows<T: AsRef<[usize]>>(&mut self, trilist: &[T]) -> Result<()> {
        self.trilist = triangles_from_rows(trilist)?;
        Ok(())
    }

    /// Replace the vertices from row-shaped data, leaving the mesh
    /// unchanged if any row doesn't have exactly three entries.
    pub fn set_vertlist_rows<V: AsRef<[f64]>>(&mut self, vertlist: &[V]) -> Result<()> {
        self.vertlist = vertices_from_rows(vertlist)?;
        Ok(())
    }

    pub fn into_parts(self) -> (Vec<[usize; 3]>, Vec<Point3<f64>>) {
        (self.trilist, self.vertlist)
    }

    /// The side length of the square operator matrices, which is the
    /// largest vertex index referenced by a triangle plus one.
    ///
    /// This is *not* `vertlist.len()`: trailing vertices that no
    /// triangle references are left out of every operator matrix.
    pub fn matrix_size(&self) -> Result<usize> {
        let largest = *self
            .trilist
            .iter()
            .flatten()
            .max()
            .ok_or(MeshError::EmptyTriangleList)?;
        largest.checked_add(1).ok_or_else(|| {
            MeshError::DanglingIndex {
                index: largest,
                vertex_count: self.vertlist.len(),
            }
            .into()
        })
    }

    /// The position of a vertex, or an error if no such vertex exists.
    pub(crate) fn point(&self, index: usize) -> Result<Point3<f64>> {
        self.vertlist.get(index).copied().ok_or_else(|| {
            MeshError::DanglingIndex {
                index,
                vertex_count: self.vertlist.len(),
            }
            .into()
        })
    }

    /// The three corner positions of a triangle.
    pub(crate) fn corners(&self, triangle: &[usize; 3]) -> Result<[Point3<f64>; 3]> {
        Ok([
            self.point(triangle[0])?,
            self.point(triangle[1])?,
            self.point(triangle[2])?,
        ])
    }

    /// The area for each triangle in the mesh.
    pub fn faces_area(&self) -> Result<Vec<f64>> {
        self.trilist
            .iter()
            .map(|triangle| -> Result<f64> {
                let [p0, p1, p2] = self.corners(triangle)?;
                Ok(area_triangle(&p0, &p1, &p2))
            })
            .collect()
    }

    /// The summed area of every triangle in the mesh.
    pub fn area(&self) -> Result<f64> {
        Ok(self.faces_area()?.iter().sum())
    }

    // Get the edges calculated from the faces
    pub fn edges(&self) -> Vec<[usize; 2]> {
        self.trilist
            .iter()
            .flat_map(|t| [[t[0], t[1]], [t[1], t[2]], [t[2], t[0]]])
            .collect()
    }

    /// How many triangles contain each undirected edge, keyed by the
    /// edge sorted as `[low, high]`.
    pub fn edge_counts(&self) -> AHashMap<[usize; 2], usize> {
        let mut counts = AHashMap::new();
        for triangle in &self.trilist {
            // a triangle with a repeated index still only counts once per edge
            let keys = [
                [triangle[0], triangle[1]],
                [triangle[1], triangle[2]],
                [triangle[2], triangle[0]],
            ]
            .into_iter()
            .filter(|edge| edge[0] != edge[1])
            .map(|edge| [edge[0].min(edge[1]), edge[0].max(edge[1])])
            .unique();
            for key in keys {
                *counts.entry(key).or_insert(0) += 1;
            }
        }
        counts
    }

    /// The edges that belong to exactly one triangle, sorted.
    pub fn boundary_edges(&self) -> Vec<[usize; 2]> {
        self.edge_counts()
            .iter()
            .filter(|(_, count)| **count == 1)
            .map(|(edge, _)| *edge)
            .sorted_unstable()
            .collect()
    }

    /// Does every edge belong to at most two triangles?
    pub fn is_manifold(&self) -> bool {
        self.edge_counts().values().all(|count| *count <= 2)
    }
}

fn triangles_from_rows<T: AsRef<[usize]>>(rows: &[T]) -> Result<Vec<[usize; 3]>> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| match row.as_ref() {
            &[a, b, c] => Ok([a, b, c]),
            other => Err(MeshError::shape(format!(
                "Each entry of the triangle list has to consist of three elements, row {i} has {}!",
                other.len()
            ))
            .into()),
        })
        .collect()
}

fn vertices_from_rows<V: AsRef<[f64]>>(rows: &[V]) -> Result<Vec<Point3<f64>>> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| match row.as_ref() {
            &[x, y, z] => Ok(Point3::new(x, y, z)),
            other => Err(MeshError::shape(format!(
                "Each entry of the vertex list has to consist of three elements, row {i} has {}!",
                other.len()
            ))
            .into()),
        })
        .collect()
}

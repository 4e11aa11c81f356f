use std::fmt;
use std::str::FromStr;

use anyhow::Result;
use nalgebra::DMatrix;

use crate::error::MeshError;
use crate::geometry::{area_triangle, half_cotangent};
use crate::mesh::TriMesh;

// the three edges of a triangle as pairs of corner positions
const EDGES: [(usize, usize); 3] = [(0, 1), (0, 2), (1, 2)];

// each corner with the two corners spanning the edge opposite it
const OPPOSITE: [(usize, usize, usize); 3] = [(0, 1, 2), (1, 0, 2), (2, 0, 1)];

/// How the edges of a mesh are weighted when assembling the
/// weight and Laplacian matrices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum WeightMode {
    // every edge weighs 1, the adjacency matrix
    Unit,
    // the reciprocal of the edge length
    #[default]
    InvEuclidean,
    // half the cotangents of the angles opposite the edge, summed
    HalfCotangent,
}

impl WeightMode {
    /// Convert one of `"unit"`, `"inv_euclidean"` or `"half_cotangent"`
    /// to a WeightMode. Names are matched exactly.
    pub fn from_string(s: &str) -> Result<Self> {
        Ok(s.parse()?)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WeightMode::Unit => "unit",
            WeightMode::InvEuclidean => "inv_euclidean",
            WeightMode::HalfCotangent => "half_cotangent",
        }
    }
}

impl FromStr for WeightMode {
    type Err = MeshError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unit" => Ok(WeightMode::Unit),
            "inv_euclidean" => Ok(WeightMode::InvEuclidean),
            "half_cotangent" => Ok(WeightMode::HalfCotangent),
            _ => Err(MeshError::UnrecognizedMode(s.to_string())),
        }
    }
}

impl fmt::Display for WeightMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How triangle areas are distributed when assembling the mass matrix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MassMode {
    // the consistent finite element mass matrix
    #[default]
    Normal,
    // a third of each triangle area on the diagonal of its corners
    Lumped,
}

impl MassMode {
    /// Convert `"normal"` or `"lumped"` to a MassMode. Names are matched
    /// exactly.
    pub fn from_string(s: &str) -> Result<Self> {
        Ok(s.parse()?)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MassMode::Normal => "normal",
            MassMode::Lumped => "lumped",
        }
    }
}

impl FromStr for MassMode {
    type Err = MeshError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(MassMode::Normal),
            "lumped" => Ok(MassMode::Lumped),
            _ => Err(MeshError::UnrecognizedMode(s.to_string())),
        }
    }
}

impl fmt::Display for MassMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TriMesh {
    /// Compute the symmetric weight matrix of the mesh.
    ///
    /// The matrix is `matrix_size() x matrix_size()` and only entries
    /// for vertex pairs sharing a triangle edge are nonzero. With
    /// `HalfCotangent` the contributions of the (usually two) triangles
    /// on each side of an edge are summed.
    ///
    /// Degenerate triangles are not detected and put NaN or infinite
    /// values into the matrix.
    pub fn weightmatrix(&self, mode: WeightMode) -> Result<DMatrix<f64>> {
        let size = self.matrix_size()?;
        let mut weights = DMatrix::<f64>::zeros(size, size);

        for triangle in self.trilist() {
            match mode {
                WeightMode::Unit => {
                    for (a, b) in EDGES {
                        weights[(triangle[a], triangle[b])] = 1.0;
                        weights[(triangle[b], triangle[a])] = 1.0;
                    }
                }
                WeightMode::InvEuclidean => {
                    let points = self.corners(triangle)?;
                    for (a, b) in EDGES {
                        let weight = 1.0 / (points[a] - points[b]).norm();
                        weights[(triangle[a], triangle[b])] = weight;
                        weights[(triangle[b], triangle[a])] = weight;
                    }
                }
                WeightMode::HalfCotangent => {
                    let points = self.corners(triangle)?;
                    for (apex, a, b) in OPPOSITE {
                        let weight = half_cotangent(&points[apex], &points[a], &points[b]);
                        weights[(triangle[a], triangle[b])] += weight;
                        weights[(triangle[b], triangle[a])] += weight;
                    }
                }
            }
        }

        Ok(weights)
    }

    /// Compute the Laplacian matrix `diag(row sums of W) - W` of the
    /// weight matrix `W` for `mode`. Every row sums to zero.
    pub fn laplacianmatrix(&self, mode: WeightMode) -> Result<DMatrix<f64>> {
        let weights = self.weightmatrix(mode)?;
        Ok(DMatrix::from_diagonal(&weights.column_sum()) - weights)
    }

    /// Compute the mass matrix of the mesh.
    ///
    /// Parameters
    /// -------------
    /// mode
    ///   `Normal` puts `area / 12` on every edge entry and `area / 6` on
    ///   every diagonal entry of each triangle, `Lumped` only puts
    ///   `area / 3` on the diagonal.
    pub fn massmatrix(&self, mode: MassMode) -> Result<DMatrix<f64>> {
        let size = self.matrix_size()?;
        let mut mass = DMatrix::<f64>::zeros(size, size);

        for triangle in self.trilist() {
            let [p0, p1, p2] = self.corners(triangle)?;
            let area = area_triangle(&p0, &p1, &p2);

            match mode {
                MassMode::Normal => {
                    for (a, b) in EDGES {
                        let (i, j) = (triangle[a], triangle[b]);
                        mass[(i, j)] += area / 12.0;
                        mass[(j, i)] = mass[(i, j)];
                    }
                    for index in triangle {
                        mass[(*index, *index)] += area / 6.0;
                    }
                }
                MassMode::Lumped => {
                    for index in triangle {
                        mass[(*index, *index)] += area / 3.0;
                    }
                }
            }
        }

        Ok(mass)
    }

    /// Compute the stiffness matrix `W - diag(row sums of W)` from the
    /// half cotangent weights, the negated cotangent Laplacian.
    pub fn stiffnessmatrix(&self) -> Result<DMatrix<f64>> {
        let weights = self.weightmatrix(WeightMode::HalfCotangent)?;
        let sums = DMatrix::from_diagonal(&weights.column_sum());
        Ok(weights - sums)
    }
}

use nalgebra::{DMatrix, Point3};
use numpy::ndarray::{Array2, ArrayView2};
use numpy::{PyArray1, PyArray2, PyReadonlyArray2};
use pyo3::exceptions::{PyIndexError, PyValueError};
use pyo3::prelude::*;

use sphara::geometry::{angles_triangle, area_triangle, side_lens_triangle};
use sphara::{MassMode, MeshError, TriMesh, WeightMode};

/// Raise the Python exception matching a mesh error.
fn to_py_err(err: anyhow::Error) -> PyErr {
    match err.downcast_ref::<MeshError>() {
        Some(MeshError::IndexOutOfRange { .. }) => PyIndexError::new_err(err.to_string()),
        Some(_) => PyValueError::new_err(err.to_string()),
        None => err.into(),
    }
}

/// Convert a Python vertex index, rejecting negative values.
fn vertex_index(value: i64) -> PyResult<usize> {
    usize::try_from(value)
        .map_err(|_| PyIndexError::new_err(format!("The vertex index {value} is negative")))
}

fn triangle_rows(trilist: ArrayView2<'_, i64>) -> PyResult<Vec<Vec<usize>>> {
    trilist
        .rows()
        .into_iter()
        .map(|row| {
            row.iter()
                .map(|index| {
                    usize::try_from(*index).map_err(|_| {
                        PyValueError::new_err(format!("Negative index {index} in the triangle list"))
                    })
                })
                .collect::<PyResult<Vec<usize>>>()
        })
        .collect()
}

fn vertex_rows(vertlist: ArrayView2<'_, f64>) -> Vec<Vec<f64>> {
    vertlist.rows().into_iter().map(|row| row.to_vec()).collect()
}

fn matrix_to_array(matrix: &DMatrix<f64>) -> Array2<f64> {
    Array2::from_shape_fn(matrix.shape(), |(r, c)| matrix[(r, c)])
}

fn triangles_to_array(triangles: &[[usize; 3]]) -> Array2<i64> {
    Array2::from_shape_fn((triangles.len(), 3), |(r, c)| triangles[r][c] as i64)
}

fn points_to_array(points: &[Point3<f64>]) -> Array2<f64> {
    Array2::from_shape_fn((points.len(), 3), |(r, c)| points[r][c])
}

#[pyclass(name = "TriMesh")]
#[derive(Clone)]
pub struct PyTriMesh {
    data: TriMesh,
}

#[pymethods]
impl PyTriMesh {
    #[new]
    /// (pyfunc) Create a new TriMesh from a triangle list and a vertex list.
    pub fn new<'py>(
        trilist: PyReadonlyArray2<'py, i64>,
        vertlist: PyReadonlyArray2<'py, f64>,
    ) -> PyResult<Self> {
        let data = TriMesh::from_rows(
            &triangle_rows(trilist.as_array())?,
            &vertex_rows(vertlist.as_array()),
        )
        .map_err(to_py_err)?;
        Ok(PyTriMesh { data })
    }

    #[getter]
    pub fn get_trilist<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray2<i64>> {
        PyArray2::from_array(py, &triangles_to_array(self.data.trilist()))
    }

    #[setter]
    pub fn set_trilist(&mut self, trilist: PyReadonlyArray2<'_, i64>) -> PyResult<()> {
        self.data
            .set_trilist_rows(&triangle_rows(trilist.as_array())?)
            .map_err(to_py_err)
    }

    #[getter]
    pub fn get_vertlist<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray2<f64>> {
        PyArray2::from_array(py, &points_to_array(self.data.vertlist()))
    }

    #[setter]
    pub fn set_vertlist(&mut self, vertlist: PyReadonlyArray2<'_, f64>) -> PyResult<()> {
        self.data
            .set_vertlist_rows(&vertex_rows(vertlist.as_array()))
            .map_err(to_py_err)
    }

    #[pyo3(signature = (mode = "inv_euclidean"))]
    pub fn weightmatrix<'py>(&self, py: Python<'py>, mode: &str) -> PyResult<Bound<'py, PyArray2<f64>>> {
        let mode = WeightMode::from_string(mode).map_err(to_py_err)?;
        let matrix = self.data.weightmatrix(mode).map_err(to_py_err)?;
        Ok(PyArray2::from_array(py, &matrix_to_array(&matrix)))
    }

    #[pyo3(signature = (mode = "inv_euclidean"))]
    pub fn laplacianmatrix<'py>(
        &self,
        py: Python<'py>,
        mode: &str,
    ) -> PyResult<Bound<'py, PyArray2<f64>>> {
        let mode = WeightMode::from_string(mode).map_err(to_py_err)?;
        let matrix = self.data.laplacianmatrix(mode).map_err(to_py_err)?;
        Ok(PyArray2::from_array(py, &matrix_to_array(&matrix)))
    }

    #[pyo3(signature = (mode = "normal"))]
    pub fn massmatrix<'py>(&self, py: Python<'py>, mode: &str) -> PyResult<Bound<'py, PyArray2<f64>>> {
        let mode = MassMode::from_string(mode).map_err(to_py_err)?;
        let matrix = self.data.massmatrix(mode).map_err(to_py_err)?;
        Ok(PyArray2::from_array(py, &matrix_to_array(&matrix)))
    }

    pub fn stiffnessmatrix<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyArray2<f64>>> {
        let matrix = self.data.stiffnessmatrix().map_err(to_py_err)?;
        Ok(PyArray2::from_array(py, &matrix_to_array(&matrix)))
    }

    #[pyo3(signature = (vertex_index = 0))]
    pub fn one_ring_neighborhood<'py>(
        &self,
        py: Python<'py>,
        vertex_index: i64,
    ) -> PyResult<Bound<'py, PyArray1<i64>>> {
        let neighbors = self
            .data
            .one_ring_neighborhood(self::vertex_index(vertex_index)?)
            .map_err(to_py_err)?;
        Ok(PyArray1::from_vec(
            py,
            neighbors.into_iter().map(|index| index as i64).collect(),
        ))
    }

    #[pyo3(signature = (vertex_index = 0))]
    pub fn adjacent_tri<'py>(
        &self,
        py: Python<'py>,
        vertex_index: i64,
    ) -> PyResult<Bound<'py, PyArray2<i64>>> {
        let triangles = self
            .data
            .adjacent_tri(self::vertex_index(vertex_index)?)
            .map_err(to_py_err)?;
        Ok(PyArray2::from_array(py, &triangles_to_array(&triangles)))
    }

    pub fn is_edge(&self, vertex1_index: i64, vertex2_index: i64) -> PyResult<usize> {
        self.data
            .is_edge(vertex_index(vertex1_index)?, vertex_index(vertex2_index)?)
            .map_err(to_py_err)
    }

    /// (pyfunc) Return a new TriMesh with the given vertices removed.
    pub fn remove_vertices(&self, vertex_index_list: Vec<i64>) -> PyResult<PyTriMesh> {
        let indices = vertex_index_list
            .into_iter()
            .map(vertex_index)
            .collect::<PyResult<Vec<usize>>>()?;
        let data = self.data.remove_vertices(&indices).map_err(to_py_err)?;
        Ok(PyTriMesh { data })
    }

    pub fn __repr__(&self) -> String {
        format!(
            "TriMesh(triangles={}, vertices={})",
            self.data.trilist().len(),
            self.data.vertlist().len()
        )
    }
}

/// (pyfunc) The area of the triangle spanned by three vertices.
#[pyfunction(name = "area_triangle")]
pub fn py_area_triangle(vertex1: [f64; 3], vertex2: [f64; 3], vertex3: [f64; 3]) -> f64 {
    area_triangle(&vertex1.into(), &vertex2.into(), &vertex3.into())
}

/// (pyfunc) The lengths of the sides v1v2, v2v3 and v3v1 of a triangle.
#[pyfunction(name = "side_lens_triangle")]
pub fn py_side_lens_triangle(vertex1: [f64; 3], vertex2: [f64; 3], vertex3: [f64; 3]) -> [f64; 3] {
    side_lens_triangle(&vertex1.into(), &vertex2.into(), &vertex3.into())
}

/// (pyfunc) The internal angles of a triangle in radians.
#[pyfunction(name = "angles_triangle")]
pub fn py_angles_triangle(vertex1: [f64; 3], vertex2: [f64; 3], vertex3: [f64; 3]) -> [f64; 3] {
    angles_triangle(&vertex1.into(), &vertex2.into(), &vertex3.into())
}

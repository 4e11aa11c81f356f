mod mesh;

pub use mesh::{py_angles_triangle, py_area_triangle, py_side_lens_triangle, PyTriMesh};

use pyo3::prelude::*;

/// The `sphara` Python module.
#[pymodule]
#[pyo3(name = "sphara")]
fn sphara_python(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyTriMesh>()?;
    m.add_function(wrap_pyfunction!(py_area_triangle, m)?)?;
    m.add_function(wrap_pyfunction!(py_side_lens_triangle, m)?)?;
    m.add_function(wrap_pyfunction!(py_angles_triangle, m)?)?;
    Ok(())
}

use thiserror::Error;

/// Every failure the mesh operations can produce.
///
/// Public methods return `anyhow::Result` so this is usually seen wrapped
/// in an `anyhow::Error`; use `err.downcast_ref::<MeshError>()` to branch
/// on the kind of failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeshError {
    // a triangle or vertex list that isn't shaped (n, 3)
    #[error("{0}")]
    Shape(String),

    // a weighting or mass mode that couldn't be parsed
    #[error("Unrecognized mode `{0}`")]
    UnrecognizedMode(String),

    // the upper limit is inclusive, see `TriMesh::check_index`
    #[error("The vertex index {index} is out of range 0..={limit}")]
    IndexOutOfRange { index: usize, limit: usize },

    #[error("Vertex index {index} does not exist in a mesh with {vertex_count} vertices")]
    DanglingIndex { index: usize, vertex_count: usize },

    #[error("The triangle list is empty")]
    EmptyTriangleList,

    #[error("No neighbor of vertex {vertex} shares exactly two neighbors with it")]
    NoCollapseCandidate { vertex: usize },

    #[error("Boundary vertex {vertex} has {count} boundary neighbors, expected 2")]
    BoundaryPatch { vertex: usize, count: usize },
}

impl MeshError {
    pub(crate) fn shape(message: impl Into<String>) -> Self {
        MeshError::Shape(message.into())
    }
}

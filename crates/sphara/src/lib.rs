//! Triangular meshes with the discrete Laplace-Beltrami operators used
//! for spatial harmonic analysis, plus vertex removal by half-edge
//! collapses.

pub mod creation;
pub mod error;
pub mod geometry;
pub mod mesh;
pub mod operators;
pub mod simplify;
pub mod topology;

pub use error::MeshError;
pub use geometry::{angles_triangle, area_triangle, side_lens_triangle};
pub use mesh::TriMesh;
pub use operators::{MassMode, WeightMode};
pub use simplify::{Removal, RemoveOptions, StuckPolicy};

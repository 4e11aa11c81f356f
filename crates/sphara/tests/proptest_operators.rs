//! Property-based tests for the operator matrices.
//!
//! Every mesh is a grid of unit cells with each vertex moved by up to
//! 0.2 in every direction, which keeps all triangles well shaped:
//! - weight, Laplacian and mass matrices are exactly symmetric
//! - Laplacian rows sum to zero
//! - unit weights are the adjacency matrix of the triangle edges
//! - lumped mass distributes exactly the mesh area
//! - the stiffness matrix is the negated cotangent Laplacian

use approx::{assert_relative_eq, relative_eq};
use nalgebra::{Point3, Vector3};
use proptest::prelude::*;
use sphara::creation::create_grid;
use sphara::{MassMode, TriMesh, WeightMode};

const WEIGHT_MODES: [WeightMode; 3] = [
    WeightMode::Unit,
    WeightMode::InvEuclidean,
    WeightMode::HalfCotangent,
];

/// Strategy for small grids with jittered vertex positions
fn jittered_grid() -> impl Strategy<Value = TriMesh> {
    (1usize..5, 1usize..5).prop_flat_map(|(nx, ny)| {
        prop::collection::vec(prop::array::uniform3(-0.2f64..0.2), (nx + 1) * (ny + 1)).prop_map(
            move |offsets| {
                let grid = create_grid(nx, ny, 1.0);
                let vertlist: Vec<Point3<f64>> = grid
                    .vertlist()
                    .iter()
                    .zip(offsets)
                    .map(|(point, offset)| point + Vector3::from(offset))
                    .collect();
                let (trilist, _) = grid.into_parts();
                TriMesh::new(trilist, vertlist)
            },
        )
    })
}

proptest! {
    /// Property: all operator matrices equal their transpose
    #[test]
    fn prop_operators_symmetric(mesh in jittered_grid()) {
        for mode in WEIGHT_MODES {
            let weights = mesh.weightmatrix(mode).unwrap();
            prop_assert_eq!(&weights, &weights.transpose());
            let laplacian = mesh.laplacianmatrix(mode).unwrap();
            prop_assert_eq!(&laplacian, &laplacian.transpose());
        }
        for mode in [MassMode::Normal, MassMode::Lumped] {
            let mass = mesh.massmatrix(mode).unwrap();
            prop_assert_eq!(&mass, &mass.transpose());
        }
    }

    /// Property: every row of the Laplacian sums to zero
    #[test]
    fn prop_laplacian_rows_sum_to_zero(mesh in jittered_grid()) {
        for mode in WEIGHT_MODES {
            let laplacian = mesh.laplacianmatrix(mode).unwrap();
            for row in laplacian.row_iter() {
                prop_assert!(
                    row.sum().abs() < 1e-9,
                    "{} Laplacian row sums to {}",
                    mode,
                    row.sum()
                );
            }
        }
    }

    /// Property: unit weights are 1 exactly for vertex pairs on an edge
    #[test]
    fn prop_unit_weights_are_adjacency(mesh in jittered_grid()) {
        let weights = mesh.weightmatrix(WeightMode::Unit).unwrap();
        let size = mesh.matrix_size().unwrap();
        for i in 0..size {
            for j in 0..size {
                let expected = if i != j && mesh.is_edge(i, j).unwrap() > 0 { 1.0 } else { 0.0 };
                prop_assert_eq!(weights[(i, j)], expected);
            }
        }
    }

    /// Property: the lumped mass matrix sums to the mesh area
    #[test]
    fn prop_lumped_mass_is_area(mesh in jittered_grid()) {
        let lumped = mesh.massmatrix(MassMode::Lumped).unwrap();
        let area = mesh.area().unwrap();
        prop_assert!(relative_eq!(lumped.sum(), area, epsilon = 1e-9));
        // the consistent mass matrix distributes the same total
        let normal = mesh.massmatrix(MassMode::Normal).unwrap();
        prop_assert!(relative_eq!(normal.sum(), area, epsilon = 1e-9));
    }

    /// Property: stiffness is the negated cotangent Laplacian
    #[test]
    fn prop_stiffness_is_negated_laplacian(mesh in jittered_grid()) {
        let stiffness = mesh.stiffnessmatrix().unwrap();
        let laplacian = mesh.laplacianmatrix(WeightMode::HalfCotangent).unwrap();
        assert_relative_eq!(stiffness, -laplacian, epsilon = 1e-12);
    }
}

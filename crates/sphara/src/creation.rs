use nalgebra::Point3;

use crate::mesh::TriMesh;

/// Create a mesh of a box centered at the origin with the
/// specified axis aligned bounding box size.
///
/// Parameters
/// -------------
/// extents
///   The size of the box in each dimension.
///
/// Returns
/// -------------
///  A closed TriMesh with 8 vertices and 12 triangles.
pub fn create_box(extents: &[f64; 3]) -> TriMesh {
    let [x, y, z] = extents.map(|e| e / 2.0);

    let vertices = vec![
        Point3::new(-x, -y, -z),
        Point3::new(x, -y, -z),
        Point3::new(x, y, -z),
        Point3::new(-x, y, -z),
        Point3::new(-x, -y, z),
        Point3::new(x, -y, z),
        Point3::new(x, y, z),
        Point3::new(-x, y, z),
    ];

    // two triangles per side of the box
    let faces = vec![
        [0, 1, 2],
        [0, 2, 3],
        [4, 5, 6],
        [4, 6, 7],
        [0, 1, 5],
        [0, 5, 4],
        [2, 3, 7],
        [2, 7, 6],
        [1, 2, 6],
        [1, 6, 5],
        [3, 0, 4],
        [3, 4, 7],
    ];

    TriMesh::new(faces, vertices)
}

/// Create a flat rectangular grid in the XY plane with its first
/// vertex at the origin, split into two triangles per cell along the
/// diagonal running from the lower left to the upper right corner.
///
/// Parameters
/// -------------
/// nx, ny
///   The number of cells along X and Y.
/// spacing
///   The side length of each square cell.
///
/// Returns
/// -------------
///  An open TriMesh with `(nx + 1) * (ny + 1)` vertices numbered row by
///  row along X, and `2 * nx * ny` triangles.
pub fn create_grid(nx: usize, ny: usize, spacing: f64) -> TriMesh {
    let vertices = (0..=ny)
        .flat_map(|j| {
            (0..=nx).map(move |i| Point3::new(i as f64 * spacing, j as f64 * spacing, 0.0))
        })
        .collect();

    let mut faces = Vec::with_capacity(2 * nx * ny);
    for j in 0..ny {
        for i in 0..nx {
            let lower = i + j * (nx + 1);
            let upper = lower + nx + 1;
            faces.push([lower, lower + 1, upper + 1]);
            faces.push([lower, upper + 1, upper]);
        }
    }

    TriMesh::new(faces, vertices)
}

/// Create a regular octahedron centered at the origin with its six
/// vertices on the coordinate axes in the order +X, -X, +Y, -Y, +Z, -Z.
pub fn create_octahedron(radius: f64) -> TriMesh {
    let vertices = vec![
        Point3::new(radius, 0.0, 0.0),
        Point3::new(-radius, 0.0, 0.0),
        Point3::new(0.0, radius, 0.0),
        Point3::new(0.0, -radius, 0.0),
        Point3::new(0.0, 0.0, radius),
        Point3::new(0.0, 0.0, -radius),
    ];

    let faces = vec![
        [0, 2, 4],
        [2, 1, 4],
        [1, 3, 4],
        [3, 0, 4],
        [2, 0, 5],
        [1, 2, 5],
        [3, 1, 5],
        [0, 3, 5],
    ];

    TriMesh::new(faces, vertices)
}

use nalgebra::Point3;

/// The area of the triangle spanned by three vertices, from half the
/// magnitude of the cross product of two of its sides.
///
/// Collinear or coincident vertices give an area of exactly zero.
pub fn area_triangle(vertex1: &Point3<f64>, vertex2: &Point3<f64>, vertex3: &Point3<f64>) -> f64 {
    0.5 * (vertex2 - vertex1).cross(&(vertex3 - vertex1)).norm()
}

/// The three side lengths of a triangle.
///
/// Returns
/// ------------
/// side_lens
///   `[|v1 v2|, |v2 v3|, |v3 v1|]`
pub fn side_lens_triangle(
    vertex1: &Point3<f64>,
    vertex2: &Point3<f64>,
    vertex3: &Point3<f64>,
) -> [f64; 3] {
    [
        (vertex2 - vertex1).norm(),
        (vertex3 - vertex2).norm(),
        (vertex1 - vertex3).norm(),
    ]
}

/// The three internal angles of a triangle in radians.
///
/// The dot products of the unit side vectors are clamped to `[-1, 1]`
/// before `acos` so rounding can't produce a NaN. A zero-length side is
/// not guarded against and gives NaN angles.
///
/// Returns
/// ------------
/// angles
///   `[angle at v1, angle at v2, angle at v3]`
pub fn angles_triangle(
    vertex1: &Point3<f64>,
    vertex2: &Point3<f64>,
    vertex3: &Point3<f64>,
) -> [f64; 3] {
    // unit vectors running around the triangle
    let v1 = (vertex2 - vertex1).normalize();
    let v2 = (vertex3 - vertex2).normalize();
    let v3 = (vertex1 - vertex3).normalize();

    [
        clamped_acos(v1.dot(&-v3)),
        clamped_acos(v2.dot(&-v1)),
        clamped_acos(v3.dot(&-v2)),
    ]
}

/// Half the cotangent of the angle at `apex` between the sides running
/// to `a` and `b`, the cotangent weight contribution of one triangle to
/// the edge opposite `apex`.
///
/// Degenerate sides divide by zero and return NaN or infinity.
pub fn half_cotangent(apex: &Point3<f64>, a: &Point3<f64>, b: &Point3<f64>) -> f64 {
    let vec1 = a - apex;
    let vec2 = b - apex;
    let angle = (vec1.dot(&vec2) / (vec1.norm() * vec2.norm())).acos();
    0.5 * (1.0 / angle.tan())
}

/// The population variance of the three angles of a triangle, zero for an
/// equilateral triangle and growing as it becomes more distorted.
pub fn angle_variance(vertex1: &Point3<f64>, vertex2: &Point3<f64>, vertex3: &Point3<f64>) -> f64 {
    let angles = angles_triangle(vertex1, vertex2, vertex3);
    let mean = angles.iter().sum::<f64>() / 3.0;
    angles.iter().map(|a| (a - mean).powi(2)).sum::<f64>() / 3.0
}

fn clamped_acos(value: f64) -> f64 {
    value.clamp(-1.0, 1.0).acos()
}

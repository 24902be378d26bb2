//! Linear algebra primitives shared by the quadric and solver modules.
//!
//! Thin aliases over `nalgebra` plus the handful of free functions the
//! QEM pipeline needs: plane-from-triangle, the fundamental quadric
//! (outer product `p * p^T`), and a guarded 4x4 inverse.

/// 3-D vector alias, used for positions, normals, and contraction points.
pub type Vec3 = nalgebra::Vector3<f32>;
/// 2-D vector alias, used for UV coordinates.
pub type Vec2 = nalgebra::Vector2<f32>;
/// 4-D vector alias, used for RGBA color and homogeneous points/planes.
pub type Vec4 = nalgebra::Vector4<f32>;
/// 4x4 matrix alias, used for vertex quadrics.
pub type Mat4 = nalgebra::Matrix4<f32>;

/// A plane `n*x + d = 0` with unit-length `n`, stored as `(n.x, n.y, n.z, d)`.
pub type Plane = Vec4;

/// Determinant threshold below which `Q̄` is treated as singular (spec `EPS_DET`).
pub const EPS_DET: f32 = 1e-10;

/// Computes the unit-normal plane equation through `(a, b, c)` in that winding order.
///
/// Returns `None` if the triangle is degenerate (zero-area, so the cross
/// product cannot be normalized) — callers skip such faces entirely.
pub fn face_plane(a: Vec3, b: Vec3, c: Vec3) -> Option<Plane> {
    let normal = (b - a).cross(&(c - a));
    let len = normal.norm();
    if len <= f32::EPSILON {
        return None;
    }
    let n = normal / len;
    let d = -n.dot(&a);
    Some(Vec4::new(n.x, n.y, n.z, d))
}

/// The fundamental quadric `K = p * p^T` of a plane equation.
pub fn fundamental_quadric(p: Plane) -> Mat4 {
    p * p.transpose()
}

/// Evaluates `xᵀ Q x` for the homogeneous point `(v, 1)`.
pub fn quadric_error(q: &Mat4, v: Vec3) -> f32 {
    let x = Vec4::new(v.x, v.y, v.z, 1.0);
    (x.transpose() * q * x)[(0, 0)]
}

/// Builds `Q̄`: `q` with its bottom row replaced by `(0, 0, 0, 1)`.
///
/// This enforces `w = 1` on the solution of `Q̄ * v = (0,0,0,1)ᵀ`.
pub fn constrained_matrix(q: &Mat4) -> Mat4 {
    let mut qbar = *q;
    qbar[(3, 0)] = 0.0;
    qbar[(3, 1)] = 0.0;
    qbar[(3, 2)] = 0.0;
    qbar[(3, 3)] = 1.0;
    qbar
}

/// Attempts to solve `Q̄ * v = (0,0,0,1)ᵀ`, returning the homogeneous
/// solution's `xyz` part when `Q̄` is non-singular (per `EPS_DET`).
pub fn try_solve_optimal(qbar: &Mat4) -> Option<Vec3> {
    let det = qbar.determinant();
    if det.abs() <= EPS_DET {
        return None;
    }
    let inv = qbar.try_inverse()?;
    let rhs = Vec4::new(0.0, 0.0, 0.0, 1.0);
    let sol = inv * rhs;
    Some(Vec3::new(sol.x, sol.y, sol.z))
}

//! Plane & quadric computation (spec §4.2): the fundamental quadric of
//! a face's frozen plane equation, and the one-time bulk pass that
//! seeds every vertex's quadric from its incident live faces.

use log::debug;

use crate::math::{fundamental_quadric, Mat4};
use crate::mesh::Mesh;

/// Largest absolute component of a 4x4 matrix — used only by tests to
/// compare quadrics within an epsilon.
#[cfg(test)]
fn max_abs(m: &Mat4) -> f32 {
    m.iter().cloned().fold(0.0f32, |acc, x| acc.max(x.abs()))
}

/// Computes every vertex's quadric as the sum of fundamental quadrics
/// of its live incident faces, in a single O(F) pass over faces
/// (not O(V·F) — each face's quadric is computed once and added to
/// all three of its vertices).
///
/// Idempotent: calling this twice in a row (e.g. after a fresh build
/// and again before the first `simplify_step`) yields identical
/// quadrics, since it always starts by zeroing every vertex's quadric.
pub fn compute_all_quadrics(mesh: &mut Mesh) {
    for v in mesh.vertices.iter_mut() {
        v.quadric.fill(0.0);
    }

    for face in mesh.faces.iter().filter(|f| !f.deleted) {
        let k = fundamental_quadric(face.plane);
        mesh.vertices[face.a].quadric += k;
        mesh.vertices[face.b].quadric += k;
        mesh.vertices[face.c].quadric += k;
    }

    debug!(
        "compute_all_quadrics: seeded {} vertex quadrics from {} live faces",
        mesh.vertices.len(),
        mesh.live_face_count(),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Vec2, Vec3, Vec4};

    fn unit_triangle() -> Mesh {
        let mut mesh = Mesh::new();
        let a = mesh.push_vertex(Vec3::new(0.0, 0.0, 0.0), Vec3::zeros(), Vec2::zeros(), Vec4::zeros());
        let b = mesh.push_vertex(Vec3::new(1.0, 0.0, 0.0), Vec3::zeros(), Vec2::zeros(), Vec4::zeros());
        let c = mesh.push_vertex(Vec3::new(0.0, 1.0, 0.0), Vec3::zeros(), Vec2::zeros(), Vec4::zeros());
        let plane = crate::math::face_plane(
            mesh.vertices[a].position,
            mesh.vertices[b].position,
            mesh.vertices[c].position,
        )
        .unwrap();
        mesh.push_face(a, b, c, plane);
        mesh
    }

    #[test]
    fn planar_mesh_quadric_is_positive_multiple_of_plane_outer_product() {
        let mut mesh = unit_triangle();
        compute_all_quadrics(&mut mesh);
        let plane = mesh.faces[0].plane;
        let expected = fundamental_quadric(plane);
        for v in &mesh.vertices {
            // Each vertex touches exactly one face here, so quadric == expected exactly.
            assert!(max_abs(&(v.quadric - expected)) < 1e-6);
        }
    }

    #[test]
    fn is_idempotent_across_repeated_calls() {
        let mut mesh = unit_triangle();
        compute_all_quadrics(&mut mesh);
        let first: Vec<_> = mesh.vertices.iter().map(|v| v.quadric).collect();
        compute_all_quadrics(&mut mesh);
        for (v, expected) in mesh.vertices.iter().zip(first.iter()) {
            assert!(max_abs(&(v.quadric - expected)) < 1e-9);
        }
    }

    #[test]
    fn edge_case_vertex_with_no_faces_has_zero_quadric() {
        let mut mesh = unit_triangle();
        mesh.push_vertex(Vec3::new(9.0, 9.0, 9.0), Vec3::zeros(), Vec2::zeros(), Vec4::zeros());
        compute_all_quadrics(&mut mesh);
        let isolated = &mesh.vertices[3];
        assert!(max_abs(&isolated.quadric) < 1e-9);
    }
}

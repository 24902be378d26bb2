//! Mesh builder: welds unindexed triangle soup into a topological
//! mesh via spatial hashing, skips degenerate triangles, and extracts
//! the unique undirected edge set (spec §4.1).

use std::collections::HashMap;

use log::info;

use crate::math::{Vec2, Vec3, Vec4};
use crate::mesh::{BuildReport, Mesh};

/// Per-corner attributes fed to the builder. One per triangle corner,
/// three consecutive corners forming one input triangle.
#[derive(Clone, Copy, Debug)]
pub struct Corner {
    pub position: Vec3,
    pub uv: Vec2,
    pub normal: Vec3,
}

/// Spatial-hash cell size for vertex welding (spec `GRID`).
pub const GRID: f32 = 1e-3;
/// Distance threshold below which two corners weld to the same vertex (spec `EPS_WELD`).
pub const EPS_WELD: f32 = 1e-4;

type CellKey = (i64, i64, i64);

fn cell_key(p: Vec3) -> CellKey {
    (
        (p.x / GRID).floor() as i64,
        (p.y / GRID).floor() as i64,
        (p.z / GRID).floor() as i64,
    )
}

/// Welds `corners` (length must be a multiple of 3; the façade
/// validates this before calling in) into a [`Mesh`], skipping
/// degenerate triangles, and reports the resulting counts.
pub fn build(corners: &[Corner]) -> (Mesh, BuildReport) {
    debug_assert_eq!(corners.len() % 3, 0, "caller must pre-validate stream length");

    let mut mesh = Mesh::new();
    let mut cells: HashMap<CellKey, Vec<usize>> = HashMap::new();
    let mut unique_index = vec![0usize; corners.len()];

    for (i, corner) in corners.iter().enumerate() {
        unique_index[i] = weld_corner(&mut mesh, &mut cells, corner);
    }

    let mut degenerate_triangles_skipped = 0usize;
    let mut edge_set: HashMap<(usize, usize), ()> = HashMap::new();

    for tri in 0..corners.len() / 3 {
        let base = tri * 3;
        let a = unique_index[base];
        let b = unique_index[base + 1];
        let c = unique_index[base + 2];

        if a == b || b == c || a == c {
            degenerate_triangles_skipped += 1;
            continue;
        }

        let plane = match crate::math::face_plane(
            mesh.vertices[a].position,
            mesh.vertices[b].position,
            mesh.vertices[c].position,
        ) {
            Some(p) => p,
            None => {
                // Zero-area after welding even though indices differ
                // (near-colinear corners); skip like any other degenerate face.
                degenerate_triangles_skipped += 1;
                continue;
            }
        };

        mesh.push_face(a, b, c, plane);
        for &(lo, hi) in &undirected_edges(a, b, c) {
            edge_set.entry((lo, hi)).or_insert_with(|| {
                mesh.push_edge(lo, hi);
            });
        }
    }

    let report = BuildReport {
        unique_vertex_count: mesh.vertices.len(),
        face_count: mesh.faces.len(),
        edge_count: mesh.edges.len(),
        degenerate_triangles_skipped,
    };

    info!(
        "build_mesh: {} corners -> {} unique vertices, {} faces, {} edges ({} degenerate skipped)",
        corners.len(),
        report.unique_vertex_count,
        report.face_count,
        report.edge_count,
        report.degenerate_triangles_skipped,
    );

    (mesh, report)
}

fn undirected_edges(a: usize, b: usize, c: usize) -> [(usize, usize); 3] {
    let pair = |x: usize, y: usize| if x < y { (x, y) } else { (y, x) };
    [pair(a, b), pair(b, c), pair(c, a)]
}

fn weld_corner(mesh: &mut Mesh, cells: &mut HashMap<CellKey, Vec<usize>>, corner: &Corner) -> usize {
    let key = cell_key(corner.position);
    if let Some(candidates) = cells.get(&key) {
        for &idx in candidates {
            if (mesh.vertices[idx].position - corner.position).norm() < EPS_WELD {
                return idx;
            }
        }
    }
    let idx = mesh.push_vertex(corner.position, corner.normal, corner.uv, Vec4::zeros());
    cells.entry(key).or_default().push(idx);
    idx
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corner(x: f32, y: f32, z: f32) -> Corner {
        Corner {
            position: Vec3::new(x, y, z),
            uv: Vec2::zeros(),
            normal: Vec3::new(0.0, 0.0, 1.0),
        }
    }

    /// Scenario S1: unit-square welding (two triangles sharing a diagonal).
    #[test]
    fn unit_square_welds_to_four_vertices_two_faces_five_edges() {
        let corners = vec![
            corner(0.0, 0.0, 0.0),
            corner(1.0, 0.0, 0.0),
            corner(1.0, 1.0, 0.0),
            corner(0.0, 0.0, 0.0),
            corner(1.0, 1.0, 0.0),
            corner(0.0, 1.0, 0.0),
        ];
        let (mesh, report) = build(&corners);
        assert_eq!(report.unique_vertex_count, 4);
        assert_eq!(report.face_count, 2);
        assert_eq!(report.edge_count, 5);
        assert_eq!(mesh.vertices.len(), 4);
    }

    /// Scenario S4: degenerate input triangle is skipped, and no edge
    /// ends up referencing only the repeated vertex.
    #[test]
    fn degenerate_triangle_is_skipped() {
        let a = corner(0.0, 0.0, 0.0);
        let b = corner(5.0, 0.0, 0.0);
        let corners = vec![a, a, b];
        let (mesh, report) = build(&corners);
        assert_eq!(report.face_count, 0);
        assert_eq!(report.degenerate_triangles_skipped, 1);
        assert!(mesh.edges.is_empty());
    }

    #[test]
    fn near_duplicate_positions_weld_within_epsilon() {
        let corners = vec![
            corner(0.0, 0.0, 0.0),
            corner(1.0, 0.0, 0.0),
            corner(0.0, 1.0, 0.0),
            corner(0.00005, 0.00005, 0.0), // within EPS_WELD of (0,0,0)
            corner(1.0, 0.0, 0.0),
            corner(0.0, 1.0, 0.0),
        ];
        let (_, report) = build(&corners);
        assert_eq!(report.unique_vertex_count, 3);
        assert_eq!(report.face_count, 2);
    }

    #[test]
    fn empty_input_produces_empty_mesh() {
        let (mesh, report) = build(&[]);
        assert_eq!(report.face_count, 0);
        assert!(mesh.vertices.is_empty());
    }

    /// build_mesh on an already-unique, well-formed mesh is a strict identity
    /// on counts (no accidental welding of genuinely distinct vertices).
    #[test]
    fn already_unique_mesh_round_trips_counts() {
        let corners = vec![
            corner(0.0, 0.0, 0.0),
            corner(1.0, 0.0, 0.0),
            corner(0.0, 1.0, 0.0),
            corner(2.0, 2.0, 2.0),
            corner(3.0, 2.0, 2.0),
            corner(2.0, 3.0, 2.0),
        ];
        let (_, report) = build(&corners);
        assert_eq!(report.unique_vertex_count, 6);
        assert_eq!(report.face_count, 2);
    }
}

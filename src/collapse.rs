//! Edge collapse (spec §4.4): the single mutating operation that
//! merges two vertices, removes 1–2 triangles, and re-derives the
//! surviving vertex's quadric and its neighboring edges' costs.

use crate::mesh::Mesh;
use crate::solver;

/// Result of collapsing one edge: the surviving vertex, and every
/// edge index whose cost/position was refreshed as a side effect
/// (the scheduler marks these `dirty` for *future* rounds per §4.5).
pub struct CollapseResult {
    pub surviving_vertex: usize,
    pub removed_vertex: usize,
    pub refreshed_edges: Vec<usize>,
}

/// Collapses `edge_idx` using its current `optimal_position`. The
/// caller (the scheduler) is responsible for having validated that the
/// edge is live and not dirty before calling this.
pub fn collapse_edge(mesh: &mut Mesh, edge_idx: usize) -> CollapseResult {
    let edge = mesh.edges[edge_idx].clone();
    let (v1, v2) = (edge.v1, edge.v2);
    let optimal = edge.optimal_position;

    // Open Question #1 (spec §9): compute the UV/color interpolation
    // ratio from the *pre-collapse* endpoint positions, before v1's
    // position is overwritten below.
    let p1_pre = mesh.vertices[v1].position;
    let p2_pre = mesh.vertices[v2].position;
    let span = (p2_pre - p1_pre).norm();
    let t = if span < 1e-10 {
        0.5
    } else {
        ((optimal - p1_pre).norm() / span).clamp(0.0, 1.0)
    };

    // Step 1: move v1, tombstone v2 and the edge itself.
    mesh.vertices[v1].position = optimal;
    mesh.vertices[v2].deleted = true;
    mesh.edges[edge_idx].deleted = true;

    // Step 6 (computed here, applied before step 4 needs the new face
    // set only for quadrics, not attributes): interpolate UV/color.
    let uv2 = mesh.vertices[v2].uv;
    let color2 = mesh.vertices[v2].color;
    mesh.vertices[v1].uv += (uv2 - mesh.vertices[v1].uv) * t;
    mesh.vertices[v1].color += (color2 - mesh.vertices[v1].color) * t;

    // Step 2: rewrite every live edge referencing v2 to v1.
    let mut affected = mesh.rewrite_edges(v2, v1);
    affected.retain(|&idx| idx != edge_idx);

    // Step 3: rewrite every live face referencing v2 to v1, tombstoning
    // any that become degenerate.
    mesh.rewrite_faces(v2, v1);

    // Step 4: recompute v1's quadric from the now-updated face set.
    mesh.requadric_vertex(v1);

    // Step 5: refresh cost/optimal_position for every affected edge.
    for &idx in &affected {
        refresh_edge_cost(mesh, idx);
    }

    CollapseResult {
        surviving_vertex: v1,
        removed_vertex: v2,
        refreshed_edges: affected,
    }
}

/// Recomputes one edge's cost and optimal position via the solver and
/// clears its dirty flag (spec §4.4 step 5 / §4.5 dirty revalidation).
pub fn refresh_edge_cost(mesh: &mut Mesh, edge_idx: usize) {
    let (v1, v2) = {
        let e = &mesh.edges[edge_idx];
        (e.v1, e.v2)
    };
    let result = solver::solve(
        &mesh.vertices[v1].quadric,
        &mesh.vertices[v2].quadric,
        mesh.vertices[v1].position,
        mesh.vertices[v2].position,
    );
    let e = &mut mesh.edges[edge_idx];
    e.cost = result.cost;
    e.optimal_position = result.position;
    e.dirty = false;
}

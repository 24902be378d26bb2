//! Cost solver (spec §4.3): given the two live vertices of an edge,
//! computes the error-minimizing contraction position and its cost.
//!
//! The solver is a total function — it never fails. A singular `Q̄`
//! (planar or colinear neighborhood) falls back to the minimum-cost of
//! three candidates instead of propagating an error.

use crate::math::{constrained_matrix, quadric_error, try_solve_optimal, Mat4, Vec3};

/// The winning contraction position and its QEM cost for an edge
/// whose two endpoints carry quadrics `q1`/`q2`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeCost {
    pub position: Vec3,
    pub cost: f32,
}

/// Solves for the optimal contraction position of an edge between two
/// vertices with quadrics `q1`/`q2` and positions `p1`/`p2`.
///
/// Cost is always evaluated against the *un-constrained* summed
/// quadric `Q = q1 + q2`, even when the position comes from `Q̄`'s
/// inverse — `Q̄` discards error along the `w` axis by construction,
/// so using it for the cost too would understate error.
pub fn solve(q1: &Mat4, q2: &Mat4, p1: Vec3, p2: Vec3) -> EdgeCost {
    let q = q1 + q2;
    let qbar = constrained_matrix(&q);

    if let Some(position) = try_solve_optimal(&qbar) {
        let cost = quadric_error(&q, position);
        return EdgeCost { position, cost };
    }

    // Singular fallback: evaluate p1, p2, and their midpoint; keep the
    // minimum-cost candidate (spec §4.3).
    let midpoint = (p1 + p2) * 0.5;
    [p1, p2, midpoint]
        .into_iter()
        .map(|pos| EdgeCost {
            position: pos,
            cost: quadric_error(&q, pos),
        })
        .min_by(|a, b| a.cost.partial_cmp(&b.cost).unwrap_or(std::cmp::Ordering::Equal))
        .expect("three candidates is never empty")
}

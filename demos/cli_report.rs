//! Tiny CLI demo: builds a procedural mesh, drives the simplification
//! engine to half its original face count, and prints a before/after
//! report as JSON. Mirrors the teacher's `run_native()` init pattern
//! (`env_logger::init()`) minus all the windowing/wgpu.

use quadric_simplify::{Corner, SimplificationEngine};

/// A flat, N x N grid of two-triangle quads — enough topology to
/// exercise several rounds of collapse without needing a mesh loader
/// (out of scope for this core; see DESIGN.md).
fn procedural_grid(n: usize) -> Vec<Corner> {
    let mut corners = Vec::with_capacity(n * n * 6);
    for iz in 0..n {
        for ix in 0..n {
            let x = ix as f32;
            let z = iz as f32;
            let a = [x, 0.0, z];
            let b = [x + 1.0, 0.0, z];
            let c = [x + 1.0, 0.0, z + 1.0];
            let d = [x, 0.0, z + 1.0];
            let up = [0.0, 1.0, 0.0];
            corners.push(Corner::new(a, [0.0, 0.0], up));
            corners.push(Corner::new(b, [1.0, 0.0], up));
            corners.push(Corner::new(c, [1.0, 1.0], up));
            corners.push(Corner::new(a, [0.0, 0.0], up));
            corners.push(Corner::new(c, [1.0, 1.0], up));
            corners.push(Corner::new(d, [0.0, 1.0], up));
        }
    }
    corners
}

fn main() {
    env_logger::init();

    let corners = procedural_grid(24);
    let mut engine = SimplificationEngine::build_mesh(&corners).expect("well-formed procedural stream");

    let before = engine.stats();
    log::info!("before: {before:?}");

    let target = before.live_faces / 2;
    let budget = (before.total_vertices / 100).max(1);
    engine.simplify_to_face_count(target, budget);

    let after = engine.stats();
    log::info!("after: {after:?}");

    let report = serde_json::json!({
        "before": before,
        "after": after,
        "target_faces": target,
    });
    println!("{}", serde_json::to_string_pretty(&report).expect("Stats/BuildReport serialize"));
}

// src/lib.rs
//! Quadric Error Metric (QEM) mesh simplification core.
//!
//! Given raw per-triangle position/UV/normal streams, this crate
//! welds them into a topological mesh, seeds per-vertex quadrics,
//! and incrementally contracts edges in order of geometric distortion
//! via [`SimplificationEngine`]. Mesh file parsing, GPU upload, shader
//! compilation, windowing, input, and texture loading are all external
//! collaborators this crate does not touch — see `DESIGN.md`.
//!
//! ```
//! use quadric_simplify::{Corner, SimplificationEngine};
//!
//! let corners = vec![
//!     Corner::new([0.0, 0.0, 0.0], [0.0, 0.0], [0.0, 0.0, 1.0]),
//!     Corner::new([1.0, 0.0, 0.0], [1.0, 0.0], [0.0, 0.0, 1.0]),
//!     Corner::new([1.0, 1.0, 0.0], [1.0, 1.0], [0.0, 0.0, 1.0]),
//! ];
//! let mut engine = SimplificationEngine::build_mesh(&corners).unwrap();
//! let performed = engine.simplify_step(1);
//! // A lone triangle's three edges all carry the same planar quadric, so
//! // every candidate position lies exactly on the plane at zero cost —
//! // the first one collapses immediately.
//! assert_eq!(performed, 1);
//! let snap = engine.snapshot();
//! // That collapse merges two of the triangle's three corners, degenerating
//! // its only face, so nothing live remains.
//! assert_eq!(snap.indices.len(), 0);
//! ```

pub mod builder;
pub mod collapse;
pub mod error;
pub mod math;
pub mod mesh;
pub mod quadric;
pub mod scheduler;
pub mod solver;

pub use builder::Corner as RawCorner;
pub use error::{Error, Result};
pub use mesh::{BuildReport, Snapshot, Stats};

use log::info;

use crate::math::{Vec2, Vec3};
use crate::mesh::Mesh;
use crate::scheduler::Scheduler;

/// One triangle corner's attributes, in the host's own units — the
/// host must already have applied any UV Y-flip (spec §6).
///
/// Meshes lacking UV/normal attributes should supply `uv: [0.0, 0.0]`
/// and `normal: [0.0, 0.0, 1.0]`.
#[derive(Clone, Copy, Debug)]
pub struct Corner {
    pub position: [f32; 3],
    pub uv: [f32; 2],
    pub normal: [f32; 3],
}

impl Corner {
    pub fn new(position: [f32; 3], uv: [f32; 2], normal: [f32; 3]) -> Self {
        Self { position, uv, normal }
    }
}

impl From<Corner> for builder::Corner {
    fn from(c: Corner) -> Self {
        builder::Corner {
            position: Vec3::new(c.position[0], c.position[1], c.position[2]),
            uv: Vec2::new(c.uv[0], c.uv[1]),
            normal: Vec3::new(c.normal[0], c.normal[1], c.normal[2]),
        }
    }
}

/// Tunable knobs for the simplification run, following the teacher's
/// builder-with-chained-setters option-struct convention.
#[derive(Clone, Copy, Debug)]
pub struct SimplificationConfig {
    /// Ratio used to derive a default per-call collapse budget when
    /// the caller doesn't pass one explicitly (spec §4.5: `original/100`).
    pub default_budget_divisor: usize,
}

impl Default for SimplificationConfig {
    fn default() -> Self {
        Self {
            default_budget_divisor: 100,
        }
    }
}

impl SimplificationConfig {
    pub fn default_budget_divisor(mut self, divisor: usize) -> Self {
        self.default_budget_divisor = divisor.max(1);
        self
    }
}

/// The external façade: `build_mesh`, `simplify_step`, `snapshot`,
/// `stats` (spec §6). Strictly single-threaded and synchronous — the
/// host calls `simplify_step` from its own main thread between frames
/// (spec §5).
pub struct SimplificationEngine {
    mesh: Mesh,
    scheduler: Scheduler,
    config: SimplificationConfig,
    original_vertex_count: usize,
}

impl SimplificationEngine {
    /// Welds a flat triangle-corner stream into a mesh, computes every
    /// vertex's initial quadric, and returns a ready-to-simplify engine.
    ///
    /// `corners.len()` must be a multiple of 3 (a whole number of
    /// triangles); anything else is a caller-contract violation
    /// (spec §7) and is reported as [`Error::MalformedTriangleStream`]
    /// rather than panicking.
    pub fn build_mesh(corners: &[Corner]) -> Result<Self> {
        Self::build_mesh_with_config(corners, SimplificationConfig::default())
    }

    pub fn build_mesh_with_config(corners: &[Corner], config: SimplificationConfig) -> Result<Self> {
        if corners.len() % 3 != 0 {
            return Err(Error::MalformedTriangleStream {
                corner_count: corners.len(),
            });
        }

        let raw: Vec<builder::Corner> = corners.iter().copied().map(Into::into).collect();
        let (mut mesh, report) = builder::build(&raw);
        quadric::compute_all_quadrics(&mut mesh);

        info!(
            "SimplificationEngine::build_mesh: {} unique vertices, {} faces, {} edges",
            report.unique_vertex_count, report.face_count, report.edge_count
        );

        Ok(Self {
            original_vertex_count: mesh.vertices.len(),
            mesh,
            scheduler: Scheduler::new(),
            config,
        })
    }

    /// Performs up to `budget` edge collapses (or fewer if the heap
    /// empties first), returning the count actually performed.
    pub fn simplify_step(&mut self, budget: usize) -> usize {
        self.scheduler.simplify_step(&mut self.mesh, budget)
    }

    /// Drives `simplify_step` with the default budget derived from
    /// `SimplificationConfig::default_budget_divisor` and the mesh's
    /// original vertex count (spec §4.5).
    pub fn simplify_step_default(&mut self) -> usize {
        let budget = (self.original_vertex_count / self.config.default_budget_divisor).max(1);
        self.simplify_step(budget)
    }

    /// Drives `simplify_step` repeatedly until `target_faces` is
    /// reached or the heap empties, whichever comes first. There is no
    /// explicit target-face-count concept in the scheduler itself
    /// (spec §4.5); this is the façade layering that policy on top,
    /// the way a host renderer would.
    pub fn simplify_to_face_count(&mut self, target_faces: usize, budget: usize) -> usize {
        let mut total = 0;
        while self.mesh.live_face_count() > target_faces {
            let performed = self.simplify_step(budget.max(1));
            total += performed;
            if performed == 0 {
                break;
            }
        }
        total
    }

    /// A read-only, GPU-streamable view of the current live mesh.
    pub fn snapshot(&self) -> Snapshot {
        self.mesh.snapshot()
    }

    /// Running counters: total/deleted vertices, live faces/edges, heap size.
    pub fn stats(&self) -> Stats {
        self.mesh.stats(self.scheduler.heap_size())
    }

    /// Direct access to the underlying mesh, for callers that need
    /// finer-grained inspection than `snapshot()`/`stats()` provide
    /// (e.g. test harnesses checking invariants).
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }
}

//! Simplification scheduler (spec §4.5): a priority queue of edge-cost
//! snapshots with lazy revalidation via dirty flags and stale-entry
//! discard on pop, batched by an explicit per-call collapse budget.
//!
//! This replaces the teacher's `mesh_optimizer.rs` approach of
//! re-sorting a `Vec` every iteration (`candidates.sort_by(..);
//! candidates.remove(0)`) with a real `BinaryHeap`, since spec §4.5
//! explicitly mandates the "push on mutation, discard stale on pop"
//! design — decrease-key without decrease-key.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use log::{debug, trace};

use crate::collapse::{collapse_edge, refresh_edge_cost};
use crate::mesh::Mesh;

/// A cost snapshot pushed onto the heap. Min-cost-first ordering is
/// implemented by reversing the natural `f32` comparison, since
/// `BinaryHeap` is a max-heap.
#[derive(Clone, Copy, Debug)]
struct Candidate {
    cost: f32,
    v1: usize,
    v2: usize,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost
    }
}
impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap pops the greatest element, and we want
        // the lowest cost popped first.
        other
            .cost
            .partial_cmp(&self.cost)
            .unwrap_or(Ordering::Equal)
    }
}

/// Drives the edge heap and the collapse loop. Owned indices and
/// value copies of edges only — the mesh arrays remain the sole
/// source of truth (spec §3 "Ownership").
pub struct Scheduler {
    heap: BinaryHeap<Candidate>,
    initialized: bool,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            initialized: false,
        }
    }

    pub fn heap_size(&self) -> usize {
        self.heap.len()
    }

    fn lazy_init(&mut self, mesh: &mut Mesh) {
        if self.initialized {
            return;
        }
        for idx in 0..mesh.edges.len() {
            if mesh.edges[idx].deleted {
                continue;
            }
            refresh_edge_cost(mesh, idx);
            self.push_current(mesh, idx);
        }
        self.initialized = true;
        trace!("scheduler: lazily initialized {} edge candidates", self.heap.len());
    }

    fn push_current(&mut self, mesh: &Mesh, edge_idx: usize) {
        let e = &mesh.edges[edge_idx];
        self.heap.push(Candidate {
            cost: e.cost,
            v1: e.v1,
            v2: e.v2,
        });
    }

    /// Finds the live edge index whose endpoints match `v1`/`v2` in
    /// either order, per spec §4.5 step 2 (a linear scan — spec §9
    /// Open Question #2 notes a hash index as a future optimization,
    /// not a requirement).
    fn find_live_edge(mesh: &Mesh, v1: usize, v2: usize) -> Option<usize> {
        mesh.edges
            .iter()
            .position(|e| !e.deleted && e.matches(v1, v2))
    }

    /// Performs up to `budget` edge collapses, or until the heap is
    /// exhausted, whichever comes first. Returns the number of
    /// collapses actually performed.
    pub fn simplify_step(&mut self, mesh: &mut Mesh, budget: usize) -> usize {
        self.lazy_init(mesh);

        let mut performed = 0;
        while performed < budget {
            let Some(candidate) = self.heap.pop() else {
                break;
            };

            let Some(edge_idx) = Self::find_live_edge(mesh, candidate.v1, candidate.v2) else {
                // Stale: the logical edge no longer exists live. Discard.
                continue;
            };

            if mesh.edges[edge_idx].dirty {
                refresh_edge_cost(mesh, edge_idx);
                self.push_current(mesh, edge_idx);
                continue;
            }

            let result = collapse_edge(mesh, edge_idx);
            performed += 1;

            // Mark every edge incident to the surviving vertex dirty
            // and push a fresh snapshot for each — their costs were
            // just refreshed in collapse_edge's step 5; the dirty flag
            // is for *future* rounds when those edges are in turn
            // affected by another collapse (spec §4.5 step 4).
            for idx in mesh.edges_incident_to(result.surviving_vertex) {
                mesh.edges[idx].dirty = true;
                self.push_current(mesh, idx);
            }
        }

        debug!(
            "simplify_step: budget={budget} performed={performed} heap_size={}",
            self.heap.len()
        );
        performed
    }

    /// Default per-call budget per spec §4.5: `original_vertex_count / 100`.
    pub fn default_budget(original_vertex_count: usize) -> usize {
        (original_vertex_count / 100).max(1)
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

//! Mesh data model: arena-indexed vertex/edge/face records with
//! tombstone flags, per spec §3.
//!
//! Nothing here is ever physically removed once the mesh is built —
//! only tombstoned — so every index handed out by [`Mesh`] stays valid
//! for the life of the mesh. This is what makes `Snapshot` cheap and
//! what lets the scheduler hold bare indices into the heap without any
//! generational-index bookkeeping.

use serde::{Deserialize, Serialize};

use crate::math::{Mat4, Vec2, Vec3, Vec4};

/// A welded mesh vertex. `quadric` is authoritative for the
/// *immediately-prior* topology until refreshed by a collapse that
/// touches it — see the mesh-wide invariant in spec §3.
#[derive(Clone, Debug)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
    pub color: Vec4,
    pub quadric: Mat4,
    pub deleted: bool,
}

impl Vertex {
    fn new(position: Vec3, normal: Vec3, uv: Vec2, color: Vec4) -> Self {
        Self {
            position,
            normal,
            uv,
            color,
            quadric: Mat4::zeros(),
            deleted: false,
        }
    }
}

/// A triangular face with a frozen plane equation.
///
/// `plane` is computed once at build time and never recomputed after
/// a collapse — vertex quadrics already captured the original
/// geometry, so refreshing it here would make cost measure deviation
/// from the current (drifted) surface instead of the original one.
/// Do not "fix" this; it is load-bearing (spec §9).
#[derive(Clone, Debug)]
pub struct Face {
    pub a: usize,
    pub b: usize,
    pub c: usize,
    pub plane: Vec4,
    pub deleted: bool,
}

impl Face {
    pub fn indices(&self) -> [usize; 3] {
        [self.a, self.b, self.c]
    }

    fn contains(&self, v: usize) -> bool {
        self.a == v || self.b == v || self.c == v
    }

    fn replace(&mut self, from: usize, to: usize) {
        if self.a == from {
            self.a = to;
        }
        if self.b == from {
            self.b = to;
        }
        if self.c == from {
            self.c = to;
        }
    }

    fn is_degenerate(&self) -> bool {
        self.a == self.b || self.b == self.c || self.a == self.c
    }
}

/// An undirected edge between two live vertices.
///
/// `v1`/`v2` are ordered `(min, max)` only at construction time; after
/// collapses rewrite an endpoint, order is not maintained and is not
/// meaningful for correctness (spec §3).
#[derive(Clone, Debug)]
pub struct Edge {
    pub v1: usize,
    pub v2: usize,
    pub cost: f32,
    pub optimal_position: Vec3,
    pub dirty: bool,
    pub deleted: bool,
}

impl Edge {
    fn new(v1: usize, v2: usize) -> Self {
        let (lo, hi) = if v1 < v2 { (v1, v2) } else { (v2, v1) };
        Self {
            v1: lo,
            v2: hi,
            cost: 0.0,
            optimal_position: Vec3::zeros(),
            dirty: true,
            deleted: false,
        }
    }

    /// Returns `true` if this edge's endpoints are `{v1, v2}` in either order.
    pub fn matches(&self, v1: usize, v2: usize) -> bool {
        (self.v1 == v1 && self.v2 == v2) || (self.v1 == v2 && self.v2 == v1)
    }

    fn other(&self, v: usize) -> usize {
        if self.v1 == v {
            self.v2
        } else {
            self.v1
        }
    }
}

/// Read-only summary returned by `build_mesh` (spec §6).
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct BuildReport {
    pub unique_vertex_count: usize,
    pub face_count: usize,
    pub edge_count: usize,
    pub degenerate_triangles_skipped: usize,
}

/// Running counters returned by `stats()` (spec §6).
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct Stats {
    pub total_vertices: usize,
    pub deleted_vertices: usize,
    pub live_faces: usize,
    pub live_edges: usize,
    pub heap_size: usize,
}

/// The arena-owned mesh: vertices, faces, and edges, all tombstoned
/// rather than removed. Owned exclusively by the façade/scheduler
/// during a `simplify_step` call (spec §5).
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub faces: Vec<Face>,
    pub edges: Vec<Edge>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_vertex(&mut self, position: Vec3, normal: Vec3, uv: Vec2, color: Vec4) -> usize {
        let idx = self.vertices.len();
        self.vertices.push(Vertex::new(position, normal, uv, color));
        idx
    }

    pub(crate) fn push_face(&mut self, a: usize, b: usize, c: usize, plane: Vec4) -> usize {
        let idx = self.faces.len();
        self.faces.push(Face {
            a,
            b,
            c,
            plane,
            deleted: false,
        });
        idx
    }

    pub(crate) fn push_edge(&mut self, v1: usize, v2: usize) -> usize {
        let idx = self.edges.len();
        self.edges.push(Edge::new(v1, v2));
        idx
    }

    pub fn live_face_count(&self) -> usize {
        self.faces.iter().filter(|f| !f.deleted).count()
    }

    pub fn live_edge_count(&self) -> usize {
        self.edges.iter().filter(|e| !e.deleted).count()
    }

    pub fn deleted_vertex_count(&self) -> usize {
        self.vertices.iter().filter(|v| v.deleted).count()
    }

    /// Faces currently incident on `v` (live only). O(F); callers that
    /// need this per-collapse are the documented O(V·F) hotspot of
    /// spec §9 — an adjacency list is a valid optimization the public
    /// contract does not mandate.
    pub(crate) fn faces_incident_to(&self, v: usize) -> impl Iterator<Item = &Face> {
        self.faces.iter().filter(move |f| !f.deleted && f.contains(v))
    }

    /// Rewrites every live face referencing `from` to reference `to`,
    /// tombstoning any face that becomes degenerate as a result.
    /// Returns the count of faces tombstoned this call.
    pub(crate) fn rewrite_faces(&mut self, from: usize, to: usize) -> usize {
        let mut removed = 0;
        for face in self.faces.iter_mut().filter(|f| !f.deleted) {
            if face.contains(from) {
                face.replace(from, to);
                if face.is_degenerate() {
                    face.deleted = true;
                    removed += 1;
                }
            }
        }
        removed
    }

    /// Rewrites every live edge referencing `from` to reference `to`.
    /// An edge that becomes a self-loop is tombstoned.
    ///
    /// A collapse's two flanking faces typically each already have an
    /// edge from their apex to the collapse's *other* endpoint, so this
    /// rewrite alone would otherwise leave two live edges for the same
    /// undirected pair (e.g. collapsing a square's diagonal: the
    /// rewritten former boundary edges duplicate the square's other
    /// boundary edges). A second pass over every edge now touching `to`
    /// keeps only the first-seen edge to each distinct neighbor and
    /// tombstones the rest, preserving the "no duplicate live edge"
    /// invariant (spec §3/§8) the same way a link-condition check would
    /// have prevented the duplicate from arising in the first place.
    ///
    /// Returns the indices of the edges that, after rewriting and
    /// merging, touch `to` (the "affected" set of spec §4.4 step 2).
    pub(crate) fn rewrite_edges(&mut self, from: usize, to: usize) -> Vec<usize> {
        for edge in self.edges.iter_mut() {
            if edge.deleted {
                continue;
            }
            if edge.v1 == from {
                edge.v1 = to;
            }
            if edge.v2 == from {
                edge.v2 = to;
            }
            if edge.v1 == edge.v2 {
                edge.deleted = true;
            }
        }

        let mut first_seen: std::collections::HashMap<usize, usize> = std::collections::HashMap::new();
        let mut affected = Vec::new();
        for idx in 0..self.edges.len() {
            if self.edges[idx].deleted {
                continue;
            }
            let (v1, v2) = (self.edges[idx].v1, self.edges[idx].v2);
            if v1 != to && v2 != to {
                continue;
            }
            let other = if v1 == to { v2 } else { v1 };
            if first_seen.contains_key(&other) {
                self.edges[idx].deleted = true;
                continue;
            }
            first_seen.insert(other, idx);
            affected.push(idx);
        }
        affected
    }

    /// Recomputes a vertex's quadric from scratch as the sum of
    /// fundamental quadrics of its live incident faces (spec §4.4 step 4).
    pub(crate) fn requadric_vertex(&mut self, v: usize) {
        let sum = self
            .faces_incident_to(v)
            .fold(Mat4::zeros(), |acc, f| acc + fundamental_quadric_of(f));
        self.vertices[v].quadric = sum;
    }

    /// All live edges incident to `v`.
    pub(crate) fn edges_incident_to(&self, v: usize) -> Vec<usize> {
        self.edges
            .iter()
            .enumerate()
            .filter(|(_, e)| !e.deleted && (e.v1 == v || e.v2 == v))
            .map(|(i, _)| i)
            .collect()
    }

    pub(crate) fn edge_other(&self, edge_idx: usize, v: usize) -> usize {
        self.edges[edge_idx].other(v)
    }

    /// Vertex/face/edge counters for `stats()`; `heap_size` is filled
    /// in by the scheduler, which owns the heap.
    pub fn stats(&self, heap_size: usize) -> Stats {
        Stats {
            total_vertices: self.vertices.len(),
            deleted_vertices: self.deleted_vertex_count(),
            live_faces: self.live_face_count(),
            live_edges: self.live_edge_count(),
            heap_size,
        }
    }

    /// Checks the structural invariants of spec §3/§8 — debug/test
    /// tooling, not part of the hot path.
    #[cfg(any(test, debug_assertions))]
    pub fn check_invariants(&self) -> Result<(), String> {
        for (i, f) in self.faces.iter().enumerate().filter(|(_, f)| !f.deleted) {
            if f.is_degenerate() {
                return Err(format!("face {i} is live but degenerate: {f:?}"));
            }
            for v in f.indices() {
                if self.vertices[v].deleted {
                    return Err(format!("face {i} references deleted vertex {v}"));
                }
            }
        }
        let mut seen = std::collections::HashSet::new();
        for (i, e) in self.edges.iter().enumerate().filter(|(_, e)| !e.deleted) {
            if e.v1 == e.v2 {
                return Err(format!("edge {i} is live but a self-loop"));
            }
            if self.vertices[e.v1].deleted || self.vertices[e.v2].deleted {
                return Err(format!("edge {i} references a deleted vertex"));
            }
            let key = (e.v1.min(e.v2), e.v1.max(e.v2));
            if !seen.insert(key) {
                return Err(format!("duplicate live edge {key:?}"));
            }
        }
        Ok(())
    }
}

fn fundamental_quadric_of(face: &Face) -> Mat4 {
    crate::math::fundamental_quadric(face.plane)
}

/// GPU-streamable read-only view of the current live mesh (spec §6).
///
/// Derives `Serialize` purely for host-side debugging/inspection (e.g.
/// dumping a snapshot to JSON in a test fixture) — there is no
/// persisted on-disk format (spec §6).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub colors: Vec<[f32; 4]>,
    /// Index triples into the arrays above (already remapped from the
    /// mesh's arena indices to dense snapshot-local indices).
    pub indices: Vec<[u32; 3]>,
}

impl Mesh {
    /// Builds a dense, GPU-friendly snapshot of the live mesh.
    pub fn snapshot(&self) -> Snapshot {
        let mut remap = vec![u32::MAX; self.vertices.len()];
        let mut positions = Vec::new();
        let mut normals = Vec::new();
        let mut uvs = Vec::new();
        let mut colors = Vec::new();
        let mut indices = Vec::with_capacity(self.live_face_count());

        let mut dense = |v: usize,
                          remap: &mut Vec<u32>,
                          positions: &mut Vec<[f32; 3]>,
                          normals: &mut Vec<[f32; 3]>,
                          uvs: &mut Vec<[f32; 2]>,
                          colors: &mut Vec<[f32; 4]>| {
            if remap[v] != u32::MAX {
                return remap[v];
            }
            let vertex = &self.vertices[v];
            let idx = positions.len() as u32;
            positions.push([vertex.position.x, vertex.position.y, vertex.position.z]);
            normals.push([vertex.normal.x, vertex.normal.y, vertex.normal.z]);
            uvs.push([vertex.uv.x, vertex.uv.y]);
            colors.push([vertex.color.x, vertex.color.y, vertex.color.z, vertex.color.w]);
            remap[v] = idx;
            idx
        };

        for face in self.faces.iter().filter(|f| !f.deleted) {
            let a = dense(face.a, &mut remap, &mut positions, &mut normals, &mut uvs, &mut colors);
            let b = dense(face.b, &mut remap, &mut positions, &mut normals, &mut uvs, &mut colors);
            let c = dense(face.c, &mut remap, &mut positions, &mut normals, &mut uvs, &mut colors);
            indices.push([a, b, c]);
        }

        Snapshot {
            positions,
            normals,
            uvs,
            colors,
            indices,
        }
    }
}

// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Half-edge planar graph.
//
// Every edge is a pair of half-edges stored side by side in one arena, so
// edges[i] and edges[i^1] are always mates. There are no vertex or face
// records: a vertex is the ring reached through `vsucc`, a face is the cycle
// reached through `fsucc`, and each half-edge stores the position of the
// vertex it leaves from.
//
// Link invariant kept by every operation:
//   vsucc(fsucc(e)) == mate(e)
// which makes the predecessors O(1):
//   fpred(e) = mate(vsucc(e))      vpred(e) = fsucc(mate(e))

pub mod flip;

use bitflags::bitflags;

use crate::error::SpineError;
use crate::geom::{delta, midpoint, vert_leq, vert_lt, Point, Real};

pub const INVALID: u32 = u32::MAX;

/// Index into PlanarGraph::edges
pub type EdgeIdx = u32;

/// The other half-edge of the same edge.
#[inline(always)]
pub fn mate(e: EdgeIdx) -> EdgeIdx {
    e ^ 1
}

bitflags! {
    /// Mask bits stored on each half-edge.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct EdgeMask: u32 {
        /// Edge copied from an input polyline (set on both mates).
        const BOUNDARY_EDGE = 0b0000_0001;
        /// Half-edge runs along a face outside the filled region.
        const EXTERIOR_EDGE = 0b0000_0010;
        /// Interior edge chosen for removal to form a box (set on both mates).
        const DIAGONAL      = 0b0000_0100;
        /// Face already claimed by a box merge.
        const BOX           = 0b0000_1000;
        /// Edge removed from the graph; the pair is left as an isolated 2-cycle.
        const DELETED       = 0b1000_0000;
    }
}

#[derive(Clone, Debug)]
pub struct HalfEdge {
    /// Next half-edge CCW around the face.
    pub fsucc: EdgeIdx,
    /// Next half-edge CCW around the base vertex.
    pub vsucc: EdgeIdx,
    /// Position of the base vertex.
    pub coords: Point,
    pub mask: EdgeMask,
}

impl Default for HalfEdge {
    fn default() -> Self {
        Self {
            fsucc: INVALID,
            vsucc: INVALID,
            coords: [0.0; 3],
            mask: EdgeMask::empty(),
        }
    }
}

/// Arena of half-edges. Dropping the graph frees every record at once.
pub struct PlanarGraph {
    pub edges: Vec<HalfEdge>,
}

impl PlanarGraph {
    pub fn new() -> Self {
        PlanarGraph { edges: Vec::new() }
    }

    /// Number of half-edge records, deleted ones included.
    #[inline]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Number of edges (mate pairs) still in the graph.
    pub fn live_edge_count(&self) -> usize {
        (0..self.edges.len() as EdgeIdx)
            .step_by(2)
            .filter(|&e| !self.is_deleted(e))
            .count()
    }

    // ──────────────────────────── Navigation ──────────────────────────────────

    #[inline(always)]
    pub fn mate(&self, e: EdgeIdx) -> EdgeIdx {
        e ^ 1
    }

    #[inline]
    pub fn fsucc(&self, e: EdgeIdx) -> EdgeIdx {
        self.edges[e as usize].fsucc
    }

    #[inline]
    pub fn vsucc(&self, e: EdgeIdx) -> EdgeIdx {
        self.edges[e as usize].vsucc
    }

    /// Previous half-edge around the face.
    #[inline]
    pub fn fpred(&self, e: EdgeIdx) -> EdgeIdx {
        self.vsucc(e) ^ 1
    }

    /// Previous half-edge around the vertex.
    #[inline]
    pub fn vpred(&self, e: EdgeIdx) -> EdgeIdx {
        self.fsucc(e ^ 1)
    }

    #[inline]
    pub fn position(&self, e: EdgeIdx) -> Point {
        self.edges[e as usize].coords
    }

    #[inline]
    pub fn set_position(&mut self, e: EdgeIdx, p: Point) {
        self.edges[e as usize].coords = p;
    }

    /// Move a whole vertex: every half-edge of `e`'s ring gets `p`.
    pub fn set_vertex_position(&mut self, e: EdgeIdx, p: Point) {
        let mut n = e;
        loop {
            self.edges[n as usize].coords = p;
            n = self.vsucc(n);
            if n == e {
                break;
            }
        }
    }

    /// Planar vector from the base of `e` to the base of its mate.
    #[inline]
    pub fn direction(&self, e: EdgeIdx) -> [Real; 2] {
        delta(&self.position(e), &self.position(e ^ 1))
    }

    /// Edge leaves its base toward a lexically larger vertex.
    #[inline]
    pub fn is_forward(&self, e: EdgeIdx) -> bool {
        let o = self.position(e);
        let d = self.position(e ^ 1);
        vert_lt(o[0], o[1], d[0], d[1])
    }

    #[inline]
    pub fn edge_goes_left(&self, e: EdgeIdx) -> bool {
        let o = self.position(e);
        let d = self.position(e ^ 1);
        vert_leq(d[0], d[1], o[0], o[1])
    }

    #[inline]
    pub fn edge_goes_right(&self, e: EdgeIdx) -> bool {
        let o = self.position(e);
        let d = self.position(e ^ 1);
        vert_leq(o[0], o[1], d[0], d[1])
    }

    // ────────────────────────────── Masks ─────────────────────────────────────

    #[inline]
    pub fn mask(&self, e: EdgeIdx) -> EdgeMask {
        self.edges[e as usize].mask
    }

    /// True if `e` carries any bit of `m`.
    #[inline]
    pub fn has_mask(&self, e: EdgeIdx, m: EdgeMask) -> bool {
        self.edges[e as usize].mask.intersects(m)
    }

    #[inline]
    pub fn set_mask(&mut self, e: EdgeIdx, m: EdgeMask) {
        self.edges[e as usize].mask.insert(m);
    }

    #[inline]
    pub fn clear_mask(&mut self, e: EdgeIdx, m: EdgeMask) {
        self.edges[e as usize].mask.remove(m);
    }

    /// Set `m` on both half-edges of `e`'s edge.
    pub fn set_mask_on_edge(&mut self, e: EdgeIdx, m: EdgeMask) {
        self.set_mask(e, m);
        self.set_mask(e ^ 1, m);
    }

    /// Flip `m` on both half-edges of `e`'s edge.
    pub fn toggle_mask_on_edge(&mut self, e: EdgeIdx, m: EdgeMask) {
        self.edges[e as usize].mask.toggle(m);
        self.edges[(e ^ 1) as usize].mask.toggle(m);
    }

    /// Set `m` on every half-edge of `e`'s face.
    pub fn set_mask_around_face(&mut self, e: EdgeIdx, m: EdgeMask) {
        let mut n = e;
        loop {
            self.set_mask(n, m);
            n = self.fsucc(n);
            if n == e {
                break;
            }
        }
    }

    /// Remove `m` from every half-edge in the arena.
    pub fn clear_mask_everywhere(&mut self, m: EdgeMask) {
        for edge in &mut self.edges {
            edge.mask.remove(m);
        }
    }

    #[inline]
    pub fn is_deleted(&self, e: EdgeIdx) -> bool {
        self.has_mask(e, EdgeMask::DELETED)
    }

    #[inline]
    pub fn is_exterior(&self, e: EdgeIdx) -> bool {
        self.has_mask(e, EdgeMask::EXTERIOR_EDGE)
    }

    #[inline]
    pub fn is_boundary(&self, e: EdgeIdx) -> bool {
        self.has_mask(e, EdgeMask::BOUNDARY_EDGE)
    }

    // ───────────────────────────── Topology ───────────────────────────────────

    /// Create a mated pair. Each half-edge sits alone at its own vertex and
    /// the pair forms one two-sided face: fsucc(e) == mate(e) and back.
    pub fn new_pair(&mut self) -> EdgeIdx {
        let e = self.edges.len() as EdgeIdx;
        self.edges.push(HalfEdge {
            fsucc: e + 1,
            vsucc: e,
            ..HalfEdge::default()
        });
        self.edges.push(HalfEdge {
            fsucc: e,
            vsucc: e + 1,
            ..HalfEdge::default()
        });
        e
    }

    /// Exchange vsucc(a) and vsucc(b), fixing the face links to match.
    ///
    /// If a and b are on different vertex rings the rings are merged (and the
    /// faces left of a and b are split or merged accordingly); if they are on
    /// the same ring it is split in two. Twisting half-edges of unrelated
    /// rings that do not share a point produces meaningless geometry.
    pub fn vertex_twist(&mut self, a: EdgeIdx, b: EdgeIdx) {
        if a == b {
            return;
        }
        let a_vsucc = self.edges[a as usize].vsucc;
        let b_vsucc = self.edges[b as usize].vsucc;
        self.edges[(a_vsucc ^ 1) as usize].fsucc = b;
        self.edges[(b_vsucc ^ 1) as usize].fsucc = a;
        self.edges[a as usize].vsucc = b_vsucc;
        self.edges[b as usize].vsucc = a_vsucc;
    }

    /// Insert a new edge from the vertex of `a` to the vertex of `b`, where
    /// both half-edges are on the same face. Returns the new half-edge based
    /// at `a`'s vertex; it is placed CCW right after `a` in that ring.
    ///
    /// The face is split into [p, b, ..., fpred(a)] and [mate(p), a, ..., fpred(b)].
    pub fn join(&mut self, a: EdgeIdx, b: EdgeIdx) -> EdgeIdx {
        let p = self.new_pair();
        let q = p ^ 1;
        self.edges[p as usize].coords = self.position(a);
        self.edges[q as usize].coords = self.position(b);
        let inherited = self.mask(a) & EdgeMask::EXTERIOR_EDGE;
        self.set_mask_on_edge(p, inherited);
        self.vertex_twist(p, a);
        self.vertex_twist(q, b);
        p
    }

    /// Split edge `e` at its midpoint. Returns the two half-edges based at the
    /// new vertex: `(u, m)` where `u` continues `e` along `e`'s face and
    /// `m == mate(e)`. Both masks are inherited by the new segment.
    pub fn split_edge(&mut self, e: EdgeIdx) -> (EdgeIdx, EdgeIdx) {
        let m = e ^ 1;
        let far = self.position(m);
        let mid = midpoint(&self.position(e), &far);

        let u = self.new_pair();
        let w = u ^ 1;
        // Hang w at the far vertex next to m, then move m over to u.
        self.vertex_twist(m, w);
        let before = self.vpred(m);
        self.vertex_twist(before, m);
        self.vertex_twist(m, u);

        self.edges[u as usize].coords = mid;
        self.edges[m as usize].coords = mid;
        self.edges[w as usize].coords = far;
        self.edges[u as usize].mask = self.mask(e);
        self.edges[w as usize].mask = self.mask(m);
        (u, m)
    }

    /// Remove edge `e` from the graph, merging the faces on either side.
    /// The records stay in the arena marked `DELETED`.
    pub fn delete_edge(&mut self, e: EdgeIdx) {
        let m = e ^ 1;
        if self.vsucc(e) != e {
            let before = self.vpred(e);
            self.vertex_twist(before, e);
        }
        if self.vsucc(m) != m {
            let before = self.vpred(m);
            self.vertex_twist(before, m);
        }
        self.set_mask_on_edge(e, EdgeMask::DELETED);
    }

    // ──────────────────────────── Traversal ───────────────────────────────────

    /// Half-edges of `e`'s face, starting at `e`.
    pub fn face_loop(&self, e: EdgeIdx) -> Vec<EdgeIdx> {
        let mut out = Vec::new();
        let mut n = e;
        loop {
            out.push(n);
            n = self.fsucc(n);
            if n == e {
                break;
            }
        }
        out
    }

    /// Half-edges leaving `e`'s vertex in CCW order, starting at `e`.
    pub fn vertex_ring(&self, e: EdgeIdx) -> Vec<EdgeIdx> {
        let mut out = Vec::new();
        let mut n = e;
        loop {
            out.push(n);
            n = self.vsucc(n);
            if n == e {
                break;
            }
        }
        out
    }

    pub fn face_degree(&self, e: EdgeIdx) -> usize {
        let mut count = 0;
        let mut n = e;
        loop {
            count += 1;
            n = self.fsucc(n);
            if n == e {
                break;
            }
        }
        count
    }

    /// One half-edge per face: the lowest index on each fsucc cycle.
    pub fn face_seeds(&self) -> Vec<EdgeIdx> {
        self.seeds(|g, n| g.fsucc(n))
    }

    /// One half-edge per vertex: the lowest index on each vsucc ring.
    pub fn vertex_seeds(&self) -> Vec<EdgeIdx> {
        self.seeds(|g, n| g.vsucc(n))
    }

    fn seeds<F>(&self, step: F) -> Vec<EdgeIdx>
    where
        F: Fn(&Self, EdgeIdx) -> EdgeIdx,
    {
        let mut visited = vec![false; self.edges.len()];
        let mut out = Vec::new();
        for e in 0..self.edges.len() as EdgeIdx {
            if visited[e as usize] || self.is_deleted(e) {
                continue;
            }
            out.push(e);
            let mut n = e;
            loop {
                visited[n as usize] = true;
                n = step(self, n);
                if n == e {
                    break;
                }
            }
        }
        out
    }

    /// Signed area of `e`'s face; positive for a CCW loop.
    pub fn signed_area(&self, e: EdgeIdx) -> Real {
        let mut area = 0.0;
        let mut n = e;
        loop {
            let next = self.fsucc(n);
            let p = self.position(n);
            let q = self.position(next);
            area += p[0] * q[1] - q[0] * p[1];
            n = next;
            if n == e {
                break;
            }
        }
        0.5 * area
    }

    /// Interior face (not flagged exterior) of exactly `degree` edges.
    pub fn is_interior_face_of_degree(&self, e: EdgeIdx, degree: usize) -> bool {
        !self.is_exterior(e) && self.face_degree(e) == degree
    }

    /// Validate the link and mask invariants over every live half-edge.
    pub fn check_invariants(&self) -> Result<(), SpineError> {
        let len = self.edges.len() as EdgeIdx;
        for e in 0..len {
            if self.is_deleted(e) != self.is_deleted(e ^ 1) {
                return Err(SpineError::BrokenInvariant { edge: e, reason: "deleted flag differs from mate" });
            }
            if self.is_deleted(e) {
                continue;
            }
            let next = self.fsucc(e);
            if next >= len || self.vsucc(e) >= len {
                return Err(SpineError::BrokenInvariant { edge: e, reason: "link out of range" });
            }
            if self.vsucc(next) != e ^ 1 {
                return Err(SpineError::BrokenInvariant { edge: e, reason: "vsucc(fsucc(e)) != mate(e)" });
            }
            if self.position(next) != self.position(e ^ 1) {
                return Err(SpineError::BrokenInvariant { edge: e, reason: "face successor not at mate's vertex" });
            }
            let paired = EdgeMask::DIAGONAL | EdgeMask::BOUNDARY_EDGE;
            if self.mask(e) & paired != self.mask(e ^ 1) & paired {
                return Err(SpineError::BrokenInvariant { edge: e, reason: "paired mask differs from mate" });
            }
        }
        Ok(())
    }
}

impl Default for PlanarGraph {
    fn default() -> Self {
        Self::new()
    }
}

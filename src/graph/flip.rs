// Copyright 2025 Lars Brubaker
// Edge flips for PlanarGraph.

use super::{EdgeIdx, PlanarGraph};
use crate::geom::{dist2, orient, Point};

/// All four corner turns of the CCW quad are strictly left.
pub fn is_strictly_convex(quad: &[Point; 4]) -> bool {
    (0..4).all(|i| {
        let a = quad[i];
        let b = quad[(i + 1) % 4];
        let c = quad[(i + 2) % 4];
        orient(a[0], a[1], b[0], b[1], c[0], c[1]) > 0.0
    })
}

impl PlanarGraph {
    /// Edge separates two interior triangles and did not come from the input.
    pub fn is_flippable(&self, e: EdgeIdx) -> bool {
        !self.is_deleted(e)
            && !self.is_boundary(e)
            && self.is_interior_face_of_degree(e, 3)
            && self.is_interior_face_of_degree(e ^ 1, 3)
    }

    /// Corners of the two triangles around `e` as a CCW quad `[P, S, Q, R]`,
    /// where `e` runs P→Q, R is the apex on `e`'s side and S the apex on the
    /// mate's side.
    pub fn quad_around(&self, e: EdgeIdx) -> [Point; 4] {
        let p = self.position(e);
        let q = self.position(e ^ 1);
        let r = self.position(self.fpred(e));
        let s = self.position(self.fpred(e ^ 1));
        [p, s, q, r]
    }

    /// The other diagonal is strictly shorter and the quad strictly convex.
    /// Swapping the diagonal changes no side, so this is exactly "the sum of
    /// squared edge lengths goes down".
    pub fn flip_improves(&self, e: EdgeIdx) -> bool {
        let quad = self.quad_around(e);
        if !is_strictly_convex(&quad) {
            return false;
        }
        let [p, s, q, r] = quad;
        dist2(&r, &s) < dist2(&p, &q)
    }

    /// Replace diagonal P–Q of the quad around `e` by R–S. The pair keeps its
    /// indices: afterwards `e` runs S→R and its mate R→S.
    pub fn flip_edge(&mut self, e: EdgeIdx) {
        let m = e ^ 1;
        let a2 = self.fpred(e);
        let b2 = self.fpred(m);
        let r = self.position(a2);
        let s = self.position(b2);

        let before = self.vpred(e);
        self.vertex_twist(before, e);
        let before = self.vpred(m);
        self.vertex_twist(before, m);

        self.edges[e as usize].coords = s;
        self.edges[m as usize].coords = r;
        self.vertex_twist(e, b2);
        self.vertex_twist(m, a2);
    }

    /// Flip interior diagonals until no flip shortens one. Returns the number
    /// of flips performed.
    pub fn improve_by_flips(&mut self) -> usize {
        let mut queued = vec![false; self.edges.len()];
        let mut stack: Vec<EdgeIdx> = Vec::new();

        for face in self.face_seeds() {
            if !self.is_interior_face_of_degree(face, 3) {
                continue;
            }
            for e in self.face_loop(face) {
                let flippable = self.is_flippable(e);
                queued[e as usize] = flippable;
                if flippable && !queued[(e ^ 1) as usize] {
                    stack.push(e);
                }
            }
        }

        let max_iter = stack.len() * stack.len() + 1;
        let mut iter = 0;
        let mut flips = 0;

        while let Some(e) = stack.pop() {
            if iter >= max_iter {
                log::debug!("flip pass stopped at iteration limit {}", max_iter);
                break;
            }
            iter += 1;
            queued[e as usize] = false;
            queued[(e ^ 1) as usize] = false;

            if self.is_flippable(e) && self.flip_improves(e) {
                let neighbors = [
                    self.fsucc(e),
                    self.fpred(e),
                    self.fsucc(e ^ 1),
                    self.fpred(e ^ 1),
                ];
                self.flip_edge(e);
                flips += 1;
                for &nb in &neighbors {
                    if !queued[nb as usize] && self.is_flippable(nb) {
                        queued[nb as usize] = true;
                        queued[(nb ^ 1) as usize] = true;
                        stack.push(nb);
                    }
                }
            }
        }
        flips
    }

    /// Flip away zero-area triangles.
    ///
    /// A fan over collinear vertices leaves a triangle whose longest side
    /// lies on top of the other two. Flipping that side toward the apex of
    /// the triangle beyond it splits the neighbour at the middle vertex.
    /// Returns the number of flips.
    pub fn repair_slivers(&mut self) -> usize {
        let mut flips = 0;
        let mut budget = self.edges.len();
        let mut changed = true;
        while changed && budget > 0 {
            changed = false;
            for face in self.face_seeds() {
                if !self.is_interior_face_of_degree(face, 3) || self.signed_area(face) > 0.0 {
                    continue;
                }
                let Some(long) = self
                    .face_loop(face)
                    .into_iter()
                    .max_by(|&a, &b| {
                        let la = dist2(&self.position(a), &self.position(a ^ 1));
                        let lb = dist2(&self.position(b), &self.position(b ^ 1));
                        la.total_cmp(&lb)
                    })
                else {
                    continue;
                };
                if !self.is_flippable(long) || self.signed_area(long ^ 1) <= 0.0 {
                    continue;
                }
                self.flip_edge(long);
                log::trace!("sliver repaired by flipping {}", long);
                flips += 1;
                budget -= 1;
                changed = true;
                if budget == 0 {
                    break;
                }
            }
        }
        flips
    }
}

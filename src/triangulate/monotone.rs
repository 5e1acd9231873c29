// Copyright 2025 Lars Brubaker
// Monotone face triangulation for PlanarGraph.

use crate::error::SpineError;
use crate::geom::{edge_eval, vert_leq};
use crate::graph::{EdgeIdx, PlanarGraph};

impl PlanarGraph {
    /// New edge from the end of `e_org` to the start of `e_dst`, closing the
    /// triangle [new, e_dst, e_org]. Returns the new half-edge on that triangle.
    fn connect(&mut self, e_org: EdgeIdx, e_dst: EdgeIdx) -> EdgeIdx {
        let a = self.fsucc(e_org);
        self.join(a, e_dst)
    }

    /// Triangulate one x-monotone CCW face in linear time.
    ///
    /// Two chains are walked from the rightmost vertex toward the left; each
    /// newly reached vertex fans off every triangle it can see on the opposite
    /// chain. Fails if the face has fewer than 3 edges or the walk does not
    /// close, which only happens for faces that are not monotone.
    pub fn tessellate_mono_region(&mut self, face: EdgeIdx) -> Result<(), SpineError> {
        let degree = self.face_degree(face);
        if degree < 3 {
            return Err(SpineError::NonMonotoneFace(face));
        }
        let mut budget = 4 * degree;
        let step = |budget: &mut usize| -> Result<(), SpineError> {
            if *budget == 0 {
                return Err(SpineError::NonMonotoneFace(face));
            }
            *budget -= 1;
            Ok(())
        };

        // Find the edge whose origin is the rightmost vertex.
        let mut up = face;
        while self.edge_goes_left(up) {
            step(&mut budget)?;
            up = self.fpred(up);
        }
        while self.edge_goes_right(up) {
            step(&mut budget)?;
            up = self.fsucc(up);
        }

        let mut lo = self.fpred(up);

        while self.fsucc(up) != lo {
            step(&mut budget)?;
            let up_dst = self.position(up ^ 1);
            let lo_org = self.position(lo);
            if vert_leq(up_dst[0], up_dst[1], lo_org[0], lo_org[1]) {
                // up's end is on the left; make triangles from lo's start.
                while self.fsucc(lo) != up {
                    step(&mut budget)?;
                    let lo_next = self.fsucc(lo);
                    let o = self.position(lo);
                    let d = self.position(lo ^ 1);
                    let n = self.position(lo_next ^ 1);
                    let goes_left = self.edge_goes_left(lo_next);
                    // Collinear runs (sign == 0) are never fanned across.
                    let sign = edge_eval(o[0], o[1], d[0], d[1], n[0], n[1]);
                    if !goes_left && sign >= 0.0 {
                        break;
                    }
                    lo = self.connect(lo_next, lo) ^ 1;
                }
                lo = self.fpred(lo);
            } else {
                // lo's start is on the left; make CCW triangles from up's end.
                while self.fsucc(lo) != up {
                    step(&mut budget)?;
                    let up_prev = self.fpred(up);
                    let d = self.position(up ^ 1);
                    let o = self.position(up);
                    let p = self.position(up_prev);
                    let goes_right = self.edge_goes_right(up_prev);
                    let sign = edge_eval(d[0], d[1], o[0], o[1], p[0], p[1]);
                    if !goes_right && sign <= 0.0 {
                        break;
                    }
                    up = self.connect(up, up_prev) ^ 1;
                }
                up = self.fsucc(up);
            }
        }

        // Fan out the remaining polygon from the leftmost vertex.
        if self.fsucc(lo) == up {
            return Err(SpineError::NonMonotoneFace(face));
        }
        while self.fsucc(self.fsucc(lo)) != up {
            step(&mut budget)?;
            let lo_next = self.fsucc(lo);
            lo = self.connect(lo_next, lo) ^ 1;
        }
        Ok(())
    }
}

// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Plane sweep that regularizes the graph into x-monotone faces.
//
// Vertices are visited in lexical (x, y) order. The edges crossing the sweep
// line live in a doubly-linked list ordered bottom to top, with a sentinel
// head at index 0 like the tessellator's edge dictionary. Each entry keeps a
// helper: the sector half-edge of the latest vertex seen in the gap directly
// above that entry. A vertex with nothing to its right closing a bounded gap
// (merge) or nothing to its left inside one (split) is joined to the helper
// of that gap, which leaves every face with a single leftmost and a single
// rightmost vertex.

use std::cmp::Ordering;

use crate::geom::{cross, delta};
use crate::graph::{EdgeIdx, PlanarGraph, INVALID};

/// Index into ActiveList::nodes
pub type NodeIdx = u32;

/// Index of the head sentinel node.
pub const LIST_HEAD: NodeIdx = 0;

/// An edge crossing the sweep line.
#[derive(Clone, Copy, Debug)]
pub struct ActiveEdge {
    /// Half-edge based at the lexically smaller end.
    pub edge: EdgeIdx,
    /// Sector half-edge of the latest vertex in the gap above this edge.
    pub helper: EdgeIdx,
    /// The helper is a merge vertex still waiting for its diagonal.
    pub helper_is_merge: bool,
}

#[derive(Clone, Debug)]
struct ListNode {
    entry: ActiveEdge,
    next: NodeIdx,
    prev: NodeIdx,
}

/// Active edges ordered bottom to top. The head sentinel closes the circle:
/// head.next is the lowest edge, head.prev the highest.
pub struct ActiveList {
    nodes: Vec<ListNode>,
}

impl ActiveList {
    pub fn new() -> Self {
        let head = ListNode {
            entry: ActiveEdge {
                edge: INVALID,
                helper: INVALID,
                helper_is_merge: false,
            },
            next: LIST_HEAD,
            prev: LIST_HEAD,
        };
        ActiveList { nodes: vec![head] }
    }

    /// Insert `entry` directly above `node` (LIST_HEAD inserts at the bottom).
    pub fn insert_after(&mut self, node: NodeIdx, entry: ActiveEdge) -> NodeIdx {
        let new_idx = self.nodes.len() as NodeIdx;
        let next_node = self.nodes[node as usize].next;
        self.nodes.push(ListNode {
            entry,
            next: next_node,
            prev: node,
        });
        self.nodes[node as usize].next = new_idx;
        self.nodes[next_node as usize].prev = new_idx;
        new_idx
    }

    pub fn delete(&mut self, node: NodeIdx) {
        let next = self.nodes[node as usize].next;
        let prev = self.nodes[node as usize].prev;
        self.nodes[next as usize].prev = prev;
        self.nodes[prev as usize].next = next;
        self.nodes[node as usize].next = INVALID;
        self.nodes[node as usize].prev = INVALID;
    }

    #[inline]
    pub fn next(&self, node: NodeIdx) -> NodeIdx {
        self.nodes[node as usize].next
    }

    #[inline]
    pub fn prev(&self, node: NodeIdx) -> NodeIdx {
        self.nodes[node as usize].prev
    }

    /// Lowest edge, or LIST_HEAD when empty.
    #[inline]
    pub fn first(&self) -> NodeIdx {
        self.nodes[LIST_HEAD as usize].next
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.first() == LIST_HEAD
    }

    #[inline]
    pub fn entry(&self, node: NodeIdx) -> &ActiveEdge {
        &self.nodes[node as usize].entry
    }

    #[inline]
    pub fn entry_mut(&mut self, node: NodeIdx) -> &mut ActiveEdge {
        &mut self.nodes[node as usize].entry
    }
}

impl Default for ActiveList {
    fn default() -> Self {
        Self::new()
    }
}

/// Add diagonals until every face is monotone in x. Returns the number of
/// diagonals added.
pub fn regularize(graph: &mut PlanarGraph) -> usize {
    let mut events = graph.vertex_seeds();
    events.sort_by(|&a, &b| lexical_order(graph, a, b));

    let mut list = ActiveList::new();
    let mut added = 0;
    for v in events {
        added += sweep_vertex(graph, &mut list, v);
    }
    debug_assert!(list.is_empty());
    log::debug!("regularize: {} diagonals added", added);
    added
}

pub(crate) fn lexical_order(graph: &PlanarGraph, a: EdgeIdx, b: EdgeIdx) -> Ordering {
    let p = graph.position(a);
    let q = graph.position(b);
    p[0].partial_cmp(&q[0])
        .unwrap_or(Ordering::Equal)
        .then(p[1].partial_cmp(&q[1]).unwrap_or(Ordering::Equal))
}

fn sweep_vertex(graph: &mut PlanarGraph, list: &mut ActiveList, v: EdgeIdx) -> usize {
    let ring = graph.vertex_ring(v);
    let mut ending: Vec<NodeIdx> = Vec::new();
    let mut node = list.first();
    while node != LIST_HEAD {
        if ring.contains(&(list.entry(node).edge ^ 1)) {
            ending.push(node);
        }
        node = list.next(node);
    }

    let mut added = 0;
    let below;
    if let (Some(&lowest), Some(&highest)) = (ending.first(), ending.last()) {
        below = list.prev(lowest);
        let above = list.next(highest);

        if below != LIST_HEAD && list.entry(below).helper_is_merge {
            let helper = list.entry(below).helper;
            graph.join(bottom_sector(graph, v), helper);
            added += 1;
        }
        for pair in ending.windows(2) {
            let lower = *list.entry(pair[0]);
            if lower.helper_is_merge {
                let sector = list.entry(pair[1]).edge ^ 1;
                graph.join(sector, lower.helper);
                added += 1;
            }
        }
        if above != LIST_HEAD && list.entry(highest).helper_is_merge {
            let helper = list.entry(highest).helper;
            graph.join(top_sector(graph, v), helper);
            added += 1;
        }
        for &node in &ending {
            list.delete(node);
        }
    } else {
        let mut gap = LIST_HEAD;
        let mut node = list.first();
        while node != LIST_HEAD && is_above(graph, list.entry(node).edge, v) {
            gap = node;
            node = list.next(node);
        }
        below = gap;
        if below != LIST_HEAD && list.next(below) != LIST_HEAD {
            let helper = list.entry(below).helper;
            graph.join(top_sector(graph, v), helper);
            added += 1;
        }
    }

    let forward = forward_edges(graph, v);
    let mut at = below;
    for &f in &forward {
        at = list.insert_after(
            at,
            ActiveEdge {
                edge: f,
                helper: f,
                helper_is_merge: false,
            },
        );
    }
    if below != LIST_HEAD {
        let bounded = list.next(below) != LIST_HEAD;
        let helper = if forward.is_empty() {
            top_sector(graph, v)
        } else {
            bottom_sector(graph, v)
        };
        let entry = list.entry_mut(below);
        entry.helper = helper;
        entry.helper_is_merge = forward.is_empty() && bounded;
    }
    added
}

/// The vertex of `v` lies strictly above the line of `edge`.
fn is_above(graph: &PlanarGraph, edge: EdgeIdx, v: EdgeIdx) -> bool {
    let l = graph.position(edge);
    let r = graph.position(edge ^ 1);
    cross(delta(&l, &r), delta(&l, &graph.position(v))) > 0.0
}

/// Edges leaving the vertex to the right, bottom to top.
fn forward_edges(graph: &PlanarGraph, v: EdgeIdx) -> Vec<EdgeIdx> {
    let start = graph.vsucc(bottom_sector(graph, v));
    let mut out = Vec::new();
    let mut n = start;
    while graph.is_forward(n) {
        out.push(n);
        n = graph.vsucc(n);
        if n == start {
            break;
        }
    }
    out
}

/// Sector opening upward between the top forward and top backward edges.
fn top_sector(graph: &PlanarGraph, v: EdgeIdx) -> EdgeIdx {
    find_sector(graph, v, |g, n| g.is_forward(n) && !g.is_forward(g.vsucc(n)))
}

/// Sector opening downward between the bottom backward and bottom forward edges.
fn bottom_sector(graph: &PlanarGraph, v: EdgeIdx) -> EdgeIdx {
    find_sector(graph, v, |g, n| !g.is_forward(n) && g.is_forward(g.vsucc(n)))
}

/// First ring member matching `pred`. When every edge points the same way
/// there is no such transition and the one sector wider than π is used.
fn find_sector<F>(graph: &PlanarGraph, v: EdgeIdx, pred: F) -> EdgeIdx
where
    F: Fn(&PlanarGraph, EdgeIdx) -> bool,
{
    let ring = graph.vertex_ring(v);
    ring.iter()
        .copied()
        .find(|&n| pred(graph, n))
        .or_else(|| {
            ring.iter()
                .copied()
                .find(|&n| cross(graph.direction(n), graph.direction(graph.vsucc(n))) <= 0.0)
        })
        .unwrap_or(v)
}

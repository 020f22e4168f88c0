use std::collections::BinaryHeap;

use log::debug;
use pathviz_core::Point;

use crate::SearchSpace;
use crate::space::{NO_PARENT, NodeRef, UNREACHABLE};
use crate::traits::Pather;

/// Result of one [`SearchSpace::search`] run, borrowed from the space.
#[derive(Clone, Copy)]
pub struct Search<'a> {
    space: &'a SearchSpace,
    origin: Point,
    target: Point,
}

impl<'a> Search<'a> {
    /// Cells in the order they were finalized.
    pub fn trace(&self) -> &'a [Point] {
        self.space.trace()
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn target(&self) -> Point {
        self.target
    }

    /// Whether the target was finalized.
    pub fn reached(&self) -> bool {
        self.space.is_visited(self.target)
    }

    pub fn distance_at(&self, p: Point) -> Option<i32> {
        self.space.distance_at(p)
    }

    pub fn predecessor(&self, p: Point) -> Option<Point> {
        self.space.predecessor(p)
    }

    /// Shortest path from origin to target, empty if unreachable.
    pub fn path(&self) -> Vec<Point> {
        self.space.reconstruct_path(self.origin, self.target)
    }
}

impl SearchSpace {
    /// Run a uniform-cost search from `origin` toward `target`.
    ///
    /// Every move costs 1. Cells are finalized in order of increasing
    /// distance, ties broken by discovery order, and each finalized cell is
    /// appended to the trace. The search stops once `target` is finalized
    /// (it is the trace's last element) or when nothing reachable is left
    /// (`target` is then absent from the trace).
    ///
    /// The previous run is forgotten first. If either endpoint lies outside
    /// the range the trace is empty.
    pub fn search<P: Pather>(&mut self, pather: &P, origin: Point, target: Point) -> Search<'_> {
        self.reset();
        let (Some(oi), Some(ti)) = (self.idx(origin), self.idx(target)) else {
            debug!("search skipped: {origin} or {target} outside {}", self.rng);
            return Search { space: self, origin, target };
        };
        self.origin = Some(origin);

        let cur_gen = self.generation;
        let mut open: BinaryHeap<NodeRef> = BinaryHeap::new();
        let mut seq = 0u64;

        let n = &mut self.nodes[oi];
        n.generation = cur_gen;
        n.distance = 0;
        n.parent = NO_PARENT;
        n.visited = false;
        open.push(NodeRef { idx: oi, distance: 0, seq });

        let mut nbuf = std::mem::take(&mut self.nbuf);

        while let Some(current) = open.pop() {
            let ci = current.idx;
            let cn = &mut self.nodes[ci];
            // Stale heap entry: a shorter distance was found after the push.
            if cn.visited || current.distance != cn.distance {
                continue;
            }
            cn.visited = true;
            let d = cn.distance;

            let cp = self.point(ci);
            self.trace.push(cp);
            if ci == ti {
                break;
            }

            nbuf.clear();
            pather.neighbors(cp, &mut nbuf);

            for &np in nbuf.iter() {
                let Some(ni) = self.idx(np) else {
                    continue;
                };
                let n = &mut self.nodes[ni];
                if n.generation != cur_gen {
                    n.generation = cur_gen;
                    n.distance = UNREACHABLE;
                    n.parent = NO_PARENT;
                    n.visited = false;
                }
                if n.visited {
                    continue;
                }
                let cand = d + 1;
                if cand < n.distance {
                    n.distance = cand;
                    n.parent = ci;
                    seq += 1;
                    open.push(NodeRef { idx: ni, distance: cand, seq });
                }
            }
        }

        self.nbuf = nbuf;
        debug!(
            "search {origin} -> {target}: {} cells finalized, target {}",
            self.trace.len(),
            if self.is_visited(target) { "reached" } else { "unreachable" }
        );
        Search { space: self, origin, target }
    }
}

use pathviz_core::Point;

use crate::SearchSpace;

impl SearchSpace {
    /// Walk predecessors back from `target` to `origin`.
    ///
    /// Returns the shortest path ordered origin first, target last. The
    /// result is empty, never partial, when `target` was not reached, when
    /// the chain does not end at `origin`, or when `origin` is not the
    /// origin of the last run. Origin equal to target yields `[origin]`.
    pub fn reconstruct_path(&self, origin: Point, target: Point) -> Vec<Point> {
        if self.origin != Some(origin) || self.distance_at(target).is_none() {
            return Vec::new();
        }

        let mut path = vec![target];
        let mut cur = target;
        while let Some(prev) = self.predecessor(cur) {
            path.push(prev);
            cur = prev;
        }
        if cur != origin {
            return Vec::new();
        }
        path.reverse();
        path
    }
}

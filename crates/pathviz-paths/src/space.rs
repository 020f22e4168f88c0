use pathviz_core::{Point, Range};

// ---------------------------------------------------------------------------
// Internal node for the priority-queue search
// ---------------------------------------------------------------------------

/// Per-cell search scratch: tentative distance, visited flag and
/// predecessor index. Only meaningful when `generation` matches the space's
/// current generation; anything older reads as "never touched".
#[derive(Clone)]
pub(crate) struct Node {
    pub(crate) distance: i32,
    pub(crate) parent: usize,
    pub(crate) generation: u32,
    pub(crate) visited: bool,
}

pub(crate) const NO_PARENT: usize = usize::MAX;

impl Default for Node {
    fn default() -> Self {
        Self {
            distance: UNREACHABLE,
            parent: NO_PARENT,
            generation: 0,
            visited: false,
        }
    }
}

/// Reference into the node array, ordered for use in a `BinaryHeap` so that
/// the smallest distance pops first and equal distances pop in the order
/// they were discovered.
#[derive(Clone, Copy, Eq, PartialEq)]
pub(crate) struct NodeRef {
    pub(crate) idx: usize,
    pub(crate) distance: i32,
    pub(crate) seq: u64,
}

impl Ord for NodeRef {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Reversed: BinaryHeap is a max-heap.
        other
            .distance
            .cmp(&self.distance)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for NodeRef {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Sentinel distance meaning "not reached" (the tentative distance
/// Infinity).
pub const UNREACHABLE: i32 = i32::MAX;

// ---------------------------------------------------------------------------
// SearchSpace
// ---------------------------------------------------------------------------

/// Search scratch for one grid rectangle.
///
/// `SearchSpace` owns the per-cell distance / visited / predecessor table,
/// the exploration trace of the last run and a reusable neighbour buffer.
/// Resetting is a generation bump, so a new run never walks the whole table.
pub struct SearchSpace {
    pub(crate) rng: Range,
    pub(crate) width: usize,
    pub(crate) nodes: Vec<Node>,
    pub(crate) generation: u32,
    pub(crate) trace: Vec<Point>,
    /// Origin of the last run, `None` before the first run or after a reset.
    pub(crate) origin: Option<Point>,
    pub(crate) nbuf: Vec<Point>,
}

impl SearchSpace {
    /// Create a new space covering `rng`.
    pub fn new(rng: Range) -> Self {
        Self {
            rng,
            width: rng.width().max(0) as usize,
            nodes: vec![Node::default(); rng.len()],
            generation: 0,
            trace: Vec::new(),
            origin: None,
            nbuf: Vec::with_capacity(4),
        }
    }

    /// The grid rectangle being searched.
    #[inline]
    pub fn range(&self) -> Range {
        self.rng
    }

    /// Forget the last run: every cell reads as unreached and unvisited
    /// with no predecessor, and the trace is emptied.
    pub fn reset(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            // Wrapped: old stamps could collide with the new generation.
            self.nodes.fill(Node::default());
            self.generation = 1;
        }
        self.trace.clear();
        self.origin = None;
    }

    /// Exploration trace of the last run, in the order cells were
    /// finalized.
    #[inline]
    pub fn trace(&self) -> &[Point] {
        &self.trace
    }

    /// Tentative distance of `p` in the last run. `None` means Infinity:
    /// never reached, outside the range, or reset since.
    pub fn distance_at(&self, p: Point) -> Option<i32> {
        self.node(p).map(|n| n.distance).filter(|&d| d != UNREACHABLE)
    }

    /// Whether `p` was finalized by the last run.
    pub fn is_visited(&self, p: Point) -> bool {
        self.node(p).is_some_and(|n| n.visited)
    }

    /// The cell `p` was reached from in the last run.
    pub fn predecessor(&self, p: Point) -> Option<Point> {
        self.node(p)
            .filter(|n| n.parent != NO_PARENT)
            .map(|n| self.point(n.parent))
    }

    fn node(&self, p: Point) -> Option<&Node> {
        let i = self.idx(p)?;
        let n = &self.nodes[i];
        (n.generation == self.generation).then_some(n)
    }

    // -----------------------------------------------------------------------
    // Coordinate helpers
    // -----------------------------------------------------------------------

    /// Convert a `Point` to a flat index. Returns `None` if out of range.
    #[inline]
    pub(crate) fn idx(&self, p: Point) -> Option<usize> {
        if !self.rng.contains(p) {
            return None;
        }
        let x = (p.x - self.rng.min.x) as usize;
        let y = (p.y - self.rng.min.y) as usize;
        Some(y * self.width + x)
    }

    /// Convert a flat index back to a `Point`.
    #[inline]
    pub(crate) fn point(&self, idx: usize) -> Point {
        let x = (idx % self.width) as i32 + self.rng.min.x;
        let y = (idx / self.width) as i32 + self.rng.min.y;
        Point::new(x, y)
    }
}

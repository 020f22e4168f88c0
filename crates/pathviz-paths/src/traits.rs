use pathviz_core::Point;

/// Neighbour enumeration for the search. Implementors yield only cells that
/// may be entered; blocked cells are simply left out.
pub trait Pather {
    /// Append neighbors of `p` into `buf`. The caller clears `buf` before calling.
    fn neighbors(&self, p: Point, buf: &mut Vec<Point>);
}

use pathviz_core::Point;

/// Manhattan (L1) distance between two points. On a 4-connected grid with
/// no obstacles this is the shortest path length.
#[inline]
pub fn manhattan(a: Point, b: Point) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

//! The editable grid: cell roles, the tracked origin and target, and the
//! mutation rules that keep exactly one of each.

use std::fmt;

use log::trace;
use pathviz_core::{Point, Range};
use pathviz_paths::Pather;
use rand::{Rng, RngExt};
use thiserror::Error;

use crate::config::Config;

// ---------------------------------------------------------------------------
// Role / Endpoint
// ---------------------------------------------------------------------------

/// What occupies a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Role {
    #[default]
    Empty,
    Wall,
    Origin,
    Target,
}

impl Role {
    /// Whether this is the origin or the target.
    #[inline]
    pub const fn is_endpoint(self) -> bool {
        matches!(self, Self::Origin | Self::Target)
    }

    /// ASCII rendering used by [`Board`]'s `Display` impl.
    pub const fn symbol(self) -> char {
        match self {
            Self::Empty => '.',
            Self::Wall => '#',
            Self::Origin => 'S',
            Self::Target => 'T',
        }
    }
}

/// One of the two distinguished cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Endpoint {
    Origin,
    Target,
}

impl Endpoint {
    #[inline]
    pub const fn role(self) -> Role {
        match self {
            Self::Origin => Role::Origin,
            Self::Target => Role::Target,
        }
    }

    #[inline]
    pub const fn other(self) -> Self {
        match self {
            Self::Origin => Self::Target,
            Self::Target => Self::Origin,
        }
    }

    /// The endpoint a role stands for, if any.
    pub const fn from_role(role: Role) -> Option<Self> {
        match role {
            Role::Origin => Some(Self::Origin),
            Role::Target => Some(Self::Target),
            _ => None,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Origin => f.write_str("origin"),
            Self::Target => f.write_str("target"),
        }
    }
}

// ---------------------------------------------------------------------------
// BoardError
// ---------------------------------------------------------------------------

/// Errors reported by [`Board`] operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BoardError {
    #[error("position {pos} is outside the {width}x{height} board")]
    OutOfBounds { pos: Point, width: i32, height: i32 },
    #[error("invalid board dimensions {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },
    #[error("wall probability {0} is not within [0, 1]")]
    InvalidProbability(f64),
    #[error("origin and target must be distinct, both are at {0}")]
    SharedEndpoint(Point),
}

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

/// Largest accepted width or height. Board cells are drawn at terminal
/// coordinates, which are `u16`.
pub const MAX_SIDE: i32 = 1024;

/// A fixed-size grid of [`Role`]s with exactly one origin and one target.
///
/// Every mutation replaces the role of a single cell (or, for
/// [`relocate`](Self::relocate), atomically moves a distinguished cell).
/// Positions outside the board fail with [`BoardError::OutOfBounds`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    roles: Vec<Role>,
    bounds: Range,
    origin: Point,
    target: Point,
}

impl Board {
    /// Build an empty board with the origin and target marked.
    pub fn new(width: i32, height: i32, origin: Point, target: Point) -> Result<Self, BoardError> {
        let side_ok = |n: i32| (1..=MAX_SIDE).contains(&n);
        let len = width
            .checked_mul(height)
            .filter(|_| side_ok(width) && side_ok(height))
            .ok_or(BoardError::InvalidDimensions { width, height })?;
        let mut board = Self {
            roles: vec![Role::Empty; len as usize],
            bounds: Range::new(0, 0, width, height),
            origin,
            target,
        };
        let oi = board.index(origin)?;
        let ti = board.index(target)?;
        if oi == ti {
            return Err(BoardError::SharedEndpoint(origin));
        }
        board.roles[oi] = Role::Origin;
        board.roles[ti] = Role::Target;
        Ok(board)
    }

    /// Build the board described by `config`.
    pub fn from_config(config: &Config) -> Result<Self, BoardError> {
        Self::new(config.width, config.height, config.origin, config.target)
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.bounds.width()
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.bounds.height()
    }

    #[inline]
    pub fn bounds(&self) -> Range {
        self.bounds
    }

    #[inline]
    pub fn origin(&self) -> Point {
        self.origin
    }

    #[inline]
    pub fn target(&self) -> Point {
        self.target
    }

    /// Position of the given endpoint.
    #[inline]
    pub fn endpoint(&self, which: Endpoint) -> Point {
        match which {
            Endpoint::Origin => self.origin,
            Endpoint::Target => self.target,
        }
    }

    fn index(&self, p: Point) -> Result<usize, BoardError> {
        if !self.bounds.contains(p) {
            return Err(BoardError::OutOfBounds {
                pos: p,
                width: self.width(),
                height: self.height(),
            });
        }
        Ok((p.y * self.width() + p.x) as usize)
    }

    /// Role of the cell at `p`.
    pub fn role(&self, p: Point) -> Result<Role, BoardError> {
        self.index(p).map(|i| self.roles[i])
    }

    /// Whether `p` is an in-bounds wall. Out-of-bounds reads as `false`.
    pub fn is_wall(&self, p: Point) -> bool {
        self.index(p).is_ok_and(|i| self.roles[i] == Role::Wall)
    }

    /// Number of wall cells.
    pub fn wall_count(&self) -> usize {
        self.roles.iter().filter(|&&r| r == Role::Wall).count()
    }

    /// Row-major iterator over `(Point, Role)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Point, Role)> + '_ {
        self.bounds.iter().zip(self.roles.iter().copied())
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Flip `p` between empty and wall. The origin and target are left
    /// alone. Returns whether the cell changed.
    pub fn toggle_wall(&mut self, p: Point) -> Result<bool, BoardError> {
        let i = self.index(p)?;
        let next = match self.roles[i] {
            Role::Empty => Role::Wall,
            Role::Wall => Role::Empty,
            Role::Origin | Role::Target => return Ok(false),
        };
        self.roles[i] = next;
        trace!("toggle {p}: {next:?}");
        Ok(true)
    }

    /// Move an endpoint to `p`, clearing its old cell.
    ///
    /// A wall at `p` is overwritten. Moving onto the other endpoint is
    /// refused, as is moving onto the current cell; both return
    /// `Ok(false)`.
    pub fn relocate(&mut self, p: Point, which: Endpoint) -> Result<bool, BoardError> {
        let ni = self.index(p)?;
        if p == self.endpoint(which) || p == self.endpoint(which.other()) {
            return Ok(false);
        }
        let oi = self.index(self.endpoint(which))?;
        self.roles[oi] = Role::Empty;
        self.roles[ni] = which.role();
        match which {
            Endpoint::Origin => self.origin = p,
            Endpoint::Target => self.target = p,
        }
        trace!("relocate {which} to {p}");
        Ok(true)
    }

    /// Re-roll every non-distinguished cell: it becomes a wall when a
    /// uniform `[0, 1)` sample is below `probability`, empty otherwise.
    ///
    /// Cells are sampled in row-major order, one draw each, so a seeded
    /// `rng` reproduces the layout. Returns the number of walls.
    pub fn randomize_walls<R: Rng + ?Sized>(
        &mut self,
        probability: f64,
        rng: &mut R,
    ) -> Result<usize, BoardError> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(BoardError::InvalidProbability(probability));
        }
        let mut walls = 0;
        for role in self.roles.iter_mut().filter(|r| !r.is_endpoint()) {
            *role = if rng.random::<f64>() < probability {
                walls += 1;
                Role::Wall
            } else {
                Role::Empty
            };
        }
        Ok(walls)
    }

    /// Turn every wall back into an empty cell.
    pub fn clear_walls(&mut self) {
        for role in self.roles.iter_mut().filter(|r| **r == Role::Wall) {
            *role = Role::Empty;
        }
    }
}

impl Pather for Board {
    fn neighbors(&self, p: Point, buf: &mut Vec<Point>) {
        buf.extend(
            p.neighbors_4()
                .into_iter()
                .filter(|&q| self.index(q).is_ok_and(|i| self.roles[i] != Role::Wall)),
        );
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height() {
            let line = self.bounds.line(y);
            for p in line {
                write!(f, "{}", self.roles[(p.y * self.width() + p.x) as usize].symbol())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn board() -> Board {
        Board::from_config(&Config::default()).unwrap()
    }

    fn assert_one_of_each(b: &Board) {
        let origins: Vec<_> = b.iter().filter(|(_, r)| *r == Role::Origin).collect();
        let targets: Vec<_> = b.iter().filter(|(_, r)| *r == Role::Target).collect();
        assert_eq!(origins, vec![(b.origin(), Role::Origin)]);
        assert_eq!(targets, vec![(b.target(), Role::Target)]);
    }

    #[test]
    fn default_board_layout() {
        let b = board();
        assert_eq!((b.width(), b.height()), (50, 20));
        assert_eq!(b.origin(), Point::new(15, 10));
        assert_eq!(b.target(), Point::new(35, 10));
        assert_eq!(b.wall_count(), 0);
        assert_one_of_each(&b);
    }

    #[test]
    fn construction_errors() {
        assert_eq!(
            Board::new(0, 5, Point::ZERO, Point::new(1, 0)),
            Err(BoardError::InvalidDimensions { width: 0, height: 5 })
        );
        assert_eq!(
            Board::new(4, 4, Point::new(4, 0), Point::new(1, 0)),
            Err(BoardError::OutOfBounds { pos: Point::new(4, 0), width: 4, height: 4 })
        );
        assert_eq!(
            Board::new(4, 4, Point::new(1, 1), Point::new(1, 1)),
            Err(BoardError::SharedEndpoint(Point::new(1, 1)))
        );
    }

    #[test]
    fn oversized_dimensions_are_rejected() {
        let huge = Config { width: 100_000, height: 100_000, ..Config::default() };
        assert_eq!(
            huge.validate(),
            Err(BoardError::InvalidDimensions { width: 100_000, height: 100_000 })
        );
        assert_eq!(
            Board::new(i32::MAX, 2, Point::ZERO, Point::new(1, 0)),
            Err(BoardError::InvalidDimensions { width: i32::MAX, height: 2 })
        );
        assert_eq!(
            Board::new(MAX_SIDE + 1, 1, Point::ZERO, Point::new(1, 0)),
            Err(BoardError::InvalidDimensions { width: MAX_SIDE + 1, height: 1 })
        );
        let b = Board::new(MAX_SIDE, 2, Point::ZERO, Point::new(1, 0)).unwrap();
        assert_eq!(b.iter().count(), MAX_SIDE as usize * 2);
    }

    #[test]
    fn toggle_twice_restores() {
        let mut b = board();
        let before = b.clone();
        let p = Point::new(3, 4);
        assert!(b.toggle_wall(p).unwrap());
        assert_eq!(b.role(p), Ok(Role::Wall));
        assert_eq!(b.wall_count(), 1);
        assert!(b.toggle_wall(p).unwrap());
        assert_eq!(b, before);
    }

    #[test]
    fn toggle_ignores_endpoints() {
        let mut b = board();
        assert_eq!(b.toggle_wall(b.origin()), Ok(false));
        assert_eq!(b.toggle_wall(b.target()), Ok(false));
        assert_one_of_each(&b);
    }

    #[test]
    fn out_of_bounds_fails_loudly() {
        let mut b = board();
        let p = Point::new(50, 0);
        let err = BoardError::OutOfBounds { pos: p, width: 50, height: 20 };
        assert_eq!(b.toggle_wall(p), Err(err.clone()));
        assert_eq!(b.role(p), Err(err.clone()));
        assert_eq!(b.relocate(p, Endpoint::Origin), Err(err));
        assert!(!b.is_wall(Point::new(-1, -1)));
    }

    #[test]
    fn relocate_moves_and_overwrites_walls() {
        let mut b = board();
        let p = Point::new(0, 0);
        b.toggle_wall(p).unwrap();
        assert_eq!(b.relocate(p, Endpoint::Origin), Ok(true));
        assert_eq!(b.origin(), p);
        assert_eq!(b.role(Point::new(15, 10)), Ok(Role::Empty));
        assert_eq!(b.wall_count(), 0);
        assert_one_of_each(&b);
    }

    #[test]
    fn relocate_onto_other_endpoint_is_refused() {
        let mut b = board();
        let before = b.clone();
        assert_eq!(b.relocate(b.target(), Endpoint::Origin), Ok(false));
        assert_eq!(b.relocate(b.origin(), Endpoint::Target), Ok(false));
        assert_eq!(b.relocate(b.target(), Endpoint::Target), Ok(false));
        assert_eq!(b, before);
    }

    #[test]
    fn relocate_keeps_one_of_each() {
        let mut b = board();
        let mut rng = SmallRng::seed_from_u64(7);
        b.randomize_walls(0.3, &mut rng).unwrap();
        for (i, p) in b.bounds().iter().enumerate().step_by(37) {
            let which = if i % 2 == 0 { Endpoint::Origin } else { Endpoint::Target };
            b.relocate(p, which).unwrap();
            assert_one_of_each(&b);
        }
    }

    #[test]
    fn randomize_is_reproducible_and_spares_endpoints() {
        let mut a = board();
        let mut b = board();
        let wa = a.randomize_walls(0.3, &mut SmallRng::seed_from_u64(42)).unwrap();
        let wb = b.randomize_walls(0.3, &mut SmallRng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
        assert_eq!(wa, wb);
        assert_eq!(wa, a.wall_count());
        assert_one_of_each(&a);
    }

    #[test]
    fn randomize_extremes() {
        let mut b = board();
        let mut rng = SmallRng::seed_from_u64(1);
        b.toggle_wall(Point::new(1, 1)).unwrap();
        assert_eq!(b.randomize_walls(0.0, &mut rng), Ok(0));
        assert_eq!(b.wall_count(), 0);
        assert_eq!(b.randomize_walls(1.0, &mut rng), Ok(50 * 20 - 2));
        assert_one_of_each(&b);
        assert_eq!(
            b.randomize_walls(1.5, &mut rng),
            Err(BoardError::InvalidProbability(1.5))
        );
    }

    #[test]
    fn clear_walls_keeps_endpoints() {
        let mut b = board();
        b.randomize_walls(0.5, &mut SmallRng::seed_from_u64(3)).unwrap();
        b.relocate(Point::new(2, 2), Endpoint::Target).unwrap();
        b.clear_walls();
        assert_eq!(b.wall_count(), 0);
        assert_eq!(b.target(), Point::new(2, 2));
        assert_one_of_each(&b);
    }

    #[test]
    fn pather_skips_walls_and_edges() {
        let mut b = Board::new(3, 3, Point::new(0, 0), Point::new(2, 2)).unwrap();
        b.toggle_wall(Point::new(1, 0)).unwrap();
        let mut buf = Vec::new();
        b.neighbors(Point::new(0, 0), &mut buf);
        assert_eq!(buf, vec![Point::new(0, 1)]);
        buf.clear();
        b.neighbors(Point::new(1, 1), &mut buf);
        assert_eq!(buf, vec![Point::new(2, 1), Point::new(1, 2), Point::new(0, 1)]);
    }

    #[test]
    fn display_renders_ascii() {
        let mut b = Board::new(4, 2, Point::new(0, 0), Point::new(3, 1)).unwrap();
        b.toggle_wall(Point::new(1, 1)).unwrap();
        assert_eq!(b.to_string(), "S...\n.#.T\n");
    }
}

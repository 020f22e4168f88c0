//! Uniform-cost shortest-path search on 2D grids.
//!
//! [`SearchSpace`] owns the per-cell scratch (tentative distance, visited
//! flag, predecessor) for one grid rectangle. [`SearchSpace::search`] runs
//! the search and records the exploration trace;
//! [`SearchSpace::reconstruct_path`] recovers the shortest path from the
//! predecessor links. Grids plug in through the [`Pather`] trait.
//!
//! Scratch is reset by bumping a generation counter, so repeated searches
//! reuse the same allocation without clearing it.

mod distance;
mod path;
mod search;
mod space;
mod traits;

pub use distance::manhattan;
pub use search::Search;
pub use space::{SearchSpace, UNREACHABLE};
pub use traits::Pather;

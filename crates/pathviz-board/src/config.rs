//! Adjustable parameters of the demonstrator.

use pathviz_core::Point;

use crate::board::BoardError;

/// Board geometry, initial endpoints, playback timing and the wall
/// density used by random layouts.
///
/// Delays are in logical time units; the terminal front-end treats one
/// unit as one millisecond.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    pub width: i32,
    pub height: i32,
    pub origin: Point,
    pub target: Point,
    /// Spacing between exploration marks.
    pub visit_delay: u64,
    /// Spacing between path marks.
    pub path_delay: u64,
    /// Chance that a cell becomes a wall in a random layout.
    pub wall_probability: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: 50,
            height: 20,
            origin: Point::new(15, 10),
            target: Point::new(35, 10),
            visit_delay: 10,
            path_delay: 50,
            wall_probability: 0.3,
        }
    }
}

impl Config {
    /// Check the values a [`Board`](crate::Board) cannot be built from.
    pub fn validate(&self) -> Result<(), BoardError> {
        if !(0.0..=1.0).contains(&self.wall_probability) {
            return Err(BoardError::InvalidProbability(self.wall_probability));
        }
        crate::Board::from_config(self).map(|_| ())
    }
}

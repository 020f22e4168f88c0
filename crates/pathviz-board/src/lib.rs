//! The interactive side of pathviz: the editable [`Board`], the timed
//! [`Playback`] of a search, and the [`Editor`] that ties them to pointer
//! gestures.

pub mod board;
pub mod config;
pub mod editor;
pub mod events;
pub mod playback;

pub use board::{Board, BoardError, Endpoint, MAX_SIDE, Role};
pub use config::Config;
pub use editor::{Editor, Gesture, RunSummary};
pub use events::EventQueue;
pub use playback::{Generation, Mark, Overlay, Playback, PlaybackStatus, VisualSink};

//! **pathviz-core**: terminal application plumbing for the pathviz
//! shortest-path demonstrator.
//!
//! This crate provides the foundational types shared by the other pathviz
//! crates: geometry primitives, styled glyphs, a screen canvas with frame
//! diffing, input messages, and the Elm-architecture application loop.

pub mod app;
pub mod canvas;
pub mod geom;
pub mod glyph;
pub mod messages;
pub mod style;

pub use app::{App, AppConfig, Context, Driver, Effect, Model, cmd};
pub use canvas::{Canvas, Frame, FrameCell};
pub use geom::{Point, Range};
pub use glyph::Glyph;
pub use messages::{Key, MouseAction, Msg};
pub use style::{AttrMask, Color, Style};

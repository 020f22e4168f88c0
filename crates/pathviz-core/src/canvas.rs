//! The [`Canvas`] screen buffer a model draws into, and frame diffing.
//!
//! The application loop keeps two canvases: the one last flushed to the
//! driver and the one just drawn. [`compute_frame`] turns the difference into
//! a [`Frame`] of changed glyphs, so drivers only repaint what moved.

use crate::geom::{Point, Range};
use crate::glyph::Glyph;

// ---------------------------------------------------------------------------
// Canvas
// ---------------------------------------------------------------------------

/// A fixed-size 2D buffer of [`Glyph`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    glyphs: Vec<Glyph>,
    bounds: Range,
}

impl Canvas {
    /// Create a canvas of the given dimensions filled with blank glyphs.
    pub fn new(width: i32, height: i32) -> Self {
        let bounds = Range::new(0, 0, width.max(0), height.max(0));
        Self {
            glyphs: vec![Glyph::default(); bounds.len()],
            bounds,
        }
    }

    #[inline]
    pub fn bounds(&self) -> Range {
        self.bounds
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
    fn index(&self, p: Point) -> Option<usize> {
        if !self.bounds.contains(p) {
            return None;
        }
        Some((p.y * self.bounds.width() + p.x) as usize)
    }

    /// Read the glyph at `p`. Returns a blank glyph outside the bounds.
    pub fn at(&self, p: Point) -> Glyph {
        self.index(p)
            .map(|i| self.glyphs[i])
            .unwrap_or_default()
    }

    /// Set the glyph at `p`. Positions outside the canvas are clipped.
    pub fn set(&mut self, p: Point, glyph: Glyph) {
        if let Some(i) = self.index(p) {
            self.glyphs[i] = glyph;
        }
    }

    /// Fill the whole canvas with `glyph`.
    pub fn fill(&mut self, glyph: Glyph) {
        self.glyphs.fill(glyph);
    }

    /// Write `text` starting at `at`, one glyph per character, clipped to
    /// the canvas. Returns the number of glyphs written.
    pub fn text(&mut self, at: Point, text: &str, glyph: Glyph) -> usize {
        let mut written = 0;
        for (i, ch) in text.chars().enumerate() {
            let p = at.shift(i as i32, 0);
            if !self.bounds.contains(p) {
                break;
            }
            self.set(p, glyph.with_char(ch));
            written += 1;
        }
        written
    }

    /// Copy every glyph of `src` into `self`. Both canvases must have the
    /// same size; mismatched sizes copy the overlapping prefix.
    pub fn copy_from(&mut self, src: &Canvas) {
        if self.bounds == src.bounds {
            self.glyphs.copy_from_slice(&src.glyphs);
            return;
        }
        for p in self.bounds.intersect(src.bounds) {
            self.set(p, src.at(p));
        }
    }

    /// Row-major iterator over `(Point, Glyph)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Point, Glyph)> + '_ {
        self.bounds.iter().zip(self.glyphs.iter().copied())
    }
}

// ---------------------------------------------------------------------------
// Frame / FrameCell / compute_frame
// ---------------------------------------------------------------------------

/// A single glyph that changed between two draws.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameCell {
    pub glyph: Glyph,
    pub pos: Point,
}

/// A set of glyph changes (a diff frame).
#[derive(Clone, Debug, Default)]
pub struct Frame {
    pub cells: Vec<FrameCell>,
    pub width: i32,
    pub height: i32,
}

/// Compute the difference between two same-sized canvases.
pub fn compute_frame(prev: &Canvas, curr: &Canvas) -> Frame {
    let cells = curr
        .iter()
        .filter(|&(p, g)| prev.at(p) != g)
        .map(|(pos, glyph)| FrameCell { glyph, pos })
        .collect();
    Frame {
        cells,
        width: curr.width(),
        height: curr.height(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_canvas_is_blank() {
        let c = Canvas::new(4, 3);
        assert_eq!(c.bounds().size(), Point::new(4, 3));
        assert!(c.iter().all(|(_, g)| g == Glyph::default()));
    }

    #[test]
    fn set_and_at_clip_outside() {
        let mut c = Canvas::new(4, 3);
        c.set(Point::new(2, 1), Glyph::default().with_char('X'));
        c.set(Point::new(10, 10), Glyph::default().with_char('Y'));
        assert_eq!(c.at(Point::new(2, 1)).ch, 'X');
        assert_eq!(c.at(Point::new(10, 10)), Glyph::default());
    }

    #[test]
    fn text_is_clipped_at_right_edge() {
        let mut c = Canvas::new(5, 1);
        let n = c.text(Point::new(2, 0), "hello", Glyph::default());
        assert_eq!(n, 3);
        assert_eq!(c.at(Point::new(4, 0)).ch, 'l');
    }

    #[test]
    fn frame_contains_only_changes() {
        let a = Canvas::new(3, 2);
        let mut b = Canvas::new(3, 2);
        b.set(Point::new(1, 0), Glyph::default().with_char('A'));
        let frame = compute_frame(&a, &b);
        assert_eq!(frame.cells.len(), 1);
        assert_eq!(frame.cells[0].pos, Point::new(1, 0));
        assert_eq!(frame.cells[0].glyph.ch, 'A');

        let mut prev = a.clone();
        prev.copy_from(&b);
        assert!(compute_frame(&prev, &b).cells.is_empty());
    }
}

//! The pathviz terminal model.
//!
//! Demonstrates: wall painting and endpoint dragging with the mouse,
//! uniform-cost search, and the timed replay of explored cells followed by
//! the shortest path.

use std::time::Instant;

use log::{info, warn};
use pathviz_board::{Board, BoardError, Config, Editor, Mark, PlaybackStatus, Role, RunSummary};
use pathviz_core::{
    AttrMask, Canvas, Color, Effect, Glyph, Key, Model, MouseAction, Msg, Point, Range, Style,
};
use rand::SeedableRng;
use rand::rngs::SmallRng;

/// Rows above the board (status line).
const HEADER: i32 = 1;
/// Rows below the board (legend and key help).
const FOOTER: i32 = 2;
const MIN_WIDTH: i32 = 64;

// Colours
const COL_BG: Color = Color::from_rgb(18, 18, 26);
const COL_EMPTY: Color = Color::from_rgb(60, 60, 75);
const COL_WALL: Color = Color::from_rgb(150, 150, 170);
const COL_ORIGIN: Color = Color::from_rgb(80, 220, 100);
const COL_TARGET: Color = Color::from_rgb(230, 70, 70);
const COL_VISITED: Color = Color::from_rgb(40, 90, 140);
const COL_PATH: Color = Color::from_rgb(240, 200, 60);
const COL_TEXT: Color = Color::from_rgb(200, 200, 210);
const COL_STATUS_BG: Color = Color::from_rgb(30, 30, 50);

const HELP_LINE: &str = "enter/v/space: run  r: random walls  c: clear  R: reset  q: quit";
const LEGEND: [(char, Color, &str); 5] = [
    ('S', COL_ORIGIN, "origin"),
    ('T', COL_TARGET, "target"),
    ('#', COL_WALL, "wall"),
    (' ', COL_VISITED, "explored"),
    ('*', COL_PATH, "path"),
];

/// Application model wrapping an [`Editor`].
pub struct Visualizer {
    editor: Editor,
    rng: SmallRng,
    /// Screen rectangle the board is drawn in.
    board_area: Range,
    /// Instant of the first tick; the replay clock counts milliseconds from
    /// here.
    epoch: Option<Instant>,
    status: String,
}

impl Visualizer {
    pub fn new(config: Config, seed: u64) -> Result<Self, BoardError> {
        let editor = Editor::new(config)?;
        let board = editor.board();
        let board_area = Range::new(0, HEADER, board.width(), HEADER + board.height());
        Ok(Self {
            editor,
            rng: SmallRng::seed_from_u64(seed),
            board_area,
            epoch: None,
            status: String::from("click to paint walls, drag S or T to move them"),
        })
    }

    /// Canvas size needed to draw the board with its header and footer.
    pub fn size(&self) -> (i32, i32) {
        let board = self.editor.board();
        (board.width().max(MIN_WIDTH), HEADER + board.height() + FOOTER)
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    /// The last status message.
    pub fn status(&self) -> &str {
        &self.status
    }

    fn run(&mut self) {
        let RunSummary {
            trace_len,
            path_len,
            reached,
            ..
        } = self.editor.run();
        self.status = if reached {
            format!("explored {trace_len} cells, path of {} steps", path_len - 1)
        } else {
            format!("explored {trace_len} cells, target unreachable")
        };
        info!("{}", self.status);
    }

    fn randomize(&mut self) {
        match self.editor.randomize_walls(&mut self.rng) {
            Ok(walls) => self.status = format!("random layout with {walls} walls"),
            Err(e) => self.report(e),
        }
    }

    fn report(&mut self, e: BoardError) {
        warn!("{e}");
        self.status = e.to_string();
    }

    fn key_down(&mut self, key: Key) -> Option<Effect> {
        match key {
            Key::Escape | Key::Char('q') => return Some(Effect::End),
            Key::Enter | Key::Space | Key::Char('v') => self.run(),
            Key::Char('r') => self.randomize(),
            Key::Char('c') => {
                self.editor.clear();
                self.status = String::from("walls cleared");
            }
            Key::Char('R') => match self.editor.reset() {
                Ok(()) => self.status = String::from("board reset"),
                Err(e) => self.report(e),
            },
            _ => {}
        }
        None
    }

    /// Handle a mouse message already translated to board coordinates.
    fn mouse(&mut self, action: MouseAction, pos: Point) {
        let on_board = self.editor.board().bounds().contains(pos);
        let result = match action {
            MouseAction::Main if on_board => self.editor.pointer_down(pos),
            MouseAction::Move if on_board => self.editor.pointer_enter(pos).map(|_| ()),
            MouseAction::Move => {
                self.editor.pointer_leave();
                Ok(())
            }
            MouseAction::Release => {
                self.editor.pointer_up();
                Ok(())
            }
            MouseAction::Main => Ok(()),
        };
        if let Err(e) = result {
            self.report(e);
        }
    }

    fn tick(&mut self, time: Instant) {
        let epoch = *self.epoch.get_or_insert(time);
        let now = time.saturating_duration_since(epoch).as_millis() as u64;
        if self.editor.tick(now) == PlaybackStatus::Completed {
            self.status.push_str(" (done)");
        }
    }

    fn cell_glyph(role: Role, mark: Mark) -> Glyph {
        let bg = match mark {
            Mark::None => COL_BG,
            Mark::Visited => COL_VISITED,
            Mark::Path => COL_PATH,
        };
        let style = Style::new(COL_EMPTY, bg);
        match role {
            Role::Origin => Glyph::new('S', style.with_fg(COL_ORIGIN).with_attrs(AttrMask::BOLD)),
            Role::Target => Glyph::new('T', style.with_fg(COL_TARGET).with_attrs(AttrMask::BOLD)),
            Role::Wall => Glyph::new('#', style.with_fg(COL_WALL).with_bg(COL_BG)),
            Role::Empty if mark == Mark::Path => Glyph::new('*', style.with_fg(COL_BG)),
            Role::Empty if mark == Mark::Visited => Glyph::new(' ', style),
            Role::Empty => Glyph::new('.', style),
        }
    }

    fn draw_board(&self, canvas: &mut Canvas, board: &Board) {
        let overlay = self.editor.overlay();
        for (p, role) in board.iter() {
            canvas.set(p + self.board_area.min, Self::cell_glyph(role, overlay.mark(p)));
        }
    }
}

impl Model for Visualizer {
    fn update(&mut self, msg: Msg) -> Option<Effect> {
        match self.board_area.rel_msg(msg) {
            Msg::Init => None,
            Msg::Quit => Some(Effect::End),
            Msg::KeyDown { key, .. } => self.key_down(key),
            Msg::Mouse { action, pos, .. } => {
                self.mouse(action, pos);
                None
            }
            Msg::Tick { time } => {
                self.tick(time);
                None
            }
            Msg::Screen { .. } => None,
        }
    }

    fn draw(&self, canvas: &mut Canvas) {
        let text = Glyph::new(' ', Style::new(COL_TEXT, COL_BG));
        canvas.fill(text);

        // ---- Status line ----
        let status = text.with_style(text.style.with_bg(COL_STATUS_BG));
        for p in canvas.bounds().line(0) {
            canvas.set(p, status);
        }
        let board = self.editor.board();
        let title = status.with_style(status.style.with_attrs(AttrMask::BOLD));
        let mut x = canvas.text(Point::new(0, 0), "pathviz", title) as i32;
        x += canvas.text(
            Point::new(x, 0),
            &format!("  walls: {}  ", board.wall_count()),
            status,
        ) as i32;
        canvas.text(Point::new(x, 0), &self.status, status);

        // ---- Board ----
        self.draw_board(canvas, board);

        // ---- Legend and help ----
        let legend_y = self.board_area.max.y;
        let mut x = 0;
        for (ch, color, label) in LEGEND {
            let swatch = if ch == ' ' {
                text.with_style(text.style.with_bg(color))
            } else {
                Glyph::new(ch, text.style.with_fg(color))
            };
            canvas.set(Point::new(x, legend_y), swatch);
            x += 2;
            x += canvas.text(Point::new(x, legend_y), label, text) as i32 + 2;
        }
        canvas.text(
            Point::new(0, legend_y + 1),
            HELP_LINE,
            text.with_style(text.style.with_attrs(AttrMask::DIM)),
        );
    }
}

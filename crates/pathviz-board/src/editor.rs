//! Pointer-driven editing of the board and orchestration of runs.
//!
//! [`Editor`] owns every piece of mutable state: the [`Board`], the search
//! scratch, the [`Playback`] scheduler and the [`Overlay`] it paints. The
//! front-end feeds it pointer gestures, run requests and clock ticks.

use log::{debug, trace, warn};
use pathviz_core::Point;
use pathviz_paths::SearchSpace;
use rand::Rng;

use crate::board::{Board, BoardError, Endpoint};
use crate::config::Config;
use crate::playback::{Generation, Overlay, Playback, PlaybackStatus};

/// What a held pointer is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    /// Toggling walls on every cell entered.
    Painting,
    /// Dragging an endpoint.
    Grabbed(Endpoint),
}

/// What a call to [`Editor::run`] scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub generation: Generation,
    /// Number of cells the search finalized.
    pub trace_len: usize,
    /// Number of cells on the shortest path, 0 when unreachable.
    pub path_len: usize,
    pub reached: bool,
}

/// Interactive controller over a [`Board`] and its replay.
pub struct Editor {
    config: Config,
    board: Board,
    space: SearchSpace,
    playback: Playback,
    overlay: Overlay,
    gesture: Gesture,
    last_entered: Option<Point>,
    last_run_completed: bool,
}

impl Editor {
    pub fn new(config: Config) -> Result<Self, BoardError> {
        config.validate()?;
        let board = Board::from_config(&config)?;
        Ok(Self {
            space: SearchSpace::new(board.bounds()),
            playback: Playback::from_config(&config),
            overlay: Overlay::new(board.bounds()),
            board,
            config,
            gesture: Gesture::Idle,
            last_entered: None,
            last_run_completed: false,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    /// Scratch of the last search, for distance and predecessor queries.
    pub fn search_space(&self) -> &SearchSpace {
        &self.space
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    /// Whether a replay finished since the last edit that cleared it.
    pub fn last_run_completed(&self) -> bool {
        self.last_run_completed
    }

    // -----------------------------------------------------------------------
    // Gestures
    // -----------------------------------------------------------------------

    /// Press on `p`: grab an endpoint, or toggle a wall and start painting.
    ///
    /// A finished or still-playing run is cancelled and its marks are
    /// wiped first; walls are kept.
    pub fn pointer_down(&mut self, p: Point) -> Result<(), BoardError> {
        let role = self.board.role(p)?;
        if self.last_run_completed || self.playback.is_running() {
            trace!("pointer down at {p}: discarding previous run");
            self.stop();
        }
        self.last_entered = Some(p);
        match Endpoint::from_role(role) {
            Some(which) => self.gesture = Gesture::Grabbed(which),
            None => {
                self.board.toggle_wall(p)?;
                self.gesture = Gesture::Painting;
            }
        }
        trace!("pointer down at {p}: {:?}", self.gesture);
        Ok(())
    }

    /// Pointer moved onto `p` while held. Repeated reports for the cell
    /// last entered are ignored. Returns whether the board changed.
    pub fn pointer_enter(&mut self, p: Point) -> Result<bool, BoardError> {
        if self.gesture == Gesture::Idle || self.last_entered == Some(p) {
            return Ok(false);
        }
        let changed = match self.gesture {
            Gesture::Idle => false,
            Gesture::Painting => self.board.toggle_wall(p)?,
            Gesture::Grabbed(which) => {
                let moved = self.board.relocate(p, which)?;
                if !moved && p == self.board.endpoint(which.other()) {
                    warn!("cannot move {which} onto the {} at {p}", which.other());
                }
                moved
            }
        };
        self.last_entered = Some(p);
        Ok(changed)
    }

    /// The held pointer left the board. The gesture stays active, and the
    /// next cell entered counts as a genuine enter even if it is the cell
    /// just left.
    pub fn pointer_leave(&mut self) {
        self.last_entered = None;
    }

    /// Release the pointer.
    pub fn pointer_up(&mut self) {
        self.gesture = Gesture::Idle;
        self.last_entered = None;
    }

    // -----------------------------------------------------------------------
    // Runs
    // -----------------------------------------------------------------------

    /// Search from origin to target and schedule the replay at the current
    /// playback time. Any previous replay is cancelled and wiped.
    pub fn run(&mut self) -> RunSummary {
        self.stop();
        let (origin, target) = (self.board.origin(), self.board.target());
        let search = self.space.search(&self.board, origin, target);
        let path = search.path();
        let generation = self.playback.play(search.trace(), &path, origin, target);
        let summary = RunSummary {
            generation,
            trace_len: search.trace().len(),
            path_len: path.len(),
            reached: search.reached(),
        };
        debug!("run scheduled: {summary:?}");
        summary
    }

    /// Advance the replay clock to `now` and paint what is due.
    pub fn tick(&mut self, now: u64) -> PlaybackStatus {
        let status = self.playback.advance(now, &mut self.overlay);
        if status == PlaybackStatus::Completed {
            self.last_run_completed = true;
        }
        status
    }

    // -----------------------------------------------------------------------
    // Whole-board edits
    // -----------------------------------------------------------------------

    /// Replace the walls with a random layout at the configured density.
    pub fn randomize_walls<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<usize, BoardError> {
        self.stop();
        let walls = self.board.randomize_walls(self.config.wall_probability, rng)?;
        debug!("random layout: {walls} walls");
        Ok(walls)
    }

    /// Remove every wall and forget the last search. Endpoints stay put.
    pub fn clear(&mut self) {
        self.stop();
        self.board.clear_walls();
        self.space.reset();
    }

    /// Rebuild the board from the configuration.
    pub fn reset(&mut self) -> Result<(), BoardError> {
        self.stop();
        self.board = Board::from_config(&self.config)?;
        self.space.reset();
        self.pointer_up();
        Ok(())
    }

    /// Cancel the replay and wipe its marks.
    fn stop(&mut self) {
        self.playback.cancel();
        self.overlay.clear();
        self.last_run_completed = false;
    }
}

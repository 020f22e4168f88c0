//! Timed two-phase replay of a search.
//!
//! [`Playback::play`] schedules every callback up front on a logical
//! clock: one exploration mark per trace entry, then one path mark per path
//! entry, then a completion event. [`Playback::advance`] moves the clock
//! and fires what is due into a [`VisualSink`]. Every callback remembers
//! the generation it was scheduled under; once the generation moves on
//! (through [`Playback::cancel`] or a new `play`) it fires as a no-op.

use log::{debug, trace};
use pathviz_core::{Point, Range};

use crate::config::Config;
use crate::events::EventQueue;

/// Identifies one scheduled replay.
pub type Generation = u64;

// ---------------------------------------------------------------------------
// VisualSink / Overlay
// ---------------------------------------------------------------------------

/// Receiver of playback side-effects. Both calls are idempotent for a given
/// position.
pub trait VisualSink {
    fn mark_visited(&mut self, p: Point);
    fn mark_path(&mut self, p: Point);
}

/// Visual state of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mark {
    #[default]
    None,
    Visited,
    Path,
}

/// Per-cell marks painted by a playback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlay {
    marks: Vec<Mark>,
    bounds: Range,
}

impl Overlay {
    pub fn new(bounds: Range) -> Self {
        Self {
            marks: vec![Mark::None; bounds.len()],
            bounds,
        }
    }

    #[inline]
    pub fn bounds(&self) -> Range {
        self.bounds
    }

    fn index(&self, p: Point) -> Option<usize> {
        if !self.bounds.contains(p) {
            return None;
        }
        let rel = p - self.bounds.min;
        Some((rel.y * self.bounds.width() + rel.x) as usize)
    }

    /// Mark at `p`; `Mark::None` outside the bounds.
    pub fn mark(&self, p: Point) -> Mark {
        self.index(p).map_or(Mark::None, |i| self.marks[i])
    }

    /// Number of cells carrying `mark`.
    pub fn count(&self, mark: Mark) -> usize {
        self.marks.iter().filter(|&&m| m == mark).count()
    }

    /// Remove every mark. Only the visuals are reset.
    pub fn clear(&mut self) {
        self.marks.fill(Mark::None);
    }

    fn set(&mut self, p: Point, mark: Mark) {
        if let Some(i) = self.index(p) {
            self.marks[i] = mark;
        }
    }
}

impl VisualSink for Overlay {
    fn mark_visited(&mut self, p: Point) {
        if self.mark(p) == Mark::None {
            self.set(p, Mark::Visited);
        }
    }

    fn mark_path(&mut self, p: Point) {
        self.set(p, Mark::Path);
    }
}

// ---------------------------------------------------------------------------
// Playback
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Callback {
    Visit(Point),
    Path(Point),
    Done,
}

#[derive(Debug)]
struct Scheduled {
    generation: Generation,
    callback: Callback,
}

/// Outcome of [`Playback::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStatus {
    /// Nothing is playing.
    Idle,
    /// Callbacks of the current generation are still pending.
    Running,
    /// The completion event fired during this call.
    Completed,
}

/// Scheduler for the two-phase replay.
#[derive(Debug)]
pub struct Playback {
    queue: EventQueue<Scheduled>,
    generation: Generation,
    now: u64,
    visit_delay: u64,
    path_delay: u64,
    running: bool,
}

impl Playback {
    pub fn new(visit_delay: u64, path_delay: u64) -> Self {
        Self {
            queue: EventQueue::new(),
            generation: 0,
            now: 0,
            visit_delay,
            path_delay,
            running: false,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.visit_delay, config.path_delay)
    }

    /// Current logical time.
    #[inline]
    pub fn now(&self) -> u64 {
        self.now
    }

    #[inline]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Whether the current generation has not completed yet.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Callbacks of the current generation that have not fired.
    pub fn pending(&self) -> usize {
        self.queue
            .iter()
            .filter(|s| s.generation == self.generation)
            .count()
    }

    /// Schedule the replay of `trace` then `path`, starting at the current
    /// time. Origin and target are never marked but keep their time slot.
    ///
    /// Phase 1 marks `trace[i]` at `now + i * visit_delay`. Phase 2 starts at
    /// `base = now + trace.len() * visit_delay`, which is one visit delay
    /// after the last phase-1 slot, and marks `path[j]` at
    /// `base + j * path_delay`. Completion fires at
    /// `base + path.len() * path_delay`.
    ///
    /// Any previous replay is invalidated. Returns the new generation.
    pub fn play(&mut self, trace: &[Point], path: &[Point], origin: Point, target: Point) -> Generation {
        self.generation += 1;
        let generation = self.generation;
        let start = self.now;
        let skip = |p: &Point| *p == origin || *p == target;

        for (i, p) in trace.iter().enumerate().filter(|(_, p)| !skip(p)) {
            let callback = Callback::Visit(*p);
            self.queue.push(Scheduled { generation, callback }, start + i as u64 * self.visit_delay);
        }
        let base = start + trace.len() as u64 * self.visit_delay;
        for (j, p) in path.iter().enumerate().filter(|(_, p)| !skip(p)) {
            let callback = Callback::Path(*p);
            self.queue.push(Scheduled { generation, callback }, base + j as u64 * self.path_delay);
        }
        let done = base + path.len() as u64 * self.path_delay;
        self.queue.push(Scheduled { generation, callback: Callback::Done }, done);
        self.running = true;

        debug!(
            "playback #{generation}: {} visits, {} path cells, {start}..{done}",
            trace.len(),
            path.len()
        );
        generation
    }

    /// Invalidate the current replay. Already scheduled callbacks stay in
    /// the queue and fire as no-ops.
    pub fn cancel(&mut self) {
        if self.running {
            trace!("playback #{} cancelled at {}", self.generation, self.now);
        }
        self.generation += 1;
        self.running = false;
    }

    /// Move the clock to `now` (it never goes backwards) and fire every
    /// callback due by then, in due order.
    pub fn advance<S: VisualSink + ?Sized>(&mut self, now: u64, sink: &mut S) -> PlaybackStatus {
        self.now = self.now.max(now);
        let mut completed = false;
        while let Some((scheduled, _)) = self.queue.pop_due(self.now) {
            if scheduled.generation != self.generation {
                continue;
            }
            match scheduled.callback {
                Callback::Visit(p) => sink.mark_visited(p),
                Callback::Path(p) => sink.mark_path(p),
                Callback::Done => {
                    debug!("playback #{} completed at {}", self.generation, self.now);
                    self.running = false;
                    completed = true;
                }
            }
        }
        if completed {
            PlaybackStatus::Completed
        } else if self.running {
            PlaybackStatus::Running
        } else {
            PlaybackStatus::Idle
        }
    }
}

impl Default for Playback {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Call {
        Visited(Point),
        Path(Point),
    }

    /// Records each sink call with the clock value it was fired at.
    #[derive(Default)]
    struct Recorder {
        now: u64,
        calls: Vec<(u64, Call)>,
    }

    impl VisualSink for Recorder {
        fn mark_visited(&mut self, p: Point) {
            self.calls.push((self.now, Call::Visited(p)));
        }

        fn mark_path(&mut self, p: Point) {
            self.calls.push((self.now, Call::Path(p)));
        }
    }

    fn run_to_end(pb: &mut Playback, rec: &mut Recorder, until: u64) -> Option<u64> {
        let mut done_at = None;
        for t in pb.now()..=until {
            rec.now = t;
            if pb.advance(t, rec) == PlaybackStatus::Completed {
                done_at = Some(t);
            }
        }
        done_at
    }

    fn line(n: i32) -> Vec<Point> {
        (0..n).map(|x| Point::new(x, 0)).collect()
    }

    #[test]
    fn phases_fire_in_order_at_their_times() {
        let mut pb = Playback::new(10, 50);
        let trace = line(5);
        let path = vec![Point::new(0, 0), Point::new(1, 0), Point::new(2, 0), Point::new(4, 0)];
        let (o, t) = (Point::new(0, 0), Point::new(4, 0));
        pb.play(&trace, &path, o, t);

        let mut rec = Recorder::default();
        let done = run_to_end(&mut pb, &mut rec, 1000);

        assert_eq!(
            rec.calls,
            vec![
                (10, Call::Visited(Point::new(1, 0))),
                (20, Call::Visited(Point::new(2, 0))),
                (30, Call::Visited(Point::new(3, 0))),
                (50 + 50, Call::Path(Point::new(1, 0))),
                (50 + 100, Call::Path(Point::new(2, 0))),
            ]
        );
        assert_eq!(done, Some(50 + 4 * 50));
        assert!(!pb.is_running());
        assert_eq!(pb.pending(), 0);
    }

    #[test]
    fn path_phase_starts_after_last_visit() {
        let mut pb = Playback::new(3, 1);
        let trace = line(40);
        let path = line(40);
        pb.play(&trace, &path, Point::new(-1, -1), Point::new(-2, -2));

        let mut rec = Recorder::default();
        run_to_end(&mut pb, &mut rec, 500);

        let times = |path: bool| {
            rec.calls
                .iter()
                .filter(move |(_, c)| matches!(c, Call::Path(_)) == path)
                .map(|(t, _)| *t)
        };
        let last_visit = times(false).max();
        let first_path = times(true).min();
        assert!(first_path.unwrap() > last_visit.unwrap());
        assert_eq!(rec.calls.len(), 80);
    }

    #[test]
    fn cancel_silences_pending_callbacks() {
        let mut pb = Playback::new(10, 50);
        let trace = line(10);
        pb.play(&trace, &trace, Point::new(0, 0), Point::new(9, 0));

        let mut rec = Recorder::default();
        rec.now = 25;
        assert_eq!(pb.advance(25, &mut rec), PlaybackStatus::Running);
        let fired = rec.calls.len();
        assert_eq!(fired, 2);

        pb.cancel();
        assert!(!pb.is_running());
        assert_eq!(pb.pending(), 0);
        assert_eq!(run_to_end(&mut pb, &mut rec, 2000), None);
        assert_eq!(rec.calls.len(), fired);
    }

    #[test]
    fn new_play_invalidates_previous() {
        let mut pb = Playback::new(10, 50);
        let first = pb.play(&line(10), &line(10), Point::new(0, 0), Point::new(9, 0));
        let mut rec = Recorder::default();
        pb.advance(15, &mut rec);
        rec.calls.clear();

        let trace = [Point::new(5, 5), Point::new(6, 5)];
        let second = pb.play(&trace, &[], Point::new(5, 5), Point::new(7, 7));
        assert!(second > first);
        let done = run_to_end(&mut pb, &mut rec, 2000);

        // Second run starts at 15: visit slot 1 at 25, completion at 35.
        assert_eq!(rec.calls, vec![(25, Call::Visited(Point::new(6, 5)))]);
        assert_eq!(done, Some(35));
    }

    #[test]
    fn clock_never_goes_backwards() {
        let mut pb = Playback::default();
        let mut overlay = Overlay::new(Range::new(0, 0, 4, 1));
        pb.advance(100, &mut overlay);
        pb.advance(50, &mut overlay);
        assert_eq!(pb.now(), 100);
        assert_eq!(pb.advance(200, &mut overlay), PlaybackStatus::Idle);
    }

    #[test]
    fn overlay_marks_and_clear() {
        let mut ov = Overlay::new(Range::new(0, 0, 3, 2));
        let p = Point::new(1, 1);
        ov.mark_visited(p);
        ov.mark_visited(p);
        assert_eq!(ov.mark(p), Mark::Visited);
        ov.mark_path(p);
        ov.mark_visited(p);
        assert_eq!(ov.mark(p), Mark::Path);
        ov.mark_path(Point::new(9, 9));
        assert_eq!(ov.count(Mark::Path), 1);
        ov.clear();
        assert_eq!(ov.count(Mark::None), 6);
    }
}

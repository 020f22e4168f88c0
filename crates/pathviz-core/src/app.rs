//! The Elm-architecture application loop: [`Model`], [`Driver`], [`Effect`],
//! [`App`].
//!
//! Everything runs on one thread. The loop polls the driver for input,
//! feeds messages to the model, emits [`Msg::Tick`] at the configured
//! interval, and flushes only the glyphs that changed since the last draw.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use log::debug;

use crate::canvas::{Canvas, Frame, compute_frame};
use crate::messages::Msg;

// ---------------------------------------------------------------------------
// Context (cancellation token)
// ---------------------------------------------------------------------------

/// A cooperative-cancellation token backed by an [`AtomicBool`].
#[derive(Clone, Debug, Default)]
pub struct Context {
    done: Arc<AtomicBool>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether cancellation has been requested.
    #[inline]
    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::Relaxed)
    }

    /// Request cancellation.
    #[inline]
    pub fn cancel(&self) {
        self.done.store(true, Ordering::Relaxed);
    }
}

// ---------------------------------------------------------------------------
// Effect
// ---------------------------------------------------------------------------

/// A side-effect returned by [`Model::update`].
pub enum Effect {
    /// A one-shot command. A returned message is queued back to the model.
    Cmd(Box<dyn FnOnce() -> Option<Msg>>),
    /// Multiple effects batched together.
    Batch(Vec<Effect>),
    /// Signal the application loop to stop.
    End,
}

impl std::fmt::Debug for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cmd(_) => f.write_str("Effect::Cmd(..)"),
            Self::Batch(v) => f.debug_tuple("Effect::Batch").field(&v.len()).finish(),
            Self::End => f.write_str("Effect::End"),
        }
    }
}

/// Convenience constructor for an [`Effect::Cmd`].
pub fn cmd<F>(f: F) -> Effect
where
    F: FnOnce() -> Option<Msg> + 'static,
{
    Effect::Cmd(Box::new(f))
}

// ---------------------------------------------------------------------------
// Model / Driver
// ---------------------------------------------------------------------------

/// The application model (Elm architecture).
pub trait Model {
    /// Process a message, optionally returning a side-effect.
    fn update(&mut self, msg: Msg) -> Option<Effect>;

    /// Render the current state into `canvas`.
    fn draw(&self, canvas: &mut Canvas);
}

/// Back-end driver (terminal, test harness, ...).
pub trait Driver {
    /// Initialise the back-end.
    fn init(&mut self) -> Result<(), Box<dyn std::error::Error>>;

    /// Poll for input, appending messages to `queue`. Implementations may
    /// block for a short while but must return promptly so ticks keep
    /// flowing.
    fn poll_msgs(
        &mut self,
        ctx: &Context,
        queue: &mut VecDeque<Msg>,
    ) -> Result<(), Box<dyn std::error::Error>>;

    /// Flush a computed frame to the screen.
    fn flush(&mut self, frame: Frame) -> Result<(), Box<dyn std::error::Error>>;

    /// Clean up / restore the terminal.
    fn close(&mut self);
}

// ---------------------------------------------------------------------------
// AppConfig / App
// ---------------------------------------------------------------------------

/// Configuration for creating an [`App`].
pub struct AppConfig<M: Model, D: Driver> {
    pub model: M,
    pub driver: D,
    pub width: i32,
    pub height: i32,
    /// Interval between [`Msg::Tick`] messages. `None` disables ticks.
    pub tick: Option<Duration>,
}

/// The main application runner.
pub struct App<M: Model, D: Driver> {
    model: M,
    driver: D,
    width: i32,
    height: i32,
    tick: Option<Duration>,
}

impl<M: Model, D: Driver> App<M, D> {
    pub fn new(config: AppConfig<M, D>) -> Self {
        Self {
            model: config.model,
            driver: config.driver,
            width: config.width,
            height: config.height,
            tick: config.tick,
        }
    }

    /// The model, for inspection once the loop has returned.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Run the main Model-View-Update loop.
    ///
    /// 1. Initialises the driver.
    /// 2. Sends `Msg::Init` through the model.
    /// 3. Loops: poll → tick → update → draw → diff → flush.
    /// 4. Stops when the model returns `Effect::End`.
    pub fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.driver.init()?;
        debug!("app loop started ({}x{})", self.width, self.height);

        let ctx = Context::new();
        let result = self.event_loop(&ctx);
        self.driver.close();
        debug!("app loop stopped");
        result
    }

    fn event_loop(&mut self, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
        let mut queue = VecDeque::from([Msg::Init]);
        let mut prev = Canvas::new(self.width, self.height);
        let mut curr = Canvas::new(self.width, self.height);
        let mut last_tick = Instant::now();
        // Forces the first draw to reach the driver even if it is blank.
        let mut first = true;

        loop {
            self.process_pending(&mut queue, ctx, &mut prev, &mut curr, &mut first)?;
            if ctx.is_done() {
                return Ok(());
            }

            self.driver.poll_msgs(ctx, &mut queue)?;

            if let Some(interval) = self.tick {
                let now = Instant::now();
                if now.duration_since(last_tick) >= interval {
                    last_tick = now;
                    queue.push_back(Msg::Tick { time: now });
                }
            }
        }
    }

    /// Drain queued messages, update the model, draw, diff, and flush.
    fn process_pending(
        &mut self,
        queue: &mut VecDeque<Msg>,
        ctx: &Context,
        prev: &mut Canvas,
        curr: &mut Canvas,
        first: &mut bool,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mut needs_draw = false;

        while let Some(msg) = queue.pop_front() {
            needs_draw = true;
            if let Some(effect) = self.model.update(msg) {
                Self::handle_effect(effect, ctx, queue);
            }
            if ctx.is_done() {
                return Ok(());
            }
        }

        if needs_draw {
            self.model.draw(curr);
            let frame = compute_frame(prev, curr);
            if !frame.cells.is_empty() || *first {
                self.driver.flush(frame)?;
                *first = false;
            }
            prev.copy_from(curr);
        }
        Ok(())
    }

    fn handle_effect(effect: Effect, ctx: &Context, queue: &mut VecDeque<Msg>) {
        match effect {
            Effect::End => ctx.cancel(),
            Effect::Cmd(f) => {
                if let Some(msg) = f() {
                    queue.push_back(msg);
                }
            }
            Effect::Batch(effects) => {
                for e in effects {
                    Self::handle_effect(e, ctx, queue);
                    if ctx.is_done() {
                        return;
                    }
                }
            }
        }
    }
}

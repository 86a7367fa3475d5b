//! Frame-scheduling providers.
//!
//! The engine never reaches for a global clock or display callback: it owns a [`Host`] that
//! reports time and viewport size and hands out tick requests. Whoever drives the host calls
//! [`Engine::frame`](crate::Engine::frame) when a requested tick comes due.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::foundation::core::Canvas;

/// Minimum spacing of ticks handed out by [`IntervalHost`], in milliseconds.
pub const MIN_TICK_INTERVAL_MS: f64 = 16.0;

/// Identifier of a requested tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TickId(pub u64);

/// The host environment's clock, viewport and once-per-refresh callback.
pub trait Host {
    /// Current timestamp in milliseconds.
    fn now_ms(&self) -> f64;

    /// Size used by fullscreen engines.
    fn viewport(&self) -> Canvas;

    /// Ask for one future tick.
    fn request_tick(&mut self) -> TickId;

    /// Withdraw a tick request. Unknown or already-fired ids are ignored.
    fn cancel_tick(&mut self, id: TickId);

    /// Block until `id` is due. Hosts that deliver ticks from outside return immediately.
    fn wait(&mut self, _id: TickId) {}
}

#[derive(Debug, Default)]
struct ManualState {
    now: Cell<f64>,
    viewport: Cell<Canvas>,
    step_ms: Cell<f64>,
    next_id: Cell<u64>,
    requests: Cell<u64>,
    pending: RefCell<Vec<TickId>>,
}

/// A host whose clock only moves when told to.
///
/// Useful for tests and deterministic offline rendering. Keep a [`ManualClock`] to steer it
/// after handing the host to an engine.
#[derive(Debug)]
pub struct ManualHost {
    state: Rc<ManualState>,
}

impl ManualHost {
    pub fn new(viewport: Canvas) -> Self {
        let state = ManualState::default();
        state.viewport.set(viewport);
        Self {
            state: Rc::new(state),
        }
    }

    /// Advance the clock by `step_ms` every time the engine waits for a tick.
    pub fn with_step(self, step_ms: f64) -> Self {
        self.state.step_ms.set(step_ms.max(0.0));
        self
    }

    pub fn clock(&self) -> ManualClock {
        ManualClock {
            state: Rc::clone(&self.state),
        }
    }
}

impl Host for ManualHost {
    fn now_ms(&self) -> f64 {
        self.state.now.get()
    }

    fn viewport(&self) -> Canvas {
        self.state.viewport.get()
    }

    fn request_tick(&mut self) -> TickId {
        let id = TickId(self.state.next_id.get());
        self.state.next_id.set(id.0 + 1);
        self.state.requests.set(self.state.requests.get() + 1);
        self.state.pending.borrow_mut().push(id);
        id
    }

    fn cancel_tick(&mut self, id: TickId) {
        self.state.pending.borrow_mut().retain(|&p| p != id);
    }

    fn wait(&mut self, _id: TickId) {
        let step = self.state.step_ms.get();
        if step > 0.0 {
            self.state.now.set(self.state.now.get() + step);
        }
    }
}

/// Shared handle to a [`ManualHost`]'s clock and bookkeeping.
#[derive(Clone, Debug)]
pub struct ManualClock {
    state: Rc<ManualState>,
}

impl ManualClock {
    pub fn now(&self) -> f64 {
        self.state.now.get()
    }

    pub fn set_now(&self, ms: f64) {
        self.state.now.set(ms);
    }

    pub fn advance(&self, ms: f64) {
        self.state.now.set(self.state.now.get() + ms);
    }

    pub fn set_viewport(&self, viewport: Canvas) {
        self.state.viewport.set(viewport);
    }

    /// Tick requests that were neither fired nor cancelled.
    pub fn pending(&self) -> Vec<TickId> {
        self.state.pending.borrow().clone()
    }

    /// Total number of tick requests made so far.
    pub fn requests(&self) -> u64 {
        self.state.requests.get()
    }
}

/// Fallback host for environments without a display callback: a wall clock with ticks spaced
/// at least [`MIN_TICK_INTERVAL_MS`] apart.
#[derive(Debug)]
pub struct IntervalHost {
    epoch: Instant,
    viewport: Canvas,
    // Due time of the most recently requested tick.
    then: f64,
    next_id: u64,
    pending: Option<(TickId, f64)>,
}

impl IntervalHost {
    pub fn new(viewport: Canvas) -> Self {
        Self {
            epoch: Instant::now(),
            viewport,
            then: 0.0,
            next_id: 0,
            pending: None,
        }
    }

    /// Due time of the outstanding tick, if any.
    pub fn due(&self) -> Option<f64> {
        self.pending.map(|(_, due)| due)
    }
}

impl Host for IntervalHost {
    fn now_ms(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64() * 1000.0
    }

    fn viewport(&self) -> Canvas {
        self.viewport
    }

    fn request_tick(&mut self) -> TickId {
        let now = self.now_ms();
        let delay = (MIN_TICK_INTERVAL_MS - (now - self.then)).max(0.0);
        let due = now + delay;
        self.then = due;

        let id = TickId(self.next_id);
        self.next_id += 1;
        self.pending = Some((id, due));
        id
    }

    fn cancel_tick(&mut self, id: TickId) {
        if matches!(self.pending, Some((p, _)) if p == id) {
            self.pending = None;
        }
    }

    fn wait(&mut self, id: TickId) {
        let Some((p, due)) = self.pending else {
            return;
        };
        if p != id {
            return;
        }
        let remaining = due - self.now_ms();
        if remaining > 0.0 {
            std::thread::sleep(Duration::from_secs_f64(remaining / 1000.0));
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/host.rs"]
mod tests;

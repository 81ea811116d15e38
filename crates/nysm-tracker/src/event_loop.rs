//! Event loop
//!
//! Recurring timers and animation-frame callbacks on a virtual clock.
//! Tests drive it step by step with [`EventLoop::advance`] and
//! [`EventLoop::paint`]; [`EventLoop::run_for`] drives it in real time on
//! `smol`.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;

/// Interval handle
pub type TimerId = u32;

/// Recurring-timer and frame-yield primitives.
pub trait FrameScheduler {
    /// Call `callback` every `period` until cleared.
    fn set_interval(&self, period: Duration, callback: Rc<dyn Fn()>) -> TimerId;

    /// Cancel an interval. Unknown ids are ignored.
    fn clear_interval(&self, id: TimerId);

    /// Run `callback` once, before the next paint.
    fn request_animation_frame(&self, callback: Box<dyn FnOnce()>);
}

struct Interval {
    period: Duration,
    next_fire: Duration,
    callback: Rc<dyn Fn()>,
}

/// Single-threaded timer and frame queue
#[derive(Default)]
pub struct EventLoop {
    now: Cell<Duration>,
    next_id: Cell<TimerId>,
    intervals: RefCell<BTreeMap<TimerId, Interval>>,
    frames: RefCell<Vec<Box<dyn FnOnce()>>>,
}

impl EventLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed on the loop's clock
    pub fn now(&self) -> Duration {
        self.now.get()
    }

    pub fn active_intervals(&self) -> usize {
        self.intervals.borrow().len()
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.borrow().len()
    }

    /// Check if there are pending timers or frames
    pub fn has_pending(&self) -> bool {
        self.active_intervals() > 0 || self.pending_frames() > 0
    }

    /// Get time until next timer fires
    pub fn time_until_next(&self) -> Option<Duration> {
        let now = self.now.get();
        self.intervals
            .borrow()
            .values()
            .map(|t| t.next_fire.saturating_sub(now))
            .min()
    }

    /// Move the clock forward, firing every interval that comes due on the
    /// way in time order. Returns the number of firings.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.now.get() + by;
        let mut fired = 0;

        loop {
            let due = self
                .intervals
                .borrow()
                .iter()
                .filter(|(_, t)| t.next_fire <= target)
                .min_by_key(|(id, t)| (t.next_fire, **id))
                .map(|(id, t)| (*id, t.next_fire, t.callback.clone()));
            let Some((id, at, callback)) = due else {
                break;
            };

            self.now.set(at);
            // Reschedule first so the callback may clear its own interval
            if let Some(timer) = self.intervals.borrow_mut().get_mut(&id) {
                timer.next_fire = at + timer.period;
            }
            callback();
            fired += 1;
        }

        self.now.set(target);
        fired
    }

    /// Run the frame callbacks queued so far. Callbacks requested while
    /// painting wait for the next paint. Returns the number run.
    pub fn paint(&self) -> usize {
        let frames = std::mem::take(&mut *self.frames.borrow_mut());
        let count = frames.len();
        for frame in frames {
            frame();
        }
        count
    }

    /// `advance` then `paint`
    pub fn step(&self, by: Duration) -> usize {
        self.advance(by);
        self.paint()
    }

    /// Drive the loop in real time for `duration`.
    ///
    /// Sleeps until the next timer is due, fires it, then yields to the
    /// executor once before painting.
    pub async fn run_for(&self, duration: Duration) {
        let deadline = self.now() + duration;

        while self.now() < deadline {
            let remaining = deadline - self.now();
            let wait = self.time_until_next().map_or(remaining, |next| next.min(remaining));
            if !wait.is_zero() {
                smol::Timer::after(wait).await;
            }
            self.advance(wait);
            smol::future::yield_now().await;
            self.paint();
        }
    }
}

impl FrameScheduler for EventLoop {
    fn set_interval(&self, period: Duration, callback: Rc<dyn Fn()>) -> TimerId {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);

        let period = period.max(Duration::from_millis(1));
        self.intervals.borrow_mut().insert(id, Interval {
            period,
            next_fire: self.now.get() + period,
            callback,
        });
        tracing::trace!(id, ?period, "interval set");
        id
    }

    fn clear_interval(&self, id: TimerId) {
        if self.intervals.borrow_mut().remove(&id).is_some() {
            tracing::trace!(id, "interval cleared");
        }
    }

    fn request_animation_frame(&self, callback: Box<dyn FnOnce()>) {
        self.frames.borrow_mut().push(callback);
    }
}

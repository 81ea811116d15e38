//! Viewability tracker
//!
//! Keeps a registry of tracked targets and re-measures them on a coarse
//! interval, deferring each pass to the next animation frame.
//!
//! - Callbacks are edge-triggered: they fire when an entry's viewable state
//!   differs from the last one observed, and the first measurement always
//!   fires exactly one of them.
//! - Callbacks may track, untrack or stop freely; a pass works from a
//!   snapshot of the keys and never commits a stale result over an entry
//!   that was replaced while it ran.
//! - An empty registry stops the interval on the next frame pass.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use nysm_dom::{NodeId, Target, TargetKey};
use nysm_viewability::{evaluate, LayoutHost, Threshold, ViewabilityError};

use crate::{DirtyPolicy, FrameScheduler, TimerId, TrackerConfig};

/// Notification callback; receives the measured element.
///
/// Callbacks must not panic. They run inside the frame pass, so a panic
/// unwinds out of [`EventLoop::paint`](crate::EventLoop::paint) and the
/// remaining entries of that pass are not measured. Release builds abort.
pub type Callback = Rc<dyn Fn(NodeId)>;

/// Last observed viewable state of a tracked target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LastKnown {
    /// Never measured
    #[default]
    Unknown,
    Viewable,
    NotViewable,
}

impl From<bool> for LastKnown {
    fn from(viewable: bool) -> Self {
        if viewable { Self::Viewable } else { Self::NotViewable }
    }
}

/// Arguments to [`Tracker::track`]
#[derive(Clone)]
pub struct TrackOptions {
    pub target: Target,
    /// `None` = the host's default viewport (document body)
    pub viewport: Option<Target>,
    pub threshold: Threshold,
    /// Without this the call is ignored.
    pub on_viewable: Option<Callback>,
    pub on_not_viewable: Option<Callback>,
}

impl TrackOptions {
    pub fn new(target: impl Into<Target>) -> Self {
        Self {
            target: target.into(),
            viewport: None,
            threshold: Threshold::default(),
            on_viewable: None,
            on_not_viewable: None,
        }
    }

    pub fn with_viewport(mut self, viewport: impl Into<Target>) -> Self {
        self.viewport = Some(viewport.into());
        self
    }

    pub fn with_threshold(mut self, threshold: Threshold) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn on_viewable(mut self, callback: impl Fn(NodeId) + 'static) -> Self {
        self.on_viewable = Some(Rc::new(callback));
        self
    }

    pub fn on_not_viewable(mut self, callback: impl Fn(NodeId) + 'static) -> Self {
        self.on_not_viewable = Some(Rc::new(callback));
        self
    }
}

#[derive(Clone)]
struct TrackedTarget {
    key: TargetKey,
    element: NodeId,
    viewport: NodeId,
    threshold: Threshold,
    on_viewable: Callback,
    on_not_viewable: Option<Callback>,
    last_known: LastKnown,
    /// Bumped on every (re)registration
    generation: u64,
}

struct TrackerState {
    config: TrackerConfig,
    registry: Vec<TrackedTarget>,
    interval: Option<TimerId>,
    dirty: bool,
    frame_pending: bool,
    next_generation: u64,
}

struct Shared<H: LayoutHost + FrameScheduler> {
    host: Rc<H>,
    state: RefCell<TrackerState>,
}

impl<H: LayoutHost + FrameScheduler> Drop for Shared<H> {
    fn drop(&mut self) {
        if let Some(id) = self.state.get_mut().interval.take() {
            self.host.clear_interval(id);
        }
    }
}

/// Viewability tracker
///
/// Cheap to clone; clones share one registry. Independent trackers on the
/// same host do not interact.
pub struct Tracker<H: LayoutHost + FrameScheduler + 'static> {
    shared: Rc<Shared<H>>,
}

impl<H: LayoutHost + FrameScheduler + 'static> Clone for Tracker<H> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<H: LayoutHost + FrameScheduler + 'static> Tracker<H> {
    pub fn new(host: Rc<H>, config: TrackerConfig) -> Self {
        Self {
            shared: Rc::new(Shared {
                host,
                state: RefCell::new(TrackerState {
                    config,
                    registry: Vec::new(),
                    interval: None,
                    dirty: true,
                    frame_pending: false,
                    next_generation: 0,
                }),
            }),
        }
    }

    pub fn host(&self) -> &Rc<H> {
        &self.shared.host
    }

    pub fn config(&self) -> TrackerConfig {
        self.shared.state.borrow().config
    }

    /// Start tracking a target, replacing any entry with the same key.
    ///
    /// Selector targets and viewports that match nothing fail with
    /// `InvalidSelector`. A missing `on_viewable` callback makes the call a
    /// no-op.
    pub fn track(&self, options: TrackOptions) -> Result<(), ViewabilityError> {
        let host = &self.shared.host;
        let element = host.resolve(&options.target)?;
        let viewport = match &options.viewport {
            Some(viewport) => host.resolve(viewport)?,
            None => host.default_viewport(),
        };

        let Some(on_viewable) = options.on_viewable else {
            tracing::debug!(key = ?options.target, "no on_viewable callback, not tracking");
            return Ok(());
        };

        let auto_start = {
            let mut state = self.shared.state.borrow_mut();
            state.next_generation += 1;
            let entry = TrackedTarget {
                key: options.target,
                element,
                viewport,
                threshold: options.threshold,
                on_viewable,
                on_not_viewable: options.on_not_viewable,
                last_known: LastKnown::Unknown,
                generation: state.next_generation,
            };
            tracing::debug!(key = ?entry.key, ?element, threshold = entry.threshold.value(), "tracking");

            match state.registry.iter().position(|e| e.key == entry.key) {
                Some(index) => state.registry[index] = entry,
                None => state.registry.push(entry),
            }
            state.config.auto_start
        };

        if auto_start {
            self.watch();
        }
        Ok(())
    }

    /// Stop tracking one target. The interval keeps running until the next
    /// pass finds the registry empty.
    pub fn untrack(&self, target: &Target) -> bool {
        let mut state = self.shared.state.borrow_mut();
        let before = state.registry.len();
        state.registry.retain(|e| &e.key != target);
        let removed = state.registry.len() != before;
        if removed {
            tracing::debug!(key = ?target, "untracked");
        }
        removed
    }

    /// Forget every target and stop the interval now.
    pub fn untrack_all(&self) {
        self.shared.state.borrow_mut().registry.clear();
        self.stop();
    }

    /// Start the interval if it is not already running.
    ///
    /// Does nothing when the registry is empty and auto-start is off.
    pub fn watch(&self) {
        let period = {
            let state = self.shared.state.borrow();
            if state.interval.is_some() {
                return;
            }
            if state.registry.is_empty() && !state.config.auto_start {
                tracing::trace!("nothing to watch");
                return;
            }
            state.config.interval
        };

        let weak = Rc::downgrade(&self.shared);
        let id = self.shared.host.set_interval(
            period,
            Rc::new(move || {
                if let Some(tracker) = Self::upgrade(&weak) {
                    tracker.on_interval();
                }
            }),
        );
        self.shared.state.borrow_mut().interval = Some(id);
        tracing::debug!(?period, "viewability watcher started");
    }

    /// Cancel the interval. A frame pass that was already requested still
    /// runs once.
    pub fn stop(&self) {
        let interval = self.shared.state.borrow_mut().interval.take();
        if let Some(id) = interval {
            self.shared.host.clear_interval(id);
            tracing::debug!("viewability watcher stopped");
        }
    }

    /// Force a real evaluation without waiting for the next interval.
    ///
    /// While the watcher runs this requests a frame pass right away, unless
    /// one is already pending. The interval timer keeps its schedule.
    pub fn check(&self) {
        let request_frame = {
            let mut state = self.shared.state.borrow_mut();
            state.dirty = true;
            state.interval.is_some() && !state.frame_pending
        };
        if request_frame {
            tracing::trace!("immediate check requested");
            self.request_frame();
        }
    }

    /// Alias of [`Tracker::check`]
    pub fn trigger(&self) {
        self.check();
    }

    pub fn is_running(&self) -> bool {
        self.shared.state.borrow().interval.is_some()
    }

    pub fn len(&self) -> usize {
        self.shared.state.borrow().registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.state.borrow().registry.is_empty()
    }

    /// Last observed state of a tracked target
    pub fn state(&self, target: &Target) -> Option<LastKnown> {
        let state = self.shared.state.borrow();
        state.registry.iter().find(|e| &e.key == target).map(|e| e.last_known)
    }

    fn upgrade(weak: &Weak<Shared<H>>) -> Option<Self> {
        weak.upgrade().map(|shared| Self { shared })
    }

    fn on_interval(&self) {
        let mut state = self.shared.state.borrow_mut();
        if state.config.dirty_policy == DirtyPolicy::EveryInterval {
            state.dirty = true;
        }
        let pending = state.frame_pending;
        drop(state);

        if pending {
            tracing::trace!("frame already pending");
            return;
        }
        self.request_frame();
    }

    /// Queue one frame pass. Callers check `frame_pending` first.
    fn request_frame(&self) {
        self.shared.state.borrow_mut().frame_pending = true;
        let weak = Rc::downgrade(&self.shared);
        self.shared.host.request_animation_frame(Box::new(move || {
            if let Some(tracker) = Self::upgrade(&weak) {
                tracker.on_frame();
            }
        }));
    }

    fn on_frame(&self) {
        self.shared.state.borrow_mut().frame_pending = false;
        self.tick();
    }

    /// One evaluation pass over a snapshot of the registry.
    fn tick(&self) {
        let (keys, clamp) = {
            let mut state = self.shared.state.borrow_mut();
            if state.registry.is_empty() {
                drop(state);
                tracing::debug!("registry empty");
                self.stop();
                return;
            }
            if !state.dirty {
                return;
            }
            state.dirty = false;
            let keys: Vec<TargetKey> = state.registry.iter().map(|e| e.key.clone()).collect();
            (keys, state.config.clamp_mode)
        };

        let mut transitions = 0;
        for key in &keys {
            // Removed by an earlier callback in this pass
            let Some(entry) = self.snapshot(key) else {
                continue;
            };

            let viewability = evaluate(&*self.shared.host, entry.element, entry.viewport, clamp);
            let observed = LastKnown::from(viewability.is_viewable(entry.threshold));
            if observed == entry.last_known {
                continue;
            }
            if !self.commit(key, entry.generation, observed) {
                continue;
            }

            transitions += 1;
            tracing::debug!(
                key = ?key,
                element = ?entry.element,
                percentage = viewability.percentage(),
                state = ?observed,
                "viewability changed"
            );
            let callback = match observed {
                LastKnown::Viewable => Some(entry.on_viewable),
                _ => entry.on_not_viewable,
            };
            if let Some(callback) = callback {
                callback(entry.element);
            }
        }
        tracing::trace!(checked = keys.len(), transitions, "viewability pass");
    }

    fn snapshot(&self, key: &TargetKey) -> Option<TrackedTarget> {
        let state = self.shared.state.borrow();
        state.registry.iter().find(|e| &e.key == key).cloned()
    }

    /// Record a new state unless the entry was replaced or removed meanwhile.
    fn commit(&self, key: &TargetKey, generation: u64, observed: LastKnown) -> bool {
        let mut state = self.shared.state.borrow_mut();
        match state
            .registry
            .iter_mut()
            .find(|e| &e.key == key && e.generation == generation)
        {
            Some(entry) => {
                entry.last_known = observed;
                true
            }
            None => false,
        }
    }
}

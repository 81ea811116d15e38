//! nysm Tracker
//!
//! Watches many elements at once and reports when each one crosses its
//! viewability threshold.
//!
//! A coarse interval marks the tracker dirty; the actual pass is deferred to
//! the next animation frame, and callbacks only fire when an element's
//! viewable state flips.
//!
//! # Example
//! ```rust,ignore
//! use nysm_tracker::{Page, TrackOptions, Tracker, TrackerConfig};
//!
//! let page = Rc::new(Page::new(window));
//! let tracker = Tracker::new(page.clone(), TrackerConfig::default());
//! tracker.track(TrackOptions::new("#ad").on_viewable(|el| println!("{el:?} seen")))?;
//! smol::block_on(page.event_loop().run_for(Duration::from_secs(1)));
//! ```

mod config;
mod event_loop;
mod page;
mod tracker;

pub use config::{ConfigError, DirtyPolicy, TrackerConfig};
pub use event_loop::{EventLoop, FrameScheduler, TimerId};
pub use page::Page;
pub use tracker::{Callback, LastKnown, TrackOptions, Tracker};

pub use nysm_viewability::{ClampMode, Threshold, ViewabilityError};

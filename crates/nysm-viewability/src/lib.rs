//! nysm Viewability
//!
//! How much of an element is inside its viewport.
//!
//! The calculation is a pure function over rectangles and a style snapshot
//! ([`compute_viewable_percentage`]). [`check_viewability`] and
//! [`check_viewability_detailed`] wrap it with target resolution against a
//! [`LayoutHost`].
//!
//! # Example
//! ```rust,ignore
//! use nysm_viewability::{check_viewability, CheckOptions};
//!
//! let visible = check_viewability(&window, &"#hero".into(), &CheckOptions::default())?;
//! ```

mod calculator;
mod check;
mod host;
mod threshold;

pub use calculator::{
    compute_viewable_percentage, ClampMode, Gate, Viewability, MINIMUM_VIEWABLE_AREA,
    MINIMUM_VIEWABLE_OPACITY,
};
pub use check::{check_viewability, check_viewability_detailed, evaluate, CheckOptions, ViewabilityReport};
pub use host::LayoutHost;
pub use threshold::Threshold;

// Re-export the host model for callers that only depend on this crate
pub use nysm_dom as dom;

/// Viewability error
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ViewabilityError {
    #[error(transparent)]
    Dom(#[from] nysm_dom::DomError),

    #[error("Threshold must be within (0, 100], got {0}")]
    InvalidThreshold(f64),
}

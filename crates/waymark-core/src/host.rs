#![forbid(unsafe_code)]

//! Host page capabilities.
//!
//! The overlay never touches a rendering surface directly. Everything it
//! needs from the host page sits behind these two traits, so the runtime
//! can be driven by a real DOM binding in production and by a scripted
//! fake in tests.
//!
//! # Contract
//!
//! 1. [`ElementGeometryProvider::resolve`] re-queries on every call. The
//!    element may have moved, resized, or been removed since the last
//!    read; returning a cached rect would desynchronize the overlay from
//!    live layout.
//! 2. [`ElementGeometryProvider::document_extent`] reports the
//!    document-relative vertical span obtained by walking the element's
//!    offset-parent chain and summing `offsetTop`, paired with
//!    `offsetHeight`. Unlike a viewport-relative rect, this measurement is
//!    independent of intermediate scroll containers.
//! 3. [`ElementGeometryProvider::callout_extent`] is the same measurement
//!    for the rendered callout box itself, and is `None` until a layout
//!    pass has committed the callout.
//! 4. [`SmoothScroller::smooth_scroll_to`] is fire-and-forget: the host
//!    animates the scroll; the caller never awaits completion.

use crate::geometry::Rect;

/// Viewport state at read time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewportMetrics {
    /// Vertical scroll offset of the page (`pageYOffset`).
    pub scroll_y: f64,
    /// Inner height of the viewport in px.
    pub height: f64,
}

/// Document-relative vertical span of an element.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DocumentExtent {
    /// Distance from the document top, summed over the offset-parent chain.
    pub top: f64,
    /// Offset height of the element.
    pub height: f64,
}

impl DocumentExtent {
    /// Create an extent.
    #[inline]
    pub const fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    /// Bottom edge (`top + height`).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Read-only geometry queries against the host page.
pub trait ElementGeometryProvider {
    /// Bounding rect of the first element matching `selector`, relative to
    /// the current viewport origin, or `None` when nothing matches.
    fn resolve(&self, selector: &str) -> Option<Rect>;

    /// Document-relative extent of the first element matching `selector`.
    fn document_extent(&self, selector: &str) -> Option<DocumentExtent>;

    /// Document-relative extent of the rendered callout box, once a layout
    /// pass has committed it.
    fn callout_extent(&self) -> Option<DocumentExtent>;

    /// Current viewport scroll offset and height.
    fn viewport(&self) -> ViewportMetrics;
}

/// Animated vertical scrolling on the host page.
pub trait SmoothScroller {
    /// Smoothly scroll the page so its top edge lands at `top` px from the
    /// document top. Horizontal offset is left unchanged.
    fn smooth_scroll_to(&self, top: f64);
}

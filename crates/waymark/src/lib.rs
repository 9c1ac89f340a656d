#![forbid(unsafe_code)]

//! Waymark public facade crate.
//!
//! Re-exports the common surface from the internal crates and offers a
//! lightweight prelude for day-to-day usage.

// --- Core re-exports -------------------------------------------------------

pub use waymark_core::config::TourConfig;
pub use waymark_core::geometry::{HIGHLIGHT_PADDING, Rect, TargetRect};
pub use waymark_core::host::{
    DocumentExtent, ElementGeometryProvider, SmoothScroller, ViewportMetrics,
};
pub use waymark_core::step::{GuidedTour, Orientation, StepHook, TourStep};

// --- Layout re-exports -----------------------------------------------------

pub use waymark_layout::{CalloutPlacement, OrbPlacement, Placement, StepPlacement, Transform};

// --- Runtime re-exports ----------------------------------------------------

#[cfg(feature = "runtime")]
pub use waymark_runtime::{
    BackdropView, CalloutView, EventOutcome, FooterState, HostEvent, Observable, OrbView,
    OverlayFrame, ScrollContext, Subscription, TourOverlay, TourSequencer,
};

/// Everything most embedders need.
pub mod prelude {
    pub use crate::{GuidedTour, Orientation, TourConfig, TourStep};
    #[cfg(feature = "runtime")]
    pub use crate::{HostEvent, TourOverlay, TourSequencer};
}

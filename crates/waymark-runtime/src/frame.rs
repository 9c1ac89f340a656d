#![forbid(unsafe_code)]

//! Render view-model.
//!
//! [`OverlayFrame`] is everything the template layer needs to paint one
//! frame of the overlay, with absence encoded as `None`: no active step
//! renders nothing, an orb-collapsed step renders only the orb, and a
//! page-level step (no selector, or an unmatched one) renders the callout
//! without pixel positions so the template can center it instead.

use serde::{Deserialize, Serialize};
use waymark_core::{Orientation, Rect};
use waymark_layout::{CalloutPlacement, OrbPlacement};

/// Everything rendered for the active step.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OverlayFrame {
    /// Compact orb indicator; present only while the orb is showing and
    /// the target rect is resolved.
    pub orb: Option<OrbView>,
    /// Input mask plus spotlight cutout; present for any active step once
    /// the orb is expanded.
    pub backdrop: Option<BackdropView>,
    /// The step callout; present together with the backdrop.
    pub callout: Option<CalloutView>,
}

/// Orb indicator placement plus the orientation for styling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbView {
    pub placement: OrbPlacement,
    pub orientation: Option<Orientation>,
}

/// The click-blocking backdrop and its spotlight cutout.
///
/// An unresolved target yields the zero rect at the origin here: the
/// spotlight is drawn zero-sized, not omitted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BackdropView {
    pub spotlight: Rect,
}

/// Callout content, placement, and footer state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalloutView {
    pub title: Option<String>,
    pub content: String,
    pub orientation: Option<Orientation>,
    /// Pixel placement for selector steps with a resolved target; `None`
    /// for page-level steps, which the template centers on its own.
    pub position: Option<CalloutPlacement>,
    pub footer: FooterState,
}

/// Navigation state for the callout footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FooterState {
    pub is_first: bool,
    pub is_last: bool,
    /// 1-based index of the active step.
    pub display_index: usize,
    pub step_count: usize,
}

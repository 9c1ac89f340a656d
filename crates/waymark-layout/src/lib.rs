#![forbid(unsafe_code)]

//! Placement solver for tour callouts, orbs, and the highlight backdrop.
//!
//! Everything here is a pure function of (target rect, orientation,
//! config, padding flag). The solver holds no mutable state and must be
//! re-run whenever the resolved rect or the active step changes; callers
//! never cache its outputs across viewport events.
//!
//! # Invariants
//!
//! 1. Bottom-anchored orientations (`bottom`, `bottom-left`,
//!    `bottom-right`) add the padding adjustment to the callout top; all
//!    others subtract it.
//! 2. The callout transform is [`Transform::PinBottom`] exactly for the
//!    top family (including a missing orientation), so the box grows
//!    upward from the anchor; otherwise it grows downward untransformed.
//! 3. Orb placement anchors to the element edge itself and never depends
//!    on the configured callout width.
//! 4. A backdrop derived from [`TargetRect::Absent`] is the zero rect at
//!    the origin: absent geometry renders a zero-size box, it is not
//!    suppressed here.
//! 5. Identical inputs produce bit-identical outputs.

use serde::{Deserialize, Serialize};
use std::fmt;
use waymark_core::{HIGHLIGHT_PADDING, Orientation, Rect, TargetRect, TourConfig};

// ---------------------------------------------------------------------------
// Transforms
// ---------------------------------------------------------------------------

/// CSS transform applied to a positioned box, named by its effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transform {
    /// Pin the box's bottom edge to the computed top coordinate
    /// (`translateY(-100%)`).
    PinBottom,
    /// Center the box vertically on the computed top coordinate
    /// (`translateY(-50%)`).
    CenterY,
    /// Pin the box's right edge to the computed left coordinate and center
    /// vertically (`translate(-100%, -50%)`).
    PinRightCenterY,
    /// Center the box on the computed coordinate in both axes
    /// (`translate(-50%, -50%)`).
    CenterBoth,
}

impl Transform {
    /// The exact CSS value.
    pub const fn as_css(self) -> &'static str {
        match self {
            Self::PinBottom => "translateY(-100%)",
            Self::CenterY => "translateY(-50%)",
            Self::PinRightCenterY => "translate(-100%, -50%)",
            Self::CenterBoth => "translate(-50%, -50%)",
        }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_css())
    }
}

// ---------------------------------------------------------------------------
// Computed placements
// ---------------------------------------------------------------------------

/// Where the callout box goes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalloutPlacement {
    pub top: f64,
    pub left: f64,
    /// Configured callout width, carried so the template can set it.
    pub width: f64,
    pub transform: Option<Transform>,
}

/// Where the orb indicator goes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbPlacement {
    pub top: f64,
    pub left: f64,
    pub transform: Option<Transform>,
}

/// Full derived layout for one step against one resolved rect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepPlacement {
    pub callout: CalloutPlacement,
    pub orb: OrbPlacement,
    /// Highlight backdrop box, already expanded when padding is requested.
    pub backdrop: Rect,
    /// Whether the orientation flips the scroll-target formula.
    pub bottom_anchored: bool,
}

// ---------------------------------------------------------------------------
// Solver
// ---------------------------------------------------------------------------

/// Stateless placement solver, parameterized only by the callout width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    callout_width: f64,
}

impl Placement {
    /// Create a solver from the embedding configuration.
    #[must_use]
    pub fn new(config: &TourConfig) -> Self {
        Self {
            callout_width: config.tour_step_width,
        }
    }

    /// Create a solver with an explicit callout width in px.
    #[must_use]
    pub const fn with_width(callout_width: f64) -> Self {
        Self { callout_width }
    }

    /// Padding adjustment for a step: the highlight padding when the step
    /// opted in, zero otherwise.
    #[inline]
    fn padding_adjustment(padded: bool) -> f64 {
        if padded { HIGHLIGHT_PADDING } else { 0.0 }
    }

    #[inline]
    fn bottom_anchored(orientation: Option<Orientation>) -> bool {
        orientation.is_some_and(Orientation::is_bottom_anchored)
    }

    /// Callout top: below the target for bottom-anchored orientations,
    /// above it otherwise, shifted by the padding adjustment.
    pub fn callout_top(rect: Rect, orientation: Option<Orientation>, padded: bool) -> f64 {
        let pad = Self::padding_adjustment(padded);
        if Self::bottom_anchored(orientation) {
            rect.top + rect.height + pad
        } else {
            rect.top - pad
        }
    }

    /// Callout left, branch table in priority order; the default centers
    /// the callout horizontally on the target.
    pub fn callout_left(&self, rect: Rect, orientation: Option<Orientation>, padded: bool) -> f64 {
        let pad = Self::padding_adjustment(padded);
        match orientation {
            Some(Orientation::TopRight | Orientation::BottomRight) => {
                rect.right() - self.callout_width
            }
            Some(Orientation::TopLeft | Orientation::BottomLeft) => rect.left,
            Some(Orientation::Left) => rect.left - self.callout_width - pad,
            Some(Orientation::Right) => rect.left + rect.width + pad,
            _ => rect.right() - rect.width / 2.0 - self.callout_width / 2.0,
        }
    }

    /// Callout transform: the top family (and a missing orientation) pins
    /// the box's bottom edge to the computed top.
    pub const fn callout_transform(orientation: Option<Orientation>) -> Option<Transform> {
        match orientation {
            None
            | Some(Orientation::Top | Orientation::TopLeft | Orientation::TopRight) => {
                Some(Transform::PinBottom)
            }
            _ => None,
        }
    }

    /// Orb top: element bottom for bottom-anchored orientations, vertical
    /// center for `left`/`right`, element top otherwise.
    pub fn orb_top(rect: Rect, orientation: Option<Orientation>) -> f64 {
        if Self::bottom_anchored(orientation) {
            rect.top + rect.height
        } else if orientation.is_some_and(Orientation::is_vertical_center) {
            rect.top + rect.height / 2.0
        } else {
            rect.top
        }
    }

    /// Orb left: mirrors the callout branches but anchors to the element
    /// edge instead of subtracting the callout width.
    pub fn orb_left(rect: Rect, orientation: Option<Orientation>) -> f64 {
        match orientation {
            Some(Orientation::TopRight | Orientation::BottomRight) => rect.right(),
            Some(Orientation::TopLeft | Orientation::BottomLeft) => rect.left,
            Some(Orientation::Left) => rect.left,
            Some(Orientation::Right) => rect.left + rect.width,
            _ => rect.right() - rect.width / 2.0,
        }
    }

    /// Orb transform per orientation. `center` is the one orientation with
    /// no orb transform at all.
    pub const fn orb_transform(orientation: Option<Orientation>) -> Option<Transform> {
        match orientation {
            None
            | Some(
                Orientation::Top
                | Orientation::Bottom
                | Orientation::TopLeft
                | Orientation::BottomLeft,
            ) => Some(Transform::CenterY),
            Some(Orientation::TopRight | Orientation::BottomRight) => {
                Some(Transform::PinRightCenterY)
            }
            Some(Orientation::Left | Orientation::Right) => Some(Transform::CenterBoth),
            Some(Orientation::Center) => None,
        }
    }

    /// Highlight backdrop box: the resolved rect, expanded uniformly by
    /// the highlight padding when requested; the zero rect when absent.
    pub fn backdrop(target: TargetRect, padded: bool) -> Rect {
        match target.rect() {
            Some(rect) if padded => rect.expand(HIGHLIGHT_PADDING),
            Some(rect) => rect,
            None => Rect::ZERO,
        }
    }

    /// Solve every derived position for one step against one resolved rect.
    #[must_use]
    pub fn solve(
        &self,
        rect: Rect,
        orientation: Option<Orientation>,
        padded: bool,
    ) -> StepPlacement {
        StepPlacement {
            callout: CalloutPlacement {
                top: Self::callout_top(rect, orientation, padded),
                left: self.callout_left(rect, orientation, padded),
                width: self.callout_width,
                transform: Self::callout_transform(orientation),
            },
            orb: OrbPlacement {
                top: Self::orb_top(rect, orientation),
                left: Self::orb_left(rect, orientation),
                transform: Self::orb_transform(orientation),
            },
            backdrop: Self::backdrop(TargetRect::Resolved(rect), padded),
            bottom_anchored: Self::bottom_anchored(orientation),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

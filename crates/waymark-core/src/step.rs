#![forbid(unsafe_code)]

//! Tour declarations: steps, tours, and anchor orientations.
//!
//! These types are the external data contract. They are authored once by
//! the embedding application (in code or deserialized from JSON/TOML) and
//! observed as immutable snapshots by the overlay; nothing in this crate
//! mutates them after construction.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

/// Compass-style anchor position of a callout or orb relative to its
/// target element.
///
/// A step without an orientation behaves like the `Top` family for
/// transform purposes and as "not bottom-anchored" for scroll purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Orientation {
    Top,
    TopLeft,
    TopRight,
    Bottom,
    BottomLeft,
    BottomRight,
    Left,
    Right,
    Center,
}

impl Orientation {
    /// Whether this orientation anchors below the target.
    ///
    /// Bottom-anchored orientations flip the callout-top and scroll-target
    /// formulas.
    #[inline]
    pub const fn is_bottom_anchored(self) -> bool {
        matches!(self, Self::Bottom | Self::BottomLeft | Self::BottomRight)
    }

    /// Whether the orb centers vertically on the target (`Left`/`Right`).
    #[inline]
    pub const fn is_vertical_center(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    /// Kebab-case name, as used in CSS class suffixes and serialized tours.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::TopLeft => "top-left",
            Self::TopRight => "top-right",
            Self::Bottom => "bottom",
            Self::BottomLeft => "bottom-left",
            Self::BottomRight => "bottom-right",
            Self::Left => "left",
            Self::Right => "right",
            Self::Center => "center",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Side-effect hook attached to a step or tour.
pub type StepHook = Rc<dyn Fn()>;

/// One step of a guided tour.
///
/// Build with the chained setters:
///
/// ```
/// use waymark_core::{Orientation, TourStep};
///
/// let step = TourStep::new("Click here to create a report")
///     .selector("#new-report")
///     .title("Reports")
///     .orientation(Orientation::BottomLeft)
///     .use_highlight_padding(true);
/// assert_eq!(step.selector.as_deref(), Some("#new-report"));
/// ```
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct TourStep {
    /// CSS selector for the element to highlight. First match wins; no
    /// match renders the step without a highlight. A step without a
    /// selector is a page-level step (centered by the template).
    pub selector: Option<String>,
    /// Optional heading.
    pub title: Option<String>,
    /// Step body (rich text, rendered by the template).
    pub content: String,
    /// Anchor position relative to the target element.
    pub orientation: Option<Orientation>,
    /// Extra px reserved when scrolling to this step, e.g. for a sticky
    /// header taller than the global adjustment.
    #[serde(default)]
    pub scroll_adjustment: f64,
    /// Expand the highlight backdrop by [`HIGHLIGHT_PADDING`] on all sides.
    ///
    /// [`HIGHLIGHT_PADDING`]: crate::geometry::HIGHLIGHT_PADDING
    #[serde(default)]
    pub use_highlight_padding: bool,
    /// Runs when the step becomes active, before it is published.
    #[serde(skip)]
    pub on_open: Option<StepHook>,
    /// Runs when the step is left (advance, back, skip, or completion).
    #[serde(skip)]
    pub on_close: Option<StepHook>,
}

impl TourStep {
    /// Create a step with the given content.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    /// Set the target selector.
    pub fn selector(mut self, selector: impl Into<String>) -> Self {
        self.selector = Some(selector.into());
        self
    }

    /// Set the heading.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the anchor orientation.
    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = Some(orientation);
        self
    }

    /// Set the per-step scroll adjustment in px.
    pub fn scroll_adjustment(mut self, px: f64) -> Self {
        self.scroll_adjustment = px;
        self
    }

    /// Toggle highlight padding around the backdrop cutout.
    pub fn use_highlight_padding(mut self, on: bool) -> Self {
        self.use_highlight_padding = on;
        self
    }

    /// Attach an open hook.
    pub fn on_open(mut self, hook: impl Fn() + 'static) -> Self {
        self.on_open = Some(Rc::new(hook));
        self
    }

    /// Attach a close hook.
    pub fn on_close(mut self, hook: impl Fn() + 'static) -> Self {
        self.on_close = Some(Rc::new(hook));
        self
    }

    /// Whether the step declares bottom-anchored placement.
    #[inline]
    pub fn is_bottom_anchored(&self) -> bool {
        self.orientation
            .is_some_and(Orientation::is_bottom_anchored)
    }
}

// Hooks are opaque behavior; two steps are the same step when their
// declarative fields match.
impl PartialEq for TourStep {
    fn eq(&self, other: &Self) -> bool {
        self.selector == other.selector
            && self.title == other.title
            && self.content == other.content
            && self.orientation == other.orientation
            && self.scroll_adjustment == other.scroll_adjustment
            && self.use_highlight_padding == other.use_highlight_padding
    }
}

impl fmt::Debug for TourStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TourStep")
            .field("selector", &self.selector)
            .field("title", &self.title)
            .field("content", &self.content)
            .field("orientation", &self.orientation)
            .field("scroll_adjustment", &self.scroll_adjustment)
            .field("use_highlight_padding", &self.use_highlight_padding)
            .field("on_open", &self.on_open.as_ref().map(|_| ".."))
            .field("on_close", &self.on_close.as_ref().map(|_| ".."))
            .finish()
    }
}

/// An ordered sequence of steps with tour-level callbacks.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct GuidedTour {
    /// Identifier for the tour.
    pub tour_id: String,
    /// Start collapsed to the orb indicator instead of the full callout.
    #[serde(default)]
    pub use_orb: bool,
    /// Steps of the tour.
    pub steps: Vec<TourStep>,
    /// Called with the 0-based step index the user skipped on.
    #[serde(skip)]
    pub on_skip: Option<Rc<dyn Fn(usize)>>,
    /// Called when the last step is completed.
    #[serde(skip)]
    pub on_complete: Option<StepHook>,
}

impl GuidedTour {
    /// Create a tour with the given identifier and steps.
    pub fn new(tour_id: impl Into<String>, steps: Vec<TourStep>) -> Self {
        Self {
            tour_id: tour_id.into(),
            steps,
            ..Self::default()
        }
    }

    /// Start with the orb indicator.
    pub fn use_orb(mut self, on: bool) -> Self {
        self.use_orb = on;
        self
    }

    /// Attach the skip callback.
    pub fn on_skip(mut self, hook: impl Fn(usize) + 'static) -> Self {
        self.on_skip = Some(Rc::new(hook));
        self
    }

    /// Attach the completion callback.
    pub fn on_complete(mut self, hook: impl Fn() + 'static) -> Self {
        self.on_complete = Some(Rc::new(hook));
        self
    }

    /// Number of steps.
    #[inline]
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }
}

impl fmt::Debug for GuidedTour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GuidedTour")
            .field("tour_id", &self.tour_id)
            .field("use_orb", &self.use_orb)
            .field("steps", &self.steps)
            .field("on_skip", &self.on_skip.as_ref().map(|_| ".."))
            .field("on_complete", &self.on_complete.as_ref().map(|_| ".."))
            .finish()
    }
}

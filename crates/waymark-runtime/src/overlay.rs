#![forbid(unsafe_code)]

//! The overlay component: viewport tracking, event handling, and scroll
//! coordination for the active tour step.
//!
//! # Control flow
//!
//! - A step notification re-resolves the target selector and, when an
//!   element is found, marks a deferred visibility check.
//! - Resize and scroll events re-enter only the resolve-and-relayout
//!   path; they never trigger a scroll.
//! - The host calls [`TourOverlay::run_post_layout`] after the render
//!   pass that committed the new step has settled; the deferred check
//!   runs there, against the state current at that moment, and issues at
//!   most one smooth scroll.
//!
//! # Ordering
//!
//! Within one notification the target rect is resolved before any
//! geometry getter can observe the new step, and the deferred visibility
//! check reads live state at run time, so an interleaved resize or step
//! change can never resurrect a stale rect.

use crate::frame::{BackdropView, CalloutView, FooterState, OrbView, OverlayFrame};
use crate::reactive::Subscription;
use crate::scroll::ScrollContext;
use crate::sequencer::TourSequencer;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, trace};
use waymark_core::{
    ElementGeometryProvider, Rect, SmoothScroller, TargetRect, TourConfig, TourStep,
    ViewportMetrics,
};
use waymark_layout::{CalloutPlacement, OrbPlacement, Placement, StepPlacement, Transform};

// ---------------------------------------------------------------------------
// Host events
// ---------------------------------------------------------------------------

/// Events the host page forwards to the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// The window was resized.
    Resized,
    /// The page scrolled.
    Scrolled,
    /// A click landed on the input mask behind the callout.
    BackdropClick,
    /// The pointer entered the orb indicator.
    OrbHover,
}

/// What the host should do with the event after the overlay saw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// Stop propagation; the overlay owns this event.
    Consumed,
    /// Continue normal handling.
    Ignored,
}

// ---------------------------------------------------------------------------
// Overlay
// ---------------------------------------------------------------------------

#[derive(Default)]
struct OverlayState {
    current_step: Option<TourStep>,
    target: TargetRect,
    orb_showing: bool,
    pending_visibility_check: bool,
}

/// Tracks the active step's target element and keeps the derived overlay
/// geometry synchronized with the viewport.
///
/// `H` is the host page: geometry reads plus the smooth-scroll effect.
/// After [`detach`](Self::detach) the overlay stops observing the
/// sequencer; the host is expected to stop forwarding events at the same
/// time it tears the rendered overlay down.
pub struct TourOverlay<H> {
    host: Rc<H>,
    sequencer: TourSequencer,
    config: TourConfig,
    placement: Placement,
    state: Rc<RefCell<OverlayState>>,
    subscriptions: RefCell<Vec<Subscription>>,
}

impl<H> TourOverlay<H>
where
    H: ElementGeometryProvider + SmoothScroller + 'static,
{
    /// Create an overlay over the given host, driven by the sequencer's
    /// streams. Call [`attach`](Self::attach) to start observing them.
    #[must_use]
    pub fn new(host: Rc<H>, sequencer: TourSequencer, config: TourConfig) -> Self {
        Self {
            host,
            sequencer,
            placement: Placement::new(&config),
            config,
            state: Rc::new(RefCell::new(OverlayState::default())),
            subscriptions: RefCell::new(Vec::new()),
        }
    }

    /// Subscribe to the sequencer's step and orb streams. Idempotent.
    pub fn attach(&self) {
        let mut subscriptions = self.subscriptions.borrow_mut();
        if !subscriptions.is_empty() {
            return;
        }

        let state = Rc::downgrade(&self.state);
        let host = Rc::clone(&self.host);
        subscriptions.push(self.sequencer.current_step().subscribe(move |step| {
            let Some(state) = state.upgrade() else { return };
            Self::on_step_changed(&state, &host, step.as_ref());
        }));

        let state = Rc::downgrade(&self.state);
        subscriptions.push(self.sequencer.orb_showing().subscribe(move |showing| {
            let Some(state) = state.upgrade() else { return };
            state.borrow_mut().orb_showing = *showing;
        }));
        trace!("overlay attached");
    }

    /// Release both stream subscriptions together.
    pub fn detach(&self) {
        self.subscriptions.borrow_mut().clear();
        trace!("overlay detached");
    }

    /// Whether the overlay is currently observing the sequencer.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        !self.subscriptions.borrow().is_empty()
    }

    fn on_step_changed(
        state: &Rc<RefCell<OverlayState>>,
        host: &Rc<H>,
        step: Option<&TourStep>,
    ) {
        state.borrow_mut().current_step = step.cloned();
        let selector = step.and_then(|step| step.selector.as_deref());
        match selector {
            Some(selector) if host.resolve(selector).is_some() => {
                Self::refresh_target(state, host);
                state.borrow_mut().pending_visibility_check = true;
            }
            _ => state.borrow_mut().target = TargetRect::Absent,
        }
    }

    /// Re-resolve the active step's target element and store its current
    /// bounding rect. Runs on every step change, resize, and scroll; each
    /// call re-queries the host so the rect reflects live layout.
    pub fn update_step_location(&self) {
        Self::refresh_target(&self.state, &self.host);
    }

    fn refresh_target(state: &Rc<RefCell<OverlayState>>, host: &Rc<H>) {
        let selector = {
            let state = state.borrow();
            state
                .current_step
                .as_ref()
                .and_then(|step| step.selector.clone())
        };
        let target = match selector.as_deref() {
            Some(selector) => TargetRect::from(host.resolve(selector)),
            None => TargetRect::Absent,
        };
        trace!(resolved = target.is_resolved(), "target rect refreshed");
        state.borrow_mut().target = target;
    }

    /// Feed one host event through the overlay.
    pub fn handle_event(&self, event: HostEvent) -> EventOutcome {
        match event {
            HostEvent::Resized | HostEvent::Scrolled => {
                self.update_step_location();
                EventOutcome::Ignored
            }
            HostEvent::BackdropClick => EventOutcome::Consumed,
            HostEvent::OrbHover => {
                self.sequencer.activate_orb();
                let has_selector = {
                    let state = self.state.borrow();
                    state
                        .current_step
                        .as_ref()
                        .is_some_and(|step| step.selector.is_some())
                };
                if has_selector {
                    self.update_step_location();
                    self.state.borrow_mut().pending_visibility_check = true;
                }
                EventOutcome::Ignored
            }
        }
    }

    /// Whether a deferred visibility check is waiting for the next
    /// post-layout pass.
    #[must_use]
    pub fn has_pending_layout_task(&self) -> bool {
        self.state.borrow().pending_visibility_check
    }

    /// Run the deferred visibility check, if one is pending.
    ///
    /// The host calls this once the render pass for the current state has
    /// committed, so the callout extent read here is accurate. Multiple
    /// pending checks coalesce into one.
    pub fn run_post_layout(&self) {
        let pending = {
            let mut state = self.state.borrow_mut();
            std::mem::take(&mut state.pending_visibility_check)
        };
        if pending {
            self.ensure_visible();
        }
    }

    /// Scroll the target into view unless it is already fully visible
    /// (or the orb is showing, which never scrolls).
    fn ensure_visible(&self) {
        let (step, target, orb_showing) = {
            let state = self.state.borrow();
            (
                state.current_step.clone(),
                state.target,
                state.orb_showing,
            )
        };
        let Some(step) = step else { return };
        if orb_showing {
            return;
        }
        let Some(rect) = target.rect() else { return };

        let context = ScrollContext::for_step(&step, &self.config);
        let viewport = self.host.viewport();
        if self.tour_on_screen(&step, context, viewport) {
            trace!("tour already on screen");
            return;
        }

        let offset = context.target_offset(rect, viewport);
        debug!(
            offset,
            bottom_anchored = context.bottom_anchored,
            "scrolling target into view"
        );
        self.host.smooth_scroll_to(offset);
    }

    /// Both the target element and the rendered callout are fully inside
    /// the usable viewport band.
    fn tour_on_screen(
        &self,
        step: &TourStep,
        context: ScrollContext,
        viewport: ViewportMetrics,
    ) -> bool {
        let target_visible = step
            .selector
            .as_deref()
            .and_then(|selector| self.host.document_extent(selector))
            .is_some_and(|extent| context.extent_visible(extent, viewport));
        let callout_visible = self
            .host
            .callout_extent()
            .is_some_and(|extent| context.extent_visible(extent, viewport));
        target_visible && callout_visible
    }

    // -- geometry getters ---------------------------------------------------

    /// Snapshot of the active step.
    #[must_use]
    pub fn current_step(&self) -> Option<TourStep> {
        self.state.borrow().current_step.clone()
    }

    /// The stored target rect from the last resolution.
    #[must_use]
    pub fn target_rect(&self) -> TargetRect {
        self.state.borrow().target
    }

    /// Whether the orb variant is currently presented.
    #[must_use]
    pub fn orb_active(&self) -> bool {
        self.state.borrow().orb_showing
    }

    /// Callout top for the active step, when a target rect is resolved.
    #[must_use]
    pub fn callout_top(&self) -> Option<f64> {
        let state = self.state.borrow();
        let step = state.current_step.as_ref()?;
        let rect = state.target.rect()?;
        Some(Placement::callout_top(
            rect,
            step.orientation,
            step.use_highlight_padding,
        ))
    }

    /// Callout left for the active step, when a target rect is resolved.
    #[must_use]
    pub fn callout_left(&self) -> Option<f64> {
        let state = self.state.borrow();
        let step = state.current_step.as_ref()?;
        let rect = state.target.rect()?;
        Some(
            self.placement
                .callout_left(rect, step.orientation, step.use_highlight_padding),
        )
    }

    /// Configured callout width.
    #[must_use]
    pub fn callout_width(&self) -> f64 {
        self.config.tour_step_width
    }

    /// Callout transform for the active step.
    #[must_use]
    pub fn callout_transform(&self) -> Option<Transform> {
        let state = self.state.borrow();
        let step = state.current_step.as_ref()?;
        Placement::callout_transform(step.orientation)
    }

    /// Orb top for the active step, when a target rect is resolved.
    #[must_use]
    pub fn orb_top(&self) -> Option<f64> {
        let state = self.state.borrow();
        let step = state.current_step.as_ref()?;
        let rect = state.target.rect()?;
        Some(Placement::orb_top(rect, step.orientation))
    }

    /// Orb left for the active step, when a target rect is resolved.
    #[must_use]
    pub fn orb_left(&self) -> Option<f64> {
        let state = self.state.borrow();
        let step = state.current_step.as_ref()?;
        let rect = state.target.rect()?;
        Some(Placement::orb_left(rect, step.orientation))
    }

    /// Orb transform for the active step.
    #[must_use]
    pub fn orb_transform(&self) -> Option<Transform> {
        let state = self.state.borrow();
        let step = state.current_step.as_ref()?;
        Placement::orb_transform(step.orientation)
    }

    /// Highlight backdrop box. The zero rect while no target is resolved.
    #[must_use]
    pub fn overlay_box(&self) -> Rect {
        let state = self.state.borrow();
        let padded = state
            .current_step
            .as_ref()
            .is_some_and(|step| step.use_highlight_padding);
        Placement::backdrop(state.target, padded)
    }

    /// Full placement solve for the active step and resolved rect.
    #[must_use]
    pub fn step_placement(&self) -> Option<StepPlacement> {
        let state = self.state.borrow();
        let step = state.current_step.as_ref()?;
        let rect = state.target.rect()?;
        Some(
            self.placement
                .solve(rect, step.orientation, step.use_highlight_padding),
        )
    }

    /// Assemble the render view-model for the current state.
    #[must_use]
    pub fn frame(&self) -> OverlayFrame {
        let state = self.state.borrow();
        let Some(step) = state.current_step.as_ref() else {
            return OverlayFrame::default();
        };

        if state.orb_showing {
            let orb = state.target.rect().map(|rect| OrbView {
                placement: OrbPlacement {
                    top: Placement::orb_top(rect, step.orientation),
                    left: Placement::orb_left(rect, step.orientation),
                    transform: Placement::orb_transform(step.orientation),
                },
                orientation: step.orientation,
            });
            return OverlayFrame {
                orb,
                backdrop: None,
                callout: None,
            };
        }

        let position = state
            .target
            .rect()
            .filter(|_| step.selector.is_some())
            .map(|rect| CalloutPlacement {
                top: Placement::callout_top(rect, step.orientation, step.use_highlight_padding),
                left: self
                    .placement
                    .callout_left(rect, step.orientation, step.use_highlight_padding),
                width: self.config.tour_step_width,
                transform: Placement::callout_transform(step.orientation),
            });
        OverlayFrame {
            orb: None,
            backdrop: Some(BackdropView {
                spotlight: Placement::backdrop(state.target, step.use_highlight_padding),
            }),
            callout: Some(CalloutView {
                title: step.title.clone(),
                content: step.content.clone(),
                orientation: step.orientation,
                position,
                footer: FooterState {
                    is_first: self.sequencer.on_first_step(),
                    is_last: self.sequencer.on_last_step(),
                    display_index: self.sequencer.current_step_display(),
                    step_count: self.sequencer.step_count(),
                },
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::{EventOutcome, HostEvent, TourOverlay};
    use crate::sequencer::TourSequencer;
    use crate::testing::FakePage;
    use std::rc::Rc;
    use waymark_core::{
        DocumentExtent, GuidedTour, Orientation, Rect, TargetRect, TourConfig, TourStep,
    };

    fn overlay_with(
        host: &Rc<FakePage>,
        config: TourConfig,
    ) -> (TourOverlay<FakePage>, TourSequencer) {
        let sequencer = TourSequencer::new();
        let overlay = TourOverlay::new(Rc::clone(host), sequencer.clone(), config);
        overlay.attach();
        (overlay, sequencer)
    }

    #[test]
    fn step_activation_resolves_target() {
        let host = FakePage::shared();
        host.place_element("#a", Rect::new(500.0, 10.0, 100.0, 30.0));
        let (overlay, sequencer) = overlay_with(&host, TourConfig::default());

        sequencer.start_tour(GuidedTour::new(
            "t",
            vec![
                TourStep::new("one")
                    .selector("#a")
                    .orientation(Orientation::Right),
            ],
        ));

        assert_eq!(
            overlay.target_rect(),
            TargetRect::Resolved(Rect::new(500.0, 10.0, 100.0, 30.0))
        );
        assert_eq!(overlay.callout_left(), Some(110.0));
        assert_eq!(overlay.callout_top(), Some(500.0));
        assert_eq!(overlay.callout_transform(), None);
        assert!(overlay.has_pending_layout_task());
    }

    #[test]
    fn unmatched_selector_leaves_target_absent() {
        let host = FakePage::shared();
        let (overlay, sequencer) = overlay_with(&host, TourConfig::default());

        sequencer.start_tour(GuidedTour::new(
            "t",
            vec![TourStep::new("one").selector("#missing")],
        ));

        assert_eq!(overlay.target_rect(), TargetRect::Absent);
        assert_eq!(overlay.callout_top(), None);
        assert_eq!(overlay.overlay_box(), Rect::ZERO);
        assert!(!overlay.has_pending_layout_task());
    }

    #[test]
    fn resize_re_resolves_moved_element() {
        let host = FakePage::shared();
        host.place_element("#a", Rect::new(500.0, 10.0, 100.0, 30.0));
        let (overlay, sequencer) = overlay_with(&host, TourConfig::default());
        sequencer.start_tour(GuidedTour::new(
            "t",
            vec![TourStep::new("one").selector("#a")],
        ));

        host.place_element("#a", Rect::new(40.0, 10.0, 100.0, 30.0));
        assert_eq!(overlay.handle_event(HostEvent::Resized), EventOutcome::Ignored);
        assert_eq!(
            overlay.target_rect(),
            TargetRect::Resolved(Rect::new(40.0, 10.0, 100.0, 30.0))
        );

        // The element disappearing downgrades to Absent, not an error.
        host.remove_element("#a");
        overlay.handle_event(HostEvent::Scrolled);
        assert_eq!(overlay.target_rect(), TargetRect::Absent);
    }

    #[test]
    fn backdrop_click_is_consumed() {
        let host = FakePage::shared();
        let (overlay, _sequencer) = overlay_with(&host, TourConfig::default());
        assert_eq!(
            overlay.handle_event(HostEvent::BackdropClick),
            EventOutcome::Consumed
        );
    }

    #[test]
    fn post_layout_scrolls_offscreen_target_once() {
        let host = FakePage::shared();
        host.set_viewport(0.0, 800.0);
        // Below the fold: document extent past 800.
        host.place_element_with_extent(
            "#a",
            Rect::new(1200.0, 0.0, 100.0, 30.0),
            DocumentExtent::new(1200.0, 30.0),
        );
        host.set_callout_extent(Some(DocumentExtent::new(1230.0, 120.0)));
        let (overlay, sequencer) = overlay_with(&host, TourConfig::default());

        sequencer.start_tour(GuidedTour::new(
            "t",
            vec![TourStep::new("one").selector("#a")],
        ));
        overlay.run_post_layout();

        // Top-anchored formula: scroll_y + top + height - viewport height.
        assert_eq!(host.scroll_calls(), vec![1200.0 + 30.0 - 800.0]);

        // The pending check was consumed; nothing further scrolls.
        overlay.run_post_layout();
        assert_eq!(host.scroll_calls().len(), 1);
    }

    #[test]
    fn visible_target_does_not_scroll() {
        let host = FakePage::shared();
        host.set_viewport(0.0, 800.0);
        host.place_element_with_extent(
            "#a",
            Rect::new(100.0, 0.0, 100.0, 30.0),
            DocumentExtent::new(100.0, 30.0),
        );
        host.set_callout_extent(Some(DocumentExtent::new(130.0, 120.0)));
        let (overlay, sequencer) = overlay_with(&host, TourConfig::default());

        sequencer.start_tour(GuidedTour::new(
            "t",
            vec![TourStep::new("one").selector("#a")],
        ));
        overlay.run_post_layout();
        assert!(host.scroll_calls().is_empty());
    }

    #[test]
    fn orb_suppresses_scroll_until_hovered() {
        let host = FakePage::shared();
        host.set_viewport(0.0, 800.0);
        host.place_element_with_extent(
            "#a",
            Rect::new(1200.0, 0.0, 100.0, 30.0),
            DocumentExtent::new(1200.0, 30.0),
        );
        host.set_callout_extent(None);
        let (overlay, sequencer) = overlay_with(&host, TourConfig::default());

        sequencer.start_tour(
            GuidedTour::new("t", vec![TourStep::new("one").selector("#a")]).use_orb(true),
        );
        overlay.run_post_layout();
        assert!(host.scroll_calls().is_empty());
        assert!(overlay.orb_active());

        overlay.handle_event(HostEvent::OrbHover);
        assert!(!overlay.orb_active());
        overlay.run_post_layout();
        assert_eq!(host.scroll_calls().len(), 1);
    }

    #[test]
    fn detach_stops_observing_the_sequencer() {
        let host = FakePage::shared();
        host.place_element("#a", Rect::new(500.0, 10.0, 100.0, 30.0));
        let (overlay, sequencer) = overlay_with(&host, TourConfig::default());
        assert!(overlay.is_attached());

        overlay.detach();
        assert!(!overlay.is_attached());
        sequencer.start_tour(GuidedTour::new(
            "t",
            vec![TourStep::new("one").selector("#a")],
        ));
        assert_eq!(overlay.current_step(), None);
        assert_eq!(overlay.target_rect(), TargetRect::Absent);
    }

    #[test]
    fn frame_for_page_level_step_has_no_position() {
        let host = FakePage::shared();
        let (overlay, sequencer) = overlay_with(&host, TourConfig::default());
        sequencer.start_tour(GuidedTour::new(
            "t",
            vec![TourStep::new("welcome").title("Hi")],
        ));

        let frame = overlay.frame();
        assert!(frame.orb.is_none());
        let callout = frame.callout.unwrap();
        assert_eq!(callout.position, None);
        assert_eq!(callout.title.as_deref(), Some("Hi"));
        assert!(callout.footer.is_first);
        assert!(callout.footer.is_last);
        assert_eq!(callout.footer.display_index, 1);
        // Absent target still yields a zero-size spotlight, not a missing one.
        assert_eq!(frame.backdrop.unwrap().spotlight, Rect::ZERO);
    }

    #[test]
    fn frame_while_orb_showing_has_only_the_orb() {
        let host = FakePage::shared();
        host.place_element("#a", Rect::new(500.0, 10.0, 100.0, 30.0));
        let (overlay, sequencer) = overlay_with(&host, TourConfig::default());
        sequencer.start_tour(
            GuidedTour::new(
                "t",
                vec![
                    TourStep::new("one")
                        .selector("#a")
                        .orientation(Orientation::Right),
                ],
            )
            .use_orb(true),
        );

        let frame = overlay.frame();
        assert!(frame.backdrop.is_none());
        assert!(frame.callout.is_none());
        let orb = frame.orb.unwrap();
        assert_eq!(orb.placement.top, 515.0);
        assert_eq!(orb.placement.left, 110.0);
    }
}

#![forbid(unsafe_code)]

//! Step sequencing: owns the active tour and publishes step snapshots.
//!
//! [`TourSequencer`] is the collaborator the overlay subscribes to. It
//! owns the current [`GuidedTour`] and step index, publishes the current
//! step on one stream and the orb-visibility flag on another, runs the
//! per-step open/close hooks and the tour-level skip/complete callbacks,
//! and answers the footer queries (first/last/display index/count).
//!
//! Hooks and callbacks run with no internal borrow held, so they may
//! publish to other observables freely; they should not drive the
//! sequencer itself re-entrantly (advance from a hook is a design bug in
//! the tour definition, not something this type defends against).

use crate::reactive::Observable;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;
use waymark_core::{GuidedTour, TourStep};

#[derive(Default)]
struct SequencerState {
    tour: Option<GuidedTour>,
    index: usize,
}

/// Owns the active tour and its progression.
///
/// Cloning a `TourSequencer` creates a new handle to the same tour state
/// and streams.
pub struct TourSequencer {
    state: Rc<RefCell<SequencerState>>,
    current_step: Observable<Option<TourStep>>,
    orb_showing: Observable<bool>,
}

impl Clone for TourSequencer {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
            current_step: self.current_step.clone(),
            orb_showing: self.orb_showing.clone(),
        }
    }
}

impl Default for TourSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl TourSequencer {
    /// Create a sequencer with no active tour.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(SequencerState::default())),
            current_step: Observable::new(None),
            orb_showing: Observable::new(false),
        }
    }

    /// The current-step stream (most-recent-value semantics).
    #[must_use]
    pub fn current_step(&self) -> Observable<Option<TourStep>> {
        self.current_step.clone()
    }

    /// The orb-visibility stream.
    #[must_use]
    pub fn orb_showing(&self) -> Observable<bool> {
        self.orb_showing.clone()
    }

    /// Start a tour at its first step.
    ///
    /// Publishes the orb flag first, then the step, so the overlay knows
    /// which variant to present before the step arrives. A tour with no
    /// steps is ignored.
    pub fn start_tour(&self, tour: GuidedTour) {
        if tour.steps.is_empty() {
            debug!(tour_id = %tour.tour_id, "ignoring tour with no steps");
            return;
        }
        debug!(tour_id = %tour.tour_id, steps = tour.steps.len(), "starting tour");
        let first = tour.steps[0].clone();
        let use_orb = tour.use_orb;
        {
            let mut state = self.state.borrow_mut();
            state.tour = Some(tour);
            state.index = 0;
        }
        self.orb_showing.set(use_orb);
        if let Some(hook) = &first.on_open {
            hook();
        }
        self.current_step.set(Some(first));
    }

    /// Advance to the next step, or complete the tour from the last one.
    pub fn next_step(&self) {
        let (leaving, entering, index) = {
            let mut state = self.state.borrow_mut();
            let index = state.index;
            let Some(tour) = &state.tour else { return };
            let leaving = tour.steps[index].clone();
            let entering = tour.steps.get(index + 1).cloned();
            if entering.is_some() {
                state.index = index + 1;
            }
            (leaving, entering, state.index)
        };

        if let Some(hook) = &leaving.on_close {
            hook();
        }
        match entering {
            Some(step) => {
                debug!(index, "advancing tour");
                if let Some(hook) = &step.on_open {
                    hook();
                }
                self.current_step.set(Some(step));
            }
            None => self.complete_tour(),
        }
    }

    /// Return to the previous step; a no-op on the first step.
    pub fn back_step(&self) {
        let (leaving, entering, index) = {
            let mut state = self.state.borrow_mut();
            let index = state.index;
            let Some(tour) = &state.tour else { return };
            if index == 0 {
                return;
            }
            let leaving = tour.steps[index].clone();
            let entering = tour.steps[index - 1].clone();
            state.index = index - 1;
            (leaving, entering, state.index)
        };

        if let Some(hook) = &leaving.on_close {
            hook();
        }
        debug!(index, "stepping tour back");
        if let Some(hook) = &entering.on_open {
            hook();
        }
        self.current_step.set(Some(entering));
    }

    /// Skip out of the tour, reporting the 0-based step index skipped on.
    pub fn skip_tour(&self) {
        let (on_skip, index) = {
            let state = self.state.borrow();
            let Some(tour) = &state.tour else { return };
            (tour.on_skip.clone(), state.index)
        };
        debug!(index, "tour skipped");
        if let Some(callback) = on_skip {
            callback(index);
        }
        self.reset();
    }

    /// Expand the orb into the full callout.
    pub fn activate_orb(&self) {
        self.orb_showing.set(false);
    }

    /// Tear the tour down without firing skip or complete callbacks.
    pub fn end_tour(&self) {
        if self.state.borrow().tour.is_some() {
            debug!("tour ended");
            self.reset();
        }
    }

    fn complete_tour(&self) {
        let on_complete = {
            let state = self.state.borrow();
            state.tour.as_ref().and_then(|tour| tour.on_complete.clone())
        };
        debug!("tour complete");
        if let Some(callback) = on_complete {
            callback();
        }
        self.reset();
    }

    fn reset(&self) {
        {
            let mut state = self.state.borrow_mut();
            state.tour = None;
            state.index = 0;
        }
        self.current_step.set(None);
    }

    /// Whether the active step is the first one.
    #[must_use]
    pub fn on_first_step(&self) -> bool {
        let state = self.state.borrow();
        state.tour.is_some() && state.index == 0
    }

    /// Whether the active step is the last one.
    #[must_use]
    pub fn on_last_step(&self) -> bool {
        let state = self.state.borrow();
        state
            .tour
            .as_ref()
            .is_some_and(|tour| state.index + 1 == tour.steps.len())
    }

    /// 1-based index of the active step, for footer display.
    #[must_use]
    pub fn current_step_display(&self) -> usize {
        self.state.borrow().index + 1
    }

    /// Total number of steps in the active tour (0 when idle).
    #[must_use]
    pub fn step_count(&self) -> usize {
        self.state
            .borrow()
            .tour
            .as_ref()
            .map_or(0, GuidedTour::step_count)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

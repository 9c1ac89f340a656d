#![forbid(unsafe_code)]

//! Waymark Runtime
//!
//! This crate ties the core model and the placement solver into a working
//! overlay: it observes the step sequencer's notification streams, tracks
//! the target element through viewport changes, and coordinates
//! scroll-into-view.
//!
//! # Key Components
//!
//! - [`TourSequencer`] - owns the active tour, publishes step and orb streams
//! - [`TourOverlay`] - viewport tracking, host events, derived geometry
//! - [`Observable`] / [`Subscription`] - change-notification primitive
//! - [`ScrollContext`] - pure visibility bounds and scroll-target math
//! - [`OverlayFrame`] - view-model handed to the template layer
//!
//! # How it fits in the system
//! `waymark-runtime` is the orchestrator. It consumes host events and
//! sequencer notifications, re-resolves geometry through
//! `waymark-core::ElementGeometryProvider`, and delegates placement math
//! to `waymark-layout`. Rendering stays outside: the embedding
//! application draws whatever [`TourOverlay::frame`] describes.
//!
//! Everything is single-threaded: state lives in `Rc`/`RefCell` and is
//! only touched from the host's event loop.

pub mod frame;
pub mod overlay;
pub mod reactive;
pub mod scroll;
pub mod sequencer;

#[cfg(any(test, feature = "test-helpers"))]
pub mod testing;

pub use frame::{BackdropView, CalloutView, FooterState, OrbView, OverlayFrame};
pub use overlay::{EventOutcome, HostEvent, TourOverlay};
pub use reactive::{Observable, Subscription};
pub use scroll::ScrollContext;
pub use sequencer::TourSequencer;

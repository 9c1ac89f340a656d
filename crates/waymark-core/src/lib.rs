#![forbid(unsafe_code)]

//! Core: tour declarations, px-space geometry, and host capabilities.
//!
//! # Role in Waymark
//! `waymark-core` is the vocabulary layer. It owns the declarative tour
//! model ([`TourStep`], [`GuidedTour`], [`Orientation`]), the pixel-space
//! geometry primitives ([`Rect`], [`TargetRect`]), the embedding
//! configuration ([`TourConfig`]), and the capability traits the runtime
//! uses to read the host page and request scrolls.
//!
//! # How it fits in the system
//! The placement solver (`waymark-layout`) is a pure function over these
//! types; the runtime (`waymark-runtime`) resolves targets through
//! [`ElementGeometryProvider`] and wires everything to the host's event
//! flow. Nothing here performs I/O.

pub mod config;
pub mod geometry;
pub mod host;
pub mod step;

pub use config::TourConfig;
pub use geometry::{HIGHLIGHT_PADDING, Rect, TargetRect};
pub use host::{DocumentExtent, ElementGeometryProvider, SmoothScroller, ViewportMetrics};
pub use step::{GuidedTour, Orientation, StepHook, TourStep};

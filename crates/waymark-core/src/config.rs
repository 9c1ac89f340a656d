#![forbid(unsafe_code)]

//! Overlay configuration supplied by the embedding application.

use serde::{Deserialize, Serialize};

/// Tunables accepted from the embedding application.
///
/// Both fields have stable defaults so a config deserialized from an empty
/// document behaves like `TourConfig::default()`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TourConfig {
    /// Px reserved at the top of the viewport, e.g. for a sticky header.
    pub top_of_page_adjustment: f64,
    /// Callout width in px.
    pub tour_step_width: f64,
}

impl Default for TourConfig {
    fn default() -> Self {
        Self {
            top_of_page_adjustment: 0.0,
            tour_step_width: 300.0,
        }
    }
}

impl TourConfig {
    /// Override the top-of-page adjustment.
    pub fn top_of_page_adjustment(mut self, px: f64) -> Self {
        self.top_of_page_adjustment = px;
        self
    }

    /// Override the callout width.
    pub fn tour_step_width(mut self, px: f64) -> Self {
        self.tour_step_width = px;
        self
    }
}

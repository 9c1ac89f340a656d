#![forbid(unsafe_code)]

//! Geometric primitives.

use serde::{Deserialize, Serialize};

/// Padding applied around a highlighted element when a step opts in, in px.
pub const HIGHLIGHT_PADDING: f64 = 4.0;

/// A rectangle in CSS pixels, relative to the viewport origin at read time.
///
/// Mirrors the shape of a DOM bounding rect: `top`/`left` locate the
/// top-left corner, `right()` and `bottom()` are derived.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Top edge.
    pub top: f64,
    /// Left edge.
    pub left: f64,
    /// Width in px.
    pub width: f64,
    /// Height in px.
    pub height: f64,
}

impl Rect {
    /// The zero-size rectangle at the origin.
    pub const ZERO: Self = Self {
        top: 0.0,
        left: 0.0,
        width: 0.0,
        height: 0.0,
    };

    /// Create a new rectangle.
    #[inline]
    pub const fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    /// Right edge (`left + width`).
    #[inline]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Bottom edge (`top + height`).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Horizontal center.
    #[inline]
    pub fn center_x(&self) -> f64 {
        self.left + self.width / 2.0
    }

    /// Vertical center.
    #[inline]
    pub fn center_y(&self) -> f64 {
        self.top + self.height / 2.0
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0.0 || self.height == 0.0
    }

    /// Grow the rectangle by `pad` px on all four sides.
    #[inline]
    pub fn expand(&self, pad: f64) -> Rect {
        Rect {
            top: self.top - pad,
            left: self.left - pad,
            width: self.width + pad * 2.0,
            height: self.height + pad * 2.0,
        }
    }
}

/// A resolved target rectangle, or the record that resolution found nothing.
///
/// The absent state is a real value, not a suppressed render: a backdrop
/// derived from `Absent` is the zero rect at the origin, matching what the
/// host page observes when a selector stops matching mid-tour.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum TargetRect {
    /// The selector matched and this was its bounding rect at read time.
    Resolved(Rect),
    /// No selector, or the selector matched nothing.
    #[default]
    Absent,
}

impl TargetRect {
    /// The resolved rect, if any.
    #[inline]
    pub fn rect(&self) -> Option<Rect> {
        match self {
            Self::Resolved(rect) => Some(*rect),
            Self::Absent => None,
        }
    }

    /// Whether resolution found an element.
    #[inline]
    pub const fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

impl From<Option<Rect>> for TargetRect {
    fn from(rect: Option<Rect>) -> Self {
        rect.map_or(Self::Absent, Self::Resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::{Rect, TargetRect};

    #[test]
    fn rect_derived_edges() {
        let rect = Rect::new(100.0, 200.0, 50.0, 20.0);
        assert_eq!(rect.right(), 250.0);
        assert_eq!(rect.bottom(), 120.0);
        assert_eq!(rect.center_x(), 225.0);
        assert_eq!(rect.center_y(), 110.0);
    }

    #[test]
    fn rect_expand_grows_all_sides() {
        let rect = Rect::new(10.0, 20.0, 30.0, 40.0);
        let grown = rect.expand(4.0);
        assert_eq!(grown, Rect::new(6.0, 16.0, 38.0, 48.0));
    }

    #[test]
    fn zero_rect_is_empty() {
        assert!(Rect::ZERO.is_empty());
        assert!(!Rect::new(0.0, 0.0, 1.0, 1.0).is_empty());
    }

    #[test]
    fn target_rect_default_is_absent() {
        assert_eq!(TargetRect::default(), TargetRect::Absent);
        assert_eq!(TargetRect::Absent.rect(), None);
    }

    #[test]
    fn target_rect_from_option() {
        let rect = Rect::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(TargetRect::from(Some(rect)).rect(), Some(rect));
        assert!(!TargetRect::from(None).is_resolved());
    }
}

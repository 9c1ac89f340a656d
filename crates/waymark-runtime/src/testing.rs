#![forbid(unsafe_code)]

//! Scripted fake host for tests.
//!
//! [`FakePage`] stands in for the real page binding: tests place elements
//! by selector, move the viewport, and assert on recorded scroll calls.
//! Enabled for this crate's own tests and, via the `test-helpers`
//! feature, for downstream integration tests.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use waymark_core::{DocumentExtent, ElementGeometryProvider, Rect, SmoothScroller, ViewportMetrics};

#[derive(Clone, Copy)]
struct FakeElement {
    rect: Rect,
    extent: DocumentExtent,
}

/// An in-memory page: selectors map to placed elements, the viewport is a
/// settable value, and smooth scrolls are recorded instead of animated.
#[derive(Default)]
pub struct FakePage {
    elements: RefCell<HashMap<String, FakeElement>>,
    callout: Cell<Option<DocumentExtent>>,
    viewport: Cell<ViewportMetrics>,
    scrolls: RefCell<Vec<f64>>,
}

impl FakePage {
    /// A shared handle, ready to hand to an overlay.
    #[must_use]
    pub fn shared() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Place (or move) an element. Its document extent is derived from
    /// the rect as if the page were unscrolled; use
    /// [`place_element_with_extent`](Self::place_element_with_extent)
    /// when the two must differ.
    pub fn place_element(&self, selector: &str, rect: Rect) {
        self.place_element_with_extent(selector, rect, DocumentExtent::new(rect.top, rect.height));
    }

    /// Place (or move) an element with an explicit document extent.
    pub fn place_element_with_extent(&self, selector: &str, rect: Rect, extent: DocumentExtent) {
        self.elements
            .borrow_mut()
            .insert(selector.to_owned(), FakeElement { rect, extent });
    }

    /// Remove an element, as if it left the DOM.
    pub fn remove_element(&self, selector: &str) {
        self.elements.borrow_mut().remove(selector);
    }

    /// Set the viewport scroll offset and height.
    pub fn set_viewport(&self, scroll_y: f64, height: f64) {
        self.viewport.set(ViewportMetrics { scroll_y, height });
    }

    /// Set the rendered callout's document extent (`None` = not rendered
    /// yet).
    pub fn set_callout_extent(&self, extent: Option<DocumentExtent>) {
        self.callout.set(extent);
    }

    /// Every `smooth_scroll_to` target recorded so far, oldest first.
    #[must_use]
    pub fn scroll_calls(&self) -> Vec<f64> {
        self.scrolls.borrow().clone()
    }

    /// Forget recorded scroll calls.
    pub fn clear_scroll_calls(&self) {
        self.scrolls.borrow_mut().clear();
    }
}

impl ElementGeometryProvider for FakePage {
    fn resolve(&self, selector: &str) -> Option<Rect> {
        self.elements.borrow().get(selector).map(|el| el.rect)
    }

    fn document_extent(&self, selector: &str) -> Option<DocumentExtent> {
        self.elements.borrow().get(selector).map(|el| el.extent)
    }

    fn callout_extent(&self) -> Option<DocumentExtent> {
        self.callout.get()
    }

    fn viewport(&self) -> ViewportMetrics {
        self.viewport.get()
    }
}

impl SmoothScroller for FakePage {
    fn smooth_scroll_to(&self, top: f64) {
        self.scrolls.borrow_mut().push(top);
    }
}

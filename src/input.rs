use web_sys::{DomRect, Element, HtmlElement};

use hyoka_core::{rating_at, ControlSpan};

pub(crate) trait HasClientRect {
    fn client_rect(&self) -> DomRect;
}

impl HasClientRect for Element {
    fn client_rect(&self) -> DomRect {
        self.get_bounding_client_rect()
    }
}

impl HasClientRect for HtmlElement {
    fn client_rect(&self) -> DomRect {
        self.get_bounding_client_rect()
    }
}

pub(crate) fn control_span(element: &impl HasClientRect) -> Option<ControlSpan> {
    let rect = element.client_rect();
    let width = rect.width() as f32;
    if width <= 0.0 {
        return None;
    }
    Some(ControlSpan::new(rect.left() as f32, width))
}

pub(crate) fn sample_rating(element: &impl HasClientRect, client_x: f32) -> Option<u8> {
    control_span(element).map(|span| rating_at(span, client_x))
}

//! Small DOM helpers shared by the click handlers

use std::str::FromStr;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event};

pub fn document() -> Option<Document> {
    web_sys::window().and_then(|w| w.document())
}

/// Nearest ancestor (or the target itself) matching `selector`, starting
/// from the event target. None when the click landed elsewhere.
pub fn closest_from_event(event: &Event, selector: &str) -> Option<Element> {
    let target = event.target()?;
    let element: &Element = target.dyn_ref::<Element>()?;
    element.closest(selector).ok().flatten()
}

/// Attribute value, with empty strings treated as absent.
pub fn attr(element: &Element, name: &str) -> Option<String> {
    element.get_attribute(name).filter(|v| !v.is_empty())
}

/// Parse a numeric attribute such as a variant id or quantity override.
pub fn numeric_attr<T: FromStr>(element: &Element, name: &str) -> Option<T> {
    attr(element, name)?.trim().parse().ok()
}

/// The node whose text tracks the button phase: a nested
/// `[data-add-to-cart-text]` element when the theme provides one, else the
/// control itself.
pub fn label_node(button: &Element) -> Element {
    button
        .query_selector("[data-add-to-cart-text]")
        .ok()
        .flatten()
        .unwrap_or_else(|| button.clone())
}

//! Delegated click controller for wishlist and add-to-cart interactions
//!
//! One listener on the document classifies each click against the wishlist
//! and add-to-cart selectors; everything else passes through untouched.
//! Button state lives in an explicit machine and is projected onto the DOM
//! in a separate render step. Each click stamps its control with a fresh
//! generation so a late response or revert timer from a superseded click is
//! discarded.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_timers::future::TimeoutFuture;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::Closure;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, Event};

use crate::cart::{self, ButtonLabels, ButtonMachine, ButtonPhase, ClickAction};
use crate::dom;
use crate::notify::{self, Severity};
use crate::storage;

const WISHLIST_SELECTOR: &str = ".wishlist-btn";
const ADD_TO_CART_SELECTOR: &str = ".add-to-cart-btn";
const PRODUCT_CARD_SELECTOR: &str = ".product-card";

/// Fired by the theme editor when it re-renders a section. Indicators must
/// be resynced, but the click listener stays registered.
const SECTION_RELOAD_EVENT: &str = "shopify:section:load";

const GENERATION_ATTR: &str = "data-cart-generation";
const DEFAULT_TEXT_ATTR: &str = "data-default-text";

const FALLBACK_TITLE: &str = "This product";

thread_local! {
    static CONTROLLER: RefCell<Option<ProductsController>> = const { RefCell::new(None) };
}

/// Install the controller once. Repeat calls are no-ops, so the delegated
/// listener can never double-fire.
pub fn ensure_started() {
    CONTROLLER.with(|slot| {
        let mut slot = slot.borrow_mut();
        if slot.is_some() {
            return;
        }
        match ProductsController::install() {
            Some(controller) => {
                log::debug!("products section controller installed");
                *slot = Some(controller);
            }
            None => log::warn!("no document available, products section controller not installed"),
        }
    });
}

/// Owns the document listeners and the click generation counter.
pub struct ProductsController {
    _click: Closure<dyn FnMut(Event)>,
    _section_reload: Closure<dyn FnMut(Event)>,
}

impl ProductsController {
    fn install() -> Option<Self> {
        let document = dom::document()?;

        sync_wishlist_indicators(&document);

        let generation = Rc::new(Cell::new(0u64));
        let click = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            handle_click(&event, &generation);
        });
        document
            .add_event_listener_with_callback("click", click.as_ref().unchecked_ref())
            .ok()?;

        let reload_document = document.clone();
        let section_reload = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
            log::debug!("section reloaded, resyncing wishlist indicators");
            sync_wishlist_indicators(&reload_document);
        });
        document
            .add_event_listener_with_callback(
                SECTION_RELOAD_EVENT,
                section_reload.as_ref().unchecked_ref(),
            )
            .ok()?;

        Some(ProductsController {
            _click: click,
            _section_reload: section_reload,
        })
    }
}

fn handle_click(event: &Event, generation: &Rc<Cell<u64>>) {
    if let Some(btn) = dom::closest_from_event(event, WISHLIST_SELECTOR) {
        event.prevent_default();
        handle_wishlist_toggle(&btn);
        return;
    }
    if let Some(btn) = dom::closest_from_event(event, ADD_TO_CART_SELECTOR) {
        event.prevent_default();
        handle_add_to_cart(&btn, generation);
    }
}

// ---------------------------------------------------------------------------
// Wishlist

fn handle_wishlist_toggle(btn: &Element) {
    let Some(card) = btn.closest(PRODUCT_CARD_SELECTOR).ok().flatten() else {
        log::warn!("wishlist control outside a product card, ignoring click");
        return;
    };
    let Some(product_id) = dom::attr(&card, "data-product-id") else {
        log::warn!("product card missing data-product-id, ignoring click");
        return;
    };
    let title = dom::attr(&card, "data-product-title")
        .unwrap_or_else(|| FALLBACK_TITLE.to_string());

    // Stored state is the source of truth; the class is just its projection.
    let mut wishlist = storage::load_wishlist();
    let now_listed = wishlist.toggle(&product_id);
    storage::save_wishlist(&wishlist);

    render_wishlist_indicator(btn, now_listed);

    if now_listed {
        notify::show(&format!("{title} added to your wishlist."), Severity::Success);
    } else {
        notify::show(&format!("{title} removed from your wishlist."), Severity::Error);
    }
}

fn render_wishlist_indicator(btn: &Element, active: bool) {
    let classes = btn.class_list();
    if active {
        let _ = classes.add_1("active");
    } else {
        let _ = classes.remove_1("active");
    }
    let _ = btn.set_attribute("aria-pressed", if active { "true" } else { "false" });
}

/// Mark every wishlist control whose card identifier is stored; clear the
/// rest. Runs at startup and after every section reload.
pub fn sync_wishlist_indicators(document: &Document) {
    let wishlist = storage::load_wishlist();
    let Ok(cards) = document.query_selector_all(PRODUCT_CARD_SELECTOR) else {
        return;
    };
    for index in 0..cards.length() {
        let Some(node) = cards.item(index) else {
            continue;
        };
        let Ok(card) = node.dyn_into::<Element>() else {
            continue;
        };
        let Some(btn) = card.query_selector(WISHLIST_SELECTOR).ok().flatten() else {
            continue;
        };
        let active = dom::attr(&card, "data-product-id")
            .map(|id| wishlist.contains(&id))
            .unwrap_or(false);
        render_wishlist_indicator(&btn, active);
    }
}

// ---------------------------------------------------------------------------
// Add to cart

fn handle_add_to_cart(btn: &Element, generation: &Rc<Cell<u64>>) {
    // The disabled attribute is the cross-click re-entry guard: a control in
    // loading or success keeps it set, so a second click cannot start a
    // second request.
    if btn.has_attribute("disabled") {
        return;
    }

    let title = btn
        .closest(PRODUCT_CARD_SELECTOR)
        .ok()
        .flatten()
        .and_then(|card| dom::attr(&card, "data-product-title"))
        .unwrap_or_else(|| FALLBACK_TITLE.to_string());

    let labels = read_labels(btn);
    let variant_id: Option<u64> = dom::numeric_attr(btn, "data-variant-id");
    let quantity: u32 = dom::numeric_attr(btn, "data-quantity").unwrap_or(1);

    let generation_stamp = generation.get().wrapping_add(1);
    generation.set(generation_stamp);
    let _ = btn.set_attribute(GENERATION_ATTR, &generation_stamp.to_string());

    let mut machine = ButtonMachine::new();
    match machine.on_click(variant_id, quantity) {
        ClickAction::Ignore => {}
        ClickAction::RejectUnavailable => {
            log::warn!("add-to-cart control has no usable variant id");
            render_button(btn, &machine, &labels);
            notify::show(cart::UNAVAILABLE_MESSAGE, Severity::Error);
            schedule_revert(
                btn.clone(),
                machine,
                labels,
                generation_stamp,
                cart::REVERT_AFTER_UNAVAILABLE_MS,
            );
        }
        ClickAction::Submit(payload) => {
            render_button(btn, &machine, &labels);
            let btn = btn.clone();
            spawn_local(async move {
                let outcome = cart::submit_cart_add(&payload).await;
                if !generation_matches(&btn, generation_stamp) {
                    log::debug!("discarding cart response for a superseded click");
                    return;
                }
                match outcome {
                    Ok(()) => {
                        machine.on_response(true);
                        render_button(&btn, &machine, &labels);
                        notify::show(
                            &format!("{title} added to your cart."),
                            Severity::Success,
                        );
                    }
                    Err(failure) => {
                        machine.on_response(false);
                        render_button(&btn, &machine, &labels);
                        notify::show(&failure.message, Severity::Error);
                    }
                }
                let delay = machine.revert_delay_ms();
                TimeoutFuture::new(delay).await;
                if generation_matches(&btn, generation_stamp) {
                    machine.reset();
                    render_button(&btn, &machine, &labels);
                }
            });
        }
    }
}

/// Project the machine's phase onto the control: state classes, disabled and
/// aria flags, and the phase label text.
fn render_button(btn: &Element, machine: &ButtonMachine, labels: &ButtonLabels) {
    let phase = machine.phase();
    let classes = btn.class_list();
    let _ = classes.remove_1("is-loading");
    let _ = classes.remove_1("is-added");
    let _ = classes.remove_1("is-error");
    match phase {
        ButtonPhase::Loading => {
            let _ = classes.add_1("is-loading");
        }
        ButtonPhase::Success => {
            let _ = classes.add_1("is-added");
        }
        ButtonPhase::Failed => {
            let _ = classes.add_1("is-error");
        }
        ButtonPhase::Idle => {}
    }

    // Success keeps the control disabled until the revert; an error leaves
    // it clickable so the shopper can retry immediately.
    let disabled = matches!(phase, ButtonPhase::Loading | ButtonPhase::Success);
    if disabled {
        let _ = btn.set_attribute("disabled", "");
    } else {
        let _ = btn.remove_attribute("disabled");
    }
    let _ = btn.set_attribute(
        "aria-busy",
        if phase == ButtonPhase::Loading { "true" } else { "false" },
    );

    dom::label_node(btn).set_text_content(Some(labels.for_phase(phase)));
}

fn schedule_revert(
    btn: Element,
    mut machine: ButtonMachine,
    labels: ButtonLabels,
    generation_stamp: u64,
    delay_ms: u32,
) {
    spawn_local(async move {
        TimeoutFuture::new(delay_ms).await;
        if generation_matches(&btn, generation_stamp) {
            machine.reset();
            render_button(&btn, &machine, &labels);
        }
    });
}

fn generation_matches(btn: &Element, generation_stamp: u64) -> bool {
    stamp_is_current(dom::attr(btn, GENERATION_ATTR).as_deref(), generation_stamp)
}

/// A control is restamped on every click, so a response or revert timer
/// whose stamp differs belongs to a superseded click and must be discarded.
fn stamp_is_current(stamp: Option<&str>, generation_stamp: u64) -> bool {
    stamp.and_then(|v| v.parse::<u64>().ok()) == Some(generation_stamp)
}

/// Resolve the four phase labels. The idle text is captured from the markup
/// on first use and cached on the control, so a click while the error label
/// is showing does not adopt "Try again" as the default.
fn read_labels(btn: &Element) -> ButtonLabels {
    let idle = match dom::attr(btn, DEFAULT_TEXT_ATTR) {
        Some(text) => Some(text),
        None => {
            let current = dom::label_node(btn)
                .text_content()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty());
            if let Some(text) = &current {
                let _ = btn.set_attribute(DEFAULT_TEXT_ATTR, text);
            }
            current
        }
    };
    ButtonLabels::resolve(
        idle,
        dom::attr(btn, "data-adding-text"),
        dom::attr(btn, "data-added-text"),
        dom::attr(btn, "data-error-text"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_stamp_is_accepted() {
        assert!(stamp_is_current(Some("3"), 3));
    }

    #[test]
    fn test_superseded_stamp_is_discarded() {
        // The control was re-clicked and restamped after this outcome's
        // click, so the outcome must not touch the newer state.
        assert!(!stamp_is_current(Some("4"), 3));
        assert!(!stamp_is_current(Some("2"), 3));
    }

    #[test]
    fn test_missing_or_mangled_stamp_is_discarded() {
        assert!(!stamp_is_current(None, 3));
        assert!(!stamp_is_current(Some(""), 3));
        assert!(!stamp_is_current(Some("not a number"), 3));
    }
}

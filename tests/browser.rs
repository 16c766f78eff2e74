#![cfg(target_arch = "wasm32")]

//! Browser-only integration tests: real localStorage and DOM.

use gloo_timers::future::TimeoutFuture;
use products_section::{Severity, Wishlist, controller, notify, storage};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::Element;

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> web_sys::Document {
    web_sys::window().unwrap().document().unwrap()
}

fn dispatch_click(target: &Element) {
    let init = web_sys::EventInit::new();
    init.set_bubbles(true);
    let event = web_sys::Event::new_with_event_init_dict("click", &init).unwrap();
    target.dispatch_event(&event).unwrap();
}

#[wasm_bindgen_test]
fn test_wishlist_round_trips_through_local_storage() {
    let mut wishlist = Wishlist::new();
    wishlist.add("7");
    wishlist.add("9");

    storage::save_wishlist(&wishlist);

    assert_eq!(storage::load_wishlist(), wishlist);
}

#[wasm_bindgen_test]
fn test_malformed_stored_wishlist_reads_as_empty() {
    let backing = web_sys::window().unwrap().local_storage().unwrap().unwrap();
    backing
        .set_item(storage::WISHLIST_KEY, "definitely not json")
        .unwrap();

    assert!(storage::load_wishlist().is_empty());
}

#[wasm_bindgen_test]
fn test_sync_marks_only_stored_cards() {
    let document = document();
    let root = document.create_element("div").unwrap();
    root.set_inner_html(concat!(
        "<div class=\"product-card\" data-product-id=\"7\">",
        "<button class=\"wishlist-btn\"></button></div>",
        "<div class=\"product-card\" data-product-id=\"8\">",
        "<button class=\"wishlist-btn\"></button></div>",
        "<div class=\"product-card\" data-product-id=\"9\">",
        "<button class=\"wishlist-btn\"></button></div>",
    ));
    document.body().unwrap().append_child(&root).unwrap();

    let mut wishlist = Wishlist::new();
    wishlist.add("7");
    wishlist.add("9");
    storage::save_wishlist(&wishlist);

    controller::sync_wishlist_indicators(&document);

    let buttons = root.query_selector_all(".wishlist-btn").unwrap();
    let active: Vec<bool> = (0..buttons.length())
        .map(|i| {
            buttons
                .item(i)
                .unwrap()
                .dyn_into::<Element>()
                .unwrap()
                .class_list()
                .contains("active")
        })
        .collect();

    assert_eq!(active, vec![true, false, true]);

    root.remove();
}

#[wasm_bindgen_test]
fn test_click_on_disabled_control_is_ignored() {
    products_section::start_products_section();
    let document = document();
    let root = document.create_element("div").unwrap();
    root.set_inner_html(concat!(
        "<div class=\"product-card\" data-product-id=\"7\" data-product-title=\"Widget\">",
        "<button class=\"add-to-cart-btn\" data-variant-id=\"123\" disabled>",
        "Add to Cart</button></div>",
    ));
    document.body().unwrap().append_child(&root).unwrap();

    let btn = root.query_selector(".add-to-cart-btn").unwrap().unwrap();
    dispatch_click(&btn);

    // The disabled guard must reject the click before any state change:
    // no loading class, no label swap, no request.
    assert!(!btn.class_list().contains("is-loading"));
    assert_eq!(btn.text_content().unwrap(), "Add to Cart");

    root.remove();
}

#[wasm_bindgen_test]
async fn test_restamped_control_keeps_its_newer_state() {
    products_section::start_products_section();
    let document = document();
    let root = document.create_element("div").unwrap();
    root.set_inner_html(concat!(
        "<div class=\"product-card\" data-product-id=\"7\" data-product-title=\"Widget\">",
        "<button class=\"add-to-cart-btn\">Add to Cart</button></div>",
    ));
    document.body().unwrap().append_child(&root).unwrap();

    // No variant id: the click fails immediately and schedules a revert.
    let btn = root.query_selector(".add-to-cart-btn").unwrap().unwrap();
    dispatch_click(&btn);
    assert!(btn.class_list().contains("is-error"));
    assert_eq!(btn.text_content().unwrap(), "Try again");

    // Restamp the control as if a newer click had claimed it. The pending
    // revert now carries a superseded stamp and must leave the control
    // untouched.
    btn.set_attribute("data-cart-generation", "9999").unwrap();
    TimeoutFuture::new(2_600).await;

    assert!(btn.class_list().contains("is-error"));
    assert_eq!(btn.text_content().unwrap(), "Try again");

    root.remove();
}

#[wasm_bindgen_test]
fn test_toasts_stack_in_a_single_host() {
    notify::show("Widget added to your cart.", Severity::Success);
    notify::show("Sold out", Severity::Error);

    let document = document();
    let hosts = document.query_selector_all(".notification-host").unwrap();
    assert_eq!(hosts.length(), 1);

    let host = document.query_selector(".notification-host").unwrap().unwrap();
    assert!(host.query_selector(".notification-success").unwrap().is_some());
    assert!(host.query_selector(".notification-error").unwrap().is_some());
}

/// Products Section - storefront cart & wishlist interactions
/// Built with Rust + WASM

pub mod cart;
pub mod controller;
mod dom;
pub mod notify;
pub mod storage;
pub mod wishlist;

pub use cart::{ButtonLabels, ButtonMachine, ButtonPhase, CartAddPayload, CartLine, ClickAction};
pub use notify::Severity;
pub use wishlist::Wishlist;

use wasm_bindgen::prelude::*;

// Set up panic hook and console logging for the browser
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

/// Install the click controller and sync wishlist indicators. Called by the
/// theme after the module loads; safe to call more than once.
#[wasm_bindgen]
pub fn start_products_section() {
    controller::ensure_started();
}

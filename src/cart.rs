//! Add-to-cart: request payload, button lifecycle, and the cart endpoint call

use serde::{Deserialize, Serialize};

/// Storefront cart endpoint. The success body is ignored beyond the status
/// check; the failure body may carry a human-readable message.
pub const CART_ADD_PATH: &str = "/cart/add.js";

/// How long a button shows its success text before reverting to idle.
pub const REVERT_AFTER_SUCCESS_MS: u32 = 2_200;
/// The error text lingers slightly longer so it can actually be read.
pub const REVERT_AFTER_ERROR_MS: u32 = 2_400;
/// An unavailable product never enters loading and reverts on the short delay.
pub const REVERT_AFTER_UNAVAILABLE_MS: u32 = 2_200;

pub const FALLBACK_ERROR_MESSAGE: &str = "Unable to add this item to your cart.";
pub const UNAVAILABLE_MESSAGE: &str = "This product is currently unavailable.";

/// One line item for the cart endpoint. Field order matters for the wire
/// format: `{"id":...,"quantity":...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: u64,
    pub quantity: u32,
}

/// The POST body: always exactly one line per click.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartAddPayload {
    pub items: Vec<CartLine>,
}

impl CartAddPayload {
    pub fn single(variant_id: u64, quantity: u32) -> Self {
        CartAddPayload {
            items: vec![CartLine {
                id: variant_id,
                quantity: quantity.max(1),
            }],
        }
    }
}

/// A failed cart submission, with the message to surface to the shopper.
#[derive(Debug, Clone, PartialEq)]
pub struct CartAddFailure {
    pub status: Option<u16>,
    pub message: String,
}

impl CartAddFailure {
    pub fn transport() -> Self {
        CartAddFailure {
            status: None,
            message: FALLBACK_ERROR_MESSAGE.to_string(),
        }
    }
}

/// Label text for each phase of an add-to-cart control. The idle label is
/// captured from the markup; the rest come from data-attribute overrides
/// with storefront defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct ButtonLabels {
    pub idle: String,
    pub loading: String,
    pub success: String,
    pub error: String,
}

impl ButtonLabels {
    pub const DEFAULT_IDLE: &'static str = "Add to Cart";
    pub const DEFAULT_LOADING: &'static str = "Adding...";
    pub const DEFAULT_SUCCESS: &'static str = "Added!";
    pub const DEFAULT_ERROR: &'static str = "Try again";

    pub fn resolve(
        idle: Option<String>,
        loading: Option<String>,
        success: Option<String>,
        error: Option<String>,
    ) -> Self {
        ButtonLabels {
            idle: idle.unwrap_or_else(|| Self::DEFAULT_IDLE.to_string()),
            loading: loading.unwrap_or_else(|| Self::DEFAULT_LOADING.to_string()),
            success: success.unwrap_or_else(|| Self::DEFAULT_SUCCESS.to_string()),
            error: error.unwrap_or_else(|| Self::DEFAULT_ERROR.to_string()),
        }
    }

    pub fn for_phase(&self, phase: ButtonPhase) -> &str {
        match phase {
            ButtonPhase::Idle => &self.idle,
            ButtonPhase::Loading => &self.loading,
            ButtonPhase::Success => &self.success,
            ButtonPhase::Failed => &self.error,
        }
    }
}

/// Pull a human-readable error out of a cart endpoint failure body.
/// The endpoint uses `message` for short errors and `description` for
/// longer ones.
pub fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    for key in ["message", "description"] {
        if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
            if !text.is_empty() {
                return Some(text.to_string());
            }
        }
    }
    None
}

/// Lifecycle of one add-to-cart control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonPhase {
    Idle,
    Loading,
    Success,
    Failed,
}

/// What the controller should do in response to a click.
#[derive(Debug, Clone, PartialEq)]
pub enum ClickAction {
    /// Control is mid-flight or showing an outcome; do nothing.
    Ignore,
    /// No usable variant id: surface the unavailable message, no request.
    RejectUnavailable,
    /// Issue exactly one request with this payload.
    Submit(CartAddPayload),
}

/// Explicit state for one add-to-cart interaction. The DOM is a projection
/// of this value, never the other way around.
#[derive(Debug, Clone, PartialEq)]
pub struct ButtonMachine {
    phase: ButtonPhase,
}

impl ButtonMachine {
    pub fn new() -> Self {
        ButtonMachine {
            phase: ButtonPhase::Idle,
        }
    }

    pub fn phase(&self) -> ButtonPhase {
        self.phase
    }

    /// Handle a click. Only an idle control reacts; a missing variant id
    /// fails immediately without entering the loading phase.
    pub fn on_click(&mut self, variant_id: Option<u64>, quantity: u32) -> ClickAction {
        if self.phase != ButtonPhase::Idle {
            return ClickAction::Ignore;
        }
        match variant_id {
            None => {
                self.phase = ButtonPhase::Failed;
                ClickAction::RejectUnavailable
            }
            Some(id) => {
                self.phase = ButtonPhase::Loading;
                ClickAction::Submit(CartAddPayload::single(id, quantity))
            }
        }
    }

    /// Record the outcome of the in-flight request.
    pub fn on_response(&mut self, ok: bool) {
        if self.phase == ButtonPhase::Loading {
            self.phase = if ok {
                ButtonPhase::Success
            } else {
                ButtonPhase::Failed
            };
        }
    }

    /// Delay before the control reverts to idle after a network outcome.
    /// The no-variant rejection path uses `REVERT_AFTER_UNAVAILABLE_MS`
    /// directly since it never reaches the endpoint.
    pub fn revert_delay_ms(&self) -> u32 {
        match self.phase {
            ButtonPhase::Failed => REVERT_AFTER_ERROR_MS,
            _ => REVERT_AFTER_SUCCESS_MS,
        }
    }

    pub fn reset(&mut self) {
        self.phase = ButtonPhase::Idle;
    }
}

impl Default for ButtonMachine {
    fn default() -> Self {
        Self::new()
    }
}

/// POST the payload to the cart endpoint. The caller drives the button
/// lifecycle around this single request.
pub async fn submit_cart_add(payload: &CartAddPayload) -> Result<(), CartAddFailure> {
    let response = gloo_net::http::Request::post(CART_ADD_PATH)
        .json(payload)
        .map_err(|e| {
            log::warn!("failed to encode cart payload: {e}");
            CartAddFailure::transport()
        })?
        .send()
        .await
        .map_err(|e| {
            log::warn!("cart request failed: {e}");
            CartAddFailure::transport()
        })?;

    if response.ok() {
        return Ok(());
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = extract_error_message(&body)
        .unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.to_string());
    log::warn!("cart endpoint returned {status}: {message}");
    Err(CartAddFailure {
        status: Some(status),
        message,
    })
}

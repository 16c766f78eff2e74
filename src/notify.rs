//! Transient toast notifications
//!
//! Toasts render into a lazily created, page-singleton host element so they
//! stack instead of overlapping. Each toast enters with a transition class,
//! stays visible for a fixed window, then gets a leaving class and is
//! removed once the exit window elapses. No queueing, no deduplication.

use gloo_timers::callback::Timeout;
use web_sys::{Document, Element};

pub const TOAST_VISIBLE_MS: u32 = 3_200;
pub const TOAST_EXIT_MS: u32 = 400;

/// Delay before the entrance class is applied, so the browser paints the
/// initial state first and the transition actually runs.
const TOAST_ENTER_DELAY_MS: u32 = 20;

const HOST_ID: &str = "products-notification-host";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

impl Severity {
    /// Suffix for the `notification-*` styling class.
    pub fn class_suffix(self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Error => "error",
        }
    }

    /// Errors interrupt screen readers; success messages do not.
    pub fn aria_role(self) -> &'static str {
        match self {
            Severity::Success => "status",
            Severity::Error => "alert",
        }
    }
}

fn notification_host(document: &Document) -> Option<Element> {
    if let Some(host) = document.get_element_by_id(HOST_ID) {
        return Some(host);
    }
    let host = document.create_element("div").ok()?;
    host.set_id(HOST_ID);
    host.set_class_name("notification-host");
    document.body()?.append_child(&host).ok()?;
    Some(host)
}

/// Show a self-dismissing toast. Best effort: if the document is not
/// available nothing happens.
pub fn show(message: &str, severity: Severity) {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    let Some(host) = notification_host(&document) else {
        log::warn!("could not create notification host");
        return;
    };
    let Ok(toast) = document.create_element("div") else {
        return;
    };
    toast.set_class_name(&format!(
        "notification notification-{}",
        severity.class_suffix()
    ));
    let _ = toast.set_attribute("role", severity.aria_role());
    toast.set_text_content(Some(message));
    if host.append_child(&toast).is_err() {
        return;
    }

    let entering = toast.clone();
    Timeout::new(TOAST_ENTER_DELAY_MS, move || {
        let _ = entering.class_list().add_1("is-visible");
    })
    .forget();

    let leaving = toast.clone();
    Timeout::new(TOAST_VISIBLE_MS, move || {
        let _ = leaving.class_list().remove_1("is-visible");
        let _ = leaving.class_list().add_1("is-leaving");
    })
    .forget();

    Timeout::new(TOAST_VISIBLE_MS + TOAST_EXIT_MS, move || {
        toast.remove();
    })
    .forget();
}

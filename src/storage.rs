//! Wishlist persistence in browser localStorage
//!
//! One fixed key holds the whole wishlist as a JSON string array, rewritten
//! wholesale on every mutation. Absent or malformed data reads back as an
//! empty wishlist; write failures are logged and dropped. Last write wins
//! across tabs.

use crate::wishlist::Wishlist;
use web_sys::Storage;

pub const WISHLIST_KEY: &str = "shopify-wishlist";

fn local_storage() -> Option<Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

/// Decode a raw stored value, recovering to an empty wishlist on bad data.
pub fn decode_stored(raw: Option<&str>) -> Wishlist {
    match raw {
        None => Wishlist::new(),
        Some(text) => match Wishlist::decode(text) {
            Ok(wishlist) => wishlist,
            Err(e) => {
                log::warn!("discarding malformed wishlist data: {e}");
                Wishlist::new()
            }
        },
    }
}

/// Read the wishlist from localStorage.
pub fn load_wishlist() -> Wishlist {
    let raw = local_storage().and_then(|s| s.get_item(WISHLIST_KEY).ok().flatten());
    decode_stored(raw.as_deref())
}

/// Overwrite the stored wishlist. Failures leave the previous value in place.
pub fn save_wishlist(wishlist: &Wishlist) {
    let Some(storage) = local_storage() else {
        log::warn!("localStorage unavailable, wishlist not persisted");
        return;
    };
    let raw = match wishlist.encode() {
        Ok(raw) => raw,
        Err(e) => {
            log::warn!("failed to encode wishlist: {e}");
            return;
        }
    };
    if storage.set_item(WISHLIST_KEY, &raw).is_err() {
        log::warn!("failed to write wishlist to localStorage");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_stored_absent_is_empty() {
        let wishlist = decode_stored(None);

        assert!(wishlist.is_empty());
    }

    #[test]
    fn test_decode_stored_malformed_is_empty() {
        assert!(decode_stored(Some("{{{")).is_empty());
        assert!(decode_stored(Some(r#"{"not":"an array"}"#)).is_empty());
        assert!(decode_stored(Some("[7,9]")).is_empty());
    }

    #[test]
    fn test_decode_stored_valid_array() {
        let wishlist = decode_stored(Some(r#"["7","9"]"#));

        assert!(wishlist.contains("7"));
        assert!(wishlist.contains("9"));
        assert_eq!(wishlist.len(), 2);
    }
}

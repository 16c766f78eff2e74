/// The persisted wishlist: product identifiers in insertion order, never
/// containing duplicates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Wishlist {
    ids: Vec<String>,
}

impl Wishlist {
    pub fn new() -> Self {
        Wishlist { ids: Vec::new() }
    }

    pub fn from_ids(ids: Vec<String>) -> Self {
        Wishlist { ids }
    }

    pub fn contains(&self, product_id: &str) -> bool {
        self.ids.iter().any(|id| id == product_id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Append `product_id` if it is not already present.
    /// Returns true if the list changed.
    pub fn add(&mut self, product_id: &str) -> bool {
        if self.contains(product_id) {
            return false;
        }
        self.ids.push(product_id.to_string());
        true
    }

    /// Remove every occurrence of `product_id` (stored data written by older
    /// revisions may contain duplicates). Returns true if the list changed.
    pub fn remove(&mut self, product_id: &str) -> bool {
        let original_len = self.ids.len();
        self.ids.retain(|id| id != product_id);
        self.ids.len() < original_len
    }

    /// Flip membership of `product_id`. Returns true if the id is present
    /// after the toggle.
    pub fn toggle(&mut self, product_id: &str) -> bool {
        if self.contains(product_id) {
            self.remove(product_id);
            false
        } else {
            self.add(product_id);
            true
        }
    }

    /// Decode the stored JSON string array.
    pub fn decode(raw: &str) -> Result<Self, serde_json::Error> {
        let ids: Vec<String> = serde_json::from_str(raw)?;
        Ok(Wishlist { ids })
    }

    /// Encode as a JSON string array, the whole-array overwrite format.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.ids)
    }
}

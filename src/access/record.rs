//! Record Trait
//!
//! What the data layer needs to know about an item in a collection.

use serde::de::DeserializeOwned;
use serde::Serialize;

/// An item stored in a named collection.
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Backend collection name; also the prefix of every cache key for it.
    const COLLECTION: &'static str;

    /// Primary key. Two records with equal ids are the same record.
    fn id(&self) -> &str;

    /// Fields consulted by search.
    fn search_fields(&self) -> Vec<&str>;

    /// Case-insensitive substring match on any search field.
    ///
    /// `needle` must already be lowercased.
    fn matches(&self, needle: &str) -> bool {
        self.search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

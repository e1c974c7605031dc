//! Cache Module
//!
//! The cache facade: namespaced keys, JSON values and TTLs on top of a
//! `KeyValueStore`.

mod facade;


pub use facade::Cache;

// == Key Namespacing ==
/// Separator between the configured prefix and the logical key
pub const KEY_SEPARATOR: char = ':';

/// Joins `prefix` and `key` into the key sent to the store.
pub fn key_with_prefix(prefix: &str, key: &str) -> String {
    format!("{}{}{}", prefix, KEY_SEPARATOR, key)
}

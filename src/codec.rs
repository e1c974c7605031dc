//! Value Codec Module
//!
//! JSON helpers used by the cache facade to turn values into stored text
//! and back.

use serde::de::IgnoredAny;
use serde::Serialize;
use serde_json::Value;

use crate::error::{CacheError, Result};

/// Serializes a value to its JSON text.
///
/// Fails with `CacheError::Encode` for values JSON cannot represent, such as
/// maps keyed by non-string types.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(CacheError::Encode)
}

/// Returns true if `text` is a single well-formed JSON document.
///
/// Scalars count: `"\"abc\""`, `"1.5"`, `"true"` and `"null"` all pass.
pub fn is_json(text: &str) -> bool {
    serde_json::from_str::<IgnoredAny>(text).is_ok()
}

/// Parses JSON text into a `serde_json::Value`.
pub fn to_value(text: &str) -> Result<Value> {
    serde_json::from_str(text).map_err(CacheError::Decode)
}

/// Decodes stored text, returning it verbatim when it is not JSON.
///
/// Text written by other clients, or plain strings, come back as
/// `Value::String` unchanged.
pub fn decode(text: String) -> Result<Value> {
    if is_json(&text) {
        to_value(&text)
    } else {
        Ok(Value::String(text))
    }
}

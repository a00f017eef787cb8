//! Opaque string encoding for compound cache values
//!
//! Values are JSON-encoded, then base64-encoded, so the cache stays a flat
//! `string -> string` map. Empty values encode to the empty string.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

/// Encode a value for storage in the cache
pub fn serialize<T: Serialize + ?Sized>(value: &T) -> String {
    let json = match serde_json::to_string(value) {
        Ok(json) => json,
        Err(e) => {
            debug!("cache serialize failed: {}", e);
            return String::new();
        }
    };

    if matches!(json.as_str(), "null" | "[]" | "{}" | "\"\"") {
        return String::new();
    }

    STANDARD.encode(json)
}

/// Decode a cached value into `out`.
///
/// An empty string or undecodable data leaves `out` untouched.
pub fn deserialize<T: DeserializeOwned>(data: &str, out: &mut T) {
    if data.is_empty() {
        return;
    }

    let bytes = match STANDARD.decode(data.as_bytes()) {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!("cache value is not base64: {}", e);
            return;
        }
    };

    match serde_json::from_slice(&bytes) {
        Ok(value) => *out = value,
        Err(e) => debug!("cache value is not valid JSON: {}", e),
    }
}

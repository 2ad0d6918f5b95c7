//! Query-string decoding.

use std::collections::HashMap;
use tracing::debug;

/// Decodes a raw query string into a key/value map using form-encoding
/// rules: pairs split on `&`, key and value on the first `=`, `+` decodes to
/// a space, and both sides are percent-decoded. A key without `=` maps to an
/// empty string value.
///
/// Decoding never fails the request: undecodable input yields an empty map.
pub fn decode_query(raw: &str) -> HashMap<String, String> {
    if raw.is_empty() {
        return HashMap::new();
    }

    match serde_urlencoded::from_str(raw) {
        Ok(query) => query,
        Err(e) => {
            debug!("undecodable query string {raw:?}: {e}");
            HashMap::new()
        }
    }
}

//! Request DTOs for the cache HTTP adapter
//!
//! Defines the query parameters accepted by the endpoints.

use serde::Deserialize;

/// Query string of `POST /cache/:key`
///
/// # Fields
/// - `value`: The value to store
/// - `ttl`: TTL in milliseconds, `0` or less never expires (default: 0)
#[derive(Debug, Clone, Deserialize)]
pub struct PutParams {
    pub value: String,
    #[serde(default)]
    pub ttl: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_params_default_ttl() {
        let params: PutParams = serde_json::from_str(r#"{"value": "hello"}"#).unwrap();
        assert_eq!(params.value, "hello");
        assert_eq!(params.ttl, 0);
    }

    #[test]
    fn test_put_params_with_ttl() {
        let params: PutParams = serde_json::from_str(r#"{"value": "v", "ttl": 3000}"#).unwrap();
        assert_eq!(params.ttl, 3000);
    }
}

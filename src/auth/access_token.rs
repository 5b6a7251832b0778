//! Self-contained, expiring access tokens
//!
//! A token is the standard base64 encoding of the compact JSON object
//! `{"ttl":<seconds>,"address":"0x..","signature":"0x.."}`. Everything needed to
//! check it is inside the string, so validation is a pure function of the token
//! and the current time.

use crate::error::{Result, SwapRateError};
use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Decoded access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccessToken {
    /// Expiry, seconds since epoch
    pub ttl: i64,
    /// Address the token was issued to
    pub address: String,
    /// Signature of the login data
    pub signature: String,
}

impl AccessToken {
    /// Create a new token
    pub fn new(ttl: i64, address: impl Into<String>, signature: impl Into<String>) -> Self {
        Self {
            ttl,
            address: address.into(),
            signature: signature.into(),
        }
    }

    /// Serialize into the opaque string form passed to the API
    pub fn encode(&self) -> Result<String> {
        // Field order is part of the format: ttl, address, signature.
        let json = serde_json::to_vec(self)?;
        Ok(STANDARD.encode(json))
    }

    /// Parse the opaque string form
    pub fn decode(serialized: &str) -> Result<Self> {
        let bytes = STANDARD
            .decode(serialized)
            .map_err(|e| SwapRateError::malformed_credential(format!("not base64: {}", e)))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| SwapRateError::malformed_credential(format!("invalid payload: {}", e)))
    }

    /// Whether the token is still usable at `now` (seconds since epoch)
    pub fn is_live(&self, now: i64) -> bool {
        self.ttl >= now
    }

    /// Expiry as a timestamp
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.ttl, 0)
    }
}

/// Current unix time in whole seconds, truncated down
pub fn now_secs() -> i64 {
    Utc::now().timestamp()
}

/// Validate a serialized token for an authenticated operation.
///
/// Returns the input string unchanged so it can be forwarded as the bearer
/// token or `accessToken` param.
pub fn require(serialized: Option<&str>, now: i64) -> Result<&str> {
    let serialized = match serialized {
        Some(token) if !token.is_empty() => token,
        _ => return Err(SwapRateError::Unauthenticated),
    };

    let token = AccessToken::decode(serialized)?;
    if !token.is_live(now) {
        return Err(SwapRateError::Expired {
            ttl: token.ttl,
            now,
        });
    }

    Ok(serialized)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIGNATURE: &str = "0x7f1774733457c25ddf2fbafa94ad89bf7eb539c060181bc549de85b68ffdd6f620858cc0365e4da7b8e37a1e88f0a8bea48ec6d53f984e052c51d966152989d11c";

    fn encoded(ttl: i64) -> String {
        AccessToken::new(ttl, "0xABC", "0xdef").encode().unwrap()
    }

    #[test]
    fn test_encode_is_deterministic() {
        let token = AccessToken::new(13371488, "0xABC", "0xdef");
        assert_eq!(
            token.encode().unwrap(),
            "eyJ0dGwiOjEzMzcxNDg4LCJhZGRyZXNzIjoiMHhBQkMiLCJzaWduYXR1cmUiOiIweGRlZiJ9"
        );
    }

    #[test]
    fn test_encode_matches_reference_token() {
        let token = AccessToken::new(
            13371488,
            "0x81eE6Dc96aA1d28F5017b8e84D7f7EB3E811120B",
            SIGNATURE,
        );
        assert_eq!(
            token.encode().unwrap(),
            "eyJ0dGwiOjEzMzcxNDg4LCJhZGRyZXNzIjoiMHg4MWVFNkRjOTZhQTFkMjhGNTAxN2I4ZTg0RDdmN0VCM0U4MTExMjBCIiwic2lnbmF0dXJlIjoiMHg3ZjE3NzQ3MzM0NTdjMjVkZGYyZmJhZmE5NGFkODliZjdlYjUzOWMwNjAxODFiYzU0OWRlODViNjhmZmRkNmY2MjA4NThjYzAzNjVlNGRhN2I4ZTM3YTFlODhmMGE4YmVhNDhlYzZkNTNmOTg0ZTA1MmM1MWQ5NjYxNTI5ODlkMTFjIn0="
        );
    }

    #[test]
    fn test_decode_round_trip() {
        let decoded = AccessToken::decode(&encoded(13371488)).unwrap();
        assert_eq!(decoded, AccessToken::new(13371488, "0xABC", "0xdef"));
    }

    #[test]
    fn test_decode_is_key_order_independent() {
        let json = r#"{"signature":"0xdef","address":"0xABC","ttl":13371488}"#;
        let decoded = AccessToken::decode(&STANDARD.encode(json)).unwrap();
        assert_eq!(decoded, AccessToken::new(13371488, "0xABC", "0xdef"));
    }

    #[test]
    fn test_decode_rejects_bad_base64() {
        let err = AccessToken::decode("not-base64!").unwrap_err();
        assert!(matches!(err, SwapRateError::MalformedCredential(_)));

        let err = AccessToken::decode("Incorrect Access Token").unwrap_err();
        assert!(matches!(err, SwapRateError::MalformedCredential(_)));
    }

    #[test]
    fn test_decode_rejects_bad_json() {
        let err = AccessToken::decode(&STANDARD.encode("not json")).unwrap_err();
        assert!(matches!(err, SwapRateError::MalformedCredential(_)));
    }

    #[test]
    fn test_decode_rejects_wrong_fields() {
        let missing = STANDARD.encode(r#"{"ttl":1,"address":"0xABC"}"#);
        assert!(matches!(
            AccessToken::decode(&missing),
            Err(SwapRateError::MalformedCredential(_))
        ));

        let extra = STANDARD.encode(r#"{"ttl":1,"address":"0xABC","signature":"0x","role":"admin"}"#);
        assert!(matches!(
            AccessToken::decode(&extra),
            Err(SwapRateError::MalformedCredential(_))
        ));

        let wrong_type = STANDARD.encode(r#"{"ttl":"1","address":"0xABC","signature":"0x"}"#);
        assert!(matches!(
            AccessToken::decode(&wrong_type),
            Err(SwapRateError::MalformedCredential(_))
        ));
    }

    #[test]
    fn test_is_live_boundary() {
        let token = AccessToken::new(100, "0xABC", "0xdef");
        assert!(token.is_live(99));
        assert!(token.is_live(100));
        assert!(!token.is_live(101));
    }

    #[test]
    fn test_expires_at() {
        let token = AccessToken::new(0, "0xABC", "0xdef");
        assert_eq!(token.expires_at().unwrap().timestamp(), 0);
    }

    #[test]
    fn test_require_missing_token() {
        assert!(matches!(require(None, 0), Err(SwapRateError::Unauthenticated)));
        assert!(matches!(
            require(Some(""), 0),
            Err(SwapRateError::Unauthenticated)
        ));
    }

    #[test]
    fn test_require_malformed_token() {
        assert!(matches!(
            require(Some("not-base64!"), 0),
            Err(SwapRateError::MalformedCredential(_))
        ));
    }

    #[test]
    fn test_require_expired_token() {
        let token = encoded(100);
        match require(Some(&token), 101) {
            Err(SwapRateError::Expired { ttl, now }) => {
                assert_eq!(ttl, 100);
                assert_eq!(now, 101);
            }
            other => panic!("expected Expired, got {:?}", other),
        }
    }

    #[test]
    fn test_require_live_token_returns_input() {
        let token = encoded(100);
        assert_eq!(require(Some(&token), 100).unwrap(), token);
        assert_eq!(require(Some(&token), 0).unwrap(), token);
    }

    #[test]
    fn test_now_secs_is_recent() {
        // 2020-01-01
        assert!(now_secs() > 1_577_836_800);
    }
}

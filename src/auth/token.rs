// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Bearer token inspection
//!
//! The client never verifies signatures. It only checks that the token has
//! the `header.payload.signature` shape (the signature may be empty), that
//! the payload decodes to JSON, and that a numeric `exp`, if present, has
//! not passed.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, TimeZone, Utc};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref SEGMENT: Regex = Regex::new(r"^[A-Za-z0-9_-]*$").unwrap();
}

/// Result of inspecting a token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenStatus {
    /// Well-formed and not known to be expired
    Valid { expires_at: Option<DateTime<Utc>> },
    /// Fails the structural check
    Malformed(String),
    /// Embedded expiry is in the past
    Expired { expired_at: DateTime<Utc> },
}

impl TokenStatus {
    /// Whether the token may be used
    pub fn is_valid(&self) -> bool {
        matches!(self, TokenStatus::Valid { .. })
    }

    /// Why the token was rejected
    pub fn invalid_reason(&self) -> Option<String> {
        match self {
            TokenStatus::Valid { .. } => None,
            TokenStatus::Malformed(reason) => Some(reason.clone()),
            TokenStatus::Expired { expired_at } => {
                Some(format!("token expired at {}", expired_at.to_rfc3339()))
            }
        }
    }
}

/// Inspect a token against the current time
pub fn inspect_token(token: &str) -> TokenStatus {
    inspect_token_at(token, Utc::now())
}

/// Inspect a token against `now`
pub fn inspect_token_at(token: &str, now: DateTime<Utc>) -> TokenStatus {
    let segments: Vec<&str> = token.trim().split('.').collect();
    if segments.len() != 3 {
        return TokenStatus::Malformed(format!(
            "expected 3 segments, found {}",
            segments.len()
        ));
    }
    // Header and payload must be non-empty; the signature may be empty
    let bad = segments
        .iter()
        .enumerate()
        .position(|(i, s)| !SEGMENT.is_match(s) || (i < 2 && s.is_empty()));
    if let Some(pos) = bad {
        return TokenStatus::Malformed(format!("segment {} is not base64url", pos + 1));
    }

    let Some(claims) = decode_claims(segments[1]) else {
        return TokenStatus::Malformed("payload is not base64url JSON".to_string());
    };

    match expiry_claim(&claims) {
        Some(expiry) if expiry <= now => TokenStatus::Expired { expired_at: expiry },
        expiry => TokenStatus::Valid { expires_at: expiry },
    }
}

fn decode_claims(payload: &str) -> Option<serde_json::Value> {
    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Numeric `exp` claim as a timestamp
fn expiry_claim(claims: &serde_json::Value) -> Option<DateTime<Utc>> {
    let exp = claims.get("exp")?.as_f64()?;
    if !exp.is_finite() {
        return None;
    }
    Utc.timestamp_opt(exp.floor() as i64, 0).single()
}

/// Build a structurally valid, unsigned token carrying `claims`
///
/// For fixtures and offline use; the server will reject it.
pub fn unsigned_token(claims: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{}.{}.sig", header, payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    #[test]
    fn test_future_expiry_is_valid() {
        let now = Utc::now();
        let token = unsigned_token(&json!({ "user_id": 1, "exp": (now + Duration::hours(1)).timestamp() }));

        let status = inspect_token_at(&token, now);
        assert!(status.is_valid());
        assert!(matches!(status, TokenStatus::Valid { expires_at: Some(_) }));
    }

    #[test]
    fn test_past_expiry_is_expired() {
        let now = Utc::now();
        let token = unsigned_token(&json!({ "exp": (now - Duration::seconds(5)).timestamp() }));

        let status = inspect_token_at(&token, now);
        assert!(matches!(status, TokenStatus::Expired { .. }));
        assert!(status.invalid_reason().unwrap().contains("expired"));
    }

    #[test]
    fn test_wrong_segment_count_is_malformed() {
        for token in ["", "abc", "a.b", "a.b.c.d", "valid_token"] {
            assert!(
                matches!(inspect_token(token), TokenStatus::Malformed(_)),
                "{:?} should be malformed",
                token
            );
        }
    }

    #[test]
    fn test_bad_alphabet_is_malformed() {
        assert!(matches!(inspect_token("a.b c.d"), TokenStatus::Malformed(_)));
        assert!(matches!(inspect_token("a..c"), TokenStatus::Malformed(_)));
        assert!(matches!(inspect_token("a.b+/.c"), TokenStatus::Malformed(_)));
    }

    #[test]
    fn test_undecodable_payload_is_malformed() {
        // Right alphabet, but "def" is not valid base64 of JSON
        assert!(matches!(inspect_token("abc.def.ghi"), TokenStatus::Malformed(_)));

        let not_json = URL_SAFE_NO_PAD.encode(b"plain text");
        let token = format!("aGVhZGVy.{}.c2ln", not_json);
        let status = inspect_token(&token);
        assert!(!status.is_valid());
        assert!(status.invalid_reason().unwrap().contains("payload"));
    }

    #[test]
    fn test_json_payload_without_expiry_is_valid() {
        let no_exp = unsigned_token(&json!({ "sub": "42" }));
        assert_eq!(inspect_token(&no_exp), TokenStatus::Valid { expires_at: None });

        let string_exp = unsigned_token(&json!({ "exp": "tomorrow" }));
        assert_eq!(inspect_token(&string_exp), TokenStatus::Valid { expires_at: None });
    }

    #[test]
    fn test_empty_signature_is_accepted() {
        let now = Utc::now();
        let live = unsigned_token(&json!({ "exp": (now + Duration::hours(1)).timestamp() }));
        let (head, _) = live.rsplit_once('.').unwrap();
        let token = format!("{}.", head);

        assert!(inspect_token_at(&token, now).is_valid());
    }

    #[test]
    fn test_padded_segment_is_malformed() {
        let payload = base64::engine::general_purpose::URL_SAFE.encode(b"{\"exp\":10}");
        assert!(payload.ends_with('='));
        let token = format!("aGVhZGVy.{}.c2ln", payload);
        assert!(matches!(inspect_token(&token), TokenStatus::Malformed(_)));
    }
}

//! # Credential Extraction
//!
//! Locates the caller's API key on an inbound request.
//!
//! Carriers are checked in a fixed order and the first one that yields a
//! non-empty token wins:
//!
//! 1. `Authorization: Bearer <token>` (prefix matched case-sensitively)
//! 2. `X-Api-Key: <token>`
//!
//! The header source is abstracted as a lookup closure so this module stays
//! independent of any HTTP library.

use crate::error::CredentialError;
use std::fmt;

/// Header carrying `Bearer <token>`.
pub const AUTHORIZATION_HEADER: &str = "authorization";

/// Header carrying the raw API key.
pub const API_KEY_HEADER: &str = "x-api-key";

const BEARER_PREFIX: &str = "Bearer ";

/// Ordered extraction strategies: `(header name, extractor)`.
const CARRIERS: [(&str, fn(&str) -> Option<&str>); 2] = [
    (AUTHORIZATION_HEADER, from_bearer),
    (API_KEY_HEADER, from_raw),
];

// =============================================================================
// CREDENTIAL
// =============================================================================

/// Opaque caller credential, scoped to one tool invocation.
///
/// `Debug` and `Display` only ever render a masked form.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a token. Empty tokens are rejected.
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.is_empty() {
            None
        } else {
            Some(Self(token))
        }
    }

    /// The raw token, for building the outbound header only.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Masked form safe for logs: first and last four characters for
    /// tokens longer than 12 characters, `***` otherwise.
    pub fn masked(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= 12 {
            return "***".to_string();
        }
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Credential").field(&self.masked()).finish()
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.masked())
    }
}

// =============================================================================
// EXTRACTION
// =============================================================================

fn from_bearer(value: &str) -> Option<&str> {
    value.strip_prefix(BEARER_PREFIX)
}

fn from_raw(value: &str) -> Option<&str> {
    Some(value)
}

/// Extract the credential from an inbound request's headers.
///
/// `lookup` receives a lowercase header name and returns its value, if any.
/// Returns the winning carrier name alongside the credential.
pub fn extract_credential<'a, F>(lookup: F) -> Result<(Credential, &'static str), CredentialError>
where
    F: Fn(&str) -> Option<&'a str>,
{
    CARRIERS
        .iter()
        .find_map(|(header, extract)| {
            lookup(header)
                .and_then(extract)
                .and_then(Credential::new)
                .map(|credential| (credential, *header))
        })
        .ok_or(CredentialError::Missing)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn headers(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn extract(map: &BTreeMap<String, String>) -> Result<(Credential, &'static str), CredentialError> {
        extract_credential(|name| map.get(name).map(String::as_str))
    }

    #[test]
    fn bearer_prefix_is_stripped() {
        let map = headers(&[("authorization", "Bearer abc123")]);
        let (credential, carrier) = extract(&map).expect("credential");
        assert_eq!(credential.expose(), "abc123");
        assert_eq!(carrier, AUTHORIZATION_HEADER);
    }

    #[test]
    fn bearer_wins_over_api_key() {
        let map = headers(&[("authorization", "Bearer first"), ("x-api-key", "second")]);
        let (credential, _) = extract(&map).expect("credential");
        assert_eq!(credential.expose(), "first");
    }

    #[test]
    fn api_key_used_verbatim() {
        let map = headers(&[("x-api-key", "  spaced key ")]);
        let (credential, carrier) = extract(&map).expect("credential");
        assert_eq!(credential.expose(), "  spaced key ");
        assert_eq!(carrier, API_KEY_HEADER);
    }

    #[test]
    fn lowercase_bearer_is_not_a_bearer_token() {
        let map = headers(&[("authorization", "bearer abc123")]);
        assert_eq!(extract(&map).map(|_| ()), Err(CredentialError::Missing));
    }

    #[test]
    fn authorization_without_bearer_falls_back_to_api_key() {
        let map = headers(&[("authorization", "Basic Zm9vOmJhcg=="), ("x-api-key", "fallback")]);
        let (credential, carrier) = extract(&map).expect("credential");
        assert_eq!(credential.expose(), "fallback");
        assert_eq!(carrier, API_KEY_HEADER);
    }

    #[test]
    fn empty_bearer_token_is_absent() {
        let map = headers(&[("authorization", "Bearer ")]);
        assert_eq!(extract(&map).map(|_| ()), Err(CredentialError::Missing));
    }

    #[test]
    fn no_headers_is_missing() {
        let map = headers(&[]);
        assert_eq!(extract(&map).map(|_| ()), Err(CredentialError::Missing));
    }

    #[test]
    fn short_tokens_mask_completely() {
        let credential = Credential::new("abc123").expect("non-empty");
        assert_eq!(credential.masked(), "***");
        assert_eq!(format!("{credential:?}"), "Credential(\"***\")");
    }

    #[test]
    fn long_tokens_keep_head_and_tail() {
        let credential = Credential::new("test-api-key-12345").expect("non-empty");
        assert_eq!(credential.to_string(), "test...2345");
    }
}

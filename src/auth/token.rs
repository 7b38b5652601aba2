use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::storage::Role;

/// Claims embedded in a session token.
///
/// Deliberately minimal: account id, role, issue and expiry instants.
/// Anything else (display name, clinic data) is looked up per request so a
/// stale token cannot carry outdated account state. A role change therefore
/// requires a fresh login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Account identifier
    pub sub: Uuid,
    /// Role at time of issuance
    pub role: Role,
    /// Issued-at (unix seconds)
    pub iat: i64,
    /// Expiry (unix seconds)
    pub exp: i64,
}

/// Signs and verifies session tokens (HS256, symmetric server-side key).
///
/// Decoding fails closed: tampered signature, expired timestamp, malformed
/// structure and absent input all come back as `None`. Verification is a
/// pure computation, so one codec is shared by every concurrent request.
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_seconds: i64,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(secret: &str, ttl_seconds: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // No clock leeway: a token one second past its expiry is invalid.
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_seconds,
            validation,
        }
    }

    /// Token time-to-live in seconds
    pub fn ttl_seconds(&self) -> i64 {
        self.ttl_seconds
    }

    /// Mint a signed token for an account
    pub fn encode(&self, account_id: Uuid, role: Role) -> Result<String, TokenError> {
        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            sub: account_id,
            role,
            iat: now,
            exp: now + self.ttl_seconds,
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(TokenError::Signing)
    }

    /// Verify a token and return its claims, or `None` for anything that
    /// does not verify.
    ///
    /// An absent token is the routine unauthenticated case and is not
    /// logged; a non-empty token that fails verification is logged for
    /// audit since it means tampering, expiry or a key mismatch.
    pub fn decode(&self, token: &str) -> Option<SessionClaims> {
        if token.is_empty() {
            return None;
        }

        match jsonwebtoken::decode::<SessionClaims>(token, &self.decoding, &self.validation) {
            Ok(data) => Some(data.claims),
            Err(e) => {
                warn!("Rejected session token: {}", e);
                None
            }
        }
    }
}

/// Token errors
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Token signing failed: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret-key-0123456789abcdef";

    fn codec() -> TokenCodec {
        TokenCodec::new(SECRET, 3600)
    }

    fn mutate_segment(token: &str, segment: usize) -> String {
        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        let target = &mut parts[segment];
        let flipped = if target.starts_with('A') { "B" } else { "A" };
        target.replace_range(0..1, flipped);
        parts.join(".")
    }

    #[test]
    fn test_round_trip() {
        let codec = codec();
        let id = Uuid::new_v4();

        let token = codec.encode(id, Role::Dentist).unwrap();
        let claims = codec.decode(&token).unwrap();

        assert_eq!(claims.sub, id);
        assert_eq!(claims.role, Role::Dentist);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_absent_token_is_invalid() {
        assert!(codec().decode("").is_none());
    }

    #[test]
    fn test_garbage_token_is_invalid() {
        assert!(codec().decode("not.a.token").is_none());
        assert!(codec().decode("xxxx").is_none());
    }

    #[test]
    fn test_expired_token_is_invalid() {
        let expired = TokenCodec::new(SECRET, -60);
        let token = expired.encode(Uuid::new_v4(), Role::Patient).unwrap();

        // Signature is fine, expiry is in the past
        assert!(expired.decode(&token).is_none());
        assert!(codec().decode(&token).is_none());
    }

    #[test]
    fn test_tampered_payload_is_invalid() {
        let codec = codec();
        let token = codec.encode(Uuid::new_v4(), Role::Patient).unwrap();

        let tampered = mutate_segment(&token, 1);
        assert!(codec.decode(&tampered).is_none());
    }

    #[test]
    fn test_tampered_signature_is_invalid() {
        let codec = codec();
        let token = codec.encode(Uuid::new_v4(), Role::Assistant).unwrap();

        let tampered = mutate_segment(&token, 2);
        assert!(codec.decode(&tampered).is_none());
    }

    #[test]
    fn test_wrong_key_is_invalid() {
        let token = codec().encode(Uuid::new_v4(), Role::Dentist).unwrap();

        let other = TokenCodec::new("a-completely-different-secret-key!!", 3600);
        assert!(other.decode(&token).is_none());
    }
}

//! JWT access tokens (HS256).
//!
//! Tokens are the standard three-part compact form:
//! `base64url(header).base64url(claims).base64url(hmac-sha256)`. Only HS256
//! is accepted; the verifier recomputes the signature over the received
//! header and payload and compares in constant time before trusting any
//! claim.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use delivery_core::{RestaurantId, UserId, UserRole};

use super::AuthError;
use crate::models::User;

type HmacSha256 = Hmac<Sha256>;

/// Fixed JOSE header for every token this service mints.
const HEADER_B64: &str = {
    // base64url({"alg":"HS256","typ":"JWT"}), precomputed
    "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9"
};

/// Claims carried by an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: UserId,
    /// Login email.
    pub email: String,
    /// Authorization role.
    pub role: UserRole,
    /// Linked restaurant for RESTAURANTE accounts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant_id: Option<RestaurantId>,
    /// Issued-at, unix seconds.
    pub iat: i64,
    /// Expiry, unix seconds.
    pub exp: i64,
}

/// Signs and verifies access tokens with a shared HS256 secret.
#[derive(Clone)]
pub struct TokenSigner {
    key: Vec<u8>,
    ttl_secs: i64,
}

impl TokenSigner {
    /// Create a signer from the configured secret and token lifetime.
    #[must_use]
    pub fn new(secret: &SecretString, ttl_secs: i64) -> Self {
        Self {
            key: secret.expose_secret().as_bytes().to_vec(),
            ttl_secs,
        }
    }

    /// Mint a token for an authenticated user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenEncoding` if claim serialization fails.
    pub fn sign(&self, user: &User) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user.id,
            email: user.email.to_string(),
            role: user.role,
            restaurant_id: user.restaurant_id,
            iat: now,
            exp: now + self.ttl_secs,
        };
        self.sign_claims(&claims)
    }

    fn sign_claims(&self, claims: &Claims) -> Result<String, AuthError> {
        let payload = serde_json::to_vec(claims).map_err(|_| AuthError::TokenEncoding)?;
        let payload_b64 = URL_SAFE_NO_PAD.encode(payload);
        let signing_input = format!("{HEADER_B64}.{payload_b64}");
        let signature = self.mac()?.chain_update(signing_input.as_bytes()).finalize();
        let signature_b64 = URL_SAFE_NO_PAD.encode(signature.into_bytes());
        Ok(format!("{signing_input}.{signature_b64}"))
    }

    /// Verify a token and return its claims.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` for malformed or mis-signed tokens
    /// and `AuthError::TokenExpired` once `exp` has passed.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let mut parts = token.split('.');
        let (header, payload, signature) = match (parts.next(), parts.next(), parts.next()) {
            (Some(h), Some(p), Some(s)) if parts.next().is_none() => (h, p, s),
            _ => return Err(AuthError::InvalidToken),
        };

        // Reject any header other than our own HS256 one outright.
        if header != HEADER_B64 {
            return Err(AuthError::InvalidToken);
        }

        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| AuthError::InvalidToken)?;
        let signing_input = format!("{header}.{payload}");
        self.mac()?
            .chain_update(signing_input.as_bytes())
            .verify_slice(&signature)
            .map_err(|_| AuthError::InvalidToken)?;

        let payload = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| AuthError::InvalidToken)?;
        let claims: Claims =
            serde_json::from_slice(&payload).map_err(|_| AuthError::InvalidToken)?;

        if claims.exp <= Utc::now().timestamp() {
            return Err(AuthError::TokenExpired);
        }

        Ok(claims)
    }

    fn mac(&self) -> Result<HmacSha256, AuthError> {
        // HMAC accepts keys of any length; this only fails on a broken build.
        HmacSha256::new_from_slice(&self.key).map_err(|_| AuthError::TokenEncoding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use delivery_core::Email;

    fn signer() -> TokenSigner {
        TokenSigner::new(&SecretString::from("a-test-secret-of-sufficient-length"), 3600)
    }

    fn user(role: UserRole) -> User {
        User {
            id: UserId::new(7),
            email: Email::parse("user@example.com").unwrap(),
            password_hash: "unused".to_owned(),
            name: "User".to_owned(),
            role,
            active: true,
            restaurant_id: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn sign_then_verify_round_trips_claims() {
        let signer = signer();
        let token = signer.sign(&user(UserRole::Cliente)).unwrap();
        let claims = signer.verify(&token).unwrap();

        assert_eq!(claims.sub, UserId::new(7));
        assert_eq!(claims.email, "user@example.com");
        assert_eq!(claims.role, UserRole::Cliente);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let signer = signer();
        let token = signer.sign(&user(UserRole::Cliente)).unwrap();

        let mut parts: Vec<&str> = token.split('.').collect();
        let forged = URL_SAFE_NO_PAD.encode(
            br#"{"sub":1,"email":"admin@example.com","role":"ADMIN","iat":0,"exp":9999999999}"#,
        );
        parts[1] = &forged;
        let forged_token = parts.join(".");

        assert!(matches!(
            signer.verify(&forged_token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn wrong_key_is_rejected() {
        let token = signer().sign(&user(UserRole::Admin)).unwrap();
        let other = TokenSigner::new(&SecretString::from("another-secret-another-secret!!"), 3600);
        assert!(matches!(other.verify(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn expired_token_is_rejected() {
        let signer = TokenSigner::new(
            &SecretString::from("a-test-secret-of-sufficient-length"),
            -10,
        );
        let token = signer.sign(&user(UserRole::Cliente)).unwrap();
        assert!(matches!(signer.verify(&token), Err(AuthError::TokenExpired)));
    }

    #[test]
    fn garbage_is_rejected() {
        let signer = signer();
        for bad in ["", "abc", "a.b", "a.b.c.d", "ey.ey.ey"] {
            assert!(signer.verify(bad).is_err(), "accepted {bad:?}");
        }
    }
}

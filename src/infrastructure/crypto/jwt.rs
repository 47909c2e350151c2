//! JWT credential handling
//!
//! Credentials are HS256 tokens whose subject is the user id. This service
//! only verifies them; `create_token` exists for the issuing collaborator
//! and for tests.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens
    pub secret: String,
    /// Token lifetime used by `create_token`
    pub expiration_hours: i64,
    /// Issuer claim, checked on verification
    pub issuer: String,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("expiration_hours", &self.expiration_hours)
            .field("issuer", &self.issuer)
            .finish()
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: std::env::var("JWT_SECRET")
                .unwrap_or_else(|_| "super-secret-key-change-in-production".to_string()),
            expiration_hours: 24 * 30,
            issuer: "bazaar".to_string(),
        }
    }
}

/// JWT claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Issuer
    pub iss: String,
}

impl TokenClaims {
    pub fn new(user_id: &str, config: &JwtConfig) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(config.expiration_hours);

        Self {
            sub: user_id.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: config.issuer.clone(),
        }
    }
}

/// Why a credential was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    Expired,
    Invalid,
}

/// Sign `claims` with the configured secret
pub fn encode_claims(
    claims: &TokenClaims,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Create a JWT token for a user
pub fn create_token(
    user_id: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    encode_claims(&TokenClaims::new(user_id, config), config)
}

/// Verify signature, issuer and expiry, and decode the claims
pub fn verify_token(token: &str, config: &JwtConfig) -> Result<TokenClaims, TokenError> {
    let mut validation = Validation::default();
    validation.set_issuer(&[&config.issuer]);
    validation.leeway = 0;

    decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret".into(),
            expiration_hours: 1,
            issuer: "bazaar".into(),
        }
    }

    #[test]
    fn test_create_and_verify_token() {
        let config = config();
        let token = create_token("user-123", &config).unwrap();

        let claims = verify_token(&token, &config).unwrap();
        assert_eq!(claims.sub, "user-123");
        assert_eq!(claims.iss, "bazaar");
    }

    #[test]
    fn test_invalid_token() {
        assert_eq!(verify_token("invalid-token", &config()), Err(TokenError::Invalid));
    }

    #[test]
    fn test_wrong_secret() {
        let token = create_token("user-123", &config()).unwrap();
        let other = JwtConfig {
            secret: "another-secret".into(),
            ..config()
        };
        assert_eq!(verify_token(&token, &other), Err(TokenError::Invalid));
    }

    #[test]
    fn test_wrong_issuer() {
        let token = create_token("user-123", &config()).unwrap();
        let other = JwtConfig {
            issuer: "someone-else".into(),
            ..config()
        };
        assert_eq!(verify_token(&token, &other), Err(TokenError::Invalid));
    }

    #[test]
    fn test_expired_token() {
        let config = config();
        let mut claims = TokenClaims::new("user-123", &config);
        claims.iat -= 7200;
        claims.exp = Utc::now().timestamp() - 3600;
        let token = encode_claims(&claims, &config).unwrap();

        assert_eq!(verify_token(&token, &config), Err(TokenError::Expired));
    }
}

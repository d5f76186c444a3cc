//! Access tokens (HS256 JWT) and opaque refresh tokens.
//!
//! Refresh tokens are random strings handed to the client once. Only their
//! SHA-256 digest is stored in `user_sessions`.

use cybersim_core::types::DbId;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// `iss` claim written into and required on every access token.
pub const TOKEN_ISSUER: &str = "cybersim";

const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 15;
const DEFAULT_REFRESH_EXPIRY_DAYS: i64 = 7;

/// Random bytes in a refresh token before hex encoding.
const REFRESH_TOKEN_BYTES: usize = 32;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// The user's database id.
    pub sub: DbId,
    /// Role name at issue time (`"admin"` or `"user"`).
    pub role: String,
    pub iss: String,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry_mins: i64,
    pub refresh_token_expiry_days: i64,
}

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var                   | Required | Default |
    /// |---------------------------|----------|---------|
    /// | `JWT_SECRET`              | **yes**  |         |
    /// | `JWT_ACCESS_EXPIRY_MINS`  | no       | `15`    |
    /// | `JWT_REFRESH_EXPIRY_DAYS` | no       | `7`     |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is missing or empty, or an expiry is not a number.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let read_i64 = |name: &str, default: i64| -> i64 {
            std::env::var(name)
                .map(|v| v.parse().unwrap_or_else(|_| panic!("{name} must be a valid i64")))
                .unwrap_or(default)
        };

        Self {
            secret,
            access_token_expiry_mins: read_i64("JWT_ACCESS_EXPIRY_MINS", DEFAULT_ACCESS_EXPIRY_MINS),
            refresh_token_expiry_days: read_i64(
                "JWT_REFRESH_EXPIRY_DAYS",
                DEFAULT_REFRESH_EXPIRY_DAYS,
            ),
        }
    }

    /// Access token lifetime in seconds, as reported to clients.
    pub fn access_token_ttl_secs(&self) -> i64 {
        self.access_token_expiry_mins * 60
    }
}

/// Sign an access token for `user_id` with the given role.
pub fn generate_access_token(
    user_id: DbId,
    role: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let iat = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        role: role.to_string(),
        iss: TOKEN_ISSUER.to_string(),
        exp: iat + config.access_token_ttl_secs(),
        iat,
        jti: Uuid::new_v4().to_string(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Verify signature, expiry and issuer, returning the claims.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default();
    validation.set_issuer(&[TOKEN_ISSUER]);
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;
    Ok(data.claims)
}

/// Generate a refresh token, returning `(plaintext, sha256_hex)`.
pub fn generate_refresh_token() -> (String, String) {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    let plaintext: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    let hash = hash_refresh_token(&plaintext);
    (plaintext, hash)
}

/// SHA-256 hex digest of a refresh token, as stored in `user_sessions`.
pub fn hash_refresh_token(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str) -> JwtConfig {
        JwtConfig {
            secret: secret.to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        }
    }

    fn sign(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn access_token_round_trip() {
        let cfg = config("test-secret-that-is-long-enough-for-hmac");
        let token = generate_access_token(42, "admin", &cfg).unwrap();
        let claims = validate_token(&token, &cfg).unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.role, "admin");
        assert_eq!(claims.iss, TOKEN_ISSUER);
        assert_eq!(claims.exp - claims.iat, 900);
    }

    #[test]
    fn expired_token_rejected() {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: 1,
            role: "user".into(),
            iss: TOKEN_ISSUER.into(),
            // Well past the default 60-second leeway.
            exp: now - 300,
            iat: now - 600,
            jti: Uuid::new_v4().to_string(),
        };
        let token = sign(&claims, "s3cret");
        assert!(validate_token(&token, &config("s3cret")).is_err());
    }

    #[test]
    fn foreign_issuer_rejected() {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: 1,
            role: "admin".into(),
            iss: "someone-else".into(),
            exp: now + 300,
            iat: now,
            jti: Uuid::new_v4().to_string(),
        };
        let token = sign(&claims, "s3cret");
        assert!(validate_token(&token, &config("s3cret")).is_err());
    }

    #[test]
    fn wrong_secret_rejected() {
        let token = generate_access_token(1, "user", &config("secret-alpha")).unwrap();
        assert!(validate_token(&token, &config("secret-bravo")).is_err());
    }

    #[test]
    fn refresh_tokens_are_unique_and_hashed() {
        let (a, hash_a) = generate_refresh_token();
        let (b, _) = generate_refresh_token();
        assert_ne!(a, b);
        assert_eq!(a.len(), REFRESH_TOKEN_BYTES * 2);
        assert_eq!(hash_a, hash_refresh_token(&a));
        assert_eq!(hash_a.len(), 64);
    }
}

use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::Serialize;

use crate::config::JwtConfig;
use crate::error::{AuthError, AuthResult};
use crate::roles::Role;

/// Issues HS256 access tokens with the shared secret.
pub struct TokenSigner {
    encoding_key: EncodingKey,
    ttl_seconds: i64,
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: i64,
    pub token_type: &'static str,
}

#[derive(Serialize)]
struct AccessClaims<'a> {
    sub: &'a str,
    role: &'a str,
    exp: i64,
    iat: i64,
}

impl TokenSigner {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            ttl_seconds: config.token_ttl_seconds,
        }
    }

    pub fn issue(&self, subject: &str, role: &Role) -> AuthResult<IssuedToken> {
        let now = Utc::now();
        let expires_at = now + Duration::seconds(self.ttl_seconds);

        let claims = AccessClaims {
            sub: subject,
            role: role.as_str(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|err| AuthError::Signing(err.to_string()))?;

        Ok(IssuedToken {
            token,
            expires_in: self.ttl_seconds,
            token_type: "Bearer",
        })
    }
}

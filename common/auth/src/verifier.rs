use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde_json::Value;
use tracing::debug;

use crate::claims::Claims;
use crate::config::JwtConfig;
use crate::error::{AuthError, AuthResult};

/// Checks token signature, expiry and payload shape.
#[derive(Clone)]
pub struct JwtVerifier {
    config: JwtConfig,
    key: DecodingKey,
}

impl JwtVerifier {
    pub fn new(config: JwtConfig) -> Self {
        let key = DecodingKey::from_secret(config.secret.as_bytes());
        Self { config, key }
    }

    pub fn verify(&self, token: &str) -> AuthResult<Claims> {
        let header =
            decode_header(token).map_err(|err| AuthError::InvalidHeader(err.to_string()))?;
        if header.alg != Algorithm::HS256 {
            return Err(AuthError::InvalidHeader(format!(
                "unsupported alg {:?}",
                header.alg
            )));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation.validate_aud = false;
        validation.leeway = self.config.leeway_seconds.into();

        let token_data = decode::<Value>(token, &self.key, &validation)?;
        let claims = Claims::try_from(token_data.claims)?;
        debug!(subject = %claims.subject, "verified JWT successfully");
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    const SECRET: &str = "test-secret";

    fn sign(payload: &Value, secret: &str) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            payload,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("sign token")
    }

    fn verifier() -> JwtVerifier {
        JwtVerifier::new(JwtConfig::new(SECRET).with_leeway(0))
    }

    #[test]
    fn verifier_accepts_valid_token() {
        let exp = Utc::now().timestamp() + 600;
        let token = sign(&json!({ "sub": "user-1", "role": "user", "exp": exp }), SECRET);
        let claims = verifier().verify(&token).expect("verification succeeds");
        assert_eq!(claims.subject, "user-1");
        assert_eq!(claims.expires_at.timestamp(), exp);
    }

    #[test]
    fn verifier_rejects_wrong_secret() {
        let exp = Utc::now().timestamp() + 600;
        let token = sign(&json!({ "sub": "user-1", "exp": exp }), "other-secret");
        let err = verifier().verify(&token).expect_err("bad signature");
        assert!(matches!(err, AuthError::Verification(_)), "got {err:?}");
    }

    #[test]
    fn verifier_rejects_expired_token() {
        let exp = Utc::now().timestamp() - 120;
        let token = sign(&json!({ "sub": "user-1", "exp": exp }), SECRET);
        let err = verifier().verify(&token).expect_err("expired");
        assert!(matches!(err, AuthError::Verification(_)), "got {err:?}");
    }

    #[test]
    fn default_config_rejects_token_just_past_expiry() {
        let exp = Utc::now().timestamp() - 5;
        let token = sign(&json!({ "sub": "user-1", "exp": exp }), SECRET);
        let err = JwtVerifier::new(JwtConfig::new(SECRET))
            .verify(&token)
            .expect_err("expired");
        assert!(matches!(err, AuthError::Verification(_)), "got {err:?}");
    }

    #[test]
    fn configured_leeway_tolerates_recent_expiry() {
        let exp = Utc::now().timestamp() - 5;
        let token = sign(&json!({ "sub": "user-1", "exp": exp }), SECRET);
        let verifier = JwtVerifier::new(JwtConfig::new(SECRET).with_leeway(60));
        assert!(verifier.verify(&token).is_ok());
    }

    #[test]
    fn verifier_rejects_token_without_expiry() {
        let token = sign(&json!({ "sub": "user-1" }), SECRET);
        assert!(verifier().verify(&token).is_err());
    }

    #[test]
    fn verifier_rejects_garbage() {
        let err = verifier().verify("not-a-jwt").expect_err("garbage");
        assert!(matches!(err, AuthError::InvalidHeader(_)), "got {err:?}");
    }
}

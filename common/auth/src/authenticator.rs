use axum::http::HeaderValue;
use tracing::{debug, warn};

use crate::error::{AuthError, AuthResult};
use crate::extractors::{parse_bearer, AuthContext};
use crate::revocation::RevokedTokens;
use crate::verifier::JwtVerifier;

/// Turns an `Authorization` header into a verified [`AuthContext`].
///
/// Checks run in a fixed order: the bearer token must be present, then it
/// must not be revoked, then its signature, expiry and payload must verify.
/// A revoked token is therefore reported as revoked even when it would also
/// fail verification.
#[derive(Clone)]
pub struct Authenticator {
    verifier: JwtVerifier,
    revoked: RevokedTokens,
}

impl Authenticator {
    pub fn new(verifier: JwtVerifier, revoked: RevokedTokens) -> Self {
        Self { verifier, revoked }
    }

    pub fn revoked_tokens(&self) -> &RevokedTokens {
        &self.revoked
    }

    pub fn revoke(&self, token: &str) {
        self.revoked.revoke(token);
    }

    pub fn authenticate(&self, header: Option<&HeaderValue>) -> AuthResult<AuthContext> {
        let header_value = header.ok_or(AuthError::MissingAuthorization)?;
        let token = parse_bearer(header_value)?;

        if self.revoked.is_revoked(&token) {
            warn!("rejected revoked token");
            return Err(AuthError::Revoked);
        }

        let claims = self.verifier.verify(&token).map_err(|err| {
            debug!(error = %err, "token verification failed");
            err
        })?;

        Ok(AuthContext { claims, token })
    }
}

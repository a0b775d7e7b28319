use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use common_auth::{ensure_role, AuthContext, Authenticator, WRITE_ROLES};
use common_http_errors::ApiError;

/// Caller allowed to mutate resources: authenticated, then holding one of
/// [`WRITE_ROLES`]. Resolved from the request head so a 401/403 is decided
/// before any body is read.
#[derive(Debug, Clone)]
pub struct Editor(pub AuthContext);

#[async_trait]
impl<S> FromRequestParts<S> for Editor
where
    Arc<Authenticator>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = AuthContext::from_request_parts(parts, state).await?;
        ensure_role(&auth, WRITE_ROLES)?;
        Ok(Self(auth))
    }
}

use axum::response::{IntoResponse, Response};
use common_http_errors::ApiError;
use thiserror::Error;

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("authorization header missing")]
    MissingAuthorization,
    #[error("authorization header malformed")]
    InvalidAuthorization,
    #[error("token has been revoked")]
    Revoked,
    #[error("failed to decode token header: {0}")]
    InvalidHeader(String),
    #[error("token verification failed: {0}")]
    Verification(String),
    #[error("invalid claim '{0}' with value '{1}'")]
    InvalidClaim(&'static str, String),
    #[error("malformed claim payload: {0}")]
    InvalidJson(String),
    #[error("failed to sign token: {0}")]
    Signing(String),
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(value: jsonwebtoken::errors::Error) -> Self {
        Self::Verification(value.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(value: AuthError) -> Self {
        match value {
            AuthError::MissingAuthorization | AuthError::InvalidAuthorization => {
                ApiError::Unauthorized
            }
            AuthError::Revoked => ApiError::Forbidden {
                code: "token_revoked",
            },
            AuthError::InvalidHeader(_)
            | AuthError::Verification(_)
            | AuthError::InvalidClaim(_, _)
            | AuthError::InvalidJson(_) => ApiError::Forbidden {
                code: "invalid_token",
            },
            AuthError::Signing(detail) => ApiError::Internal {
                message: Some(detail),
            },
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}

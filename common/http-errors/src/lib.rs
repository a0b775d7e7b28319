use axum::{http::{StatusCode, HeaderValue}, response::{IntoResponse, Response}, Json};
use serde::Serialize;
use serde_json::Value;

pub const ERROR_CODE_HEADER: &str = "X-Error-Code";

/// Wire shape shared by every error response: `{"message": ...}` where the
/// message is a string, or the issue list for validation failures.
#[derive(Serialize, Debug)]
pub struct ErrorBody {
    pub message: Value,
}

impl ErrorBody {
    pub fn text(message: impl Into<String>) -> Self { Self { message: Value::String(message.into()) } }
}

#[derive(Debug)]
pub enum ApiError {
    Unauthorized,
    Forbidden { code: &'static str },
    BadRequest { code: &'static str, message: String },
    Validation { code: &'static str, issues: Value },
    NotFound { code: &'static str, message: &'static str },
    Conflict { code: &'static str, message: String },
    EndpointNotFound,
    Internal { message: Option<String> },
}

impl ApiError {
    /// Wraps an unexpected fault. The detail is logged, never sent to the client.
    pub fn internal<E: std::fmt::Display>(e: E) -> Self { Self::Internal { message: Some(e.to_string()) } }
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self { Self::BadRequest { code, message: message.into() } }
    pub fn forbidden() -> Self { Self::Forbidden { code: "forbidden" } }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ApiError::BadRequest { .. } | ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } | ApiError::EndpointNotFound => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Unauthorized => "unauthorized",
            ApiError::Forbidden { code }
            | ApiError::BadRequest { code, .. }
            | ApiError::Validation { code, .. }
            | ApiError::NotFound { code, .. }
            | ApiError::Conflict { code, .. } => code,
            ApiError::EndpointNotFound => "endpoint_not_found",
            ApiError::Internal { .. } => "internal_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_code = self.code();
        let body = match self {
            ApiError::Unauthorized => ErrorBody::text("Unauthorized"),
            ApiError::Forbidden { .. } => ErrorBody::text("Forbidden"),
            ApiError::BadRequest { message, .. } | ApiError::Conflict { message, .. } => ErrorBody::text(message),
            ApiError::Validation { issues, .. } => ErrorBody { message: issues },
            ApiError::NotFound { message, .. } => ErrorBody::text(message),
            ApiError::EndpointNotFound => ErrorBody::text("Endpoint not found"),
            ApiError::Internal { message } => {
                if let Some(detail) = message {
                    tracing::error!(error = %detail, "internal error");
                }
                ErrorBody::text("Internal Server Error")
            }
        };
        let mut resp = (status, Json(body)).into_response();
        if let Ok(val) = HeaderValue::from_str(error_code) {
            resp.headers_mut().insert(ERROR_CODE_HEADER, val);
        }
        resp
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

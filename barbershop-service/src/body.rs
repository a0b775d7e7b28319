use async_trait::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use common_http_errors::{ApiError, ApiResult};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

pub const INVALID_BODY_MESSAGE: &str = "Invalid JSON body";

/// Request body decoded as JSON once the whole payload has arrived.
///
/// Read and decode failures both reject with 400; nothing downstream runs, so
/// an abandoned upload never reaches a store.
#[derive(Debug, Clone)]
pub struct JsonBody(pub Value);

impl JsonBody {
    /// The body when it is a JSON object; arrays and scalars are malformed.
    pub fn require_object(self) -> ApiResult<Value> {
        match self.0 {
            object @ Value::Object(_) => Ok(object),
            _ => {
                warn!("request body is not a JSON object");
                Err(malformed())
            }
        }
    }

    /// Decode an object body into a concrete structure.
    pub fn decode<T: DeserializeOwned>(self) -> ApiResult<T> {
        serde_json::from_value(self.require_object()?).map_err(|err| {
            warn!(error = %err, "request body has unexpected structure");
            malformed()
        })
    }
}

fn malformed() -> ApiError {
    ApiError::bad_request("invalid_body", INVALID_BODY_MESSAGE)
}

#[async_trait]
impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|rejection| {
            warn!(error = %rejection, "failed to read request body");
            malformed()
        })?;

        serde_json::from_slice(&bytes).map(JsonBody).map_err(|err| {
            warn!(error = %err, "request body is not valid JSON");
            malformed()
        })
    }
}

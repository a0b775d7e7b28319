use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use common_auth::AuthContext;
use common_http_errors::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::app::AppState;
use crate::body::JsonBody;
use crate::users::{UserStoreError, UserView};
use crate::validation::{validate_request, RegistrationSchema};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

pub async fn register(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> ApiResult<(StatusCode, Json<UserView>)> {
    let registration = validate_request(&RegistrationSchema, &body)?;
    let user = state
        .users
        .register(&registration.username, &registration.password, registration.role)
        .map_err(|err| match err {
            UserStoreError::UsernameTaken(_) => ApiError::Conflict {
                code: "username_taken",
                message: "Username already registered".to_string(),
            },
            UserStoreError::Hash(_) => ApiError::internal(err),
        })?;
    Ok((StatusCode::CREATED, Json(UserView::from(&user))))
}

pub async fn login(State(state): State<AppState>, body: JsonBody) -> ApiResult<Json<LoginResponse>> {
    let LoginRequest { username, password } = body.decode()?;

    let Some(user) = state.users.verify_credentials(&username, &password) else {
        state.metrics.login_attempt("invalid_credentials");
        warn!(username = %username, "login rejected");
        return Err(ApiError::Unauthorized);
    };

    let issued = state
        .token_signer
        .issue(&user.id.to_string(), &user.role)
        .map_err(ApiError::from)?;
    state.metrics.login_attempt("success");
    info!(user_id = %user.id, role = %user.role, "login succeeded");

    Ok(Json(LoginResponse {
        token: issued.token,
        token_type: issued.token_type,
        expires_in: issued.expires_in,
    }))
}

/// Revokes the presented token; it is refused with 403 from then on.
pub async fn logout(State(state): State<AppState>, auth: AuthContext) -> Json<Value> {
    state.authenticator.revoke(&auth.token);
    info!(subject = %auth.claims.subject, "token revoked");
    Json(json!({ "message": "Logged out" }))
}

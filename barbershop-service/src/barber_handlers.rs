use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use common_auth::AuthContext;
use common_http_errors::{ApiError, ApiResult};
use serde_json::{json, Value};
use tracing::info;

use crate::app::AppState;
use crate::body::JsonBody;
use crate::models::{Appointment, Barber};
use crate::security::Editor;
use crate::store::parse_record_id;
use crate::validation::{validate_request, BarberReplacementSchema, BarberSchema};

fn barber_not_found() -> ApiError {
    ApiError::NotFound {
        code: "barber_not_found",
        message: "Barber not found",
    }
}

pub async fn list_barbers(State(state): State<AppState>, _auth: AuthContext) -> Json<Vec<Barber>> {
    Json(state.barbers.list())
}

pub async fn get_barber(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(id): Path<String>,
) -> ApiResult<Json<Barber>> {
    parse_record_id(&id)
        .and_then(|id| state.barbers.get(&id))
        .map(Json)
        .ok_or_else(barber_not_found)
}

/// `GET /barber/` asks for the barber with an empty id, which never exists.
pub async fn get_barber_without_id(_auth: AuthContext) -> ApiError {
    barber_not_found()
}

pub async fn list_barber_appointments(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(id): Path<String>,
) -> Json<Vec<Appointment>> {
    Json(state.appointments.list_by_barber_id(&id))
}

pub async fn create_barber(
    State(state): State<AppState>,
    Editor(auth): Editor,
    JsonBody(body): JsonBody,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let input = validate_request(&BarberSchema, &body)?;
    let barber = state.barbers.add(input);
    info!(barber_id = %barber.id, subject = %auth.claims.subject, "barber created");
    Ok((StatusCode::CREATED, Json(json!({ "barber": barber }))))
}

/// Full replacement: fields missing from the body are dropped from the record.
/// Only field types are checked, never the creation rules.
pub async fn update_barber(
    State(state): State<AppState>,
    Editor(auth): Editor,
    Path(id): Path<String>,
    body: JsonBody,
) -> ApiResult<Json<Barber>> {
    let replacement = validate_request(&BarberReplacementSchema, &body.require_object()?)?;
    let barber = parse_record_id(&id)
        .and_then(|id| state.barbers.update(&id, replacement))
        .ok_or_else(barber_not_found)?;
    info!(barber_id = %barber.id, subject = %auth.claims.subject, "barber replaced");
    Ok(Json(barber))
}

pub async fn delete_barber(
    State(state): State<AppState>,
    Editor(auth): Editor,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_record_id(&id).ok_or_else(barber_not_found)?;
    if !state.barbers.delete(&id) {
        return Err(barber_not_found());
    }
    info!(barber_id = %id, subject = %auth.claims.subject, "barber deleted");
    Ok(StatusCode::NO_CONTENT)
}

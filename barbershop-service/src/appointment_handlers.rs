use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use common_auth::AuthContext;
use common_http_errors::{ApiError, ApiResult};
use serde_json::{json, Value};
use tracing::info;

use crate::app::AppState;
use crate::body::JsonBody;
use crate::models::Appointment;
use crate::security::Editor;
use crate::store::parse_record_id;
use crate::validation::{validate_request, AppointmentReplacementSchema, AppointmentSchema};

fn appointment_not_found() -> ApiError {
    ApiError::NotFound {
        code: "appointment_not_found",
        message: "Appointment not found",
    }
}

pub async fn list_appointments(
    State(state): State<AppState>,
    _auth: AuthContext,
) -> Json<Vec<Appointment>> {
    Json(state.appointments.list())
}

pub async fn get_appointment(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(id): Path<String>,
) -> ApiResult<Json<Appointment>> {
    parse_record_id(&id)
        .and_then(|id| state.appointments.get(&id))
        .map(Json)
        .ok_or_else(appointment_not_found)
}

pub async fn get_appointment_without_id(_auth: AuthContext) -> ApiError {
    appointment_not_found()
}

/// The referenced barber is not looked up; any well-formed id is accepted.
pub async fn create_appointment(
    State(state): State<AppState>,
    Editor(auth): Editor,
    JsonBody(body): JsonBody,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let input = validate_request(&AppointmentSchema, &body)?;
    let appointment = state.appointments.add(input);
    info!(
        appointment_id = %appointment.id,
        barber_id = appointment.barber_id.as_deref().unwrap_or_default(),
        subject = %auth.claims.subject,
        "appointment created"
    );
    Ok((StatusCode::CREATED, Json(json!({ "appointment": appointment }))))
}

pub async fn update_appointment(
    State(state): State<AppState>,
    Editor(auth): Editor,
    Path(id): Path<String>,
    body: JsonBody,
) -> ApiResult<Json<Appointment>> {
    let replacement = validate_request(&AppointmentReplacementSchema, &body.require_object()?)?;
    let appointment = parse_record_id(&id)
        .and_then(|id| state.appointments.update(&id, replacement))
        .ok_or_else(appointment_not_found)?;
    info!(appointment_id = %appointment.id, subject = %auth.claims.subject, "appointment replaced");
    Ok(Json(appointment))
}

pub async fn delete_appointment(
    State(state): State<AppState>,
    Editor(auth): Editor,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let id = parse_record_id(&id).ok_or_else(appointment_not_found)?;
    if !state.appointments.delete(&id) {
        return Err(appointment_not_found());
    }
    info!(appointment_id = %id, subject = %auth.claims.subject, "appointment deleted");
    Ok(Json(json!({ "message": "Appointment deleted" })))
}

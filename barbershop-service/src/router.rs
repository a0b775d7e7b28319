use std::any::Any;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{header::CONTENT_TYPE, HeaderValue};
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use common_http_errors::{ApiError, ApiResult};
use serde_json::{json, Value};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::error;

use crate::app::AppState;
use crate::appointment_handlers::{
    create_appointment, delete_appointment, get_appointment, get_appointment_without_id,
    list_appointments, update_appointment,
};
use crate::auth_handlers::{login, logout, register};
use crate::barber_handlers::{
    create_barber, delete_barber, get_barber, get_barber_without_id, list_barber_appointments,
    list_barbers, update_barber,
};
use crate::metrics::{track_requests, ServiceMetrics};

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn metrics_endpoint(State(state): State<AppState>) -> ApiResult<Response> {
    state.metrics.render().map_err(ApiError::internal)
}

async fn endpoint_not_found() -> ApiError {
    ApiError::EndpointNotFound
}

fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    error!(panic = detail, "handler panicked");
    ApiError::Internal { message: None }.into_response()
}

/// Every route, the 404 fallback and the response layers over `state`.
///
/// A known path with an unsupported method is answered like an unknown path.
pub fn build_router(state: AppState) -> Router {
    let metrics = state.metrics.clone();

    let routes = Router::new()
        .route("/healthz", get(health))
        .route("/metrics", get(metrics_endpoint))
        .route(
            "/barber",
            get(list_barbers)
                .post(create_barber)
                .fallback(endpoint_not_found),
        )
        .route("/barber/", get(get_barber_without_id).fallback(endpoint_not_found))
        .route(
            "/barber/:id",
            get(get_barber)
                .patch(update_barber)
                .delete(delete_barber)
                .fallback(endpoint_not_found),
        )
        .route(
            "/barber/:id/appointment",
            get(list_barber_appointments).fallback(endpoint_not_found),
        )
        .route(
            "/appointment",
            get(list_appointments)
                .post(create_appointment)
                .fallback(endpoint_not_found),
        )
        .route(
            "/appointment/",
            get(get_appointment_without_id).fallback(endpoint_not_found),
        )
        .route(
            "/appointment/:id",
            get(get_appointment)
                .patch(update_appointment)
                .delete(delete_appointment)
                .fallback(endpoint_not_found),
        )
        .route("/auth/register", post(register).fallback(endpoint_not_found))
        .route("/auth/login", post(login).fallback(endpoint_not_found))
        .route("/auth/logout", post(logout).fallback(endpoint_not_found))
        .fallback(endpoint_not_found)
        .with_state(state);

    with_service_layers(routes, metrics)
}

/// Panic recovery, the JSON content type and request tracking around `router`.
///
/// Request tracking is outermost so it sees the final status, including the
/// 500 produced for a caught panic.
pub fn with_service_layers(router: Router, metrics: Arc<ServiceMetrics>) -> Router {
    router
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(SetResponseHeaderLayer::if_not_present(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        ))
        .layer(middleware::from_fn_with_state(metrics, track_requests))
}

use anyhow::Result;
use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct ServiceMetrics {
    registry: Registry,
    http_requests: IntCounterVec,
    login_attempts: IntCounterVec,
}

impl ServiceMetrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let http_requests = IntCounterVec::new(
            Opts::new(
                "http_requests_total",
                "Count of handled requests grouped by method and status",
            ),
            &["method", "status"],
        )?;
        registry.register(Box::new(http_requests.clone()))?;

        let login_attempts = IntCounterVec::new(
            Opts::new(
                "barbershop_login_attempts_total",
                "Count of login attempts grouped by outcome",
            ),
            &["outcome"],
        )?;
        registry.register(Box::new(login_attempts.clone()))?;

        Ok(Self {
            registry,
            http_requests,
            login_attempts,
        })
    }

    pub fn http_request(&self, method: &str, status: StatusCode) {
        self.http_requests
            .with_label_values(&[method, status.as_str()])
            .inc();
    }

    pub fn login_attempt(&self, outcome: &str) {
        self.login_attempts.with_label_values(&[outcome]).inc();
    }

    pub fn request_count(&self, method: &str, status: StatusCode) -> u64 {
        self.http_requests
            .with_label_values(&[method, status.as_str()])
            .get()
    }

    pub fn render(&self) -> Result<Response> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        let response = Response::builder()
            .status(StatusCode::OK)
            .header(
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/plain; version=0.0.4"),
            )
            .body(Body::from(buffer))?;
        Ok(response)
    }
}

/// Logs each finished request and counts it by method and status.
pub async fn track_requests(
    State(metrics): State<Arc<ServiceMetrics>>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();

    let response = next.run(request).await;
    let status = response.status();

    metrics.http_request(method.as_str(), status);
    info!(%method, %path, status = status.as_u16(), "request handled");
    response
}

//! `GET /metrics` in Prometheus text format

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use metrics_exporter_prometheus::PrometheusHandle;

/// `None` when no recorder was installed in this process.
#[derive(Clone)]
pub struct MetricsState {
    pub handle: Option<PrometheusHandle>,
}

pub async fn prometheus_metrics(State(state): State<MetricsState>) -> Response {
    match state.handle {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
            handle.render(),
        )
            .into_response(),
        None => (StatusCode::SERVICE_UNAVAILABLE, "metrics recorder not installed").into_response(),
    }
}

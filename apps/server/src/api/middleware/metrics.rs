//! Request metrics middleware
//!
//! Counts requests and measures latency per method and route. Labels use the
//! route template (`/api/v1/persons/:id`), not the concrete path, to keep
//! metric cardinality bounded.

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use lazy_static::lazy_static;
use prometheus::{register_histogram_vec, register_int_counter_vec, HistogramVec, IntCounterVec};

lazy_static! {
    static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "census_http_requests_total",
        "Number of handled HTTP requests",
        &["method", "path", "status"]
    )
    .expect("Failed to register census_http_requests_total");
    static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "census_http_request_duration_seconds",
        "HTTP request latency in seconds",
        &["method", "path"]
    )
    .expect("Failed to register census_http_request_duration_seconds");
}

pub async fn track_metrics(req: Request, next: Next) -> Response {
    let method = req.method().to_string();
    let path = match req.extensions().get::<MatchedPath>() {
        Some(matched) => matched.as_str().to_string(),
        // Unrouted requests (404s) have no template.
        None => req.uri().path().to_string(),
    };

    let timer = HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[&method, &path])
        .start_timer();

    let response = next.run(req).await;

    timer.observe_duration();
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[&method, &path, response.status().as_str()])
        .inc();

    response
}

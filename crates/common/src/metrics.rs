//! Prometheus counters for business events, served at `/metrics`.

use once_cell::sync::Lazy;
use prometheus::{register_int_counter_vec, Encoder, IntCounterVec, TextEncoder};

pub static EVENTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "venue_booking_events_total",
        "Business events by kind",
        &["event"]
    )
    .expect("register events_total")
});

/// Bump the counter for `event`, e.g. `login_ok` or `order_submitted`.
pub fn record(event: &str) {
    EVENTS_TOTAL.with_label_values(&[event]).inc();
}

pub fn encode_metrics() -> (axum::http::StatusCode, String) {
    Lazy::force(&EVENTS_TOTAL);
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (
        axum::http::StatusCode::OK,
        String::from_utf8(buffer).unwrap_or_default(),
    )
}

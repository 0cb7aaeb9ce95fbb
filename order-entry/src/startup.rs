use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::middleware::{
    security_headers::security_headers_middleware, tracing::request_id_middleware,
};
use time::Duration;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::handlers::{
    app::health_check,
    customer::{cancel_customer, customer_page, register_customer, send_customer},
    metrics::metrics,
    order::{
        add_line, cancel_order, order_page, remove_line, reset_order, save_order, send_order,
        update_header, update_line,
    },
};
use crate::middleware::metrics::metrics_middleware;
use crate::AppState;

/// Browser sessions idle this long lose their cookie; drafts follow via
/// `DraftStore::evict_idle`.
pub const SESSION_IDLE_HOURS: i64 = 24;

pub fn build_router(state: AppState, static_dir: &str) -> Router {
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false) // Set to true in production with HTTPS
        .with_expiry(Expiry::OnInactivity(Duration::hours(SESSION_IDLE_HOURS)));

    Router::new()
        // Sales order (OV)
        .route("/", get(order_page))
        .route("/ov/header", post(update_header))
        .route("/ov/lines", post(add_line))
        .route("/ov/lines/:index", post(update_line))
        .route("/ov/lines/:index/delete", post(remove_line))
        .route("/ov/save", post(save_order))
        .route("/ov/send", post(send_order))
        .route("/ov/cancel", post(cancel_order))
        .route("/ov/reset", post(reset_order))
        // Customer
        .route("/cliente", get(customer_page).post(register_customer))
        .route("/cliente/send", post(send_customer))
        .route("/cliente/cancel", post(cancel_customer))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(session_layer)
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        // Outermost so the span and handlers both see the request id
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

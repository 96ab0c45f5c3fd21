use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post, put},
    Router,
};
use service_core::middleware::tracing::request_id_middleware;
use time::Duration;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::handlers::{
    app::{health_check, metrics},
    auth::{create_session, login_page, logout_handler},
    dashboard::{
        cancel_signature_request, close_editor, dashboard_page, delete_document, edit_document,
        open_signature_request, send_signature_request, update_signature_email, upload_completed,
    },
};
use crate::middleware::{auth::auth_middleware, metrics::metrics_middleware};
use crate::AppState;

pub fn build_router(state: AppState) -> Router {
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(state.settings.server.secure_cookies)
        .with_expiry(Expiry::OnInactivity(Duration::hours(
            state.settings.server.session_expiry_hours,
        )));

    let dashboard = Router::new()
        .route("/dashboard", get(dashboard_page))
        .route("/dashboard/uploads/completed", post(upload_completed))
        .route("/dashboard/documents/:id", delete(delete_document))
        .route("/dashboard/documents/:id/edit", post(edit_document))
        .route("/dashboard/editor", delete(close_editor))
        .route(
            "/dashboard/documents/:id/signature-request",
            post(open_signature_request),
        )
        .route(
            "/dashboard/signature-request",
            delete(cancel_signature_request),
        )
        .route(
            "/dashboard/signature-request/email",
            put(update_signature_email),
        )
        .route(
            "/dashboard/signature-request/send",
            post(send_signature_request),
        )
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .route("/login", get(login_page))
        .route("/session", post(create_session))
        .route("/logout", post(logout_handler))
        .merge(dashboard)
        .layer(session_layer)
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
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

use crate::gate::{guard, GateDecision};
use crate::models::user::ACCESS_TOKEN_KEY;
use crate::AppState;
use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_sessions::Session;

/// Access gate for protected routes. The session is consulted on every
/// request, so logging in or out takes effect immediately.
pub async fn auth_middleware(
    State(state): State<AppState>,
    session: Session,
    request: Request<Body>,
    next: Next,
) -> Response {
    let access_token: Option<String> = session.get(ACCESS_TOKEN_KEY).await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to read session");
        None
    });

    match guard(access_token.is_some(), (), state.login_path()) {
        GateDecision::Render(()) => next.run(request).await,
        redirect => {
            tracing::debug!(path = %request.uri().path(), "Unauthenticated request redirected");
            redirect.into_response()
        }
    }
}

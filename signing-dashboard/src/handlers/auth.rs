use crate::models::user::{ACCESS_TOKEN_KEY, DASHBOARD_KEY};
use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use serde::Deserialize;
use service_core::error::AppError;
use tower_sessions::Session;
use uuid::Uuid;

/// Access token issued by the authentication service.
#[derive(Deserialize)]
pub struct SessionRequest {
    pub access_token: String,
}

pub async fn login_page() -> impl IntoResponse {
    Html("<p>Sign in to view your documents.</p>")
}

/// Attach an access token to the browser session and assign it a fresh
/// dashboard.
pub async fn create_session(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<SessionRequest>,
) -> Result<Response, AppError> {
    if payload.access_token.trim().is_empty() {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "access_token must not be empty"
        )));
    }

    let previous: Option<Uuid> = session
        .get(DASHBOARD_KEY)
        .await
        .map_err(|e| AppError::SessionError(e.to_string()))?;
    if let Some(previous) = previous {
        state.dashboards.dispose(&previous);
    }

    let dashboard_id = Uuid::new_v4();
    session
        .insert(ACCESS_TOKEN_KEY, &payload.access_token)
        .await
        .map_err(|e| AppError::SessionError(e.to_string()))?;
    session
        .insert(DASHBOARD_KEY, dashboard_id)
        .await
        .map_err(|e| AppError::SessionError(e.to_string()))?;

    tracing::info!(dashboard_id = %dashboard_id, "Session authenticated");

    Ok(StatusCode::NO_CONTENT.into_response())
}

pub async fn logout_handler(
    State(state): State<AppState>,
    session: Session,
) -> Result<Response, AppError> {
    let dashboard_id: Option<Uuid> = session
        .get(DASHBOARD_KEY)
        .await
        .map_err(|e| AppError::SessionError(e.to_string()))?;
    if let Some(dashboard_id) = dashboard_id {
        state.dashboards.dispose(&dashboard_id);
    }

    session
        .flush()
        .await
        .map_err(|e| AppError::SessionError(e.to_string()))?;

    Ok(Redirect::to(state.login_path()).into_response())
}

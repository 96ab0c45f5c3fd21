use crate::models::{AuthUser, Document, DocumentId, StatusFilter};
use crate::services::DashboardSession;
use crate::view_model::DashboardView;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use service_core::error::AppError;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct ListParams {
    pub status: Option<String>,
}

#[derive(Deserialize)]
pub struct RecipientEmail {
    pub email: String,
}

async fn dashboard_for(state: &AppState, user: &AuthUser) -> Arc<DashboardSession> {
    state.dashboards.get_or_mount(user).await
}

fn find_document(session: &DashboardSession, id: &str) -> Result<Document, AppError> {
    session
        .dashboard
        .find(&DocumentId::new(id))
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Document {} not found", id)))
}

pub async fn dashboard_page(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<ListParams>,
) -> Result<Json<DashboardView>, AppError> {
    let filter = params
        .status
        .as_deref()
        .map(str::parse::<StatusFilter>)
        .transpose()
        .map_err(|e| AppError::BadRequest(e.into()))?;

    let session = dashboard_for(&state, &user).await;
    if let Some(filter) = filter {
        session.dashboard.set_filter(filter);
    }

    Ok(Json(session.render()))
}

/// Called once the upload widget reports success.
pub async fn upload_completed(
    State(state): State<AppState>,
    user: AuthUser,
) -> Json<DashboardView> {
    let session = dashboard_for(&state, &user).await;
    session.dashboard.upload_completed().await;
    Json(session.render())
}

pub async fn delete_document(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<DashboardView>, AppError> {
    let session = dashboard_for(&state, &user).await;
    let document = find_document(&session, &id)?;

    session.dashboard.delete(&document.id).await;

    Ok(Json(session.render()))
}

pub async fn edit_document(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<DashboardView>, AppError> {
    let session = dashboard_for(&state, &user).await;
    let document = find_document(&session, &id)?;

    session.dashboard.select_for_edit(Some(document));

    Ok(Json(session.render()))
}

/// The editor's "go back".
pub async fn close_editor(State(state): State<AppState>, user: AuthUser) -> Json<DashboardView> {
    let session = dashboard_for(&state, &user).await;
    session.dashboard.finish_editing();
    Json(session.render())
}

pub async fn open_signature_request(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<DashboardView>, AppError> {
    let session = dashboard_for(&state, &user).await;
    let document = find_document(&session, &id)?;

    session.dashboard.open_signature_request(document);

    Ok(Json(session.render()))
}

pub async fn update_signature_email(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<RecipientEmail>,
) -> Json<DashboardView> {
    let session = dashboard_for(&state, &user).await;
    if !session.dashboard.set_recipient_email(payload.email) {
        tracing::debug!("Recipient email ignored; no signature request open");
    }
    Json(session.render())
}

pub async fn cancel_signature_request(
    State(state): State<AppState>,
    user: AuthUser,
) -> Json<DashboardView> {
    let session = dashboard_for(&state, &user).await;
    session.dashboard.cancel_signature_request();
    Json(session.render())
}

pub async fn send_signature_request(
    State(state): State<AppState>,
    user: AuthUser,
) -> Json<DashboardView> {
    let session = dashboard_for(&state, &user).await;
    session.dashboard.send_signature_request().await;
    Json(session.render())
}

use crate::models::{Document, StatusFilter};
use crate::services::Notification;
use serde::Serialize;

/// Modal flow for asking someone to sign a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SignatureRequest {
    #[default]
    Closed,
    Open { target: Document, email: String },
}

impl SignatureRequest {
    pub fn is_open(&self) -> bool {
        matches!(self, SignatureRequest::Open { .. })
    }
}

/// A document plus the location the PDF viewer should load it from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentCard {
    #[serde(flatten)]
    pub document: Document,
    pub file_url: String,
}

impl DocumentCard {
    pub fn new(document: Document, server_base_url: &str) -> Self {
        let file_url = document.file_url(server_base_url);
        Self { document, file_url }
    }
}

/// Renderable snapshot of a dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub filter: StatusFilter,
    pub filters: Vec<StatusFilter>,
    pub total: usize,
    pub documents: Vec<DocumentCard>,
    pub editing: Option<DocumentCard>,
    pub signature_request: SignatureRequest,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notifications: Vec<Notification>,
}

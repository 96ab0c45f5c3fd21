//! Remote document store client.
//!
//! The store owns documents, signature links and authentication; the
//! dashboard only lists, deletes and asks for signature links.

use crate::config::DocumentApiSettings;
use crate::models::{Credentials, Document, DocumentId};
use crate::services::metrics::record_store_call;
use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::Serialize;
use service_core::observability::TracedClientExt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document store request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("document store responded with status {status}")]
    Status { status: u16 },

    #[error("unexpected response from document store: {0}")]
    Malformed(String),

    #[error("invalid document store url: {0}")]
    InvalidUrl(String),
}

impl StoreError {
    pub fn is_malformed(&self) -> bool {
        matches!(self, StoreError::Malformed(_))
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All documents owned by the caller identified by `credentials`.
    async fn list_documents(&self, credentials: &Credentials) -> Result<Vec<Document>, StoreError>;

    async fn delete_document(
        &self,
        credentials: &Credentials,
        document_id: &DocumentId,
    ) -> Result<(), StoreError>;

    /// Ask the store to email a signing link for `document_id` to `email`.
    /// This endpoint is public; no credentials are sent.
    async fn request_signature_link(
        &self,
        document_id: &DocumentId,
        email: &str,
    ) -> Result<(), StoreError>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignatureLinkRequest<'a> {
    document_id: &'a DocumentId,
    email: &'a str,
}

/// [`DocumentStore`] over the store's REST API.
pub struct HttpDocumentStore {
    client: Client,
    settings: DocumentApiSettings,
}

impl HttpDocumentStore {
    pub fn new(settings: DocumentApiSettings) -> Self {
        Self {
            client: Client::new(),
            settings,
        }
    }

    pub fn base_url(&self) -> &str {
        self.settings.url.trim_end_matches('/')
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    /// `{base}/docs/{id}` with the id percent-encoded as a single segment.
    fn document_url(&self, document_id: &DocumentId) -> Result<Url, StoreError> {
        let mut url =
            Url::parse(self.base_url()).map_err(|e| StoreError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| StoreError::InvalidUrl(self.base_url().to_string()))?
            .pop_if_empty()
            .push("docs")
            .push(document_id.as_str());
        Ok(url)
    }

    fn check_status(response: Response) -> Result<Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(StoreError::Status {
                status: status.as_u16(),
            })
        }
    }
}

/// Validate the `{ "documents": [...] }` envelope returned by the list call.
pub fn parse_document_list(body: &[u8]) -> Result<Vec<Document>, StoreError> {
    let mut value: serde_json::Value =
        serde_json::from_slice(body).map_err(|e| StoreError::Malformed(e.to_string()))?;

    let documents = value
        .get_mut("documents")
        .map(serde_json::Value::take)
        .ok_or_else(|| StoreError::Malformed("missing `documents` field".to_string()))?;

    if !documents.is_array() {
        return Err(StoreError::Malformed(
            "`documents` is not an array".to_string(),
        ));
    }

    serde_json::from_value(documents).map_err(|e| StoreError::Malformed(e.to_string()))
}

fn outcome_label<T>(result: &Result<T, StoreError>) -> &'static str {
    match result {
        Ok(_) => "success",
        Err(StoreError::Transport(_)) => "transport_error",
        Err(StoreError::Status { .. }) => "status_error",
        Err(StoreError::Malformed(_)) => "malformed",
        Err(StoreError::InvalidUrl(_)) => "invalid_url",
    }
}

#[async_trait]
impl DocumentStore for HttpDocumentStore {
    async fn list_documents(&self, credentials: &Credentials) -> Result<Vec<Document>, StoreError> {
        let url = self.url("/docs/");

        let result = async {
            let response = self
                .client
                .traced_get(&url)
                .bearer_auth(credentials.access_token())
                .timeout(self.settings.request_timeout())
                .send()
                .await?;
            let body = Self::check_status(response)?.bytes().await?;
            parse_document_list(&body)
        }
        .await;

        record_store_call("list_documents", outcome_label(&result));
        if let Err(e) = &result {
            tracing::error!(url = %url, error = %e, "List documents failed");
        }
        result
    }

    async fn delete_document(
        &self,
        credentials: &Credentials,
        document_id: &DocumentId,
    ) -> Result<(), StoreError> {
        let result = async {
            let url = self.document_url(document_id)?;
            let response = self
                .client
                .traced_delete(url.as_str())
                .bearer_auth(credentials.access_token())
                .timeout(self.settings.request_timeout())
                .send()
                .await?;
            Self::check_status(response).map(|_| ())
        }
        .await;

        record_store_call("delete_document", outcome_label(&result));
        match &result {
            Ok(()) => tracing::info!(document_id = %document_id, "Document deleted"),
            Err(e) => tracing::error!(document_id = %document_id, error = %e, "Delete failed"),
        }
        result
    }

    async fn request_signature_link(
        &self,
        document_id: &DocumentId,
        email: &str,
    ) -> Result<(), StoreError> {
        let url = self.url("/public/request-link");

        let result = async {
            let response = self
                .client
                .traced_post(&url)
                .json(&SignatureLinkRequest { document_id, email })
                .timeout(self.settings.request_timeout())
                .send()
                .await?;
            Self::check_status(response).map(|_| ())
        }
        .await;

        record_store_call("request_signature_link", outcome_label(&result));
        match &result {
            Ok(()) => tracing::info!(document_id = %document_id, "Signature link requested"),
            Err(e) => {
                tracing::error!(document_id = %document_id, error = %e, "Signature link request failed")
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DocumentStatus;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn store_for(server: &MockServer) -> HttpDocumentStore {
        HttpDocumentStore::new(DocumentApiSettings {
            url: format!("{}/api/v1", server.uri()),
            server_base_url: server.uri(),
            request_timeout_secs: None,
        })
    }

    #[test]
    fn parse_rejects_non_array_documents() {
        let err = parse_document_list(br#"{"documents": {"_id": "1"}}"#).unwrap_err();
        assert!(err.is_malformed());

        let err = parse_document_list(br#"{"message": "ok"}"#).unwrap_err();
        assert!(err.is_malformed());

        let err = parse_document_list(b"<html>").unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn parse_rejects_partially_valid_lists() {
        let body = br#"{"documents": [
            {"_id": "1", "filename": "a.pdf", "filepath": "uploads/a.pdf", "status": "Signed"},
            {"_id": "2", "filename": "b.pdf"}
        ]}"#;
        assert!(parse_document_list(body).unwrap_err().is_malformed());
    }

    #[tokio::test]
    async fn list_sends_bearer_token_and_preserves_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/docs/"))
            .and(header("authorization", "Bearer token-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "documents": [
                    {"_id": "b", "filename": "b.pdf", "filepath": "uploads/b.pdf", "status": "Rejected"},
                    {"_id": "a", "filename": "a.pdf", "filepath": "uploads/a.pdf", "status": "Pending"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let docs = store_for(&server)
            .list_documents(&Credentials::bearer("token-1"))
            .await
            .unwrap();

        let ids: Vec<&str> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(docs[0].status, DocumentStatus::Rejected);
    }

    #[tokio::test]
    async fn list_maps_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/docs/"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = store_for(&server)
            .list_documents(&Credentials::bearer("expired"))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Status { status: 401 }));
    }

    #[tokio::test]
    async fn delete_targets_document_path() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/v1/docs/65f0c2"))
            .and(header("authorization", "Bearer token-1"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        store_for(&server)
            .delete_document(&Credentials::bearer("token-1"), &DocumentId::new("65f0c2"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn delete_encodes_id_as_single_segment() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/v1/docs/a%2Fb%3Fc"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        store_for(&server)
            .delete_document(&Credentials::bearer("token-1"), &DocumentId::new("a/b?c"))
            .await
            .unwrap();
    }

    #[test]
    fn document_url_tolerates_trailing_slash() {
        let store = HttpDocumentStore::new(DocumentApiSettings {
            url: "http://store.local/api/v1/".to_string(),
            server_base_url: "http://store.local".to_string(),
            request_timeout_secs: None,
        });

        let url = store.document_url(&DocumentId::new("65f0c2")).unwrap();
        assert_eq!(url.as_str(), "http://store.local/api/v1/docs/65f0c2");
    }

    #[tokio::test]
    async fn signature_link_posts_document_and_email() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/public/request-link"))
            .and(body_json(serde_json::json!({
                "documentId": "65f0c2",
                "email": "signer@example.com"
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        store_for(&server)
            .request_signature_link(&DocumentId::new("65f0c2"), "signer@example.com")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn unreachable_store_is_a_transport_error() {
        let store = HttpDocumentStore::new(DocumentApiSettings {
            url: "http://127.0.0.1:9".to_string(),
            server_base_url: "http://127.0.0.1:9".to_string(),
            request_timeout_secs: Some(2),
        });

        let err = store
            .delete_document(&Credentials::bearer("t"), &DocumentId::new("x"))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Transport(_)));
    }
}

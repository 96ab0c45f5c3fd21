//! Document collection view-model.
//!
//! Holds the locally cached copy of the user's documents and the transient UI
//! state around it. Every mutation goes to the remote store first; local state
//! only changes once the store has confirmed. Failures leave the last known
//! state in place and are reported once through the [`Notifier`].

mod view;

pub use view::{DashboardView, DocumentCard, SignatureRequest};

use crate::models::{filter_documents, Credentials, Document, DocumentId, StatusFilter};
use crate::services::{DocumentStore, NotificationKind, Notifier};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub mod messages {
    pub const LOAD_MALFORMED: &str = "Unexpected response from server";
    pub const LOAD_FAILED: &str = "Failed to fetch documents";
    pub const DELETE_SUCCEEDED: &str = "Deleted successfully";
    pub const DELETE_FAILED: &str = "Delete failed";
    pub const REQUEST_SENT: &str = "Request sent";
    pub const REQUEST_FAILED: &str = "Send failed";
}

/// What an asynchronous operation did to local state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The store confirmed and local state was reconciled.
    Applied,
    /// The store call failed; local state untouched, user notified.
    Failed,
    /// The result arrived for a superseded load or a disposed dashboard.
    Discarded,
    /// Nothing to do (e.g. sending while the modal is closed).
    Skipped,
}

#[derive(Debug, Default)]
struct DashboardState {
    documents: Vec<Document>,
    filter: StatusFilter,
    editing: Option<Document>,
    signature_request: SignatureRequest,
    load_generation: u64,
    disposed: bool,
}

struct Inner {
    store: Arc<dyn DocumentStore>,
    notifier: Arc<dyn Notifier>,
    credentials: Credentials,
    server_base_url: String,
    state: Mutex<DashboardState>,
}

/// Cheap to clone; clones share state.
#[derive(Clone)]
pub struct DocumentDashboard {
    inner: Arc<Inner>,
}

impl DocumentDashboard {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        notifier: Arc<dyn Notifier>,
        credentials: Credentials,
        server_base_url: impl Into<String>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                store,
                notifier,
                credentials,
                server_base_url: server_base_url.into(),
                state: Mutex::new(DashboardState::default()),
            }),
        }
    }

    /// Create the dashboard and perform the initial load.
    pub async fn mount(
        store: Arc<dyn DocumentStore>,
        notifier: Arc<dyn Notifier>,
        credentials: Credentials,
        server_base_url: impl Into<String>,
    ) -> Self {
        let dashboard = Self::new(store, notifier, credentials, server_base_url);
        dashboard.load().await;
        dashboard
    }

    fn state(&self) -> MutexGuard<'_, DashboardState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self, kind: NotificationKind, message: &str) {
        self.inner.notifier.notify(kind, message);
    }

    pub fn is_disposed(&self) -> bool {
        self.state().disposed
    }

    /// Replace the local collection with the store's current list.
    ///
    /// Only the most recently started load may apply its result.
    pub async fn load(&self) -> Outcome {
        let ticket = {
            let mut state = self.state();
            if state.disposed {
                return Outcome::Discarded;
            }
            state.load_generation += 1;
            state.load_generation
        };

        let result = self
            .inner
            .store
            .list_documents(&self.inner.credentials)
            .await;

        let error = {
            let mut state = self.state();
            if state.disposed || state.load_generation != ticket {
                tracing::debug!(
                    ticket,
                    current = state.load_generation,
                    disposed = state.disposed,
                    "Discarding document load result"
                );
                return Outcome::Discarded;
            }
            match result {
                Ok(documents) => {
                    tracing::info!(count = documents.len(), "Documents loaded");
                    state.documents = documents;
                    return Outcome::Applied;
                }
                Err(e) => e,
            }
        };

        tracing::warn!(error = %error, "Failed to load documents");
        let message = if error.is_malformed() {
            messages::LOAD_MALFORMED
        } else {
            messages::LOAD_FAILED
        };
        self.notify(NotificationKind::Error, message);
        Outcome::Failed
    }

    /// Hook for the upload collaborator: a finished upload triggers a full reload.
    pub async fn upload_completed(&self) -> Outcome {
        self.load().await
    }

    pub fn documents(&self) -> Vec<Document> {
        self.state().documents.clone()
    }

    pub fn find(&self, id: &DocumentId) -> Option<Document> {
        self.state()
            .documents
            .iter()
            .find(|doc| &doc.id == id)
            .cloned()
    }

    pub fn filter(&self) -> StatusFilter {
        self.state().filter
    }

    pub fn set_filter(&self, filter: StatusFilter) {
        self.state().filter = filter;
    }

    /// Documents matching the active filter, recomputed on every call.
    pub fn filtered(&self) -> Vec<Document> {
        let state = self.state();
        filter_documents(&state.documents, state.filter)
    }

    pub async fn delete(&self, id: &DocumentId) -> Outcome {
        if self.is_disposed() {
            return Outcome::Discarded;
        }

        let result = self
            .inner
            .store
            .delete_document(&self.inner.credentials, id)
            .await;

        // Disposal is checked under the same guard as the removal.
        let result = {
            let mut state = self.state();
            if state.disposed {
                return Outcome::Discarded;
            }
            result.map(|()| remove_document(&mut state.documents, id))
        };

        match result {
            Ok(_) => {
                self.notify(NotificationKind::Success, messages::DELETE_SUCCEEDED);
                Outcome::Applied
            }
            Err(e) => {
                tracing::warn!(document_id = %id, error = %e, "Failed to delete document");
                self.notify(NotificationKind::Error, messages::DELETE_FAILED);
                Outcome::Failed
            }
        }
    }

    pub fn select_for_edit(&self, document: Option<Document>) {
        self.state().editing = document;
    }

    /// The editor's "go back" signal.
    pub fn finish_editing(&self) {
        self.select_for_edit(None);
    }

    pub fn editing(&self) -> Option<Document> {
        self.state().editing.clone()
    }

    pub fn signature_request(&self) -> SignatureRequest {
        self.state().signature_request.clone()
    }

    pub fn open_signature_request(&self, document: Document) {
        self.state().signature_request = SignatureRequest::Open {
            target: document,
            email: String::new(),
        };
    }

    /// Update the recipient buffer. Ignored unless the modal is open.
    pub fn set_recipient_email(&self, recipient: impl Into<String>) -> bool {
        match &mut self.state().signature_request {
            SignatureRequest::Open { email, .. } => {
                *email = recipient.into();
                true
            }
            SignatureRequest::Closed => false,
        }
    }

    pub fn cancel_signature_request(&self) {
        self.state().signature_request = SignatureRequest::Closed;
    }

    /// Send the open modal's request. No-op while the modal is closed.
    pub async fn send_signature_request(&self) -> Outcome {
        let (target, email) = match &self.state().signature_request {
            SignatureRequest::Open { target, email } => (target.clone(), email.clone()),
            SignatureRequest::Closed => return Outcome::Skipped,
        };

        self.request_signature(&target, &email).await
    }

    /// Ask the store to email a signing link for `document` to `email`.
    ///
    /// The modal closes and the email buffer clears whatever the outcome,
    /// including when the returned future is dropped mid-flight.
    pub async fn request_signature(&self, document: &Document, email: &str) -> Outcome {
        let _reset = CloseModalOnDrop { dashboard: self };

        let result = self
            .inner
            .store
            .request_signature_link(&document.id, email)
            .await;

        {
            let mut state = self.state();
            if state.disposed {
                return Outcome::Discarded;
            }
            state.signature_request = SignatureRequest::Closed;
        }

        match result {
            Ok(()) => {
                self.notify(NotificationKind::Success, messages::REQUEST_SENT);
                Outcome::Applied
            }
            Err(e) => {
                tracing::warn!(document_id = %document.id, error = %e, "Failed to request signature");
                self.notify(NotificationKind::Error, messages::REQUEST_FAILED);
                Outcome::Failed
            }
        }
    }

    /// Tear down: drop cached state and ignore any results still in flight.
    pub fn dispose(&self) {
        let mut state = self.state();
        *state = DashboardState {
            disposed: true,
            ..DashboardState::default()
        };
    }

    pub fn view(&self) -> DashboardView {
        let base = self.inner.server_base_url.as_str();
        let state = self.state();
        DashboardView {
            filter: state.filter,
            filters: StatusFilter::ALL.to_vec(),
            total: state.documents.len(),
            documents: filter_documents(&state.documents, state.filter)
                .into_iter()
                .map(|doc| DocumentCard::new(doc, base))
                .collect(),
            editing: state
                .editing
                .clone()
                .map(|doc| DocumentCard::new(doc, base)),
            signature_request: state.signature_request.clone(),
            notifications: Vec::new(),
        }
    }
}

struct CloseModalOnDrop<'a> {
    dashboard: &'a DocumentDashboard,
}

impl Drop for CloseModalOnDrop<'_> {
    fn drop(&mut self) {
        self.dashboard.state().signature_request = SignatureRequest::Closed;
    }
}

/// Remove the document with `id`; returns whether anything was removed.
pub fn remove_document(documents: &mut Vec<Document>, id: &DocumentId) -> bool {
    let before = documents.len();
    documents.retain(|doc| &doc.id != id);
    documents.len() != before
}

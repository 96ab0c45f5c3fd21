pub mod document;
pub mod user;

pub use document::{filter_documents, Document, DocumentId, DocumentStatus, StatusFilter};
pub use user::{AuthUser, Credentials};

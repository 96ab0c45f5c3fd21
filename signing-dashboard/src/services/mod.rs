pub mod dashboards;
pub mod document_store;
pub mod metrics;
pub mod notifier;

pub use dashboards::{DashboardRegistry, DashboardSession};
pub use document_store::{DocumentStore, HttpDocumentStore, StoreError};
pub use notifier::{Notification, NotificationKind, NotificationQueue, Notifier};

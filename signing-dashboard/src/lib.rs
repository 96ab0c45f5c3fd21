pub mod config;
pub mod gate;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod startup;
pub mod view_model;

use config::Settings;
use services::{DashboardRegistry, DocumentStore};
use std::sync::Arc;

/// Shared application state for the BFF router.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub dashboards: Arc<DashboardRegistry>,
}

impl AppState {
    pub fn new(settings: Settings, store: Arc<dyn DocumentStore>) -> Self {
        let dashboards = Arc::new(DashboardRegistry::new(
            store,
            settings.document_api.server_base_url.clone(),
        ));
        Self {
            settings: Arc::new(settings),
            dashboards,
        }
    }

    pub fn login_path(&self) -> &str {
        &self.settings.auth.login_path
    }
}

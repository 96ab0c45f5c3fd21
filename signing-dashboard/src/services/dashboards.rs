//! One mounted dashboard per authenticated browser session.

use crate::models::AuthUser;
use crate::services::{DocumentStore, NotificationQueue};
use crate::view_model::{DashboardView, DocumentDashboard};
use dashmap::DashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use uuid::Uuid;

pub struct DashboardSession {
    pub dashboard: DocumentDashboard,
    pub notifications: Arc<NotificationQueue>,
    last_access: Mutex<Instant>,
}

impl DashboardSession {
    fn touch(&self) {
        *self.last_access.lock().unwrap_or_else(PoisonError::into_inner) = Instant::now();
    }

    pub fn idle_for(&self) -> Duration {
        self.last_access
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .elapsed()
    }

    /// Current view with any notifications raised since the last render.
    pub fn render(&self) -> DashboardView {
        let mut view = self.dashboard.view();
        view.notifications = self.notifications.drain();
        view
    }
}

pub struct DashboardRegistry {
    sessions: DashMap<Uuid, Arc<DashboardSession>>,
    store: Arc<dyn DocumentStore>,
    server_base_url: String,
}

impl DashboardRegistry {
    pub fn new(store: Arc<dyn DocumentStore>, server_base_url: impl Into<String>) -> Self {
        Self {
            sessions: DashMap::new(),
            store,
            server_base_url: server_base_url.into(),
        }
    }

    /// The session's dashboard, mounting (and loading) it on first use.
    pub async fn get_or_mount(&self, user: &AuthUser) -> Arc<DashboardSession> {
        if let Some(existing) = self.sessions.get(&user.dashboard_id) {
            existing.touch();
            return existing.clone();
        }

        let notifications = Arc::new(NotificationQueue::new());
        let dashboard = DocumentDashboard::mount(
            self.store.clone(),
            notifications.clone(),
            user.credentials.clone(),
            self.server_base_url.clone(),
        )
        .await;
        let mounted = Arc::new(DashboardSession {
            dashboard,
            notifications,
            last_access: Mutex::new(Instant::now()),
        });

        let session = self
            .sessions
            .entry(user.dashboard_id)
            .or_insert_with(|| mounted.clone())
            .clone();

        // A concurrent request mounted first; ours is never used.
        if !Arc::ptr_eq(&session, &mounted) {
            mounted.dashboard.dispose();
            session.touch();
        } else {
            tracing::info!(dashboard_id = %user.dashboard_id, "Dashboard mounted");
        }

        session
    }

    /// Unmount: discard cached state and ignore in-flight results.
    pub fn dispose(&self, dashboard_id: &Uuid) -> bool {
        match self.sessions.remove(dashboard_id) {
            Some((_, session)) => {
                session.dashboard.dispose();
                tracing::info!(dashboard_id = %dashboard_id, "Dashboard disposed");
                true
            }
            None => false,
        }
    }

    /// Dispose dashboards whose session has been idle for at least
    /// `idle_limit`. Returns how many were removed.
    pub fn sweep_idle(&self, idle_limit: Duration) -> usize {
        let idle: Vec<Uuid> = self
            .sessions
            .iter()
            .filter(|entry| entry.value().idle_for() >= idle_limit)
            .map(|entry| *entry.key())
            .collect();

        let mut removed = 0;
        for dashboard_id in idle {
            // Re-checked under the entry lock; a request may have touched it since.
            if let Some((_, session)) = self
                .sessions
                .remove_if(&dashboard_id, |_, session| session.idle_for() >= idle_limit)
            {
                session.dashboard.dispose();
                tracing::info!(dashboard_id = %dashboard_id, "Idle dashboard disposed");
                removed += 1;
            }
        }
        removed
    }

    /// Sweep idle dashboards every `period` until the registry is dropped.
    pub fn spawn_idle_sweep(
        self: &Arc<Self>,
        idle_limit: Duration,
        period: Duration,
    ) -> JoinHandle<()> {
        let registry = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let Some(registry) = registry.upgrade() else {
                    break;
                };
                let removed = registry.sweep_idle(idle_limit);
                if removed > 0 {
                    tracing::debug!(removed, remaining = registry.len(), "Dashboard sweep finished");
                }
            }
        })
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

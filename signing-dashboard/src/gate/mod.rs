//! Access gate in front of protected views.
//!
//! The authentication flag is owned by whoever handles login and logout
//! ([`AuthFlag`]). Gates only hold a read-only subscription and consult the
//! current value every time they are evaluated.
//!
//! The BFF router applies [`guard`] to the session on each request
//! (`middleware::auth`). [`AuthFlag`] and [`AccessGate`] serve embedders that
//! hold the authentication state in process.

use axum::response::{IntoResponse, Redirect, Response};
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision<V> {
    /// Authenticated: the protected view, untouched.
    Render(V),
    /// Not authenticated: navigate to the login entry point.
    Redirect(String),
}

impl<V> GateDecision<V> {
    pub fn is_render(&self) -> bool {
        matches!(self, GateDecision::Render(_))
    }
}

/// Render `protected_view` when authenticated, otherwise redirect to
/// `login_destination`.
pub fn guard<V>(
    is_authenticated: bool,
    protected_view: V,
    login_destination: &str,
) -> GateDecision<V> {
    if is_authenticated {
        GateDecision::Render(protected_view)
    } else {
        GateDecision::Redirect(login_destination.to_string())
    }
}

impl<V: IntoResponse> IntoResponse for GateDecision<V> {
    fn into_response(self) -> Response {
        match self {
            GateDecision::Render(view) => view.into_response(),
            GateDecision::Redirect(location) => Redirect::to(&location).into_response(),
        }
    }
}

/// Writer side of the shared authentication flag.
#[derive(Debug)]
pub struct AuthFlag {
    tx: watch::Sender<bool>,
}

impl AuthFlag {
    pub fn new(is_authenticated: bool) -> Self {
        let (tx, _rx) = watch::channel(is_authenticated);
        Self { tx }
    }

    pub fn set(&self, is_authenticated: bool) {
        let previous = self.tx.send_replace(is_authenticated);
        if previous != is_authenticated {
            tracing::debug!(is_authenticated, "authentication flag changed");
        }
    }

    pub fn is_authenticated(&self) -> bool {
        *self.tx.borrow()
    }

    /// A gate subscribed to this flag.
    pub fn gate(&self, login_destination: impl Into<String>) -> AccessGate {
        AccessGate {
            rx: self.tx.subscribe(),
            login_destination: login_destination.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AccessGate {
    rx: watch::Receiver<bool>,
    login_destination: String,
}

impl AccessGate {
    pub fn login_destination(&self) -> &str {
        &self.login_destination
    }

    pub fn evaluate<V>(&self, protected_view: V) -> GateDecision<V> {
        let is_authenticated = *self.rx.borrow();
        guard(is_authenticated, protected_view, &self.login_destination)
    }

    /// Wait for the next login/logout transition and return the new value.
    /// `None` once the flag has been dropped.
    pub async fn changed(&mut self) -> Option<bool> {
        self.rx.changed().await.ok()?;
        Some(*self.rx.borrow_and_update())
    }
}

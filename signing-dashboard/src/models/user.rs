use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Response},
};
use secrecy::{ExposeSecret, Secret};
use service_core::error::AppError;
use tower_sessions::Session;
use uuid::Uuid;

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const DASHBOARD_KEY: &str = "dashboard_id";

/// Ambient credentials forwarded to the remote document store.
#[derive(Debug, Clone)]
pub struct Credentials {
    access_token: Secret<String>,
}

impl Credentials {
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self {
            access_token: Secret::new(access_token.into()),
        }
    }

    pub fn access_token(&self) -> &str {
        self.access_token.expose_secret()
    }
}

/// Authenticated session context: the forwarded credentials and the key of
/// the dashboard view-model mounted for this session.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub dashboard_id: Uuid,
    pub credentials: Credentials,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| AppError::SessionError(msg.to_string()).into_response())?;

        let access_token: Option<String> = session
            .get(ACCESS_TOKEN_KEY)
            .await
            .map_err(|e| AppError::SessionError(e.to_string()).into_response())?;
        let dashboard_id: Option<Uuid> = session
            .get(DASHBOARD_KEY)
            .await
            .map_err(|e| AppError::SessionError(e.to_string()).into_response())?;

        match (access_token, dashboard_id) {
            (Some(token), Some(dashboard_id)) => Ok(AuthUser {
                dashboard_id,
                credentials: Credentials::bearer(token),
            }),
            _ => Err(
                AppError::Unauthorized(anyhow::anyhow!("No authenticated session")).into_response(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_debug_redacts_token() {
        let creds = Credentials::bearer("super-secret-token");
        assert_eq!(creds.access_token(), "super-secret-token");
        assert!(!format!("{:?}", creds).contains("super-secret-token"));
    }
}

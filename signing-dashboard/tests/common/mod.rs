#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use http_body_util::BodyExt;
use signing_dashboard::config::{
    AuthSettings, DocumentApiSettings, ServerSettings, Settings, TelemetrySettings,
};
use signing_dashboard::services::HttpDocumentStore;
use signing_dashboard::startup::build_router;
use signing_dashboard::AppState;
use std::sync::Arc;

pub const FILES_BASE_URL: &str = "http://files.local";

pub fn settings(api_url: &str) -> Settings {
    Settings {
        server: ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 0,
            session_expiry_hours: 1,
            secure_cookies: false,
            dashboard_sweep_secs: 60,
        },
        document_api: DocumentApiSettings {
            url: api_url.to_string(),
            server_base_url: FILES_BASE_URL.to_string(),
            request_timeout_secs: Some(2),
        },
        auth: AuthSettings::default(),
        telemetry: TelemetrySettings::default(),
    }
}

/// Router talking to the document API at `api_url`.
pub fn app(api_url: &str) -> Router {
    let settings = settings(api_url);
    let store = Arc::new(HttpDocumentStore::new(settings.document_api.clone()));
    build_router(AppState::new(settings, store))
}

/// `name=value` pair from the session cookie set on `response`.
pub fn session_cookie(response: &Response<Body>) -> String {
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("session cookie set")
        .to_str()
        .unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

pub fn request(method: &str, uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

pub fn json_request(method: &str, uri: &str, cookie: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn document_ids(view: &serde_json::Value) -> Vec<String> {
    view["documents"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["_id"].as_str().unwrap().to_string())
        .collect()
}

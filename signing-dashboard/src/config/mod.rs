use serde::Deserialize;
use std::time::Duration;

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub server: ServerSettings,
    pub document_api: DocumentApiSettings,
    #[serde(default)]
    pub auth: AuthSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_session_expiry_hours")]
    pub session_expiry_hours: i64,
    /// Mark session cookies `Secure`; enable behind HTTPS.
    #[serde(default)]
    pub secure_cookies: bool,
    /// How often dashboards of expired sessions are swept.
    #[serde(default = "default_dashboard_sweep_secs")]
    pub dashboard_sweep_secs: u64,
}

impl ServerSettings {
    /// Inactivity after which a session, and the dashboard mounted for it, expire.
    pub fn session_idle_limit(&self) -> Duration {
        Duration::from_secs(self.session_expiry_hours.max(0) as u64 * 3600)
    }

    pub fn dashboard_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.dashboard_sweep_secs.max(1))
    }
}

fn default_session_expiry_hours() -> i64 {
    24
}

fn default_dashboard_sweep_secs() -> u64 {
    60
}

#[derive(Deserialize, Clone, Debug)]
pub struct DocumentApiSettings {
    /// Base URL of the remote document store API (e.g. http://api:5000/api/v1).
    pub url: String,
    /// Base location that document file paths are resolved against for rendering.
    pub server_base_url: String,
    /// Per-request timeout. Unset means the transport default.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl DocumentApiSettings {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct AuthSettings {
    /// Where the access gate sends unauthenticated visitors.
    #[serde(default = "default_login_path")]
    pub login_path: String,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            login_path: default_login_path(),
        }
    }
}

fn default_login_path() -> String {
    "/login".to_string()
}

#[derive(Deserialize, Clone, Debug)]
pub struct TelemetrySettings {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// OTLP gRPC collector (e.g. http://tempo:4317). Local JSON logs only when unset.
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            otlp_endpoint: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path =
        std::env::current_dir().map_err(|e| config::ConfigError::Foreign(Box::new(e)))?;

    // Run either from the workspace root or from inside the crate directory
    let configuration_directory = if base_path.ends_with("signing-dashboard") {
        base_path.join("config")
    } else {
        base_path.join("signing-dashboard").join("config")
    };

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")).required(true))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}

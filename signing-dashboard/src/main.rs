use dotenvy::dotenv;
use service_core::observability::init_tracing;
use signing_dashboard::config::get_configuration;
use signing_dashboard::services::HttpDocumentStore;
use signing_dashboard::startup::build_router;
use signing_dashboard::AppState;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let configuration = get_configuration().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(
        "signing-dashboard",
        &configuration.telemetry.log_level,
        configuration.telemetry.otlp_endpoint.as_deref(),
    )?;

    signing_dashboard::services::metrics::init_metrics();

    let store = Arc::new(HttpDocumentStore::new(configuration.document_api.clone()));
    let address = format!(
        "{}:{}",
        configuration.server.host, configuration.server.port
    );

    let state = AppState::new(configuration, store);
    let server = &state.settings.server;
    state
        .dashboards
        .spawn_idle_sweep(server.session_idle_limit(), server.dashboard_sweep_interval());

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&address).await.map_err(|e| {
        tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
        anyhow::anyhow!("Failed to bind to address {}: {}", address, e)
    })?;

    info!("Starting signing-dashboard on {}", address);
    axum::serve(listener, app).await.map_err(|e| {
        tracing::error!("Server error: {}", e);
        anyhow::anyhow!("Server error: {}", e)
    })?;

    Ok(())
}

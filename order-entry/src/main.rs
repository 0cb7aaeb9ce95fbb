use dotenvy::dotenv;
use order_entry::config::get_configuration;
use order_entry::services::erp_client::ErpClient;
use order_entry::startup::{build_router, SESSION_IDLE_HOURS};
use order_entry::AppState;
use service_core::observability::logging::init_tracing;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

const EVICTION_INTERVAL: Duration = Duration::from_secs(15 * 60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let configuration = get_configuration().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(&configuration.telemetry)?;

    order_entry::services::metrics::init_metrics()
        .map_err(|e| anyhow::anyhow!("Failed to register metrics: {}", e))?;

    let erp_client = Arc::new(ErpClient::new(configuration.erp_api.clone())?);
    info!(
        order_url = %configuration.erp_api.order_url(),
        customer_url = %configuration.erp_api.customer_url(),
        "ERP endpoints configured"
    );

    let state = AppState::new(erp_client);
    spawn_draft_eviction(state.clone());

    let app = build_router(state, &configuration.server.static_dir);

    let address = format!(
        "{}:{}",
        configuration.server.host, configuration.server.port
    );
    let listener = tokio::net::TcpListener::bind(&address).await.map_err(|e| {
        tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
        anyhow::anyhow!("Failed to bind to address {}: {}", address, e)
    })?;

    info!("Starting order-entry on {}", address);
    axum::serve(listener, app).await.map_err(|e| {
        tracing::error!("Server error: {}", e);
        anyhow::anyhow!("Server error: {}", e)
    })?;

    Ok(())
}

/// Drafts of expired browser sessions are unreachable; drop them.
fn spawn_draft_eviction(state: AppState) {
    let max_idle = Duration::from_secs(SESSION_IDLE_HOURS as u64 * 3600);

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(EVICTION_INTERVAL);
        loop {
            ticker.tick().await;
            let orders = state.orders.evict_idle(max_idle);
            let customers = state.customers.evict_idle(max_idle);
            if orders + customers > 0 {
                info!(orders, customers, "Evicted idle drafts");
            }
        }
    });
}

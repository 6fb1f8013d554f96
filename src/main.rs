use mimalloc::MiMalloc;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use todo_hub::config::Config;
use todo_hub::db::TodoStore;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = Config::load()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        listen_addr = %cfg.listen_addr,
        data_path = %cfg.data_path.display(),
        loglevel = %cfg.loglevel,
        session_ttl_secs = cfg.session_ttl_secs
    );

    let store = Arc::new(TodoStore::open(&cfg.data_path)?);
    let state = todo_hub::HubState::new(store, &cfg)?;

    match cfg.admin_credentials() {
        Some((username, password)) => {
            let admin = state.users.ensure_admin(username, password)?;
            info!(user_id = admin.id, username = %admin.username, "admin account ready");
        }
        None => warn!("no bootstrap admin configured"),
    }

    let app = todo_hub::hub_router(state);

    let listener = TcpListener::bind(&cfg.listen_addr).await?;
    info!("HTTP server listening on {}", cfg.listen_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
    }
}

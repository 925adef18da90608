pub mod api;
pub mod config;
pub mod core_state;
pub mod inference;
pub mod report;
pub mod report_store;
pub mod vocabulary;

use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Process entrypoint: tracing → fit → bind → serve until ctrl-c.
///
/// A corpus that fails to fit stops the process here, before the
/// listener binds: the engine is unusable, so nothing may be served.
pub async fn run() -> Result<(), String> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let core = core_state::CoreState::new().map_err(|e| format!("model fit failed: {e}"))?;
    tracing::info!(
        symptoms = core.engine().vocabulary().len(),
        conditions = core.engine().labels().len(),
        "inference engine fitted"
    );

    let mut server = api::start_api_server(Arc::new(core), config::bind_addr()).await?;
    tracing::info!("listening on http://{}", server.session.server_addr);

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| format!("signal handler error: {e}"))?;
    server.shutdown();
    Ok(())
}

mod api;
mod middleware;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use searchboost_core::{ContentStore, FileAuditLog};
use searchboost_optimizer::Optimizer;
use searchboost_shopify::ShopifyAdminClient;
use searchboost_workflow::Workflow;

use crate::{
    api::{build_app, default_rate_limit_state, AppState},
    middleware::AuthState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = searchboost_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let store: Arc<dyn ContentStore> = Arc::new(ShopifyAdminClient::from_config(&config)?);
    let audit = Arc::new(FileAuditLog::new(config.audit_log_path.clone()));
    let optimizer = Optimizer::from_config(&config)?;
    let workflow = Workflow::new(store, audit, optimizer, &config.shop_domain);

    let auth = AuthState::from_env(matches!(
        config.env,
        searchboost_core::Environment::Development
    ))?;
    let state = AppState {
        workflow: Arc::new(workflow),
        shop_domain: config.shop_domain.clone(),
    };
    let app = build_app(state, auth, default_rate_limit_state());

    tracing::info!(addr = %config.bind_addr, shop = %config.shop_domain, "starting server");
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}

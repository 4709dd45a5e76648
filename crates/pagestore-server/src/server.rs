use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;
use crate::state::AppState;

/// pagestore HTTP server.
pub struct PagestoreServer {
    config: ServerConfig,
}

impl PagestoreServer {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(AppState::from_config(&self.config))
    }

    /// Start serving requests until Ctrl-C.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!(
            addr = %self.config.bind_addr,
            data_root = %self.config.data_root().display(),
            mode = %self.config.mode,
            "pagestore server listening"
        );
        if !self.config.mode.allows_editing() {
            tracing::warn!("production mode: editor endpoint will refuse all requests");
        }
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_construction() {
        let server = PagestoreServer::new(ServerConfig::default());
        assert_eq!(server.config().bind_addr, "127.0.0.1:12785".parse().unwrap());
    }

    #[test]
    fn router_builds() {
        let server = PagestoreServer::new(ServerConfig::default());
        let _router = server.router();
    }
}

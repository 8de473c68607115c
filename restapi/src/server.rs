//! REST API server.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use kpod_core::KpodConfig;
use kpod_runtime::Runtime;
use tokio::net::TcpListener;

use crate::api::{create_router, AppState};
use crate::error::{ApiError, Result};

/// REST API server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on.
    pub listen_addr: SocketAddr,
    /// Upper bound on a single request.
    pub request_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from(&KpodConfig::default())
    }
}

impl From<&KpodConfig> for ServerConfig {
    fn from(config: &KpodConfig) -> Self {
        Self {
            listen_addr: config.listen_addr,
            request_timeout: config.request_timeout(),
        }
    }
}

/// REST API server.
pub struct ApiServer {
    config: ServerConfig,
    runtime: Arc<Runtime>,
}

impl ApiServer {
    /// Creates a new server around an initialized runtime.
    pub fn new(config: ServerConfig, runtime: Arc<Runtime>) -> Self {
        Self { config, runtime }
    }

    /// Binds the listener and serves until Ctrl-C or SIGTERM.
    pub async fn run(&self) -> Result<()> {
        let listener = TcpListener::bind(self.config.listen_addr)
            .await
            .map_err(|e| {
                ApiError::Server(format!("failed to bind {}: {}", self.config.listen_addr, e))
            })?;

        tracing::info!("REST API listening on {}", self.config.listen_addr);
        self.serve(listener).await
    }

    /// Serves on an already bound listener.
    pub async fn serve(&self, listener: TcpListener) -> Result<()> {
        let state = AppState::new(self.runtime.clone(), self.config.request_timeout);
        let app = create_router(state);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ApiError::Server(e.to_string()))?;

        tracing::info!("REST API stopped");
        Ok(())
    }
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_kpod_config() {
        let kpod = KpodConfig {
            listen_addr: "127.0.0.1:9999".parse().unwrap(),
            request_timeout_secs: 7,
            ..Default::default()
        };
        let config = ServerConfig::from(&kpod);
        assert_eq!(config.listen_addr.port(), 9999);
        assert_eq!(config.request_timeout, Duration::from_secs(7));
    }

    #[test]
    fn test_default_port() {
        assert_eq!(ServerConfig::default().listen_addr.port(), 8080);
    }
}

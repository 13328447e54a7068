//! ServerBuilder for fluent API to build the HTTP server

use super::exposure::RestExposure;
use super::host::ServerHost;
use crate::config::ApiConfig;
use crate::core::auth::{AuthProvider, HeaderAuthProvider};
use crate::storage::EntityStore;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder for the pet-care API server
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_config(ApiConfig::from_yaml_file("config/petcare.yaml")?)
///     .build()?;
/// ```
pub struct ServerBuilder {
    config: Option<ApiConfig>,
    store: Option<Arc<EntityStore>>,
    auth_provider: Option<Arc<dyn AuthProvider>>,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder
    pub fn new() -> Self {
        Self {
            config: None,
            store: None,
            auth_provider: None,
            custom_routes: Vec::new(),
        }
    }

    /// Set the configuration (defaults to [`ApiConfig::default_config`])
    pub fn with_config(mut self, config: ApiConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Share an existing store (a fresh empty store otherwise)
    pub fn with_store(mut self, store: Arc<EntityStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Replace the default [`HeaderAuthProvider`]
    pub fn with_auth_provider(mut self, provider: impl AuthProvider + 'static) -> Self {
        self.auth_provider = Some(Arc::new(provider));
        self
    }

    /// Add routes that don't fit the CRUD pattern
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Build the transport-agnostic host
    pub fn build_host(self) -> Result<ServerHost> {
        let config = self.config.unwrap_or_default();
        let store = self.store.unwrap_or_default();
        let auth_provider = self
            .auth_provider
            .unwrap_or_else(|| Arc::new(HeaderAuthProvider));

        let host = ServerHost::new(config, store, auth_provider);
        tracing::debug!(
            entities = host.entity_types().len(),
            "registered record types"
        );
        Ok(host)
    }

    /// Build the final REST router
    pub fn build(mut self) -> Result<Router> {
        let custom_routes = std::mem::take(&mut self.custom_routes);
        let host = Arc::new(self.build_host()?);
        RestExposure::build_router(host, custom_routes)
    }

    /// Serve the application with graceful shutdown
    ///
    /// Binds to `addr` and serves until SIGTERM or Ctrl+C.
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::auth::NoAuthProvider;

    #[test]
    fn test_new_creates_empty_builder() {
        let builder = ServerBuilder::new();
        assert!(builder.config.is_none());
        assert!(builder.store.is_none());
        assert!(builder.auth_provider.is_none());
        assert!(builder.custom_routes.is_empty());
    }

    #[test]
    fn test_with_custom_routes_appends_router() {
        let builder = ServerBuilder::new()
            .with_custom_routes(Router::new())
            .with_custom_routes(Router::new());
        assert_eq!(builder.custom_routes.len(), 2);
    }

    #[test]
    fn test_build_host_uses_defaults() {
        let host = ServerBuilder::new().build_host().expect("host should build");
        assert_eq!(*host.config, ApiConfig::default_config());
        assert_eq!(host.entity_types().len(), 17);
    }

    #[test]
    fn test_build_host_keeps_shared_store() {
        let store = Arc::new(EntityStore::new());
        let host = ServerBuilder::new()
            .with_store(store.clone())
            .with_auth_provider(NoAuthProvider)
            .build_host()
            .expect("host should build");
        assert!(Arc::ptr_eq(&host.store, &store));
    }

    #[test]
    fn test_build_with_custom_routes() {
        use axum::routing::get;

        let custom = Router::new().route("/version", get(|| async { "1" }));
        let router = ServerBuilder::new()
            .with_custom_routes(custom)
            .build()
            .expect("build should succeed with custom routes");
        let _ = router;
    }
}

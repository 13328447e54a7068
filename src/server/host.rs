//! Server host holding everything an exposure needs
//!
//! The host owns the shared state (store, configuration, auth provider) and
//! the registry of served record types. Exposures turn it into a router.

use crate::config::ApiConfig;
use crate::core::auth::AuthProvider;
use crate::resources::handlers::AppState;
use crate::resources::registry::register_resources;
use crate::server::entity_registry::EntityRegistry;
use crate::storage::EntityStore;
use std::sync::Arc;

pub struct ServerHost {
    /// Server configuration
    pub config: Arc<ApiConfig>,

    /// Record store shared by all handlers
    pub store: Arc<EntityStore>,

    /// Resolves the caller of each request
    pub auth_provider: Arc<dyn AuthProvider>,

    /// Registry of record types and their CRUD routes
    pub entity_registry: EntityRegistry,
}

impl ServerHost {
    /// Build the host and register every record type against its state
    pub fn new(
        config: ApiConfig,
        store: Arc<EntityStore>,
        auth_provider: Arc<dyn AuthProvider>,
    ) -> Self {
        let config = Arc::new(config);
        let state = AppState {
            store: store.clone(),
            config: config.clone(),
            auth: auth_provider.clone(),
        };

        let mut entity_registry = EntityRegistry::new();
        register_resources(&mut entity_registry, &state);

        Self {
            config,
            store,
            auth_provider,
            entity_registry,
        }
    }

    /// Get entity types registered in the host
    pub fn entity_types(&self) -> Vec<&str> {
        self.entity_registry.entity_types()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::auth::NoAuthProvider;

    fn make_host() -> ServerHost {
        ServerHost::new(
            ApiConfig::default_config(),
            Arc::new(EntityStore::new()),
            Arc::new(NoAuthProvider),
        )
    }

    #[test]
    fn test_host_registers_every_record_type() {
        let host = make_host();
        assert_eq!(host.entity_types().len(), 17);
        assert!(host.entity_types().contains(&"grooming_appointment"));
    }

    #[test]
    fn test_config_accessible_from_host() {
        let host = make_host();
        assert_eq!(host.config.server.port, 8000);
    }
}

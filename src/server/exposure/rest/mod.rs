//! REST API exposure
//!
//! Consumes a `ServerHost` and produces the Axum `Router` serving the API
//! root, the health checks and every record type's CRUD routes.

use super::super::host::ServerHost;
use anyhow::Result;
use axum::{Json, Router, extract::State, routing::get};
use serde_json::{Map, Value, json};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// REST API exposure implementation
pub struct RestExposure;

/// Collection URLs listed by the API root
#[derive(Clone)]
struct ApiRoot {
    links: Arc<Map<String, Value>>,
}

impl RestExposure {
    /// Build the REST router from a host
    ///
    /// Custom routes are merged after the record routes. Requests are
    /// traced, and CORS headers are added when the configuration asks for it.
    pub fn build_router(host: Arc<ServerHost>, custom_routes: Vec<Router>) -> Result<Router> {
        let root = Self::root_routes(&host);
        let health_routes = Self::health_routes();
        let entity_routes = host.entity_registry.build_routes();

        let mut app = root.merge(health_routes).merge(entity_routes);

        for custom_router in custom_routes {
            app = app.merge(custom_router);
        }

        let app = app.layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));
        if host.config.cors {
            Ok(app.layer(CorsLayer::permissive()))
        } else {
            Ok(app)
        }
    }

    fn root_routes(host: &ServerHost) -> Router {
        let base = host.config.base_url();
        let links: Map<String, Value> = host
            .entity_registry
            .plurals()
            .into_iter()
            .map(|plural| (plural.to_string(), json!(format!("{}/{}/", base, plural))))
            .collect();

        Router::new()
            .route("/", get(Self::api_root))
            .with_state(ApiRoot {
                links: Arc::new(links),
            })
    }

    /// Lists the collection URL of every record type
    async fn api_root(State(root): State<ApiRoot>) -> Json<Value> {
        Json(Value::Object(root.links.as_ref().clone()))
    }

    /// Build health check routes
    fn health_routes() -> Router {
        Router::new()
            .route("/health", get(Self::health_check))
            .route("/healthz", get(Self::health_check))
    }

    /// Health check endpoint handler
    async fn health_check() -> Json<Value> {
        Json(json!({
            "status": "ok",
            "service": "petcare"
        }))
    }
}

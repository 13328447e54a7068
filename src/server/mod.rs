//! Server module for building the HTTP server
//!
//! `ServerBuilder` assembles the host (store, configuration, auth provider),
//! registers every record type and exposes them over REST.

pub mod builder;
pub mod entity_registry;
pub mod exposure;
pub mod host;
pub mod router;

pub use builder::ServerBuilder;
pub use entity_registry::{EntityDescriptor, EntityRegistry};
pub use exposure::RestExposure;
pub use host::ServerHost;

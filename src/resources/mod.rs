//! Record resources module
//!
//! Generic CRUD handlers, the scope-aware service behind them and the
//! registry pairing each record type with its serializer.

pub mod handlers;
pub mod registry;
pub mod service;

pub use handlers::AppState;
pub use registry::{ResourceDescriptor, register_resources};
pub use service::{ResourceService, Scope};

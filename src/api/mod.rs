//! HTTP gateway.
//!
//! Two logical operations (submit-and-predict, export-last-report) plus
//! the supporting vocabulary listing, health check, and embedded entry
//! page. The router is composable; `api_router()` returns a
//! `Router` that can be mounted on any axum server instance.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod server;
pub mod types;

pub use router::api_router;
pub use server::{start_api_server, ApiServer, ApiSession};
pub use types::ApiContext;

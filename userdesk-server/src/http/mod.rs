//! HTTP layer
//!
//! Axum server with:
//! - JSON API under `/api` (any origin allowed)
//! - HTML views under `/usuarios`
//! - Request tracing and a per-request timeout
//! - Graceful shutdown

pub mod error;
pub mod extractors;
pub mod render;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use render::ViewContext;
pub use server::{build_router, run_server, AppState, ServerConfig, ServerError};

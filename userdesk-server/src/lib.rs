//! userdesk-server: users REST API and HTML views over a generic record model
//!
//! Layers, bottom-up:
//! - [`config`]: database settings from the environment
//! - [`db`]: lazy shared connection, query executor, record model, users model
//! - [`models`]: input cleaning and validation
//! - [`http`]: Axum router, JSON handlers, HTML pages

pub mod config;
pub mod db;
pub mod http;
pub mod models;

pub use config::{ConfigError, DatabaseConfig, DatabaseKind};
pub use db::{ConnectionProvider, DbError, QueryExecutor, UserModel};
pub use http::{build_router, run_server, AppState, ServerConfig, ServerError};

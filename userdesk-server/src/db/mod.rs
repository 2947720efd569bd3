//! Database layer - one shared connection and a generic record model
//!
//! # Design Principles
//!
//! - One connection per process, serialized behind an async mutex
//! - Every value is bound positionally, never interpolated
//! - Column names are checked against a per-model allow-list
//! - Lookups that find nothing return `None`, not an error

pub mod connection;
pub mod executor;
pub mod model;
pub mod record;
pub mod users;

pub use connection::{ConnectionProvider, SharedConnection};
pub use executor::{BindValue, ExecutionHandle, QueryExecutor};
pub use model::{Model, Operator};
pub use record::{Fields, Record};
pub use users::{User, UserModel};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("connection failed: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("column '{column}' is not allowed on table '{table}'")]
    UnknownColumn { table: &'static str, column: String },

    #[error("no columns given for {operation} on table '{table}'")]
    EmptyData {
        table: &'static str,
        operation: &'static str,
    },

    #[error("record in table '{table}' has no integer id")]
    MissingId { table: &'static str },

    #[error("not found: {table} '{id}'")]
    NotFound { table: &'static str, id: i64 },
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use super::{ConnectionProvider, QueryExecutor};
    use crate::config::DatabaseConfig;

    pub const CREATE_USERS: &str = "CREATE TABLE users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        email TEXT NOT NULL
    )";

    /// Executor over a private in-memory SQLite database with a `users` table.
    pub async fn memory_executor() -> QueryExecutor {
        let config = DatabaseConfig::from_url("sqlite::memory:").expect("sqlite url");
        let executor = QueryExecutor::new(Arc::new(ConnectionProvider::new(config)));
        executor
            .execute(CREATE_USERS, &[])
            .await
            .expect("create users table");
        executor
    }
}

//! Connection provider
//!
//! Holds exactly one database connection for the lifetime of the process.
//! The connection is opened on first use and shared by every later caller.

use std::sync::Arc;

use sqlx::{AnyConnection, Connection};
use tokio::sync::{Mutex, OnceCell};

use super::DbError;
use crate::config::{DatabaseConfig, DatabaseKind};

/// The process-wide connection. The mutex serializes statements.
pub type SharedConnection = Arc<Mutex<AnyConnection>>;

/// Lazily connects once and hands out the same connection afterwards.
pub struct ConnectionProvider {
    config: DatabaseConfig,
    connection: OnceCell<SharedConnection>,
}

impl ConnectionProvider {
    /// Store the configuration. No connection is attempted yet.
    pub fn new(config: DatabaseConfig) -> Self {
        Self {
            config,
            connection: OnceCell::new(),
        }
    }

    pub fn kind(&self) -> DatabaseKind {
        self.config.kind
    }

    /// Whether the connection has been opened.
    pub fn is_connected(&self) -> bool {
        self.connection.initialized()
    }

    /// Get the shared connection, opening it on the first call.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Connect`] if the connect call fails. Callers at
    /// startup treat this as fatal.
    pub async fn connection(&self) -> Result<SharedConnection, DbError> {
        let connection = self
            .connection
            .get_or_try_init(|| async {
                sqlx::any::install_default_drivers();
                tracing::info!(kind = %self.config.kind, "Opening database connection");

                let connection = AnyConnection::connect(&self.config.url())
                    .await
                    .map_err(DbError::Connect)?;

                Ok::<_, DbError>(Arc::new(Mutex::new(connection)))
            })
            .await?;

        Ok(Arc::clone(connection))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_provider() -> ConnectionProvider {
        ConnectionProvider::new(DatabaseConfig::from_url("sqlite::memory:").unwrap())
    }

    #[tokio::test]
    async fn connects_lazily() {
        let provider = memory_provider();
        assert!(!provider.is_connected());

        provider.connection().await.unwrap();
        assert!(provider.is_connected());
    }

    #[tokio::test]
    async fn returns_same_connection() {
        let provider = memory_provider();
        let first = provider.connection().await.unwrap();
        let second = provider.connection().await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn connect_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no-such-dir").join("users.db");
        let config = DatabaseConfig::from_url(&format!("sqlite:{}", missing.display())).unwrap();
        let provider = ConnectionProvider::new(config);

        let err = provider.connection().await.unwrap_err();
        assert!(matches!(err, DbError::Connect(_)));
        assert!(!provider.is_connected());
    }
}

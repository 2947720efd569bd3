//! Users model - the generic model bound to the `users` table

use serde::{Deserialize, Serialize};

use super::executor::QueryExecutor;
use super::model::Model;
use super::record::{Fields, Record};
use super::DbError;
use crate::config::DatabaseKind;

pub const USERS_TABLE: &str = "users";

/// Columns callers may write or filter on.
pub const USER_COLUMNS: &[&str] = &["name", "email"];

/// Typed view of a users row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl TryFrom<Record> for User {
    type Error = serde_json::Error;

    fn try_from(record: Record) -> Result<Self, Self::Error> {
        serde_json::from_value(serde_json::Value::Object(record))
    }
}

/// Users repository, constructed once at startup and shared by handlers.
#[derive(Clone)]
pub struct UserModel {
    model: Model,
}

impl UserModel {
    pub fn new(executor: QueryExecutor) -> Self {
        Self {
            model: Model::new(executor, USERS_TABLE, USER_COLUMNS),
        }
    }

    /// Backend the users table lives on.
    pub fn database_kind(&self) -> DatabaseKind {
        self.model.executor().kind()
    }

    /// Whether the shared connection has been opened.
    pub fn is_connected(&self) -> bool {
        self.model.executor().provider().is_connected()
    }

    pub async fn all(&self) -> Result<Vec<Record>, DbError> {
        self.model.all().await
    }

    pub async fn find(&self, id: i64) -> Result<Option<Record>, DbError> {
        self.model.find(id).await
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Record>, DbError> {
        self.model.where_eq("email", email).await
    }

    /// A different user already holding `email`, if any.
    pub async fn find_by_email_excluding(
        &self,
        email: &str,
        id: i64,
    ) -> Result<Option<Record>, DbError> {
        self.model.where_not("email", email, id).await
    }

    pub async fn create(&self, data: &Fields) -> Result<Record, DbError> {
        self.model.create(data).await
    }

    pub async fn update(&self, id: i64, data: &Fields) -> Result<Option<Record>, DbError> {
        self.model.update(id, data).await
    }

    pub async fn delete(&self, id: i64) -> Result<Option<Record>, DbError> {
        self.model.delete(id).await
    }

    pub async fn count(&self) -> Result<i64, DbError> {
        self.model.count().await
    }
}

//! Generic record model - table-agnostic CRUD over the query executor
//!
//! Builds SQL text plus an ordered parameter list for one table. Values are
//! always bound; identifiers come only from the model's allow-list.

use super::executor::{BindValue, QueryExecutor};
use super::record::{record_id, Fields, Record};
use super::DbError;

/// Comparison operator for [`Model::where_op`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Like,
}

impl Operator {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::NotEq => "<>",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::Like => "LIKE",
        }
    }
}

/// CRUD operations against one table.
#[derive(Clone)]
pub struct Model {
    executor: QueryExecutor,
    table: &'static str,
    columns: &'static [&'static str],
}

impl Model {
    /// Bind a model to `table`. `columns` lists the writable and filterable
    /// columns besides `id`.
    pub fn new(executor: QueryExecutor, table: &'static str, columns: &'static [&'static str]) -> Self {
        Self {
            executor,
            table,
            columns,
        }
    }

    pub fn executor(&self) -> &QueryExecutor {
        &self.executor
    }

    /// Every record in storage order.
    pub async fn all(&self) -> Result<Vec<Record>, DbError> {
        let sql = format!("SELECT * FROM {}", self.table);
        Ok(self.executor.execute(&sql, &[]).await?.fetch_all())
    }

    /// Record with the given id.
    pub async fn find(&self, id: i64) -> Result<Option<Record>, DbError> {
        let sql = format!("SELECT * FROM {} WHERE id = ?", self.table);
        Ok(self
            .executor
            .execute(&sql, &[BindValue::Int(id)])
            .await?
            .fetch_one())
    }

    /// First record whose `column` equals `value`.
    pub async fn where_eq(
        &self,
        column: &str,
        value: impl Into<BindValue>,
    ) -> Result<Option<Record>, DbError> {
        self.where_op(column, Operator::Eq, value).await
    }

    /// First record matching `column <operator> value`.
    ///
    /// Only the first match is returned, never a list.
    pub async fn where_op(
        &self,
        column: &str,
        operator: Operator,
        value: impl Into<BindValue>,
    ) -> Result<Option<Record>, DbError> {
        self.check_column(column)?;
        let sql = format!("SELECT * FROM {} WHERE {} {} ?", self.table, column, operator.as_sql());
        Ok(self
            .executor
            .execute(&sql, &[value.into()])
            .await?
            .fetch_one())
    }

    /// First record whose `column` equals `value`, other than `excluded_id`.
    pub async fn where_not(
        &self,
        column: &str,
        value: impl Into<BindValue>,
        excluded_id: i64,
    ) -> Result<Option<Record>, DbError> {
        self.check_column(column)?;
        let sql = format!("SELECT * FROM {} WHERE {} = ? AND id <> ?", self.table, column);
        Ok(self
            .executor
            .execute(&sql, &[value.into(), BindValue::Int(excluded_id)])
            .await?
            .fetch_one())
    }

    /// Insert `data` and return the stored record.
    pub async fn create(&self, data: &Fields) -> Result<Record, DbError> {
        self.check_fields(data, "insert")?;

        let columns: Vec<&str> = data.keys().map(String::as_str).collect();
        let placeholders = vec!["?"; columns.len()].join(", ");
        let mut sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table,
            columns.join(", "),
            placeholders
        );
        let params: Vec<BindValue> = data.values().map(BindValue::from).collect();

        let inserted_id = if self.executor.kind().returns_inserted_id() {
            sql.push_str(" RETURNING id");
            let row = self.executor.execute(&sql, &params).await?.fetch_one();
            row.as_ref().and_then(record_id)
        } else {
            self.executor.execute(&sql, &params).await?.last_insert_id()
        };
        let id = inserted_id.ok_or(DbError::MissingId { table: self.table })?;

        tracing::debug!(table = self.table, id, "Inserted record");

        self.find(id).await?.ok_or(DbError::NotFound {
            table: self.table,
            id,
        })
    }

    /// Update the columns in `data` on the record with `id`.
    ///
    /// Returns `None` without writing when no such record exists.
    pub async fn update(&self, id: i64, data: &Fields) -> Result<Option<Record>, DbError> {
        self.check_fields(data, "update")?;

        let Some(found) = self.find(id).await? else {
            return Ok(None);
        };
        let found_id = record_id(&found).ok_or(DbError::MissingId { table: self.table })?;

        let assignments = data
            .keys()
            .map(|column| format!("{} = ?", column))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!("UPDATE {} SET {} WHERE id = ?", self.table, assignments);

        let mut params: Vec<BindValue> = data.values().map(BindValue::from).collect();
        params.push(BindValue::Int(found_id));

        self.executor.execute(&sql, &params).await?;
        self.find(found_id).await
    }

    /// Delete the record with `id`, returning its pre-delete snapshot.
    ///
    /// Returns `None` without writing when no such record exists.
    pub async fn delete(&self, id: i64) -> Result<Option<Record>, DbError> {
        let Some(found) = self.find(id).await? else {
            return Ok(None);
        };
        let found_id = record_id(&found).ok_or(DbError::MissingId { table: self.table })?;

        let sql = format!("DELETE FROM {} WHERE id = ?", self.table);
        self.executor.execute(&sql, &[BindValue::Int(found_id)]).await?;

        Ok(Some(found))
    }

    /// Number of records in the table.
    pub async fn count(&self) -> Result<i64, DbError> {
        let sql = format!("SELECT COUNT(*) AS total FROM {}", self.table);
        let row = self.executor.execute(&sql, &[]).await?.fetch_one();
        Ok(row
            .as_ref()
            .and_then(|r| r.get("total"))
            .and_then(serde_json::Value::as_i64)
            .unwrap_or(0))
    }

    fn check_column(&self, column: &str) -> Result<(), DbError> {
        if column == "id" || self.columns.contains(&column) {
            Ok(())
        } else {
            Err(DbError::UnknownColumn {
                table: self.table,
                column: column.to_owned(),
            })
        }
    }

    fn check_fields(&self, data: &Fields, operation: &'static str) -> Result<(), DbError> {
        if data.is_empty() {
            return Err(DbError::EmptyData {
                table: self.table,
                operation,
            });
        }
        for column in data.keys() {
            if column == "id" {
                // ids are assigned by storage and never rewritten
                return Err(DbError::UnknownColumn {
                    table: self.table,
                    column: column.clone(),
                });
            }
            self.check_column(column)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::memory_executor;
    use serde_json::{json, Value};

    const COLUMNS: &[&str] = &["name", "email"];

    async fn model() -> Model {
        Model::new(memory_executor().await, "users", COLUMNS)
    }

    fn fields(value: Value) -> Fields {
        match value {
            Value::Object(map) => map,
            _ => panic!("fields must be an object"),
        }
    }

    #[tokio::test]
    async fn create_then_find() {
        let model = model().await;
        let created = model
            .create(&fields(json!({"name": "Ana", "email": "ana@example.com"})))
            .await
            .unwrap();

        let id = record_id(&created).unwrap();
        let found = model.find(id).await.unwrap().unwrap();
        assert_eq!(found["name"], "Ana");
        assert_eq!(found["email"], "ana@example.com");
        assert_eq!(found, created);
    }

    #[tokio::test]
    async fn all_in_storage_order() {
        let model = model().await;
        for name in ["a", "b", "c"] {
            model
                .create(&fields(json!({"name": name, "email": format!("{}@x.io", name)})))
                .await
                .unwrap();
        }

        let names: Vec<Value> = model
            .all()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r["name"].clone())
            .collect();
        assert_eq!(names, [json!("a"), json!("b"), json!("c")]);
    }

    #[tokio::test]
    async fn update_changes_only_given_field() {
        let model = model().await;
        let created = model
            .create(&fields(json!({"name": "Ana", "email": "ana@example.com"})))
            .await
            .unwrap();
        let id = record_id(&created).unwrap();

        let updated = model
            .update(id, &fields(json!({"name": "Ana Maria"})))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated["id"], created["id"]);
        assert_eq!(updated["name"], "Ana Maria");
        assert_eq!(updated["email"], "ana@example.com");
    }

    #[tokio::test]
    async fn update_missing_id_writes_nothing() {
        let model = model().await;
        model
            .create(&fields(json!({"name": "Ana", "email": "ana@example.com"})))
            .await
            .unwrap();

        let result = model
            .update(999, &fields(json!({"name": "Ghost"})))
            .await
            .unwrap();

        assert!(result.is_none());
        assert_eq!(model.count().await.unwrap(), 1);
        assert!(model.where_eq("name", "Ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_returns_snapshot() {
        let model = model().await;
        let created = model
            .create(&fields(json!({"name": "Ana", "email": "ana@example.com"})))
            .await
            .unwrap();
        let id = record_id(&created).unwrap();

        let deleted = model.delete(id).await.unwrap().unwrap();
        assert_eq!(deleted, created);
        assert!(model.find(id).await.unwrap().is_none());
        assert_eq!(model.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn delete_missing_id_writes_nothing() {
        let model = model().await;
        model
            .create(&fields(json!({"name": "Ana", "email": "ana@example.com"})))
            .await
            .unwrap();

        assert!(model.delete(999).await.unwrap().is_none());
        assert_eq!(model.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn where_returns_first_match_only() {
        let model = model().await;
        let first = model
            .create(&fields(json!({"name": "Twin", "email": "one@example.com"})))
            .await
            .unwrap();
        model
            .create(&fields(json!({"name": "Twin", "email": "two@example.com"})))
            .await
            .unwrap();

        let found = model.where_eq("name", "Twin").await.unwrap().unwrap();
        assert_eq!(found, first);
    }

    #[tokio::test]
    async fn where_op_honors_zero_value() {
        let model = model().await;
        model
            .create(&fields(json!({"name": "Ana", "email": "ana@example.com"})))
            .await
            .unwrap();

        let above_zero = model.where_op("id", Operator::Gt, 0_i64).await.unwrap();
        assert!(above_zero.is_some());

        let equal_zero = model.where_op("id", Operator::Eq, 0_i64).await.unwrap();
        assert!(equal_zero.is_none());

        let blank_name = model.where_eq("name", "").await.unwrap();
        assert!(blank_name.is_none());
    }

    #[tokio::test]
    async fn where_not_skips_excluded_id() {
        let model = model().await;
        let created = model
            .create(&fields(json!({"name": "Ana", "email": "ana@example.com"})))
            .await
            .unwrap();
        let id = record_id(&created).unwrap();

        assert!(model
            .where_not("email", "ana@example.com", id)
            .await
            .unwrap()
            .is_none());
        assert!(model
            .where_not("email", "ana@example.com", id + 1)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn rejects_columns_outside_allow_list() {
        let model = model().await;

        let err = model
            .create(&fields(json!({"name": "Ana", "is_admin": 1})))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UnknownColumn { ref column, .. } if column == "is_admin"));

        let err = model.where_eq("password; --", "x").await.unwrap_err();
        assert!(matches!(err, DbError::UnknownColumn { .. }));

        let err = model
            .update(1, &fields(json!({"id": 5})))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UnknownColumn { .. }));

        assert_eq!(model.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn rejects_empty_data() {
        let model = model().await;
        let err = model.create(&Fields::new()).await.unwrap_err();
        assert!(matches!(err, DbError::EmptyData { operation: "insert", .. }));

        let err = model.update(1, &Fields::new()).await.unwrap_err();
        assert!(matches!(err, DbError::EmptyData { operation: "update", .. }));
    }
}

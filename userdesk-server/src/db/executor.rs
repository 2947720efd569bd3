//! Query executor - positional parameter binding over the shared connection
//!
//! SQL is always written with `?` placeholders. For PostgreSQL they are
//! numbered (`$1`, `$2`, ...) before the statement is prepared.

use std::borrow::Cow;
use std::sync::Arc;

use serde_json::Value;
use sqlx::Any;

use super::record::{decode_row, Record};
use super::{ConnectionProvider, DbError};
use crate::config::DatabaseKind;

/// A bound parameter. The variant is the declared type used for binding.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    /// Integer value (64-bit)
    Int(i64),
    /// Text value, the default declared type
    Text(String),
    /// NULL value
    Null,
}

impl From<i64> for BindValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for BindValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for BindValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&Value> for BindValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::String(s) => Self::Text(s.clone()),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => Self::Text(n.to_string()),
            },
            other => Self::Text(other.to_string()),
        }
    }
}

/// Outcome of one executed statement.
#[derive(Debug, Default)]
pub struct ExecutionHandle {
    rows: Vec<Record>,
    rows_affected: u64,
    last_insert_id: Option<i64>,
}

impl ExecutionHandle {
    /// First result row, or `None` when the statement produced no rows.
    pub fn fetch_one(self) -> Option<Record> {
        self.rows.into_iter().next()
    }

    /// All result rows in the order storage returned them.
    pub fn fetch_all(self) -> Vec<Record> {
        self.rows
    }

    pub fn rows_affected(&self) -> u64 {
        self.rows_affected
    }

    /// Storage-assigned id of the last inserted row, when the driver reports one.
    pub fn last_insert_id(&self) -> Option<i64> {
        self.last_insert_id
    }
}

/// Runs parameterized statements on the shared connection.
#[derive(Clone)]
pub struct QueryExecutor {
    provider: Arc<ConnectionProvider>,
}

impl QueryExecutor {
    pub fn new(provider: Arc<ConnectionProvider>) -> Self {
        Self { provider }
    }

    pub fn kind(&self) -> DatabaseKind {
        self.provider.kind()
    }

    pub fn provider(&self) -> &Arc<ConnectionProvider> {
        &self.provider
    }

    /// Prepare `sql`, bind `params` at positions 1..N, and run it.
    ///
    /// Statements that produce rows are fetched in full; other statements
    /// report rows affected and the last inserted id.
    pub async fn execute(&self, sql: &str, params: &[BindValue]) -> Result<ExecutionHandle, DbError> {
        let sql = if self.kind().numbered_placeholders() {
            number_placeholders(sql)
        } else {
            Cow::Borrowed(sql)
        };
        tracing::debug!(sql = %sql, params = params.len(), "Executing statement");

        let connection = self.provider.connection().await?;
        let mut connection = connection.lock().await;

        let mut query = sqlx::query::<Any>(sql.as_ref()).persistent(false);
        for param in params {
            query = match param {
                BindValue::Int(value) => query.bind(*value),
                BindValue::Text(value) => query.bind(value.clone()),
                BindValue::Null => query.bind(None::<String>),
            };
        }

        if returns_rows(&sql) {
            let rows = query.fetch_all(&mut *connection).await?;
            let rows = rows.iter().map(decode_row).collect::<Result<Vec<_>, _>>()?;
            Ok(ExecutionHandle {
                rows,
                ..ExecutionHandle::default()
            })
        } else {
            let result = query.execute(&mut *connection).await?;
            Ok(ExecutionHandle {
                rows: Vec::new(),
                rows_affected: result.rows_affected(),
                last_insert_id: result.last_insert_id(),
            })
        }
    }
}

/// Whether a statement yields a result set.
fn returns_rows(sql: &str) -> bool {
    let upper = sql.trim_start().to_ascii_uppercase();
    ["SELECT", "WITH", "VALUES", "PRAGMA", "SHOW"]
        .iter()
        .any(|keyword| upper.starts_with(keyword))
        || upper.contains(" RETURNING ")
        || upper.ends_with(" RETURNING ID")
}

/// Rewrite `?` placeholders to `$1..$N`, skipping quoted text and comments.
fn number_placeholders(sql: &str) -> Cow<'_, str> {
    if !sql.contains('?') {
        return Cow::Borrowed(sql);
    }

    #[derive(Clone, Copy, PartialEq)]
    enum State {
        Normal,
        SingleQuoted,
        DoubleQuoted,
        LineComment,
        BlockComment,
    }

    let mut out = String::with_capacity(sql.len() + 8);
    let mut state = State::Normal;
    let mut position = 0;
    let mut chars = sql.chars().peekable();

    while let Some(c) = chars.next() {
        match state {
            State::Normal => match c {
                '?' => {
                    position += 1;
                    out.push('$');
                    out.push_str(&position.to_string());
                    continue;
                }
                '\'' => state = State::SingleQuoted,
                '"' => state = State::DoubleQuoted,
                '-' if chars.peek() == Some(&'-') => state = State::LineComment,
                '/' if chars.peek() == Some(&'*') => state = State::BlockComment,
                _ => {}
            },
            State::SingleQuoted if c == '\'' => state = State::Normal,
            State::DoubleQuoted if c == '"' => state = State::Normal,
            State::LineComment if c == '\n' => state = State::Normal,
            State::BlockComment if c == '*' && chars.peek() == Some(&'/') => {
                out.push(c);
                if let Some(slash) = chars.next() {
                    out.push(slash);
                }
                state = State::Normal;
                continue;
            }
            _ => {}
        }
        out.push(c);
    }

    Cow::Owned(out)
}
